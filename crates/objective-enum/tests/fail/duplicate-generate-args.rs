#[objective_enum::generate(malformed = "error", malformed = "ignore")]
mod roles {}

fn main() {}
