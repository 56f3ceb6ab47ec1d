#[objective_enum::objective_enum]
struct Role {}

fn main() {
    let _ = Role {};
}
