#[objective_enum::generate]
mod roles {
    #[objective_enum]
    pub struct Role(pub u8);
}

fn main() {
    let role = roles::Role(0);
    let _ = role.0;
}
