#[objective_enum::generate]
mod roles {
    #[objective_enum]
    pub struct Role {}

    impl Role {
        pub fn new() -> Self {
            Self {}
        }

        #[members]
        fn members() {
            Enum::Admin();
            Enum::Admin();
        }
    }
}

fn main() {
    let _ = roles::Role::new();
}
