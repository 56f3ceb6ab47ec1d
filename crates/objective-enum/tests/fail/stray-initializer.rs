struct Role;

impl Role {
    #[objective_enum::members]
    fn members() {}
}

fn main() {
    let _ = Role;
    Role::members();
}
