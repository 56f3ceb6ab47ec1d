fn main() {
    use objective_enum::ObjectiveEnum as _;

    #[objective_enum::generate]
    mod empty {
        #[objective_enum]
        pub struct Nothing {}

        impl Nothing {
            #[members]
            fn members() {}
        }
    }

    assert!(empty::Nothing::values().next().is_none());
    assert!(empty::Nothing::registry().is_empty());
}
