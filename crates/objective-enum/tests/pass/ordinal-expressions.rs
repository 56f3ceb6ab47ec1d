const BASE: u32 = 100;

fn main() {
    use objective_enum::ObjectiveEnum as _;

    #[objective_enum::generate]
    mod codes {
        #[objective_enum]
        pub struct Code {
            pub text: String,
        }

        impl Code {
            fn new(text: &str) -> Self {
                Self { text: text.to_owned() }
            }

            fn blank() -> Self {
                Self::new("")
            }

            #[members]
            fn members() {
                Enum::Ok::blank()(super::BASE * 2);
                Enum::Created("created")(super::BASE * 2 + 1);
                Enum::Accepted::new("accepted");
            }
        }
    }

    assert_eq!(codes::Code::Ok.ordinal(), 200);
    assert_eq!(codes::Code::Accepted.ordinal(), 202);
    assert_eq!(codes::Code::Created.text, "created");
}
