// SPDX-License-Identifier: MPL-2.0

use std::collections::HashSet;

use objective_enum::{ErrorKind, ObjectiveEnum as _, RegistryError};

#[objective_enum::generate]
mod planets {
    use std::fmt;

    use objective_enum::ObjectiveEnum as _;

    #[objective_enum]
    #[derive(Clone, Debug)]
    pub struct Planet {
        pub mass: f64,
        pub radius: f64,
    }

    impl Planet {
        const EARTH_MASS: f64 = 5.976e24;

        fn new(mass: f64, radius: f64) -> Self {
            Self { mass, radius }
        }

        fn earthlike(radius: f64) -> Planet {
            Planet { mass: Self::EARTH_MASS, radius }
        }

        #[members]
        fn members() {
            Enum::Mercury(3.303e23, 2.4397e6);
            Enum::Venus(4.869e24, 6.0518e6);
            Enum::Earth::earthlike(6.37814e6)(10);
            Enum::Mars(6.421e23, 3.3972e6);
        }

        pub fn surface_gravity(&self) -> f64 {
            6.673e-11 * self.mass / (self.radius * self.radius)
        }
    }

    impl fmt::Display for Planet {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "planet {}", self.name())
        }
    }

    pub mod moons {
        #[objective_enum]
        pub struct Moon {
            pub planet: &'static str,
        }

        impl Moon {
            fn of(planet: &'static str) -> Self {
                Self { planet }
            }

            #[members]
            fn members() {
                Enum::Luna(Self::EARTH);
                Enum::Phobos("Mars")(5);
                Enum::Deimos("Mars");
            }

            const EARTH: &'static str = "Earth";
        }
    }
}

mod reexport {
    pub use objective_enum::*;
}

#[objective_enum::generate(crate = crate::reexport)]
mod suits {
    #[objective_enum]
    pub struct Suit {
        pub symbol: char,
    }

    impl Suit {
        fn new(symbol: char) -> Self {
            Self { symbol }
        }

        #[members]
        fn members() {
            Enum::Clubs('♣');
            Enum::Diamonds('♦');
            Enum::Hearts('♥');
            Enum::Spades('♠');
        }
    }
}

#[objective_enum::generate]
mod weights {
    #[objective_enum]
    pub struct Weight {
        pub grams: u32,
    }

    impl Weight {
        fn new(grams: u32) -> Self {
            Self { grams }
        }

        #[members]
        fn members() {
            Enum::Light(1)(1);
            Enum::Heavy(1000)(1);
        }
    }
}

#[objective_enum::generate(malformed = "ignore")]
mod sketches {
    #[objective_enum]
    pub struct Draft {
        pub note: &'static str,
    }
}

use planets::{moons::Moon, Planet};
use suits::Suit;
use weights::Weight;

#[test]
fn auto_ordinals_continue_after_explicit_ones() {
    let ordinals: Vec<_> = Planet::values().map(|it| (it.name(), it.ordinal())).collect();
    assert_eq!(ordinals, [("Mercury", 0), ("Venus", 1), ("Earth", 10), ("Mars", 11)]);

    let ordinals: Vec<_> = Moon::values().map(|it| (it.name(), it.ordinal())).collect();
    assert_eq!(ordinals, [("Luna", 0), ("Phobos", 5), ("Deimos", 6)]);
}

#[test]
fn named_constructor_and_self_in_arguments() {
    assert_eq!(Planet::Earth.mass, 5.976e24);
    assert!((Planet::Earth.surface_gravity() - 9.8).abs() < 0.1);
    assert_eq!(Moon::Luna.planet, "Earth");
}

#[test]
fn user_display_is_kept() {
    assert_eq!(Planet::Mars.to_string(), "planet Mars");
    assert_eq!(Moon::Phobos.to_string(), "Phobos");
}

#[test]
fn clones_equal_their_member() {
    let earth = Planet::Earth.get().clone();
    assert_eq!(earth, *Planet::Earth);
    assert_eq!(earth.name(), "Earth");
}

#[test]
fn members_hash_by_ordinal() {
    let mut set: HashSet<&Planet> = Planet::values().collect();
    assert_eq!(set.len(), 4);
    assert!(!set.insert(Planet::Earth.get()));
}

#[test]
fn registry_lookups() {
    let registry = Planet::registry();
    assert_eq!(registry.len(), 4);
    assert_eq!(registry.get_by_ordinal(11).unwrap().name(), "Mars");
    assert!(matches!(
        registry.get_by_ordinal(2),
        Err(RegistryError::OrdinalNotFound { ordinal: 2, .. }),
    ));
}

#[test]
fn custom_crate_path() {
    assert_eq!(
        objective_enum::names::<Suit>().collect::<Vec<_>>(),
        ["Clubs", "Diamonds", "Hearts", "Spades"],
    );
    assert_eq!(Suit::Hearts.symbol, '♥');
    assert_eq!(Suit::Spades.ordinal(), 3);
}

#[test]
fn ignored_sketch_is_left_alone() {
    let draft = sketches::Draft { note: "not an objective enum" };
    assert_eq!(draft.note, "not an objective enum");
}

#[test]
fn failed_population_is_reported_not_raised() {
    let e = Weight::try_registry().err().unwrap();
    assert_eq!(e.kind(), ErrorKind::Conflict);
    assert!(matches!(e, RegistryError::OrdinalTaken { ordinal: 1, .. }));

    assert!(objective_enum::try_value_of::<Weight>("Light").is_none());
    assert!(!objective_enum::exists::<Weight>(1u32));
    assert!(Weight::try_parse("Heavy").is_none());
}

#[test]
fn failed_population_panics_on_registry() {
    assert!(std::panic::catch_unwind(|| Weight::registry().len()).is_err());
}
