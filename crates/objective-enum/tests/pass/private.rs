fn main() {
    #[objective_enum::generate]
    mod direction {
        use objective_enum::ObjectiveEnum as _;

        #[objective_enum]
        struct Direction {
            dx: i8,
            dy: i8,
        }

        impl Direction {
            const fn new(dx: i8, dy: i8) -> Direction {
                Direction { dx, dy }
            }

            #[members]
            fn members() {
                Enum::North(0, 1);
                Enum::East(1, 0);
                Enum::South(0, -1);
                Enum::West(-1, 0);
            }

            fn turn_right(&self) -> &'static Self {
                let next = (self.ordinal() + 1) % 4;
                objective_enum::value_of::<Self>(next).unwrap()
            }
        }

        pub fn check() {
            assert!(Direction::North.turn_right() == Direction::East.get());
            assert_eq!(Direction::West.turn_right().dy, 1);
            assert_eq!(Direction::South.dx + Direction::South.dy, -1);
        }
    }

    direction::check();
}
