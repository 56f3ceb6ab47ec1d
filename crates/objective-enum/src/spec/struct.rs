// SPDX-License-Identifier: MPL-2.0

//! A documentation-only module describing marked structs.
//!
//! ## Syntax
//!
//! ```abnf
//! struct-item = marker-attr *%r"OuterAttribute" %r"Visibility" "struct" %r"IDENTIFIER"
//!     "{" *(field ",") [field [","]] "}"
//! marker-attr = "#[" ["objective_enum" "::"] "objective_enum" "]"
//! ; Note: generic parameters, `where` clauses, tuple structs and unit structs are not supported.
//! ; Note: no field may be named `__identity`.
//! field = *%r"OuterAttribute" %r"Visibility" %r"IDENTIFIER" ":" %r"Type"
//!
//! ; Constructors are associated functions declared in an inherent `impl` of the struct, in the
//! ; same module.
//! constructor = %r"Visibility" "fn" %r"IDENTIFIER" "(" [%r"FunctionParameters"] ")"
//!     "->" ("Self" / struct-name) %r"BlockExpression"
//! ```
//!
//! ## Semantics
//!
//! A struct may not derive `PartialEq`, `Eq` or `Hash`: members are equal if and only if their
//! ordinals are equal, and these traits are implemented accordingly.
//!
//! Struct expressions of the form `Self { .. }` or `Name { .. }` within the inherent impls of the
//! struct are completed with the hidden identity field. Instances are only meant to be created by
//! the registry, through the constructors.
//!
//! ## Output
//!
//! This form of `generate` produces:
//!
//! - The `struct` definition, with a hidden `__identity` field appended.
//! - The inherent `impl` blocks of the struct, minus the `#[members]` initializer.
//! - An `impl` block with one associated constant per member, of type
//!   [`Member<Self>`](crate::Member), named after the member.
//! - An `impl ObjectiveEnum` block, which holds the registry as a `static` inside
//!   `try_registry`.
//! - Implementations of `PartialEq`, `Eq`, `Hash`, `From<&Self> for Ordinal` and
//!   `TryFrom<Ordinal> for &'static Self`.
//! - An implementation of `Display` that prints the member name, unless the module already
//!   implements `Display` for the struct.
//!
//! If the struct or its initializer is rejected, only the diagnostic is produced: the struct and
//! its impls are left as written, minus the markers and the initializer.
