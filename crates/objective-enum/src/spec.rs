// SPDX-License-Identifier: MPL-2.0

//! A documentation-only module that explains how to use [`generate`].
//!
//! [`generate`]: crate::generate
//!
//! This module is dedicated to describing the syntax and behavior of the `generate` attribute
//! macro. Supporting items exported by this crate, including the [`ObjectiveEnum`] trait and the
//! [`Registry`] type, are documented separately.
//!
//! [`ObjectiveEnum`]: crate::ObjectiveEnum
//! [`Registry`]: crate::Registry
//!
//! `generate` is applied to an inline module. It scans that module, and every inline module
//! nested within it, for structs marked `#[objective_enum]`, and replaces each one with a
//! completed objective enum. Everything else in the module is left as written.
//!
//! ## Syntax Reference
//!
//! The syntax is a subset of Rust syntax and is notated in a modified [Augmented Backus-Naur Form]
//! where:
//!
//! [Augmented Backus-Naur Form]: https://en.wikipedia.org/wiki/Augmented_Backus%E2%80%93Naur_form
//!
//! - implicit whitespace is allowed between concatenated rule elements (and may be required,
//!   depending on the context);
//! - literal text strings are case sensitive by default; and
//! - <code>%r"<em>rule</em>"</code> is a rule from [The Rust Reference] (and should not be
//!   interpreted as a literal text string).
//!
//! [The Rust Reference]: https://doc.rust-lang.org/reference/
//!
//! ```abnf
//! generate-attr = "#[" "generate" [generate-attr-input] "]"
//! generate-attr-input = "(" *(generate-attr-arg ",") [generate-attr-arg [","]] ")"
//! generate-attr-arg = crate-arg / malformed-arg
//! ; The path of this crate as seen from the annotated module. Defaults to `::objective_enum`.
//! crate-arg = "crate" "=" %r"SimplePath"
//! ; What to do with a marked item that cannot be an objective enum. Defaults to "error".
//! malformed-arg = "malformed" "=" (%x22 "error" %x22 / %x22 "ignore" %x22)
//!
//! module-item = generate-attr *%r"OuterAttribute" %r"Visibility" "mod" %r"IDENTIFIER" "{"
//!     *%r"Item" "}"
//! ```
//!
//! Each form of marked item is described in a separate submodule.

pub mod members;
pub mod r#struct;
