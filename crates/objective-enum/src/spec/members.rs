// SPDX-License-Identifier: MPL-2.0

//! A documentation-only module describing the `#[members]` initializer.
//!
//! ## Syntax
//!
//! ```abnf
//! initializer = "#[" "members" "]" "fn" %r"IDENTIFIER" "(" ")" "{" *member-stmt "}"
//! member-stmt = member-call [ "(" ordinal ")" ] ";"
//! member-call = "Enum" "::" member-name ["::" constructor-name] "(" [args] ")"
//! member-name = %r"IDENTIFIER"
//! constructor-name = %r"IDENTIFIER"
//! args = %r"Expression" *("," %r"Expression") [","]
//! ordinal = %r"Expression"
//! ```
//!
//! ## Semantics
//!
//! Each statement defines one member, in order. The arguments are passed to a constructor of the
//! struct: the one named by `constructor-name`, if present, or else the only constructor taking
//! that many arguments.
//!
//! Members without an explicit ordinal receive the lowest free ordinal at or above the allocation
//! cursor, which starts at 0 and moves one past every ordinal handed out or explicitly assigned. A
//! member followed by `(ordinal)` is moved to that ordinal; the expression must evaluate to an
//! [`Ordinal`](crate::Ordinal). Assigning an ordinal that another member holds fails when the
//! registry is populated.
//!
//! Every struct must have exactly one initializer.
