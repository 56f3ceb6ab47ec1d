// SPDX-License-Identifier: MPL-2.0

//! Implementation details for [Objective Enum].
//!
//! This crate provides the [`generate`] attribute macro, and the [`objective_enum`] and
//! [`members`](fn@members) marker attributes, that are re-exported by the main *objective-enum*
//! crate.
//!
//! [Objective Enum]: https://crates.io/crates/objective-enum
//!
//! Expansion is a single pass over the annotated module:
//!
//! 1. [`scan`] finds the structs marked `#[objective_enum]` in every source unit;
//! 2. [`resolve`] finds the constructors and the `#[members]` initializer of each struct;
//! 3. [`members`](mod@members) recovers the member definitions from the initializer; and
//! 4. [`synth`] builds the completed struct and its generated impls.
//!
//! The [`pass`] module drives these steps and commits the output of each struct all at once.

#![deny(rustdoc::broken_intra_doc_links)]

/// A type alias for [`Result<T, E>`] where `E` is [`Error`].
///
/// [`Result<T, E>`]: std::result::Result
type Result<T> = std::result::Result<T, Error>;

/// The error type returned by fallible functions in *objective-enum-internals*.
///
/// This is a wrapper over [`syn::Error`] and is convertible into [`TokenStream`] via a [`From`]
/// implementation.
#[derive(Debug)]
struct Error(syn::Error);

impl Error {
    /// Merges `other` into this error so that both are reported.
    fn combine(&mut self, other: Self) {
        self.0.combine(other.0);
    }

    /// Renders this error as `compile_error!` invocations.
    fn into_compile_error(self) -> TokenStream2 {
        self.0.into_compile_error()
    }
}

impl From<Error> for TokenStream {
    fn from(e: Error) -> Self {
        e.into_compile_error().into()
    }
}

/// Why a marked item received no output.
#[derive(Debug)]
enum Rejection {
    /// The marker is on an item that cannot be an objective enum, or the item has no initializer.
    ///
    /// Whether this is reported depends on [`Policy`].
    Malformed(Error),
    /// The item is a candidate, but its declaration or initializer is invalid. This is always
    /// reported.
    Structural(Error),
}

impl From<Error> for Rejection {
    fn from(e: Error) -> Self {
        Self::Structural(e)
    }
}

/// Creates an [`Error`] with the given message and, optionally, span.
///
/// The syntax of this macro is similar to that of [`format!`] except that:
///
/// - [named parameters] (e.g., `var = 5`) are not allowed in the format argument list; and
/// - the format string may be preceded by a span expression and semicolon (e.g., `span;`).
///
/// The format string and format arguments are passed verbatim to `format!` to produce the error
/// message. The span of the error message is the span expression, if present, or
/// [`Span2::call_site`] otherwise.
///
/// [named parameters]: https://doc.rust-lang.org/std/fmt/index.html#named-parameters
///
/// # Examples
///
/// ```ignore
/// let ident: syn::Ident;
/// # ident = syn::Ident::new("_", Span2::call_site());
/// return Err(err!(ident.span(); "member `{ident}` is defined twice"));
/// ```
macro_rules! err {
    ($fmt:expr $(, $fmt_arg:expr)* $(,)?) => {
        err!(Span2::call_site(); $fmt $(, $fmt_arg)*)
    };
    ($span:expr ; $fmt:expr $(, $fmt_arg:expr)* $(,)?) => {
        Error(syn::Error::new($span, format!($fmt $(, $fmt_arg)*)))
    };
}

/// Creates a [`syn::Path`] from the given path and span.
///
/// This macro accepts a span expression, semicolon ';', and path, in that order.
///
/// # Examples
///
/// ```ignore
/// let span: Span2;
/// # span = Span2::call_site();
/// let paths: [syn::Path; 3] = [
///     path!(span; Self),
///     path!(span; core::fmt::Display),
///     path!(span; ::core::result::Result::Ok),
/// ];
/// ```
macro_rules! path {
    // Case for identifiers and paths without leading colons.
    ($span:expr ; $head_seg:ident $(:: $tail_seg:ident)*) => {
        path!(@internal => {
            span: $span,
            leading_colon: None,
            segments: $head_seg $($tail_seg)*,
        })
    };
    // Case for paths with leading colons `::`.
    ($span:expr ; :: $head_seg:ident $(:: $tail_seg:ident)*) => {
        path!(@internal => {
            span: $span,
            leading_colon: Some(syn::Token![::]($span)),
            segments: $head_seg $($tail_seg)*,
        })
    };
    // Implementation detail.
    (@internal => {
        span: $span:expr,
        leading_colon: $leading_colon:expr,
        segments: $($seg:ident)* $(,)?
    }) => {
        syn::Path {
            leading_colon: $leading_colon,
            segments: [$(stringify!($seg)),*]
                .into_iter()
                .map(|seg| syn::PathSegment::from(syn::Ident::new(seg, $span)))
                .collect(),
        }
    };
}

/// Creates an implementor of `From<syn::ExprPath>`.
///
/// This macro offers two syntaxes: one equivalent to [`path!`], and one that accepts an expression
/// implementing `Into<syn::Path>`.
///
/// The output is of the form `syn::ExprPath {/* ... */}.into()`. The concrete type of the
/// expression inferred from context.
macro_rules! expr_path {
    ($span:expr ; $($path_piece:tt)*) => {
        syn::ExprPath { attrs: vec![], qself: None, path: path!($span; $($path_piece)*) }.into()
    };
    ($path:expr $(,)?) => {
        syn::ExprPath { attrs: vec![], qself: None, path: $path.into() }.into()
    }
}

/// Creates an implementor of `From<syn::TypePath>`.
///
/// This macro offers two syntaxes: one equivalent to [`path!`], and one that accepts an expression
/// implementing `Into<syn::Path>`.
///
/// The output is of the form `syn::TypePath {/* ... */}.into()`. The concrete type of the
/// expression inferred from context.
macro_rules! ty_path {
    ($span:expr ; $($path_piece:tt)*) => {
        syn::TypePath { qself: None, path: path!($span; $($path_piece)*) }.into()
    };
    ($path:expr $(,)?) => {
        syn::TypePath { qself: None, path: $path.into() }.into()
    }
}

/// Returns the index of the first attribute whose path ends in `name` and that has no arguments.
///
/// Markers are matched by their last path segment so that both `#[objective_enum]` and
/// `#[objective_enum::objective_enum]` are recognized.
fn find_marker(attrs: &[syn::Attribute], name: &str) -> Option<usize> {
    attrs.iter().position(|attr| is_marker(attr, name))
}

/// Whether `attr` is the marker `name`.
fn is_marker(attr: &syn::Attribute, name: &str) -> bool {
    attr.path().segments.last().map_or(false, |it| it.ident == name)
}

/// Removes every `name` marker from `attrs`.
fn strip_markers(attrs: &mut Vec<syn::Attribute>, name: &str) {
    attrs.retain(|attr| !is_marker(attr, name));
}

/// The name of the marker attribute that selects a struct.
const MARKER: &str = "objective_enum";
/// The name of the marker attribute that selects the initializer of a struct.
const INITIALIZER: &str = "members";

mod ast;
mod members;
mod pass;
mod receiver;
mod resolve;
mod rewrite;
mod scan;
mod sig;
mod synth;

use proc_macro::TokenStream;
use proc_macro2::{Span as Span2, TokenStream as TokenStream2};
use receiver::Receiver;
use syn::{__private::ToTokens, parse::Parser as _, punctuated::Punctuated, spanned::Spanned as _};

/// The whole point.
///
/// Refer to the `spec` module in the *objective-enum* crate root for usage information.
#[proc_macro_attribute]
pub fn generate(args: TokenStream, item: TokenStream) -> TokenStream {
    let args = match Args::parse(args.into()) {
        Ok(it) => it,
        Err(e) => {
            return e.into();
        }
    };

    let result = match syn::parse_macro_input!(item as _) {
        syn::Item::Mod(item) => pass::Pass::new(&args).run(item, &pass::Never),
        item => Err(err!(item.span(); "item must be an inline module")),
    };

    match result {
        Ok(it) => it.into_token_stream().into(),
        Err(e) => e.into(),
    }
}

/// Marks a struct to be completed as an objective enum.
///
/// This attribute is consumed by [`generate`], and is an error anywhere else.
#[proc_macro_attribute]
pub fn objective_enum(_: TokenStream, item: TokenStream) -> TokenStream {
    stray_marker(MARKER, item)
}

/// Marks the initializer of an objective enum.
///
/// This attribute is consumed by [`generate`], and is an error anywhere else.
#[proc_macro_attribute]
pub fn members(_: TokenStream, item: TokenStream) -> TokenStream {
    stray_marker(INITIALIZER, item)
}

/// Expands a marker that was not consumed by [`generate`].
///
/// The item is passed through so that the error is the only one reported.
fn stray_marker(name: &str, item: TokenStream) -> TokenStream {
    let item = TokenStream2::from(item);
    let e = err!(
        item.span();
        "`#[{name}]` must be used within a module annotated with `#[objective_enum::generate]`",
    );

    let mut output = e.into_compile_error();
    output.extend(item);

    output.into()
}

/// What to do with a [malformed](Rejection::Malformed) marked item.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum Policy {
    /// Report an error.
    #[default]
    Error,
    /// Leave the item as written, minus the marker and initializer, and report nothing.
    Ignore,
}

/// Models acceptable arguments to the `#[generate]` attribute.
#[derive(Debug)]
struct Args {
    /// The `crate` argument.
    ///
    /// This is the path, as seen from within the annotated module, of the *objective-enum* crate.
    /// All generated code refers to runtime items through it. Defaults to `::objective_enum`.
    krate: syn::Path,
    /// The `malformed` argument.
    ///
    /// This is either `"error"` or `"ignore"`. Defaults to `"error"`.
    malformed: Policy,
}

impl Default for Args {
    fn default() -> Self {
        Self { krate: path!(Span2::call_site(); ::objective_enum), malformed: Policy::default() }
    }
}

impl Args {
    /// Parses comma-separated arguments to the `#[generate]` attribute from the given
    /// [`TokenStream2`].
    ///
    /// # Errors
    ///
    /// An error is returned if any argument
    ///
    /// - is not of the form `"name" "=" "value"` (ABNF);
    /// - has a name other than `crate` or `malformed`;
    /// - has the same name as a previous argument; or
    /// - has a value of the wrong form: a path for `crate`, and one of the string literals
    ///   `"error"` or `"ignore"` for `malformed`.
    fn parse(args: TokenStream2) -> Result<Self> {
        let mut krate: Option<syn::Path> = None;
        let mut malformed: Option<Policy> = None;

        if args.is_empty() {
            return Ok(Self::default());
        }

        syn::meta::parser(|meta| {
            if meta.path.is_ident("crate") {
                if krate.is_some() {
                    return Err(meta.error("argument is a duplicate"));
                }
                krate = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("malformed") {
                if malformed.is_some() {
                    return Err(meta.error("argument is a duplicate"));
                }
                let value: syn::LitStr = meta.value()?.parse()?;
                malformed = Some(match value.value().as_str() {
                    "error" => Policy::Error,
                    "ignore" => Policy::Ignore,
                    _ => {
                        return Err(syn::Error::new(
                            value.span(),
                            "expected `\"error\"` or `\"ignore\"`",
                        ));
                    }
                });
            } else {
                return Err(meta.error("argument is not supported"));
            }

            Ok(())
        })
        .parse2(args)
        .map_err(Error)?;

        let default = Self::default();

        Ok(Self {
            krate: krate.unwrap_or(default.krate),
            malformed: malformed.unwrap_or(default.malformed),
        })
    }
}
