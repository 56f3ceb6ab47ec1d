// SPDX-License-Identifier: MPL-2.0

//! Recovers member definitions from the body of a `#[members]` initializer.
//!
//! Every statement of the initializer defines exactly one member:
//!
//! ```text
//! Enum::Name(args..);
//! Enum::Name(args..)(ordinal);
//! Enum::Name::constructor(args..);
//! Enum::Name::constructor(args..)(ordinal);
//! ```

use super::*;
use resolve::{Constructor, TypeDescriptor};

/// The leading path segment of every member definition.
const ENUM: &str = "Enum";

/// One member, as written in the initializer.
#[derive(Debug)]
pub(crate) struct MemberDefinition {
    pub(crate) ident: syn::Ident,
    /// The resolved constructor.
    pub(crate) constructor: syn::Ident,
    /// The constructor arguments, verbatim.
    pub(crate) args: Punctuated<syn::Expr, syn::Token![,]>,
    /// The explicit ordinal expression, verbatim.
    pub(crate) ordinal: Option<syn::Expr>,
}

/// Parses the initializer of `desc` into member definitions, in source order.
///
/// # Errors
///
/// Every malformed statement, unresolved constructor and duplicate or conflicting member name is
/// reported; the errors are combined into one.
pub(crate) fn parse(desc: &TypeDescriptor) -> Result<Vec<MemberDefinition>> {
    let mut members: Vec<MemberDefinition> = Vec::new();
    let mut error: Option<Error> = None;

    for stmt in &desc.initializer.block.stmts {
        let result = parse_stmt(stmt, desc).and_then(|member| {
            check_name(&member.ident, &members, desc)?;
            Ok(member)
        });
        match result {
            Ok(member) => members.push(member),
            Err(e) => match error.as_mut() {
                Some(error) => error.combine(e),
                None => error = Some(e),
            },
        }
    }

    match error {
        Some(e) => Err(e),
        None => Ok(members),
    }
}

fn parse_stmt(stmt: &syn::Stmt, desc: &TypeDescriptor) -> Result<MemberDefinition> {
    let syn::Stmt::Expr(syn::Expr::Call(call), _) = stmt else {
        return Err(unexpected(stmt.span()));
    };

    // `Enum::Name(args..)(ordinal)` is a call whose callee is itself a call.
    let (call, ordinal) = match &*call.func {
        syn::Expr::Call(inner) => {
            if call.args.len() != 1 {
                return Err(err!(call.span(); "an explicit ordinal must be a single expression"));
            }
            (inner, call.args.first().cloned())
        }
        _ => (call, None),
    };

    let syn::Expr::Path(syn::ExprPath { qself: None, path, .. }) = &*call.func else {
        return Err(unexpected(call.span()));
    };
    if path.leading_colon.is_some() || path.segments.iter().any(|it| !it.arguments.is_none()) {
        return Err(unexpected(path.span()));
    }
    let segments: Vec<_> = path.segments.iter().map(|it| &it.ident).collect();
    let (ident, explicit) = match segments.as_slice() {
        [head, ident] if *head == ENUM => (*ident, None),
        [head, ident, constructor] if *head == ENUM => (*ident, Some(*constructor)),
        _ => return Err(unexpected(path.span())),
    };

    let constructor = select_constructor(desc, explicit, call.args.len(), call.span())?;

    Ok(MemberDefinition {
        ident: ident.clone(),
        constructor: constructor.ident.clone(),
        args: call.args.clone(),
        ordinal,
    })
}

/// Finds the constructor targeted by a member definition.
///
/// With an `explicit` name, that constructor is selected. Otherwise, the single constructor
/// taking `arity` parameters is selected.
fn select_constructor<'a>(
    desc: &'a TypeDescriptor,
    explicit: Option<&syn::Ident>,
    arity: usize,
    span: Span2,
) -> Result<&'a Constructor> {
    let ty = &desc.ident;

    if let Some(name) = explicit {
        let Some(constructor) = desc.constructors.iter().find(|it| it.ident == *name) else {
            return Err(err!(name.span(); "`{ty}` has no constructor named `{name}`"));
        };
        if constructor.arity != arity {
            return Err(err!(
                span;
                "constructor `{name}` takes {} argument(s) but {arity} were given",
                constructor.arity,
            ));
        }

        return Ok(constructor);
    }

    let mut matching = desc.constructors.iter().filter(|it| it.arity == arity);
    match (matching.next(), matching.next()) {
        (Some(constructor), None) => Ok(constructor),
        (None, _) => Err(err!(
            span;
            "call targets no declared constructor: no constructor of `{ty}` takes {arity} \
            argument(s)",
        )),
        (Some(first), Some(second)) => Err(err!(
            span;
            "call is ambiguous: `{}` and `{}` both take {arity} argument(s); name one, e.g. \
            `{ENUM}::Name::{}(..)`",
            first.ident,
            second.ident,
            first.ident,
        )),
    }
}

/// Returns an [`Error`] if `ident` is already taken by a member or an associated item.
fn check_name(
    ident: &syn::Ident,
    members: &[MemberDefinition],
    desc: &TypeDescriptor,
) -> Result<()> {
    if members.iter().any(|it| it.ident == *ident) {
        return Err(err!(ident.span(); "member `{ident}` is defined more than once"));
    }
    if desc.associated.iter().any(|it| it == ident) {
        return Err(err!(
            ident.span();
            "member `{ident}` has the same name as an associated item of `{}`",
            desc.ident,
        ));
    }

    Ok(())
}

fn unexpected(span: Span2) -> Error {
    err!(
        span;
        "expected a member definition of the form `{ENUM}::Name(..)` or `{ENUM}::Name(..)(ordinal)`",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(block: syn::Block) -> TypeDescriptor {
        let span = Span2::call_site();
        let constructor =
            |name: &str, arity| Constructor { ident: syn::Ident::new(name, span), arity };

        TypeDescriptor {
            ident: syn::Ident::new("Role", span),
            vis: syn::Visibility::Inherited,
            namespace: vec![],
            constructors: vec![
                constructor("none", 0),
                constructor("new", 1),
                constructor("titled", 2),
                constructor("with_level", 2),
            ],
            initializer: resolve::Initializer { impl_index: 0, fn_index: 0, block },
            associated: vec![syn::Ident::new("title", span)],
            impls: vec![],
            has_display: false,
        }
    }

    fn summary(members: &[MemberDefinition]) -> Vec<(String, String, usize, bool)> {
        members
            .iter()
            .map(|it| {
                let ident = it.ident.to_string();
                (ident, it.constructor.to_string(), it.args.len(), it.ordinal.is_some())
            })
            .collect()
    }

    #[test]
    fn parses_every_form_in_order() {
        let members = parse(&descriptor(syn::parse_quote!({
            Enum::None();
            Enum::User("Default")(1 << 0);
            Enum::Admin::titled("Administrator", 3)(1 << 2);
            Enum::Owner::with_level("Owner", 9);
        })))
        .unwrap();

        assert_eq!(
            summary(&members),
            [
                ("None".to_owned(), "none".to_owned(), 0, false),
                ("User".to_owned(), "new".to_owned(), 1, true),
                ("Admin".to_owned(), "titled".to_owned(), 2, true),
                ("Owner".to_owned(), "with_level".to_owned(), 2, false),
            ],
        );
        let ordinal = members[1].ordinal.as_ref().unwrap();
        assert_eq!(ordinal.to_token_stream().to_string(), "1 << 0");
    }

    #[test]
    fn trailing_statement_without_semicolon_is_accepted() {
        let members = parse(&descriptor(syn::parse_quote!({ Enum::Last() }))).unwrap();
        assert_eq!(members.len(), 1);
    }

    #[test]
    fn empty_initializer_has_no_members() {
        assert!(parse(&descriptor(syn::parse_quote!({}))).unwrap().is_empty());
    }

    #[test]
    fn unknown_arity_targets_no_constructor() {
        let e = parse(&descriptor(syn::parse_quote!({ Enum::X(1, 2, 3); }))).unwrap_err();
        assert_eq!(
            e.0.to_string(),
            "call targets no declared constructor: no constructor of `Role` takes 3 argument(s)",
        );
    }

    #[test]
    fn ambiguous_arity_must_name_constructor() {
        let e = parse(&descriptor(syn::parse_quote!({ Enum::X("a", 1); }))).unwrap_err();
        assert!(e.0.to_string().starts_with("call is ambiguous"));
    }

    #[test]
    fn explicit_constructor_must_exist_and_match() {
        let e = parse(&descriptor(syn::parse_quote!({ Enum::X::build(); }))).unwrap_err();
        assert_eq!(e.0.to_string(), "`Role` has no constructor named `build`");

        let e = parse(&descriptor(syn::parse_quote!({ Enum::X::new(); }))).unwrap_err();
        assert_eq!(e.0.to_string(), "constructor `new` takes 1 argument(s) but 0 were given");
    }

    #[test]
    fn duplicate_member_is_an_error() {
        let e = parse(&descriptor(syn::parse_quote!({
            Enum::A();
            Enum::A();
        })))
        .unwrap_err();

        assert_eq!(e.0.to_string(), "member `A` is defined more than once");
    }

    #[test]
    fn member_shadowing_associated_item_is_an_error() {
        assert!(parse(&descriptor(syn::parse_quote!({ Enum::title(); }))).is_err());
    }

    #[test]
    fn other_statements_are_rejected() {
        for block in [
            syn::parse_quote!({ let x = 1; }),
            syn::parse_quote!({ println!("hi"); }),
            syn::parse_quote!({ Other::A(); }),
            syn::parse_quote!({ Enum::A::b::c(); }),
            syn::parse_quote!({ Enum::A()(1, 2); }),
            syn::parse_quote!({ Enum::<u8>::A(); }),
        ] {
            assert!(parse(&descriptor(block)).is_err());
        }
    }

    #[test]
    fn all_errors_are_reported() {
        let e = parse(&descriptor(syn::parse_quote!({
            Enum::A(1, 2, 3);
            let x = 1;
            Enum::B();
        })))
        .unwrap_err();

        assert_eq!(e.0.into_iter().count(), 2);
    }
}
