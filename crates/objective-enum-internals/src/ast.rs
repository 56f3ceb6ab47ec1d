// SPDX-License-Identifier: MPL-2.0

//! Constructors for [`syn`] nodes that the synthesizer builds repeatedly.

use super::*;

/// Produces a [`syn::Path`] of the form `#krate::#tail`.
pub(crate) fn make_krate_path(krate: &syn::Path, span: Span2, tail: &[&str]) -> syn::Path {
    let mut path = krate.clone();
    path.segments.extend(tail.iter().map(|it| syn::PathSegment::from(syn::Ident::new(it, span))));

    path
}

/// Gives the last segment of `path` the angle-bracketed arguments `args`.
///
/// If `turbofish` is `true`, the arguments are preceded by `::`.
pub(crate) fn make_generic_path(
    mut path: syn::Path,
    span: Span2,
    turbofish: bool,
    args: impl IntoIterator<Item = syn::GenericArgument>,
) -> syn::Path {
    if let Some(last) = path.segments.last_mut() {
        last.arguments = syn::PathArguments::AngleBracketed(syn::AngleBracketedGenericArguments {
            colon2_token: turbofish.then_some(syn::Token![::](span)),
            lt_token: syn::Token![<](span),
            args: args.into_iter().collect(),
            gt_token: syn::Token![>](span),
        });
    }

    path
}

/// Produces a [`syn::Type`] of the form `&#lifetime #mutability #elem`.
pub(crate) fn make_ref_ty(
    span: Span2,
    lifetime: Option<&str>,
    is_mutable: bool,
    elem: syn::Type,
) -> syn::Type {
    syn::TypeReference {
        and_token: syn::Token![&](span),
        lifetime: lifetime.map(|it| syn::Lifetime::new(it, span)),
        mutability: is_mutable.then_some(syn::Token![mut](span)),
        elem: Box::new(elem),
    }
    .into()
}

/// Produces an outer attribute of the form `#[#path(#tokens)]`.
pub(crate) fn make_list_attr(span: Span2, path: syn::Path, tokens: TokenStream2) -> syn::Attribute {
    syn::Attribute {
        pound_token: syn::Token![#](span),
        style: syn::AttrStyle::Outer,
        bracket_token: syn::token::Bracket(span),
        meta: syn::MetaList {
            path,
            delimiter: syn::MacroDelimiter::Paren(syn::token::Paren(span)),
            tokens,
        }
        .into(),
    }
}

/// Produces an outer attribute of the form `#[doc = #text]`.
pub(crate) fn make_doc_attr(span: Span2, text: &str) -> syn::Attribute {
    syn::Attribute {
        pound_token: syn::Token![#](span),
        style: syn::AttrStyle::Outer,
        bracket_token: syn::token::Bracket(span),
        meta: syn::MetaNameValue {
            path: path!(span; doc),
            eq_token: syn::Token![=](span),
            value: make_lit_str(span, text),
        }
        .into(),
    }
}

/// Produces a string literal expression.
pub(crate) fn make_lit_str(span: Span2, value: &str) -> syn::Expr {
    syn::ExprLit { attrs: vec![], lit: syn::LitStr::new(value, span).into() }.into()
}

/// Produces a [`syn::Expr`] of the form `#func(#args)`.
pub(crate) fn make_call(
    span: Span2,
    func: syn::Expr,
    args: impl IntoIterator<Item = syn::Expr>,
) -> syn::Expr {
    syn::ExprCall {
        attrs: vec![],
        func: Box::new(func),
        paren_token: syn::token::Paren(span),
        args: args.into_iter().collect(),
    }
    .into()
}

/// Produces a [`syn::Expr`] of the form `#receiver.#method(#args)`.
pub(crate) fn make_method_call(
    span: Span2,
    receiver: syn::Expr,
    method: &str,
    args: impl IntoIterator<Item = syn::Expr>,
) -> syn::Expr {
    syn::ExprMethodCall {
        attrs: vec![],
        receiver: Box::new(receiver),
        dot_token: syn::Token![.](span),
        method: syn::Ident::new(method, span),
        turbofish: None,
        paren_token: syn::token::Paren(span),
        args: args.into_iter().collect(),
    }
    .into()
}

/// Produces a [`syn::Expr`] of the form `#expr?`.
pub(crate) fn make_try(span: Span2, expr: syn::Expr) -> syn::Expr {
    syn::ExprTry { attrs: vec![], expr: Box::new(expr), question_token: syn::Token![?](span) }
        .into()
}

/// Produces a [`syn::Expr`] of the form `&#mutability self.#field`.
pub(crate) fn make_self_field_ref(span: Span2, field: &str, is_mutable: bool) -> syn::Expr {
    syn::ExprReference {
        attrs: vec![],
        and_token: syn::Token![&](span),
        mutability: is_mutable.then_some(syn::Token![mut](span)),
        expr: Box::new(
            syn::ExprField {
                attrs: vec![],
                base: Box::new(expr_path!(span; self)),
                dot_token: syn::Token![.](span),
                member: syn::Member::Named(syn::Ident::new(field, span)),
            }
            .into(),
        ),
    }
    .into()
}

/// Produces a [`syn::Expr`] of the form `<#ty as #trait_>::#method`.
pub(crate) fn make_qualified_fn(
    span: Span2,
    ty: syn::Type,
    trait_: syn::Path,
    method: &str,
) -> syn::Expr {
    let position = trait_.segments.len();
    let mut path = trait_;
    path.segments.push(syn::Ident::new(method, span).into());

    syn::ExprPath {
        attrs: vec![],
        qself: Some(syn::QSelf {
            lt_token: syn::Token![<](span),
            ty: Box::new(ty),
            position,
            as_token: Some(syn::Token![as](span)),
            gt_token: syn::Token![>](span),
        }),
        path,
    }
    .into()
}

/// Produces a function argument of the form `#name: #ty`.
pub(crate) fn make_arg(span: Span2, name: &str, ty: syn::Type) -> syn::PatType {
    syn::PatType {
        attrs: vec![],
        pat: Box::new(
            syn::PatIdent {
                attrs: vec![],
                by_ref: None,
                mutability: None,
                ident: syn::Ident::new(name, span),
                subpat: None,
            }
            .into(),
        ),
        colon_token: syn::Token![:](span),
        ty: Box::new(ty),
    }
}

/// Produces an `impl` block.
///
/// If `trait_` is [`Some`], this is a trait implementation; otherwise, it is an inherent one.
pub(crate) fn make_impl(
    span: Span2,
    generics: syn::Generics,
    trait_: Option<syn::Path>,
    self_ty: syn::Type,
    items: Vec<syn::ImplItem>,
) -> syn::Item {
    syn::ItemImpl {
        attrs: vec![],
        defaultness: None,
        unsafety: None,
        impl_token: syn::Token![impl](span),
        generics,
        trait_: trait_.map(|it| (None, it, syn::Token![for](span))),
        self_ty: Box::new(self_ty),
        brace_token: syn::token::Brace(span),
        items,
    }
    .into()
}

/// Produces an associated function with the given signature and body.
pub(crate) fn make_impl_fn(sig: syn::Signature, stmts: Vec<syn::Stmt>) -> syn::ImplItem {
    let span = sig.span();

    syn::ImplItemFn {
        attrs: vec![],
        vis: syn::Visibility::Inherited,
        defaultness: None,
        sig,
        block: syn::Block { brace_token: syn::token::Brace(span), stmts },
    }
    .into()
}

/// Produces [`syn::Generics`] with a single lifetime parameter.
pub(crate) fn make_lifetime_generics(span: Span2, lifetime: &str) -> syn::Generics {
    syn::Generics {
        lt_token: Some(syn::Token![<](span)),
        params: std::iter::once(syn::GenericParam::Lifetime(syn::LifetimeParam::new(
            syn::Lifetime::new(lifetime, span),
        )))
        .collect(),
        gt_token: Some(syn::Token![>](span)),
        where_clause: None,
    }
}

/// Produces [`syn::Generics`] with a single type parameter `#ident: #bound`.
pub(crate) fn make_bounded_generics(span: Span2, ident: &str, bound: syn::Path) -> syn::Generics {
    syn::Generics {
        lt_token: Some(syn::Token![<](span)),
        params: std::iter::once(syn::GenericParam::Type(syn::TypeParam {
            attrs: vec![],
            ident: syn::Ident::new(ident, span),
            colon_token: Some(syn::Token![:](span)),
            bounds: std::iter::once(syn::TypeParamBound::Trait(syn::TraitBound {
                paren_token: None,
                modifier: syn::TraitBoundModifier::None,
                lifetimes: None,
                path: bound,
            }))
            .collect(),
            eq_token: None,
            default: None,
        }))
        .collect(),
        gt_token: Some(syn::Token![>](span)),
        where_clause: None,
    }
}

/// Whether `ty` names the type `ident`, either as `Self` or by its (possibly qualified) name.
pub(crate) fn names_type(ty: &syn::Type, ident: &syn::Ident, allow_self: bool) -> bool {
    let syn::Type::Path(syn::TypePath { qself: None, path }) = ty else {
        return false;
    };

    names_path(path, ident, allow_self)
}

/// Like [`names_type`] but for paths.
pub(crate) fn names_path(path: &syn::Path, ident: &syn::Ident, allow_self: bool) -> bool {
    let Some(last) = path.segments.last() else {
        return false;
    };
    if !last.arguments.is_none() {
        return false;
    }

    (allow_self && path.is_ident("Self")) || last.ident == *ident
}
