// SPDX-License-Identifier: MPL-2.0

//! Syntax-tree rewrites applied to user code.

use syn::visit_mut::{self, VisitMut};

use super::*;

/// Appends `__identity: #value` to every struct literal of a type.
///
/// Literals written as `Self { .. }` or `#ident { .. }` are completed, unless they already name the
/// field or take the remaining fields from a base expression (`..base`). `Self` is only matched
/// outside of nested items, where it may refer to another type.
pub(crate) struct CompleteLiterals<'a> {
    ident: &'a syn::Ident,
    value: syn::Expr,
    allow_self: bool,
}

impl<'a> CompleteLiterals<'a> {
    pub(crate) fn new(ident: &'a syn::Ident, value: syn::Expr) -> Self {
        Self { ident, value, allow_self: true }
    }
}

impl VisitMut for CompleteLiterals<'_> {
    fn visit_expr_struct_mut(&mut self, expr: &mut syn::ExprStruct) {
        visit_mut::visit_expr_struct_mut(self, expr);

        if expr.qself.is_some()
            || expr.dot2_token.is_some()
            || !ast::names_path(&expr.path, self.ident, self.allow_self)
        {
            return;
        }
        let has_identity = expr.fields.iter().any(|it| {
            matches!(&it.member, syn::Member::Named(ident) if ident == resolve::IDENTITY_FIELD)
        });
        if has_identity {
            return;
        }

        let span = expr.path.span();
        // Rendered:
        //   __identity: #value
        expr.fields.push(syn::FieldValue {
            attrs: vec![],
            member: syn::Member::Named(syn::Ident::new(resolve::IDENTITY_FIELD, span)),
            colon_token: Some(syn::Token![:](span)),
            expr: self.value.clone(),
        });
    }

    fn visit_item_mut(&mut self, item: &mut syn::Item) {
        let allow_self = std::mem::replace(&mut self.allow_self, false);
        visit_mut::visit_item_mut(self, item);
        self.allow_self = allow_self;
    }
}

/// Replaces the leading `Self` of every path with `ident`.
///
/// Code moved out of an `impl` block, such as constructor arguments, loses its `Self` type; this
/// rewrite names the type explicitly instead. Nested items are left alone.
pub(crate) struct ReplaceSelf<'a> {
    ident: &'a syn::Ident,
}

impl<'a> ReplaceSelf<'a> {
    pub(crate) fn new(ident: &'a syn::Ident) -> Self {
        Self { ident }
    }
}

impl VisitMut for ReplaceSelf<'_> {
    fn visit_path_mut(&mut self, path: &mut syn::Path) {
        if path.leading_colon.is_none() {
            if let Some(first) = path.segments.first_mut() {
                if first.ident == "Self" {
                    first.ident = syn::Ident::new(&self.ident.to_string(), first.ident.span());
                }
            }
        }

        visit_mut::visit_path_mut(self, path);
    }

    fn visit_item_mut(&mut self, _: &mut syn::Item) {}
}
