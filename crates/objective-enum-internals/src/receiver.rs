// SPDX-License-Identifier: MPL-2.0

//! Models a borrowed receiver function argument: `&self` or `&mut self`.

use super::*;

/// Models a borrowed receiver function argument: `&self` or `&mut self`.
pub(crate) struct Receiver {
    /// Whether or not this receiver is mutable.
    is_mutable: bool,
}

impl Receiver {
    /// Creates a `Receiver` of the form `&self`.
    pub(crate) fn new_ref_self() -> Self {
        Self { is_mutable: false }
    }

    /// Creates a `Receiver` of the form `&mut self`.
    pub(crate) fn new_ref_mut_self() -> Self {
        Self { is_mutable: true }
    }

    /// Converts this into a [`syn::FnArg`] with the given span.
    pub(crate) fn into_arg(self, span: Span2) -> syn::FnArg {
        let and_token = syn::Token![&](span);
        let mutability = self.is_mutable.then_some(syn::Token![mut](span));
        // Rendered:
        //   &#mutability Self
        let ty = syn::TypeReference {
            and_token,
            lifetime: None,
            mutability,
            elem: Box::new(ty_path!(span; Self)),
        }
        .into();

        syn::FnArg::Receiver(syn::Receiver {
            attrs: vec![],
            reference: Some((and_token, None)),
            mutability,
            self_token: syn::Token![self](span),
            colon_token: None,
            ty: Box::new(ty),
        })
    }
}
