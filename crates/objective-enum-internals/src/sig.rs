// SPDX-License-Identifier: MPL-2.0

//! A convenience builder for [`syn::Signature`].

use super::*;

/// A convenience builder for [`syn::Signature`].
pub(crate) struct Builder {
    generics: syn::Generics,
    receiver: Option<Receiver>,
}

impl Builder {
    /// Creates a new `Builder`.
    ///
    /// At creation, the builder state represents a non-generic function signature without a
    /// receiver.
    pub(crate) fn new() -> Self {
        Self { generics: Default::default(), receiver: None }
    }

    /// Adds generic parameters to the function signature.
    pub(crate) fn with_generics(mut self, generics: syn::Generics) -> Self {
        self.generics = generics;

        self
    }

    /// Adds a [receiver](Receiver) argument to the function signature.
    pub(crate) fn with_receiver(mut self, receiver: Receiver) -> Self {
        self.receiver = Some(receiver);

        self
    }

    /// Consumes this builder to produce a [`syn::Signature`].
    ///
    /// # Arguments
    ///
    /// `span` is the [span](Span2) used for the `fn` keyword and the 'right arrow' token `->`.
    /// `ident` is the name of the function. `get_inputs` and `get_output` are functions that
    /// receive the `span` argument by-copy and produce the function arguments and return type,
    /// respectively, for the resultant signature.
    pub(crate) fn build<In>(
        self,
        span: Span2,
        ident: &str,
        get_inputs: impl FnOnce(Span2) -> In,
        get_output: impl FnOnce(Span2) -> Option<syn::Type>,
    ) -> syn::Signature
    where
        In: IntoIterator<Item = syn::PatType>,
    {
        syn::Signature {
            constness: None,
            asyncness: None,
            unsafety: None,
            abi: None,
            fn_token: syn::Token![fn](span),
            ident: syn::Ident::new(ident, span),
            generics: self.generics,
            paren_token: syn::token::Paren(span),
            inputs: self
                .receiver
                .into_iter()
                .map(|it| it.into_arg(span))
                .chain(get_inputs(span).into_iter().map(syn::FnArg::Typed))
                .collect(),
            variadic: None,
            output: match get_output(span) {
                Some(ty) => syn::ReturnType::Type(syn::Token![->](span), Box::new(ty)),
                None => syn::ReturnType::Default,
            },
        }
    }
}
