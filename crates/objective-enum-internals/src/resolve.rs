// SPDX-License-Identifier: MPL-2.0

//! Resolves the constructors and initializer of a marked struct.

use super::*;

/// Traits that are implemented for every objective enum and so cannot be derived or implemented
/// by hand.
const GENERATED_TRAITS: [&str; 4] = ["PartialEq", "Eq", "Hash", "ObjectiveEnum"];

/// The name of the field that holds the identity of an instance.
pub(crate) const IDENTITY_FIELD: &str = "__identity";

/// An associated function that can create an instance.
#[derive(Debug)]
pub(crate) struct Constructor {
    pub(crate) ident: syn::Ident,
    /// The number of parameters.
    pub(crate) arity: usize,
}

/// The location of the `#[members]` function.
#[derive(Debug)]
pub(crate) struct Initializer {
    /// The position of the enclosing `impl` block within the unit.
    pub(crate) impl_index: usize,
    /// The position of the function within the `impl` block.
    pub(crate) fn_index: usize,
    pub(crate) block: syn::Block,
}

/// Everything known about a marked struct before its members are parsed.
#[derive(Debug)]
pub(crate) struct TypeDescriptor {
    pub(crate) ident: syn::Ident,
    pub(crate) vis: syn::Visibility,
    /// The module path of the type, relative to the annotated module and including it.
    pub(crate) namespace: Vec<syn::Ident>,
    /// Inherent constructors, in source order.
    pub(crate) constructors: Vec<Constructor>,
    pub(crate) initializer: Initializer,
    /// The names of every item in the inherent `impl` blocks of the type.
    pub(crate) associated: Vec<syn::Ident>,
    /// The positions of every `impl` block of the type within the unit, in source order.
    pub(crate) impls: Vec<usize>,
    /// Whether the unit already implements `Display` for the type.
    pub(crate) has_display: bool,
}

impl TypeDescriptor {
    /// The qualified name of the type, e.g. `app::roles::Role`.
    pub(crate) fn qualified_name(&self) -> String {
        self.namespace
            .iter()
            .chain(std::iter::once(&self.ident))
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("::")
    }
}

/// Builds the [`TypeDescriptor`] of the struct at `items[index]`.
///
/// # Errors
///
/// A [malformed](Rejection::Malformed) rejection if the struct has no initializer, and a
/// [structural](Rejection::Structural) one if:
///
/// - the struct declares a field named `__identity`;
/// - the struct derives, or the unit implements, a trait that is generated for it;
/// - there is more than one initializer, or an initializer outside an inherent `impl`; or
/// - the initializer has parameters, generics or a return type.
pub(crate) fn resolve(
    items: &[syn::Item],
    index: usize,
    namespace: &[syn::Ident],
) -> std::result::Result<TypeDescriptor, Rejection> {
    let Some(syn::Item::Struct(item)) = items.get(index) else {
        return Err(Rejection::Malformed(err!("objective enums must be structs")));
    };
    check_fields(item)?;
    check_derives(&item.attrs)?;

    let mut constructors = Vec::new();
    let mut initializers = Vec::new();
    let mut associated = Vec::new();
    let mut impls = Vec::new();
    let mut has_display = false;

    for (impl_index, it) in items.iter().enumerate() {
        let syn::Item::Impl(imp) = it else {
            continue;
        };
        if !ast::names_type(&imp.self_ty, &item.ident, false) {
            continue;
        }
        impls.push(impl_index);

        if let Some((_, trait_, _)) = &imp.trait_ {
            let trait_ident = trait_.segments.last().map(|it| it.ident.to_string());
            match trait_ident.as_deref() {
                Some("Display") => {
                    has_display = true;
                }
                Some(name) if GENERATED_TRAITS.contains(&name) => {
                    return Err(err!(
                        trait_.span();
                        "`{name}` is implemented for every objective enum and cannot be \
                        implemented by hand",
                    )
                    .into());
                }
                _ => {}
            }
            if let Some(f) = imp.items.iter().find_map(marked_initializer) {
                return Err(err!(
                    f.sig.ident.span();
                    "`#[{INITIALIZER}]` must be placed in an inherent `impl` block",
                )
                .into());
            }
            continue;
        }

        for (fn_index, impl_item) in imp.items.iter().enumerate() {
            if let Some(ident) = impl_item_ident(impl_item) {
                associated.push(ident.clone());
            }
            let syn::ImplItem::Fn(f) = impl_item else {
                continue;
            };

            if marked_initializer(impl_item).is_some() {
                initializers.push((impl_index, fn_index, f));
            } else if is_constructor(&f.sig, &item.ident) {
                constructors.push(Constructor {
                    ident: f.sig.ident.clone(),
                    arity: f.sig.inputs.len(),
                });
            }
        }
    }

    let initializer = match initializers.as_slice() {
        [] => {
            return Err(Rejection::Malformed(err!(
                item.ident.span();
                "`{}` has no initializer; mark an associated function with `#[{INITIALIZER}]`",
                item.ident,
            )));
        }
        [(impl_index, fn_index, f)] => {
            check_initializer(f)?;
            Initializer { impl_index: *impl_index, fn_index: *fn_index, block: f.block.clone() }
        }
        [_, (_, _, f), ..] => {
            return Err(err!(
                f.sig.ident.span();
                "`{}` has more than one `#[{INITIALIZER}]` initializer",
                item.ident,
            )
            .into());
        }
    };

    Ok(TypeDescriptor {
        ident: item.ident.clone(),
        vis: item.vis.clone(),
        namespace: namespace.to_vec(),
        constructors,
        initializer,
        associated,
        impls,
        has_display,
    })
}

/// Returns an [`Error`] if the struct already declares the identity field.
fn check_fields(item: &syn::ItemStruct) -> Result<()> {
    match item.fields.iter().find_map(|it| it.ident.as_ref().filter(|it| *it == IDENTITY_FIELD)) {
        Some(ident) => Err(err!(ident.span(); "the field name `{IDENTITY_FIELD}` is reserved")),
        None => Ok(()),
    }
}

/// Returns an [`Error`] if any `derive` attribute names a generated trait.
fn check_derives(attrs: &[syn::Attribute]) -> Result<()> {
    for attr in attrs.iter().filter(|it| it.path().is_ident("derive")) {
        let paths = attr
            .parse_args_with(Punctuated::<syn::Path, syn::Token![,]>::parse_terminated)
            .map_err(Error)?;
        for path in paths {
            let Some(last) = path.segments.last() else {
                continue;
            };
            if GENERATED_TRAITS.contains(&last.ident.to_string().as_str()) {
                return Err(err!(
                    path.span();
                    "`{}` is implemented for every objective enum and cannot be derived",
                    last.ident,
                ));
            }
        }
    }

    Ok(())
}

/// Returns an [`Error`] if the initializer is not a plain, parameterless function.
fn check_initializer(f: &syn::ImplItemFn) -> Result<()> {
    let sig = &f.sig;
    if let Some(attr) = f.attrs.iter().find(|it| is_marker(it, INITIALIZER)) {
        if !matches!(attr.meta, syn::Meta::Path(_)) {
            return Err(err!(attr.span(); "`#[{INITIALIZER}]` does not accept arguments"));
        }
    }
    if !sig.inputs.is_empty() {
        return Err(err!(sig.inputs.span(); "the initializer must not take parameters"));
    }
    if let syn::ReturnType::Type(_, ty) = &sig.output {
        return Err(err!(ty.span(); "the initializer must not return a value"));
    }
    if !sig.generics.params.is_empty() || sig.generics.where_clause.is_some() {
        return Err(err!(sig.generics.span(); "the initializer must not be generic"));
    }
    if let Some(asyncness) = &sig.asyncness {
        return Err(err!(asyncness.span; "the initializer must not be `async`"));
    }

    Ok(())
}

/// Returns the function if `item` is marked `#[members]`.
fn marked_initializer(item: &syn::ImplItem) -> Option<&syn::ImplItemFn> {
    match item {
        syn::ImplItem::Fn(f) if find_marker(&f.attrs, INITIALIZER).is_some() => Some(f),
        _ => None,
    }
}

/// Whether `sig` is that of a constructor: no receiver, and a return type of `Self` or `ident`.
fn is_constructor(sig: &syn::Signature, ident: &syn::Ident) -> bool {
    if sig.receiver().is_some() || sig.variadic.is_some() {
        return false;
    }

    match &sig.output {
        syn::ReturnType::Type(_, ty) => ast::names_type(ty, ident, true),
        syn::ReturnType::Default => false,
    }
}

fn impl_item_ident(item: &syn::ImplItem) -> Option<&syn::Ident> {
    match item {
        syn::ImplItem::Const(it) => Some(&it.ident),
        syn::ImplItem::Fn(it) => Some(&it.sig.ident),
        syn::ImplItem::Type(it) => Some(&it.ident),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve_first(file: syn::File) -> std::result::Result<TypeDescriptor, Rejection> {
        let namespace = [syn::Ident::new("roles", Span2::call_site())];
        resolve(&file.items, 0, &namespace)
    }

    fn structural_message(result: std::result::Result<TypeDescriptor, Rejection>) -> String {
        match result {
            Err(Rejection::Structural(e)) => e.0.to_string(),
            other => panic!("expected a structural error, got {other:?}"),
        }
    }

    #[test]
    fn finds_constructors_and_initializer() {
        let desc = resolve_first(syn::parse_quote! {
            pub struct Role { title: &'static str }

            impl Role {
                fn new(title: &'static str) -> Self { Self { title } }
                fn none() -> Role { Self::new("") }
                fn title(&self) -> &str { self.title }
                fn helper() -> u8 { 0 }
            }

            impl Role {
                #[members]
                fn members() {
                    Enum::None();
                }
            }

            impl core::fmt::Display for Role {
                fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                    f.write_str(self.title)
                }
            }
        })
        .unwrap();

        assert_eq!(desc.qualified_name(), "roles::Role");
        let constructors: Vec<_> =
            desc.constructors.iter().map(|it| (it.ident.to_string(), it.arity)).collect();
        assert_eq!(constructors, [("new".to_owned(), 1), ("none".to_owned(), 0)]);
        assert_eq!((desc.initializer.impl_index, desc.initializer.fn_index), (2, 0));
        assert_eq!(desc.impls, [1, 2, 3]);
        assert_eq!(desc.associated.len(), 5);
        assert!(desc.has_display);
    }

    #[test]
    fn missing_initializer_is_malformed() {
        let result = resolve_first(syn::parse_quote! {
            struct Role {}
            impl Role { fn new() -> Self { Self {} } }
        });

        assert!(matches!(result, Err(Rejection::Malformed(_))));
    }

    #[test]
    fn second_initializer_is_structural() {
        let message = structural_message(resolve_first(syn::parse_quote! {
            struct Role {}
            impl Role {
                #[members]
                fn a() {}
                #[members]
                fn b() {}
            }
        }));

        assert_eq!(message, "`Role` has more than one `#[members]` initializer");
    }

    #[test]
    fn initializer_with_parameters_is_structural() {
        let message = structural_message(resolve_first(syn::parse_quote! {
            struct Role {}
            impl Role {
                #[members]
                fn members(x: u8) {}
            }
        }));

        assert_eq!(message, "the initializer must not take parameters");
    }

    #[test]
    fn reserved_field_is_structural() {
        let message = structural_message(resolve_first(syn::parse_quote! {
            struct Role { __identity: u8 }
            impl Role {
                #[members]
                fn members() {}
            }
        }));

        assert_eq!(message, "the field name `__identity` is reserved");
    }

    #[test]
    fn derived_equality_is_structural() {
        let message = structural_message(resolve_first(syn::parse_quote! {
            #[derive(Clone, PartialEq)]
            struct Role {}
            impl Role {
                #[members]
                fn members() {}
            }
        }));

        assert_eq!(
            message,
            "`PartialEq` is implemented for every objective enum and cannot be derived",
        );
    }

    #[test]
    fn hand_written_hash_is_structural() {
        let result = resolve_first(syn::parse_quote! {
            struct Role {}
            impl Role {
                #[members]
                fn members() {}
            }
            impl std::hash::Hash for Role {
                fn hash<H: std::hash::Hasher>(&self, _: &mut H) {}
            }
        });

        assert!(matches!(result, Err(Rejection::Structural(_))));
    }
}
