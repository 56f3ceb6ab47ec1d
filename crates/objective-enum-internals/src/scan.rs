// SPDX-License-Identifier: MPL-2.0

//! Finds the items marked `#[objective_enum]`.

use super::*;

/// A source unit: the annotated module, or an inline module nested within it.
#[derive(Debug)]
pub(crate) struct Unit {
    /// The positions of the module items leading from the annotated module to this unit.
    ///
    /// This is empty for the annotated module itself.
    pub(crate) route: Vec<usize>,
    /// The names of the modules from the annotated module to this unit, inclusive.
    pub(crate) namespace: Vec<syn::Ident>,
}

/// An item carrying the marker.
#[derive(Debug)]
pub(crate) struct Candidate {
    /// The position of the unit in [`Scan::units`].
    pub(crate) unit: usize,
    /// The position of the item within its unit.
    pub(crate) index: usize,
    /// Whether the item can be completed.
    ///
    /// This is an error if the item is not an open type.
    pub(crate) verdict: std::result::Result<(), Rejection>,
}

/// The result of [`scan`].
#[derive(Debug)]
pub(crate) struct Scan {
    /// Every unit, in pre-order.
    pub(crate) units: Vec<Unit>,
    /// Every candidate, in unit order and then declaration order.
    pub(crate) candidates: Vec<Candidate>,
}

/// Walks the annotated module and all of its inline submodules once, collecting every marked item.
pub(crate) fn scan(module: &syn::ItemMod) -> Scan {
    let mut scan = Scan { units: Vec::new(), candidates: Vec::new() };
    if let Some((_, items)) = &module.content {
        walk(&mut scan, items, Vec::new(), vec![module.ident.clone()]);
    }

    scan
}

fn walk(scan: &mut Scan, items: &[syn::Item], route: Vec<usize>, namespace: Vec<syn::Ident>) {
    let unit = scan.units.len();
    scan.units.push(Unit { route: route.clone(), namespace: namespace.clone() });

    for (index, item) in items.iter().enumerate() {
        if let Some(verdict) = inspect(item) {
            scan.candidates.push(Candidate { unit, index, verdict });
        }
    }

    for (index, item) in items.iter().enumerate() {
        if let syn::Item::Mod(syn::ItemMod { ident, content: Some((_, items)), .. }) = item {
            let mut route = route.clone();
            route.push(index);
            let mut namespace = namespace.clone();
            namespace.push(ident.clone());
            walk(scan, items, route, namespace);
        }
    }
}

/// Returns the verdict of `item` if it carries the marker.
fn inspect(item: &syn::Item) -> Option<std::result::Result<(), Rejection>> {
    let attrs = match item {
        syn::Item::Struct(it) => &it.attrs,
        syn::Item::Enum(it) => &it.attrs,
        syn::Item::Union(it) => &it.attrs,
        _ => return None,
    };
    let marker = &attrs[find_marker(attrs, MARKER)?];

    let verdict = check_marker(marker).and_then(|()| match item {
        syn::Item::Struct(it) => check_open(it),
        syn::Item::Enum(it) => {
            Err(err!(it.enum_token.span; "enums cannot be objective enums; use a struct instead"))
        }
        syn::Item::Union(it) => {
            Err(err!(it.union_token.span; "unions cannot be objective enums; use a struct instead"))
        }
        _ => Ok(()),
    });

    Some(verdict.map_err(Rejection::Malformed))
}

/// Returns an [`Error`] if the marker has arguments.
fn check_marker(marker: &syn::Attribute) -> Result<()> {
    match &marker.meta {
        syn::Meta::Path(_) => Ok(()),
        meta => Err(err!(meta.span(); "`#[{MARKER}]` does not accept arguments")),
    }
}

/// Returns an [`Error`] if the given struct cannot be completed.
///
/// A struct is open to completion if it has named fields and is not generic.
fn check_open(item: &syn::ItemStruct) -> Result<()> {
    if !matches!(item.fields, syn::Fields::Named(_)) {
        return Err(err!(
            item.ident.span();
            "objective enums must have named fields, e.g. `struct {} {{}}`",
            item.ident,
        ));
    }

    check_generics(&item.generics)
}

/// Returns an [`Error`] if the given [`syn::Generics`] is non-empty.
///
/// Every objective enum owns a `static` registry, which cannot depend on generic parameters. This
/// function ensures that the current item is not generic.
fn check_generics(generics: &syn::Generics) -> Result<()> {
    let syn::Generics { params, where_clause, .. } = generics;
    if !params.is_empty() {
        return Err(err!(params.span(); "generics parameters are not supported in this context"));
    }
    if let Some(clause) = where_clause {
        return Err(err!(clause.span(); "`where` clauses are not supported in this context"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The name of the item a candidate points at.
    fn ident(module: &syn::ItemMod, scan: &Scan, candidate: &Candidate) -> String {
        let mut items = &module.content.as_ref().unwrap().1;
        for &index in &scan.units[candidate.unit].route {
            let syn::Item::Mod(syn::ItemMod { content: Some((_, nested)), .. }) = &items[index]
            else {
                panic!("route must lead through inline modules");
            };
            items = nested;
        }

        match &items[candidate.index] {
            syn::Item::Struct(it) => it.ident.to_string(),
            syn::Item::Enum(it) => it.ident.to_string(),
            syn::Item::Union(it) => it.ident.to_string(),
            _ => panic!("candidates must be types"),
        }
    }

    fn verdicts(module: &syn::ItemMod, scan: &Scan) -> Vec<(String, bool)> {
        scan.candidates
            .iter()
            .map(|it| (ident(module, scan, it), it.verdict.is_ok()))
            .collect()
    }

    #[test]
    fn finds_marked_items_in_declaration_order() {
        let module: syn::ItemMod = syn::parse_quote! {
            mod m {
                #[objective_enum]
                struct A {}
                struct Unmarked {}
                #[objective_enum::objective_enum]
                pub struct B { x: u8 }
            }
        };
        let scan = scan(&module);

        assert_eq!(scan.units.len(), 1);
        assert_eq!(verdicts(&module, &scan), [("A".to_owned(), true), ("B".to_owned(), true)]);
        assert_eq!(scan.candidates[1].index, 2);
    }

    #[test]
    fn walks_nested_units() {
        let module: syn::ItemMod = syn::parse_quote! {
            mod outer {
                mod inner {
                    #[objective_enum]
                    struct Nested {}
                }
                mod external;
                #[objective_enum]
                struct Top {}
            }
        };
        let scan = scan(&module);

        assert_eq!(scan.units.len(), 2);
        assert_eq!(scan.units[1].route, [0]);
        let namespace: Vec<_> = scan.units[1].namespace.iter().map(|it| it.to_string()).collect();
        assert_eq!(namespace, ["outer", "inner"]);

        let found: Vec<_> =
            scan.candidates.iter().map(|it| (ident(&module, &scan, it), it.unit)).collect();
        assert_eq!(found, [("Top".to_owned(), 0), ("Nested".to_owned(), 1)]);
    }

    #[test]
    fn closed_shapes_are_malformed() {
        let module: syn::ItemMod = syn::parse_quote! {
            mod m {
                #[objective_enum]
                struct Tuple(u8);
                #[objective_enum]
                struct Unit;
                #[objective_enum]
                struct Generic<T> { t: T }
                #[objective_enum]
                enum Plain { A }
                #[objective_enum(x)]
                struct WithArgs {}
            }
        };
        let scan = scan(&module);

        assert_eq!(scan.candidates.len(), 5);
        for candidate in &scan.candidates {
            assert!(
                matches!(candidate.verdict, Err(Rejection::Malformed(_))),
                "{} should be malformed",
                ident(&module, &scan, candidate),
            );
        }
    }

    #[test]
    fn unmarked_module_has_no_candidates() {
        let module: syn::ItemMod = syn::parse_quote! {
            mod m {
                struct A {}
                enum B { X }
            }
        };

        assert!(scan(&module).candidates.is_empty());
    }
}
