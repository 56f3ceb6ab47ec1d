// SPDX-License-Identifier: MPL-2.0

//! The generation pass over an annotated module.

use syn::visit_mut::{self, VisitMut};

use super::*;

/// Cooperative cancellation, checked by [`Pass::run`] before each candidate.
pub(crate) trait Cancellation {
    fn is_cancelled(&self) -> bool;
}

/// A [`Cancellation`] that never fires.
///
/// This is what the `#[generate]` attribute uses.
pub(crate) struct Never;

impl Cancellation for Never {
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// The result of a [`Pass`].
#[derive(Debug)]
pub(crate) struct Output {
    /// The annotated module, with every completed type committed and every marker removed.
    pub(crate) module: syn::ItemMod,
    /// All diagnostics, combined.
    pub(crate) errors: Option<Error>,
}

impl ToTokens for Output {
    fn to_tokens(&self, tokens: &mut TokenStream2) {
        if let Some(e) = &self.errors {
            tokens.extend(e.0.to_compile_error());
        }
        self.module.to_tokens(tokens);
    }
}

/// A generation pass.
pub(crate) struct Pass<'a> {
    args: &'a Args,
}

impl<'a> Pass<'a> {
    pub(crate) fn new(args: &'a Args) -> Self {
        Self { args }
    }

    /// Completes every marked struct in `module` and its inline submodules.
    ///
    /// Each struct is completed all at once or not at all: a struct whose declaration or
    /// initializer is rejected is left as written, minus its markers and initializer, and the
    /// rejection is added to [`Output::errors`] (subject to [`Policy`] for malformed ones). Other
    /// structs are unaffected.
    ///
    /// If `cancel` fires, the remaining candidates are skipped; those completed before stay
    /// committed.
    ///
    /// # Errors
    ///
    /// An error is returned if `module` is not inline.
    pub(crate) fn run(
        &self,
        mut module: syn::ItemMod,
        cancel: &impl Cancellation,
    ) -> Result<Output> {
        if module.content.is_none() {
            return Err(err!(
                module.ident.span();
                "`#[generate]` requires an inline module, e.g. `mod {} {{ .. }}`",
                module.ident,
            ));
        }

        let scan::Scan { units, candidates } = scan::scan(&module);
        let mut errors: Option<Error> = None;

        for candidate in candidates {
            if cancel.is_cancelled() {
                break;
            }
            let unit = &units[candidate.unit];
            let Some(items) = unit_items_mut(&mut module, &unit.route) else {
                continue;
            };

            let result = candidate
                .verdict
                .and_then(|()| self.complete(items, candidate.index, &unit.namespace));
            let e = match result {
                Ok(()) => continue,
                Err(Rejection::Malformed(_)) if self.args.malformed == Policy::Ignore => continue,
                Err(Rejection::Malformed(e) | Rejection::Structural(e)) => e,
            };
            match errors.as_mut() {
                Some(errors) => errors.combine(e),
                None => errors = Some(e),
            }
        }

        StripMarkers.visit_item_mod_mut(&mut module);

        Ok(Output { module, errors })
    }

    /// Completes the struct at `items[index]` and commits the result to `items`.
    fn complete(
        &self,
        items: &mut Vec<syn::Item>,
        index: usize,
        namespace: &[syn::Ident],
    ) -> std::result::Result<(), Rejection> {
        let desc = resolve::resolve(items, index, namespace)?;
        let members = members::parse(&desc)?;
        let Some(syn::Item::Struct(item)) = items.get(index) else {
            return Err(Rejection::Malformed(err!("objective enums must be structs")));
        };
        let completion = synth::synthesize(&self.args.krate, items, item, &desc, &members);

        items[index] = completion.item.into();
        for (index, imp) in completion.impls {
            items[index] = imp.into();
        }
        items.extend(completion.generated);

        Ok(())
    }
}

/// Follows `route` from `module` to the items of a nested unit.
fn unit_items_mut<'a>(
    module: &'a mut syn::ItemMod,
    route: &[usize],
) -> Option<&'a mut Vec<syn::Item>> {
    let mut items = &mut module.content.as_mut()?.1;
    for &index in route {
        let Some(syn::Item::Mod(syn::ItemMod { content: Some((_, nested)), .. })) =
            items.get_mut(index)
        else {
            return None;
        };
        items = nested;
    }

    Some(items)
}

/// Removes every marker, whether or not the item it marks was completed.
///
/// Initializers are removed along with their marker, as their bodies are not valid Rust.
struct StripMarkers;

impl VisitMut for StripMarkers {
    fn visit_item_struct_mut(&mut self, item: &mut syn::ItemStruct) {
        strip_markers(&mut item.attrs, MARKER);
        visit_mut::visit_item_struct_mut(self, item);
    }

    fn visit_item_enum_mut(&mut self, item: &mut syn::ItemEnum) {
        strip_markers(&mut item.attrs, MARKER);
        visit_mut::visit_item_enum_mut(self, item);
    }

    fn visit_item_union_mut(&mut self, item: &mut syn::ItemUnion) {
        strip_markers(&mut item.attrs, MARKER);
        visit_mut::visit_item_union_mut(self, item);
    }

    fn visit_item_impl_mut(&mut self, item: &mut syn::ItemImpl) {
        item.items.retain(|it| match it {
            syn::ImplItem::Fn(it) => find_marker(&it.attrs, INITIALIZER).is_none(),
            _ => true,
        });
        visit_mut::visit_item_impl_mut(self, item);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    /// Cancels before the candidate numbered `limit` (zero-based).
    struct CancelAt {
        limit: usize,
        checks: Cell<usize>,
    }

    impl Cancellation for CancelAt {
        fn is_cancelled(&self) -> bool {
            let checks = self.checks.get();
            self.checks.set(checks + 1);

            checks >= self.limit
        }
    }

    fn run_with(args: &Args, module: syn::ItemMod) -> Output {
        Pass::new(args).run(module, &Never).unwrap()
    }

    fn run(module: syn::ItemMod) -> Output {
        run_with(&Args::default(), module)
    }

    fn roles() -> syn::ItemMod {
        syn::parse_quote! {
            mod app {
                #[objective_enum]
                pub struct Role {
                    pub title: &'static str,
                }

                impl Role {
                    fn new(title: &'static str) -> Self {
                        Self { title }
                    }

                    #[members]
                    fn members() {
                        Enum::None("None");
                        Enum::User("Default")(1 << 0);
                        Enum::Moderator("Moderator")(1 << 1);
                        Enum::Admin("Administrator")(1 << 2);
                        Enum::Owner("Owner")(1 << 3);
                    }
                }

                pub mod nested {
                    #[objective_enum]
                    pub(crate) struct Level {
                        weight: u8,
                    }

                    impl Level {
                        const fn new(weight: u8) -> Level {
                            Level { weight }
                        }

                        #[members]
                        fn members() {
                            Enum::Low(1);
                            Enum::High(9);
                        }
                    }
                }
            }
        }
    }

    fn render(module: &syn::ItemMod) -> String {
        module.to_token_stream().to_string()
    }

    /// The types in `module` with an `ObjectiveEnum` impl, in module pre-order.
    fn completed(module: &syn::ItemMod) -> Vec<String> {
        fn walk(prefix: &str, items: &[syn::Item], found: &mut Vec<String>) {
            for item in items {
                let syn::Item::Impl(syn::ItemImpl { trait_: Some((_, path, _)), self_ty, .. }) =
                    item
                else {
                    continue;
                };
                if path.segments.last().map_or(false, |it| it.ident == "ObjectiveEnum") {
                    found.push(format!("{prefix}::{}", self_ty.to_token_stream()));
                }
            }
            for item in items {
                let syn::Item::Mod(syn::ItemMod { ident, content: Some((_, items)), .. }) = item
                else {
                    continue;
                };
                walk(&format!("{prefix}::{ident}"), items, found);
            }
        }

        let mut found = Vec::new();
        if let Some((_, items)) = &module.content {
            walk(&module.ident.to_string(), items, &mut found);
        }

        found
    }

    #[test]
    fn completes_every_unit() {
        let output = run(roles());

        assert!(output.errors.is_none());
        assert_eq!(completed(&output.module), ["app::Role", "app::nested::Level"]);

        let rendered = render(&output.module);
        assert!(!rendered.contains("[objective_enum]"));
        assert!(!rendered.contains("[members]"));
        assert!(rendered.contains("pub (crate) const High"));
    }

    #[test]
    fn pass_is_idempotent() {
        let first = run(roles());
        let second = run(first.module.clone());

        assert!(second.errors.is_none());
        assert_eq!(completed(&second.module), ["app::Role", "app::nested::Level"]);
        assert_eq!(render(&first.module), render(&second.module));
    }

    #[test]
    fn pass_is_deterministic() {
        assert_eq!(render(&run(roles()).module), render(&run(roles()).module));
    }

    #[test]
    fn rejected_type_gets_no_output() {
        let output = run(syn::parse_quote! {
            mod m {
                #[objective_enum]
                struct Good {}
                impl Good {
                    fn new() -> Self { Self {} }
                    #[members]
                    fn members() { Enum::A(); }
                }

                #[objective_enum]
                struct Bad {}
                impl Bad {
                    fn new() -> Self { Self {} }
                    #[members]
                    fn members() { Enum::A(1); }
                }
            }
        });

        assert_eq!(completed(&output.module), ["m::Good"]);
        assert!(output.errors.is_some());

        let bad: syn::ItemMod = syn::parse_quote! {
            mod m {
                struct Bad {}
                impl Bad {
                    fn new() -> Self { Self {} }
                }
            }
        };
        let Some((_, items)) = &output.module.content else {
            panic!("module must be inline");
        };
        let Some((_, bad_items)) = &bad.content else {
            panic!("module must be inline");
        };
        assert_eq!(
            items[2].to_token_stream().to_string(),
            bad_items[0].to_token_stream().to_string(),
        );
        assert_eq!(
            items[3].to_token_stream().to_string(),
            bad_items[1].to_token_stream().to_string(),
        );
    }

    #[test]
    fn malformed_policy_controls_diagnostics() {
        let module: syn::ItemMod = syn::parse_quote! {
            mod m {
                #[objective_enum]
                struct Tuple(u8);
                #[objective_enum]
                struct NoInitializer {}
            }
        };

        let output = run(module.clone());
        assert_eq!(output.errors.map(|e| e.0.into_iter().count()), Some(2));

        let args = Args { malformed: Policy::Ignore, ..Args::default() };
        let output = run_with(&args, module);
        assert!(output.errors.is_none());
        assert!(completed(&output.module).is_empty());
        assert!(!render(&output.module).contains("objective_enum"));
    }

    #[test]
    fn ignored_types_lose_their_initializer() {
        let args = Args { malformed: Policy::Ignore, ..Args::default() };
        let output = run_with(
            &args,
            syn::parse_quote! {
                mod m {
                    #[objective_enum]
                    struct Tuple(u8);
                    impl Tuple {
                        fn new(x: u8) -> Self { Self(x) }
                        #[members]
                        fn members() { Enum::A(1); }
                    }
                }
            },
        );

        assert!(output.errors.is_none());
        let rendered = render(&output.module);
        assert!(rendered.contains("fn new"));
        assert!(!rendered.contains("Enum"));
    }

    #[test]
    fn structural_errors_ignore_policy() {
        let args = Args { malformed: Policy::Ignore, ..Args::default() };
        let output = run_with(
            &args,
            syn::parse_quote! {
                mod m {
                    #[objective_enum]
                    struct Role {}
                    impl Role {
                        #[members]
                        fn members() { let x = 1; }
                    }
                }
            },
        );

        assert!(output.errors.is_some());
    }

    #[test]
    fn cancellation_keeps_earlier_types() {
        let cancel = CancelAt { limit: 1, checks: Cell::new(0) };
        let output = Pass::new(&Args::default()).run(roles(), &cancel).unwrap();

        assert_eq!(completed(&output.module), ["app::Role"]);
        let rendered = render(&output.module);
        assert!(rendered.contains("ObjectiveEnum for Role"));
        assert!(!rendered.contains("ObjectiveEnum for Level"));
        assert!(!rendered.contains("[members]"));
    }

    #[test]
    fn module_must_be_inline() {
        let module: syn::ItemMod = syn::parse_quote!(mod external;);
        assert!(Pass::new(&Args::default()).run(module, &Never).is_err());
    }

    #[test]
    fn custom_crate_path_is_used() {
        let args = Args { krate: syn::parse_quote!(crate::reexport), ..Args::default() };
        let rendered = render(&run_with(&args, roles()).module);

        assert!(rendered.contains("impl crate :: reexport :: ObjectiveEnum for Role"));
        assert!(!rendered.contains(":: objective_enum ::"));
    }
}
