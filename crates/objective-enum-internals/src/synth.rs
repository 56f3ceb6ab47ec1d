// SPDX-License-Identifier: MPL-2.0

//! Builds the output for one objective enum.
//!
//! Given the resolved [`TypeDescriptor`] and its member definitions, this module produces the
//! completed struct, the rewritten `impl` blocks of the type, and the generated items. It never
//! fails; everything that can go wrong has been checked by [`resolve`] and
//! [`members`](mod@members).

use syn::visit_mut::VisitMut as _;

use super::*;
use members::MemberDefinition;
use resolve::{TypeDescriptor, IDENTITY_FIELD};

/// The output for one objective enum.
#[derive(Debug)]
pub(crate) struct Completion {
    /// The struct, with the identity field and without markers.
    pub(crate) item: syn::ItemStruct,
    /// The `impl` blocks of the type, rewritten, with their positions in the unit.
    pub(crate) impls: Vec<(usize, syn::ItemImpl)>,
    /// Items to append to the unit.
    pub(crate) generated: Vec<syn::Item>,
}

/// Generates the output for `desc`.
///
/// `item` is the marked struct and `items` the unit that contains it.
pub(crate) fn synthesize(
    krate: &syn::Path,
    items: &[syn::Item],
    item: &syn::ItemStruct,
    desc: &TypeDescriptor,
    members: &[MemberDefinition],
) -> Completion {
    let cx = Context { krate, span: desc.ident.span(), desc };

    let mut generated = vec![
        cx.make_accessors(members),
        cx.make_objective_enum_impl(members),
        cx.make_partial_eq_impl(),
        cx.make_eq_impl(),
        cx.make_hash_impl(),
        cx.make_from_impl(),
        cx.make_try_from_impl(),
    ];
    if !desc.has_display {
        generated.push(cx.make_display_impl());
    }

    Completion { item: cx.complete_struct(item), impls: cx.complete_impls(items), generated }
}

struct Context<'a> {
    krate: &'a syn::Path,
    /// The span of all generated tokens.
    span: Span2,
    desc: &'a TypeDescriptor,
}

impl Context<'_> {
    /// Produces a [`syn::Path`] of the form `#krate::#tail`.
    fn krate_path(&self, tail: &[&str]) -> syn::Path {
        ast::make_krate_path(self.krate, self.span, tail)
    }

    /// Produces a [`syn::Type`] of the form `#krate::#tail`.
    fn krate_ty(&self, tail: &[&str]) -> syn::Type {
        ty_path!(self.krate_path(tail))
    }

    /// Produces a [`syn::Path`] of the form `#krate::#name<#ty>`.
    fn krate_generic_path(&self, name: &str, ty: syn::Type) -> syn::Path {
        ast::make_generic_path(
            self.krate_path(&[name]),
            self.span,
            false,
            [syn::GenericArgument::Type(ty)],
        )
    }

    /// The type of the objective enum, by name.
    fn self_ty(&self) -> syn::Type {
        ty_path!(self.desc.ident.clone())
    }

    /// Produces a [`syn::Expr`] of the form `<#self_ty as #krate::ObjectiveEnum>::#method`.
    fn objective_enum_fn(&self, method: &str) -> syn::Expr {
        ast::make_qualified_fn(
            self.span,
            self.self_ty(),
            self.krate_path(&["ObjectiveEnum"]),
            method,
        )
    }

    /// Produces a [`syn::Type`] of the form `::core::result::Result<#ok, #krate::RegistryError>`.
    fn result_ty(&self, ok: syn::Type) -> syn::Type {
        let span = self.span;

        ty_path!(ast::make_generic_path(
            path!(span; ::core::result::Result),
            span,
            false,
            [
                syn::GenericArgument::Type(ok),
                syn::GenericArgument::Type(self.krate_ty(&["RegistryError"])),
            ],
        ))
    }

    /// Strips every marker from the struct and appends the identity field.
    fn complete_struct(&self, item: &syn::ItemStruct) -> syn::ItemStruct {
        let span = self.span;
        let mut item = item.clone();
        strip_markers(&mut item.attrs, MARKER);

        if let syn::Fields::Named(fields) = &mut item.fields {
            // Rendered:
            //   __identity: #krate::Identity
            fields.named.push(syn::Field {
                attrs: vec![],
                vis: syn::Visibility::Inherited,
                mutability: syn::FieldMutability::None,
                ident: Some(syn::Ident::new(IDENTITY_FIELD, span)),
                colon_token: Some(syn::Token![:](span)),
                ty: self.krate_ty(&["Identity"]),
            });
        }

        item
    }

    /// Rewrites every `impl` block of the type: the initializer is removed, and struct literals
    /// are completed with [`Identity::UNASSIGNED`].
    ///
    /// [`Identity::UNASSIGNED`]: https://docs.rs/objective-enum/latest/objective_enum/struct.Identity.html
    fn complete_impls(&self, items: &[syn::Item]) -> Vec<(usize, syn::ItemImpl)> {
        let unassigned: syn::Expr = expr_path!(self.krate_path(&["Identity", "UNASSIGNED"]));
        let initializer = &self.desc.initializer;

        self.desc
            .impls
            .iter()
            .filter_map(|&index| match items.get(index) {
                Some(syn::Item::Impl(imp)) => Some((index, imp.clone())),
                _ => None,
            })
            .map(|(index, mut imp)| {
                if index == initializer.impl_index && initializer.fn_index < imp.items.len() {
                    imp.items.remove(initializer.fn_index);
                }
                rewrite::CompleteLiterals::new(&self.desc.ident, unassigned.clone())
                    .visit_item_impl_mut(&mut imp);

                (index, imp)
            })
            .collect()
    }

    /// Produces one accessor constant per member.
    fn make_accessors(&self, members: &[MemberDefinition]) -> syn::Item {
        let span = self.span;
        let member_ty = self.krate_generic_path("Member", ty_path!(span; Self));
        let allow = ast::make_list_attr(
            span,
            path!(span; allow),
            syn::Ident::new("non_upper_case_globals", span).into_token_stream(),
        );

        let qualified_name = self.desc.qualified_name();
        let consts: Vec<syn::ImplItem> = members
            .iter()
            .map(|member| {
                let name = member.ident.to_string();
                let doc = format!("The `{name}` member of `{qualified_name}`.");
                // Rendered:
                //   #[doc = "The `#name` member of `#qualified_name`."]
                //   #[allow(non_upper_case_globals)]
                //   #vis const #name: #krate::Member<Self> = #krate::Member::new("#name");
                syn::ImplItemConst {
                    attrs: vec![
                        ast::make_doc_attr(span, &doc),
                        allow.clone(),
                    ],
                    vis: self.desc.vis.clone(),
                    defaultness: None,
                    const_token: syn::Token![const](span),
                    ident: member.ident.clone(),
                    generics: Default::default(),
                    colon_token: syn::Token![:](span),
                    ty: ty_path!(member_ty.clone()),
                    eq_token: syn::Token![=](span),
                    expr: ast::make_call(
                        span,
                        expr_path!(self.krate_path(&["Member", "new"])),
                        [ast::make_lit_str(span, &name)],
                    ),
                    semi_token: syn::Token![;](span),
                }
                .into()
            })
            .collect();

        ast::make_impl(span, Default::default(), None, self.self_ty(), consts)
    }

    /// Produces the `ObjectiveEnum` implementation.
    fn make_objective_enum_impl(&self, members: &[MemberDefinition]) -> syn::Item {
        let span = self.span;
        let identity_ty = self.krate_ty(&["Identity"]);

        // Rendered:
        //   fn identity(&self) -> &#krate::Identity {
        //       &self.__identity
        //   }
        let identity = ast::make_impl_fn(
            sig::Builder::new().with_receiver(Receiver::new_ref_self()).build(
                span,
                "identity",
                |_| [],
                |span| Some(ast::make_ref_ty(span, None, false, identity_ty.clone())),
            ),
            vec![syn::Stmt::Expr(ast::make_self_field_ref(span, IDENTITY_FIELD, false), None)],
        );

        // Rendered:
        //   fn identity_mut(&mut self) -> &mut #krate::Identity {
        //       &mut self.__identity
        //   }
        let identity_mut = ast::make_impl_fn(
            sig::Builder::new().with_receiver(Receiver::new_ref_mut_self()).build(
                span,
                "identity_mut",
                |_| [],
                |span| Some(ast::make_ref_ty(span, None, true, identity_ty.clone())),
            ),
            vec![syn::Stmt::Expr(ast::make_self_field_ref(span, IDENTITY_FIELD, true), None)],
        );

        // Rendered:
        //   fn try_registry() -> ::core::result::Result<
        //       &'static #krate::Registry<Self>,
        //       &'static #krate::RegistryError,
        //   > {
        //       fn populate(..) -> .. { .. }
        //       static REGISTRY: #krate::LazyRegistry<#self_ty> = ..;
        //       REGISTRY.try_get()
        //   }
        let registry = ast::make_impl_fn(
            sig::Builder::new().build(
                span,
                "try_registry",
                |_| [],
                |span| {
                    let registry_ty: syn::Type =
                        ty_path!(self.krate_generic_path("Registry", ty_path!(span; Self)));
                    let error_ty = self.krate_ty(&["RegistryError"]);

                    Some(ty_path!(ast::make_generic_path(
                        path!(span; ::core::result::Result),
                        span,
                        false,
                        [
                            syn::GenericArgument::Type(ast::make_ref_ty(
                                span,
                                Some("'static"),
                                false,
                                registry_ty,
                            )),
                            syn::GenericArgument::Type(ast::make_ref_ty(
                                span,
                                Some("'static"),
                                false,
                                error_ty,
                            )),
                        ],
                    )))
                },
            ),
            vec![
                syn::Stmt::Item(self.make_populate_fn(members)),
                syn::Stmt::Item(self.make_registry_static()),
                syn::Stmt::Expr(
                    ast::make_method_call(span, expr_path!(span; REGISTRY), "try_get", []),
                    None,
                ),
            ],
        );

        ast::make_impl(
            span,
            Default::default(),
            Some(self.krate_path(&["ObjectiveEnum"])),
            self.self_ty(),
            vec![identity, identity_mut, registry],
        )
    }

    /// Produces the function that defines every member, in source order.
    fn make_populate_fn(&self, members: &[MemberDefinition]) -> syn::Item {
        let span = self.span;
        let builder_ty = ast::make_ref_ty(
            span,
            None,
            true,
            ty_path!(self.krate_generic_path("RegistryBuilder", self.self_ty())),
        );
        let unit_ty: syn::Type = syn::TypeTuple {
            paren_token: syn::token::Paren(span),
            elems: Punctuated::new(),
        }
        .into();
        let unit: syn::Expr = syn::ExprTuple {
            attrs: vec![],
            paren_token: syn::token::Paren(span),
            elems: Punctuated::new(),
        }
        .into();

        // An empty initializer leaves the builder unused.
        let builder_arg = if members.is_empty() { "_builder" } else { "builder" };

        let mut stmts: Vec<syn::Stmt> = members
            .iter()
            .map(|it| syn::Stmt::Expr(self.make_define(it), Some(syn::Token![;](span))))
            .collect();
        // Rendered:
        //   ::core::result::Result::Ok(())
        stmts.push(syn::Stmt::Expr(
            ast::make_call(span, expr_path!(span; ::core::result::Result::Ok), [unit]),
            None,
        ));

        syn::ItemFn {
            attrs: vec![],
            vis: syn::Visibility::Inherited,
            sig: sig::Builder::new().build(
                span,
                "populate",
                |span| [ast::make_arg(span, builder_arg, builder_ty)],
                |_| Some(self.result_ty(unit_ty)),
            ),
            block: Box::new(syn::Block { brace_token: syn::token::Brace(span), stmts }),
        }
        .into()
    }

    /// Produces the definition of one member.
    ///
    /// Rendered:
    ///   builder.define("#name", #self_ty::#constructor(#args))?
    /// or, with an explicit ordinal:
    ///   builder.define("#name", #self_ty::#constructor(#args))?.reassign(#ordinal)?
    fn make_define(&self, member: &MemberDefinition) -> syn::Expr {
        let span = self.span;
        let mut replace_self = rewrite::ReplaceSelf::new(&self.desc.ident);

        let constructor = syn::Path {
            leading_colon: None,
            segments: [self.desc.ident.clone(), member.constructor.clone()]
                .into_iter()
                .map(syn::PathSegment::from)
                .collect(),
        };
        let args = member.args.iter().cloned().map(|mut arg| {
            replace_self.visit_expr_mut(&mut arg);
            arg
        });
        let instance = ast::make_call(span, expr_path!(constructor), args.collect::<Vec<_>>());

        let define = ast::make_try(
            span,
            ast::make_method_call(
                span,
                expr_path!(span; builder),
                "define",
                [ast::make_lit_str(span, &member.ident.to_string()), instance],
            ),
        );

        match &member.ordinal {
            Some(ordinal) => {
                let mut ordinal = ordinal.clone();
                replace_self.visit_expr_mut(&mut ordinal);

                ast::make_try(span, ast::make_method_call(span, define, "reassign", [ordinal]))
            }
            None => define,
        }
    }

    /// Produces the lazily-populated registry.
    fn make_registry_static(&self) -> syn::Item {
        let span = self.span;

        // Rendered:
        //   static REGISTRY: #krate::LazyRegistry<#self_ty> = #krate::LazyRegistry::new(populate);
        syn::ItemStatic {
            attrs: vec![],
            vis: syn::Visibility::Inherited,
            static_token: syn::Token![static](span),
            mutability: syn::StaticMutability::None,
            ident: syn::Ident::new("REGISTRY", span),
            colon_token: syn::Token![:](span),
            ty: Box::new(ty_path!(self.krate_generic_path("LazyRegistry", self.self_ty()))),
            eq_token: syn::Token![=](span),
            expr: Box::new(ast::make_call(
                span,
                expr_path!(self.krate_path(&["LazyRegistry", "new"])),
                [expr_path!(span; populate)],
            )),
            semi_token: syn::Token![;](span),
        }
        .into()
    }

    /// Produces the `PartialEq` implementation, which compares ordinals.
    fn make_partial_eq_impl(&self) -> syn::Item {
        let span = self.span;

        // Rendered:
        //   fn eq(&self, other: &Self) -> bool {
        //       <#self_ty as #krate::ObjectiveEnum>::equals(self, other)
        //   }
        let eq = ast::make_impl_fn(
            sig::Builder::new().with_receiver(Receiver::new_ref_self()).build(
                span,
                "eq",
                |span| {
                    let self_ty = ty_path!(span; Self);
                    [ast::make_arg(span, "other", ast::make_ref_ty(span, None, false, self_ty))]
                },
                |span| Some(ty_path!(span; bool)),
            ),
            vec![syn::Stmt::Expr(
                ast::make_call(
                    span,
                    self.objective_enum_fn("equals"),
                    [expr_path!(span; self), expr_path!(span; other)],
                ),
                None,
            )],
        );

        ast::make_impl(
            span,
            Default::default(),
            Some(path!(span; ::core::cmp::PartialEq)),
            self.self_ty(),
            vec![eq],
        )
    }

    fn make_eq_impl(&self) -> syn::Item {
        let span = self.span;

        ast::make_impl(
            span,
            Default::default(),
            Some(path!(span; ::core::cmp::Eq)),
            self.self_ty(),
            vec![],
        )
    }

    /// Produces the `Hash` implementation, which hashes the ordinal.
    fn make_hash_impl(&self) -> syn::Item {
        let span = self.span;

        // Rendered:
        //   fn hash<H: ::core::hash::Hasher>(&self, state: &mut H) {
        //       ::core::hash::Hash::hash(
        //           &<#self_ty as #krate::ObjectiveEnum>::ordinal(self),
        //           state,
        //       )
        //   }
        let ordinal: syn::Expr = syn::ExprReference {
            attrs: vec![],
            and_token: syn::Token![&](span),
            mutability: None,
            expr: Box::new(ast::make_call(
                span,
                self.objective_enum_fn("ordinal"),
                [expr_path!(span; self)],
            )),
        }
        .into();
        let generics = ast::make_bounded_generics(span, "H", path!(span; ::core::hash::Hasher));
        let hash = ast::make_impl_fn(
            sig::Builder::new()
                .with_generics(generics)
                .with_receiver(Receiver::new_ref_self())
                .build(
                    span,
                    "hash",
                    |span| {
                        let state_ty = ast::make_ref_ty(span, None, true, ty_path!(span; H));
                        [ast::make_arg(span, "state", state_ty)]
                    },
                    |_| None,
                ),
            vec![syn::Stmt::Expr(
                ast::make_call(
                    span,
                    expr_path!(span; ::core::hash::Hash::hash),
                    [ordinal, expr_path!(span; state)],
                ),
                None,
            )],
        );

        ast::make_impl(
            span,
            Default::default(),
            Some(path!(span; ::core::hash::Hash)),
            self.self_ty(),
            vec![hash],
        )
    }

    /// Produces `impl<'a> From<&'a #self_ty> for #krate::Ordinal`.
    fn make_from_impl(&self) -> syn::Item {
        let span = self.span;
        let value_ty = ast::make_ref_ty(span, Some("'a"), false, self.self_ty());

        let from = ast::make_impl_fn(
            sig::Builder::new().build(
                span,
                "from",
                |span| [ast::make_arg(span, "value", value_ty.clone())],
                |span| Some(ty_path!(span; Self)),
            ),
            vec![syn::Stmt::Expr(
                ast::make_call(span, self.objective_enum_fn("ordinal"), [expr_path!(span; value)]),
                None,
            )],
        );

        ast::make_impl(
            span,
            ast::make_lifetime_generics(span, "'a"),
            Some(ast::make_generic_path(
                path!(span; ::core::convert::From),
                span,
                false,
                [syn::GenericArgument::Type(value_ty)],
            )),
            self.krate_ty(&["Ordinal"]),
            vec![from],
        )
    }

    /// Produces `impl TryFrom<#krate::Ordinal> for &'static #self_ty`.
    fn make_try_from_impl(&self) -> syn::Item {
        let span = self.span;
        let ordinal_ty = self.krate_ty(&["Ordinal"]);

        // Rendered:
        //   type Error = #krate::RegistryError;
        let error: syn::ImplItem = syn::ImplItemType {
            attrs: vec![],
            vis: syn::Visibility::Inherited,
            defaultness: None,
            type_token: syn::Token![type](span),
            ident: syn::Ident::new("Error", span),
            generics: Default::default(),
            eq_token: syn::Token![=](span),
            ty: self.krate_ty(&["RegistryError"]),
            semi_token: syn::Token![;](span),
        }
        .into();

        // Rendered:
        //   fn try_from(ordinal: #krate::Ordinal)
        //       -> ::core::result::Result<Self, #krate::RegistryError>
        //   {
        //       <#self_ty as #krate::ObjectiveEnum>::registry().get_by_ordinal(ordinal)
        //   }
        let try_from = ast::make_impl_fn(
            sig::Builder::new().build(
                span,
                "try_from",
                |span| [ast::make_arg(span, "ordinal", ordinal_ty.clone())],
                |span| Some(self.result_ty(ty_path!(span; Self))),
            ),
            vec![syn::Stmt::Expr(
                ast::make_method_call(
                    span,
                    ast::make_call(span, self.objective_enum_fn("registry"), []),
                    "get_by_ordinal",
                    [expr_path!(span; ordinal)],
                ),
                None,
            )],
        );

        ast::make_impl(
            span,
            Default::default(),
            Some(ast::make_generic_path(
                path!(span; ::core::convert::TryFrom),
                span,
                false,
                [syn::GenericArgument::Type(ordinal_ty)],
            )),
            ast::make_ref_ty(span, Some("'static"), false, self.self_ty()),
            vec![error, try_from],
        )
    }

    /// Produces the `Display` implementation, which prints the member name.
    fn make_display_impl(&self) -> syn::Item {
        let span = self.span;
        let formatter_ty = ty_path!(ast::make_generic_path(
            path!(span; ::core::fmt::Formatter),
            span,
            false,
            [syn::GenericArgument::Lifetime(syn::Lifetime::new("'_", span))],
        ));

        // Rendered:
        //   fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
        //       f.write_str(<#self_ty as #krate::ObjectiveEnum>::name(self))
        //   }
        let fmt = ast::make_impl_fn(
            sig::Builder::new().with_receiver(Receiver::new_ref_self()).build(
                span,
                "fmt",
                |span| [ast::make_arg(span, "f", ast::make_ref_ty(span, None, true, formatter_ty))],
                |span| Some(ty_path!(span; ::core::fmt::Result)),
            ),
            vec![syn::Stmt::Expr(
                ast::make_method_call(
                    span,
                    expr_path!(span; f),
                    "write_str",
                    [ast::make_call(
                        span,
                        self.objective_enum_fn("name"),
                        [expr_path!(span; self)],
                    )],
                ),
                None,
            )],
        );

        ast::make_impl(
            span,
            Default::default(),
            Some(path!(span; ::core::fmt::Display)),
            self.self_ty(),
            vec![fmt],
        )
    }
}
