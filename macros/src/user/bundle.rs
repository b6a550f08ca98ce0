//! Invoke-traits bundle generators.
//!
//! Both generators share one shape:
//!
//! ```text
//! trait Name<Rest = ()>        overload set, implemented on the first argument
//!   ^
//!   | A0: Name<(A1..An)>
//! BundleInvoke                 function object, Invoke<(A0, A1..An)>
//!   ^
//!   | InvokeTraits::InvokeType
//! Bundle                       unit struct + static invoke
//! ```
//!
//! The free generator adds one function object per fallback scope, each
//! routed through `scope::Name` instead of the local trait. A fallback
//! scope may also provide the zero-argument call as `impl Name for ()`.

use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};
use syn::{
    parse::{Parse, ParseStream},
    Attribute, Path, Token, Visibility,
};

use crate::common::{arg_types, arg_values, parse_comma_separated, parse_separator, OperationName};

/// Fallback slots available in `InvokeTraits` (`Fallback0..Fallback2`).
const MAX_FALLBACK_SCOPES: usize = 3;

/// Largest argument list (receiver included) a generated function object accepts.
const MAX_ARGS: usize = 12;

// =============================================================================
// Inputs
// =============================================================================

/// `free_invoke_traits!(#[attrs] vis Bundle, func [as Trait] [, scope::path]*)`
pub struct FreeTraitsInput {
    pub attrs: Vec<Attribute>,
    pub vis: Visibility,
    pub bundle: Ident,
    pub name: OperationName,
    pub scopes: Vec<Path>,
}

/// `member_invoke_traits!(#[attrs] vis Bundle, method [as Trait])`
pub struct MemberTraitsInput {
    pub attrs: Vec<Attribute>,
    pub vis: Visibility,
    pub bundle: Ident,
    pub name: OperationName,
}

/// `overload_set!(#[attrs] vis func [as Trait])`
pub struct OverloadSetInput {
    pub attrs: Vec<Attribute>,
    pub vis: Visibility,
    pub name: OperationName,
}

/// Module path of a fallback scope (no generic arguments).
struct ScopePath(Path);

impl Parse for ScopePath {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        Path::parse_mod_style(input).map(ScopePath)
    }
}

impl Parse for FreeTraitsInput {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let attrs = input.call(Attribute::parse_outer)?;
        let vis: Visibility = input.parse()?;
        let bundle: Ident = input.parse()?;
        input.parse::<Token![,]>()?;
        let name: OperationName = input.parse()?;

        let scopes = if parse_separator(input)? {
            parse_comma_separated::<ScopePath>(input)?
                .into_iter()
                .map(|scope| scope.0)
                .collect()
        } else {
            Vec::new()
        };

        Ok(FreeTraitsInput { attrs, vis, bundle, name, scopes })
    }
}

impl Parse for MemberTraitsInput {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let attrs = input.call(Attribute::parse_outer)?;
        let vis: Visibility = input.parse()?;
        let bundle: Ident = input.parse()?;
        input.parse::<Token![,]>()?;
        let name: OperationName = input.parse()?;
        if parse_separator(input)? {
            return Err(input.error("member_invoke_traits! takes no fallback scopes"));
        }
        Ok(MemberTraitsInput { attrs, vis, bundle, name })
    }
}

impl Parse for OverloadSetInput {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let attrs = input.call(Attribute::parse_outer)?;
        let vis: Visibility = input.parse()?;
        let name: OperationName = input.parse()?;
        parse_separator(input)?;
        Ok(OverloadSetInput { attrs, vis, name })
    }
}

// =============================================================================
// Shared pieces
// =============================================================================

enum TraitFlavor {
    /// Implemented on the first argument; the rest arrive as a tuple.
    Free,
    /// Implemented on the receiver type; the arguments arrive as a tuple.
    Member,
}

fn overload_trait(
    attrs: &[Attribute],
    vis: &Visibility,
    name: &OperationName,
    flavor: TraitFlavor,
) -> TokenStream {
    let trait_ident = name.trait_ident();
    let func = &name.func;

    let (param, binding, doc) = match flavor {
        TraitFlavor::Free => (
            format_ident!("Rest"),
            format_ident!("rest"),
            format!(
                "Overload set for `{func}`.\n\n\
                 Implement it on the type of the first argument, next to that type; \
                 `Rest` is the tuple of the remaining arguments."
            ),
        ),
        TraitFlavor::Member => (
            format_ident!("Args"),
            format_ident!("args"),
            format!(
                "Member operation `{func}`.\n\n\
                 Implement it on the receiver type: `T` for a movable receiver, \
                 `&T` or `&mut T` for a borrowed one."
            ),
        ),
    };

    quote! {
        #[doc = #doc]
        #(#attrs)*
        #vis trait #trait_ident<#param = ()> {
            /// Result of the call.
            type Output;
            /// `Present` when the call is declared not to panic.
            type Nothrow: ::tola_invoke::Bool;

            fn #func(self, #binding: #param) -> Self::Output;
        }
    }
}

/// `Invoke<(A0, A1..An)>` for `object` whenever `A0: trait_path<(A1..An)>`.
fn overload_invokers(object: &Ident, trait_path: &TokenStream, func: &Ident) -> TokenStream {
    let impls = (1..=MAX_ARGS).map(|n| {
        let rest_tys = arg_types(1, n);
        let rest_vals = arg_values(1, n);

        quote! {
            impl<A0, #(#rest_tys),*> ::tola_invoke::Invoke<(A0, #(#rest_tys,)*)> for #object
            where
                A0: #trait_path<(#(#rest_tys,)*)>,
            {
                type Output = <A0 as #trait_path<(#(#rest_tys,)*)>>::Output;
                type Nothrow = <A0 as #trait_path<(#(#rest_tys,)*)>>::Nothrow;

                #[inline(always)]
                fn invoke(self, (a0, #(#rest_vals,)*): (A0, #(#rest_tys,)*)) -> Self::Output {
                    <A0 as #trait_path<(#(#rest_tys,)*)>>::#func(a0, (#(#rest_vals,)*))
                }
            }
        }
    });

    quote! { #(#impls)* }
}

/// `Invoke<()>` for a fallback object whenever `(): trait_path<()>`.
///
/// The object's `Unit` parameter is always `()`; being generic keeps the
/// bound from being checked at the definition when the scope lacks the impl.
fn nullary_invoker(object: &Ident, trait_path: &TokenStream, func: &Ident) -> TokenStream {
    quote! {
        impl<Unit> ::tola_invoke::Invoke<()> for #object<Unit>
        where
            Unit: #trait_path<()> + ::core::default::Default,
        {
            type Output = <Unit as #trait_path<()>>::Output;
            type Nothrow = <Unit as #trait_path<()>>::Nothrow;

            #[inline(always)]
            fn invoke(self, (): ()) -> Self::Output {
                <Unit as #trait_path<()>>::#func(Unit::default(), ())
            }
        }
    }
}

fn fallback_object(vis: &Visibility, object: &Ident, doc: &str) -> TokenStream {
    quote! {
        #[doc = #doc]
        #[doc(hidden)]
        #[derive(Clone, Copy, Debug, Default)]
        #vis struct #object<Unit = ()>(::core::marker::PhantomData<Unit>);
    }
}

fn function_object(vis: &Visibility, object: &Ident, doc: &str) -> TokenStream {
    quote! {
        #[doc = #doc]
        #[derive(Clone, Copy, Debug, Default)]
        #vis struct #object;
    }
}

// =============================================================================
// free_invoke_traits!
// =============================================================================

pub fn expand_free_invoke_traits(input: FreeTraitsInput) -> syn::Result<TokenStream> {
    let FreeTraitsInput { attrs, vis, bundle, name, scopes } = input;

    if let Some(extra) = scopes.get(MAX_FALLBACK_SCOPES) {
        return Err(syn::Error::new_spanned(
            extra,
            format!("at most {MAX_FALLBACK_SCOPES} fallback scopes are supported"),
        ));
    }

    let func = &name.func;
    let trait_ident = name.trait_ident();
    let overloads = overload_trait(&[], &vis, &name, TraitFlavor::Free);

    // Argument-scope overloads.
    let invoke_ty = format_ident!("{}Invoke", bundle);
    let invoke_obj = function_object(
        &vis,
        &invoke_ty,
        &format!("Resolved callable for `{bundle}`: calls `{trait_ident}::{func}` on the first argument."),
    );
    let local_path = quote! { #trait_ident };
    let invokers = overload_invokers(&invoke_ty, &local_path, func);

    // Fallback scopes, in listed order.
    let mut fallback_items = Vec::new();
    let mut fallback_slots = Vec::new();
    for slot in 0..MAX_FALLBACK_SCOPES {
        match scopes.get(slot) {
            Some(scope) => {
                let object = format_ident!("{}Fallback{}", bundle, slot);
                let scope_path = quote! { #scope::#trait_ident };
                let doc = format!(
                    "Fallback {slot} for `{bundle}`: `{}`.",
                    scope_path.to_string().replace(' ', "")
                );
                fallback_items.push(fallback_object(&vis, &object, &doc));
                fallback_items.push(overload_invokers(&object, &scope_path, func));
                fallback_items.push(nullary_invoker(&object, &scope_path, func));
                fallback_slots.push(quote! { #object });
            }
            None => fallback_slots.push(quote! { ::tola_invoke::bundle::NoFallback }),
        }
    }
    let [fb0, fb1, fb2] = [&fallback_slots[0], &fallback_slots[1], &fallback_slots[2]];

    let bundle_doc = format!("Invoke-traits bundle for the free operation `{func}`.");

    Ok(quote! {
        #overloads

        #invoke_obj
        #invokers

        #(#fallback_items)*

        #[doc = #bundle_doc]
        #(#attrs)*
        #[derive(Clone, Copy, Debug, Default)]
        #vis struct #bundle;

        impl ::tola_invoke::bundle::InvokeTraits for #bundle {
            type InvokeType = #invoke_ty;
            type Fallback0 = #fb0;
            type Fallback1 = #fb1;
            type Fallback2 = #fb2;
        }

        impl #bundle {
            /// Invoke the argument-scope overload; `args` is the full argument tuple.
            ///
            /// Only overloads implemented on the first argument's type are
            /// candidates here, so a call that only a fallback scope provides
            /// does not compile. Use `invoke!(Bundle => ...)` for full lookup.
            #[inline(always)]
            #[allow(dead_code)]
            #vis fn invoke<Args>(args: Args) -> <#invoke_ty as ::tola_invoke::Invoke<Args>>::Output
            where
                #invoke_ty: ::tola_invoke::Invoke<Args>,
            {
                ::tola_invoke::Invoke::invoke(#invoke_ty, args)
            }
        }
    })
}

// =============================================================================
// member_invoke_traits!
// =============================================================================

pub fn expand_member_invoke_traits(input: MemberTraitsInput) -> TokenStream {
    let MemberTraitsInput { attrs, vis, bundle, name } = input;

    let func = &name.func;
    let trait_ident = name.trait_ident();
    let member = overload_trait(&[], &vis, &name, TraitFlavor::Member);

    let invoke_ty = format_ident!("{}Invoke", bundle);
    let invoke_obj = function_object(
        &vis,
        &invoke_ty,
        &format!("Resolved callable for `{bundle}`: calls `.{func}(..)` on the receiver."),
    );
    let member_path = quote! { #trait_ident };
    let invokers = overload_invokers(&invoke_ty, &member_path, func);

    let bundle_doc = format!("Invoke-traits bundle for the member operation `{func}`.");
    let invoke_doc = format!("Invoke `.{func}(..)` on `object`, respecting its receiver category.");

    quote! {
        #member

        #invoke_obj
        #invokers

        #[doc = #bundle_doc]
        #(#attrs)*
        #[derive(Clone, Copy, Debug, Default)]
        #vis struct #bundle;

        impl ::tola_invoke::bundle::InvokeTraits for #bundle {
            type InvokeType = #invoke_ty;
            type Fallback0 = ::tola_invoke::bundle::NoFallback;
            type Fallback1 = ::tola_invoke::bundle::NoFallback;
            type Fallback2 = ::tola_invoke::bundle::NoFallback;
        }

        impl #bundle {
            #[doc = #invoke_doc]
            #[inline(always)]
            #[allow(dead_code)]
            #vis fn invoke<O, Args>(object: O, args: Args) -> <O as #trait_ident<Args>>::Output
            where
                O: #trait_ident<Args>,
            {
                <O as #trait_ident<Args>>::#func(object, args)
            }
        }
    }
}

// =============================================================================
// overload_set!
// =============================================================================

pub fn expand_overload_set(input: OverloadSetInput) -> TokenStream {
    overload_trait(&input.attrs, &input.vis, &input.name, TraitFlavor::Free)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_input_collects_scopes() {
        let input: FreeTraitsInput =
            syn::parse_quote!(pub SwapTraits, swap, crate::generic, ::other::scope,);
        assert_eq!(input.bundle.to_string(), "SwapTraits");
        assert_eq!(input.name.trait_ident().to_string(), "Swap");
        assert_eq!(input.scopes.len(), 2);
    }

    #[test]
    fn free_input_rename() {
        let input: FreeTraitsInput = syn::parse_quote!(EncodeTraits, encode as EncodeWith);
        assert_eq!(input.name.trait_ident().to_string(), "EncodeWith");
        assert!(input.scopes.is_empty());
    }

    #[test]
    fn too_many_scopes_is_an_error() {
        let input: FreeTraitsInput = syn::parse_quote!(pub T, f, a, b, c, d);
        let err = expand_free_invoke_traits(input).err().map(|e| e.to_string());
        assert_eq!(err.as_deref(), Some("at most 3 fallback scopes are supported"));
    }

    #[test]
    fn member_input_rejects_scopes() {
        let parsed = syn::parse_str::<MemberTraitsInput>("pub FooTraits, foo, some::scope");
        assert!(parsed.is_err());
    }

    #[test]
    fn invokers_cover_every_arity() {
        let object = format_ident!("Obj");
        let path = quote! { Op };
        let tokens = overload_invokers(&object, &path, &format_ident!("op")).to_string();
        assert_eq!(tokens.matches("impl <").count(), MAX_ARGS);
    }

    #[test]
    fn fallback_objects_accept_zero_arguments() {
        let input: FreeTraitsInput = syn::parse_quote!(pub OriginTraits, origin, self::defaults);
        let tokens = expand_free_invoke_traits(input).map(|t| t.to_string()).unwrap_or_default();
        assert!(tokens.contains("struct OriginTraitsFallback0 < Unit = () >"));
        assert!(tokens.contains("Invoke < () > for OriginTraitsFallback0 < Unit >"));
        // The argument-scope object has no first argument to key on.
        assert!(!tokens.contains("Invoke < () > for OriginTraitsInvoke"));
    }
}
