//! `#[derive(Upcast)]`: derived-to-base conversions for member-pointer receivers.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{
    parse::Parser, punctuated::Punctuated, Data, DeriveInput, Fields, Index, Member, Token, Type,
};

/// One `#[upcast(...)]` field.
struct UpcastField {
    member: Member,
    ty: Type,
    /// Further bases reached through the field's own `Upcast` impls.
    through: Vec<Type>,
}

pub fn expand_derive_upcast(input: DeriveInput) -> syn::Result<TokenStream> {
    let fields = match &input.data {
        Data::Struct(data) => &data.fields,
        Data::Enum(data) => {
            return Err(syn::Error::new_spanned(
                data.enum_token,
                "Upcast can only be derived for structs",
            ));
        }
        Data::Union(data) => {
            return Err(syn::Error::new_spanned(
                data.union_token,
                "Upcast can only be derived for structs",
            ));
        }
    };

    let marked = collect_marked(fields)?;
    if marked.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "Upcast needs at least one field marked #[upcast]",
        ));
    }

    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let (impl_generics, ty_generics, where_clause) = (&impl_generics, &ty_generics, &where_clause);

    let impls = marked.iter().flat_map(|field| {
        let UpcastField { member, ty, through } = field;

        let direct = quote! {
            impl #impl_generics ::tola_invoke::Upcast<#ty> for #ident #ty_generics #where_clause {
                #[inline(always)]
                fn upcast(&self) -> &#ty {
                    &self.#member
                }

                #[inline(always)]
                fn upcast_mut(&mut self) -> &mut #ty {
                    &mut self.#member
                }
            }
        };

        let delegated = through.iter().map(move |base| {
            quote! {
                impl #impl_generics ::tola_invoke::Upcast<#base> for #ident #ty_generics #where_clause {
                    #[inline(always)]
                    fn upcast(&self) -> &#base {
                        <#ty as ::tola_invoke::Upcast<#base>>::upcast(&self.#member)
                    }

                    #[inline(always)]
                    fn upcast_mut(&mut self) -> &mut #base {
                        <#ty as ::tola_invoke::Upcast<#base>>::upcast_mut(&mut self.#member)
                    }
                }
            }
        });

        core::iter::once(direct).chain(delegated)
    });

    Ok(quote! { #(#impls)* })
}

fn collect_marked(fields: &Fields) -> syn::Result<Vec<UpcastField>> {
    let mut marked = Vec::new();

    for (index, field) in fields.iter().enumerate() {
        let Some(attr) = field.attrs.iter().find(|attr| attr.path().is_ident("upcast")) else {
            continue;
        };

        let through = match &attr.meta {
            syn::Meta::Path(_) => Vec::new(),
            syn::Meta::List(list) => {
                let parser = Punctuated::<Type, Token![,]>::parse_terminated;
                parser.parse2(list.tokens.clone())?.into_iter().collect()
            }
            syn::Meta::NameValue(nv) => {
                return Err(syn::Error::new_spanned(
                    nv,
                    "expected #[upcast] or #[upcast(Base, ...)]",
                ));
            }
        };

        let member = match &field.ident {
            Some(name) => Member::Named(name.clone()),
            None => Member::Unnamed(Index::from(index)),
        };

        marked.push(UpcastField { member, ty: field.ty.clone(), through });
    }

    Ok(marked)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_field_with_delegation() {
        let input: DeriveInput = syn::parse_quote! {
            struct Square {
                #[upcast(Base)]
                shape: Shape,
                side: f64,
            }
        };
        let out = expand_derive_upcast(input).map(|t| t.to_string());
        let out = out.unwrap_or_default();
        assert_eq!(out.matches("impl").count(), 2);
        assert!(out.contains("Upcast < Shape >"));
        assert!(out.contains("Upcast < Base >"));
    }

    #[test]
    fn generic_struct_keeps_generics_on_every_impl() {
        let input: DeriveInput = syn::parse_quote! {
            struct Tagged<T: Clone> {
                tag: T,
                #[upcast(Root, Origin)]
                base: Base,
            }
        };
        let out = expand_derive_upcast(input).map(|t| t.to_string()).unwrap_or_default();
        assert_eq!(out.matches("impl < T : Clone >").count(), 3);
        assert_eq!(out.matches("for Tagged < T >").count(), 3);
    }

    #[test]
    fn tuple_field_uses_index() {
        let input: DeriveInput = syn::parse_quote! {
            struct Wrapper(u8, #[upcast] Inner);
        };
        let out = expand_derive_upcast(input).map(|t| t.to_string()).unwrap_or_default();
        assert!(out.contains("self . 1"));
    }

    #[test]
    fn enums_and_unmarked_structs_are_rejected() {
        let on_enum: DeriveInput = syn::parse_quote! { enum E { A } };
        assert!(expand_derive_upcast(on_enum).is_err());

        let unmarked: DeriveInput = syn::parse_quote! { struct S { a: u8 } };
        assert!(expand_derive_upcast(unmarked).is_err());
    }
}
