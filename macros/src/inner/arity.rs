//! Arity-expanded `Invoke` impls.
//!
//! `Invoke<Args>` takes its arguments as a tuple, so every supported arity
//! needs its own impl. These generators emit them once inside tola-invoke.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{parse::Parse, parse::ParseStream, LitInt, Path, Token};

use crate::common::{arg_types, arg_values, parse_comma_separated};

pub struct ArityInput {
    pub max: usize,
}

impl Parse for ArityInput {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let lit: LitInt = input.parse()?;
        let max = lit.base10_parse::<usize>()?;
        Ok(ArityInput { max })
    }
}

/// `N; Box, Rc, mut Box`: arity bound plus owning pointers.
///
/// A plain entry gets a `MemFn` impl (`Receiver`), a `mut` entry a
/// `MemFnMut` impl (`ReceiverMut`).
pub struct OwnedInput {
    pub max: usize,
    pub pointers: Vec<OwningPointer>,
}

pub struct OwningPointer {
    pub exclusive: bool,
    pub path: Path,
}

impl Parse for OwningPointer {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let exclusive = input.peek(Token![mut]);
        if exclusive {
            input.parse::<Token![mut]>()?;
        }
        let path = Path::parse_mod_style(input)?;
        Ok(OwningPointer { exclusive, path })
    }
}

impl Parse for OwnedInput {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let ArityInput { max } = input.parse()?;
        input.parse::<Token![;]>()?;
        let pointers = parse_comma_separated::<OwningPointer>(input)?;
        Ok(OwnedInput { max, pointers })
    }
}

/// Direct-call strategy: `F: FnOnce(A0..An) -> R`.
pub fn expand_direct_invoke(input: ArityInput) -> TokenStream {
    let impls = (0..=input.max).map(|n| {
        let tys = arg_types(0, n);
        let vals = arg_values(0, n);

        quote! {
            impl<__F, __R, #(#tys),*> ::tola_invoke::Invoke<(#(#tys,)*)> for __F
            where
                __F: ::core::ops::FnOnce(#(#tys),*) -> __R,
            {
                type Output = __R;
                type Nothrow = ::tola_invoke::Absent;

                #[inline(always)]
                fn invoke(self, (#(#vals,)*): (#(#tys,)*)) -> __R {
                    self(#(#vals),*)
                }
            }
        }
    });

    quote! { #(#impls)* }
}

/// Member-pointer strategy on borrowed receivers.
///
/// The receiver's lifetime `'a` reaches the method, so results may borrow
/// from it:
///
/// ```text
/// MemFn<C, F>     (&'a D, ..)      F: FnOnce(&'a C, ..)
/// MemFn<C, F>     (&'a mut D, ..)  F: FnOnce(&'a C, ..)
/// MemFnMut<C, F>  (&'a mut D, ..)  F: FnOnce(&'a mut C, ..)
/// ```
pub fn expand_member_invoke(input: ArityInput) -> TokenStream {
    let impls = (0..=input.max).map(|n| {
        let tys = arg_types(1, n + 1);
        let vals = arg_values(1, n + 1);

        quote! {
            impl<'a, __C: ?Sized + 'a, __D: ?Sized + ::tola_invoke::Upcast<__C>, __F, __R, #(#tys),*>
                ::tola_invoke::Invoke<(&'a __D, #(#tys,)*)> for ::tola_invoke::MemFn<__C, __F>
            where
                __F: ::core::ops::FnOnce(&'a __C, #(#tys),*) -> __R,
            {
                type Output = __R;
                type Nothrow = ::tola_invoke::Absent;

                #[inline(always)]
                fn invoke(self, (receiver, #(#vals,)*): (&'a __D, #(#tys,)*)) -> __R {
                    (self.into_inner())(::tola_invoke::Upcast::<__C>::upcast(receiver), #(#vals),*)
                }
            }

            impl<'a, __C: ?Sized + 'a, __D: ?Sized + ::tola_invoke::Upcast<__C>, __F, __R, #(#tys),*>
                ::tola_invoke::Invoke<(&'a mut __D, #(#tys,)*)> for ::tola_invoke::MemFn<__C, __F>
            where
                __F: ::core::ops::FnOnce(&'a __C, #(#tys),*) -> __R,
            {
                type Output = __R;
                type Nothrow = ::tola_invoke::Absent;

                #[inline(always)]
                fn invoke(self, (receiver, #(#vals,)*): (&'a mut __D, #(#tys,)*)) -> __R {
                    let receiver: &'a __D = receiver;
                    (self.into_inner())(::tola_invoke::Upcast::<__C>::upcast(receiver), #(#vals),*)
                }
            }

            impl<'a, __C: ?Sized + 'a, __D: ?Sized + ::tola_invoke::Upcast<__C>, __F, __R, #(#tys),*>
                ::tola_invoke::Invoke<(&'a mut __D, #(#tys,)*)> for ::tola_invoke::MemFnMut<__C, __F>
            where
                __F: ::core::ops::FnOnce(&'a mut __C, #(#tys),*) -> __R,
            {
                type Output = __R;
                type Nothrow = ::tola_invoke::Absent;

                #[inline(always)]
                fn invoke(self, (receiver, #(#vals,)*): (&'a mut __D, #(#tys,)*)) -> __R {
                    (self.into_inner())(::tola_invoke::Upcast::<__C>::upcast_mut(receiver), #(#vals),*)
                }
            }
        }
    });

    quote! { #(#impls)* }
}

/// Member-pointer strategy on owning pointers.
///
/// The pointer is moved into the call and dropped after it, so the method
/// must work for any borrow (`F: for<'r> FnOnce(&'r C, ..) -> R`).
pub fn expand_owned_member_invoke(input: OwnedInput) -> TokenStream {
    let impls = input.pointers.iter().flat_map(|pointer| {
        let OwningPointer { exclusive, path } = pointer;

        (0..=input.max).map(move |n| {
            let tys = arg_types(1, n + 1);
            let vals = arg_values(1, n + 1);

            if *exclusive {
                quote! {
                    impl<__C: ?Sized, __D: ?Sized, __F, __R, #(#tys),*>
                        ::tola_invoke::Invoke<(#path<__D>, #(#tys,)*)> for ::tola_invoke::MemFnMut<__C, __F>
                    where
                        __F: for<'r> ::core::ops::FnOnce(&'r mut __C, #(#tys),*) -> __R,
                        #path<__D>: ::tola_invoke::ReceiverMut<__C>,
                    {
                        type Output = __R;
                        type Nothrow = ::tola_invoke::Absent;

                        #[inline(always)]
                        fn invoke(self, (mut receiver, #(#vals,)*): (#path<__D>, #(#tys,)*)) -> __R {
                            (self.into_inner())(::tola_invoke::ReceiverMut::receiver_mut(&mut receiver), #(#vals),*)
                        }
                    }
                }
            } else {
                quote! {
                    impl<__C: ?Sized, __D: ?Sized, __F, __R, #(#tys),*>
                        ::tola_invoke::Invoke<(#path<__D>, #(#tys,)*)> for ::tola_invoke::MemFn<__C, __F>
                    where
                        __F: for<'r> ::core::ops::FnOnce(&'r __C, #(#tys),*) -> __R,
                        #path<__D>: ::tola_invoke::Receiver<__C>,
                    {
                        type Output = __R;
                        type Nothrow = ::tola_invoke::Absent;

                        #[inline(always)]
                        fn invoke(self, (receiver, #(#vals,)*): (#path<__D>, #(#tys,)*)) -> __R {
                            (self.into_inner())(::tola_invoke::Receiver::receiver(&receiver), #(#vals),*)
                        }
                    }
                }
            }
        })
    });

    quote! { #(#impls)* }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_impl_per_arity() {
        let direct = expand_direct_invoke(ArityInput { max: 3 }).to_string();
        assert_eq!(direct.matches("FnOnce").count(), 4);

        // (&D, MemFn), (&mut D, MemFn), (&mut D, MemFnMut) per arity.
        let member = expand_member_invoke(ArityInput { max: 2 }).to_string();
        assert_eq!(member.matches("FnOnce").count(), 9);
        assert_eq!(member.matches("upcast_mut").count(), 3);
    }

    #[test]
    fn owned_pointers_split_by_mutability() {
        let input: OwnedInput = syn::parse_quote!(1; Box, Rc, mut Box);
        assert_eq!(input.pointers.len(), 3);
        assert!(input.pointers[2].exclusive);

        let owned = expand_owned_member_invoke(input).to_string();
        assert_eq!(owned.matches("for < 'r >").count(), 6);
        assert_eq!(owned.matches("ReceiverMut <").count(), 2);
    }
}
