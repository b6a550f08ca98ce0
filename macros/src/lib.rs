//! Procedural macros for tola-invoke
//!
//! # Macro API
//!
//! | Macro | Target | Purpose |
//! |-------|--------|---------|
//! | `free_invoke_traits!` | - | Bundle for a free-function name (argument-scope lookup + fallbacks) |
//! | `member_invoke_traits!` | - | Bundle for a method name invoked on a receiver |
//! | `overload_set!` | - | Overload-set trait only (for fallback scopes) |
//! | `#[derive(Upcast)]` | struct | Derived-to-base receivers for `MemFn` |
//!
//! ## Example
//!
//! ```ignore
//! free_invoke_traits!(pub SwapTraits, swap, tola_invoke::generic);
//!
//! struct HasData;
//! impl<'a> Swap<(&'a mut HasData,)> for &'a mut HasData {
//!     type Output = &'static str;
//!     type Nothrow = Absent;
//!     fn swap(self, _: (&'a mut HasData,)) -> &'static str { "user" }
//! }
//!
//! assert_eq!(invoke!(SwapTraits => &mut a, &mut b), "user");
//! ```

use proc_macro::TokenStream;
use syn::parse_macro_input;

// =============================================================================
// Module Declarations (Three-tier: inner / common / user)
// =============================================================================

mod common;
mod inner;
mod user;

// =============================================================================
// Internal Macros (inner/)
// =============================================================================

/// Generate the direct-call `Invoke` impls for `FnOnce` arities `0..=N`.
///
/// # Usage
/// ```ignore
/// impl_direct_invoke!(12);
/// ```
#[proc_macro]
pub fn impl_direct_invoke(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as inner::arity::ArityInput);
    inner::arity::expand_direct_invoke(input).into()
}

/// Generate the member-pointer `Invoke` impls for `MemFn`/`MemFnMut` on
/// borrowed receivers (`&D`, `&mut D`) with `0..=N` arguments after the
/// receiver.
#[proc_macro]
pub fn impl_member_invoke(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as inner::arity::ArityInput);
    inner::arity::expand_member_invoke(input).into()
}

/// Generate the member-pointer `Invoke` impls for owning pointers.
///
/// # Usage
/// ```ignore
/// impl_owned_member_invoke!(11; Box, Rc, Arc, mut Box);
/// ```
#[proc_macro]
pub fn impl_owned_member_invoke(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as inner::arity::OwnedInput);
    inner::arity::expand_owned_member_invoke(input).into()
}

// =============================================================================
// User-facing Macros (user/)
// =============================================================================

/// Create an invoke-traits bundle bound to a free-function name.
///
/// Generates, in the current module:
/// - `trait Name<Rest = ()>`: the argument-scope overload set, implemented on
///   the first argument's type
/// - `BundleInvoke`: the resolved function object (`InvokeTraits::InvokeType`)
/// - one `BundleFallbackN` function object per fallback scope (max 3); a
///   scope's `impl Name for ()` makes the zero-argument call resolvable
/// - `struct Bundle` with a static `invoke` over the argument-scope overloads
///   only (full lookup goes through `invoke!(Bundle => ..)`)
///
/// # Usage
/// ```ignore
/// free_invoke_traits!(pub SwapTraits, swap);
/// free_invoke_traits!(pub SwapTraits, swap, tola_invoke::generic);
/// free_invoke_traits!(pub EncodeTraits, encode as EncodeWith, codec::raw, codec::text);
/// ```
#[proc_macro]
pub fn free_invoke_traits(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as user::FreeTraitsInput);
    match user::expand_free_invoke_traits(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// Create an invoke-traits bundle bound to a member (method) name.
///
/// The generated `trait Name<Args = ()>` is implemented on receiver types:
/// `T` (movable receiver), `&T`, `&mut T`. Overloads that differ only by
/// receiver category stay distinct.
///
/// # Usage
/// ```ignore
/// member_invoke_traits!(pub FooTraits, foo);
///
/// impl Foo<(Car,)> for CanFoo { ... }      // rvalue receiver
/// impl Foo<(Bar,)> for &CanFoo { ... }     // lvalue receiver
///
/// FooTraits::invoke(CanFoo, (Car,));
/// ```
#[proc_macro]
pub fn member_invoke_traits(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as user::MemberTraitsInput);
    user::expand_member_invoke_traits(input).into()
}

/// Declare an overload-set trait without a bundle.
///
/// Used to populate a fallback scope for `free_invoke_traits!`.
///
/// # Usage
/// ```ignore
/// pub mod generic {
///     tola_invoke::overload_set!(pub swap);
///
///     impl<'a, T> Swap<(&'a mut T,)> for &'a mut T { ... }
/// }
/// ```
#[proc_macro]
pub fn overload_set(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as user::OverloadSetInput);
    user::expand_overload_set(input).into()
}

/// Derive `Upcast<Field>` for every field marked `#[upcast]`.
///
/// `#[upcast(Grand, ...)]` additionally derives `Upcast<Grand>` by
/// delegating through the marked field.
///
/// # Usage
/// ```ignore
/// #[derive(Upcast)]
/// struct Square {
///     #[upcast(Base)]
///     shape: Shape,
///     side: f64,
/// }
/// ```
#[proc_macro_derive(Upcast, attributes(upcast))]
pub fn derive_upcast(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as syn::DeriveInput);
    match user::expand_derive_upcast(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
