//! User-facing macro implementations
//!
//! | Macro | Usage | Purpose |
//! |-------|-------|---------|
//! | `free_invoke_traits!` | function macro | Bundle for a free-function name |
//! | `member_invoke_traits!` | function macro | Bundle for a method name |
//! | `overload_set!` | function macro | Overload-set trait only |
//! | `#[derive(Upcast)]` | on struct | Derived-to-base receiver conversion |

mod bundle;
mod upcast;

pub use bundle::{
    expand_free_invoke_traits, expand_member_invoke_traits, expand_overload_set,
    FreeTraitsInput, MemberTraitsInput, OverloadSetInput,
};
pub use upcast::expand_derive_upcast;
