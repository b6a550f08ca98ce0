// Common utilities shared between internal and user-facing macros
//
// This module contains:
// - naming: identifier derivation (overload trait names, argument idents)
// - parse_utils: Common parsing helpers

mod naming;
mod parse_utils;

pub use naming::*;
pub use parse_utils::*;
