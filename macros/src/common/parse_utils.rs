//! Common parsing utilities
//!
//! Shared parsing helpers for consistent syntax across macros.

use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    Ident, Token,
};

// =============================================================================
// Comma-separated List Parsing
// =============================================================================

/// Parse a comma-separated list of items (trailing comma allowed)
pub fn parse_comma_separated<T: Parse>(input: ParseStream) -> syn::Result<Vec<T>> {
    let items = Punctuated::<T, Token![,]>::parse_terminated(input)?;
    Ok(items.into_iter().collect())
}

/// Consume a separating `,`. Returns whether more input follows it.
pub fn parse_separator(input: ParseStream) -> syn::Result<bool> {
    if input.is_empty() {
        return Ok(false);
    }
    input.parse::<Token![,]>()?;
    Ok(!input.is_empty())
}

// =============================================================================
// Name Parsing: `func` or `func as Trait`
// =============================================================================

/// An operation name with an optional trait-name override.
pub struct OperationName {
    pub func: Ident,
    pub rename: Option<Ident>,
}

impl OperationName {
    /// Name of the generated overload-set trait.
    pub fn trait_ident(&self) -> Ident {
        match &self.rename {
            Some(name) => name.clone(),
            None => super::upper_camel(&self.func),
        }
    }
}

impl Parse for OperationName {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let func: Ident = input.parse()?;
        let rename = if input.peek(Token![as]) {
            input.parse::<Token![as]>()?;
            Some(input.parse()?)
        } else {
            None
        };
        Ok(OperationName { func, rename })
    }
}
