//! Identifier derivation for generated items.

use proc_macro2::{Ident, Span};
use quote::format_ident;

/// `swap` -> `Swap`, `to_bytes` -> `ToBytes`, `r#type` -> `Type`.
pub fn upper_camel(ident: &Ident) -> Ident {
    let name = ident.to_string();
    let name = name.trim_start_matches("r#");

    let mut out = String::with_capacity(name.len());
    let mut upper = true;
    for ch in name.chars() {
        if ch == '_' {
            upper = true;
            continue;
        }
        if upper {
            out.extend(ch.to_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }

    Ident::new(&out, ident.span())
}

/// Type parameters `A{from}..A{to}` (exclusive).
pub fn arg_types(from: usize, to: usize) -> Vec<Ident> {
    (from..to).map(|i| format_ident!("A{}", i)).collect()
}

/// Value bindings `a{from}..a{to}` (exclusive).
pub fn arg_values(from: usize, to: usize) -> Vec<Ident> {
    (from..to)
        .map(|i| Ident::new(&format!("a{}", i), Span::call_site()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_case_names() {
        let cases = [
            ("swap", "Swap"),
            ("to_bytes", "ToBytes"),
            ("__private", "Private"),
            ("already", "Already"),
        ];
        for (input, expected) in cases {
            let ident = Ident::new(input, Span::call_site());
            assert_eq!(upper_camel(&ident).to_string(), expected);
        }
    }

    #[test]
    fn raw_idents_lose_prefix() {
        let ident = Ident::new_raw("type", Span::call_site());
        assert_eq!(upper_camel(&ident).to_string(), "Type");
    }

    #[test]
    fn arg_ident_ranges() {
        let tys: Vec<String> = arg_types(1, 4).iter().map(|i| i.to_string()).collect();
        assert_eq!(tys, ["A1", "A2", "A3"]);
        assert!(arg_values(0, 0).is_empty());
    }
}
