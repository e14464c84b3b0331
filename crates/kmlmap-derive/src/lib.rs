//! Derive macros for kmlmap.
//!
//! `#[derive(Element)]` turns a struct with named fields into a modeled
//! type with a property descriptor table. `#[derive(Token)]` turns a unit
//! enum into a scalar that reads and writes a closed set of tokens.

use proc_macro::TokenStream;

mod element;
mod token;
mod util;

#[proc_macro_derive(Element, attributes(kml))]
pub fn derive_element(input: TokenStream) -> TokenStream {
    element::derive_element(input.into()).into()
}

#[proc_macro_derive(Token, attributes(kml))]
pub fn derive_token(input: TokenStream) -> TokenStream {
    token::derive_token(input.into()).into()
}
