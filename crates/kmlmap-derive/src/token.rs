use crate::util::to_element_name;
use darling::{FromDeriveInput, FromVariant, ast::Data};
use proc_macro2::TokenStream;
use quote::quote;
use std::collections::HashSet;
use syn::{DeriveInput, Error, Ident};

///
/// TokenInput
///

#[derive(FromDeriveInput)]
#[darling(attributes(kml), supports(enum_unit))]
struct TokenInput {
    ident: Ident,
    data: Data<TokenVariant, ()>,

    /// Scalar tag; defaults to the enum name in lowerCamelCase.
    #[darling(default)]
    tag: Option<String>,
}

///
/// TokenVariant
///

#[derive(FromVariant)]
#[darling(attributes(kml))]
struct TokenVariant {
    ident: Ident,

    #[darling(default)]
    token: Option<String>,
}

impl TokenVariant {
    fn token(&self) -> String {
        self.token
            .clone()
            .unwrap_or_else(|| to_element_name(&self.ident.to_string()))
    }
}

// derive_token
pub fn derive_token(input: TokenStream) -> TokenStream {
    let input: DeriveInput = match syn::parse2(input) {
        Ok(input) => input,
        Err(err) => return err.to_compile_error(),
    };

    match TokenInput::from_derive_input(&input) {
        Ok(parsed) => expand(&parsed).unwrap_or_else(Error::into_compile_error),
        Err(err) => err.write_errors(),
    }
}

fn expand(input: &TokenInput) -> Result<TokenStream, Error> {
    let ident = &input.ident;
    let Data::Enum(variants) = &input.data else {
        return Err(Error::new_spanned(ident, "Token requires an enum"));
    };
    if variants.is_empty() {
        return Err(Error::new_spanned(ident, "Token requires at least one variant"));
    }

    let mut seen = HashSet::new();
    let mut encode_arms = Vec::new();
    let mut decode_arms = Vec::new();

    for variant in variants {
        let variant_ident = &variant.ident;
        let token = variant.token();

        if !seen.insert(token.clone()) {
            return Err(Error::new_spanned(
                variant_ident,
                format!("token '{token}' is used by more than one variant"),
            ));
        }

        encode_arms.push(quote!(Self::#variant_ident => #token));
        decode_arms.push(quote!(#token => Ok(Self::#variant_ident)));
    }

    let tag = input
        .tag
        .clone()
        .unwrap_or_else(|| to_element_name(&ident.to_string()));
    let tokens = variants.iter().map(TokenVariant::token);

    Ok(quote! {
        impl #ident {
            /// Every accepted token, in declaration order.
            pub const TOKENS: &'static [&'static str] = &[#(#tokens),*];

            #[must_use]
            pub const fn as_token(&self) -> &'static str {
                match self {
                    #(#encode_arms),*
                }
            }
        }

        impl ::kmlmap::codec::Scalar for #ident {
            const TAG: ::kmlmap::codec::ScalarTag = ::kmlmap::codec::ScalarTag::new(#tag);

            fn encode(&self) -> ::std::string::String {
                self.as_token().to_string()
            }

            fn decode(
                text: &str,
            ) -> ::core::result::Result<Self, ::kmlmap::codec::CodecError> {
                match text.trim() {
                    #(#decode_arms,)*
                    _ => Err(::kmlmap::codec::CodecError::unrecognized(
                        <Self as ::kmlmap::codec::Scalar>::TAG,
                        text,
                    )),
                }
            }
        }
    })
}
