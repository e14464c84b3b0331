use convert_case::{Case, Casing};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{GenericArgument, PathArguments, Type};

/// Quote an optional string as `Some("..")` / `None`.
pub fn quote_str_option(opt: Option<&str>) -> TokenStream {
    opt.map_or_else(|| quote!(None), |s| quote!(Some(#s)))
}

/// `snake_case` field or `PascalCase` variant to the element spelling.
pub fn to_element_name(ident: &str) -> String {
    ident.trim_start_matches("r#").to_case(Case::Camel)
}

pub fn is_path_ident(ty: &Type, ident: &str) -> bool {
    let Type::Path(path) = ty else {
        return false;
    };

    path.path
        .segments
        .last()
        .is_some_and(|segment| segment.ident == ident)
}

/// First generic type argument of the last path segment, e.g. `T` in
/// `Leaf<T>`.
pub fn first_type_arg(ty: &Type) -> Option<&Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    let PathArguments::AngleBracketed(args) = &path.path.segments.last()?.arguments else {
        return None;
    };

    args.args.iter().find_map(|arg| match arg {
        GenericArgument::Type(ty) => Some(ty),
        _ => None,
    })
}
