use crate::util::{first_type_arg, is_path_ident, quote_str_option, to_element_name};
use darling::{FromDeriveInput, FromField, ast::Data};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{DeriveInput, Error, Ident, Type};

///
/// ElementInput
///

#[derive(FromDeriveInput)]
#[darling(attributes(kml), supports(struct_named))]
struct ElementInput {
    ident: Ident,
    generics: syn::Generics,
    data: Data<(), ElementField>,

    /// Element local name; defaults to the type name.
    #[darling(default)]
    element: Option<String>,

    #[darling(default)]
    ns: Option<String>,
}

///
/// ElementField
///

#[derive(FromField)]
#[darling(attributes(kml))]
struct ElementField {
    ident: Option<Ident>,
    ty: Type,

    #[darling(default)]
    id: bool,

    #[darling(default)]
    skip: bool,

    #[darling(default)]
    name: Option<String>,

    #[darling(default)]
    ns: Option<String>,

    #[darling(default)]
    order: Option<u32>,

    #[darling(default)]
    default: Option<String>,

    #[darling(default)]
    suppress_default: bool,

    #[darling(default)]
    required: bool,

    #[darling(default)]
    codec: Option<String>,
}

///
/// FieldShape
///

enum FieldShape<'a> {
    Leaf(&'a Type),
    Required(&'a Type),
    Many(&'a Type),
    Slot(&'a Type),
    List(&'a Type),
}

fn classify_field(ty: &Type) -> Result<FieldShape<'_>, Error> {
    let inner = || {
        first_type_arg(ty).ok_or_else(|| Error::new_spanned(ty, "expected a type argument"))
    };

    let shape = if is_path_ident(ty, "Leaf") {
        FieldShape::Leaf(inner()?)
    } else if is_path_ident(ty, "Vec") {
        FieldShape::Many(inner()?)
    } else if is_path_ident(ty, "ElementSlot") {
        FieldShape::Slot(inner()?)
    } else if is_path_ident(ty, "ElementList") {
        FieldShape::List(inner()?)
    } else {
        FieldShape::Required(ty)
    };

    Ok(shape)
}

// derive_element
pub fn derive_element(input: TokenStream) -> TokenStream {
    let input: DeriveInput = match syn::parse2(input) {
        Ok(input) => input,
        Err(err) => return err.to_compile_error(),
    };

    match ElementInput::from_derive_input(&input) {
        Ok(parsed) => expand(&parsed).unwrap_or_else(Error::into_compile_error),
        Err(err) => err.write_errors(),
    }
}

fn expand(input: &ElementInput) -> Result<TokenStream, Error> {
    let ident = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(Error::new_spanned(
            &input.generics,
            "Element cannot be derived for generic types",
        ));
    }

    let Data::Struct(fields) = &input.data else {
        return Err(Error::new_spanned(ident, "Element requires a struct"));
    };

    let mut id_field = None;
    let mut helpers = Vec::new();
    let mut defs = Vec::new();

    for (index, field) in fields.iter().enumerate() {
        let Some(field_ident) = field.ident.as_ref() else {
            continue;
        };

        if field.id {
            if id_field.replace(field_ident).is_some() {
                return Err(Error::new_spanned(
                    field_ident,
                    "only one field may be marked #[kml(id)]",
                ));
            }
            continue;
        }
        if field.skip {
            continue;
        }

        let (helper, def) = expand_field(ident, index, field_ident, field)?;
        helpers.push(helper);
        defs.push(def);
    }

    let Some(id_field) = id_field else {
        return Err(Error::new_spanned(
            ident,
            "Element requires one ElementId field marked #[kml(id)]",
        ));
    };

    let element = input
        .element
        .clone()
        .unwrap_or_else(|| ident.to_string());
    let namespace = quote_str_option(input.ns.as_deref());

    Ok(quote! {
        impl ::kmlmap::ownership::Identity for #ident {
            fn element_id(&self) -> ::kmlmap::ownership::ElementId {
                self.#id_field
            }
        }

        impl ::kmlmap::model::Modeled for #ident {
            const ELEMENT_NAME: &'static str = #element;
            const NAMESPACE: ::core::option::Option<&'static str> = #namespace;

            #[allow(clippy::too_many_lines)]
            fn properties() -> ::std::vec::Vec<::kmlmap::descriptor::PropertyDef<Self>> {
                #(#helpers)*

                ::std::vec![#(#defs),*]
            }
        }

        impl ::kmlmap::model::Composite for #ident {
            fn accepts(name: &str) -> bool {
                name == <Self as ::kmlmap::model::Modeled>::ELEMENT_NAME
            }

            fn read(
                view: &dyn ::kmlmap::tree::ElementView,
                reader: &mut ::kmlmap::engine::Reader,
            ) -> ::core::result::Result<Self, ::kmlmap::error::MappingError> {
                ::kmlmap::engine::read_object::<Self>(view, reader)
            }

            fn write(
                &self,
                writer: &mut ::kmlmap::engine::Writer,
            ) -> ::core::result::Result<::kmlmap::tree::Node, ::kmlmap::error::MappingError> {
                ::kmlmap::engine::write_object(self, writer)
            }
        }
    })
}

// One field: its accessor fns and its PropertyDef literal.
fn expand_field(
    owner: &Ident,
    index: usize,
    field_ident: &Ident,
    field: &ElementField,
) -> Result<(TokenStream, TokenStream), Error> {
    let shape = classify_field(&field.ty)?;
    let ident_str = field_ident.to_string();
    let order = field
        .order
        .unwrap_or_else(|| u32::try_from(index).unwrap_or(u32::MAX));
    let namespace = quote_str_option(field.ns.as_deref());
    let default = quote_str_option(field.default.as_deref());
    let suppress_default = field.suppress_default;

    let is_composite = matches!(shape, FieldShape::Slot(_) | FieldShape::List(_));
    if field.required && !matches!(shape, FieldShape::Slot(_)) {
        return Err(Error::new_spanned(
            field_ident,
            "#[kml(required)] applies to ElementSlot fields; plain scalar fields are already required",
        ));
    }
    if field.codec.is_some() && is_composite {
        return Err(Error::new_spanned(
            field_ident,
            "#[kml(codec)] applies to scalar fields only",
        ));
    }

    // scalars are always named; composites default to catch-all
    let name = match (&field.name, is_composite) {
        (Some(name), _) => Some(name.clone()),
        (None, false) => Some(to_element_name(&ident_str)),
        (None, true) => None,
    };
    let name = quote_str_option(name.as_deref());

    let multiplicity = match shape {
        FieldShape::Leaf(_) => quote!(SingleOptional),
        FieldShape::Slot(_) if !field.required => quote!(SingleOptional),
        FieldShape::Required(_) | FieldShape::Slot(_) => quote!(SingleRequired),
        FieldShape::Many(_) | FieldShape::List(_) => quote!(OrderedCollection),
    };

    let (helpers, access) = match shape {
        FieldShape::Leaf(inner) | FieldShape::Required(inner) | FieldShape::Many(inner) => {
            scalar_access(owner, field_ident, &shape, inner, field.codec.as_deref())
        }
        FieldShape::Slot(inner) | FieldShape::List(inner) => {
            composite_access(owner, field_ident, &shape, inner)
        }
    };

    let def = quote! {
        ::kmlmap::descriptor::PropertyDef {
            ident: #ident_str,
            name: #name,
            namespace: #namespace,
            order: #order,
            multiplicity: ::kmlmap::descriptor::Multiplicity::#multiplicity,
            default: #default,
            suppress_default: #suppress_default,
            access: #access,
        }
    };

    Ok((helpers, def))
}

fn scalar_access(
    owner: &Ident,
    field: &Ident,
    shape: &FieldShape<'_>,
    inner: &Type,
    codec: Option<&str>,
) -> (TokenStream, TokenStream) {
    let get_fn = format_ident!("__kml_get_{field}");
    let put_fn = format_ident!("__kml_put_{field}");

    let (tag, fallback) = match codec {
        Some(tag) => (quote!(::kmlmap::codec::ScalarTag::new(#tag)), quote!(None)),
        None => (
            quote!(<#inner as ::kmlmap::codec::Scalar>::TAG),
            quote!(Some(::kmlmap::codec::ScalarCodec::of::<#inner>)),
        ),
    };

    let (get_body, put_body) = match shape {
        FieldShape::Leaf(_) => (
            quote!(obj.#field.get().into_iter().map(|v| v as &dyn ::core::any::Any).collect()),
            quote!(obj.#field.set(value);),
        ),
        FieldShape::Many(_) => (
            quote!(obj.#field.iter().map(|v| v as &dyn ::core::any::Any).collect()),
            quote!(obj.#field.push(value);),
        ),
        _ => (
            quote!(::std::vec![&obj.#field as &dyn ::core::any::Any]),
            quote!(obj.#field = value;),
        ),
    };

    let helpers = quote! {
        fn #get_fn(obj: &#owner) -> ::std::vec::Vec<&dyn ::core::any::Any> {
            #get_body
        }

        fn #put_fn(
            obj: &mut #owner,
            value: ::kmlmap::codec::AnyScalar,
        ) -> ::core::result::Result<(), ::kmlmap::codec::CodecError> {
            let value = ::kmlmap::codec::downcast_scalar::<#inner>(#tag, value)?;
            #put_body

            Ok(())
        }
    };

    let access = quote! {
        ::kmlmap::descriptor::Access::Scalar(::kmlmap::descriptor::ScalarAccess {
            tag: #tag,
            value_type: ::core::any::TypeId::of::<#inner>,
            fallback: #fallback,
            get: #get_fn,
            put: #put_fn,
        })
    };

    (helpers, access)
}

fn composite_access(
    owner: &Ident,
    field: &Ident,
    shape: &FieldShape<'_>,
    inner: &Type,
) -> (TokenStream, TokenStream) {
    let count_fn = format_ident!("__kml_count_{field}");
    let write_fn = format_ident!("__kml_write_{field}");
    let read_fn = format_ident!("__kml_read_{field}");

    let (count_body, children, store) = if matches!(shape, FieldShape::List(_)) {
        (
            quote!(obj.#field.len()),
            quote!(obj.#field.iter()),
            quote!(obj.#field.push(owner, child)?;),
        )
    } else {
        (
            quote!(usize::from(obj.#field.is_some())),
            quote!(obj.#field.get().into_iter()),
            quote!(obj.#field.set(owner, child)?;),
        )
    };

    let helpers = quote! {
        fn #count_fn(obj: &#owner) -> usize {
            #count_body
        }

        fn #write_fn(
            obj: &#owner,
            writer: &mut ::kmlmap::engine::Writer,
        ) -> ::core::result::Result<
            ::std::vec::Vec<::kmlmap::tree::Node>,
            ::kmlmap::error::MappingError,
        > {
            #children.map(|child| writer.write_child(child)).collect()
        }

        fn #read_fn(
            obj: &mut #owner,
            view: &dyn ::kmlmap::tree::ElementView,
            reader: &mut ::kmlmap::engine::Reader,
        ) -> ::core::result::Result<(), ::kmlmap::error::MappingError> {
            if let Some(child) = reader.read_child::<#inner>(view)? {
                let owner = ::kmlmap::ownership::Identity::element_id(obj);
                #store
            }

            Ok(())
        }
    };

    let access = quote! {
        ::kmlmap::descriptor::Access::Composite(::kmlmap::descriptor::CompositeAccess {
            accepts: <#inner as ::kmlmap::model::Composite>::accepts,
            count: #count_fn,
            write: #write_fn,
            read: #read_fn,
        })
    };

    (helpers, access)
}
