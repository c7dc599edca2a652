//! Code generation for `#[derive(Describe)]`.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{
    parse_quote, spanned::Spanned, Data, DataEnum, DeriveInput, Fields, FieldsNamed, Generics,
};

use crate::crate_path::schema_path;
use crate::parse::{doc_comment, unraw, ContainerAttrs, FieldAttrs};

/// Expands the derive for one item.
pub fn expand_describe(input: &DeriveInput) -> syn::Result<TokenStream> {
    if let Some(lifetime) = input.generics.lifetimes().next() {
        return Err(syn::Error::new(
            lifetime.span(),
            "Describe cannot be derived for types with lifetime parameters",
        ));
    }

    let krate = schema_path();
    let container = ContainerAttrs::from_attrs(&input.attrs)?;
    let ident = &input.ident;
    let generics = add_bounds(input.generics.clone(), &krate);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let type_name_fn = container.rename.as_ref().filter(|n| !n.is_empty()).map(|name| {
        quote! {
            fn type_name() -> ::std::borrow::Cow<'static, str> {
                ::std::borrow::Cow::Borrowed(#name)
            }
        }
    });

    let body = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) if container.transparent => transparent(fields, &krate)?,
            Fields::Named(fields) => named_struct(fields, &container, &krate)?,
            Fields::Unnamed(fields) if fields.unnamed.len() == 1 => {
                let inner = &fields.unnamed[0].ty;
                newtype(inner, &krate)
            }
            Fields::Unnamed(_) => unsupported("tuple struct", &krate),
            Fields::Unit => {
                return Err(syn::Error::new(
                    ident.span(),
                    "Describe cannot be derived for unit structs; use `()` for an empty body",
                ))
            }
        },
        Data::Enum(_) if container.tagged => {
            unsupported("internally, adjacently or untagged enum", &krate)
        }
        Data::Enum(data) => unit_enum(data, &container, &krate)?,
        Data::Union(data) => {
            return Err(syn::Error::new(
                data.union_token.span(),
                "Describe cannot be derived for unions",
            ))
        }
    };

    Ok(quote! {
        impl #impl_generics #krate::Describe for #ident #ty_generics #where_clause {
            #type_name_fn
            #body
        }
    })
}

/// Every type parameter must itself be describable.
fn add_bounds(mut generics: Generics, krate: &TokenStream) -> Generics {
    for param in generics.type_params_mut() {
        param.bounds.push(parse_quote!(#krate::Describe));
    }
    generics
}

fn named_struct(
    fields: &FieldsNamed,
    container: &ContainerAttrs,
    krate: &TokenStream,
) -> syn::Result<TokenStream> {
    let mut inserts = Vec::new();

    for field in &fields.named {
        let attrs = FieldAttrs::from_attrs(&field.attrs)?;
        if attrs.flatten {
            return Err(syn::Error::new(
                field.span(),
                "#[serde(flatten)] is not supported by Describe",
            ));
        }
        if attrs.skip {
            continue;
        }

        let declared = field.ident.as_ref().map(unraw).unwrap_or_default();
        let name = attrs.published_name(&declared, container.rename_all);
        let ty = &field.ty;

        let mut expr = quote!(inspector.field::<#ty>());
        if attrs.optional || container.default {
            expr = quote!(#expr.optional());
        }
        if let Some(doc) = doc_comment(&field.attrs) {
            expr = quote!(#expr.with_description(#doc));
        }
        inserts.push(quote!(object.insert(#name, #expr);));
    }

    let param = if inserts.is_empty() {
        quote!(_)
    } else {
        quote!(inspector)
    };

    Ok(quote! {
        fn describe(inspector: &mut #krate::Inspector) -> #krate::SchemaDescription {
            inspector.named::<Self, _>(|#param| {
                #[allow(unused_mut)]
                let mut object = #krate::ObjectSchema::new();
                #(#inserts)*
                #krate::SchemaDescription::Object(object)
            })
        }
    })
}

fn transparent(fields: &FieldsNamed, krate: &TokenStream) -> syn::Result<TokenStream> {
    let mut kept = Vec::new();
    for field in &fields.named {
        if !FieldAttrs::from_attrs(&field.attrs)?.skip {
            kept.push(field);
        }
    }
    match kept.as_slice() {
        [field] => Ok(newtype(&field.ty, krate)),
        _ => Err(syn::Error::new(
            fields.span(),
            "#[serde(transparent)] requires exactly one non-skipped field",
        )),
    }
}

fn newtype(inner: &syn::Type, krate: &TokenStream) -> TokenStream {
    quote! {
        const OPTIONAL: bool = <#inner as #krate::Describe>::OPTIONAL;

        fn describe(inspector: &mut #krate::Inspector) -> #krate::SchemaDescription {
            inspector.describe::<#inner>()
        }
    }
}

fn unit_enum(
    data: &DataEnum,
    container: &ContainerAttrs,
    krate: &TokenStream,
) -> syn::Result<TokenStream> {
    let mut names = Vec::new();

    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Ok(unsupported("enum with data-carrying variants", krate));
        }
        let attrs = FieldAttrs::from_attrs(&variant.attrs)?;
        if attrs.skip {
            continue;
        }
        let declared = unraw(&variant.ident);
        let name = match attrs.rename.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => container
                .rename_all
                .map_or_else(|| declared.clone(), |rule| rule.apply_to_variant(&declared)),
        };
        names.push(name);
    }

    Ok(quote! {
        fn describe(inspector: &mut #krate::Inspector) -> #krate::SchemaDescription {
            inspector.named::<Self, _>(|_| {
                #krate::SchemaDescription::Enumeration(
                    ::std::vec![#(::std::string::String::from(#names)),*]
                )
            })
        }
    })
}

fn unsupported(reason: &str, krate: &TokenStream) -> TokenStream {
    quote! {
        fn describe(_inspector: &mut #krate::Inspector) -> #krate::SchemaDescription {
            #krate::SchemaDescription::unsupported(::std::any::type_name::<Self>(), #reason)
        }
    }
}
