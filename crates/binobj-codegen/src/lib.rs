// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

extern crate proc_macro;

use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{parse_macro_input, Data, DeriveInput, Fields, LitStr};

/// Size of a binobj type identifier in bytes (must match `binobj::config::TYPE_ID_SIZE`).
const TYPE_ID_SIZE: usize = 20;

/// Container-level `#[codec(...)]` options
#[derive(Default)]
struct ContainerAttrs {
    id: Option<[u8; TYPE_ID_SIZE]>,
    name: Option<String>,
}

/// One field to encode/decode, in declaration order
struct FieldInfo {
    /// `self.<access>` for encoding
    access: proc_macro2::TokenStream,
    /// Local binding used while decoding
    binding: syn::Ident,
    /// Named field ident (None for tuple structs)
    ident: Option<syn::Ident>,
    ty: syn::Type,
    skip: bool,
}

/// `#[derive(Codec)]` macro: generates field-by-field `Encode`/`Decode` impls
///
/// Fields are written in declaration order with no padding and no type id;
/// each field type must itself implement `Encode`/`Decode`. Nested
/// `Vec<T>` fields become count-prefixed arrays, `Box<dyn BinaryObject>`
/// fields are written polymorphically (type id first).
///
/// Attributes:
/// - `#[codec(id = "<40 hex digits>")]` also implements `BinaryClass`
///   (requires `Default` and `Debug`), making the type registrable
/// - `#[codec(name = "pkg.Type")]` overrides the diagnostic name
/// - `#[codec(skip)]` on a field leaves it off the wire; it decodes as
///   `Default::default()`
///
/// Example:
/// ```ignore
/// use binobj::Codec;
///
/// #[derive(Codec, Debug, Default)]
/// #[codec(id = "a3a1e4f0c2b5d6e7f8091a2b3c4d5e6f70819203", name = "atom.Observation")]
/// struct Observation {
///     base: u64,
///     size: u32,
///     pool: String,
/// }
/// ```
#[proc_macro_derive(Codec, attributes(codec))]
pub fn derive_codec(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let attrs = parse_container_attrs(input)?;

    let data = match &input.data {
        Data::Struct(data) => data,
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "Codec can only be derived for structs",
            ))
        }
    };

    let fields = collect_fields(&data.fields)?;

    let encode_fields: Vec<_> = fields
        .iter()
        .filter(|f| !f.skip)
        .map(|f| {
            let access = &f.access;
            quote! {
                ::binobj::Encode::encode(&self.#access, enc)?;
            }
        })
        .collect();

    let decode_fields: Vec<_> = fields
        .iter()
        .map(|f| {
            let binding = &f.binding;
            let ty = &f.ty;
            if f.skip {
                quote! {
                    let #binding: #ty = ::core::default::Default::default();
                }
            } else {
                quote! {
                    let #binding = <#ty as ::binobj::Decode>::decode(dec)?;
                }
            }
        })
        .collect();

    let construct = match &data.fields {
        Fields::Named(_) => {
            let inits = fields.iter().map(|f| {
                let ident = &f.ident;
                let binding = &f.binding;
                quote! { #ident: #binding }
            });
            quote! { Self { #(#inits),* } }
        }
        Fields::Unnamed(_) => {
            let bindings = fields.iter().map(|f| &f.binding);
            quote! { Self(#(#bindings),*) }
        }
        Fields::Unit => quote! { Self },
    };

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let encode_param = if encode_fields.is_empty() {
        quote! { _enc }
    } else {
        quote! { enc }
    };
    let decode_param = if fields.iter().any(|f| !f.skip) {
        quote! { dec }
    } else {
        quote! { _dec }
    };

    let mut expanded = quote! {
        impl #impl_generics ::binobj::Encode for #name #ty_generics #where_clause {
            fn encode(&self, #encode_param: &mut ::binobj::ser::Encoder<'_>) -> ::binobj::Result<()> {
                #(#encode_fields)*
                Ok(())
            }
        }

        impl #impl_generics ::binobj::Decode for #name #ty_generics #where_clause {
            fn decode(#decode_param: &mut ::binobj::ser::Decoder<'_>) -> ::binobj::Result<Self> {
                #(#decode_fields)*
                Ok(#construct)
            }
        }
    };

    if let Some(id) = attrs.id {
        if !input.generics.params.is_empty() {
            return Err(syn::Error::new_spanned(
                &input.generics,
                "#[codec(id = ...)] cannot be used on generic types",
            ));
        }
        let type_name = attrs.name.unwrap_or_else(|| name.to_string());
        let id_bytes = id.iter();
        expanded.extend(quote! {
            impl ::binobj::BinaryClass for #name {
                const ID: ::binobj::TypeId = ::binobj::TypeId::from_bytes([#(#id_bytes),*]);
                const NAME: &'static str = #type_name;
            }
        });
    } else if let Some(type_name) = attrs.name {
        return Err(syn::Error::new_spanned(
            name,
            format!("#[codec(name = {type_name:?})] requires #[codec(id = ...)]"),
        ));
    }

    Ok(expanded)
}

fn parse_container_attrs(input: &DeriveInput) -> syn::Result<ContainerAttrs> {
    let mut attrs = ContainerAttrs::default();
    for attr in input.attrs.iter().filter(|a| a.path().is_ident("codec")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("id") {
                let lit: LitStr = meta.value()?.parse()?;
                attrs.id = Some(parse_hex_id(&lit)?);
                Ok(())
            } else if meta.path.is_ident("name") {
                let lit: LitStr = meta.value()?.parse()?;
                attrs.name = Some(lit.value());
                Ok(())
            } else {
                Err(meta.error("unsupported codec attribute (expected `id` or `name`)"))
            }
        })?;
    }
    Ok(attrs)
}

fn collect_fields(fields: &Fields) -> syn::Result<Vec<FieldInfo>> {
    let mut infos = Vec::new();
    for (index, field) in fields.iter().enumerate() {
        let mut skip = false;
        for attr in field.attrs.iter().filter(|a| a.path().is_ident("codec")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") {
                    skip = true;
                    Ok(())
                } else {
                    Err(meta.error("unsupported field attribute (expected `skip`)"))
                }
            })?;
        }

        let (access, binding) = match &field.ident {
            Some(ident) => (quote! { #ident }, format_ident!("__field_{}", ident)),
            None => {
                let idx = syn::Index::from(index);
                (quote! { #idx }, format_ident!("__field_{}", index))
            }
        };

        infos.push(FieldInfo {
            access,
            binding,
            ident: field.ident.clone(),
            ty: field.ty.clone(),
            skip,
        });
    }
    Ok(infos)
}

/// Parse a 40-digit hex string into identifier bytes at compile time
fn parse_hex_id(lit: &LitStr) -> syn::Result<[u8; TYPE_ID_SIZE]> {
    let value = lit.value();
    let digits = value.trim();
    if digits.len() != TYPE_ID_SIZE * 2 || !digits.is_ascii() {
        return Err(syn::Error::new_spanned(
            lit,
            format!("type id must be exactly {} hex digits", TYPE_ID_SIZE * 2),
        ));
    }

    let mut bytes = [0u8; TYPE_ID_SIZE];
    for (i, byte) in bytes.iter_mut().enumerate() {
        *byte = u8::from_str_radix(&digits[i * 2..i * 2 + 2], 16)
            .map_err(|_| syn::Error::new_spanned(lit, "type id contains non-hex characters"))?;
    }
    Ok(bytes)
}
