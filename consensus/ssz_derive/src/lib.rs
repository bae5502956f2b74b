//! `#[derive(Encode)]` / `#[derive(Decode)]` for SSZ containers.
//!
//! Generates the offset-table logic for SSZ containers from a struct's
//! field list, in declaration order, using `ssz::SszEncoder` /
//! `ssz::SszDecoderBuilder` as the runtime support the macro expands into.

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields};

#[proc_macro_derive(Encode)]
pub fn derive_encode(input: TokenStream) -> TokenStream {
    let item = parse_macro_input!(input as DeriveInput);
    let name = &item.ident;
    let (impl_generics, ty_generics, where_clause) = item.generics.split_for_impl();

    let fields = match struct_fields(&item.data) {
        Ok(fields) => fields,
        Err(e) => return e.to_compile_error().into(),
    };

    let field_idents: Vec<_> = fields.iter().map(|f| f.ident.clone().unwrap()).collect();
    let field_types: Vec<_> = fields.iter().map(|f| f.ty.clone()).collect();

    let output = quote! {
        impl #impl_generics ssz::Encode for #name #ty_generics #where_clause {
            fn is_ssz_fixed_len() -> bool {
                #( <#field_types as ssz::Encode>::is_ssz_fixed_len() && )* true
            }

            fn ssz_bytes_len(&self) -> usize {
                if <Self as ssz::Encode>::is_ssz_fixed_len() {
                    #( <#field_types as ssz::Encode>::ssz_fixed_len() + )* 0
                } else {
                    let mut len = 0;
                    #(
                        len += if <#field_types as ssz::Encode>::is_ssz_fixed_len() {
                            <#field_types as ssz::Encode>::ssz_fixed_len()
                        } else {
                            self.#field_idents.ssz_bytes_len() + ssz::BYTES_PER_LENGTH_OFFSET
                        };
                    )*
                    len
                }
            }

            fn ssz_append(&self, buf: &mut Vec<u8>) {
                let offset = #(
                    <#field_types as ssz::Encode>::ssz_fixed_len_or(ssz::BYTES_PER_LENGTH_OFFSET) +
                )* 0;
                let mut encoder = ssz::SszEncoder::container(buf, offset);
                #(
                    encoder.append(&self.#field_idents);
                )*
                buf.extend_from_slice(&encoder.finalize());
            }
        }
    };

    output.into()
}

#[proc_macro_derive(Decode)]
pub fn derive_decode(input: TokenStream) -> TokenStream {
    let item = parse_macro_input!(input as DeriveInput);
    let name = &item.ident;
    let (impl_generics, ty_generics, where_clause) = item.generics.split_for_impl();

    let fields = match struct_fields(&item.data) {
        Ok(fields) => fields,
        Err(e) => return e.to_compile_error().into(),
    };

    let field_idents: Vec<_> = fields.iter().map(|f| f.ident.clone().unwrap()).collect();
    let field_types: Vec<_> = fields.iter().map(|f| f.ty.clone()).collect();

    let output = quote! {
        impl #impl_generics ssz::Decode for #name #ty_generics #where_clause {
            fn is_ssz_fixed_len() -> bool {
                #( <#field_types as ssz::Decode>::is_ssz_fixed_len() && )* true
            }

            fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, ssz::DecodeError> {
                let mut builder = ssz::SszDecoderBuilder::new(bytes);
                #(
                    builder.register_type::<#field_types>()?;
                )*
                let mut decoder = builder.build()?;
                Ok(Self {
                    #(
                        #field_idents: decoder.decode_next()?,
                    )*
                })
            }
        }
    };

    output.into()
}

fn struct_fields(data: &Data) -> syn::Result<Vec<syn::Field>> {
    match data {
        Data::Struct(s) => match &s.fields {
            Fields::Named(named) => Ok(named.named.iter().cloned().collect()),
            _ => Err(syn::Error::new_spanned(
                &s.fields,
                "ssz_derive only supports structs with named fields",
            )),
        },
        _ => Err(syn::Error::new(
            proc_macro2::Span::call_site(),
            "ssz_derive only supports structs",
        )),
    }
}
