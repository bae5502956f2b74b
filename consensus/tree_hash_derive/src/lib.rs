//! `#[derive(TreeHash)]` for SSZ containers.
//!
//! Generates a `TreeHash` impl that merkleizes one chunk per field (each field contributes its
//! own `tree_hash_root()`), in declaration order, via `tree_hash::merkleize_standard`. Fields
//! tagged `#[tree_hash(skip_hashing)]` are omitted entirely.

use quote::quote;
use syn::{parse_macro_input, DeriveInput};

fn should_skip_hashing(field: &syn::Field) -> bool {
    field.attrs.iter().any(|attr| {
        attr.path.is_ident("tree_hash")
            && attr
                .tokens
                .to_string()
                .replace(' ', "")
                .contains("skip_hashing")
    })
}

fn struct_fields(struct_data: &syn::DataStruct) -> Vec<&syn::Field> {
    match &struct_data.fields {
        syn::Fields::Named(fields) => fields.named.iter().collect(),
        _ => panic!("tree_hash_derive only supports structs with named fields"),
    }
}

#[proc_macro_derive(TreeHash, attributes(tree_hash))]
pub fn tree_hash_derive(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let item = parse_macro_input!(input as DeriveInput);

    let name = &item.ident;
    let (impl_generics, ty_generics, where_clause) = item.generics.split_for_impl();

    let struct_data = match &item.data {
        syn::Data::Struct(s) => s,
        _ => panic!("tree_hash_derive only supports structs"),
    };

    let fields = struct_fields(struct_data);
    let idents: Vec<_> = fields
        .iter()
        .filter(|f| !should_skip_hashing(f))
        .map(|f| f.ident.as_ref().expect("named field"))
        .collect();

    let num_leaves = idents.len();

    let output = quote! {
        impl #impl_generics tree_hash::TreeHash for #name #ty_generics #where_clause {
            fn tree_hash_type() -> tree_hash::TreeHashType {
                tree_hash::TreeHashType::Container
            }

            fn tree_hash_packed_encoding(&self) -> Vec<u8> {
                unreachable!("container types are never packed")
            }

            fn tree_hash_packing_factor() -> usize {
                unreachable!("container types are never packed")
            }

            fn tree_hash_root(&self) -> ethereum_types::H256 {
                let mut leaves = Vec::with_capacity(#num_leaves * tree_hash::BYTES_PER_CHUNK);
                #(
                    leaves.extend_from_slice(self.#idents.tree_hash_root().as_bytes());
                )*
                ethereum_types::H256::from_slice(&tree_hash::merkleize_standard(&leaves))
            }
        }
    };

    output.into()
}
