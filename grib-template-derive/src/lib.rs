use proc_macro::TokenStream;
use quote::quote;

/// Derives `grib_template_helpers::TryFromSlice`, reading named fields in
/// declaration order.
#[proc_macro_derive(TryFromSlice)]
pub fn derive_try_from_slice(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as syn::DeriveInput);
    impl_try_from_slice(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Derives `grib_template_helpers::WriteToBuf`, writing named fields in
/// declaration order.
#[proc_macro_derive(WriteToBuf)]
pub fn derive_write_to_buf(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as syn::DeriveInput);
    impl_write_to_buf(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn impl_try_from_slice(input: &syn::DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let fields = named_fields(input)?;

    Ok(quote! {
        impl #impl_generics grib_template_helpers::TryFromSlice for #ident #ty_generics
        #where_clause
        {
            fn try_from_slice(
                __slice: &[u8],
                __pos: &mut usize,
            ) -> grib_template_helpers::TryFromSliceResult<Self> {
                #(
                    let #fields = grib_template_helpers::TryFromSlice::try_from_slice(
                        __slice, __pos,
                    )?;
                )*
                Ok(Self { #(#fields),* })
            }
        }
    })
}

fn impl_write_to_buf(input: &syn::DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let fields = named_fields(input)?;

    Ok(quote! {
        impl #impl_generics grib_template_helpers::WriteToBuf for #ident #ty_generics
        #where_clause
        {
            fn write_to_buf(&self, __buf: &mut Vec<u8>) {
                #(
                    grib_template_helpers::WriteToBuf::write_to_buf(&self.#fields, __buf);
                )*
            }
        }
    })
}

fn named_fields(input: &syn::DeriveInput) -> syn::Result<Vec<&syn::Ident>> {
    match &input.data {
        syn::Data::Struct(ds) => match &ds.fields {
            syn::Fields::Named(fields) => Ok(fields
                .named
                .iter()
                .filter_map(|f| f.ident.as_ref())
                .collect()),
            _ => Err(syn::Error::new_spanned(
                &input.ident,
                "only structs with named fields are supported",
            )),
        },
        _ => Err(syn::Error::new_spanned(
            &input.ident,
            "only structs with named fields are supported",
        )),
    }
}
