//! Fully qualified paths of std items, for hygienic code generation.
//!
//! Generated code must not depend on what the caller has in scope, so it
//! names prelude items through these absolute paths.

use proc_macro2::TokenStream;
use quote::quote;

/// `::core::convert::Into`
#[inline]
pub fn into() -> TokenStream {
    quote! { ::core::convert::Into }
}

/// `::std::vec`, the macro path.
#[inline]
pub fn vec() -> TokenStream {
    quote! { ::std::vec }
}
