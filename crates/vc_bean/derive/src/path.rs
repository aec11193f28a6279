//! Paths of `vc_bean` items as seen from the expanding crate.

use proc_macro2::TokenStream;
use quote::quote;

/// The path of the `vc_bean` crate.
///
/// `::vc_bean` for direct dependents, `::dynbean::bean` for users of the
/// facade. Reading the manifest is not free, so this is called once per
/// expansion and passed around.
pub(crate) fn vc_bean() -> syn::Path {
    vc_macro_utils::Manifest::shared(|manifest| manifest.get_crate_path("vc_bean"))
}

#[inline(always)]
pub(crate) fn info_(vc_bean_path: &syn::Path) -> TokenStream {
    quote! { #vc_bean_path::info }
}

#[inline(always)]
pub(crate) fn macro_exports_(vc_bean_path: &syn::Path) -> TokenStream {
    quote! { #vc_bean_path::__macro_exports }
}

#[cfg(feature = "auto_register")]
#[inline(always)]
pub(crate) fn auto_register_(vc_bean_path: &syn::Path) -> TokenStream {
    quote! { #vc_bean_path::__macro_exports::auto_register }
}
