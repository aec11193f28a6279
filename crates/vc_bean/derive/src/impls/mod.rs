mod interface;
mod proxy;

#[cfg(feature = "auto_register")]
mod auto_register;

use proc_macro2::TokenStream;
use quote::quote;

use crate::bean_trait::BeanTrait;

/// The trait itself followed by everything generated for it.
pub(crate) fn expand(bean_trait: &BeanTrait) -> TokenStream {
    let vc_bean_path = crate::path::vc_bean();

    let item = &bean_trait.item;
    let interface_impl = interface::impl_interface(bean_trait, &vc_bean_path);
    let proxy_impl = proxy::impl_proxy(bean_trait, &vc_bean_path);

    #[cfg(feature = "auto_register")]
    let register = bean_trait
        .flags
        .auto_register
        .then(|| auto_register::impl_auto_register(bean_trait, &vc_bean_path));
    #[cfg(not(feature = "auto_register"))]
    let register: Option<TokenStream> = None;

    quote! {
        #item

        #interface_impl

        #proxy_impl

        #register
    }
}
