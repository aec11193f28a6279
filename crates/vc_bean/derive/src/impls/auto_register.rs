use proc_macro2::TokenStream;
use quote::quote;

use crate::bean_trait::BeanTrait;
use crate::path::auto_register_;

pub(crate) fn impl_auto_register(bean_trait: &BeanTrait, vc_bean_path: &syn::Path) -> TokenStream {
    let auto_register_ = auto_register_(vc_bean_path);
    let ident = &bean_trait.item.ident;

    quote! {
        #auto_register_::inventory::submit! {
            #auto_register_::AutoRegisterInterface(
                #vc_bean_path::info::InterfaceRef::of::<dyn #ident>
            )
        }
    }
}
