use proc_macro2::TokenStream;
use quote::quote;
use vc_macro_utils::full_path;

use crate::bean_trait::BeanTrait;
use crate::path::macro_exports_;

/// `impl Trait for Bean`, every method forwarding to `Bean::invoke`.
pub(crate) fn impl_proxy(bean_trait: &BeanTrait, vc_bean_path: &syn::Path) -> TokenStream {
    let macro_exports_ = macro_exports_(vc_bean_path);
    let into_ = full_path::into();
    let vec_ = full_path::vec();
    let ident = &bean_trait.item.ident;

    let methods = bean_trait.methods.iter().map(|method| {
        let name = &method.ident;
        let name_str = name.to_string();
        let output = &method.output;
        let arg_idents = method.args.iter().map(|(ident, _)| ident);
        let arg_tys = method.args.iter().map(|(_, ty)| ty);
        let values = method.args.iter().map(|(ident, _)| {
            quote! { #vc_bean_path::Value::from(#ident) }
        });

        quote! {
            fn #name(&self #(, #arg_idents: #arg_tys)*) -> #output {
                #macro_exports_::invoke(self, #name_str, #vec_![#(#values),*])
                    .map_err(#into_::into)
            }
        }
    });

    quote! {
        impl #ident for #vc_bean_path::Bean {
            #(#methods)*
        }
    }
}
