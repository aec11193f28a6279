use proc_macro2::TokenStream;
use quote::quote;

use crate::bean_trait::{BeanMethod, BeanTrait};
use crate::path::info_;

pub(crate) fn impl_interface(bean_trait: &BeanTrait, vc_bean_path: &syn::Path) -> TokenStream {
    let info_ = info_(vc_bean_path);
    let ident = &bean_trait.item.ident;

    let extends = bean_trait.supertraits.iter().map(|path| {
        quote! { .extends::<dyn #path>() }
    });
    let methods = bean_trait
        .methods
        .iter()
        .map(|method| method_signature(method, &info_));

    quote! {
        impl #info_::Interface for dyn #ident {
            fn interface_info() -> &'static #info_::InterfaceInfo {
                static INFO: #info_::InterfaceInfoCell = #info_::InterfaceInfoCell::new();
                INFO.get_or_init(|| {
                    #info_::InterfaceInfo::builder::<Self>()
                        #(#extends)*
                        #(#methods)*
                        .build()
                })
            }
        }
    }
}

fn method_signature(method: &BeanMethod, info_: &TokenStream) -> TokenStream {
    let name = method.ident.to_string();
    let last = method.args.len().saturating_sub(1);

    let params = method.args.iter().enumerate().map(|(index, (_, ty))| {
        match (&method.property_type, &method.value_ty) {
            (Some(expr), None) if index == last => quote! { .param(#expr) },
            _ => quote! { .param(<#ty as #info_::ValueType>::property_type()) },
        }
    });

    let ret = match (&method.property_type, &method.value_ty) {
        (Some(expr), Some(_)) => quote! { .returns(#expr) },
        (None, Some(ty)) => quote! { .returns(<#ty as #info_::ValueType>::property_type()) },
        (_, None) => TokenStream::new(),
    };

    quote! {
        .method(#info_::MethodSignature::new(#name) #(#params)* #ret)
    }
}
