use proc_macro2::Ident;
use quote::format_ident;
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::{
    Attribute, Expr, FnArg, GenericArgument, ItemTrait, Pat, PathArguments, ReturnType, Token,
    TraitItem, TraitItemFn, Type, TypeParamBound,
};

use crate::BEAN_ATTRIBUTE_NAME;

// -----------------------------------------------------------------------------
// Flags

/// Arguments of the `#[bean(...)]` attribute placed on the trait.
#[derive(Default)]
pub(crate) struct TraitFlags {
    /// Inert without the `auto_register` feature.
    #[cfg_attr(not(feature = "auto_register"), allow(dead_code))]
    pub auto_register: bool,
}

impl Parse for TraitFlags {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut flags = TraitFlags::default();
        let idents = Punctuated::<Ident, Token![,]>::parse_terminated(input)?;
        for ident in idents {
            if ident == "auto_register" {
                flags.auto_register = true;
            } else {
                return Err(syn::Error::new(
                    ident.span(),
                    format!("unknown `{BEAN_ATTRIBUTE_NAME}` flag `{ident}`"),
                ));
            }
        }
        Ok(flags)
    }
}

// -----------------------------------------------------------------------------
// Trait

pub(crate) struct BeanTrait {
    /// The trait as it is re-emitted, helper attributes removed.
    pub item: ItemTrait,
    pub methods: Vec<BeanMethod>,
    pub supertraits: Vec<syn::Path>,
    #[cfg_attr(not(feature = "auto_register"), allow(dead_code))]
    pub flags: TraitFlags,
}

pub(crate) struct BeanMethod {
    pub ident: Ident,
    pub args: Vec<(Ident, Type)>,
    pub output: Type,
    /// `None` for `Result<()>`.
    pub value_ty: Option<Type>,
    pub property_type: Option<Expr>,
}

impl BeanTrait {
    pub fn parse(mut item: ItemTrait, flags: TraitFlags) -> syn::Result<Self> {
        if !item.generics.params.is_empty() || item.generics.where_clause.is_some() {
            return Err(syn::Error::new_spanned(
                &item.generics,
                "bean interfaces cannot be generic",
            ));
        }
        if let Some(unsafety) = &item.unsafety {
            return Err(syn::Error::new_spanned(unsafety, "bean interfaces cannot be unsafe"));
        }

        let supertraits = item
            .supertraits
            .iter()
            .filter_map(|bound| match bound {
                TypeParamBound::Trait(bound) => Some(bound.path.clone()),
                _ => None,
            })
            .collect();

        let mut methods = Vec::with_capacity(item.items.len());
        for trait_item in &mut item.items {
            match trait_item {
                TraitItem::Fn(method) => methods.push(BeanMethod::parse(method)?),
                other => {
                    return Err(syn::Error::new_spanned(
                        other,
                        "bean interfaces can only declare methods",
                    ));
                }
            }
        }

        Ok(Self {
            item,
            methods,
            supertraits,
            flags,
        })
    }
}

impl BeanMethod {
    fn parse(method: &mut TraitItemFn) -> syn::Result<Self> {
        let property_type = take_property_type(&mut method.attrs)?;

        if let Some(body) = &method.default {
            return Err(syn::Error::new_spanned(
                body,
                "bean interface methods cannot have a default body",
            ));
        }

        let sig = &method.sig;
        if let Some(asyncness) = &sig.asyncness {
            return Err(syn::Error::new_spanned(asyncness, "bean interface methods cannot be async"));
        }
        if let Some(unsafety) = &sig.unsafety {
            return Err(syn::Error::new_spanned(unsafety, "bean interface methods cannot be unsafe"));
        }
        if !sig.generics.params.is_empty() || sig.generics.where_clause.is_some() {
            return Err(syn::Error::new_spanned(
                &sig.generics,
                "bean interface methods cannot be generic",
            ));
        }
        if let Some(variadic) = &sig.variadic {
            return Err(syn::Error::new_spanned(variadic, "bean interface methods cannot be variadic"));
        }

        match sig.receiver() {
            Some(receiver)
                if receiver.reference.is_some()
                    && receiver.mutability.is_none()
                    && receiver.colon_token.is_none() => {}
            _ => {
                return Err(syn::Error::new_spanned(
                    sig,
                    "bean interface methods must take `&self`",
                ));
            }
        }

        let mut args = Vec::with_capacity(sig.inputs.len().saturating_sub(1));
        for (index, input) in sig.inputs.iter().skip(1).enumerate() {
            let FnArg::Typed(arg) = input else {
                return Err(syn::Error::new_spanned(input, "unexpected receiver"));
            };
            let ident = match &*arg.pat {
                Pat::Ident(pat) => pat.ident.clone(),
                _ => format_ident!("__arg{index}"),
            };
            args.push((ident, (*arg.ty).clone()));
        }

        let ReturnType::Type(_, output) = &sig.output else {
            return Err(syn::Error::new_spanned(
                sig,
                "bean interface methods must return `Result<T, E>`",
            ));
        };
        let value_ty = result_ok_type(output)?;

        if property_type.is_some() && value_ty.is_none() && args.is_empty() {
            return Err(syn::Error::new_spanned(
                sig,
                "`property_type` needs a return value or a parameter to apply to",
            ));
        }

        Ok(Self {
            ident: sig.ident.clone(),
            args,
            output: (**output).clone(),
            value_ty,
            property_type,
        })
    }
}

/// Removes `#[bean(property_type = ...)]` from `attrs`, returning the expression.
fn take_property_type(attrs: &mut Vec<Attribute>) -> syn::Result<Option<Expr>> {
    let mut property_type = None;
    let mut kept = Vec::with_capacity(attrs.len());

    for attr in attrs.drain(..) {
        if !attr.path().is_ident(BEAN_ATTRIBUTE_NAME) {
            kept.push(attr);
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("property_type") {
                if property_type.is_some() {
                    return Err(meta.error("duplicate `property_type`"));
                }
                property_type = Some(meta.value()?.parse::<Expr>()?);
                Ok(())
            } else {
                Err(meta.error(format!("unknown `{BEAN_ATTRIBUTE_NAME}` method attribute")))
            }
        })?;
    }

    *attrs = kept;
    Ok(property_type)
}

/// `T` of `Result<T, ..>`, `None` when `T` is `()`.
fn result_ok_type(ty: &Type) -> syn::Result<Option<Type>> {
    if let Type::Path(path) = ty
        && path.qself.is_none()
        && let Some(last) = path.path.segments.last()
        && last.ident == "Result"
        && let PathArguments::AngleBracketed(generics) = &last.arguments
        && let Some(GenericArgument::Type(ok)) = generics.args.first()
    {
        return Ok(match ok {
            Type::Tuple(unit) if unit.elems.is_empty() => None,
            other => Some(other.clone()),
        });
    }
    Err(syn::Error::new_spanned(
        ty,
        "bean interface methods must return `Result<T, E>`",
    ))
}
