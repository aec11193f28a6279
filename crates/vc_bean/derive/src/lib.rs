//! Attribute macro turning a trait into a bean interface.
//!
//! See [`macro@bean`].
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use syn::{ItemTrait, parse_macro_input};

static BEAN_ATTRIBUTE_NAME: &str = "bean";

// -----------------------------------------------------------------------------
// Modules

mod bean_trait;
mod impls;
mod path;

use bean_trait::{BeanTrait, TraitFlags};

// -----------------------------------------------------------------------------
// Macros

/// Declares a trait as a bean interface.
///
/// The trait gets:
///
/// - an `Interface` implementation for `dyn Trait`, describing every method;
/// - an implementation of the trait for `Bean`, routing each call through
///   `Bean::invoke`.
///
/// Every method must take `&self`, have no default body, and return
/// `Result<T, E>` where `E: From<BeanError>`. Parameter and return types are
/// mapped with `ValueType`; supertraits must be bean interfaces themselves
/// and become super-interfaces.
///
/// ```rust, ignore
/// #[bean]
/// pub trait Child {
///     fn get_value(&self) -> Result<i32, BeanError>;
///     fn set_value(&self, value: i32) -> Result<(), BeanError>;
/// }
/// ```
///
/// ## Property types
///
/// Nested beans are plain `Bean` handles in Rust, so their interface must be
/// spelled out. `property_type` overrides the return type of a method, or
/// the last parameter type of a method returning `()`:
///
/// ```rust, ignore
/// #[bean]
/// pub trait Parent {
///     #[bean(property_type = PropertyType::interface::<dyn Child>())]
///     fn get_child(&self) -> Result<Option<Bean>, BeanError>;
///
///     #[bean(property_type = PropertyType::interface::<dyn Child>())]
///     fn set_child(&self, child: Bean) -> Result<(), BeanError>;
/// }
/// ```
///
/// ## Registration
///
/// `#[bean(auto_register)]` submits the interface for
/// `TypeRegistry::auto_register`. It has no effect without the
/// `auto_register` feature.
#[proc_macro_attribute]
pub fn bean(attr: TokenStream, item: TokenStream) -> TokenStream {
    let flags = parse_macro_input!(attr as TraitFlags);
    let item = parse_macro_input!(item as ItemTrait);

    match BeanTrait::parse(item, flags) {
        Ok(bean_trait) => impls::expand(&bean_trait).into(),
        Err(err) => err.into_compile_error().into(),
    }
}
