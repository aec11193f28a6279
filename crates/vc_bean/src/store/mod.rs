//! Per-bean property storage.
//!
//! [`PropertyStore`] keeps the values of one bean, keyed by property name and
//! checked against the bean's [`BeanDescriptor`](crate::info::BeanDescriptor).
//! A property can be handed to a [`PropertyDelegate`], which then serves its
//! reads and writes instead of the map until it is detached.

mod delegate;
mod property_store;

pub use delegate::PropertyDelegate;
pub use property_store::PropertyStore;
