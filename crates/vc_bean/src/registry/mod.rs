//! Lookup of interfaces by identity, path or name.
//!
//! Beans do not need a registry, [`InterfaceRef`]s are enough to create
//! them. The registry serves callers that only know an interface by name,
//! e.g. when reading bean definitions from configuration.
//!
//! [`InterfaceRef`]: crate::info::InterfaceRef

mod type_registry;

pub use type_registry::TypeRegistry;
