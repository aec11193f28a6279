//! Static descriptions of bean interfaces.
//!
//! An *interface* is a set of method signatures. Accessor methods are
//! recognized by naming convention and turned into [`PropertyInfo`]s; every
//! other method is *behavioral* and must be backed by an attached
//! [`InterfaceBehavior`] at runtime.
//!
//! | Signature                       | Kind                       |
//! |---------------------------------|----------------------------|
//! | `get_x() -> T`                  | getter of `x`              |
//! | `is_x() -> bool`                | getter of `x`              |
//! | `set_x(T)`                      | setter of `x`              |
//! | `get_x(index) -> E`             | indexed getter of `x`      |
//! | `set_x(index, E)`               | indexed setter of `x`      |
//! | `add_x_listener(L)` and remove  | event (rejected)           |
//! | anything else                   | behavioral                 |
//!
//! A setter whose parameter type differs from the getter's return type is
//! treated as behavioral.
//!
//! Interfaces are usually declared with the [`bean`](crate::bean) attribute,
//! which implements [`Interface`] for `dyn Trait`. They can also be built by
//! hand with [`InterfaceInfo::builder`]:
//!
//! ```
//! use vc_bean::info::{Interface, InterfaceInfo, InterfaceInfoCell, PropertyType};
//!
//! struct Point;
//!
//! impl Interface for Point {
//!     fn interface_info() -> &'static InterfaceInfo {
//!         static CELL: InterfaceInfoCell = InterfaceInfoCell::new();
//!         CELL.get_or_init(|| {
//!             InterfaceInfo::builder::<Self>()
//!                 .property("x", PropertyType::I32)
//!                 .property("y", PropertyType::I32)
//!                 .build()
//!         })
//!     }
//! }
//!
//! let info = Point::interface_info();
//! assert_eq!(info.name(), "Point");
//! assert_eq!(info.properties().len(), 2);
//! assert!(!info.is_delegatable());
//! ```
//!
//! [`BeanDescriptor`] composes several interfaces into the shape of a bean.
//!
//! [`InterfaceBehavior`]: crate::dispatch::InterfaceBehavior

mod descriptor;
mod interface;
mod interface_info;
mod method;
mod property_info;
mod property_type;
mod value_type;

pub use descriptor::{BeanDescriptor, Route};
pub use interface::{Interface, InterfaceInfoCell, InterfaceRef};
pub use interface_info::{InterfaceInfo, InterfaceInfoBuilder};
pub use method::{MethodKind, MethodSignature};
pub use property_info::PropertyInfo;
pub use property_type::{OpaqueType, PropertyType};
pub use value_type::ValueType;
