//! The [`Bean`] handle and its construction pipeline.
//!
//! A bean is a dynamic implementation of one or more interfaces. Accessor
//! calls are served by its [`PropertyStore`], everything else by the
//! behaviors attached to its [`InterfaceDispatchRegistry`].
//!
//! ```
//! use vc_bean::Bean;
//! use vc_bean::info::{Interface, InterfaceInfo, InterfaceInfoCell, InterfaceRef, PropertyType};
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
//! let point = Bean::create(&[InterfaceRef::of::<Point>()], [("x", 1)]).unwrap();
//! point.put("y", 2).unwrap();
//! assert_eq!(point.get_as::<i32>("x").unwrap(), Some(1));
//! assert_eq!(point.to_string(), "Point{x=1, y=2}");
//! ```
//!
//! [`PropertyStore`]: crate::store::PropertyStore
//! [`InterfaceDispatchRegistry`]: crate::dispatch::InterfaceDispatchRegistry

mod bean;
mod copy;
mod create;
mod hook;
mod invoke;

pub use bean::Bean;
pub(crate) use create::compose_with_hooks;
pub use hook::ConstructionHook;

