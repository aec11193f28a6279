//! Behaviors for non-accessor interface methods.
//!
//! Interfaces with behavioral methods are *delegatable*: a bean implementing
//! one gets a dispatch slot for it, and calls to its behavioral methods fail
//! with [`BeanError::IllegalState`] until an [`InterfaceBehavior`] is
//! attached to the slot.
//!
//! [`BeanError::IllegalState`]: crate::BeanError::IllegalState

mod behavior;
mod registry;

pub use behavior::InterfaceBehavior;
pub use registry::InterfaceDispatchRegistry;
