//! Path-based access to nested beans.
//!
//! The resolver walks a [`PathExpression`] segment by segment. Every segment
//! must name a property declared by the bean it is evaluated against, and
//! every non-leaf segment must evaluate to a nested bean.
//!
//! | Operation            | Null before the leaf       |
//! |----------------------|----------------------------|
//! | [`resolve_get`]      | [`BeanError::NotNavigable`]|
//! | [`resolve_contains`] | `false`                    |
//! | [`resolve_remove`]   | nothing removed            |
//! | [`resolve_put`]      | the bean is created        |
//!
//! Indexed segments first check that an index is present, then that the
//! collection is not null, then that the index is in bounds.
//!
//! [`PathExpression`]: crate::path::PathExpression
//! [`BeanError::NotNavigable`]: crate::BeanError::NotNavigable

mod resolve;

pub use resolve::{resolve_contains, resolve_get, resolve_put, resolve_remove};
