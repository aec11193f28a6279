#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Extern Self

// The `#[bean]` macro resolves this crate through `macro_utils::Manifest`,
// which falls back to `::vc_bean`. Inside the crate itself (unit tests and
// doc tests) that path must still resolve, hence the alias.
extern crate self as vc_bean;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod error;
mod hash;

pub mod access;
pub mod dispatch;
pub mod info;
pub mod manip;
pub mod nesting;
pub mod path;
pub mod proxy;
pub mod registry;
pub mod store;
pub mod value;

#[cfg(test)]
mod testing;

// -----------------------------------------------------------------------------
// Top-Level exports

pub mod __macro_exports;

pub use error::{BeanError, Result};
pub use proxy::Bean;
pub use value::Value;
pub use vc_bean_derive::bean;
