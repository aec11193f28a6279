use alloc::format;

use crate::info::PropertyType;
use crate::{BeanError, Result, Value};

/// Replacement storage for a single property.
///
/// For a scalar property, [`value_type`] must equal the declared type and
/// [`get`]/[`put`] serve whole values. For an array or list property,
/// [`value_type`] must equal the element type; only indexed access is
/// routed to the delegate, reading the whole collection is unsupported.
///
/// Delegates are shared by copies and views of the bean they are attached to.
///
/// [`value_type`]: PropertyDelegate::value_type
/// [`get`]: PropertyDelegate::get
/// [`put`]: PropertyDelegate::put
pub trait PropertyDelegate {
    fn value_type(&self) -> PropertyType;

    fn get(&self, property: &str) -> Result<Value> {
        Err(unsupported(property, "read"))
    }

    fn put(&self, property: &str, value: Value) -> Result<()> {
        let _ = value;
        Err(unsupported(property, "write"))
    }

    fn get_indexed(&self, property: &str, index: usize) -> Result<Value> {
        let _ = index;
        Err(unsupported(property, "indexed read"))
    }

    fn put_indexed(&self, property: &str, index: usize, value: Value) -> Result<()> {
        let _ = (index, value);
        Err(unsupported(property, "indexed write"))
    }
}

fn unsupported(property: &str, access: &str) -> BeanError {
    BeanError::UnsupportedFeature(format!(
        "the delegate of `{property}` does not support {access}"
    ))
}
