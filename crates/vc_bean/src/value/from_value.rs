use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use super::{Opaque, Value};
use crate::Bean;

/// Conversion from a stored [`Value`] back to a Rust type.
///
/// Integer and float conversions widen but never narrow. `Option<T>` maps
/// [`Value::Null`] to `None`.
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Option<Self>;
}

impl FromValue for Value {
    #[inline]
    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

impl FromValue for () {
    /// Behaviors and setters of unit methods may return anything.
    #[inline]
    fn from_value(_: &Value) -> Option<Self> {
        Some(())
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromValue for char {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Char(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromValue for i8 {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::I8(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromValue for i16 {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::I8(v) => Some((*v).into()),
            Value::I16(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromValue for i32 {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::I8(v) => Some((*v).into()),
            Value::I16(v) => Some((*v).into()),
            Value::I32(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromValue for i64 {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::I8(v) => Some((*v).into()),
            Value::I16(v) => Some((*v).into()),
            Value::I32(v) => Some((*v).into()),
            Value::I64(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromValue for usize {
    fn from_value(value: &Value) -> Option<Self> {
        i64::from_value(value).and_then(|v| usize::try_from(v).ok())
    }
}

impl FromValue for f32 {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::F32(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::F32(v) => Some((*v).into()),
            Value::F64(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(Into::into)
    }
}

impl FromValue for Bean {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_bean().cloned()
    }
}

impl FromValue for Opaque {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Opaque(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_slice()?.iter().map(T::from_value).collect()
    }
}

impl<T: FromValue> FromValue for Box<[T]> {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_slice()?.iter().map(T::from_value).collect()
    }
}
