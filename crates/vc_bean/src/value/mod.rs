//! Dynamically typed property values.
//!
//! A [`Value`] is what a bean stores per property. Arrays and lists own their
//! elements; nested beans are shared handles, so cloning a value holding a
//! bean does not copy the bean.

mod coerce;
mod from_value;
mod opaque;

pub use coerce::coerce;
pub use from_value::FromValue;
pub use opaque::Opaque;

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::Bean;
use crate::info::PropertyType;

#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Char(char),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    String(String),
    Array(Box<[Value]>),
    List(Vec<Value>),
    Bean(Bean),
    Opaque(Opaque),
}

impl Value {
    /// An array of `len` default elements of type `element`.
    pub fn new_array(element: &PropertyType, len: usize) -> Self {
        Value::Array((0..len).map(|_| element.default_value()).collect())
    }

    /// A list of `len` default elements of type `element`.
    pub fn new_list(element: &PropertyType, len: usize) -> Self {
        Value::List((0..len).map(|_| element.default_value()).collect())
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Human readable name of the variant, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Char(_) => "char",
            Value::I8(_) => "i8",
            Value::I16(_) => "i16",
            Value::I32(_) => "i32",
            Value::I64(_) => "i64",
            Value::F32(_) => "f32",
            Value::F64(_) => "f64",
            Value::String(_) => "String",
            Value::Array(_) => "array",
            Value::List(_) => "list",
            Value::Bean(_) => "bean",
            Value::Opaque(_) => "opaque",
        }
    }

    #[inline]
    pub fn as_bean(&self) -> Option<&Bean> {
        match self {
            Value::Bean(bean) => Some(bean),
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(text) => Some(text),
            _ => None,
        }
    }

    /// Elements of an array or list.
    pub fn as_slice(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub(crate) fn as_mut_slice(&mut self) -> Option<&mut [Value]> {
        match self {
            Value::Array(items) => Some(items),
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Converts to a Rust type, see [`FromValue`].
    #[inline]
    pub fn get<T: FromValue>(&self) -> Option<T> {
        T::from_value(self)
    }
}

/// Variants must match exactly: `I32(1)` is not equal to `I64(1)`.
///
/// Beans compare by their stored values, opaque values by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::I8(a), Value::I8(b)) => a == b,
            (Value::I16(a), Value::I16(b)) => a == b,
            (Value::I32(a), Value::I32(b)) => a == b,
            (Value::I64(a), Value::I64(b)) => a == b,
            (Value::F32(a), Value::F32(b)) => a == b,
            (Value::F64(a), Value::F64(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Bean(a), Value::Bean(b)) => a == b,
            (Value::Opaque(a), Value::Opaque(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            Value::Char(v) => f.debug_tuple("Char").field(v).finish(),
            Value::I8(v) => f.debug_tuple("I8").field(v).finish(),
            Value::I16(v) => f.debug_tuple("I16").field(v).finish(),
            Value::I32(v) => f.debug_tuple("I32").field(v).finish(),
            Value::I64(v) => f.debug_tuple("I64").field(v).finish(),
            Value::F32(v) => f.debug_tuple("F32").field(v).finish(),
            Value::F64(v) => f.debug_tuple("F64").field(v).finish(),
            Value::String(v) => f.debug_tuple("String").field(v).finish(),
            Value::Array(v) => f.debug_tuple("Array").field(v).finish(),
            Value::List(v) => f.debug_tuple("List").field(v).finish(),
            Value::Bean(v) => fmt::Debug::fmt(v, f),
            Value::Opaque(v) => fmt::Debug::fmt(v, f),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Char(v) => write!(f, "{v}"),
            Value::I8(v) => write!(f, "{v}"),
            Value::I16(v) => write!(f, "{v}"),
            Value::I32(v) => write!(f, "{v}"),
            Value::I64(v) => write!(f, "{v}"),
            Value::F32(v) => write!(f, "{v}"),
            Value::F64(v) => write!(f, "{v}"),
            Value::String(v) => f.write_str(v),
            Value::Array(items) => write_items(f, items),
            Value::List(items) => write_items(f, items),
            Value::Bean(bean) => write!(f, "{bean}"),
            Value::Opaque(opaque) => write!(f, "<{}>", opaque.opaque_type().name()),
        }
    }
}

fn write_items(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    f.write_str("[")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    f.write_str("]")
}

// -----------------------------------------------------------------------------
// Conversions into `Value`

macro_rules! impl_from_primitive {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                #[inline]
                fn from(value: $ty) -> Self {
                    Value::$variant(value)
                }
            }
        )*
    };
}

impl_from_primitive! {
    bool => Bool,
    char => Char,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    f32 => F32,
    f64 => F64,
    String => String,
    Bean => Bean,
    Opaque => Opaque,
}

/// Indices saturate at `i64::MAX`.
impl From<usize> for Value {
    #[inline]
    fn from(value: usize) -> Self {
        Value::I64(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<&str> for Value {
    #[inline]
    fn from(value: &str) -> Self {
        Value::String(value.into())
    }
}

impl From<&String> for Value {
    #[inline]
    fn from(value: &String) -> Self {
        Value::String(value.clone())
    }
}

impl From<&Bean> for Value {
    #[inline]
    fn from(value: &Bean) -> Self {
        Value::Bean(value.clone())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Value::List(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Box<[T]>> for Value {
    fn from(value: Box<[T]>) -> Self {
        Value::Array(Vec::from(value).into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Value {
    fn from(value: [T; N]) -> Self {
        Value::Array(value.into_iter().map(Into::into).collect())
    }
}
