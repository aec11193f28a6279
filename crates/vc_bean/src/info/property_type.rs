use alloc::boxed::Box;
use core::any::{Any, TypeId, type_name};
use core::fmt;
use core::hash::{Hash, Hasher};

use super::{Interface, InterfaceRef, ValueType};
use crate::Value;

/// The declared type of a property, parameter or return value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PropertyType {
    Bool,
    Char,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    String,
    /// Fixed-length sequence, stored as [`Value::Array`].
    Array(Box<PropertyType>),
    /// Growable sequence, stored as [`Value::List`].
    List(Box<PropertyType>),
    /// A nested bean implementing the interface.
    Interface(InterfaceRef),
    /// A foreign Rust value, stored as [`Value::Opaque`].
    Opaque(OpaqueType),
    /// Accepts every value.
    Any,
}

impl PropertyType {
    #[inline]
    pub fn array(element: PropertyType) -> Self {
        PropertyType::Array(Box::new(element))
    }

    #[inline]
    pub fn list(element: PropertyType) -> Self {
        PropertyType::List(Box::new(element))
    }

    #[inline]
    pub fn interface<T: Interface + ?Sized>() -> Self {
        PropertyType::Interface(InterfaceRef::of::<T>())
    }

    #[inline]
    pub fn opaque<T: Any>() -> Self {
        PropertyType::Opaque(OpaqueType::of::<T>())
    }

    /// The property type of a Rust type, see [`ValueType`].
    #[inline]
    pub fn of<T: ValueType + ?Sized>() -> Self {
        T::property_type()
    }

    /// Primitive types never hold null.
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            PropertyType::Bool
                | PropertyType::Char
                | PropertyType::I8
                | PropertyType::I16
                | PropertyType::I32
                | PropertyType::I64
                | PropertyType::F32
                | PropertyType::F64
        )
    }

    /// Integer types usable as the index parameter of an indexed accessor.
    pub fn is_index(&self) -> bool {
        matches!(
            self,
            PropertyType::I8 | PropertyType::I16 | PropertyType::I32 | PropertyType::I64
        )
    }

    #[inline]
    pub fn is_interface(&self) -> bool {
        matches!(self, PropertyType::Interface(_))
    }

    #[inline]
    pub fn as_interface(&self) -> Option<&InterfaceRef> {
        match self {
            PropertyType::Interface(interface) => Some(interface),
            _ => None,
        }
    }

    /// Element type of an array or list.
    pub fn element_type(&self) -> Option<&PropertyType> {
        match self {
            PropertyType::Array(element) | PropertyType::List(element) => Some(element),
            _ => None,
        }
    }

    /// Whether a value of this type can be navigated by index.
    #[inline]
    pub fn is_collection(&self) -> bool {
        self.element_type().is_some()
    }

    /// The value an unset slot of this type reads as.
    ///
    /// Zero for primitives, [`Value::Null`] otherwise.
    pub fn default_value(&self) -> Value {
        match self {
            PropertyType::Bool => Value::Bool(false),
            PropertyType::Char => Value::Char('\0'),
            PropertyType::I8 => Value::I8(0),
            PropertyType::I16 => Value::I16(0),
            PropertyType::I32 => Value::I32(0),
            PropertyType::I64 => Value::I64(0),
            PropertyType::F32 => Value::F32(0.0),
            PropertyType::F64 => Value::F64(0.0),
            _ => Value::Null,
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyType::Bool => f.write_str("bool"),
            PropertyType::Char => f.write_str("char"),
            PropertyType::I8 => f.write_str("i8"),
            PropertyType::I16 => f.write_str("i16"),
            PropertyType::I32 => f.write_str("i32"),
            PropertyType::I64 => f.write_str("i64"),
            PropertyType::F32 => f.write_str("f32"),
            PropertyType::F64 => f.write_str("f64"),
            PropertyType::String => f.write_str("String"),
            PropertyType::Array(element) => write!(f, "[{element}]"),
            PropertyType::List(element) => write!(f, "List<{element}>"),
            PropertyType::Interface(interface) => write!(f, "{interface}"),
            PropertyType::Opaque(opaque) => f.write_str(opaque.name()),
            PropertyType::Any => f.write_str("Any"),
        }
    }
}

/// Identity of a foreign type carried by [`Value::Opaque`].
#[derive(Clone, Copy)]
pub struct OpaqueType {
    id: TypeId,
    name: &'static str,
}

impl OpaqueType {
    #[inline]
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    #[inline]
    pub fn id(&self) -> TypeId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for OpaqueType {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for OpaqueType {}

impl Hash for OpaqueType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for OpaqueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("OpaqueType").field(&self.name).finish()
    }
}
