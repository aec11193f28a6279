use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use super::PropertyType;
use crate::{Bean, Value};

/// Maps a Rust type to the [`PropertyType`] it is declared as.
///
/// Used by the `#[bean]` attribute to build method signatures from trait
/// methods. `Option<T>` maps to the type of `T`, so getters can return
/// `Option<String>` for properties that may be unset.
pub trait ValueType {
    fn property_type() -> PropertyType;
}

macro_rules! impl_value_type {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl ValueType for $ty {
                #[inline]
                fn property_type() -> PropertyType {
                    PropertyType::$variant
                }
            }
        )*
    };
}

impl_value_type! {
    bool => Bool,
    char => Char,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    usize => I64,
    f32 => F32,
    f64 => F64,
    str => String,
    String => String,
    Bean => Any,
    Value => Any,
}

impl<T: ValueType + ?Sized> ValueType for &T {
    #[inline]
    fn property_type() -> PropertyType {
        T::property_type()
    }
}

impl<T: ValueType> ValueType for Option<T> {
    #[inline]
    fn property_type() -> PropertyType {
        T::property_type()
    }
}

impl<T: ValueType> ValueType for Vec<T> {
    fn property_type() -> PropertyType {
        PropertyType::list(T::property_type())
    }
}

impl<T: ValueType> ValueType for Box<[T]> {
    fn property_type() -> PropertyType {
        PropertyType::array(T::property_type())
    }
}

impl<T: ValueType, const N: usize> ValueType for [T; N] {
    fn property_type() -> PropertyType {
        PropertyType::array(T::property_type())
    }
}
