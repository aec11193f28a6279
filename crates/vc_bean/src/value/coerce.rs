use alloc::vec::Vec;

use super::Value;
use crate::info::PropertyType;

/// Converts `value` to the representation of `ty`, if it is acceptable.
///
/// - [`Value::Null`] is accepted by every non-primitive type.
/// - Integers widen to wider integers and to floats; `f32` widens to `f64`.
/// - Strings are parsed into booleans (`true`/`false`, any case), chars
///   (exactly one character) and numbers.
/// - Arrays and lists are converted element by element.
/// - Beans are accepted by every interface they implement.
/// - [`PropertyType::Any`] accepts everything unchanged.
///
/// Returns `None` when the value cannot be represented.
///
/// ```
/// use vc_bean::Value;
/// use vc_bean::info::PropertyType;
/// use vc_bean::value::coerce;
///
/// assert_eq!(coerce(Value::I8(4), &PropertyType::I64), Some(Value::I64(4)));
/// assert_eq!(coerce(Value::from("TRUE"), &PropertyType::Bool), Some(Value::Bool(true)));
/// assert_eq!(coerce(Value::I64(4), &PropertyType::I32), None);
/// assert_eq!(coerce(Value::Null, &PropertyType::I32), None);
/// ```
pub fn coerce(value: Value, ty: &PropertyType) -> Option<Value> {
    if value.is_null() {
        return (!ty.is_primitive()).then_some(Value::Null);
    }

    match ty {
        PropertyType::Any => Some(value),
        PropertyType::Bool => match value {
            Value::Bool(v) => Some(Value::Bool(v)),
            Value::String(text) => parse_bool(&text).map(Value::Bool),
            _ => None,
        },
        PropertyType::Char => match value {
            Value::Char(v) => Some(Value::Char(v)),
            Value::String(text) => single_char(&text).map(Value::Char),
            _ => None,
        },
        PropertyType::I8 => integer(
            value,
            1,
            |n| Value::I8(n as i8),
            |s| s.parse().ok().map(Value::I8),
        ),
        PropertyType::I16 => integer(
            value,
            2,
            |n| Value::I16(n as i16),
            |s| s.parse().ok().map(Value::I16),
        ),
        PropertyType::I32 => integer(
            value,
            3,
            |n| Value::I32(n as i32),
            |s| s.parse().ok().map(Value::I32),
        ),
        PropertyType::I64 => integer(value, 4, Value::I64, |s| s.parse().ok().map(Value::I64)),
        PropertyType::F32 => match value {
            Value::F32(v) => Some(Value::F32(v)),
            Value::String(text) => text.parse().ok().map(Value::F32),
            other => as_integer(&other).map(|(n, _)| Value::F32(n as f32)),
        },
        PropertyType::F64 => match value {
            Value::F32(v) => Some(Value::F64(v.into())),
            Value::F64(v) => Some(Value::F64(v)),
            Value::String(text) => text.parse().ok().map(Value::F64),
            other => as_integer(&other).map(|(n, _)| Value::F64(n as f64)),
        },
        PropertyType::String => match value {
            Value::String(text) => Some(Value::String(text)),
            _ => None,
        },
        PropertyType::Array(element) => match value {
            Value::Array(items) => elements(items.into_vec(), element)
                .map(|items| Value::Array(items.into_boxed_slice())),
            _ => None,
        },
        PropertyType::List(element) => match value {
            Value::List(items) => elements(items, element).map(Value::List),
            _ => None,
        },
        PropertyType::Interface(interface) => match value {
            Value::Bean(bean) if bean.descriptor().implements(interface.id()) => {
                Some(Value::Bean(bean))
            }
            _ => None,
        },
        PropertyType::Opaque(opaque) => match value {
            Value::Opaque(v) if v.opaque_type() == opaque => Some(Value::Opaque(v)),
            _ => None,
        },
    }
}

fn parse_bool(text: &str) -> Option<bool> {
    if text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn single_char(text: &str) -> Option<char> {
    let mut chars = text.chars();
    let first = chars.next()?;
    chars.next().is_none().then_some(first)
}

// Integer value with its width rank, `i8` being 1 and `i64` being 4.
fn as_integer(value: &Value) -> Option<(i64, u8)> {
    match value {
        Value::I8(v) => Some(((*v).into(), 1)),
        Value::I16(v) => Some(((*v).into(), 2)),
        Value::I32(v) => Some(((*v).into(), 3)),
        Value::I64(v) => Some((*v, 4)),
        _ => None,
    }
}

fn integer(
    value: Value,
    rank: u8,
    widen: impl FnOnce(i64) -> Value,
    parse: impl FnOnce(&str) -> Option<Value>,
) -> Option<Value> {
    match value {
        Value::String(text) => parse(&text),
        // A source of lower or equal rank always fits.
        other => match as_integer(&other) {
            Some((n, source)) if source <= rank => Some(widen(n)),
            _ => None,
        },
    }
}

fn elements(items: Vec<Value>, element: &PropertyType) -> Option<Vec<Value>> {
    items.into_iter().map(|item| coerce(item, element)).collect()
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::coerce;
    use crate::Value;
    use crate::info::PropertyType;

    #[test]
    fn null_only_for_reference_types() {
        assert_eq!(coerce(Value::Null, &PropertyType::String), Some(Value::Null));
        assert_eq!(
            coerce(Value::Null, &PropertyType::list(PropertyType::I32)),
            Some(Value::Null)
        );
        assert_eq!(coerce(Value::Null, &PropertyType::Bool), None);
        assert_eq!(coerce(Value::Null, &PropertyType::Any), Some(Value::Null));
    }

    #[test]
    fn numbers_widen() {
        assert_eq!(coerce(Value::I16(7), &PropertyType::I32), Some(Value::I32(7)));
        assert_eq!(coerce(Value::I32(7), &PropertyType::I16), None);
        assert_eq!(coerce(Value::I32(7), &PropertyType::F64), Some(Value::F64(7.0)));
        assert_eq!(coerce(Value::F32(0.5), &PropertyType::F64), Some(Value::F64(0.5)));
        assert_eq!(coerce(Value::F64(0.5), &PropertyType::F32), None);
        assert_eq!(coerce(Value::Bool(true), &PropertyType::I32), None);
    }

    #[test]
    fn strings_parse() {
        assert_eq!(coerce(Value::from("42"), &PropertyType::I8), Some(Value::I8(42)));
        assert_eq!(coerce(Value::from("300"), &PropertyType::I8), None);
        assert_eq!(coerce(Value::from("x"), &PropertyType::Char), Some(Value::Char('x')));
        assert_eq!(coerce(Value::from("xy"), &PropertyType::Char), None);
        assert_eq!(
            coerce(Value::from("False"), &PropertyType::Bool),
            Some(Value::Bool(false))
        );
        assert_eq!(coerce(Value::from("yes"), &PropertyType::Bool), None);
        assert_eq!(coerce(Value::I32(1), &PropertyType::String), None);
    }

    #[test]
    fn collections_convert_elements() {
        let list = Value::from(vec![1_i8, 2]);
        assert_eq!(
            coerce(list, &PropertyType::list(PropertyType::I64)),
            Some(Value::List(vec![Value::I64(1), Value::I64(2)]))
        );

        let array = Value::from(["1", "x"]);
        assert_eq!(coerce(array, &PropertyType::array(PropertyType::I32)), None);

        let list = Value::from(vec![1]);
        assert_eq!(coerce(list, &PropertyType::array(PropertyType::I32)), None);
    }
}
