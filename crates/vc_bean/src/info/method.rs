use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use super::PropertyType;

/// Name, parameter types and return type of an interface method.
///
/// Built fluently:
///
/// ```
/// use vc_bean::info::{MethodSignature, PropertyType};
///
/// let sig = MethodSignature::new("set_value").param(PropertyType::I32);
/// assert_eq!(sig.to_string(), "set_value(i32)");
///
/// let sig = MethodSignature::new("get_value").returns(PropertyType::I32);
/// assert_eq!(sig.to_string(), "get_value() -> i32");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MethodSignature {
    name: Cow<'static, str>,
    params: Box<[PropertyType]>,
    ret: Option<PropertyType>,
}

impl MethodSignature {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            params: Box::new([]),
            ret: None,
        }
    }

    /// Appends a parameter.
    pub fn param(self, ty: PropertyType) -> Self {
        let mut params = Vec::from(self.params);
        params.push(ty);
        Self {
            params: params.into_boxed_slice(),
            ..self
        }
    }

    /// Sets the return type. Signatures without one return nothing.
    pub fn returns(self, ty: PropertyType) -> Self {
        Self {
            ret: Some(ty),
            ..self
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub(crate) fn name_cow(&self) -> &Cow<'static, str> {
        &self.name
    }

    #[inline]
    pub fn params(&self) -> &[PropertyType] {
        &self.params
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    #[inline]
    pub fn ret(&self) -> Option<&PropertyType> {
        self.ret.as_ref()
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{param}")?;
        }
        f.write_str(")")?;
        if let Some(ret) = &self.ret {
            write!(f, " -> {ret}")?;
        }
        Ok(())
    }
}

/// How a method was classified by naming convention.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MethodKind {
    Getter(Cow<'static, str>),
    Setter(Cow<'static, str>),
    IndexedGetter(Cow<'static, str>),
    IndexedSetter(Cow<'static, str>),
    Event,
    Behavioral,
}

impl MethodKind {
    pub(super) fn classify(sig: &MethodSignature) -> Self {
        let name = sig.name();
        let params = sig.params();

        if (name.starts_with("add_") || name.starts_with("remove_"))
            && name.ends_with("_listener")
            && params.len() == 1
        {
            return MethodKind::Event;
        }

        if let Some(property) = property_name(name, "get_")
            && sig.ret().is_some()
        {
            match params {
                [] => return MethodKind::Getter(property),
                [index] if index.is_index() => return MethodKind::IndexedGetter(property),
                _ => {}
            }
        }

        if let Some(property) = property_name(name, "is_")
            && params.is_empty()
            && sig.ret() == Some(&PropertyType::Bool)
        {
            return MethodKind::Getter(property);
        }

        if let Some(property) = property_name(name, "set_")
            && sig.ret().is_none()
        {
            match params {
                [_] => return MethodKind::Setter(property),
                [index, _] if index.is_index() => return MethodKind::IndexedSetter(property),
                _ => {}
            }
        }

        MethodKind::Behavioral
    }

    /// The property this accessor belongs to.
    pub fn property(&self) -> Option<&str> {
        match self {
            MethodKind::Getter(name)
            | MethodKind::Setter(name)
            | MethodKind::IndexedGetter(name)
            | MethodKind::IndexedSetter(name) => Some(name),
            MethodKind::Event | MethodKind::Behavioral => None,
        }
    }

    #[inline]
    pub fn is_behavioral(&self) -> bool {
        matches!(self, MethodKind::Behavioral)
    }
}

fn property_name(name: &str, prefix: &str) -> Option<Cow<'static, str>> {
    let rest = name.strip_prefix(prefix)?;
    (!rest.is_empty()).then(|| Cow::Owned(rest.into()))
}
