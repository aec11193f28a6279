use alloc::boxed::Box;
use alloc::string::String;

use thiserror::Error;

use crate::info::PropertyType;

/// Shorthand used by every fallible operation of this crate.
pub type Result<T, E = BeanError> = core::result::Result<T, E>;

/// Everything that can go wrong while describing, creating or navigating a bean.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum BeanError {
    /// The path text is empty or consists only of separators.
    #[error("property path is empty")]
    MalformedPath,

    /// A path segment or map key names a property the bean does not declare.
    #[error("property `{property}` is not declared by `{bean}`")]
    UnknownProperty { property: String, bean: String },

    /// A value cannot be coerced to the declared type of its slot.
    #[error("cannot assign a {found} value to `{property}` of type `{expected}`")]
    TypeMismatch {
        property: String,
        expected: PropertyType,
        found: &'static str,
    },

    /// Two composed interfaces declare the same property with different types.
    #[error(
        "property `{property}` is `{first}` in `{first_owner}` but `{second}` in `{second_owner}`"
    )]
    TypeConflict {
        property: String,
        first: PropertyType,
        first_owner: &'static str,
        second: PropertyType,
        second_owner: &'static str,
    },

    /// An indexed segment whose index is missing or not a number.
    #[error("`{path}` does not carry a valid index")]
    InvalidIndex { path: String },

    #[error("index {index} is out of bounds for `{path}` of length {len}")]
    IndexOutOfBounds {
        path: String,
        index: usize,
        len: usize,
    },

    /// An indexed access hit a collection that has not been set.
    #[error("cannot index `{path}`: the collection is null")]
    NullIndexTarget { path: String },

    /// A path tried to step through something that is not a bean,
    /// or to index something that is not a collection.
    #[error("cannot navigate through `{path}`: found {found}")]
    NotNavigable { path: String, found: &'static str },

    /// Auto-instantiation reached a null slot whose type is not an interface.
    #[error("cannot instantiate `{ty}` for `{path}`, only interfaces can be fabricated")]
    NotInstantiable { path: String, ty: PropertyType },

    /// A behavior or property delegate does not fit its target.
    #[error("invalid delegate for `{target}`: {reason}")]
    InvalidDelegate { target: String, reason: String },

    /// A mutation was attempted on an unmodifiable copy.
    #[error("bean is unmodifiable")]
    ImmutableState,

    /// Construction, copy, flatten or equality recursed past the nesting limit.
    #[error("bean nesting exceeded the limit of {limit}")]
    ExcessiveNesting { limit: usize },

    #[error("unsupported: {0}")]
    UnsupportedFeature(String),

    /// An initial value handed to `Bean::create` was rejected.
    #[error("invalid initial value for `{key}`: {source}")]
    InvalidPropertyValue {
        key: String,
        #[source]
        source: Box<BeanError>,
    },

    #[error("invalid argument: {0}")]
    Argument(String),

    #[error("illegal state: {0}")]
    IllegalState(String),
}

impl BeanError {
    /// Strips any [`BeanError::InvalidPropertyValue`] wrappers.
    pub fn root_cause(&self) -> &BeanError {
        match self {
            BeanError::InvalidPropertyValue { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
