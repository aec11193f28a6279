use core::any::{TypeId, type_name};
use core::fmt;
use core::hash::{Hash, Hasher};
use std::sync::OnceLock;

use super::InterfaceInfo;

/// A type that describes a bean interface.
///
/// Implemented by `dyn Trait` for every `#[bean]` trait, or by hand on a
/// marker type. Identity is the [`TypeId`] of the implementing type.
pub trait Interface: 'static {
    fn interface_info() -> &'static InterfaceInfo;
}

/// A copyable, lazily resolved handle to an [`Interface`].
///
/// Holding an `InterfaceRef` does not build the [`InterfaceInfo`]; it is
/// resolved on the first call to [`InterfaceRef::info`]. This lets
/// interfaces refer to each other (and to themselves) in property types.
#[derive(Clone, Copy)]
pub struct InterfaceRef {
    id: TypeId,
    path: &'static str,
    info: fn() -> &'static InterfaceInfo,
}

impl InterfaceRef {
    #[inline]
    pub fn of<T: Interface + ?Sized>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            path: type_name::<T>(),
            info: T::interface_info,
        }
    }

    #[inline]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Full type path, e.g. `dyn my_crate::Child`.
    #[inline]
    pub fn path(&self) -> &'static str {
        self.path
    }

    /// Last path component without the `dyn ` prefix, e.g. `Child`.
    pub fn short_name(&self) -> &'static str {
        short_name(self.path)
    }

    #[inline]
    pub fn info(&self) -> &'static InterfaceInfo {
        (self.info)()
    }

    #[inline]
    pub fn is<T: Interface + ?Sized>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

pub(super) fn short_name(path: &'static str) -> &'static str {
    let path = path.strip_prefix("dyn ").unwrap_or(path);
    path.rsplit("::").next().unwrap_or(path)
}

impl PartialEq for InterfaceRef {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for InterfaceRef {}

impl Hash for InterfaceRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for InterfaceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path)
    }
}

impl fmt::Display for InterfaceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// Static storage for the [`InterfaceInfo`] of a non-generic interface.
///
/// ```
/// # use vc_bean::info::{Interface, InterfaceInfo, InterfaceInfoCell};
/// struct Marker;
///
/// impl Interface for Marker {
///     fn interface_info() -> &'static InterfaceInfo {
///         static CELL: InterfaceInfoCell = InterfaceInfoCell::new();
///         CELL.get_or_init(|| InterfaceInfo::builder::<Self>().build())
///     }
/// }
/// # assert!(core::ptr::eq(Marker::interface_info(), Marker::interface_info()));
/// ```
pub struct InterfaceInfoCell(OnceLock<InterfaceInfo>);

impl InterfaceInfoCell {
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    #[inline]
    pub fn get_or_init(&self, f: impl FnOnce() -> InterfaceInfo) -> &InterfaceInfo {
        self.0.get_or_init(f)
    }
}
