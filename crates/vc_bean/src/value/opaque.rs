use alloc::rc::Rc;
use core::any::Any;
use core::fmt;

use crate::info::OpaqueType;

/// A foreign Rust value stored in a bean.
///
/// Opaque values are shared on clone and compared by identity. Their type is
/// checked against [`PropertyType::Opaque`](crate::info::PropertyType::Opaque)
/// on assignment.
#[derive(Clone)]
pub struct Opaque {
    ty: OpaqueType,
    value: Rc<dyn Any>,
}

impl Opaque {
    pub fn new<T: Any>(value: T) -> Self {
        Self {
            ty: OpaqueType::of::<T>(),
            value: Rc::new(value),
        }
    }

    #[inline]
    pub fn opaque_type(&self) -> &OpaqueType {
        &self.ty
    }

    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref()
    }

    #[inline]
    pub fn ptr_eq(&self, other: &Opaque) -> bool {
        core::ptr::addr_eq(Rc::as_ptr(&self.value), Rc::as_ptr(&other.value))
    }
}

impl PartialEq for Opaque {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Opaque {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Opaque").field(&self.ty.name()).finish()
    }
}
