use alloc::borrow::Cow;
use alloc::string::ToString;

use super::PropertyType;
use crate::{BeanError, Result};

/// A property recognized from the accessor methods of an interface.
#[derive(Clone, Debug)]
pub struct PropertyInfo {
    name: Cow<'static, str>,
    ty: PropertyType,
    element: Option<PropertyType>,
    readable: bool,
    writable: bool,
    owner: &'static str,
}

impl PropertyInfo {
    pub(super) fn new(
        name: Cow<'static, str>,
        ty: PropertyType,
        element: Option<PropertyType>,
        readable: bool,
        writable: bool,
        owner: &'static str,
    ) -> Self {
        Self {
            name,
            ty,
            element,
            readable,
            writable,
            owner,
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
    pub fn ty(&self) -> &PropertyType {
        &self.ty
    }

    /// The element type, if this property can be navigated by index.
    ///
    /// Taken from an explicit annotation or from indexed accessors, and
    /// otherwise from the declared array or list type.
    pub fn element_type(&self) -> Option<&PropertyType> {
        self.element.as_ref().or_else(|| self.ty.element_type())
    }

    #[inline]
    pub fn is_indexed(&self) -> bool {
        self.element_type().is_some()
    }

    #[inline]
    pub fn is_readable(&self) -> bool {
        self.readable
    }

    #[inline]
    pub fn is_writable(&self) -> bool {
        self.writable
    }

    /// Path of the interface that declared this property first.
    #[inline]
    pub fn owner(&self) -> &'static str {
        self.owner
    }

    /// Folds a declaration of the same property by another interface.
    pub(super) fn merge(&mut self, other: &PropertyInfo) -> Result<()> {
        if self.ty != other.ty {
            return Err(self.conflict(&self.ty, &other.ty, other.owner));
        }
        match (&self.element, &other.element) {
            (Some(mine), Some(theirs)) if mine != theirs => {
                return Err(self.conflict(mine, theirs, other.owner));
            }
            (None, Some(theirs)) => self.element = Some(theirs.clone()),
            _ => {}
        }
        self.readable |= other.readable;
        self.writable |= other.writable;
        Ok(())
    }

    fn conflict(
        &self,
        first: &PropertyType,
        second: &PropertyType,
        second_owner: &'static str,
    ) -> BeanError {
        BeanError::TypeConflict {
            property: self.name.to_string(),
            first: first.clone(),
            first_owner: self.owner,
            second: second.clone(),
            second_owner,
        }
    }
}
