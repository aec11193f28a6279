use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::string::{String, ToString};
use alloc::sync::Arc;
use core::cell::{Ref, RefCell, RefMut};
use core::fmt;

use crate::access::{resolve_contains, resolve_get, resolve_put, resolve_remove};
use crate::dispatch::{InterfaceBehavior, InterfaceDispatchRegistry};
use crate::info::{BeanDescriptor, Interface, InterfaceRef, ValueType};
use crate::nesting::NestingGuard;
use crate::path::PathExpression;
use crate::store::{PropertyDelegate, PropertyStore};
use crate::value::FromValue;
use crate::{BeanError, Result, Value};

/// A shared handle to a dynamically implemented bean.
///
/// Cloning the handle does not copy the bean, use [`Bean::copy`] for that.
/// Beans are `!Send`: a bean and everything reachable from it belong to the
/// thread that created them.
///
/// Two beans are equal when they are the same bean or hold equal values.
#[derive(Clone)]
pub struct Bean(Rc<BeanInner>);

struct BeanInner {
    descriptor: Arc<BeanDescriptor>,
    immutable: bool,
    state: RefCell<BeanState>,
}

pub(crate) struct BeanState {
    pub(crate) store: PropertyStore,
    pub(crate) dispatch: InterfaceDispatchRegistry,
}

impl Bean {
    pub(crate) fn from_parts(store: PropertyStore, dispatch: InterfaceDispatchRegistry) -> Self {
        Self(Rc::new(BeanInner {
            descriptor: Arc::clone(store.descriptor()),
            immutable: store.is_immutable(),
            state: RefCell::new(BeanState { store, dispatch }),
        }))
    }

    pub(crate) fn read(&self) -> Result<Ref<'_, BeanState>> {
        self.0
            .state
            .try_borrow()
            .map_err(|_| BeanError::IllegalState("bean is being modified".to_string()))
    }

    pub(crate) fn write(&self) -> Result<RefMut<'_, BeanState>> {
        self.0
            .state
            .try_borrow_mut()
            .map_err(|_| BeanError::IllegalState("bean is in use".to_string()))
    }

    #[inline]
    pub fn descriptor(&self) -> &Arc<BeanDescriptor> {
        &self.0.descriptor
    }

    #[inline]
    pub fn implements<T: Interface + ?Sized>(&self) -> bool {
        self.implements_ref(&InterfaceRef::of::<T>())
    }

    #[inline]
    pub fn implements_ref(&self, interface: &InterfaceRef) -> bool {
        self.0.descriptor.implements(interface.id())
    }

    /// Whether this bean is an unmodifiable copy.
    #[inline]
    pub fn is_immutable(&self) -> bool {
        self.0.immutable
    }

    /// Whether both handles point to the same bean.
    #[inline]
    pub fn ptr_eq(&self, other: &Bean) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Borrows the property store.
    pub fn store(&self) -> Result<Ref<'_, PropertyStore>> {
        Ok(Ref::map(self.read()?, |state| &state.store))
    }

    // -------------------------------------------------------------------------
    // Path access

    /// Reads the value at `path`, `None` if it is unset.
    pub fn get(&self, path: &str) -> Result<Option<Value>> {
        resolve_get(self, &PathExpression::parse(path)?)
    }

    /// Reads the value at `path` as `T`.
    ///
    /// # Errors
    ///
    /// Everything [`Bean::get`] fails with, and [`BeanError::TypeMismatch`]
    /// if the value cannot be converted.
    pub fn get_as<T: FromValue + ValueType>(&self, path: &str) -> Result<Option<T>> {
        let Some(value) = self.get(path)? else {
            return Ok(None);
        };
        match T::from_value(&value) {
            Some(typed) => Ok(Some(typed)),
            None => Err(BeanError::TypeMismatch {
                property: path.to_string(),
                expected: T::property_type(),
                found: value.kind_name(),
            }),
        }
    }

    /// Writes `value` at `path`, creating missing intermediate beans.
    ///
    /// Returns the previous value.
    pub fn put(&self, path: &str, value: impl Into<Value>) -> Result<Option<Value>> {
        resolve_put(self, &PathExpression::parse(path)?, value.into())
    }

    /// Whether a value is set at `path`.
    pub fn contains(&self, path: &str) -> Result<bool> {
        resolve_contains(self, &PathExpression::parse(path)?)
    }

    /// Clears the value at `path` and returns it.
    ///
    /// An indexed slot is reset to the element default instead of shrinking
    /// the collection.
    pub fn remove(&self, path: &str) -> Result<Option<Value>> {
        resolve_remove(self, &PathExpression::parse(path)?)
    }

    /// All set values, nested beans expanded under dotted keys.
    pub fn flatten(&self) -> Result<BTreeMap<String, Value>> {
        let mut flat = BTreeMap::new();
        self.flatten_into(&mut flat)?;
        Ok(flat)
    }

    pub fn flatten_into(&self, into: &mut BTreeMap<String, Value>) -> Result<()> {
        self.read()?.store.flatten(into)
    }

    // -------------------------------------------------------------------------
    // Delegation

    /// Serves `property` from `delegate` instead of the value map.
    pub fn attach_property_delegate(
        &self,
        property: &str,
        delegate: Rc<dyn PropertyDelegate>,
    ) -> Result<()> {
        self.write()?.store.attach_delegate(property, delegate)
    }

    pub fn detach_property_delegate(&self, property: &str) -> Result<bool> {
        self.write()?.store.detach_delegate(property)
    }

    pub fn is_property_delegated(&self, property: &str) -> Result<bool> {
        let state = self.read()?;
        state.store.property(property)?;
        Ok(state.store.is_delegated(property))
    }

    /// Serves the behavioral methods of `behavior.interface()`.
    pub fn attach_behavior(&self, behavior: Rc<dyn InterfaceBehavior>) -> Result<()> {
        if self.is_immutable() {
            return Err(BeanError::ImmutableState);
        }
        self.write()?.dispatch.attach(behavior)
    }

    pub fn detach_behavior(&self, interface: &InterfaceRef) -> Result<bool> {
        if self.is_immutable() {
            return Err(BeanError::ImmutableState);
        }
        Ok(self.write()?.dispatch.detach(interface))
    }

    pub fn is_behavior_attached(&self, interface: &InterfaceRef) -> Result<bool> {
        self.read()?.dispatch.is_attached(interface)
    }
}

impl PartialEq for Bean {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        // Cyclic graphs are unequal once the nesting limit is reached.
        let Ok(_guard) = NestingGuard::enter() else {
            return false;
        };
        match (self.read(), other.read()) {
            (Ok(a), Ok(b)) => a.store.values_eq(&b.store),
            _ => false,
        }
    }
}

/// `Name{a=1, b=x}`, properties sorted by name.
impl fmt::Display for Bean {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{{", self.0.descriptor.name())?;
        let (Ok(_guard), Ok(state)) = (NestingGuard::enter(), self.read()) else {
            return f.write_str("..}");
        };
        let sorted: BTreeMap<&str, &Value> = state.store.iter().collect();
        for (i, (name, value)) in sorted.into_iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}={value}")?;
        }
        f.write_str("}")
    }
}

impl fmt::Debug for Bean {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("Bean");
        debug.field("interfaces", &self.0.descriptor.interfaces());
        match (NestingGuard::enter(), self.read()) {
            (Ok(_guard), Ok(state)) => {
                let sorted: BTreeMap<&str, &Value> = state.store.iter().collect();
                debug.field("values", &sorted);
            }
            _ => {
                debug.field("values", &"..");
            }
        }
        debug.field("immutable", &self.0.immutable).finish()
    }
}
