use alloc::collections::{BTreeMap, BTreeSet};
use alloc::format;
use alloc::rc::Rc;
use alloc::string::{String, ToString};
use alloc::sync::Arc;
use core::fmt;

use log::warn;

use super::PropertyDelegate;
use crate::hash::HashMap;
use crate::info::{BeanDescriptor, PropertyInfo};
use crate::nesting::NestingGuard;
use crate::value::coerce;
use crate::{BeanError, Result, Value};

/// The values of one bean, validated against its descriptor.
///
/// Unset properties have no entry; assigning [`Value::Null`] removes the
/// entry. Access is by simple property name, dotted paths are handled by
/// [`access`](crate::access).
///
/// A store is not synchronized. Beans are `!Send`, so a store is only ever
/// reached from the thread that created it.
pub struct PropertyStore {
    descriptor: Arc<BeanDescriptor>,
    values: HashMap<String, Value>,
    delegates: HashMap<String, Rc<dyn PropertyDelegate>>,
    immutable: bool,
}

impl PropertyStore {
    pub fn new(descriptor: Arc<BeanDescriptor>) -> Self {
        Self {
            descriptor,
            values: HashMap::default(),
            delegates: HashMap::default(),
            immutable: false,
        }
    }

    #[inline]
    pub fn descriptor(&self) -> &Arc<BeanDescriptor> {
        &self.descriptor
    }

    #[inline]
    pub fn is_immutable(&self) -> bool {
        self.immutable
    }

    /// Number of set properties, delegated ones excluded.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Set properties in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// The declaration of `name`.
    ///
    /// # Errors
    ///
    /// [`BeanError::UnknownProperty`] if the bean does not declare it.
    pub fn property(&self, name: &str) -> Result<&PropertyInfo> {
        self.descriptor
            .property(name)
            .ok_or_else(|| BeanError::UnknownProperty {
                property: name.to_string(),
                bean: self.descriptor.name().to_string(),
            })
    }

    /// Reads `name`, consulting its delegate if one is attached.
    ///
    /// Unknown names read as unset.
    pub fn get(&self, name: &str) -> Result<Option<Value>> {
        if let Some(delegate) = self.delegates.get(name) {
            if self.property(name)?.is_indexed() {
                return Err(BeanError::UnsupportedFeature(format!(
                    "`{name}` is delegated by index and cannot be read as a whole"
                )));
            }
            let value = delegate.get(name)?;
            return Ok((!value.is_null()).then_some(value));
        }
        Ok(self.values.get(name).cloned())
    }

    /// Reads the map entry of `name`, ignoring delegates.
    #[inline]
    pub fn get_raw(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Writes `name` and returns the previous map value.
    ///
    /// # Errors
    ///
    /// - [`BeanError::ImmutableState`] on an unmodifiable store.
    /// - [`BeanError::UnknownProperty`] if `name` is not declared.
    /// - [`BeanError::TypeMismatch`] if `value` does not fit the declared type.
    pub fn put(&mut self, name: &str, value: Value) -> Result<Option<Value>> {
        self.check_mutable()?;
        let property = self.property(name)?;
        let value = coerce_to(property, name, value)?;

        if let Some(delegate) = self.delegates.get(name) {
            if property.is_indexed() {
                return Err(BeanError::UnsupportedFeature(format!(
                    "`{name}` is delegated by index and cannot be written as a whole"
                )));
            }
            delegate.put(name, value)?;
            return Ok(None);
        }

        if value.is_null() {
            return Ok(self.values.remove(name));
        }
        Ok(self.values.insert(name.to_string(), value))
    }

    /// Clears the map entry of `name`.
    pub fn remove(&mut self, name: &str) -> Result<Option<Value>> {
        self.check_mutable()?;
        self.property(name)?;
        Ok(self.values.remove(name))
    }

    /// Whether `name` is set or served by a delegate.
    pub fn contains_key(&self, name: &str) -> Result<bool> {
        self.property(name)?;
        Ok(self.delegates.contains_key(name) || self.values.contains_key(name))
    }

    /// Copies this store.
    ///
    /// A shallow copy shares nested beans with the original; a deep copy
    /// copies them recursively, and makes them unmodifiable too when
    /// `immutable` is set. Delegates are always shared.
    ///
    /// # Errors
    ///
    /// [`BeanError::ExcessiveNesting`] when a deep copy recurses past the
    /// nesting limit, e.g. on a cyclic graph.
    pub fn copy(&self, deep: bool, immutable: bool) -> Result<Self> {
        let mut values = HashMap::default();
        for (name, value) in &self.values {
            let value = if deep {
                deep_copy(value, immutable)?
            } else {
                value.clone()
            };
            values.insert(name.clone(), value);
        }

        Ok(Self {
            descriptor: Arc::clone(&self.descriptor),
            values,
            delegates: self.delegates.clone(),
            immutable,
        })
    }

    /// Restricts this store to the properties of `descriptor`.
    pub(crate) fn restrict(&self, descriptor: Arc<BeanDescriptor>) -> Self {
        let values = self
            .values
            .iter()
            .filter(|(name, _)| descriptor.contains_property(name))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        let delegates = self
            .delegates
            .iter()
            .filter(|(name, _)| descriptor.contains_property(name))
            .map(|(name, delegate)| (name.clone(), Rc::clone(delegate)))
            .collect();

        Self {
            descriptor,
            values,
            delegates,
            immutable: self.immutable,
        }
    }

    /// Writes every set value into `into`, replacing nested beans by their
    /// own entries under dotted keys.
    ///
    /// `{"a": bean{"b": 5}}` becomes `{"a.b": 5}`.
    pub fn flatten(&self, into: &mut BTreeMap<String, Value>) -> Result<()> {
        let _guard = NestingGuard::enter()?;
        for (name, value) in &self.values {
            match value {
                Value::Bean(bean) => {
                    let mut nested = BTreeMap::new();
                    bean.flatten_into(&mut nested)?;
                    into.remove(name.as_str());
                    for (key, value) in nested {
                        into.insert(format!("{name}.{key}"), value);
                    }
                }
                other => {
                    into.insert(name.clone(), other.clone());
                }
            }
        }
        Ok(())
    }

    /// Routes `name` to `delegate` until it is detached.
    ///
    /// # Errors
    ///
    /// - [`BeanError::ImmutableState`] on an unmodifiable store.
    /// - [`BeanError::UnknownProperty`] if `name` is not declared.
    /// - [`BeanError::InvalidDelegate`] if the delegate's value type is not
    ///   the declared type, or the element type for a collection property.
    pub fn attach_delegate(
        &mut self,
        name: &str,
        delegate: Rc<dyn PropertyDelegate>,
    ) -> Result<()> {
        self.check_mutable()?;
        let property = self.property(name)?;
        let expected = property.element_type().unwrap_or(property.ty());
        let provided = delegate.value_type();
        if provided != *expected {
            return Err(BeanError::InvalidDelegate {
                target: name.to_string(),
                reason: format!("it serves `{provided}` but the property needs `{expected}`"),
            });
        }

        if self.delegates.insert(name.to_string(), delegate).is_some() {
            warn!(
                "replaced the delegate of `{name}` on `{}`",
                self.descriptor.name()
            );
        }
        Ok(())
    }

    /// Restores map-backed behavior for `name`.
    ///
    /// Returns whether a delegate was attached.
    pub fn detach_delegate(&mut self, name: &str) -> Result<bool> {
        self.check_mutable()?;
        self.property(name)?;
        Ok(self.delegates.remove(name).is_some())
    }

    #[inline]
    pub fn delegate(&self, name: &str) -> Option<&Rc<dyn PropertyDelegate>> {
        self.delegates.get(name)
    }

    #[inline]
    pub fn is_delegated(&self, name: &str) -> bool {
        self.delegates.contains_key(name)
    }

    /// Compares the value maps only, delegates and flags are ignored.
    pub(crate) fn values_eq(&self, other: &PropertyStore) -> bool {
        self.values == other.values
    }

    #[inline]
    pub(crate) fn slot_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.values.get_mut(name)
    }

    #[inline]
    pub(crate) fn check_mutable(&self) -> Result<()> {
        if self.immutable {
            return Err(BeanError::ImmutableState);
        }
        Ok(())
    }
}

pub(crate) fn coerce_to(property: &PropertyInfo, path: &str, value: Value) -> Result<Value> {
    let found = value.kind_name();
    coerce(value, property.ty()).ok_or_else(|| BeanError::TypeMismatch {
        property: path.to_string(),
        expected: property.ty().clone(),
        found,
    })
}

fn deep_copy(value: &Value, immutable: bool) -> Result<Value> {
    Ok(match value {
        Value::Bean(bean) => Value::Bean(bean.copy_with(true, immutable)?),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| deep_copy(item, immutable))
                .collect::<Result<_>>()?,
        ),
        Value::List(items) => Value::List(
            items
                .iter()
                .map(|item| deep_copy(item, immutable))
                .collect::<Result<_>>()?,
        ),
        other => other.clone(),
    })
}

impl fmt::Debug for PropertyStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sorted: BTreeMap<_, _> = self.values.iter().collect();
        f.debug_struct("PropertyStore")
            .field("bean", &self.descriptor.name())
            .field("values", &sorted)
            .field("delegated", &self.delegates.keys().collect::<BTreeSet<_>>())
            .field("immutable", &self.immutable)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;
    use alloc::rc::Rc;
    use alloc::sync::Arc;
    use core::cell::RefCell;

    use super::PropertyStore;
    use crate::info::{
        BeanDescriptor, Interface, InterfaceInfo, InterfaceInfoCell, InterfaceRef, PropertyType,
    };
    use crate::store::PropertyDelegate;
    use crate::{BeanError, Result, Value};

    struct Sample;

    impl Interface for Sample {
        fn interface_info() -> &'static InterfaceInfo {
            static CELL: InterfaceInfoCell = InterfaceInfoCell::new();
            CELL.get_or_init(|| {
                InterfaceInfo::builder::<Self>()
                    .property("count", PropertyType::I64)
                    .property("label", PropertyType::String)
                    .property("scores", PropertyType::list(PropertyType::I32))
                    .build()
            })
        }
    }

    fn store() -> PropertyStore {
        let descriptor = BeanDescriptor::compose(&[InterfaceRef::of::<Sample>()]).unwrap();
        PropertyStore::new(Arc::new(descriptor))
    }

    struct Counter(RefCell<Value>);

    impl PropertyDelegate for Counter {
        fn value_type(&self) -> PropertyType {
            PropertyType::I64
        }

        fn get(&self, _: &str) -> Result<Value> {
            Ok(self.0.borrow().clone())
        }

        fn put(&self, _: &str, value: Value) -> Result<()> {
            *self.0.borrow_mut() = value;
            Ok(())
        }
    }

    #[test]
    fn put_coerces_and_validates() {
        let mut store = store();
        assert_eq!(store.put("count", Value::I8(5)).unwrap(), None);
        assert_eq!(store.get("count").unwrap(), Some(Value::I64(5)));
        assert_eq!(
            store.put("count", Value::from("6")).unwrap(),
            Some(Value::I64(5))
        );

        assert!(matches!(
            store.put("count", Value::from("six")),
            Err(BeanError::TypeMismatch { .. })
        ));
        assert!(matches!(
            store.put("missing", Value::I32(1)),
            Err(BeanError::UnknownProperty { .. })
        ));
        assert!(store.contains_key("count").unwrap());
        assert!(store.contains_key("missing").is_err());
    }

    #[test]
    fn null_clears() {
        let mut store = store();
        store.put("label", Value::from("x")).unwrap();
        assert_eq!(
            store.put("label", Value::Null).unwrap(),
            Some(Value::from("x"))
        );
        assert!(!store.contains_key("label").unwrap());
        assert!(store.is_empty());
    }

    #[test]
    fn immutable_copy_rejects_writes() {
        let mut store = store();
        store.put("count", Value::I64(1)).unwrap();
        let mut frozen = store.copy(false, true).unwrap();
        assert!(frozen.is_immutable());
        assert_eq!(frozen.get("count").unwrap(), Some(Value::I64(1)));
        assert!(matches!(
            frozen.put("count", Value::I64(2)),
            Err(BeanError::ImmutableState)
        ));
        assert!(matches!(
            frozen.remove("count"),
            Err(BeanError::ImmutableState)
        ));
    }

    #[test]
    fn delegates_take_over_and_detach() {
        let mut store = store();
        store.put("count", Value::I64(1)).unwrap();

        let counter = Rc::new(Counter(RefCell::new(Value::I64(40))));
        store.attach_delegate("count", counter.clone()).unwrap();
        assert_eq!(store.get("count").unwrap(), Some(Value::I64(40)));
        store.put("count", Value::I32(41)).unwrap();
        assert_eq!(*counter.0.borrow(), Value::I64(41));
        assert_eq!(store.get_raw("count"), Some(&Value::I64(1)));

        assert!(store.detach_delegate("count").unwrap());
        assert!(!store.detach_delegate("count").unwrap());
        assert_eq!(store.get("count").unwrap(), Some(Value::I64(1)));
    }

    #[test]
    fn delegate_types_are_checked() {
        let mut store = store();
        let counter = Rc::new(Counter(RefCell::new(Value::Null)));
        assert!(matches!(
            store.attach_delegate("label", counter.clone()),
            Err(BeanError::InvalidDelegate { .. })
        ));
        // Collection properties are delegated by element type.
        assert!(matches!(
            store.attach_delegate("scores", counter),
            Err(BeanError::InvalidDelegate { .. })
        ));
    }

    #[test]
    fn flatten_plain_values() {
        let mut store = store();
        store.put("count", Value::I64(3)).unwrap();
        store.put("label", Value::from("x")).unwrap();

        let mut flat = BTreeMap::new();
        store.flatten(&mut flat).unwrap();
        assert_eq!(flat.len(), 2);
        assert_eq!(flat["count"], Value::I64(3));
    }
}
