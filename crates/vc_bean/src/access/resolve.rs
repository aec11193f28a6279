use alloc::string::ToString;

use log::trace;

use crate::info::PropertyType;
use crate::path::{PathExpression, SegmentRef};
use crate::proxy::compose_with_hooks;
use crate::store::PropertyStore;
use crate::value::coerce;
use crate::{Bean, BeanError, Result, Value};

/// Reads the value at `path`, `None` if the leaf is unset or null.
///
/// # Errors
///
/// - [`BeanError::UnknownProperty`] for an undeclared name at any step.
/// - [`BeanError::NotNavigable`] if a step before the leaf is not a bean.
/// - [`BeanError::InvalidIndex`], [`BeanError::NullIndexTarget`] and
///   [`BeanError::IndexOutOfBounds`] for indexed steps.
pub fn resolve_get(bean: &Bean, path: &PathExpression) -> Result<Option<Value>> {
    let mut current = bean.clone();
    let mut segment = path.root();
    loop {
        let value = {
            let state = current.read()?;
            read_segment(&state.store, segment)?
        };
        let Some(child) = segment.child() else {
            return Ok(value.filter(|v| !v.is_null()));
        };
        current = match value {
            Some(Value::Bean(nested)) => nested,
            other => return Err(not_navigable(segment, other.as_ref())),
        };
        segment = child;
    }
}

/// Writes `value` at `path` and returns the previous value.
///
/// Null beans before the leaf are created from the declared interface type
/// of their slot and stored before descending.
///
/// # Errors
///
/// Everything [`resolve_get`] fails with for the steps before the leaf,
/// plus [`BeanError::NotInstantiable`] if a null step is not declared as an
/// interface, and the store errors of the final write.
pub fn resolve_put(bean: &Bean, path: &PathExpression, value: Value) -> Result<Option<Value>> {
    let mut current = bean.clone();
    let mut segment = path.root();
    while let Some(child) = segment.child() {
        current = descend_for_write(&current, segment)?;
        segment = child;
    }
    write_leaf(&current, segment, value)
}

/// Whether a non-null value is set at `path`.
///
/// Nulls, missing collections and out-of-bounds indices on the way count
/// as absent. Undeclared names and malformed indices are still errors, also
/// past a null step, where names are checked against the declared types.
pub fn resolve_contains(bean: &Bean, path: &PathExpression) -> Result<bool> {
    let mut current = bean.clone();
    let mut segment = path.root();
    while let Some(child) = segment.child() {
        let (value, declared) = {
            let state = current.read()?;
            let store = &state.store;
            (read_segment_lenient(store, segment)?, declared_type(store, segment)?)
        };
        current = match value {
            Some(Value::Bean(nested)) => nested,
            None | Some(Value::Null) => {
                check_declared(declared, child)?;
                return Ok(false);
            }
            Some(other) => return Err(not_navigable(segment, Some(&other))),
        };
        segment = child;
    }

    let state = current.read()?;
    if !segment.is_indexed() {
        return state.store.contains_key(segment.name());
    }
    let value = read_segment_lenient(&state.store, segment)?;
    Ok(value.is_some_and(|v| !v.is_null()))
}

/// Clears the value at `path` and returns it.
///
/// Removing an indexed leaf resets the slot to the default value of the
/// element type. Nothing happens if a step before the leaf is null, though
/// the rest of the path must still name declared properties.
pub fn resolve_remove(bean: &Bean, path: &PathExpression) -> Result<Option<Value>> {
    let mut current = bean.clone();
    let mut segment = path.root();
    while let Some(child) = segment.child() {
        let (value, declared) = {
            let state = current.read()?;
            let store = &state.store;
            (read_segment_lenient(store, segment)?, declared_type(store, segment)?)
        };
        current = match value {
            Some(Value::Bean(nested)) => nested,
            None | Some(Value::Null) => {
                check_declared(declared, child)?;
                return Ok(None);
            }
            Some(other) => return Err(not_navigable(segment, Some(&other))),
        };
        segment = child;
    }

    let mut state = current.write()?;
    let store = &mut state.store;
    if !segment.is_indexed() {
        return store.remove(segment.name());
    }
    store.check_mutable()?;
    let element = element_type(store, segment)?;
    let index = require_index(segment)?;
    let reset = element.default_value();

    if let Some(delegate) = store.delegate(segment.name()).cloned() {
        let previous = delegate.get_indexed(segment.name(), index)?;
        delegate.put_indexed(segment.name(), index, reset)?;
        return Ok((!previous.is_null()).then_some(previous));
    }

    let slot = element_mut(store, segment, index)?;
    let previous = core::mem::replace(slot, reset);
    Ok((!previous.is_null()).then_some(previous))
}

// -----------------------------------------------------------------------------
// Steps

/// Evaluates one segment against one store, validating name and index.
fn read_segment(store: &PropertyStore, segment: SegmentRef<'_>) -> Result<Option<Value>> {
    store.property(segment.name())?;
    if !segment.is_indexed() {
        return store.get(segment.name());
    }

    let index = require_index(segment)?;
    if let Some(delegate) = store.delegate(segment.name()) {
        return delegate.get_indexed(segment.name(), index).map(Some);
    }

    let items = collection(store.get_raw(segment.name()), segment)?;
    match items.get(index) {
        Some(item) => Ok(Some(item.clone())),
        None => Err(out_of_bounds(segment, index, items.len())),
    }
}

/// Like [`read_segment`], with null collections and bad bounds read as unset.
fn read_segment_lenient(store: &PropertyStore, segment: SegmentRef<'_>) -> Result<Option<Value>> {
    match read_segment(store, segment) {
        Err(BeanError::NullIndexTarget { .. } | BeanError::IndexOutOfBounds { .. }) => Ok(None),
        other => other,
    }
}

fn descend_for_write(bean: &Bean, segment: SegmentRef<'_>) -> Result<Bean> {
    let (value, declared) = {
        let state = bean.read()?;
        let store = &state.store;
        (read_segment(store, segment)?, declared_type(store, segment)?)
    };

    match value {
        Some(Value::Bean(nested)) => Ok(nested),
        None | Some(Value::Null) => {
            bean.read()?.store.check_mutable()?;
            let interface = match declared {
                Some(PropertyType::Interface(interface)) => interface,
                other => {
                    return Err(BeanError::NotInstantiable {
                        path: segment.to_root_path().to_string(),
                        ty: other.unwrap_or(PropertyType::Any),
                    });
                }
            };
            let nested = Bean::create(&[interface], core::iter::empty::<(&str, Value)>())?;
            trace!(
                "created `{interface}` for `{}` on `{}`",
                segment.to_root_path(),
                bean.descriptor().name()
            );
            write_leaf(bean, segment, Value::Bean(nested.clone()))?;
            Ok(nested)
        }
        Some(other) => Err(not_navigable(segment, Some(&other))),
    }
}

fn write_leaf(bean: &Bean, segment: SegmentRef<'_>, value: Value) -> Result<Option<Value>> {
    let mut state = bean.write()?;
    let store = &mut state.store;
    if !segment.is_indexed() {
        return store.put(segment.name(), value);
    }

    store.check_mutable()?;
    let element = element_type(store, segment)?;
    let index = require_index(segment)?;
    let found = value.kind_name();
    let Some(value) = coerce(value, &element) else {
        return Err(BeanError::TypeMismatch {
            property: segment.to_root_path().to_string(),
            expected: element,
            found,
        });
    };

    if let Some(delegate) = store.delegate(segment.name()).cloned() {
        delegate.put_indexed(segment.name(), index, value)?;
        return Ok(None);
    }

    let slot = element_mut(store, segment, index)?;
    let previous = core::mem::replace(slot, value);
    Ok((!previous.is_null()).then_some(previous))
}

/// Walks `segment` and its children through declared interface types only.
///
/// Stops quietly at the first step whose type is not an interface.
fn check_declared(mut declared: Option<PropertyType>, mut segment: SegmentRef<'_>) -> Result<()> {
    loop {
        let Some(PropertyType::Interface(interface)) = declared else {
            return Ok(());
        };
        let descriptor = compose_with_hooks(&[interface])?;
        let Some(property) = descriptor.property(segment.name()) else {
            return Err(BeanError::UnknownProperty {
                property: segment.name().to_string(),
                bean: descriptor.name().to_string(),
            });
        };
        declared = if segment.is_indexed() {
            require_index(segment)?;
            property.element_type().cloned()
        } else {
            Some(property.ty().clone())
        };
        match segment.child() {
            Some(child) => segment = child,
            None => return Ok(()),
        }
    }
}

// -----------------------------------------------------------------------------
// Helpers

/// Declared type of the slot `segment` addresses, `None` when indexing a
/// property that is not a collection.
fn declared_type(store: &PropertyStore, segment: SegmentRef<'_>) -> Result<Option<PropertyType>> {
    let property = store.property(segment.name())?;
    Ok(if segment.is_indexed() {
        property.element_type().cloned()
    } else {
        Some(property.ty().clone())
    })
}

fn require_index(segment: SegmentRef<'_>) -> Result<usize> {
    segment.index().ok_or_else(|| BeanError::InvalidIndex {
        path: segment.to_root_path().to_string(),
    })
}

/// Element type of the indexed property named by `segment`.
fn element_type(store: &PropertyStore, segment: SegmentRef<'_>) -> Result<PropertyType> {
    let property = store.property(segment.name())?;
    match property.element_type() {
        Some(element) => Ok(element.clone()),
        None => Err(BeanError::NotNavigable {
            path: segment.to_root_path().to_string(),
            found: "a property that is not a collection",
        }),
    }
}

fn collection<'a>(value: Option<&'a Value>, segment: SegmentRef<'_>) -> Result<&'a [Value]> {
    match value {
        None | Some(Value::Null) => Err(BeanError::NullIndexTarget {
            path: segment.to_root_path().to_string(),
        }),
        Some(value) => value
            .as_slice()
            .ok_or_else(|| not_navigable(segment, Some(value))),
    }
}

fn element_mut<'a>(
    store: &'a mut PropertyStore,
    segment: SegmentRef<'_>,
    index: usize,
) -> Result<&'a mut Value> {
    let path = || segment.to_root_path().to_string();
    let Some(value) = store.slot_mut(segment.name()).filter(|v| !v.is_null()) else {
        return Err(BeanError::NullIndexTarget { path: path() });
    };
    let found = value.kind_name();
    let Some(items) = value.as_mut_slice() else {
        return Err(BeanError::NotNavigable { path: path(), found });
    };
    let len = items.len();
    items.get_mut(index).ok_or_else(|| BeanError::IndexOutOfBounds {
        path: path(),
        index,
        len,
    })
}

fn out_of_bounds(segment: SegmentRef<'_>, index: usize, len: usize) -> BeanError {
    BeanError::IndexOutOfBounds {
        path: segment.to_root_path().to_string(),
        index,
        len,
    }
}

fn not_navigable(segment: SegmentRef<'_>, value: Option<&Value>) -> BeanError {
    BeanError::NotNavigable {
        path: segment.to_root_path().to_string(),
        found: value.map_or("null", Value::kind_name),
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::rc::Rc;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    use super::{resolve_contains, resolve_get, resolve_put, resolve_remove};
    use crate::info::{Interface, InterfaceInfo, InterfaceInfoCell, PropertyType};
    use crate::path::PathExpression;
    use crate::store::PropertyDelegate;
    use crate::testing::{Child, Parent, child, parent};
    use crate::{Bean, BeanError, Result, Value};

    fn path(text: &str) -> PathExpression {
        PathExpression::parse(text).unwrap()
    }

    #[test]
    fn nested_write_creates_intermediate_beans() {
        let bean = parent();
        assert_eq!(resolve_put(&bean, &path("child.value"), Value::I32(5)).unwrap(), None);

        let nested = bean.get_child().unwrap().unwrap();
        assert!(nested.implements::<dyn Child>());
        assert_eq!(nested.get_value().unwrap(), 5);
        assert_eq!(
            resolve_get(&bean, &path("child.value")).unwrap(),
            Some(Value::I32(5))
        );
        assert_eq!(
            resolve_put(&bean, &path("child.value"), Value::I32(6)).unwrap(),
            Some(Value::I32(5))
        );
    }

    #[test]
    fn reading_through_null_fails() {
        let bean = parent();
        assert_eq!(resolve_get(&bean, &path("child")).unwrap(), None);
        assert!(matches!(
            resolve_get(&bean, &path("child.value")),
            Err(BeanError::NotNavigable { found: "null", .. })
        ));
        assert!(matches!(
            resolve_get(&bean, &path("name.value")),
            Err(BeanError::NotNavigable { .. })
        ));
        assert!(matches!(
            resolve_get(&bean, &path("child.missing")),
            Err(BeanError::NotNavigable { .. })
        ));
        assert!(matches!(
            resolve_get(&bean, &path("missing")),
            Err(BeanError::UnknownProperty { .. })
        ));
    }

    #[test]
    fn indexed_access() {
        let bean = parent();
        assert!(matches!(
            resolve_get(&bean, &path("children[0]")),
            Err(BeanError::NullIndexTarget { .. })
        ));

        let children: Box<[Bean]> = Box::new([child(1), child(2)]);
        bean.set_children(children).unwrap();
        assert_eq!(
            resolve_get(&bean, &path("children[1].value")).unwrap(),
            Some(Value::I32(2))
        );
        resolve_put(&bean, &path("children[0].value"), Value::I32(10)).unwrap();
        assert_eq!(bean.get_children().unwrap().unwrap()[0].get_value().unwrap(), 10);

        assert!(matches!(
            resolve_get(&bean, &path("children[2]")),
            Err(BeanError::IndexOutOfBounds { index: 2, len: 2, .. })
        ));
        assert!(matches!(
            resolve_get(&bean, &path("children[x]")),
            Err(BeanError::InvalidIndex { .. })
        ));
        assert!(matches!(
            resolve_put(&bean, &path("children[0]"), Value::from("text")),
            Err(BeanError::TypeMismatch { .. })
        ));
        bean.set_name("plain").unwrap();
        assert!(matches!(
            resolve_get(&bean, &path("name[0]")),
            Err(BeanError::NotNavigable { found: "String", .. })
        ));
    }

    #[test]
    fn null_elements_are_instantiated() {
        let bean = parent();
        let element = PropertyType::interface::<dyn Child>();
        bean.put("children", Value::new_array(&element, 2)).unwrap();
        resolve_put(&bean, &path("children[1].value"), Value::I32(3)).unwrap();

        assert_eq!(
            resolve_get(&bean, &path("children[1].value")).unwrap(),
            Some(Value::I32(3))
        );
        assert_eq!(resolve_get(&bean, &path("children[0]")).unwrap(), None);
    }

    struct Loose;

    impl Interface for Loose {
        fn interface_info() -> &'static InterfaceInfo {
            static CELL: InterfaceInfoCell = InterfaceInfoCell::new();
            CELL.get_or_init(|| {
                InterfaceInfo::builder::<Self>()
                    .property("anything", PropertyType::Any)
                    .build()
            })
        }
    }

    struct Scored;

    impl Interface for Scored {
        fn interface_info() -> &'static InterfaceInfo {
            static CELL: InterfaceInfoCell = InterfaceInfoCell::new();
            CELL.get_or_init(|| {
                InterfaceInfo::builder::<Self>()
                    .property("scores", PropertyType::list(PropertyType::I32))
                    .build()
            })
        }
    }

    struct Scores(RefCell<Vec<Value>>);

    impl PropertyDelegate for Scores {
        fn value_type(&self) -> PropertyType {
            PropertyType::I32
        }

        fn get_indexed(&self, _: &str, index: usize) -> Result<Value> {
            Ok(self.0.borrow()[index].clone())
        }

        fn put_indexed(&self, _: &str, index: usize, value: Value) -> Result<()> {
            self.0.borrow_mut()[index] = value;
            Ok(())
        }
    }

    #[test]
    fn indexed_delegates_serve_elements() {
        let bean = Bean::new::<Scored>().unwrap();
        let scores = Rc::new(Scores(RefCell::new(vec![Value::I32(0); 3])));
        bean.attach_property_delegate("scores", scores.clone()).unwrap();
        assert!(bean.is_property_delegated("scores").unwrap());

        assert_eq!(resolve_put(&bean, &path("scores[1]"), Value::from("5")).unwrap(), None);
        assert_eq!(scores.0.borrow()[1], Value::I32(5));
        assert_eq!(
            resolve_get(&bean, &path("scores[1]")).unwrap(),
            Some(Value::I32(5))
        );
        assert!(resolve_contains(&bean, &path("scores[1]")).unwrap());
        assert!(bean.store().unwrap().get_raw("scores").is_none());

        assert_eq!(
            resolve_remove(&bean, &path("scores[1]")).unwrap(),
            Some(Value::I32(5))
        );
        assert_eq!(scores.0.borrow()[1], Value::I32(0));
        assert!(matches!(
            resolve_get(&bean, &path("scores")),
            Err(BeanError::UnsupportedFeature(_))
        ));
    }

    #[test]
    fn only_interfaces_are_instantiated() {
        let bean = Bean::new::<Loose>().unwrap();
        assert!(matches!(
            resolve_put(&bean, &path("anything.value"), Value::I32(1)),
            Err(BeanError::NotInstantiable { .. })
        ));
        assert!(bean.store().unwrap().is_empty());
    }

    #[test]
    fn contains_is_lenient() {
        let bean = parent();
        assert!(!resolve_contains(&bean, &path("child.value")).unwrap());
        assert!(!resolve_contains(&bean, &path("children[3].value")).unwrap());

        bean.put("child.value", 1).unwrap();
        assert!(resolve_contains(&bean, &path("child")).unwrap());
        assert!(resolve_contains(&bean, &path("child.value")).unwrap());
        assert!(resolve_contains(&bean, &path("missing")).is_err());
    }

    #[test]
    fn undeclared_names_fail_whether_or_not_the_way_is_null() {
        let bean = parent();
        for text in ["child.missing", "children[0].missing", "children[x].value"] {
            assert!(resolve_contains(&bean, &path(text)).is_err(), "{text}");
            assert!(resolve_remove(&bean, &path(text)).is_err(), "{text}");
        }
        assert!(matches!(
            resolve_contains(&bean, &path("child.missing")),
            Err(BeanError::UnknownProperty { .. })
        ));

        bean.put("child.value", 1).unwrap();
        assert!(matches!(
            resolve_contains(&bean, &path("child.missing")),
            Err(BeanError::UnknownProperty { .. })
        ));
        assert!(matches!(
            resolve_remove(&bean, &path("child.missing")),
            Err(BeanError::UnknownProperty { .. })
        ));
    }

    #[test]
    fn remove_resets_indexed_slots() {
        let bean = parent();
        assert_eq!(resolve_remove(&bean, &path("child.value")).unwrap(), None);

        bean.put("tags", vec!["a", "b"]).unwrap();
        assert_eq!(
            resolve_remove(&bean, &path("tags[0]")).unwrap(),
            Some(Value::from("a"))
        );
        assert_eq!(
            bean.get("tags").unwrap(),
            Some(Value::List(vec![Value::Null, Value::from("b")]))
        );

        bean.put("child.value", 4).unwrap();
        assert_eq!(
            resolve_remove(&bean, &path("child.value")).unwrap(),
            Some(Value::I32(4))
        );
        assert!(!bean.contains("child.value").unwrap());
        assert!(bean.contains("child").unwrap());
    }
}
