use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec::Vec;

use log::trace;

use super::Bean;
use crate::access::resolve_put;
use crate::dispatch::InterfaceDispatchRegistry;
use crate::info::{BeanDescriptor, Interface, InterfaceRef};
use crate::nesting::NestingGuard;
use crate::path::PathExpression;
use crate::store::PropertyStore;
use crate::{BeanError, Result, Value};

impl Bean {
    /// Creates a bean implementing `types`, populated from `initial`.
    ///
    /// Initial keys may be dotted or indexed paths; missing intermediate
    /// beans are created on the way. Keys are applied by path depth, and a
    /// plain key before an indexed key of the same depth, whatever the order
    /// of `initial`.
    /// Construction hooks of the implemented interfaces run last.
    ///
    /// # Errors
    ///
    /// - Composition errors of [`BeanDescriptor::compose`].
    /// - [`BeanError::InvalidPropertyValue`] wrapping the cause for any
    ///   initial value that cannot be applied, unknown keys included.
    /// - [`BeanError::ExcessiveNesting`] if construction recurses too deep.
    pub fn create<K, V>(
        types: &[InterfaceRef],
        initial: impl IntoIterator<Item = (K, V)>,
    ) -> Result<Bean>
    where
        K: AsRef<str>,
        V: Into<Value>,
    {
        let _guard = NestingGuard::enter()?;
        let descriptor = Arc::new(compose_with_hooks(types)?);
        let bean = Bean::from_parts(
            PropertyStore::new(Arc::clone(&descriptor)),
            InterfaceDispatchRegistry::new(&descriptor),
        );

        let mut initial = initial
            .into_iter()
            .map(|(key, value)| {
                let key = key.as_ref();
                let path = PathExpression::parse(key).map_err(|e| invalid_value(key, e))?;
                Ok((key.to_string(), path, value.into()))
            })
            .collect::<Result<Vec<(String, PathExpression, Value)>>>()?;
        // Shallow paths first, so `a` is set before `a[0]` or `a.b`.
        initial.sort_by_key(|(_, path, _)| (path.len(), path.leaf().is_indexed()));
        for (key, path, value) in initial {
            resolve_put(&bean, &path, value).map_err(|e| invalid_value(&key, e))?;
        }

        for interface in descriptor.interfaces() {
            for hook in interface.info().hooks() {
                trace!("running construction hook of `{interface}`");
                hook.post_construct(&bean)?;
            }
        }
        Ok(bean)
    }

    /// Creates an empty bean implementing `T`.
    pub fn new<T: Interface + ?Sized>() -> Result<Bean> {
        Self::create(&[InterfaceRef::of::<T>()], core::iter::empty::<(&str, Value)>())
    }
}

// Hooks may add interfaces, whose own hooks may add more.
pub(crate) fn compose_with_hooks(types: &[InterfaceRef]) -> Result<BeanDescriptor> {
    let mut types = types.to_vec();
    loop {
        let descriptor = BeanDescriptor::compose(&types)?;
        let mut grown = false;
        for interface in descriptor.interfaces() {
            for hook in interface.info().hooks() {
                for extra in hook.additional_interfaces() {
                    if !descriptor.implements(extra.id()) && !types.contains(&extra) {
                        trace!("`{interface}` adds `{extra}` to a new bean");
                        types.push(extra);
                        grown = true;
                    }
                }
            }
        }
        if !grown {
            return Ok(descriptor);
        }
    }
}

fn invalid_value(key: &str, source: BeanError) -> BeanError {
    BeanError::InvalidPropertyValue {
        key: key.to_string(),
        source: Box::new(source),
    }
}
