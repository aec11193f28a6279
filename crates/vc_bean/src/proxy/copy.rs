use alloc::format;
use alloc::sync::Arc;

use super::Bean;
use crate::info::{BeanDescriptor, InterfaceRef};
use crate::nesting::NestingGuard;
use crate::{BeanError, Result};

impl Bean {
    /// Copies this bean.
    ///
    /// A shallow copy shares nested beans with the original, a deep copy
    /// copies the whole graph. Attached behaviors and property delegates are
    /// shared either way. The copy is always modifiable.
    ///
    /// # Errors
    ///
    /// [`BeanError::ExcessiveNesting`] if a deep copy exceeds the nesting
    /// limit, which is what happens on cyclic graphs.
    pub fn copy(&self, deep: bool) -> Result<Bean> {
        self.copy_with(deep, false)
    }

    /// A deep copy in which every bean, nested ones included, rejects writes
    /// with [`BeanError::ImmutableState`].
    pub fn unmodifiable_copy(&self) -> Result<Bean> {
        self.copy_with(true, true)
    }

    pub(crate) fn copy_with(&self, deep: bool, immutable: bool) -> Result<Bean> {
        let _guard = NestingGuard::enter()?;
        let state = self.read()?;
        let store = state.store.copy(deep, immutable)?;
        Ok(Bean::from_parts(store, state.dispatch.clone()))
    }

    /// A copy that implements only `types`.
    ///
    /// Values of properties the narrower types do not declare are left out.
    /// Behaviors and delegates that still apply are shared.
    ///
    /// # Errors
    ///
    /// [`BeanError::Argument`] if this bean does not implement one of `types`.
    pub fn view(&self, types: &[InterfaceRef]) -> Result<Bean> {
        if let Some(missing) = types.iter().find(|ty| !self.implements_ref(ty)) {
            return Err(BeanError::Argument(format!(
                "`{}` does not implement `{missing}`",
                self.descriptor().name()
            )));
        }

        let descriptor = Arc::new(BeanDescriptor::compose(types)?);
        let state = self.read()?;
        let store = state.store.restrict(Arc::clone(&descriptor));
        let dispatch = state.dispatch.restrict(&descriptor);
        Ok(Bean::from_parts(store, dispatch))
    }
}
