use alloc::vec::Vec;

use crate::info::InterfaceRef;
use crate::{Bean, Result};

/// Extension point run while a bean is created.
///
/// Hooks are registered per interface with
/// [`InterfaceInfoBuilder::construction_hook`]. When a bean implementing the
/// interface is created, [`additional_interfaces`] may widen the set of
/// implemented interfaces, and [`post_construct`] runs once the initial
/// values are applied. Hooks run in interface declaration order, under the
/// same nesting limit as deep copies.
///
/// [`InterfaceInfoBuilder::construction_hook`]: crate::info::InterfaceInfoBuilder::construction_hook
/// [`additional_interfaces`]: ConstructionHook::additional_interfaces
/// [`post_construct`]: ConstructionHook::post_construct
pub trait ConstructionHook: Send + Sync {
    fn additional_interfaces(&self) -> Vec<InterfaceRef> {
        Vec::new()
    }

    fn post_construct(&self, bean: &Bean) -> Result<()> {
        let _ = bean;
        Ok(())
    }
}
