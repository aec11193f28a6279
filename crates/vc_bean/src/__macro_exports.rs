//! Items used by code generated from `#[bean]`. Not public API.

use alloc::format;
use alloc::vec::Vec;

use crate::value::FromValue;
use crate::{Bean, BeanError, Result, Value};

/// Calls `method` on `bean` and converts the result to `T`.
#[doc(hidden)]
pub fn invoke<T: FromValue>(bean: &Bean, method: &str, args: Vec<Value>) -> Result<T> {
    let value = bean.invoke(method, &args)?;
    T::from_value(&value).ok_or_else(|| {
        BeanError::IllegalState(format!(
            "`{method}` returned a {} value that does not fit its signature",
            value.kind_name()
        ))
    })
}

#[cfg(feature = "auto_register")]
#[doc(hidden)]
pub mod auto_register {
    pub use inventory;

    use crate::info::{Interface, InterfaceInfo, InterfaceInfoCell, InterfaceRef};
    use crate::registry::TypeRegistry;

    /// One interface submitted by `#[bean(auto_register)]`.
    pub struct AutoRegisterInterface(pub fn() -> InterfaceRef);

    inventory::collect!(AutoRegisterInterface);

    /// Always submitted; its presence after collection tells whether
    /// link-time registration works on this platform.
    pub struct __AvailFlag;

    impl Interface for __AvailFlag {
        fn interface_info() -> &'static InterfaceInfo {
            static CELL: InterfaceInfoCell = InterfaceInfoCell::new();
            CELL.get_or_init(|| InterfaceInfo::builder::<Self>().build())
        }
    }

    inventory::submit! {
        AutoRegisterInterface(InterfaceRef::of::<__AvailFlag>)
    }

    pub fn __register_interfaces(registry: &mut TypeRegistry) {
        for entry in inventory::iter::<AutoRegisterInterface> {
            registry.register_ref((entry.0)());
        }
    }
}
