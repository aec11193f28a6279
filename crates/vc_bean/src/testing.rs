//! Interfaces shared by the unit tests.

use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use crate::dispatch::InterfaceBehavior;
use crate::info::{
    Interface, InterfaceInfo, InterfaceInfoCell, InterfaceRef, MethodSignature, PropertyType,
};
use crate::proxy::ConstructionHook;
use crate::{Bean, Result, Value, bean};

#[bean]
pub(crate) trait Child {
    fn get_value(&self) -> Result<i32>;
    fn set_value(&self, value: i32) -> Result<()>;
}

#[bean]
pub(crate) trait Parent {
    fn get_name(&self) -> Result<Option<String>>;
    fn set_name(&self, name: &str) -> Result<()>;

    #[bean(property_type = PropertyType::interface::<dyn Child>())]
    fn get_child(&self) -> Result<Option<Bean>>;
    #[bean(property_type = PropertyType::interface::<dyn Child>())]
    fn set_child(&self, child: Bean) -> Result<()>;

    #[bean(property_type = PropertyType::array(PropertyType::interface::<dyn Child>()))]
    fn get_children(&self) -> Result<Option<Box<[Bean]>>>;
    #[bean(property_type = PropertyType::array(PropertyType::interface::<dyn Child>()))]
    fn set_children(&self, children: Box<[Bean]>) -> Result<()>;

    fn get_tags(&self) -> Result<Option<Vec<String>>>;
    fn set_tags(&self, tags: Vec<String>) -> Result<()>;
}

#[bean]
pub(crate) trait Node {
    fn get_id(&self) -> Result<i64>;
    fn set_id(&self, id: i64) -> Result<()>;

    #[bean(property_type = PropertyType::interface::<dyn Node>())]
    fn get_next(&self) -> Result<Option<Bean>>;
    #[bean(property_type = PropertyType::interface::<dyn Node>())]
    fn set_next(&self, next: Bean) -> Result<()>;
}

#[bean]
pub(crate) trait Greeter: Child {
    fn greet(&self, whom: &str) -> Result<String>;
}

/// Answers `greet` with the greeted name and the bean's own value.
pub(crate) struct Polite;

impl InterfaceBehavior for Polite {
    fn interface(&self) -> InterfaceRef {
        InterfaceRef::of::<dyn Greeter>()
    }

    fn methods(&self) -> Vec<MethodSignature> {
        self.interface()
            .info()
            .behavioral_methods()
            .cloned()
            .collect()
    }

    fn invoke(&self, bean: &Bean, _: &str, args: &[Value]) -> Result<Value> {
        let whom = args.first().and_then(Value::as_str).unwrap_or("nobody");
        Ok(Value::from(format!("hello {whom} from #{}", bean.get_value()?)))
    }
}

/// Marks new beans as audited and pulls in `Child`.
pub(crate) struct Audited;

impl Interface for Audited {
    fn interface_info() -> &'static InterfaceInfo {
        static CELL: InterfaceInfoCell = InterfaceInfoCell::new();
        CELL.get_or_init(|| {
            InterfaceInfo::builder::<Self>()
                .property("audited", PropertyType::Bool)
                .construction_hook(AuditHook)
                .build()
        })
    }
}

struct AuditHook;

impl ConstructionHook for AuditHook {
    fn additional_interfaces(&self) -> Vec<InterfaceRef> {
        vec![InterfaceRef::of::<dyn Child>()]
    }

    fn post_construct(&self, bean: &Bean) -> Result<()> {
        bean.put("audited", true)?;
        if !bean.contains("value")? {
            bean.set_value(7)?;
        }
        Ok(())
    }
}

pub(crate) fn child(value: i32) -> Bean {
    Bean::create(&[InterfaceRef::of::<dyn Child>()], [("value", value)]).unwrap()
}

pub(crate) fn parent() -> Bean {
    Bean::new::<dyn Parent>().unwrap()
}
