use alloc::format;
use alloc::rc::Rc;
use alloc::string::ToString;
use alloc::vec::Vec;
use core::fmt;

use log::warn;

use super::InterfaceBehavior;
use crate::info::{BeanDescriptor, InterfaceRef};
use crate::{Bean, BeanError, Result, Value};

#[derive(Clone)]
struct Slot {
    interface: InterfaceRef,
    behavior: Option<Rc<dyn InterfaceBehavior>>,
}

/// The attached behaviors of one bean, one slot per delegatable interface.
///
/// The set of slots is fixed when the bean is created.
#[derive(Clone, Default)]
pub struct InterfaceDispatchRegistry {
    slots: Vec<Slot>,
}

impl InterfaceDispatchRegistry {
    /// Empty slots for every delegatable interface of `descriptor`.
    pub fn new(descriptor: &BeanDescriptor) -> Self {
        Self {
            slots: descriptor
                .delegatable()
                .iter()
                .map(|interface| Slot {
                    interface: *interface,
                    behavior: None,
                })
                .collect(),
        }
    }

    /// Interfaces that have a slot.
    pub fn interfaces(&self) -> impl Iterator<Item = InterfaceRef> + '_ {
        self.slots.iter().map(|slot| slot.interface)
    }

    fn position(&self, interface: &InterfaceRef) -> Result<usize> {
        self.slots
            .iter()
            .position(|slot| slot.interface == *interface)
            .ok_or_else(|| {
                BeanError::Argument(format!("`{interface}` is not a delegatable interface"))
            })
    }

    /// Attaches `behavior` to the slot of its interface.
    ///
    /// A previously attached behavior is replaced.
    ///
    /// # Errors
    ///
    /// - [`BeanError::Argument`] if the interface has no slot here.
    /// - [`BeanError::InvalidDelegate`] if the behavior lacks one of the
    ///   behavioral methods, or implements it with another signature.
    pub fn attach(&mut self, behavior: Rc<dyn InterfaceBehavior>) -> Result<()> {
        let interface = behavior.interface();
        let index = self.position(&interface)?;
        validate(&interface, &*behavior)?;

        if self.slots[index].behavior.replace(behavior).is_some() {
            warn!("replaced the behavior attached for `{interface}`");
        }
        Ok(())
    }

    /// Empties the slot of `interface`.
    ///
    /// Returns whether a behavior was attached.
    pub fn detach(&mut self, interface: &InterfaceRef) -> bool {
        self.slots
            .iter_mut()
            .find(|slot| slot.interface == *interface)
            .and_then(|slot| slot.behavior.take())
            .is_some()
    }

    /// # Errors
    ///
    /// [`BeanError::Argument`] if the interface has no slot here.
    pub fn is_attached(&self, interface: &InterfaceRef) -> Result<bool> {
        let index = self.position(interface)?;
        Ok(self.slots[index].behavior.is_some())
    }

    /// The behavior attached for `interface`.
    ///
    /// # Errors
    ///
    /// - [`BeanError::Argument`] if the interface has no slot here.
    /// - [`BeanError::IllegalState`] if nothing is attached.
    pub fn behavior(&self, interface: &InterfaceRef) -> Result<Rc<dyn InterfaceBehavior>> {
        let index = self.position(interface)?;
        self.slots[index].behavior.clone().ok_or_else(|| {
            BeanError::IllegalState(format!("no behavior is attached for `{interface}`"))
        })
    }

    /// Forwards a call of `method` to the behavior attached for `interface`.
    ///
    /// The registry must not sit behind a borrow of `bean`'s state, the
    /// behavior may call back into the bean.
    ///
    /// # Errors
    ///
    /// Those of [`behavior`](Self::behavior), and whatever the behavior
    /// returns.
    pub fn dispatch(
        &self,
        bean: &Bean,
        interface: &InterfaceRef,
        method: &str,
        args: &[Value],
    ) -> Result<Value> {
        self.behavior(interface)?.invoke(bean, method, args)
    }

    /// Keeps the slots that `descriptor` still has.
    pub(crate) fn restrict(&self, descriptor: &BeanDescriptor) -> Self {
        let mut restricted = Self::new(descriptor);
        for slot in &mut restricted.slots {
            if let Some(known) = self.slots.iter().find(|s| s.interface == slot.interface) {
                slot.behavior = known.behavior.clone();
            }
        }
        restricted
    }
}

fn validate(interface: &InterfaceRef, behavior: &dyn InterfaceBehavior) -> Result<()> {
    let provided = behavior.methods();
    for required in interface.info().behavioral_methods() {
        if provided.contains(required) {
            continue;
        }
        let reason = match provided.iter().find(|sig| sig.name() == required.name()) {
            Some(found) => format!("`{found}` does not match `{required}`"),
            None => format!("`{required}` is not implemented"),
        };
        return Err(BeanError::InvalidDelegate {
            target: interface.to_string(),
            reason,
        });
    }
    Ok(())
}

impl fmt::Debug for InterfaceDispatchRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.slots
                    .iter()
                    .map(|slot| (slot.interface, slot.behavior.is_some())),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec;
    use alloc::vec::Vec;

    use super::InterfaceDispatchRegistry;
    use crate::dispatch::InterfaceBehavior;
    use crate::info::{
        BeanDescriptor, Interface, InterfaceInfo, InterfaceInfoCell, InterfaceRef,
        MethodSignature, PropertyType,
    };
    use crate::{Bean, BeanError, Result, Value};

    struct Greeter;
    struct Plain;

    impl Interface for Greeter {
        fn interface_info() -> &'static InterfaceInfo {
            static CELL: InterfaceInfoCell = InterfaceInfoCell::new();
            CELL.get_or_init(|| {
                InterfaceInfo::builder::<Self>()
                    .method(
                        MethodSignature::new("greet")
                            .param(PropertyType::String)
                            .returns(PropertyType::String),
                    )
                    .build()
            })
        }
    }

    impl Interface for Plain {
        fn interface_info() -> &'static InterfaceInfo {
            static CELL: InterfaceInfoCell = InterfaceInfoCell::new();
            CELL.get_or_init(|| {
                InterfaceInfo::builder::<Self>()
                    .property("name", PropertyType::String)
                    .build()
            })
        }
    }

    struct Hello(Vec<MethodSignature>);

    impl InterfaceBehavior for Hello {
        fn interface(&self) -> InterfaceRef {
            InterfaceRef::of::<Greeter>()
        }

        fn methods(&self) -> Vec<MethodSignature> {
            self.0.clone()
        }

        fn invoke(&self, _: &Bean, _: &str, args: &[Value]) -> Result<Value> {
            Ok(Value::String(alloc::format!("hello {}", args[0])))
        }
    }

    fn registry() -> InterfaceDispatchRegistry {
        let descriptor = BeanDescriptor::compose(&[
            InterfaceRef::of::<Greeter>(),
            InterfaceRef::of::<Plain>(),
        ])
        .unwrap();
        InterfaceDispatchRegistry::new(&descriptor)
    }

    fn greet() -> MethodSignature {
        MethodSignature::new("greet")
            .param(PropertyType::String)
            .returns(PropertyType::String)
    }

    #[test]
    fn slots_for_delegatable_interfaces_only() {
        let registry = registry();
        let slots: Vec<_> = registry.interfaces().collect();
        assert_eq!(slots, [InterfaceRef::of::<Greeter>()]);
        assert!(!registry.is_attached(&InterfaceRef::of::<Greeter>()).unwrap());
        assert!(matches!(
            registry.is_attached(&InterfaceRef::of::<Plain>()),
            Err(BeanError::Argument(_))
        ));
        assert!(matches!(
            registry.behavior(&InterfaceRef::of::<Greeter>()),
            Err(BeanError::IllegalState(_))
        ));
    }

    #[test]
    fn attach_validates_structure() {
        let mut registry = registry();

        let missing = Rc::new(Hello(vec![]));
        assert!(matches!(
            registry.attach(missing),
            Err(BeanError::InvalidDelegate { .. })
        ));

        let wrong = Rc::new(Hello(vec![MethodSignature::new("greet").param(PropertyType::String)]));
        assert!(matches!(
            registry.attach(wrong),
            Err(BeanError::InvalidDelegate { .. })
        ));

        let extra = MethodSignature::new("wave");
        registry.attach(Rc::new(Hello(vec![extra, greet()]))).unwrap();
        assert!(registry.is_attached(&InterfaceRef::of::<Greeter>()).unwrap());

        assert!(registry.detach(&InterfaceRef::of::<Greeter>()));
        assert!(!registry.detach(&InterfaceRef::of::<Greeter>()));
        assert!(!registry.detach(&InterfaceRef::of::<Plain>()));
    }

    #[test]
    fn dispatch_forwards_to_the_attached_behavior() {
        let mut registry = registry();
        let bean = Bean::new::<Greeter>().unwrap();
        let greeter = InterfaceRef::of::<Greeter>();
        let args = [Value::from("you")];

        assert!(matches!(
            registry.dispatch(&bean, &greeter, "greet", &args),
            Err(BeanError::IllegalState(_))
        ));
        assert!(matches!(
            registry.dispatch(&bean, &InterfaceRef::of::<Plain>(), "greet", &args),
            Err(BeanError::Argument(_))
        ));

        registry.attach(Rc::new(Hello(vec![greet()]))).unwrap();
        assert_eq!(
            registry.dispatch(&bean, &greeter, "greet", &args).unwrap(),
            Value::from("hello you")
        );
    }
}
