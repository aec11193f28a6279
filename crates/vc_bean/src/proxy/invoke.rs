use alloc::format;
use alloc::string::ToString;

use super::Bean;
use crate::access::{resolve_get, resolve_put};
use crate::info::Route;
use crate::path::PathExpression;
use crate::value::FromValue;
use crate::{BeanError, Result, Value};

impl Bean {
    /// Calls an interface method by name.
    ///
    /// Accessors go to the property store, `equals` and `to_string` are
    /// answered by the bean itself, and behavioral methods are forwarded to
    /// the attached behavior. No borrow of the bean is held while a
    /// behavior runs, so behaviors may freely call back into the bean.
    ///
    /// Getters of unset properties return the default value of the
    /// property type; setters return [`Value::Null`].
    ///
    /// # Errors
    ///
    /// - [`BeanError::Argument`] if no method `method` takes `args.len()`
    ///   arguments, or an index argument is not a non-negative integer.
    /// - [`BeanError::IllegalState`] if a behavioral method has no behavior.
    /// - Whatever the store, the resolver or the behavior fails with.
    pub fn invoke(&self, method: &str, args: &[Value]) -> Result<Value> {
        let descriptor = self.descriptor();
        let Some(route) = descriptor.route(method, args.len()).cloned() else {
            return Err(BeanError::Argument(format!(
                "`{}` has no method `{method}` taking {} argument(s)",
                descriptor.name(),
                args.len()
            )));
        };

        match route {
            Route::Get(property) => {
                let value = self.read()?.store.get(&property)?;
                Ok(value.unwrap_or_else(|| {
                    descriptor
                        .property(&property)
                        .map(|info| info.ty().default_value())
                        .unwrap_or_default()
                }))
            }
            Route::Set(property) => {
                self.write()?.store.put(&property, args[0].clone())?;
                Ok(Value::Null)
            }
            Route::GetIndexed(property) => {
                let path = indexed_path(&property, &args[0])?;
                Ok(resolve_get(self, &path)?.unwrap_or_default())
            }
            Route::SetIndexed(property) => {
                let path = indexed_path(&property, &args[0])?;
                resolve_put(self, &path, args[1].clone())?;
                Ok(Value::Null)
            }
            Route::Behavior(interface) => {
                // Released before the behavior runs, it may write to the bean.
                let dispatch = self.read()?.dispatch.clone();
                dispatch.dispatch(self, &interface, method, args)
            }
            Route::Equals => Ok(Value::Bool(match &args[0] {
                Value::Bean(other) => self == other,
                _ => false,
            })),
            Route::ToString => Ok(Value::String(self.to_string())),
        }
    }
}

fn indexed_path(property: &str, index: &Value) -> Result<PathExpression> {
    let Some(index) = usize::from_value(index) else {
        return Err(BeanError::Argument(format!(
            "index of `{property}` must be a non-negative integer, found {}",
            index.kind_name()
        )));
    };
    PathExpression::parse(&format!("{property}[{index}]"))
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::string::ToString;
    use alloc::vec;
    use alloc::vec::Vec;

    use crate::dispatch::InterfaceBehavior;
    use crate::info::{InterfaceRef, MethodSignature};
    use crate::testing::{Child, Greeter, Parent, Polite, child, parent};
    use crate::{Bean, BeanError, Result, Value};

    #[test]
    fn accessors_go_to_the_store() {
        let bean = child(0);
        assert_eq!(bean.invoke("set_value", &[Value::I8(9)]).unwrap(), Value::Null);
        assert_eq!(bean.invoke("get_value", &[]).unwrap(), Value::I32(9));

        let empty = Bean::new::<dyn Child>().unwrap();
        assert_eq!(empty.invoke("get_value", &[]).unwrap(), Value::I32(0));
        assert_eq!(empty.get_value().unwrap(), 0);
    }

    #[test]
    fn indexed_accessors_take_an_index() {
        let bean = parent();
        bean.set_tags(vec!["a".to_string(), "b".to_string()]).unwrap();
        assert_eq!(
            bean.invoke("get_tags", &[]).unwrap(),
            Value::List(vec![Value::from("a"), Value::from("b")])
        );
        assert_eq!(bean.get_tags().unwrap().unwrap(), ["a", "b"]);
        assert!(matches!(
            bean.invoke("get_tags", &[Value::I32(0)]),
            Err(BeanError::Argument(_))
        ));
    }

    #[test]
    fn unknown_methods_are_argument_errors() {
        let bean = child(1);
        assert!(matches!(
            bean.invoke("get_value", &[Value::I32(1)]),
            Err(BeanError::Argument(_))
        ));
        assert!(matches!(
            bean.invoke("fly", &[]),
            Err(BeanError::Argument(_))
        ));
    }

    #[test]
    fn equals_and_to_string() {
        let a = child(1);
        let b = child(1);
        assert_eq!(a.invoke("equals", &[Value::from(&b)]).unwrap(), Value::Bool(true));
        assert_eq!(a.invoke("equals", &[Value::I32(1)]).unwrap(), Value::Bool(false));
        b.set_value(2).unwrap();
        assert_eq!(a.invoke("equals", &[Value::from(b)]).unwrap(), Value::Bool(false));
        assert_eq!(
            a.invoke("to_string", &[]).unwrap(),
            Value::from("Child{value=1}")
        );
    }

    #[test]
    fn behaviors_serve_behavioral_methods() {
        let bean = Bean::create(&[InterfaceRef::of::<dyn Greeter>()], [("value", 2)]).unwrap();
        assert!(matches!(bean.greet("you"), Err(BeanError::IllegalState(_))));

        bean.attach_behavior(Rc::new(Polite)).unwrap();
        assert!(bean.is_behavior_attached(&InterfaceRef::of::<dyn Greeter>()).unwrap());
        assert_eq!(bean.greet("you").unwrap(), "hello you from #2");

        // Copies share the behavior.
        let copy = bean.copy(false).unwrap();
        copy.set_value(3).unwrap();
        assert_eq!(copy.greet("me").unwrap(), "hello me from #3");

        assert!(bean.detach_behavior(&InterfaceRef::of::<dyn Greeter>()).unwrap());
        assert!(matches!(bean.greet("you"), Err(BeanError::IllegalState(_))));
    }

    struct Counting;

    impl InterfaceBehavior for Counting {
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

        fn invoke(&self, bean: &Bean, _: &str, _: &[Value]) -> Result<Value> {
            let next = bean.get_value()? + 1;
            bean.set_value(next)?;
            Ok(Value::from(next.to_string()))
        }
    }

    #[test]
    fn behaviors_may_write_to_their_bean() {
        let bean = Bean::new::<dyn Greeter>().unwrap();
        bean.attach_behavior(Rc::new(Counting)).unwrap();
        assert_eq!(bean.greet("x").unwrap(), "1");
        assert_eq!(bean.greet("x").unwrap(), "2");
        assert_eq!(bean.get_value().unwrap(), 2);
    }

    #[test]
    fn behaviors_must_cover_the_interface() {
        let bean = Bean::new::<dyn Parent>().unwrap();
        assert!(matches!(
            bean.attach_behavior(Rc::new(Polite)),
            Err(BeanError::Argument(_))
        ));
    }
}
