//! End-to-end behavior of beans declared with `#[bean]`.

use std::rc::Rc;

use vc_bean::dispatch::InterfaceBehavior;
use vc_bean::info::{InterfaceRef, MethodSignature, PropertyType};
use vc_bean::manip::{ManipulateOptions, describe, populate};
use vc_bean::path::PathExpression;
use vc_bean::{Bean, BeanError, Value, bean};

type Result<T> = core::result::Result<T, BeanError>;

#[bean]
pub trait Typed {
    fn is_flag(&self) -> Result<bool>;
    fn set_flag(&self, flag: bool) -> Result<()>;
}

#[bean]
pub trait Indexed {
    fn get_array(&self, index: usize) -> Result<Option<String>>;
    fn set_array(&self, index: usize, value: &str) -> Result<()>;

    #[bean(property_type = PropertyType::interface::<dyn Typed>())]
    fn get_types(&self, index: usize) -> Result<Option<Bean>>;
    #[bean(property_type = PropertyType::interface::<dyn Typed>())]
    fn set_types(&self, index: usize, value: Bean) -> Result<()>;
}

#[bean]
pub trait Nested {
    fn get_long(&self) -> Result<i64>;
    fn set_long(&self, long: i64) -> Result<()>;
}

#[bean]
pub trait Child {
    fn get_value(&self) -> Result<i32>;
    fn set_value(&self, value: i32) -> Result<()>;

    #[bean(property_type = PropertyType::interface::<dyn Nested>())]
    fn get_nested(&self) -> Result<Option<Bean>>;
    #[bean(property_type = PropertyType::interface::<dyn Nested>())]
    fn set_nested(&self, nested: Bean) -> Result<()>;
}

#[bean]
pub trait Root {
    #[bean(property_type = PropertyType::interface::<dyn Child>())]
    fn get_child(&self) -> Result<Option<Bean>>;
    #[bean(property_type = PropertyType::interface::<dyn Child>())]
    fn set_child(&self, child: Bean) -> Result<()>;

    fn get_label(&self) -> Result<Option<String>>;
    fn set_label(&self, label: String) -> Result<()>;
}

#[bean]
pub trait Calculator {
    fn add(&self, a: i32, b: i32) -> Result<i32>;
}

fn indexed(array_len: usize, types_len: usize) -> Bean {
    Bean::create(
        &[InterfaceRef::of::<dyn Indexed>()],
        [
            ("array", Value::new_array(&PropertyType::String, array_len)),
            (
                "types",
                Value::new_array(&PropertyType::interface::<dyn Typed>(), types_len),
            ),
        ],
    )
    .unwrap()
}

#[test]
fn path_round_trip() {
    for text in ["child", "child.nested.long", "types[0].flag", "a.b[12].c[]"] {
        let path = PathExpression::parse(text).unwrap();
        assert_eq!(path.leaf().to_root_path(), text);
        assert_eq!(path.root().to_leaf_path(), text);
        assert_eq!(path.len(), 1 + text.matches('.').count());
    }
    assert!(matches!(
        PathExpression::parse(""),
        Err(BeanError::MalformedPath)
    ));
}

#[test]
fn write_then_read() {
    let bean = Bean::new::<dyn Root>().unwrap();
    bean.put("label", "x").unwrap();
    assert_eq!(bean.get("label").unwrap(), Some(Value::from("x")));

    let child = Bean::new::<dyn Child>().unwrap();
    child.put("value", "64").unwrap();
    assert_eq!(child.get_value().unwrap(), 64);
    child.put("value", 7_i8).unwrap();
    assert_eq!(child.get("value").unwrap(), Some(Value::I32(7)));
}

#[test]
fn indexed_scenario() {
    let bean = indexed(2, 1);
    bean.put("array[0]", "foo").unwrap();
    bean.put("array[1]", "bar").unwrap();
    bean.put("types[0].flag", true).unwrap();

    assert_eq!(bean.get("array[0]").unwrap(), Some(Value::from("foo")));
    assert_eq!(bean.get_array(1).unwrap().as_deref(), Some("bar"));
    assert_eq!(bean.get("types[0].flag").unwrap(), Some(Value::Bool(true)));
    assert!(bean.get_types(0).unwrap().unwrap().is_flag().unwrap());

    bean.set_array(0, "baz").unwrap();
    assert_eq!(bean.get_array(0).unwrap().as_deref(), Some("baz"));
}

#[test]
fn indexed_bounds() {
    assert!(indexed(3, 0).put("array[2]", "v").is_ok());
    assert!(matches!(
        indexed(2, 0).put("array[2]", "v"),
        Err(BeanError::IndexOutOfBounds { index: 2, len: 2, .. })
    ));

    let unsized_bean = Bean::new::<dyn Indexed>().unwrap();
    assert!(matches!(
        unsized_bean.put("array[2]", "v"),
        Err(BeanError::NullIndexTarget { .. })
    ));
    assert!(matches!(
        unsized_bean.put("array[]", "v"),
        Err(BeanError::InvalidIndex { .. })
    ));
}

#[test]
fn nested_auto_instantiation() {
    let bean = Bean::new::<dyn Root>().unwrap();
    bean.put("child.nested.long", 42).unwrap();

    assert!(bean.get("child").unwrap().is_some());
    assert!(bean.contains("child.nested").unwrap());
    assert_eq!(bean.get("child.nested.long").unwrap(), Some(Value::I64(42)));
    assert_eq!(
        bean.get_child()
            .unwrap()
            .unwrap()
            .get_nested()
            .unwrap()
            .unwrap()
            .get_long()
            .unwrap(),
        42
    );
}

#[test]
fn copy_divergence() {
    let bean = Bean::new::<dyn Root>().unwrap();
    bean.put("child.value", 1).unwrap();

    let shallow = bean.copy(false).unwrap();
    shallow.put("child.value", 2).unwrap();
    assert_eq!(bean.get("child.value").unwrap(), Some(Value::I32(2)));

    let deep = bean.copy(true).unwrap();
    deep.put("child.value", 3).unwrap();
    assert_eq!(bean.get("child.value").unwrap(), Some(Value::I32(2)));
    assert_eq!(deep.get("child.value").unwrap(), Some(Value::I32(3)));
}

#[test]
fn flatten_uses_dotted_keys() {
    let bean = Bean::new::<dyn Root>().unwrap();
    bean.put("child.value", 5).unwrap();

    let flat = bean.flatten().unwrap();
    assert_eq!(flat.len(), 1);
    assert_eq!(flat["child.value"], Value::I32(5));
    assert!(!flat.contains_key("child"));
}

#[test]
fn unmodifiable_copies() {
    let bean = Bean::new::<dyn Root>().unwrap();
    bean.put("child.value", 5).unwrap();
    let frozen = bean.unmodifiable_copy().unwrap();

    assert_eq!(frozen.get("child.value").unwrap(), Some(Value::I32(5)));
    assert!(frozen.contains("child.value").unwrap());
    assert!(matches!(frozen.put("label", "x"), Err(BeanError::ImmutableState)));
    assert!(matches!(frozen.remove("child"), Err(BeanError::ImmutableState)));
    assert!(matches!(
        frozen.set_label("x".into()),
        Err(BeanError::ImmutableState)
    ));
    assert!(matches!(
        frozen.attach_behavior(Rc::new(Adder)),
        Err(BeanError::ImmutableState)
    ));
}

struct Adder;

impl InterfaceBehavior for Adder {
    fn interface(&self) -> InterfaceRef {
        InterfaceRef::of::<dyn Calculator>()
    }

    fn methods(&self) -> Vec<MethodSignature> {
        vec![
            MethodSignature::new("add")
                .param(PropertyType::I32)
                .param(PropertyType::I32)
                .returns(PropertyType::I32),
        ]
    }

    fn invoke(&self, _: &Bean, _: &str, args: &[Value]) -> vc_bean::Result<Value> {
        let a = args[0].get::<i32>().unwrap_or_default();
        let b = args[1].get::<i32>().unwrap_or_default();
        Ok(Value::I32(a + b))
    }
}

/// Declares `add` with the wrong return type.
struct Sloppy;

impl InterfaceBehavior for Sloppy {
    fn interface(&self) -> InterfaceRef {
        InterfaceRef::of::<dyn Calculator>()
    }

    fn methods(&self) -> Vec<MethodSignature> {
        vec![
            MethodSignature::new("add")
                .param(PropertyType::I32)
                .param(PropertyType::I32)
                .returns(PropertyType::I64),
        ]
    }

    fn invoke(&self, _: &Bean, _: &str, _: &[Value]) -> vc_bean::Result<Value> {
        Ok(Value::I64(0))
    }
}

/// Declares nothing.
struct Empty;

impl InterfaceBehavior for Empty {
    fn interface(&self) -> InterfaceRef {
        InterfaceRef::of::<dyn Calculator>()
    }

    fn methods(&self) -> Vec<MethodSignature> {
        Vec::new()
    }

    fn invoke(&self, _: &Bean, _: &str, _: &[Value]) -> vc_bean::Result<Value> {
        Ok(Value::Null)
    }
}

#[test]
fn behavior_validation() {
    let calc = Bean::new::<dyn Calculator>().unwrap();
    assert!(matches!(
        calc.attach_behavior(Rc::new(Sloppy)),
        Err(BeanError::InvalidDelegate { .. })
    ));
    assert!(matches!(
        calc.attach_behavior(Rc::new(Empty)),
        Err(BeanError::InvalidDelegate { .. })
    ));
    assert!(matches!(calc.add(1, 2), Err(BeanError::IllegalState(_))));

    calc.attach_behavior(Rc::new(Adder)).unwrap();
    assert_eq!(calc.add(1, 2).unwrap(), 3);

    let root = InterfaceRef::of::<dyn Root>();
    assert!(matches!(
        calc.is_behavior_attached(&root),
        Err(BeanError::Argument(_))
    ));
}

struct Doubling;

impl vc_bean::store::PropertyDelegate for Doubling {
    fn value_type(&self) -> PropertyType {
        PropertyType::I32
    }

    fn get(&self, _: &str) -> vc_bean::Result<Value> {
        Ok(Value::I32(84))
    }
}

#[test]
fn property_delegates_restore_live_values() {
    let child = Bean::new::<dyn Child>().unwrap();
    child.set_value(42).unwrap();

    child.attach_property_delegate("value", Rc::new(Doubling)).unwrap();
    assert_eq!(child.get_value().unwrap(), 84);
    assert!(matches!(
        child.set_value(1),
        Err(BeanError::UnsupportedFeature(_))
    ));

    assert!(child.detach_property_delegate("value").unwrap());
    assert_eq!(child.get_value().unwrap(), 42);
}

#[test]
fn strict_creation_and_lenient_populate() {
    let strict = Bean::create(&[InterfaceRef::of::<dyn Root>()], [("unknown", 1)]);
    assert!(matches!(
        strict,
        Err(BeanError::InvalidPropertyValue { .. })
    ));

    let bean = Bean::new::<dyn Root>().unwrap();
    let mut values = std::collections::BTreeMap::new();
    values.insert("unknown".to_string(), Value::I32(1));
    values.insert("label".to_string(), Value::from("l"));
    values.insert("child.value".to_string(), Value::I32(9));
    populate(&bean, values, ManipulateOptions::default()).unwrap();

    assert_eq!(bean.get_label().unwrap().as_deref(), Some("l"));
    let described = describe(&bean, ManipulateOptions::default()).unwrap();
    assert_eq!(described.len(), 2);
    assert_eq!(described["label"], Value::from("l"));
    assert!(matches!(described["child"], Value::Bean(_)));
}
