//! Bulk transfer between beans and plain maps.
//!
//! Unlike [`Bean::create`], these helpers are lenient: [`populate`] skips
//! keys the bean does not declare. With [`ManipulateOptions::suppress_errors`]
//! set, other per-key failures are logged and skipped as well.
//!
//! ```
//! use vc_bean::Bean;
//! use vc_bean::info::{Interface, InterfaceInfo, InterfaceInfoCell, InterfaceRef, PropertyType};
//! use vc_bean::manip::{self, ManipulateOptions};
//!
//! struct Point;
//!
//! impl Interface for Point {
//!     fn interface_info() -> &'static InterfaceInfo {
//!         static CELL: InterfaceInfoCell = InterfaceInfoCell::new();
//!         CELL.get_or_init(|| {
//!             InterfaceInfo::builder::<Self>()
//!                 .property("x", PropertyType::I32)
//!                 .property("y", PropertyType::I32)
//!                 .build()
//!         })
//!     }
//! }
//!
//! let point = Bean::new::<Point>().unwrap();
//! let options = ManipulateOptions::default();
//! manip::populate(&point, [("x", 3), ("z", 4)], options).unwrap();
//!
//! let described = manip::describe(&point, options).unwrap();
//! assert_eq!(described.len(), 1);
//! assert_eq!(described["x"], vc_bean::Value::I32(3));
//! ```
//!
//! [`Bean::create`]: crate::Bean::create

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

use log::{debug, warn};

use crate::access::resolve_put;
use crate::path::PathExpression;
use crate::{Bean, BeanError, Result, Value};

/// Switches for [`describe`] and [`populate`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ManipulateOptions {
    /// Log and skip failing keys instead of returning the first error.
    pub suppress_errors: bool,
}

impl ManipulateOptions {
    pub const SUPPRESS_ERRORS: Self = Self {
        suppress_errors: true,
    };
}

/// The set, readable top-level properties of `bean`.
///
/// Nested beans are returned as [`Value::Bean`], see [`Bean::flatten`] for
/// a recursive variant.
pub fn describe(bean: &Bean, options: ManipulateOptions) -> Result<BTreeMap<String, Value>> {
    let mut described = BTreeMap::new();
    let state = bean.read()?;
    for property in bean.descriptor().properties() {
        if !property.is_readable() {
            continue;
        }
        match state.store.get(property.name()) {
            Ok(Some(value)) => {
                described.insert(property.name().to_string(), value);
            }
            Ok(None) => {}
            Err(err) if options.suppress_errors => {
                warn!("skipped `{}` while describing: {err}", property.name());
            }
            Err(err) => return Err(err),
        }
    }
    Ok(described)
}

/// Writes `values` into `bean`, keys being paths.
///
/// Keys naming undeclared properties are skipped.
pub fn populate<K, V>(
    bean: &Bean,
    values: impl IntoIterator<Item = (K, V)>,
    options: ManipulateOptions,
) -> Result<()>
where
    K: AsRef<str>,
    V: Into<Value>,
{
    for (key, value) in values {
        let key = key.as_ref();
        let result =
            PathExpression::parse(key).and_then(|path| resolve_put(bean, &path, value.into()));
        match result {
            Ok(_) => {}
            Err(BeanError::UnknownProperty { property, .. }) => {
                debug!("skipped `{key}`: `{property}` is not declared");
            }
            Err(err) if options.suppress_errors => {
                warn!("skipped `{key}` while populating: {err}");
            }
            Err(err) => return Err(err),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{ManipulateOptions, describe, populate};
    use crate::info::{Interface, InterfaceInfo, InterfaceInfoCell, PropertyType};
    use crate::{Bean, BeanError, Value};

    struct Person;

    impl Interface for Person {
        fn interface_info() -> &'static InterfaceInfo {
            static CELL: InterfaceInfoCell = InterfaceInfoCell::new();
            CELL.get_or_init(|| {
                InterfaceInfo::builder::<Self>()
                    .property("name", PropertyType::String)
                    .property("age", PropertyType::I32)
                    .property("friend", PropertyType::interface::<Person>())
                    .build()
            })
        }
    }

    #[test]
    fn populate_is_lenient_about_unknown_keys() {
        let bean = Bean::new::<Person>().unwrap();
        populate(
            &bean,
            [("name", Value::from("Ada")), ("height", Value::I32(3))],
            ManipulateOptions::default(),
        )
        .unwrap();
        assert_eq!(bean.get_as::<String>("name").unwrap().as_deref(), Some("Ada"));
    }

    #[test]
    fn populate_reports_bad_values_unless_suppressed() {
        let bean = Bean::new::<Person>().unwrap();
        let values = [("age", Value::from("old")), ("name", Value::from("Bo"))];

        let result = populate(&bean, values.clone(), ManipulateOptions::default());
        assert!(matches!(result, Err(BeanError::TypeMismatch { .. })));

        populate(&bean, values, ManipulateOptions::SUPPRESS_ERRORS).unwrap();
        assert_eq!(bean.get_as::<String>("name").unwrap().as_deref(), Some("Bo"));
        assert!(!bean.contains("age").unwrap());
    }

    #[test]
    fn describe_is_top_level() {
        let bean = Bean::new::<Person>().unwrap();
        bean.put("friend.name", "Cy").unwrap();
        bean.put("age", 40).unwrap();

        let described = describe(&bean, ManipulateOptions::default()).unwrap();
        assert_eq!(described.len(), 2);
        assert_eq!(described["age"], Value::I32(40));
        let friend = described["friend"].as_bean().unwrap();
        assert_eq!(friend.get_as::<String>("name").unwrap().as_deref(), Some("Cy"));
    }
}
