use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::TypeId;
use core::fmt;

use super::{InterfaceRef, MethodKind, PropertyInfo};
use crate::hash::HashMap;
use crate::{BeanError, Result};

/// Where a method call on a bean is routed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Get(Cow<'static, str>),
    Set(Cow<'static, str>),
    GetIndexed(Cow<'static, str>),
    SetIndexed(Cow<'static, str>),
    /// A behavioral method, served by the behavior attached for the interface.
    Behavior(InterfaceRef),
    Equals,
    ToString,
}

/// The merged shape of a set of interfaces.
///
/// Every bean is built from one descriptor; it fixes the property set, the
/// method routes and the dispatch slots for the bean's lifetime.
pub struct BeanDescriptor {
    name: String,
    interfaces: Box<[InterfaceRef]>,
    properties: HashMap<Cow<'static, str>, PropertyInfo>,
    order: Box<[Cow<'static, str>]>,
    routes: HashMap<Cow<'static, str>, Vec<(usize, Route)>>,
    delegatable: Box<[InterfaceRef]>,
}

impl BeanDescriptor {
    /// Composes `types` and all of their super-interfaces.
    ///
    /// # Errors
    ///
    /// - [`BeanError::Argument`] if `types` is empty.
    /// - [`BeanError::UnsupportedFeature`] if an interface declares events.
    /// - [`BeanError::TypeConflict`] if two interfaces disagree on the type
    ///   of a shared property.
    pub fn compose(types: &[InterfaceRef]) -> Result<Self> {
        if types.is_empty() {
            return Err(BeanError::Argument(
                "a bean needs at least one interface".into(),
            ));
        }

        let mut interfaces = Vec::new();
        for ty in types {
            flatten(*ty, &mut interfaces);
        }

        let mut properties: HashMap<Cow<'static, str>, PropertyInfo> = HashMap::default();
        let mut order = Vec::new();
        let mut routes: HashMap<Cow<'static, str>, Vec<(usize, Route)>> = HashMap::default();
        let mut delegatable = Vec::new();

        for interface in &interfaces {
            let info = interface.info();

            if let Some(event) = info.event_methods().next() {
                return Err(BeanError::UnsupportedFeature(format!(
                    "`{}` declares the event method `{}`",
                    interface,
                    event.name()
                )));
            }

            for property in info.properties() {
                match properties.get_mut(property.name()) {
                    Some(known) => known.merge(property)?,
                    None => {
                        order.push(property.name_cow().clone());
                        properties.insert(property.name_cow().clone(), property.clone());
                    }
                }
            }

            for (sig, kind) in info.iter_methods() {
                let route = match kind {
                    MethodKind::Getter(name) => Route::Get(name.clone()),
                    MethodKind::Setter(name) => Route::Set(name.clone()),
                    MethodKind::IndexedGetter(name) => Route::GetIndexed(name.clone()),
                    MethodKind::IndexedSetter(name) => Route::SetIndexed(name.clone()),
                    MethodKind::Behavioral => Route::Behavior(*interface),
                    MethodKind::Event => continue,
                };
                insert_route(&mut routes, sig.name_cow().clone(), sig.arity(), route);
            }

            if info.is_delegatable() {
                delegatable.push(*interface);
            }
        }

        insert_route(&mut routes, Cow::Borrowed("equals"), 1, Route::Equals);
        insert_route(&mut routes, Cow::Borrowed("to_string"), 0, Route::ToString);

        let name = types
            .iter()
            .map(InterfaceRef::short_name)
            .collect::<Vec<_>>()
            .join("+");

        Ok(Self {
            name,
            interfaces: interfaces.into_boxed_slice(),
            properties,
            order: order.into_boxed_slice(),
            routes,
            delegatable: delegatable.into_boxed_slice(),
        })
    }

    /// Short names of the composed interfaces, joined by `+`.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All implemented interfaces, super-interfaces included, without duplicates.
    #[inline]
    pub fn interfaces(&self) -> &[InterfaceRef] {
        &self.interfaces
    }

    pub fn implements(&self, id: TypeId) -> bool {
        self.interfaces.iter().any(|i| i.id() == id)
    }

    #[inline]
    pub fn property(&self, name: &str) -> Option<&PropertyInfo> {
        self.properties.get(name)
    }

    #[inline]
    pub fn contains_property(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    /// Properties in order of first declaration.
    pub fn properties(&self) -> impl ExactSizeIterator<Item = &PropertyInfo> {
        self.order.iter().map(|name| &self.properties[name])
    }

    /// Route of the method `name` taking `arity` arguments.
    pub fn route(&self, name: &str, arity: usize) -> Option<&Route> {
        self.routes
            .get(name)?
            .iter()
            .find(|(n, _)| *n == arity)
            .map(|(_, route)| route)
    }

    /// Interfaces with behavioral methods, one dispatch slot each.
    #[inline]
    pub fn delegatable(&self) -> &[InterfaceRef] {
        &self.delegatable
    }

    /// Every method that needs an attached behavior, with its interface.
    pub fn behavioral_methods(&self) -> impl Iterator<Item = (InterfaceRef, &str)> {
        self.delegatable.iter().flat_map(|interface| {
            interface
                .info()
                .behavioral_methods()
                .map(move |sig| (*interface, sig.name()))
        })
    }
}

fn flatten(ty: InterfaceRef, out: &mut Vec<InterfaceRef>) {
    if out.contains(&ty) {
        return;
    }
    out.push(ty);
    for parent in ty.info().extends() {
        flatten(*parent, out);
    }
}

// The first declaration of a name and arity wins.
fn insert_route(
    routes: &mut HashMap<Cow<'static, str>, Vec<(usize, Route)>>,
    name: Cow<'static, str>,
    arity: usize,
    route: Route,
) {
    let entry = routes.entry(name).or_default();
    if !entry.iter().any(|(n, _)| *n == arity) {
        entry.push((arity, route));
    }
}

impl fmt::Debug for BeanDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BeanDescriptor")
            .field("name", &self.name)
            .field("interfaces", &self.interfaces)
            .field("properties", &self.order)
            .finish()
    }
}
