use alloc::vec::Vec;
use core::any::TypeId;

use crate::hash::{HashMap, HashSet};
use crate::info::{Interface, InterfaceRef, PropertyType};

/// A registry of interfaces.
///
/// Registering an interface also registers its super-interfaces and the
/// interfaces of its properties.
///
/// Short names may be shared by interfaces from different modules; such
/// names are *ambiguous* and cannot be used for lookup.
#[derive(Default)]
pub struct TypeRegistry {
    interfaces: HashMap<TypeId, InterfaceRef>,
    path_to_id: HashMap<&'static str, TypeId>,
    name_to_id: HashMap<&'static str, TypeId>,
    ambiguous_names: HashSet<&'static str>,
}

impl TypeRegistry {
    /// An empty registry.
    pub fn empty() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.interfaces.len()
    }

    /// Registers `T` and its dependencies.
    #[inline]
    pub fn register<T: Interface + ?Sized>(&mut self) {
        self.register_ref(InterfaceRef::of::<T>());
    }

    /// Registers `interface` and its dependencies.
    ///
    /// Returns `false` if it was already registered.
    pub fn register_ref(&mut self, interface: InterfaceRef) -> bool {
        if self.interfaces.contains_key(&interface.id()) {
            return false;
        }
        self.insert(interface);

        let info = interface.info();
        for parent in info.extends() {
            self.register_ref(*parent);
        }
        for property in info.properties() {
            let mut dependencies = Vec::new();
            collect_interfaces(property.ty(), &mut dependencies);
            if let Some(element) = property.element_type() {
                collect_interfaces(element, &mut dependencies);
            }
            for dependency in dependencies {
                self.register_ref(dependency);
            }
        }
        true
    }

    fn insert(&mut self, interface: InterfaceRef) {
        let id = interface.id();
        self.interfaces.insert(id, interface);
        self.path_to_id.insert(strip_dyn(interface.path()), id);

        let name = interface.short_name();
        if self.ambiguous_names.contains(name) {
            return;
        }
        match self.name_to_id.get(name) {
            Some(known) if *known != id => {
                self.name_to_id.remove(name);
                self.ambiguous_names.insert(name);
            }
            Some(_) => {}
            None => {
                self.name_to_id.insert(name, id);
            }
        }
    }

    #[inline]
    pub fn contains(&self, id: TypeId) -> bool {
        self.interfaces.contains_key(&id)
    }

    #[inline]
    pub fn get(&self, id: TypeId) -> Option<InterfaceRef> {
        self.interfaces.get(&id).copied()
    }

    /// Finds an interface by full path, with or without the `dyn ` prefix.
    pub fn get_with_path(&self, path: &str) -> Option<InterfaceRef> {
        let id = self.path_to_id.get(path.strip_prefix("dyn ").unwrap_or(path))?;
        self.get(*id)
    }

    /// Finds an interface by short name, unless the name is ambiguous.
    pub fn get_with_name(&self, name: &str) -> Option<InterfaceRef> {
        let id = self.name_to_id.get(name)?;
        self.get(*id)
    }

    #[inline]
    pub fn is_ambiguous(&self, name: &str) -> bool {
        self.ambiguous_names.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = InterfaceRef> + '_ {
        self.interfaces.values().copied()
    }

    /// Registers every interface declared with `#[bean(auto_register)]`.
    ///
    /// Repeated calls are cheap and do not insert duplicates.
    ///
    /// Returns `true` if automatic registration works on this platform.
    /// Without the `auto_register` feature this does nothing and returns
    /// `false`.
    pub fn auto_register(&mut self) -> bool {
        #[cfg(feature = "auto_register")]
        {
            use crate::__macro_exports::auto_register;

            let flag = TypeId::of::<auto_register::__AvailFlag>();
            if self.contains(flag) {
                return true;
            }
            auto_register::__register_interfaces(self);
            self.contains(flag)
        }
        #[cfg(not(feature = "auto_register"))]
        {
            false
        }
    }
}

fn strip_dyn(path: &'static str) -> &'static str {
    path.strip_prefix("dyn ").unwrap_or(path)
}

fn collect_interfaces(ty: &PropertyType, out: &mut Vec<InterfaceRef>) {
    match ty {
        PropertyType::Interface(interface) => out.push(*interface),
        PropertyType::Array(element) | PropertyType::List(element) => {
            collect_interfaces(element, out);
        }
        _ => {}
    }
}
