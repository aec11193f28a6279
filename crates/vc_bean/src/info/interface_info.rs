use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::format;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use super::interface::short_name;
use super::{Interface, InterfaceRef, MethodKind, MethodSignature, PropertyInfo, PropertyType};
use crate::proxy::ConstructionHook;

/// Everything known about one interface.
///
/// Built once per interface with [`InterfaceInfo::builder`] and kept in a
/// static [`InterfaceInfoCell`](super::InterfaceInfoCell).
pub struct InterfaceInfo {
    ty: InterfaceRef,
    methods: Box<[MethodSignature]>,
    kinds: Box<[MethodKind]>,
    properties: Box<[PropertyInfo]>,
    extends: Box<[InterfaceRef]>,
    hooks: Box<[Arc<dyn ConstructionHook>]>,
}

impl InterfaceInfo {
    pub fn builder<T: Interface + ?Sized>() -> InterfaceInfoBuilder {
        InterfaceInfoBuilder {
            ty: InterfaceRef::of::<T>(),
            methods: Vec::new(),
            declared: Vec::new(),
            element_types: Vec::new(),
            extends: Vec::new(),
            hooks: Vec::new(),
        }
    }

    #[inline]
    pub fn ty(&self) -> InterfaceRef {
        self.ty
    }

    #[inline]
    pub fn path(&self) -> &'static str {
        self.ty.path()
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        short_name(self.ty.path())
    }

    /// All declared methods, including accessors synthesized for
    /// [`InterfaceInfoBuilder::property`].
    #[inline]
    pub fn methods(&self) -> &[MethodSignature] {
        &self.methods
    }

    /// Methods paired with their classification.
    pub fn iter_methods(&self) -> impl Iterator<Item = (&MethodSignature, &MethodKind)> {
        self.methods.iter().zip(self.kinds.iter())
    }

    pub fn behavioral_methods(&self) -> impl Iterator<Item = &MethodSignature> {
        self.iter_methods()
            .filter(|(_, kind)| kind.is_behavioral())
            .map(|(sig, _)| sig)
    }

    pub fn event_methods(&self) -> impl Iterator<Item = &MethodSignature> {
        self.iter_methods()
            .filter(|(_, kind)| matches!(kind, MethodKind::Event))
            .map(|(sig, _)| sig)
    }

    /// Properties in order of first declaration.
    #[inline]
    pub fn properties(&self) -> &[PropertyInfo] {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&PropertyInfo> {
        self.properties.iter().find(|p| p.name() == name)
    }

    /// Direct super-interfaces.
    #[inline]
    pub fn extends(&self) -> &[InterfaceRef] {
        &self.extends
    }

    #[inline]
    pub fn hooks(&self) -> &[Arc<dyn ConstructionHook>] {
        &self.hooks
    }

    /// Whether this interface declares any behavioral method, i.e. whether
    /// a bean implementing it needs an attached behavior.
    pub fn is_delegatable(&self) -> bool {
        self.kinds.iter().any(MethodKind::is_behavioral)
    }
}

impl fmt::Debug for InterfaceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterfaceInfo")
            .field("ty", &self.ty)
            .field("methods", &self.methods)
            .field("properties", &self.properties)
            .field("extends", &self.extends)
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

/// Incremental constructor for [`InterfaceInfo`].
///
/// Properties are derived from the accessor methods when [`build`] runs.
///
/// [`build`]: InterfaceInfoBuilder::build
pub struct InterfaceInfoBuilder {
    ty: InterfaceRef,
    methods: Vec<MethodSignature>,
    declared: Vec<(Cow<'static, str>, PropertyType)>,
    element_types: Vec<(Cow<'static, str>, PropertyType)>,
    extends: Vec<InterfaceRef>,
    hooks: Vec<Arc<dyn ConstructionHook>>,
}

impl InterfaceInfoBuilder {
    pub fn method(mut self, sig: MethodSignature) -> Self {
        self.methods.push(sig);
        self
    }

    /// Declares a readable and writable property.
    ///
    /// Equivalent to declaring its getter and setter.
    pub fn property(mut self, name: impl Into<Cow<'static, str>>, ty: PropertyType) -> Self {
        self.declared.push((name.into(), ty));
        self
    }

    /// Declares the element type of an indexed property.
    ///
    /// Required when a property delegate is attached to a property whose
    /// element type cannot be derived from its declared type.
    pub fn element_type(
        mut self,
        name: impl Into<Cow<'static, str>>,
        element: PropertyType,
    ) -> Self {
        self.element_types.push((name.into(), element));
        self
    }

    pub fn extends<P: Interface + ?Sized>(mut self) -> Self {
        let parent = InterfaceRef::of::<P>();
        if !self.extends.contains(&parent) {
            self.extends.push(parent);
        }
        self
    }

    pub fn construction_hook(mut self, hook: impl ConstructionHook + 'static) -> Self {
        self.hooks.push(Arc::new(hook));
        self
    }

    pub fn build(self) -> InterfaceInfo {
        let owner = self.ty.path();
        let mut methods = self.methods;

        for (name, ty) in &self.declared {
            let prefix = if *ty == PropertyType::Bool { "is" } else { "get" };
            let getter = format!("{prefix}_{name}");
            if !methods.iter().any(|m| m.name() == getter && m.arity() == 0) {
                methods.push(MethodSignature::new(getter).returns(ty.clone()));
            }
            let setter = format!("set_{name}");
            if !methods.iter().any(|m| m.name() == setter && m.arity() == 1) {
                methods.push(MethodSignature::new(setter).param(ty.clone()));
            }
        }

        let mut kinds: Vec<MethodKind> = methods.iter().map(MethodKind::classify).collect();
        let mut drafts: Vec<Draft> = Vec::new();
        for kind in &kinds {
            if let Some(name) = kind.property()
                && !drafts.iter().any(|d| d.name == name)
            {
                drafts.push(Draft::new(Cow::Owned(name.into())));
            }
        }

        // Plain getters fix the property type, the other accessors must agree.
        for pass in [Pass::Getter, Pass::IndexedGetter, Pass::Setter, Pass::IndexedSetter] {
            for (sig, kind) in methods.iter().zip(kinds.iter_mut()) {
                let Some(name) = pass.matches(kind) else {
                    continue;
                };
                let Some(draft) = drafts.iter_mut().find(|d| d.name == name) else {
                    continue;
                };
                if !draft.accept(pass, sig) {
                    *kind = MethodKind::Behavioral;
                }
            }
        }

        for (name, element) in self.element_types {
            match drafts.iter_mut().find(|d| d.name == name) {
                Some(draft) => draft.element = Some(element),
                None => {
                    let mut draft = Draft::new(name);
                    draft.element = Some(element);
                    drafts.push(draft);
                }
            }
        }

        let properties = drafts
            .into_iter()
            .filter_map(|draft| draft.finish(owner))
            .collect();

        InterfaceInfo {
            ty: self.ty,
            methods: methods.into_boxed_slice(),
            kinds: kinds.into_boxed_slice(),
            properties,
            extends: self.extends.into_boxed_slice(),
            hooks: self.hooks.into_boxed_slice(),
        }
    }
}

#[derive(Clone, Copy)]
enum Pass {
    Getter,
    IndexedGetter,
    Setter,
    IndexedSetter,
}

impl Pass {
    fn matches(self, kind: &MethodKind) -> Option<&str> {
        match (self, kind) {
            (Pass::Getter, MethodKind::Getter(name))
            | (Pass::IndexedGetter, MethodKind::IndexedGetter(name))
            | (Pass::Setter, MethodKind::Setter(name))
            | (Pass::IndexedSetter, MethodKind::IndexedSetter(name)) => Some(name),
            _ => None,
        }
    }
}

struct Draft {
    name: Cow<'static, str>,
    ty: Option<PropertyType>,
    element: Option<PropertyType>,
    readable: bool,
    writable: bool,
}

impl Draft {
    fn new(name: Cow<'static, str>) -> Self {
        Self {
            name,
            ty: None,
            element: None,
            readable: false,
            writable: false,
        }
    }

    /// Returns `false` if the accessor disagrees with what is already known.
    fn accept(&mut self, pass: Pass, sig: &MethodSignature) -> bool {
        match pass {
            Pass::Getter => {
                let Some(ret) = sig.ret() else { return false };
                if !self.agree_ty(ret) {
                    return false;
                }
                self.readable = true;
            }
            Pass::Setter => {
                let [param] = sig.params() else { return false };
                if !self.agree_ty(param) {
                    return false;
                }
                self.writable = true;
            }
            Pass::IndexedGetter => {
                let Some(ret) = sig.ret() else { return false };
                if !self.agree_element(ret) {
                    return false;
                }
                self.readable = true;
            }
            Pass::IndexedSetter => {
                let [_, param] = sig.params() else { return false };
                if !self.agree_element(param) {
                    return false;
                }
                self.writable = true;
            }
        }
        true
    }

    fn agree_ty(&mut self, ty: &PropertyType) -> bool {
        match &self.ty {
            Some(known) => known == ty,
            None => {
                self.ty = Some(ty.clone());
                true
            }
        }
    }

    fn agree_element(&mut self, element: &PropertyType) -> bool {
        let known = self
            .element
            .as_ref()
            .or_else(|| self.ty.as_ref().and_then(PropertyType::element_type));
        match known {
            Some(known) => known == element,
            None if self.ty.is_some() => false,
            None => {
                self.element = Some(element.clone());
                true
            }
        }
    }

    fn finish(self, owner: &'static str) -> Option<PropertyInfo> {
        let ty = match (self.ty, &self.element) {
            (Some(ty), _) => ty,
            // Only indexed accessors: the whole property reads as an array.
            (None, Some(element)) => PropertyType::array(element.clone()),
            (None, None) => return None,
        };
        Some(PropertyInfo::new(
            self.name,
            ty,
            self.element,
            self.readable,
            self.writable,
            owner,
        ))
    }
}
