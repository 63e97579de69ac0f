use core::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::ConfigError;
use crate::registry::class_spec::{ClassSpec, GetFn, ParentLink, PropertyDef, SetFn};
use crate::Serializable;

// ---------------------------------------------------------------- // ResolvedClass

/// One property of a resolved set. Accessors inherited through a parent link
/// are pre-composed with the base projection, so the driver always calls
/// them with the concrete object.
pub(crate) struct ResolvedProperty {
    pub(crate) name: &'static str,
    pub(crate) get: GetFn,
    pub(crate) set: SetFn,
    pub(crate) merge: Option<SetFn>,
}

/// The effective property set of a class:
/// `(resolved(parent) ∪ contained ∪ own) - excluded`, ancestors first. An own
/// or contained declaration re-using an inherited name shadows the inherited
/// entry in place.
pub(crate) struct ResolvedClass {
    pub(crate) spec: Arc<ClassSpec>,
    pub(crate) properties: Vec<ResolvedProperty>,
}

impl ResolvedClass {
    pub(crate) fn property(&self, name: &str) -> Option<&ResolvedProperty> {
        self.properties.iter().find(|p| p.name == name)
    }
}

// ---------------------------------------------------------------- // SerialRegistry

/// The class registry: tag and [`TypeId`] lookup plus memoized property-set
/// resolution.
///
/// A fresh registry already knows the `sf_geometry` leaf types. Most code
/// talks to the global instance through
/// [`registry::register`](crate::registry::register) and the driver
/// functions; independent registries are mainly useful in tests.
pub struct SerialRegistry {
    classes: HashMap<TypeId, Arc<ClassSpec>>,
    tags: HashMap<&'static str, TypeId>,
    resolved: Mutex<HashMap<TypeId, Arc<ResolvedClass>>>,
}

impl SerialRegistry {
    /// A registry with nothing registered, not even the builtin leaf types.
    pub fn empty() -> Self {
        Self {
            classes: HashMap::new(),
            tags: HashMap::new(),
            resolved: Mutex::new(HashMap::new()),
        }
    }

    /// A registry with the builtin geometry leaf codecs registered.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        crate::codec::leaf::register_builtin(&mut registry);
        registry
    }

    /// Add a class declaration.
    ///
    /// Registering the same type twice is a no-op returning `Ok(false)`;
    /// claiming a tag already owned by a different type, or a reserved
    /// collection kind marker, is a configuration error.
    pub fn register(&mut self, spec: ClassSpec) -> Result<bool, ConfigError> {
        if self.classes.contains_key(&spec.type_id()) {
            return Ok(false);
        }
        if crate::codec::is_reserved_tag(spec.tag()) {
            return Err(ConfigError::ReservedTag {
                tag: spec.tag().into(),
            });
        }
        if let Some(existing) = self.tags.get(spec.tag()) {
            if *existing != spec.type_id() {
                return Err(ConfigError::DuplicateTag {
                    tag: spec.tag().into(),
                });
            }
        }
        self.insert(spec);
        Ok(true)
    }

    /// Insert without validation. Only for declarations known unique, such
    /// as the builtin leaf set.
    pub(crate) fn insert(&mut self, spec: ClassSpec) {
        let spec = Arc::new(spec);
        self.tags.insert(spec.tag(), spec.type_id());
        self.classes.insert(spec.type_id(), spec);
    }

    #[inline]
    pub fn contains_type(&self, type_id: TypeId) -> bool {
        self.classes.contains_key(&type_id)
    }

    #[inline]
    pub fn contains_tag(&self, tag: &str) -> bool {
        self.tags.contains_key(tag)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub(crate) fn get(&self, type_id: TypeId) -> Option<&Arc<ClassSpec>> {
        self.classes.get(&type_id)
    }

    pub(crate) fn get_by_tag(&self, tag: &str) -> Option<&Arc<ClassSpec>> {
        self.tags.get(tag).and_then(|id| self.classes.get(id))
    }

    /// The memoized property-set resolution. Computed once per class; the
    /// result is shared for the life of the registry.
    pub(crate) fn resolve(&self, spec: &Arc<ClassSpec>) -> Result<Arc<ResolvedClass>, ConfigError> {
        if let Some(resolved) = self
            .resolved
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&spec.type_id())
        {
            return Ok(resolved.clone());
        }

        // Not held across the recursive parent resolution below.
        let resolved = Arc::new(self.resolve_uncached(spec)?);
        self.resolved
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(spec.type_id(), resolved.clone());
        Ok(resolved)
    }

    fn resolve_uncached(&self, spec: &Arc<ClassSpec>) -> Result<ResolvedClass, ConfigError> {
        let mut properties: Vec<ResolvedProperty> = Vec::new();

        if let Some(link) = spec.parent() {
            let parent = self
                .classes
                .get(&link.type_id)
                .ok_or_else(|| ConfigError::UnknownParent {
                    tag: spec.tag().into(),
                    parent: link.type_path.into(),
                })?;
            let parent = self.resolve(parent)?;
            for property in &parent.properties {
                properties.push(project_property(property, link, spec.tag()));
            }
        }

        let declared: Vec<&PropertyDef> =
            spec.contained().iter().chain(spec.own().iter()).collect();
        for (index, def) in declared.iter().enumerate() {
            if declared[..index].iter().any(|other| other.name() == def.name()) {
                return Err(ConfigError::DuplicateProperty {
                    tag: spec.tag().into(),
                    property: def.name().into(),
                });
            }
            let own = ResolvedProperty {
                name: def.name(),
                get: def.get.clone(),
                set: def.set.clone(),
                merge: def.merge.clone(),
            };
            // Re-declaring an inherited name shadows it in place; this
            // class's accessors win.
            match properties.iter_mut().find(|p| p.name == own.name) {
                Some(inherited) => *inherited = own,
                None => properties.push(own),
            }
        }

        for name in spec.excluded() {
            let before = properties.len();
            properties.retain(|p| p.name != *name);
            if properties.len() == before {
                return Err(ConfigError::UnknownProperty {
                    tag: spec.tag().into(),
                    property: (*name).into(),
                });
            }
        }

        Ok(ResolvedClass {
            spec: spec.clone(),
            properties,
        })
    }
}

impl Default for SerialRegistry {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

/// Compose an inherited property with the base projection so its accessors
/// take the subclass object.
fn project_property(
    property: &ResolvedProperty,
    link: &ParentLink,
    tag: &'static str,
) -> ResolvedProperty {
    use std::borrow::Cow;

    use crate::error::{DecodeError, SerializeError};

    let name = property.name;

    let get: GetFn = {
        let project = link.project.clone();
        let get = property.get.clone();
        Arc::new(move |obj: &dyn Serializable| {
            let base = project(obj).ok_or_else(|| SerializeError::Accessor {
                tag: Cow::Borrowed(tag),
                property: Cow::Borrowed(name),
            })?;
            get(base)
        })
    };

    let wrap_setter = |setter: &SetFn| -> SetFn {
        let project_mut = link.project_mut.clone();
        let setter = setter.clone();
        Arc::new(move |obj: &mut dyn Serializable, value| {
            let base = project_mut(obj).ok_or_else(|| DecodeError::Accessor {
                tag: Cow::Borrowed(tag),
                property: Cow::Borrowed(name),
            })?;
            setter(base, value)
        })
    };

    ResolvedProperty {
        name,
        get,
        set: wrap_setter(&property.set),
        merge: property.merge.as_ref().map(wrap_setter),
    }
}

fn _assert_send_sync() {
    fn check<T: Send + Sync>() {}
    check::<SerialRegistry>();
}
