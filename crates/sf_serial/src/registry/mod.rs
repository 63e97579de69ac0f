//! Class declarations and the registries that resolve them.
//!
//! A [`ClassSpec`] declares one serializable class: tag, factory, parent
//! link, properties and exclusions. The [`SerialRegistry`] indexes those
//! declarations by tag and [`TypeId`](core::any::TypeId) and memoizes each
//! class's resolved property set. A process-wide instance behind a `RwLock`
//! backs the driver functions; with the `auto_register` feature it is seeded
//! from [`register_class!`](crate::register_class) submissions on first use.

use std::sync::{LazyLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::ConfigError;

mod class_spec;
#[allow(clippy::module_inception)]
mod registry;

#[cfg(feature = "auto_register")]
mod auto;

#[cfg(not(feature = "auto_register"))]
mod auto {
    pub(crate) fn apply(_registry: &mut super::SerialRegistry) {}
}

pub use class_spec::{ClassSpec, ClassSpecBuilder, PropertyDef};
pub use registry::SerialRegistry;

#[cfg(feature = "auto_register")]
pub use auto::ClassRegistration;

pub(crate) use class_spec::ClassKind;

// ---------------------------------------------------------------- // Global registry

static GLOBAL: LazyLock<RwLock<SerialRegistry>> = LazyLock::new(|| {
    let mut registry = SerialRegistry::new();
    auto::apply(&mut registry);
    RwLock::new(registry)
});

/// The process-wide registry backing [`serialize`](crate::serialize) and
/// friends.
pub fn global() -> &'static RwLock<SerialRegistry> {
    &GLOBAL
}

/// Read access to the global registry.
pub fn read() -> RwLockReadGuard<'static, SerialRegistry> {
    GLOBAL.read().unwrap_or_else(PoisonError::into_inner)
}

/// Write access to the global registry.
pub fn write() -> RwLockWriteGuard<'static, SerialRegistry> {
    GLOBAL.write().unwrap_or_else(PoisonError::into_inner)
}

/// Add a class declaration to the global registry.
#[inline]
pub fn register(spec: ClassSpec) -> Result<bool, ConfigError> {
    write().register(spec)
}
