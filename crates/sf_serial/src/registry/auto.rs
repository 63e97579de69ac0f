use crate::registry::{ClassSpec, SerialRegistry};

// ---------------------------------------------------------------- // ClassRegistration

/// One deferred registration collected by
/// [`register_class!`](crate::register_class).
///
/// The builder runs on first use of the global registry, not at submission
/// time, so submissions stay `const`-constructible.
pub struct ClassRegistration {
    pub build: fn() -> ClassSpec,
}

inventory::collect!(ClassRegistration);

/// Run every collected registration against `registry`.
///
/// Called once while the global registry is being initialized. A failing
/// registration means the program's class declarations are wrong, which no
/// caller can recover from, so it aborts loudly.
pub(crate) fn apply(registry: &mut SerialRegistry) {
    for registration in inventory::iter::<ClassRegistration> {
        if let Err(err) = registry.register((registration.build)()) {
            panic!("invalid serializable class registration: {err}");
        }
    }
}

// ---------------------------------------------------------------- // register_class

/// Submit a class declaration for automatic registration.
///
/// The argument is a `fn() -> ClassSpec`; it is invoked on first use of the
/// global registry.
///
/// # Examples
///
/// ```
/// use sf_serial::registry::ClassSpec;
///
/// #[derive(Debug, Default, Clone, PartialEq)]
/// struct Badge {
///     id: u32,
/// }
///
/// sf_serial::impl_serializable!(Badge, "demo::Badge");
///
/// fn badge_spec() -> ClassSpec {
///     ClassSpec::builder::<Badge>("demo::Badge")
///         .property("id", |b: &Badge| b.id, |b, v| b.id = v)
///         .build()
/// }
///
/// sf_serial::register_class!(badge_spec);
///
/// // No explicit registration call: the submission above is applied on
/// // first use of the global registry.
/// let text = sf_serial::serialize(&Badge { id: 7 }).unwrap();
/// let back: Badge = sf_serial::deserialize(&text).unwrap();
/// assert_eq!(back, Badge { id: 7 });
/// ```
#[macro_export]
macro_rules! register_class {
    ($build:expr) => {
        $crate::__macro_exports::inventory::submit! {
            $crate::registry::ClassRegistration { build: $build }
        }
    };
}
