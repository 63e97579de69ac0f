use core::any::TypeId;
use core::marker::PhantomData;
use std::borrow::Cow;
use std::sync::Arc;

use crate::codec::LeafScalar;
use crate::error::{ConfigError, DecodeError, SerializeError};
use crate::value::{FromValue, SerialValue, ToValue};
use crate::Serializable;

// ---------------------------------------------------------------- // Erased accessors

pub(crate) type GetFn =
    Arc<dyn Fn(&dyn Serializable) -> Result<SerialValue, SerializeError> + Send + Sync>;

pub(crate) type SetFn =
    Arc<dyn Fn(&mut dyn Serializable, SerialValue) -> Result<(), DecodeError> + Send + Sync>;

pub(crate) type ProjectFn =
    Arc<dyn for<'a> Fn(&'a dyn Serializable) -> Option<&'a dyn Serializable> + Send + Sync>;

pub(crate) type ProjectMutFn =
    Arc<dyn for<'a> Fn(&'a mut dyn Serializable) -> Option<&'a mut dyn Serializable> + Send + Sync>;

pub(crate) type FactoryFn = fn() -> Box<dyn Serializable>;

pub(crate) type LeafEncodeFn =
    Arc<dyn Fn(&dyn Serializable) -> Result<Vec<LeafScalar>, SerializeError> + Send + Sync>;

pub(crate) type LeafDecodeFn =
    Arc<dyn Fn(&[LeafScalar]) -> Result<Box<dyn Serializable>, DecodeError> + Send + Sync>;

// ---------------------------------------------------------------- // PropertyDef

/// One declared property: a name plus type-erased accessors.
///
/// `merge` is the optional reconstruction setter: when present, the decoder
/// prefers it over `set` so owners can fold decoded items into collection
/// state their constructor already populated.
#[derive(Clone)]
pub struct PropertyDef {
    pub(crate) name: &'static str,
    pub(crate) get: GetFn,
    pub(crate) set: SetFn,
    pub(crate) merge: Option<SetFn>,
}

impl PropertyDef {
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// How a class reaches its parent sub-object.
#[derive(Clone)]
pub(crate) struct ParentLink {
    pub(crate) type_id: TypeId,
    pub(crate) type_path: &'static str,
    pub(crate) project: ProjectFn,
    pub(crate) project_mut: ProjectMutFn,
}

/// Leaf types bypass the property protocol and encode as a scalar tuple.
#[derive(Clone)]
pub(crate) struct LeafCodec {
    pub(crate) encode: LeafEncodeFn,
    pub(crate) decode: LeafDecodeFn,
}

#[derive(Clone)]
pub(crate) enum ClassKind {
    Composite { factory: FactoryFn },
    Leaf(LeafCodec),
}

// ---------------------------------------------------------------- // ClassSpec

/// The immutable declaration of one serializable class: its tag, factory,
/// parent link, property lists and exclusions.
///
/// Built once through [`ClassSpec::builder`] (or [`ClassSpec::leaf`] for
/// scalar-tuple types) and handed to the registry; the effective property
/// set is resolved lazily from the declarations of the whole ancestry.
///
/// # Examples
///
/// ```
/// use sf_serial::registry::ClassSpec;
///
/// #[derive(Debug, Default, Clone, PartialEq)]
/// struct Counter {
///     count: i64,
/// }
///
/// sf_serial::impl_serializable!(Counter, "demo::Counter");
///
/// ClassSpec::builder::<Counter>("demo::Counter")
///     .property("count", |c: &Counter| c.count, |c, v| c.count = v)
///     .register()
///     .unwrap();
///
/// let text = sf_serial::serialize(&Counter { count: 3 }).unwrap();
/// assert_eq!(
///     text,
///     r#"{"type":"demo::Counter","properties":{"count":3}}"#
/// );
/// ```
pub struct ClassSpec {
    tag: &'static str,
    type_id: TypeId,
    parent: Option<ParentLink>,
    own: Vec<PropertyDef>,
    contained: Vec<PropertyDef>,
    excluded: Vec<&'static str>,
    kind: ClassKind,
}

impl ClassSpec {
    /// Start declaring a composite class. `T::default()` is the factory used
    /// for reconstruction, so the constructor may pre-populate whatever the
    /// merge protocol expects.
    pub fn builder<T: Serializable + Default>(tag: &'static str) -> ClassSpecBuilder<T> {
        ClassSpecBuilder {
            tag,
            parent: None,
            own: Vec::new(),
            contained: Vec::new(),
            excluded: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Declare a leaf class encoding to a fixed scalar tuple.
    pub fn leaf<T: Serializable>(
        tag: &'static str,
        encode: fn(&T) -> Vec<LeafScalar>,
        decode: fn(&[LeafScalar]) -> Result<T, DecodeError>,
    ) -> Self {
        let encode_erased: LeafEncodeFn = Arc::new(move |obj: &dyn Serializable| {
            let obj = obj
                .downcast_ref::<T>()
                .ok_or_else(|| SerializeError::Accessor {
                    tag: Cow::Borrowed(tag),
                    property: Cow::Borrowed("<leaf>"),
                })?;
            Ok(encode(obj))
        });
        let decode_erased: LeafDecodeFn = Arc::new(move |values: &[LeafScalar]| {
            Ok(Box::new(decode(values)?) as Box<dyn Serializable>)
        });
        Self {
            tag,
            type_id: TypeId::of::<T>(),
            parent: None,
            own: Vec::new(),
            contained: Vec::new(),
            excluded: Vec::new(),
            kind: ClassKind::Leaf(LeafCodec {
                encode: encode_erased,
                decode: decode_erased,
            }),
        }
    }

    #[inline]
    pub fn tag(&self) -> &'static str {
        self.tag
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub(crate) fn parent(&self) -> Option<&ParentLink> {
        self.parent.as_ref()
    }

    pub(crate) fn own(&self) -> &[PropertyDef] {
        &self.own
    }

    pub(crate) fn contained(&self) -> &[PropertyDef] {
        &self.contained
    }

    pub(crate) fn excluded(&self) -> &[&'static str] {
        &self.excluded
    }

    pub(crate) fn kind(&self) -> &ClassKind {
        &self.kind
    }
}

// ---------------------------------------------------------------- // ClassSpecBuilder

/// Typed builder producing the type-erased [`ClassSpec`].
///
/// Accessors are plain functions of the concrete type; erasure happens here,
/// once, so the driver never downcasts property values itself.
pub struct ClassSpecBuilder<T: Serializable + Default> {
    tag: &'static str,
    parent: Option<ParentLink>,
    own: Vec<PropertyDef>,
    contained: Vec<PropertyDef>,
    excluded: Vec<&'static str>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Serializable + Default> ClassSpecBuilder<T> {
    /// Link to the parent class through projections onto the embedded base
    /// sub-object. The parent's resolved properties are inherited ahead of
    /// this class's own.
    pub fn parent<P: Serializable>(
        mut self,
        project: fn(&T) -> &P,
        project_mut: fn(&mut T) -> &mut P,
    ) -> Self {
        let erased: ProjectFn = Arc::new(move |obj: &dyn Serializable| {
            obj.downcast_ref::<T>().map(|t| project(t) as &dyn Serializable)
        });
        let erased_mut: ProjectMutFn = Arc::new(move |obj: &mut dyn Serializable| {
            obj.downcast_mut::<T>()
                .map(|t| project_mut(t) as &mut dyn Serializable)
        });
        self.parent = Some(ParentLink {
            type_id: TypeId::of::<P>(),
            type_path: core::any::type_name::<P>(),
            project: erased,
            project_mut: erased_mut,
        });
        self
    }

    /// Declare a property serialized and reconstructed through plain
    /// accessors.
    pub fn property<V>(mut self, name: &'static str, get: fn(&T) -> V, set: fn(&mut T, V)) -> Self
    where
        V: ToValue + FromValue + 'static,
    {
        let def = Self::erase(self.tag, name, get, set, None);
        self.own.push(def);
        self
    }

    /// Declare a property with a distinct reconstruction setter; the decoder
    /// uses `merge` instead of `set`.
    pub fn property_merged<V>(
        mut self,
        name: &'static str,
        get: fn(&T) -> V,
        set: fn(&mut T, V),
        merge: fn(&mut T, V),
    ) -> Self
    where
        V: ToValue + FromValue + 'static,
    {
        let def = Self::erase(self.tag, name, get, set, Some(merge));
        self.own.push(def);
        self
    }

    /// Declare an additional property: composed into the resolved set ahead
    /// of the class's own properties, after the inherited ones.
    pub fn contained<V>(mut self, name: &'static str, get: fn(&T) -> V, set: fn(&mut T, V)) -> Self
    where
        V: ToValue + FromValue + 'static,
    {
        let def = Self::erase(self.tag, name, get, set, None);
        self.contained.push(def);
        self
    }

    /// [`contained`](Self::contained) with a distinct reconstruction setter.
    pub fn contained_merged<V>(
        mut self,
        name: &'static str,
        get: fn(&T) -> V,
        set: fn(&mut T, V),
        merge: fn(&mut T, V),
    ) -> Self
    where
        V: ToValue + FromValue + 'static,
    {
        let def = Self::erase(self.tag, name, get, set, Some(merge));
        self.contained.push(def);
        self
    }

    /// Remove an inherited (or otherwise composed) property from this class
    /// and its descendants. Excluding a name that resolves to nothing is a
    /// configuration error.
    pub fn exclude(mut self, name: &'static str) -> Self {
        self.excluded.push(name);
        self
    }

    pub fn build(self) -> ClassSpec {
        ClassSpec {
            tag: self.tag,
            type_id: TypeId::of::<T>(),
            parent: self.parent,
            own: self.own,
            contained: self.contained,
            excluded: self.excluded,
            kind: ClassKind::Composite {
                factory: default_factory::<T>,
            },
        }
    }

    /// Build and add to the global registry.
    pub fn register(self) -> Result<bool, ConfigError> {
        crate::registry::register(self.build())
    }

    fn erase<V>(
        tag: &'static str,
        name: &'static str,
        get: fn(&T) -> V,
        set: fn(&mut T, V),
        merge: Option<fn(&mut T, V)>,
    ) -> PropertyDef
    where
        V: ToValue + FromValue + 'static,
    {
        let get_erased: GetFn = Arc::new(move |obj: &dyn Serializable| {
            let obj = obj
                .downcast_ref::<T>()
                .ok_or_else(|| SerializeError::Accessor {
                    tag: Cow::Borrowed(tag),
                    property: Cow::Borrowed(name),
                })?;
            Ok(get(obj).to_value())
        });
        PropertyDef {
            name,
            get: get_erased,
            set: Self::erase_setter(tag, name, set),
            merge: merge.map(|merge| Self::erase_setter(tag, name, merge)),
        }
    }

    fn erase_setter<V>(tag: &'static str, name: &'static str, set: fn(&mut T, V)) -> SetFn
    where
        V: FromValue + 'static,
    {
        Arc::new(move |obj: &mut dyn Serializable, value: SerialValue| {
            let obj = obj.downcast_mut::<T>().ok_or_else(|| DecodeError::Accessor {
                tag: Cow::Borrowed(tag),
                property: Cow::Borrowed(name),
            })?;
            set(obj, V::from_value(value)?);
            Ok(())
        })
    }
}

fn default_factory<T: Serializable + Default>() -> Box<dyn Serializable> {
    Box::new(T::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impl_serializable;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Widget {
        label: String,
    }

    impl_serializable!(Widget, "tests::spec::Widget");

    #[test]
    fn erased_accessors_round_trip() {
        let spec = ClassSpec::builder::<Widget>("tests::spec::Widget")
            .property("label", |w: &Widget| w.label.clone(), |w, v| w.label = v)
            .build();

        let source = Widget {
            label: "hi".to_owned(),
        };
        let value = (spec.own()[0].get)(&source).unwrap();

        let mut target = Widget::default();
        (spec.own()[0].set)(&mut target, value).unwrap();
        assert_eq!(target, source);
    }

    #[test]
    fn accessors_reject_foreign_types() {
        #[derive(Debug, Default, Clone, PartialEq)]
        struct Stranger;
        impl_serializable!(Stranger, "tests::spec::Stranger");

        let spec = ClassSpec::builder::<Widget>("tests::spec::Widget")
            .property("label", |w: &Widget| w.label.clone(), |w, v| w.label = v)
            .build();

        assert!(matches!(
            (spec.own()[0].get)(&Stranger),
            Err(SerializeError::Accessor { .. })
        ));
    }
}
