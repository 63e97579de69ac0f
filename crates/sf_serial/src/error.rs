use std::borrow::Cow;
use std::{error, fmt};

// ---------------------------------------------------------------- // ConfigError

/// An error in the class declarations themselves, reported when a class is
/// registered or when its property set is first resolved.
///
/// Configuration errors are fatal: the declaration is wrong, so retrying the
/// same operation cannot succeed.
#[derive(Debug)]
pub enum ConfigError {
    /// Two different types were registered under the same tag.
    DuplicateTag { tag: Cow<'static, str> },
    /// A class tried to use one of the reserved collection kind markers
    /// (`"sequence"`, `"mapping"`, ...) as its tag.
    ReservedTag { tag: Cow<'static, str> },
    /// A class declares the same property name twice in its own declarations.
    /// Re-using an inherited name is not an error; it shadows the inherited
    /// property.
    DuplicateProperty {
        tag: Cow<'static, str>,
        property: Cow<'static, str>,
    },
    /// A class declares a parent that was never registered.
    UnknownParent {
        tag: Cow<'static, str>,
        parent: Cow<'static, str>,
    },
    /// A class excludes a property that does not exist anywhere in its
    /// resolved set.
    UnknownProperty {
        tag: Cow<'static, str>,
        property: Cow<'static, str>,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateTag { tag } => {
                write!(f, "tag `{tag}` is already registered for another type")
            }
            Self::ReservedTag { tag } => {
                write!(f, "tag `{tag}` is reserved for collection records")
            }
            Self::DuplicateProperty { tag, property } => {
                write!(f, "class `{tag}` declares property `{property}` twice")
            }
            Self::UnknownParent { tag, parent } => {
                write!(f, "class `{tag}` names unregistered parent `{parent}`")
            }
            Self::UnknownProperty { tag, property } => {
                write!(f, "class `{tag}` excludes unknown property `{property}`")
            }
        }
    }
}

impl error::Error for ConfigError {}

// ---------------------------------------------------------------- // SerializeError

/// A enumeration of all error outcomes that might happen when running
/// [`serialize`](crate::serialize).
///
/// Serialization never produces partial output: on error the whole text is
/// discarded.
#[derive(Debug)]
pub enum SerializeError {
    /// The graph reached an object whose type was never registered.
    UnregisteredType { type_path: Cow<'static, str> },
    /// A property getter could not read its value, usually because a class
    /// was registered with accessors for a different type.
    Accessor {
        tag: Cow<'static, str>,
        property: Cow<'static, str>,
    },
    /// A float value was NaN or infinite; the text form cannot represent
    /// non-finite numbers.
    NonFiniteFloat,
    /// The class declarations are invalid.
    Config(ConfigError),
    /// The encoded tree could not be rendered as JSON.
    Render(serde_json::Error),
}

impl fmt::Display for SerializeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnregisteredType { type_path } => {
                write!(f, "type `{type_path}` is not registered for serialization")
            }
            Self::Accessor { tag, property } => {
                write!(f, "failed to read property `{property}` of class `{tag}`")
            }
            Self::NonFiniteFloat => {
                f.write_str("non-finite floats cannot be encoded")
            }
            Self::Config(err) => write!(f, "invalid class configuration: {err}"),
            Self::Render(err) => write!(f, "failed to render encoded text: {err}"),
        }
    }
}

impl error::Error for SerializeError {}

impl From<ConfigError> for SerializeError {
    #[inline]
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

// ---------------------------------------------------------------- // DecodeError

/// A enumeration of all error outcomes that might happen when running
/// [`deserialize`](crate::deserialize).
#[derive(Debug)]
pub enum DecodeError {
    /// The text is not well-formed, or does not follow the encoded record
    /// layout.
    Parse(serde_json::Error),
    /// A tagged record names a tag with no registered factory.
    UnknownType { tag: String },
    /// A value of one kind appeared where another kind was required.
    TypeMismatch {
        expected: Cow<'static, str>,
        found: Cow<'static, str>,
    },
    /// A fixed-record field required by the target type is absent.
    MissingField { field: String },
    /// A property setter could not write its value.
    Accessor {
        tag: Cow<'static, str>,
        property: Cow<'static, str>,
    },
    /// The class declarations are invalid.
    Config(ConfigError),
}

impl DecodeError {
    /// Shorthand for the common mismatch case.
    #[inline]
    pub(crate) fn mismatch(expected: &'static str, found: impl Into<Cow<'static, str>>) -> Self {
        Self::TypeMismatch {
            expected: Cow::Borrowed(expected),
            found: found.into(),
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "failed to parse encoded text: {err}"),
            Self::UnknownType { tag } => {
                write!(f, "tag `{tag}` does not name a registered type")
            }
            Self::TypeMismatch { expected, found } => {
                write!(f, "expected {expected}, found {found}")
            }
            Self::MissingField { field } => {
                write!(f, "fixed record is missing field `{field}`")
            }
            Self::Accessor { tag, property } => {
                write!(f, "failed to write property `{property}` of class `{tag}`")
            }
            Self::Config(err) => write!(f, "invalid class configuration: {err}"),
        }
    }
}

impl error::Error for DecodeError {}

impl From<ConfigError> for DecodeError {
    #[inline]
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<serde_json::Error> for DecodeError {
    #[inline]
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}
