use alloc::format;
use alloc::string::{String, ToString};
use core::fmt;

use thiserror::Error;

// -----------------------------------------------------------------------------
// Fault

/// A low-level conversion failure.
///
/// Faults never reach callers on their own: they are wrapped into
/// [`BindError::Conversion`] together with the path of the value that
/// failed to convert.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum Fault {
    #[error("expected {expected}, found {found}")]
    Mismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("{value} is out of range for `{target}`")]
    OutOfRange { target: &'static str, value: String },

    #[error("required field `{field}` has no value")]
    MissingRequired { field: &'static str },

    #[error("expected {expected} elements, found {found}")]
    Length { expected: usize, found: usize },

    #[error("union value has no `type` key")]
    MissingTypeKey,

    #[error("native value is not a `{expected}`")]
    NativeMismatch { expected: &'static str },

    #[error("{0}")]
    Custom(String),
}

impl Fault {
    /// Creates a [`Fault::Custom`] from any displayable message.
    pub fn custom(message: impl fmt::Display) -> Self {
        Self::Custom(message.to_string())
    }

    /// Creates a [`Fault::NativeMismatch`] naming `T`.
    #[inline]
    pub fn native<T: ?Sized>() -> Self {
        Self::NativeMismatch {
            expected: core::any::type_name::<T>(),
        }
    }
}

// -----------------------------------------------------------------------------
// BindError

/// Errors surfaced by resolution, registration and conversion.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum BindError {
    /// No classification matched the type, or its declaration is incomplete.
    #[error("type `{ty}` cannot be resolved: {reason}")]
    UnresolvableType { ty: &'static str, reason: String },

    /// The type already has a descriptor.
    #[error("type `{ty}` is already registered")]
    AlreadyRegistered { ty: &'static str },

    /// An explicit field order does not name every field exactly once.
    #[error("field order of `{ty}` does not match its fields: {detail}")]
    OrderMismatch { ty: &'static str, detail: String },

    /// A record reaches itself through direct fields only.
    #[error("`{ty}` contains itself without indirection: {cycle}")]
    RecursiveStructure { ty: &'static str, cycle: String },

    /// A value's concrete type is not a member of the union.
    #[error("`{member}` is not a member of union `{union}`")]
    UnionMembership { union: &'static str, member: String },

    /// A field or element failed to encode or decode.
    #[error("failed to convert {}: {fault}", display_path(.path))]
    Conversion { path: String, fault: Fault },
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        String::from("value")
    } else {
        format!("`{path}`")
    }
}

impl From<Fault> for BindError {
    #[inline]
    fn from(fault: Fault) -> Self {
        Self::Conversion {
            path: String::new(),
            fault,
        }
    }
}

impl BindError {
    #[inline]
    pub(crate) fn unresolvable(ty: &'static str, reason: impl fmt::Display) -> Self {
        Self::UnresolvableType {
            ty,
            reason: reason.to_string(),
        }
    }

    /// Returns the conversion path, if this is a [`BindError::Conversion`].
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Conversion { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Returns the underlying fault, if this is a [`BindError::Conversion`].
    pub fn fault(&self) -> Option<&Fault> {
        match self {
            Self::Conversion { fault, .. } => Some(fault),
            _ => None,
        }
    }

    /// Prefixes the conversion path with a field name.
    pub(crate) fn at_field(self, name: &str) -> Self {
        self.prefix(|path| {
            if path.is_empty() {
                name.to_string()
            } else if path.starts_with('[') {
                format!("{name}{path}")
            } else {
                format!("{name}.{path}")
            }
        })
    }

    /// Prefixes the conversion path with a sequence index.
    pub(crate) fn at_index(self, index: usize) -> Self {
        self.prefix(|path| {
            if path.is_empty() || path.starts_with('[') {
                format!("[{index}]{path}")
            } else {
                format!("[{index}].{path}")
            }
        })
    }

    fn prefix(self, join: impl FnOnce(&str) -> String) -> Self {
        match self {
            Self::Conversion { path, fault } => Self::Conversion {
                path: join(&path),
                fault,
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BindError, Fault};
    use alloc::string::ToString;

    #[test]
    fn conversion_paths_accumulate_outward() {
        let err = BindError::from(Fault::MissingTypeKey)
            .at_field("shape")
            .at_index(2)
            .at_field("items")
            .at_field("scene");
        assert_eq!(err.path(), Some("scene.items[2].shape"));
        assert_eq!(err.fault(), Some(&Fault::MissingTypeKey));
        assert_eq!(
            err.to_string(),
            "failed to convert `scene.items[2].shape`: union value has no `type` key"
        );
    }

    #[test]
    fn taxonomy_errors_ignore_paths() {
        let err = BindError::AlreadyRegistered { ty: "u8" }.at_field("x");
        assert_eq!(err, BindError::AlreadyRegistered { ty: "u8" });
        assert_eq!(err.path(), None);
    }

    #[test]
    fn root_conversion_display() {
        let err = BindError::from(Fault::Length {
            expected: 2,
            found: 3,
        });
        assert_eq!(
            err.to_string(),
            "failed to convert value: expected 2 elements, found 3"
        );
    }
}
