use alloc::string::{String, ToString};
use core::fmt::Display;

use thiserror::Error;

/// Errors that abort a save or load.
///
/// Malformed attribute values never show up here: the lenient readers in
/// [`node`](crate::node) absorb them with a default. A child that is simply
/// absent is not an error either when the caller supplied a default, see
/// [`PersistContext::read_child_or`](crate::codec::PersistContext::read_child_or).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum CodecError {
    /// No strategy exists for the requested type.
    #[error("no element strategy is registered for `{type_path}`")]
    NotConvertible { type_path: String },
    /// A recorded type name did not resolve to a registered type.
    #[error("recorded type `{name}` does not resolve to a registered type")]
    UnresolvedType { name: String },
    /// A node holds a different type than the one requested.
    #[error("expected `{expected}`, the node holds `{found}`")]
    TypeMismatch { expected: String, found: String },
    /// A required child node is absent.
    #[error("`{parent}` has no child named `{name}`")]
    MissingChild { parent: String, name: String },
    /// An array cell was not present and the element type has no default.
    #[error("array cell [{index}] is absent and `{element}` has no registered default")]
    MissingCell { element: String, index: String },
    /// A value that can not be represented by the target type.
    #[error("`{value}` is not a valid `{type_path}`")]
    InvalidValue { type_path: String, value: String },
    /// Raised by providers.
    #[error("{0}")]
    Custom(String),
}

impl CodecError {
    /// Creates a [`CodecError::Custom`].
    #[inline]
    pub fn custom(message: impl Display) -> Self {
        Self::Custom(message.to_string())
    }

    pub(crate) fn not_convertible(type_path: &str) -> Self {
        Self::NotConvertible {
            type_path: type_path.into(),
        }
    }

    pub(crate) fn mismatch(expected: &str, found: &str) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Returns `true` for the errors that a recorded type name can cause.
    pub fn is_type_error(&self) -> bool {
        matches!(
            self,
            Self::UnresolvedType { .. } | Self::TypeMismatch { .. }
        )
    }
}
