// SPDX-License-Identifier: MPL-2.0

//! The error type returned by registries.

use thiserror::Error;

use crate::Ordinal;

/// An error raised while populating or querying a [`Registry`](crate::Registry).
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// A member with this name was already defined.
    #[error("member `{name}` of `{ty}` is already defined")]
    DuplicateName { ty: &'static str, name: &'static str },
    /// An explicit ordinal is already held by another member.
    #[error("cannot assign ordinal {ordinal} to `{name}`: it is held by `{holder}`")]
    OrdinalTaken { ordinal: Ordinal, name: &'static str, holder: &'static str },
    /// No free ordinal remains at or above the allocation cursor.
    #[error("`{ty}` has no free ordinal left for `{name}`")]
    OrdinalsExhausted { ty: &'static str, name: &'static str },
    /// No member has this name.
    #[error("`{ty}` has no member named `{name}`")]
    NameNotFound { ty: &'static str, name: String },
    /// No member has this ordinal.
    #[error("`{ty}` has no member with ordinal {ordinal}")]
    OrdinalNotFound { ty: &'static str, ordinal: Ordinal },
}

/// The broad category of a [`RegistryError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A name or ordinal is already taken.
    Conflict,
    /// The ordinal space is exhausted.
    Range,
    /// A lookup found nothing.
    NotFound,
}

impl RegistryError {
    /// The category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DuplicateName { .. } | Self::OrdinalTaken { .. } => ErrorKind::Conflict,
            Self::OrdinalsExhausted { .. } => ErrorKind::Range,
            Self::NameNotFound { .. } | Self::OrdinalNotFound { .. } => ErrorKind::NotFound,
        }
    }

    /// Whether this error is a [`ErrorKind::NotFound`].
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}
