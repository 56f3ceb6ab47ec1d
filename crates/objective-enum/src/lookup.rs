// SPDX-License-Identifier: MPL-2.0

//! Lookup, enumeration and flag decomposition over any objective enum.
//!
//! These functions are generic over [`ObjectiveEnum`] and resolve the registry of `T` statically;
//! they are equivalent to calling the corresponding [`Registry`](crate::Registry) methods on
//! `T::registry()`.

use crate::{ObjectiveEnum, Ordinal, RegistryError, Values};

/// A member lookup key: a name or an ordinal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key<'a> {
    /// A member name.
    Name(&'a str),
    /// A member ordinal.
    Ordinal(Ordinal),
}

impl<'a> From<&'a str> for Key<'a> {
    fn from(name: &'a str) -> Self {
        Self::Name(name)
    }
}

impl<'a> From<&'a String> for Key<'a> {
    fn from(name: &'a String) -> Self {
        Self::Name(name)
    }
}

impl From<Ordinal> for Key<'_> {
    fn from(ordinal: Ordinal) -> Self {
        Self::Ordinal(ordinal)
    }
}

/// All members of `T` in definition order.
pub fn values<T: ObjectiveEnum>() -> Values<'static, T> {
    T::registry().values()
}

/// The names of all members of `T` in definition order.
pub fn names<T: ObjectiveEnum>() -> impl ExactSizeIterator<Item = &'static str> {
    T::registry().names()
}

/// Looks up a member of `T` by name or ordinal.
///
/// # Errors
///
/// A [`NotFound`](crate::ErrorKind::NotFound) error if there is no such member.
pub fn value_of<'k, T: ObjectiveEnum>(
    key: impl Into<Key<'k>>,
) -> Result<&'static T, RegistryError> {
    T::registry().get(key)
}

/// Looks up a member of `T` by name or ordinal, returning [`None`] if there is no such member.
///
/// A registry that failed to populate has no members.
pub fn try_value_of<'k, T: ObjectiveEnum>(key: impl Into<Key<'k>>) -> Option<&'static T> {
    T::try_registry().ok()?.try_get(key)
}

/// Whether `T` has a member with the given name or ordinal.
///
/// A registry that failed to populate has no members.
pub fn exists<'k, T: ObjectiveEnum>(key: impl Into<Key<'k>>) -> bool {
    T::try_registry().map_or(false, |it| it.contains(key))
}

/// Whether every bit of `flag` is set in `flags`.
///
/// Note that this is trivially true when `flag` is 0.
pub fn has_flag(flags: Ordinal, flag: Ordinal) -> bool {
    (flag & flags) == flag
}

/// Decomposes a bit-mask into the members of `T` whose ordinals it contains.
///
/// Every member `v` with <code>[has_flag]\(mask, v.ordinal())</code> is returned, in definition
/// order, except that members with ordinal 0 are only returned when `mask` itself is 0. For
/// members whose ordinals are pairwise-disjoint powers of two, this is ordinary bit decomposition;
/// choosing such ordinals is up to the caller.
pub fn flags<T: ObjectiveEnum>(mask: Ordinal) -> Vec<&'static T> {
    values::<T>()
        .filter(|it| {
            let ordinal = it.ordinal();

            if ordinal == 0 {
                mask == 0
            } else {
                has_flag(mask, ordinal)
            }
        })
        .collect()
}
