// SPDX-License-Identifier: MPL-2.0

//! Populated registries.

use std::{any::type_name, collections::HashMap, fmt, sync::OnceLock};

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::{Key, ObjectiveEnum, Ordinal, RegistryBuilder, RegistryError};

/// The members of an objective enum, indexed by name and by ordinal.
///
/// A registry is immutable. It is produced by [`RegistryBuilder::finish`] and, for generated
/// types, lives in a [`LazyRegistry`].
pub struct Registry<T> {
    // Insertion order is definition order.
    by_name: IndexMap<&'static str, T>,
    by_ordinal: HashMap<Ordinal, usize>,
}

impl<T> Registry<T> {
    pub(crate) fn from_parts(
        by_name: IndexMap<&'static str, T>,
        by_ordinal: HashMap<Ordinal, usize>,
    ) -> Self {
        Self { by_name, by_ordinal }
    }

    /// The number of members.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Whether there are no members.
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Iterates over all members in definition order.
    pub fn values(&self) -> Values<'_, T> {
        Values(self.by_name.values())
    }

    /// Iterates over all member names in definition order.
    pub fn names(&self) -> impl ExactSizeIterator<Item = &'static str> + '_ {
        self.by_name.keys().copied()
    }

    /// Looks up a member by name.
    ///
    /// # Errors
    ///
    /// [`RegistryError::NameNotFound`] if there is no such member.
    pub fn get_by_name(&self, name: &str) -> Result<&T, RegistryError> {
        self.by_name.get(name).ok_or_else(|| RegistryError::NameNotFound {
            ty: type_name::<T>(),
            name: name.to_owned(),
        })
    }

    /// Looks up a member by ordinal.
    ///
    /// # Errors
    ///
    /// [`RegistryError::OrdinalNotFound`] if there is no such member.
    pub fn get_by_ordinal(&self, ordinal: Ordinal) -> Result<&T, RegistryError> {
        self.by_ordinal
            .get(&ordinal)
            .map(|&index| &self.by_name[index])
            .ok_or(RegistryError::OrdinalNotFound { ty: type_name::<T>(), ordinal })
    }

    /// Looks up a member by name or ordinal.
    ///
    /// # Errors
    ///
    /// A [`NotFound`](crate::ErrorKind::NotFound) error if there is no such member.
    pub fn get<'k>(&self, key: impl Into<Key<'k>>) -> Result<&T, RegistryError> {
        match key.into() {
            Key::Name(name) => self.get_by_name(name),
            Key::Ordinal(ordinal) => self.get_by_ordinal(ordinal),
        }
    }

    /// Looks up a member by name or ordinal, returning [`None`] if there is no such member.
    pub fn try_get<'k>(&self, key: impl Into<Key<'k>>) -> Option<&T> {
        match key.into() {
            Key::Name(name) => self.by_name.get(name),
            Key::Ordinal(ordinal) => self.by_ordinal.get(&ordinal).map(|&it| &self.by_name[it]),
        }
    }

    /// Whether a member with the given name or ordinal exists.
    pub fn contains<'k>(&self, key: impl Into<Key<'k>>) -> bool {
        self.try_get(key).is_some()
    }
}

impl<T: ObjectiveEnum> fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.values().map(|it| (it.name(), it.ordinal()))).finish()
    }
}

/// An iterator over the members of a [`Registry`] in definition order.
pub struct Values<'a, T>(indexmap::map::Values<'a, &'static str, T>);

impl<'a, T> Iterator for Values<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<T> DoubleEndedIterator for Values<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back()
    }
}

impl<T> ExactSizeIterator for Values<'_, T> {}

impl<T> Clone for Values<'_, T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

/// The function that populates a [`LazyRegistry`].
pub type Populate<T> = fn(&mut RegistryBuilder<T>) -> Result<(), RegistryError>;

/// A [`Registry`] populated on first access.
///
/// The [`generate`](crate::generate) macro emits one of these as a `static` for every objective
/// enum. Population runs exactly once, even under concurrent first access; other threads block
/// until it completes.
pub struct LazyRegistry<T> {
    cell: OnceLock<Result<Registry<T>, RegistryError>>,
    populate: Populate<T>,
}

impl<T: ObjectiveEnum> LazyRegistry<T> {
    /// Creates a registry that will be populated by `populate`.
    pub const fn new(populate: Populate<T>) -> Self {
        Self { cell: OnceLock::new(), populate }
    }

    /// Returns the registry, populating it first if necessary.
    ///
    /// # Errors
    ///
    /// Returns the error raised by the populating function, if any. The error is returned again
    /// on every later call.
    pub fn try_get(&self) -> Result<&Registry<T>, &RegistryError> {
        self.cell
            .get_or_init(|| {
                let ty = type_name::<T>();
                let mut builder = RegistryBuilder::new();
                match (self.populate)(&mut builder) {
                    Ok(()) => {
                        debug!(ty, members = builder.len(), "populated registry");
                        Ok(builder.finish())
                    }
                    Err(e) => {
                        warn!(ty, error = %e, "failed to populate registry");
                        Err(e)
                    }
                }
            })
            .as_ref()
    }

    /// Returns the registry, populating it first if necessary.
    ///
    /// # Panics
    ///
    /// Panics if the populating function failed.
    pub fn get(&self) -> &Registry<T> {
        match self.try_get() {
            Ok(it) => it,
            Err(e) => panic!("failed to populate `{}`: {e}", type_name::<T>()),
        }
    }
}
