// SPDX-License-Identifier: MPL-2.0

//! Ordinal allocation.
//!
//! Every generated registry is populated through a [`RegistryBuilder`]. Members are defined one at
//! a time, in declaration order, and receive the lowest free ordinal at or above the allocation
//! cursor. A definition may then be moved to an explicit ordinal with [`Definition::reassign`].
//!
//! The cursor only ever advances: ordinals vacated by a reassignment are not handed out again.

use std::{any::type_name, collections::HashMap};

use indexmap::IndexMap;
use tracing::trace;

use crate::{ObjectiveEnum, Ordinal, Registry, RegistryError};

/// Populates a [`Registry`].
pub struct RegistryBuilder<T> {
    by_name: IndexMap<&'static str, T>,
    by_ordinal: HashMap<Ordinal, usize>,
    // This is wider than `Ordinal` so that it can point one past `Ordinal::MAX`.
    next_ordinal: u64,
}

impl<T> Default for RegistryBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RegistryBuilder<T> {
    /// Creates an empty builder whose cursor is at ordinal 0.
    pub fn new() -> Self {
        Self { by_name: IndexMap::new(), by_ordinal: HashMap::new(), next_ordinal: 0 }
    }

    /// The ordinal from which the next auto-allocation starts searching, or [`None`] if the cursor
    /// has moved past [`Ordinal::MAX`].
    pub fn next_ordinal(&self) -> Option<Ordinal> {
        Ordinal::try_from(self.next_ordinal).ok()
    }

    /// The number of members defined so far.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Whether no member has been defined yet.
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Freezes the builder into a [`Registry`].
    pub fn finish(self) -> Registry<T> {
        Registry::from_parts(self.by_name, self.by_ordinal)
    }

    /// Finds the lowest ordinal at or above the cursor that no member holds.
    fn free_ordinal(&self) -> Option<Ordinal> {
        let start = self.next_ordinal()?;

        (start..=Ordinal::MAX).find(|it| !self.by_ordinal.contains_key(it))
    }

    fn advance_past(&mut self, ordinal: Ordinal) {
        self.next_ordinal = self.next_ordinal.max(u64::from(ordinal) + 1);
    }
}

impl<T: ObjectiveEnum> RegistryBuilder<T> {
    /// Defines a member.
    ///
    /// The instance is given the name `name` and the lowest free ordinal at or above the cursor,
    /// and the cursor is moved one past that ordinal.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::DuplicateName`] if a member named `name` already exists.
    /// - [`RegistryError::OrdinalsExhausted`] if every ordinal from the cursor up to
    ///   [`Ordinal::MAX`] is taken.
    pub fn define(
        &mut self,
        name: &'static str,
        mut instance: T,
    ) -> Result<Definition<'_, T>, RegistryError> {
        let ty = type_name::<T>();
        if self.by_name.contains_key(name) {
            return Err(RegistryError::DuplicateName { ty, name });
        }
        let ordinal =
            self.free_ordinal().ok_or(RegistryError::OrdinalsExhausted { ty, name })?;

        instance.identity_mut().assign(name, ordinal);
        let (index, _) = self.by_name.insert_full(name, instance);
        self.by_ordinal.insert(ordinal, index);
        self.advance_past(ordinal);
        trace!(ty, name, ordinal, "allocated ordinal");

        Ok(Definition { builder: self, index })
    }

    /// Moves the member at `index` to `ordinal`.
    fn reassign(&mut self, index: usize, ordinal: Ordinal) -> Result<(), RegistryError> {
        match self.by_ordinal.get(&ordinal) {
            Some(&holder) if holder == index => Ok(()),
            Some(&holder) => Err(RegistryError::OrdinalTaken {
                ordinal,
                name: self.by_name[index].name(),
                holder: self.by_name[holder].name(),
            }),
            None => {
                let instance = &mut self.by_name[index];
                let name = instance.name();
                let previous = instance.ordinal();
                instance.identity_mut().assign(name, ordinal);

                self.by_ordinal.remove(&previous);
                self.by_ordinal.insert(ordinal, index);
                self.advance_past(ordinal);
                trace!(ty = type_name::<T>(), name, previous, ordinal, "relocated member");

                Ok(())
            }
        }
    }
}

/// A member that was just defined by [`RegistryBuilder::define`].
pub struct Definition<'a, T> {
    builder: &'a mut RegistryBuilder<T>,
    index: usize,
}

impl<T: ObjectiveEnum> Definition<'_, T> {
    /// The defined instance.
    pub fn instance(&self) -> &T {
        &self.builder.by_name[self.index]
    }

    /// Moves this member to an explicit ordinal.
    ///
    /// This does nothing if the member already holds `ordinal`. Otherwise, the member is moved and
    /// the allocation cursor advances past `ordinal` (if it is not already beyond it).
    ///
    /// # Errors
    ///
    /// [`RegistryError::OrdinalTaken`] if another member holds `ordinal`.
    pub fn reassign(self, ordinal: Ordinal) -> Result<(), RegistryError> {
        self.builder.reassign(self.index, ordinal)
    }
}
