// SPDX-License-Identifier: MPL-2.0

//! Object-like enumerations.
//!
//! An *objective enum* is a struct whose values form a closed set of named singletons, each with a
//! unique integer [ordinal](Ordinal). The set is declared once, in a `#[members]` initializer, and
//! the [`generate`] attribute macro completes the struct: it adds accessor constants for every
//! member, implements [`ObjectiveEnum`], and wires a lazily-populated [`Registry`] behind it.
//!
//! ```ignore
//! #[objective_enum::generate]
//! mod roles {
//!     #[objective_enum]
//!     pub struct Role {
//!         pub title: &'static str,
//!     }
//!
//!     impl Role {
//!         fn new(title: &'static str) -> Self {
//!             Self { title }
//!         }
//!
//!         #[members]
//!         fn members() {
//!             Enum::None("None");
//!             Enum::User("Default")(1 << 0);
//!             Enum::Admin("Administrator")(1 << 2);
//!         }
//!     }
//! }
//!
//! use objective_enum::ObjectiveEnum as _;
//! use roles::Role;
//!
//! assert_eq!(Role::Admin.ordinal(), 4);
//! assert_eq!(Role::parse("User").unwrap().title, "Default");
//! ```
//!
//! Refer to the [`spec`] module for the accepted syntax.

#![deny(rustdoc::broken_intra_doc_links, rustdoc::private_intra_doc_links)]

pub mod lookup;
pub mod spec;

mod builder;
mod error;
mod registry;

use std::{any::type_name, fmt, marker::PhantomData};

pub use builder::{Definition, RegistryBuilder};
pub use error::{ErrorKind, RegistryError};
pub use lookup::{exists, flags, has_flag, names, try_value_of, value_of, values, Key};
pub use objective_enum_internals::{generate, members, objective_enum};
pub use registry::{LazyRegistry, Populate, Registry, Values};

/// The integer identity of a member.
///
/// Ordinals are unique within a registry. They double as flag bits when the members of a type are
/// given pairwise-disjoint powers of two.
pub type Ordinal = u32;

/// The name and ordinal of a member.
///
/// Every objective enum carries one of these in a hidden field. Instances are created with
/// [`Identity::UNASSIGNED`] and receive their real identity from the [`RegistryBuilder`] when they
/// are defined.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Identity {
    name: &'static str,
    ordinal: Ordinal,
}

impl Identity {
    /// The identity of an instance that has not been registered yet.
    pub const UNASSIGNED: Self = Self { name: "", ordinal: 0 };

    /// The member name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The member ordinal.
    pub fn ordinal(&self) -> Ordinal {
        self.ordinal
    }

    fn assign(&mut self, name: &'static str, ordinal: Ordinal) {
        self.name = name;
        self.ordinal = ordinal;
    }
}

impl Default for Identity {
    fn default() -> Self {
        Self::UNASSIGNED
    }
}

/// The capability shared by all objective enums.
///
/// This trait is implemented by the [`generate`] macro and should not be implemented by hand.
/// Besides access to the registry, it provides the equality and bit-composition contract used by
/// every generated type.
pub trait ObjectiveEnum: Sized + Send + Sync + 'static {
    /// The identity of this instance.
    fn identity(&self) -> &Identity;

    #[doc(hidden)]
    fn identity_mut(&mut self) -> &mut Identity;

    /// The registry holding every member of this type.
    ///
    /// # Errors
    ///
    /// The registry is populated on first access. If population fails (e.g., two members share an
    /// ordinal), the error is returned on every call.
    fn try_registry() -> Result<&'static Registry<Self>, &'static RegistryError>;

    /// The registry holding every member of this type.
    ///
    /// # Panics
    ///
    /// Panics if population failed; see [`try_registry`](Self::try_registry).
    fn registry() -> &'static Registry<Self> {
        match Self::try_registry() {
            Ok(it) => it,
            Err(e) => panic!("failed to populate `{}`: {e}", type_name::<Self>()),
        }
    }

    /// The name of this member.
    fn name(&self) -> &'static str {
        self.identity().name()
    }

    /// The ordinal of this member.
    fn ordinal(&self) -> Ordinal {
        self.identity().ordinal()
    }

    /// Whether two instances are the same member.
    ///
    /// Members are compared by ordinal only.
    fn equals(&self, other: &Self) -> bool {
        self.ordinal() == other.ordinal()
    }

    /// Combines the ordinal of this member with `other` into a bit-mask.
    ///
    /// The result is a raw mask, not a member. Use [`flags`] to decompose it.
    fn or_mask(&self, other: impl IntoMask) -> Ordinal {
        self.ordinal() | other.into_mask()
    }

    /// Intersects the ordinal of this member with `other`.
    fn and_mask(&self, other: impl IntoMask) -> Ordinal {
        self.ordinal() & other.into_mask()
    }

    /// Looks up a member by name.
    fn parse(name: &str) -> Result<&'static Self, RegistryError> {
        Self::registry().get_by_name(name)
    }

    /// Looks up a member by name, returning [`None`] if there is no such member or the registry
    /// failed to populate.
    fn try_parse(name: &str) -> Option<&'static Self> {
        Self::try_registry().ok()?.get_by_name(name).ok()
    }

    /// Iterates over all members in the order they were defined.
    fn values() -> Values<'static, Self> {
        Self::registry().values()
    }
}

/// A value that can take part in a bit-mask: a raw [`Ordinal`] or a member.
pub trait IntoMask {
    /// The bits this value contributes to a mask.
    fn into_mask(self) -> Ordinal;
}

impl IntoMask for Ordinal {
    fn into_mask(self) -> Ordinal {
        self
    }
}

impl<T: ObjectiveEnum> IntoMask for &T {
    fn into_mask(self) -> Ordinal {
        self.ordinal()
    }
}

impl<T: ObjectiveEnum> IntoMask for Member<T> {
    fn into_mask(self) -> Ordinal {
        self.get().ordinal()
    }
}

/// A named handle to a member.
///
/// The [`generate`] macro emits one associated constant of this type per member. The handle
/// dereferences to the member itself, which is looked up by name in the registry of `T`.
pub struct Member<T> {
    name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Member<T> {
    /// Creates a handle to the member with the given name.
    pub const fn new(name: &'static str) -> Self {
        Self { name, _marker: PhantomData }
    }

    /// The name of the member this handle refers to.
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<T: ObjectiveEnum> Member<T> {
    /// Resolves this handle.
    ///
    /// # Panics
    ///
    /// Panics if the registry of `T` failed to populate. Handles emitted by [`generate`] always
    /// name a defined member, so a populated registry always resolves them.
    pub fn get(self) -> &'static T {
        match T::registry().get_by_name(self.name) {
            Ok(it) => it,
            Err(e) => panic!("{e}"),
        }
    }
}

impl<T> Clone for Member<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Member<T> {}

impl<T: ObjectiveEnum> std::ops::Deref for Member<T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.get()
    }
}

impl<T: ObjectiveEnum> PartialEq<T> for Member<T> {
    fn eq(&self, other: &T) -> bool {
        self.get().equals(other)
    }
}

impl<T> fmt::Debug for Member<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Member").field(&self.name).finish()
    }
}
