//! Classification of declarations into descriptors.
//!
//! The [`Resolver`] runs a chain of [`Classifier`]s over a type's
//! [`TypeDecl`]. The first classifier that applies produces the descriptor.
//! The built-in chain is, in order:
//!
//! 1. [`UnionClassifier`]: the type declares a union.
//! 2. [`ArrayClassifier`]: the type declares a sequence.
//! 3. [`AtomClassifier`]: a scalar codec is registered or declared.
//! 4. [`RecordClassifier`]: the type declares a record.
//!
//! Record fields are discovered by [`ComponentFinder`]s, see
//! [`ConstructorFinder`], [`AccessorFinder`] and [`SchemaFinder`].

// -----------------------------------------------------------------------------
// Modules

mod classify;
mod finder;
mod record;
mod scope;

// -----------------------------------------------------------------------------
// Exports

pub use classify::{
    ArrayClassifier, AtomClassifier, Candidate, Classifier, RecordClassifier, UnionClassifier,
};
pub use finder::{AccessorFinder, ComponentFinder, ConstructorFinder, SchemaFinder};
pub use scope::ResolveScope;

// -----------------------------------------------------------------------------
// Resolver

use alloc::boxed::Box;
use alloc::format;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use crate::BindError;
use crate::decl::TypeDecl;
use crate::descriptor::{Descriptor, Kind, UnionMember};
use crate::info::TypeHandle;

/// The classifier chain and the component finders.
pub struct Resolver {
    classifiers: Vec<Box<dyn Classifier>>,
    finders: Vec<Box<dyn ComponentFinder>>,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(Vec::new(), default_finders())
    }
}

/// The built-in classifiers, in chain order.
pub fn default_classifiers() -> Vec<Box<dyn Classifier>> {
    vec![
        Box::new(UnionClassifier),
        Box::new(ArrayClassifier),
        Box::new(AtomClassifier),
        Box::new(RecordClassifier),
    ]
}

/// The built-in finders: constructor components first, then properties.
pub fn default_finders() -> Vec<Box<dyn ComponentFinder>> {
    vec![Box::new(ConstructorFinder), Box::new(AccessorFinder)]
}

impl Resolver {
    /// Creates a resolver trying `custom` classifiers before the built-in
    /// ones.
    pub fn new(custom: Vec<Box<dyn Classifier>>, finders: Vec<Box<dyn ComponentFinder>>) -> Self {
        let mut classifiers = custom;
        classifiers.extend(default_classifiers());
        Self {
            classifiers,
            finders,
        }
    }

    #[inline]
    pub fn classifiers(&self) -> &[Box<dyn Classifier>] {
        &self.classifiers
    }

    #[inline]
    pub fn finders(&self) -> &[Box<dyn ComponentFinder>] {
        &self.finders
    }

    /// Classifies one type.
    ///
    /// Nested types are resolved through `scope`. Wrapper types never get a
    /// descriptor of their own.
    pub fn resolve(
        &self,
        scope: &mut ResolveScope<'_>,
        handle: &TypeHandle,
        decl: &TypeDecl,
    ) -> Result<Descriptor, BindError> {
        if decl.wrapper().is_some() {
            return Err(BindError::unresolvable(
                handle.name(),
                "wrapper types only appear at field and element positions",
            ));
        }

        let candidate = Candidate::new(handle, decl);
        for classifier in &self.classifiers {
            if let Some(descriptor) = classifier.classify(&candidate, scope)? {
                log::trace!("`{}` classified by {}", handle.name(), classifier.name());
                return Ok(descriptor);
            }
        }

        Err(BindError::unresolvable(
            handle.name(),
            "no classification applies",
        ))
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field(
                "classifiers",
                &self.classifiers.iter().map(|c| c.name()).collect::<Vec<_>>(),
            )
            .field(
                "finders",
                &self.finders.iter().map(|c| c.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Union checks

/// Union members are records or atoms.
pub(crate) fn check_member_kind(union: &TypeHandle, member: &Descriptor) -> Result<(), BindError> {
    match member.kind() {
        Kind::Record | Kind::Atom => Ok(()),
        kind => Err(BindError::UnionMembership {
            union: union.name(),
            member: format!("{} ({kind} types cannot be members)", member.handle().name()),
        }),
    }
}

/// Tags of the members of one union are distinct.
pub(crate) fn check_tags(union: &TypeHandle, members: &[UnionMember]) -> Result<(), BindError> {
    for (i, member) in members.iter().enumerate() {
        if let Some(taken) = members[..i].iter().find(|m| m.tag() == member.tag()) {
            return Err(BindError::UnionMembership {
                union: union.name(),
                member: format!(
                    "{} (tag `{}` is used by {})",
                    member.handle().name(),
                    member.tag(),
                    taken.handle().name()
                ),
            });
        }
    }
    Ok(())
}
