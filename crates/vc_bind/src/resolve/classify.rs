use alloc::format;
use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::BindError;
use crate::decl::TypeDecl;
use crate::descriptor::{ArrayInfo, AtomInfo, Descriptor, Slot, UnionInfo, UnionMember};
use crate::info::TypeHandle;
use crate::resolve::{ResolveScope, check_member_kind, check_tags, record};

/// A type being classified, with its declaration.
#[derive(Clone, Copy)]
pub struct Candidate<'a> {
    handle: &'a TypeHandle,
    decl: &'a TypeDecl,
}

impl<'a> Candidate<'a> {
    #[inline]
    pub fn new(handle: &'a TypeHandle, decl: &'a TypeDecl) -> Self {
        Self { handle, decl }
    }

    #[inline]
    pub fn handle(&self) -> &'a TypeHandle {
        self.handle
    }

    #[inline]
    pub fn decl(&self) -> &'a TypeDecl {
        self.decl
    }
}

/// One rule of the classification chain.
///
/// Returns `Ok(None)` if the rule does not apply, so the next one is tried.
/// Custom classifiers run before the built-in ones.
pub trait Classifier: Send + Sync + 'static {
    fn name(&self) -> &'static str;

    fn classify(
        &self,
        candidate: &Candidate<'_>,
        scope: &mut ResolveScope<'_>,
    ) -> Result<Option<Descriptor>, BindError>;
}

// -----------------------------------------------------------------------------
// UnionClassifier

/// Classifies sealed and open unions.
///
/// Members of a sealed union are resolved eagerly. An open union starts
/// with no members, the context adds them as they are resolved.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnionClassifier;

impl Classifier for UnionClassifier {
    fn name(&self) -> &'static str {
        "union"
    }

    fn classify(
        &self,
        candidate: &Candidate<'_>,
        scope: &mut ResolveScope<'_>,
    ) -> Result<Option<Descriptor>, BindError> {
        let Some(union) = candidate.decl().union() else {
            return Ok(None);
        };
        let handle = candidate.handle();

        let mut members = Vec::with_capacity(union.members().len());
        for decl in union.members() {
            if let Some(descriptor) = scope.descriptor(decl.handle())? {
                check_member_kind(handle, &descriptor)?;
            }
            members.push(UnionMember::new(*decl.handle(), decl.lift()));
        }
        check_tags(handle, &members)?;

        let info = UnionInfo::new(*handle, union.is_sealed(), union.unwrap_fn(), members);
        Ok(Some(Descriptor::Union(Arc::new(info))))
    }
}

// -----------------------------------------------------------------------------
// ArrayClassifier

/// Classifies sequences, including fixed arrays and sets.
#[derive(Debug, Default, Clone, Copy)]
pub struct ArrayClassifier;

impl Classifier for ArrayClassifier {
    fn name(&self) -> &'static str {
        "array"
    }

    fn classify(
        &self,
        candidate: &Candidate<'_>,
        scope: &mut ResolveScope<'_>,
    ) -> Result<Option<Descriptor>, BindError> {
        let Some(sequence) = candidate.decl().sequence() else {
            return Ok(None);
        };
        let element = Slot::analyze(*sequence.element())?;
        scope.resolve_nested(element.target())?;

        let info = ArrayInfo::new(*candidate.handle(), element, *sequence);
        Ok(Some(Descriptor::Array(Arc::new(info))))
    }
}

// -----------------------------------------------------------------------------
// AtomClassifier

/// Classifies scalars.
///
/// The scalar registry is consulted first, then the codec the type
/// declares itself.
#[derive(Debug, Default, Clone, Copy)]
pub struct AtomClassifier;

impl Classifier for AtomClassifier {
    fn name(&self) -> &'static str {
        "atom"
    }

    fn classify(
        &self,
        candidate: &Candidate<'_>,
        scope: &mut ResolveScope<'_>,
    ) -> Result<Option<Descriptor>, BindError> {
        let handle = candidate.handle();
        let Some(codec) = scope
            .scalars()
            .get(handle.id())
            .or_else(|| candidate.decl().scalar().cloned())
        else {
            return Ok(None);
        };

        if codec.native().id() != handle.id() {
            return Err(BindError::unresolvable(
                handle.name(),
                format!("declared scalar codec converts `{}`", codec.native().path()),
            ));
        }

        let info = AtomInfo::new(*handle, candidate.decl().primitive(), codec);
        Ok(Some(Descriptor::Atom(Arc::new(info))))
    }
}

// -----------------------------------------------------------------------------
// RecordClassifier

/// Classifies records, see [`ComponentFinder`](crate::resolve::ComponentFinder)
/// for how fields are discovered.
#[derive(Debug, Default, Clone, Copy)]
pub struct RecordClassifier;

impl Classifier for RecordClassifier {
    fn name(&self) -> &'static str {
        "record"
    }

    fn classify(
        &self,
        candidate: &Candidate<'_>,
        scope: &mut ResolveScope<'_>,
    ) -> Result<Option<Descriptor>, BindError> {
        match candidate.decl().record() {
            Some(decl) => record::resolve(candidate, decl, scope).map(Some),
            None => Ok(None),
        }
    }
}
