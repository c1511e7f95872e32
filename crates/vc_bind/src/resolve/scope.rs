use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::TypeId;

use crate::BindError;
use crate::context::TypeContext;
use crate::descriptor::Descriptor;
use crate::info::TypeHandle;
use crate::resolve::ComponentFinder;
use crate::scalar::ScalarRegistry;

/// The state of one top-level resolution.
///
/// Tracks the types currently being resolved so that recursive type graphs
/// terminate: a nested type that is already in progress is not resolved
/// again and is looked up lazily when converters are compiled.
pub struct ResolveScope<'a> {
    ctx: &'a TypeContext,
    stack: Vec<TypeHandle>,
}

impl<'a> ResolveScope<'a> {
    pub(crate) fn new(ctx: &'a TypeContext) -> Self {
        Self {
            ctx,
            stack: Vec::new(),
        }
    }

    #[inline]
    pub fn context(&self) -> &'a TypeContext {
        self.ctx
    }

    #[inline]
    pub fn scalars(&self) -> &'a ScalarRegistry {
        self.ctx.scalars()
    }

    #[inline]
    pub fn finders(&self) -> &'a [Box<dyn ComponentFinder>] {
        self.ctx.resolver().finders()
    }

    /// Returns `true` if the type is being resolved in this scope.
    pub fn in_progress(&self, type_id: TypeId) -> bool {
        self.stack.iter().any(|h| h.id() == type_id)
    }

    /// The chain of types being resolved, outermost first.
    pub fn path(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.stack.iter().map(|h| h.name())
    }

    /// Makes sure a nested type has a descriptor, unless it is in progress.
    pub fn resolve_nested(&mut self, handle: &TypeHandle) -> Result<(), BindError> {
        self.descriptor(handle).map(drop)
    }

    /// Returns the descriptor of a nested type, or `None` if it is in
    /// progress.
    pub fn descriptor(&mut self, handle: &TypeHandle) -> Result<Option<Descriptor>, BindError> {
        if let Some(descriptor) = self.ctx.cached(handle.id()) {
            return Ok(Some(descriptor));
        }
        if self.in_progress(handle.id()) {
            log::trace!("deferring `{}`, it is being resolved", handle.name());
            return Ok(None);
        }
        self.ctx.resolve_in(self, handle).map(Some)
    }

    pub(crate) fn enter(&mut self, handle: TypeHandle) {
        self.stack.push(handle);
    }

    pub(crate) fn leave(&mut self) {
        self.stack.pop();
    }
}
