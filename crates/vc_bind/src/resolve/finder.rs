use alloc::vec::Vec;
use core::any::Any;

use vc_utils::TypeIdMap;

use crate::decl::{FieldCandidate, TypeDecl};
use crate::descriptor::FieldOrigin;
use crate::info::TypeHandle;

/// A strategy discovering the components of a record.
///
/// Finders run in order. The first finder reporting a name owns that field,
/// later finders can only fill in accessors it lacks.
pub trait ComponentFinder: Send + Sync + 'static {
    fn name(&self) -> &'static str;

    /// How values of the fields this finder owns reach the record.
    fn origin(&self) -> FieldOrigin;

    /// Returns candidates in a deterministic order.
    fn find_components(&self, handle: &TypeHandle, decl: &TypeDecl) -> Vec<FieldCandidate>;
}

// -----------------------------------------------------------------------------
// ConstructorFinder

/// Finds the constructor components of a [`RecordDecl`], in declaration order.
///
/// [`RecordDecl`]: crate::decl::RecordDecl
#[derive(Debug, Default, Clone, Copy)]
pub struct ConstructorFinder;

impl ComponentFinder for ConstructorFinder {
    fn name(&self) -> &'static str {
        "constructor"
    }

    fn origin(&self) -> FieldOrigin {
        FieldOrigin::Constructor
    }

    fn find_components(&self, _: &TypeHandle, decl: &TypeDecl) -> Vec<FieldCandidate> {
        decl.record()
            .map(|record| record.components().to_vec())
            .unwrap_or_default()
    }
}

// -----------------------------------------------------------------------------
// AccessorFinder

/// Finds the getter/setter properties of a [`RecordDecl`], sorted by name.
///
/// [`RecordDecl`]: crate::decl::RecordDecl
#[derive(Debug, Default, Clone, Copy)]
pub struct AccessorFinder;

impl ComponentFinder for AccessorFinder {
    fn name(&self) -> &'static str {
        "accessor"
    }

    fn origin(&self) -> FieldOrigin {
        FieldOrigin::Accessor
    }

    fn find_components(&self, _: &TypeHandle, decl: &TypeDecl) -> Vec<FieldCandidate> {
        let mut found = decl
            .record()
            .map(|record| record.properties().to_vec())
            .unwrap_or_default();
        found.sort_by(|a, b| a.name().cmp(b.name()));
        found
    }
}

// -----------------------------------------------------------------------------
// SchemaFinder

/// Explicit, per-type field lists registered at runtime.
///
/// Useful to complete records whose declaration cannot be changed, e.g. to
/// add setters.
///
/// # Example
///
/// ```
/// use vc_bind::context::TypeContext;
/// use vc_bind::decl::{Bind, FieldCandidate};
/// use vc_bind::resolve::SchemaFinder;
///
/// #[derive(Bind, Default)]
/// #[bind(accessors)]
/// struct Config {
///     name: String,
///     #[bind(skip)]
///     retries: u8,
/// }
///
/// let schema = SchemaFinder::new().with_schema::<Config>([
///     FieldCandidate::field::<Config, u8>("retries", |c| &c.retries)
///         .with_setter::<Config, u8>(|c, v| c.retries = v),
/// ]);
/// let ctx = TypeContext::builder().with_finder(schema).build();
///
/// let info = ctx.descriptor_of::<Config>().unwrap();
/// let names: Vec<_> = info.as_record().unwrap().field_names().collect();
/// assert_eq!(names, ["name", "retries"]);
/// ```
#[derive(Default)]
pub struct SchemaFinder {
    schemas: TypeIdMap<Vec<FieldCandidate>>,
}

impl SchemaFinder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds fields of `T`, in the given order.
    pub fn with_schema<T: Any>(mut self, fields: impl IntoIterator<Item = FieldCandidate>) -> Self {
        let entry = self
            .schemas
            .get_or_insert(core::any::TypeId::of::<T>(), Vec::new);
        entry.extend(fields);
        self
    }
}

impl ComponentFinder for SchemaFinder {
    fn name(&self) -> &'static str {
        "schema"
    }

    fn origin(&self) -> FieldOrigin {
        FieldOrigin::Accessor
    }

    fn find_components(&self, handle: &TypeHandle, _: &TypeDecl) -> Vec<FieldCandidate> {
        self.schemas.get(&handle.id()).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::{AccessorFinder, ComponentFinder, ConstructorFinder};
    use crate::decl::{Bind, FieldCandidate, RecordDecl, TypeDecl};
    use crate::info::TypeHandle;
    use alloc::vec::Vec;

    struct Pair {
        b: u8,
        a: u8,
    }

    fn decl() -> TypeDecl {
        TypeDecl::new().with_record(
            RecordDecl::new()
                .with_component(FieldCandidate::field::<Pair, u8>("b", |p| &p.b))
                .with_property(FieldCandidate::field::<Pair, u8>("z", |p| &p.b))
                .with_property(FieldCandidate::field::<Pair, u8>("a", |p| &p.a)),
        )
    }

    #[test]
    fn finders_read_their_facet() {
        let handle = TypeHandle::of::<u8>();
        let names = |found: Vec<FieldCandidate>| found.iter().map(|c| c.name()).collect::<Vec<_>>();

        assert_eq!(names(ConstructorFinder.find_components(&handle, &decl())), ["b"]);
        assert_eq!(names(AccessorFinder.find_components(&handle, &decl())), ["a", "z"]);
        assert!(AccessorFinder.find_components(&handle, &u8::declare()).is_empty());
    }
}
