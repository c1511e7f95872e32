use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;

use crate::decl::{Bind, Instance, take_instance};
use crate::descriptor::Slate;
use crate::info::TypeHandle;
use crate::{BindError, Fault};

/// Reads a field from a record value.
pub type Getter = Arc<dyn for<'a> Fn(&'a dyn Any) -> Option<&'a dyn Any> + Send + Sync>;

/// Writes a field into a record value.
pub type Setter = Arc<dyn Fn(&mut dyn Any, Instance) -> Result<(), Fault> + Send + Sync>;

/// Builds a record from the decoded values of its constructor components.
pub type ConstructFn = fn(&mut Slate<'_>) -> Result<Instance, BindError>;

#[inline(always)]
fn erase_getter<G>(getter: G) -> Getter
where
    G: for<'a> Fn(&'a dyn Any) -> Option<&'a dyn Any> + Send + Sync + 'static,
{
    Arc::new(getter)
}

// -----------------------------------------------------------------------------
// FieldCandidate

/// A record component as discovered by a
/// [`ComponentFinder`](crate::resolve::ComponentFinder).
///
/// Every candidate has a name and a declared type. Everything else is a hint
/// that the resolver validates and completes.
///
/// # Example
///
/// ```
/// use vc_bind::decl::FieldCandidate;
///
/// struct Point { x: i32 }
///
/// let x = FieldCandidate::field::<Point, i32>("x", |p| &p.x)
///     .with_setter::<Point, i32>(|p, v| p.x = v);
///
/// assert_eq!(x.name(), "x");
/// assert!(x.setter().is_some());
/// ```
#[derive(Clone)]
pub struct FieldCandidate {
    name: &'static str,
    ty: TypeHandle,
    required: Option<bool>,
    getter: Option<Getter>,
    setter: Option<Setter>,
    union_members: Option<Vec<TypeHandle>>,
}

impl FieldCandidate {
    /// Creates a candidate without accessors.
    #[inline]
    pub const fn new(name: &'static str, ty: TypeHandle) -> Self {
        Self {
            name,
            ty,
            required: None,
            getter: None,
            setter: None,
            union_members: None,
        }
    }

    /// Creates a readable candidate of a field of type `F` in `S`.
    pub fn field<S: Any, F: Bind>(name: &'static str, get: fn(&S) -> &F) -> Self {
        Self::new(name, TypeHandle::of::<F>()).with_getter(erase_getter(move |value| {
            value.downcast_ref::<S>().map(|s| get(s) as &dyn Any)
        }))
    }

    /// Like [`FieldCandidate::field`], for a type resolved through the
    /// scalar registry only.
    pub fn scalar<S: Any, F: Any>(name: &'static str, get: fn(&S) -> &F) -> Self {
        Self::new(name, TypeHandle::opaque::<F>()).with_getter(erase_getter(move |value| {
            value.downcast_ref::<S>().map(|s| get(s) as &dyn Any)
        }))
    }

    #[inline]
    pub fn with_getter(mut self, getter: Getter) -> Self {
        self.getter = Some(getter);
        self
    }

    /// Adds a typed setter.
    pub fn with_setter<S: Any, F: Any>(mut self, set: fn(&mut S, F)) -> Self {
        self.setter = Some(Arc::new(move |target: &mut dyn Any, value: Instance| {
            let target = target.downcast_mut::<S>().ok_or_else(Fault::native::<S>)?;
            set(target, take_instance::<F>(value)?);
            Ok(())
        }));
        self
    }

    #[inline]
    pub fn with_erased_setter(mut self, setter: Setter) -> Self {
        self.setter = Some(setter);
        self
    }

    /// Hints whether the field is required.
    ///
    /// Ignored for primitive and nullable fields.
    #[inline]
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    /// Restricts the field to the given members of its union type.
    pub fn with_union_members(mut self, members: impl IntoIterator<Item = TypeHandle>) -> Self {
        self.union_members = Some(members.into_iter().collect());
        self
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn ty(&self) -> &TypeHandle {
        &self.ty
    }

    #[inline]
    pub fn required(&self) -> Option<bool> {
        self.required
    }

    #[inline]
    pub fn getter(&self) -> Option<&Getter> {
        self.getter.as_ref()
    }

    #[inline]
    pub fn setter(&self) -> Option<&Setter> {
        self.setter.as_ref()
    }

    #[inline]
    pub fn union_members(&self) -> Option<&[TypeHandle]> {
        self.union_members.as_deref()
    }

    /// Fills the accessors this candidate lacks from `other`.
    pub(crate) fn complete_from(&mut self, other: &FieldCandidate) {
        if self.getter.is_none() {
            self.getter = other.getter.clone();
        }
        if self.setter.is_none() {
            self.setter = other.setter.clone();
        }
        if self.required.is_none() {
            self.required = other.required;
        }
        if self.union_members.is_none() {
            self.union_members = other.union_members.clone();
        }
    }
}

impl fmt::Debug for FieldCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldCandidate")
            .field("name", &self.name)
            .field("ty", &self.ty)
            .field("required", &self.required)
            .field("getter", &self.getter.is_some())
            .field("setter", &self.setter.is_some())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Projection

/// Backs a native type with a distinct data-carrying record.
///
/// The fields of the record are those of the data type `D`. Encoding
/// converts `&T` into `D` first, decoding builds `D` and converts it into `T`.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    data: TypeHandle,
    to_data: fn(&dyn Any) -> Result<Instance, Fault>,
    to_object: fn(Instance) -> Result<Instance, Fault>,
}

impl Projection {
    pub fn of<T, D>() -> Self
    where
        T: Bind + From<D>,
        D: Bind + for<'a> From<&'a T>,
    {
        Self {
            data: TypeHandle::of::<D>(),
            to_data: project_data::<T, D>,
            to_object: project_object::<T, D>,
        }
    }

    /// The data type the record fields belong to.
    #[inline]
    pub const fn data(&self) -> &TypeHandle {
        &self.data
    }

    #[inline]
    pub fn to_data(&self, value: &dyn Any) -> Result<Instance, Fault> {
        (self.to_data)(value)
    }

    #[inline]
    pub fn to_object(&self, data: Instance) -> Result<Instance, Fault> {
        (self.to_object)(data)
    }
}

fn project_data<T: Bind, D: Bind + for<'a> From<&'a T>>(value: &dyn Any) -> Result<Instance, Fault> {
    let value = value.downcast_ref::<T>().ok_or_else(Fault::native::<T>)?;
    Ok(Box::new(D::from(value)))
}

fn project_object<T: Bind + From<D>, D: Bind>(data: Instance) -> Result<Instance, Fault> {
    let data = take_instance::<D>(data)?;
    Ok(Box::new(T::from(data)))
}

// -----------------------------------------------------------------------------
// RecordDecl

/// Declaration of a product type.
///
/// `components` are bound through `construct`, `properties` through their
/// setters on a value created by `default`. A record may use both.
#[derive(Clone, Default)]
pub struct RecordDecl {
    components: Vec<FieldCandidate>,
    properties: Vec<FieldCandidate>,
    construct: Option<ConstructFn>,
    default: Option<fn() -> Instance>,
    order: Option<Vec<&'static str>>,
    projection: Option<Projection>,
}

impl RecordDecl {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// A record whose fields come from the projection's data type.
    #[inline]
    pub fn projected(projection: Projection) -> Self {
        Self {
            projection: Some(projection),
            ..Self::default()
        }
    }

    /// Adds a component bound by the constructor.
    #[inline]
    pub fn with_component(mut self, component: FieldCandidate) -> Self {
        self.components.push(component);
        self
    }

    /// Adds a property bound by its setter.
    #[inline]
    pub fn with_property(mut self, property: FieldCandidate) -> Self {
        self.properties.push(property);
        self
    }

    #[inline]
    pub fn with_constructor(mut self, construct: ConstructFn) -> Self {
        self.construct = Some(construct);
        self
    }

    /// Sets the factory of the value properties are written into.
    #[inline]
    pub fn with_default(mut self, default: fn() -> Instance) -> Self {
        self.default = Some(default);
        self
    }

    /// Overrides the field order. Must name every field exactly once.
    pub fn with_order(mut self, order: impl IntoIterator<Item = &'static str>) -> Self {
        self.order = Some(order.into_iter().collect());
        self
    }

    #[inline]
    pub fn components(&self) -> &[FieldCandidate] {
        &self.components
    }

    #[inline]
    pub fn properties(&self) -> &[FieldCandidate] {
        &self.properties
    }

    #[inline]
    pub fn constructor(&self) -> Option<ConstructFn> {
        self.construct
    }

    #[inline]
    pub fn default_fn(&self) -> Option<fn() -> Instance> {
        self.default
    }

    #[inline]
    pub fn order(&self) -> Option<&[&'static str]> {
        self.order.as_deref()
    }

    #[inline]
    pub fn projection(&self) -> Option<&Projection> {
        self.projection.as_ref()
    }
}
