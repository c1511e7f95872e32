use alloc::boxed::Box;
use alloc::format;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;

use crate::decl::{ConstructFn, Getter, Instance, Primitive, Projection, Setter, take_instance};
use crate::descriptor::{Slot, UnionInfo};
use crate::info::TypeHandle;
use crate::{BindError, Fault};

// -----------------------------------------------------------------------------
// Field

/// How a field's value reaches the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldOrigin {
    /// Passed to the constructor through a [`Slate`].
    Constructor,
    /// Written through the field's setter after construction.
    Accessor,
}

/// The treatment a field receives, decided by the shape of its type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldShape {
    /// An optional wrapper around a non-primitive type.
    Optional,
    /// An optional wrapper around a primitive.
    OptionalPrimitive(Primitive),
    /// A union-typed field restricted to declared members.
    UnionMember,
    Plain,
}

/// The descriptor source of a field's target type.
#[derive(Debug, Clone)]
pub enum Nested {
    /// Looked up in the context by type.
    Type(TypeHandle),
    /// A sealed union built from the field's declared members.
    Union(Arc<UnionInfo>),
}

impl Nested {
    #[inline]
    pub fn handle(&self) -> &TypeHandle {
        match self {
            Self::Type(handle) => handle,
            Self::Union(info) => info.handle(),
        }
    }
}

/// A component of a [`RecordInfo`].
pub struct Field {
    index: usize,
    name: &'static str,
    owner: &'static str,
    slot: Slot,
    nested: Nested,
    required: bool,
    shape: FieldShape,
    origin: FieldOrigin,
    getter: Getter,
    setter: Option<Setter>,
}

impl Field {
    pub(crate) fn new(
        index: usize,
        name: &'static str,
        owner: &'static str,
        slot: Slot,
        nested: Nested,
        required: bool,
        shape: FieldShape,
        origin: FieldOrigin,
        getter: Getter,
        setter: Option<Setter>,
    ) -> Self {
        Self {
            index,
            name,
            owner,
            slot,
            nested,
            required,
            shape,
            origin,
            getter,
            setter,
        }
    }

    /// Position in array form and in the constructor slate.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Key in map form.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The declared type of the field.
    #[inline]
    pub fn ty(&self) -> &TypeHandle {
        self.slot.declared()
    }

    #[inline]
    pub fn slot(&self) -> &Slot {
        &self.slot
    }

    #[inline]
    pub fn nested(&self) -> &Nested {
        &self.nested
    }

    #[inline]
    pub fn required(&self) -> bool {
        self.required
    }

    #[inline]
    pub fn shape(&self) -> FieldShape {
        self.shape
    }

    #[inline]
    pub fn origin(&self) -> FieldOrigin {
        self.origin
    }

    #[inline]
    pub fn has_setter(&self) -> bool {
        self.setter.is_some()
    }

    /// Reads the field's declared value.
    pub fn get<'a>(&self, record: &'a dyn Any) -> Result<&'a dyn Any, Fault> {
        (self.getter)(record).ok_or(Fault::NativeMismatch {
            expected: self.owner,
        })
    }

    /// Reads the field's target value, `None` if a wrapper is empty.
    pub fn value<'a>(&self, record: &'a dyn Any) -> Result<Option<&'a dyn Any>, Fault> {
        self.slot.peel(self.get(record)?)
    }

    /// Always `true` for required fields.
    pub fn is_present(&self, record: &dyn Any) -> Result<bool, Fault> {
        if self.required {
            return Ok(true);
        }
        Ok(self.value(record)?.is_some())
    }

    /// Writes a value of the declared type into the record.
    pub fn set(&self, record: &mut dyn Any, value: Instance) -> Result<(), Fault> {
        match &self.setter {
            Some(setter) => setter(record, value),
            None => Err(Fault::custom(format!("field `{}` is read-only", self.name))),
        }
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("index", &self.index)
            .field("name", &self.name)
            .field("ty", self.ty())
            .field("required", &self.required)
            .field("shape", &self.shape)
            .field("origin", &self.origin)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Slate

/// The decoded values handed to a record constructor.
///
/// Values are taken by field name. A required field without a value fails
/// with [`Fault::MissingRequired`].
pub struct Slate<'a> {
    fields: &'a [Field],
    values: Vec<Option<Instance>>,
}

impl<'a> Slate<'a> {
    pub(crate) fn new(fields: &'a [Field], values: Vec<Option<Instance>>) -> Self {
        Self { fields, values }
    }

    fn position(&self, name: &str) -> Result<usize, BindError> {
        self.fields
            .iter()
            .position(|f| f.name == name)
            .ok_or_else(|| BindError::from(Fault::custom(format!("no field named `{name}`"))))
    }

    /// Takes a value, `None` if it is absent.
    pub fn take_opt<T: Any>(&mut self, name: &str) -> Result<Option<T>, BindError> {
        let index = self.position(name)?;
        match self.values[index].take() {
            Some(value) => take_instance::<T>(value)
                .map(Some)
                .map_err(|fault| BindError::from(fault).at_field(name)),
            None => Ok(None),
        }
    }

    /// Takes a value that must be present.
    pub fn take<T: Any>(&mut self, name: &str) -> Result<T, BindError> {
        let index = self.position(name)?;
        let field = self.fields[index].name;
        self.take_opt(name)?.ok_or_else(|| {
            BindError::from(Fault::MissingRequired { field }).at_field(field)
        })
    }

    pub fn take_or_else<T: Any>(&mut self, name: &str, f: impl FnOnce() -> T) -> Result<T, BindError> {
        Ok(self.take_opt(name)?.unwrap_or_else(f))
    }

    pub fn take_or_default<T: Any + Default>(&mut self, name: &str) -> Result<T, BindError> {
        Ok(self.take_opt(name)?.unwrap_or_default())
    }

    /// Returns `true` if the value was absent or already taken.
    pub fn is_absent(&self, name: &str) -> bool {
        self.position(name)
            .map(|index| self.values[index].is_none())
            .unwrap_or(true)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    // Values the constructor left for accessor fields.
    fn into_leftovers(self) -> impl Iterator<Item = (&'a Field, Instance)> {
        self.fields
            .iter()
            .zip(self.values)
            .filter(|(field, _)| field.origin == FieldOrigin::Accessor)
            .filter_map(|(field, value)| Some((field, value?)))
    }
}

impl fmt::Debug for Slate<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.fields
                    .iter()
                    .zip(&self.values)
                    .map(|(field, value)| (field.name, value.is_some())),
            )
            .finish()
    }
}

// -----------------------------------------------------------------------------
// DataRef

/// The value record fields are read from.
///
/// Borrowed unless the record is a projection.
pub enum DataRef<'a> {
    Borrowed(&'a dyn Any),
    Owned(Instance),
}

impl DataRef<'_> {
    #[inline]
    pub fn as_any(&self) -> &dyn Any {
        match self {
            Self::Borrowed(value) => *value,
            Self::Owned(value) => &**value,
        }
    }
}

// -----------------------------------------------------------------------------
// RecordInfo

/// A product type with ordered, named fields.
///
/// The field order is the positional order of array form and never changes
/// after resolution.
pub struct RecordInfo {
    handle: TypeHandle,
    fields: Box<[Field]>,
    construct: Option<ConstructFn>,
    default: Option<fn() -> Instance>,
    projection: Option<Projection>,
}

impl RecordInfo {
    pub(crate) fn new(
        handle: TypeHandle,
        fields: Vec<Field>,
        construct: Option<ConstructFn>,
        default: Option<fn() -> Instance>,
        projection: Option<Projection>,
    ) -> Self {
        Self {
            handle,
            fields: fields.into_boxed_slice(),
            construct,
            default,
            projection,
        }
    }

    #[inline]
    pub fn handle(&self) -> &TypeHandle {
        &self.handle
    }

    #[inline]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    #[inline]
    pub fn field_at(&self, index: usize) -> Option<&Field> {
        self.fields.get(index)
    }

    /// Field names in positional order.
    pub fn field_names(&self) -> impl ExactSizeIterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    #[inline]
    pub fn projection(&self) -> Option<&Projection> {
        self.projection.as_ref()
    }

    /// Converts a native value into the value its fields are read from.
    pub fn to_data<'a>(&self, value: &'a dyn Any) -> Result<DataRef<'a>, Fault> {
        match &self.projection {
            Some(projection) => projection.to_data(value).map(DataRef::Owned),
            None => Ok(DataRef::Borrowed(value)),
        }
    }

    /// Converts a constructed data value into the native type.
    pub fn to_object(&self, data: Instance) -> Result<Instance, Fault> {
        match &self.projection {
            Some(projection) => projection.to_object(data),
            None => Ok(data),
        }
    }

    /// Builds a native value from one optional value per field.
    ///
    /// Constructor components go through the constructor. Remaining accessor
    /// values, or all values of a record without constructor, are written by
    /// setters into a fresh default value.
    pub fn construct(&self, values: Vec<Option<Instance>>) -> Result<Instance, BindError> {
        if values.len() != self.fields.len() {
            return Err(Fault::Length {
                expected: self.fields.len(),
                found: values.len(),
            }
            .into());
        }

        let data = match (self.construct, self.default) {
            (Some(construct), _) => {
                // Accessor fields are not seen by the constructor.
                let missing = self.fields.iter().zip(&values).find(|(field, value)| {
                    field.origin == FieldOrigin::Accessor
                        && field.required
                        && field.setter.is_some()
                        && value.is_none()
                });
                if let Some((field, _)) = missing {
                    return Err(missing_required(field));
                }

                let mut slate = Slate::new(&self.fields, values);
                let mut data = construct(&mut slate)?;
                for (field, value) in slate.into_leftovers() {
                    apply(field, &mut data, value)?;
                }
                data
            }
            (None, Some(default)) => {
                let mut data = default();
                for (field, value) in self.fields.iter().zip(values) {
                    match value {
                        Some(value) => apply(field, &mut data, value)?,
                        None if field.required => return Err(missing_required(field)),
                        None => {}
                    }
                }
                data
            }
            (None, None) => {
                return Err(BindError::unresolvable(
                    self.handle.name(),
                    "record has neither a constructor nor a default value",
                ));
            }
        };

        Ok(self.to_object(data)?)
    }
}

fn missing_required(field: &Field) -> BindError {
    BindError::from(Fault::MissingRequired { field: field.name }).at_field(field.name)
}

// Read-only accessor fields keep the value the record was built with.
fn apply(field: &Field, data: &mut Instance, value: Instance) -> Result<(), BindError> {
    if field.setter.is_none() {
        return Ok(());
    }
    let target: &mut dyn Any = &mut **data;
    field
        .set(target, value)
        .map_err(|fault| BindError::from(fault).at_field(field.name))
}

impl fmt::Debug for RecordInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordInfo")
            .field("ty", &self.handle)
            .field("fields", &self.fields)
            .field("projection", &self.projection.is_some())
            .finish()
    }
}
