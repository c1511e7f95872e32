use alloc::format;
use alloc::string::String;
use core::any::{Any, TypeId};

use crate::context::TypeContext;
use crate::decl::{Bind, Instance, take_instance};
use crate::descriptor::Descriptor;
use crate::info::TypeHandle;
use crate::mapper::form::MapForm;
use crate::mapper::plan::Plans;
use crate::value::Value;
use crate::{BindError, Fault};

/// Converts between native values and the sparse map form.
///
/// Records become maps keyed by field name, absent values have no key.
/// Union values carry the member tag under `"type"`.
///
/// # Example
///
/// ```
/// use vc_bind::context::TypeContext;
/// use vc_bind::decl::Bind;
/// use vc_bind::mapper::MapMapper;
/// use vc_bind::value::Value;
///
/// #[derive(Bind, Debug, PartialEq)]
/// struct Circle {
///     r: u32,
/// }
///
/// #[derive(Bind, Debug, PartialEq)]
/// struct Square {
///     side: u32,
/// }
///
/// #[derive(Bind, Debug, PartialEq)]
/// enum Shape {
///     Circle(Circle),
///     Square(Square),
/// }
///
/// let mapper = MapMapper::new(&TypeContext::new());
/// let circle = Shape::Circle(Circle { r: 5 });
///
/// let map = mapper.to_map(&circle).unwrap();
/// assert_eq!(
///     map,
///     Value::from_iter([("r", Value::from(5_u32)), ("type", Value::from("Circle"))]),
/// );
/// assert_eq!(mapper.to_object::<Shape>(map).unwrap(), circle);
/// ```
#[derive(Debug)]
pub struct MapMapper {
    plans: Plans,
}

impl MapMapper {
    pub fn new(ctx: &TypeContext) -> Self {
        Self {
            plans: Plans::new(ctx),
        }
    }

    #[inline]
    pub fn context(&self) -> &TypeContext {
        self.plans.context()
    }

    /// Compiles the converter of `T` ahead of the first conversion.
    pub fn prepare<T: Bind>(&self) -> Result<(), BindError> {
        self.plans.plan(&TypeHandle::of::<T>()).map(drop)
    }

    pub fn to_map<T: Bind>(&self, value: &T) -> Result<Value, BindError> {
        let plan = self.plans.plan(&TypeHandle::of::<T>())?;
        self.plans.encode::<MapForm>(&plan, value)
    }

    pub fn to_object<T: Bind>(&self, value: Value) -> Result<T, BindError> {
        let plan = self.plans.plan(&TypeHandle::of::<T>())?;
        let instance = self.plans.decode::<MapForm>(&plan, value)?;
        Ok(take_instance::<T>(instance)?)
    }

    /// Adopts a native value without going through the map form.
    ///
    /// If `T` is a union, a value of one of its members is lifted into `T`.
    /// The member is found from the value's own type, no tag is needed.
    ///
    /// # Example
    ///
    /// ```
    /// use vc_bind::{BindError, Instance};
    /// use vc_bind::context::TypeContext;
    /// use vc_bind::decl::Bind;
    /// use vc_bind::mapper::MapMapper;
    ///
    /// #[derive(Bind, Debug, PartialEq)]
    /// struct Cat;
    ///
    /// #[derive(Bind, Debug, PartialEq)]
    /// enum Pet {
    ///     Cat(Cat),
    /// }
    ///
    /// let mapper = MapMapper::new(&TypeContext::new());
    /// let pet = mapper.to_object_instance::<Pet>(Box::new(Cat)).unwrap();
    /// assert_eq!(pet, Pet::Cat(Cat));
    ///
    /// let stray: Instance = Box::new(7_u8);
    /// assert!(matches!(
    ///     mapper.to_object_instance::<Pet>(stray),
    ///     Err(BindError::UnionMembership { .. })
    /// ));
    /// ```
    pub fn to_object_instance<T: Bind>(&self, instance: Instance) -> Result<T, BindError> {
        let concrete = Any::type_id(&*instance);
        if concrete == TypeId::of::<T>() {
            return Ok(take_instance::<T>(instance)?);
        }

        let descriptor = self.context().descriptor_of::<T>()?;
        let Descriptor::Union(union) = &descriptor else {
            return Err(Fault::native::<T>().into());
        };
        let Some(member) = union.member_by_type(concrete) else {
            let member = self
                .context()
                .cached(concrete)
                .map(|d| String::from(d.handle().name()))
                .unwrap_or_else(|| format!("{concrete:?}"));
            return Err(BindError::UnionMembership {
                union: union.handle().name(),
                member,
            });
        };
        Ok(take_instance::<T>(member.lift(instance)?)?)
    }

    /// Converts a value described by `descriptor`.
    pub fn to_map_erased(&self, descriptor: &Descriptor, value: &dyn Any) -> Result<Value, BindError> {
        let plan = self.plans.plan_for(descriptor)?;
        self.plans.encode::<MapForm>(&plan, value)
    }

    /// Builds a value described by `descriptor`.
    pub fn to_object_erased(
        &self,
        descriptor: &Descriptor,
        value: Value,
    ) -> Result<Instance, BindError> {
        let plan = self.plans.plan_for(descriptor)?;
        self.plans.decode::<MapForm>(&plan, value)
    }
}

#[cfg(test)]
mod tests {
    use super::MapMapper;
    use crate::context::TypeContext;
    use crate::decl::{Bind, FieldCandidate, Instance};
    use crate::mapper::fixtures::*;
    use crate::resolve::SchemaFinder;
    use crate::value::Value;
    use crate::{BindError, Fault};
    use alloc::boxed::Box;
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::any::Any;

    fn mapper() -> MapMapper {
        MapMapper::new(&TypeContext::new())
    }

    fn map<const N: usize>(entries: [(&str, Value); N]) -> Value {
        Value::from_iter(entries)
    }

    #[test]
    fn point_by_name() {
        let mapper = mapper();
        let point = Point { x: 1, y: 2 };
        let value = map([("x", Value::from(1)), ("y", Value::from(2))]);
        assert_eq!(mapper.to_map(&point).unwrap(), value);
        assert_eq!(mapper.to_object::<Point>(value).unwrap(), point);

        let corrupted = map([("x", Value::from("bad")), ("y", Value::from(2))]);
        let err = mapper.to_object::<Point>(corrupted).unwrap_err();
        assert!(matches!(err, BindError::Conversion { .. }));
        assert_eq!(err.path(), Some("x"));
        assert_eq!(
            err.fault(),
            Some(&Fault::Mismatch {
                expected: "signed integer",
                found: "string",
            })
        );
    }

    #[test]
    fn absent_fields_have_no_key() {
        let mapper = mapper();
        let profile = Profile {
            name: String::from("ada"),
            age: None,
            nick: Some(String::from("countess")),
            home: Some(Point { x: 0, y: 1 }),
        };
        let value = mapper.to_map(&profile).unwrap();
        assert_eq!(
            value,
            map([
                ("home", map([("x", Value::from(0)), ("y", Value::from(1))])),
                ("name", Value::from("ada")),
                ("nick", Value::from("countess")),
            ])
        );
        assert_eq!(value.get("age"), None);
        assert_eq!(mapper.to_object::<Profile>(value).unwrap(), profile);

        // Explicit nulls and unknown keys are accepted.
        let loose = map([
            ("name", Value::from("ada")),
            ("age", Value::Null),
            ("extra", Value::from(true)),
        ]);
        let decoded = mapper.to_object::<Profile>(loose).unwrap();
        assert_eq!(decoded.age, None);
        assert_eq!(decoded.home, None);

        let err = mapper.to_object::<Profile>(map([])).unwrap_err();
        assert_eq!(err.fault(), Some(&Fault::MissingRequired { field: "name" }));
    }

    #[test]
    fn unions_carry_a_type_key() {
        let mapper = mapper();
        let circle = Shape::Circle(Circle { r: 5 });
        let value = mapper.to_map(&circle).unwrap();
        assert_eq!(
            value,
            map([("r", Value::from(5_u32)), ("type", Value::from("Circle"))])
        );
        assert_eq!(mapper.to_object::<Shape>(value).unwrap(), circle);

        let triangle = map([("type", Value::from("Triangle")), ("a", Value::from(1_u32))]);
        assert_eq!(
            mapper.to_object::<Shape>(triangle),
            Err(BindError::UnionMembership {
                union: "Shape",
                member: String::from("Triangle"),
            })
        );

        let untagged = map([("r", Value::from(5_u32))]);
        assert_eq!(
            mapper.to_object::<Shape>(untagged).unwrap_err().fault(),
            Some(&Fault::MissingTypeKey)
        );
    }

    #[test]
    fn nested_unions_round_trip() {
        let mapper = mapper();
        let drawing = drawing();
        let value = mapper.to_map(&drawing).unwrap();
        assert_eq!(value.get("extra"), None);
        assert_eq!(
            value.get("shapes").and_then(Value::as_seq).map(|s| s[0].get("type")),
            Some(Some(&Value::from("Rectangle")))
        );
        assert_eq!(mapper.to_object::<Drawing>(value).unwrap(), drawing);
    }

    #[test]
    fn declared_members_gate_writes() {
        let mapper = mapper();
        let square = Framed {
            shape: Shape::Rectangle(Rectangle { w: 1, h: 1 }),
        };
        assert!(matches!(
            mapper.to_map(&square),
            Err(BindError::UnionMembership { union: "Shape", .. })
        ));
    }

    #[test]
    fn recursive_values() {
        let mapper = mapper();
        assert!(matches!(
            mapper.prepare::<Loop>(),
            Err(BindError::RecursiveStructure { .. })
        ));

        let chain = chain(&[4, 5]).unwrap();
        let value = mapper.to_map(&*chain).unwrap();
        assert_eq!(
            value,
            map([
                ("next", map([("value", Value::from(5_u8))])),
                ("value", Value::from(4_u8)),
            ])
        );
        assert_eq!(mapper.to_object::<Chain>(value).unwrap(), *chain);
    }

    #[test]
    fn instances_join_unions_directly() {
        let mapper = mapper();
        let member: Instance = Box::new(Rectangle { w: 2, h: 2 });
        assert_eq!(
            mapper.to_object_instance::<Shape>(member).unwrap(),
            Shape::Rectangle(Rectangle { w: 2, h: 2 })
        );

        let same: Instance = Box::new(Point { x: 1, y: 1 });
        assert_eq!(
            mapper.to_object_instance::<Point>(same).unwrap(),
            Point { x: 1, y: 1 }
        );

        let stranger: Instance = Box::new(Point { x: 1, y: 1 });
        assert!(matches!(
            mapper.to_object_instance::<Shape>(stranger),
            Err(BindError::UnionMembership { union: "Shape", .. })
        ));
    }

    pub trait Unit: Any + Send + Sync {}
    crate::open_union!(dyn Unit);

    #[derive(Bind, Debug, PartialEq)]
    #[bind(member_of(Box<dyn Unit>), bridge(f64))]
    struct Meters(f64);
    impl Unit for Meters {}

    impl From<&Meters> for f64 {
        fn from(m: &Meters) -> f64 {
            m.0
        }
    }

    impl From<f64> for Meters {
        fn from(v: f64) -> Meters {
            Meters(v)
        }
    }

    #[derive(Bind)]
    struct Measure {
        length: Box<dyn Unit>,
    }

    #[test]
    fn scalar_members_are_wrapped() {
        let ctx = TypeContext::new();
        ctx.descriptor_of::<Meters>().unwrap();
        let mapper = MapMapper::new(&ctx);

        let measure = Measure {
            length: Box::new(Meters(1.5)),
        };
        let value = mapper.to_map(&measure).unwrap();
        assert_eq!(
            value,
            map([(
                "length",
                map([("type", Value::from("Meters")), ("value", Value::from(1.5))])
            )])
        );
        let back = mapper.to_object::<Measure>(value).unwrap();
        let length: &dyn Any = &*back.length;
        assert_eq!(length.downcast_ref::<Meters>(), Some(&Meters(1.5)));
    }

    #[test]
    fn ron_carries_the_map_form() {
        let mapper = mapper();
        let profile = Profile {
            name: String::from("ada"),
            age: Some(36),
            nick: None,
            home: None,
        };
        let text = ron::to_string(&mapper.to_map(&profile).unwrap()).unwrap();
        let value: Value = ron::from_str(&text).unwrap();
        assert_eq!(mapper.to_object::<Profile>(value).unwrap(), profile);
    }

    #[test]
    fn open_union_members() {
        let ctx = TypeContext::new();
        let mapper = MapMapper::new(&ctx);
        ctx.descriptor_of::<Wolf>().unwrap();
        ctx.descriptor_of::<Rogue>().unwrap();

        let wolf: Box<dyn Creature> = Box::new(Wolf { teeth: 4 });
        let value = mapper.to_map(&wolf).unwrap();
        assert_eq!(
            value,
            map([("teeth", Value::from(4_u8)), ("type", Value::from("Wolf"))])
        );
        let back = mapper.to_object::<Box<dyn Creature>>(value).unwrap();
        let back: &dyn Any = &*back;
        assert_eq!(back.downcast_ref::<Wolf>(), Some(&Wolf { teeth: 4 }));

        let rogue: Box<dyn Creature> = Box::new(Rogue { id: 1 });
        assert!(matches!(
            mapper.to_map(&rogue),
            Err(BindError::UnionMembership { .. })
        ));
        let smuggled = map([("id", Value::from(1_u8)), ("type", Value::from("Rogue"))]);
        assert!(matches!(
            mapper.to_object::<Box<dyn Creature>>(smuggled),
            Err(BindError::UnionMembership { .. })
        ));
    }

    #[test]
    fn nested_collections() {
        let mapper = mapper();
        let nested = vec![vec![1_u8, 2], vec![3]];
        let value = mapper.to_map(&nested).unwrap();
        assert_eq!(value, Value::from([Value::from([1_u8, 2]), Value::from([3_u8])]));
        assert_eq!(mapper.to_object::<Vec<Vec<u8>>>(value).unwrap(), nested);
    }

    #[derive(Bind, Debug, PartialEq)]
    struct Ticket {
        seat: u8,
        #[bind(skip)]
        row: u8,
    }

    #[test]
    fn setter_fields_after_a_constructor_are_required() {
        let schema = SchemaFinder::new().with_schema::<Ticket>([
            FieldCandidate::field::<Ticket, u8>("row", |t| &t.row)
                .with_setter::<Ticket, u8>(|t, row| t.row = row),
        ]);
        let ctx = TypeContext::builder().with_finder(schema).build();
        let mapper = MapMapper::new(&ctx);

        let full = map([("row", Value::from(3_u8)), ("seat", Value::from(1_u8))]);
        assert_eq!(
            mapper.to_object::<Ticket>(full).unwrap(),
            Ticket { seat: 1, row: 3 }
        );

        let err = mapper
            .to_object::<Ticket>(map([("seat", Value::from(1_u8))]))
            .unwrap_err();
        assert_eq!(err.path(), Some("row"));
        assert_eq!(err.fault(), Some(&Fault::MissingRequired { field: "row" }));
    }
}
