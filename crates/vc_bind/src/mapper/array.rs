use core::any::Any;

use crate::context::TypeContext;
use crate::decl::{Bind, Instance, take_instance};
use crate::descriptor::Descriptor;
use crate::info::TypeHandle;
use crate::mapper::form::ArrayForm;
use crate::mapper::plan::Plans;
use crate::value::Value;
use crate::BindError;

/// Converts between native values and the dense array form.
///
/// Records become sequences with one slot per field, absent values are
/// `null`. Unions become `[tag, value]` pairs.
///
/// # Example
///
/// ```
/// use vc_bind::context::TypeContext;
/// use vc_bind::decl::Bind;
/// use vc_bind::mapper::ArrayMapper;
/// use vc_bind::value::Value;
///
/// #[derive(Bind, Debug, PartialEq)]
/// struct User {
///     id: u32,
///     email: Option<String>,
/// }
///
/// let mapper = ArrayMapper::new(&TypeContext::new());
/// let user = User { id: 7, email: None };
///
/// let array = mapper.to_array(&user).unwrap();
/// assert_eq!(array, Value::from([Value::from(7_u32), Value::Null]));
/// assert_eq!(mapper.to_object::<User>(array).unwrap(), user);
/// ```
#[derive(Debug)]
pub struct ArrayMapper {
    plans: Plans,
}

impl ArrayMapper {
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
    ///
    /// Reports resolution errors and recursive structures early.
    pub fn prepare<T: Bind>(&self) -> Result<(), BindError> {
        self.plans.plan(&TypeHandle::of::<T>()).map(drop)
    }

    pub fn to_array<T: Bind>(&self, value: &T) -> Result<Value, BindError> {
        let plan = self.plans.plan(&TypeHandle::of::<T>())?;
        self.plans.encode::<ArrayForm>(&plan, value)
    }

    pub fn to_object<T: Bind>(&self, value: Value) -> Result<T, BindError> {
        let plan = self.plans.plan(&TypeHandle::of::<T>())?;
        let instance = self.plans.decode::<ArrayForm>(&plan, value)?;
        Ok(take_instance::<T>(instance)?)
    }

    /// Converts a value described by `descriptor`.
    pub fn to_array_erased(
        &self,
        descriptor: &Descriptor,
        value: &dyn Any,
    ) -> Result<Value, BindError> {
        let plan = self.plans.plan_for(descriptor)?;
        self.plans.encode::<ArrayForm>(&plan, value)
    }

    /// Builds a value described by `descriptor`.
    pub fn to_object_erased(
        &self,
        descriptor: &Descriptor,
        value: Value,
    ) -> Result<Instance, BindError> {
        let plan = self.plans.plan_for(descriptor)?;
        self.plans.decode::<ArrayForm>(&plan, value)
    }
}

#[cfg(test)]
mod tests {
    use super::ArrayMapper;
    use crate::context::TypeContext;
    use crate::mapper::fixtures::*;
    use crate::value::Value;
    use crate::{BindError, Fault};
    use alloc::boxed::Box;
    use alloc::collections::{BTreeSet, VecDeque};
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::any::Any;

    fn mapper() -> ArrayMapper {
        ArrayMapper::new(&TypeContext::new())
    }

    #[test]
    fn point_positional() {
        let mapper = mapper();
        let point = Point { x: 1, y: 2 };
        assert_eq!(mapper.to_array(&point).unwrap(), Value::from([1, 2]));
        assert_eq!(mapper.to_object::<Point>(Value::from([1, 2])).unwrap(), point);

        assert_eq!(
            mapper.to_object::<Point>(Value::from([1])).unwrap_err().fault(),
            Some(&Fault::Length {
                expected: 2,
                found: 1,
            })
        );
    }

    #[test]
    fn absent_fields_keep_their_slot() {
        let mapper = mapper();
        let profile = Profile {
            name: String::from("ada"),
            age: Some(36),
            nick: None,
            home: None,
        };
        let array = mapper.to_array(&profile).unwrap();
        assert_eq!(
            array,
            Value::from([
                Value::from("ada"),
                Value::from(36_u32),
                Value::Null,
                Value::Null,
            ])
        );
        assert_eq!(mapper.to_object::<Profile>(array).unwrap(), profile);

        let missing_name = Value::from([Value::Null, Value::Null, Value::Null, Value::Null]);
        let err = mapper.to_object::<Profile>(missing_name).unwrap_err();
        assert_eq!(err.path(), Some("name"));
        assert_eq!(err.fault(), Some(&Fault::MissingRequired { field: "name" }));
    }

    #[test]
    fn unions_are_tagged_pairs() {
        let mapper = mapper();
        let drawing = drawing();
        let array = mapper.to_array(&drawing).unwrap();
        assert_eq!(
            array,
            Value::from([
                Value::from("sketch"),
                Value::from("Green"),
                Value::from([Value::from("Circle"), Value::from([5_u32])]),
                Value::from([Value::from("null"), Value::Null]),
                Value::from([
                    Value::from([Value::from("Rectangle"), Value::from([2_u32, 3])]),
                    Value::from([Value::from("Circle"), Value::from([1_u32])]),
                ]),
            ])
        );
        assert_eq!(mapper.to_object::<Drawing>(array).unwrap(), drawing);

        let unknown = Value::from([Value::from("Triangle"), Value::from([3_u32])]);
        assert_eq!(
            mapper.to_object::<Shape>(unknown),
            Err(BindError::UnionMembership {
                union: "Shape",
                member: String::from("Triangle"),
            })
        );
    }

    #[test]
    fn declared_members_gate_writes() {
        let mapper = mapper();
        let framed = Framed {
            shape: Shape::Circle(Circle { r: 2 }),
        };
        let array = mapper.to_array(&framed).unwrap();
        assert_eq!(mapper.to_object::<Framed>(array).unwrap(), framed);

        let square = Framed {
            shape: Shape::Rectangle(Rectangle { w: 1, h: 1 }),
        };
        assert!(matches!(
            mapper.to_array(&square),
            Err(BindError::UnionMembership { union: "Shape", .. })
        ));
        let smuggled = Value::from([Value::from([
            Value::from("Rectangle"),
            Value::from([1_u32, 1]),
        ])]);
        assert!(matches!(
            mapper.to_object::<Framed>(smuggled),
            Err(BindError::UnionMembership { union: "Shape", .. })
        ));
    }

    #[test]
    fn recursion_needs_indirection() {
        let mapper = mapper();
        match mapper.prepare::<Loop>() {
            Err(BindError::RecursiveStructure { ty, cycle }) => {
                assert_eq!(ty, "Loop");
                assert_eq!(cycle, "Loop.next -> Loop");
            }
            other => panic!("unexpected {other:?}"),
        }

        let chain = chain(&[1, 2, 3]).unwrap();
        let array = mapper.to_array(&*chain).unwrap();
        assert_eq!(
            array,
            Value::from([
                Value::from(1_u8),
                Value::from([
                    Value::from(2_u8),
                    Value::from([Value::from(3_u8), Value::Null]),
                ]),
            ])
        );
        assert_eq!(mapper.to_object::<Chain>(array).unwrap(), *chain);

        let tree = tree();
        let array = mapper.to_array(&tree).unwrap();
        assert_eq!(mapper.to_object::<Tree>(array).unwrap(), tree);
    }

    #[test]
    fn collections_round_trip() {
        let mapper = mapper();
        let inventory = Inventory {
            cells: [1, 2, 3],
            tags: VecDeque::from([String::from("a"), String::from("b")]),
            ids: BTreeSet::from([9, 4]),
            gaps: vec![Some(-1), None, Some(2)],
        };
        let array = mapper.to_array(&inventory).unwrap();
        assert_eq!(
            array.as_seq().and_then(|s| s.get(3)),
            Some(&Value::from([Value::from(-1_i16), Value::Null, Value::from(2_i16)]))
        );
        assert_eq!(mapper.to_object::<Inventory>(array).unwrap(), inventory);

        let short = Value::from([
            Value::from([1_u8, 2]),
            Value::Seq(vec![]),
            Value::Seq(vec![]),
            Value::Seq(vec![]),
        ]);
        let err = mapper.to_object::<Inventory>(short).unwrap_err();
        assert_eq!(err.path(), Some("cells"));
        assert_eq!(
            err.fault(),
            Some(&Fault::Length {
                expected: 3,
                found: 2,
            })
        );

        let null_element = Value::from([
            Value::from([1_u8, 2, 3]),
            Value::from([Value::Null]),
            Value::Seq(vec![]),
            Value::Seq(vec![]),
        ]);
        let err = mapper.to_object::<Inventory>(null_element).unwrap_err();
        assert_eq!(err.path(), Some("tags[0]"));
    }

    #[test]
    fn erased_conversions() {
        let ctx = TypeContext::new();
        let mapper = ArrayMapper::new(&ctx);
        let descriptor = ctx.descriptor_of::<Point>().unwrap();

        let array = mapper
            .to_array_erased(&descriptor, &Point { x: 3, y: 4 })
            .unwrap();
        let back = mapper.to_object_erased(&descriptor, array).unwrap();
        assert_eq!(back.downcast_ref::<Point>(), Some(&Point { x: 3, y: 4 }));

        assert!(mapper.to_array_erased(&descriptor, &5_u8).is_err());
    }

    #[test]
    fn json_carries_the_array_form() {
        let mapper = mapper();
        let drawing = drawing();
        let text = serde_json::to_string(&mapper.to_array(&drawing).unwrap()).unwrap();
        assert_eq!(
            text,
            r#"["sketch","Green",["Circle",[5]],["null",null],[["Rectangle",[2,3]],["Circle",[1]]]]"#
        );
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(mapper.to_object::<Drawing>(value).unwrap(), drawing);
    }

    #[test]
    fn nested_collections() {
        let mapper = mapper();
        let nested = vec![vec![1_u8, 2], vec![3]];
        let array = mapper.to_array(&nested).unwrap();
        assert_eq!(
            array,
            Value::from([Value::from([1_u8, 2]), Value::from([3_u8])])
        );
        assert_eq!(mapper.to_object::<Vec<Vec<u8>>>(array).unwrap(), nested);
    }

    #[test]
    fn open_union_members() {
        let ctx = TypeContext::new();
        let mapper = ArrayMapper::new(&ctx);
        ctx.descriptor_of::<Wolf>().unwrap();
        ctx.descriptor_of::<Rogue>().unwrap();

        let wolf: Box<dyn Creature> = Box::new(Wolf { teeth: 4 });
        let array = mapper.to_array(&wolf).unwrap();
        assert_eq!(
            array,
            Value::from([Value::from("Wolf"), Value::from([4_u8])])
        );
        let back = mapper.to_object::<Box<dyn Creature>>(array).unwrap();
        let back: &dyn Any = &*back;
        assert_eq!(back.downcast_ref::<Wolf>(), Some(&Wolf { teeth: 4 }));

        let rogue: Box<dyn Creature> = Box::new(Rogue { id: 1 });
        assert!(matches!(
            mapper.to_array(&rogue),
            Err(BindError::UnionMembership { .. })
        ));
        let smuggled = Value::from([Value::from("Rogue"), Value::from([1_u8])]);
        assert!(matches!(
            mapper.to_object::<Box<dyn Creature>>(smuggled),
            Err(BindError::UnionMembership { .. })
        ));
    }
}
