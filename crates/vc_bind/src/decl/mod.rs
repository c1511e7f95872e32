//! Declarations a type publishes about itself.
//!
//! A [`TypeDecl`] is the raw material of resolution: a bag of optional facets
//! that the classifier chain and the component finders inspect. It is produced
//! by [`Bind::declare`], normally through [`#[derive(Bind)]`](Bind).
//!
//! ## Menu
//!
//! - [`Primitive`]: primitive flavor, drives required-ness.
//! - [`WrapperDecl`]: `Option`-like and `Box`-like indirections.
//! - [`SequenceDecl`]: fixed arrays, growable collections and sets.
//! - [`UnionDecl`] and [`Supertype`]: sealed and open unions.
//! - [`RecordDecl`] and [`FieldCandidate`]: records and their components.

// -----------------------------------------------------------------------------
// Modules

mod primitive;
mod record;
mod sequence;
mod union;
mod wrapper;

// -----------------------------------------------------------------------------
// Exports

pub use primitive::Primitive;
pub use record::{ConstructFn, FieldCandidate, Getter, Projection, RecordDecl, Setter};
pub use sequence::{Cursor, SequenceBuilder, SequenceDecl, SequenceFamily};
pub use union::{LiftFn, Supertype, UnionDecl, UnionMemberDecl, UnwrapFn};
pub use wrapper::{PeelFn, WrapFn, WrapperDecl, WrapperKind};

pub use vc_bind_derive::Bind;

// -----------------------------------------------------------------------------
// Instance

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;

use crate::Fault;
use crate::info::{TypeHandle, TypePath};
use crate::scalar::ScalarCodec;

/// An owned, type-erased native value.
pub type Instance = Box<dyn Any + Send + Sync>;

/// Moves the concrete value out of an [`Instance`].
///
/// # Example
///
/// ```
/// use vc_bind::decl::{take_instance, Instance};
///
/// let inst: Instance = Box::new(7_u8);
/// assert_eq!(take_instance::<u8>(inst), Ok(7));
///
/// let inst: Instance = Box::new(7_u8);
/// assert!(take_instance::<u16>(inst).is_err());
/// ```
#[inline]
pub fn take_instance<T: Any>(instance: Instance) -> Result<T, Fault> {
    match instance.downcast::<T>() {
        Ok(value) => Ok(*value),
        Err(_) => Err(Fault::native::<T>()),
    }
}

// -----------------------------------------------------------------------------
// Bind

/// A type that can be resolved into a [`Descriptor`](crate::descriptor::Descriptor).
///
/// Implemented for primitives, `String`, common std types and containers.
/// User types use [`#[derive(Bind)]`](derive@Bind).
pub trait Bind: TypePath + Send + Sync {
    /// Declares the structure of the type.
    fn declare() -> TypeDecl;
}

// -----------------------------------------------------------------------------
// TypeDecl

/// The declaration of a type.
///
/// All facets are optional. Which ones are set decides how the type is
/// classified, see [`Resolver`](crate::resolve::Resolver).
///
/// # Example
///
/// ```
/// use vc_bind::decl::{Primitive, TypeDecl};
/// use vc_bind::scalar::ScalarCodec;
///
/// let decl = TypeDecl::new()
///     .with_primitive(Primitive::Integer)
///     .with_scalar(ScalarCodec::identity::<i32>());
///
/// assert_eq!(decl.primitive(), Some(Primitive::Integer));
/// assert!(decl.record().is_none());
/// ```
#[derive(Clone, Default)]
pub struct TypeDecl {
    tag: Option<&'static str>,
    type_args: Vec<TypeHandle>,
    primitive: Option<Primitive>,
    scalar: Option<ScalarCodec>,
    wrapper: Option<WrapperDecl>,
    sequence: Option<SequenceDecl>,
    union: Option<UnionDecl>,
    record: Option<RecordDecl>,
    supertypes: Vec<Supertype>,
}

impl TypeDecl {
    /// Creates an empty declaration.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the stable identity used when this type is a union member.
    #[inline]
    pub fn with_tag(mut self, tag: &'static str) -> Self {
        self.tag = Some(tag);
        self
    }

    /// Adds a generic argument of the type.
    #[inline]
    pub fn with_type_arg(mut self, arg: TypeHandle) -> Self {
        self.type_args.push(arg);
        self
    }

    #[inline]
    pub fn with_primitive(mut self, primitive: Primitive) -> Self {
        self.primitive = Some(primitive);
        self
    }

    #[inline]
    pub fn with_scalar(mut self, codec: ScalarCodec) -> Self {
        self.scalar = Some(codec);
        self
    }

    #[inline]
    pub fn with_wrapper(mut self, wrapper: WrapperDecl) -> Self {
        self.wrapper = Some(wrapper);
        self
    }

    #[inline]
    pub fn with_sequence(mut self, sequence: SequenceDecl) -> Self {
        self.sequence = Some(sequence);
        self
    }

    #[inline]
    pub fn with_union(mut self, union: UnionDecl) -> Self {
        self.union = Some(union);
        self
    }

    #[inline]
    pub fn with_record(mut self, record: RecordDecl) -> Self {
        self.record = Some(record);
        self
    }

    /// Declares that the type may join the union `supertype`.
    #[inline]
    pub fn with_supertype(mut self, supertype: Supertype) -> Self {
        self.supertypes.push(supertype);
        self
    }

    #[inline]
    pub fn tag(&self) -> Option<&'static str> {
        self.tag
    }

    #[inline]
    pub fn type_args(&self) -> &[TypeHandle] {
        &self.type_args
    }

    #[inline]
    pub fn primitive(&self) -> Option<Primitive> {
        self.primitive
    }

    #[inline]
    pub fn scalar(&self) -> Option<&ScalarCodec> {
        self.scalar.as_ref()
    }

    #[inline]
    pub fn wrapper(&self) -> Option<&WrapperDecl> {
        self.wrapper.as_ref()
    }

    #[inline]
    pub fn sequence(&self) -> Option<&SequenceDecl> {
        self.sequence.as_ref()
    }

    #[inline]
    pub fn union(&self) -> Option<&UnionDecl> {
        self.union.as_ref()
    }

    #[inline]
    pub fn record(&self) -> Option<&RecordDecl> {
        self.record.as_ref()
    }

    #[inline]
    pub fn supertypes(&self) -> &[Supertype] {
        &self.supertypes
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    use crate::context::TypeContext;
    use crate::decl::Bind;
    use crate::info::TypePath;
    use crate::mapper::fixtures::Circle;
    use crate::mapper::{ArrayMapper, MapMapper};
    use crate::scalar::ScalarCodec;
    use crate::value::Value;
    use crate::{BindError, Fault};

    fn map<const N: usize>(entries: [(&str, Value); N]) -> Value {
        Value::from_iter(entries)
    }

    #[derive(Bind, Debug, PartialEq)]
    #[bind(type_path = "demo::shapes::Pin")]
    struct Pin;

    #[derive(Bind, Debug, PartialEq)]
    struct Pair<T> {
        left: T,
        right: T,
    }

    #[derive(Bind, Debug, PartialEq)]
    struct Rgb(u8, u8, u8);

    #[derive(Bind, Debug, PartialEq)]
    struct Account {
        #[bind(rename = "user")]
        name: String,
        #[bind(skip)]
        cache: u32,
        #[bind(default)]
        level: u8,
    }

    #[derive(Bind, Debug, PartialEq)]
    enum Level {
        #[bind(rename = "lo")]
        Low,
        High,
    }

    #[derive(Bind, Debug, PartialEq)]
    #[bind(tag = "dot")]
    struct Dot {
        x: i32,
    }

    #[derive(Bind, Debug, PartialEq)]
    enum Mark {
        Dot(Dot),
        Circle(Circle),
    }

    #[derive(Bind, Debug, PartialEq)]
    struct Clock {
        h: u32,
        m: u32,
    }

    #[derive(Bind, Debug, PartialEq)]
    #[bind(project(Clock))]
    struct Minutes {
        total: u32,
    }

    impl From<&Minutes> for Clock {
        fn from(value: &Minutes) -> Self {
            Self {
                h: value.total / 60,
                m: value.total % 60,
            }
        }
    }

    impl From<Clock> for Minutes {
        fn from(clock: Clock) -> Self {
            Self {
                total: clock.h * 60 + clock.m,
            }
        }
    }

    #[derive(Debug, PartialEq)]
    struct Token(u64);

    #[derive(Bind, Debug, PartialEq)]
    struct Wallet {
        #[bind(scalar)]
        token: Token,
    }

    #[derive(Bind, Debug, PartialEq, Default)]
    #[bind(accessors)]
    struct Prefs {
        zoom: u8,
        alpha: u8,
    }

    #[test]
    fn custom_type_path() {
        assert_eq!(Pin::type_path(), "demo::shapes::Pin");
        assert_eq!(Pin::type_name(), "Pin");
        assert_eq!(Pin::module_path(), Some("demo::shapes"));

        assert_eq!(Rgb::type_path(), "vc_bind::decl::tests::Rgb");
        assert_eq!(Rgb::module_path(), Some("vc_bind::decl::tests"));
    }

    #[test]
    fn generic_records() {
        assert_eq!(<Pair<u8>>::type_name(), "Pair<u8>");
        assert_eq!(<Pair<u8>>::type_path(), "vc_bind::decl::tests::Pair<u8>");
        assert_eq!(<Pair<u8>>::declare().type_args().len(), 1);

        let ctx = TypeContext::new();
        let pair = Pair { left: 1_u8, right: 2 };
        let dense = ArrayMapper::new(&ctx).to_array(&pair).unwrap();
        assert_eq!(dense, Value::from(vec![Value::from(1_u8), Value::from(2_u8)]));
        assert_eq!(ArrayMapper::new(&ctx).to_object::<Pair<u8>>(dense).unwrap(), pair);
    }

    #[test]
    fn tuple_and_unit_structs() {
        let ctx = TypeContext::new();
        let rgb = Rgb(1, 2, 3);

        let dense = ArrayMapper::new(&ctx).to_array(&rgb).unwrap();
        assert_eq!(
            dense,
            Value::from(vec![Value::from(1_u8), Value::from(2_u8), Value::from(3_u8)])
        );

        let sparse = MapMapper::new(&ctx).to_map(&rgb).unwrap();
        assert_eq!(
            sparse,
            map([
                ("0", Value::from(1_u8)),
                ("1", Value::from(2_u8)),
                ("2", Value::from(3_u8)),
            ])
        );
        assert_eq!(MapMapper::new(&ctx).to_object::<Rgb>(sparse).unwrap(), rgb);

        assert_eq!(MapMapper::new(&ctx).to_map(&Pin).unwrap(), map([]));
        assert_eq!(MapMapper::new(&ctx).to_object::<Pin>(map([])).unwrap(), Pin);
    }

    #[test]
    fn renamed_skipped_and_defaulted_fields() {
        let ctx = TypeContext::new();
        let mapper = MapMapper::new(&ctx);

        let account = Account {
            name: String::from("ada"),
            cache: 7,
            level: 3,
        };
        let sparse = mapper.to_map(&account).unwrap();
        assert_eq!(
            sparse,
            map([("level", Value::from(3_u8)), ("user", Value::from("ada"))])
        );

        let decoded = mapper.to_object::<Account>(sparse).unwrap();
        assert_eq!(decoded.name, "ada");
        assert_eq!(decoded.cache, 0);
        assert_eq!(decoded.level, 3);

        let decoded = mapper
            .to_object::<Account>(map([("user", Value::from("bob"))]))
            .unwrap();
        assert_eq!(decoded.level, 0);

        let err = mapper
            .to_object::<Account>(map([("name", Value::from("bob"))]))
            .unwrap_err();
        assert_eq!(err.fault(), Some(&Fault::MissingRequired { field: "user" }));
    }

    #[test]
    fn unit_enums_are_names() {
        let ctx = TypeContext::new();
        let mapper = ArrayMapper::new(&ctx);

        assert_eq!(mapper.to_array(&Level::Low).unwrap(), Value::from("lo"));
        assert_eq!(mapper.to_array(&Level::High).unwrap(), Value::from("High"));
        assert_eq!(
            mapper.to_object::<Level>(Value::from("lo")).unwrap(),
            Level::Low
        );

        let err = mapper.to_object::<Level>(Value::from("Low")).unwrap_err();
        assert!(matches!(
            err.fault(),
            Some(Fault::OutOfRange { value, .. }) if value == "Low"
        ));
    }

    #[test]
    fn member_tags() {
        let ctx = TypeContext::new();
        let mapper = ArrayMapper::new(&ctx);

        let mark = Mark::Dot(Dot { x: 4 });
        let dense = mapper.to_array(&mark).unwrap();
        assert_eq!(
            dense,
            Value::from(vec![Value::from("dot"), Value::from(vec![Value::from(4)])])
        );
        assert_eq!(mapper.to_object::<Mark>(dense).unwrap(), mark);

        let circle = MapMapper::new(&ctx).to_map(&Mark::Circle(Circle { r: 1 })).unwrap();
        assert_eq!(circle.get("type"), Some(&Value::from("Circle")));
    }

    #[test]
    fn projected_records() {
        let ctx = TypeContext::new();
        let mapper = MapMapper::new(&ctx);

        let minutes = Minutes { total: 125 };
        let sparse = mapper.to_map(&minutes).unwrap();
        assert_eq!(
            sparse,
            map([("h", Value::from(2_u32)), ("m", Value::from(5_u32))])
        );
        assert_eq!(mapper.to_object::<Minutes>(sparse).unwrap(), minutes);
    }

    #[test]
    fn scalar_fields_need_a_codec() {
        let wallet = Wallet { token: Token(9) };

        let ctx = TypeContext::new();
        assert!(matches!(
            ArrayMapper::new(&ctx).prepare::<Wallet>(),
            Err(BindError::UnresolvableType { .. })
        ));

        let ctx = TypeContext::builder()
            .with_scalar(ScalarCodec::bridge::<Token, u64>(
                |token| Ok(token.0),
                |raw| Ok(Token(raw)),
            ))
            .build();
        let mapper = ArrayMapper::new(&ctx);
        let dense = mapper.to_array(&wallet).unwrap();
        assert_eq!(dense, Value::from(vec![Value::from(9_u64)]));
        assert_eq!(mapper.to_object::<Wallet>(dense).unwrap(), wallet);
    }

    #[test]
    fn accessor_properties_sort_by_name() {
        let ctx = TypeContext::new();
        let prefs = ctx.descriptor_of::<Prefs>().unwrap();
        let names: Vec<_> = prefs.as_record().unwrap().field_names().collect();
        assert_eq!(names, ["alpha", "zoom"]);

        let value = Prefs { zoom: 2, alpha: 1 };
        let dense = ArrayMapper::new(&ctx).to_array(&value).unwrap();
        assert_eq!(dense, Value::from(vec![Value::from(1_u8), Value::from(2_u8)]));
        assert_eq!(ArrayMapper::new(&ctx).to_object::<Prefs>(dense).unwrap(), value);
    }
}
