//! The shared cache of resolved descriptors.
//!
//! A [`TypeContext`] owns the [`ScalarRegistry`], the [`Resolver`] and every
//! descriptor resolved through it. It is cheap to clone and safe to share
//! between threads.

// -----------------------------------------------------------------------------
// Modules

mod builder;

// -----------------------------------------------------------------------------
// Exports

pub use builder::ContextBuilder;

// -----------------------------------------------------------------------------
// TypeContext

use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::{Any, TypeId};
use core::fmt;
use std::sync::{PoisonError, RwLock};

use log::{debug, trace, warn};
use vc_utils::TypeIdMap;

use crate::BindError;
use crate::Fault;
use crate::decl::{Bind, LiftFn, TypeDecl};
use crate::descriptor::{Descriptor, UnionInfo, UnionMember};
use crate::info::TypeHandle;
use crate::resolve::{ResolveScope, Resolver, check_member_kind};
use crate::scalar::{ScalarCodec, ScalarRegistry, WireScalar};

#[derive(Default)]
struct State {
    descriptors: TypeIdMap<Descriptor>,
    // Members that declared a union as supertype before the union resolved.
    pending: TypeIdMap<Vec<UnionMember>>,
}

struct Inner {
    state: RwLock<State>,
    scalars: ScalarRegistry,
    resolver: Resolver,
}

/// Resolves and caches descriptors.
///
/// Resolution runs on the calling thread without holding locks, so
/// concurrent callers may resolve the same type twice. Only the first
/// published descriptor is kept, every caller receives that one.
///
/// # Example
///
/// ```
/// use vc_bind::context::TypeContext;
/// use vc_bind::decl::Bind;
/// use vc_bind::descriptor::Kind;
///
/// #[derive(Bind)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// let ctx = TypeContext::new();
/// let point = ctx.descriptor_of::<Point>().unwrap();
/// assert_eq!(point.kind(), Kind::Record);
///
/// // Nested types are resolved along the way.
/// assert!(ctx.descriptor_of::<i32>().unwrap().ptr_eq(&ctx.descriptor_of::<i32>().unwrap()));
/// ```
#[derive(Clone)]
pub struct TypeContext(Arc<Inner>);

impl Default for TypeContext {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TypeContext {
    /// Creates a context with the default scalars, classifiers and finders.
    #[inline]
    pub fn new() -> Self {
        Self::builder().build()
    }

    #[inline]
    pub fn builder() -> ContextBuilder {
        ContextBuilder::new()
    }

    pub(crate) fn from_parts(scalars: ScalarRegistry, resolver: Resolver) -> Self {
        Self(Arc::new(Inner {
            state: RwLock::new(State::default()),
            scalars,
            resolver,
        }))
    }

    #[inline]
    pub fn scalars(&self) -> &ScalarRegistry {
        &self.0.scalars
    }

    #[inline]
    pub fn resolver(&self) -> &Resolver {
        &self.0.resolver
    }

    /// Returns `true` if both values share the same cache.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    // -------------------------------------------------------------------------
    // Lookup

    /// Returns the descriptor of a type, resolving it if needed.
    pub fn get_descriptor(&self, handle: &TypeHandle) -> Result<Descriptor, BindError> {
        if let Some(descriptor) = self.cached(handle.id()) {
            trace!("descriptor cache hit for `{}`", handle.name());
            return Ok(descriptor);
        }
        let mut scope = ResolveScope::new(self);
        self.resolve_in(&mut scope, handle)
    }

    /// Like [`get_descriptor`](Self::get_descriptor), checking the generic
    /// arguments the caller expects.
    ///
    /// Generic arguments are part of a Rust type's identity, so this only
    /// validates them against the type's declaration.
    pub fn get_descriptor_with_args(
        &self,
        handle: &TypeHandle,
        args: &[TypeHandle],
    ) -> Result<Descriptor, BindError> {
        let decl = handle.declare();
        let declared = decl.type_args();
        if declared.len() != args.len() || declared.iter().zip(args).any(|(a, b)| a != b) {
            let names = |args: &[TypeHandle]| {
                args.iter().map(|h| h.name()).collect::<Vec<_>>().join(", ")
            };
            return Err(BindError::unresolvable(
                handle.name(),
                format!(
                    "type arguments <{}> do not match the declared <{}>",
                    names(args),
                    names(declared)
                ),
            ));
        }
        self.get_descriptor(handle)
    }

    /// Shorthand for `get_descriptor(&TypeHandle::of::<T>())`.
    #[inline]
    pub fn descriptor_of<T: Bind>(&self) -> Result<Descriptor, BindError> {
        self.get_descriptor(&TypeHandle::of::<T>())
    }

    /// Returns a published descriptor without resolving.
    pub fn cached(&self, type_id: TypeId) -> Option<Descriptor> {
        self.read().descriptors.get(&type_id).cloned()
    }

    #[inline]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.read().descriptors.contains(&type_id)
    }

    /// The number of published descriptors.
    #[inline]
    pub fn len(&self) -> usize {
        self.read().descriptors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // -------------------------------------------------------------------------
    // Registration

    /// Adds or replaces the scalar codec of a type.
    ///
    /// Fails with [`BindError::AlreadyRegistered`] once the type has a
    /// descriptor, since published descriptors never change.
    ///
    /// # Example
    ///
    /// ```
    /// use vc_bind::BindError;
    /// use vc_bind::context::TypeContext;
    /// use vc_bind::scalar::ScalarCodec;
    ///
    /// struct Meters(f64);
    ///
    /// let ctx = TypeContext::new();
    /// let codec = || ScalarCodec::bridge::<Meters, f64>(|m| Ok(m.0), |v| Ok(Meters(v)));
    /// assert!(ctx.register_scalar(codec()).is_ok());
    ///
    /// ctx.descriptor_of::<u8>().unwrap();
    /// assert!(matches!(
    ///     ctx.register_scalar(ScalarCodec::identity::<u8>()),
    ///     Err(BindError::AlreadyRegistered { .. })
    /// ));
    /// ```
    pub fn register_scalar(&self, codec: ScalarCodec) -> Result<(), BindError> {
        let native = *codec.native();
        // The state lock orders the check against publication.
        let state = self.write();
        if state.descriptors.contains(&native.id()) {
            return Err(BindError::AlreadyRegistered { ty: native.name() });
        }
        if self.0.scalars.insert(codec).is_some() {
            warn!("scalar codec of `{}` was replaced", native.path());
        }
        drop(state);
        Ok(())
    }

    /// Registers a codec reducing `T` to the wire scalar `W`.
    pub fn register_bridge<T: Any + Send + Sync, W: WireScalar>(
        &self,
        encode: impl Fn(&T) -> Result<W, Fault> + Send + Sync + 'static,
        decode: impl Fn(W) -> Result<T, Fault> + Send + Sync + 'static,
    ) -> Result<(), BindError> {
        self.register_scalar(ScalarCodec::bridge::<T, W>(encode, decode))
    }

    /// Adds a member to an open union.
    ///
    /// Both types are resolved first. Returns `Ok(false)` if the member was
    /// already known.
    pub fn register_union_member(
        &self,
        union: &TypeHandle,
        member: &TypeHandle,
        lift: LiftFn,
    ) -> Result<bool, BindError> {
        let descriptor = self.get_descriptor(union)?;
        let Ok(info) = descriptor.as_union() else {
            return Err(BindError::unresolvable(
                union.name(),
                format!("`{}` is not a union", union.name()),
            ));
        };
        check_member_kind(union, &self.get_descriptor(member)?)?;

        let added = info.append(UnionMember::new(*member, lift))?;
        if added {
            debug!("`{}` joined union `{}`", member.name(), union.name());
        }
        Ok(added)
    }

    /// Resolves every type derived with `#[bind(auto_register)]`.
    ///
    /// Returns the number of types resolved.
    #[cfg(feature = "auto_register")]
    pub fn auto_register(&self) -> Result<usize, BindError> {
        use crate::__macro_exports::auto_register::AutoRegistration;

        let mut count = 0_usize;
        for registration in inventory::iter::<AutoRegistration> {
            self.get_descriptor(&(registration.0)())?;
            count += 1;
        }
        debug!("auto registered {count} types");
        Ok(count)
    }

    // -------------------------------------------------------------------------
    // Resolution

    pub(crate) fn resolve_in(
        &self,
        scope: &mut ResolveScope<'_>,
        handle: &TypeHandle,
    ) -> Result<Descriptor, BindError> {
        let decl = handle.declare();
        scope.enter(*handle);
        let resolved = self.0.resolver.resolve(scope, handle, &decl);
        scope.leave();
        Ok(self.publish(resolved?, &decl))
    }

    fn publish(&self, descriptor: Descriptor, decl: &TypeDecl) -> Descriptor {
        let handle = *descriptor.handle();
        let mut guard = self.write();
        let state = &mut *guard;

        if let Some(existing) = state.descriptors.get(&handle.id()) {
            debug!(
                "`{}` was published concurrently, keeping the first descriptor",
                handle.name()
            );
            return existing.clone();
        }
        state.descriptors.insert(handle.id(), descriptor.clone());
        debug!("published {} descriptor of `{}`", descriptor.kind(), handle.name());

        if !decl.supertypes().is_empty() && check_member_kind(&handle, &descriptor).is_err() {
            warn!(
                "`{}` declares supertypes but is a {}, it joins no union",
                handle.name(),
                descriptor.kind()
            );
        } else {
            for supertype in decl.supertypes() {
                let member = UnionMember::new(handle, supertype.lift());
                let union = state
                    .descriptors
                    .get(&supertype.union_id())
                    .and_then(|d| d.as_union().ok());
                match union {
                    Some(union) => join(union, member),
                    None => state
                        .pending
                        .get_or_insert(supertype.union_id(), Vec::new)
                        .push(member),
                }
            }
        }

        if let Descriptor::Union(union) = &descriptor
            && let Some(waiting) = state.pending.remove(&handle.id())
        {
            for member in waiting {
                join(union, member);
            }
        }

        descriptor
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, State> {
        self.0.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, State> {
        self.0.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn join(union: &UnionInfo, member: UnionMember) {
    let union_name = union.handle().name();
    let member_name = member.handle().name();
    match union.append(member) {
        Ok(true) => debug!("`{member_name}` joined union `{union_name}`"),
        Ok(false) => {}
        Err(err) => warn!("{err}"),
    }
}

impl fmt::Debug for TypeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.read();
        let names: Vec<String> = state
            .descriptors
            .values()
            .map(|d| String::from(d.handle().name()))
            .collect();
        f.debug_struct("TypeContext")
            .field("descriptors", &names)
            .field("scalars", &self.0.scalars.len())
            .field("resolver", &self.0.resolver)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::TypeContext;
    use crate::BindError;
    use crate::decl::{Bind, Instance};
    use crate::descriptor::{FieldOrigin, FieldShape, Kind};
    use crate::info::TypeHandle;
    use crate::scalar::ScalarCodec;
    use alloc::boxed::Box;
    use alloc::string::String;
    use alloc::vec::Vec;
    use core::any::{Any, TypeId};

    #[derive(Bind, Debug, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[derive(Bind)]
    struct Profile {
        name: String,
        age: Option<u32>,
        nick: Option<String>,
        tags: Vec<String>,
        #[bind(required = false, default)]
        note: String,
    }

    #[derive(Bind)]
    #[bind(order(b, a))]
    struct Swapped {
        a: u8,
        b: u8,
    }

    #[derive(Bind)]
    #[bind(order(a, z))]
    struct BadOrder {
        a: u8,
        b: u8,
    }

    pub trait Animal: Any + Send + Sync {}
    crate::open_union!(dyn Animal);

    #[derive(Bind)]
    #[bind(member_of(Box<dyn Animal>))]
    struct Dog {
        name: String,
    }
    impl Animal for Dog {}

    #[derive(Bind)]
    #[bind(member_of(Box<dyn Animal>))]
    struct Cat {
        lives: u8,
    }
    impl Animal for Cat {}

    #[derive(Bind)]
    #[bind(auto_register, member_of(Box<dyn Animal>))]
    struct Bird {
        wings: u8,
    }
    impl Animal for Bird {}

    #[test]
    fn record_fields_in_declaration_order() {
        let ctx = TypeContext::new();
        let info = ctx.descriptor_of::<Point>().unwrap();
        let record = info.as_record().unwrap();
        assert_eq!(record.field_names().collect::<Vec<_>>(), ["x", "y"]);
        assert!(record.fields().iter().all(|f| f.origin() == FieldOrigin::Constructor));

        // Descriptors of a second context are resolved again, in the same order.
        let again = TypeContext::new().descriptor_of::<Point>().unwrap();
        assert!(!again.ptr_eq(&info));
        assert_eq!(
            again.as_record().unwrap().field_names().collect::<Vec<_>>(),
            ["x", "y"]
        );
    }

    #[test]
    fn required_ness_follows_the_field_shape() {
        let ctx = TypeContext::new();
        let info = ctx.descriptor_of::<Profile>().unwrap();
        let record = info.as_record().unwrap();
        let field = |name| record.field(name).unwrap();

        assert!(field("name").required());
        assert_eq!(field("name").shape(), FieldShape::Plain);
        assert!(!field("age").required());
        assert!(matches!(field("age").shape(), FieldShape::OptionalPrimitive(_)));
        assert!(!field("nick").required());
        assert_eq!(field("nick").shape(), FieldShape::Optional);
        assert!(field("tags").required());
        assert!(!field("note").required());

        assert_eq!(ctx.descriptor_of::<Vec<String>>().unwrap().kind(), Kind::Array);
    }

    #[test]
    fn explicit_order() {
        let ctx = TypeContext::new();
        let info = ctx.descriptor_of::<Swapped>().unwrap();
        assert_eq!(
            info.as_record().unwrap().field_names().collect::<Vec<_>>(),
            ["b", "a"]
        );
        assert!(matches!(
            ctx.descriptor_of::<BadOrder>(),
            Err(BindError::OrderMismatch { ty: "BadOrder", .. })
        ));
        assert!(!ctx.contains(TypeId::of::<BadOrder>()));
    }

    #[test]
    fn open_union_grows_as_members_resolve() {
        let ctx = TypeContext::new();
        let animal = ctx.descriptor_of::<Box<dyn Animal>>().unwrap();
        let union = animal.as_union().unwrap();
        assert!(!union.is_sealed());
        assert!(union.members().is_empty());

        ctx.descriptor_of::<Dog>().unwrap();
        let members = union.members();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].tag(), "Dog");
        assert_eq!(members[0].handle().id(), TypeId::of::<Dog>());
    }

    #[test]
    fn members_resolved_first_join_later() {
        let ctx = TypeContext::new();
        ctx.descriptor_of::<Cat>().unwrap();
        let animal = ctx.descriptor_of::<Box<dyn Animal>>().unwrap();
        let tags: Vec<_> = animal
            .as_union()
            .unwrap()
            .members()
            .iter()
            .map(|m| m.tag())
            .collect();
        assert_eq!(tags, ["Cat"]);
    }

    #[test]
    fn explicit_union_registration() {
        fn lift(inst: Instance) -> Result<Instance, Instance> {
            inst.downcast::<Dog>().map(|dog| {
                let animal: Box<dyn Animal> = dog;
                Box::new(animal) as Instance
            })
        }

        let ctx = TypeContext::new();
        let union = TypeHandle::of::<Box<dyn Animal>>();
        let dog = TypeHandle::of::<Dog>();
        assert_eq!(ctx.register_union_member(&union, &dog, lift), Ok(false));

        let vec = TypeHandle::of::<Vec<u8>>();
        assert!(matches!(
            ctx.register_union_member(&union, &vec, lift),
            Err(BindError::UnionMembership { .. })
        ));
        assert!(matches!(
            ctx.register_union_member(&dog, &dog, lift),
            Err(BindError::UnresolvableType { .. })
        ));
    }

    #[test]
    fn scalar_registration_before_resolution_only() {
        struct Celsius(f64);

        let ctx = TypeContext::new();
        ctx.register_bridge::<Celsius, f64>(|c| Ok(c.0), |v| Ok(Celsius(v)))
            .unwrap();
        ctx.register_scalar(ScalarCodec::bridge::<Celsius, i64>(
            |c| Ok(c.0 as i64),
            |v| Ok(Celsius(v as f64)),
        ))
        .unwrap();

        ctx.descriptor_of::<String>().unwrap();
        assert_eq!(
            ctx.register_scalar(ScalarCodec::identity::<String>()),
            Err(BindError::AlreadyRegistered { ty: "String" })
        );
    }

    #[test]
    fn wrappers_are_not_resolved_alone() {
        let ctx = TypeContext::new();
        assert!(matches!(
            ctx.descriptor_of::<Option<u8>>(),
            Err(BindError::UnresolvableType { .. })
        ));
    }

    #[test]
    fn type_arguments_are_validated() {
        let ctx = TypeContext::new();
        let handle = TypeHandle::of::<Vec<u16>>();
        assert!(ctx
            .get_descriptor_with_args(&handle, &[TypeHandle::of::<u16>()])
            .is_ok());
        assert!(matches!(
            ctx.get_descriptor_with_args(&handle, &[TypeHandle::of::<u8>()]),
            Err(BindError::UnresolvableType { .. })
        ));
    }

    #[test]
    fn concurrent_lookups_share_one_descriptor() {
        let ctx = TypeContext::new();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ctx = ctx.clone();
                std::thread::spawn(move || ctx.descriptor_of::<Profile>().unwrap())
            })
            .collect();
        let found: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let published = ctx.descriptor_of::<Profile>().unwrap();
        assert!(found.iter().all(|d| d.ptr_eq(&published)));
    }

    #[cfg(feature = "auto_register")]
    #[test]
    fn auto_register_fills_open_unions() {
        let ctx = TypeContext::new();
        assert!(ctx.auto_register().unwrap() >= 1);
        assert!(ctx.contains(TypeId::of::<Bird>()));

        let animal = ctx.descriptor_of::<Box<dyn Animal>>().unwrap();
        let bird = animal.as_union().unwrap().member_by_tag("Bird").unwrap();
        assert_eq!(bird.handle().id(), TypeId::of::<Bird>());
    }
}
