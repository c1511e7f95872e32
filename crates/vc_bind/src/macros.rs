/// Declares `Box<dyn Trait>` as an open union.
///
/// The trait must have `Any + Send + Sync` as supertraits. Types join the
/// union with `#[bind(member_of(Box<dyn Trait>))]`, as they are resolved.
///
/// # Example
///
/// ```
/// use core::any::Any;
/// use vc_bind::context::TypeContext;
/// use vc_bind::decl::Bind;
///
/// pub trait Event: Any + Send + Sync {}
/// vc_bind::open_union!(dyn Event);
///
/// #[derive(Bind)]
/// #[bind(member_of(Box<dyn Event>))]
/// struct Click {
///     x: i32,
///     y: i32,
/// }
/// impl Event for Click {}
///
/// let ctx = TypeContext::new();
/// let events = ctx.descriptor_of::<Box<dyn Event>>().unwrap();
/// assert!(events.as_union().unwrap().members().is_empty());
///
/// ctx.descriptor_of::<Click>().unwrap();
/// assert_eq!(events.as_union().unwrap().members()[0].tag(), "Click");
/// ```
#[macro_export]
macro_rules! open_union {
    (dyn $trait:path) => {
        impl $crate::info::TypePath for $crate::__macro_exports::Box<dyn $trait> {
            fn type_path() -> &'static str {
                ::core::concat!("Box<dyn ", ::core::stringify!($trait), ">")
            }

            fn type_name() -> &'static str {
                ::core::concat!("Box<dyn ", ::core::stringify!($trait), ">")
            }

            fn type_ident() -> &'static str {
                "Box"
            }
        }

        impl $crate::decl::Bind for $crate::__macro_exports::Box<dyn $trait> {
            fn declare() -> $crate::decl::TypeDecl {
                $crate::decl::TypeDecl::new().with_union($crate::decl::UnionDecl::open(|value| {
                    value
                        .downcast_ref::<$crate::__macro_exports::Box<dyn $trait>>()
                        .map(|boxed| {
                            let inner: &dyn $trait = &**boxed;
                            inner as &dyn $crate::__macro_exports::Any
                        })
                }))
            }
        }
    };
}
