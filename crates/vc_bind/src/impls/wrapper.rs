use alloc::boxed::Box;
use core::any::Any;

use crate::Fault;
use crate::decl::{Bind, Instance, TypeDecl, WrapperDecl, WrapperKind, take_instance};
use crate::impls::{GenericTypePathCell, concat};
use crate::info::{TypeHandle, TypePath};

// -----------------------------------------------------------------------------
// Option

impl<T: TypePath> TypePath for Option<T> {
    fn type_path() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["core::option::Option<", T::type_path(), ">"]))
    }

    fn type_name() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["Option<", T::type_name(), ">"]))
    }

    #[inline]
    fn type_ident() -> &'static str {
        "Option"
    }

    #[inline]
    fn module_path() -> Option<&'static str> {
        Some("core::option")
    }
}

fn peel_option<T: Any>(value: &dyn Any) -> Result<Option<&dyn Any>, Fault> {
    let option = value
        .downcast_ref::<Option<T>>()
        .ok_or_else(Fault::native::<Option<T>>)?;
    Ok(option.as_ref().map(|inner| inner as &dyn Any))
}

fn wrap_option<T: Any + Send + Sync>(inner: Option<Instance>) -> Result<Instance, Fault> {
    match inner {
        Some(inner) => Ok(Box::new(Some(take_instance::<T>(inner)?))),
        None => Ok(Box::new(None::<T>)),
    }
}

impl<T: Bind> Bind for Option<T> {
    fn declare() -> TypeDecl {
        let inner = TypeHandle::of::<T>();
        TypeDecl::new().with_type_arg(inner).with_wrapper(WrapperDecl::new(
            WrapperKind::Optional,
            inner,
            peel_option::<T>,
            wrap_option::<T>,
        ))
    }
}

// -----------------------------------------------------------------------------
// Box

impl<T: TypePath> TypePath for Box<T> {
    fn type_path() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["alloc::boxed::Box<", T::type_path(), ">"]))
    }

    fn type_name() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["Box<", T::type_name(), ">"]))
    }

    #[inline]
    fn type_ident() -> &'static str {
        "Box"
    }

    #[inline]
    fn module_path() -> Option<&'static str> {
        Some("alloc::boxed")
    }
}

fn peel_box<T: Any>(value: &dyn Any) -> Result<Option<&dyn Any>, Fault> {
    let boxed = value
        .downcast_ref::<Box<T>>()
        .ok_or_else(Fault::native::<Box<T>>)?;
    Ok(Some(&**boxed as &dyn Any))
}

fn wrap_box<T: Any + Send + Sync>(inner: Option<Instance>) -> Result<Instance, Fault> {
    let inner = inner.ok_or(Fault::Mismatch {
        expected: "boxed value",
        found: "null",
    })?;
    Ok(Box::new(Box::new(take_instance::<T>(inner)?)))
}

impl<T: Bind> Bind for Box<T> {
    fn declare() -> TypeDecl {
        let inner = TypeHandle::of::<T>();
        TypeDecl::new().with_type_arg(inner).with_wrapper(WrapperDecl::new(
            WrapperKind::Boxed,
            inner,
            peel_box::<T>,
            wrap_box::<T>,
        ))
    }
}

#[cfg(test)]
mod tests {
    use crate::decl::{Bind, Instance, WrapperKind};
    use crate::info::TypePath;
    use alloc::boxed::Box;

    #[test]
    fn option_wrapper() {
        assert_eq!(<Option<u8>>::type_path(), "core::option::Option<u8>");
        assert_eq!(<Option<Box<u8>>>::type_name(), "Option<Box<u8>>");

        let decl = <Option<u8>>::declare();
        let wrapper = decl.wrapper().unwrap();
        assert_eq!(wrapper.kind(), WrapperKind::Optional);
        assert_eq!(wrapper.inner().name(), "u8");

        let some = Some(3_u8);
        let peeled = wrapper.peel(&some).unwrap().unwrap();
        assert_eq!(peeled.downcast_ref::<u8>(), Some(&3));
        assert!(wrapper.peel(&None::<u8>).unwrap().is_none());
        assert!(wrapper.peel(&3_u8).is_err());

        let empty = wrapper.wrap(None).unwrap();
        assert_eq!(empty.downcast_ref::<Option<u8>>(), Some(&None));
        let full = wrapper.wrap(Some(Box::new(4_u8) as Instance)).unwrap();
        assert_eq!(full.downcast_ref::<Option<u8>>(), Some(&Some(4)));
    }

    #[test]
    fn box_wrapper_never_empty() {
        let decl = <Box<i32>>::declare();
        let wrapper = decl.wrapper().unwrap();
        assert_eq!(wrapper.kind(), WrapperKind::Boxed);
        assert!(wrapper.wrap(None).is_err());
        let boxed = wrapper.wrap(Some(Box::new(-1_i32) as Instance)).unwrap();
        assert_eq!(boxed.downcast_ref::<Box<i32>>().map(|b| **b), Some(-1));
    }
}
