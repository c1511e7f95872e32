use alloc::boxed::Box;
use alloc::collections::VecDeque;
use alloc::string::ToString;
use alloc::vec::Vec;
use core::any::Any;
use core::marker::PhantomData;

use crate::Fault;
use crate::decl::{
    Bind, Cursor, Instance, SequenceBuilder, SequenceDecl, SequenceFamily, TypeDecl,
    take_instance,
};
use crate::impls::{GenericTypePathCell, concat};
use crate::info::{TypeHandle, TypePath};

// -----------------------------------------------------------------------------
// Shared plumbing

/// Collections walked and rebuilt through a [`SequenceDecl`].
pub(super) trait Collection: Bind + Sized {
    type Elem: Bind;

    const FAMILY: SequenceFamily;
    const FIXED_LEN: Option<usize> = None;

    fn len(&self) -> usize;

    fn elements(&self) -> impl Iterator<Item = &Self::Elem>;

    fn from_vec(items: Vec<Self::Elem>) -> Result<Self, Fault>;
}

fn size_of<C: Collection>(value: &dyn Any) -> Result<usize, Fault> {
    value
        .downcast_ref::<C>()
        .map(C::len)
        .ok_or_else(Fault::native::<C>)
}

fn make_iterator<C: Collection>(value: &dyn Any) -> Result<Cursor<'_>, Fault> {
    let collection = value.downcast_ref::<C>().ok_or_else(Fault::native::<C>)?;
    Ok(Cursor::new(
        collection.elements().map(|item| item as &dyn Any),
    ))
}

struct Collector<C: Collection> {
    items: Vec<C::Elem>,
    _marker: PhantomData<fn() -> C>,
}

impl<C: Collection> SequenceBuilder for Collector<C> {
    fn put_next(&mut self, element: Instance) -> Result<(), Fault> {
        self.items.push(take_instance::<C::Elem>(element)?);
        Ok(())
    }

    fn finish(self: Box<Self>) -> Result<Instance, Fault> {
        Ok(Box::new(C::from_vec(self.items)?))
    }
}

fn new_builder<C: Collection>(capacity: usize) -> Box<dyn SequenceBuilder> {
    Box::new(Collector::<C> {
        items: Vec::with_capacity(capacity),
        _marker: PhantomData,
    })
}

/// The declaration shared by every [`Collection`].
pub(super) fn collection_decl<C: Collection>() -> TypeDecl {
    let element = TypeHandle::of::<C::Elem>();
    let mut sequence = SequenceDecl::new(
        element,
        C::FAMILY,
        size_of::<C>,
        make_iterator::<C>,
        new_builder::<C>,
    );
    if let Some(len) = C::FIXED_LEN {
        sequence = sequence.with_fixed_len(len);
    }
    TypeDecl::new()
        .with_type_arg(element)
        .with_sequence(sequence)
}

/// Implements [`TypePath`] for a collection with one type parameter.
macro_rules! impl_collection_path {
    ($ty:ident, $module:literal) => {
        impl<T: TypePath> TypePath for $ty<T> {
            fn type_path() -> &'static str {
                static CELL: GenericTypePathCell = GenericTypePathCell::new();
                CELL.get_or_insert::<Self>(|| {
                    concat(&[$module, "::", stringify!($ty), "<", T::type_path(), ">"])
                })
            }

            fn type_name() -> &'static str {
                static CELL: GenericTypePathCell = GenericTypePathCell::new();
                CELL.get_or_insert::<Self>(|| concat(&[stringify!($ty), "<", T::type_name(), ">"]))
            }

            #[inline]
            fn type_ident() -> &'static str {
                stringify!($ty)
            }

            #[inline]
            fn module_path() -> Option<&'static str> {
                Some($module)
            }
        }
    };
}

pub(super) use impl_collection_path;

// -----------------------------------------------------------------------------
// Vec and VecDeque

impl_collection_path!(Vec, "alloc::vec");
impl_collection_path!(VecDeque, "alloc::collections");

impl<T: Bind> Collection for Vec<T> {
    type Elem = T;
    const FAMILY: SequenceFamily = SequenceFamily::Growable;

    #[inline]
    fn len(&self) -> usize {
        Vec::len(self)
    }

    #[inline]
    fn elements(&self) -> impl Iterator<Item = &T> {
        self.iter()
    }

    #[inline]
    fn from_vec(items: Vec<T>) -> Result<Self, Fault> {
        Ok(items)
    }
}

impl<T: Bind> Bind for Vec<T> {
    fn declare() -> TypeDecl {
        collection_decl::<Self>()
    }
}

impl<T: Bind> Collection for VecDeque<T> {
    type Elem = T;
    const FAMILY: SequenceFamily = SequenceFamily::Growable;

    #[inline]
    fn len(&self) -> usize {
        VecDeque::len(self)
    }

    #[inline]
    fn elements(&self) -> impl Iterator<Item = &T> {
        self.iter()
    }

    #[inline]
    fn from_vec(items: Vec<T>) -> Result<Self, Fault> {
        Ok(VecDeque::from(items))
    }
}

impl<T: Bind> Bind for VecDeque<T> {
    fn declare() -> TypeDecl {
        collection_decl::<Self>()
    }
}

// -----------------------------------------------------------------------------
// [T; N]

impl<T: TypePath, const N: usize> TypePath for [T; N] {
    fn type_path() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["[", T::type_path(), "; ", &N.to_string(), "]"]))
    }

    fn type_name() -> &'static str {
        static CELL: GenericTypePathCell = GenericTypePathCell::new();
        CELL.get_or_insert::<Self>(|| concat(&["[", T::type_name(), "; ", &N.to_string(), "]"]))
    }

    #[inline]
    fn type_ident() -> &'static str {
        "array"
    }
}

impl<T: Bind, const N: usize> Collection for [T; N] {
    type Elem = T;
    const FAMILY: SequenceFamily = SequenceFamily::Fixed;
    const FIXED_LEN: Option<usize> = Some(N);

    #[inline]
    fn len(&self) -> usize {
        N
    }

    #[inline]
    fn elements(&self) -> impl Iterator<Item = &T> {
        self.iter()
    }

    fn from_vec(items: Vec<T>) -> Result<Self, Fault> {
        <[T; N]>::try_from(items).map_err(|items| Fault::Length {
            expected: N,
            found: items.len(),
        })
    }
}

impl<T: Bind, const N: usize> Bind for [T; N] {
    fn declare() -> TypeDecl {
        collection_decl::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use crate::Fault;
    use crate::decl::{Bind, Instance, SequenceFamily};
    use crate::info::TypePath;
    use alloc::boxed::Box;
    use alloc::collections::VecDeque;
    use alloc::vec;
    use alloc::vec::Vec;

    #[test]
    fn vec_walk_and_build() {
        let decl = <Vec<u8>>::declare();
        let seq = decl.sequence().unwrap();
        assert_eq!(seq.family(), SequenceFamily::Growable);
        assert_eq!(seq.element().name(), "u8");

        let source = vec![1_u8, 2, 3];
        assert_eq!(seq.size_of(&source), Ok(3));
        let mut cursor = seq.make_iterator(&source).unwrap();
        let mut seen = Vec::new();
        while let Some(item) = cursor.get_next() {
            seen.push(*item.downcast_ref::<u8>().unwrap());
        }
        assert_eq!(seen, source);

        let mut builder = seq.new_builder(2);
        builder.put_next(Box::new(9_u8)).unwrap();
        assert!(builder.put_next(Box::new(9_u16) as Instance).is_err());
        let built = builder.finish().unwrap();
        assert_eq!(built.downcast_ref::<Vec<u8>>(), Some(&vec![9]));
    }

    #[test]
    fn fixed_arrays_check_length() {
        assert_eq!(<[u8; 2]>::type_name(), "[u8; 2]");
        let decl = <[u8; 2]>::declare();
        let seq = decl.sequence().unwrap();
        assert_eq!(seq.fixed_len(), Some(2));

        let mut builder = seq.new_builder(1);
        builder.put_next(Box::new(1_u8)).unwrap();
        assert_eq!(
            builder.finish().err(),
            Some(Fault::Length {
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn deque_paths() {
        assert_eq!(
            <VecDeque<i32>>::type_path(),
            "alloc::collections::VecDeque<i32>"
        );
        assert_eq!(<Vec<Vec<u8>>>::type_name(), "Vec<Vec<u8>>");
    }
}
