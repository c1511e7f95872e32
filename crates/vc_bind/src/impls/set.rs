use alloc::collections::BTreeSet;
use alloc::format;
use alloc::vec::Vec;
use core::hash::Hash;

use crate::Fault;
use crate::decl::{Bind, SequenceFamily, TypeDecl};
use crate::impls::sequence::{Collection, collection_decl, impl_collection_path};
use crate::impls::{GenericTypePathCell, concat};
use crate::info::TypePath;

type StdHashSet<T> = std::collections::HashSet<T>;
type FixedHashSet<T> = vc_utils::hash::HashSet<T>;

fn check_distinct(expected: usize, found: usize) -> Result<(), Fault> {
    if expected == found {
        Ok(())
    } else {
        Err(Fault::custom(format!(
            "set received {expected} elements but only {found} are distinct"
        )))
    }
}

impl_collection_path!(BTreeSet, "alloc::collections");

impl<T: Bind + Ord> Collection for BTreeSet<T> {
    type Elem = T;
    const FAMILY: SequenceFamily = SequenceFamily::Set;

    #[inline]
    fn len(&self) -> usize {
        BTreeSet::len(self)
    }

    #[inline]
    fn elements(&self) -> impl Iterator<Item = &T> {
        self.iter()
    }

    fn from_vec(items: Vec<T>) -> Result<Self, Fault> {
        let expected = items.len();
        let set: BTreeSet<T> = items.into_iter().collect();
        check_distinct(expected, set.len())?;
        Ok(set)
    }
}

impl<T: Bind + Ord> Bind for BTreeSet<T> {
    fn declare() -> TypeDecl {
        collection_decl::<Self>()
    }
}

macro_rules! impl_hash_set {
    ($alias:ident, $path:literal, $module:literal) => {
        impl<T: TypePath> TypePath for $alias<T> {
            fn type_path() -> &'static str {
                static CELL: GenericTypePathCell = GenericTypePathCell::new();
                CELL.get_or_insert::<Self>(|| concat(&[$path, "<", T::type_path(), ">"]))
            }

            fn type_name() -> &'static str {
                static CELL: GenericTypePathCell = GenericTypePathCell::new();
                CELL.get_or_insert::<Self>(|| concat(&["HashSet<", T::type_name(), ">"]))
            }

            #[inline]
            fn type_ident() -> &'static str {
                "HashSet"
            }

            #[inline]
            fn module_path() -> Option<&'static str> {
                Some($module)
            }
        }

        impl<T: Bind + Eq + Hash> Collection for $alias<T> {
            type Elem = T;
            const FAMILY: SequenceFamily = SequenceFamily::Set;

            #[inline]
            fn len(&self) -> usize {
                $alias::len(self)
            }

            #[inline]
            fn elements(&self) -> impl Iterator<Item = &T> {
                self.iter()
            }

            fn from_vec(items: Vec<T>) -> Result<Self, Fault> {
                let expected = items.len();
                let mut set = $alias::with_capacity_and_hasher(expected, Default::default());
                set.extend(items);
                check_distinct(expected, set.len())?;
                Ok(set)
            }
        }

        impl<T: Bind + Eq + Hash> Bind for $alias<T> {
            fn declare() -> TypeDecl {
                collection_decl::<Self>()
            }
        }
    };
}

impl_hash_set!(StdHashSet, "std::collections::HashSet", "std::collections");
impl_hash_set!(FixedHashSet, "vc_utils::hash::HashSet", "vc_utils::hash");

#[cfg(test)]
mod tests {
    use crate::decl::{Bind, Instance, SequenceFamily};
    use crate::info::TypePath;
    use alloc::boxed::Box;
    use alloc::collections::BTreeSet;

    #[test]
    fn sets_reject_duplicates() {
        let decl = <BTreeSet<u8>>::declare();
        let seq = decl.sequence().unwrap();
        assert_eq!(seq.family(), SequenceFamily::Set);

        let mut builder = seq.new_builder(2);
        builder.put_next(Box::new(1_u8) as Instance).unwrap();
        builder.put_next(Box::new(1_u8) as Instance).unwrap();
        assert!(builder.finish().is_err());

        let mut builder = seq.new_builder(2);
        builder.put_next(Box::new(2_u8) as Instance).unwrap();
        builder.put_next(Box::new(1_u8) as Instance).unwrap();
        let set = builder.finish().unwrap();
        assert_eq!(
            set.downcast_ref::<BTreeSet<u8>>(),
            Some(&BTreeSet::from([1, 2]))
        );
    }

    #[test]
    fn hash_set_paths() {
        assert_eq!(
            <std::collections::HashSet<u8>>::type_path(),
            "std::collections::HashSet<u8>"
        );
        assert_eq!(
            <vc_utils::hash::HashSet<u8>>::type_path(),
            "vc_utils::hash::HashSet<u8>"
        );
        let decl = <vc_utils::hash::HashSet<i32>>::declare();
        assert_eq!(decl.sequence().map(|s| s.element().path()), Some("i32"));
    }
}
