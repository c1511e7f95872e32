use alloc::string::String;

use crate::decl::{Bind, Primitive, TypeDecl};
use crate::info::TypePath;
use crate::scalar::ScalarCodec;

macro_rules! impl_primitive {
    ($($ty:ident => $flavor:ident),* $(,)?) => {$(
        impl TypePath for $ty {
            #[inline]
            fn type_path() -> &'static str {
                stringify!($ty)
            }

            #[inline]
            fn type_name() -> &'static str {
                stringify!($ty)
            }

            #[inline]
            fn type_ident() -> &'static str {
                stringify!($ty)
            }
        }

        impl Bind for $ty {
            fn declare() -> TypeDecl {
                TypeDecl::new()
                    .with_primitive(Primitive::$flavor)
                    .with_scalar(ScalarCodec::identity::<$ty>())
            }
        }
    )*};
}

impl_primitive! {
    bool => Bool,
    char => Char,
    i8 => Integer,
    i16 => Integer,
    i32 => Integer,
    u8 => Integer,
    u16 => Integer,
    u32 => Integer,
    i64 => Long,
    u64 => Long,
    isize => Long,
    usize => Long,
    f32 => Double,
    f64 => Double,
}

impl TypePath for String {
    #[inline]
    fn type_path() -> &'static str {
        "alloc::string::String"
    }

    #[inline]
    fn type_name() -> &'static str {
        "String"
    }

    #[inline]
    fn type_ident() -> &'static str {
        "String"
    }

    #[inline]
    fn module_path() -> Option<&'static str> {
        Some("alloc::string")
    }
}

impl Bind for String {
    fn declare() -> TypeDecl {
        TypeDecl::new().with_scalar(ScalarCodec::identity::<String>())
    }
}

#[cfg(test)]
mod tests {
    use crate::decl::{Bind, Primitive};
    use crate::info::TypePath;
    use alloc::string::String;

    #[test]
    fn primitive_declarations() {
        assert_eq!(u16::declare().primitive(), Some(Primitive::Integer));
        assert_eq!(usize::declare().primitive(), Some(Primitive::Long));
        assert_eq!(f32::declare().primitive(), Some(Primitive::Double));
        assert!(String::declare().primitive().is_none());
        assert!(String::declare().scalar().is_some());
        assert_eq!(<i64 as TypePath>::type_path(), "i64");
        assert_eq!(String::module_path(), Some("alloc::string"));
    }
}
