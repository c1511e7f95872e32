use core::time::Duration;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use alloc::format;
use alloc::string::String;

use crate::Fault;
use crate::decl::{Bind, TypeDecl};
use crate::info::TypePath;
use crate::scalar::ScalarCodec;

macro_rules! impl_type_path {
    ($ty:ty, $module:literal, $name:literal) => {
        impl TypePath for $ty {
            #[inline]
            fn type_path() -> &'static str {
                concat!($module, "::", $name)
            }

            #[inline]
            fn type_name() -> &'static str {
                $name
            }

            #[inline]
            fn type_ident() -> &'static str {
                $name
            }

            #[inline]
            fn module_path() -> Option<&'static str> {
                Some($module)
            }
        }
    };
}

impl_type_path!(Duration, "core::time", "Duration");
impl_type_path!(SystemTime, "std::time", "SystemTime");
impl_type_path!(PathBuf, "std::path", "PathBuf");

fn nanos<T>(duration: Duration) -> Result<T, Fault>
where
    T: TryFrom<u128>,
{
    let nanos = duration.as_nanos();
    T::try_from(nanos).map_err(|_| Fault::OutOfRange {
        target: core::any::type_name::<T>(),
        value: format!("{nanos}ns"),
    })
}

impl Bind for Duration {
    fn declare() -> TypeDecl {
        TypeDecl::new().with_scalar(ScalarCodec::bridge::<Duration, u64>(
            |d| nanos::<u64>(*d),
            |n| Ok(Duration::from_nanos(n)),
        ))
    }
}

fn system_time_to_nanos(time: &SystemTime) -> Result<i64, Fault> {
    match time.duration_since(UNIX_EPOCH) {
        Ok(after) => nanos::<i64>(after),
        Err(before) => nanos::<i64>(before.duration()).map(|n| -n),
    }
}

fn system_time_from_nanos(nanos: i64) -> Result<SystemTime, Fault> {
    let offset = Duration::from_nanos(nanos.unsigned_abs());
    let time = if nanos >= 0 {
        UNIX_EPOCH.checked_add(offset)
    } else {
        UNIX_EPOCH.checked_sub(offset)
    };
    time.ok_or_else(|| Fault::OutOfRange {
        target: "std::time::SystemTime",
        value: format!("{nanos}ns"),
    })
}

impl Bind for SystemTime {
    fn declare() -> TypeDecl {
        TypeDecl::new().with_scalar(ScalarCodec::bridge::<SystemTime, i64>(
            system_time_to_nanos,
            system_time_from_nanos,
        ))
    }
}

impl Bind for PathBuf {
    fn declare() -> TypeDecl {
        TypeDecl::new().with_scalar(ScalarCodec::bridge::<PathBuf, String>(
            |path| {
                path.to_str()
                    .map(String::from)
                    .ok_or_else(|| Fault::custom("path is not valid UTF-8"))
            },
            |text| Ok(PathBuf::from(text)),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::{system_time_from_nanos, system_time_to_nanos};
    use crate::decl::Bind;
    use crate::value::Value;
    use core::time::Duration;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn duration_is_nanoseconds() {
        let decl = Duration::declare();
        let codec = decl.scalar().unwrap();
        assert_eq!(
            codec.encode(&Duration::from_millis(3)),
            Ok(Value::UInt(3_000_000))
        );
        let back = codec.decode(Value::UInt(7)).unwrap();
        assert_eq!(back.downcast_ref::<Duration>(), Some(&Duration::from_nanos(7)));
    }

    #[test]
    fn system_time_before_epoch() {
        let before = UNIX_EPOCH - Duration::from_secs(2);
        let nanos = system_time_to_nanos(&before).unwrap();
        assert_eq!(nanos, -2_000_000_000);
        assert_eq!(system_time_from_nanos(nanos), Ok(before));

        let now = SystemTime::now();
        let nanos = system_time_to_nanos(&now).unwrap();
        assert_eq!(system_time_from_nanos(nanos), Ok(now));
    }

    #[test]
    fn path_is_string() {
        let decl = PathBuf::declare();
        let codec = decl.scalar().unwrap();
        assert_eq!(
            codec.encode(&PathBuf::from("a/b.txt")),
            Ok(Value::from("a/b.txt"))
        );
    }
}
