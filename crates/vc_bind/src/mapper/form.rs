use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use crate::Fault;
use crate::descriptor::RecordInfo;
use crate::value::Value;

/// The key carrying the member tag of a union value in map form.
pub const TYPE_KEY: &str = "type";

/// The key carrying a non-record member value in map form.
pub const VALUE_KEY: &str = "value";

/// The tag of an absent union value in array form.
pub const NULL_TAG: &str = "null";

/// The layout of records and unions in a carrier form.
///
/// Atoms and arrays look the same in every form.
pub(crate) trait Form: 'static {
    /// Lays out one optional value per field, in field order.
    fn write_record(info: &RecordInfo, values: Vec<Option<Value>>) -> Value;

    /// Splits a record value into one optional value per field.
    fn read_record(info: &RecordInfo, value: Value) -> Result<Vec<Option<Value>>, Fault>;

    /// The representation of an empty slot, `None` to leave it out.
    fn absent(is_union: bool) -> Option<Value>;

    fn is_absent(value: &Value, is_union: bool) -> bool;

    fn write_union(tag: &str, value: Value, member_is_record: bool) -> Result<Value, Fault>;

    /// Splits a union value into its tag and payload.
    fn read_union(value: Value) -> Result<(String, Value), Fault>;

    /// Extracts the member value from a payload returned by `read_union`.
    fn member_payload(member_is_record: bool, payload: Value) -> Result<Value, Fault>;
}

// -----------------------------------------------------------------------------
// ArrayForm

/// Dense and positional: records are sequences of `len(fields)` values,
/// unions are `[tag, value]` pairs.
pub(crate) struct ArrayForm;

fn null_union() -> Value {
    Value::Seq(vec![Value::Str(String::from(NULL_TAG)), Value::Null])
}

fn is_null_union(value: &Value) -> bool {
    matches!(value.as_seq(), Some([Value::Str(tag), Value::Null]) if tag == NULL_TAG)
}

impl Form for ArrayForm {
    fn write_record(_: &RecordInfo, values: Vec<Option<Value>>) -> Value {
        Value::Seq(values.into_iter().map(Option::unwrap_or_default).collect())
    }

    fn read_record(info: &RecordInfo, value: Value) -> Result<Vec<Option<Value>>, Fault> {
        let Value::Seq(items) = value else {
            return Err(Fault::Mismatch {
                expected: "sequence",
                found: value.kind_name(),
            });
        };
        if items.len() != info.len() {
            return Err(Fault::Length {
                expected: info.len(),
                found: items.len(),
            });
        }
        Ok(items.into_iter().map(Some).collect())
    }

    fn absent(is_union: bool) -> Option<Value> {
        Some(if is_union { null_union() } else { Value::Null })
    }

    fn is_absent(value: &Value, is_union: bool) -> bool {
        value.is_null() || (is_union && is_null_union(value))
    }

    fn write_union(tag: &str, value: Value, _: bool) -> Result<Value, Fault> {
        Ok(Value::Seq(vec![Value::Str(String::from(tag)), value]))
    }

    fn read_union(value: Value) -> Result<(String, Value), Fault> {
        if is_null_union(&value) {
            return Err(Fault::Mismatch {
                expected: "union value",
                found: "null",
            });
        }
        let Value::Seq(items) = value else {
            return Err(Fault::Mismatch {
                expected: "[tag, value] pair",
                found: value.kind_name(),
            });
        };
        let found = items.len();
        let Ok([tag, payload]) = <[Value; 2]>::try_from(items) else {
            return Err(Fault::Length { expected: 2, found });
        };
        match tag {
            Value::Str(tag) => Ok((tag, payload)),
            other => Err(Fault::Mismatch {
                expected: "string tag",
                found: other.kind_name(),
            }),
        }
    }

    #[inline]
    fn member_payload(_: bool, payload: Value) -> Result<Value, Fault> {
        Ok(payload)
    }
}

// -----------------------------------------------------------------------------
// MapForm

/// Sparse and keyed: records are maps without keys for absent fields,
/// unions carry their tag under [`TYPE_KEY`].
pub(crate) struct MapForm;

impl Form for MapForm {
    fn write_record(info: &RecordInfo, values: Vec<Option<Value>>) -> Value {
        let entries = info
            .fields()
            .iter()
            .zip(values)
            .filter_map(|(field, value)| Some((String::from(field.name()), value?)))
            .collect();
        Value::Map(entries)
    }

    fn read_record(info: &RecordInfo, value: Value) -> Result<Vec<Option<Value>>, Fault> {
        let Value::Map(mut entries) = value else {
            return Err(Fault::Mismatch {
                expected: "map",
                found: value.kind_name(),
            });
        };
        Ok(info
            .fields()
            .iter()
            .map(|field| entries.remove(field.name()))
            .collect())
    }

    #[inline]
    fn absent(_: bool) -> Option<Value> {
        None
    }

    #[inline]
    fn is_absent(value: &Value, _: bool) -> bool {
        value.is_null()
    }

    fn write_union(tag: &str, value: Value, member_is_record: bool) -> Result<Value, Fault> {
        if !member_is_record {
            let mut entries = BTreeMap::new();
            entries.insert(String::from(TYPE_KEY), Value::Str(String::from(tag)));
            entries.insert(String::from(VALUE_KEY), value);
            return Ok(Value::Map(entries));
        }

        let Value::Map(mut entries) = value else {
            return Err(Fault::Mismatch {
                expected: "map",
                found: value.kind_name(),
            });
        };
        if entries.contains_key(TYPE_KEY) {
            return Err(Fault::custom(format_args!(
                "member `{tag}` has a `{TYPE_KEY}` field, which collides with the union tag"
            )));
        }
        entries.insert(String::from(TYPE_KEY), Value::Str(String::from(tag)));
        Ok(Value::Map(entries))
    }

    fn read_union(value: Value) -> Result<(String, Value), Fault> {
        let Value::Map(mut entries) = value else {
            return Err(Fault::Mismatch {
                expected: "map",
                found: value.kind_name(),
            });
        };
        match entries.remove(TYPE_KEY) {
            Some(Value::Str(tag)) => Ok((tag, Value::Map(entries))),
            Some(other) => Err(Fault::Mismatch {
                expected: "string tag",
                found: other.kind_name(),
            }),
            None => Err(Fault::MissingTypeKey),
        }
    }

    fn member_payload(member_is_record: bool, payload: Value) -> Result<Value, Fault> {
        if member_is_record {
            return Ok(payload);
        }
        match payload {
            Value::Map(mut entries) => entries
                .remove(VALUE_KEY)
                .ok_or(Fault::MissingRequired { field: VALUE_KEY }),
            other => Err(Fault::Mismatch {
                expected: "map",
                found: other.kind_name(),
            }),
        }
    }
}
