//! Types module: expression result types, scalar values, and the return-type
//! resolution rules applied when a CDT read expression is built.

use crate::ops::{ListReturnType, MapReturnType};
use crate::RecwireError;
use serde::{Deserialize, Serialize};

/// Result type of an expression, as understood by the native evaluator.
///
/// `Auto` defers the choice to the return-type resolution rules; every other
/// variant names a concrete bin/value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ExpType {
    Nil = 0,
    Bool = 1,
    Int = 2,
    Str = 3,
    List = 4,
    Map = 5,
    Blob = 6,
    Float = 7,
    Geo = 8,
    Hll = 9,
    Auto = 10,
}

impl ExpType {
    pub const fn code(self) -> i64 {
        self as i64
    }
}

/// A scalar value carried by context selectors and operation descriptors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    List(Vec<Value>),
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Bytes(v.to_vec())
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::List(v)
    }
}

const TYPE_MISMATCH: &str =
    "either set the value type as auto or match with return object data type";

/// Resolves the concrete result type of a list read operation.
///
/// Strips the INVERTED bit from `return_type`, computes the type the verb will
/// produce, and checks it against the caller's `requested` hint. `requested`
/// must be [`ExpType::Auto`] or equal to the computed type.
pub fn resolve_list_type(
    requested: ExpType,
    return_type: ListReturnType,
    multi: bool,
) -> Result<ExpType, RecwireError> {
    let expected = match ListReturnType(return_type.base()) {
        ListReturnType::INDEX
        | ListReturnType::REVERSE_INDEX
        | ListReturnType::RANK
        | ListReturnType::REVERSE_RANK => {
            if multi {
                ExpType::List
            } else {
                ExpType::Int
            }
        }
        ListReturnType::COUNT => ExpType::Int,
        ListReturnType::VALUE => {
            if multi {
                ExpType::List
            } else {
                requested
            }
        }
        ListReturnType::EXISTS => ExpType::Bool,
        _ => return Err(RecwireError::Type(TYPE_MISMATCH.to_string())),
    };
    if requested == ExpType::Auto || requested == expected {
        Ok(expected)
    } else {
        Err(RecwireError::Type(TYPE_MISMATCH.to_string()))
    }
}

/// Resolves the concrete result type of a map read operation.
///
/// Same rules as [`resolve_list_type`], with KEY behaving like VALUE and
/// KEY_VALUE always producing a map.
pub fn resolve_map_type(
    requested: ExpType,
    return_type: MapReturnType,
    multi: bool,
) -> Result<ExpType, RecwireError> {
    let expected = match MapReturnType(return_type.base()) {
        MapReturnType::INDEX
        | MapReturnType::REVERSE_INDEX
        | MapReturnType::RANK
        | MapReturnType::REVERSE_RANK => {
            if multi {
                ExpType::List
            } else {
                ExpType::Int
            }
        }
        MapReturnType::COUNT => ExpType::Int,
        MapReturnType::KEY | MapReturnType::VALUE => {
            if multi {
                ExpType::List
            } else {
                requested
            }
        }
        MapReturnType::KEY_VALUE => ExpType::Map,
        MapReturnType::EXISTS => ExpType::Bool,
        _ => return Err(RecwireError::Type(TYPE_MISMATCH.to_string())),
    };
    if requested == ExpType::Auto || requested == expected {
        Ok(expected)
    } else {
        Err(RecwireError::Type(TYPE_MISMATCH.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_count_resolves_to_int() {
        let ty = resolve_list_type(ExpType::Auto, ListReturnType::COUNT, false).unwrap();
        assert_eq!(ty, ExpType::Int);
        // Multi-result does not change COUNT.
        let ty = resolve_list_type(ExpType::Auto, ListReturnType::COUNT, true).unwrap();
        assert_eq!(ty, ExpType::Int);
    }

    #[test]
    fn test_list_index_rank_depend_on_multi() {
        for rt in [
            ListReturnType::INDEX,
            ListReturnType::REVERSE_INDEX,
            ListReturnType::RANK,
            ListReturnType::REVERSE_RANK,
        ] {
            assert_eq!(
                resolve_list_type(ExpType::Auto, rt, false).unwrap(),
                ExpType::Int
            );
            assert_eq!(
                resolve_list_type(ExpType::Auto, rt, true).unwrap(),
                ExpType::List
            );
        }
    }

    #[test]
    fn test_list_value_single_keeps_requested() {
        let ty = resolve_list_type(ExpType::Str, ListReturnType::VALUE, false).unwrap();
        assert_eq!(ty, ExpType::Str);
        let ty = resolve_list_type(ExpType::Auto, ListReturnType::VALUE, true).unwrap();
        assert_eq!(ty, ExpType::List);
    }

    #[test]
    fn test_list_mismatch_is_type_error() {
        let err = resolve_list_type(ExpType::Str, ListReturnType::COUNT, false).unwrap_err();
        assert!(matches!(err, RecwireError::Type(_)));
    }

    #[test]
    fn test_list_none_rejected() {
        assert!(resolve_list_type(ExpType::Auto, ListReturnType::NONE, false).is_err());
    }

    #[test]
    fn test_inverted_bit_is_stripped() {
        let ty = resolve_list_type(ExpType::Auto, ListReturnType::COUNT.inverted(), false).unwrap();
        assert_eq!(ty, ExpType::Int);
        let ty = resolve_map_type(ExpType::Auto, MapReturnType::KEY.inverted(), true).unwrap();
        assert_eq!(ty, ExpType::List);
    }

    #[test]
    fn test_map_key_value_resolves_to_map() {
        assert_eq!(
            resolve_map_type(ExpType::Auto, MapReturnType::KEY_VALUE, true).unwrap(),
            ExpType::Map
        );
        assert_eq!(
            resolve_map_type(ExpType::Map, MapReturnType::KEY_VALUE, false).unwrap(),
            ExpType::Map
        );
    }

    #[test]
    fn test_map_key_behaves_like_value() {
        assert_eq!(
            resolve_map_type(ExpType::Int, MapReturnType::KEY, false).unwrap(),
            ExpType::Int
        );
        assert_eq!(
            resolve_map_type(ExpType::Auto, MapReturnType::KEY, true).unwrap(),
            ExpType::List
        );
    }

    #[test]
    fn test_map_none_rejected() {
        let err = resolve_map_type(ExpType::Auto, MapReturnType::NONE, true).unwrap_err();
        assert!(matches!(err, RecwireError::Type(_)));
    }

    #[test]
    fn test_exists_resolves_to_bool() {
        assert_eq!(
            resolve_list_type(ExpType::Auto, ListReturnType::EXISTS, true).unwrap(),
            ExpType::Bool
        );
        assert_eq!(
            resolve_map_type(ExpType::Bool, MapReturnType::EXISTS, false).unwrap(),
            ExpType::Bool
        );
    }

    #[test]
    fn test_resolution_is_deterministic() {
        for _ in 0..3 {
            assert_eq!(
                resolve_list_type(ExpType::Auto, ListReturnType::VALUE, true).unwrap(),
                ExpType::List
            );
        }
    }

    #[test]
    fn test_value_conversions() {
        assert_eq!(Value::from(42i64), Value::Int(42));
        assert_eq!(Value::from("key"), Value::Str("key".to_string()));
        assert_eq!(Value::from(vec![1u8, 2]), Value::Bytes(vec![1, 2]));
    }
}
