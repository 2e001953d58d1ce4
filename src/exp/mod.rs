//! Expression builders: the public combinator API.
//!
//! Every builder is a pure function from typed arguments to a
//! [`FilterExpression`]; sub-expressions nest by concatenation. Binary
//! operators declare a fixed operand count, variadic operators are closed by a
//! sentinel, and CDT sub-expressions live in the [`lists`], [`maps`], [`bit`]
//! and [`hll`] sub-modules.

pub mod bit;
pub mod hll;
pub mod lists;
pub mod maps;

use crate::instruction::{self, FilterExpression, Instruction, InstrValue};
use crate::ops::ExpOp;
use crate::types::ExpType;

// ---------------------------------------------------------------------------
// Value literals
// ---------------------------------------------------------------------------

pub fn bool_val(value: bool) -> FilterExpression {
    vec![Instruction::Value(InstrValue::Bool(value))]
}

pub fn int_val(value: i64) -> FilterExpression {
    vec![Instruction::Value(InstrValue::Int(value))]
}

pub fn uint_val(value: u64) -> FilterExpression {
    vec![Instruction::Value(InstrValue::Uint(value))]
}

pub fn float_val(value: f64) -> FilterExpression {
    vec![Instruction::Value(InstrValue::Float(value))]
}

pub fn str_val(value: impl Into<String>) -> FilterExpression {
    vec![Instruction::Value(InstrValue::Str(value.into()))]
}

/// A byte-blob literal. `size` is the number of bytes the native layer reads
/// out of `value`.
pub fn bytes_val(value: impl Into<Vec<u8>>, size: usize) -> FilterExpression {
    vec![Instruction::Value(InstrValue::Bytes {
        value: value.into(),
        size,
    })]
}

/// A GeoJSON literal.
pub fn geo_val(value: impl Into<String>) -> FilterExpression {
    vec![Instruction::Value(InstrValue::Geo(value.into()))]
}

pub fn nil() -> FilterExpression {
    instruction::nil()
}

// ---------------------------------------------------------------------------
// Record key
// ---------------------------------------------------------------------------

fn key_type(ty: ExpType) -> FilterExpression {
    let mut seq = vec![Instruction::Header {
        op: ExpOp::Key,
        count: 2,
    }];
    seq.extend(instruction::int(ty.code()));
    seq
}

/// The record's user key, read as an integer.
pub fn key_int() -> FilterExpression {
    key_type(ExpType::Int)
}

/// The record's user key, read as a string.
pub fn key_str() -> FilterExpression {
    key_type(ExpType::Str)
}

/// The record's user key, read as a blob.
pub fn key_blob() -> FilterExpression {
    key_type(ExpType::Blob)
}

/// Whether the record was stored with its user key.
pub fn key_exist() -> FilterExpression {
    vec![Instruction::Header {
        op: ExpOp::KeyExist,
        count: 1,
    }]
}

// ---------------------------------------------------------------------------
// Bins
// ---------------------------------------------------------------------------

fn bin_typed(ty: ExpType, name: impl Into<String>) -> FilterExpression {
    let mut seq = vec![Instruction::Header {
        op: ExpOp::Bin,
        count: 3,
    }];
    seq.extend(instruction::int(ty.code()));
    seq.extend(instruction::raw_str(name));
    seq
}

pub fn bin_bool(name: impl Into<String>) -> FilterExpression {
    bin_typed(ExpType::Bool, name)
}

pub fn bin_int(name: impl Into<String>) -> FilterExpression {
    bin_typed(ExpType::Int, name)
}

pub fn bin_float(name: impl Into<String>) -> FilterExpression {
    bin_typed(ExpType::Float, name)
}

pub fn bin_str(name: impl Into<String>) -> FilterExpression {
    bin_typed(ExpType::Str, name)
}

pub fn bin_blob(name: impl Into<String>) -> FilterExpression {
    bin_typed(ExpType::Blob, name)
}

pub fn bin_geo(name: impl Into<String>) -> FilterExpression {
    bin_typed(ExpType::Geo, name)
}

pub fn bin_list(name: impl Into<String>) -> FilterExpression {
    bin_typed(ExpType::List, name)
}

pub fn bin_map(name: impl Into<String>) -> FilterExpression {
    bin_typed(ExpType::Map, name)
}

pub fn bin_hll(name: impl Into<String>) -> FilterExpression {
    bin_typed(ExpType::Hll, name)
}

/// The stored type of a bin, as an integer tag.
pub fn bin_type(name: impl Into<String>) -> FilterExpression {
    let mut seq = vec![Instruction::Header {
        op: ExpOp::BinType,
        count: 2,
    }];
    seq.extend(instruction::raw_str(name));
    seq
}

/// Whether the named bin holds a value.
pub fn bin_exists(name: impl Into<String>) -> FilterExpression {
    ne(bin_type(name), int_val(0))
}

// ---------------------------------------------------------------------------
// Record metadata
// ---------------------------------------------------------------------------

fn meta(op: ExpOp) -> FilterExpression {
    vec![Instruction::Bare { op }]
}

/// Name of the set the record belongs to.
pub fn set_name() -> FilterExpression {
    meta(ExpOp::SetName)
}

/// Record storage size on device, in bytes.
pub fn device_size() -> FilterExpression {
    meta(ExpOp::DeviceSize)
}

/// Record storage size in memory, in bytes.
pub fn memory_size() -> FilterExpression {
    meta(ExpOp::MemorySize)
}

/// Record storage size, regardless of storage medium.
pub fn record_size() -> FilterExpression {
    meta(ExpOp::RecordSize)
}

/// Time of last record update, nanoseconds since epoch.
pub fn last_update() -> FilterExpression {
    meta(ExpOp::LastUpdate)
}

/// Seconds elapsed since the last record update.
pub fn since_update() -> FilterExpression {
    meta(ExpOp::SinceUpdate)
}

/// Record expiration time, seconds since epoch.
pub fn void_time() -> FilterExpression {
    meta(ExpOp::VoidTime)
}

/// Seconds until the record expires.
pub fn ttl() -> FilterExpression {
    meta(ExpOp::Ttl)
}

/// Whether the record is a tombstone.
pub fn is_tombstone() -> FilterExpression {
    meta(ExpOp::IsTombstone)
}

/// The record digest modulo `modulus`, for partitioning scans client-side.
pub fn digest_modulo(modulus: i64) -> FilterExpression {
    instruction::fixed(ExpOp::DigestModulo, [instruction::int(modulus)])
}

// ---------------------------------------------------------------------------
// Comparisons
// ---------------------------------------------------------------------------

pub fn eq(left: FilterExpression, right: FilterExpression) -> FilterExpression {
    instruction::fixed(ExpOp::CmpEq, [left, right])
}

pub fn ne(left: FilterExpression, right: FilterExpression) -> FilterExpression {
    instruction::fixed(ExpOp::CmpNe, [left, right])
}

pub fn gt(left: FilterExpression, right: FilterExpression) -> FilterExpression {
    instruction::fixed(ExpOp::CmpGt, [left, right])
}

pub fn ge(left: FilterExpression, right: FilterExpression) -> FilterExpression {
    instruction::fixed(ExpOp::CmpGe, [left, right])
}

pub fn lt(left: FilterExpression, right: FilterExpression) -> FilterExpression {
    instruction::fixed(ExpOp::CmpLt, [left, right])
}

pub fn le(left: FilterExpression, right: FilterExpression) -> FilterExpression {
    instruction::fixed(ExpOp::CmpLe, [left, right])
}

/// Matches a string expression against a POSIX regex, evaluated natively.
/// `options` is an OR of [`crate::ops::regex_flags`] values.
pub fn cmp_regex(
    options: i64,
    regex: impl Into<String>,
    cmp_str: FilterExpression,
) -> FilterExpression {
    instruction::fixed(
        ExpOp::CmpRegex,
        [instruction::int(options), instruction::raw_str(regex), cmp_str],
    )
}

/// Whether two geo expressions intersect.
pub fn cmp_geo(left: FilterExpression, right: FilterExpression) -> FilterExpression {
    instruction::fixed(ExpOp::CmpGeo, [left, right])
}

// ---------------------------------------------------------------------------
// Logical operators
// ---------------------------------------------------------------------------

pub fn and(exprs: impl IntoIterator<Item = FilterExpression>) -> FilterExpression {
    instruction::varargs(ExpOp::And, exprs)
}

pub fn or(exprs: impl IntoIterator<Item = FilterExpression>) -> FilterExpression {
    instruction::varargs(ExpOp::Or, exprs)
}

pub fn not(expr: FilterExpression) -> FilterExpression {
    instruction::fixed(ExpOp::Not, [expr])
}

/// True when exactly zero or one of the operands is true.
pub fn exclusive(exprs: impl IntoIterator<Item = FilterExpression>) -> FilterExpression {
    instruction::varargs(ExpOp::Exclusive, exprs)
}

// ---------------------------------------------------------------------------
// Arithmetic
// ---------------------------------------------------------------------------

pub fn add(exprs: impl IntoIterator<Item = FilterExpression>) -> FilterExpression {
    instruction::varargs(ExpOp::Add, exprs)
}

pub fn sub(exprs: impl IntoIterator<Item = FilterExpression>) -> FilterExpression {
    instruction::varargs(ExpOp::Sub, exprs)
}

pub fn mul(exprs: impl IntoIterator<Item = FilterExpression>) -> FilterExpression {
    instruction::varargs(ExpOp::Mul, exprs)
}

pub fn div(exprs: impl IntoIterator<Item = FilterExpression>) -> FilterExpression {
    instruction::varargs(ExpOp::Div, exprs)
}

pub fn pow(base: FilterExpression, exponent: FilterExpression) -> FilterExpression {
    instruction::fixed(ExpOp::Pow, [base, exponent])
}

pub fn log(num: FilterExpression, base: FilterExpression) -> FilterExpression {
    instruction::fixed(ExpOp::Log, [num, base])
}

/// Remainder of integer division. Named for the operator; `mod` is reserved.
pub fn modulo(numerator: FilterExpression, denominator: FilterExpression) -> FilterExpression {
    instruction::fixed(ExpOp::Mod, [numerator, denominator])
}

pub fn abs(value: FilterExpression) -> FilterExpression {
    instruction::fixed(ExpOp::Abs, [value])
}

pub fn floor(value: FilterExpression) -> FilterExpression {
    instruction::fixed(ExpOp::Floor, [value])
}

pub fn ceil(value: FilterExpression) -> FilterExpression {
    instruction::fixed(ExpOp::Ceil, [value])
}

pub fn to_int(value: FilterExpression) -> FilterExpression {
    instruction::fixed(ExpOp::ToInt, [value])
}

pub fn to_float(value: FilterExpression) -> FilterExpression {
    instruction::fixed(ExpOp::ToFloat, [value])
}

pub fn min(exprs: impl IntoIterator<Item = FilterExpression>) -> FilterExpression {
    instruction::varargs(ExpOp::Min, exprs)
}

pub fn max(exprs: impl IntoIterator<Item = FilterExpression>) -> FilterExpression {
    instruction::varargs(ExpOp::Max, exprs)
}

// ---------------------------------------------------------------------------
// Integer bitwise operators
// ---------------------------------------------------------------------------

pub fn int_and(exprs: impl IntoIterator<Item = FilterExpression>) -> FilterExpression {
    instruction::varargs(ExpOp::IntAnd, exprs)
}

pub fn int_or(exprs: impl IntoIterator<Item = FilterExpression>) -> FilterExpression {
    instruction::varargs(ExpOp::IntOr, exprs)
}

pub fn int_xor(exprs: impl IntoIterator<Item = FilterExpression>) -> FilterExpression {
    instruction::varargs(ExpOp::IntXor, exprs)
}

pub fn int_not(value: FilterExpression) -> FilterExpression {
    instruction::fixed(ExpOp::IntNot, [value])
}

pub fn int_lshift(value: FilterExpression, shift: FilterExpression) -> FilterExpression {
    instruction::fixed(ExpOp::IntLshift, [value, shift])
}

pub fn int_rshift(value: FilterExpression, shift: FilterExpression) -> FilterExpression {
    instruction::fixed(ExpOp::IntRshift, [value, shift])
}

/// Arithmetic (sign-preserving) right shift.
pub fn int_arshift(value: FilterExpression, shift: FilterExpression) -> FilterExpression {
    instruction::fixed(ExpOp::IntArshift, [value, shift])
}

/// Number of set bits.
pub fn int_count(value: FilterExpression) -> FilterExpression {
    instruction::fixed(ExpOp::IntCount, [value])
}

/// Index of the first bit equal to `search`, scanning from the left.
pub fn int_lscan(value: FilterExpression, search: FilterExpression) -> FilterExpression {
    instruction::fixed(ExpOp::IntLscan, [value, search])
}

/// Index of the first bit equal to `search`, scanning from the right.
pub fn int_rscan(value: FilterExpression, search: FilterExpression) -> FilterExpression {
    instruction::fixed(ExpOp::IntRscan, [value, search])
}

// ---------------------------------------------------------------------------
// Flow control and variables
// ---------------------------------------------------------------------------

/// Multi-way conditional: alternating (condition, action) pairs followed by a
/// default expression.
pub fn cond(exprs: impl IntoIterator<Item = FilterExpression>) -> FilterExpression {
    instruction::varargs(ExpOp::Cond, exprs)
}

/// Binds variables for a scoped expression: [`def`] entries followed by the
/// body. Named with a trailing underscore because `let` is reserved.
pub fn let_(exprs: impl IntoIterator<Item = FilterExpression>) -> FilterExpression {
    instruction::varargs(ExpOp::Let, exprs)
}

/// One variable binding inside [`let_`]: a raw name followed by the bound
/// sub-expression, consumed pairwise.
pub fn def(name: impl Into<String>, value: FilterExpression) -> FilterExpression {
    let mut seq = instruction::raw_str(name);
    seq.extend(value);
    seq
}

/// A reference to a variable bound by [`def`].
pub fn var(name: impl Into<String>) -> FilterExpression {
    instruction::fixed(ExpOp::Var, [instruction::raw_str(name)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eq_bin_int_shape() {
        let seq = eq(bin_int("b"), int_val(5));
        assert_eq!(seq.len(), 5);
        assert_eq!(
            seq[0],
            Instruction::Header {
                op: ExpOp::CmpEq,
                count: 3
            }
        );
        assert_eq!(
            seq[1],
            Instruction::Header {
                op: ExpOp::Bin,
                count: 3
            }
        );
        assert_eq!(seq[2], Instruction::Value(InstrValue::Int(ExpType::Int.code())));
        assert_eq!(
            seq[3],
            Instruction::Value(InstrValue::RawStr("b".to_string()))
        );
        assert_eq!(seq[4], Instruction::Value(InstrValue::Int(5)));
    }

    #[test]
    fn test_and_two_comparisons_shape() {
        let seq = and([eq(bin_int("a"), int_val(1)), gt(bin_int("b"), int_val(0))]);
        assert_eq!(seq.len(), 12);
        assert_eq!(seq[0], Instruction::VarargsBegin { op: ExpOp::And });
        assert_eq!(seq[11], Instruction::VarargsEnd);
        assert_eq!(
            seq[1],
            Instruction::Header {
                op: ExpOp::CmpEq,
                count: 3
            }
        );
        assert_eq!(
            seq[6],
            Instruction::Header {
                op: ExpOp::CmpGt,
                count: 3
            }
        );
    }

    #[test]
    fn test_key_accessor_shape() {
        let seq = key_str();
        assert_eq!(
            seq,
            vec![
                Instruction::Header {
                    op: ExpOp::Key,
                    count: 2
                },
                Instruction::Value(InstrValue::Int(ExpType::Str.code())),
            ]
        );
    }

    #[test]
    fn test_metadata_is_bare() {
        assert_eq!(ttl(), vec![Instruction::Bare { op: ExpOp::Ttl }]);
        assert_eq!(
            set_name(),
            vec![Instruction::Bare { op: ExpOp::SetName }]
        );
    }

    #[test]
    fn test_bin_exists_composes_bin_type() {
        let seq = bin_exists("b");
        assert_eq!(
            seq[0],
            Instruction::Header {
                op: ExpOp::CmpNe,
                count: 3
            }
        );
        assert_eq!(
            seq[1],
            Instruction::Header {
                op: ExpOp::BinType,
                count: 2
            }
        );
    }

    #[test]
    fn test_cmp_regex_shape() {
        let seq = cmp_regex(crate::ops::regex_flags::ICASE, "pref.*", bin_str("name"));
        assert_eq!(
            seq[0],
            Instruction::Header {
                op: ExpOp::CmpRegex,
                count: 4
            }
        );
        assert_eq!(
            seq[1],
            Instruction::Value(InstrValue::Int(crate::ops::regex_flags::ICASE))
        );
        assert_eq!(
            seq[2],
            Instruction::Value(InstrValue::RawStr("pref.*".to_string()))
        );
    }

    #[test]
    fn test_let_def_var_pairing() {
        let seq = let_([
            def("x", int_val(2)),
            def("y", int_val(3)),
            add([var("x"), var("y")]),
        ]);
        assert_eq!(seq[0], Instruction::VarargsBegin { op: ExpOp::Let });
        assert_eq!(
            seq[1],
            Instruction::Value(InstrValue::RawStr("x".to_string()))
        );
        assert_eq!(seq[2], Instruction::Value(InstrValue::Int(2)));
        assert_eq!(*seq.last().unwrap(), Instruction::VarargsEnd);
    }

    #[test]
    fn test_unary_arithmetic_counts() {
        for seq in [
            abs(int_val(-3)),
            floor(float_val(3.7)),
            ceil(float_val(3.2)),
            to_int(float_val(1.0)),
            to_float(int_val(1)),
            int_not(int_val(7)),
            int_count(int_val(7)),
        ] {
            match &seq[0] {
                Instruction::Header { count, .. } => assert_eq!(*count, 2),
                other => panic!("expected header, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_nested_varargs() {
        let seq = or([
            and([bool_val(true), bool_val(false)]),
            not(bool_val(false)),
        ]);
        assert_eq!(seq[0], Instruction::VarargsBegin { op: ExpOp::Or });
        assert_eq!(seq[1], Instruction::VarargsBegin { op: ExpOp::And });
        // inner AND closes before NOT opens
        assert_eq!(seq[4], Instruction::VarargsEnd);
        assert_eq!(
            seq[5],
            Instruction::Header {
                op: ExpOp::Not,
                count: 2
            }
        );
        assert_eq!(*seq.last().unwrap(), Instruction::VarargsEnd);
    }
}
