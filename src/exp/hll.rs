//! HyperLogLog sub-expressions.
//!
//! HLL bins are opaque sketches; like blobs they carry no nested structure
//! and take no context. Policy write flags ride as a fixed int parameter.

use crate::instruction::{CdtCall, FilterExpression};
use crate::ops::{sys, HllOpcode};
use crate::policy::HllPolicy;
use crate::types::ExpType;

fn modify(verb: HllOpcode) -> CdtCall {
    CdtCall::modify(sys::CALL_HLL, ExpType::Hll, None, verb.code())
}

fn read(result: ExpType, verb: HllOpcode) -> CdtCall {
    CdtCall::read(sys::CALL_HLL, result, None, verb.code())
}

fn policy_flags(policy: Option<&HllPolicy>) -> i64 {
    policy.map_or(0, |p| p.flags)
}

/// Creates an empty sketch with the given index and min-hash bit counts.
pub fn init(
    bin: FilterExpression,
    index_bit_count: FilterExpression,
    mh_bit_count: FilterExpression,
    policy: Option<&HllPolicy>,
) -> FilterExpression {
    modify(HllOpcode::Init)
        .param(index_bit_count)
        .param(mh_bit_count)
        .int_param(policy_flags(policy))
        .finish(bin)
}

/// Adds every element of the `values` list expression to the sketch,
/// creating it with the given bit counts if absent.
pub fn add(
    bin: FilterExpression,
    values: FilterExpression,
    index_bit_count: FilterExpression,
    mh_bit_count: FilterExpression,
    policy: Option<&HllPolicy>,
) -> FilterExpression {
    modify(HllOpcode::Add)
        .param(values)
        .param(index_bit_count)
        .param(mh_bit_count)
        .int_param(policy_flags(policy))
        .finish(bin)
}

/// For each element of the `values` list expression, 1 if the sketch may
/// contain it.
pub fn may_contain(bin: FilterExpression, values: FilterExpression) -> FilterExpression {
    read(ExpType::Int, HllOpcode::MayContain).param(values).finish(bin)
}

/// Estimated cardinality of the sketch.
pub fn get_count(bin: FilterExpression) -> FilterExpression {
    read(ExpType::Int, HllOpcode::Count).finish(bin)
}

/// Union of this sketch with every sketch in the `list` expression.
pub fn get_union(bin: FilterExpression, list: FilterExpression) -> FilterExpression {
    read(ExpType::Hll, HllOpcode::Union).param(list).finish(bin)
}

/// Estimated cardinality of the union.
pub fn get_union_count(bin: FilterExpression, list: FilterExpression) -> FilterExpression {
    read(ExpType::Int, HllOpcode::UnionCount).param(list).finish(bin)
}

/// Estimated cardinality of the intersection.
pub fn get_intersect_count(bin: FilterExpression, list: FilterExpression) -> FilterExpression {
    read(ExpType::Int, HllOpcode::IntersectCount).param(list).finish(bin)
}

/// Estimated Jaccard similarity of the sketches.
pub fn get_similarity(bin: FilterExpression, list: FilterExpression) -> FilterExpression {
    read(ExpType::Float, HllOpcode::Similarity).param(list).finish(bin)
}

/// The sketch's index and min-hash bit counts, as a two-element list.
pub fn describe(bin: FilterExpression) -> FilterExpression {
    read(ExpType::List, HllOpcode::Describe).finish(bin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exp;
    use crate::instruction::{Instruction, InstrValue};

    #[test]
    fn test_get_count_shape() {
        let seq = get_count(exp::bin_hll("h"));
        assert_eq!(
            seq[1],
            Instruction::Value(InstrValue::ResultType(ExpType::Int))
        );
        assert_eq!(seq[2], Instruction::Value(InstrValue::Int(sys::CALL_HLL)));
        assert!(matches!(seq[3], Instruction::CallStart { count: 1, ctx: None }));
        assert_eq!(
            seq[4],
            Instruction::Value(InstrValue::Int(HllOpcode::Count.code()))
        );
    }

    #[test]
    fn test_init_is_modify_with_policy_param() {
        let seq = init(
            exp::bin_hll("h"),
            exp::int_val(12),
            exp::int_val(0),
            Some(&HllPolicy::new(crate::ops::hll_write_flags::CREATE_ONLY)),
        );
        assert_eq!(
            seq[1],
            Instruction::Value(InstrValue::ResultType(ExpType::Hll))
        );
        assert_eq!(
            seq[2],
            Instruction::Value(InstrValue::Int(sys::CALL_HLL | sys::FLAG_MODIFY_LOCAL))
        );
        assert!(matches!(seq[3], Instruction::CallStart { count: 4, .. }));
        assert_eq!(
            seq[7],
            Instruction::Value(InstrValue::Int(crate::ops::hll_write_flags::CREATE_ONLY))
        );
    }

    #[test]
    fn test_union_returns_hll() {
        let seq = get_union(exp::bin_hll("h"), exp::bin_list("sketches"));
        assert_eq!(
            seq[1],
            Instruction::Value(InstrValue::ResultType(ExpType::Hll))
        );
    }

    #[test]
    fn test_similarity_returns_float() {
        let seq = get_similarity(exp::bin_hll("h"), exp::bin_list("sketches"));
        assert_eq!(
            seq[1],
            Instruction::Value(InstrValue::ResultType(ExpType::Float))
        );
    }
}
