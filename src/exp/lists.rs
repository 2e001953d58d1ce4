//! List sub-expressions: read and modify operations on list bins, optionally
//! scoped into a nested collection by a [`CdtContext`].
//!
//! Reads resolve their result type from the requested return type at build
//! time; modify operations return the updated bin, typed after the innermost
//! context selector.

use crate::context::CdtContext;
use crate::instruction::{CdtCall, FilterExpression};
use crate::ops::{sys, ListOpcode, ListReturnType};
use crate::policy::ListPolicy;
use crate::types::{resolve_list_type, ExpType};
use crate::RecwireError;

fn read(
    value_type: ExpType,
    return_type: ListReturnType,
    multi: bool,
    ctx: Option<&CdtContext>,
    verb: ListOpcode,
) -> Result<CdtCall, RecwireError> {
    let result = resolve_list_type(value_type, return_type, multi)?;
    Ok(CdtCall::read(sys::CALL_CDT, result, ctx, verb.code()))
}

fn modify(ctx: Option<&CdtContext>, verb: ListOpcode) -> CdtCall {
    let result = CdtContext::context_type(ctx, ExpType::List);
    CdtCall::modify(sys::CALL_CDT, result, ctx, verb.code())
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// Number of elements in the list.
pub fn size(bin: FilterExpression, ctx: Option<&CdtContext>) -> FilterExpression {
    CdtCall::read(sys::CALL_CDT, ExpType::Int, ctx, ListOpcode::Size.code()).finish(bin)
}

/// Selects all elements equal to `value`.
pub fn get_by_value(
    bin: FilterExpression,
    value: FilterExpression,
    return_type: ListReturnType,
    ctx: Option<&CdtContext>,
) -> Result<FilterExpression, RecwireError> {
    Ok(read(ExpType::Auto, return_type, true, ctx, ListOpcode::GetAllByValue)?
        .int_param(return_type.code())
        .param(value)
        .finish(bin))
}

/// Selects elements in the half-open value interval `[begin, end)`.
pub fn get_by_value_range(
    bin: FilterExpression,
    begin: FilterExpression,
    end: FilterExpression,
    return_type: ListReturnType,
    ctx: Option<&CdtContext>,
) -> Result<FilterExpression, RecwireError> {
    Ok(
        read(ExpType::Auto, return_type, true, ctx, ListOpcode::GetByValueInterval)?
            .int_param(return_type.code())
            .param(begin)
            .param(end)
            .finish(bin),
    )
}

/// Selects elements equal to any entry of the `values` list expression.
pub fn get_by_value_list(
    bin: FilterExpression,
    values: FilterExpression,
    return_type: ListReturnType,
    ctx: Option<&CdtContext>,
) -> Result<FilterExpression, RecwireError> {
    Ok(read(ExpType::Auto, return_type, true, ctx, ListOpcode::GetByValueList)?
        .int_param(return_type.code())
        .param(values)
        .finish(bin))
}

/// Selects elements from the one ranked `rank` relative to `value` to the end.
pub fn get_by_value_rel_rank_range_to_end(
    bin: FilterExpression,
    value: FilterExpression,
    rank: FilterExpression,
    return_type: ListReturnType,
    ctx: Option<&CdtContext>,
) -> Result<FilterExpression, RecwireError> {
    Ok(read(
        ExpType::Auto,
        return_type,
        true,
        ctx,
        ListOpcode::GetByValueRelRankRange,
    )?
    .int_param(return_type.code())
    .param(value)
    .param(rank)
    .finish(bin))
}

/// Selects `count` elements starting at the one ranked `rank` relative to
/// `value`.
pub fn get_by_value_rel_rank_range(
    bin: FilterExpression,
    value: FilterExpression,
    rank: FilterExpression,
    count: FilterExpression,
    return_type: ListReturnType,
    ctx: Option<&CdtContext>,
) -> Result<FilterExpression, RecwireError> {
    Ok(read(
        ExpType::Auto,
        return_type,
        true,
        ctx,
        ListOpcode::GetByValueRelRankRange,
    )?
    .int_param(return_type.code())
    .param(value)
    .param(rank)
    .param(count)
    .finish(bin))
}

/// Selects the single element at `index`. `value_type` narrows the result
/// type when the return type is VALUE.
pub fn get_by_index(
    bin: FilterExpression,
    index: FilterExpression,
    value_type: ExpType,
    return_type: ListReturnType,
    ctx: Option<&CdtContext>,
) -> Result<FilterExpression, RecwireError> {
    Ok(read(value_type, return_type, false, ctx, ListOpcode::GetByIndex)?
        .int_param(return_type.code())
        .param(index)
        .finish(bin))
}

/// Selects elements from `index` to the end.
pub fn get_by_index_range_to_end(
    bin: FilterExpression,
    index: FilterExpression,
    return_type: ListReturnType,
    ctx: Option<&CdtContext>,
) -> Result<FilterExpression, RecwireError> {
    Ok(read(ExpType::Auto, return_type, true, ctx, ListOpcode::GetByIndexRange)?
        .int_param(return_type.code())
        .param(index)
        .finish(bin))
}

/// Selects `count` elements starting at `index`.
pub fn get_by_index_range(
    bin: FilterExpression,
    index: FilterExpression,
    count: FilterExpression,
    return_type: ListReturnType,
    ctx: Option<&CdtContext>,
) -> Result<FilterExpression, RecwireError> {
    Ok(read(ExpType::Auto, return_type, true, ctx, ListOpcode::GetByIndexRange)?
        .int_param(return_type.code())
        .param(index)
        .param(count)
        .finish(bin))
}

/// Selects the single element at `rank`.
pub fn get_by_rank(
    bin: FilterExpression,
    rank: FilterExpression,
    value_type: ExpType,
    return_type: ListReturnType,
    ctx: Option<&CdtContext>,
) -> Result<FilterExpression, RecwireError> {
    Ok(read(value_type, return_type, false, ctx, ListOpcode::GetByRank)?
        .int_param(return_type.code())
        .param(rank)
        .finish(bin))
}

/// Selects elements from `rank` to the highest rank.
pub fn get_by_rank_range_to_end(
    bin: FilterExpression,
    rank: FilterExpression,
    return_type: ListReturnType,
    ctx: Option<&CdtContext>,
) -> Result<FilterExpression, RecwireError> {
    Ok(read(ExpType::Auto, return_type, true, ctx, ListOpcode::GetByRankRange)?
        .int_param(return_type.code())
        .param(rank)
        .finish(bin))
}

/// Selects `count` elements starting at `rank`.
pub fn get_by_rank_range(
    bin: FilterExpression,
    rank: FilterExpression,
    count: FilterExpression,
    return_type: ListReturnType,
    ctx: Option<&CdtContext>,
) -> Result<FilterExpression, RecwireError> {
    Ok(read(ExpType::Auto, return_type, true, ctx, ListOpcode::GetByRankRange)?
        .int_param(return_type.code())
        .param(rank)
        .param(count)
        .finish(bin))
}

// ---------------------------------------------------------------------------
// Modifies
// ---------------------------------------------------------------------------

/// Appends `value` to the list.
pub fn append(
    bin: FilterExpression,
    value: FilterExpression,
    policy: Option<&ListPolicy>,
    ctx: Option<&CdtContext>,
) -> FilterExpression {
    modify(ctx, ListOpcode::Append)
        .param(value)
        .list_crmod(policy)
        .finish(bin)
}

/// Appends every element of the `values` list expression.
pub fn append_items(
    bin: FilterExpression,
    values: FilterExpression,
    policy: Option<&ListPolicy>,
    ctx: Option<&CdtContext>,
) -> FilterExpression {
    modify(ctx, ListOpcode::AppendItems)
        .param(values)
        .list_crmod(policy)
        .finish(bin)
}

/// Inserts `value` at `index`.
pub fn insert(
    bin: FilterExpression,
    index: FilterExpression,
    value: FilterExpression,
    policy: Option<&ListPolicy>,
    ctx: Option<&CdtContext>,
) -> FilterExpression {
    modify(ctx, ListOpcode::Insert)
        .param(index)
        .param(value)
        .list_mod(policy)
        .finish(bin)
}

/// Inserts every element of the `values` list expression at `index`.
pub fn insert_items(
    bin: FilterExpression,
    index: FilterExpression,
    values: FilterExpression,
    policy: Option<&ListPolicy>,
    ctx: Option<&CdtContext>,
) -> FilterExpression {
    modify(ctx, ListOpcode::InsertItems)
        .param(index)
        .param(values)
        .list_mod(policy)
        .finish(bin)
}

/// Increments the numeric element at `index` by `value`.
pub fn increment(
    bin: FilterExpression,
    index: FilterExpression,
    value: FilterExpression,
    policy: Option<&ListPolicy>,
    ctx: Option<&CdtContext>,
) -> FilterExpression {
    modify(ctx, ListOpcode::Increment)
        .param(index)
        .param(value)
        .list_crmod(policy)
        .finish(bin)
}

/// Replaces the element at `index` with `value`.
pub fn set(
    bin: FilterExpression,
    index: FilterExpression,
    value: FilterExpression,
    policy: Option<&ListPolicy>,
    ctx: Option<&CdtContext>,
) -> FilterExpression {
    modify(ctx, ListOpcode::Set)
        .param(index)
        .param(value)
        .list_mod(policy)
        .finish(bin)
}

/// Removes all elements.
pub fn clear(bin: FilterExpression, ctx: Option<&CdtContext>) -> FilterExpression {
    modify(ctx, ListOpcode::Clear).finish(bin)
}

/// Sorts the list. `flags` is an OR of [`crate::ops::list_sort_flags`].
pub fn sort(bin: FilterExpression, flags: i64, ctx: Option<&CdtContext>) -> FilterExpression {
    modify(ctx, ListOpcode::Sort).int_param(flags).finish(bin)
}

fn remove(verb: ListOpcode, ctx: Option<&CdtContext>) -> CdtCall {
    modify(ctx, verb).int_param(ListReturnType::NONE.code())
}

/// Removes all elements equal to `value`.
pub fn remove_by_value(
    bin: FilterExpression,
    value: FilterExpression,
    ctx: Option<&CdtContext>,
) -> FilterExpression {
    remove(ListOpcode::RemoveAllByValue, ctx).param(value).finish(bin)
}

/// Removes elements equal to any entry of the `values` list expression.
pub fn remove_by_value_list(
    bin: FilterExpression,
    values: FilterExpression,
    ctx: Option<&CdtContext>,
) -> FilterExpression {
    remove(ListOpcode::RemoveByValueList, ctx).param(values).finish(bin)
}

/// Removes elements in the half-open value interval `[begin, end)`.
pub fn remove_by_value_range(
    bin: FilterExpression,
    begin: FilterExpression,
    end: FilterExpression,
    ctx: Option<&CdtContext>,
) -> FilterExpression {
    remove(ListOpcode::RemoveByValueInterval, ctx)
        .param(begin)
        .param(end)
        .finish(bin)
}

/// Removes elements from the one ranked `rank` relative to `value` to the end.
pub fn remove_by_value_rel_rank_range_to_end(
    bin: FilterExpression,
    value: FilterExpression,
    rank: FilterExpression,
    ctx: Option<&CdtContext>,
) -> FilterExpression {
    remove(ListOpcode::RemoveByValueRelRankRange, ctx)
        .param(value)
        .param(rank)
        .finish(bin)
}

/// Removes `count` elements starting at the one ranked `rank` relative to
/// `value`.
pub fn remove_by_value_rel_rank_range(
    bin: FilterExpression,
    value: FilterExpression,
    rank: FilterExpression,
    count: FilterExpression,
    ctx: Option<&CdtContext>,
) -> FilterExpression {
    remove(ListOpcode::RemoveByValueRelRankRange, ctx)
        .param(value)
        .param(rank)
        .param(count)
        .finish(bin)
}

/// Removes the element at `index`.
pub fn remove_by_index(
    bin: FilterExpression,
    index: FilterExpression,
    ctx: Option<&CdtContext>,
) -> FilterExpression {
    remove(ListOpcode::RemoveByIndex, ctx).param(index).finish(bin)
}

/// Removes elements from `index` to the end.
pub fn remove_by_index_range_to_end(
    bin: FilterExpression,
    index: FilterExpression,
    ctx: Option<&CdtContext>,
) -> FilterExpression {
    remove(ListOpcode::RemoveByIndexRange, ctx).param(index).finish(bin)
}

/// Removes `count` elements starting at `index`.
pub fn remove_by_index_range(
    bin: FilterExpression,
    index: FilterExpression,
    count: FilterExpression,
    ctx: Option<&CdtContext>,
) -> FilterExpression {
    remove(ListOpcode::RemoveByIndexRange, ctx)
        .param(index)
        .param(count)
        .finish(bin)
}

/// Removes the element at `rank`.
pub fn remove_by_rank(
    bin: FilterExpression,
    rank: FilterExpression,
    ctx: Option<&CdtContext>,
) -> FilterExpression {
    remove(ListOpcode::RemoveByRank, ctx).param(rank).finish(bin)
}

/// Removes elements from `rank` to the highest rank.
pub fn remove_by_rank_range_to_end(
    bin: FilterExpression,
    rank: FilterExpression,
    ctx: Option<&CdtContext>,
) -> FilterExpression {
    remove(ListOpcode::RemoveByRankRange, ctx).param(rank).finish(bin)
}

/// Removes `count` elements starting at `rank`.
pub fn remove_by_rank_range(
    bin: FilterExpression,
    rank: FilterExpression,
    count: FilterExpression,
    ctx: Option<&CdtContext>,
) -> FilterExpression {
    remove(ListOpcode::RemoveByRankRange, ctx)
        .param(rank)
        .param(count)
        .finish(bin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exp;
    use crate::instruction::{Instruction, InstrValue, CALL_HEADER_COUNT};
    use crate::ops::ExpOp;

    #[test]
    fn test_size_shape() {
        let seq = size(exp::bin_list("tags"), None);
        assert_eq!(
            seq[0],
            Instruction::Header {
                op: ExpOp::Call,
                count: CALL_HEADER_COUNT
            }
        );
        assert_eq!(
            seq[1],
            Instruction::Value(InstrValue::ResultType(ExpType::Int))
        );
        assert_eq!(seq[2], Instruction::Value(InstrValue::Int(sys::CALL_CDT)));
        assert!(matches!(seq[3], Instruction::CallStart { count: 1, ctx: None }));
        assert_eq!(
            seq[4],
            Instruction::Value(InstrValue::Int(ListOpcode::Size.code()))
        );
    }

    #[test]
    fn test_get_by_index_declares_two_params() {
        let seq = get_by_index(
            exp::bin_list("tags"),
            exp::int_val(0),
            ExpType::Auto,
            ListReturnType::VALUE,
            None,
        )
        .unwrap();
        assert!(matches!(seq[3], Instruction::CallStart { count: 3, ctx: None }));
        // return type operand precedes the index operand
        assert_eq!(
            seq[5],
            Instruction::Value(InstrValue::Int(ListReturnType::VALUE.code()))
        );
        assert_eq!(seq[6], Instruction::Value(InstrValue::Int(0)));
    }

    #[test]
    fn test_get_by_index_type_mismatch_fails() {
        let err = get_by_index(
            exp::bin_list("tags"),
            exp::int_val(0),
            ExpType::Str,
            ListReturnType::COUNT,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, crate::RecwireError::Type(_)));
    }

    #[test]
    fn test_append_with_policy_adds_two_slots() {
        let with = append(
            exp::bin_list("tags"),
            exp::int_val(9),
            Some(&ListPolicy::default()),
            None,
        );
        let without = append(exp::bin_list("tags"), exp::int_val(9), None, None);
        assert!(matches!(with[3], Instruction::CallStart { count: 4, .. }));
        assert!(matches!(without[3], Instruction::CallStart { count: 2, .. }));
        assert!(matches!(
            with[6],
            Instruction::ListPolicy {
                op: ExpOp::CdtListCrMod,
                ..
            }
        ));
    }

    #[test]
    fn test_insert_policy_is_single_slot() {
        let seq = insert(
            exp::bin_list("tags"),
            exp::int_val(0),
            exp::str_val("x"),
            Some(&ListPolicy::default()),
            None,
        );
        // verb + index + value + one modify-only slot
        assert!(matches!(seq[3], Instruction::CallStart { count: 4, .. }));
    }

    #[test]
    fn test_modify_carries_local_flag_and_context_type() {
        let mut ctx = CdtContext::new();
        ctx.add_map_key("inner");
        let seq = clear(exp::bin_map("m"), Some(&ctx));
        assert_eq!(
            seq[1],
            Instruction::Value(InstrValue::ResultType(ExpType::Map))
        );
        assert_eq!(
            seq[2],
            Instruction::Value(InstrValue::Int(sys::CALL_CDT | sys::FLAG_MODIFY_LOCAL))
        );
        match &seq[3] {
            Instruction::CallStart { ctx: Some(c), .. } => assert_eq!(c.len(), 1),
            other => panic!("expected context-carrying verb header, got {other:?}"),
        }
    }

    #[test]
    fn test_remove_hardcodes_none_return() {
        let seq = remove_by_index(exp::bin_list("tags"), exp::int_val(1), None);
        assert_eq!(
            seq[5],
            Instruction::Value(InstrValue::Int(ListReturnType::NONE.code()))
        );
    }
}
