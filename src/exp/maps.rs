//! Map sub-expressions: read and modify operations on map bins.
//!
//! Structure mirrors the list module; keys join values as selectable
//! dimensions, and KEY_VALUE reads produce a map.

use crate::context::CdtContext;
use crate::instruction::{CdtCall, FilterExpression};
use crate::ops::{sys, MapOpcode, MapReturnType};
use crate::policy::MapPolicy;
use crate::types::{resolve_map_type, ExpType};
use crate::RecwireError;

fn read(
    value_type: ExpType,
    return_type: MapReturnType,
    multi: bool,
    ctx: Option<&CdtContext>,
    verb: MapOpcode,
) -> Result<CdtCall, RecwireError> {
    let result = resolve_map_type(value_type, return_type, multi)?;
    Ok(CdtCall::read(sys::CALL_CDT, result, ctx, verb.code()))
}

fn modify(ctx: Option<&CdtContext>, verb: MapOpcode) -> CdtCall {
    let result = CdtContext::context_type(ctx, ExpType::Map);
    CdtCall::modify(sys::CALL_CDT, result, ctx, verb.code())
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// Number of entries in the map.
pub fn size(bin: FilterExpression, ctx: Option<&CdtContext>) -> FilterExpression {
    CdtCall::read(sys::CALL_CDT, ExpType::Int, ctx, MapOpcode::Size.code()).finish(bin)
}

/// Selects the single entry under `key`.
pub fn get_by_key(
    bin: FilterExpression,
    key: FilterExpression,
    value_type: ExpType,
    return_type: MapReturnType,
    ctx: Option<&CdtContext>,
) -> Result<FilterExpression, RecwireError> {
    Ok(read(value_type, return_type, false, ctx, MapOpcode::GetByKey)?
        .int_param(return_type.code())
        .param(key)
        .finish(bin))
}

/// Selects entries in the half-open key interval `[begin, end)`.
pub fn get_by_key_range(
    bin: FilterExpression,
    begin: FilterExpression,
    end: FilterExpression,
    return_type: MapReturnType,
    ctx: Option<&CdtContext>,
) -> Result<FilterExpression, RecwireError> {
    Ok(read(ExpType::Auto, return_type, true, ctx, MapOpcode::GetByKeyInterval)?
        .int_param(return_type.code())
        .param(begin)
        .param(end)
        .finish(bin))
}

/// Selects entries whose key equals any entry of the `keys` list expression.
pub fn get_by_key_list(
    bin: FilterExpression,
    keys: FilterExpression,
    return_type: MapReturnType,
    ctx: Option<&CdtContext>,
) -> Result<FilterExpression, RecwireError> {
    Ok(read(ExpType::Auto, return_type, true, ctx, MapOpcode::GetByKeyList)?
        .int_param(return_type.code())
        .param(keys)
        .finish(bin))
}

/// Selects entries from the one indexed `index` relative to `key` to the end.
pub fn get_by_key_rel_index_range_to_end(
    bin: FilterExpression,
    key: FilterExpression,
    index: FilterExpression,
    return_type: MapReturnType,
    ctx: Option<&CdtContext>,
) -> Result<FilterExpression, RecwireError> {
    Ok(read(
        ExpType::Auto,
        return_type,
        true,
        ctx,
        MapOpcode::GetByKeyRelIndexRange,
    )?
    .int_param(return_type.code())
    .param(key)
    .param(index)
    .finish(bin))
}

/// Selects `count` entries starting at the one indexed `index` relative to
/// `key`.
pub fn get_by_key_rel_index_range(
    bin: FilterExpression,
    key: FilterExpression,
    index: FilterExpression,
    count: FilterExpression,
    return_type: MapReturnType,
    ctx: Option<&CdtContext>,
) -> Result<FilterExpression, RecwireError> {
    Ok(read(
        ExpType::Auto,
        return_type,
        true,
        ctx,
        MapOpcode::GetByKeyRelIndexRange,
    )?
    .int_param(return_type.code())
    .param(key)
    .param(index)
    .param(count)
    .finish(bin))
}

/// Selects all entries whose value equals `value`.
pub fn get_by_value(
    bin: FilterExpression,
    value: FilterExpression,
    return_type: MapReturnType,
    ctx: Option<&CdtContext>,
) -> Result<FilterExpression, RecwireError> {
    Ok(read(ExpType::Auto, return_type, true, ctx, MapOpcode::GetAllByValue)?
        .int_param(return_type.code())
        .param(value)
        .finish(bin))
}

/// Selects entries in the half-open value interval `[begin, end)`.
pub fn get_by_value_range(
    bin: FilterExpression,
    begin: FilterExpression,
    end: FilterExpression,
    return_type: MapReturnType,
    ctx: Option<&CdtContext>,
) -> Result<FilterExpression, RecwireError> {
    Ok(
        read(ExpType::Auto, return_type, true, ctx, MapOpcode::GetByValueInterval)?
            .int_param(return_type.code())
            .param(begin)
            .param(end)
            .finish(bin),
    )
}

/// Selects entries whose value equals any entry of the `values` list
/// expression.
pub fn get_by_value_list(
    bin: FilterExpression,
    values: FilterExpression,
    return_type: MapReturnType,
    ctx: Option<&CdtContext>,
) -> Result<FilterExpression, RecwireError> {
    Ok(read(ExpType::Auto, return_type, true, ctx, MapOpcode::GetByValueList)?
        .int_param(return_type.code())
        .param(values)
        .finish(bin))
}

/// Selects entries from the one ranked `rank` relative to `value` to the end.
pub fn get_by_value_rel_rank_range_to_end(
    bin: FilterExpression,
    value: FilterExpression,
    rank: FilterExpression,
    return_type: MapReturnType,
    ctx: Option<&CdtContext>,
) -> Result<FilterExpression, RecwireError> {
    Ok(read(
        ExpType::Auto,
        return_type,
        true,
        ctx,
        MapOpcode::GetByValueRelRankRange,
    )?
    .int_param(return_type.code())
    .param(value)
    .param(rank)
    .finish(bin))
}

/// Selects `count` entries starting at the one ranked `rank` relative to
/// `value`.
pub fn get_by_value_rel_rank_range(
    bin: FilterExpression,
    value: FilterExpression,
    rank: FilterExpression,
    count: FilterExpression,
    return_type: MapReturnType,
    ctx: Option<&CdtContext>,
) -> Result<FilterExpression, RecwireError> {
    Ok(read(
        ExpType::Auto,
        return_type,
        true,
        ctx,
        MapOpcode::GetByValueRelRankRange,
    )?
    .int_param(return_type.code())
    .param(value)
    .param(rank)
    .param(count)
    .finish(bin))
}

/// Selects the single entry at `index`.
pub fn get_by_index(
    bin: FilterExpression,
    index: FilterExpression,
    value_type: ExpType,
    return_type: MapReturnType,
    ctx: Option<&CdtContext>,
) -> Result<FilterExpression, RecwireError> {
    Ok(read(value_type, return_type, false, ctx, MapOpcode::GetByIndex)?
        .int_param(return_type.code())
        .param(index)
        .finish(bin))
}

/// Selects entries from `index` to the end.
pub fn get_by_index_range_to_end(
    bin: FilterExpression,
    index: FilterExpression,
    return_type: MapReturnType,
    ctx: Option<&CdtContext>,
) -> Result<FilterExpression, RecwireError> {
    Ok(read(ExpType::Auto, return_type, true, ctx, MapOpcode::GetByIndexRange)?
        .int_param(return_type.code())
        .param(index)
        .finish(bin))
}

/// Selects `count` entries starting at `index`.
pub fn get_by_index_range(
    bin: FilterExpression,
    index: FilterExpression,
    count: FilterExpression,
    return_type: MapReturnType,
    ctx: Option<&CdtContext>,
) -> Result<FilterExpression, RecwireError> {
    Ok(read(ExpType::Auto, return_type, true, ctx, MapOpcode::GetByIndexRange)?
        .int_param(return_type.code())
        .param(index)
        .param(count)
        .finish(bin))
}

/// Selects the single entry at `rank`.
pub fn get_by_rank(
    bin: FilterExpression,
    rank: FilterExpression,
    value_type: ExpType,
    return_type: MapReturnType,
    ctx: Option<&CdtContext>,
) -> Result<FilterExpression, RecwireError> {
    Ok(read(value_type, return_type, false, ctx, MapOpcode::GetByRank)?
        .int_param(return_type.code())
        .param(rank)
        .finish(bin))
}

/// Selects entries from `rank` to the highest rank.
pub fn get_by_rank_range_to_end(
    bin: FilterExpression,
    rank: FilterExpression,
    return_type: MapReturnType,
    ctx: Option<&CdtContext>,
) -> Result<FilterExpression, RecwireError> {
    Ok(read(ExpType::Auto, return_type, true, ctx, MapOpcode::GetByRankRange)?
        .int_param(return_type.code())
        .param(rank)
        .finish(bin))
}

/// Selects `count` entries starting at `rank`.
pub fn get_by_rank_range(
    bin: FilterExpression,
    rank: FilterExpression,
    count: FilterExpression,
    return_type: MapReturnType,
    ctx: Option<&CdtContext>,
) -> Result<FilterExpression, RecwireError> {
    Ok(read(ExpType::Auto, return_type, true, ctx, MapOpcode::GetByRankRange)?
        .int_param(return_type.code())
        .param(rank)
        .param(count)
        .finish(bin))
}

// ---------------------------------------------------------------------------
// Modifies
// ---------------------------------------------------------------------------

/// Writes `value` under `key`.
pub fn put(
    bin: FilterExpression,
    key: FilterExpression,
    value: FilterExpression,
    policy: Option<&MapPolicy>,
    ctx: Option<&CdtContext>,
) -> FilterExpression {
    modify(ctx, MapOpcode::Put)
        .param(key)
        .param(value)
        .map_crmod(policy)
        .finish(bin)
}

/// Writes every entry of the `entries` map expression.
pub fn put_items(
    bin: FilterExpression,
    entries: FilterExpression,
    policy: Option<&MapPolicy>,
    ctx: Option<&CdtContext>,
) -> FilterExpression {
    modify(ctx, MapOpcode::PutItems)
        .param(entries)
        .map_crmod(policy)
        .finish(bin)
}

/// Increments the numeric value under `key` by `delta`.
pub fn increment(
    bin: FilterExpression,
    key: FilterExpression,
    delta: FilterExpression,
    policy: Option<&MapPolicy>,
    ctx: Option<&CdtContext>,
) -> FilterExpression {
    modify(ctx, MapOpcode::Increment)
        .param(key)
        .param(delta)
        .map_cr(policy)
        .finish(bin)
}

/// Removes all entries.
pub fn clear(bin: FilterExpression, ctx: Option<&CdtContext>) -> FilterExpression {
    modify(ctx, MapOpcode::Clear).finish(bin)
}

fn remove(verb: MapOpcode, ctx: Option<&CdtContext>) -> CdtCall {
    modify(ctx, verb).int_param(MapReturnType::NONE.code())
}

/// Removes the entry under `key`.
pub fn remove_by_key(
    bin: FilterExpression,
    key: FilterExpression,
    ctx: Option<&CdtContext>,
) -> FilterExpression {
    remove(MapOpcode::RemoveByKey, ctx).param(key).finish(bin)
}

/// Removes entries whose key equals any entry of the `keys` list expression.
pub fn remove_by_key_list(
    bin: FilterExpression,
    keys: FilterExpression,
    ctx: Option<&CdtContext>,
) -> FilterExpression {
    remove(MapOpcode::RemoveByKeyList, ctx).param(keys).finish(bin)
}

/// Removes entries in the half-open key interval `[begin, end)`.
pub fn remove_by_key_range(
    bin: FilterExpression,
    begin: FilterExpression,
    end: FilterExpression,
    ctx: Option<&CdtContext>,
) -> FilterExpression {
    remove(MapOpcode::RemoveByKeyInterval, ctx)
        .param(begin)
        .param(end)
        .finish(bin)
}

/// Removes entries from the one indexed `index` relative to `key` to the end.
pub fn remove_by_key_rel_index_range_to_end(
    bin: FilterExpression,
    key: FilterExpression,
    index: FilterExpression,
    ctx: Option<&CdtContext>,
) -> FilterExpression {
    remove(MapOpcode::RemoveByKeyRelIndexRange, ctx)
        .param(key)
        .param(index)
        .finish(bin)
}

/// Removes `count` entries starting at the one indexed `index` relative to
/// `key`.
pub fn remove_by_key_rel_index_range(
    bin: FilterExpression,
    key: FilterExpression,
    index: FilterExpression,
    count: FilterExpression,
    ctx: Option<&CdtContext>,
) -> FilterExpression {
    remove(MapOpcode::RemoveByKeyRelIndexRange, ctx)
        .param(key)
        .param(index)
        .param(count)
        .finish(bin)
}

/// Removes all entries whose value equals `value`.
pub fn remove_by_value(
    bin: FilterExpression,
    value: FilterExpression,
    ctx: Option<&CdtContext>,
) -> FilterExpression {
    remove(MapOpcode::RemoveAllByValue, ctx).param(value).finish(bin)
}

/// Removes entries whose value equals any entry of the `values` list
/// expression.
pub fn remove_by_value_list(
    bin: FilterExpression,
    values: FilterExpression,
    ctx: Option<&CdtContext>,
) -> FilterExpression {
    remove(MapOpcode::RemoveByValueList, ctx).param(values).finish(bin)
}

/// Removes entries in the half-open value interval `[begin, end)`.
pub fn remove_by_value_range(
    bin: FilterExpression,
    begin: FilterExpression,
    end: FilterExpression,
    ctx: Option<&CdtContext>,
) -> FilterExpression {
    remove(MapOpcode::RemoveByValueInterval, ctx)
        .param(begin)
        .param(end)
        .finish(bin)
}

/// Removes entries from the one ranked `rank` relative to `value` to the end.
pub fn remove_by_value_rel_rank_range_to_end(
    bin: FilterExpression,
    value: FilterExpression,
    rank: FilterExpression,
    ctx: Option<&CdtContext>,
) -> FilterExpression {
    remove(MapOpcode::RemoveByValueRelRankRange, ctx)
        .param(value)
        .param(rank)
        .finish(bin)
}

/// Removes `count` entries starting at the one ranked `rank` relative to
/// `value`.
pub fn remove_by_value_rel_rank_range(
    bin: FilterExpression,
    value: FilterExpression,
    rank: FilterExpression,
    count: FilterExpression,
    ctx: Option<&CdtContext>,
) -> FilterExpression {
    remove(MapOpcode::RemoveByValueRelRankRange, ctx)
        .param(value)
        .param(rank)
        .param(count)
        .finish(bin)
}

/// Removes the entry at `index`.
pub fn remove_by_index(
    bin: FilterExpression,
    index: FilterExpression,
    ctx: Option<&CdtContext>,
) -> FilterExpression {
    remove(MapOpcode::RemoveByIndex, ctx).param(index).finish(bin)
}

/// Removes entries from `index` to the end.
pub fn remove_by_index_range_to_end(
    bin: FilterExpression,
    index: FilterExpression,
    ctx: Option<&CdtContext>,
) -> FilterExpression {
    remove(MapOpcode::RemoveByIndexRange, ctx).param(index).finish(bin)
}

/// Removes `count` entries starting at `index`.
pub fn remove_by_index_range(
    bin: FilterExpression,
    index: FilterExpression,
    count: FilterExpression,
    ctx: Option<&CdtContext>,
) -> FilterExpression {
    remove(MapOpcode::RemoveByIndexRange, ctx)
        .param(index)
        .param(count)
        .finish(bin)
}

/// Removes the entry at `rank`.
pub fn remove_by_rank(
    bin: FilterExpression,
    rank: FilterExpression,
    ctx: Option<&CdtContext>,
) -> FilterExpression {
    remove(MapOpcode::RemoveByRank, ctx).param(rank).finish(bin)
}

/// Removes entries from `rank` to the highest rank.
pub fn remove_by_rank_range_to_end(
    bin: FilterExpression,
    rank: FilterExpression,
    ctx: Option<&CdtContext>,
) -> FilterExpression {
    remove(MapOpcode::RemoveByRankRange, ctx).param(rank).finish(bin)
}

/// Removes `count` entries starting at `rank`.
pub fn remove_by_rank_range(
    bin: FilterExpression,
    rank: FilterExpression,
    count: FilterExpression,
    ctx: Option<&CdtContext>,
) -> FilterExpression {
    remove(MapOpcode::RemoveByRankRange, ctx)
        .param(rank)
        .param(count)
        .finish(bin)
}
