//! Bitwise sub-expressions over blob bins.
//!
//! Blob bins carry no nested structure, so these calls never take a context.
//! Policy write flags are always emitted as a fixed int parameter; unlike the
//! list/map markers they do not change the declared arity.

use crate::instruction::{CdtCall, FilterExpression};
use crate::ops::{sys, BitOpcode, BitOverflowAction};
use crate::policy::BitwisePolicy;
use crate::types::ExpType;

fn modify(verb: BitOpcode) -> CdtCall {
    CdtCall::modify(sys::CALL_BITS, ExpType::Blob, None, verb.code())
}

fn read(result: ExpType, verb: BitOpcode) -> CdtCall {
    CdtCall::read(sys::CALL_BITS, result, None, verb.code())
}

fn policy_flags(policy: Option<&BitwisePolicy>) -> i64 {
    policy.map_or(0, |p| p.flags)
}

// ---------------------------------------------------------------------------
// Modifies
// ---------------------------------------------------------------------------

/// Resizes the blob to `byte_size` bytes. `flags` is an OR of
/// [`crate::ops::bit_resize_flags`].
pub fn resize(
    bin: FilterExpression,
    byte_size: FilterExpression,
    flags: i64,
    policy: Option<&BitwisePolicy>,
) -> FilterExpression {
    modify(BitOpcode::Resize)
        .param(byte_size)
        .int_param(policy_flags(policy))
        .int_param(flags)
        .finish(bin)
}

/// Inserts `value` at `byte_offset`.
pub fn insert(
    bin: FilterExpression,
    byte_offset: FilterExpression,
    value: FilterExpression,
    policy: Option<&BitwisePolicy>,
) -> FilterExpression {
    modify(BitOpcode::Insert)
        .param(byte_offset)
        .param(value)
        .int_param(policy_flags(policy))
        .finish(bin)
}

/// Removes `byte_size` bytes starting at `byte_offset`.
pub fn remove(
    bin: FilterExpression,
    byte_offset: FilterExpression,
    byte_size: FilterExpression,
    policy: Option<&BitwisePolicy>,
) -> FilterExpression {
    modify(BitOpcode::Remove)
        .param(byte_offset)
        .param(byte_size)
        .int_param(policy_flags(policy))
        .finish(bin)
}

/// Overwrites `bit_size` bits starting at `bit_offset` with `value`.
pub fn set(
    bin: FilterExpression,
    bit_offset: FilterExpression,
    bit_size: FilterExpression,
    value: FilterExpression,
    policy: Option<&BitwisePolicy>,
) -> FilterExpression {
    modify(BitOpcode::Set)
        .param(bit_offset)
        .param(bit_size)
        .param(value)
        .int_param(policy_flags(policy))
        .finish(bin)
}

pub fn or(
    bin: FilterExpression,
    bit_offset: FilterExpression,
    bit_size: FilterExpression,
    value: FilterExpression,
    policy: Option<&BitwisePolicy>,
) -> FilterExpression {
    modify(BitOpcode::Or)
        .param(bit_offset)
        .param(bit_size)
        .param(value)
        .int_param(policy_flags(policy))
        .finish(bin)
}

pub fn xor(
    bin: FilterExpression,
    bit_offset: FilterExpression,
    bit_size: FilterExpression,
    value: FilterExpression,
    policy: Option<&BitwisePolicy>,
) -> FilterExpression {
    modify(BitOpcode::Xor)
        .param(bit_offset)
        .param(bit_size)
        .param(value)
        .int_param(policy_flags(policy))
        .finish(bin)
}

pub fn and(
    bin: FilterExpression,
    bit_offset: FilterExpression,
    bit_size: FilterExpression,
    value: FilterExpression,
    policy: Option<&BitwisePolicy>,
) -> FilterExpression {
    modify(BitOpcode::And)
        .param(bit_offset)
        .param(bit_size)
        .param(value)
        .int_param(policy_flags(policy))
        .finish(bin)
}

/// Inverts `bit_size` bits starting at `bit_offset`.
pub fn not(
    bin: FilterExpression,
    bit_offset: FilterExpression,
    bit_size: FilterExpression,
    policy: Option<&BitwisePolicy>,
) -> FilterExpression {
    modify(BitOpcode::Not)
        .param(bit_offset)
        .param(bit_size)
        .int_param(policy_flags(policy))
        .finish(bin)
}

pub fn lshift(
    bin: FilterExpression,
    bit_offset: FilterExpression,
    bit_size: FilterExpression,
    shift: FilterExpression,
    policy: Option<&BitwisePolicy>,
) -> FilterExpression {
    modify(BitOpcode::Lshift)
        .param(bit_offset)
        .param(bit_size)
        .param(shift)
        .int_param(policy_flags(policy))
        .finish(bin)
}

pub fn rshift(
    bin: FilterExpression,
    bit_offset: FilterExpression,
    bit_size: FilterExpression,
    shift: FilterExpression,
    policy: Option<&BitwisePolicy>,
) -> FilterExpression {
    modify(BitOpcode::Rshift)
        .param(bit_offset)
        .param(bit_size)
        .param(shift)
        .int_param(policy_flags(policy))
        .finish(bin)
}

/// Adds `value` to the integer held in the addressed bit region.
pub fn add(
    bin: FilterExpression,
    bit_offset: FilterExpression,
    bit_size: FilterExpression,
    value: FilterExpression,
    action: BitOverflowAction,
    policy: Option<&BitwisePolicy>,
) -> FilterExpression {
    modify(BitOpcode::Add)
        .param(bit_offset)
        .param(bit_size)
        .param(value)
        .int_param(policy_flags(policy))
        .int_param(action.code())
        .finish(bin)
}

/// Subtracts `value` from the integer held in the addressed bit region.
pub fn subtract(
    bin: FilterExpression,
    bit_offset: FilterExpression,
    bit_size: FilterExpression,
    value: FilterExpression,
    action: BitOverflowAction,
    policy: Option<&BitwisePolicy>,
) -> FilterExpression {
    modify(BitOpcode::Subtract)
        .param(bit_offset)
        .param(bit_size)
        .param(value)
        .int_param(policy_flags(policy))
        .int_param(action.code())
        .finish(bin)
}

/// Overwrites the addressed bit region with the integer `value`.
pub fn set_int(
    bin: FilterExpression,
    bit_offset: FilterExpression,
    bit_size: FilterExpression,
    value: FilterExpression,
    policy: Option<&BitwisePolicy>,
) -> FilterExpression {
    modify(BitOpcode::SetInt)
        .param(bit_offset)
        .param(bit_size)
        .param(value)
        .int_param(policy_flags(policy))
        .finish(bin)
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// Reads `bit_size` bits starting at `bit_offset` as a blob.
pub fn get(
    bin: FilterExpression,
    bit_offset: FilterExpression,
    bit_size: FilterExpression,
) -> FilterExpression {
    read(ExpType::Blob, BitOpcode::Get)
        .param(bit_offset)
        .param(bit_size)
        .finish(bin)
}

/// Number of set bits in the addressed region.
pub fn count(
    bin: FilterExpression,
    bit_offset: FilterExpression,
    bit_size: FilterExpression,
) -> FilterExpression {
    read(ExpType::Int, BitOpcode::Count)
        .param(bit_offset)
        .param(bit_size)
        .finish(bin)
}

/// Offset of the first bit equal to `value`, scanning left-to-right.
pub fn lscan(
    bin: FilterExpression,
    bit_offset: FilterExpression,
    bit_size: FilterExpression,
    value: FilterExpression,
) -> FilterExpression {
    read(ExpType::Int, BitOpcode::Lscan)
        .param(bit_offset)
        .param(bit_size)
        .param(value)
        .finish(bin)
}

/// Offset of the first bit equal to `value`, scanning right-to-left.
pub fn rscan(
    bin: FilterExpression,
    bit_offset: FilterExpression,
    bit_size: FilterExpression,
    value: FilterExpression,
) -> FilterExpression {
    read(ExpType::Int, BitOpcode::Rscan)
        .param(bit_offset)
        .param(bit_size)
        .param(value)
        .finish(bin)
}

/// Reads the addressed bit region as an integer, sign-extended when `sign`.
pub fn get_int(
    bin: FilterExpression,
    bit_offset: FilterExpression,
    bit_size: FilterExpression,
    sign: bool,
) -> FilterExpression {
    read(ExpType::Int, BitOpcode::GetInt)
        .param(bit_offset)
        .param(bit_size)
        .int_param(i64::from(sign))
        .finish(bin)
}
