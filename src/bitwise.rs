//! Bitwise operation builders: descriptors for operate-style calls against
//! blob bins.
//!
//! Each factory returns a [`BitwiseOperation`] carrying the verb opcode, the
//! target bin, and the verb's arguments; the descriptor is decorated fluently
//! and handed whole to the external client, which owns execution.

use crate::context::CdtContext;
use crate::ops::{BitOpcode, BitOverflowAction};
use crate::policy::BitwisePolicy;
use serde::{Deserialize, Serialize};

/// Verb-specific arguments of a bitwise operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BitwiseArgs {
    /// resize
    Resize { byte_size: u32, flags: i64 },
    /// insert
    Insert { byte_offset: i64, value: Vec<u8> },
    /// remove
    Remove { byte_offset: i64, byte_size: u32 },
    /// set / or / xor / and
    BytesRegion {
        bit_offset: i64,
        bit_size: u32,
        value: Vec<u8>,
    },
    /// not / get / count
    Region { bit_offset: i64, bit_size: u32 },
    /// lshift / rshift
    Shift {
        bit_offset: i64,
        bit_size: u32,
        shift: u32,
    },
    /// add / subtract / set_int
    IntRegion {
        bit_offset: i64,
        bit_size: u32,
        value: i64,
    },
    /// lscan / rscan
    Scan {
        bit_offset: i64,
        bit_size: u32,
        value: bool,
    },
    /// get_int
    SignedRegion {
        bit_offset: i64,
        bit_size: u32,
        sign: bool,
    },
}

/// A bitwise operation descriptor, ready for an operate-style call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BitwiseOperation {
    pub op: BitOpcode,
    pub bin: String,
    pub args: BitwiseArgs,
    pub policy: Option<BitwisePolicy>,
    /// Only meaningful for add/subtract.
    pub overflow_action: Option<BitOverflowAction>,
    pub context: Option<CdtContext>,
}

impl BitwiseOperation {
    fn new(op: BitOpcode, bin: impl Into<String>, args: BitwiseArgs) -> Self {
        Self {
            op,
            bin: bin.into(),
            args,
            policy: None,
            overflow_action: None,
            context: None,
        }
    }

    /// Attaches a write policy.
    pub fn with_policy(mut self, policy: BitwisePolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Sets the overflow behavior of an add/subtract operation.
    pub fn on_overflow(mut self, action: BitOverflowAction) -> Self {
        self.overflow_action = Some(action);
        self
    }

    /// Attaches a copy of a pre-built context path.
    pub fn with_context(mut self, ctx: &CdtContext) -> Self {
        self.context = Some(ctx.clone());
        self
    }

    /// Attaches a context path built by `f` on a fresh context.
    pub fn with_context_with(mut self, f: impl FnOnce(&mut CdtContext)) -> Self {
        let mut ctx = CdtContext::new();
        f(&mut ctx);
        self.context = Some(ctx);
        self
    }
}

/// Resizes the blob to `byte_size` bytes. `flags` is an OR of
/// [`crate::ops::bit_resize_flags`].
pub fn resize(bin: impl Into<String>, byte_size: u32, flags: i64) -> BitwiseOperation {
    BitwiseOperation::new(BitOpcode::Resize, bin, BitwiseArgs::Resize { byte_size, flags })
}

/// Inserts `value` at `byte_offset`.
pub fn insert(bin: impl Into<String>, byte_offset: i64, value: impl Into<Vec<u8>>) -> BitwiseOperation {
    BitwiseOperation::new(
        BitOpcode::Insert,
        bin,
        BitwiseArgs::Insert {
            byte_offset,
            value: value.into(),
        },
    )
}

/// Removes `byte_size` bytes starting at `byte_offset`.
pub fn remove(bin: impl Into<String>, byte_offset: i64, byte_size: u32) -> BitwiseOperation {
    BitwiseOperation::new(
        BitOpcode::Remove,
        bin,
        BitwiseArgs::Remove { byte_offset, byte_size },
    )
}

fn bytes_region(
    op: BitOpcode,
    bin: impl Into<String>,
    bit_offset: i64,
    bit_size: u32,
    value: impl Into<Vec<u8>>,
) -> BitwiseOperation {
    BitwiseOperation::new(
        op,
        bin,
        BitwiseArgs::BytesRegion {
            bit_offset,
            bit_size,
            value: value.into(),
        },
    )
}

/// Overwrites the addressed bit region with `value`.
pub fn set(
    bin: impl Into<String>,
    bit_offset: i64,
    bit_size: u32,
    value: impl Into<Vec<u8>>,
) -> BitwiseOperation {
    bytes_region(BitOpcode::Set, bin, bit_offset, bit_size, value)
}

pub fn or(
    bin: impl Into<String>,
    bit_offset: i64,
    bit_size: u32,
    value: impl Into<Vec<u8>>,
) -> BitwiseOperation {
    bytes_region(BitOpcode::Or, bin, bit_offset, bit_size, value)
}

pub fn xor(
    bin: impl Into<String>,
    bit_offset: i64,
    bit_size: u32,
    value: impl Into<Vec<u8>>,
) -> BitwiseOperation {
    bytes_region(BitOpcode::Xor, bin, bit_offset, bit_size, value)
}

pub fn and(
    bin: impl Into<String>,
    bit_offset: i64,
    bit_size: u32,
    value: impl Into<Vec<u8>>,
) -> BitwiseOperation {
    bytes_region(BitOpcode::And, bin, bit_offset, bit_size, value)
}

/// Inverts the addressed bit region.
pub fn not(bin: impl Into<String>, bit_offset: i64, bit_size: u32) -> BitwiseOperation {
    BitwiseOperation::new(BitOpcode::Not, bin, BitwiseArgs::Region { bit_offset, bit_size })
}

pub fn lshift(bin: impl Into<String>, bit_offset: i64, bit_size: u32, shift: u32) -> BitwiseOperation {
    BitwiseOperation::new(
        BitOpcode::Lshift,
        bin,
        BitwiseArgs::Shift {
            bit_offset,
            bit_size,
            shift,
        },
    )
}

pub fn rshift(bin: impl Into<String>, bit_offset: i64, bit_size: u32, shift: u32) -> BitwiseOperation {
    BitwiseOperation::new(
        BitOpcode::Rshift,
        bin,
        BitwiseArgs::Shift {
            bit_offset,
            bit_size,
            shift,
        },
    )
}

/// Adds `value` to the integer held in the addressed bit region. Overflow
/// fails unless changed with [`BitwiseOperation::on_overflow`].
pub fn add(bin: impl Into<String>, bit_offset: i64, bit_size: u32, value: i64) -> BitwiseOperation {
    BitwiseOperation::new(
        BitOpcode::Add,
        bin,
        BitwiseArgs::IntRegion {
            bit_offset,
            bit_size,
            value,
        },
    )
    .on_overflow(BitOverflowAction::Fail)
}

/// Subtracts `value` from the integer held in the addressed bit region.
pub fn subtract(bin: impl Into<String>, bit_offset: i64, bit_size: u32, value: i64) -> BitwiseOperation {
    BitwiseOperation::new(
        BitOpcode::Subtract,
        bin,
        BitwiseArgs::IntRegion {
            bit_offset,
            bit_size,
            value,
        },
    )
    .on_overflow(BitOverflowAction::Fail)
}

/// Overwrites the addressed bit region with the integer `value`.
pub fn set_int(bin: impl Into<String>, bit_offset: i64, bit_size: u32, value: i64) -> BitwiseOperation {
    BitwiseOperation::new(
        BitOpcode::SetInt,
        bin,
        BitwiseArgs::IntRegion {
            bit_offset,
            bit_size,
            value,
        },
    )
}

/// Reads the addressed bit region as a blob.
pub fn get(bin: impl Into<String>, bit_offset: i64, bit_size: u32) -> BitwiseOperation {
    BitwiseOperation::new(BitOpcode::Get, bin, BitwiseArgs::Region { bit_offset, bit_size })
}

/// Number of set bits in the addressed region.
pub fn count(bin: impl Into<String>, bit_offset: i64, bit_size: u32) -> BitwiseOperation {
    BitwiseOperation::new(BitOpcode::Count, bin, BitwiseArgs::Region { bit_offset, bit_size })
}

/// Offset of the first bit equal to `value`, scanning left-to-right.
pub fn lscan(bin: impl Into<String>, bit_offset: i64, bit_size: u32, value: bool) -> BitwiseOperation {
    BitwiseOperation::new(
        BitOpcode::Lscan,
        bin,
        BitwiseArgs::Scan {
            bit_offset,
            bit_size,
            value,
        },
    )
}

/// Offset of the first bit equal to `value`, scanning right-to-left.
pub fn rscan(bin: impl Into<String>, bit_offset: i64, bit_size: u32, value: bool) -> BitwiseOperation {
    BitwiseOperation::new(
        BitOpcode::Rscan,
        bin,
        BitwiseArgs::Scan {
            bit_offset,
            bit_size,
            value,
        },
    )
}

/// Reads the addressed bit region as an integer, sign-extended when `sign`.
pub fn get_int(bin: impl Into<String>, bit_offset: i64, bit_size: u32, sign: bool) -> BitwiseOperation {
    BitwiseOperation::new(
        BitOpcode::GetInt,
        bin,
        BitwiseArgs::SignedRegion {
            bit_offset,
            bit_size,
            sign,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::{bit_resize_flags, bit_write_flags};

    #[test]
    fn test_factory_carries_opcode_and_bin() {
        let op = resize("blob", 8, bit_resize_flags::GROW_ONLY);
        assert_eq!(op.op, BitOpcode::Resize);
        assert_eq!(op.bin, "blob");
        assert_eq!(
            op.args,
            BitwiseArgs::Resize {
                byte_size: 8,
                flags: bit_resize_flags::GROW_ONLY
            }
        );
        assert!(op.policy.is_none());
        assert!(op.context.is_none());
    }

    #[test]
    fn test_with_policy_chains() {
        let op = set("blob", 0, 8, vec![0xff]).with_policy(BitwisePolicy::new(bit_write_flags::UPDATE_ONLY));
        assert_eq!(op.policy, Some(BitwisePolicy::new(bit_write_flags::UPDATE_ONLY)));
    }

    #[test]
    fn test_add_defaults_to_fail_on_overflow() {
        let op = add("blob", 0, 8, 1);
        assert_eq!(op.overflow_action, Some(BitOverflowAction::Fail));
        let op = op.on_overflow(BitOverflowAction::Saturate);
        assert_eq!(op.overflow_action, Some(BitOverflowAction::Saturate));
    }

    #[test]
    fn test_with_context_copies() {
        let mut ctx = CdtContext::new();
        ctx.add_list_index(3).unwrap();
        let first = get("blob", 0, 8).with_context(&ctx);
        let second = count("blob", 0, 8).with_context(&ctx);
        // Later mutation is not visible from either attachment.
        ctx.add_list_index(4).unwrap();
        assert_eq!(first.context.as_ref().unwrap().len(), 1);
        assert_eq!(second.context.as_ref().unwrap().len(), 1);
        assert_eq!(ctx.len(), 2);
    }

    #[test]
    fn test_with_context_with_builds_fresh() {
        let op = get("blob", 0, 8).with_context_with(|ctx| {
            ctx.add_map_key("inner");
        });
        assert_eq!(op.context.unwrap().len(), 1);
    }
}
