//! HyperLogLog operation builders: descriptors for operate-style calls
//! against HLL bins. Same design as the bitwise module; sketches carry no
//! nested structure, so there is no context attachment.

use crate::ops::HllOpcode;
use crate::policy::HllPolicy;
use crate::types::Value;
use serde::{Deserialize, Serialize};

/// Verb-specific arguments of an HLL operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HllArgs {
    /// init
    Init { index_bits: i64, minhash_bits: i64 },
    /// add
    Add {
        values: Vec<Value>,
        index_bits: i64,
        minhash_bits: i64,
    },
    /// set_union / get_union / get_union_count / get_intersect_count /
    /// get_similarity (HLL sketches), may_contain (element values)
    Values { values: Vec<Value> },
    /// fold
    Fold { index_bits: i64 },
    /// refresh_count / get_count / describe
    Empty,
}

/// An HLL operation descriptor, ready for an operate-style call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HllOperation {
    pub op: HllOpcode,
    pub bin: String,
    pub args: HllArgs,
    pub policy: Option<HllPolicy>,
}

impl HllOperation {
    fn new(op: HllOpcode, bin: impl Into<String>, args: HllArgs) -> Self {
        Self {
            op,
            bin: bin.into(),
            args,
            policy: None,
        }
    }

    /// Attaches a write policy.
    pub fn with_policy(mut self, policy: HllPolicy) -> Self {
        self.policy = Some(policy);
        self
    }
}

/// Creates an empty sketch with the given index and min-hash bit counts.
pub fn init(bin: impl Into<String>, index_bits: i64, minhash_bits: i64) -> HllOperation {
    HllOperation::new(
        HllOpcode::Init,
        bin,
        HllArgs::Init {
            index_bits,
            minhash_bits,
        },
    )
}

/// Adds `values` to the sketch, creating it with the given bit counts if
/// absent.
pub fn add(
    bin: impl Into<String>,
    values: Vec<Value>,
    index_bits: i64,
    minhash_bits: i64,
) -> HllOperation {
    HllOperation::new(
        HllOpcode::Add,
        bin,
        HllArgs::Add {
            values,
            index_bits,
            minhash_bits,
        },
    )
}

/// Folds the union of the given sketches into the bin.
pub fn set_union(bin: impl Into<String>, values: Vec<Value>) -> HllOperation {
    HllOperation::new(HllOpcode::SetUnion, bin, HllArgs::Values { values })
}

/// Recomputes and stores the cached cardinality.
pub fn refresh_count(bin: impl Into<String>) -> HllOperation {
    HllOperation::new(HllOpcode::SetCount, bin, HllArgs::Empty)
}

/// Shrinks the sketch to `index_bits` index bits.
pub fn fold(bin: impl Into<String>, index_bits: i64) -> HllOperation {
    HllOperation::new(HllOpcode::Fold, bin, HllArgs::Fold { index_bits })
}

/// Estimated cardinality of the sketch.
pub fn get_count(bin: impl Into<String>) -> HllOperation {
    HllOperation::new(HllOpcode::Count, bin, HllArgs::Empty)
}

/// Union of this sketch with the given sketches.
pub fn get_union(bin: impl Into<String>, values: Vec<Value>) -> HllOperation {
    HllOperation::new(HllOpcode::Union, bin, HllArgs::Values { values })
}

/// Estimated cardinality of the union.
pub fn get_union_count(bin: impl Into<String>, values: Vec<Value>) -> HllOperation {
    HllOperation::new(HllOpcode::UnionCount, bin, HllArgs::Values { values })
}

/// Estimated cardinality of the intersection.
pub fn get_intersect_count(bin: impl Into<String>, values: Vec<Value>) -> HllOperation {
    HllOperation::new(HllOpcode::IntersectCount, bin, HllArgs::Values { values })
}

/// Estimated Jaccard similarity of the sketches.
pub fn get_similarity(bin: impl Into<String>, values: Vec<Value>) -> HllOperation {
    HllOperation::new(HllOpcode::Similarity, bin, HllArgs::Values { values })
}

/// The sketch's index and min-hash bit counts.
pub fn describe(bin: impl Into<String>) -> HllOperation {
    HllOperation::new(HllOpcode::Describe, bin, HllArgs::Empty)
}

/// For each of `values`, whether the sketch may contain it.
pub fn may_contain(bin: impl Into<String>, values: Vec<Value>) -> HllOperation {
    HllOperation::new(HllOpcode::MayContain, bin, HllArgs::Values { values })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::hll_write_flags;

    #[test]
    fn test_init_descriptor() {
        let op = init("sketch", 12, 16);
        assert_eq!(op.op, HllOpcode::Init);
        assert_eq!(op.bin, "sketch");
        assert_eq!(
            op.args,
            HllArgs::Init {
                index_bits: 12,
                minhash_bits: 16
            }
        );
    }

    #[test]
    fn test_with_policy_chains() {
        let op = add("sketch", vec![Value::from("a")], 12, 0)
            .with_policy(HllPolicy::new(hll_write_flags::CREATE_ONLY));
        assert_eq!(op.policy, Some(HllPolicy::new(hll_write_flags::CREATE_ONLY)));
    }

    #[test]
    fn test_read_factories_have_no_policy() {
        assert!(get_count("sketch").policy.is_none());
        assert!(describe("sketch").policy.is_none());
    }
}
