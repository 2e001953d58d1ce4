//! Native opcode and flag enumerations.
//!
//! Everything in this module mirrors a constant exported by the native driver
//! layer. The compiler treats the values as opaque integers; the only thing it
//! relies on is that they round-trip unchanged into the instruction sequence.

use serde::{Deserialize, Serialize};

/// Expression operation codes understood by the native evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ExpOp {
    Unknown = 0,
    CmpEq = 1,
    CmpNe = 2,
    CmpGt = 3,
    CmpGe = 4,
    CmpLt = 5,
    CmpLe = 6,
    CmpRegex = 7,
    CmpGeo = 8,
    And = 16,
    Or = 17,
    Not = 18,
    Exclusive = 19,
    Add = 20,
    Sub = 21,
    Mul = 22,
    Div = 23,
    Pow = 24,
    Log = 25,
    Mod = 26,
    Abs = 27,
    Floor = 28,
    Ceil = 29,
    ToInt = 30,
    ToFloat = 31,
    IntAnd = 32,
    IntOr = 33,
    IntXor = 34,
    IntNot = 35,
    IntLshift = 36,
    IntRshift = 37,
    IntArshift = 38,
    IntCount = 39,
    IntLscan = 40,
    IntRscan = 41,
    Min = 50,
    Max = 51,
    DigestModulo = 64,
    DeviceSize = 65,
    LastUpdate = 66,
    SinceUpdate = 67,
    VoidTime = 68,
    Ttl = 69,
    SetName = 70,
    KeyExist = 71,
    IsTombstone = 72,
    MemorySize = 73,
    RecordSize = 74,
    Key = 80,
    Bin = 81,
    BinType = 82,
    Cond = 123,
    Var = 124,
    Let = 125,
    Quote = 126,
    Call = 127,
    AsVal = 128,
    ValGeo = 129,
    ValPk = 130,
    ValInt = 131,
    ValUint = 132,
    ValFloat = 133,
    ValBool = 134,
    ValStr = 135,
    ValBytes = 136,
    ValRawStr = 137,
    ValRtype = 138,
    CallVopStart = 139,
    CdtListCrMod = 140,
    CdtListMod = 141,
    CdtMapCrMod = 142,
    CdtMapCr = 143,
    CdtMapMod = 144,
    EndOfVaArgs = 150,
}

impl ExpOp {
    pub const fn code(self) -> u16 {
        self as u16
    }
}

/// System-call selector and flags carried by the CALL header.
pub mod sys {
    pub const CALL_CDT: i64 = 0;
    pub const CALL_BITS: i64 = 1;
    pub const CALL_HLL: i64 = 2;
    /// OR'd into the selector for modify operations evaluated on a local copy.
    pub const FLAG_MODIFY_LOCAL: i64 = 0x40;
}

/// List CDT verb opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ListOpcode {
    SetType = 0,
    Append = 1,
    AppendItems = 2,
    Insert = 3,
    InsertItems = 4,
    Pop = 5,
    PopRange = 6,
    Remove = 7,
    RemoveRange = 8,
    Set = 9,
    Trim = 10,
    Clear = 11,
    Increment = 12,
    Sort = 13,
    Size = 16,
    Get = 17,
    GetRange = 18,
    GetByIndex = 19,
    GetByRank = 21,
    GetAllByValue = 22,
    GetByValueList = 23,
    GetByIndexRange = 24,
    GetByValueInterval = 25,
    GetByRankRange = 26,
    GetByValueRelRankRange = 27,
    RemoveByIndex = 32,
    RemoveByRank = 34,
    RemoveAllByValue = 35,
    RemoveByValueList = 36,
    RemoveByIndexRange = 37,
    RemoveByValueInterval = 38,
    RemoveByRankRange = 39,
    RemoveByValueRelRankRange = 40,
}

impl ListOpcode {
    pub const fn code(self) -> i64 {
        self as i64
    }
}

/// Map CDT verb opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum MapOpcode {
    SetType = 64,
    Add = 65,
    AddItems = 66,
    Put = 67,
    PutItems = 68,
    Replace = 69,
    ReplaceItems = 70,
    Increment = 73,
    Decrement = 74,
    Clear = 75,
    RemoveByKey = 76,
    RemoveByIndex = 77,
    RemoveByRank = 79,
    RemoveByKeyList = 81,
    RemoveAllByValue = 82,
    RemoveByValueList = 83,
    RemoveByKeyInterval = 84,
    RemoveByIndexRange = 85,
    RemoveByValueInterval = 86,
    RemoveByRankRange = 87,
    RemoveByKeyRelIndexRange = 88,
    RemoveByValueRelRankRange = 89,
    Size = 96,
    GetByKey = 97,
    GetByIndex = 98,
    GetByRank = 100,
    GetAllByValue = 102,
    GetByKeyInterval = 103,
    GetByIndexRange = 104,
    GetByValueInterval = 105,
    GetByRankRange = 106,
    GetByKeyList = 107,
    GetByValueList = 108,
    GetByKeyRelIndexRange = 109,
    GetByValueRelRankRange = 110,
}

impl MapOpcode {
    pub const fn code(self) -> i64 {
        self as i64
    }
}

/// Requested result shape for list read operations. The INVERTED bit selects
/// the complement of the matched elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListReturnType(pub u32);

impl ListReturnType {
    pub const NONE: Self = Self(0);
    pub const INDEX: Self = Self(1);
    pub const REVERSE_INDEX: Self = Self(2);
    pub const RANK: Self = Self(3);
    pub const REVERSE_RANK: Self = Self(4);
    pub const COUNT: Self = Self(5);
    pub const VALUE: Self = Self(7);
    pub const EXISTS: Self = Self(13);

    pub const INVERTED: u32 = 0x10000;

    /// The complement of this return type.
    pub const fn inverted(self) -> Self {
        Self(self.0 | Self::INVERTED)
    }

    /// The return type with the INVERTED bit stripped.
    pub(crate) const fn base(self) -> u32 {
        self.0 & !Self::INVERTED
    }

    pub const fn code(self) -> i64 {
        self.0 as i64
    }
}

/// Requested result shape for map read operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MapReturnType(pub u32);

impl MapReturnType {
    pub const NONE: Self = Self(0);
    pub const INDEX: Self = Self(1);
    pub const REVERSE_INDEX: Self = Self(2);
    pub const RANK: Self = Self(3);
    pub const REVERSE_RANK: Self = Self(4);
    pub const COUNT: Self = Self(5);
    pub const KEY: Self = Self(6);
    pub const VALUE: Self = Self(7);
    pub const KEY_VALUE: Self = Self(8);
    pub const EXISTS: Self = Self(13);

    pub const INVERTED: u32 = 0x10000;

    pub const fn inverted(self) -> Self {
        Self(self.0 | Self::INVERTED)
    }

    pub(crate) const fn base(self) -> u32 {
        self.0 & !Self::INVERTED
    }

    pub const fn code(self) -> i64 {
        self.0 as i64
    }
}

/// Flags for the list sort verb. OR-able.
pub mod list_sort_flags {
    pub const DEFAULT: i64 = 0;
    pub const DESCENDING: i64 = 1;
    pub const DROP_DUPLICATES: i64 = 2;
}

/// Bitwise (blob bin) verb opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum BitOpcode {
    Resize = 0,
    Insert = 1,
    Remove = 2,
    Set = 3,
    Or = 4,
    Xor = 5,
    And = 6,
    Not = 7,
    Lshift = 8,
    Rshift = 9,
    Add = 10,
    Subtract = 11,
    SetInt = 12,
    Get = 13,
    Count = 14,
    Lscan = 15,
    Rscan = 16,
    GetInt = 17,
}

impl BitOpcode {
    pub const fn code(self) -> i64 {
        self as i64
    }
}

/// Flags for the bitwise resize verb. OR-able.
pub mod bit_resize_flags {
    pub const DEFAULT: i64 = 0;
    pub const FROM_FRONT: i64 = 1;
    pub const GROW_ONLY: i64 = 2;
    pub const SHRINK_ONLY: i64 = 4;
}

/// Write flags carried by a bitwise policy. OR-able.
pub mod bit_write_flags {
    pub const DEFAULT: i64 = 0;
    pub const CREATE_ONLY: i64 = 1;
    pub const UPDATE_ONLY: i64 = 2;
    pub const NO_FAIL: i64 = 4;
    pub const PARTIAL: i64 = 8;
}

/// Behavior when a bitwise add/subtract overflows the target width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum BitOverflowAction {
    Fail = 0,
    Saturate = 2,
    Wrap = 4,
}

impl BitOverflowAction {
    pub const fn code(self) -> i64 {
        self as i64
    }
}

/// HyperLogLog verb opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum HllOpcode {
    Init = 0,
    Add = 1,
    SetUnion = 4,
    SetCount = 5,
    Fold = 6,
    Count = 50,
    Union = 51,
    UnionCount = 52,
    IntersectCount = 53,
    Similarity = 54,
    Describe = 55,
    MayContain = 56,
}

impl HllOpcode {
    pub const fn code(self) -> i64 {
        self as i64
    }
}

/// Write flags carried by an HLL policy. OR-able.
pub mod hll_write_flags {
    pub const DEFAULT: i64 = 0;
    pub const CREATE_ONLY: i64 = 1;
    pub const UPDATE_ONLY: i64 = 2;
    pub const NO_FAIL: i64 = 4;
    pub const ALLOW_FOLD: i64 = 8;
}

/// Write flags carried by a list policy. OR-able.
pub mod list_write_flags {
    pub const DEFAULT: u32 = 0;
    pub const ADD_UNIQUE: u32 = 1;
    pub const INSERT_BOUNDED: u32 = 2;
    pub const NO_FAIL: u32 = 4;
    pub const PARTIAL: u32 = 8;
}

/// Write flags carried by a map policy. OR-able.
pub mod map_write_flags {
    pub const DEFAULT: u32 = 0;
    pub const CREATE_ONLY: u32 = 1;
    pub const UPDATE_ONLY: u32 = 2;
    pub const NO_FAIL: u32 = 4;
    pub const PARTIAL: u32 = 8;
}

/// Flags for the regex comparison, matching the native matcher's options.
pub mod regex_flags {
    pub const NONE: i64 = 0;
    pub const EXTENDED: i64 = 1;
    pub const ICASE: i64 = 2;
    pub const NOSUB: i64 = 4;
    pub const NEWLINE: i64 = 8;
}
