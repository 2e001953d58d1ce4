//! Write policies attached to CDT modify operations.
//!
//! Policies never change what a builder emits structurally; they ride along in
//! a marker instruction (lists/maps) or a flags parameter (bitwise/HLL) and
//! are decoded by the native layer.

use serde::{Deserialize, Serialize};

/// Storage order of a list bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListOrderType {
    Unordered = 0,
    Ordered = 1,
}

/// Storage order of a map bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MapOrderType {
    Unordered = 0,
    KeyOrdered = 1,
    KeyValueOrdered = 3,
}

/// Write policy for list modify operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListPolicy {
    pub order: ListOrderType,
    /// OR of [`crate::ops::list_write_flags`] values.
    pub write_flags: u32,
}

impl ListPolicy {
    pub const fn new(order: ListOrderType, write_flags: u32) -> Self {
        Self { order, write_flags }
    }
}

impl Default for ListPolicy {
    fn default() -> Self {
        Self::new(ListOrderType::Unordered, crate::ops::list_write_flags::DEFAULT)
    }
}

/// Write policy for map modify operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapPolicy {
    pub order: MapOrderType,
    /// OR of [`crate::ops::map_write_flags`] values.
    pub write_flags: u32,
}

impl MapPolicy {
    pub const fn new(order: MapOrderType, write_flags: u32) -> Self {
        Self { order, write_flags }
    }
}

impl Default for MapPolicy {
    fn default() -> Self {
        Self::new(MapOrderType::Unordered, crate::ops::map_write_flags::DEFAULT)
    }
}

/// Write policy for bitwise operations on blob bins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BitwisePolicy {
    /// OR of [`crate::ops::bit_write_flags`] values.
    pub flags: i64,
}

impl BitwisePolicy {
    pub const fn new(flags: i64) -> Self {
        Self { flags }
    }
}

/// Write policy for HyperLogLog operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HllPolicy {
    /// OR of [`crate::ops::hll_write_flags`] values.
    pub flags: i64,
}

impl HllPolicy {
    pub const fn new(flags: i64) -> Self {
        Self { flags }
    }
}
