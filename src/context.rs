//! Context module: ordered selector paths addressing a nested collection
//! inside a bin's top-level list or map.
//!
//! A context is built fluently, attached to expressions or operation
//! descriptors, and interpreted by the native layer as a path prefix applied
//! before the verb. Contexts are copied on attach; mutating one after
//! attaching it does not change what was attached.

use crate::policy::{ListOrderType, MapOrderType};
use crate::types::{ExpType, Value};
use crate::RecwireError;
use serde::{Deserialize, Serialize};

// Base selector tags understood by the native layer. Create-variant order
// flags are OR'd into the top two bits at the serialization boundary.
const LIST_INDEX: u8 = 0x10;
const LIST_RANK: u8 = 0x11;
const LIST_VALUE: u8 = 0x13;
const MAP_INDEX: u8 = 0x20;
const MAP_RANK: u8 = 0x21;
const MAP_KEY: u8 = 0x22;
const MAP_VALUE: u8 = 0x23;

/// Which collection flavor a selector steps into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectionKind {
    List,
    Map,
}

/// One step of a context path.
///
/// Every variant knows statically whether it addresses a list or a map; the
/// packed native tag exists only at the serialization boundary
/// ([`CdtSelector::type_tag`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CdtSelector {
    ListIndex { index: i32 },
    ListIndexCreate { index: i32, order: ListOrderType, pad: bool },
    ListRank { rank: i32 },
    ListValue { value: Value },
    MapIndex { index: i32 },
    MapRank { rank: i32 },
    MapKey { key: Value },
    MapKeyCreate { key: Value, order: MapOrderType },
    MapValue { value: Value },
}

impl CdtSelector {
    /// The collection flavor this selector addresses.
    pub const fn target(&self) -> CollectionKind {
        match self {
            CdtSelector::ListIndex { .. }
            | CdtSelector::ListIndexCreate { .. }
            | CdtSelector::ListRank { .. }
            | CdtSelector::ListValue { .. } => CollectionKind::List,
            CdtSelector::MapIndex { .. }
            | CdtSelector::MapRank { .. }
            | CdtSelector::MapKey { .. }
            | CdtSelector::MapKeyCreate { .. }
            | CdtSelector::MapValue { .. } => CollectionKind::Map,
        }
    }

    /// The packed native selector tag, create-order flags included.
    pub fn type_tag(&self) -> u8 {
        match self {
            CdtSelector::ListIndex { .. } => LIST_INDEX,
            CdtSelector::ListIndexCreate { order, pad, .. } => {
                LIST_INDEX | list_create_flag(*order, *pad)
            }
            CdtSelector::ListRank { .. } => LIST_RANK,
            CdtSelector::ListValue { .. } => LIST_VALUE,
            CdtSelector::MapIndex { .. } => MAP_INDEX,
            CdtSelector::MapRank { .. } => MAP_RANK,
            CdtSelector::MapKey { .. } => MAP_KEY,
            CdtSelector::MapKeyCreate { order, .. } => MAP_KEY | map_create_flag(*order),
            CdtSelector::MapValue { .. } => MAP_VALUE,
        }
    }

    /// The selector argument, as the value handed to the native layer.
    pub fn value(&self) -> Value {
        match self {
            CdtSelector::ListIndex { index }
            | CdtSelector::ListIndexCreate { index, .. }
            | CdtSelector::MapIndex { index } => Value::Int(i64::from(*index)),
            CdtSelector::ListRank { rank } | CdtSelector::MapRank { rank } => {
                Value::Int(i64::from(*rank))
            }
            CdtSelector::ListValue { value } | CdtSelector::MapValue { value } => value.clone(),
            CdtSelector::MapKey { key } | CdtSelector::MapKeyCreate { key, .. } => key.clone(),
        }
    }
}

// An ordered list keeps its order under padded inserts, so the pad flag is
// meaningless there and the native encoding collapses it.
fn list_create_flag(order: ListOrderType, pad: bool) -> u8 {
    match (order, pad) {
        (ListOrderType::Ordered, _) => 0xc0,
        (ListOrderType::Unordered, true) => 0x80,
        (ListOrderType::Unordered, false) => 0x40,
    }
}

fn map_create_flag(order: MapOrderType) -> u8 {
    match order {
        MapOrderType::Unordered => 0x40,
        MapOrderType::KeyOrdered => 0x80,
        MapOrderType::KeyValueOrdered => 0xc0,
    }
}

/// An ordered path of selectors into a nested CDT.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CdtContext {
    items: Vec<CdtSelector>,
}

impl CdtContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Steps into the list element at `index`.
    pub fn add_list_index(&mut self, index: i64) -> Result<&mut Self, RecwireError> {
        let index = check_i32("index", index)?;
        self.items.push(CdtSelector::ListIndex { index });
        Ok(self)
    }

    /// Steps into the list element at `index`, creating it if absent.
    pub fn add_list_index_create(
        &mut self,
        index: i64,
        order: ListOrderType,
        pad: bool,
    ) -> Result<&mut Self, RecwireError> {
        let index = check_i32("index", index)?;
        self.items
            .push(CdtSelector::ListIndexCreate { index, order, pad });
        Ok(self)
    }

    /// Steps into the list element at `rank`.
    pub fn add_list_rank(&mut self, rank: i64) -> Result<&mut Self, RecwireError> {
        let rank = check_i32("rank", rank)?;
        self.items.push(CdtSelector::ListRank { rank });
        Ok(self)
    }

    /// Steps into the first list element equal to `value`.
    pub fn add_list_value(&mut self, value: impl Into<Value>) -> &mut Self {
        self.items.push(CdtSelector::ListValue {
            value: value.into(),
        });
        self
    }

    /// Steps into the map entry at `index`.
    pub fn add_map_index(&mut self, index: i64) -> Result<&mut Self, RecwireError> {
        let index = check_i32("index", index)?;
        self.items.push(CdtSelector::MapIndex { index });
        Ok(self)
    }

    /// Steps into the map entry at `rank`.
    pub fn add_map_rank(&mut self, rank: i64) -> Result<&mut Self, RecwireError> {
        let rank = check_i32("rank", rank)?;
        self.items.push(CdtSelector::MapRank { rank });
        Ok(self)
    }

    /// Steps into the map entry under `key`.
    pub fn add_map_key(&mut self, key: impl Into<Value>) -> &mut Self {
        self.items.push(CdtSelector::MapKey { key: key.into() });
        self
    }

    /// Steps into the map entry under `key`, creating it if absent.
    pub fn add_map_key_create(
        &mut self,
        key: impl Into<Value>,
        order: MapOrderType,
    ) -> &mut Self {
        self.items.push(CdtSelector::MapKeyCreate {
            key: key.into(),
            order,
        });
        self
    }

    /// Steps into the first map entry whose value equals `value`.
    pub fn add_map_value(&mut self, value: impl Into<Value>) -> &mut Self {
        self.items.push(CdtSelector::MapValue {
            value: value.into(),
        });
        self
    }

    pub fn items(&self) -> &[CdtSelector] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The result type of an operation scoped by `ctx`: the collection kind
    /// addressed by the innermost selector, or `default` when no context (or
    /// an empty one) is given.
    pub fn context_type(ctx: Option<&CdtContext>, default: ExpType) -> ExpType {
        match ctx.and_then(|c| c.items.last()) {
            Some(sel) => match sel.target() {
                CollectionKind::List => ExpType::List,
                CollectionKind::Map => ExpType::Map,
            },
            None => default,
        }
    }
}

fn check_i32(what: &str, value: i64) -> Result<i32, RecwireError> {
    if value > i64::from(i32::MAX) {
        return Err(RecwireError::Range(format!(
            "{what} {value} exceeds maximum {}",
            i32::MAX
        )));
    }
    if value < i64::from(i32::MIN) {
        return Err(RecwireError::Range(format!(
            "{what} {value} below minimum {}",
            i32::MIN
        )));
    }
    Ok(value as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fluent_chaining() {
        let mut ctx = CdtContext::new();
        ctx.add_list_index(3)
            .unwrap()
            .add_map_key("inner")
            .add_list_rank(-1)
            .unwrap();
        assert_eq!(ctx.len(), 3);
        assert_eq!(ctx.items()[0], CdtSelector::ListIndex { index: 3 });
    }

    #[test]
    fn test_index_overflow_leaves_context_unchanged() {
        let mut ctx = CdtContext::new();
        ctx.add_list_index(1).unwrap();
        let err = ctx.add_list_index(2_147_483_648).unwrap_err();
        assert!(matches!(err, RecwireError::Range(_)));
        assert!(err.to_string().contains("2147483647"));
        assert_eq!(ctx.len(), 1);
    }

    #[test]
    fn test_rank_underflow_leaves_context_unchanged() {
        let mut ctx = CdtContext::new();
        let err = ctx.add_map_rank(-2_147_483_649).unwrap_err();
        assert!(matches!(err, RecwireError::Range(_)));
        assert!(err.to_string().contains("-2147483648"));
        assert!(ctx.is_empty());
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let mut ctx = CdtContext::new();
        ctx.add_list_index(2_147_483_647).unwrap();
        ctx.add_list_rank(-2_147_483_648).unwrap();
        ctx.add_map_index(0).unwrap();
        assert_eq!(ctx.len(), 3);
    }

    #[test]
    fn test_create_variants_validate_too() {
        let mut ctx = CdtContext::new();
        assert!(ctx
            .add_list_index_create(i64::from(i32::MAX) + 1, ListOrderType::Unordered, false)
            .is_err());
        assert!(ctx.is_empty());
    }

    #[test]
    fn test_list_create_flag_packing_pairwise_distinct() {
        let unordered_pad = CdtSelector::ListIndexCreate {
            index: 4,
            order: ListOrderType::Unordered,
            pad: true,
        };
        let ordered_pad = CdtSelector::ListIndexCreate {
            index: 4,
            order: ListOrderType::Ordered,
            pad: true,
        };
        let unordered_nopad = CdtSelector::ListIndexCreate {
            index: 4,
            order: ListOrderType::Unordered,
            pad: false,
        };
        let tags = [
            unordered_pad.type_tag(),
            ordered_pad.type_tag(),
            unordered_nopad.type_tag(),
        ];
        assert_ne!(tags[0], tags[1]);
        assert_ne!(tags[0], tags[2]);
        assert_ne!(tags[1], tags[2]);
        // All derive from the plain list-index tag.
        for tag in tags {
            assert_eq!(tag & 0x3f, CdtSelector::ListIndex { index: 4 }.type_tag());
        }
    }

    #[test]
    fn test_map_create_flag_packing() {
        let base = CdtSelector::MapKey { key: "k".into() }.type_tag();
        let unordered = CdtSelector::MapKeyCreate {
            key: "k".into(),
            order: MapOrderType::Unordered,
        }
        .type_tag();
        let key_ordered = CdtSelector::MapKeyCreate {
            key: "k".into(),
            order: MapOrderType::KeyOrdered,
        }
        .type_tag();
        let kv_ordered = CdtSelector::MapKeyCreate {
            key: "k".into(),
            order: MapOrderType::KeyValueOrdered,
        }
        .type_tag();
        assert_eq!(unordered & 0x3f, base);
        assert_ne!(unordered, key_ordered);
        assert_ne!(key_ordered, kv_ordered);
        assert_ne!(unordered, kv_ordered);
    }

    #[test]
    fn test_context_type_uses_innermost_selector() {
        let mut ctx = CdtContext::new();
        ctx.add_list_index(0).unwrap().add_map_key("k");
        assert_eq!(
            CdtContext::context_type(Some(&ctx), ExpType::List),
            ExpType::Map
        );

        let mut ctx = CdtContext::new();
        ctx.add_map_key("k").add_list_index(0).unwrap();
        assert_eq!(
            CdtContext::context_type(Some(&ctx), ExpType::Map),
            ExpType::List
        );
    }

    #[test]
    fn test_context_type_falls_back_to_default() {
        assert_eq!(CdtContext::context_type(None, ExpType::List), ExpType::List);
        let empty = CdtContext::new();
        assert_eq!(
            CdtContext::context_type(Some(&empty), ExpType::Map),
            ExpType::Map
        );
    }

    #[test]
    fn test_selector_values() {
        let mut ctx = CdtContext::new();
        ctx.add_map_key("user").add_list_value(7i64);
        assert_eq!(ctx.items()[0].value(), Value::Str("user".to_string()));
        assert_eq!(ctx.items()[1].value(), Value::Int(7));
    }

    #[test]
    fn test_serialization_deserialization() {
        let mut ctx = CdtContext::new();
        ctx.add_list_index_create(2, ListOrderType::Ordered, false)
            .unwrap()
            .add_map_key("k");
        let json = serde_json::to_string(&ctx).unwrap();
        let deser: CdtContext = serde_json::from_str(&json).unwrap();
        assert_eq!(ctx, deser);
    }
}
