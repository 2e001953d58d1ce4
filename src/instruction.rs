//! Instruction model: the flat, ordered, tagged sequence handed to the native
//! evaluator, plus the emitter combinators every builder composes from.
//!
//! A sequence is a pre-order encoding of an expression tree. Fixed-arity nodes
//! declare how many operand subtrees follow them; variadic nodes are closed by
//! a sentinel instead. The native layer interprets the sequence with a stack,
//! so insertion order is load-bearing and sequences compose only by
//! concatenation.

use crate::context::CdtContext;
use crate::ops::{sys, ExpOp};
use crate::policy::{ListPolicy, MapPolicy};
use crate::types::ExpType;
use serde::{Deserialize, Serialize};

/// A compiled filter expression: the unit passed to the native driver.
pub type FilterExpression = Vec<Instruction>;

/// Scalar payload carried inline by a [`Instruction::Value`] instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InstrValue {
    Nil,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Str(String),
    /// Unquoted string, used for bin and variable names.
    RawStr(String),
    Bytes { value: Vec<u8>, size: usize },
    /// GeoJSON document.
    Geo(String),
    /// An int tagged so the evaluator reads it as a return-type operand
    /// rather than user data.
    ResultType(ExpType),
}

impl InstrValue {
    /// The native value opcode this payload serializes under.
    pub const fn opcode(&self) -> ExpOp {
        match self {
            InstrValue::Nil => ExpOp::AsVal,
            InstrValue::Bool(_) => ExpOp::ValBool,
            InstrValue::Int(_) => ExpOp::ValInt,
            InstrValue::Uint(_) => ExpOp::ValUint,
            InstrValue::Float(_) => ExpOp::ValFloat,
            InstrValue::Str(_) => ExpOp::ValStr,
            InstrValue::RawStr(_) => ExpOp::ValRawStr,
            InstrValue::Bytes { .. } => ExpOp::ValBytes,
            InstrValue::Geo(_) => ExpOp::ValGeo,
            InstrValue::ResultType(_) => ExpOp::ValRtype,
        }
    }
}

/// One tagged unit in a compiled sequence, one variant per structural role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Instruction {
    /// An inline scalar operand.
    Value(InstrValue),
    /// A fixed-arity operator. `count` includes the instruction itself: it is
    /// 1 plus the number of operand subtrees that follow.
    Header { op: ExpOp, count: usize },
    /// A zero-operand accessor (record metadata).
    Bare { op: ExpOp },
    /// Opens a variadic operator. Carries no count; the matching
    /// [`Instruction::VarargsEnd`] is the sole terminator.
    VarargsBegin { op: ExpOp },
    /// Terminates a variadic operator.
    VarargsEnd,
    /// CDT verb header (CALL_VOP_START). `count` covers the verb opcode plus
    /// its declared parameter slots; carries the attached context path.
    CallStart {
        count: usize,
        ctx: Option<CdtContext>,
    },
    /// List write-policy marker, expanded to create/modify flags natively.
    ListPolicy { op: ExpOp, policy: ListPolicy },
    /// Map write-policy marker.
    MapPolicy { op: ExpOp, policy: MapPolicy },
}

impl Instruction {
    /// Number of parameter slots this instruction occupies in an enclosing
    /// CDT call. Policy markers expand to more than one native operand; every
    /// other instruction roots exactly one subtree.
    pub const fn param_slots(&self) -> usize {
        match self {
            Instruction::ListPolicy { op: ExpOp::CdtListCrMod, .. } => 2,
            Instruction::MapPolicy { op: ExpOp::CdtMapCrMod, .. } => 2,
            _ => 1,
        }
    }
}

/// Number of fields in a CALL header group: the header itself, the result
/// type, the system-call selector, the verb group, and the trailing bin.
pub const CALL_HEADER_COUNT: usize = 5;

pub(crate) fn nil() -> FilterExpression {
    vec![Instruction::Value(InstrValue::Nil)]
}

pub(crate) fn int(value: i64) -> FilterExpression {
    vec![Instruction::Value(InstrValue::Int(value))]
}

pub(crate) fn raw_str(value: impl Into<String>) -> FilterExpression {
    vec![Instruction::Value(InstrValue::RawStr(value.into()))]
}

/// A fixed-arity operator followed by its operand subtrees.
pub(crate) fn fixed(
    op: ExpOp,
    operands: impl IntoIterator<Item = FilterExpression>,
) -> FilterExpression {
    let mut seq = Vec::new();
    let mut count = 1;
    for operand in operands {
        count += 1;
        seq.extend(operand);
    }
    let mut out = vec![Instruction::Header { op, count }];
    out.extend(seq);
    out
}

/// A variadic operator: opening opcode, operand subtrees, terminator. No
/// operand count is declared; the sentinel alone delimits the node.
pub(crate) fn varargs(
    op: ExpOp,
    operands: impl IntoIterator<Item = FilterExpression>,
) -> FilterExpression {
    let mut seq = vec![Instruction::VarargsBegin { op }];
    for operand in operands {
        seq.extend(operand);
    }
    seq.push(Instruction::VarargsEnd);
    seq
}

/// Accumulator for CDT/bitwise/HLL call groups.
///
/// Opens the fixed 5-field CALL header and the verb header, then derives the
/// verb header's declared count from the parameters actually appended, so the
/// declared count can never drift from the emitted sequence.
#[derive(Debug)]
pub(crate) struct CdtCall {
    seq: FilterExpression,
    vop: usize,
}

impl CdtCall {
    /// Opens a read call.
    pub(crate) fn read(
        system: i64,
        result: ExpType,
        ctx: Option<&CdtContext>,
        verb: i64,
    ) -> Self {
        Self::open(system, result, ctx, verb)
    }

    /// Opens a modify call, evaluated on a local copy of the bin.
    pub(crate) fn modify(
        system: i64,
        result: ExpType,
        ctx: Option<&CdtContext>,
        verb: i64,
    ) -> Self {
        Self::open(system | sys::FLAG_MODIFY_LOCAL, result, ctx, verb)
    }

    fn open(system: i64, result: ExpType, ctx: Option<&CdtContext>, verb: i64) -> Self {
        let mut seq = vec![
            Instruction::Header {
                op: ExpOp::Call,
                count: CALL_HEADER_COUNT,
            },
            Instruction::Value(InstrValue::ResultType(result)),
            Instruction::Value(InstrValue::Int(system)),
        ];
        let vop = seq.len();
        seq.push(Instruction::CallStart {
            count: 1,
            ctx: ctx.cloned(),
        });
        seq.push(Instruction::Value(InstrValue::Int(verb)));
        CdtCall { seq, vop }
    }

    /// Appends one operand subtree.
    pub(crate) fn param(mut self, operand: FilterExpression) -> Self {
        self.seq.extend(operand);
        self.bump(1);
        self
    }

    /// Appends a literal int operand.
    pub(crate) fn int_param(self, value: i64) -> Self {
        self.param(int(value))
    }

    /// Appends a list create/modify policy marker when a policy is present.
    pub(crate) fn list_crmod(self, policy: Option<&ListPolicy>) -> Self {
        self.policy_marker(policy.map(|p| Instruction::ListPolicy {
            op: ExpOp::CdtListCrMod,
            policy: *p,
        }))
    }

    /// Appends a list modify-only policy marker when a policy is present.
    pub(crate) fn list_mod(self, policy: Option<&ListPolicy>) -> Self {
        self.policy_marker(policy.map(|p| Instruction::ListPolicy {
            op: ExpOp::CdtListMod,
            policy: *p,
        }))
    }

    /// Appends a map create/modify policy marker when a policy is present.
    pub(crate) fn map_crmod(self, policy: Option<&MapPolicy>) -> Self {
        self.policy_marker(policy.map(|p| Instruction::MapPolicy {
            op: ExpOp::CdtMapCrMod,
            policy: *p,
        }))
    }

    /// Appends a map create-only policy marker when a policy is present.
    pub(crate) fn map_cr(self, policy: Option<&MapPolicy>) -> Self {
        self.policy_marker(policy.map(|p| Instruction::MapPolicy {
            op: ExpOp::CdtMapCr,
            policy: *p,
        }))
    }

    fn policy_marker(mut self, marker: Option<Instruction>) -> Self {
        if let Some(instr) = marker {
            self.bump(instr.param_slots());
            self.seq.push(instr);
        }
        self
    }

    /// Appends the trailing bin subtree and yields the finished sequence.
    pub(crate) fn finish(mut self, bin: FilterExpression) -> FilterExpression {
        self.seq.extend(bin);
        self.seq
    }

    fn bump(&mut self, slots: usize) {
        if let Instruction::CallStart { count, .. } = &mut self.seq[self.vop] {
            *count += slots;
        }
    }
}
