//! Rule AST and evaluation.
//!
//! A rule set is two independent condition trees, buy and sell. Trees are
//! closed tagged variants parsed once at load time; evaluation per bar is
//! pure, stateless and fail-closed: a leaf whose field is undefined (NaN) is
//! false regardless of operator.

use std::fmt;

use crate::domain::frame::{Field, FrameRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Gt,
    Lt,
    Eq,
}

impl CmpOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            CmpOp::Gt => ">",
            CmpOp::Lt => "<",
            CmpOp::Eq => "=",
        }
    }

    pub fn parse(symbol: &str) -> Option<CmpOp> {
        match symbol {
            ">" => Some(CmpOp::Gt),
            "<" => Some(CmpOp::Lt),
            "=" => Some(CmpOp::Eq),
            _ => None,
        }
    }
}

impl fmt::Display for CmpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Leaf {
        field: Field,
        op: CmpOp,
        threshold: f64,
    },
    All(Vec<Condition>),
    Any(Vec<Condition>),
}

/// The buy and sell trees of one rule set.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalRules {
    pub buy: Condition,
    pub sell: Condition,
}

/// Evaluate a condition tree against one annotated bar.
///
/// `All([])` is vacuously true and `Any([])` is false, matching the usual
/// quantifier conventions; both are pinned down by tests.
pub fn evaluate(condition: &Condition, row: &FrameRow) -> bool {
    match condition {
        Condition::Leaf {
            field,
            op,
            threshold,
        } => {
            let value = row.get(*field);
            if value.is_nan() {
                return false;
            }
            match op {
                CmpOp::Gt => value > *threshold,
                CmpOp::Lt => value < *threshold,
                // Exact IEEE equality, as configured. Brittle for computed
                // indicator values; useful for discrete ones like Volume.
                CmpOp::Eq => value == *threshold,
            }
        }
        Condition::All(children) => children.iter().all(|c| evaluate(c, row)),
        Condition::Any(children) => children.iter().any(|c| evaluate(c, row)),
    }
}
