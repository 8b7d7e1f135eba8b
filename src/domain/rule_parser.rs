//! Rule document parsing and serialization.
//!
//! The rule store is a YAML document with top-level `buy_signal` and
//! `sell_signal` trees. A node is one of:
//!
//! ```yaml
//! and:            # every child must hold
//!   - ...
//! or:             # at least one child must hold
//!   - ...
//! RSI: "< 30"     # leaf: FIELD, operator, numeric threshold
//! ```
//!
//! Parsing is strict: unknown fields, unknown operators, multi-key leaves or
//! any other shape are a configuration error here, never per bar. Parsing a
//! saved document yields the identical tree (lossless round-trip).

use serde_yaml::{Mapping, Value};

use crate::domain::error::SweeptraderError;
use crate::domain::frame::Field;
use crate::domain::rule::{CmpOp, Condition, SignalRules};

const BUY_KEY: &str = "buy_signal";
const SELL_KEY: &str = "sell_signal";

pub fn parse_rules(doc: &Value) -> Result<SignalRules, SweeptraderError> {
    let mapping = doc.as_mapping().ok_or_else(|| invalid(
        "rule document must be a mapping with buy_signal and sell_signal",
    ))?;

    let buy = tree_for(mapping, BUY_KEY)?;
    let sell = tree_for(mapping, SELL_KEY)?;
    Ok(SignalRules { buy, sell })
}

pub fn rules_to_value(rules: &SignalRules) -> Value {
    let mut doc = Mapping::new();
    doc.insert(
        Value::String(BUY_KEY.to_string()),
        condition_to_value(&rules.buy),
    );
    doc.insert(
        Value::String(SELL_KEY.to_string()),
        condition_to_value(&rules.sell),
    );
    Value::Mapping(doc)
}

fn tree_for(mapping: &Mapping, key: &str) -> Result<Condition, SweeptraderError> {
    let node = mapping
        .get(&Value::String(key.to_string()))
        .ok_or_else(|| invalid(&format!("missing '{}' tree", key)))?;
    parse_condition(node)
}

fn parse_condition(node: &Value) -> Result<Condition, SweeptraderError> {
    let mapping = node
        .as_mapping()
        .ok_or_else(|| invalid("condition node must be a mapping"))?;

    let mut entries = mapping.iter();
    let (Some((key, value)), None) = (entries.next(), entries.next()) else {
        return Err(invalid(
            "condition node must have exactly one key (a combinator or a field)",
        ));
    };
    let key = key
        .as_str()
        .ok_or_else(|| invalid("condition key must be a string"))?;

    match key {
        "and" => Ok(Condition::All(parse_children(key, value)?)),
        "or" => Ok(Condition::Any(parse_children(key, value)?)),
        field_name => parse_leaf(field_name, value),
    }
}

fn parse_children(
    combinator: &str,
    value: &Value,
) -> Result<Vec<Condition>, SweeptraderError> {
    let children = value
        .as_sequence()
        .ok_or_else(|| invalid(&format!("'{}' must hold a sequence of conditions", combinator)))?;
    children.iter().map(parse_condition).collect()
}

fn parse_leaf(field_name: &str, value: &Value) -> Result<Condition, SweeptraderError> {
    let field = Field::parse(field_name)
        .ok_or_else(|| invalid(&format!("unknown field '{}'", field_name)))?;

    let expr = value
        .as_str()
        .ok_or_else(|| invalid(&format!("condition for '{}' must be a string", field_name)))?;

    let mut parts = expr.split_whitespace();
    let (Some(op_str), Some(threshold_str), None) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(invalid(&format!(
            "condition '{}' must be '<operator> <number>'",
            expr
        )));
    };

    let op = CmpOp::parse(op_str)
        .ok_or_else(|| invalid(&format!("unknown operator '{}'", op_str)))?;
    let threshold: f64 = threshold_str
        .parse()
        .map_err(|_| invalid(&format!("'{}' is not a number", threshold_str)))?;

    Ok(Condition::Leaf {
        field,
        op,
        threshold,
    })
}

fn condition_to_value(condition: &Condition) -> Value {
    match condition {
        Condition::Leaf {
            field,
            op,
            threshold,
        } => {
            let mut leaf = Mapping::new();
            leaf.insert(
                Value::String(field.name().to_string()),
                Value::String(format!("{} {}", op.symbol(), threshold)),
            );
            Value::Mapping(leaf)
        }
        Condition::All(children) => combinator_to_value("and", children),
        Condition::Any(children) => combinator_to_value("or", children),
    }
}

fn combinator_to_value(key: &str, children: &[Condition]) -> Value {
    let mut node = Mapping::new();
    node.insert(
        Value::String(key.to_string()),
        Value::Sequence(children.iter().map(condition_to_value).collect()),
    );
    Value::Mapping(node)
}

fn invalid(reason: &str) -> SweeptraderError {
    SweeptraderError::RuleInvalid {
        reason: reason.to_string(),
    }
}
