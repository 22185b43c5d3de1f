// SPDX-License-Identifier: MIT

//! Validation combinators for free-form option bags.
//!
//! Options arrive as loosely typed JSON-like maps and may be partial or
//! plain wrong. The contract is per field: a value that fails its rule is
//! *dropped*, never coerced or defaulted, so the previous value of that
//! field survives and unrelated fields are untouched.
//!
//! Rules are small predicates over [`Value`] built from a handful of
//! combinators:
//!
//! | Combinator          | Accepts                                 |
//! |---------------------|-----------------------------------------|
//! | [`of_type`]         | values of one JSON kind                 |
//! | [`one_of`]          | strings from a fixed list               |
//! | [`equal`]           | exactly one value                       |
//! | [`all`]             | values every sub-rule accepts           |
//! | [`some`]            | values at least one sub-rule accepts    |
//!
//! [`purge`] applies a rule table to a bag and keeps only the keys whose
//! rule accepts the value. Keys without a rule are dropped too.

use serde_json::{Map, Value};

/// A field validator.
pub type Rule = Box<dyn Fn(&Value) -> bool + Send + Sync>;

/// JSON value kinds for [`of_type`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl Kind {
    /// The kind of `value`.
    #[must_use]
    pub const fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Bool,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }
}

// ─── Combinators ─────────────────────────────────────────────────────────────

/// Accept values of the given kind.
#[must_use]
pub fn of_type(kind: Kind) -> Rule {
    Box::new(move |value| Kind::of(value) == kind)
}

/// Accept strings that appear in `allowed`.
#[must_use]
pub fn one_of(allowed: &'static [&'static str]) -> Rule {
    Box::new(move |value| value.as_str().is_some_and(|s| allowed.contains(&s)))
}

/// Accept exactly `expected`. Numbers compare by JSON value, so `90` and
/// `"90"` differ.
#[must_use]
pub fn equal(expected: Value) -> Rule {
    Box::new(move |value| *value == expected)
}

/// Accept values every rule accepts. An empty list accepts everything.
#[must_use]
pub fn all(rules: Vec<Rule>) -> Rule {
    Box::new(move |value| rules.iter().all(|rule| rule(value)))
}

/// Accept values at least one rule accepts. An empty list accepts nothing.
#[must_use]
pub fn some(rules: Vec<Rule>) -> Rule {
    Box::new(move |value| rules.iter().any(|rule| rule(value)))
}

/// Accept any value that satisfies a custom predicate.
#[must_use]
pub fn satisfies(pred: fn(&Value) -> bool) -> Rule {
    Box::new(pred)
}

// ─── Common rules ────────────────────────────────────────────────────────────

/// Palette colour names.
#[must_use]
pub fn color() -> Rule {
    one_of(multispin_term::color::PALETTE_NAMES)
}

/// Status prefix: `false` (no glyph), a string, or a number.
#[must_use]
pub fn prefix() -> Rule {
    some(vec![
        equal(Value::Bool(false)),
        of_type(Kind::String),
        of_type(Kind::Number),
    ])
}

/// Non-empty string.
#[must_use]
pub fn non_empty_string() -> Rule {
    satisfies(|value| value.as_str().is_some_and(|s| !s.is_empty()))
}

/// Non-negative integer.
#[must_use]
pub fn unsigned() -> Rule {
    satisfies(|value| value.as_u64().is_some())
}

// ─── purge ───────────────────────────────────────────────────────────────────

/// Keep only the entries of `bag` that a rule in `rules` accepts.
pub fn purge(rules: &[(&str, Rule)], bag: &Map<String, Value>) -> Map<String, Value> {
    bag.iter()
        .filter(|(key, value)| {
            let keep = rules
                .iter()
                .find(|(name, _)| name == key)
                .is_some_and(|(_, rule)| rule(value));
            if !keep {
                tracing::trace!(field = %key, %value, "dropping invalid option");
            }
            keep
        })
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Render an accepted prefix value as glyph text. `false` yields `None`.
#[must_use]
pub fn prefix_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
