// SPDX-License-Identifier: MIT

//! Status registry: what each status looks like.
//!
//! A status is a named bundle of rendering attributes: the prefix glyph,
//! whether the row animates, and its colours. Every spinner carries a status
//! *name*; the registry turns that name into a [`StatusDefinition`] at render
//! time, so reconfiguring a status restyles every spinner in it on the next
//! frame.
//!
//! # Built-in statuses
//!
//! | Name            | Aliases                                  | Animated | Prefix        |
//! |-----------------|------------------------------------------|----------|---------------|
//! | `spinning`      | spin, active, default                    | yes      | frame glyph   |
//! | `succeed`       | success, successful, succeeded, done     | no       | ✓ (or √)      |
//! | `fail`          | failed, failure, error                   | no       | ✖ (or ×)      |
//! | `stopped`       | stop, cancel, canceled, cancelled        | no       | none, gray    |
//! | `non-spinnable` | static, inactive, non-spinning           | no       | none          |
//!
//! A status may also carry a [`PlainRender`]: the line printed for a row
//! in that status when the group does not animate.
//!
//! Configuration is a shallow merge: attributes left unset keep their old
//! value. An alias points at exactly one canonical name; re-registering it
//! under another status moves it (last write wins).

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use multispin_term::color::Color;
use serde_json::Value;

use crate::purge::{self, Kind, Rule};
use crate::spinner::Spinner;

pub const SPINNING: &str = "spinning";
pub const SUCCEED: &str = "succeed";
pub const FAIL: &str = "fail";
pub const STOPPED: &str = "stopped";
pub const NON_SPINNABLE: &str = "non-spinnable";

// ─── Prefix ──────────────────────────────────────────────────────────────────

/// The glyph drawn before a static row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prefix {
    /// No glyph at all.
    Off,
    /// A fixed glyph (`✓`, `x`, `111`, ...).
    Glyph(String),
}

impl Prefix {
    /// The glyph, if there is one.
    #[must_use]
    pub fn glyph(&self) -> Option<&str> {
        match self {
            Self::Off => None,
            Self::Glyph(g) => Some(g),
        }
    }

    /// Read an accepted prefix value; `false` turns the glyph off.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        purge::prefix_text(value).map_or(Self::Off, Self::Glyph)
    }
}

// ─── PlainRender ─────────────────────────────────────────────────────────────

/// The row handed to a [`PlainRender`].
#[derive(Debug, Clone, Copy)]
pub struct PlainRow<'a> {
    pub spinner: &'a Spinner,
    pub status: &'a StatusDefinition,
}

/// Custom plain-mode line for a status. Its output is printed verbatim.
///
/// Two renderers compare equal only when they are the same function
/// instance.
#[derive(Clone)]
pub struct PlainRender(Arc<dyn Fn(&PlainRow<'_>) -> String + Send + Sync>);

impl PlainRender {
    #[must_use]
    pub fn new<F>(render: F) -> Self
    where
        F: Fn(&PlainRow<'_>) -> String + Send + Sync + 'static,
    {
        Self(Arc::new(render))
    }

    #[must_use]
    pub fn render(&self, row: &PlainRow<'_>) -> String {
        (self.0)(row)
    }
}

impl fmt::Debug for PlainRender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PlainRender(..)")
    }
}

impl PartialEq for PlainRender {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for PlainRender {}

// ─── StatusDefinition ────────────────────────────────────────────────────────

/// Fully resolved attributes of one status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusDefinition {
    pub name: String,
    pub aliases: BTreeSet<String>,
    /// Glyph for static rows. Animated rows draw the current frame instead.
    pub prefix: Prefix,
    /// `false` means the row animates and keeps the group ticking.
    pub is_static: bool,
    /// Glue the prefix directly to the text.
    pub no_space_after_prefix: bool,
    /// `None` defers to the spinner's own colours.
    pub prefix_color: Option<Color>,
    pub text_color: Option<Color>,
    /// Replaces the default line in plain mode.
    pub plain_render: Option<PlainRender>,
}

impl StatusDefinition {
    /// An animated status with no colours of its own.
    #[must_use]
    pub fn animated(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            aliases: BTreeSet::new(),
            prefix: Prefix::Off,
            is_static: false,
            no_space_after_prefix: false,
            prefix_color: None,
            text_color: None,
            plain_render: None,
        }
    }

    fn merge(&mut self, attrs: &StatusAttributes) {
        if let Some(prefix) = &attrs.prefix {
            self.prefix.clone_from(prefix);
        }
        if let Some(is_static) = attrs.is_static {
            self.is_static = is_static;
        }
        if let Some(no_space) = attrs.no_space_after_prefix {
            self.no_space_after_prefix = no_space;
        }
        if attrs.prefix_color.is_some() {
            self.prefix_color = attrs.prefix_color;
        }
        if attrs.text_color.is_some() {
            self.text_color = attrs.text_color;
        }
        if let Some(render) = &attrs.plain_render {
            self.plain_render = Some(render.clone());
        }
    }
}

// ─── StatusAttributes ────────────────────────────────────────────────────────

/// A partial status definition for [`StatusRegistry::configure`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusAttributes {
    pub aliases: Vec<String>,
    pub prefix: Option<Prefix>,
    pub is_static: Option<bool>,
    pub no_space_after_prefix: Option<bool>,
    pub prefix_color: Option<Color>,
    pub text_color: Option<Color>,
    /// Only settable from code; attribute bags never carry one.
    pub plain_render: Option<PlainRender>,
}

impl StatusAttributes {
    /// Validate a free-form attribute bag.
    ///
    /// Keys: `aliases` (string or list of strings), `prefix`, `isStatic`,
    /// `noSpaceAfterPrefix`, `prefixColor`, `textColor`, and `spinnerColor`
    /// as a synonym for `prefixColor`. Invalid or unknown fields are
    /// dropped; a non-object bag yields empty attributes.
    #[must_use]
    pub fn from_value(bag: &Value) -> Self {
        let Some(bag) = bag.as_object() else {
            return Self::default();
        };
        let rules: [(&str, Rule); 7] = [
            ("aliases", aliases_rule()),
            ("prefix", purge::prefix()),
            ("isStatic", purge::of_type(Kind::Bool)),
            ("noSpaceAfterPrefix", purge::of_type(Kind::Bool)),
            ("prefixColor", purge::color()),
            ("spinnerColor", purge::color()),
            ("textColor", purge::color()),
        ];
        let clean = purge::purge(&rules, bag);
        let color = |key: &str| -> Option<Color> {
            clean.get(key).and_then(Value::as_str).and_then(|s| s.parse().ok())
        };

        Self {
            aliases: match clean.get("aliases") {
                Some(Value::String(alias)) => vec![alias.clone()],
                Some(Value::Array(list)) => list
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_owned)
                    .collect(),
                _ => Vec::new(),
            },
            prefix: clean.get("prefix").map(Prefix::from_value),
            is_static: clean.get("isStatic").and_then(Value::as_bool),
            no_space_after_prefix: clean.get("noSpaceAfterPrefix").and_then(Value::as_bool),
            prefix_color: color("prefixColor").or_else(|| color("spinnerColor")),
            text_color: color("textColor"),
            plain_render: None,
        }
    }
}

fn aliases_rule() -> Rule {
    purge::some(vec![
        purge::non_empty_string(),
        purge::satisfies(|value| {
            value
                .as_array()
                .is_some_and(|list| list.iter().all(|a| a.as_str().is_some_and(|s| !s.is_empty())))
        }),
    ])
}

// ─── StatusRegistry ──────────────────────────────────────────────────────────

/// Status name (or alias) → definition, with a fallback default.
#[derive(Debug, Clone)]
pub struct StatusRegistry {
    statuses: HashMap<String, StatusDefinition>,
    aliases: HashMap<String, String>,
    default: String,
}

impl StatusRegistry {
    /// An empty registry whose fallback is an animated status `default`.
    #[must_use]
    pub fn new(default: &str) -> Self {
        let mut statuses = HashMap::new();
        statuses.insert(default.to_owned(), StatusDefinition::animated(default));
        Self {
            statuses,
            aliases: HashMap::new(),
            default: default.to_owned(),
        }
    }

    /// The five built-in statuses with `spinning` as the fallback.
    ///
    /// `succeed` and `fail` take their glyphs and colours from the caller
    /// (the group's defaults).
    #[must_use]
    pub fn with_builtins(
        succeed_prefix: Prefix,
        succeed_color: Color,
        fail_prefix: Prefix,
        fail_color: Color,
    ) -> Self {
        let mut registry = Self::new(SPINNING);
        registry.configure(
            SPINNING,
            StatusAttributes {
                aliases: strings(&["spin", "active", "default"]),
                is_static: Some(false),
                ..StatusAttributes::default()
            },
        );
        registry.configure(
            SUCCEED,
            StatusAttributes {
                aliases: strings(&["success", "successful", "succeeded", "done"]),
                prefix: Some(succeed_prefix),
                is_static: Some(true),
                prefix_color: Some(succeed_color),
                text_color: Some(succeed_color),
                ..StatusAttributes::default()
            },
        );
        registry.configure(
            FAIL,
            StatusAttributes {
                aliases: strings(&["failed", "failure", "error"]),
                prefix: Some(fail_prefix),
                is_static: Some(true),
                prefix_color: Some(fail_color),
                text_color: Some(fail_color),
                ..StatusAttributes::default()
            },
        );
        registry.configure(
            STOPPED,
            StatusAttributes {
                aliases: strings(&["stop", "cancel", "canceled", "cancelled"]),
                prefix: Some(Prefix::Off),
                is_static: Some(true),
                prefix_color: Some(Color::Gray),
                text_color: Some(Color::Gray),
                ..StatusAttributes::default()
            },
        );
        registry.configure(
            NON_SPINNABLE,
            StatusAttributes {
                aliases: strings(&["static", "inactive", "non-spinning"]),
                prefix: Some(Prefix::Off),
                is_static: Some(true),
                no_space_after_prefix: Some(true),
                ..StatusAttributes::default()
            },
        );
        registry
    }

    /// Merge `attrs` into the status `name`, creating it if needed.
    ///
    /// A new status starts out animated with no prefix and no colours.
    pub fn configure(&mut self, name: &str, attrs: StatusAttributes) -> &StatusDefinition {
        // A real status name always wins over an alias of the same spelling.
        if let Some(owner) = self.aliases.remove(name) {
            if let Some(def) = self.statuses.get_mut(&owner) {
                def.aliases.remove(name);
            }
        }

        for alias in &attrs.aliases {
            if alias == name || self.statuses.contains_key(alias) {
                tracing::debug!(status = name, alias = %alias, "alias shadows a status name, ignored");
                continue;
            }
            if let Some(previous) = self.aliases.insert(alias.clone(), name.to_owned()) {
                if previous != name {
                    if let Some(def) = self.statuses.get_mut(&previous) {
                        def.aliases.remove(alias);
                    }
                }
            }
        }

        let def = self
            .statuses
            .entry(name.to_owned())
            .or_insert_with(|| StatusDefinition::animated(name));
        def.merge(&attrs);
        for alias in &attrs.aliases {
            if self.aliases.get(alias).is_some_and(|owner| owner == name) {
                def.aliases.insert(alias.clone());
            }
        }
        tracing::debug!(status = name, "status configured");
        def
    }

    /// Exact name, then alias. `None` for unknown statuses.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&StatusDefinition> {
        self.statuses.get(name).or_else(|| {
            self.aliases
                .get(name)
                .and_then(|canonical| self.statuses.get(canonical))
        })
    }

    /// The canonical name for a name or alias.
    #[must_use]
    pub fn canonical(&self, name: &str) -> Option<&str> {
        self.lookup(name).map(|def| def.name.as_str())
    }

    /// Like [`lookup`](Self::lookup) but falls back to the default status.
    #[must_use]
    pub fn resolve(&self, name: &str) -> &StatusDefinition {
        self.lookup(name)
            .or_else(|| self.statuses.get(&self.default))
            .unwrap_or_else(|| unreachable!("default status is inserted at construction"))
    }

    /// Name of the fallback status.
    #[must_use]
    pub fn default_status(&self) -> &str {
        &self.default
    }

    /// Names of every canonical status.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.statuses.keys().map(String::as_str)
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

// ─── Tests ───────────────────────────────────────────────────────────────────
