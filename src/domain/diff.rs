// src/domain/diff.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::buyer::BuyerInput;

/// A field value as recorded in history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(i64),
    Text(String),
    Tags(Vec<String>),
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Number(n) => write!(f, "{n}"),
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Tags(tags) => f.write_str(&tags.join(", ")),
        }
    }
}

/// How one field changed between two versions of a buyer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "FieldChangeRepr", try_from = "FieldChangeRepr")]
pub enum FieldChange {
    /// Both versions hold a value and they differ.
    Changed { from: FieldValue, to: FieldValue },
    /// Null before, set after.
    Created(FieldValue),
    /// Set before, null after.
    Removed(FieldValue),
    /// Set-valued field; elements gained and lost.
    Tags {
        added: Vec<String>,
        removed: Vec<String>,
    },
}

/// Wire shape of a change: `{from,to}`, `{created}`, `{removed}` or `{added?,removed?}`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct FieldChangeRepr {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    from: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    to: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    created: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    added: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    removed: Option<FieldValue>,
}

impl From<FieldChange> for FieldChangeRepr {
    fn from(change: FieldChange) -> Self {
        match change {
            FieldChange::Changed { from, to } => FieldChangeRepr {
                from: Some(from),
                to: Some(to),
                ..Default::default()
            },
            FieldChange::Created(v) => FieldChangeRepr {
                created: Some(v),
                ..Default::default()
            },
            FieldChange::Removed(v) => FieldChangeRepr {
                removed: Some(v),
                ..Default::default()
            },
            FieldChange::Tags { added, removed } => FieldChangeRepr {
                added: (!added.is_empty()).then_some(added),
                removed: (!removed.is_empty()).then_some(FieldValue::Tags(removed)),
                ..Default::default()
            },
        }
    }
}

impl TryFrom<FieldChangeRepr> for FieldChange {
    type Error = String;

    fn try_from(repr: FieldChangeRepr) -> Result<Self, Self::Error> {
        match repr {
            FieldChangeRepr {
                from: Some(from),
                to: Some(to),
                ..
            } => Ok(FieldChange::Changed { from, to }),
            FieldChangeRepr {
                created: Some(v), ..
            } => Ok(FieldChange::Created(v)),
            FieldChangeRepr {
                added: Some(added),
                removed,
                ..
            } => Ok(FieldChange::Tags {
                added,
                removed: match removed {
                    Some(FieldValue::Tags(t)) => t,
                    _ => Vec::new(),
                },
            }),
            FieldChangeRepr {
                removed: Some(FieldValue::Tags(removed)),
                ..
            } => Ok(FieldChange::Tags {
                added: Vec::new(),
                removed,
            }),
            FieldChangeRepr {
                removed: Some(v), ..
            } => Ok(FieldChange::Removed(v)),
            _ => Err("empty field change".to_string()),
        }
    }
}

/// Changed fields keyed by wire name. Ordered, so equal diffs serialize equally.
pub type Diff = BTreeMap<String, FieldChange>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strategy {
    /// Always present; compared by value.
    Scalar,
    /// May be null; null <-> value is a creation or removal.
    Nullable,
    /// Compared as a set; order and replacement do not matter.
    Set,
}

struct FieldSpec {
    name: &'static str,
    strategy: Strategy,
    read: fn(&BuyerInput) -> Option<FieldValue>,
}

fn text(s: &str) -> Option<FieldValue> {
    Some(FieldValue::Text(s.to_string()))
}

fn opt_text(s: &Option<String>) -> Option<FieldValue> {
    s.as_deref().map(|v| FieldValue::Text(v.to_string()))
}

/// Every diffable buyer field. Identity and timestamps are deliberately absent.
const FIELDS: &[FieldSpec] = &[
    FieldSpec { name: "fullName", strategy: Strategy::Scalar, read: |b| text(&b.full_name) },
    FieldSpec { name: "email", strategy: Strategy::Nullable, read: |b| opt_text(&b.email) },
    FieldSpec { name: "phone", strategy: Strategy::Scalar, read: |b| text(&b.phone) },
    FieldSpec { name: "city", strategy: Strategy::Scalar, read: |b| text(b.city.as_str()) },
    FieldSpec { name: "propertyType", strategy: Strategy::Scalar, read: |b| text(b.property_type.as_str()) },
    FieldSpec { name: "bhk", strategy: Strategy::Nullable, read: |b| b.bhk.and_then(|v| text(v.as_str())) },
    FieldSpec { name: "purpose", strategy: Strategy::Scalar, read: |b| text(b.purpose.as_str()) },
    FieldSpec { name: "budgetMin", strategy: Strategy::Nullable, read: |b| b.budget_min.map(FieldValue::Number) },
    FieldSpec { name: "budgetMax", strategy: Strategy::Nullable, read: |b| b.budget_max.map(FieldValue::Number) },
    FieldSpec { name: "timeline", strategy: Strategy::Scalar, read: |b| text(b.timeline.as_str()) },
    FieldSpec { name: "source", strategy: Strategy::Scalar, read: |b| text(b.source.as_str()) },
    FieldSpec { name: "notes", strategy: Strategy::Nullable, read: |b| opt_text(&b.notes) },
    FieldSpec { name: "tags", strategy: Strategy::Set, read: |b| Some(FieldValue::Tags(b.tags.clone())) },
    FieldSpec { name: "status", strategy: Strategy::Scalar, read: |b| text(b.status.as_str()) },
];

/// Compares two versions of the same buyer field by field.
/// An empty result means nothing the caller can edit has changed.
pub fn compute_diff(before: &BuyerInput, after: &BuyerInput) -> Diff {
    let mut diff = Diff::new();

    for spec in FIELDS {
        let old = (spec.read)(before);
        let new = (spec.read)(after);

        let change = match spec.strategy {
            Strategy::Set => compare_sets(old, new),
            Strategy::Scalar | Strategy::Nullable => compare_values(old, new),
        };

        if let Some(change) = change {
            diff.insert(spec.name.to_string(), change);
        }
    }

    diff
}

fn compare_values(old: Option<FieldValue>, new: Option<FieldValue>) -> Option<FieldChange> {
    match (old, new) {
        (None, None) => None,
        (None, Some(v)) => Some(FieldChange::Created(v)),
        (Some(v), None) => Some(FieldChange::Removed(v)),
        (Some(from), Some(to)) if from != to => Some(FieldChange::Changed { from, to }),
        _ => None,
    }
}

fn compare_sets(old: Option<FieldValue>, new: Option<FieldValue>) -> Option<FieldChange> {
    let as_vec = |v: Option<FieldValue>| match v {
        Some(FieldValue::Tags(t)) => t,
        _ => Vec::new(),
    };
    let old = as_vec(old);
    let new = as_vec(new);

    let added: Vec<String> = new.iter().filter(|t| !old.contains(t)).cloned().collect();
    let removed: Vec<String> = old.iter().filter(|t| !new.contains(t)).cloned().collect();

    if added.is_empty() && removed.is_empty() {
        None
    } else {
        Some(FieldChange::Tags { added, removed })
    }
}

impl FieldChange {
    /// One human-readable line per change, e.g. "Changed status from New to Contacted".
    pub fn describe(&self, field: &str) -> String {
        match self {
            FieldChange::Changed { from, to } => format!(
                "Changed {field} from {} to {}",
                display_value(field, from),
                display_value(field, to)
            ),
            FieldChange::Created(v) => format!("Set {field}: {}", display_value(field, v)),
            FieldChange::Removed(v) => format!("Cleared {field} (was {})", display_value(field, v)),
            FieldChange::Tags { added, removed } => {
                let mut parts = Vec::new();
                if !added.is_empty() {
                    parts.push(format!("Added {field}: {}", added.join(", ")));
                }
                if !removed.is_empty() {
                    parts.push(format!("Removed {field}: {}", removed.join(", ")));
                }
                parts.join("; ")
            }
        }
    }
}

fn display_value(field: &str, value: &FieldValue) -> String {
    match value {
        FieldValue::Number(n) if field.starts_with("budget") => format!("₹{n}"),
        other => other.to_string(),
    }
}
