// src/domain/validation.rs

//! Schema validation for raw buyer payloads.
//!
//! Turns untyped JSON into a normalized [`BuyerInput`], or reports every
//! problem found as a `path: message` pair. Nothing here touches the store.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::domain::buyer::{Bhk, BuyerInput, City, PropertyType, Purpose, Source, Status, Timeline};
use crate::domain::timestamp;
use crate::errors::FieldError;

pub const MAX_NOTES_LEN: usize = 1000;

/// A validated full-record update: the new field values plus the
/// last-modified timestamp the caller read.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateRequest {
    pub input: BuyerInput,
    pub expected_updated_at: DateTime<Utc>,
}

/// A validated status-only change.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusChange {
    pub status: Status,
    pub expected_updated_at: DateTime<Utc>,
}

struct Validator<'a> {
    obj: &'a Map<String, Value>,
    errors: Vec<FieldError>,
}

impl<'a> Validator<'a> {
    fn new(obj: &'a Map<String, Value>) -> Self {
        Self {
            obj,
            errors: Vec::new(),
        }
    }

    fn fail(&mut self, path: &str, message: &str) {
        self.errors.push(FieldError::new(path, message));
    }

    /// Missing, null and "" all mean "not provided".
    fn present(&self, key: &str) -> Option<&'a Value> {
        match self.obj.get(key) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.is_empty() => None,
            Some(v) => Some(v),
        }
    }

    fn full_name(&mut self) -> Option<String> {
        match self.obj.get("fullName") {
            Some(Value::String(s)) if s.chars().count() >= 2 => Some(s.clone()),
            Some(Value::String(s)) if !s.is_empty() => {
                self.fail("fullName", "Name should have at least 2 characters");
                None
            }
            _ => {
                self.fail("fullName", "Name is required");
                None
            }
        }
    }

    fn email(&mut self) -> Option<Option<String>> {
        match self.present("email") {
            None => Some(None),
            Some(Value::String(s)) if looks_like_email(s) => Some(Some(s.trim().to_lowercase())),
            Some(_) => {
                self.fail("email", "Please enter a valid email address");
                None
            }
        }
    }

    fn phone(&mut self) -> Option<String> {
        match self.present("phone") {
            None => {
                self.fail("phone", "Phone number is required");
                None
            }
            Some(Value::String(s))
                if (10..=15).contains(&s.len()) && s.chars().all(|c| c.is_ascii_digit()) =>
            {
                Some(s.clone())
            }
            Some(_) => {
                self.fail("phone", "Please enter a valid phone number");
                None
            }
        }
    }

    fn choice<T>(&mut self, key: &str, parse: fn(&str) -> Option<T>, message: &str) -> Option<T> {
        let parsed = match self.present(key) {
            Some(Value::String(s)) => parse(s),
            _ => None,
        };
        if parsed.is_none() {
            self.fail(key, message);
        }
        parsed
    }

    fn optional_choice<T>(
        &mut self,
        key: &str,
        parse: fn(&str) -> Option<T>,
        message: &str,
    ) -> Option<Option<T>> {
        match self.present(key) {
            None => Some(None),
            Some(Value::String(s)) if parse(s).is_some() => Some(parse(s)),
            Some(_) => {
                self.fail(key, message);
                None
            }
        }
    }

    fn budget(&mut self, key: &str) -> Option<Option<i64>> {
        let number = match self.present(key) {
            None => return Some(None),
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            Some(_) => None,
        };
        match number {
            None => {
                self.fail(key, "Expected a number");
                None
            }
            Some(n) if n.fract() != 0.0 || !n.is_finite() => {
                self.fail(key, "Budget must be a whole number");
                None
            }
            Some(n) if n < 0.0 => {
                self.fail(key, "Budget cannot be negative");
                None
            }
            // i64::MAX as f64 rounds up to 2^63, which no i64 holds.
            Some(n) if n >= i64::MAX as f64 => {
                self.fail(key, "Budget is too large");
                None
            }
            Some(n) => Some(Some(n as i64)),
        }
    }

    fn notes(&mut self) -> Option<Option<String>> {
        match self.present("notes") {
            None => Some(None),
            Some(Value::String(s)) if s.chars().count() <= MAX_NOTES_LEN => Some(Some(s.clone())),
            Some(Value::String(_)) => {
                self.fail("notes", "Notes must be at most 1000 characters");
                None
            }
            Some(_) => {
                self.fail("notes", "Expected string");
                None
            }
        }
    }

    fn tags(&mut self) -> Option<Vec<String>> {
        let items: Vec<Value> = match self.present("tags") {
            None => return Some(Vec::new()),
            Some(Value::Array(items)) => items.clone(),
            // Spreadsheet rows carry tags as a JSON-encoded string.
            Some(Value::String(s)) => match serde_json::from_str::<Value>(s) {
                Ok(Value::Array(items)) => items,
                _ => Vec::new(),
            },
            Some(_) => {
                self.fail("tags", "Expected an array of strings");
                return None;
            }
        };

        let mut tags: Vec<String> = Vec::with_capacity(items.len());
        let before = self.errors.len();
        for (i, item) in items.iter().enumerate() {
            let Value::String(raw) = item else {
                self.fail(&format!("tags.{i}"), "Expected string");
                continue;
            };
            let tag = raw.trim();
            if tag.is_empty() {
                continue;
            }
            if tags.iter().any(|t| t == tag) {
                self.fail(&format!("tags.{i}"), &format!("Duplicate tag '{tag}'"));
                continue;
            }
            tags.push(tag.to_string());
        }

        (self.errors.len() == before).then_some(tags)
    }

    fn updated_at(&mut self) -> Option<DateTime<Utc>> {
        let parsed = match self.present("updatedAt") {
            Some(Value::String(s)) => timestamp::parse(s),
            _ => None,
        };
        if parsed.is_none() {
            self.fail("updatedAt", "updatedAt of the version you edited is required");
        }
        parsed
    }
}

fn looks_like_email(raw: &str) -> bool {
    let s = raw.trim();
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !s.chars().any(char::is_whitespace)
}

fn as_object(payload: &Value) -> Result<&Map<String, Value>, Vec<FieldError>> {
    payload
        .as_object()
        .ok_or_else(|| vec![FieldError::new("", "Expected an object")])
}

fn collect_buyer(v: &mut Validator<'_>) -> Option<BuyerInput> {
    let full_name = v.full_name();
    let email = v.email();
    let phone = v.phone();
    let city = v.choice("city", City::parse, "Please select a city");
    let property_type = v.choice("propertyType", PropertyType::parse, "Please select a property type");
    let bhk = v.optional_choice("bhk", Bhk::parse, "Please select a BHK");
    let purpose = v.choice("purpose", Purpose::parse, "Please select a purpose");
    let budget_min = v.budget("budgetMin");
    let budget_max = v.budget("budgetMax");
    let timeline = v.choice("timeline", Timeline::parse, "Please select a timeline");
    let source = v.choice("source", Source::parse, "Please select a source");
    let notes = v.notes();
    let tags = v.tags();
    let status = v.optional_choice("status", Status::parse, "Please select a status");

    if let (Some(pt), Some(None)) = (property_type, bhk) {
        if pt.is_residential() {
            v.fail("bhk", "BHK is required for Apartment/Villa");
        }
    }

    if let (Some(Some(min)), Some(Some(max))) = (budget_min, budget_max) {
        if max < min {
            v.fail("budgetMax", "budgetMax must be ≥ budgetMin");
        }
    }

    if !v.errors.is_empty() {
        return None;
    }

    Some(
        BuyerInput {
            full_name: full_name?,
            email: email?,
            phone: phone?,
            city: city?,
            property_type: property_type?,
            bhk: bhk?,
            purpose: purpose?,
            budget_min: budget_min?,
            budget_max: budget_max?,
            timeline: timeline?,
            source: source?,
            notes: notes?,
            tags: tags?,
            status: status?.unwrap_or(Status::New),
        }
        .normalize(),
    )
}

/// Validates a creation payload (also used per row by bulk import).
pub fn validate_buyer(payload: &Value) -> Result<BuyerInput, Vec<FieldError>> {
    let obj = as_object(payload)?;
    let mut v = Validator::new(obj);
    match collect_buyer(&mut v) {
        Some(input) => Ok(input),
        None => Err(v.errors),
    }
}

/// Validates a full-record update: every buyer field plus `updatedAt`.
pub fn validate_update(payload: &Value) -> Result<UpdateRequest, Vec<FieldError>> {
    let obj = as_object(payload)?;
    let mut v = Validator::new(obj);
    let input = collect_buyer(&mut v);
    let expected = v.updated_at();
    match (input, expected) {
        (Some(input), Some(expected_updated_at)) if v.errors.is_empty() => Ok(UpdateRequest {
            input,
            expected_updated_at,
        }),
        _ => Err(v.errors),
    }
}

pub fn validate_status_change(payload: &Value) -> Result<StatusChange, Vec<FieldError>> {
    let obj = as_object(payload)?;
    let mut v = Validator::new(obj);
    let status = v.choice("status", Status::parse, "Please select a status");
    let expected = v.updated_at();
    match (status, expected) {
        (Some(status), Some(expected_updated_at)) => Ok(StatusChange {
            status,
            expected_updated_at,
        }),
        _ => Err(v.errors),
    }
}

/// Flattens errors into one line, e.g. `phone: Please enter a valid phone number, city: ...`.
pub fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.path, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}
