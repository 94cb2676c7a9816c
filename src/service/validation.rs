//! Request validation against per-entity field rules.
//!
//! Every field is checked and all failures are reported together, keyed by field name.
//! A body that passes is then deserialized into the entity's typed payload.

use crate::error::{AppError, FieldErrors};
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::sync::OnceLock;

pub const MISSING: &str = "Missing data for required field.";
pub const NULL: &str = "Field may not be null.";
pub const UNKNOWN: &str = "Unknown field.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    String,
    /// Fits in a 32-bit signed integer (store ids).
    Integer,
    Number,
    /// `YYYY-MM-DD`.
    Date,
    IntegerList,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Email,
}

#[derive(Clone, Debug)]
pub struct FieldRule {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub format: Option<Format>,
}

impl FieldRule {
    const fn new(name: &'static str, kind: FieldKind) -> Self {
        FieldRule {
            name,
            kind,
            required: true,
            min_length: None,
            max_length: None,
            minimum: None,
            maximum: None,
            format: None,
        }
    }

    pub const fn string(name: &'static str) -> Self {
        Self::new(name, FieldKind::String)
    }

    pub const fn integer(name: &'static str) -> Self {
        Self::new(name, FieldKind::Integer)
    }

    pub const fn number(name: &'static str) -> Self {
        Self::new(name, FieldKind::Number)
    }

    pub const fn date(name: &'static str) -> Self {
        Self::new(name, FieldKind::Date)
    }

    pub const fn integer_list(name: &'static str) -> Self {
        Self::new(name, FieldKind::IntegerList)
    }

    pub const fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub const fn min_length(mut self, n: usize) -> Self {
        self.min_length = Some(n);
        self
    }

    pub const fn max_length(mut self, n: usize) -> Self {
        self.max_length = Some(n);
        self
    }

    pub const fn minimum(mut self, n: f64) -> Self {
        self.minimum = Some(n);
        self
    }

    pub const fn maximum(mut self, n: f64) -> Self {
        self.maximum = Some(n);
        self
    }

    pub const fn email(mut self) -> Self {
        self.format = Some(Format::Email);
        self
    }
}

pub struct RequestValidator;

impl RequestValidator {
    /// Check `body` against `rules`: required fields present and non-null, types, lengths,
    /// bounds and formats. Fields without a rule are rejected.
    pub fn validate(body: &Map<String, Value>, rules: &[FieldRule]) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        for rule in rules {
            match body.get(rule.name) {
                None if rule.required => push(&mut errors, rule.name, MISSING.into()),
                None => {}
                Some(Value::Null) => push(&mut errors, rule.name, NULL.into()),
                Some(v) => {
                    for msg in check_field(v, rule) {
                        push(&mut errors, rule.name, msg);
                    }
                }
            }
        }
        for key in body.keys() {
            if !rules.iter().any(|r| r.name == key.as_str()) {
                push(&mut errors, key, UNKNOWN.into());
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate a raw JSON body and deserialize it into the typed payload `P`.
    pub fn parse<P: DeserializeOwned>(body: Value, rules: &[FieldRule]) -> Result<P, AppError> {
        let Value::Object(map) = body else {
            return Err(AppError::BadRequest("body must be a JSON object".into()));
        };
        Self::validate(&map, rules).map_err(AppError::Validation)?;
        serde_json::from_value(Value::Object(map)).map_err(|e| AppError::BadRequest(e.to_string()))
    }
}

fn push(errors: &mut FieldErrors, field: &str, msg: String) {
    errors.entry(field.to_string()).or_default().push(msg);
}

fn check_field(v: &Value, rule: &FieldRule) -> Vec<String> {
    let mut out = Vec::new();
    match rule.kind {
        FieldKind::String => {
            let Some(s) = v.as_str() else {
                out.push("Not a valid string.".into());
                return out;
            };
            let len = s.chars().count();
            if let Some(min) = rule.min_length {
                if len < min {
                    out.push(format!("Shorter than minimum length {}.", min));
                }
            }
            if let Some(max) = rule.max_length {
                if len > max {
                    out.push(format!("Longer than maximum length {}.", max));
                }
            }
            if rule.format == Some(Format::Email) && !email_regex().is_match(s) {
                out.push("Not a valid email address.".into());
            }
        }
        FieldKind::Integer => {
            if as_i32(v).is_none() {
                out.push("Not a valid integer.".into());
            }
        }
        FieldKind::Number => {
            let Some(n) = v.as_f64() else {
                out.push("Not a valid number.".into());
                return out;
            };
            if let Some(min) = rule.minimum {
                if n < min {
                    out.push(format!("Must be greater than or equal to {}.", min));
                }
            }
            if let Some(max) = rule.maximum {
                if n > max {
                    out.push(format!("Must be less than or equal to {}.", max));
                }
            }
        }
        FieldKind::Date => {
            let ok = v
                .as_str()
                .map(|s| chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok())
                .unwrap_or(false);
            if !ok {
                out.push("Not a valid date.".into());
            }
        }
        FieldKind::IntegerList => match v.as_array() {
            None => out.push("Not a valid list.".into()),
            Some(items) => {
                if let Some(pos) = items.iter().position(|i| as_i32(i).is_none()) {
                    out.push(format!("Item {} is not a valid integer.", pos));
                }
            }
        },
    }
    out
}

fn as_i32(v: &Value) -> Option<i32> {
    v.as_i64().and_then(|n| i32::try_from(n).ok())
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email pattern"))
}
