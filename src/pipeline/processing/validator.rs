//! Declarative field validation and coercion for raw extract rows.
//!
//! A [`Schema`] is plain data: a list of field names with a [`FieldRule`]
//! each. [`Schema::validate`] checks every rule against a raw record and
//! either returns the coerced row or a [`ValidationErrors`] naming every
//! field that failed. Fields the schema does not mention pass through as
//! [`Coerced::Raw`].

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde_json::Value;

use crate::fragment::Element;

/// One row of an extract, as produced by the reader.
pub type RawRecord = serde_json::Map<String, Value>;

/// A coercion callback: raw JSON value in, native value or reason out.
pub type Coercion = fn(&Value) -> Result<Coerced, String>;

#[derive(Debug, Clone, PartialEq)]
pub enum Coerced {
    Null,
    Int(i64),
    Float(f64),
    Str(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Fragment(Element),
    List(Vec<Coerced>),
    /// A value the schema did not describe, passed through untouched.
    Raw(Value),
}

impl Coerced {
    /// The uncoerced native form of a JSON value.
    pub fn from_raw(value: &Value) -> Self {
        match value {
            Value::Null => Coerced::Null,
            Value::Number(n) => match n.as_i64() {
                Some(i) => Coerced::Int(i),
                None => n.as_f64().map(Coerced::Float).unwrap_or_else(|| Coerced::Raw(value.clone())),
            },
            Value::String(s) => Coerced::Str(s.clone()),
            Value::Array(items) => Coerced::List(items.iter().map(Coerced::from_raw).collect()),
            other => Coerced::Raw(other.clone()),
        }
    }

    fn matches(&self, kind: &FieldType) -> bool {
        match (kind, self) {
            (FieldType::Integer, Coerced::Int(_)) => true,
            (FieldType::Float, Coerced::Float(_) | Coerced::Int(_)) => true,
            (FieldType::String, Coerced::Str(_)) => true,
            (FieldType::Date, Coerced::Date(_) | Coerced::DateTime(_)) => true,
            (FieldType::DateTime, Coerced::DateTime(_)) => true,
            (FieldType::Fragment, Coerced::Fragment(_)) => true,
            (FieldType::List, Coerced::List(_)) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Integer,
    Float,
    String,
    Date,
    DateTime,
    Fragment,
    List,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::Integer => "integer",
            FieldType::Float => "float",
            FieldType::String => "string",
            FieldType::Date => "date",
            FieldType::DateTime => "datetime",
            FieldType::Fragment => "xml",
            FieldType::List => "list",
        };
        write!(f, "{}", name)
    }
}

/// Validation rule for one field.
#[derive(Clone)]
pub struct FieldRule {
    pub kind: FieldType,
    pub required: bool,
    pub nullable: bool,
    pub allowed: Option<Vec<String>>,
    pub regex: Option<Regex>,
    pub coerce: Option<Coercion>,
    /// Rule applied to every element of a list field.
    pub items: Option<Box<FieldRule>>,
}

impl fmt::Debug for FieldRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRule")
            .field("kind", &self.kind)
            .field("required", &self.required)
            .field("nullable", &self.nullable)
            .field("allowed", &self.allowed)
            .field("regex", &self.regex.as_ref().map(Regex::as_str))
            .field("coerce", &self.coerce.is_some())
            .field("items", &self.items)
            .finish()
    }
}

impl FieldRule {
    pub fn new(kind: FieldType) -> Self {
        Self {
            kind,
            required: false,
            nullable: false,
            allowed: None,
            regex: None,
            coerce: None,
            items: None,
        }
    }

    pub fn integer() -> Self {
        Self::new(FieldType::Integer).coerce(coerce_int)
    }

    pub fn float() -> Self {
        Self::new(FieldType::Float).coerce(coerce_float)
    }

    pub fn string() -> Self {
        Self::new(FieldType::String)
    }

    pub fn date() -> Self {
        Self::new(FieldType::Date).coerce(coerce_date)
    }

    pub fn datetime() -> Self {
        Self::new(FieldType::DateTime).coerce(coerce_datetime)
    }

    pub fn fragment() -> Self {
        Self::new(FieldType::Fragment).coerce(coerce_fragment)
    }

    pub fn list_of(items: FieldRule) -> Self {
        let mut rule = Self::new(FieldType::List);
        rule.items = Some(Box::new(items));
        rule
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn allowed<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Constrain string values to match `pattern` in full.
    pub fn regex(mut self, pattern: &str) -> Self {
        let anchored = format!("^(?:{})$", pattern);
        self.regex = Some(Regex::new(&anchored).expect("field pattern must be a valid regex"));
        self
    }

    pub fn coerce(mut self, coercion: Coercion) -> Self {
        self.coerce = Some(coercion);
        self
    }

    fn check(&self, raw: &Value) -> Result<Coerced, FieldError> {
        if raw.is_null() {
            return if self.nullable {
                Ok(Coerced::Null)
            } else {
                Err(FieldError::NullNotAllowed)
            };
        }

        let value = match self.coerce {
            Some(coercion) => coercion(raw).map_err(FieldError::Coercion)?,
            None => Coerced::from_raw(raw),
        };

        let value = match (&self.items, value) {
            (Some(items), Coerced::List(_)) => {
                let elements = raw.as_array().map(Vec::as_slice).unwrap_or_default();
                let mut out = Vec::with_capacity(elements.len());
                for (index, element) in elements.iter().enumerate() {
                    let item = items.check(element).map_err(|reason| FieldError::Item {
                        index,
                        reason: Box::new(reason),
                    })?;
                    out.push(item);
                }
                Coerced::List(out)
            }
            (_, value) => value,
        };

        if !value.matches(&self.kind) {
            return Err(FieldError::Type { expected: self.kind });
        }

        if let (Some(allowed), Coerced::Str(s)) = (&self.allowed, &value) {
            if !allowed.iter().any(|candidate| candidate == s) {
                return Err(FieldError::NotAllowed(s.clone()));
            }
        }

        if let (Some(pattern), Coerced::Str(s)) = (&self.regex, &value) {
            if !pattern.is_match(s) {
                return Err(FieldError::Pattern {
                    pattern: pattern.as_str().to_string(),
                    value: s.clone(),
                });
            }
        }

        Ok(value)
    }
}

/// Why a single field failed validation.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldError {
    Required,
    NullNotAllowed,
    Coercion(String),
    Type { expected: FieldType },
    NotAllowed(String),
    Pattern { pattern: String, value: String },
    Item { index: usize, reason: Box<FieldError> },
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::Required => write!(f, "required field"),
            FieldError::NullNotAllowed => write!(f, "null value not allowed"),
            FieldError::Coercion(reason) => write!(f, "cannot be coerced: {}", reason),
            FieldError::Type { expected } => write!(f, "must be of {} type", expected),
            FieldError::NotAllowed(value) => write!(f, "unallowed value {}", value),
            FieldError::Pattern { pattern, value } => {
                write!(f, "value '{}' does not match regex '{}'", value, pattern)
            }
            FieldError::Item { index, reason } => write!(f, "item {}: {}", index, reason),
        }
    }
}

/// Every failing field of one record, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors {
    errors: BTreeMap<String, FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: impl Into<String>, error: FieldError) -> Self {
        let mut errors = Self::new();
        errors.insert(field, error);
        errors
    }

    pub fn insert(&mut self, field: impl Into<String>, error: FieldError) {
        self.errors.insert(field.into(), error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&FieldError> {
        self.errors.get(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldError)> {
        self.errors.iter().map(|(field, error)| (field.as_str(), error))
    }

    /// Field name to human-readable reason.
    pub fn reasons(&self) -> BTreeMap<String, String> {
        self.errors
            .iter()
            .map(|(field, error)| (field.clone(), error.to_string()))
            .collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<&str> = self.fields().collect();
        write!(f, "Validator failed on keys: {}", keys.join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Coerced values of one record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoercedRow {
    values: BTreeMap<String, Coerced>,
}

impl CoercedRow {
    pub fn get(&self, field: &str) -> Option<&Coerced> {
        self.values.get(field)
    }

    pub fn int(&self, field: &str) -> Option<i64> {
        match self.get(field) {
            Some(Coerced::Int(i)) => Some(*i),
            _ => None,
        }
    }

    pub fn float(&self, field: &str) -> Option<f64> {
        match self.get(field) {
            Some(Coerced::Float(x)) => Some(*x),
            Some(Coerced::Int(i)) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn str(&self, field: &str) -> Option<&str> {
        match self.get(field) {
            Some(Coerced::Str(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn date(&self, field: &str) -> Option<NaiveDate> {
        match self.get(field) {
            Some(Coerced::Date(d)) => Some(*d),
            Some(Coerced::DateTime(dt)) => Some(dt.date()),
            _ => None,
        }
    }

    pub fn datetime(&self, field: &str) -> Option<NaiveDateTime> {
        match self.get(field) {
            Some(Coerced::DateTime(dt)) => Some(*dt),
            _ => None,
        }
    }

    pub fn fragment(&self, field: &str) -> Option<&Element> {
        match self.get(field) {
            Some(Coerced::Fragment(element)) => Some(element),
            _ => None,
        }
    }

    pub fn fragments(&self, field: &str) -> Vec<&Element> {
        match self.get(field) {
            Some(Coerced::List(items)) => items
                .iter()
                .filter_map(|item| match item {
                    Coerced::Fragment(element) => Some(element),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// A named set of field rules. Unknown fields are allowed.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    rules: Vec<(String, FieldRule)>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>, rule: FieldRule) -> Self {
        self.rules.push((name.into(), rule));
        self
    }

    pub fn rule(&self, name: &str) -> Option<&FieldRule> {
        self.rules
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, rule)| rule)
    }

    pub fn validate(&self, raw: &RawRecord) -> Result<CoercedRow, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let mut values = BTreeMap::new();

        for (name, rule) in &self.rules {
            match raw.get(name) {
                None if rule.required => errors.insert(name.clone(), FieldError::Required),
                None => {}
                Some(value) => match rule.check(value) {
                    Ok(coerced) => {
                        values.insert(name.clone(), coerced);
                    }
                    Err(error) => errors.insert(name.clone(), error),
                },
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        for (name, value) in raw {
            if !values.contains_key(name) && self.rule(name).is_none() {
                values.insert(name.clone(), Coerced::Raw(value.clone()));
            }
        }

        Ok(CoercedRow { values })
    }
}

pub fn coerce_int(value: &Value) -> Result<Coerced, String> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(Coerced::Int(i));
            }
            match n.as_f64() {
                Some(x) if x.fract() == 0.0 && x.abs() < i64::MAX as f64 => Ok(Coerced::Int(x as i64)),
                _ => Err(format!("invalid literal for int: {}", n)),
            }
        }
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map(Coerced::Int)
            .map_err(|_| format!("invalid literal for int: '{}'", s)),
        other => Err(format!("invalid literal for int: {}", other)),
    }
}

/// Finite floats only; `inf` and `NaN` spellings are rejected.
pub fn coerce_float(value: &Value) -> Result<Coerced, String> {
    let parsed = match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| format!("could not convert to float: {}", n))?,
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("could not convert string to float: '{}'", s))?,
        other => return Err(format!("could not convert to float: {}", other)),
    };
    if !parsed.is_finite() {
        return Err(format!("non-finite float: {}", value));
    }
    Ok(Coerced::Float(parsed))
}

pub fn coerce_date(value: &Value) -> Result<Coerced, String> {
    let text = value
        .as_str()
        .ok_or_else(|| format!("expected a date string, got {}", value))?;
    parse_flexible_date(text)
        .map(Coerced::Date)
        .ok_or_else(|| format!("unknown date format: '{}'", text))
}

pub fn coerce_datetime(value: &Value) -> Result<Coerced, String> {
    let text = value
        .as_str()
        .ok_or_else(|| format!("expected a datetime string, got {}", value))?;
    parse_flexible_datetime(text)
        .map(Coerced::DateTime)
        .ok_or_else(|| format!("unknown datetime format: '{}'", text))
}

pub fn coerce_fragment(value: &Value) -> Result<Coerced, String> {
    let text = value
        .as_str()
        .ok_or_else(|| format!("expected an XML fragment string, got {}", value))?;
    Element::from_string(text)
        .map(Coerced::Fragment)
        .map_err(|e| e.to_string())
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %H:%M",
    "%d-%b-%Y %H:%M:%S",
    "%b %d %Y %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d-%b-%Y",
    "%d %b %Y",
    "%b %d %Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%Y%m%d",
];

/// Calendar date of a date or datetime spelling. An offset-bearing timestamp
/// keeps the date as written at that offset.
pub fn parse_flexible_date(text: &str) -> Option<NaiveDate> {
    match DateTime::parse_from_rfc3339(text.trim()) {
        Ok(dt) => Some(dt.date_naive()),
        Err(_) => parse_flexible_datetime(text).map(|dt| dt.date()),
    }
}

/// Parse the date and datetime spellings found in extract exports. Dates
/// without a time component resolve to midnight. Timestamps carrying a UTC
/// offset are converted to UTC; timestamps without one are kept as written.
pub fn parse_flexible_datetime(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}
