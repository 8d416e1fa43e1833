/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::fmt;
use std::ops::RangeInclusive;
use std::sync::Arc;

use serde::Serialize;

/// The type a parameter value must have.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum ParamKind {
    /// A UTF-8 string
    String,

    /// A signed 64-bit integer
    Integer,

    /// A 64-bit float. Integer inputs are accepted and widened.
    Float,

    /// An ordered list of strings
    StringList,
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParamKind::String => "String",
            ParamKind::Integer => "Integer",
            ParamKind::Float => "Float",
            ParamKind::StringList => "StringList",
        };
        f.write_str(name)
    }
}

/// A validated request value or a response field value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// String value
    String(String),

    /// Integer value
    Integer(i64),

    /// Float value
    Float(f64),

    /// Boolean value. Only produced by responses, no parameter kind accepts it.
    Boolean(bool),

    /// List of strings
    StringList(Vec<String>),
}

impl Value {
    /// Returns the string if this is a [`Value::String`]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer if this is a [`Value::Integer`]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the float if this is a [`Value::Float`] or [`Value::Integer`]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Returns the list if this is a [`Value::StringList`]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Value::StringList(list) => Some(list),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::StringList(list) => f.write_str(&list.join(", ")),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<Vec<String>> for Value {
    fn from(value: Vec<String>) -> Self {
        Value::StringList(value)
    }
}

type CheckFn = dyn Fn(&Value) -> Result<(), String> + Send + Sync;

/// A predicate a present parameter value must satisfy.
#[derive(Clone)]
pub enum Constraint {
    /// Strings and lists must not be empty
    NonEmpty,

    /// Strings must be at most this many characters, lists at most this many items
    MaxLength(usize),

    /// Integers must fall inside the range (inclusive)
    Range(RangeInclusive<i64>),

    /// Strings must be one of the listed values
    OneOf(Vec<String>),

    /// An arbitrary check, returning the reason on rejection
    Custom(Arc<CheckFn>),
}

impl Constraint {
    /// Build a [`Constraint::Custom`] from a closure
    pub fn custom<F>(check: F) -> Self
    where
        F: Fn(&Value) -> Result<(), String> + Send + Sync + 'static,
    {
        Constraint::Custom(Arc::new(check))
    }

    /// Checks `value`, returning why it was rejected.
    pub fn check(&self, value: &Value) -> Result<(), String> {
        match (self, value) {
            (Constraint::NonEmpty, Value::String(s)) if s.is_empty() => {
                Err("must not be empty".to_owned())
            }
            (Constraint::NonEmpty, Value::StringList(l)) if l.is_empty() => {
                Err("must not be empty".to_owned())
            }
            (Constraint::MaxLength(max), Value::String(s)) if s.chars().count() > *max => {
                Err(format!("must be at most {max} characters"))
            }
            (Constraint::MaxLength(max), Value::StringList(l)) if l.len() > *max => {
                Err(format!("must have at most {max} items"))
            }
            (Constraint::Range(range), Value::Integer(i)) if !range.contains(i) => Err(format!(
                "must be between {} and {}",
                range.start(),
                range.end()
            )),
            (Constraint::OneOf(allowed), Value::String(s)) if !allowed.contains(s) => {
                Err(format!("must be one of [{}]", allowed.join(", ")))
            }
            (Constraint::Custom(check), value) => (**check)(value),
            _ => Ok(()),
        }
    }
}

impl fmt::Debug for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::NonEmpty => f.write_str("NonEmpty"),
            Constraint::MaxLength(max) => f.debug_tuple("MaxLength").field(max).finish(),
            Constraint::Range(range) => f.debug_tuple("Range").field(range).finish(),
            Constraint::OneOf(allowed) => f.debug_tuple("OneOf").field(allowed).finish(),
            Constraint::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// How many invocations the client may have in flight when fanning out.
#[derive(Debug, Clone, Default)]
pub enum ConcurrencySetting {
    /// Use the default in-flight limit.
    #[default]
    Auto,

    /// Explicitly configured limit. Zero is treated as one.
    Explicit(usize),
}
