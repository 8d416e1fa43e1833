/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{self, Error};
use crate::operation::descriptor::{OperationDescriptor, ParamSpec};
use crate::operation::report::Report;
use crate::operation::OperationResult;
use crate::types::{ParamKind, Value};

/// An unvalidated value supplied by a caller.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// Text
    String(String),

    /// Whole number
    Integer(i64),

    /// Fractional number
    Float(f64),

    /// List of strings
    List(Vec<String>),
}

impl RawValue {
    /// Parse a command line argument according to `kind`.
    ///
    /// Text that does not parse is kept as a [`RawValue::String`] so that the builder reports
    /// the type mismatch.
    pub fn parse_as(kind: ParamKind, arg: &str) -> RawValue {
        match kind {
            ParamKind::String => RawValue::String(arg.to_owned()),
            ParamKind::Integer => arg
                .parse()
                .map(RawValue::Integer)
                .unwrap_or_else(|_| RawValue::String(arg.to_owned())),
            ParamKind::Float => arg
                .parse()
                .map(RawValue::Float)
                .unwrap_or_else(|_| RawValue::String(arg.to_owned())),
            ParamKind::StringList if arg.is_empty() => RawValue::List(Vec::new()),
            ParamKind::StringList => {
                RawValue::List(arg.split(',').map(|s| s.trim().to_owned()).collect())
            }
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            RawValue::String(_) => "String",
            RawValue::Integer(_) => "Integer",
            RawValue::Float(_) => "Float",
            RawValue::List(_) => "StringList",
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::String(value.to_owned())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::String(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Integer(value)
    }
}

impl From<i32> for RawValue {
    fn from(value: i32) -> Self {
        RawValue::Integer(value.into())
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Float(value)
    }
}

impl From<Vec<String>> for RawValue {
    fn from(value: Vec<String>) -> Self {
        RawValue::List(value)
    }
}

impl From<Vec<&str>> for RawValue {
    fn from(value: Vec<&str>) -> Self {
        RawValue::List(value.into_iter().map(str::to_owned).collect())
    }
}

impl TryFrom<&Value> for RawValue {
    type Error = ();

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(s) => Ok(RawValue::String(s.clone())),
            Value::Integer(i) => Ok(RawValue::Integer(*i)),
            Value::Float(f) => Ok(RawValue::Float(*f)),
            Value::StringList(l) => Ok(RawValue::List(l.clone())),
            Value::Boolean(_) => Err(()),
        }
    }
}

/// Caller supplied parameters for one invocation, keyed by parameter name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawInput {
    values: HashMap<String, RawValue>,
}

impl RawInput {
    /// Create an empty input
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name` to `value`, replacing any previous value
    pub fn with(mut self, name: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Set `name` to `value`, replacing any previous value
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<RawValue>) {
        self.values.insert(name.into(), value.into());
    }

    /// The value supplied for `name`
    pub fn get(&self, name: &str) -> Option<&RawValue> {
        self.values.get(name)
    }

    /// Number of supplied values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing was supplied
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Map positional command line arguments 1:1 onto the descriptor's required parameters.
    ///
    /// Returns `None` when the number of arguments differs from the number of required
    /// parameters.
    pub fn from_args<S: AsRef<str>>(
        descriptor: &OperationDescriptor,
        args: &[S],
    ) -> Option<RawInput> {
        let required = descriptor.required_params();
        if args.len() != required.len() {
            return None;
        }

        let values = required
            .iter()
            .zip(args)
            .map(|(spec, arg)| {
                (
                    spec.name().to_owned(),
                    RawValue::parse_as(spec.kind(), arg.as_ref()),
                )
            })
            .collect();
        Some(RawInput { values })
    }

    /// Copy `field` from a successful prior result into parameter `param`.
    ///
    /// Used to chain a "start" operation into a "poll" operation (e.g. a job id). Nothing is
    /// copied when the result is a failure or the field is absent.
    pub fn carry(
        mut self,
        result: &OperationResult,
        field: &str,
        param: impl Into<String>,
    ) -> Self {
        let value = result
            .response()
            .and_then(|response| response.get(field))
            .and_then(|value| RawValue::try_from(value).ok());
        if let Some(value) = value {
            self.values.insert(param.into(), value);
        }
        self
    }

    /// Same as [`carry`](RawInput::carry), reading from a rendered [`Report`].
    pub fn carry_from(mut self, report: &Report, field: &str, param: impl Into<String>) -> Self {
        if let Some(value) = report
            .field(field)
            .and_then(|value| RawValue::try_from(value).ok())
        {
            self.values.insert(param.into(), value);
        }
        self
    }
}

impl<K, V> FromIterator<(K, V)> for RawInput
where
    K: Into<String>,
    V: Into<RawValue>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        RawInput {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A validated, immutable set of parameter values for one invocation.
///
/// Only [`build`] creates a `Request`. Cloning is cheap and shares the underlying values.
#[derive(Debug, Clone)]
pub struct Request {
    values: Arc<HashMap<String, Value>>,
}

impl Request {
    /// The validated value of parameter `name`
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// The value of `name` if it is a string
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// The value of `name` if it is an integer
    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_i64)
    }

    /// The value of `name` if it is a float
    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_f64)
    }

    /// The value of `name` if it is a list of strings
    pub fn get_list(&self, name: &str) -> Option<&[String]> {
        self.get(name).and_then(Value::as_list)
    }

    /// Whether parameter `name` was supplied
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of parameters carried
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no parameters are carried
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Validate `input` against `descriptor` and produce a [`Request`].
///
/// Keys not declared by the descriptor are ignored.
pub fn build(descriptor: &OperationDescriptor, input: &RawInput) -> Result<Request, Error> {
    let mut values = HashMap::with_capacity(input.len());

    for spec in descriptor.required_params() {
        let raw = input.get(spec.name()).ok_or_else(|| {
            error::validation(format!("missing required parameter '{}'", spec.name()))
        })?;
        values.insert(spec.name().to_owned(), validate(spec, raw)?);
    }

    for spec in descriptor.optional_params() {
        if let Some(raw) = input.get(spec.name()) {
            values.insert(spec.name().to_owned(), validate(spec, raw)?);
        }
    }

    Ok(Request {
        values: Arc::new(values),
    })
}

fn validate(spec: &ParamSpec, raw: &RawValue) -> Result<Value, Error> {
    let value = match (spec.kind(), raw) {
        (ParamKind::String, RawValue::String(s)) => Value::String(s.clone()),
        (ParamKind::Integer, RawValue::Integer(i)) => Value::Integer(*i),
        (ParamKind::Float, RawValue::Float(f)) => Value::Float(*f),
        (ParamKind::Float, RawValue::Integer(i)) => Value::Float(*i as f64),
        (ParamKind::StringList, RawValue::List(l)) => Value::StringList(l.clone()),
        (kind, raw) => {
            return Err(error::validation(format!(
                "invalid type for parameter '{}': expected {kind}, got {}",
                spec.name(),
                raw.type_name()
            )))
        }
    };

    if let Some(constraint) = spec.get_constraint() {
        constraint.check(&value).map_err(|reason| {
            error::validation(format!(
                "invalid value for parameter '{}': {reason}",
                spec.name()
            ))
        })?;
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::operation::descriptor::describe;
    use crate::operation::Response;
    use crate::types::Constraint;

    fn list_objects() -> OperationDescriptor {
        describe(
            "ListObjects",
            vec![ParamSpec::string("bucketName").non_empty()],
            vec![
                ParamSpec::integer("maxKeys").constraint(Constraint::Range(1..=1000)),
                ParamSpec::string_list("tags"),
                ParamSpec::float("ratio"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_missing_required_parameter() {
        let descriptor = describe("CreateUser", vec![ParamSpec::string("userName")], vec![])
            .unwrap();
        let err = build(&descriptor, &RawInput::new()).unwrap_err();
        assert_eq!(&ErrorKind::Validation, err.kind());
        assert_eq!("missing required parameter 'userName'", err.message());
    }

    #[test]
    fn test_build_valid_request() {
        let input = RawInput::new()
            .with("bucketName", "my-bucket")
            .with("maxKeys", 10)
            .with("tags", vec!["a", "b"])
            .with("ratio", 2);
        let request = build(&list_objects(), &input).unwrap();

        assert_eq!(Some("my-bucket"), request.get_str("bucketName"));
        assert_eq!(Some(10), request.get_i64("maxKeys"));
        assert_eq!(
            Some(&["a".to_owned(), "b".to_owned()][..]),
            request.get_list("tags")
        );
        // integers widen to floats
        assert_eq!(Some(&Value::Float(2.0)), request.get("ratio"));
        assert_eq!(4, request.len());
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let input = RawInput::new()
            .with("bucketName", "my-bucket")
            .with("somethingNew", "whatever");
        let request = build(&list_objects(), &input).unwrap();
        assert!(!request.contains("somethingNew"));
        assert_eq!(1, request.len());
    }

    #[test]
    fn test_type_mismatch() {
        let input = RawInput::new()
            .with("bucketName", "my-bucket")
            .with("maxKeys", "ten");
        let err = build(&list_objects(), &input).unwrap_err();
        assert_eq!(&ErrorKind::Validation, err.kind());
        assert_eq!(
            "invalid type for parameter 'maxKeys': expected Integer, got String",
            err.message()
        );
    }

    #[test]
    fn test_constraint_rejected() {
        let input = RawInput::new().with("bucketName", "");
        let err = build(&list_objects(), &input).unwrap_err();
        assert_eq!(
            "invalid value for parameter 'bucketName': must not be empty",
            err.message()
        );

        let input = RawInput::new()
            .with("bucketName", "b")
            .with("maxKeys", 5000);
        let err = build(&list_objects(), &input).unwrap_err();
        assert_eq!(
            "invalid value for parameter 'maxKeys': must be between 1 and 1000",
            err.message()
        );
    }

    #[test]
    fn test_every_missing_required_parameter_is_rejected() {
        let descriptor = describe(
            "CopyObject",
            vec![
                ParamSpec::string("sourceBucket"),
                ParamSpec::string("sourceKey"),
                ParamSpec::string("destinationBucket"),
            ],
            vec![],
        )
        .unwrap();
        let names = ["sourceBucket", "sourceKey", "destinationBucket"];

        for missing in names {
            let input: RawInput = names
                .iter()
                .filter(|n| **n != missing)
                .map(|n| (*n, "x"))
                .collect();
            let err = build(&descriptor, &input).unwrap_err();
            assert_eq!(&ErrorKind::Validation, err.kind());
            assert!(err.message().contains(missing), "{}", err.message());
        }
    }

    #[test]
    fn test_from_args() {
        let descriptor = describe(
            "PutThing",
            vec![
                ParamSpec::string("name"),
                ParamSpec::integer("count"),
                ParamSpec::string_list("tags"),
            ],
            vec![],
        )
        .unwrap();

        let input = RawInput::from_args(&descriptor, &["thing", "3", "a, b"]).unwrap();
        assert_eq!(Some(&RawValue::from("thing")), input.get("name"));
        assert_eq!(Some(&RawValue::Integer(3)), input.get("count"));
        assert_eq!(Some(&RawValue::from(vec!["a", "b"])), input.get("tags"));

        // wrong count
        assert!(RawInput::from_args(&descriptor, &["thing"]).is_none());

        // unparseable numbers surface as type errors from the builder
        let input = RawInput::from_args(&descriptor, &["thing", "three", ""]).unwrap();
        assert_eq!(Some(&RawValue::from("three")), input.get("count"));
        assert!(build(&descriptor, &input).is_err());
    }

    #[test]
    fn test_carry_threads_job_id() {
        let started = OperationResult::Success {
            response: Response::new().with("JobId", "job-123"),
        };
        let input = RawInput::new().carry(&started, "JobId", "jobId");
        assert_eq!(Some(&RawValue::from("job-123")), input.get("jobId"));

        let failed = OperationResult::Failure {
            kind: ErrorKind::Throttled,
            message: "slow down".to_owned(),
            retriable: true,
        };
        let input = RawInput::new().carry(&failed, "JobId", "jobId");
        assert!(input.is_empty());
    }
}
