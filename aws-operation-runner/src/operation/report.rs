/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::fmt;

use serde::Serialize;

use crate::error::ErrorKind;
use crate::operation::{OperationDescriptor, OperationResult};
use crate::types::Value;

const NONE: &str = "<none>";
const RETRY_SUFFIX: &str = " (retry recommended)";

/// The rendered outcome of one invocation.
///
/// `Display` gives the line-oriented text form; [`Report::to_json`] gives the structured form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Report {
    /// Output fields of a successful call, in declared order
    Success {
        /// Operation name
        operation: String,
        /// Declared output fields
        fields: Vec<ReportField>,
    },

    /// A classified failure
    Failure {
        /// Operation name
        operation: String,
        /// Failure classification
        kind: ErrorKind,
        /// Original message
        message: String,
        /// Whether retrying is recommended
        retriable: bool,
    },
}

/// A declared output field and its value, if the response carried one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportField {
    name: String,
    value: Option<Value>,
}

impl ReportField {
    /// The field name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The field value, `None` if the response did not include it
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }
}

impl Report {
    /// Render `result` for the operation described by `descriptor`.
    ///
    /// Success fields follow the descriptor's declared output order no matter how the
    /// response stores them. Response fields that were not declared are left out.
    pub fn new(descriptor: &OperationDescriptor, result: OperationResult) -> Report {
        let operation = descriptor.name().to_owned();
        match result {
            OperationResult::Success { response } => Report::Success {
                operation,
                fields: descriptor
                    .output_fields()
                    .iter()
                    .map(|name| ReportField {
                        name: name.clone(),
                        value: response.get(name).cloned(),
                    })
                    .collect(),
            },
            OperationResult::Failure {
                kind,
                message,
                retriable,
            } => Report::Failure {
                operation,
                kind,
                message,
                retriable,
            },
        }
    }

    /// The operation this report is for
    pub fn operation(&self) -> &str {
        match self {
            Report::Success { operation, .. } | Report::Failure { operation, .. } => operation,
        }
    }

    /// Whether the invocation succeeded
    pub fn is_success(&self) -> bool {
        matches!(self, Report::Success { .. })
    }

    /// The failure kind, if the invocation failed
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            Report::Success { .. } => None,
            Report::Failure { kind, .. } => Some(*kind),
        }
    }

    /// Value of a reported output field
    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            Report::Success { fields, .. } => fields
                .iter()
                .find(|f| f.name == name)
                .and_then(|f| f.value.as_ref()),
            Report::Failure { .. } => None,
        }
    }

    /// Pretty printed JSON form of this report
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::Success { operation, fields } if fields.is_empty() => {
                write!(f, "{operation} succeeded")
            }
            Report::Success { fields, .. } => {
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str("\n")?;
                    }
                    match &field.value {
                        Some(value) => write!(f, "{}: {value}", field.name)?,
                        None => write!(f, "{}: {NONE}", field.name)?,
                    }
                }
                Ok(())
            }
            Report::Failure {
                kind,
                message,
                retriable,
                ..
            } => {
                write!(f, "{kind}: {message}")?;
                if *retriable {
                    f.write_str(RETRY_SUFFIX)?;
                }
                Ok(())
            }
        }
    }
}

/// Render `result` as text. See [`Report::new`].
pub fn report(descriptor: &OperationDescriptor, result: OperationResult) -> String {
    Report::new(descriptor, result).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::Response;

    fn get_user() -> OperationDescriptor {
        OperationDescriptor::builder("GetUser")
            .output("UserName")
            .output("Arn")
            .output("PasswordLastUsed")
            .build()
            .unwrap()
    }

    #[test]
    fn test_success_in_declared_order() {
        // insertion order deliberately differs from declared order
        let response = Response::new()
            .with("Arn", "arn:aws:iam::123:user/x")
            .with("Undeclared", "ignored")
            .with("UserName", "x");
        let text = report(&get_user(), OperationResult::Success { response });
        assert_eq!(
            "UserName: x\nArn: arn:aws:iam::123:user/x\nPasswordLastUsed: <none>",
            text
        );
    }

    #[test]
    fn test_single_field() {
        let descriptor = OperationDescriptor::builder("CreateUser")
            .output("Arn")
            .build()
            .unwrap();
        let response = Response::new().with("Arn", "arn:aws:iam::123:user/x");
        assert_eq!(
            "Arn: arn:aws:iam::123:user/x",
            report(&descriptor, OperationResult::Success { response })
        );
    }

    #[test]
    fn test_success_without_outputs() {
        let descriptor = OperationDescriptor::builder("DeleteUser").build().unwrap();
        let result = OperationResult::Success {
            response: Response::new(),
        };
        assert_eq!("DeleteUser succeeded", report(&descriptor, result));
    }

    #[test]
    fn test_failure() {
        let result = OperationResult::Failure {
            kind: ErrorKind::AlreadyExists,
            message: "User with name x already exists.".to_owned(),
            retriable: false,
        };
        assert_eq!(
            "AlreadyExists: User with name x already exists.",
            report(&get_user(), result)
        );
    }

    #[test]
    fn test_retriable_failure() {
        let result = OperationResult::Failure {
            kind: ErrorKind::Throttled,
            message: "Rate exceeded".to_owned(),
            retriable: true,
        };
        assert_eq!(
            "Throttled: Rate exceeded (retry recommended)",
            report(&get_user(), result)
        );
    }

    #[test]
    fn test_json() {
        let response = Response::new().with("UserName", "x");
        let report = Report::new(&get_user(), OperationResult::Success { response });
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!("success", json["status"]);
        assert_eq!("GetUser", json["operation"]);
        assert_eq!("UserName", json["fields"][0]["name"]);
        assert_eq!("x", json["fields"][0]["value"]);
        assert!(json["fields"][1]["value"].is_null());

        let failure = Report::new(
            &get_user(),
            OperationResult::Failure {
                kind: ErrorKind::NotFound,
                message: "The user with name x cannot be found.".to_owned(),
                retriable: false,
            },
        );
        let json: serde_json::Value = serde_json::from_str(&failure.to_json().unwrap()).unwrap();
        assert_eq!("failure", json["status"]);
        assert_eq!("NotFound", json["kind"]);
        assert_eq!(false, json["retriable"]);
    }
}
