/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::collections::HashMap;

use crate::error::{Error, ErrorKind};
use crate::types::Value;

/// Operation schemas
pub mod descriptor;

/// Raw input and validated requests
pub mod request;

/// Mapping gateway failures onto [`ErrorKind`]
pub mod classify;

/// Rendering results
pub mod report;

/// Orchestration of a single invocation
pub mod run;

/// Fluent builders for client invocations
pub mod builders;

pub use descriptor::{describe, OperationDescriptor, ParamSpec};
pub use request::{build, RawInput, RawValue, Request};
pub use run::run;

/// The fields returned by a successful call, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Response {
    fields: HashMap<String, Value>,
}

impl Response {
    /// Create an empty response
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `field` to `value`
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Set `field` to `value` when present, leave it unset otherwise
    pub fn with_opt<V: Into<Value>>(self, field: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.with(field, value),
            None => self,
        }
    }

    /// The value of `field`
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Number of fields set
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no fields are set
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Outcome of a single invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationResult {
    /// The call succeeded
    Success {
        /// Fields returned by the service
        response: Response,
    },

    /// The call was rejected locally or failed remotely
    Failure {
        /// Classification of the failure
        kind: ErrorKind,
        /// The original message, preserved verbatim
        message: String,
        /// Whether retrying later is recommended
        retriable: bool,
    },
}

impl OperationResult {
    /// The response if this is a success
    pub fn response(&self) -> Option<&Response> {
        match self {
            OperationResult::Success { response } => Some(response),
            OperationResult::Failure { .. } => None,
        }
    }

    /// The failure kind if this is a failure
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            OperationResult::Success { .. } => None,
            OperationResult::Failure { kind, .. } => Some(*kind),
        }
    }

    /// Whether this is a success
    pub fn is_success(&self) -> bool {
        matches!(self, OperationResult::Success { .. })
    }
}

impl From<Error> for OperationResult {
    fn from(err: Error) -> Self {
        let kind = *err.kind();
        OperationResult::Failure {
            kind,
            message: err.message(),
            retriable: kind.is_retriable(),
        }
    }
}
