/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::fmt;

use serde::Serialize;

/// A boxed error that is `Send` and `Sync`.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors produced while building a request for an operation.
///
/// Only request validation surfaces this type today; gateway failures are classified into
/// an [`ErrorKind`] and reported rather than returned.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    source: BoxError,
}

/// The closed set of failure categories every operation outcome is labelled with.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
pub enum ErrorKind {
    /// Missing or malformed input, caught before any remote call is made
    Validation,

    /// The addressed resource does not exist
    NotFound,

    /// The resource being created already exists
    AlreadyExists,

    /// The caller is not allowed to perform the operation
    PermissionDenied,

    /// The service is rate limiting the caller. Safe to retry later.
    Throttled,

    /// Anything that could not be recognized
    Unknown,
}

impl ErrorKind {
    /// All kinds, in declaration order.
    pub const ALL: [ErrorKind; 6] = [
        ErrorKind::Validation,
        ErrorKind::NotFound,
        ErrorKind::AlreadyExists,
        ErrorKind::PermissionDenied,
        ErrorKind::Throttled,
        ErrorKind::Unknown,
    ];

    /// The label used when rendering reports, e.g. `NotFound`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "Validation",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::AlreadyExists => "AlreadyExists",
            ErrorKind::PermissionDenied => "PermissionDenied",
            ErrorKind::Throttled => "Throttled",
            ErrorKind::Unknown => "Unknown",
        }
    }

    /// Whether a failure of this kind is worth retrying.
    pub fn is_retriable(&self) -> bool {
        matches!(self, ErrorKind::Throttled)
    }

    // Position in `ALL`, which lists the variants in declaration order.
    pub(crate) fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Error {
    /// Creates a new [`Error`] from a known kind of error as well as an arbitrary error
    /// source.
    pub fn new<E>(kind: ErrorKind, err: E) -> Error
    where
        E: Into<BoxError>,
    {
        Error {
            kind,
            source: err.into(),
        }
    }

    /// Returns the corresponding [`ErrorKind`] for this error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// The human readable message carried by this error
    pub fn message(&self) -> String {
        self.source.to_string()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.source)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.source.as_ref())
    }
}

pub(crate) fn validation<E>(err: E) -> Error
where
    E: Into<BoxError>,
{
    Error::new(ErrorKind::Validation, err)
}

/// A descriptor, catalog or client was put together incorrectly.
///
/// These are programming mistakes in how operations are declared rather than failures of a
/// single invocation, so they are returned as errors instead of being reported.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ConfigurationError {
    message: String,
}

impl ConfigurationError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// What was wrong with the configuration
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigurationError {}
