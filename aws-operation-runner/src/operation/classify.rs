/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::error::ErrorKind;
use crate::gateway::GatewayError;

/// The label and retry advice assigned to a gateway failure.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Classification {
    kind: ErrorKind,
    retriable: bool,
}

impl Classification {
    fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            retriable: kind.is_retriable(),
        }
    }

    /// The assigned kind
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Whether retrying later is recommended
    pub fn is_retriable(&self) -> bool {
        self.retriable
    }
}

// Checked in order; the first kind with a matching signal wins.
const SIGNALS: &[(ErrorKind, &[&str])] = &[
    (
        ErrorKind::NotFound,
        &[
            "notfound",
            "not found",
            "nosuch",
            "no such",
            "does not exist",
            "doesnotexist",
        ],
    ),
    (
        ErrorKind::AlreadyExists,
        &[
            "alreadyexists",
            "already exists",
            "alreadyowned",
            "already owned",
            "alreadyinuse",
            "already in use",
        ],
    ),
    (
        ErrorKind::Throttled,
        &[
            "throttl",
            "toomanyrequests",
            "too many requests",
            "slowdown",
            "slow down",
            "rate exceeded",
            "requestlimitexceeded",
            "provisionedthroughputexceeded",
        ],
    ),
    (
        ErrorKind::PermissionDenied,
        &[
            "accessdenied",
            "access denied",
            "permission",
            "unauthorized",
            "notauthorized",
            "not authorized",
            "forbidden",
        ],
    ),
];

/// Classify a gateway failure by its error code and message.
pub fn classify(err: &GatewayError) -> Classification {
    classify_signal(err.code(), err.message())
}

/// Classify a failure from its identifying code (if any) and literal message.
///
/// Matching is case-insensitive and looks at both inputs. When several kinds match,
/// precedence is `NotFound`, `AlreadyExists`, `Throttled`, `PermissionDenied`. Anything
/// unrecognized is [`ErrorKind::Unknown`]. Only `Throttled` is retriable.
pub fn classify_signal(code: Option<&str>, message: &str) -> Classification {
    let code = code.unwrap_or_default().to_ascii_lowercase();
    let message = message.to_ascii_lowercase();

    SIGNALS
        .iter()
        .find(|(_, patterns)| {
            patterns
                .iter()
                .any(|p| code.contains(p) || message.contains(p))
        })
        .map(|(kind, _)| Classification::new(*kind))
        .unwrap_or_else(|| Classification::new(ErrorKind::Unknown))
}
