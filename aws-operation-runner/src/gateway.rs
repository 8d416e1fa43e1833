/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::fmt;
use std::sync::Arc;

use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::BoxError;
use crate::operation::{Request, Response};

/// Gateway backed by a registry of async handlers
pub mod handlers;

pub use handlers::HandlerGateway;

/// The component that performs the actual remote call for an operation.
///
/// Transport, retries, credentials and pagination are the gateway's business. Callers must
/// not assume a call is idempotent unless the remote operation guarantees it.
#[async_trait::async_trait]
pub trait Gateway: Send + Sync {
    /// Execute `operation` with the validated `request`.
    ///
    /// `cx` carries the caller's cancellation signal and deadline. It is handed over as-is;
    /// honoring it is up to the implementation.
    async fn execute(
        &self,
        cx: &InvocationContext,
        operation: &str,
        request: &Request,
    ) -> Result<Response, GatewayError>;
}

#[async_trait::async_trait]
impl<G> Gateway for Arc<G>
where
    G: Gateway + ?Sized,
{
    async fn execute(
        &self,
        cx: &InvocationContext,
        operation: &str,
        request: &Request,
    ) -> Result<Response, GatewayError> {
        (**self).execute(cx, operation, request).await
    }
}

/// Caller supplied cancellation signal and deadline for a single invocation.
#[derive(Debug, Clone, Default)]
pub struct InvocationContext {
    cancellation_token: CancellationToken,
    deadline: Option<Instant>,
}

impl InvocationContext {
    /// A context that is never cancelled and has no deadline
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `token` as the cancellation signal
    pub fn with_cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = token;
        self
    }

    /// Complete (or give up) by `deadline`
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// The cancellation signal
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancellation_token
    }

    /// The deadline, if any
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Whether the caller has cancelled the invocation
    pub fn is_cancelled(&self) -> bool {
        self.cancellation_token.is_cancelled()
    }
}

/// A failure reported by a [`Gateway`].
///
/// Carries the service's identifying error code (when there is one) and its message. The
/// message is reported verbatim, so it should be whatever the service said.
#[derive(Debug)]
pub struct GatewayError {
    code: Option<String>,
    message: String,
    source: Option<BoxError>,
}

impl GatewayError {
    /// A failure with no error code
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            source: None,
        }
    }

    /// A failure identified by `code`, e.g. `NoSuchBucket`
    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
            source: None,
        }
    }

    /// Attach the underlying error
    pub fn with_source(mut self, source: impl Into<BoxError>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// The service error code, if any
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// The error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{code}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for GatewayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|err| err.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl<E, R> From<SdkError<E, R>> for GatewayError
where
    E: std::error::Error + ProvideErrorMetadata + Send + Sync + 'static,
    R: Send + Sync + fmt::Debug + 'static,
{
    fn from(value: SdkError<E, R>) -> Self {
        let code = value.code().map(str::to_owned);
        let message = match value.message() {
            Some(message) if !message.is_empty() => message.to_owned(),
            _ => match &code {
                Some(code) => code.clone(),
                None => DisplayErrorContext(&value).to_string(),
            },
        };

        GatewayError {
            code,
            message,
            source: Some(value.into()),
        }
    }
}
