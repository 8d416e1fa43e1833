/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::{BoxFuture, FutureExt};

use super::{Gateway, GatewayError, InvocationContext};
use crate::operation::{Request, Response};

type Handler = Arc<
    dyn Fn(InvocationContext, Request) -> BoxFuture<'static, Result<Response, GatewayError>>
        + Send
        + Sync,
>;

/// Error code reported when no handler is registered for an operation
pub const UNKNOWN_OPERATION: &str = "UnknownOperation";

/// Error code reported when the caller cancelled the invocation
pub const REQUEST_CANCELLED: &str = "RequestCancelled";

/// Error code reported when the invocation deadline elapsed
pub const REQUEST_TIMEOUT: &str = "RequestTimeout";

/// A [`Gateway`] that dispatches each operation to an async handler registered under its name.
///
/// The invocation context is honored here: a cancelled token or an elapsed deadline abandons
/// the in-flight call and reports a failure instead.
#[derive(Clone, Default)]
pub struct HandlerGateway {
    handlers: HashMap<String, Handler>,
}

impl HandlerGateway {
    /// Create a gateway with no handlers
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `operation`, replacing any previous handler.
    pub fn register<F, Fut>(&mut self, operation: impl Into<String>, handler: F)
    where
        F: Fn(InvocationContext, Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Response, GatewayError>> + Send + 'static,
    {
        let handler: Handler = Arc::new(move |cx, request| handler(cx, request).boxed());
        self.handlers.insert(operation.into(), handler);
    }

    /// Whether a handler is registered for `operation`
    pub fn supports(&self, operation: &str) -> bool {
        self.handlers.contains_key(operation)
    }

    /// Names of all operations with a registered handler, sorted
    pub fn operations(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for HandlerGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerGateway")
            .field("operations", &self.operations())
            .finish()
    }
}

#[async_trait::async_trait]
impl Gateway for HandlerGateway {
    async fn execute(
        &self,
        cx: &InvocationContext,
        operation: &str,
        request: &Request,
    ) -> Result<Response, GatewayError> {
        let handler = self.handlers.get(operation).ok_or_else(|| {
            GatewayError::with_code(
                UNKNOWN_OPERATION,
                format!("no handler registered for operation '{operation}'"),
            )
        })?;

        tracing::trace!(operation, "dispatching to handler");
        let call = (**handler)(cx.clone(), request.clone());
        let call = async {
            match cx.deadline() {
                Some(deadline) => match tokio::time::timeout_at(deadline, call).await {
                    Ok(result) => result,
                    Err(_) => Err(GatewayError::with_code(
                        REQUEST_TIMEOUT,
                        format!("operation '{operation}' did not complete before its deadline"),
                    )),
                },
                None => call.await,
            }
        };

        tokio::select! {
            biased;
            _ = cx.cancellation_token().cancelled() => Err(GatewayError::with_code(
                REQUEST_CANCELLED,
                format!("operation '{operation}' was cancelled"),
            )),
            result = call => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::{build, describe, ParamSpec, RawInput};
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    fn request() -> Request {
        let descriptor = describe("Echo", vec![ParamSpec::string("text")], vec![]).unwrap();
        build(&descriptor, &RawInput::new().with("text", "hello")).unwrap()
    }

    fn echo_gateway() -> HandlerGateway {
        let mut gateway = HandlerGateway::new();
        gateway.register("Echo", |_cx, request: Request| async move {
            let text = request.get_str("text").unwrap_or_default().to_owned();
            Ok::<_, GatewayError>(Response::new().with("Text", text))
        });
        gateway.register("Hang", |_cx, _request| async move {
            std::future::pending::<()>().await;
            Ok::<_, GatewayError>(Response::new())
        });
        gateway
    }

    #[tokio::test]
    async fn test_dispatch() {
        let gateway = echo_gateway();
        assert_eq!(vec!["Echo", "Hang"], gateway.operations());

        let response = gateway
            .execute(&InvocationContext::new(), "Echo", &request())
            .await
            .unwrap();
        assert_eq!(Some("hello"), response.get("Text").and_then(|v| v.as_str()));
    }

    #[tokio::test]
    async fn test_unknown_operation() {
        let err = echo_gateway()
            .execute(&InvocationContext::new(), "Nope", &request())
            .await
            .unwrap_err();
        assert_eq!(Some(UNKNOWN_OPERATION), err.code());
        assert_eq!("no handler registered for operation 'Nope'", err.message());
    }

    #[tokio::test]
    async fn test_cancelled() {
        let token = CancellationToken::new();
        let cx = InvocationContext::new()
            .with_cancellation_token(token.clone());
        let gateway = echo_gateway();
        let request = request();

        let call = gateway.execute(&cx, "Hang", &request);
        token.cancel();
        let err = call.await.unwrap_err();
        assert_eq!(Some(REQUEST_CANCELLED), err.code());
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline() {
        let cx = InvocationContext::new()
            .with_deadline(tokio::time::Instant::now() + Duration::from_secs(5));
        let err = echo_gateway()
            .execute(&cx, "Hang", &request())
            .await
            .unwrap_err();
        assert_eq!(Some(REQUEST_TIMEOUT), err.code());
    }
}
