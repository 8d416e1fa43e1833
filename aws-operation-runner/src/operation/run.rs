/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::gateway::{Gateway, InvocationContext};
use crate::operation::classify::classify;
use crate::operation::report::Report;
use crate::operation::{build, OperationDescriptor, OperationResult, RawInput};

/// Validate, dispatch and report a single invocation.
///
/// Invalid input is reported as a `Validation` failure without calling the gateway. Gateway
/// failures are classified before being reported, so this always yields exactly one report.
/// `cx` is passed to the gateway untouched.
#[tracing::instrument(skip_all, level = "debug", name = "run-operation", fields(
    operation = descriptor.name(),
))]
pub async fn run<G>(
    descriptor: &OperationDescriptor,
    input: &RawInput,
    gateway: &G,
    cx: &InvocationContext,
) -> Report
where
    G: Gateway + ?Sized,
{
    Report::new(descriptor, invoke(descriptor, input, gateway, cx).await)
}

/// Like [`run`] but returns the unrendered [`OperationResult`].
pub async fn invoke<G>(
    descriptor: &OperationDescriptor,
    input: &RawInput,
    gateway: &G,
    cx: &InvocationContext,
) -> OperationResult
where
    G: Gateway + ?Sized,
{
    let request = match build(descriptor, input) {
        Ok(request) => request,
        Err(err) => {
            tracing::debug!("rejected before dispatch: {}", err);
            return err.into();
        }
    };

    match gateway.execute(cx, descriptor.name(), &request).await {
        Ok(response) => {
            tracing::debug!(fields = response.len(), "operation succeeded");
            OperationResult::Success { response }
        }
        Err(err) => {
            let classification = classify(&err);
            tracing::warn!(
                kind = %classification.kind(),
                retriable = classification.is_retriable(),
                "operation failed: {}",
                err
            );
            OperationResult::Failure {
                kind: classification.kind(),
                message: err.message().to_owned(),
                retriable: classification.is_retriable(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::gateway::GatewayError;
    use crate::operation::{describe, ParamSpec, Request, Response};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tokio_util::sync::CancellationToken;

    /// Returns a fixed outcome and counts calls
    struct StubGateway {
        calls: AtomicUsize,
        outcome: fn() -> Result<Response, GatewayError>,
        seen_cancelled: Mutex<Option<bool>>,
    }

    impl StubGateway {
        fn new(outcome: fn() -> Result<Response, GatewayError>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                outcome,
                seen_cancelled: Mutex::new(None),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl Gateway for StubGateway {
        async fn execute(
            &self,
            cx: &InvocationContext,
            _operation: &str,
            _request: &Request,
        ) -> Result<Response, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.seen_cancelled.lock().unwrap() = Some(cx.is_cancelled());
            (self.outcome)()
        }
    }

    fn create_user() -> OperationDescriptor {
        OperationDescriptor::builder("CreateUser")
            .required(ParamSpec::string("userName").non_empty())
            .output("Arn")
            .build()
            .unwrap()
    }

    fn user_input() -> RawInput {
        RawInput::new().with("userName", "x")
    }

    async fn run_once(
        descriptor: &OperationDescriptor,
        input: &RawInput,
        gateway: &StubGateway,
    ) -> Report {
        run(descriptor, input, gateway, &InvocationContext::new()).await
    }

    #[tokio::test]
    async fn test_missing_parameter_reported() {
        let gateway = StubGateway::new(|| Ok(Response::new()));
        let report = run_once(&create_user(), &RawInput::new(), &gateway).await;
        assert_eq!(
            "Validation: missing required parameter 'userName'",
            report.to_string()
        );
        assert_eq!(0, gateway.calls());
    }

    #[tokio::test]
    async fn test_validation_never_reaches_gateway() {
        let descriptor = describe("HeadBucket", vec![ParamSpec::string("bucketName")], vec![])
            .unwrap();
        let gateway = StubGateway::new(|| Ok(Response::new()));
        let report = run_once(&descriptor, &RawInput::new(), &gateway).await;

        assert_eq!(Some(ErrorKind::Validation), report.error_kind());
        assert_eq!(0, gateway.calls());

        // constraint violations short circuit too
        let input = RawInput::new().with("userName", "");
        let report = run_once(&create_user(), &input, &gateway).await;
        assert_eq!(Some(ErrorKind::Validation), report.error_kind());
        assert_eq!(0, gateway.calls());
    }

    #[tokio::test]
    async fn test_success() {
        let gateway =
            StubGateway::new(|| Ok(Response::new().with("Arn", "arn:aws:iam::123:user/x")));
        let report = run_once(&create_user(), &user_input(), &gateway).await;
        assert_eq!("Arn: arn:aws:iam::123:user/x", report.to_string());
        assert_eq!(1, gateway.calls());
    }

    #[tokio::test]
    async fn test_already_exists() {
        let gateway = StubGateway::new(|| {
            Err(GatewayError::with_code(
                "EntityAlreadyExists",
                "User with name x already exists.",
            ))
        });
        let report = run_once(&create_user(), &user_input(), &gateway).await;
        assert_eq!(
            "AlreadyExists: User with name x already exists.",
            report.to_string()
        );
    }

    #[tokio::test]
    async fn test_throttled() {
        let gateway =
            StubGateway::new(|| Err(GatewayError::with_code("Throttling", "Rate exceeded")));
        let report = run_once(&create_user(), &user_input(), &gateway).await;
        assert!(report.to_string().ends_with("(retry recommended)"));
    }

    #[tokio::test]
    async fn test_unknown_message_preserved() {
        let gateway = StubGateway::new(|| {
            Err(GatewayError::with_code(
                "ServiceFailure",
                "Request could not be completed: 0xDEAD",
            ))
        });
        let cx = InvocationContext::new();
        let result = invoke(&create_user(), &user_input(), &gateway, &cx).await;
        assert_eq!(
            OperationResult::Failure {
                kind: ErrorKind::Unknown,
                message: "Request could not be completed: 0xDEAD".to_owned(),
                retriable: false,
            },
            result
        );
    }

    #[tokio::test]
    async fn test_context_passed_through() {
        let token = CancellationToken::new();
        token.cancel();
        let cx = InvocationContext::new().with_cancellation_token(token);

        let gateway = StubGateway::new(|| Ok(Response::new()));
        let report = run(&create_user(), &user_input(), &gateway, &cx).await;

        // the runner does not act on cancellation itself
        assert!(report.is_success());
        assert_eq!(Some(true), *gateway.seen_cancelled.lock().unwrap());
    }
}
