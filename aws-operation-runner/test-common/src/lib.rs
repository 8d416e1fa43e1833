/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use aws_operation_runner::gateway::{Gateway, GatewayError, InvocationContext};
use aws_operation_runner::operation::{Request, Response};

#[doc(hidden)]
pub mod __private {
    pub use aws_smithy_mocks_experimental;
    pub use aws_smithy_runtime;
    pub use http_02x;
}

/// Create a mock SDK client from `rules` whose HTTP client always answers `200 OK`.
///
/// The mock interceptor replaces the response, so no request leaves the process.
#[macro_export]
macro_rules! mock_client_with_stubbed_http_client {
    ($aws_crate: ident, $rules: expr) => {
        $crate::mock_client_with_stubbed_http_client!(
            $aws_crate,
            $crate::__private::aws_smithy_mocks_experimental::RuleMode::Sequential,
            $rules
        )
    };
    ($aws_crate: ident, $rule_mode: expr, $rules: expr) => {{
        use $crate::__private::aws_smithy_runtime::client::http::test_util::infallible_client_fn;
        $crate::__private::aws_smithy_mocks_experimental::mock_client!(
            $aws_crate,
            $rule_mode,
            $rules,
            |client_builder: $aws_crate::config::Builder| {
                client_builder.http_client(infallible_client_fn(|_req| {
                    $crate::__private::http_02x::Response::builder()
                        .status(200)
                        .body("")
                        .unwrap()
                }))
            }
        )
    }};
}

#[derive(Debug, Clone)]
enum Scripted {
    Respond(Response),
    Fail(Option<String>, String),
}

/// A [`Gateway`] that answers each operation with a canned outcome and records what it saw.
///
/// Operations with nothing scripted fail with code `UnknownOperation`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedGateway {
    script: HashMap<String, Scripted>,
    delay: Option<Duration>,
    state: Arc<State>,
}

#[derive(Debug, Default)]
struct State {
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    requests: Mutex<Vec<(String, Request)>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `operation` with `response`
    pub fn respond(mut self, operation: &str, response: Response) -> Self {
        self.script
            .insert(operation.to_owned(), Scripted::Respond(response));
        self
    }

    /// Fail `operation` with the given service code and message
    pub fn fail(mut self, operation: &str, code: &str, message: &str) -> Self {
        self.script.insert(
            operation.to_owned(),
            Scripted::Fail(Some(code.to_owned()), message.to_owned()),
        );
        self
    }

    /// Fail `operation` with a bare message
    pub fn fail_without_code(mut self, operation: &str, message: &str) -> Self {
        self.script
            .insert(operation.to_owned(), Scripted::Fail(None, message.to_owned()));
        self
    }

    /// Hold every call for `delay` before answering
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of calls received
    pub fn calls(&self) -> usize {
        self.state.calls.load(Ordering::SeqCst)
    }

    /// Highest number of calls that were in progress at the same time
    pub fn max_in_flight(&self) -> usize {
        self.state.max_in_flight.load(Ordering::SeqCst)
    }

    /// Operation names and requests received, in arrival order
    pub fn requests(&self) -> Vec<(String, Request)> {
        self.state.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Gateway for ScriptedGateway {
    async fn execute(
        &self,
        _cx: &InvocationContext,
        operation: &str,
        request: &Request,
    ) -> Result<Response, GatewayError> {
        self.state.calls.fetch_add(1, Ordering::SeqCst);
        self.state
            .requests
            .lock()
            .unwrap()
            .push((operation.to_owned(), request.clone()));

        let now = self.state.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.state.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.script.get(operation) {
            Some(Scripted::Respond(response)) => Ok(response.clone()),
            Some(Scripted::Fail(Some(code), message)) => {
                Err(GatewayError::with_code(code, message))
            }
            Some(Scripted::Fail(None, message)) => Err(GatewayError::new(message)),
            None => Err(GatewayError::with_code(
                "UnknownOperation",
                format!("nothing scripted for '{operation}'"),
            )),
        }
    }
}
