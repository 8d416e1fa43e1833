/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::sync::Arc;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::ConfigurationError;
use crate::gateway::InvocationContext;
use crate::operation::report::Report;
use crate::operation::{RawInput, RawValue};

/// Fluent builder for invoking a single cataloged operation
#[derive(Debug)]
pub struct InvokeFluentBuilder {
    handle: Arc<crate::client::Handle>,
    operation: String,
    input: RawInput,
    cx: InvocationContext,
}

impl InvokeFluentBuilder {
    pub(crate) fn new(handle: Arc<crate::client::Handle>, operation: String) -> Self {
        Self {
            handle,
            operation,
            input: RawInput::new(),
            cx: InvocationContext::new(),
        }
    }

    /// Validate the input, call the gateway and report the outcome.
    ///
    /// Only fails if the operation is not in the client's catalog. Every other outcome,
    /// including invalid input, is a [`Report`].
    #[tracing::instrument(skip_all, level = "debug", name = "invoke", fields(
        operation = self.operation.as_str(),
    ))]
    pub async fn send(self) -> Result<Report, ConfigurationError> {
        let descriptor = self
            .handle
            .catalog
            .get(&self.operation)
            .cloned()
            .ok_or_else(|| {
                ConfigurationError::new(format!("unknown operation '{}'", self.operation))
            })?;

        let metrics = &self.handle.metrics;
        let _in_flight = metrics.record_started();
        let report = crate::operation::run(
            &descriptor,
            &self.input,
            self.handle.gateway.as_ref(),
            &self.cx,
        )
        .await;
        metrics.record_finished(&report);

        Ok(report)
    }

    /// Set parameter `name` to `value`
    pub fn param(mut self, name: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.input.insert(name, value);
        self
    }

    /// Replace all parameters with `input`
    pub fn set_input(mut self, input: RawInput) -> Self {
        self.input = input;
        self
    }

    /// The parameters supplied so far
    pub fn get_input(&self) -> &RawInput {
        &self.input
    }

    /// Signal used to abandon the invocation. Passed to the gateway.
    pub fn cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cx = self.cx.with_cancellation_token(token);
        self
    }

    /// Deadline for the invocation. Passed to the gateway.
    pub fn deadline(mut self, deadline: Instant) -> Self {
        self.cx = self.cx.with_deadline(deadline);
        self
    }
}
