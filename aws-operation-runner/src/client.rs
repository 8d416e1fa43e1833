/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::fmt;
use std::sync::Arc;

use futures_util::stream::{self, StreamExt};

use crate::catalog::Catalog;
use crate::error::ConfigurationError;
use crate::gateway::{Gateway, HandlerGateway};
use crate::metrics::InvocationMetrics;
use crate::operation::builders::InvokeFluentBuilder;
use crate::operation::report::Report;
use crate::operation::RawInput;
use crate::Config;

/// Client for invoking cataloged operations through a gateway.
#[derive(Debug, Clone)]
pub struct Client {
    pub(crate) handle: Arc<Handle>,
}

/// Whatever is needed to carry out invocations: config, catalog, gateway and metrics
pub(crate) struct Handle {
    pub(crate) config: Config,
    pub(crate) catalog: Catalog,
    pub(crate) gateway: Arc<dyn Gateway>,
    pub(crate) metrics: InvocationMetrics,
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("config", &self.config)
            .field("catalog", &self.catalog)
            .field("metrics", &self.metrics)
            .finish_non_exhaustive()
    }
}

impl Drop for Handle {
    fn drop(&mut self) {
        tracing::debug!(
            "Client metrics summary - Invocations started: {}, succeeded: {}, failed: {}",
            self.metrics.invocations_started(),
            self.metrics.invocations_succeeded(),
            self.metrics.invocations_failed(),
        );
    }
}

impl Client {
    /// Creates a client exposing the built-in Amazon S3 operations.
    ///
    /// Fails if the config carries no S3 client.
    pub fn new(config: Config) -> Result<Client, ConfigurationError> {
        let s3 = config
            .client()
            .cloned()
            .ok_or_else(|| ConfigurationError::new("no Amazon S3 client configured"))?;

        let mut catalog = Catalog::new();
        let mut gateway = HandlerGateway::new();
        crate::services::s3::register(&mut catalog, &mut gateway, s3)?;

        Ok(Self::from_gateway(config, catalog, gateway))
    }

    /// Creates a client over an arbitrary catalog and gateway.
    pub fn from_gateway<G>(config: Config, catalog: Catalog, gateway: G) -> Client
    where
        G: Gateway + 'static,
    {
        let handle = Arc::new(Handle {
            config,
            catalog,
            gateway: Arc::new(gateway),
            metrics: InvocationMetrics::new(),
        });
        Client { handle }
    }

    /// Returns the client's configuration
    pub fn config(&self) -> &Config {
        &self.handle.config
    }

    /// Returns the client's metrics
    pub fn metrics(&self) -> &InvocationMetrics {
        &self.handle.metrics
    }

    /// Returns the operations this client can invoke
    pub fn catalog(&self) -> &Catalog {
        &self.handle.catalog
    }

    /// Invoke a single operation.
    ///
    /// Constructs a fluent builder for the named operation. Nothing is sent until
    /// [`send`](InvokeFluentBuilder::send) is called.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// async fn create_bucket(
    ///     client: &aws_operation_runner::Client,
    /// ) -> Result<(), Box<dyn std::error::Error>> {
    ///     let report = client
    ///         .invoke("CreateBucket")
    ///         .param("bucketName", "my-bucket")
    ///         .send()
    ///         .await?;
    ///
    ///     println!("{report}");
    ///     Ok(())
    /// }
    /// ```
    pub fn invoke(&self, operation: impl Into<String>) -> InvokeFluentBuilder {
        InvokeFluentBuilder::new(self.handle.clone(), operation.into())
    }

    /// Invoke many operations concurrently.
    ///
    /// At most [`Config::max_in_flight`] invocations run at once. Reports are returned in the
    /// same order as `invocations`.
    pub async fn invoke_all<I, S>(&self, invocations: I) -> Vec<Result<Report, ConfigurationError>>
    where
        I: IntoIterator<Item = (S, RawInput)>,
        S: Into<String>,
    {
        let limit = self.handle.config.max_in_flight();
        stream::iter(invocations)
            .map(|(operation, input)| self.invoke(operation).set_input(input).send())
            .buffered(limit)
            .collect()
            .await
    }
}
