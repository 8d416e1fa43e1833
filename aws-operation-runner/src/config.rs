/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::types::ConcurrencySetting;
use crate::DEFAULT_CONCURRENCY;

/// Load configuration from the environment
pub mod loader;

/// Configuration for a [`Client`](crate::client::Client)
#[derive(Debug, Clone)]
pub struct Config {
    concurrency: ConcurrencySetting,
    client: Option<aws_sdk_s3::Client>,
}

impl Config {
    /// Create a new `Config` builder
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Returns the concurrency setting used when fanning out invocations.
    pub fn concurrency(&self) -> &ConcurrencySetting {
        &self.concurrency
    }

    /// The concrete number of invocations allowed in flight at once.
    pub fn max_in_flight(&self) -> usize {
        match self.concurrency {
            ConcurrencySetting::Explicit(n) => n.max(1),
            ConcurrencySetting::Auto => DEFAULT_CONCURRENCY,
        }
    }

    /// The Amazon S3 client instance the built-in S3 operations send requests with.
    pub fn client(&self) -> Option<&aws_sdk_s3::Client> {
        self.client.as_ref()
    }
}

/// Fluent style builder for [Config]
#[derive(Debug, Clone, Default)]
pub struct Builder {
    concurrency: ConcurrencySetting,
    client: Option<aws_sdk_s3::Client>,
}

impl Builder {
    /// Set the number of invocations [`invoke_all`](crate::Client::invoke_all) may have in
    /// flight at once.
    ///
    /// Default is [ConcurrencySetting::Auto].
    pub fn concurrency(mut self, concurrency: ConcurrencySetting) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Set an explicit S3 client to use.
    pub fn client(mut self, client: aws_sdk_s3::Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Consumes the builder and constructs a [`Config`](crate::config::Config)
    pub fn build(self) -> Config {
        Config {
            concurrency: self.concurrency,
            client: self.client,
        }
    }
}
