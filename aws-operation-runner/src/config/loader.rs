/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use aws_types::region::Region;

use crate::config::Builder;
use crate::types::ConcurrencySetting;
use crate::Config;

/// Load [`Config`] from the environment.
///
/// Credentials, region and retry settings are resolved by `aws-config` the usual way; the
/// overrides here only narrow that resolution.
#[derive(Default, Debug)]
pub struct ConfigLoader {
    builder: Builder,
    region: Option<String>,
    profile_name: Option<String>,
    endpoint_url: Option<String>,
}

impl ConfigLoader {
    /// Use this region instead of the one resolved from the environment.
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Use this named profile from the shared config files.
    pub fn profile_name(mut self, profile_name: impl Into<String>) -> Self {
        self.profile_name = Some(profile_name.into());
        self
    }

    /// Send requests to this endpoint, e.g. `http://localhost:4566` for LocalStack.
    ///
    /// S3 requests use path-style addressing when an endpoint is set.
    pub fn endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self
    }

    /// Set the number of invocations allowed in flight when fanning out.
    ///
    /// Default is [ConcurrencySetting::Auto].
    pub fn concurrency(mut self, concurrency: ConcurrencySetting) -> Self {
        self.builder = self.builder.concurrency(concurrency);
        self
    }

    /// Load the default configuration
    ///
    /// If fields have been overridden during builder construction, the override values will be
    /// used. Otherwise, the default values for each field will be provided.
    pub async fn load(self) -> Config {
        let mut loader = aws_config::from_env();
        if let Some(region) = self.region {
            loader = loader.region(Region::new(region));
        }
        if let Some(profile_name) = self.profile_name {
            loader = loader.profile_name(profile_name);
        }
        if let Some(endpoint_url) = &self.endpoint_url {
            loader = loader.endpoint_url(endpoint_url);
        }
        let shared_config = loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&shared_config)
            .force_path_style(self.endpoint_url.is_some())
            .build();
        tracing::debug!(
            region = ?shared_config.region(),
            endpoint_url = self.endpoint_url.as_deref().unwrap_or_default(),
            "loaded shared config"
        );

        self.builder
            .client(aws_sdk_s3::Client::from_conf(s3_config))
            .build()
    }
}
