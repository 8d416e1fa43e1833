/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

/* Automatically managed default lints */
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
/* End of automatically managed default lints */

//! AWS Operation Runner
//!
//! Validated, classified and reported single-call orchestration over AWS SDK clients.
//!
//! Every invocation follows the same path: the caller's raw input is checked against the
//! operation's [`OperationDescriptor`](operation::OperationDescriptor), a validated
//! [`Request`](operation::Request) is handed to a [`Gateway`](gateway::Gateway), any
//! failure is classified into an [`ErrorKind`](error::ErrorKind) and the outcome is
//! rendered as a [`Report`](operation::report::Report).
//!
//! # Examples
//!
//! ```no_run
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = aws_operation_runner::from_env().load().await;
//! let client = aws_operation_runner::Client::new(config)?;
//!
//! let report = client
//!     .invoke("ListObjects")
//!     .param("bucketName", "my-bucket")
//!     .param("maxKeys", 10)
//!     .send()
//!     .await?;
//! println!("{report}");
//! # Ok(())
//! # }
//! ```

#![warn(
    missing_debug_implementations,
    missing_docs,
    rustdoc::missing_crate_level_docs,
    unreachable_pub,
    rust_2018_idioms
)]

pub(crate) const DEFAULT_CONCURRENCY: usize = 8;

/// Error types emitted by `aws-operation-runner`
pub mod error;

/// Common types used by `aws-operation-runner`
pub mod types;

/// Operation schemas, requests and the invocation pipeline
pub mod operation;

/// The boundary where remote calls are made
pub mod gateway;

/// Registry of invocable operations
pub mod catalog;

/// Operation runner client
pub mod client;

/// Client configuration
pub mod config;

/// Invocation metrics
pub mod metrics;

/// Built-in service bindings
pub mod services;

pub use self::client::Client;
pub use self::config::Config;

use self::config::loader::ConfigLoader;

/// Create a config loader
pub fn from_env() -> ConfigLoader {
    ConfigLoader::default()
}
