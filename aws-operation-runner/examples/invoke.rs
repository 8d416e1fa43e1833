/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */
use std::error::Error;
use std::process::ExitCode;

use aws_operation_runner::operation::{OperationDescriptor, RawInput, RawValue};
use clap::{CommandFactory, Parser};
use tracing::{debug_span, Instrument};

type BoxError = Box<dyn Error + Send + Sync>;

#[derive(Debug, Clone, clap::Parser)]
#[command(name = "invoke")]
#[command(about = "Invokes a single AWS operation and prints a report of the outcome.")]
pub struct Args {
    /// Operation to invoke, e.g. CreateBucket
    #[arg(required_unless_present = "list")]
    operation: Option<String>,

    /// Values for the operation's required parameters, in declared order
    args: Vec<String>,

    /// Optional parameter given as NAME=VALUE. May be repeated.
    #[arg(long = "param", value_name = "NAME=VALUE", value_parser = parse_param)]
    params: Vec<(String, String)>,

    /// Region to send requests to
    #[arg(long)]
    region: Option<String>,

    /// Named profile to load credentials and settings from
    #[arg(long)]
    profile: Option<String>,

    /// Endpoint to send requests to, e.g. http://localhost:4566
    #[arg(long)]
    endpoint_url: Option<String>,

    /// Print the report as JSON
    #[arg(long, default_value_t = false, action = clap::ArgAction::SetTrue)]
    json: bool,

    /// List the available operations and their usage, then exit
    #[arg(long, default_value_t = false, action = clap::ArgAction::SetTrue)]
    list: bool,
}

fn parse_param(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_owned(), value.to_owned())),
        _ => Err(format!("expected NAME=VALUE, got '{s}'")),
    }
}

fn invalid_arg(message: &str) -> ! {
    Args::command()
        .error(clap::error::ErrorKind::InvalidValue, message)
        .exit()
}

fn wrong_arg_count(descriptor: &OperationDescriptor) -> ! {
    Args::command()
        .error(
            clap::error::ErrorKind::WrongNumberOfValues,
            format!("usage: {}", descriptor.usage()),
        )
        .exit()
}

fn input_from_args(descriptor: &OperationDescriptor, args: &Args) -> RawInput {
    let Some(mut input) = RawInput::from_args(descriptor, &args.args) else {
        wrong_arg_count(descriptor)
    };

    for (name, value) in &args.params {
        let Some(spec) = descriptor.param(name) else {
            invalid_arg(&format!(
                "operation '{}' has no parameter '{name}'",
                descriptor.name()
            ))
        };
        input.insert(name, RawValue::parse_as(spec.kind(), value));
    }
    input
}

#[tokio::main]
async fn main() -> Result<ExitCode, BoxError> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_thread_ids(true)
        .init();

    let mut loader = aws_operation_runner::from_env();
    if let Some(region) = &args.region {
        loader = loader.region(region);
    }
    if let Some(profile) = &args.profile {
        loader = loader.profile_name(profile);
    }
    if let Some(endpoint_url) = &args.endpoint_url {
        loader = loader.endpoint_url(endpoint_url);
    }
    let config = loader.load().await;
    let client = aws_operation_runner::Client::new(config)?;

    if args.list {
        for descriptor in client.catalog().iter() {
            println!("{}", descriptor.usage());
        }
        return Ok(ExitCode::SUCCESS);
    }

    let Some(operation) = args.operation.as_deref() else {
        invalid_arg("an operation is required")
    };
    let Some(descriptor) = client.catalog().get(operation) else {
        invalid_arg(&format!(
            "unknown operation '{operation}', use --list to see the available operations"
        ))
    };
    let input = input_from_args(descriptor, &args);

    let report = client
        .invoke(operation)
        .set_input(input)
        .send()
        .instrument(debug_span!("invoke", operation))
        .await?;

    if args.json {
        println!("{}", report.to_json()?);
    } else {
        println!("{report}");
    }

    if report.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
