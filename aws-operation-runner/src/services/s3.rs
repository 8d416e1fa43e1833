/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::future::Future;

use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};
use aws_sdk_s3::Client;
use aws_smithy_types::date_time::Format;
use bytes::Bytes;

use crate::catalog::Catalog;
use crate::error::ConfigurationError;
use crate::gateway::{GatewayError, HandlerGateway};
use crate::operation::{OperationDescriptor, ParamSpec, Request, Response};
use crate::types::Constraint;

const MAX_KEYS: std::ops::RangeInclusive<i64> = 1..=1000;

/// Register the built-in Amazon S3 operations with `catalog` and `gateway`.
///
/// Each handler sends requests with `client`.
pub fn register(
    catalog: &mut Catalog,
    gateway: &mut HandlerGateway,
    client: Client,
) -> Result<(), ConfigurationError> {
    for descriptor in descriptors()? {
        catalog.register(descriptor)?;
    }

    bind(gateway, &client, "ListBuckets", list_buckets);
    bind(gateway, &client, "CreateBucket", create_bucket);
    bind(gateway, &client, "DeleteBucket", delete_bucket);
    bind(gateway, &client, "HeadBucket", head_bucket);
    bind(gateway, &client, "ListObjects", list_objects);
    bind(gateway, &client, "PutObject", put_object);
    bind(gateway, &client, "HeadObject", head_object);
    bind(gateway, &client, "DeleteObject", delete_object);
    bind(gateway, &client, "CopyObject", copy_object);
    Ok(())
}

fn bucket_name() -> ParamSpec {
    ParamSpec::string("bucketName").non_empty()
}

fn key() -> ParamSpec {
    ParamSpec::string("key")
        .non_empty()
        .constraint(Constraint::MaxLength(1024))
}

fn max_keys() -> ParamSpec {
    ParamSpec::integer("maxKeys").constraint(Constraint::Range(MAX_KEYS))
}

fn descriptors() -> Result<Vec<OperationDescriptor>, ConfigurationError> {
    Ok(vec![
        OperationDescriptor::builder("ListBuckets")
            .output("Buckets")
            .output("Owner")
            .build()?,
        OperationDescriptor::builder("CreateBucket")
            .required(bucket_name())
            .optional(ParamSpec::string("region").non_empty())
            .output("Location")
            .build()?,
        OperationDescriptor::builder("DeleteBucket")
            .required(bucket_name())
            .build()?,
        OperationDescriptor::builder("HeadBucket")
            .required(bucket_name())
            .output("BucketRegion")
            .build()?,
        OperationDescriptor::builder("ListObjects")
            .required(bucket_name())
            .optional(ParamSpec::string("prefix"))
            .optional(max_keys())
            .optional(ParamSpec::string("continuationToken").non_empty())
            .output("Keys")
            .output("KeyCount")
            .output("IsTruncated")
            .output("NextContinuationToken")
            .build()?,
        OperationDescriptor::builder("PutObject")
            .required(bucket_name())
            .required(key())
            .optional(ParamSpec::string("body"))
            .optional(ParamSpec::string("contentType").non_empty())
            .output("ETag")
            .output("VersionId")
            .build()?,
        OperationDescriptor::builder("HeadObject")
            .required(bucket_name())
            .required(key())
            .output("ContentLength")
            .output("ContentType")
            .output("ETag")
            .output("LastModified")
            .build()?,
        OperationDescriptor::builder("DeleteObject")
            .required(bucket_name())
            .required(key())
            .output("DeleteMarker")
            .output("VersionId")
            .build()?,
        OperationDescriptor::builder("CopyObject")
            .required(ParamSpec::string("sourceBucket").non_empty())
            .required(ParamSpec::string("sourceKey").non_empty())
            .required(ParamSpec::string("destinationBucket").non_empty())
            .required(ParamSpec::string("destinationKey").non_empty())
            .output("ETag")
            .output("VersionId")
            .build()?,
    ])
}

fn bind<F, Fut>(gateway: &mut HandlerGateway, client: &Client, operation: &str, handler: F)
where
    F: Fn(Client, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response, GatewayError>> + Send + 'static,
{
    let client = client.clone();
    gateway.register(operation, move |_cx, request| handler(client.clone(), request));
}

// Required parameters are present once a request has been built.
fn required<'a>(request: &'a Request, name: &str) -> Result<&'a str, GatewayError> {
    request
        .get_str(name)
        .ok_or_else(|| GatewayError::new(format!("request is missing '{name}'")))
}

fn owned(value: Option<&str>) -> Option<String> {
    value.map(str::to_owned)
}

async fn list_buckets(client: Client, _request: Request) -> Result<Response, GatewayError> {
    let output = client.list_buckets().send().await?;
    let buckets: Vec<String> = output
        .buckets()
        .iter()
        .filter_map(|bucket| bucket.name())
        .map(str::to_owned)
        .collect();

    let owner = output.owner().and_then(|owner| owner.display_name());

    Ok(Response::new()
        .with("Buckets", buckets)
        .with_opt("Owner", owner))
}

async fn create_bucket(client: Client, request: Request) -> Result<Response, GatewayError> {
    let configuration = request.get_str("region").map(|region| {
        CreateBucketConfiguration::builder()
            .location_constraint(BucketLocationConstraint::from(region))
            .build()
    });

    let output = client
        .create_bucket()
        .bucket(required(&request, "bucketName")?)
        .set_create_bucket_configuration(configuration)
        .send()
        .await?;

    Ok(Response::new().with_opt("Location", output.location()))
}

async fn delete_bucket(client: Client, request: Request) -> Result<Response, GatewayError> {
    client
        .delete_bucket()
        .bucket(required(&request, "bucketName")?)
        .send()
        .await?;
    Ok(Response::new())
}

async fn head_bucket(client: Client, request: Request) -> Result<Response, GatewayError> {
    let output = client
        .head_bucket()
        .bucket(required(&request, "bucketName")?)
        .send()
        .await?;
    Ok(Response::new()
        .with_opt("BucketRegion", output.bucket_region()))
}

async fn list_objects(client: Client, request: Request) -> Result<Response, GatewayError> {
    let max_keys = request.get_i64("maxKeys").map(i32::try_from).transpose();
    let max_keys = max_keys
        .map_err(|_| GatewayError::new("maxKeys is out of range"))?;

    let output = client
        .list_objects_v2()
        .bucket(required(&request, "bucketName")?)
        .set_prefix(owned(request.get_str("prefix")))
        .set_max_keys(max_keys)
        .set_continuation_token(owned(request.get_str("continuationToken")))
        .send()
        .await?;

    let keys: Vec<String> = output
        .contents()
        .iter()
        .filter_map(|object| object.key())
        .map(str::to_owned)
        .collect();

    Ok(Response::new()
        .with("Keys", keys)
        .with_opt("KeyCount", output.key_count())
        .with_opt("IsTruncated", output.is_truncated())
        .with_opt("NextContinuationToken", output.next_continuation_token()))
}

async fn put_object(client: Client, request: Request) -> Result<Response, GatewayError> {
    let body = request.get_str("body").unwrap_or_default();
    let output = client
        .put_object()
        .bucket(required(&request, "bucketName")?)
        .key(required(&request, "key")?)
        .body(ByteStream::from(Bytes::copy_from_slice(body.as_bytes())))
        .set_content_type(owned(request.get_str("contentType")))
        .send()
        .await?;

    Ok(Response::new()
        .with_opt("ETag", output.e_tag())
        .with_opt("VersionId", output.version_id()))
}

async fn head_object(client: Client, request: Request) -> Result<Response, GatewayError> {
    let output = client
        .head_object()
        .bucket(required(&request, "bucketName")?)
        .key(required(&request, "key")?)
        .send()
        .await?;

    let last_modified = output
        .last_modified()
        .and_then(|time| time.fmt(Format::DateTime).ok());

    Ok(Response::new()
        .with_opt("ContentLength", output.content_length())
        .with_opt("ContentType", output.content_type())
        .with_opt("ETag", output.e_tag())
        .with_opt("LastModified", last_modified))
}

async fn delete_object(client: Client, request: Request) -> Result<Response, GatewayError> {
    let output = client
        .delete_object()
        .bucket(required(&request, "bucketName")?)
        .key(required(&request, "key")?)
        .send()
        .await?;

    Ok(Response::new()
        .with_opt("DeleteMarker", output.delete_marker())
        .with_opt("VersionId", output.version_id()))
}

// `x-amz-copy-source` is sent as given, so the key must already be URL encoded.
// Each segment is encoded on its own so that `/` survives as the separator.
fn copy_source(bucket: &str, key: &str) -> String {
    let key: Vec<_> = key.split('/').map(urlencoding::encode).collect();
    format!("{bucket}/{}", key.join("/"))
}

async fn copy_object(client: Client, request: Request) -> Result<Response, GatewayError> {
    let source = copy_source(
        required(&request, "sourceBucket")?,
        required(&request, "sourceKey")?,
    );
    let output = client
        .copy_object()
        .copy_source(source)
        .bucket(required(&request, "destinationBucket")?)
        .key(required(&request, "destinationKey")?)
        .send()
        .await?;

    let e_tag = output.copy_object_result().and_then(|r| r.e_tag());

    Ok(Response::new()
        .with_opt("ETag", e_tag)
        .with_opt("VersionId", output.version_id()))
}
