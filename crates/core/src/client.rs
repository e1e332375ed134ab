//! Object store client implementation using AWS S3 SDK

use crate::config::S3Config;
use crate::error::{Error, Result};
use async_trait::async_trait;
use aws_config::{timeout::TimeoutConfig, BehaviorVersion};
use aws_sdk_s3::{
    config::Region,
    error::{DisplayErrorContext, ProvideErrorMetadata},
    operation::create_bucket::CreateBucketError,
    primitives::ByteStream,
    types::{BucketLocationConstraint, CreateBucketConfiguration},
    Client,
};
use std::time::Duration;
use tracing::debug;

/// Region in which buckets are created without a location constraint
const DEFAULT_REGION: &str = "us-east-1";

/// The two storage operations the seeder needs
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Create `bucket` in `region`.
    ///
    /// Fails with [`Error::BucketAlreadyExists`] when the name is taken and
    /// [`Error::Service`] for any other service failure.
    async fn create_bucket(&self, bucket: &str, region: &str) -> Result<()>;

    /// Store `body` as object `key` in `bucket`
    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>, content_type: &str) -> Result<()>;
}

/// S3 client bound to one region
pub struct S3Store {
    client: Client,
}

impl S3Store {
    /// Build a client for `region` using the default AWS credential chain
    pub async fn connect(region: &str, settings: &S3Config) -> Self {
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(region.to_string()));

        if let Some(secs) = settings.timeout_secs {
            loader = loader.timeout_config(
                TimeoutConfig::builder()
                    .operation_timeout(Duration::from_secs(secs))
                    .build(),
            );
        }

        let shared = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared).force_path_style(settings.force_path_style);
        if let Some(endpoint) = &settings.endpoint {
            debug!(endpoint = %endpoint, "using custom S3 endpoint");
            builder = builder.endpoint_url(endpoint);
        }

        Self::from_client(Client::from_conf(builder.build()))
    }

    /// Wrap an already configured client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn create_bucket(&self, bucket: &str, region: &str) -> Result<()> {
        self.client
            .create_bucket()
            .bucket(bucket)
            .set_create_bucket_configuration(bucket_configuration(region))
            .send()
            .await
            .map_err(|e| classify_create_bucket_error(bucket, e.into_service_error()))?;

        Ok(())
    }

    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>, content_type: &str) -> Result<()> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| Error::Service(service_message(&e.into_service_error())))?;

        Ok(())
    }
}

/// Location constraint for `region`; `us-east-1` must be sent without one
fn bucket_configuration(region: &str) -> Option<CreateBucketConfiguration> {
    if region.is_empty() || region == DEFAULT_REGION {
        return None;
    }

    Some(
        CreateBucketConfiguration::builder()
            .location_constraint(BucketLocationConstraint::from(region))
            .build(),
    )
}

/// Map a create-bucket failure onto the crate's error taxonomy
fn classify_create_bucket_error(bucket: &str, err: CreateBucketError) -> Error {
    if err.is_bucket_already_exists() {
        Error::BucketAlreadyExists(bucket.to_string())
    } else {
        Error::Service(service_message(&err))
    }
}

/// The service-provided message, or the full error chain when there is none
fn service_message<E>(err: &E) -> String
where
    E: ProvideErrorMetadata + std::error::Error,
{
    match err.message() {
        Some(message) => message.to_string(),
        None => DisplayErrorContext(err).to_string(),
    }
}
