//! `s3` storage: the blob is one object in an S3 (or S3-compatible) bucket.
//!
//! Credentials come from the standard AWS provider chain (environment,
//! shared config and profile files, instance metadata).

use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use tokio::runtime::Runtime;
use tracing::debug;

use super::{required, Backend, BackendFactory, StorageOption};
use crate::config::settings::non_empty;
use crate::config::{S3Settings, Settings};
use crate::errors::{Result, ScrtError};

const OPTIONS: &[StorageOption] = &[
    StorageOption {
        flag: "--s3-bucket-name",
        description: "name of the S3 bucket",
        required: true,
    },
    StorageOption {
        flag: "--s3-key",
        description: "path of the store object in the bucket",
        required: true,
    },
    StorageOption {
        flag: "--s3-region",
        description: "region of the S3 bucket",
        required: false,
    },
    StorageOption {
        flag: "--s3-endpoint-url",
        description: "custom endpoint for S3-compatible services",
        required: false,
    },
];

pub struct S3Factory;

impl BackendFactory for S3Factory {
    fn name(&self) -> &'static str {
        "s3"
    }

    fn display_name(&self) -> &'static str {
        "S3"
    }

    fn description(&self) -> &'static str {
        "store secrets in an AWS S3 or S3-compatible bucket"
    }

    fn options(&self) -> &'static [StorageOption] {
        OPTIONS
    }

    fn build(&self, settings: &Settings) -> Result<Box<dyn Backend>> {
        Ok(Box::new(S3Backend::new(&settings.s3)?))
    }
}

/// Store blob kept in one S3 object.
///
/// The SDK is async; each operation runs to completion on a private
/// single-threaded runtime.
pub struct S3Backend {
    client: Client,
    bucket: String,
    key: String,
    runtime: Runtime,
}

impl S3Backend {
    pub fn new(options: &S3Settings) -> Result<Self> {
        let bucket = required(&options.bucket_name, "S3 bucket name (--s3-bucket-name)")?;
        let key = required(&options.key, "S3 key (--s3-key)")?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ScrtError::Backend(format!("cannot start async runtime: {e}")))?;

        let client = runtime.block_on(create_client(
            non_empty(&options.region),
            non_empty(&options.endpoint_url),
        ));

        Ok(Self {
            client,
            bucket: bucket.to_string(),
            key: key.to_string(),
            runtime,
        })
    }
}

async fn create_client(region: Option<&str>, endpoint: Option<&str>) -> Client {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = region {
        loader = loader.region(Region::new(region.to_string()));
    }
    let sdk_config = loader.load().await;

    let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);
    if let Some(endpoint_url) = endpoint {
        debug!(endpoint_url, "using custom S3 endpoint");
        // Path-style addressing for MinIO and friends.
        builder = builder.endpoint_url(endpoint_url).force_path_style(true);
    }

    Client::from_conf(builder.build())
}

impl Backend for S3Backend {
    fn exists(&self) -> Result<bool> {
        debug!(bucket = %self.bucket, key = %self.key, "checking store object");
        let result = self.runtime.block_on(
            self.client
                .head_object()
                .bucket(&self.bucket)
                .key(&self.key)
                .send(),
        );

        match result {
            Ok(_) => Ok(true),
            Err(e) => {
                let service_error = e.into_service_error();
                if service_error.is_not_found() {
                    Ok(false)
                } else {
                    Err(ScrtError::Backend(format!(
                        "cannot check {}: {}",
                        self.location(),
                        DisplayErrorContext(&service_error)
                    )))
                }
            }
        }
    }

    fn load(&self) -> Result<Vec<u8>> {
        debug!(bucket = %self.bucket, key = %self.key, "downloading store object");
        self.runtime.block_on(async {
            let resp = self
                .client
                .get_object()
                .bucket(&self.bucket)
                .key(&self.key)
                .send()
                .await
                .map_err(|e| {
                    ScrtError::Backend(format!(
                        "cannot download {}: {}",
                        self.location(),
                        DisplayErrorContext(&e)
                    ))
                })?;

            let body = resp.body.collect().await.map_err(|e| {
                ScrtError::Backend(format!("cannot read {}: {e}", self.location()))
            })?;

            Ok::<_, ScrtError>(body.into_bytes().to_vec())
        })
    }

    fn save(&self, data: &[u8]) -> Result<()> {
        debug!(bucket = %self.bucket, key = %self.key, bytes = data.len(), "uploading store object");
        self.runtime
            .block_on(
                self.client
                    .put_object()
                    .bucket(&self.bucket)
                    .key(&self.key)
                    .body(ByteStream::from(data.to_vec()))
                    .send(),
            )
            .map_err(|e| {
                ScrtError::Backend(format!(
                    "cannot upload {}: {}",
                    self.location(),
                    DisplayErrorContext(&e)
                ))
            })?;
        Ok(())
    }

    fn location(&self) -> String {
        format!("s3://{}/{}", self.bucket, self.key)
    }
}
