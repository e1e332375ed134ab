//! Bucket provisioning and the generate/upload/clean-up loop

use crate::client::ObjectStore;
use crate::content::{file_name, iterations, random_content};
use crate::error::{Error, Result};
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Everything a seeding run needs to know
#[derive(Debug, Clone)]
pub struct SeedPlan {
    pub bucket: String,
    pub region: String,
    /// Requested count, as parsed; non-positive values run zero iterations
    pub file_count: i64,
    pub file_prefix: String,
    /// Directory holding the temporary local files
    pub work_dir: PathBuf,
    pub entropy_bytes: usize,
}

/// One user-facing outcome of a seeding run.
///
/// The `Display` form is the line printed for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedEvent {
    BucketCreated { bucket: String },
    WriteFailed { file_name: String, message: String },
    Uploaded { file_name: String, bucket: String },
    UploadFailed { file_name: String, message: String },
    Deleted { file_name: String },
    DeletePermissionDenied { file_name: String, message: String },
    DeleteFailed { file_name: String, message: String },
    Summary { bucket: String, requested: i64 },
}

impl fmt::Display for SeedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeedEvent::BucketCreated { bucket } => {
                write!(f, "Bucket '{}' created successfully.", bucket)
            }
            SeedEvent::WriteFailed { file_name, message } => {
                write!(f, "Failed to write {}: {}", file_name, message)
            }
            SeedEvent::Uploaded { file_name, bucket } => {
                write!(f, "Uploaded {} to s3://{}/", file_name, bucket)
            }
            SeedEvent::UploadFailed { file_name, message } => {
                write!(f, "Failed to upload {}: {}", file_name, message)
            }
            SeedEvent::Deleted { file_name } => write!(f, "Deleted local file: {}", file_name),
            SeedEvent::DeletePermissionDenied { file_name, message } => {
                write!(f, "Permission denied to delete file {}: {}", file_name, message)
            }
            SeedEvent::DeleteFailed { file_name, message } => {
                write!(f, "Failed to delete local file {}: {}", file_name, message)
            }
            SeedEvent::Summary { bucket, requested } => write!(
                f,
                "Bucket {} populated with {} random text files.",
                bucket, requested
            ),
        }
    }
}

/// Tally of a finished loop
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// The count that was asked for, which is what the summary line reports
    pub requested: i64,
    pub uploaded: u64,
    pub write_failures: u64,
    pub upload_failures: u64,
    pub cleanup_failures: u64,
}

/// Drives one seeding run against an [`ObjectStore`]
pub struct Seeder<'a, S: ObjectStore + ?Sized> {
    store: &'a S,
    plan: SeedPlan,
}

impl<'a, S: ObjectStore + ?Sized> Seeder<'a, S> {
    pub fn new(store: &'a S, plan: SeedPlan) -> Self {
        Self { store, plan }
    }

    /// Create the bucket. Any error here is fatal for the run.
    pub async fn provision(&self, on_event: &mut dyn FnMut(&SeedEvent)) -> Result<()> {
        info!(bucket = %self.plan.bucket, region = %self.plan.region, "creating bucket");

        self.store
            .create_bucket(&self.plan.bucket, &self.plan.region)
            .await?;

        on_event(&SeedEvent::BucketCreated {
            bucket: self.plan.bucket.clone(),
        });
        Ok(())
    }

    /// Generate, upload and clean up every file, then emit the summary.
    ///
    /// Per-file failures are reported through `on_event` and never stop the
    /// loop. Only a missing work directory that cannot be created fails.
    pub async fn populate(&self, on_event: &mut dyn FnMut(&SeedEvent)) -> Result<SeedReport> {
        let total = iterations(self.plan.file_count);
        let mut report = SeedReport {
            requested: self.plan.file_count,
            ..SeedReport::default()
        };

        if total > 0 {
            tokio::fs::create_dir_all(&self.plan.work_dir).await.map_err(Error::Io)?;
        }

        for index in 1..=total {
            self.seed_one(index, &mut report, on_event).await;
        }

        info!(
            bucket = %self.plan.bucket,
            uploaded = report.uploaded,
            failed = report.upload_failures + report.write_failures,
            "seeding finished"
        );

        on_event(&SeedEvent::Summary {
            bucket: self.plan.bucket.clone(),
            requested: self.plan.file_count,
        });
        Ok(report)
    }

    async fn seed_one(&self, index: u64, report: &mut SeedReport, on_event: &mut dyn FnMut(&SeedEvent)) {
        let name = file_name(&self.plan.file_prefix, index);
        let path = self.plan.work_dir.join(&name);
        debug!(file = %name, "generating");

        let content = random_content(self.plan.entropy_bytes);
        match tokio::fs::write(&path, content).await {
            Ok(()) => self.upload(&name, &path, report, on_event).await,
            Err(e) => {
                warn!(file = %name, error = %e, "failed to write local file");
                report.write_failures += 1;
                on_event(&SeedEvent::WriteFailed {
                    file_name: name.clone(),
                    message: e.to_string(),
                });
            }
        }

        if let Some(event) = remove_local(&name, &path).await {
            if !matches!(event, SeedEvent::Deleted { .. }) {
                report.cleanup_failures += 1;
            }
            on_event(&event);
        }
    }

    async fn upload(&self, name: &str, path: &Path, report: &mut SeedReport, on_event: &mut dyn FnMut(&SeedEvent)) {
        // The read closes the file before the clean-up step runs
        let result = match tokio::fs::read(path).await {
            Ok(body) => {
                let content_type = mime_guess::from_path(path).first_or_octet_stream().to_string();
                self.store
                    .put_object(&self.plan.bucket, name, body, &content_type)
                    .await
            }
            Err(e) => Err(Error::Io(e)),
        };

        match result {
            Ok(()) => {
                debug!(file = %name, bucket = %self.plan.bucket, "uploaded");
                report.uploaded += 1;
                on_event(&SeedEvent::Uploaded {
                    file_name: name.to_string(),
                    bucket: self.plan.bucket.clone(),
                });
            }
            Err(e) => {
                warn!(file = %name, error = %e, "upload failed");
                report.upload_failures += 1;
                let message = match e {
                    Error::Io(io) => io.to_string(),
                    other => other.to_string(),
                };
                on_event(&SeedEvent::UploadFailed {
                    file_name: name.to_string(),
                    message,
                });
            }
        }
    }
}

/// Delete the local copy if it is still there; `None` when there was nothing to delete
async fn remove_local(name: &str, path: &Path) -> Option<SeedEvent> {
    let event = match tokio::fs::remove_file(path).await {
        Ok(()) => SeedEvent::Deleted {
            file_name: name.to_string(),
        },
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(file = %name, "no local file to delete");
            return None;
        }
        Err(e) => {
            warn!(file = %name, error = %e, "failed to delete local file");
            cleanup_failure(name, &e)
        }
    };
    Some(event)
}

fn cleanup_failure(name: &str, err: &std::io::Error) -> SeedEvent {
    if err.kind() == ErrorKind::PermissionDenied {
        SeedEvent::DeletePermissionDenied {
            file_name: name.to_string(),
            message: err.to_string(),
        }
    } else {
        SeedEvent::DeleteFailed {
            file_name: name.to_string(),
            message: err.to_string(),
        }
    }
}
