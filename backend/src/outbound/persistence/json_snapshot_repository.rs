//! JSON file adapter for the grievance snapshot port.
//!
//! The whole collection lives in one pretty-printed document. Saves write a
//! uniquely named staging file beside the target and rename it into place,
//! so a crash mid-write leaves the previous snapshot intact.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::GrievanceSnapshot;
use crate::domain::ports::{GrievanceSnapshotRepository, SnapshotRepositoryError};

/// Snapshot repository backed by a single JSON file.
///
/// # Examples
/// ```
/// use grievance_backend::outbound::persistence::JsonSnapshotRepository;
///
/// let repo = JsonSnapshotRepository::new("grievances.json");
/// assert_eq!(repo.path().to_str(), Some("grievances.json"));
/// ```
#[derive(Debug, Clone)]
pub struct JsonSnapshotRepository {
    path: PathBuf,
}

impl JsonSnapshotRepository {
    /// Store snapshots at `path`. Nothing is touched until the first load or
    /// save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl GrievanceSnapshotRepository for JsonSnapshotRepository {
    async fn load(&self) -> Result<Option<GrievanceSnapshot>, SnapshotRepositoryError> {
        let path = self.path.clone();
        let contents = tokio::task::spawn_blocking(move || read_snapshot_file(&path))
            .await
            .map_err(|error| SnapshotRepositoryError::io(error.to_string()))?
            .map_err(|error| io_error(&self.path, &error))?;

        let Some(contents) = contents else {
            return Ok(None);
        };
        serde_json::from_str(&contents)
            .map(Some)
            .map_err(|error| SnapshotRepositoryError::decode(error.to_string()))
    }

    async fn save(&self, snapshot: &GrievanceSnapshot) -> Result<(), SnapshotRepositoryError> {
        let mut bytes = serde_json::to_vec_pretty(snapshot)
            .map_err(|error| SnapshotRepositoryError::encode(error.to_string()))?;
        bytes.push(b'\n');

        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_snapshot_file(&path, &bytes))
            .await
            .map_err(|error| SnapshotRepositoryError::io(error.to_string()))?
            .map_err(|error| io_error(&self.path, &error))?;

        debug!(
            path = %self.path.display(),
            grievances = snapshot.grievances.len(),
            "snapshot written"
        );
        Ok(())
    }
}

fn io_error(path: &Path, error: &io::Error) -> SnapshotRepositoryError {
    SnapshotRepositoryError::io(format!("{}: {error}", path.display()))
}

fn split_path(path: &Path) -> io::Result<(&Path, &Path)> {
    let file_name = path.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "snapshot path must name a file",
        )
    })?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    Ok((parent, Path::new(file_name)))
}

fn read_snapshot_file(path: &Path) -> io::Result<Option<String>> {
    let (parent, file_name) = split_path(path)?;
    let directory = match Dir::open_ambient_dir(parent, ambient_authority()) {
        Ok(directory) => directory,
        Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(error) => return Err(error),
    };
    match directory.read_to_string(file_name) {
        Ok(contents) => Ok(Some(contents)),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(error) => Err(error),
    }
}

fn write_snapshot_file(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let (parent, file_name) = split_path(path)?;
    Dir::create_ambient_dir_all(parent, ambient_authority())?;
    let directory = Dir::open_ambient_dir(parent, ambient_authority())?;

    let staging = PathBuf::from(format!(
        ".{}.tmp-{}",
        file_name.display(),
        Uuid::new_v4().simple()
    ));
    let result = write_staging_file(&directory, &staging, bytes)
        .and_then(|()| directory.rename(&staging, &directory, file_name));
    if result.is_err() {
        // The write or rename error is the one worth reporting.
        if let Err(error) = remove_if_present(&directory, &staging) {
            warn!(
                %error,
                path = %parent.join(&staging).display(),
                "failed to remove snapshot staging file"
            );
        }
    }
    result
}

fn write_staging_file(directory: &Dir, staging: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = directory.create(staging)?;
    file.write_all(bytes)?;
    file.sync_all()
}

fn remove_if_present(directory: &Dir, path: &Path) -> io::Result<()> {
    match directory.remove_file(path) {
        Ok(()) => Ok(()),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(error) => Err(error),
    }
}
