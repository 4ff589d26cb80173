//! Test utilities for the backend crate.
//!
//! This module provides shared helpers for both unit tests (in `src/`) and
//! integration tests (in `tests/`). It is only compiled for tests or with the
//! `test-support` feature.

use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;

pub mod cap_fs {
    //! Capability-safe filesystem helpers for tests.
    //!
    //! The backend avoids direct `std::fs` calls. These helpers provide
    //! read/write/existence operations built on `cap_std::fs::Dir` so test
    //! suites can prepare and inspect snapshot files the same way the
    //! persistence adapter touches them.

    use std::ffi::OsString;
    use std::io;
    use std::path::Path;

    use cap_std::{ambient_authority, fs::Dir};

    /// Read a UTF-8 text file through `cap_std`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use grievance_backend::test_support::cap_fs::{read_file_to_string, write_file};
    ///
    /// let path = std::env::temp_dir().join("cap-fs-read-example.json");
    /// write_file(&path, b"{}\n")?;
    ///
    /// let content = read_file_to_string(&path)?;
    /// assert_eq!(content, "{}\n");
    /// # Ok::<(), std::io::Error>(())
    /// ```
    pub fn read_file_to_string(path: &Path) -> io::Result<String> {
        let (parent, file_name) = parent_and_file_name(path)?;
        let directory = Dir::open_ambient_dir(parent, ambient_authority())?;
        directory.read_to_string(Path::new(&file_name))
    }

    /// Write bytes to a file through `cap_std`.
    pub fn write_file(path: &Path, contents: &[u8]) -> io::Result<()> {
        let (parent, file_name) = parent_and_file_name(path)?;
        let directory = Dir::open_ambient_dir(parent, ambient_authority())?;
        directory.write(Path::new(&file_name), contents)
    }

    /// Return true when `path` exists, false when it does not.
    pub fn path_exists(path: &Path) -> bool {
        let Ok((parent, file_name)) = parent_and_file_name(path) else {
            return false;
        };
        let Ok(directory) = Dir::open_ambient_dir(parent, ambient_authority()) else {
            return false;
        };
        directory.exists(Path::new(&file_name))
    }

    /// Names of the entries directly inside `path`, sorted.
    pub fn list_entries(path: &Path) -> io::Result<Vec<String>> {
        let directory = Dir::open_ambient_dir(path, ambient_authority())?;
        let mut names = Vec::new();
        for entry in directory.entries()? {
            names.push(entry?.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }

    fn parent_and_file_name(path: &Path) -> io::Result<(&Path, OsString)> {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        let file_name = path.file_name().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "path must include a file or directory name",
            )
        })?;
        Ok((parent, file_name.to_os_string()))
    }
}

pub mod snapshot_dir {
    //! Temporary directories holding a grievance snapshot file.

    use std::io;
    use std::path::{Path, PathBuf};

    use tempfile::TempDir;

    use super::cap_fs::{read_file_to_string, write_file};

    /// File name used for the snapshot inside a [`SnapshotDir`].
    pub const SNAPSHOT_FILE_NAME: &str = "grievances.json";

    /// A temporary directory removed on drop, with a snapshot path inside.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use grievance_backend::test_support::snapshot_dir::SnapshotDir;
    ///
    /// let dir = SnapshotDir::new()?;
    /// assert!(dir.read_snapshot().is_err());
    /// dir.write_snapshot(r#"{"grievances": [], "counter": 1}"#)?;
    /// assert!(dir.read_snapshot()?.contains("counter"));
    /// # Ok::<(), std::io::Error>(())
    /// ```
    #[derive(Debug)]
    pub struct SnapshotDir {
        dir: TempDir,
    }

    impl SnapshotDir {
        /// Create an empty temporary directory.
        pub fn new() -> io::Result<Self> {
            Ok(Self {
                dir: tempfile::tempdir()?,
            })
        }

        /// Directory path.
        pub fn path(&self) -> &Path {
            self.dir.path()
        }

        /// Snapshot file path inside the directory; the file may not exist.
        pub fn snapshot_path(&self) -> PathBuf {
            self.dir.path().join(SNAPSHOT_FILE_NAME)
        }

        /// Replace the snapshot file with `contents`.
        pub fn write_snapshot(&self, contents: &str) -> io::Result<()> {
            write_file(&self.snapshot_path(), contents.as_bytes())
        }

        /// Read the snapshot file.
        pub fn read_snapshot(&self) -> io::Result<String> {
            read_file_to_string(&self.snapshot_path())
        }
    }
}

/// Clock returning a start instant that advances by a fixed step on every
/// read.
///
/// Each call to [`Clock::utc`] returns the current instant and then moves it
/// forward, so consecutive store mutations get distinct, ordered
/// timestamps.
///
/// # Examples
///
/// ```rust
/// use chrono::{TimeDelta, TimeZone, Utc};
/// use grievance_backend::test_support::SteppingClock;
/// use mockable::Clock;
///
/// let start = Utc.with_ymd_and_hms(2026, 10, 17, 9, 0, 0).single().expect("valid");
/// let clock = SteppingClock::new(start, TimeDelta::seconds(1));
/// assert_eq!(clock.utc(), start);
/// assert_eq!(clock.utc(), start + TimeDelta::seconds(1));
/// ```
#[derive(Debug)]
pub struct SteppingClock {
    next: Mutex<DateTime<Utc>>,
    step: TimeDelta,
}

impl SteppingClock {
    /// Start at `start`, advancing by `step` per read.
    pub fn new(start: DateTime<Utc>, step: TimeDelta) -> Self {
        Self {
            next: Mutex::new(start),
            step,
        }
    }

    /// Always report `instant`.
    pub fn fixed(instant: DateTime<Utc>) -> Self {
        Self::new(instant, TimeDelta::zero())
    }
}

impl Clock for SteppingClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        let mut next = self.next.lock().unwrap_or_else(PoisonError::into_inner);
        let current = *next;
        *next = current + self.step;
        current
    }
}
