//! Point persistence and the per-channel store
//!
//! [`load`] and [`save`] work on a single point file. [`GpsStore`] maps a
//! (server, channel) pair to a file under its base directory and runs each
//! operation as one load, compute, save cycle.

use std::fs;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::codec;
use crate::error::{ParseError, StoreError};
use crate::point::Point;
use crate::query::{self, NearbyHit, RankedHit, SearchHit};

/// Suffix of every channel's point file
const POINT_FILE_SUFFIX: &str = "_GPS_Data.txt";

/// Name of the channel binding file under the base directory
const BINDINGS_FILE: &str = "bindings.yml";

/// Load every point from `path`, in file order
///
/// A missing file is an empty collection. Blank lines are skipped. The first
/// malformed line aborts the load.
pub fn load(path: &Path) -> Result<Vec<Point>, StoreError> {
    let file = match fs::File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "No point file yet");
            return Ok(Vec::new());
        }
        Err(e) => return Err(StoreError::io(path, e)),
    };

    let mut points = Vec::new();
    for (i, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| StoreError::io(path, e))?;
        if line.trim().is_empty() {
            continue;
        }
        let point = codec::decode(&line).map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            line: i + 1,
            source,
        })?;
        points.push(point);
    }

    debug!(path = %path.display(), count = points.len(), "Loaded points");
    Ok(points)
}

/// Replace the contents of `path` with `points`, one record per line
pub fn save(path: &Path, points: &[Point]) -> Result<(), StoreError> {
    let mut body = String::new();
    for point in points {
        body.push_str(&codec::encode(point));
        body.push('\n');
    }
    write_atomic(path, body.as_bytes())?;
    info!(path = %path.display(), count = points.len(), "Saved points");
    Ok(())
}

/// Write through a temp file in the target's directory, then rename over the target
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), StoreError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| StoreError::io(dir, e))?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| StoreError::io(dir, e))?;
    tmp.write_all(contents).map_err(|e| StoreError::io(tmp.path(), e))?;
    tmp.as_file().sync_all().map_err(|e| StoreError::io(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| StoreError::io(path, e.error))?;
    Ok(())
}

/// Identifies one channel's collection
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChannelKey {
    server: String,
    channel: String,
}

impl ChannelKey {
    /// Create a key; both parts become path components, so separators and dot names are refused
    pub fn new(server: impl Into<String>, channel: impl Into<String>) -> Result<Self, StoreError> {
        let server = server.into();
        let channel = channel.into();
        for part in [&server, &channel] {
            if !is_safe_component(part) {
                return Err(StoreError::InvalidKey(part.clone()));
            }
        }
        // server dirs share the base directory with the bindings file
        if server == BINDINGS_FILE {
            return Err(StoreError::InvalidKey(server));
        }
        Ok(Self { server, channel })
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }
}

impl std::fmt::Display for ChannelKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.server, self.channel)
    }
}

fn is_safe_component(part: &str) -> bool {
    !part.is_empty() && part != "." && part != ".." && !part.contains(['/', '\\', '\0'])
}

/// Per-channel GPS point store rooted at a directory
///
/// ```text
/// {base}/
/// ├── bindings.yml
/// └── {server}/
///     └── {channel}_GPS_Data.txt
/// ```
pub struct GpsStore {
    base_path: PathBuf,
}

impl GpsStore {
    /// Open or create a store at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let base_path = path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path).map_err(|e| StoreError::io(&base_path, e))?;
        debug!(?base_path, "Opened GPS store");
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Point file for a channel
    pub fn handle(&self, key: &ChannelKey) -> PathBuf {
        self.base_path
            .join(&key.server)
            .join(format!("{}{}", key.channel, POINT_FILE_SUFFIX))
    }

    /// Location of the channel binding file
    pub fn bindings_path(&self) -> PathBuf {
        self.base_path.join(BINDINGS_FILE)
    }

    /// Append every record in `raw` that decodes, reporting each fragment's outcome
    ///
    /// One bad fragment never blocks the others. The existing collection is
    /// loaded strictly, so a corrupt file fails the whole call.
    pub fn add_points(&self, key: &ChannelKey, raw: &str) -> Result<Vec<Result<Point, ParseError>>, StoreError> {
        let path = self.handle(key);
        let mut points = load(&path)?;

        let outcomes: Vec<Result<Point, ParseError>> = codec::split_records(raw).map(codec::decode).collect();

        let mut added = 0usize;
        for outcome in &outcomes {
            match outcome {
                Ok(point) => {
                    points.push(point.clone());
                    added += 1;
                }
                Err(e) => warn!(%key, fragment = %e.fragment, "Skipping malformed point: {}", e.reason),
            }
        }

        if added > 0 {
            save(&path, &points)?;
        }
        info!(%key, added, rejected = outcomes.len() - added, "Added points");
        Ok(outcomes)
    }

    /// Every point in the channel, in append order
    pub fn list_all(&self, key: &ChannelKey) -> Result<Vec<Point>, StoreError> {
        load(&self.handle(key))
    }

    pub fn search_by_name(&self, key: &ChannelKey, needle: &str) -> Result<Vec<SearchHit>, StoreError> {
        let points = self.list_all(key)?;
        Ok(query::search_by_name(&points, needle))
    }

    pub fn search_closest_by_name(
        &self,
        key: &ChannelKey,
        needle: &str,
        reference: &Point,
    ) -> Result<Vec<RankedHit>, StoreError> {
        let points = self.list_all(key)?;
        Ok(query::search_closest_by_name(&points, needle, reference))
    }

    pub fn search_within_radius(
        &self,
        key: &ChannelKey,
        reference: &Point,
        radius_km: f64,
    ) -> Result<Vec<NearbyHit>, StoreError> {
        let points = self.list_all(key)?;
        Ok(query::search_within_radius(&points, reference, radius_km))
    }

    /// Remove the inclusive 1-based range and persist the result
    ///
    /// Returns `Ok(false)` without touching the file when the range is invalid.
    pub fn remove_range(&self, key: &ChannelKey, start: usize, end: usize) -> Result<bool, StoreError> {
        let path = self.handle(key);
        let points = load(&path)?;

        match query::remove_by_index_range(&points, start, end) {
            Ok(kept) => {
                save(&path, &kept)?;
                info!(%key, start, end, remaining = kept.len(), "Removed points");
                Ok(true)
            }
            Err(e) => {
                debug!(%key, "Rejected removal: {}", e);
                Ok(false)
            }
        }
    }
}
