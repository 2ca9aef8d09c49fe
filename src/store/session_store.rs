use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::store::records::{CorrectionRecord, SessionMeta, ToolEvent};

const META_FILE: &str = "session.json";
const PENDING_SLOT_FILE: &str = "pending_event";
const PENDING_MAP_FILE: &str = "pending.json";

/// Append-only streams kept per session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Tools,
    Corrections,
}

impl Stream {
    pub fn file_name(self) -> &'static str {
        match self {
            Stream::Tools => "tools.jsonl",
            Stream::Corrections => "corrections.jsonl",
        }
    }
}

/// An in-flight pre event waiting for its post, keyed by the host's call id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct PendingEntry {
    call_id: String,
    event_id: String,
}

/// Persistence for one session directory.
///
/// Streams are newline-delimited JSON opened in append mode for every
/// write, so each record lands as a single bounded `write` call and nothing
/// already on disk is rewritten.
#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        SessionStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn stream_path(&self, stream: Stream) -> PathBuf {
        self.dir.join(stream.file_name())
    }

    /// Create the directory and both streams without truncating existing content
    pub fn init_streams(&self) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        for stream in [Stream::Tools, Stream::Corrections] {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(self.stream_path(stream))?;
        }
        Ok(())
    }

    /// Append one record as a single JSON line
    pub fn append<T: Serialize>(&self, stream: Stream, record: &T) -> Result<()> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.stream_path(stream))?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }

    /// Read every parseable record of a stream. Unparseable lines are skipped.
    pub fn read<T: DeserializeOwned>(&self, stream: Stream) -> Result<Vec<T>> {
        let path = self.stream_path(stream);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path)?;
        let records = content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| match serde_json::from_str(line) {
                Ok(record) => Some(record),
                Err(e) => {
                    debug!("skipping bad line in {}: {}", path.display(), e);
                    None
                }
            })
            .collect();
        Ok(records)
    }

    pub fn read_tool_events(&self) -> Result<Vec<ToolEvent>> {
        self.read(Stream::Tools)
    }

    pub fn read_corrections(&self) -> Result<Vec<CorrectionRecord>> {
        self.read(Stream::Corrections)
    }

    /// Write metadata unless it already exists; returns whatever is on disk afterwards
    pub fn write_meta_once(&self, meta: &SessionMeta) -> Result<SessionMeta> {
        let path = self.dir.join(META_FILE);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut file) => {
                let json = serde_json::to_string_pretty(meta)?;
                file.write_all(json.as_bytes())?;
                Ok(meta.clone())
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => match self.read_meta() {
                Ok(existing) => Ok(existing),
                Err(e) => {
                    debug!("unreadable {}, keeping it: {}", path.display(), e);
                    Ok(meta.clone())
                }
            },
            Err(e) => Err(e.into()),
        }
    }

    pub fn read_meta(&self) -> Result<SessionMeta> {
        let content = fs::read_to_string(self.dir.join(META_FILE))?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Record a pending pre event.
    ///
    /// With a call id the event goes into a bounded map (oldest evicted past
    /// `max_pending`); without one it overwrites the single slot.
    pub fn put_pending(&self, call_id: Option<&str>, event_id: &str, max_pending: usize) -> Result<()> {
        match call_id {
            None => {
                fs::write(self.dir.join(PENDING_SLOT_FILE), event_id)?;
            }
            Some(call_id) => {
                let mut entries = self.read_pending_map();
                entries.retain(|e| e.call_id != call_id);
                entries.push(PendingEntry {
                    call_id: call_id.to_string(),
                    event_id: event_id.to_string(),
                });
                if entries.len() > max_pending.max(1) {
                    let excess = entries.len() - max_pending.max(1);
                    entries.drain(..excess);
                }
                self.write_pending_map(&entries)?;
            }
        }
        Ok(())
    }

    /// Read and clear the pending pre event matching `call_id` (or the single slot)
    pub fn take_pending(&self, call_id: Option<&str>) -> Result<Option<String>> {
        match call_id {
            None => {
                let path = self.dir.join(PENDING_SLOT_FILE);
                let value = crate::store::layout::read_pointer(&path);
                let cleanup = if path.exists() {
                    fs::remove_file(&path).map_err(Into::into)
                } else {
                    Ok(())
                };
                Ok(keep_taken(value, cleanup, &path))
            }
            Some(call_id) => {
                let mut entries = self.read_pending_map();
                let Some(pos) = entries.iter().position(|e| e.call_id == call_id) else {
                    return Ok(None);
                };
                let entry = entries.remove(pos);
                let cleanup = self.write_pending_map(&entries);
                Ok(keep_taken(
                    Some(entry.event_id),
                    cleanup,
                    &self.dir.join(PENDING_MAP_FILE),
                ))
            }
        }
    }

    fn read_pending_map(&self) -> Vec<PendingEntry> {
        fs::read_to_string(self.dir.join(PENDING_MAP_FILE))
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default()
    }

    /// Replace the map via a temp file and rename so readers never see a partial write
    fn write_pending_map(&self, entries: &[PendingEntry]) -> Result<()> {
        let json = serde_json::to_string(entries)?;
        let tmp = self.dir.join(format!(
            "{}.{}.{:08x}.tmp",
            PENDING_MAP_FILE,
            std::process::id(),
            rand::random::<u32>()
        ));

        fs::write(&tmp, json)?;
        if let Err(e) = fs::rename(&tmp, self.dir.join(PENDING_MAP_FILE)) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }
}

/// A value already read wins over a failure to clear it afterwards
fn keep_taken(value: Option<String>, cleanup: Result<()>, path: &Path) -> Option<String> {
    if let Err(e) = cleanup {
        debug!("could not clear {}: {}", path.display(), e);
    }
    value
}
