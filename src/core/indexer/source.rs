//! Where document bytes come from.
//!
//! A [`DocumentSource`] is either a plain file on disk or one entry of
//! a zip archive. Both variants expose the same contract: an identity,
//! the base field mapping, and [`DocumentSource::open_stream`], which
//! returns a fresh reader positioned at the start of the content on
//! every call.
//!
//! Archive entries borrow a shared [`ArchiveHandle`]. The handle is
//! owned by whoever opened the archive and is closed when it drops;
//! streams handed out for an entry own their bytes, so they stay
//! readable after the handle is gone. Entry reads stop at the handle's
//! size cap; the size recorded in the entry header is not trusted.

use chrono::{DateTime, NaiveDate, Utc};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, Cursor, Read};
use std::path::{Path, PathBuf, MAIN_SEPARATOR};
use std::sync::Mutex;
use zip::ZipArchive;

use crate::core::error::{MathdexError, Result};
use crate::core::indexer::record::{fields, Record};

/// Readable document content
pub type DocStream = Box<dyn BufRead + Send>;

/// Marker between the archive path and entry name in a source identity
pub const ENTRY_MARKER: char = '#';

/// A plain file
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    root_relative_path: String,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>, root_relative_path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            root_relative_path: root_relative_path.into(),
        }
    }

    fn open_stream(&self) -> Result<DocStream> {
        let file = File::open(&self.path)?;
        Ok(Box::new(BufReader::new(file)))
    }

    fn create_mapping(&self) -> Result<Record> {
        let metadata = fs::metadata(&self.path)?;
        let modified = metadata
            .modified()
            .map(DateTime::<Utc>::from)
            .unwrap_or(DateTime::UNIX_EPOCH);
        let title = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut record = Record::new();
        record.insert(fields::PATH, self.root_relative_path.as_str());
        record.insert(fields::ID, self.root_relative_path.as_str());
        record.insert(fields::MODIFIED, modified);
        record.insert(fields::FILESIZE, metadata.len());
        record.insert(fields::TITLE, title);
        Ok(record)
    }
}

/// Metadata of one archive entry, as recorded by the zip format
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    pub index: usize,
    pub name: String,
    pub size: u64,
    pub modified: DateTime<Utc>,
}

/// An open zip archive shared read-only by its entry sources
pub struct ArchiveHandle {
    path: PathBuf,
    archive: Mutex<ZipArchive<BufReader<File>>>,
    max_entry_bytes: u64,
}

impl std::fmt::Debug for ArchiveHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveHandle")
            .field("path", &self.path)
            .field("max_entry_bytes", &self.max_entry_bytes)
            .finish()
    }
}

impl ArchiveHandle {
    /// Open a zip archive with no entry size cap
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let archive = ZipArchive::new(BufReader::new(file))?;
        Ok(Self {
            path: path.to_path_buf(),
            archive: Mutex::new(archive),
            max_entry_bytes: u64::MAX,
        })
    }

    /// Fail entry reads that decompress to more than `bytes`
    pub fn with_max_entry_bytes(mut self, bytes: u64) -> Self {
        self.max_entry_bytes = bytes;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// List the non-directory entries
    ///
    /// Entries whose header cannot be read are skipped with a warning.
    pub fn entries(&self) -> Result<Vec<ArchiveEntry>> {
        let mut archive = self.lock()?;
        let mut entries = Vec::with_capacity(archive.len());

        for index in 0..archive.len() {
            let entry = match archive.by_index_raw(index) {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry #{} in {:?}: {}", index, self.path, e);
                    continue;
                }
            };
            if entry.is_dir() {
                continue;
            }
            entries.push(ArchiveEntry {
                index,
                name: entry.name().to_string(),
                size: entry.size(),
                modified: entry
                    .last_modified()
                    .and_then(zip_time_to_utc)
                    .unwrap_or(DateTime::UNIX_EPOCH),
            });
        }

        Ok(entries)
    }

    /// Decompress one entry into memory, up to the size cap
    fn read_entry(&self, index: usize) -> Result<Vec<u8>> {
        let mut archive = self.lock()?;
        let entry = archive.by_index(index)?;
        let name = entry.name().to_string();

        let mut bytes = Vec::new();
        entry
            .take(self.max_entry_bytes.saturating_add(1))
            .read_to_end(&mut bytes)?;
        if bytes.len() as u64 > self.max_entry_bytes {
            return Err(MathdexError::ExtractionFailed(format!(
                "Entry {} in {:?} exceeds {} bytes",
                name, self.path, self.max_entry_bytes
            )));
        }
        Ok(bytes)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, ZipArchive<BufReader<File>>>> {
        self.archive.lock().map_err(|_| {
            MathdexError::ExtractionFailed(format!("Archive handle poisoned: {:?}", self.path))
        })
    }
}

fn zip_time_to_utc(t: zip::DateTime) -> Option<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(t.year() as i32, t.month() as u32, t.day() as u32)?
        .and_hms_opt(t.hour() as u32, t.minute() as u32, t.second() as u32)
        .map(|dt| dt.and_utc())
}

/// One entry of a shared archive
#[derive(Debug, Clone)]
pub struct ArchiveEntrySource<'a> {
    archive: &'a ArchiveHandle,
    root_relative_path: String,
    entry: ArchiveEntry,
}

impl<'a> ArchiveEntrySource<'a> {
    pub fn new(
        archive: &'a ArchiveHandle,
        root_relative_path: impl Into<String>,
        entry: ArchiveEntry,
    ) -> Self {
        Self {
            archive,
            root_relative_path: root_relative_path.into(),
            entry,
        }
    }

    pub fn entry(&self) -> &ArchiveEntry {
        &self.entry
    }

    fn open_stream(&self) -> Result<DocStream> {
        let bytes = self.archive.read_entry(self.entry.index)?;
        Ok(Box::new(Cursor::new(bytes)))
    }

    fn create_mapping(&self) -> Record {
        let mut record = Record::new();
        record.insert(fields::PATH, self.root_relative_path.as_str());
        record.insert(
            fields::ID,
            format!(
                "{}{}{}",
                self.root_relative_path, MAIN_SEPARATOR, self.entry.name
            ),
        );
        record.insert(fields::MODIFIED, self.entry.modified);
        record.insert(fields::FILESIZE, self.entry.size);
        record.insert(fields::TITLE, self.entry.name.as_str());
        record.insert(fields::ARCHIVE_PATH, self.entry.name.as_str());
        record
    }
}

/// Document bytes with an identity and restartable reads
#[derive(Debug, Clone)]
pub enum DocumentSource<'a> {
    File(FileSource),
    ArchiveEntry(ArchiveEntrySource<'a>),
}

impl DocumentSource<'_> {
    /// Fresh reader over the whole content
    pub fn open_stream(&self) -> Result<DocStream> {
        match self {
            DocumentSource::File(f) => f.open_stream(),
            DocumentSource::ArchiveEntry(e) => e.open_stream(),
        }
    }

    /// Identity used in logs
    pub fn identity(&self) -> String {
        match self {
            DocumentSource::File(f) => f.root_relative_path.clone(),
            DocumentSource::ArchiveEntry(e) => {
                format!("{}{}{}", e.root_relative_path, ENTRY_MARKER, e.entry.name)
            }
        }
    }

    /// Base fields: path, id, modified, filesize, title (+ archivepath)
    pub fn create_mapping(&self) -> Result<Record> {
        match self {
            DocumentSource::File(f) => f.create_mapping(),
            DocumentSource::ArchiveEntry(e) => Ok(e.create_mapping()),
        }
    }
}
