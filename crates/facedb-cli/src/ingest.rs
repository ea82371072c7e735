//! Directory ingestion: encode every face photo in a folder under one name.

use facedb_core::{EncoderError, FaceEncoder, Frame, FrameError};
use facedb_store::{FaceStore, StoreError};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name suffixes accepted for ingestion, compared case-insensitively.
const IMAGE_SUFFIXES: [&str; 3] = [".jpg", ".jpeg", ".png"];

/// Errors that abort the whole run.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("identity label must not be empty")]
    EmptyLabel,
    #[error("cannot list directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors confined to a single file; the run continues past them.
#[derive(Error, Debug)]
pub enum FileError {
    #[error("cannot read directory entry: {0}")]
    Entry(#[source] std::io::Error),
    #[error(transparent)]
    Load(#[from] FrameError),
    #[error("encoding failed: {0}")]
    Encode(#[from] EncoderError),
    #[error("encoder returned an empty vector")]
    EmptyEncoding,
}

/// Counts for one ingestion run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IngestSummary {
    pub records_written: usize,
    pub files_skipped_no_face: usize,
    pub files_failed: usize,
}

/// What happened to one qualifying file.
#[derive(Debug)]
enum FileOutcome {
    Stored { id: i64 },
    NoFace,
    Failed(FileError),
}

/// Open the store at `db_path` and ingest `dir` under `label`.
///
/// The store is opened before any file is looked at, so an unusable store
/// location aborts with nothing processed.
pub fn run<E: FaceEncoder + ?Sized>(
    db_path: &Path,
    encoder: &mut E,
    dir: &Path,
    label: &str,
) -> Result<IngestSummary, IngestError> {
    let store = FaceStore::open(db_path)?;
    let summary = ingest(&store, encoder, dir, label)?;
    store.close()?;
    Ok(summary)
}

/// Encode each image directly inside `dir` and store its first face under `label`.
///
/// Subdirectories are not visited. Each stored face is committed on its own,
/// so a fatal error part way through keeps earlier rows.
pub fn ingest<E: FaceEncoder + ?Sized>(
    store: &FaceStore,
    encoder: &mut E,
    dir: &Path,
    label: &str,
) -> Result<IngestSummary, IngestError> {
    if label.trim().is_empty() {
        return Err(IngestError::EmptyLabel);
    }
    store.ensure_schema()?;

    let entries = std::fs::read_dir(dir).map_err(|source| IngestError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;

    tracing::info!(dir = %dir.display(), label, "ingesting");
    let mut summary = IngestSummary::default();

    for entry in entries {
        let path = match entry {
            Ok(entry) => entry.path(),
            Err(e) => {
                let e = FileError::Entry(e);
                tracing::warn!(dir = %dir.display(), error = %e, "skipping unreadable entry");
                summary.files_failed += 1;
                continue;
            }
        };
        if !is_candidate(&path) {
            tracing::trace!(path = %path.display(), "ignored");
            continue;
        }

        match process_file(store, encoder, &path, label)? {
            FileOutcome::Stored { id } => {
                tracing::info!(path = %path.display(), id, label, "face stored");
                summary.records_written += 1;
            }
            FileOutcome::NoFace => {
                tracing::info!(path = %path.display(), "no face found");
                summary.files_skipped_no_face += 1;
            }
            FileOutcome::Failed(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to process image");
                summary.files_failed += 1;
            }
        }
    }

    tracing::info!(
        records = summary.records_written,
        no_face = summary.files_skipped_no_face,
        failed = summary.files_failed,
        "ingest finished"
    );
    Ok(summary)
}

/// Regular file whose name ends in one of [`IMAGE_SUFFIXES`].
fn is_candidate(path: &Path) -> bool {
    let Some(name) = path.file_name() else {
        return false;
    };
    let name = name.to_string_lossy().to_ascii_lowercase();
    IMAGE_SUFFIXES.iter().any(|suffix| name.ends_with(suffix)) && path.is_file()
}

/// Classify one file. Only store failures escape as `Err`.
fn process_file<E: FaceEncoder + ?Sized>(
    store: &FaceStore,
    encoder: &mut E,
    path: &Path,
    label: &str,
) -> Result<FileOutcome, StoreError> {
    tracing::debug!(path = %path.display(), "processing");
    let encoding = match first_encoding(encoder, path) {
        Ok(Some(bytes)) => bytes,
        Ok(None) => return Ok(FileOutcome::NoFace),
        Err(e) => return Ok(FileOutcome::Failed(e)),
    };
    let id = store.insert(label, &encoding)?;
    Ok(FileOutcome::Stored { id })
}

/// Load, encode, and serialize the first face of one image.
fn first_encoding<E: FaceEncoder + ?Sized>(
    encoder: &mut E,
    path: &Path,
) -> Result<Option<Vec<u8>>, FileError> {
    let frame = Frame::load(path)?;
    let embeddings = encoder.encode(&frame)?;
    if embeddings.len() > 1 {
        tracing::debug!(
            path = %path.display(),
            discarded = embeddings.len() - 1,
            "multiple faces, keeping the first"
        );
    }
    match embeddings.into_iter().next() {
        Some(e) if e.is_empty() => Err(FileError::EmptyEncoding),
        Some(e) => Ok(Some(e.to_bytes())),
        None => Ok(None),
    }
}
