use crate::config::Config;
use crate::error::{Failure, WalkError};
use crate::file::{ExtractorRegistry, SupportedFormat};
use crate::models::{ExtractionBatch, ExtractionRecord, ExtractionResult};
use crate::storage::ObjectStore;
use crate::utils::{display_name, get_extension, object_base_name};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Runs the registry over a flat collection of inputs: the immediate entries
/// of a local directory, or every object of an [`ObjectStore`].
pub struct BatchWalker<'a> {
    registry: &'a ExtractorRegistry,
    ignore: HashSet<String>,
}

impl<'a> BatchWalker<'a> {
    pub fn new<I, S>(registry: &'a ExtractorRegistry, ignore: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            registry,
            ignore: ignore.into_iter().map(Into::into).collect(),
        }
    }

    /// Walker using the `[extract] ignore` list
    pub fn from_config(registry: &'a ExtractorRegistry, config: &Config) -> Self {
        Self::new(registry, config.extract.ignore.iter().cloned())
    }

    pub fn is_ignored(&self, name: &str) -> bool {
        self.ignore.contains(name)
    }

    /// Regular files directly under `dir`, in listing order, minus ignored names.
    ///
    /// A missing `dir` has no entries; a path that is not a directory, or one
    /// that cannot be listed, is an error.
    pub fn entries(&self, dir: &Path) -> Result<Vec<PathBuf>, WalkError> {
        if !dir.exists() {
            warn!("Directory {} does not exist, nothing to extract", dir.display());
            return Ok(Vec::new());
        }
        if !dir.is_dir() {
            return Err(WalkError::NotADirectory {
                path: dir.to_path_buf(),
            });
        }

        let mut entries = Vec::new();
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| WalkError::Io {
                path: dir.to_path_buf(),
                source: e.into(),
            })?;
            let path = entry.path();

            if !path.is_file() {
                debug!("Skipping non-file entry {}", path.display());
                continue;
            }
            if self.is_ignored(&display_name(path)) {
                debug!("Ignoring {}", path.display());
                continue;
            }
            entries.push(path.to_path_buf());
        }

        Ok(entries)
    }

    /// Extract one local file into a record keyed by its file name
    pub fn extract_entry(&self, path: &Path) -> ExtractionRecord {
        ExtractionRecord::new(display_name(path), self.registry.extract_path(path))
    }

    /// One record per eligible entry of `dir`, in listing order
    pub fn extract_directory(&self, dir: &Path) -> Result<ExtractionBatch, WalkError> {
        self.extract_directory_with(dir, |_| {})
    }

    /// Like [`extract_directory`](Self::extract_directory), calling
    /// `on_record` as each file finishes
    pub fn extract_directory_with<F>(
        &self,
        dir: &Path,
        on_record: F,
    ) -> Result<ExtractionBatch, WalkError>
    where
        F: Fn(&ExtractionRecord) + Sync,
    {
        let entries = self.entries(dir)?;
        info!("Extracting {} files from {}", entries.len(), dir.display());
        Ok(self.extract_entries_with(&entries, on_record))
    }

    /// One record per path of an already-listed set of entries (see
    /// [`entries`](Self::entries)), in the given order
    pub fn extract_entries(&self, entries: &[PathBuf]) -> ExtractionBatch {
        self.extract_entries_with(entries, |_| {})
    }

    /// Like [`extract_entries`](Self::extract_entries), calling `on_record`
    /// as each file finishes
    pub fn extract_entries_with<F>(&self, entries: &[PathBuf], on_record: F) -> ExtractionBatch
    where
        F: Fn(&ExtractionRecord) + Sync,
    {
        let extract = |path: &PathBuf| {
            let record = self.extract_entry(path);
            on_record(&record);
            record
        };

        #[cfg(feature = "parallel")]
        let batch: ExtractionBatch = entries
            .par_iter()
            .map(extract)
            .collect::<Vec<_>>()
            .into_iter()
            .collect();

        #[cfg(not(feature = "parallel"))]
        let batch: ExtractionBatch = entries.iter().map(extract).collect();

        batch
    }

    /// One record per object in `store`, keyed by the object's base name
    pub fn extract_objects(&self, store: &dyn ObjectStore) -> Result<ExtractionBatch, WalkError> {
        self.extract_objects_with(store, |_| {})
    }

    /// Like [`extract_objects`](Self::extract_objects), calling `on_record`
    /// as each object finishes
    pub fn extract_objects_with<F>(
        &self,
        store: &dyn ObjectStore,
        on_record: F,
    ) -> Result<ExtractionBatch, WalkError>
    where
        F: Fn(&ExtractionRecord),
    {
        let names = store.list()?;
        info!("Listed {} objects", names.len());

        let mut batch = ExtractionBatch::new();
        for name in &names {
            // directory placeholders
            if name.ends_with('/') {
                continue;
            }
            let base = object_base_name(name);
            if base.is_empty() || self.is_ignored(base) {
                debug!("Ignoring object {}", name);
                continue;
            }

            let record = ExtractionRecord::new(base, self.extract_object(store, name, base));
            on_record(&record);
            batch.push(record);
        }

        Ok(batch)
    }

    fn extract_object(&self, store: &dyn ObjectStore, name: &str, base: &str) -> ExtractionResult {
        let ext = get_extension(Path::new(base));
        if SupportedFormat::from_extension(&ext).is_none() {
            return Err(Failure::unsupported(&ext));
        }

        let bytes = store.fetch(name).map_err(|e| {
            warn!("Failed to download {}: {}", name, e);
            Failure::Fetch(e.to_string())
        })?;
        self.registry.extract_bytes(name, &bytes)
    }
}
