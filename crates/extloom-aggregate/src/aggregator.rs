//! Merging of extension payloads from many archives.
//!
//! The aggregator owns a single map from [`MergeKey`] to the methods decoded
//! for it. `ingest` appends, `emit` snapshots; both go through one lock, so
//! for a fixed sequence of ingests the merged list of a key is always the
//! concatenation of each archive's contribution in call order.

use std::collections::BTreeMap;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

use extloom_core::codec::ClassDecoder;
use extloom_core::{GeneratedMethod, MergeKey};
use parking_lot::Mutex;
use tracing::{info, warn};

use crate::archive::read_archive;
use crate::config::AggregateConfig;
use crate::emit::{EmissionJob, SourceEmitter};
use crate::error::Result;

/// Summary of one ingested archive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Payload entries decoded.
    pub entries: usize,
    /// Methods appended across all keys.
    pub methods: usize,
}

/// Accumulates decoded extension methods by merge key.
pub struct ExtensionAggregator {
    config: AggregateConfig,
    decoder: ClassDecoder,
    store: Mutex<BTreeMap<MergeKey, Vec<GeneratedMethod>>>,
}

impl Default for ExtensionAggregator {
    fn default() -> Self {
        Self::new(AggregateConfig::default())
    }
}

impl ExtensionAggregator {
    pub fn new(config: AggregateConfig) -> Self {
        let decoder = config.decoder();
        Self {
            config,
            decoder,
            store: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn config(&self) -> &AggregateConfig {
        &self.config
    }

    /// Decode every payload in `archive` and append its methods.
    ///
    /// The archive is decoded in full before anything is merged, so a failure
    /// leaves the store as it was; earlier archives keep their contribution.
    pub fn ingest<R: Read + Seek>(&self, archive: R) -> Result<IngestReport> {
        let mut store = self.store.lock();

        let decoded = match read_archive(archive, &self.config, &self.decoder) {
            Ok(decoded) => decoded,
            Err(e) => {
                warn!(error = %e, "Archive rejected");
                return Err(e.into());
            }
        };

        let mut report = IngestReport {
            entries: decoded.len(),
            methods: 0,
        };
        for class in decoded {
            report.methods += class.methods.len();
            store.entry(class.key).or_default().extend(class.methods);
        }

        info!(
            entries = report.entries,
            methods = report.methods,
            keys = store.len(),
            "Archive ingested"
        );
        Ok(report)
    }

    /// Ingest an archive held in memory.
    pub fn ingest_bytes(&self, bytes: &[u8]) -> Result<IngestReport> {
        self.ingest(Cursor::new(bytes))
    }

    /// Read an archive file and ingest it.
    pub async fn ingest_path(&self, path: impl AsRef<Path>) -> Result<IngestReport> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            warn!(path = %path.display(), error = %e, "Failed to read archive");
            e
        })?;
        self.ingest_bytes(&bytes)
    }

    /// One job per key, in key order.
    pub fn snapshot(&self) -> Vec<EmissionJob> {
        let store = self.store.lock();
        store
            .iter()
            .map(|(key, methods)| EmissionJob {
                key: key.clone(),
                extension_type: key.extension_type(&self.config.type_suffix),
                methods: methods.clone(),
            })
            .collect()
    }

    /// Hand every key's merged methods to `emitter`.
    ///
    /// The store is left intact, so emitting again re-renders the same state.
    /// Stops at the first emitter failure. Returns the number of jobs emitted.
    pub async fn emit(&self, emitter: &dyn SourceEmitter) -> Result<usize> {
        let jobs = self.snapshot();
        for job in &jobs {
            if let Err(e) = emitter.emit(job).await {
                warn!(key = %job.key, error = %e, "Emission failed");
                return Err(e.into());
            }
        }
        info!(jobs = jobs.len(), "Emission complete");
        Ok(jobs.len())
    }

    /// Merge keys seen so far, in order.
    pub fn keys(&self) -> Vec<MergeKey> {
        self.store.lock().keys().cloned().collect()
    }

    /// Merged methods for `key`.
    pub fn methods(&self, key: &MergeKey) -> Option<Vec<GeneratedMethod>> {
        self.store.lock().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.store.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.lock().is_empty()
    }
}
