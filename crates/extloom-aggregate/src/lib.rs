//! Archive ingestion, merging and source emission.
//!
//! # Architecture
//!
//! ```text
//! ExtensionClass ──encode──▶ ArchiveWriter ──zip bytes──▶ ExtensionAggregator::ingest
//!                                                              │ decode + append
//!                                                              ▼
//!                                            BTreeMap<MergeKey, Vec<GeneratedMethod>>
//!                                                              │ snapshot
//!                                                              ▼
//!                                     ExtensionAggregator::emit ──EmissionJob──▶ SourceEmitter
//! ```
//!
//! # Usage
//!
//! The library never installs a subscriber; binaries call [`logging::init`]
//! once at startup and pass [`AggregateConfig::output_dir`] to their emitter.
//!
//! ```rust,ignore
//! use extloom_aggregate::{AggregateConfig, DirectoryEmitter, ExtensionAggregator};
//!
//! let config = AggregateConfig::from_env();
//! let aggregator = ExtensionAggregator::new(config.clone());
//! for path in archives {
//!     aggregator.ingest_path(path).await?;
//! }
//! aggregator.emit(&DirectoryEmitter::new(&config.output_dir)).await?;
//! ```

pub mod aggregator;
pub mod archive;
pub mod config;
pub mod emit;
pub mod error;
pub mod logging;

pub use aggregator::{ExtensionAggregator, IngestReport};
pub use archive::{read_archive, ArchiveWriter};
pub use config::AggregateConfig;
pub use emit::{render, DirectoryEmitter, EmissionJob, SourceEmitter};
pub use error::{AggregateError, ArchiveError, EmitError, Result};
