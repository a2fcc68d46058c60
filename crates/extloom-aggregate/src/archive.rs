//! Zip packaging of extension payloads.
//!
//! Each [`ExtensionClass`] becomes one entry under the configured prefix.
//! Other entries are carried along untouched and ignored on read.

use std::io::{Cursor, Read, Seek, Write};

use extloom_core::codec::{ClassDecoder, DecodedClass};
use extloom_core::{encode_class, ExtensionClass};
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::config::AggregateConfig;
use crate::error::{ArchiveError, ArchiveResult};

/// Collects extension classes and packages them into a zip archive.
#[derive(Debug)]
pub struct ArchiveWriter {
    config: AggregateConfig,
    classes: Vec<ExtensionClass>,
    resources: Vec<(String, Vec<u8>)>,
}

impl ArchiveWriter {
    pub fn new(config: AggregateConfig) -> Self {
        Self {
            config,
            classes: Vec::new(),
            resources: Vec::new(),
        }
    }

    /// Queue `class` for packaging.
    ///
    /// Returns `false` if a class for the same owner is already queued.
    pub fn add(&mut self, class: ExtensionClass) -> bool {
        if self.classes.contains(&class) {
            return false;
        }
        self.classes.push(class);
        true
    }

    /// Queue an arbitrary entry.
    pub fn add_resource(&mut self, name: impl Into<String>, bytes: Vec<u8>) {
        self.resources.push((name.into(), bytes));
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Write the archive to `sink`: extension entries first, in insertion
    /// order, then resources.
    pub fn write_to<W: Write + Seek>(self, sink: W) -> ArchiveResult<W> {
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let mut zip = ZipWriter::new(sink);

        for class in &self.classes {
            let name = self.config.entry_name(class.owner());
            let bytes = encode_class(class).map_err(|source| ArchiveError::Codec {
                entry: name.clone(),
                source,
            })?;
            zip.start_file(name.as_str(), options)?;
            zip.write_all(&bytes)?;
            debug!(entry = %name, methods = class.methods().len(), "Packaged extension class");
        }
        for (name, bytes) in &self.resources {
            zip.start_file(name.as_str(), options)?;
            zip.write_all(bytes)?;
        }

        Ok(zip.finish()?)
    }

    /// Archive bytes.
    pub fn finish(self) -> ArchiveResult<Vec<u8>> {
        Ok(self.write_to(Cursor::new(Vec::new()))?.into_inner())
    }
}

/// Decode every payload entry of an archive, in archive order.
///
/// Fails on the first undecodable entry.
pub fn read_archive<R: Read + Seek>(
    source: R,
    config: &AggregateConfig,
    decoder: &ClassDecoder,
) -> ArchiveResult<Vec<DecodedClass>> {
    let mut zip = ZipArchive::new(source)?;
    let mut decoded = Vec::new();

    for index in 0..zip.len() {
        let mut entry = zip.by_index(index)?;
        if entry.is_dir() || !config.is_payload_entry(entry.name()) {
            continue;
        }
        let name = entry.name().to_string();
        let mut bytes = Vec::with_capacity(entry.size().min(config.max_token_bytes) as usize);
        entry.read_to_end(&mut bytes)?;

        let class = decoder.decode(&bytes).map_err(|source| ArchiveError::Codec {
            entry: name.clone(),
            source,
        })?;
        debug!(entry = %name, key = %class.key, methods = class.methods.len(), "Decoded entry");
        decoded.push(class);
    }

    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use extloom_core::{BehaviorKind, DelegateKind, MemberDeclaration};

    fn class(owner: &str, methods: &[&str]) -> ExtensionClass {
        let mut members =
            vec![MemberDeclaration::new("get", owner).with_kind(BehaviorKind::Designated)];
        for name in methods {
            members.push(MemberDeclaration::new(*name, "void").with_kind(BehaviorKind::VoidEffect));
        }
        ExtensionClass::build(DelegateKind::InstanceDelegate, owner, members).unwrap()
    }

    #[test]
    fn test_writer_rejects_same_owner() {
        let mut writer = ArchiveWriter::new(AggregateConfig::default());
        assert!(writer.add(class("com.example.Strings", &["trim"])));
        assert!(!writer.add(class("com.example.Strings", &["pad"])));
        assert!(writer.add(class("com.example.Lists", &["clear"])));
        assert_eq!(writer.len(), 2);
    }

    #[test]
    fn test_read_skips_foreign_entries() {
        let config = AggregateConfig::default();
        let mut writer = ArchiveWriter::new(config.clone());
        writer.add(class("com.example.Strings", &["trim", "pad"]));
        writer.add_resource("META-INF/MANIFEST.MF", b"Manifest-Version: 1.0\n".to_vec());
        writer.add_resource("META-INF/extloom/README", b"not a payload".to_vec());
        let bytes = writer.finish().unwrap();

        let decoded = read_archive(Cursor::new(bytes), &config, &config.decoder()).unwrap();
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].key.owner.as_str(), "com.example.Strings");
        assert_eq!(decoded[0].methods.len(), 2);
    }

    #[test]
    fn test_read_reports_corrupt_entry() {
        let config = AggregateConfig::default();
        let mut writer = ArchiveWriter::new(config.clone());
        writer.add_resource(
            config.entry_name(&"com.example.Broken".into()),
            vec![0xff, 0xff, 0xff],
        );
        let bytes = writer.finish().unwrap();

        let err = read_archive(Cursor::new(bytes), &config, &config.decoder()).unwrap_err();
        match err {
            ArchiveError::Codec { entry, .. } => {
                assert_eq!(entry, "META-INF/extloom/com.example.Broken.ext")
            }
            other => panic!("Expected Codec error, got {:?}", other),
        }
    }

    #[test]
    fn test_read_rejects_non_zip() {
        let config = AggregateConfig::default();
        let err = read_archive(
            Cursor::new(b"definitely not a zip".to_vec()),
            &config,
            &config.decoder(),
        )
        .unwrap_err();
        assert!(matches!(err, ArchiveError::Zip(_)));
    }
}
