use std::collections::HashMap;
use std::io::{Cursor, Write};

use exn::ResultExt;
use tracing::instrument;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::Method;
use crate::error::{ErrorKind, Result};

pub const DEFAULT_EXTENSION: &str = "zip";

/// One payload to bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub bytes: Vec<u8>,
}
impl Entry {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

/// Builds a zip container in memory.
///
/// - One file per distinct entry name, named `name.extension`. When several
///   entries share a name, the last one's bytes win; the file keeps the
///   position of the first.
/// - Path separators in names are replaced with `_`, so every file lands at
///   the root of the container.
/// - An empty input still produces a valid, empty container.
///
/// # Examples
///
/// ```
/// use tmd_archive::{ArchiveBuilder, Entry, Method};
///
/// let bytes = ArchiveBuilder::default()
///     .with_method(Method::Deflated)
///     .build([Entry::new("BepInExPack", b"PK...".to_vec())])
///     .unwrap();
/// assert!(bytes.starts_with(b"PK"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveBuilder {
    method: Method,
    extension: String,
}
impl Default for ArchiveBuilder {
    fn default() -> Self {
        Self {
            method: Method::default(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}
impl ArchiveBuilder {
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Extension appended to every entry name, with or without the leading
    /// dot. An empty extension keeps names as they are.
    pub fn with_extension(mut self, extension: impl AsRef<str>) -> Self {
        self.extension = extension.as_ref().trim_start_matches('.').to_string();
        self
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn file_name(&self, name: &str) -> String {
        let name: String = name.chars().map(|c| if matches!(c, '/' | '\\') { '_' } else { c }).collect();
        match self.extension.is_empty() {
            true => name,
            false => format!("{name}.{}", self.extension),
        }
    }

    #[instrument(skip_all, fields(method = %self.method))]
    pub fn build(&self, entries: impl IntoIterator<Item = Entry>) -> Result<Vec<u8>> {
        let files = self.dedupe(entries);
        let options = SimpleFileOptions::default()
            .compression_method(self.method.into())
            // Zip64 headers only when an entry needs them.
            .large_file(files.iter().any(|(_, bytes)| bytes.len() as u64 > u64::from(u32::MAX)));
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (file_name, bytes) in &files {
            writer
                .start_file(file_name.as_str(), options)
                .or_raise(|| ErrorKind::Entry(file_name.clone()))?;
            writer.write_all(bytes).or_raise(|| ErrorKind::Entry(file_name.clone()))?;
        }
        let bytes = writer.finish().or_raise(|| ErrorKind::Finish)?.into_inner();
        tracing::debug!(files = files.len(), size = bytes.len(), "archive built");
        Ok(bytes)
    }

    fn dedupe(&self, entries: impl IntoIterator<Item = Entry>) -> Vec<(String, Vec<u8>)> {
        let mut files: Vec<(String, Vec<u8>)> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();
        for Entry { name, bytes } in entries {
            let file_name = self.file_name(&name);
            match positions.get(&file_name) {
                Some(&position) => {
                    tracing::debug!(file_name, "duplicate entry replaces earlier one");
                    files[position].1 = bytes;
                },
                None => {
                    positions.insert(file_name.clone(), files.len());
                    files.push((file_name, bytes));
                },
            }
        }
        files
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Read;
    use zip::ZipArchive;

    fn open(bytes: Vec<u8>) -> ZipArchive<Cursor<Vec<u8>>> {
        ZipArchive::new(Cursor::new(bytes)).unwrap()
    }

    fn contents(archive: &mut ZipArchive<Cursor<Vec<u8>>>, name: &str) -> Vec<u8> {
        let mut buffer = Vec::new();
        archive.by_name(name).unwrap().read_to_end(&mut buffer).unwrap();
        buffer
    }

    #[test]
    fn test_empty_archive_opens() {
        let archive = open(ArchiveBuilder::default().build([]).unwrap());
        assert_eq!(archive.len(), 0);
    }

    #[test]
    fn test_last_duplicate_wins() {
        let bytes = ArchiveBuilder::default()
            .build([Entry::new("A", b"b1".to_vec()), Entry::new("A", b"b2".to_vec())])
            .unwrap();
        let mut archive = open(bytes);
        assert_eq!(archive.len(), 1);
        assert_eq!(contents(&mut archive, "A.zip"), b"b2");
    }

    #[rstest]
    #[case(Method::Stored)]
    #[case(Method::Deflated)]
    fn test_entries_round_trip(#[case] method: Method) {
        let entries = [
            Entry::new("BepInExPack", vec![1u8; 1024]),
            Entry::new("MoreCompany", b"more".to_vec()),
        ];
        let mut archive = open(ArchiveBuilder::default().with_method(method).build(entries).unwrap());
        assert_eq!(archive.len(), 2);
        assert_eq!(archive.by_index(0).unwrap().name(), "BepInExPack.zip");
        assert_eq!(archive.by_index(0).unwrap().compression(), zip::CompressionMethod::from(method));
        assert_eq!(contents(&mut archive, "MoreCompany.zip"), b"more");
    }

    #[rstest]
    #[case("zip", "Mod", "Mod.zip")]
    #[case(".bin", "Mod", "Mod.bin")]
    #[case("", "Mod", "Mod")]
    #[case("zip", "../evil/Mod", ".._evil_Mod.zip")]
    #[case("zip", "a\\b", "a_b.zip")]
    fn test_file_name(#[case] extension: &str, #[case] name: &str, #[case] expected: &str) {
        assert_eq!(ArchiveBuilder::default().with_extension(extension).file_name(name), expected);
    }

    #[test]
    fn test_build_archive_defaults() {
        let mut archive = open(crate::build_archive([Entry::new("X", b"x".to_vec())]).unwrap());
        assert_eq!(contents(&mut archive, "X.zip"), b"x");
        assert_eq!(archive.by_index(0).unwrap().compression(), zip::CompressionMethod::Stored);
    }
}
