//! DOCX zip container I/O.
//!
//! Entries are kept in archive order together with their compression method,
//! timestamp and permissions, so re-serializing a package changes nothing but
//! the parts that were explicitly written.

use crate::error::{DocxError, Result};
use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// One zip entry.
#[derive(Debug, Clone)]
pub struct DocxEntry {
    pub name: String,
    pub data: Vec<u8>,
    pub compression: CompressionMethod,
    pub last_modified: zip::DateTime,
    pub unix_mode: Option<u32>,
    pub is_dir: bool,
}

/// An opened DOCX package held in memory.
#[derive(Debug, Clone, Default)]
pub struct DocxPackage {
    entries: Vec<DocxEntry>,
}

impl DocxPackage {
    /// Read a package from an in-memory zip.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_reader(Cursor::new(bytes))
    }

    /// Read a package from disk.
    pub fn read(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| DocxError::io(path, e))?;
        Self::from_bytes(&bytes)
    }

    fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)?;
        let mut entries = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            let mut data = Vec::new();
            file.read_to_end(&mut data)?;
            entries.push(DocxEntry {
                name: file.name().to_string(),
                data,
                compression: file.compression(),
                last_modified: file.last_modified().unwrap_or_default(),
                unix_mode: file.unix_mode(),
                is_dir: file.is_dir(),
            });
        }
        Ok(Self { entries })
    }

    /// Entry names in archive order.
    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn entries(&self) -> &[DocxEntry] {
        &self.entries
    }

    fn entry(&self, name: &str) -> Option<&DocxEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Raw bytes of a part.
    pub fn part_bytes(&self, name: &str) -> Option<&[u8]> {
        self.entry(name).map(|e| e.data.as_slice())
    }

    /// A part decoded as UTF-8 text. `Ok(None)` if the part does not exist.
    pub fn read_part(&self, name: &str) -> Result<Option<String>> {
        let Some(entry) = self.entry(name) else {
            return Ok(None);
        };
        String::from_utf8(entry.data.clone())
            .map(Some)
            .map_err(|source| DocxError::InvalidPartEncoding {
                name: name.to_string(),
                source,
            })
    }

    /// Replace the content of a part, or append a new deflated part.
    pub fn write_part(&mut self, name: &str, content: impl Into<Vec<u8>>) {
        let data = content.into();
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => entry.data = data,
            None => self.entries.push(DocxEntry {
                name: name.to_string(),
                data,
                compression: CompressionMethod::Deflated,
                last_modified: zip::DateTime::default(),
                unix_mode: None,
                is_dir: false,
            }),
        }
    }

    /// Serialize back to zip bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut zout = ZipWriter::new(Cursor::new(Vec::new()));
        for ent in &self.entries {
            let mut opts = SimpleFileOptions::default()
                .compression_method(ent.compression)
                .last_modified_time(ent.last_modified);
            if let Some(mode) = ent.unix_mode {
                opts = opts.unix_permissions(mode);
            }
            if ent.is_dir || ent.name.ends_with('/') {
                zout.add_directory(ent.name.as_str(), opts)?;
            } else {
                zout.start_file(ent.name.as_str(), opts)?;
                zout.write_all(&ent.data)?;
            }
        }
        Ok(zout.finish()?.into_inner())
    }

    /// Serialize and write to disk in one step.
    pub fn write(&self, path: &Path) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes).map_err(|e| DocxError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_zip() -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        zip.start_file("[Content_Types].xml", deflated).unwrap();
        zip.write_all(b"<Types/>").unwrap();
        zip.add_directory("word/media/", stored).unwrap();
        zip.start_file("word/media/image1.png", stored).unwrap();
        zip.write_all(&[0x89, b'P', b'N', b'G', 0xff, 0x00]).unwrap();
        zip.start_file("word/document.xml", deflated).unwrap();
        zip.write_all("<w:t>héllo</w:t>".as_bytes()).unwrap();
        zip.finish().unwrap().into_inner()
    }

    #[test]
    fn test_read_preserves_order_and_compression() {
        let pkg = DocxPackage::from_bytes(&sample_zip()).unwrap();
        let names: Vec<_> = pkg.part_names().collect();
        assert_eq!(
            names,
            vec![
                "[Content_Types].xml",
                "word/media/",
                "word/media/image1.png",
                "word/document.xml"
            ]
        );
        assert_eq!(pkg.entries()[2].compression, CompressionMethod::Stored);
        assert!(pkg.entries()[1].is_dir);
    }

    #[test]
    fn test_read_part() {
        let pkg = DocxPackage::from_bytes(&sample_zip()).unwrap();
        assert_eq!(
            pkg.read_part("word/document.xml").unwrap().as_deref(),
            Some("<w:t>héllo</w:t>")
        );
        assert_eq!(pkg.read_part("word/missing.xml").unwrap(), None);
        assert!(matches!(
            pkg.read_part("word/media/image1.png"),
            Err(DocxError::InvalidPartEncoding { .. })
        ));
    }

    #[test]
    fn test_write_part_and_reserialize() {
        let mut pkg = DocxPackage::from_bytes(&sample_zip()).unwrap();
        pkg.write_part("word/document.xml", "<w:t>bye</w:t>");
        pkg.write_part("word/new.xml", "<x/>");

        let reopened = DocxPackage::from_bytes(&pkg.to_bytes().unwrap()).unwrap();
        assert_eq!(reopened.entries().len(), 5);
        assert_eq!(
            reopened.part_bytes("word/document.xml"),
            Some(&b"<w:t>bye</w:t>"[..])
        );
        assert_eq!(reopened.part_bytes("word/new.xml"), Some(&b"<x/>"[..]));
        assert_eq!(
            reopened.part_bytes("word/media/image1.png"),
            pkg.part_bytes("word/media/image1.png")
        );
        assert_eq!(reopened.entries()[2].compression, CompressionMethod::Stored);
    }

    #[test]
    fn test_not_a_zip() {
        assert!(matches!(
            DocxPackage::from_bytes(b"plain text"),
            Err(DocxError::Zip(_))
        ));
    }
}
