//! Image export functionality - writing embedded files and sniffing formats.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::Result;
use crate::model::EmbeddedFile;

/// File extension for a blob, judged by its leading signature bytes.
pub fn sniff_extension(data: &[u8]) -> &'static str {
    if data.starts_with(b"\x89PNG\r\n\x1a\n") {
        "png"
    } else if data.starts_with(b"\xff\xd8\xff") {
        "jpg"
    } else if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        "gif"
    } else if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
        "webp"
    } else {
        "bin"
    }
}

/// Image writer for exporting embedded files to a directory.
pub struct ImageWriter {
    outdir: PathBuf,
    /// Prefix joined to file names in returned sources
    prefix: String,
}

impl ImageWriter {
    /// Create a writer; the directory is created when the first file is written.
    pub fn new(outdir: impl AsRef<Path>) -> Self {
        let outdir = outdir.as_ref().to_path_buf();
        let prefix = outdir
            .file_name()
            .map(|name| format!("{}/", name.to_string_lossy()))
            .unwrap_or_default();
        Self { outdir, prefix }
    }

    /// Use `prefix` instead of the directory name in returned sources.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn outdir(&self) -> &Path {
        &self.outdir
    }

    fn path_for(&self, file: &EmbeddedFile) -> (PathBuf, String) {
        let filename = format!("{}.{}", file.address, sniff_extension(&file.data));
        (self.outdir.join(&filename), filename)
    }

    /// Write one embedded file and return its source relative to the page.
    pub fn write_file(&mut self, file: &EmbeddedFile) -> Result<String> {
        fs::create_dir_all(&self.outdir)?;
        let (path, filename) = self.path_for(file);
        fs::write(&path, &file.data)?;
        debug!(address = file.address, path = %path.display(), "wrote embedded file");
        Ok(format!("{}{}", self.prefix, filename))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniff_extension() {
        assert_eq!(sniff_extension(b"\x89PNG\r\n\x1a\n...."), "png");
        assert_eq!(sniff_extension(b"\xff\xd8\xff\xe0"), "jpg");
        assert_eq!(sniff_extension(b"GIF89a"), "gif");
        assert_eq!(sniff_extension(b"RIFF\0\0\0\0WEBPVP8 "), "webp");
        assert_eq!(sniff_extension(b"RIFF"), "bin");
        assert_eq!(sniff_extension(b""), "bin");
    }

    #[test]
    fn test_source_uses_directory_name() {
        let writer = ImageWriter::new("/tmp/out/page_files");
        let file = EmbeddedFile {
            address: 42,
            data: b"GIF87a".to_vec(),
        };
        let (path, filename) = writer.path_for(&file);
        assert_eq!(filename, "42.gif");
        assert_eq!(path, PathBuf::from("/tmp/out/page_files/42.gif"));
        assert_eq!(writer.prefix, "page_files/");
    }
}
