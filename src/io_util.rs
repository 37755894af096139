//! Transparent gzip sniffing for training inputs.
//!
//! `sentences_path` and `dict_path` may each be plain text or gzip-framed;
//! callers never have to know which. Mirrors the original `speller`
//! program's habit of accepting either at its two corpus entry points.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::bufread::GzDecoder;

use crate::error::CorrectorError;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Opens `path` for line-oriented reading, transparently decompressing if
/// the file starts with the gzip magic bytes.
pub fn open_maybe_gzip<P: AsRef<Path>>(path: P) -> Result<Box<dyn BufRead>, CorrectorError> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let is_gzip = reader.fill_buf()?.starts_with(&GZIP_MAGIC);
    if is_gzip {
        Ok(Box::new(BufReader::new(GzDecoder::new(reader))))
    } else {
        Ok(Box::new(reader))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_plain_text_corpus() {
        let dir = std::env::temp_dir();
        let path = dir.join("speller_corrector_plain_test.txt");
        std::fs::write(&path, "hello world\n").unwrap();
        let mut reader = open_maybe_gzip(&path).unwrap();
        let mut line = String::new();
        reader.read_line(&mut line).unwrap();
        assert_eq!(line, "hello world\n");
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn reads_gzip_compressed_corpus() {
        use flate2::write::GzEncoder;
        use flate2::Compression;

        let dir = std::env::temp_dir();
        let path = dir.join("speller_corrector_gzip_test.txt.gz");
        let file = File::create(&path).unwrap();
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder.write_all(b"gzipped corpus line\n").unwrap();
        encoder.finish().unwrap();

        let mut reader = open_maybe_gzip(&path).unwrap();
        let mut line = String::new();
        reader.read_line(&mut line).unwrap();
        assert_eq!(line, "gzipped corpus line\n");
        std::fs::remove_file(&path).unwrap();
    }
}
