//! # Input Stream Construction
//!
//! Opens the VCF as a buffered text stream, selecting a decompressor from
//! the file extension: `.vcf` plain, `.gz` gzip, `.bz2` bzip2. Any other
//! extension is a fatal structural error.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use bzip2::read::BzDecoder;
use flate2::read::MultiGzDecoder;

use crate::error::{Result, SummError};

/// Open a VCF path as a buffered reader, decompressing by extension.
pub fn open_vcf(path: &Path) -> Result<Box<dyn BufRead + Send>> {
    let file = File::open(path)?;

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();

    let reader: Box<dyn BufRead + Send> = match ext {
        "vcf" => Box::new(BufReader::new(file)),
        "gz" => Box::new(BufReader::new(MultiGzDecoder::new(file))),
        "bz2" => Box::new(BufReader::new(BzDecoder::new(file))),
        _ => {
            return Err(SummError::UnsupportedExtension {
                path: path.to_path_buf(),
            });
        }
    };

    Ok(reader)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn plain_vcf_reads_through() {
        let mut file = tempfile::Builder::new().suffix(".vcf").tempfile().unwrap();
        writeln!(file, "##fileformat=VCFv4.2").unwrap();
        file.flush().unwrap();

        let mut reader = open_vcf(file.path()).unwrap();
        let mut line = String::new();
        reader.read_line(&mut line).unwrap();
        assert_eq!(line, "##fileformat=VCFv4.2\n");
    }

    #[test]
    fn gzip_vcf_is_decompressed() {
        let file = tempfile::Builder::new().suffix(".gz").tempfile().unwrap();
        {
            let mut enc = flate2::write::GzEncoder::new(
                file.reopen().unwrap(),
                flate2::Compression::default(),
            );
            writeln!(enc, "##fileformat=VCFv4.2").unwrap();
            enc.finish().unwrap();
        }

        let mut reader = open_vcf(file.path()).unwrap();
        let mut line = String::new();
        reader.read_line(&mut line).unwrap();
        assert_eq!(line, "##fileformat=VCFv4.2\n");
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        let err = open_vcf(file.path()).err().unwrap();
        assert!(matches!(err, SummError::UnsupportedExtension { .. }));
    }
}
