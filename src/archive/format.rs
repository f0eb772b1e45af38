//! Content sniffing and stream decoders.

use crate::core::{SwitchyError, SwitchyResult};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Bytes needed to see a tar header's `ustar` magic.
const TAR_HEADER_LEN: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    Gzip,
    Xz,
    Bzip2,
}

impl Compression {
    /// File name suffixes this compression is usually published with.
    fn suffixes(self) -> &'static [&'static str] {
        match self {
            Compression::Gzip => &[".gz"],
            Compression::Xz => &[".xz"],
            Compression::Bzip2 => &[".bz2"],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    Zip,
    Tar,
}

/// Detect a compression stream from its leading bytes
pub fn sniff_compression(header: &[u8]) -> Option<Compression> {
    if header.starts_with(&[0x1f, 0x8b]) {
        Some(Compression::Gzip)
    } else if header.starts_with(&[0xfd, b'7', b'z', b'X', b'Z', 0x00]) {
        Some(Compression::Xz)
    } else if header.starts_with(b"BZh") {
        Some(Compression::Bzip2)
    } else {
        None
    }
}

/// Detect an archive container from its leading bytes
pub fn sniff_container(header: &[u8]) -> Option<Container> {
    if header.starts_with(b"PK\x03\x04") || header.starts_with(b"PK\x05\x06") {
        Some(Container::Zip)
    } else if header.len() >= 262 && &header[257..262] == b"ustar" {
        Some(Container::Tar)
    } else {
        None
    }
}

/// Read up to one tar header's worth of bytes from the start of a file.
pub fn read_header(path: &Path) -> SwitchyResult<Vec<u8>> {
    let file = File::open(path).map_err(|e| SwitchyError::fs(path, e))?;
    read_prefix(file).map_err(|e| SwitchyError::fs(path, e))
}

/// Peek at the decoded start of a compressed file. A stream too broken to
/// yield even a header counts as not containing anything recognizable.
pub fn read_decoded_header(path: &Path, compression: Compression) -> SwitchyResult<Vec<u8>> {
    let file = File::open(path).map_err(|e| SwitchyError::fs(path, e))?;
    Ok(read_prefix(decoder(compression, file)).unwrap_or_default())
}

fn read_prefix(reader: impl Read) -> io::Result<Vec<u8>> {
    let mut header = Vec::with_capacity(TAR_HEADER_LEN);
    reader.take(TAR_HEADER_LEN as u64).read_to_end(&mut header)?;
    Ok(header)
}

/// Wrap a reader in the matching decompressor.
pub fn decoder<'a, R: Read + 'a>(compression: Compression, reader: R) -> Box<dyn Read + 'a> {
    match compression {
        Compression::Gzip => Box::new(flate2::read::GzDecoder::new(reader)),
        Compression::Xz => Box::new(xz2::read::XzDecoder::new(reader)),
        Compression::Bzip2 => Box::new(bzip2::read::BzDecoder::new(reader)),
    }
}

/// Name for the output of decompressing `file_name`: the compression suffix
/// is dropped, and `.tgz` style names become `.tar`.
pub fn decoded_file_name(file_name: &str, compression: Compression) -> String {
    let lower = file_name.to_ascii_lowercase();
    for short in [".tgz", ".tbz2", ".tbz", ".txz"] {
        if lower.ends_with(short) && lower.len() > short.len() {
            return format!("{}.tar", &file_name[..file_name.len() - short.len()]);
        }
    }
    for suffix in compression.suffixes() {
        if lower.ends_with(suffix) && lower.len() > suffix.len() {
            return file_name[..file_name.len() - suffix.len()].to_string();
        }
    }
    file_name.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniff_compression() {
        assert_eq!(sniff_compression(&[0x1f, 0x8b, 8, 0]), Some(Compression::Gzip));
        assert_eq!(
            sniff_compression(&[0xfd, b'7', b'z', b'X', b'Z', 0x00, 0]),
            Some(Compression::Xz)
        );
        assert_eq!(sniff_compression(b"BZh91AY"), Some(Compression::Bzip2));
        assert_eq!(sniff_compression(b"PK\x03\x04"), None);
        assert_eq!(sniff_compression(b""), None);
    }

    #[test]
    fn test_sniff_container() {
        assert_eq!(sniff_container(b"PK\x03\x04rest"), Some(Container::Zip));

        let mut tar = vec![0u8; 512];
        tar[257..262].copy_from_slice(b"ustar");
        assert_eq!(sniff_container(&tar), Some(Container::Tar));

        assert_eq!(sniff_container(&[0u8; 100]), None);
        assert_eq!(sniff_container(b"#!/bin/sh\necho hi\n"), None);
    }

    #[test]
    fn test_decoded_file_name() {
        assert_eq!(decoded_file_name("tool.gz", Compression::Gzip), "tool");
        assert_eq!(decoded_file_name("sdk.TGZ", Compression::Gzip), "sdk.tar");
        assert_eq!(decoded_file_name("node.tar.xz", Compression::Xz), "node.tar");
        assert_eq!(decoded_file_name("blob.bz2", Compression::Bzip2), "blob");
        assert_eq!(decoded_file_name("java-21", Compression::Gzip), "java-21");
        assert_eq!(decoded_file_name(".gz", Compression::Gzip), ".gz");
    }
}
