use crate::core::{SwitchyError, SwitchyResult};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// SHA-256 of a file as lowercase hex, read in fixed-size chunks
pub fn sha256_file(path: &Path) -> SwitchyResult<String> {
    let mut file = File::open(path).map_err(|e| SwitchyError::fs(path, e))?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];

    loop {
        let read = file.read(&mut buffer).map_err(|e| SwitchyError::fs(path, e))?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Check a file against an expected SHA-256 digest (case-insensitive)
pub fn verify_file(path: &Path, expected: &str) -> SwitchyResult<()> {
    let actual = sha256_file(path)?;
    if actual.eq_ignore_ascii_case(expected.trim()) {
        Ok(())
    } else {
        Err(SwitchyError::Integrity {
            path: path.to_path_buf(),
            expected: expected.trim().to_ascii_lowercase(),
            actual,
        })
    }
}
