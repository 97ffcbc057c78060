use std::fs;
use std::path::Path;

use crate::error::FlipError;

/// Bytes fetched for a single flip
pub const ENTROPY_BYTES: usize = 1024;

/// An entropy block as delivered by a provider. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntropy(Vec<u8>);

impl RawEntropy {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Write a block as lowercase hex.
pub fn save_hex(path: &Path, entropy: &RawEntropy) -> Result<(), FlipError> {
    fs::write(path, hex::encode(entropy.as_bytes())).map_err(|err| FlipError::Dump {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })
}

/// Read a hex dump back, requiring exactly `expected` bytes.
pub fn load_hex(path: &Path, expected: usize) -> Result<RawEntropy, FlipError> {
    let dump_error = |reason: String| FlipError::Dump {
        path: path.to_path_buf(),
        reason,
    };

    let text = fs::read_to_string(path).map_err(|err| dump_error(err.to_string()))?;
    let bytes = hex::decode(text.trim()).map_err(|err| dump_error(err.to_string()))?;
    if bytes.len() != expected {
        return Err(dump_error(format!(
            "expected {expected} bytes, got {}",
            bytes.len()
        )));
    }

    Ok(RawEntropy::new(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::tempdir;

    #[test]
    fn test_save_writes_lowercase_hex() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("block.hex");
        save_hex(&path, &RawEntropy::new(vec![0xAB, 0x01, 0xFF])).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "ab01ff");
    }

    #[test]
    fn test_load_saved_block() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("block.hex");
        let block = RawEntropy::new((0..=255u8).cycle().take(ENTROPY_BYTES).collect());
        save_hex(&path, &block).unwrap();

        let loaded = load_hex(&path, ENTROPY_BYTES).unwrap();
        assert_eq!(loaded.len(), ENTROPY_BYTES);
        assert_eq!(loaded, block);
    }

    #[test]
    fn test_load_tolerates_trailing_newline() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("block.hex");
        fs::write(&path, "00ff\n").unwrap();
        assert_eq!(load_hex(&path, 2).unwrap().as_bytes(), &[0x00, 0xFF]);
    }

    #[test]
    fn test_load_rejects_wrong_length() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("short.hex");
        fs::write(&path, "00ff").unwrap();
        assert_matches!(
            load_hex(&path, ENTROPY_BYTES),
            Err(FlipError::Dump { reason, .. }) if reason == "expected 1024 bytes, got 2"
        );
    }

    #[test]
    fn test_load_rejects_bad_hex() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.hex");
        fs::write(&path, "zz").unwrap();
        assert_matches!(load_hex(&path, 1), Err(FlipError::Dump { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        assert_matches!(
            load_hex(&dir.path().join("missing.hex"), 1),
            Err(FlipError::Dump { .. })
        );
    }
}
