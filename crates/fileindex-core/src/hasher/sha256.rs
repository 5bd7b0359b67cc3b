use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

/// Stream the full content of `file` through SHA-256 and return the
/// lowercase hex digest.
pub fn hash_file(file: &Path) -> io::Result<String> {
    let f = File::open(file)?;
    let mut reader = BufReader::new(f);
    let mut hasher = Sha256::new();
    io::copy(&mut reader, &mut hasher)?;
    Ok(hex::encode(hasher.finalize()))
}

pub fn hash_data(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}
