//! Content hashing for dataset snapshots.
//!
//! A snapshot's hash keys memoized derived values (facet option lists), so two
//! snapshots with identical rows share cache entries.

use blake3::Hasher;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::Track;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Hash256(pub [u8; 32]);

impl Hash256 {
    pub fn to_hex(&self) -> String {
        // blake3 hex(32b) is 64 hex chars
        let mut s = String::with_capacity(64);
        for b in &self.0 {
            use std::fmt::Write as _;
            let _ = write!(&mut s, "{:02x}", b);
        }
        s
    }
}

impl std::fmt::Display for Hash256 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Hash an ordered run of tracks. Row order is part of the content.
pub fn hash_tracks(tracks: &[Track]) -> Result<Hash256> {
    let mut h = Hasher::new();
    h.update(&(tracks.len() as u64).to_le_bytes());
    for track in tracks {
        let bytes = serde_json::to_vec(track)?;
        // Length-prefix each row so boundaries cannot shift between rows.
        h.update(&(bytes.len() as u64).to_le_bytes());
        h.update(&bytes);
    }
    Ok(Hash256(h.finalize().into()))
}
