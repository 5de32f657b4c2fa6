//! Content-digest duplicate index.
//!
//! Only files strictly below the configured ceiling (10 MiB by default) are
//! hashed. Larger files are left out of duplicate detection entirely: they are
//! neither unique nor duplicate as far as this index is concerned. This bounds
//! the I/O cost of an analysis pass.
//!
//! Equal digests are treated as equal content. There is no byte-by-byte
//! re-verification.

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::debug;

/// Hex-encoded SHA-256 of a file's full contents.
pub fn content_digest(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(hex::encode(hasher.finalize()))
}

/// Digest → path index built incrementally during a walk.
#[derive(Debug)]
pub struct DedupIndex {
    max_bytes: u64,
    first_seen: HashMap<String, PathBuf>,
    groups: HashMap<String, Vec<PathBuf>>,
}

impl DedupIndex {
    /// Index that hashes files smaller than `max_bytes`.
    #[must_use]
    pub fn new(max_bytes: u64) -> Self {
        Self {
            max_bytes,
            first_seen: HashMap::new(),
            groups: HashMap::new(),
        }
    }

    /// Whether a file of `size` bytes is eligible for hashing.
    #[must_use]
    pub const fn eligible(&self, size: u64) -> bool {
        size < self.max_bytes
    }

    /// Hash `path` (read from disk) and record it under `key`.
    ///
    /// Ineligible sizes and read failures are skipped without error.
    pub fn observe(&mut self, path: &Path, key: PathBuf, size: u64) {
        if !self.eligible(size) {
            return;
        }
        match content_digest(path) {
            Ok(digest) => self.insert(digest, key),
            Err(err) => debug!(path = %path.display(), error = %err, "hash skipped"),
        }
    }

    /// Record a precomputed digest.
    pub fn insert(&mut self, digest: String, key: PathBuf) {
        if let Some(group) = self.groups.get_mut(&digest) {
            group.push(key);
            return;
        }
        match self.first_seen.remove(&digest) {
            Some(first) => {
                self.groups.insert(digest, vec![first, key]);
            }
            None => {
                self.first_seen.insert(digest, key);
            }
        }
    }

    /// Number of digests seen exactly once so far.
    #[must_use]
    pub fn unique_count(&self) -> usize {
        self.first_seen.len()
    }

    /// Digests observed for two or more paths.
    #[must_use]
    pub fn into_groups(self) -> BTreeMap<String, Vec<PathBuf>> {
        self.groups.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn digest_is_stable_and_content_based() {
        let dir = tempfile::tempdir().expect("tempdir");
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        fs::write(&a, b"same bytes").expect("write");
        fs::write(&b, b"same bytes").expect("write");
        let da = content_digest(&a).expect("digest");
        assert_eq!(da.len(), 64);
        assert_eq!(da, content_digest(&b).expect("digest"));
        // sha256("") is well known.
        let empty = dir.path().join("empty");
        fs::write(&empty, b"").expect("write");
        assert_eq!(
            content_digest(&empty).expect("digest"),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn groups_only_form_on_second_observation() {
        let mut index = DedupIndex::new(100);
        index.insert("d1".into(), PathBuf::from("x"));
        index.insert("d2".into(), PathBuf::from("y"));
        assert_eq!(index.unique_count(), 2);
        index.insert("d1".into(), PathBuf::from("z"));
        index.insert("d1".into(), PathBuf::from("w"));
        assert_eq!(index.unique_count(), 1);

        let groups = index.into_groups();
        assert_eq!(groups.len(), 1);
        assert_eq!(
            groups["d1"],
            vec![PathBuf::from("x"), PathBuf::from("z"), PathBuf::from("w")]
        );
    }

    #[test]
    fn files_at_ceiling_are_not_hashed() {
        let dir = tempfile::tempdir().expect("tempdir");
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        fs::write(&a, b"0123456789").expect("write");
        fs::write(&b, b"0123456789").expect("write");

        let mut index = DedupIndex::new(10);
        index.observe(&a, PathBuf::from("a"), 10);
        index.observe(&b, PathBuf::from("b"), 10);
        assert_eq!(index.unique_count(), 0);
        assert!(index.into_groups().is_empty());
    }

    #[test]
    fn unreadable_files_are_skipped() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut index = DedupIndex::new(100);
        index.observe(&dir.path().join("missing"), PathBuf::from("missing"), 1);
        assert_eq!(index.unique_count(), 0);
    }
}
