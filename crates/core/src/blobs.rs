//! Join bookkeeping between image placeholders and embedded files.
//!
//! Image boxes declare a blob address; embedded files are produced later in
//! the content section with an address derived from their stream offset.
//! A mismatch either way is an inconsistency worth reporting, not a decode
//! failure.

use rustc_hash::FxHashSet;
use tracing::warn;

/// Outcome of joining image placeholders against embedded files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlobReport {
    /// Addresses declared by a placeholder and present as a file.
    pub matched: Vec<u32>,
    /// Placeholder addresses with no embedded file.
    pub missing_files: Vec<u32>,
    /// Embedded file addresses no placeholder refers to.
    pub orphan_files: Vec<u32>,
}

impl BlobReport {
    pub fn is_consistent(&self) -> bool {
        self.missing_files.is_empty() && self.orphan_files.is_empty()
    }
}

/// Collects both sides of the join during one decode session.
#[derive(Debug, Default)]
pub struct BlobIndex {
    placeholders: FxHashSet<u32>,
    files: FxHashSet<u32>,
}

impl BlobIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare_placeholder(&mut self, address: u32) {
        self.placeholders.insert(address);
    }

    pub fn record_file(&mut self, address: u32) {
        self.files.insert(address);
    }

    /// Resolve the join, logging each unmatched address at warn level.
    pub fn finish(&self) -> BlobReport {
        let mut matched: Vec<u32> = self
            .placeholders
            .intersection(&self.files)
            .copied()
            .collect();
        let mut missing_files: Vec<u32> = self
            .placeholders
            .difference(&self.files)
            .copied()
            .collect();
        let mut orphan_files: Vec<u32> = self
            .files
            .difference(&self.placeholders)
            .copied()
            .collect();
        matched.sort_unstable();
        missing_files.sort_unstable();
        orphan_files.sort_unstable();

        for address in &missing_files {
            warn!(address, "image placeholder has no embedded file");
        }
        for address in &orphan_files {
            warn!(address, "embedded file has no image placeholder");
        }

        BlobReport {
            matched,
            missing_files,
            orphan_files,
        }
    }
}
