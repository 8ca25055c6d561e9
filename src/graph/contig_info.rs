use serde::{Deserialize, Serialize};

use crate::graph::vertex::EdgeSet;
use crate::kmer::sequence::Sequence;

/// Per-contig statistics carried alongside a sequence.
///
/// `in_edges` is stored in reverse-strand coordinates: bit `x` means the
/// reverse complement of the contig can be extended by base `x`. With this
/// convention flipping a contig is a plain swap of the two sets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContigInfo {
    pub kmer_size: u32,
    pub kmer_count: u64,
    pub in_edges: EdgeSet,
    pub out_edges: EdgeSet,
}

impl ContigInfo {
    pub fn with_kmer_count(kmer_count: u64) -> Self {
        ContigInfo { kmer_count, ..Default::default() }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Contig {
    pub id: usize,
    pub sequence: Sequence,
    pub info: ContigInfo,
}

impl Contig {
    /// Average k-mer multiplicity over the contig
    pub fn coverage(&self) -> f64 {
        let k = self.info.kmer_size as usize;
        if self.sequence.len() < k || k == 0 {
            return 0.0;
        }
        self.info.kmer_count as f64 / (self.sequence.len() - k + 1) as f64
    }
}
