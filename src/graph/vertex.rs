//! Vertices of the contig graph and their 4-bit edge sets.

use serde::{Deserialize, Serialize};

use crate::graph::contig_info::ContigInfo;
use crate::kmer::kmer::{complement, KmerU64};
use crate::kmer::sequence::Sequence;

/// Position of a vertex in the graph's vertex collection.
///
/// Identities are reassigned whenever the collection is compacted.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct VertexId(pub u32);

impl VertexId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for VertexId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for VertexId {
    #[inline]
    fn from(num: usize) -> Self {
        VertexId(num as u32)
    }
}

/// One bit per possible neighbouring base (A, C, G, T).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct EdgeSet(u8);

impl EdgeSet {
    pub const EMPTY: EdgeSet = EdgeSet(0);

    #[inline]
    pub fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn add(&mut self, x: u8) {
        self.0 |= 1 << (x & 3);
    }

    #[inline]
    pub fn remove(&mut self, x: u8) {
        self.0 &= !(1 << (x & 3));
    }

    #[inline]
    pub fn contains(self, x: u8) -> bool {
        self.0 & (1 << (x & 3)) != 0
    }

    #[inline]
    pub fn size(self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// The only base in the set, if it holds exactly one
    #[inline]
    pub fn single(self) -> Option<u8> {
        if self.size() == 1 {
            Some(self.0.trailing_zeros() as u8)
        } else {
            None
        }
    }

    pub fn iter(self) -> impl Iterator<Item = u8> {
        (0..4u8).filter(move |&x| self.contains(x))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VertexStatus(u8);

impl VertexStatus {
    const DEAD: u8 = 1;
    const LOCKED: u8 = 2;

    #[inline]
    pub fn is_dead(self) -> bool {
        self.0 & Self::DEAD != 0
    }

    #[inline]
    pub fn set_dead(&mut self) {
        self.0 |= Self::DEAD;
    }

    #[inline]
    pub fn is_locked(self) -> bool {
        self.0 & Self::LOCKED != 0
    }

    /// Claim the vertex; false if it was already claimed
    #[inline]
    pub fn lock(&mut self) -> bool {
        if self.is_locked() {
            return false;
        }
        self.0 |= Self::LOCKED;
        true
    }

    /// Clears visited and locked, keeps dead
    #[inline]
    pub fn clear(&mut self) {
        self.0 &= Self::DEAD;
    }
}

/// A contig stored in forward orientation, with its statistics, edges and
/// traversal flags. All strand-dependent reads take an explicit
/// `reverse` flag; graph code goes through `VertexAdaptor` instead.
#[derive(Debug, Clone)]
pub struct Vertex {
    id: VertexId,
    contig: Sequence,
    info: ContigInfo,
    status: VertexStatus,
}

impl Vertex {
    pub fn new(id: VertexId, contig: Sequence, info: ContigInfo) -> Self {
        Vertex { id, contig, info, status: VertexStatus::default() }
    }

    #[inline]
    pub fn id(&self) -> VertexId {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: VertexId) {
        self.id = id;
    }

    #[inline]
    pub fn contig(&self) -> &Sequence {
        &self.contig
    }

    #[inline]
    pub fn contig_size(&self) -> usize {
        self.contig.len()
    }

    #[inline]
    pub fn contig_info(&self) -> &ContigInfo {
        &self.info
    }

    #[inline]
    pub fn kmer_count(&self) -> u64 {
        self.info.kmer_count
    }

    /// Number of k-mers spanned by the contig
    #[inline]
    pub fn num_kmer(&self) -> usize {
        self.contig.len() + 1 - self.info.kmer_size as usize
    }

    pub fn coverage(&self) -> f64 {
        self.info.kmer_count as f64 / self.num_kmer() as f64
    }

    #[inline]
    pub fn status(&self) -> VertexStatus {
        self.status
    }

    #[inline]
    pub fn status_mut(&mut self) -> &mut VertexStatus {
        &mut self.status
    }

    #[inline]
    pub fn out_edges(&self, reverse: bool) -> EdgeSet {
        if reverse { self.info.in_edges } else { self.info.out_edges }
    }

    #[inline]
    pub fn in_edges(&self, reverse: bool) -> EdgeSet {
        if reverse { self.info.out_edges } else { self.info.in_edges }
    }

    #[inline]
    pub(crate) fn out_edges_mut(&mut self, reverse: bool) -> &mut EdgeSet {
        if reverse { &mut self.info.in_edges } else { &mut self.info.out_edges }
    }

    /// Base at `i` as read on the chosen strand
    #[inline]
    pub fn base_at(&self, i: usize, reverse: bool) -> u8 {
        if reverse {
            complement(self.contig[self.contig.len() - 1 - i])
        } else {
            self.contig[i]
        }
    }

    pub fn oriented_contig(&self, reverse: bool) -> Sequence {
        if reverse { self.contig.reverse_complement() } else { self.contig.clone() }
    }

    pub fn begin_kmer(&self, k: usize, reverse: bool) -> KmerU64 {
        if reverse {
            self.contig.kmer_at(self.contig.len() - k, k).reverse_complement()
        } else {
            self.contig.kmer_at(0, k)
        }
    }

    pub fn end_kmer(&self, k: usize, reverse: bool) -> KmerU64 {
        if reverse {
            self.contig.kmer_at(0, k).reverse_complement()
        } else {
            self.contig.kmer_at(self.contig.len() - k, k)
        }
    }

    /// Length-k contig equal to its own reverse complement
    pub fn is_palindrome_kmer(&self) -> bool {
        self.contig.len() == self.info.kmer_size as usize && self.contig.is_palindrome()
    }

    /// Drop edges and flag for removal at the next refresh
    pub(crate) fn kill(&mut self) {
        self.info.in_edges = EdgeSet::EMPTY;
        self.info.out_edges = EdgeSet::EMPTY;
        self.status.set_dead();
    }
}
