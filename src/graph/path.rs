use crate::graph::adaptor::VertexAdaptor;
use crate::graph::contig_graph::ContigGraph;
use crate::graph::contig_info::ContigInfo;
use crate::kmer::sequence::Sequence;

/// An ordered walk of adaptors. Consecutive adaptors overlap by k-1 bases.
///
/// Paths are built and consumed within a single graph operation and hold
/// no references into the graph, only adaptors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContigGraphPath {
    vertices: Vec<VertexAdaptor>,
}

impl ContigGraphPath {
    pub fn new(start: VertexAdaptor) -> Self {
        ContigGraphPath { vertices: vec![start] }
    }

    pub fn from_slice(vertices: &[VertexAdaptor]) -> Self {
        ContigGraphPath { vertices: vertices.to_vec() }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn append(&mut self, next: VertexAdaptor) {
        self.vertices.push(next);
    }

    pub fn front(&self) -> Option<VertexAdaptor> {
        self.vertices.first().copied()
    }

    pub fn back(&self) -> Option<VertexAdaptor> {
        self.vertices.last().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &VertexAdaptor> {
        self.vertices.iter()
    }

    pub fn as_slice(&self) -> &[VertexAdaptor] {
        &self.vertices
    }

    /// Next vertex would close the walk back onto its first vertex
    pub fn is_loop(&self, next: VertexAdaptor) -> bool {
        self.front().map_or(false, |front| front.id() == next.id())
    }

    /// Next vertex is the current tail again, read on some strand
    pub fn is_palindrome_loop(&self, next: VertexAdaptor) -> bool {
        self.back().map_or(false, |back| back.id() == next.id())
    }

    pub fn contains_vertex(&self, adaptor: VertexAdaptor) -> bool {
        self.vertices.iter().any(|v| v.id() == adaptor.id())
    }

    /// The same walk read from the opposite strand
    pub fn reverse_complement(&mut self) {
        self.vertices.reverse();
        for v in self.vertices.iter_mut() {
            *v = v.reverse_complement();
        }
    }

    /// Bases covered by the walk once k-1 overlaps are removed
    pub fn sequence_length(&self, graph: &ContigGraph) -> usize {
        let overlap = graph.kmer_size() - 1;
        let total: usize = self.vertices.iter().map(|&v| graph.contig_size(v)).sum();
        total - overlap * self.vertices.len().saturating_sub(1)
    }

    /// Concatenate the walk into one contig. K-mer counts add up, the
    /// in-edges come from the first vertex and the out-edges from the last.
    pub fn assemble(&self, graph: &ContigGraph) -> (Sequence, ContigInfo) {
        let overlap = graph.kmer_size() - 1;
        let mut contig = Sequence::new();
        let mut info = ContigInfo { kmer_size: graph.kmer_size() as u32, ..Default::default() };

        for (i, &v) in self.vertices.iter().enumerate() {
            let seq = graph.contig(v);
            if i == 0 {
                contig = seq;
            } else {
                contig.append_overlapping(&seq, overlap);
            }
            info.kmer_count += graph.kmer_count(v);
        }

        if let (Some(front), Some(back)) = (self.front(), self.back()) {
            info.in_edges = graph.in_edges(front);
            info.out_edges = graph.out_edges(back);
        }
        (contig, info)
    }
}
