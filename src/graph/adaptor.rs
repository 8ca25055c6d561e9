use crate::graph::vertex::VertexId;

/// A strand-oriented view of a vertex: vertex identity plus an orientation
/// bit, packed into a single `u64`.
///
/// The adaptor never owns the vertex. All reads go through the graph
/// (`ContigGraph::contig`, `ContigGraph::out_edges`, ...), which branches on
/// the orientation; flipping never touches the stored vertex. An adaptor is
/// only meaningful until the next structural mutation of the graph (merge,
/// trim, refresh), after which identities may have been reassigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct VertexAdaptor(u64);

impl VertexAdaptor {
    #[inline]
    pub fn new(id: VertexId, is_reverse: bool) -> Self {
        VertexAdaptor(((id.0 as u64) << 1) | is_reverse as u64)
    }

    #[inline]
    pub fn forward(id: VertexId) -> Self {
        Self::new(id, false)
    }

    #[inline]
    pub fn id(self) -> VertexId {
        VertexId((self.0 >> 1) as u32)
    }

    #[inline]
    pub fn is_reverse(self) -> bool {
        self.0 & 1 != 0
    }

    /// The same vertex read from the opposite strand
    #[inline]
    pub fn reverse_complement(self) -> Self {
        VertexAdaptor(self.0 ^ 1)
    }

    #[inline]
    pub fn as_integer(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for VertexAdaptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.id(), if self.is_reverse() { '-' } else { '+' })
    }
}
