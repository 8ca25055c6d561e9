use thiserror::Error;

use crate::graph::vertex::VertexId;

/// Errors raised by the contig graph and the tooling around it.
///
/// Pruning passes that find nothing to remove do not error; they report
/// `0` or `false`.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("k-mer size {k} is out of range (1..=32)")]
    InvalidKmerSize { k: usize },

    #[error("{contigs} contigs supplied with {infos} contig infos")]
    LengthMismatch { contigs: usize, infos: usize },

    #[error("contig {index} has length {length}, shorter than the k-mer size {k}")]
    ContigTooShort { index: usize, length: usize, k: usize },

    #[error("invalid base {base:?} at position {position}")]
    InvalidBase { base: char, position: usize },

    #[error("edge {base} of vertex {vertex} has no destination")]
    EdgeWithoutDestination { vertex: VertexId, base: u8 },

    #[error("edge {base} of vertex {vertex} has no mirrored edge")]
    AsymmetricEdge { vertex: VertexId, base: u8 },

    #[error("begin k-mer of vertex {vertex} does not resolve back to it")]
    IndexMismatch { vertex: VertexId },

    #[error("component containing vertex {vertex} has a cycle")]
    CyclicComponent { vertex: VertexId },

    #[error("component has no unique source and sink")]
    AmbiguousComponent,

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GraphError>;
