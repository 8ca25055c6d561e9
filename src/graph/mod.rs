//! Contig graph module - vertex model, index and simplification passes

pub mod adaptor;
pub mod components;
pub mod contig_graph;
pub mod contig_info;
pub mod coverage;
pub mod path;
pub mod simplify;
pub mod stats;
pub mod vertex;

pub use adaptor::VertexAdaptor;
pub use contig_graph::{ContigGraph, GraphConfig};
pub use contig_info::{Contig, ContigInfo};
pub use path::ContigGraphPath;
