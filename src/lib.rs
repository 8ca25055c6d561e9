//! Strand-symmetric contig graph for de novo assembly.
//!
//! Contigs enter through [`graph::ContigGraph::initialize`], are simplified
//! in place by the passes in [`graph`], and leave through
//! [`graph::ContigGraph::assemble`]. [`pipeline`] strings the passes
//! together the way the command line tool runs them.

pub mod error;
pub mod graph;
pub mod io;
pub mod kmer;
pub mod pipeline;

pub use error::{GraphError, Result};
