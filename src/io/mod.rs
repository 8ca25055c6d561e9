//! I/O module - FASTA contigs in, FASTA and GFA out

pub mod fasta;
pub mod gfa;
