//! K-mer processing module - packed k-mers and base sequences

pub mod kmer;
pub mod sequence;
