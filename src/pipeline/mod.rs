//! Pipeline module - simplification runs over contig files

pub mod simplify;
