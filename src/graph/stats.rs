use serde::Serialize;
use std::fmt;

use crate::graph::contig_graph::ContigGraph;

/// Summary of a contig graph
#[derive(Debug, Clone, Default, Serialize)]
pub struct GraphStats {
    pub vertices: usize,
    pub edges: u64,
    pub total_length: usize,
    pub n50: usize,
    pub largest: usize,
    pub mean_coverage: f64,
}

impl GraphStats {
    pub fn from_graph(graph: &ContigGraph) -> Self {
        let mut lengths: Vec<usize> = graph.adaptors().map(|a| graph.contig_size(a)).collect();
        let total_length = lengths.iter().sum();

        let kmer_count: u64 = graph.adaptors().map(|a| graph.kmer_count(a)).sum();
        let num_kmer: usize = graph.adaptors().map(|a| graph.num_kmer(a)).sum();
        let mean_coverage = if num_kmer > 0 {
            kmer_count as f64 / num_kmer as f64
        } else {
            0.0
        };

        lengths.sort_unstable_by(|a, b| b.cmp(a));
        GraphStats {
            vertices: lengths.len(),
            edges: graph.num_edges(),
            total_length,
            n50: n50(&lengths, total_length),
            largest: lengths.first().copied().unwrap_or(0),
            mean_coverage,
        }
    }
}

/// N50 of lengths sorted in descending order
fn n50(sorted_desc: &[usize], total: usize) -> usize {
    let mut acc = 0;
    sorted_desc
        .iter()
        .find(|&&len| {
            acc += len;
            acc * 2 >= total
        })
        .copied()
        .unwrap_or(0)
}

impl fmt::Display for GraphStats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Contig Graph Statistics:")?;
        writeln!(f, "  Vertices:       {}", self.vertices)?;
        writeln!(f, "  Edges:          {}", self.edges)?;
        writeln!(f, "  Total length:   {} bp", self.total_length)?;
        writeln!(f, "  N50:            {} bp", self.n50)?;
        writeln!(f, "  Largest contig: {} bp", self.largest)?;
        write!(f, "  Mean coverage:  {:.2}", self.mean_coverage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::contig_graph::tests::build;

    #[test]
    fn test_n50() {
        assert_eq!(n50(&[10, 8, 5, 2], 25), 8);
        assert_eq!(n50(&[], 0), 0);
    }

    #[test]
    fn test_stats_of_chain() {
        let graph = build(3, &[("ACCC", 2), ("CCAG", 4), ("AGA", 1)]);
        let stats = GraphStats::from_graph(&graph);
        assert_eq!(stats.vertices, 3);
        assert_eq!(stats.edges, 2);
        assert_eq!(stats.total_length, 11);
        assert_eq!(stats.largest, 4);
        assert_eq!(stats.n50, 4);
        // 7 counts over 2 + 2 + 1 k-mers
        assert!((stats.mean_coverage - 1.4).abs() < 1e-9);
        assert!(stats.to_string().contains("N50:            4 bp"));
    }
}
