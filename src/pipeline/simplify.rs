use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::time::Instant;
use tracing::{info, warn};

use crate::error::Result;
use crate::graph::contig_graph::{ContigGraph, GraphConfig};
use crate::graph::contig_info::{Contig, ContigInfo};
use crate::graph::stats::GraphStats;
use crate::io::fasta::{read_contigs, FastaWriter};
use crate::io::gfa::GfaWriter;
use crate::kmer::sequence::Sequence;

/// Thresholds for one simplification run
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SimplifyConfig {
    pub k: usize,
    /// Tips and low coverage vertices must be shorter than this
    pub min_length: usize,
    pub min_cover: f64,
    pub max_cover: f64,
    /// Growth of the coverage threshold between rounds
    pub factor: f64,
    /// Fraction of the local or component coverage below which a vertex is dropped
    pub ratio: f64,
    pub max_component_size: usize,
    /// Output contigs shorter than this are not written
    pub min_contig: usize,
    pub remove_bubbles: bool,
    pub split_branches: bool,
    pub graph: GraphConfig,
}

impl Default for SimplifyConfig {
    fn default() -> Self {
        Self {
            k: 31,
            min_length: 62,
            min_cover: 1.0,
            max_cover: 10.0,
            factor: 1.4,
            ratio: 0.5,
            max_component_size: 30,
            min_contig: 200,
            remove_bubbles: true,
            split_branches: false,
            graph: GraphConfig::default(),
        }
    }
}

impl SimplifyConfig {
    pub fn from_json_file(path: &str) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// What each pass of a run did
#[derive(Debug, Clone, Default, Serialize)]
pub struct SimplifyStats {
    pub input_contigs: usize,
    pub merged_paths: usize,
    pub dead_ends: usize,
    pub bubbles: usize,
    pub final_cover: f64,
    pub local_pruned: bool,
    pub component_pruned: bool,
    pub branches_split: usize,
    pub output_contigs: usize,
    pub filtered_short: usize,
    pub graph: GraphStats,
}

impl fmt::Display for SimplifyStats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Simplification Summary:")?;
        writeln!(f, "  Input contigs:        {}", self.input_contigs)?;
        writeln!(f, "  Simple paths merged:  {}", self.merged_paths)?;
        writeln!(f, "  Dead ends removed:    {}", self.dead_ends)?;
        writeln!(f, "  Bubbles popped:       {}", self.bubbles)?;
        writeln!(f, "  Final coverage cut:   {:.2}", self.final_cover)?;
        writeln!(f, "  Local pruning:        {}", self.local_pruned)?;
        writeln!(f, "  Component pruning:    {}", self.component_pruned)?;
        writeln!(f, "  Branches split:       {}", self.branches_split)?;
        writeln!(f, "  Output contigs:       {}", self.output_contigs)?;
        writeln!(f, "  Filtered (short):     {}", self.filtered_short)?;
        write!(f, "{}", self.graph)
    }
}

/// Build a graph from the contigs, run every simplification pass in order
/// and return the surviving contigs that reach `min_contig` bases.
pub fn simplify_contigs(
    contigs: &[Sequence],
    infos: &[ContigInfo],
    config: &SimplifyConfig,
) -> Result<(Vec<Contig>, SimplifyStats)> {
    let mut graph = ContigGraph::with_config(config.k, config.graph.clone())?;
    graph.initialize(contigs, infos)?;

    let mut stats = SimplifyStats { input_contigs: contigs.len(), ..Default::default() };
    stats.merged_paths = graph.merge_simple_paths();
    stats.dead_ends = graph.remove_dead_end(config.min_length);

    if config.remove_bubbles {
        stats.bubbles = graph.remove_bubble();
    }

    stats.final_cover =
        graph.iterate_coverage(config.min_length, config.min_cover, config.max_cover, config.factor)?;
    stats.local_pruned = graph.remove_local_low_coverage(config.min_cover, config.min_length, config.ratio);
    stats.component_pruned = graph.remove_component_low_coverage(
        config.min_cover,
        config.min_length,
        config.ratio,
        config.max_component_size,
    );

    if config.split_branches {
        stats.branches_split = graph.split_branches();
    }
    stats.merged_paths += graph.merge_simple_paths();
    stats.graph = GraphStats::from_graph(&graph);

    if config.min_contig < config.k {
        warn!(
            "Minimum contig length {} is below k={}, every contig passes the filter",
            config.min_contig, config.k
        );
    }
    let mut output: Vec<Contig> = graph
        .assemble()
        .into_iter()
        .filter(|c| c.sequence.len() >= config.min_contig)
        .collect();
    for (id, contig) in output.iter_mut().enumerate() {
        contig.id = id;
    }
    stats.output_contigs = output.len();
    stats.filtered_short = stats.graph.vertices - output.len();

    info!(
        "Simplified {} contigs into {} (N50 {} bp)",
        stats.input_contigs, stats.output_contigs, stats.graph.n50
    );
    Ok((output, stats))
}

/// Read contigs from `input`, simplify them and write FASTA to `output`.
/// When `gfa_output` is set the simplified graph is also written as GFA.
pub fn run_simplify(
    input: &str,
    output: &str,
    gfa_output: Option<&str>,
    config: &SimplifyConfig,
) -> Result<SimplifyStats> {
    let start = Instant::now();
    let (contigs, infos) = read_contigs(input, config.k)?;
    info!("Loaded {} contigs from {}", contigs.len(), input);

    let (simplified, stats) = simplify_contigs(&contigs, &infos, config)?;

    let mut writer = FastaWriter::new(output)?;
    for contig in &simplified {
        writer.write_contig(contig)?;
    }
    writer.finish()?;
    info!("Wrote {} contigs to {}", simplified.len(), output);

    if let Some(path) = gfa_output {
        let (sequences, infos): (Vec<Sequence>, Vec<ContigInfo>) =
            simplified.into_iter().map(|c| (c.sequence, c.info)).unzip();
        let mut graph = ContigGraph::with_config(config.k, config.graph.clone())?;
        graph.initialize(&sequences, &infos)?;
        GfaWriter::create(path)?.write_graph(&graph)?;
        info!("Wrote contig graph to {}", path);
    }

    info!("Simplification finished in {:.2}s", start.elapsed().as_secs_f32());
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_fill_missing_fields() {
        let config: SimplifyConfig = serde_json::from_str(r#"{"k": 21, "graph": {"bubble_max_steps": 7}}"#).unwrap();
        assert_eq!(config.k, 21);
        assert_eq!(config.min_length, 62);
        assert_eq!(config.graph.bubble_max_steps, 7);
        assert_eq!(config.graph.region_length, 1000);
    }

    #[test]
    fn test_simplify_removes_tip_and_merges() {
        let texts = ["AAAAAAAGGCCCATACCAAG", "CAAGAGGTAGTAGTCTCAGAATCT", "CAAGTGC"];
        let contigs: Vec<Sequence> = texts.iter().map(|s| s.parse().unwrap()).collect();
        let infos = vec![
            ContigInfo::with_kmer_count(400),
            ContigInfo::with_kmer_count(400),
            ContigInfo::with_kmer_count(3),
        ];
        let config = SimplifyConfig {
            k: 5,
            min_length: 8,
            min_contig: 10,
            ..Default::default()
        };
        let (output, stats) = simplify_contigs(&contigs, &infos, &config).unwrap();
        assert_eq!(output.len(), 1);
        assert_eq!(output[0].sequence.len(), 40);
        assert_eq!(stats.dead_ends, 1);
        assert_eq!(stats.filtered_short, 0);
    }
}
