use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "raptor-graph", version, about = "Contig graph construction and simplification", long_about = None)]
pub struct Cli {
    /// Log per-pass detail
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a contig graph and run the simplification passes
    Simplify {
        /// Input contigs FASTA(.gz)
        #[arg(short, long)]
        input: String,

        /// Output FASTA(.gz) file
        #[arg(short, long)]
        output: String,

        /// Also write the simplified graph as GFA
        #[arg(long)]
        gfa: Option<String>,

        /// JSON file with simplification settings; overrides the flags below
        #[arg(long)]
        config: Option<String>,

        /// K-mer size the contigs overlap by (plus one)
        #[arg(short, long, default_value_t = 31)]
        k: usize,

        /// Tips and low coverage vertices must be shorter than this
        #[arg(long, default_value_t = 62)]
        min_length: usize,

        /// Starting coverage threshold
        #[arg(long, default_value_t = 1.0)]
        min_cover: f64,

        /// Coverage threshold ceiling
        #[arg(long, default_value_t = 10.0)]
        max_cover: f64,

        /// Growth factor of the coverage threshold
        #[arg(long, default_value_t = 1.4)]
        factor: f64,

        /// Relative coverage below which local or component pruning removes a vertex
        #[arg(long, default_value_t = 0.5)]
        ratio: f64,

        /// Components above this many vertices skip component pruning
        #[arg(long, default_value_t = 30)]
        max_component_size: usize,

        /// Minimum output contig length
        #[arg(long, default_value_t = 200)]
        min_contig: usize,

        /// Skip bubble removal
        #[arg(long)]
        no_bubbles: bool,

        /// Split branch points whose branches never reconverge
        #[arg(long)]
        split_branches: bool,

        /// Number of threads
        #[arg(long, default_value_t = num_cpus::get())]
        threads: usize,
    },

    /// Report graph statistics for a contig file
    Stats {
        /// Input contigs FASTA(.gz)
        #[arg(short, long)]
        input: String,

        #[arg(short, long, default_value_t = 31)]
        k: usize,

        /// Output format: text or json
        #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// List the connected components and their longest paths
    Components {
        /// Input contigs FASTA(.gz)
        #[arg(short, long)]
        input: String,

        #[arg(short, long, default_value_t = 31)]
        k: usize,

        /// Write each assemblable component's longest path to this FASTA
        #[arg(short, long)]
        output: Option<String>,
    },
}
