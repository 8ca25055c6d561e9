mod cli_main;

use clap::Parser;
use rayon::ThreadPoolBuilder;
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

use cli_main::{Cli, Commands};
use raptor_graph::graph::stats::GraphStats;
use raptor_graph::graph::ContigGraph;
use raptor_graph::io::fasta::{read_contigs, FastaWriter};
use raptor_graph::pipeline::simplify::{run_simplify, SimplifyConfig};
use raptor_graph::{GraphError, Result};

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Setting tracing default failed: {}", e);
    }

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Simplify {
            input,
            output,
            gfa,
            config,
            k,
            min_length,
            min_cover,
            max_cover,
            factor,
            ratio,
            max_component_size,
            min_contig,
            no_bubbles,
            split_branches,
            threads,
        } => {
            if let Err(e) = ThreadPoolBuilder::new().num_threads(threads).build_global() {
                warn!("Failed to build thread pool: {}", e);
            }

            let config = match config {
                Some(path) => SimplifyConfig::from_json_file(&path)?,
                None => SimplifyConfig {
                    k,
                    min_length,
                    min_cover,
                    max_cover,
                    factor,
                    ratio,
                    max_component_size,
                    min_contig,
                    remove_bubbles: !no_bubbles,
                    split_branches,
                    ..Default::default()
                },
            };
            info!("Simplifying {} with k={}", input, config.k);
            let stats = run_simplify(&input, &output, gfa.as_deref(), &config)?;
            println!("{}", stats);
        }

        Commands::Stats { input, k, format } => {
            info!("Calculating graph statistics for: {}", input);
            let (contigs, infos) = read_contigs(&input, k)?;
            let mut graph = ContigGraph::new(k)?;
            graph.initialize(&contigs, &infos)?;
            let stats = GraphStats::from_graph(&graph);

            match format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&stats)?),
                "text" => println!("{}", stats),
                _ => {
                    return Err(GraphError::InvalidParameter(format!(
                        "unsupported format: {}",
                        format
                    )))
                }
            }
        }

        Commands::Components { input, k, output } => {
            let (contigs, infos) = read_contigs(&input, k)?;
            let mut graph = ContigGraph::new(k)?;
            graph.initialize(&contigs, &infos)?;
            let components = graph.get_components();

            let mut writer = output.as_deref().map(FastaWriter::new).transpose()?;
            for (i, component) in components.iter().enumerate() {
                let length = component.sequence.as_ref().map_or(0, |s| s.len());
                println!(
                    "component_{}\t{} vertices\t{} bp\t{}",
                    i,
                    component.len(),
                    length,
                    component.description
                );
                if let (Some(writer), Some(sequence)) = (writer.as_mut(), &component.sequence) {
                    writer.write_record(&format!("component_{} length_{}", i, length), &sequence.to_string())?;
                }
            }
            if let Some(writer) = writer {
                writer.finish()?;
            }
            info!("Found {} components", components.len());
        }
    }
    Ok(())
}
