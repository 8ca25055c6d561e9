use std::fs;
use std::io::Write;

use flate2::write::GzEncoder;
use flate2::Compression;
use raptor_graph::io::fasta::{open_fasta, read_contigs, read_records};
use raptor_graph::pipeline::simplify::{run_simplify, SimplifyConfig};
use tempfile::tempdir;

const TIP7: [&str; 3] = ["AAAAAAAGGCCCATACCAAG", "CAAGAGGTAGTAGTCTCAGAATCT", "CAAGTGC"];
const ISOLATED: &str = "CGAGGAGAGGGT";

fn input_fasta() -> String {
    format!(
        ">a kmer_count_400\n{}\n>b kmer_count_400\n{}\n>tip kmer_count_3\n{}\n>lone\n{}\n>short\nACG\n",
        TIP7[0], TIP7[1], TIP7[2], ISOLATED
    )
}

fn config() -> SimplifyConfig {
    SimplifyConfig { k: 5, min_length: 8, min_contig: 10, ..Default::default() }
}

#[test]
fn test_read_contigs_skips_short_records() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("contigs.fa");
    fs::write(&path, input_fasta()).unwrap();

    let (contigs, infos) = read_contigs(path.to_str().unwrap(), 5).unwrap();
    assert_eq!(contigs.len(), 4);
    assert_eq!(infos[0].kmer_count, 400);
    // no count in the header: coverage 1
    assert_eq!(infos[3].kmer_count, (ISOLATED.len() - 4) as u64);
}

#[test]
fn test_read_contigs_rejects_invalid_base() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.fa");
    fs::write(&path, ">x\nACGTNACGT\n").unwrap();
    assert!(read_contigs(path.to_str().unwrap(), 5).is_err());
}

#[test]
fn test_run_simplify_writes_fasta_and_gfa() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("contigs.fa.gz");
    let mut encoder = GzEncoder::new(fs::File::create(&input).unwrap(), Compression::default());
    encoder.write_all(input_fasta().as_bytes()).unwrap();
    encoder.finish().unwrap();

    let output = dir.path().join("simplified.fa");
    let gfa = dir.path().join("simplified.gfa");
    let stats = run_simplify(
        input.to_str().unwrap(),
        output.to_str().unwrap(),
        gfa.to_str(),
        &config(),
    )
    .unwrap();

    assert_eq!(stats.input_contigs, 4);
    assert_eq!(stats.dead_ends, 1);
    assert_eq!(stats.output_contigs, 2);

    let records = read_records(open_fasta(output.to_str().unwrap()).unwrap()).unwrap();
    let mut sequences: Vec<String> = records.iter().map(|(_, s)| s.clone()).collect();
    sequences.sort();
    let merged = format!("{}{}", TIP7[0], &TIP7[1][4..]);
    let mut expected = vec![merged, ISOLATED.to_string()];
    expected.sort();
    assert_eq!(sequences, expected);
    assert!(records.iter().all(|(h, _)| h.contains("kmer_count_")));

    let text = fs::read_to_string(&gfa).unwrap();
    assert_eq!(text.lines().filter(|l| l.starts_with('S')).count(), 2);
    assert_eq!(text.lines().filter(|l| l.starts_with('L')).count(), 0);
}

#[test]
fn test_simplified_output_reloads_with_same_counts() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("contigs.fa");
    fs::write(&input, input_fasta()).unwrap();
    let output = dir.path().join("out.fa.gz");

    run_simplify(input.to_str().unwrap(), output.to_str().unwrap(), None, &config()).unwrap();

    let (contigs, infos) = read_contigs(output.to_str().unwrap(), 5).unwrap();
    assert_eq!(contigs.len(), 2);
    let total: u64 = infos.iter().map(|i| i.kmer_count).sum();
    // merged 800 plus the isolated contig's default count of 8
    assert_eq!(total, 808);
}

#[test]
fn test_config_from_json_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{"k": 5, "min_contig": 10, "remove_bubbles": false}"#).unwrap();
    let config = SimplifyConfig::from_json_file(path.to_str().unwrap()).unwrap();
    assert_eq!(config.k, 5);
    assert!(!config.remove_bubbles);
    assert_eq!(config.factor, 1.4);

    fs::write(&path, "{not json").unwrap();
    assert!(SimplifyConfig::from_json_file(path.to_str().unwrap()).is_err());
}
