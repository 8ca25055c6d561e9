// src/io/fasta.rs
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use flate2::write::GzEncoder;
use flate2::read::MultiGzDecoder;
use flate2::Compression;
use tracing::{debug, warn};

use crate::error::Result;
use crate::graph::contig_info::{Contig, ContigInfo};
use crate::kmer::sequence::Sequence;

pub enum FastaWriter {
    Plain(BufWriter<File>),
    Compressed(BufWriter<GzEncoder<File>>),
}

/// Open a FASTA file for reading, handles gzipped files automatically
pub fn open_fasta(path: &str) -> io::Result<Box<dyn BufRead>> {
    let file = File::open(path)?;
    if path.ends_with(".gz") {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Raw (header, sequence) records of a FASTA stream, multi-line sequences joined
pub fn read_records<R: BufRead>(reader: R) -> io::Result<Vec<(String, String)>> {
    let mut records = Vec::new();
    let mut header: Option<String> = None;
    let mut sequence = String::new();

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if let Some(rest) = line.strip_prefix('>') {
            if let Some(h) = header.take() {
                records.push((h, std::mem::take(&mut sequence)));
            }
            header = Some(rest.to_string());
        } else if header.is_some() {
            sequence.push_str(line);
        }
    }
    if let Some(h) = header {
        records.push((h, sequence));
    }
    Ok(records)
}

/// K-mer count recorded in a header, from a `kmer_count_N` field or
/// derived from a `cov_X` field. `None` when neither is present.
pub fn parse_kmer_count(header: &str, num_kmer: usize) -> Option<u64> {
    let fields = || header.split_whitespace();
    if let Some(count) = fields()
        .filter_map(|field| field.strip_prefix("kmer_count_"))
        .find_map(|count| count.parse::<u64>().ok())
    {
        return Some(count);
    }
    // also matches names like NODE_1_length_50_cov_3.2
    fields()
        .filter_map(|field| field.find("cov_").map(|i| &field[i + 4..]))
        .find_map(|cov| cov.parse::<f64>().ok())
        .map(|cov| (cov * num_kmer as f64).round() as u64)
}

/// Load contigs for a graph of k-mer size `k`. Records shorter than `k` are
/// skipped. Coverage defaults to 1 when the header carries none.
pub fn read_contigs(path: &str, k: usize) -> Result<(Vec<Sequence>, Vec<ContigInfo>)> {
    let records = read_records(open_fasta(path)?)?;
    let mut contigs = Vec::with_capacity(records.len());
    let mut infos = Vec::with_capacity(records.len());
    let mut skipped = 0;

    for (header, text) in records {
        let sequence: Sequence = text.to_ascii_uppercase().parse()?;
        if sequence.len() < k {
            skipped += 1;
            continue;
        }
        let num_kmer = sequence.len() - k + 1;
        let kmer_count = parse_kmer_count(&header, num_kmer).unwrap_or(num_kmer as u64);
        contigs.push(sequence);
        infos.push(ContigInfo::with_kmer_count(kmer_count));
    }

    if skipped > 0 {
        warn!("Skipped {} contigs shorter than k={} in {}", skipped, k, path);
    }
    debug!("Read {} contigs from {}", contigs.len(), path);
    Ok((contigs, infos))
}

impl FastaWriter {
    pub fn new(path: &str) -> io::Result<Self> {
        let file = File::create(path)?;
        if path.ends_with(".gz") {
            let encoder = GzEncoder::new(file, Compression::default());
            Ok(FastaWriter::Compressed(BufWriter::new(encoder)))
        } else {
            Ok(FastaWriter::Plain(BufWriter::new(file)))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            FastaWriter::Plain(writer) => writer,
            FastaWriter::Compressed(writer) => writer,
        }
    }

    pub fn write_record(&mut self, header: &str, sequence: &str) -> io::Result<()> {
        let writer = self.writer();
        writeln!(writer, ">{}", header)?;
        writeln!(writer, "{}", sequence)
    }

    pub fn write_contig(&mut self, contig: &Contig) -> io::Result<()> {
        let header = format!(
            "contig_{} length_{} kmer_count_{} cov_{:.2}",
            contig.id,
            contig.sequence.len(),
            contig.info.kmer_count,
            contig.coverage()
        );
        self.write_record(&header, &contig.sequence.to_string())
    }

    /// Flush buffered output; gzip streams are finished here
    pub fn finish(self) -> io::Result<()> {
        match self {
            FastaWriter::Plain(mut writer) => writer.flush(),
            FastaWriter::Compressed(writer) => {
                let encoder = writer.into_inner().map_err(|e| e.into_error())?;
                encoder.finish()?;
                Ok(())
            }
        }
    }
}
