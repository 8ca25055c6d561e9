use std::fs::File;
use std::io::{self, BufWriter, Write};

use crate::graph::adaptor::VertexAdaptor;
use crate::graph::contig_graph::ContigGraph;

pub struct GfaWriter<W: Write> {
    writer: W,
}

impl GfaWriter<BufWriter<File>> {
    pub fn create(output_path: &str) -> io::Result<Self> {
        let file = File::create(output_path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

fn orientation(a: VertexAdaptor) -> char {
    if a.is_reverse() {
        '-'
    } else {
        '+'
    }
}

impl<W: Write> GfaWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Write the live vertices as segments and every edge once as a link.
    /// Segment `contig_i` is vertex `i`, read on its stored strand.
    pub fn write_graph(&mut self, graph: &ContigGraph) -> io::Result<()> {
        writeln!(self.writer, "H\tVN:Z:1.0")?;
        for a in graph.adaptors() {
            writeln!(
                self.writer,
                "S\tcontig_{}\t{}\tLN:i:{}\tKC:i:{}",
                a.id(),
                graph.contig(a),
                graph.contig_size(a),
                graph.kmer_count(a)
            )?;
        }

        let overlap = graph.kmer_size() - 1;
        for a in graph.adaptors() {
            for from in [a, a.reverse_complement()] {
                for to in graph.get_neighbors(from) {
                    // the same edge read from the other strand is skipped
                    let mirror = (to.reverse_complement(), from.reverse_complement());
                    if (from, to) > mirror {
                        continue;
                    }
                    writeln!(
                        self.writer,
                        "L\tcontig_{}\t{}\tcontig_{}\t{}\t{}M",
                        from.id(),
                        orientation(from),
                        to.id(),
                        orientation(to),
                        overlap
                    )?;
                }
            }
        }
        self.writer.flush()
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
