//! Coverage-driven pruning. Every pass compares a vertex's coverage against
//! a threshold (global, local neighbourhood, or component mean) and removes
//! short vertices that fall below it.

use ahash::AHashSet;
use std::collections::VecDeque;
use tracing::{debug, info};

use crate::error::{GraphError, Result};
use crate::graph::adaptor::VertexAdaptor;
use crate::graph::contig_graph::ContigGraph;

impl ContigGraph {
    /// Short vertices that are either simple (at most one edge each way) or
    /// dangling. Palindromic k-mers are never removed.
    fn is_low_coverage_candidate(&self, a: VertexAdaptor, min_length: usize) -> bool {
        if self.contig_size(a) >= min_length || self.is_palindrome_kmer(a) {
            return false;
        }
        let (ins, outs) = (self.in_edges(a).size(), self.out_edges(a).size());
        (ins <= 1 && outs <= 1) || ins == 0 || outs == 0
    }

    fn remove_vertices(&mut self, doomed: &[VertexAdaptor]) {
        for &a in doomed {
            self.kill_vertex(a);
        }
        self.refresh();
        self.merge_simple_paths();
    }

    /// Remove short vertices whose coverage is below `min_cover`, merging
    /// after each round until nothing more qualifies. Returns whether
    /// anything was removed.
    pub fn remove_low_coverage(&mut self, min_cover: f64, min_length: usize) -> bool {
        let mut total = 0;
        loop {
            let doomed: Vec<VertexAdaptor> = self
                .adaptors()
                .filter(|&a| self.is_low_coverage_candidate(a, min_length))
                .filter(|&a| self.coverage(a) < min_cover)
                .collect();
            if doomed.is_empty() {
                break;
            }
            total += doomed.len();
            self.remove_vertices(&doomed);
        }
        if total > 0 {
            info!(
                "Removed {} low coverage vertices (cover < {:.2}, length < {})",
                total, min_cover, min_length
            );
        }
        total > 0
    }

    /// Remove short vertices whose coverage is low relative to their
    /// neighbourhood: below `max(min_cover, ratio * local coverage)`.
    pub fn remove_local_low_coverage(&mut self, min_cover: f64, min_length: usize, ratio: f64) -> bool {
        let region_length = self.config.region_length;
        let doomed: Vec<VertexAdaptor> = self
            .adaptors()
            .filter(|&a| self.is_low_coverage_candidate(a, min_length))
            .filter(|&a| {
                let threshold = min_cover.max(self.local_coverage(a, region_length) * ratio);
                self.coverage(a) < threshold
            })
            .collect();

        if doomed.is_empty() {
            return false;
        }
        let removed = doomed.len();
        self.remove_vertices(&doomed);
        info!("Removed {} locally low coverage vertices (ratio {:.2})", removed, ratio);
        true
    }

    /// As `remove_local_low_coverage`, but the reference coverage is the
    /// mean over the vertex's connected component. Components larger than
    /// `max_component_size` vertices are left alone.
    pub fn remove_component_low_coverage(
        &mut self,
        min_cover: f64,
        min_length: usize,
        ratio: f64,
        max_component_size: usize,
    ) -> bool {
        let mut seen = AHashSet::new();
        let mut doomed = Vec::new();

        for start in self.adaptors() {
            if !seen.insert(start.id()) {
                continue;
            }
            let component = self.collect_component(start);
            seen.extend(component.iter().map(|a| a.id()));
            if component.len() > max_component_size {
                continue;
            }

            let count: u64 = component.iter().map(|&a| self.kmer_count(a)).sum();
            let kmers: usize = component.iter().map(|&a| self.num_kmer(a)).sum();
            let mean = count as f64 / kmers as f64;
            let threshold = min_cover.max(mean * ratio);

            doomed.extend(
                component
                    .iter()
                    .copied()
                    .filter(|&a| self.is_low_coverage_candidate(a, min_length))
                    .filter(|&a| self.coverage(a) < threshold),
            );
        }

        if doomed.is_empty() {
            return false;
        }
        let removed = doomed.len();
        self.remove_vertices(&doomed);
        info!("Removed {} component low coverage vertices", removed);
        true
    }

    /// Mean coverage of the region around `current` on both strands,
    /// excluding `current` itself. Zero when the vertex is isolated.
    pub fn local_coverage(&self, current: VertexAdaptor, region_length: usize) -> f64 {
        let mut num_count = 0.0;
        let mut num_kmer = 0;
        self.local_coverage_single(current, region_length, &mut num_count, &mut num_kmer);
        self.local_coverage_single(current.reverse_complement(), region_length, &mut num_count, &mut num_kmer);
        if num_kmer == 0 {
            0.0
        } else {
            num_count / num_kmer as f64
        }
    }

    /// Breadth-first walk forward from `current` for up to `region_length`
    /// bases past its end, adding visited k-mer counts to `num_count` and k-mers to
    /// `num_kmer`. Returns the coverage of this side alone.
    pub fn local_coverage_single(
        &self,
        current: VertexAdaptor,
        region_length: usize,
        num_count: &mut f64,
        num_kmer: &mut usize,
    ) -> f64 {
        let mut side_count = 0.0;
        let mut side_kmer = 0usize;
        let mut visited = AHashSet::new();
        let mut queue = VecDeque::new();
        let overlap = self.kmer_size() - 1;
        visited.insert(current.id());
        queue.push_back((current, 0usize));

        while let Some((node, distance)) = queue.pop_front() {
            if distance >= region_length {
                continue;
            }
            for next in self.get_neighbors(node) {
                if visited.len() > self.config.local_max_vertices {
                    break;
                }
                if !visited.insert(next.id()) {
                    continue;
                }
                side_count += self.kmer_count(next) as f64;
                side_kmer += self.num_kmer(next);
                queue.push_back((next, distance + self.contig_size(next) - overlap));
            }
        }

        *num_count += side_count;
        *num_kmer += side_kmer;
        if side_kmer == 0 {
            0.0
        } else {
            side_count / side_kmer as f64
        }
    }

    /// Run `remove_low_coverage` with a threshold that starts at
    /// `min_cover` and grows by `factor` while it stays below `max_cover`.
    /// `min_cover` is always applied. Returns the last threshold applied.
    pub fn iterate_coverage(
        &mut self,
        min_length: usize,
        min_cover: f64,
        max_cover: f64,
        factor: f64,
    ) -> Result<f64> {
        if !(factor > 1.0) {
            return Err(GraphError::InvalidParameter(format!(
                "coverage factor must be greater than 1, got {}",
                factor
            )));
        }
        if !(min_cover > 0.0) {
            return Err(GraphError::InvalidParameter(format!(
                "minimum coverage must be positive, got {}",
                min_cover
            )));
        }

        if max_cover < min_cover {
            return Err(GraphError::InvalidParameter(format!(
                "maximum coverage {} is below minimum coverage {}",
                max_cover, min_cover
            )));
        }

        let mut cover = min_cover;
        let applied = loop {
            let changed = self.remove_low_coverage(cover, min_length);
            debug!("Coverage threshold {:.2}: changed = {}", cover, changed);
            let next = cover * factor;
            if next >= max_cover {
                break cover;
            }
            cover = next;
        };
        info!("Iterated coverage up to {:.2}", applied);
        Ok(applied)
    }
}
