//! Contig graph: a compacted de Bruijn graph whose vertices are contigs and
//! whose edges are one-base extensions between them.
//!
//! Every vertex is stored once, in forward orientation. Algorithms read it
//! through a `VertexAdaptor`, so a walk on one strand is automatically
//! mirrored on the other. Edges are not stored as objects: bit `x` in an
//! adaptor's out-edge set means the adaptor's last k-1 bases followed by `x`
//! form the begin k-mer of some other adaptor, which is resolved through the
//! begin-k-mer index.

use ahash::AHashMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{GraphError, Result};
use crate::graph::adaptor::VertexAdaptor;
use crate::graph::contig_info::{Contig, ContigInfo};
use crate::graph::path::ContigGraphPath;
use crate::graph::vertex::{EdgeSet, Vertex, VertexId, VertexStatus};
use crate::kmer::kmer::{complement, KmerU64, MAX_KMER_SIZE};
use crate::kmer::sequence::Sequence;

/// Tunables for the traversal-based passes
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Radius in bases of the local coverage and convergence walks
    pub region_length: usize,
    /// Maximum vertices visited by one local coverage walk
    pub local_max_vertices: usize,
    /// Minimum similarity for two branches to count as one bubble
    pub bubble_similarity: f64,
    /// Step budget for one alternate-path search
    pub bubble_max_steps: usize,
    /// Extra bases an alternate path may carry over the branch it replaces
    pub bubble_length_slack: usize,
    /// Maximum vertices explored per branch when testing convergence
    pub converge_max_vertices: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            region_length: 1000,
            local_max_vertices: 32,
            bubble_similarity: 0.9,
            bubble_max_steps: 100,
            bubble_length_slack: 10,
            converge_max_vertices: 64,
        }
    }
}

/// The contig graph. Exclusively owns its vertices; the begin-k-mer index is
/// a cache derived from them and is rebuilt whenever identities change.
pub struct ContigGraph {
    pub(crate) kmer_size: usize,
    pub(crate) vertices: Vec<Vertex>,
    begin_kmer_map: AHashMap<KmerU64, VertexId>,
    num_edges: u64,
    pub(crate) config: GraphConfig,
}

impl ContigGraph {
    pub fn new(kmer_size: usize) -> Result<Self> {
        Self::with_config(kmer_size, GraphConfig::default())
    }

    pub fn with_config(kmer_size: usize, config: GraphConfig) -> Result<Self> {
        if kmer_size == 0 || kmer_size > MAX_KMER_SIZE {
            return Err(GraphError::InvalidKmerSize { k: kmer_size });
        }
        Ok(Self {
            kmer_size,
            vertices: Vec::new(),
            begin_kmer_map: AHashMap::new(),
            num_edges: 0,
            config,
        })
    }

    /// Build a graph from contigs and their statistics.
    ///
    /// Every contig must be at least k bases long; the first one that is not
    /// aborts construction. Edges are derived by probing the index, not
    /// taken from the supplied infos.
    pub fn initialize(&mut self, contigs: &[Sequence], contig_infos: &[ContigInfo]) -> Result<()> {
        if contigs.len() != contig_infos.len() {
            return Err(GraphError::LengthMismatch {
                contigs: contigs.len(),
                infos: contig_infos.len(),
            });
        }
        if let Some((index, contig)) = contigs
            .iter()
            .enumerate()
            .find(|(_, c)| c.len() < self.kmer_size)
        {
            return Err(GraphError::ContigTooShort {
                index,
                length: contig.len(),
                k: self.kmer_size,
            });
        }

        self.clear();
        self.vertices = contigs
            .iter()
            .zip(contig_infos)
            .enumerate()
            .map(|(i, (contig, info))| {
                let info = ContigInfo {
                    kmer_size: self.kmer_size as u32,
                    kmer_count: info.kmer_count,
                    in_edges: EdgeSet::EMPTY,
                    out_edges: EdgeSet::EMPTY,
                };
                Vertex::new(VertexId::from(i), contig.clone(), info)
            })
            .collect();

        self.build_begin_kmer_map();
        self.rebuild_edges();
        info!(
            "Initialized contig graph: {} vertices, {} edges (k={})",
            self.vertices.len(),
            self.num_edges,
            self.kmer_size
        );
        Ok(())
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.begin_kmer_map.clear();
        self.num_edges = 0;
    }

    #[inline]
    pub fn kmer_size(&self) -> usize {
        self.kmer_size
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: GraphConfig) {
        self.config = config;
    }

    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn num_edges(&self) -> u64 {
        self.num_edges
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Forward adaptors of all live vertices
    pub fn adaptors(&self) -> impl Iterator<Item = VertexAdaptor> + '_ {
        self.vertices
            .iter()
            .filter(|v| !v.status().is_dead())
            .map(|v| VertexAdaptor::forward(v.id()))
    }

    // ---- adaptor views -------------------------------------------------

    #[inline]
    pub fn vertex(&self, a: VertexAdaptor) -> &Vertex {
        &self.vertices[a.id().index()]
    }

    #[inline]
    fn vertex_mut(&mut self, a: VertexAdaptor) -> &mut Vertex {
        &mut self.vertices[a.id().index()]
    }

    /// Contig as read on the adaptor's strand
    pub fn contig(&self, a: VertexAdaptor) -> Sequence {
        self.vertex(a).oriented_contig(a.is_reverse())
    }

    #[inline]
    pub fn contig_size(&self, a: VertexAdaptor) -> usize {
        self.vertex(a).contig_size()
    }

    #[inline]
    pub fn kmer_count(&self, a: VertexAdaptor) -> u64 {
        self.vertex(a).kmer_count()
    }

    #[inline]
    pub fn num_kmer(&self, a: VertexAdaptor) -> usize {
        self.vertex(a).num_kmer()
    }

    #[inline]
    pub fn coverage(&self, a: VertexAdaptor) -> f64 {
        self.vertex(a).coverage()
    }

    #[inline]
    pub fn out_edges(&self, a: VertexAdaptor) -> EdgeSet {
        self.vertex(a).out_edges(a.is_reverse())
    }

    #[inline]
    pub fn in_edges(&self, a: VertexAdaptor) -> EdgeSet {
        self.vertex(a).in_edges(a.is_reverse())
    }

    #[inline]
    fn out_edges_mut(&mut self, a: VertexAdaptor) -> &mut EdgeSet {
        self.vertex_mut(a).out_edges_mut(a.is_reverse())
    }

    #[inline]
    pub fn base_at(&self, a: VertexAdaptor, i: usize) -> u8 {
        self.vertex(a).base_at(i, a.is_reverse())
    }

    #[inline]
    pub fn begin_kmer(&self, a: VertexAdaptor) -> KmerU64 {
        self.vertex(a).begin_kmer(self.kmer_size, a.is_reverse())
    }

    #[inline]
    pub fn end_kmer(&self, a: VertexAdaptor) -> KmerU64 {
        self.vertex(a).end_kmer(self.kmer_size, a.is_reverse())
    }

    #[inline]
    pub fn status(&self, a: VertexAdaptor) -> VertexStatus {
        self.vertex(a).status()
    }

    #[inline]
    pub(crate) fn status_mut(&mut self, a: VertexAdaptor) -> &mut VertexStatus {
        self.vertex_mut(a).status_mut()
    }

    #[inline]
    pub fn is_dead(&self, a: VertexAdaptor) -> bool {
        self.status(a).is_dead()
    }

    #[inline]
    pub fn is_palindrome_kmer(&self, a: VertexAdaptor) -> bool {
        self.vertex(a).is_palindrome_kmer()
    }

    // ---- index -----------------------------------------------------------

    /// Register every live vertex under the canonical begin k-mer of both
    /// of its strands.
    pub fn build_begin_kmer_map(&mut self) {
        let k = self.kmer_size;
        let keys: Vec<(KmerU64, VertexId)> = self
            .vertices
            .par_iter()
            .filter(|v| !v.status().is_dead())
            .flat_map_iter(|v| {
                [false, true]
                    .into_iter()
                    .map(move |reverse| (v.begin_kmer(k, reverse).canonical(), v.id()))
            })
            .collect();

        let mut map = AHashMap::with_capacity(keys.len());
        let mut duplicates = 0usize;
        for (key, id) in keys {
            match map.get(&key) {
                Some(&existing) if existing != id => duplicates += 1,
                Some(_) => {}
                None => {
                    map.insert(key, id);
                }
            }
        }
        if duplicates > 0 {
            warn!("{} begin k-mers are shared by more than one vertex", duplicates);
        }
        self.begin_kmer_map = map;
    }

    /// Resolve the adaptor whose begin k-mer is exactly `begin_kmer`
    pub fn find_vertex_adaptor_by_begin_kmer(&self, begin_kmer: KmerU64) -> Option<VertexAdaptor> {
        let &id = self.begin_kmer_map.get(&begin_kmer.canonical())?;
        let current = VertexAdaptor::forward(id);
        if self.is_dead(current) {
            return None;
        }
        if self.begin_kmer(current) == begin_kmer {
            return Some(current);
        }
        let current = current.reverse_complement();
        if self.begin_kmer(current) == begin_kmer {
            return Some(current);
        }
        None
    }

    // ---- edges -------------------------------------------------------------

    /// The adaptor reached from `current` by extending with base `x`
    pub fn get_neighbor(&self, current: VertexAdaptor, x: u8) -> Option<VertexAdaptor> {
        let mut kmer = self.end_kmer(current);
        kmer.shift_append(x);
        self.find_vertex_adaptor_by_begin_kmer(kmer)
    }

    pub fn get_neighbors(&self, current: VertexAdaptor) -> Vec<VertexAdaptor> {
        self.out_edges(current)
            .iter()
            .filter_map(|x| self.get_neighbor(current, x))
            .collect()
    }

    /// Base that `current`'s reverse complement uses for its mirrored edge
    #[inline]
    fn mirror_base(&self, current: VertexAdaptor) -> u8 {
        complement(self.base_at(current, self.contig_size(current) - self.kmer_size))
    }

    /// Record `from -> to` on both strands
    pub fn add_edge(&mut self, from: VertexAdaptor, to: VertexAdaptor) {
        let k = self.kmer_size;
        let x = self.base_at(to, k - 1);
        self.out_edges_mut(from).add(x);

        let (from, to) = (to.reverse_complement(), from.reverse_complement());
        let y = self.base_at(to, k - 1);
        self.out_edges_mut(from).add(y);
    }

    /// Remove out-edge `x` of `current` and its mirror on the neighbour
    pub fn remove_edge(&mut self, current: VertexAdaptor, x: u8) {
        self.out_edges_mut(current).remove(x);
        if let Some(next) = self.get_neighbor(current, x) {
            let y = self.mirror_base(current);
            self.out_edges_mut(next.reverse_complement()).remove(y);
        }
    }

    /// Detach a vertex from all neighbours and mark it dead. The slot is
    /// reclaimed by the next `refresh_vertices`.
    pub fn kill_vertex(&mut self, a: VertexAdaptor) {
        for current in [a, a.reverse_complement()] {
            for x in self.out_edges(current).iter() {
                self.remove_edge(current, x);
            }
        }
        self.vertex_mut(a).kill();
    }

    /// Each edge is seen once from either end of its mirror pair; only the
    /// smaller reading is counted. A hairpin is its own mirror.
    fn count_edges(&self) -> u64 {
        let mut count = 0u64;
        for a in self.adaptors() {
            for from in [a, a.reverse_complement()] {
                for to in self.get_neighbors(from) {
                    if self.is_dead(to) {
                        continue;
                    }
                    if (from, to) <= (to.reverse_complement(), from.reverse_complement()) {
                        count += 1;
                    }
                }
            }
        }
        count
    }

    // ---- refresh -----------------------------------------------------------

    pub fn refresh(&mut self) {
        self.refresh_vertices();
        self.refresh_edges();
    }

    /// Drop dead vertices, compact the collection and rebuild the index.
    /// Any adaptor obtained before this call is invalid afterwards.
    pub fn refresh_vertices(&mut self) {
        let before = self.vertices.len();
        self.vertices.retain(|v| !v.status().is_dead());
        for (i, v) in self.vertices.iter_mut().enumerate() {
            v.set_id(VertexId::from(i));
        }
        self.build_begin_kmer_map();
        debug!("Refreshed vertices: {} -> {}", before, self.vertices.len());
    }

    /// Drop edges whose destination no longer exists and restore any
    /// missing mirror bits. Edges cut on purpose stay cut.
    pub fn refresh_edges(&mut self) {
        let mut dropped = 0usize;
        for i in 0..self.vertices.len() {
            for reverse in [false, true] {
                let current = VertexAdaptor::new(VertexId::from(i), reverse);
                for x in self.out_edges(current).iter() {
                    match self.get_neighbor(current, x) {
                        Some(next) => {
                            let y = self.mirror_base(current);
                            self.out_edges_mut(next.reverse_complement()).add(y);
                        }
                        None => {
                            self.out_edges_mut(current).remove(x);
                            dropped += 1;
                        }
                    }
                }
            }
        }
        self.num_edges = self.count_edges();
        if dropped > 0 {
            debug!("Dropped {} edges without destination", dropped);
        }
    }

    /// Recompute every edge set from scratch by probing the index with all
    /// four one-base extensions of each end k-mer.
    pub fn rebuild_edges(&mut self) {
        for v in self.vertices.iter_mut() {
            *v.out_edges_mut(false) = EdgeSet::EMPTY;
            *v.out_edges_mut(true) = EdgeSet::EMPTY;
        }
        for i in 0..self.vertices.len() {
            for reverse in [false, true] {
                let current = VertexAdaptor::new(VertexId::from(i), reverse);
                if self.is_dead(current) {
                    continue;
                }
                for x in 0..4u8 {
                    if let Some(next) = self.get_neighbor(current, x) {
                        self.add_edge(current, next);
                    }
                }
            }
        }
        self.num_edges = self.count_edges();
    }

    pub fn clear_status(&mut self) {
        for v in self.vertices.iter_mut() {
            v.status_mut().clear();
        }
    }

    // ---- path contraction ----------------------------------------------

    /// The unique successor of `current` if the edge between them is the
    /// only way out of `current` and the only way into the successor.
    pub(crate) fn get_next_vertex_adaptor(&self, current: VertexAdaptor) -> Option<VertexAdaptor> {
        let x = self.out_edges(current).single()?;
        let next = self.get_neighbor(current, x)?;
        if self.in_edges(next).size() == 1 && !self.is_palindrome_kmer(next) {
            Some(next)
        } else {
            None
        }
    }

    /// Contract every maximal non-branching walk into a single vertex.
    /// Returns the number of walks contracted.
    pub fn merge_simple_paths(&mut self) -> usize {
        let num_vertices = self.vertices.len();
        let mut merged: Vec<(Sequence, ContigInfo)> = Vec::new();
        let mut absorbed = 0usize;

        for i in 0..num_vertices {
            let start = VertexAdaptor::forward(VertexId::from(i));
            if self.is_dead(start) || !self.status_mut(start).lock() {
                continue;
            }
            if self.is_palindrome_kmer(start) {
                continue;
            }

            // a walk that closes on itself or runs into a claimed vertex is
            // left untouched
            let mut path = ContigGraphPath::new(start);
            let mut closed = false;
            'strands: for _ in 0..2 {
                while let Some(current) = path.back() {
                    let Some(next) = self.get_next_vertex_adaptor(current) else {
                        break;
                    };
                    if path.is_palindrome_loop(next) {
                        break;
                    }
                    if path.is_loop(next) || !self.status_mut(next).lock() {
                        closed = true;
                        break 'strands;
                    }
                    path.append(next);
                }
                path.reverse_complement();
            }

            if !closed && path.len() > 1 {
                absorbed += path.len();
                merged.push(path.assemble(self));
                for &v in path.iter() {
                    self.status_mut(v).set_dead();
                }
            }
        }

        let num_merged = merged.len();
        for (contig, info) in merged {
            let id = VertexId::from(self.vertices.len());
            self.vertices.push(Vertex::new(id, contig, info));
        }
        self.clear_status();
        self.refresh();

        if num_merged > 0 {
            info!(
                "Merged {} simple paths ({} vertices), {} vertices remain",
                num_merged,
                absorbed,
                self.vertices.len()
            );
        }
        num_merged
    }

    // ---- extraction ------------------------------------------------------

    /// Emit every live vertex as a contig, ids numbered from zero
    pub fn assemble(&self) -> Vec<Contig> {
        self.vertices
            .iter()
            .filter(|v| !v.status().is_dead())
            .enumerate()
            .map(|(id, v)| Contig {
                id,
                sequence: v.contig().clone(),
                info: *v.contig_info(),
            })
            .collect()
    }

    /// Check strand symmetry of every edge and soundness of the index.
    pub fn validate(&self) -> Result<()> {
        for current in self.adaptors().flat_map(|a| [a, a.reverse_complement()]) {
            let resolved = self.find_vertex_adaptor_by_begin_kmer(self.begin_kmer(current));
            if resolved.map(|r| r.id()) != Some(current.id()) {
                return Err(GraphError::IndexMismatch { vertex: current.id() });
            }
            for x in self.out_edges(current).iter() {
                let next = self
                    .get_neighbor(current, x)
                    .ok_or(GraphError::EdgeWithoutDestination { vertex: current.id(), base: x })?;
                if !self.out_edges(next.reverse_complement()).contains(self.mirror_base(current)) {
                    return Err(GraphError::AsymmetricEdge { vertex: current.id(), base: x });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn build(k: usize, contigs: &[(&str, u64)]) -> ContigGraph {
        let seqs: Vec<Sequence> = contigs.iter().map(|(s, _)| s.parse().unwrap()).collect();
        let infos: Vec<ContigInfo> = contigs
            .iter()
            .map(|&(_, count)| ContigInfo::with_kmer_count(count))
            .collect();
        let mut graph = ContigGraph::new(k).unwrap();
        graph.initialize(&seqs, &infos).unwrap();
        graph
    }

    fn sequences(graph: &ContigGraph) -> Vec<String> {
        let mut seqs: Vec<String> = graph.assemble().iter().map(|c| c.sequence.to_string()).collect();
        seqs.sort();
        seqs
    }

    #[test]
    fn test_rejects_bad_kmer_size() {
        assert!(matches!(ContigGraph::new(0), Err(GraphError::InvalidKmerSize { k: 0 })));
        assert!(matches!(ContigGraph::new(33), Err(GraphError::InvalidKmerSize { k: 33 })));
    }

    #[test]
    fn test_initialize_rejects_short_contig() {
        let mut graph = ContigGraph::new(5).unwrap();
        let seqs: Vec<Sequence> = vec!["ACGTAC".parse().unwrap(), "ACG".parse().unwrap()];
        let infos = vec![ContigInfo::default(); 2];
        let err = graph.initialize(&seqs, &infos).unwrap_err();
        assert!(matches!(err, GraphError::ContigTooShort { index: 1, length: 3, k: 5 }));
    }

    #[test]
    fn test_initialize_rejects_mismatched_infos() {
        let mut graph = ContigGraph::new(3).unwrap();
        let seqs: Vec<Sequence> = vec!["ACGT".parse().unwrap()];
        let err = graph.initialize(&seqs, &[]).unwrap_err();
        assert!(matches!(err, GraphError::LengthMismatch { contigs: 1, infos: 0 }));
    }

    // ACCC -> CCAG -> AGA at k = 3 has no other overlaps on either strand
    const CHAIN: [(&str, u64); 3] = [("ACCC", 2), ("CCAG", 4), ("AGA", 1)];

    #[test]
    fn test_edges_are_derived_on_both_strands() {
        let graph = build(3, &CHAIN);
        let a = VertexAdaptor::forward(VertexId(0));
        let b = VertexAdaptor::forward(VertexId(1));
        assert_eq!(graph.num_edges(), 2);
        assert_eq!(graph.out_edges(a).single(), Some(0));
        assert_eq!(graph.get_neighbor(a, 0), Some(b));
        // CCAG reversed is CTGG, whose successor is GGGT (ACCC reversed)
        assert_eq!(graph.get_neighbor(b.reverse_complement(), 2), Some(a.reverse_complement()));
        assert_eq!(graph.in_edges(b).size(), 1);
        graph.validate().unwrap();
    }

    #[test]
    fn test_index_resolves_both_strands() {
        let graph = build(3, &CHAIN);
        for a in graph.adaptors() {
            for current in [a, a.reverse_complement()] {
                let found = graph.find_vertex_adaptor_by_begin_kmer(graph.begin_kmer(current));
                assert_eq!(found, Some(current));
            }
        }
    }

    #[test]
    fn test_remove_edge_is_mirrored() {
        let mut graph = build(3, &CHAIN);
        let a = VertexAdaptor::forward(VertexId(0));
        let b = VertexAdaptor::forward(VertexId(1));
        graph.remove_edge(a, 0);
        assert!(graph.out_edges(a).is_empty());
        assert!(graph.in_edges(b).is_empty());
        graph.validate().unwrap();

        graph.add_edge(a, b);
        assert_eq!(graph.out_edges(b.reverse_complement()).single(), Some(2));
        graph.validate().unwrap();
    }

    #[test]
    fn test_initialize_then_assemble_round_trips() {
        let input = [("ACCC", 2), ("CCAG", 4), ("AGA", 1), ("TGATG", 3)];
        let graph = build(3, &input);
        let mut expected: Vec<String> = input.iter().map(|(s, _)| s.to_string()).collect();
        expected.sort();
        assert_eq!(sequences(&graph), expected);
    }

    #[test]
    fn test_merge_chain() {
        let mut graph = build(3, &CHAIN);
        assert_eq!(graph.merge_simple_paths(), 1);
        let contigs = graph.assemble();
        assert_eq!(contigs.len(), 1);
        assert_eq!(contigs[0].sequence.to_string(), "ACCCAGA");
        assert_eq!(contigs[0].info.kmer_count, 7);
        // 7 k-mer counts over 5 k-mers
        assert!((contigs[0].coverage() - 1.4).abs() < 1e-9);
        graph.validate().unwrap();
    }

    #[test]
    fn test_merge_leaves_self_loop_alone() {
        // TGATG ends in TG, and TG + A is its own begin k-mer
        let mut graph = build(3, &[("TGATG", 3)]);
        let a = VertexAdaptor::forward(VertexId(0));
        assert_eq!(graph.get_neighbors(a), vec![a]);
        assert_eq!(graph.merge_simple_paths(), 0);
        assert_eq!(sequences(&graph), vec!["TGATG".to_string()]);
        graph.validate().unwrap();
    }

    #[test]
    fn test_merge_leaves_two_vertex_cycle_alone() {
        // CATGG ends in GG, the start of GGACA, which ends in CA
        let mut graph = build(3, &[("CATGG", 3), ("GGACA", 3)]);
        let a = VertexAdaptor::forward(VertexId(0));
        let b = VertexAdaptor::forward(VertexId(1));
        assert_eq!(graph.get_neighbors(a), vec![b]);
        assert_eq!(graph.get_neighbors(b), vec![a]);
        assert_eq!(graph.num_edges(), 2);

        assert_eq!(graph.merge_simple_paths(), 0);
        assert_eq!(graph.num_vertices(), 2);
        assert_eq!(graph.num_edges(), 2);
        assert_eq!(sequences(&graph), vec!["CATGG".to_string(), "GGACA".to_string()]);
        graph.validate().unwrap();
    }

    #[test]
    fn test_hairpin_edge_is_counted_once() {
        // AAAT ends in AT, which begins ATTT, its own reverse complement
        let graph = build(3, &[("AAAT", 1)]);
        let a = VertexAdaptor::forward(VertexId(0));
        assert_eq!(graph.get_neighbors(a), vec![a.reverse_complement()]);
        assert_eq!(graph.num_edges(), 1);

        let graph = build(3, &[("AAAT", 1), ("ACCC", 2), ("CCAG", 4), ("AGA", 1)]);
        assert_eq!(graph.num_edges(), 3);
    }

    #[test]
    fn test_refresh_vertices_compacts_and_drops_dangling_edges() {
        let mut graph = build(3, &CHAIN);
        let b = VertexAdaptor::forward(VertexId(1));
        graph.vertex_mut(b).kill();
        graph.refresh();
        assert_eq!(graph.num_vertices(), 2);
        assert_eq!(graph.num_edges(), 0);
        graph.validate().unwrap();
    }
}
