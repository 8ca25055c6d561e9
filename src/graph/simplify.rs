//! Topology-driven simplification: tip clipping, bubble popping and
//! branch splitting.

use ahash::AHashSet;
use std::collections::VecDeque;
use tracing::{debug, info};

use crate::graph::adaptor::VertexAdaptor;
use crate::graph::contig_graph::ContigGraph;
use crate::graph::path::ContigGraphPath;
use crate::kmer::sequence::Sequence;

/// Levenshtein distance between two base strings
pub fn edit_distance(a: &[u8], b: &[u8]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    let mut prev: Vec<usize> = (0..=a.len()).collect();
    let mut curr = vec![0usize; a.len() + 1];
    for (j, &cb) in b.iter().enumerate() {
        curr[0] = j + 1;
        for (i, &ca) in a.iter().enumerate() {
            let substitution = prev[i] + (ca != cb) as usize;
            curr[i + 1] = substitution.min(prev[i + 1] + 1).min(curr[i] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[a.len()]
}

/// Similarity in `[0, 1]`: one minus the edit distance over the longer length
pub fn get_similarity(x: &Sequence, y: &Sequence) -> f64 {
    let longest = x.len().max(y.len());
    if longest == 0 {
        return 1.0;
    }
    1.0 - edit_distance(x.codes(), y.codes()) as f64 / longest as f64
}

impl ContigGraph {
    /// Whether a vertex is short, dangling on one side and has at most one
    /// edge on the other.
    fn is_tip(&self, a: VertexAdaptor, min_length: usize) -> bool {
        if self.is_palindrome_kmer(a) {
            return false;
        }
        let (ins, outs) = (self.in_edges(a), self.out_edges(a));
        (ins.is_empty() || outs.is_empty())
            && ins.size() <= 1
            && outs.size() <= 1
            && self.contig_size(a) < min_length
    }

    fn trim_tips(&mut self, min_length: usize, min_cover: Option<f64>) -> usize {
        let tips: Vec<VertexAdaptor> = self
            .adaptors()
            .filter(|&a| self.is_tip(a, min_length))
            .filter(|&a| min_cover.map_or(true, |cover| self.coverage(a) < cover))
            .collect();

        for &tip in &tips {
            self.kill_vertex(tip);
        }
        self.refresh();
        self.merge_simple_paths();
        debug!("Trimmed {} tips shorter than {} bp", tips.len(), min_length);
        tips.len()
    }

    /// Remove dead-end vertices shorter than `min_length` bases, then merge
    /// what becomes contractible. Returns the number of vertices removed.
    pub fn trim(&mut self, min_length: usize) -> usize {
        self.trim_tips(min_length, None)
    }

    /// As `trim`, but only tips whose coverage is also below `min_cover`
    pub fn trim_with_coverage(&mut self, min_length: usize, min_cover: f64) -> usize {
        self.trim_tips(min_length, Some(min_cover))
    }

    /// Trim with a doubling length threshold up to `min_length`, so short
    /// tips hiding longer ones are peeled first.
    pub fn remove_dead_end(&mut self, min_length: usize) -> usize {
        let mut num_deadend = 0;
        let mut length = 1;
        loop {
            length = (2 * length).min(min_length);
            num_deadend += self.trim(length);
            if length >= min_length {
                break;
            }
        }
        num_deadend += self.trim(min_length);
        info!("Removed {} dead ends (min length {})", num_deadend, min_length);
        num_deadend
    }

    /// Pop bubbles: two branches leaving the same vertex and meeting again,
    /// whose sequences are similar. The branch with lower coverage is
    /// removed. Returns the number of bubbles popped.
    pub fn remove_bubble(&mut self) -> usize {
        let candidates: Vec<VertexAdaptor> = self
            .adaptors()
            .flat_map(|a| [a, a.reverse_complement()])
            .filter(|&a| self.out_edges(a).size() > 1 && !self.is_palindrome_kmer(a))
            .collect();

        let mut bubbles = 0;
        for begin in candidates {
            if self.is_dead(begin) || self.out_edges(begin).size() < 2 {
                continue;
            }

            let mut neighbors = self.get_neighbors(begin);
            neighbors.sort_by(|x, y| self.coverage(*y).total_cmp(&self.coverage(*x)));

            // lowest coverage first
            for &alt in neighbors.iter().rev() {
                if self.is_dead(alt) || self.is_dead(begin) {
                    continue;
                }
                if self.in_edges(alt).size() != 1 || self.out_edges(alt).size() != 1 {
                    continue;
                }

                let mut path = ContigGraphPath::new(begin);
                let mut time = 0;
                let similarity = self.find_similar_path(alt, &mut path, &mut time);
                if path.len() < 3 || similarity < self.config.bubble_similarity {
                    continue;
                }

                let inner = &path.as_slice()[1..path.len() - 1];
                let inner_count: u64 = inner.iter().map(|&v| self.kmer_count(v)).sum();
                let inner_kmers: usize = inner.iter().map(|&v| self.num_kmer(v)).sum();
                let path_coverage = inner_count as f64 / inner_kmers as f64;

                if self.coverage(alt) <= path_coverage {
                    self.kill_vertex(alt);
                    bubbles += 1;
                } else if inner
                    .iter()
                    .all(|&v| self.in_edges(v).size() == 1 && self.out_edges(v).size() == 1)
                {
                    for &v in inner {
                        self.kill_vertex(v);
                    }
                    bubbles += 1;
                }
            }
        }

        self.refresh();
        self.merge_simple_paths();
        info!("Popped {} bubbles", bubbles);
        bubbles
    }

    /// Search for a walk from `path.back()` to the successor of `target`
    /// that avoids `target` and whose interior sequence best matches
    /// `target`'s contig. On success `path` is replaced by the best walk
    /// (start, interior..., end) and its similarity is returned; otherwise
    /// `path` is untouched and 0.0 is returned.
    ///
    /// `time` counts expanded walks; the search stops once it exceeds the
    /// configured step budget.
    pub fn find_similar_path(
        &self,
        target: VertexAdaptor,
        path: &mut ContigGraphPath,
        time: &mut usize,
    ) -> f64 {
        let Some(end) = self
            .out_edges(target)
            .single()
            .and_then(|x| self.get_neighbor(target, x))
        else {
            return 0.0;
        };
        let target_contig = self.contig(target);
        let max_length = target_contig.len() + self.config.bubble_length_slack;

        let mut best_similarity = 0.0;
        let mut best_path: Option<ContigGraphPath> = None;
        let mut stack = vec![path.clone()];

        while let Some(current) = stack.pop() {
            *time += 1;
            if *time > self.config.bubble_max_steps {
                break;
            }
            let Some(back) = current.back() else { continue };

            for next in self.get_neighbors(back) {
                if next.id() == target.id() {
                    continue;
                }
                if next == end {
                    if current.len() < 2 {
                        continue;
                    }
                    let interior = ContigGraphPath::from_slice(&current.as_slice()[1..]);
                    let (contig, _) = interior.assemble(self);
                    let similarity = get_similarity(&contig, &target_contig);
                    if similarity > best_similarity {
                        best_similarity = similarity;
                        let mut found = current.clone();
                        found.append(end);
                        best_path = Some(found);
                    }
                    continue;
                }
                if current.contains_vertex(next) || next.id() == end.id() {
                    continue;
                }

                let mut extended = current.clone();
                extended.append(next);
                let interior = ContigGraphPath::from_slice(&extended.as_slice()[1..]);
                if interior.sequence_length(self) <= max_length {
                    stack.push(extended);
                }
            }
        }

        if let Some(found) = best_path {
            *path = found;
        }
        best_similarity
    }

    /// Whether the branches leaving `current` meet again nearby, i.e. the
    /// branching is local variation rather than a repeat boundary.
    pub fn is_converged(&self, current: VertexAdaptor) -> bool {
        let neighbors = self.get_neighbors(current);
        if neighbors.len() < 2 {
            return true;
        }

        let mut common: Option<AHashSet<VertexAdaptor>> = None;
        for &start in &neighbors {
            let reached = self.reachable_within(start, current);
            common = Some(match common {
                None => reached,
                Some(prev) => prev.intersection(&reached).copied().collect(),
            });
            if common.as_ref().map_or(false, |c| c.is_empty()) {
                return false;
            }
        }
        common.map_or(false, |c| !c.is_empty())
    }

    /// Adaptors reachable forward from `start` within `region_length` bases
    /// past the branch point, never passing through `origin`.
    fn reachable_within(&self, start: VertexAdaptor, origin: VertexAdaptor) -> AHashSet<VertexAdaptor> {
        let mut reached = AHashSet::new();
        let mut queue = VecDeque::new();
        let overlap = self.kmer_size() - 1;
        reached.insert(start);
        queue.push_back((start, self.contig_size(start) - overlap));

        while let Some((current, distance)) = queue.pop_front() {
            if distance >= self.config.region_length
                || reached.len() >= self.config.converge_max_vertices
            {
                continue;
            }
            for next in self.get_neighbors(current) {
                if next.id() == origin.id() || !reached.insert(next) {
                    continue;
                }
                queue.push_back((next, distance + self.contig_size(next) - overlap));
            }
        }
        reached
    }

    /// Cut the out-edges of branch points whose branches never meet again,
    /// so the branches contract independently. Returns the number of
    /// branch points split.
    pub fn split_branches(&mut self) -> usize {
        let branches: Vec<VertexAdaptor> = self
            .adaptors()
            .flat_map(|a| [a, a.reverse_complement()])
            .filter(|&a| self.out_edges(a).size() > 1 && !self.is_palindrome_kmer(a))
            .filter(|&a| !self.is_converged(a))
            .collect();

        for &branch in &branches {
            for x in self.out_edges(branch).iter() {
                self.remove_edge(branch, x);
            }
        }

        self.refresh();
        self.merge_simple_paths();
        info!("Split {} branch points", branches.len());
        branches.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::contig_graph::tests::build;
    use crate::graph::vertex::VertexId;

    // k = 5: A branches into B and a tip, no other overlaps
    const TIP8: [&str; 3] = ["CAGATTTTCATATTATGCAG", "GCAGAAAATCTACTTCGCCTGATA", "GCAGCGAG"];
    const TIP7: [&str; 3] = ["AAAAAAAGGCCCATACCAAG", "CAAGAGGTAGTAGTCTCAGAATCT", "CAAGTGC"];

    // k = 7: P -> {Q1, Q2} -> E, Q1 and Q2 differ by one base
    const BUBBLE: [&str; 4] = [
        "CCGTAATGCCTTTCCCTAAC",
        "CCTAACTAGAGTT",
        "CCTAACGAGAGTT",
        "AGAGTTTTTCGAACTCGTGT",
    ];

    // k = 5: A, C -> R -> B, D
    const CROSS: [&str; 5] = [
        "GACGGCAGCAGGCCGGCGAT",
        "GAGTCCCTGAGAGGCTCGAT",
        "CGATTCAAAT",
        "AAATTGTTCCGGAAATGTGC",
        "AAATCATCTGCGTGCGAACG",
    ];

    fn sorted(graph: &ContigGraph) -> Vec<String> {
        let mut seqs: Vec<String> = graph.assemble().iter().map(|c| c.sequence.to_string()).collect();
        seqs.sort();
        seqs
    }

    #[test]
    fn test_similarity() {
        let a: Sequence = "ACGTACGTAC".parse().unwrap();
        let b: Sequence = "ACGTTCGTAC".parse().unwrap();
        assert!((get_similarity(&a, &b) - 0.9).abs() < 1e-9);
        assert_eq!(get_similarity(&a, &a), 1.0);
        assert_eq!(edit_distance(b"ACGT", b"AGT"), 1);
        assert_eq!(edit_distance(b"", b"AGT"), 3);
    }

    #[test]
    fn test_trim_keeps_tip_of_min_length() {
        let mut graph = build(5, &[(TIP8[0], 40), (TIP8[1], 40), (TIP8[2], 4)]);
        assert_eq!(graph.trim(8), 0);
        assert_eq!(graph.num_vertices(), 3);
    }

    #[test]
    fn test_trim_removes_shorter_tip() {
        let mut graph = build(5, &[(TIP7[0], 40), (TIP7[1], 40), (TIP7[2], 3)]);
        assert_eq!(graph.trim(8), 1);
        let merged = format!("{}{}", TIP7[0], &TIP7[1][4..]);
        assert_eq!(sorted(&graph), vec![merged]);
        graph.validate().unwrap();
    }

    #[test]
    fn test_trim_with_coverage_spares_well_covered_tip() {
        let mut graph = build(5, &[(TIP7[0], 40), (TIP7[1], 40), (TIP7[2], 30)]);
        assert_eq!(graph.trim_with_coverage(8, 5.0), 0);
        assert_eq!(graph.trim_with_coverage(8, 20.0), 1);
    }

    #[test]
    fn test_remove_dead_end() {
        let mut graph = build(5, &[(TIP7[0], 40), (TIP7[1], 40), (TIP7[2], 3)]);
        assert_eq!(graph.remove_dead_end(8), 1);
        assert_eq!(graph.num_vertices(), 1);
    }

    #[test]
    fn test_remove_bubble_keeps_high_coverage_branch() {
        let mut graph = build(7, &[(BUBBLE[0], 140), (BUBBLE[1], 70), (BUBBLE[2], 7), (BUBBLE[3], 140)]);
        assert_eq!(graph.remove_bubble(), 1);
        let merged = format!("{}{}{}", BUBBLE[0], &BUBBLE[1][6..], &BUBBLE[3][6..]);
        assert_eq!(sorted(&graph), vec![merged]);
        graph.validate().unwrap();
    }

    #[test]
    fn test_find_similar_path_respects_budget() {
        let graph = build(7, &[(BUBBLE[0], 140), (BUBBLE[1], 70), (BUBBLE[2], 7), (BUBBLE[3], 140)]);
        let begin = VertexAdaptor::forward(VertexId(0));
        let target = VertexAdaptor::forward(VertexId(2));

        let mut path = ContigGraphPath::new(begin);
        let mut time = 0;
        let similarity = graph.find_similar_path(target, &mut path, &mut time);
        assert!((similarity - 12.0 / 13.0).abs() < 1e-9);
        assert_eq!(path.len(), 3);
        assert_eq!(path.as_slice()[1], VertexAdaptor::forward(VertexId(1)));

        let mut path = ContigGraphPath::new(begin);
        let mut time = graph.config().bubble_max_steps;
        assert_eq!(graph.find_similar_path(target, &mut path, &mut time), 0.0);
        assert_eq!(path.len(), 1);
    }

    #[test]
    fn test_bubble_branches_converge() {
        let graph = build(7, &[(BUBBLE[0], 140), (BUBBLE[1], 70), (BUBBLE[2], 7), (BUBBLE[3], 140)]);
        let begin = VertexAdaptor::forward(VertexId(0));
        assert!(graph.is_converged(begin));
        assert!(graph.is_converged(VertexAdaptor::forward(VertexId(3)).reverse_complement()));
    }

    #[test]
    fn test_convergence_needs_region_past_branches() {
        // each branch adds 13 - 6 = 7 bases before reaching E
        let mut graph = build(7, &[(BUBBLE[0], 140), (BUBBLE[1], 70), (BUBBLE[2], 7), (BUBBLE[3], 140)]);
        let begin = VertexAdaptor::forward(VertexId(0));
        let mut config = graph.config().clone();
        config.region_length = 7;
        graph.set_config(config.clone());
        assert!(!graph.is_converged(begin));

        config.region_length = 8;
        graph.set_config(config);
        assert!(graph.is_converged(begin));
    }

    #[test]
    fn test_split_branches_leaves_bubble() {
        let mut graph = build(7, &[(BUBBLE[0], 140), (BUBBLE[1], 70), (BUBBLE[2], 7), (BUBBLE[3], 140)]);
        assert_eq!(graph.split_branches(), 0);
        assert_eq!(graph.num_vertices(), 4);
    }

    #[test]
    fn test_split_branches_cuts_repeat() {
        let input: Vec<(&str, u64)> = CROSS.iter().map(|&s| (s, 20)).collect();
        let mut graph = build(5, &input);
        let repeat = VertexAdaptor::forward(VertexId(2));
        assert!(!graph.is_converged(repeat));
        assert!(!graph.is_converged(repeat.reverse_complement()));

        assert_eq!(graph.split_branches(), 2);
        assert_eq!(graph.num_edges(), 0);
        assert_eq!(graph.num_vertices(), 5);
        graph.validate().unwrap();
    }
}
