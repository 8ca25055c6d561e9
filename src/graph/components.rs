//! Connected components and the analyses run on each of them: cycle
//! detection, topological order and the longest path through a DAG.
//!
//! Components are collected with consistent orientation: starting from a
//! forward adaptor, every vertex is recorded on the strand through which it
//! was first reached. A component is assemblable when, on those strands, it
//! is a DAG with one source and one sink.

use ahash::{AHashMap, AHashSet};
use std::collections::VecDeque;
use tracing::{debug, warn};

use crate::error::{GraphError, Result};
use crate::graph::adaptor::VertexAdaptor;
use crate::graph::contig_graph::ContigGraph;
use crate::graph::path::ContigGraphPath;
use crate::kmer::sequence::Sequence;

/// DFS colouring used by cycle detection and topological sort
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitState {
    InProgress,
    Done,
}

/// One connected component of the graph
#[derive(Debug, Clone)]
pub struct Component {
    pub vertices: Vec<VertexAdaptor>,
    /// Edge list, e.g. `0+ -> 1+, 1+ -> 2-`
    pub description: String,
    /// Longest path through the component, when it is assemblable
    pub sequence: Option<Sequence>,
}

impl Component {
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

impl ContigGraph {
    /// Partition the live vertices into connected components, ignoring edge
    /// direction, and assemble the longest path of each valid one.
    pub fn get_components(&self) -> Vec<Component> {
        let mut seen = AHashSet::new();
        let mut components = Vec::new();

        for start in self.adaptors() {
            if seen.contains(&start.id()) {
                continue;
            }
            let vertices = self.collect_component(start);
            seen.extend(vertices.iter().map(|a| a.id()));

            let description = self.describe_component(&vertices);
            let sequence = match self.find_longest_path(&vertices) {
                Ok(path) => Some(path.assemble(self).0),
                Err(e) => {
                    warn!("Skipping component at {}: {}", start, e);
                    None
                }
            };
            components.push(Component { vertices, description, sequence });
        }

        debug!("Found {} components", components.len());
        components
    }

    /// Every adaptor connected to `start`, each vertex on the strand it was
    /// first reached through
    pub fn collect_component(&self, start: VertexAdaptor) -> Vec<VertexAdaptor> {
        let mut seen = AHashSet::new();
        let mut component = Vec::new();
        let mut queue = VecDeque::new();
        seen.insert(start.id());
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            component.push(current);
            let successors = self.get_neighbors(current);
            let predecessors = self
                .get_neighbors(current.reverse_complement())
                .into_iter()
                .map(|p| p.reverse_complement());
            for next in successors.into_iter().chain(predecessors) {
                if seen.insert(next.id()) {
                    queue.push_back(next);
                }
            }
        }
        component
    }

    fn describe_component(&self, component: &[VertexAdaptor]) -> String {
        component
            .iter()
            .flat_map(|&a| {
                self.get_neighbors(a)
                    .into_iter()
                    .map(move |next| format!("{} -> {}", a, next))
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// The unique adaptor of the component without predecessors
    pub fn get_begin_vertex_adaptor(&self, component: &[VertexAdaptor]) -> Option<VertexAdaptor> {
        let mut sources = component.iter().copied().filter(|&a| self.in_edges(a).is_empty());
        match (sources.next(), sources.next()) {
            (Some(begin), None) => Some(begin),
            _ => None,
        }
    }

    /// The unique adaptor of the component without successors
    pub fn get_end_vertex_adaptor(&self, component: &[VertexAdaptor]) -> Option<VertexAdaptor> {
        let mut sinks = component.iter().copied().filter(|&a| self.out_edges(a).is_empty());
        match (sinks.next(), sinks.next()) {
            (Some(end), None) => Some(end),
            _ => None,
        }
    }

    /// Check that a component can be read as a single path: no cycles,
    /// every edge stays on the recorded strands, one source and one sink.
    pub fn check_component(&self, component: &[VertexAdaptor]) -> Result<()> {
        let members: AHashSet<VertexAdaptor> = component.iter().copied().collect();
        let mut status = AHashMap::new();
        for &current in component {
            if !status.contains_key(&current) && self.cycle_detect(current, &mut status) {
                return Err(GraphError::CyclicComponent { vertex: current.id() });
            }
        }

        let strand_mixed = component
            .iter()
            .any(|&a| self.get_neighbors(a).iter().any(|next| !members.contains(next)));
        if strand_mixed {
            return Err(GraphError::AmbiguousComponent);
        }

        match (
            self.get_begin_vertex_adaptor(component),
            self.get_end_vertex_adaptor(component),
        ) {
            (Some(_), Some(_)) => Ok(()),
            _ => Err(GraphError::AmbiguousComponent),
        }
    }

    pub fn is_valid(&self, component: &[VertexAdaptor]) -> bool {
        self.check_component(component).is_ok()
    }

    /// Depth-first search from `current` that reports whether it reaches an
    /// adaptor still on the search stack.
    pub fn cycle_detect(
        &self,
        current: VertexAdaptor,
        status: &mut AHashMap<VertexAdaptor, VisitState>,
    ) -> bool {
        let mut order = Vec::new();
        self.top_sort_dfs(current, status, &mut order).is_err()
    }

    /// Adaptors of a component in topological order
    pub fn top_sort(&self, component: &[VertexAdaptor]) -> Result<Vec<VertexAdaptor>> {
        let mut status = AHashMap::new();
        let mut order = Vec::with_capacity(component.len());
        for &current in component {
            if !status.contains_key(&current) {
                self.top_sort_dfs(current, &mut status, &mut order)?;
            }
        }
        order.reverse();
        Ok(order)
    }

    /// Post-order DFS from `start`, appending finished adaptors to `order`.
    /// Fails on reaching an adaptor that is still in progress.
    pub fn top_sort_dfs(
        &self,
        start: VertexAdaptor,
        status: &mut AHashMap<VertexAdaptor, VisitState>,
        order: &mut Vec<VertexAdaptor>,
    ) -> Result<()> {
        status.insert(start, VisitState::InProgress);
        let mut stack = vec![(start, self.get_neighbors(start), 0usize)];

        while let Some((current, neighbors, index)) = stack.last_mut() {
            if *index == neighbors.len() {
                status.insert(*current, VisitState::Done);
                order.push(*current);
                stack.pop();
                continue;
            }
            let next = neighbors[*index];
            *index += 1;
            match status.get(&next).copied() {
                Some(VisitState::InProgress) => {
                    return Err(GraphError::CyclicComponent { vertex: next.id() });
                }
                Some(VisitState::Done) => {}
                None => {
                    status.insert(next, VisitState::InProgress);
                    let next_neighbors = self.get_neighbors(next);
                    stack.push((next, next_neighbors, 0));
                }
            }
        }
        Ok(())
    }

    /// The heaviest source-to-sink walk through a valid component, where
    /// each vertex weighs its number of k-mers.
    pub fn find_longest_path(&self, component: &[VertexAdaptor]) -> Result<ContigGraphPath> {
        self.check_component(component)?;
        let order = self.top_sort(component)?;

        let mut best: AHashMap<VertexAdaptor, (usize, Option<VertexAdaptor>)> = AHashMap::new();
        for &current in &order {
            let weight = self.num_kmer(current);
            let (length, _) = *best.entry(current).or_insert((weight, None));
            for next in self.get_neighbors(current) {
                let candidate = length + self.num_kmer(next);
                let entry = best.entry(next).or_insert((0, None));
                if candidate > entry.0 {
                    *entry = (candidate, Some(current));
                }
            }
        }

        let mut tail = order
            .iter()
            .copied()
            .max_by_key(|a| best.get(a).map_or(0, |&(length, _)| length))
            .ok_or(GraphError::AmbiguousComponent)?;

        let mut walk = vec![tail];
        while let Some(&(_, Some(prev))) = best.get(&tail) {
            walk.push(prev);
            tail = prev;
        }
        walk.reverse();
        Ok(ContigGraphPath::from_slice(&walk))
    }

    /// Longest number of k-mers reachable forward from `current`, starting
    /// from `length` already walked. The search stops as soon as some walk
    /// reaches `min_length`, so the result is only exact below that bound.
    pub fn get_depth(&self, current: VertexAdaptor, length: usize, min_length: usize) -> usize {
        if length >= min_length {
            return length;
        }
        let mut maximum = length;
        let mut stack = vec![(current, length)];
        while let Some((node, depth)) = stack.pop() {
            for next in self.get_neighbors(node) {
                let reached = depth + self.num_kmer(next);
                maximum = maximum.max(reached);
                if maximum >= min_length {
                    return maximum;
                }
                stack.push((next, reached));
            }
        }
        maximum
    }
}
