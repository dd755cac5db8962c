//! Hazard-weighted Dijkstra search

mod state;

use std::collections::BinaryHeap;

use fixedbitset::FixedBitSet;
use hashbrown::{HashMap, hash_map::Entry};
use log::{debug, warn};
use petgraph::{
    graph::{EdgeIndex, NodeIndex},
    visit::EdgeRef,
};

use super::path_finder::{PathFinder, PathResult};
use crate::RoadGraph;
use state::State;

/// Single-source shortest path over effective (hazard-inflated) edge costs.
///
/// The search stops as soon as the destination is settled. Alongside the
/// path it counts every relaxation of a hazardous edge towards a node that
/// is not settled yet, which is what "hazard segments avoided" is derived
/// from. That counter is search effort, not a set of distinct edges.
#[derive(Debug, Clone, Copy, Default)]
pub struct HazardDijkstra;

impl HazardDijkstra {
    pub fn new() -> Self {
        Self
    }
}

impl PathFinder for HazardDijkstra {
    fn find_path<'g>(
        &self,
        graph: &'g RoadGraph,
        start: NodeIndex,
        end: NodeIndex,
    ) -> Option<PathResult<'g>> {
        let start_node = graph.node_weight(start)?;
        graph.node_weight(end)?;

        if start == end {
            return Some(PathResult::single(start_node));
        }

        let mut costs: HashMap<NodeIndex, f64> = HashMap::new();
        let mut predecessors: HashMap<NodeIndex, (NodeIndex, EdgeIndex)> = HashMap::new();
        let mut settled = FixedBitSet::with_capacity(graph.node_count());
        let mut heap = BinaryHeap::new();
        let mut hazard_edges_considered = 0;

        costs.insert(start, 0.0);
        heap.push(State {
            cost: 0.0,
            node: start,
        });

        let mut reached = false;
        while let Some(State { cost, node }) = heap.pop() {
            // Stale entry left behind by a later improvement
            if settled.put(node.index()) {
                continue;
            }

            if node == end {
                debug!("Destination settled with cost {cost:.1}");
                reached = true;
                break;
            }

            for edge in graph.edges(node) {
                let next = edge.target();
                if settled.contains(next.index()) {
                    continue;
                }

                let weight = edge.weight();
                if weight.hazardous {
                    hazard_edges_considered += 1;
                }

                let next_cost = cost + weight.effective_cost();
                match costs.entry(next) {
                    Entry::Vacant(entry) => {
                        entry.insert(next_cost);
                    }
                    Entry::Occupied(mut entry) => {
                        if next_cost >= *entry.get() {
                            continue;
                        }
                        *entry.get_mut() = next_cost;
                    }
                }
                predecessors.insert(next, (node, edge.id()));
                heap.push(State {
                    cost: next_cost,
                    node: next,
                });
            }
        }

        if !reached {
            warn!(
                "No path from node {} to node {}",
                start.index(),
                end.index()
            );
            return None;
        }

        let mut node_indices = vec![end];
        let mut edge_indices = Vec::new();
        let mut current = end;
        while current != start {
            let &(previous, edge) = predecessors.get(&current)?;
            edge_indices.push(edge);
            node_indices.push(previous);
            current = previous;
        }
        node_indices.reverse();
        edge_indices.reverse();

        let nodes = node_indices
            .into_iter()
            .map(|index| graph.node_weight(index))
            .collect::<Option<Vec<_>>>()?;
        let edges = edge_indices
            .into_iter()
            .map(|index| graph.edge_weight(index))
            .collect::<Option<Vec<_>>>()?;

        Some(PathResult::from_walk(nodes, edges, hazard_edges_considered))
    }
}
