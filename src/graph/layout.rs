use std::collections::HashMap;

use clap::ValueEnum;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;
use tracing::warn;

use crate::models::{Position, SessionGraph};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ValueEnum)]
pub enum Direction {
    /// Ranks run left to right
    #[default]
    #[value(name = "LR")]
    LeftRight,
    /// Ranks run top to bottom
    #[value(name = "TB")]
    TopBottom,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutOptions {
    pub node_width: f64,
    pub node_height: f64,
    pub direction: Direction,
    /// Gap between nodes sharing a rank
    pub node_sep: f64,
    /// Gap between ranks
    pub rank_sep: f64,
    pub margin: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            node_width: 180.0,
            node_height: 60.0,
            direction: Direction::LeftRight,
            node_sep: 60.0,
            rank_sep: 250.0,
            margin: 40.0,
        }
    }
}

/// Assigns positions to graph nodes. Any directed-graph layout can sit behind this.
pub trait Layout {
    fn apply(&self, graph: &mut SessionGraph<'_>, options: &LayoutOptions);
}

/// Layered placement: rank = longest path from a source, order within a rank = emission order
#[derive(Debug, Clone, Copy, Default)]
pub struct LayeredLayout;

impl LayeredLayout {
    /// Rank of every node, indexed like `graph.nodes`
    fn ranks(graph: &SessionGraph<'_>) -> Vec<usize> {
        let mut dag: DiGraph<usize, ()> = DiGraph::with_capacity(graph.nodes.len(), graph.edges.len());
        let mut index_of: HashMap<&str, NodeIndex> = HashMap::with_capacity(graph.nodes.len());
        for (i, node) in graph.nodes.iter().enumerate() {
            index_of.insert(node.id.as_str(), dag.add_node(i));
        }
        for edge in &graph.edges {
            if let (Some(&source), Some(&target)) =
                (index_of.get(edge.source.as_str()), index_of.get(edge.target.as_str()))
            {
                dag.add_edge(source, target, ());
            }
        }

        let order = match toposort(&dag, None) {
            Ok(order) => order,
            Err(cycle) => {
                warn!(node = dag[cycle.node_id()], "Graph has a cycle, ranking in emission order");
                dag.node_indices().collect()
            }
        };

        let mut ranks = vec![0; graph.nodes.len()];
        for node in order {
            let rank = ranks[dag[node]];
            for next in dag.neighbors(node) {
                let slot = &mut ranks[dag[next]];
                *slot = (*slot).max(rank + 1);
            }
        }
        ranks
    }
}

impl Layout for LayeredLayout {
    fn apply(&self, graph: &mut SessionGraph<'_>, options: &LayoutOptions) {
        let ranks = Self::ranks(graph);
        let mut filled: HashMap<usize, usize> = HashMap::new();

        for (node, rank) in graph.nodes.iter_mut().zip(ranks) {
            let slot = filled.entry(rank).or_insert(0);
            let order = *slot as f64;
            *slot += 1;
            let rank = rank as f64;

            node.position = match options.direction {
                Direction::LeftRight => Position {
                    x: options.margin + rank * (options.node_width + options.rank_sep),
                    y: options.margin + order * (options.node_height + options.node_sep),
                },
                Direction::TopBottom => Position {
                    x: options.margin + order * (options.node_width + options.node_sep),
                    y: options.margin + rank * (options.node_height + options.rank_sep),
                },
            };
        }
    }
}
