//! Roadmap graph builder — a strict path over the roadmap steps in array order.

use serde::{Deserialize, Serialize};

use crate::advice::roadmap::RoadmapStep;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    /// Set per view from the session's roadmap progress.
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// One node per step, one edge per adjacent pair. No validation of
/// `step_number`: edges follow the slice order.
pub fn build_roadmap_graph(steps: &[RoadmapStep]) -> RoadmapGraph {
    let nodes: Vec<GraphNode> = steps
        .iter()
        .enumerate()
        .map(|(i, step)| GraphNode {
            id: i.to_string(),
            label: format!("{}\n({})", step.title, step.duration_label()),
            completed: false,
        })
        .collect();

    let edges = nodes
        .windows(2)
        .map(|pair| GraphEdge {
            from: pair[0].id.clone(),
            to: pair[1].id.clone(),
        })
        .collect();

    RoadmapGraph { nodes, edges }
}

impl RoadmapGraph {
    /// Copies per-step flags onto the nodes. `done` is indexed like the steps
    /// the graph was built from; missing entries leave a node not completed.
    pub fn with_completion(&self, done: &[bool]) -> RoadmapGraph {
        let nodes = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, node)| GraphNode {
                completed: done.get(i).copied().unwrap_or(false),
                ..node.clone()
            })
            .collect();
        RoadmapGraph {
            nodes,
            edges: self.edges.clone(),
        }
    }

    /// Graphviz DOT rendering for the visualisation panel.
    pub fn to_dot(&self) -> String {
        let mut dot = String::from("digraph roadmap {\n    rankdir=LR;\n    node [shape=box];\n");
        for node in &self.nodes {
            let style = if node.completed {
                ", style=filled, fillcolor=\"#c8e6c9\""
            } else {
                ""
            };
            dot.push_str(&format!(
                "    \"{}\" [label=\"{}\"{style}];\n",
                escape_dot(&node.id),
                escape_dot(&node.label)
            ));
        }
        for edge in &self.edges {
            dot.push_str(&format!(
                "    \"{}\" -> \"{}\";\n",
                escape_dot(&edge.from),
                escape_dot(&edge.to)
            ));
        }
        dot.push_str("}\n");
        dot
    }
}

fn escape_dot(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}
