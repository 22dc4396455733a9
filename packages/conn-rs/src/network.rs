//! Connectivity network result
//!
//! Nodes carry 3-D positions (sensor locations or source-space vertices),
//! edges carry the pairwise connectivity weight.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{ConnError, Result};

/// Why a network is (or is not) populated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "method", rename_all = "snake_case")]
pub enum NetworkStatus {
    Computed,
    /// Evoked data, forward solution or source estimate was empty
    MissingData,
    /// The requested connectivity method has no implementation
    UnsupportedMethod(String),
}

/// A network node at a 3-D position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkNode {
    pub id: usize,
    pub position: [f32; 3],
}

/// An undirected weighted edge (`from < to`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkEdge {
    pub from: usize,
    pub to: usize,
    pub weight: f64,
}

/// Result of a connectivity measure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    /// Connectivity method that produced the network ("COR", "XCOR", ...)
    pub method: String,
    pub nodes: Vec<NetworkNode>,
    pub edges: Vec<NetworkEdge>,
    pub status: NetworkStatus,
}

impl Network {
    /// Create an edgeless network with one node per row of `positions` (`n × 3`)
    pub fn new(method: impl Into<String>, positions: &Array2<f32>) -> Self {
        let nodes = positions
            .rows()
            .into_iter()
            .enumerate()
            .map(|(id, row)| NetworkNode {
                id,
                position: [row[0], row[1], row[2]],
            })
            .collect();

        Self {
            method: method.into(),
            nodes,
            edges: Vec::new(),
            status: NetworkStatus::Computed,
        }
    }

    /// Edgeless, nodeless network carrying `status`
    pub fn empty(method: impl Into<String>, status: NetworkStatus) -> Self {
        Self {
            method: method.into(),
            nodes: Vec::new(),
            edges: Vec::new(),
            status,
        }
    }

    /// Empty network for a computation whose input data could not be acquired
    pub fn missing_data(method: impl Into<String>) -> Self {
        Self::empty(method, NetworkStatus::MissingData)
    }

    /// Empty network for a connectivity method without an implementation
    pub fn unsupported(method: impl Into<String>) -> Self {
        let method = method.into();
        Self::empty(method.clone(), NetworkStatus::UnsupportedMethod(method))
    }

    /// Add an undirected edge; both endpoints must be existing node ids
    pub fn add_edge(&mut self, from: usize, to: usize, weight: f64) -> Result<()> {
        let (from, to) = if from <= to { (from, to) } else { (to, from) };
        if to >= self.nodes.len() {
            return Err(ConnError::InvalidParameter(format!(
                "Edge {}-{} references a node outside the {}-node network",
                from,
                to,
                self.nodes.len()
            )));
        }
        self.edges.push(NetworkEdge { from, to, weight });
        Ok(())
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn is_computed(&self) -> bool {
        self.status == NetworkStatus::Computed
    }

    /// Dense symmetric `num_nodes × num_nodes` adjacency matrix
    pub fn adjacency(&self) -> Array2<f64> {
        let n = self.num_nodes();
        let mut matrix = Array2::<f64>::zeros((n, n));
        for edge in &self.edges {
            matrix[[edge.from, edge.to]] = edge.weight;
            matrix[[edge.to, edge.from]] = edge.weight;
        }
        matrix
    }

    /// Copy of the network keeping only edges with `|weight| >= threshold`
    pub fn threshold(&self, threshold: f64) -> Self {
        Self {
            edges: self
                .edges
                .iter()
                .filter(|e| e.weight.abs() >= threshold)
                .cloned()
                .collect(),
            ..self.clone()
        }
    }
}
