//! Compressed Sparse Row (CSR) graph representation
//!
//! CSR is optimized for iteration over neighbors, which is exactly what the
//! power iterations of LexRank and TextRank need.

use super::builder::GraphBuilder;

/// A sentence graph in Compressed Sparse Row format
#[derive(Debug, Clone)]
pub struct CsrGraph {
    /// Number of nodes (sentences)
    pub num_nodes: usize,
    /// Row pointers: node i's edges are at indices row_ptr[i]..row_ptr[i+1]
    pub row_ptr: Vec<usize>,
    /// Column indices (target nodes) for each edge
    pub col_idx: Vec<u32>,
    /// Edge weights
    pub weights: Vec<f64>,
    /// Total outgoing weight for each node
    pub total_weight: Vec<f64>,
}

impl CsrGraph {
    /// Convert a GraphBuilder into CSR format
    pub fn from_builder(builder: &GraphBuilder) -> Self {
        let num_nodes = builder.node_count();
        let mut row_ptr = Vec::with_capacity(num_nodes + 1);
        let mut col_idx = Vec::new();
        let mut weights = Vec::new();
        let mut total_weight = Vec::with_capacity(num_nodes);

        row_ptr.push(0);

        for (_, node) in builder.nodes() {
            // Sorted edges keep the weight sums and iteration order reproducible
            let mut edges: Vec<_> = node.edges.iter().map(|(&k, &v)| (k, v)).collect();
            edges.sort_by_key(|(k, _)| *k);

            total_weight.push(edges.iter().map(|(_, w)| w).sum());

            for (target, weight) in edges {
                col_idx.push(target);
                weights.push(weight);
            }

            row_ptr.push(col_idx.len());
        }

        Self {
            num_nodes,
            row_ptr,
            col_idx,
            weights,
            total_weight,
        }
    }

    /// Iterate over neighbors of a node
    pub fn neighbors(&self, node: u32) -> impl Iterator<Item = (u32, f64)> + '_ {
        let start = self.row_ptr[node as usize];
        let end = self.row_ptr[node as usize + 1];
        (start..end).map(move |i| (self.col_idx[i], self.weights[i]))
    }

    /// Get the total outgoing weight of a node
    pub fn node_total_weight(&self, node: u32) -> f64 {
        self.total_weight[node as usize]
    }

    /// Get the total number of edges (counting each undirected edge twice)
    pub fn num_edges(&self) -> usize {
        self.col_idx.len()
    }

    /// Find dangling nodes (isolated sentences with no outgoing weight)
    pub fn dangling_nodes(&self) -> Vec<u32> {
        (0..self.num_nodes as u32)
            .filter(|&n| self.total_weight[n as usize] <= 0.0)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_test_graph() -> GraphBuilder {
        let mut builder = GraphBuilder::new(3);
        builder.set_edge(0, 1, 0.2);
        builder.set_edge(1, 2, 0.4);
        builder.set_edge(0, 2, 0.3);
        builder
    }

    #[test]
    fn test_csr_conversion() {
        let csr = CsrGraph::from_builder(&build_test_graph());

        assert_eq!(csr.num_nodes, 3);
        assert_eq!(csr.num_edges(), 6);
        assert_eq!(csr.row_ptr, vec![0, 2, 4, 6]);
    }

    #[test]
    fn test_neighbor_iteration_sorted() {
        let csr = CsrGraph::from_builder(&build_test_graph());

        let neighbors: Vec<_> = csr.neighbors(2).collect();
        assert_eq!(neighbors.len(), 2);
        assert_eq!(neighbors[0].0, 0);
        assert_eq!(neighbors[1].0, 1);
        assert!((neighbors[0].1 - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_total_weight() {
        let csr = CsrGraph::from_builder(&build_test_graph());

        assert_eq!(csr.neighbors(0).count(), 2);
        assert!((csr.node_total_weight(0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_empty_graph() {
        let csr = CsrGraph::from_builder(&GraphBuilder::new(0));

        assert_eq!(csr.num_nodes, 0);
        assert_eq!(csr.row_ptr, vec![0]);
        assert_eq!(csr.num_edges(), 0);
    }

    #[test]
    fn test_dangling_nodes() {
        let mut builder = GraphBuilder::new(3);
        builder.set_edge(0, 1, 1.0);

        let csr = CsrGraph::from_builder(&builder);
        assert_eq!(csr.dangling_nodes(), vec![2]);
    }
}
