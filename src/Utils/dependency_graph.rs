//! Bipartite dependency graph of a generated system: an edge y_j -> f_i for every variable
//! that appears in at least one addend of the i-th equation.
use crate::Utils::plots::render_error;
use crate::symbolic::equations_error::EquationsError;
use crate::symbolic::nonlinearities::latex_subscript;
use crate::symbolic::random_equations::{Equation, Equations};
use log::info;
use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, NodeIndex};
use plotters::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;

pub const DEFAULT_GRAPH_FILE: &str = "graph.png";
/// optimal node distance of the spring layout
pub const SPRING_K: f64 = 10.0;
pub const SPRING_ITERATIONS: usize = 5000;
const LAYOUT_SEED: u64 = 42;

const VARIABLE_COLOR: RGBColor = RGBColor(135, 206, 235);
const EQUATION_COLOR: RGBColor = RGBColor(144, 238, 144);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GraphNode {
    Variable(usize),
    Equation(usize),
}

impl fmt::Display for GraphNode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GraphNode::Variable(j) => write!(f, "y_{}", latex_subscript(j + 1)),
            GraphNode::Equation(i) => write!(f, "f_{}", latex_subscript(i + 1)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DependencyGraph {
    graph: DiGraph<GraphNode, ()>,
    variables: Vec<NodeIndex>,
    functions: Vec<NodeIndex>,
}

impl DependencyGraph {
    pub fn from_equations(equations: &Equations) -> DependencyGraph {
        DependencyGraph::from_structure(equations.n_vars(), equations.equations())
    }

    /// Repeated (variable, equation) pairs coming from different addends give one edge.
    pub fn from_structure(n_vars: usize, equations: &[Equation]) -> DependencyGraph {
        let mut graph = DiGraph::new();
        let variables: Vec<NodeIndex> = (0..n_vars)
            .map(|j| graph.add_node(GraphNode::Variable(j)))
            .collect();
        let functions: Vec<NodeIndex> = (0..equations.len())
            .map(|i| graph.add_node(GraphNode::Equation(i)))
            .collect();
        for (i, equation) in equations.iter().enumerate() {
            for term in equation {
                for j in term.active_variables() {
                    if let Some(&var) = variables.get(j) {
                        graph.update_edge(var, functions[i], ());
                    }
                }
            }
        }
        DependencyGraph {
            graph,
            variables,
            functions,
        }
    }

    pub fn graph(&self) -> &DiGraph<GraphNode, ()> {
        &self.graph
    }

    pub fn has_edge(&self, var: usize, eq: usize) -> bool {
        match (self.variables.get(var), self.functions.get(eq)) {
            (Some(&a), Some(&b)) => self.graph.contains_edge(a, b),
            _ => false,
        }
    }

    /// (variable, equation) pairs, sorted
    pub fn edges(&self) -> Vec<(usize, usize)> {
        let mut edges: Vec<(usize, usize)> = self
            .graph
            .edge_indices()
            .filter_map(|e| self.graph.edge_endpoints(e))
            .filter_map(|(a, b)| match (self.graph[a], self.graph[b]) {
                (GraphNode::Variable(j), GraphNode::Equation(i)) => Some((j, i)),
                _ => None,
            })
            .collect();
        edges.sort_unstable();
        edges
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn to_dot(&self) -> String {
        format!("{:?}", Dot::with_config(&self.graph, &[Config::EdgeNoLabel]))
    }

    /// Fruchterman-Reingold force-directed layout, positions rescaled into [-1, 1]^2.
    /// Edges attract regardless of direction. Indexed by node index.
    pub fn spring_layout(&self, k: f64, iterations: usize, seed: u64) -> Vec<(f64, f64)> {
        let n = self.graph.node_count();
        if n == 0 {
            return Vec::new();
        }
        if n == 1 {
            return vec![(0.0, 0.0)];
        }
        let mut rng = StdRng::seed_from_u64(seed);
        let mut pos: Vec<(f64, f64)> = (0..n)
            .map(|_| (rng.random_range(0.0..1.0), rng.random_range(0.0..1.0)))
            .collect();
        let mut adjacent = vec![vec![false; n]; n];
        for e in self.graph.edge_indices() {
            if let Some((a, b)) = self.graph.edge_endpoints(e) {
                adjacent[a.index()][b.index()] = true;
                adjacent[b.index()][a.index()] = true;
            }
        }
        let mut temperature = 0.1;
        let dt = temperature / (iterations as f64 + 1.0);
        for _ in 0..iterations {
            let mut displacement = vec![(0.0, 0.0); n];
            for a in 0..n {
                for b in 0..n {
                    if a == b {
                        continue;
                    }
                    let dx = pos[a].0 - pos[b].0;
                    let dy = pos[a].1 - pos[b].1;
                    let distance = (dx * dx + dy * dy).sqrt().max(0.01);
                    let attraction = if adjacent[a][b] { distance / k } else { 0.0 };
                    let force = k * k / (distance * distance) - attraction;
                    displacement[a].0 += dx * force;
                    displacement[a].1 += dy * force;
                }
            }
            for (p, d) in pos.iter_mut().zip(displacement) {
                let length = (d.0 * d.0 + d.1 * d.1).sqrt().max(0.01);
                p.0 += d.0 * temperature / length;
                p.1 += d.1 * temperature / length;
            }
            temperature -= dt;
        }
        rescale(pos)
    }

    /// Draw the graph into a png (`filename` or graph.png) when `save`, otherwise print the
    /// edge list. Variables are blue, equations green.
    pub fn show_graph(&self, save: bool, filename: Option<&str>) -> Result<(), EquationsError> {
        if !save {
            for (j, i) in self.edges() {
                println!("{} -> {}", GraphNode::Variable(j), GraphNode::Equation(i));
            }
            return Ok(());
        }
        let filename = filename.unwrap_or(DEFAULT_GRAPH_FILE);
        let (width, height) = (800i32, 600i32);
        let pos = self.spring_layout(SPRING_K, SPRING_ITERATIONS, LAYOUT_SEED);
        let to_pixels = |(x, y): (f64, f64)| -> (i32, i32) {
            (
                (width as f64 * (0.5 + 0.42 * x)) as i32,
                (height as f64 * (0.5 - 0.42 * y)) as i32,
            )
        };

        let root_area = BitMapBackend::new(filename, (width as u32, height as u32)).into_drawing_area();
        root_area.fill(&WHITE).map_err(render_error)?;
        for e in self.graph.edge_indices() {
            if let Some((a, b)) = self.graph.edge_endpoints(e) {
                let from = to_pixels(pos[a.index()]);
                let to = to_pixels(pos[b.index()]);
                root_area
                    .draw(&PathElement::new(vec![from, to], BLACK.stroke_width(2)))
                    .map_err(render_error)?;
                // arrow head: small dot on the segment close to the target
                let head = (
                    to.0 + ((from.0 - to.0) as f64 * 0.12) as i32,
                    to.1 + ((from.1 - to.1) as f64 * 0.12) as i32,
                );
                root_area
                    .draw(&Circle::new(head, 5, BLACK.filled()))
                    .map_err(render_error)?;
            }
        }
        for node in self.graph.node_indices() {
            let center = to_pixels(pos[node.index()]);
            let color = match self.graph[node] {
                GraphNode::Variable(_) => VARIABLE_COLOR,
                GraphNode::Equation(_) => EQUATION_COLOR,
            };
            root_area
                .draw(&Circle::new(center, 25, color.filled()))
                .map_err(render_error)?;
            root_area
                .draw(&Text::new(
                    self.graph[node].to_string(),
                    (center.0 - 15, center.1 - 8),
                    ("sans-serif", 16).into_font(),
                ))
                .map_err(render_error)?;
        }
        root_area.present().map_err(render_error)?;
        info!(
            "dependency graph with {} nodes and {} edges saved to {}",
            self.node_count(),
            self.edge_count(),
            filename
        );
        Ok(())
    }
}

fn rescale(pos: Vec<(f64, f64)>) -> Vec<(f64, f64)> {
    let n = pos.len() as f64;
    let cx = pos.iter().map(|p| p.0).sum::<f64>() / n;
    let cy = pos.iter().map(|p| p.1).sum::<f64>() / n;
    let centered: Vec<(f64, f64)> = pos.iter().map(|p| (p.0 - cx, p.1 - cy)).collect();
    let lim = centered
        .iter()
        .map(|p| p.0.abs().max(p.1.abs()))
        .fold(0.0, f64::max);
    if lim > 0.0 {
        centered.into_iter().map(|p| (p.0 / lim, p.1 / lim)).collect()
    } else {
        centered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::nonlinearities::{Palette, StandardNonLinearity};
    use crate::symbolic::random_equations::{GeneratorConfig, Slot, Term};

    fn palette() -> Palette {
        Palette::from_standard(&[StandardNonLinearity::Sin, StandardNonLinearity::Exp]).unwrap()
    }

    #[test]
    fn test_edges_of_hand_made_system() {
        // f_1 = sin(y_1)exp(y_3) + sin(y_1); f_2 = exp(y_2)
        let eq1 = vec![
            Term::from_slots(vec![
                Slot::Applied(vec![0]),
                Slot::Identity,
                Slot::Applied(vec![1]),
            ]),
            Term::from_slots(vec![Slot::Applied(vec![0]), Slot::Identity, Slot::Identity]),
        ];
        let eq2 = vec![Term::from_slots(vec![
            Slot::Identity,
            Slot::Applied(vec![1]),
            Slot::Identity,
        ])];
        let config = GeneratorConfig::new(3, 2, 2, 2, None);
        let system = Equations::from_parts(config, palette(), vec![eq1, eq2], None).unwrap();
        let graph = DependencyGraph::from_equations(&system);
        assert_eq!(graph.node_count(), 5);
        assert_eq!(graph.edges(), vec![(0, 0), (1, 1), (2, 0)]);
        assert!(graph.has_edge(0, 0));
        assert!(!graph.has_edge(1, 0));
        assert!(!graph.has_edge(7, 0));
    }

    #[test]
    fn test_every_referenced_variable_has_edge() {
        let system = Equations::new(6, 7, 4, 3, palette(), Some(3)).unwrap();
        let graph = DependencyGraph::from_equations(&system);
        let mut expected = Vec::new();
        for (i, equation) in system.equations().iter().enumerate() {
            for term in equation {
                for j in term.active_variables() {
                    assert!(graph.has_edge(j, i));
                    expected.push((j, i));
                }
            }
        }
        expected.sort_unstable();
        expected.dedup();
        assert_eq!(graph.edges(), expected);
    }

    #[test]
    fn test_constant_equation_is_isolated() {
        let config = GeneratorConfig::new(2, 1, 1, 1, None);
        let system =
            Equations::from_parts(config, palette(), vec![vec![Term::identity(2)]], None).unwrap();
        let graph = DependencyGraph::from_equations(&system);
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_dot_export() {
        let system = Equations::new(2, 2, 2, 2, palette(), None).unwrap();
        let dot = DependencyGraph::from_equations(&system).to_dot();
        assert!(dot.starts_with("digraph"));
        assert!(dot.contains("Variable(0)"));
        assert!(dot.contains("Equation(1)"));
    }

    #[test]
    fn test_spring_layout() {
        let system = Equations::new(4, 3, 3, 2, palette(), None).unwrap();
        let graph = DependencyGraph::from_equations(&system);
        let pos = graph.spring_layout(SPRING_K, 200, 1);
        assert_eq!(pos.len(), graph.node_count());
        assert!(
            pos.iter()
                .all(|p| p.0.is_finite() && p.1.is_finite() && p.0.abs() <= 1.0 + 1e-9 && p.1.abs() <= 1.0 + 1e-9)
        );
        assert_eq!(pos, graph.spring_layout(SPRING_K, 200, 1));
    }

    #[test]
    fn test_show_graph() {
        let system = Equations::new(3, 2, 2, 2, palette(), None).unwrap();
        let graph = DependencyGraph::from_equations(&system);
        assert!(graph.show_graph(false, None).is_ok());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.png");
        match graph.show_graph(true, path.to_str()) {
            Ok(()) => assert!(path.exists()),
            Err(e) => assert!(matches!(e, EquationsError::Render(_))),
        }
    }
}
