//! Build ordering between project modules.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{Dfs, Reversed};
use rustc_hash::FxHashMap;

use crate::error::{Error, Result};

/// Dependency graph over module names. Edges go from a module to the modules
/// that depend on it.
#[derive(Debug, Default)]
pub struct ModuleGraph {
    graph: DiGraph<usize, ()>,
    names: Vec<String>,
    node_indices: FxHashMap<String, NodeIndex>,
}

impl ModuleGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a module; returns its position.
    pub fn add_module(&mut self, name: impl Into<String>) -> usize {
        let name = name.into();
        if let Some(&idx) = self.node_indices.get(&name) {
            return self.graph[idx];
        }
        let position = self.names.len();
        let idx = self.graph.add_node(position);
        self.node_indices.insert(name.clone(), idx);
        self.names.push(name);
        position
    }

    /// Record that `dependent` must be built after `dependency`.
    pub fn add_dependency(&mut self, dependent: &str, dependency: &str) -> Result<()> {
        let (Some(&to), Some(&from)) = (
            self.node_indices.get(dependent),
            self.node_indices.get(dependency),
        ) else {
            return Err(Error::Configuration(format!(
                "module '{dependent}' depends on unknown module '{dependency}'"
            )));
        };
        if to == from {
            return Err(Error::CyclicDependency(format!("{dependent} → {dependent}")));
        }
        self.graph.add_edge(from, to, ());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn name(&self, position: usize) -> Option<&str> {
        self.names.get(position).map(String::as_str)
    }

    /// Detect cycles and name the modules on one.
    pub fn detect_cycles(&self) -> Result<()> {
        use petgraph::algo::kosaraju_scc;

        for scc in kosaraju_scc(&self.graph) {
            if scc.len() > 1 {
                let cycle: Vec<&str> = scc
                    .iter()
                    .map(|&idx| self.names[self.graph[idx]].as_str())
                    .collect();
                return Err(Error::CyclicDependency(format!(
                    "{} → {}",
                    cycle.join(" → "),
                    cycle[0]
                )));
            }
        }
        Ok(())
    }

    /// Module positions in build order.
    pub fn topological_order(&self) -> Result<Vec<usize>> {
        use petgraph::algo::toposort;

        toposort(&self.graph, None)
            .map(|nodes| nodes.into_iter().map(|idx| self.graph[idx]).collect())
            .map_err(|cycle| {
                let name = &self.names[self.graph[cycle.node_id()]];
                Error::CyclicDependency(format!("cycle detected at module '{name}'"))
            })
    }

    /// `name` and everything it transitively depends on, in build order.
    pub fn build_order_for(&self, name: &str) -> Result<Vec<usize>> {
        let Some(&start) = self.node_indices.get(name) else {
            return Err(Error::Configuration(format!("no module named '{name}'")));
        };

        let reversed = Reversed(&self.graph);
        let mut dfs = Dfs::new(reversed, start);
        let mut needed = vec![false; self.names.len()];
        while let Some(idx) = dfs.next(reversed) {
            needed[self.graph[idx]] = true;
        }

        Ok(self
            .topological_order()?
            .into_iter()
            .filter(|&position| needed[position])
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(modules: &[(&str, &[&str])]) -> Result<ModuleGraph> {
        let mut graph = ModuleGraph::new();
        for (name, _) in modules {
            graph.add_module(*name);
        }
        for (name, deps) in modules {
            for dep in *deps {
                graph.add_dependency(name, dep)?;
            }
        }
        graph.detect_cycles()?;
        Ok(graph)
    }

    fn names(graph: &ModuleGraph, order: &[usize]) -> Vec<String> {
        order
            .iter()
            .map(|&p| graph.name(p).unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_linear_order() {
        let graph = graph(&[("app", &["util"]), ("util", &["base"]), ("base", &[])]).unwrap();
        let order = graph.topological_order().unwrap();
        assert_eq!(names(&graph, &order), vec!["base", "util", "app"]);
    }

    #[test]
    fn test_build_order_for_subset() {
        let graph = graph(&[
            ("base", &[]),
            ("util", &["base"]),
            ("app", &["util"]),
            ("docs", &[]),
        ])
        .unwrap();
        let order = graph.build_order_for("util").unwrap();
        assert_eq!(names(&graph, &order), vec!["base", "util"]);
        assert!(graph.build_order_for("missing").is_err());
    }

    #[test]
    fn test_cycle_detection() {
        let err = graph(&[("a", &["c"]), ("b", &["a"]), ("c", &["b"])]).unwrap_err();
        assert!(matches!(err, Error::CyclicDependency(_)));

        let err = graph(&[("a", &["a"])]).unwrap_err();
        assert!(matches!(err, Error::CyclicDependency(_)));
    }

    #[test]
    fn test_unknown_dependency() {
        let err = graph(&[("a", &["nope"])]).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }
}
