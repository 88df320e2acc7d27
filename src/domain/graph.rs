//! Dependency graph for a task batch
//!
//! Edges point from a task to its prerequisites. Unlike a planning graph,
//! cycles are allowed here: the graph is built from whatever the batch says
//! and [`DependencyGraph::find_cycles`] reports the loops it contains.
//! Uses petgraph for storage.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

use super::task::Task;

/// A closed dependency loop: the re-entered ID comes first and is repeated last
pub type Cycle = Vec<String>;

/// Cycles found in a batch, in the order they were first encountered
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Cycles(Vec<Cycle>);

impl Cycles {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cycle> {
        self.0.iter()
    }

    /// Returns every ID that takes part in at least one cycle
    pub fn members(&self) -> HashSet<&str> {
        self.0
            .iter()
            .flat_map(|cycle| cycle.iter().map(String::as_str))
            .collect()
    }
}

/// Traversal state of a node during cycle search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    Unvisited,
    InProgress,
    Finished,
}

/// One level of the explicit DFS stack
struct Frame {
    node: NodeIndex,
    pending: std::vec::IntoIter<NodeIndex>,
}

/// A dependency graph over the tasks of one batch
#[derive(Debug, Default)]
pub struct DependencyGraph {
    /// The underlying directed graph (task -> prerequisite)
    graph: DiGraph<String, ()>,

    /// Map from task ID to node index
    node_map: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
    /// Creates an empty dependency graph
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_map: HashMap::new(),
        }
    }

    /// Builds a graph from a batch of tasks
    ///
    /// Tasks sharing an ID collapse into one node: it keeps the position of
    /// the first occurrence and the dependencies of the last.
    pub fn from_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        Self::from_entries(
            tasks
                .into_iter()
                .map(|t| (t.id.as_str(), t.dependencies.as_slice())),
        )
    }

    /// Builds a graph from `(task ID, dependency IDs)` entries
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a [String])>) -> Self {
        let mut graph = Self::new();

        // First pass: add all nodes, remembering the last dependency list per ID
        let mut order: Vec<&'a str> = Vec::new();
        let mut deps_by_id: HashMap<&'a str, &'a [String]> = HashMap::new();
        for (id, deps) in entries {
            if !graph.contains(id) {
                graph.add_task(id);
                order.push(id);
            }
            deps_by_id.insert(id, deps);
        }

        // Second pass: add edges in node order; unknown targets are skipped
        for id in order {
            let deps = deps_by_id.get(id).copied().unwrap_or_default();
            for dep in deps {
                graph.add_dependency(id, dep);
            }
        }

        graph
    }

    /// Adds a task to the graph (no-op if already present)
    pub fn add_task(&mut self, task_id: &str) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(task_id) {
            return idx;
        }
        let idx = self.graph.add_node(task_id.to_string());
        self.node_map.insert(task_id.to_string(), idx);
        idx
    }

    /// Adds an edge meaning `task` depends on `depends_on`
    ///
    /// Returns false if either task is unknown. Self-dependencies and repeated
    /// edges are accepted.
    pub fn add_dependency(&mut self, task: &str, depends_on: &str) -> bool {
        match (self.node_map.get(task), self.node_map.get(depends_on)) {
            (Some(&from), Some(&to)) => {
                self.graph.add_edge(from, to, ());
                true
            }
            _ => false,
        }
    }

    /// Prerequisites of a node in the order they were added
    fn ordered_dependencies(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        // petgraph yields the most recently added edge first
        let mut deps: Vec<NodeIndex> = self.graph.neighbors(idx).collect();
        deps.reverse();
        deps
    }

    /// Returns the direct dependencies of a task that exist in the graph
    pub fn dependencies(&self, task_id: &str) -> Vec<&str> {
        let Some(&idx) = self.node_map.get(task_id) else {
            return vec![];
        };

        self.ordered_dependencies(idx)
            .into_iter()
            .map(|dep| self.graph[dep].as_str())
            .collect()
    }

    /// Returns the other tasks that depend on `task_id`, each once, in batch order
    pub fn dependents(&self, task_id: &str) -> Vec<&str> {
        let Some(&idx) = self.node_map.get(task_id) else {
            return vec![];
        };

        let mut sources: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(idx, Direction::Incoming)
            .filter(|&src| src != idx)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        sources.sort();

        sources
            .into_iter()
            .map(|src| self.graph[src].as_str())
            .collect()
    }

    /// Returns how many other tasks depend on `task_id`
    pub fn dependent_count(&self, task_id: &str) -> usize {
        self.dependents(task_id).len()
    }

    /// Finds dependency cycles with a three-color depth-first search
    ///
    /// Roots are tried in batch order. When an edge reaches a node that is
    /// still on the current path, the path from that node to the current one
    /// is recorded (closed by repeating the re-entered node) and the edge is
    /// not followed further. Each re-entry is reported once, so the result is
    /// not an exhaustive list of elementary cycles.
    pub fn find_cycles(&self) -> Cycles {
        let mut color = vec![Color::Unvisited; self.graph.node_count()];
        let mut cycles = Vec::new();

        for root in self.graph.node_indices() {
            if color[root.index()] != Color::Unvisited {
                continue;
            }

            color[root.index()] = Color::InProgress;
            let mut stack = vec![Frame {
                node: root,
                pending: self.ordered_dependencies(root).into_iter(),
            }];

            while let Some(frame) = stack.last_mut() {
                let Some(next) = frame.pending.next() else {
                    color[frame.node.index()] = Color::Finished;
                    stack.pop();
                    continue;
                };

                match color[next.index()] {
                    Color::Unvisited => {
                        color[next.index()] = Color::InProgress;
                        stack.push(Frame {
                            node: next,
                            pending: self.ordered_dependencies(next).into_iter(),
                        });
                    }
                    Color::InProgress => {
                        // Every in-progress node is on the stack
                        if let Some(start) = stack.iter().position(|f| f.node == next) {
                            let mut cycle: Cycle = stack[start..]
                                .iter()
                                .map(|f| self.graph[f.node].clone())
                                .collect();
                            cycle.push(self.graph[next].clone());
                            cycles.push(cycle);
                        }
                    }
                    Color::Finished => {}
                }
            }
        }

        Cycles(cycles)
    }

    /// Returns true if the graph contains the task
    pub fn contains(&self, task_id: &str) -> bool {
        self.node_map.contains_key(task_id)
    }

    /// Returns the number of tasks in the graph
    pub fn len(&self) -> usize {
        self.node_map.len()
    }

    /// Returns true if the graph is empty
    pub fn is_empty(&self) -> bool {
        self.node_map.is_empty()
    }

    /// Returns all task IDs in batch order
    pub fn task_ids(&self) -> impl Iterator<Item = &str> {
        self.graph.node_weights().map(String::as_str)
    }
}
