//! core::graph
//!
//! Command dependency graph.
//!
//! # Architecture
//!
//! The dependency graph is a DAG where:
//! - Nodes are finalized commands
//! - Edges point from a command to each of its prerequisites
//! - Roots are commands with no prerequisites
//!
//! # Invariants
//!
//! - Graph must be acyclic; [`DependencyGraph::set_prerequisites`] refuses
//!   any edge set that would close a cycle and leaves the graph untouched
//! - Prerequisite lists are de-duplicated and keep declaration order

use super::types::CommandId;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};

/// A rejected edge set: `via` is the prerequisite from which the command
/// is reachable again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleDetected {
    pub command: CommandId,
    pub via: CommandId,
}

/// Prerequisite graph over command ids.
#[derive(Debug, Default, Clone)]
pub struct DependencyGraph {
    /// Prerequisites of each command, in declaration order
    prerequisites: BTreeMap<CommandId, Vec<CommandId>>,
    /// Cached reverse edges (derived from prerequisites)
    dependents: HashMap<CommandId, BTreeSet<CommandId>>,
}

impl DependencyGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command with no prerequisites.
    pub fn add_node(&mut self, command: CommandId) {
        self.prerequisites.entry(command).or_default();
    }

    /// Replace the prerequisite set of a command.
    ///
    /// # Errors
    ///
    /// Returns `CycleDetected` if `command` is reachable from any listed
    /// prerequisite (including `command` itself). The graph is not modified.
    pub fn set_prerequisites(
        &mut self,
        command: CommandId,
        prerequisites: &[CommandId],
    ) -> Result<(), CycleDetected> {
        let mut seen = HashSet::new();
        let deduped: Vec<CommandId> = prerequisites
            .iter()
            .copied()
            .filter(|id| seen.insert(*id))
            .collect();

        for &dep in &deduped {
            if self.reaches(dep, command) {
                return Err(CycleDetected { command, via: dep });
            }
        }

        if let Some(old) = self.prerequisites.insert(command, deduped.clone()) {
            for dep in old {
                if let Some(set) = self.dependents.get_mut(&dep) {
                    set.remove(&command);
                }
            }
        }
        for dep in deduped {
            self.prerequisites.entry(dep).or_default();
            self.dependents.entry(dep).or_default().insert(command);
        }
        Ok(())
    }

    /// Whether `to` is reachable from `from` by following prerequisite
    /// edges. A node reaches itself.
    pub fn reaches(&self, from: CommandId, to: CommandId) -> bool {
        let mut visited = HashSet::new();
        let mut queue = VecDeque::from([from]);

        while let Some(current) = queue.pop_front() {
            if current == to {
                return true;
            }
            if !visited.insert(current) {
                continue;
            }
            if let Some(deps) = self.prerequisites.get(&current) {
                queue.extend(deps.iter().copied());
            }
        }
        false
    }

    /// Direct prerequisites of a command.
    pub fn prerequisites(&self, command: CommandId) -> &[CommandId] {
        self.prerequisites
            .get(&command)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Commands that list `command` as a direct prerequisite.
    pub fn dependents(&self, command: CommandId) -> Vec<CommandId> {
        self.dependents
            .get(&command)
            .map(|s| s.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Check if the graph contains cycles.
    ///
    /// Returns `Some(command)` if a cycle is detected starting from that
    /// command. Only reachable through a bug, since `set_prerequisites`
    /// rejects cycles.
    pub fn find_cycle(&self) -> Option<CommandId> {
        let mut visited = HashSet::new();
        let mut path = HashSet::new();

        for &command in self.prerequisites.keys() {
            if self.has_cycle_from(command, &mut visited, &mut path) {
                return Some(command);
            }
        }
        None
    }

    fn has_cycle_from(
        &self,
        command: CommandId,
        visited: &mut HashSet<CommandId>,
        path: &mut HashSet<CommandId>,
    ) -> bool {
        if path.contains(&command) {
            return true;
        }
        if visited.contains(&command) {
            return false;
        }

        visited.insert(command);
        path.insert(command);

        for &dep in self.prerequisites(command) {
            if self.has_cycle_from(dep, visited, path) {
                return true;
            }
        }

        path.remove(&command);
        false
    }

    /// Length of the longest prerequisite chain below a command.
    fn depth(&self, command: CommandId, memo: &mut HashMap<CommandId, usize>) -> usize {
        if let Some(&d) = memo.get(&command) {
            return d;
        }
        let d = self
            .prerequisites(command)
            .iter()
            .map(|&dep| self.depth(dep, memo) + 1)
            .max()
            .unwrap_or(0);
        memo.insert(command, d);
        d
    }

    /// All transitive prerequisites of a command, in an order in which they
    /// could be run (every prerequisite before its dependents).
    ///
    /// # Example
    ///
    /// ```
    /// use stageshell::core::graph::DependencyGraph;
    /// # use stageshell::core::registry::Shell;
    /// # let mut shell: Shell<()> = Shell::new();
    /// # let mut ids = Vec::new();
    /// # for name in ["read", "link", "build"] {
    /// #     let draft = shell.add_command(name).unwrap();
    /// #     ids.push(shell.finalize_command(draft, "").unwrap());
    /// # }
    /// # let (read, link, build) = (ids[0], ids[1], ids[2]);
    /// let mut graph = DependencyGraph::new();
    /// graph.set_prerequisites(link, &[read]).unwrap();
    /// graph.set_prerequisites(build, &[link]).unwrap();
    ///
    /// assert_eq!(graph.prerequisite_order(build), vec![read, link]);
    /// ```
    pub fn prerequisite_order(&self, command: CommandId) -> Vec<CommandId> {
        let mut all = HashSet::new();
        let mut queue: VecDeque<CommandId> = self.prerequisites(command).iter().copied().collect();
        while let Some(current) = queue.pop_front() {
            if all.insert(current) {
                queue.extend(self.prerequisites(current).iter().copied());
            }
        }

        let mut memo = HashMap::new();
        let mut ordered: Vec<(usize, CommandId)> = all
            .into_iter()
            .map(|c| (self.depth(c, &mut memo), c))
            .collect();
        ordered.sort();
        ordered.into_iter().map(|(_, c)| c).collect()
    }

    /// Every known command in dependency order.
    ///
    /// Sorted by depth (roots first), then by id for determinism.
    pub fn topological_order(&self) -> Vec<CommandId> {
        let mut memo = HashMap::new();
        let mut by_depth: Vec<(usize, CommandId)> = self
            .prerequisites
            .keys()
            .map(|&c| (self.depth(c, &mut memo), c))
            .collect();
        by_depth.sort();
        by_depth.into_iter().map(|(_, c)| c).collect()
    }
}
