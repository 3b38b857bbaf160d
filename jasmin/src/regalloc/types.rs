use std::fmt;

use ir::Type;
use util::{Id, Map, Set};

// per-instruction sets, indexed like `Method::instructions`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Liveness {
    pub def: Vec<Set<Id>>,
    pub used: Vec<Set<Id>>,
    pub live_in: Vec<Set<Id>>,
    pub live_out: Vec<Set<Id>>,
    // first type seen for every variable
    pub types: Map<Id, Type>,
}

impl Liveness {
    pub fn len(&self) -> usize {
        self.def.len()
    }

    pub fn is_empty(&self) -> bool {
        self.def.is_empty()
    }
}

/// Undirected graph over variable names. Every edge is stored in both
/// directions and a node never interferes with itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterferenceGraph {
    edges: Map<Id, Set<Id>>,
}

impl InterferenceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, x: &str) {
        if !self.edges.contains_key(x) {
            self.edges.insert(x.to_string(), Set::default());
        }
    }

    pub fn add_edge(&mut self, u: &str, v: &str) {
        if u == v {
            self.add_node(u);
            return;
        }
        self.edges.entry(u.to_string()).or_default().insert(v.to_string());
        self.edges.entry(v.to_string()).or_default().insert(u.to_string());
    }

    pub fn contains(&self, x: &str) -> bool {
        self.edges.contains_key(x)
    }

    pub fn interferes(&self, u: &str, v: &str) -> bool {
        self.edges.get(u).map_or(false, |adj| adj.contains(v))
    }

    pub fn neighbors(&self, x: &str) -> impl Iterator<Item = &Id> {
        self.edges.get(x).into_iter().flatten()
    }

    pub fn degree(&self, x: &str) -> usize {
        self.edges.get(x).map_or(0, |adj| adj.len())
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Id> {
        self.edges.keys()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

impl fmt::Display for InterferenceGraph {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut nodes: Vec<_> = self.nodes().collect();
        nodes.sort();
        for x in nodes {
            let mut adj: Vec<_> = self.neighbors(x).collect();
            adj.sort();
            write!(f, "{x}: ")?;
            util::format_vec(f, &adj, "{", ", ", "}")?;
            writeln!(f)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Coloring {
    // non-pinned variable -> slot
    pub slots: Map<Id, usize>,
    // first slot available to non-pinned variables
    pub offset: usize,
    // number of distinct slots used above `offset`
    pub needed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocReport {
    pub method: String,
    pub requested: usize,
    pub needed: usize,
}

impl AllocReport {
    pub fn is_overflow(&self) -> bool {
        self.needed > self.requested
    }
}

impl fmt::Display for AllocReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}: {} register(s) requested, {} needed",
            self.method, self.requested, self.needed
        )?;
        if self.is_overflow() {
            write!(f, " (overflow)")?;
        }
        Ok(())
    }
}
