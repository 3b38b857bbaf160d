use super::types::*;
use ir::VarTable;
use util::{Id, Map, Set};

fn pick(working: &[Id], degrees: &Map<Id, usize>, k: usize) -> usize {
    // `working` is sorted, so ties go to the smallest name
    if let Some(i) = working.iter().position(|x| degrees[x] < k) {
        return i;
    }

    let mut best = 0;
    for (i, x) in working.iter().enumerate() {
        if degrees[x] > degrees[&working[best]] {
            best = i;
        }
    }
    best
}

/// Colors the non-pinned nodes of `graph` with slots starting right after the
/// highest pinned slot of `table`. When no node has fewer than `k` remaining
/// neighbours the densest one is removed anyway, so the result may use more
/// than `k` slots; `Coloring::needed` tells how many were used.
pub fn color(graph: &InterferenceGraph, table: &VarTable, k: usize) -> Coloring {
    let offset = table
        .values()
        .filter(|d| d.is_pinned())
        .map(|d| d.slot + 1)
        .max()
        .unwrap_or(0);

    let is_pinned = |x: &str| table.get(x).map_or(false, |d| d.is_pinned());

    let mut working: Vec<Id> = graph.nodes().filter(|x| !is_pinned(x)).cloned().collect();
    working.sort();

    // pinned neighbours stay in the degree count for good
    let mut degrees: Map<Id, usize> = working.iter().map(|x| (x.clone(), graph.degree(x))).collect();

    let mut stack = Vec::with_capacity(working.len());
    while !working.is_empty() {
        let x = working.remove(pick(&working, &degrees, k));
        for y in graph.neighbors(&x) {
            if let Some(d) = degrees.get_mut(y) {
                *d = d.saturating_sub(1);
            }
        }
        degrees.remove(&x);
        stack.push(x);
    }

    let mut colors: Map<Id, usize> = table
        .iter()
        .filter(|(x, d)| d.is_pinned() && graph.contains(x))
        .map(|(x, d)| (x.clone(), d.slot))
        .collect();

    let mut slots = Map::default();
    let mut needed = 0;
    while let Some(x) = stack.pop() {
        let taken: Set<usize> = graph
            .neighbors(&x)
            .filter_map(|y| colors.get(y).copied())
            .collect();

        let j = (0..).find(|j| !taken.contains(&(offset + j))).unwrap_or_default();
        if j >= k {
            log::debug!("`{x}` spills past the budget of {k} into slot {}", offset + j);
        }

        needed = needed.max(j + 1);
        colors.insert(x.clone(), offset + j);
        slots.insert(x, offset + j);
    }

    Coloring {
        slots,
        offset,
        needed,
    }
}
