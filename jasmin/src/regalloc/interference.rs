use super::types::*;
use ir::{Method, VarScope};
use util::Id;

// field-scoped names live in the object, not in a slot
fn is_slot_variable(method: &Method, x: &str) -> bool {
    method
        .var_table
        .get(x)
        .map_or(true, |d| d.scope != VarScope::Field)
}

pub fn build(method: &Method, live: &Liveness) -> InterferenceGraph {
    let mut graph = InterferenceGraph::new();

    for (x, _) in method.var_table.iter().filter(|(_, d)| d.scope != VarScope::Field) {
        graph.add_node(x);
    }

    for i in 0..live.len() {
        let mut alive: Vec<&Id> = live.def[i]
            .union(&live.live_out[i])
            .filter(|x| is_slot_variable(method, x))
            .collect();
        alive.sort();

        for (j, u) in alive.iter().enumerate() {
            graph.add_node(u);
            for v in &alive[j + 1..] {
                graph.add_edge(u, v);
            }
        }
    }

    graph
}
