pub mod coloring;
pub mod interference;
pub mod liveness;
mod types;

pub use types::*;

use ir::{ClassUnit, Descriptor, Method, VarScope};

fn allocate_method(method: &mut Method, k: usize) -> Option<AllocReport> {
    if method.instructions.is_empty() || method.var_table.is_empty() {
        return None;
    }

    let live = liveness::analyze(method);
    let graph = interference::build(method, &live);
    log::debug!("interference graph of `{}`:\n{graph}", method.name);

    let coloring = coloring::color(&graph, &method.var_table, k);

    for x in util::sorted(&coloring.slots.keys().cloned().collect()) {
        let slot = coloring.slots[&x];
        match method.var_table.get_mut(&x) {
            Some(d) if d.is_pinned() => (),
            Some(d) => d.slot = slot,
            None => {
                if let Some(ty) = live.types.get(&x) {
                    log::debug!("registering `{x}` as a local of `{}`", method.name);
                    method
                        .var_table
                        .insert(x, Descriptor::new(VarScope::Local, slot, ty.clone()));
                }
            }
        }
    }

    let report = AllocReport {
        method: method.name.clone(),
        requested: k,
        needed: coloring.needed,
    };
    if report.is_overflow() {
        log::warn!("{report}");
    } else {
        log::debug!("{report}");
    }

    Some(report)
}

/// Reassigns the slots of every non-pinned variable so that variables that
/// are never live at the same time share a slot. A negative `k` leaves the
/// unit untouched.
pub fn allocate(unit: &mut ClassUnit, k: i32) -> Vec<AllocReport> {
    if k < 0 {
        return vec![];
    }

    log::info!("allocating registers for `{}` (k = {k})", unit.name);
    unit.methods
        .iter_mut()
        .filter_map(|m| allocate_method(m, k as usize))
        .collect()
}
