use super::types::*;
use ir::{Element, Instruction, Method, Type};
use util::{Id, Map, Set};

fn collect_used(e: &Element, used: &mut Set<Id>, types: &mut Map<Id, Type>) {
    match e {
        Element::Literal { .. } => (),
        Element::Operand { name, ty } => {
            used.insert(name.clone());
            types.entry(name.clone()).or_insert_with(|| ty.clone());
        }
        Element::ArrayOperand { name, index, ty } => {
            used.insert(name.clone());
            types
                .entry(name.clone())
                .or_insert_with(|| Type::array_of(ty.clone()));
            collect_used(index, used, types);
        }
    }
}

fn def_use(inst: &Instruction, types: &mut Map<Id, Type>) -> (Set<Id>, Set<Id>) {
    let mut def = Set::default();
    let mut used = Set::default();

    // an array-element store is a use of the array, see `Instruction::reads`
    if let Some(Element::Operand { name, ty }) = inst.writes() {
        def.insert(name.clone());
        types.entry(name.clone()).or_insert_with(|| ty.clone());
    }
    for e in inst.reads() {
        collect_used(e, &mut used, types);
    }

    (def, used)
}

/// Backward liveness, visiting instructions in `order` on every pass until
/// nothing changes. `order` should be a permutation of the instruction
/// indices; the fixpoint does not depend on it.
pub fn analyze_in_order(method: &Method, order: &[usize]) -> Liveness {
    let n = method.instructions.len();
    let succ = method.successors();

    let mut types = Map::default();
    let (def, used): (Vec<_>, Vec<_>) = method
        .instructions
        .iter()
        .map(|inst| def_use(inst, &mut types))
        .unzip();

    let mut live_in: Vec<Set<Id>> = vec![Set::default(); n];
    let mut live_out: Vec<Set<Id>> = vec![Set::default(); n];

    let mut passes = 0;
    loop {
        passes += 1;
        let mut changed = false;

        for &i in order.iter().filter(|i| **i < n) {
            let mut out = Set::default();
            for s in &succ[i] {
                out.extend(live_in[*s].iter().cloned());
            }

            let mut inn = used[i].clone();
            inn.extend(out.difference(&def[i]).cloned());

            if out != live_out[i] {
                live_out[i] = out;
                changed = true;
            }
            if inn != live_in[i] {
                live_in[i] = inn;
                changed = true;
            }
        }

        if !changed {
            break;
        }
    }
    log::debug!("liveness of `{}` converged after {passes} pass(es)", method.name);

    Liveness {
        def,
        used,
        live_in,
        live_out,
        types,
    }
}

pub fn analyze(method: &Method) -> Liveness {
    let order: Vec<_> = (0..method.instructions.len()).rev().collect();
    analyze_in_order(method, &order)
}
