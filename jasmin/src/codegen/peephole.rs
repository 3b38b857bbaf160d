use super::inst::{Inst, Kind, Line};

// iload N; iconst_1; iadd; istore T; iload T; istore N
fn increment_at(window: &[Line]) -> Option<(usize, usize)> {
    use Inst::*;
    match window {
        [Line::Inst(Load(Kind::Int, n)), Line::Inst(IConst(1)), Line::Inst(IAdd), Line::Inst(Store(Kind::Int, t)), Line::Inst(Load(Kind::Int, t2)), Line::Inst(Store(Kind::Int, n2)), ..]
            if t == t2 && n == n2 =>
        {
            Some((*n, *t))
        }
        _ => None,
    }
}

fn reads_slot(line: &Line, slot: usize) -> bool {
    matches!(line, Line::Inst(Inst::Load(_, s) | Inst::IInc(s, _)) if *s == slot)
}

/// Replaces every increment-through-a-temporary window with `iinc N 1`.
/// Labels split windows, and a window is kept when `T` is read anywhere
/// outside it. Returns the number of rewrites.
pub fn fuse_increments(lines: &mut Vec<Line>) -> usize {
    let mut out = Vec::with_capacity(lines.len());
    let mut fused = 0;

    let mut i = 0;
    while i < lines.len() {
        let window = increment_at(&lines[i..]).filter(|&(n, t)| {
            t == n || !lines[..i].iter().chain(&lines[i + 6..]).any(|l| reads_slot(l, t))
        });
        match window {
            Some((slot, _)) => {
                out.push(Line::Inst(Inst::IInc(slot, 1)));
                fused += 1;
                i += 6;
            }
            None => {
                out.push(lines[i].clone());
                i += 1;
            }
        }
    }

    *lines = out;
    fused
}
