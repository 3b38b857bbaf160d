use crate::{Instruction, Method};

impl Method {
    fn jump_target(&self, label: &str) -> Option<usize> {
        let target = self.label_target(label);
        if target.is_none() {
            log::warn!("label `{label}` is not defined in `{}`", self.name);
        }
        target.filter(|t| *t < self.instructions.len())
    }

    // control-flow successors of every instruction, by index
    pub fn successors(&self) -> Vec<Vec<usize>> {
        let n = self.instructions.len();
        let next = |idx: usize| if idx + 1 < n { Some(idx + 1) } else { None };

        self.instructions
            .iter()
            .enumerate()
            .map(|(idx, inst)| match inst {
                Instruction::Goto(label) => self.jump_target(label).into_iter().collect(),
                Instruction::CondBranch { label, .. } => {
                    let mut succ: Vec<_> = self.jump_target(label).into_iter().collect();
                    if let Some(n) = next(idx) {
                        if !succ.contains(&n) {
                            succ.push(n);
                        }
                    }
                    succ
                }
                Instruction::Return { .. } => vec![],
                _ => next(idx).into_iter().collect(),
            })
            .collect()
    }
}
