use super::inst::{Inst, Line};
use util::{Map, Set};

/// Code buffer and counters of the method being generated. A fresh context is
/// made for every method.
#[derive(Debug, Clone, Default)]
pub struct MethodContext {
    pub lines: Vec<Line>,
    pub stack_height: usize,
    pub max_stack_height: usize,
    pub slot_high: usize,
    pub max_slot_high: usize,
    // slots taken by `this` and the parameters
    initial_slots: usize,
    // stack height on entry, recorded at the first jump or fall-through
    label_heights: Map<String, usize>,
    terminated: bool,
    next_label: usize,
    reserved: Set<String>,
}

impl MethodContext {
    pub fn new(initial_slots: usize, reserved: impl IntoIterator<Item = String>) -> Self {
        Self {
            slot_high: initial_slots,
            max_slot_high: initial_slots,
            initial_slots,
            reserved: reserved.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn emit(&mut self, inst: Inst) {
        let line = Line::Inst(inst);
        self.track(&line);
        self.lines.push(line);
    }

    pub fn label(&mut self, label: impl Into<String>) {
        let line = Line::Label(label.into());
        self.track(&line);
        self.lines.push(line);
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// One label per prefix, all sharing a number that no label of the
    /// method uses yet.
    pub fn fresh_labels<const N: usize>(&mut self, prefixes: [&str; N]) -> [String; N] {
        loop {
            let n = self.next_label;
            self.next_label += 1;

            let labels = prefixes.map(|p| format!("{p}_{n}"));
            if labels.iter().all(|l| !self.reserved.contains(l)) {
                self.reserved.extend(labels.iter().cloned());
                return labels;
            }
        }
    }

    fn track(&mut self, line: &Line) {
        match line {
            Line::Label(l) => {
                if self.terminated {
                    self.stack_height = self.label_heights.get(l).copied().unwrap_or(0);
                    self.terminated = false;
                } else {
                    self.label_heights.entry(l.clone()).or_insert(self.stack_height);
                }
            }
            Line::Inst(inst) => {
                let height = self.stack_height as i32 + inst.stack_effect();
                debug_assert!(height >= 0, "stack underflow at `{inst}`");
                self.stack_height = height.max(0) as usize;
                self.max_stack_height = self.max_stack_height.max(self.stack_height);

                if let Some(slot) = inst.slot() {
                    self.slot_high = slot + 1;
                    self.max_slot_high = self.max_slot_high.max(self.slot_high);
                }

                if let Some(l) = inst.jump_target() {
                    self.label_heights
                        .entry(l.to_string())
                        .or_insert(self.stack_height);
                }

                if inst.is_terminator() {
                    self.terminated = true;
                    self.stack_height = 0;
                }
            }
        }
    }

    /// Recomputes every counter by replaying the current lines.
    pub fn recount(&mut self) {
        let lines = std::mem::take(&mut self.lines);

        self.stack_height = 0;
        self.max_stack_height = 0;
        self.slot_high = self.initial_slots;
        self.max_slot_high = self.initial_slots;
        self.label_heights.clear();
        self.terminated = false;

        for line in &lines {
            self.track(line);
        }
        self.lines = lines;
    }
}
