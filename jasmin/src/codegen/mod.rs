mod context;
pub mod inst;
mod lower;
pub mod peephole;

pub use context::MethodContext;
pub use lower::descriptor;

use std::fmt;

use crate::CodegenError;
use inst::Inst;
use ir::{ClassUnit, Method};
use lower::Lowering;

#[derive(Debug)]
pub struct MethodCode {
    pub header: String,
    pub ctx: MethodContext,
}

impl fmt::Display for MethodCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.header)?;
        writeln!(f, "\t.limit stack {}", self.ctx.max_stack_height)?;
        writeln!(f, "\t.limit locals {}", self.ctx.max_slot_high)?;
        for line in &self.ctx.lines {
            writeln!(f, "{line}")?;
        }
        writeln!(f, ".end method")
    }
}

struct ClassCode<'a> {
    unit: &'a ClassUnit,
    methods: Vec<MethodCode>,
}

impl fmt::Display for ClassCode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let super_class = self.unit.super_class_path();

        writeln!(f, ".class {}", self.unit.name)?;
        writeln!(f)?;
        writeln!(f, ".super {super_class}")?;
        for field in &self.unit.fields {
            writeln!(
                f,
                ".field public '{}' {}",
                field.name,
                descriptor(self.unit, &field.ty)
            )?;
        }

        writeln!(f)?;
        writeln!(f, ".method public <init>()V")?;
        writeln!(f, "\taload_0")?;
        writeln!(f, "\tinvokespecial {super_class}/<init>()V")?;
        writeln!(f, "\treturn")?;
        writeln!(f, ".end method")?;

        for m in &self.methods {
            writeln!(f)?;
            write!(f, "{m}")?;
        }
        Ok(())
    }
}

pub fn generate_method(unit: &ClassUnit, method: &Method) -> Result<MethodCode, CodegenError> {
    let initial_slots = method.params.len() + usize::from(!method.is_static);
    let reserved = method.labels.iter().map(|(l, _)| l.clone());
    let mut ctx = MethodContext::new(initial_slots, reserved);

    let lowering = Lowering::new(unit, method);
    for (idx, inst) in method.instructions.iter().enumerate() {
        for label in method.labels_at(idx) {
            ctx.label(label.clone());
        }
        lowering.lower(&mut ctx, inst)?;
    }
    for label in method.labels_at(method.instructions.len()) {
        ctx.label(label.clone());
    }
    if method.ret.is_void() && !ctx.is_terminated() {
        ctx.emit(Inst::Return(None));
    }

    let fused = peephole::fuse_increments(&mut ctx.lines);
    if fused > 0 {
        log::debug!("fused {fused} increment(s) in `{}`", method.name);
    }
    ctx.recount();

    let params: String = method
        .params
        .iter()
        .map(|p| descriptor(unit, &p.ty))
        .collect();
    let header = format!(
        ".method {}{}{}({params}){}",
        method.access,
        if method.is_static { "static " } else { "" },
        method.name,
        descriptor(unit, &method.ret)
    );

    Ok(MethodCode { header, ctx })
}

/// Jasmin text for one class unit. The text is produced on the first call to
/// `build` and returned as is afterwards.
pub struct JasminGenerator<'a> {
    unit: &'a ClassUnit,
    code: Option<String>,
}

impl<'a> JasminGenerator<'a> {
    pub fn new(unit: &'a ClassUnit) -> Self {
        Self { unit, code: None }
    }

    fn generate(&self) -> Result<String, CodegenError> {
        log::info!("generating jasmin for `{}`", self.unit.name);

        let methods = self
            .unit
            .methods
            .iter()
            .filter(|m| !m.is_constructor)
            .map(|m| generate_method(self.unit, m))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ClassCode {
            unit: self.unit,
            methods,
        }
        .to_string())
    }

    pub fn build(&mut self) -> Result<&str, CodegenError> {
        let code = match self.code.take() {
            Some(code) => code,
            None => self.generate()?,
        };
        let code: &str = self.code.insert(code);
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::inst::Line;
    use super::*;
    use util::Map;

    fn unit(src: &str) -> ClassUnit {
        parser::parse(src).unwrap()
    }

    fn body(code: &MethodCode) -> Vec<String> {
        code.ctx.lines.iter().map(|l| l.to_string().trim().to_string()).collect()
    }

    // replays the lines, checking heights agree at every label
    fn simulate(lines: &[Line]) -> usize {
        let mut at_label: Map<String, i32> = Map::default();
        let mut height: i32 = 0;
        let mut peak = 0;
        let mut reachable = true;

        for line in lines {
            match line {
                Line::Label(l) => {
                    let h = at_label.get(l).copied();
                    match (reachable, h) {
                        (true, Some(h)) => assert_eq!(h, height, "height mismatch at {l}"),
                        (false, Some(h)) => height = h,
                        (false, None) => height = 0,
                        (true, None) => (),
                    }
                    at_label.insert(l.clone(), height);
                    reachable = true;
                }
                Line::Inst(inst) => {
                    height += inst.stack_effect();
                    assert!(height >= 0, "negative height at {inst}");
                    peak = peak.max(height);
                    if let Some(l) = inst.jump_target() {
                        if let Some(h) = at_label.get(l) {
                            assert_eq!(*h, height, "height mismatch jumping to {l}");
                        }
                        at_label.insert(l.to_string(), height);
                    }
                    if inst.is_terminator() {
                        reachable = false;
                        height = 0;
                    }
                }
            }
        }
        peak as usize
    }

    const SIMPLE: &str = r#"
import io;

Simple {
    .field private total.i32;

    .construct Simple().V {
        invokespecial(this, "<init>").V;
    }

    .method public add(a.i32, b.i32).i32 {
        c.i32 :=.i32 a.i32 +.i32 b.i32;
        ret.i32 c.i32;
    }

    .method public static main(args.array.String).V {
        s.Simple :=.Simple new(Simple).Simple;
        invokespecial(s.Simple, "<init>").V;
        r.i32 :=.i32 invokevirtual(s.Simple, "add", 2.i32, 3.i32).i32;
        invokestatic(io, "println", r.i32).V;
        ret.V;
    }
}
"#;

    const EXPECTED: &str = ".class Simple

.super java/lang/Object
.field public 'total' I

.method public <init>()V
\taload_0
\tinvokespecial java/lang/Object/<init>()V
\treturn
.end method

.method public add(II)I
\t.limit stack 2
\t.limit locals 4
\tiload_1
\tiload_2
\tiadd
\tistore_3
\tiload_3
\tireturn
.end method

.method public static main([Ljava/lang/String;)V
\t.limit stack 3
\t.limit locals 3
\tnew Simple
\tastore_1
\taload_1
\tinvokespecial Simple/<init>()V
\taload_1
\ticonst_2
\ticonst_3
\tinvokevirtual Simple/add(II)I
\tistore_2
\tiload_2
\tinvokestatic io/println(I)V
\treturn
.end method
";

    #[test]
    fn whole_class() {
        let u = unit(SIMPLE);
        let mut gen = JasminGenerator::new(&u);
        assert_eq!(gen.build().unwrap(), EXPECTED);
    }

    #[test]
    fn build_is_cached() {
        let u = unit(SIMPLE);
        let mut gen = JasminGenerator::new(&u);
        let first = gen.build().unwrap().to_string();
        let second = gen.build().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn one_constructor_with_imported_super() {
        let src = r#"
import pkg.Base;

Child extends Base {
    .construct Child().V {
        invokespecial(this, "<init>").V;
    }
}
"#;
        let u = unit(src);
        let mut gen = JasminGenerator::new(&u);
        let code = gen.build().unwrap();
        assert!(code.contains(".super pkg/Base\n"));
        assert!(code.contains("\tinvokespecial pkg/Base/<init>()V\n"));
        assert_eq!(code.matches(".method").count(), 1);
    }

    #[test]
    fn increment_on_high_slot() {
        let src = r#"
Inc {
    .method public static f(a.i32, b.i32, c.i32, d.i32, e.i32).i32 {
        x.i32 :=.i32 a.i32;
        x.i32 :=.i32 x.i32 +.i32 1.i32;
        ret.i32 x.i32;
    }
}
"#;
        let u = unit(src);
        let m = u.method("f").unwrap();
        assert_eq!(m.var_table["x"].slot, 5);

        let code = generate_method(&u, m).unwrap();
        let lines = body(&code);
        assert_eq!(lines[2], "iinc 5 1");
        assert!(!lines.iter().any(|l| l == "iadd"));
    }

    #[test]
    fn increment_through_temporary() {
        let src = r#"
Inc {
    .method public static f(i.i32).i32 {
        t.i32 :=.i32 i.i32 +.i32 1.i32;
        i.i32 :=.i32 t.i32;
        ret.i32 i.i32;
    }
}
"#;
        let u = unit(src);
        let code = generate_method(&u, u.method("f").unwrap()).unwrap();
        assert_eq!(body(&code), vec!["iinc 0 1", "iload_0", "ireturn"]);
        assert_eq!(code.ctx.max_stack_height, 1);
        assert_eq!(code.ctx.max_slot_high, 1);
    }

    #[test]
    fn temporary_used_after_increment() {
        let src = r#"
Inc {
    .method public static f(i.i32).i32 {
        t.i32 :=.i32 i.i32 +.i32 1.i32;
        i.i32 :=.i32 t.i32;
        r.i32 :=.i32 t.i32 *.i32 i.i32;
        ret.i32 r.i32;
    }
}
"#;
        let u = unit(src);
        let code = generate_method(&u, u.method("f").unwrap()).unwrap();
        let lines = body(&code);
        assert!(!lines.iter().any(|l| l.starts_with("iinc")));
        assert_eq!(&lines[..6], &["iload_0", "iconst_1", "iadd", "istore_1", "iload_1", "istore_0"]);
        assert_eq!(simulate(&code.ctx.lines), code.ctx.max_stack_height);
    }

    #[test]
    fn branch_on_negative() {
        let src = r#"
import io;

Branch {
    .method public static f(a.i32).V {
        if (a.i32 <.bool 0.i32) goto then0;
        invokestatic(io, "println", 1.i32).V;
        goto endif0;
    then0:
        invokestatic(io, "println", 2.i32).V;
    endif0:
        ret.V;
    }
}
"#;
        let u = unit(src);
        let code = generate_method(&u, u.method("f").unwrap()).unwrap();
        let lines = body(&code);

        assert_eq!(&lines[..2], &["iload_0", "iflt then0"]);
        let conditional = lines.iter().filter(|l| l.starts_with("if")).count();
        let jumps = lines.iter().filter(|l| l.starts_with("goto")).count();
        assert_eq!((conditional, jumps), (1, 1));
        assert!(!lines.iter().any(|l| l == "iconst_0"));
    }

    #[test]
    fn stack_height_is_sound() {
        let src = r#"
import io;

Sound {
    .field public n.i32;

    .method public f(a.i32, b.bool, xs.array.i32).i32 {
        i.i32 :=.i32 0.i32;
    loop:
        if (i.i32 >=.bool a.i32) goto done;
        c.bool :=.bool i.i32 <.bool 3.i32;
        d.bool :=.bool c.bool &&.bool b.bool;
        e.bool :=.bool d.bool ||.bool c.bool;
        if (!.bool e.bool) goto skip;
        xs[i.i32].i32 :=.i32 i.i32 *.i32 2.i32;
        invokevirtual(this, "f", i.i32, e.bool, xs.array.i32).i32;
    skip:
        m.i32 :=.i32 getfield(this, n.i32).i32;
        putfield(this, n.i32, m.i32).V;
        i.i32 :=.i32 i.i32 +.i32 1.i32;
        goto loop;
    done:
        l.i32 :=.i32 arraylength(xs.array.i32).i32;
        invokestatic(io, "println", l.i32).V;
        ret.i32 l.i32;
    }
}
"#;
        let u = unit(src);
        let code = generate_method(&u, u.method("f").unwrap()).unwrap();
        assert_eq!(simulate(&code.ctx.lines), code.ctx.max_stack_height);
        assert_eq!(code.ctx.max_stack_height, 4);
    }

    #[test]
    fn locals_follow_allocation() {
        let mut u = unit(SIMPLE);
        crate::allocate(&mut u, 1);
        let code = generate_method(&u, u.method("add").unwrap()).unwrap();
        // `c` is live alone and takes the first free slot
        assert_eq!(code.ctx.max_slot_high, 4);

        let mut u = unit(
            r#"
Many {
    .method public static f().i32 {
        a.i32 :=.i32 1.i32;
        b.i32 :=.i32 a.i32 +.i32 1.i32;
        c.i32 :=.i32 b.i32 +.i32 1.i32;
        d.i32 :=.i32 c.i32 +.i32 1.i32;
        ret.i32 d.i32;
    }
}
"#,
        );
        let before = generate_method(&u, &u.methods[0]).unwrap();
        crate::allocate(&mut u, 1);
        let after = generate_method(&u, &u.methods[0]).unwrap();
        assert_eq!(before.ctx.max_slot_high, 4);
        assert_eq!(after.ctx.max_slot_high, 1);
    }

    #[test]
    fn unmapped_statement() {
        let src = r#"
Bad {
    .method public static f(a.i32).i32 {
        x.i32 :=.i32 a.i32;
        if (a.i32 +.i32 a.i32) goto l;
    l:
        ret.i32 x.i32;
    }
}
"#;
        let u = unit(src);
        let err = generate_method(&u, u.method("f").unwrap()).unwrap_err();
        assert!(matches!(err, CodegenError::Unmapped { .. }), "{err}");
    }
}
