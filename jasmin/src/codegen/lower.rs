use super::context::MethodContext;
use super::inst::*;
use crate::CodegenError;
use ir::*;

type Result<T> = std::result::Result<T, CodegenError>;

pub fn descriptor(unit: &ClassUnit, ty: &Type) -> String {
    match ty {
        Type::Int => "I".to_string(),
        Type::Bool => "Z".to_string(),
        Type::String => "Ljava/lang/String;".to_string(),
        Type::Void => "V".to_string(),
        Type::Array(t) => format!("[{}", descriptor(unit, t)),
        Type::Class(c) => format!("L{};", unit.resolve_class(c)),
    }
}

// name of the class an instruction operates on
fn class_path(unit: &ClassUnit, ty: &Type) -> String {
    match ty {
        Type::Class(c) => unit.resolve_class(c),
        Type::String => "java/lang/String".to_string(),
        Type::Array(_) => descriptor(unit, ty),
        _ => "java/lang/Object".to_string(),
    }
}

fn unmapped(kind: &str, at: &Instruction) -> CodegenError {
    CodegenError::Unmapped {
        kind: kind.to_string(),
        inst: at.to_string(),
    }
}

// `x := x + c` or `x := c + x` with `c` fitting the increment operand
fn fused_increment<'i>(dest: &'i Element, rhs: &Instruction) -> Option<(&'i str, i32)> {
    let name = match dest {
        Element::Operand { name, ty: Type::Int } => name.as_str(),
        _ => return None,
    };

    let value = match rhs {
        Instruction::BinaryOp {
            op: BinaryOpKind::Add,
            lhs,
            rhs,
            ..
        } => match (lhs, rhs) {
            (Element::Operand { name: x, .. }, Element::Literal { value, ty: Type::Int })
            | (Element::Literal { value, ty: Type::Int }, Element::Operand { name: x, .. })
                if x == name =>
            {
                value
            }
            _ => return None,
        },
        _ => return None,
    };

    let v: i32 = value.parse().ok()?;
    if v != 0 && (-128..=127).contains(&v) {
        Some((name, v))
    } else {
        None
    }
}

/// Lowers the instructions of one method. Counters and code live in the
/// `MethodContext` passed to every call.
pub struct Lowering<'a> {
    unit: &'a ClassUnit,
    method: &'a Method,
}

impl<'a> Lowering<'a> {
    pub fn new(unit: &'a ClassUnit, method: &'a Method) -> Self {
        Self { unit, method }
    }

    fn slot(&self, name: &str, at: &Instruction) -> Result<usize> {
        self.method
            .var_table
            .get(name)
            .map(|d| d.slot)
            .ok_or_else(|| CodegenError::MissingDescriptor {
                var: name.to_string(),
                method: self.method.name.clone(),
                inst: at.to_string(),
            })
    }

    fn literal(&self, ctx: &mut MethodContext, value: &str, ty: &Type, at: &Instruction) -> Result<()> {
        if *ty == Type::String {
            ctx.emit(Inst::Ldc(format!("\"{value}\"")));
            return Ok(());
        }

        let v = match (ty, value) {
            (Type::Bool, "true") => 1,
            (Type::Bool, "false") => 0,
            _ => value.parse().map_err(|_| CodegenError::InvalidLiteral {
                value: value.to_string(),
                inst: at.to_string(),
            })?,
        };
        ctx.emit(push_int(v));
        Ok(())
    }

    fn load(&self, ctx: &mut MethodContext, e: &Element, at: &Instruction) -> Result<()> {
        match e {
            Element::Literal { value, ty } => self.literal(ctx, value, ty, at)?,
            Element::Operand { name, ty } => {
                let slot = self.slot(name, at)?;
                ctx.emit(Inst::Load(Kind::of(ty), slot));
            }
            Element::ArrayOperand { name, index, ty } => {
                let slot = self.slot(name, at)?;
                ctx.emit(Inst::Load(Kind::Ref, slot));
                self.load(ctx, index, at)?;
                ctx.emit(Inst::ArrayLoad(Kind::of(ty)));
            }
        }
        Ok(())
    }

    // leaves a conditional jump to `target` taken when `lhs op rhs` holds
    fn compare(
        &self,
        ctx: &mut MethodContext,
        op: BinaryOpKind,
        lhs: &Element,
        rhs: &Element,
        target: String,
        at: &Instruction,
    ) -> Result<()> {
        let cond = Cond::from_op(op).ok_or_else(|| unmapped(op.symbol(), at))?;

        if rhs.is_zero_literal() {
            self.load(ctx, lhs, at)?;
            ctx.emit(Inst::If(cond, target));
        } else if lhs.is_zero_literal() {
            self.load(ctx, rhs, at)?;
            ctx.emit(Inst::If(cond.swap(), target));
        } else {
            self.load(ctx, lhs, at)?;
            self.load(ctx, rhs, at)?;
            ctx.emit(Inst::IfICmp(cond, target));
        }
        Ok(())
    }

    fn binary(
        &self,
        ctx: &mut MethodContext,
        op: BinaryOpKind,
        lhs: &Element,
        rhs: &Element,
        at: &Instruction,
    ) -> Result<()> {
        use BinaryOpKind::*;
        match op {
            Add | Sub | Mul | Div => {
                self.load(ctx, lhs, at)?;
                self.load(ctx, rhs, at)?;
                ctx.emit(match op {
                    Add => Inst::IAdd,
                    Sub => Inst::ISub,
                    Mul => Inst::IMul,
                    _ => Inst::IDiv,
                });
            }
            And => {
                let [f, end] = ctx.fresh_labels(["j_false", "j_end"]);
                self.load(ctx, lhs, at)?;
                ctx.emit(Inst::If(Cond::Eq, f.clone()));
                self.load(ctx, rhs, at)?;
                ctx.emit(Inst::If(Cond::Eq, f.clone()));
                ctx.emit(push_int(1));
                ctx.emit(Inst::Goto(end.clone()));
                ctx.label(f);
                ctx.emit(push_int(0));
                ctx.label(end);
            }
            Or => {
                let [t, end] = ctx.fresh_labels(["j_true", "j_end"]);
                self.load(ctx, lhs, at)?;
                ctx.emit(Inst::If(Cond::Ne, t.clone()));
                self.load(ctx, rhs, at)?;
                ctx.emit(Inst::If(Cond::Ne, t.clone()));
                ctx.emit(push_int(0));
                ctx.emit(Inst::Goto(end.clone()));
                ctx.label(t);
                ctx.emit(push_int(1));
                ctx.label(end);
            }
            Lt | Gt | Le | Ge | Eq | Ne => {
                let [t, end] = ctx.fresh_labels(["j_true", "j_end"]);
                self.compare(ctx, op, lhs, rhs, t.clone(), at)?;
                ctx.emit(push_int(0));
                ctx.emit(Inst::Goto(end.clone()));
                ctx.label(t);
                ctx.emit(push_int(1));
                ctx.label(end);
            }
        }
        Ok(())
    }

    fn call(&self, ctx: &mut MethodContext, call: &Call, at: &Instruction) -> Result<bool> {
        let owner = match (call.kind, &call.receiver) {
            (CallKind::Static, Element::Operand { name, .. }) if name == "this" => self.unit.name.clone(),
            (CallKind::Static, Element::Operand { name, .. }) => self.unit.resolve_class(name),
            (CallKind::Static, _) => return Err(unmapped("static call on a non-class receiver", at)),
            (kind, receiver) => {
                self.load(ctx, receiver, at)?;
                let is_this = receiver.var_name().map_or(false, |x| x == "this");
                if kind == CallKind::Special && is_this && call.method == "<init>" {
                    self.unit.super_class_path()
                } else {
                    class_path(self.unit, receiver.ty())
                }
            }
        };

        for arg in &call.args {
            self.load(ctx, arg, at)?;
        }

        let params: String = call.args.iter().map(|a| descriptor(self.unit, a.ty())).collect();
        let target = format!(
            "{owner}/{}({params}){}",
            call.method,
            descriptor(self.unit, &call.ret)
        );
        let pushes = usize::from(!call.ret.is_void());
        ctx.emit(Inst::Invoke {
            kind: call.kind,
            target,
            pops: call.args.len() + usize::from(call.kind != CallKind::Static),
            pushes,
        });

        Ok(pushes == 1)
    }

    fn field_target(&self, object: &Element, field: &Field) -> (String, String) {
        (
            format!("{}/{}", class_path(self.unit, object.ty()), field.name),
            descriptor(self.unit, &field.ty),
        )
    }

    // lowers an expression, returning whether it left a value on the stack
    fn expr(&self, ctx: &mut MethodContext, inst: &Instruction, at: &Instruction) -> Result<bool> {
        match inst {
            Instruction::SingleOp(e) => self.load(ctx, e, at)?,
            Instruction::BinaryOp { op, lhs, rhs, .. } => self.binary(ctx, *op, lhs, rhs, at)?,
            Instruction::UnaryOp { op, operand, .. } => {
                self.load(ctx, operand, at)?;
                match op {
                    UnaryOpKind::Not => {
                        ctx.emit(push_int(1));
                        ctx.emit(Inst::IXor);
                    }
                    UnaryOpKind::Neg => ctx.emit(Inst::INeg),
                }
            }
            Instruction::Call(call) => return self.call(ctx, call, at),
            Instruction::New { ty: Type::Array(elem), args } => {
                let len = match args.as_slice() {
                    [len] => len,
                    _ => return Err(unmapped("array allocation without a single length", at)),
                };
                self.load(ctx, len, at)?;
                ctx.emit(match elem.as_ref() {
                    Type::Int => Inst::NewArray("int".to_string()),
                    Type::Bool => Inst::NewArray("boolean".to_string()),
                    t => Inst::ANewArray(class_path(self.unit, t)),
                });
            }
            Instruction::New { ty, args } => {
                if !args.is_empty() {
                    return Err(unmapped("object allocation with arguments", at));
                }
                ctx.emit(Inst::New(class_path(self.unit, ty)));
            }
            Instruction::GetField { object, field } => {
                self.load(ctx, object, at)?;
                let (target, desc) = self.field_target(object, field);
                ctx.emit(Inst::GetField { target, desc });
            }
            Instruction::ArrayLength(array) => {
                self.load(ctx, array, at)?;
                ctx.emit(Inst::ArrayLength);
            }
            Instruction::Assign { .. }
            | Instruction::Return { .. }
            | Instruction::PutField { .. }
            | Instruction::Goto(_)
            | Instruction::CondBranch { .. } => return Err(unmapped(inst.kind_name(), at)),
        }
        Ok(true)
    }

    fn value(&self, ctx: &mut MethodContext, inst: &Instruction, at: &Instruction) -> Result<()> {
        if self.expr(ctx, inst, at)? {
            Ok(())
        } else {
            Err(unmapped("void value", at))
        }
    }

    fn assign(&self, ctx: &mut MethodContext, dest: &Element, rhs: &Instruction, at: &Instruction) -> Result<()> {
        if let Some((name, v)) = fused_increment(dest, rhs) {
            let slot = self.slot(name, at)?;
            ctx.emit(Inst::IInc(slot, v));
            return Ok(());
        }

        match dest {
            Element::Operand { name, ty } => {
                self.value(ctx, rhs, at)?;
                let slot = self.slot(name, at)?;
                ctx.emit(Inst::Store(Kind::of(ty), slot));
            }
            Element::ArrayOperand { name, index, ty } => {
                let slot = self.slot(name, at)?;
                ctx.emit(Inst::Load(Kind::Ref, slot));
                self.load(ctx, index, at)?;
                self.value(ctx, rhs, at)?;
                ctx.emit(Inst::ArrayStore(Kind::of(ty)));
            }
            Element::Literal { .. } => return Err(unmapped("assignment to a literal", at)),
        }
        Ok(())
    }

    fn branch(&self, ctx: &mut MethodContext, cond: &Condition, label: &str, at: &Instruction) -> Result<()> {
        match cond {
            Condition::Compare {
                op: BinaryOpKind::And,
                lhs,
                rhs,
            } => {
                let [skip] = ctx.fresh_labels(["j_skip"]);
                self.load(ctx, lhs, at)?;
                ctx.emit(Inst::If(Cond::Eq, skip.clone()));
                self.load(ctx, rhs, at)?;
                ctx.emit(Inst::If(Cond::Ne, label.to_string()));
                ctx.label(skip);
            }
            Condition::Compare {
                op: BinaryOpKind::Or,
                lhs,
                rhs,
            } => {
                self.load(ctx, lhs, at)?;
                ctx.emit(Inst::If(Cond::Ne, label.to_string()));
                self.load(ctx, rhs, at)?;
                ctx.emit(Inst::If(Cond::Ne, label.to_string()));
            }
            Condition::Compare { op, lhs, rhs } => {
                self.compare(ctx, *op, lhs, rhs, label.to_string(), at)?
            }
            Condition::Not(e) => {
                self.load(ctx, e, at)?;
                ctx.emit(Inst::If(Cond::Eq, label.to_string()));
            }
            Condition::Test(e) => {
                self.load(ctx, e, at)?;
                ctx.emit(Inst::If(Cond::Ne, label.to_string()));
            }
        }
        Ok(())
    }

    pub fn lower(&self, ctx: &mut MethodContext, inst: &Instruction) -> Result<()> {
        match inst {
            Instruction::Assign { dest, rhs, .. } => self.assign(ctx, dest, rhs, inst)?,
            Instruction::Return { ty, value } => match value {
                Some(v) => {
                    self.load(ctx, v, inst)?;
                    ctx.emit(Inst::Return(Some(Kind::of(ty))));
                }
                None if ty.is_void() => ctx.emit(Inst::Return(None)),
                None => return Err(unmapped("return without a value", inst)),
            },
            Instruction::Goto(label) => ctx.emit(Inst::Goto(label.clone())),
            Instruction::CondBranch { cond, label } => self.branch(ctx, cond, label, inst)?,
            Instruction::PutField {
                object,
                field,
                value,
            } => {
                self.load(ctx, object, inst)?;
                self.load(ctx, value, inst)?;
                let (target, desc) = self.field_target(object, field);
                ctx.emit(Inst::PutField { target, desc });
            }
            _ => {
                if self.expr(ctx, inst, inst)? {
                    ctx.emit(Inst::Pop);
                }
            }
        }
        Ok(())
    }
}
