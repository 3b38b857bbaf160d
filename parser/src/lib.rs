pub mod error;
mod check;
mod lexer;
mod syntax;
mod token;

pub use error::ParseError as Error;
pub use token::Token;

use ir::ClassUnit;

#[macro_use]
extern crate lalrpop_util;

lalrpop_mod!(pub grammer);

#[inline]
pub fn parse(src: &str) -> Result<ClassUnit, Error> {
    let parser = grammer::UnitParser::new();
    let lex = lexer::Lexer::new(src);

    let unit = parser.parse(lex).map_err(error::from_lalrpop)?;
    check::unit(unit)
}

#[cfg(test)]
mod tests {
    use crate::parse;
    use crate::error::ParseErrorKind;
    use ir::*;

    const SIMPLE: &str = r#"
import io;
import a.b.Base;

Simple extends Base {
    .field public count.i32;

    .construct Simple().V {
        invokespecial(this, "<init>").V;
    }

    .method public static main(args.array.String).V {
        a.i32 :=.i32 1.i32;
        t.bool :=.bool a.i32 <.bool 5.i32;
        if (t.bool) goto then0;
        invokestatic(io, "println", a.i32).V;
        goto end0;
    then0:
        arr.array.i32 :=.array.i32 new(array, a.i32).array.i32;
        arr[a.i32].i32 :=.i32 2.i32;
    end0:
        ret.V;
    }

    .method public get(x.i32).i32 {
        c.i32 :=.i32 getfield(this, count.i32).i32;
        putfield(this, count.i32, x.i32).V;
        s.Simple :=.Simple new(Simple).Simple;
        invokespecial(s.Simple, "<init>").V;
        r.i32 :=.i32 invokevirtual(s.Simple, "get", c.i32).i32;
        n.bool :=.bool !.bool t.bool;
        ret.i32 r.i32;
    }
}
"#;

    #[test]
    fn class_header() {
        let unit = parse(SIMPLE).unwrap();
        assert_eq!(unit.name, "Simple");
        assert_eq!(unit.super_class.as_deref(), Some("Base"));
        assert_eq!(unit.imports, vec!["io", "a.b.Base"]);
        assert_eq!(unit.fields.len(), 1);
        assert_eq!(unit.fields[0].name, "count");
        assert_eq!(unit.fields[0].access, AccessModifier::Public);
        assert_eq!(unit.methods.len(), 3);
        assert!(unit.methods[0].is_constructor);
    }

    #[test]
    fn static_method_body() {
        let unit = parse(SIMPLE).unwrap();
        let main = unit.method("main").unwrap();
        assert!(main.is_static);
        assert_eq!(main.params[0].ty, Type::array_of(Type::String));
        assert_eq!(main.instructions.len(), 8);
        assert_eq!(main.label_target("then0"), Some(5));
        assert_eq!(main.label_target("end0"), Some(7));

        match &main.instructions[3] {
            Instruction::Call(call) => {
                assert_eq!(call.kind, CallKind::Static);
                assert_eq!(call.receiver.var_name().map(|x| x.as_str()), Some("io"));
                assert_eq!(call.method, "println");
                assert_eq!(call.args.len(), 1);
            }
            inst => panic!("unexpected {inst}"),
        }

        match &main.instructions[6] {
            Instruction::Assign {
                dest: Element::ArrayOperand { name, .. },
                ..
            } => assert_eq!(name, "arr"),
            inst => panic!("unexpected {inst}"),
        }
    }

    #[test]
    fn var_table_slots() {
        let unit = parse(SIMPLE).unwrap();

        let main = unit.method("main").unwrap();
        let vt = &main.var_table;
        assert!(!vt.contains_key("this"));
        assert!(!vt.contains_key("io"));
        assert_eq!(vt["args"].scope, VarScope::Parameter);
        assert_eq!(vt["args"].slot, 0);
        assert_eq!(vt["a"].slot, 1);
        assert_eq!(vt["t"].slot, 2);
        assert_eq!(vt["arr"].slot, 3);
        assert_eq!(vt["arr"].ty, Type::array_of(Type::Int));

        let get = unit.method("get").unwrap();
        let vt = &get.var_table;
        assert_eq!(vt["this"].scope, VarScope::This);
        assert_eq!(vt["this"].slot, 0);
        assert_eq!(vt["x"].slot, 1);
        assert_eq!(vt["c"].slot, 2);
        assert_eq!(vt["s"].slot, 3);
        assert!(!vt.contains_key("count"));
    }

    #[test]
    fn unary_and_field_access() {
        let unit = parse(SIMPLE).unwrap();
        let get = unit.method("get").unwrap();
        assert!(matches!(
            &get.instructions[0],
            Instruction::Assign { rhs, .. } if matches!(**rhs, Instruction::GetField { .. })
        ));
        assert!(matches!(&get.instructions[1], Instruction::PutField { .. }));
        assert!(matches!(
            &get.instructions[5],
            Instruction::Assign { rhs, .. }
                if matches!(**rhs, Instruction::UnaryOp { op: UnaryOpKind::Not, .. })
        ));
    }

    #[test]
    fn comparison_branch() {
        let src = "A { .method f(a.i32).V { if (a.i32 <.bool 0.i32) goto l; l: ret.V; } }";
        let unit = parse(src).unwrap();
        let f = unit.method("f").unwrap();
        match &f.instructions[0] {
            Instruction::CondBranch {
                cond: Condition::Compare { op, rhs, .. },
                label,
            } => {
                assert_eq!(*op, BinaryOpKind::Lt);
                assert!(rhs.is_zero_literal());
                assert_eq!(label, "l");
            }
            inst => panic!("unexpected {inst}"),
        }
    }

    #[test]
    fn display_round_trip() {
        let unit = parse(SIMPLE).unwrap();
        let again = parse(&unit.to_string()).unwrap();
        assert_eq!(unit, again);
    }

    #[test]
    fn undefined_label() {
        let err = parse("A { .method f().V { goto nowhere; } }").unwrap_err();
        assert!(matches!(
            err.item,
            ParseErrorKind::UndefinedLabel(ref l, ref m) if l == "nowhere" && m == "f"
        ));
    }

    #[test]
    fn literal_destination() {
        let err = parse("A { .method f().V { 1.i32 :=.i32 2.i32; } }").unwrap_err();
        assert!(matches!(
            err.item,
            ParseErrorKind::InvalidAssignTarget(_)
        ));
    }

    #[test]
    fn unexpected_end() {
        let err = parse("A { .method f().V { ret.V;").unwrap_err();
        assert_eq!(err.item, ParseErrorKind::Eof);
    }

    #[test]
    fn duplicated_label() {
        let err = parse("A { .method f().V { l: goto l; l: ret.V; } }").unwrap_err();
        assert_eq!(err.item, ParseErrorKind::DuplicatedLabel("l".to_string()));
    }

    #[test]
    fn missing_semicolon() {
        let src = "A { .method f().V { ret.V } }";
        let err = parse(src).unwrap_err();
        assert!(matches!(err.item, ParseErrorKind::UnrecognizedToken(crate::Token::RBrace, _)));
        assert_eq!(err.loc, (src.len() - 3, src.len() - 2));
    }

    #[test]
    fn trailing_tokens() {
        let err = parse("A { } B").unwrap_err();
        assert!(matches!(
            err.item,
            ParseErrorKind::ExtraToken(_) | ParseErrorKind::UnrecognizedToken(..)
        ));
        assert_eq!(err.loc, (6, 7));
    }

    #[test]
    fn bare_this_takes_class_type() {
        let src = "A { .method f().i32 { x.i32 :=.i32 getfield(this, n.i32).i32; ret.i32 x.i32; } }";
        let unit = parse(src).unwrap();
        match &unit.methods[0].instructions[0] {
            Instruction::Assign { rhs, .. } => match rhs.as_ref() {
                Instruction::GetField { object, .. } => {
                    assert_eq!(object.ty(), &Type::Class("A".to_string()))
                }
                inst => panic!("unexpected {inst}"),
            },
            inst => panic!("unexpected {inst}"),
        }
    }

    #[test]
    fn boolean_literals() {
        let src = "A { .method f().bool { b.bool :=.bool true.bool &&.bool false.bool; ret.bool b.bool; } }";
        let unit = parse(src).unwrap();
        let f = &unit.methods[0];
        assert!(!f.var_table.contains_key("true"));
        match &f.instructions[0] {
            Instruction::Assign { rhs, .. } => match rhs.as_ref() {
                Instruction::BinaryOp { lhs, rhs, .. } => {
                    assert_eq!(lhs, &Element::literal("1", Type::Bool));
                    assert!(rhs.is_zero_literal());
                }
                inst => panic!("unexpected {inst}"),
            },
            inst => panic!("unexpected {inst}"),
        }
    }
}
