//! Bytecode disassembler for debug output.

use super::chunk::{Chunk, CodeUnit, CompiledProgram, Constant, UnitKind};
use super::opcode::Op;

/// Disassemble every unit of a program to a human-readable string.
pub fn disassemble(program: &CompiledProgram) -> String {
    let mut out = String::new();
    disassemble_unit(&program.main, program, &mut out);

    for function in &program.functions {
        out.push('\n');
        disassemble_unit(function, program, &mut out);
    }

    for class in &program.classes {
        for method in &class.methods {
            out.push('\n');
            disassemble_unit(method, program, &mut out);
        }
    }
    out
}

fn disassemble_unit(unit: &CodeUnit, program: &CompiledProgram, out: &mut String) {
    let name = match unit.kind {
        UnitKind::Method { class } => match program.classes.get(class) {
            Some(class) => format!("{}.{}", class.name, unit.name),
            None => unit.name.clone(),
        },
        _ => unit.name.clone(),
    };
    out.push_str(&format!(
        "== {} ({}, arity={}) ==\n",
        name,
        unit.kind,
        unit.arity()
    ));

    if !unit.variable_names.is_empty() {
        let slots: Vec<String> = unit
            .variable_names
            .iter()
            .enumerate()
            .map(|(slot, name)| format!("{}={}", slot, name))
            .collect();
        out.push_str(&format!("slots: {}\n", slots.join(" ")));
    }

    disassemble_chunk(&unit.chunk, program, out);
}

fn disassemble_chunk(chunk: &Chunk, program: &CompiledProgram, out: &mut String) {
    for (offset, op) in chunk.code.iter().enumerate() {
        let line = chunk.span_at(offset).line;
        let line_str = if offset > 0 && chunk.span_at(offset - 1).line == line {
            "   |".to_string()
        } else {
            format!("{:4}", line)
        };
        out.push_str(&format!("{:04} {} ", offset, line_str));
        disassemble_op(op, chunk, program, out);
        out.push('\n');
    }
}

fn disassemble_op(op: &Op, chunk: &Chunk, program: &CompiledProgram, out: &mut String) {
    match op {
        Op::Constant(idx) => {
            let val = chunk.constants.get(*idx as usize);
            out.push_str(&format!("CONSTANT      {:>5} ({})", idx, format_constant(val)));
        }
        Op::Void => out.push_str("VOID"),
        Op::Pop => out.push_str("POP"),
        Op::GetLocal(slot) => out.push_str(&format!("GET_LOCAL     {:>5}", slot)),
        Op::LocalRef(slot) => out.push_str(&format!("LOCAL_REF     {:>5}", slot)),
        Op::GetAttribute(idx) => {
            let name = constant_string(chunk, *idx);
            out.push_str(&format!("GET_ATTR      {:>5} ({})", idx, name));
        }
        Op::AttributeRef(idx) => {
            let name = constant_string(chunk, *idx);
            out.push_str(&format!("ATTR_REF      {:>5} ({})", idx, name));
        }
        Op::Store => out.push_str("STORE"),
        Op::Add => out.push_str("ADD"),
        Op::Subtract => out.push_str("SUBTRACT"),
        Op::Multiply => out.push_str("MULTIPLY"),
        Op::Divide => out.push_str("DIVIDE"),
        Op::Negate => out.push_str("NEGATE"),
        Op::Index => out.push_str("INDEX"),
        Op::CallFunction(idx, argc) => {
            let name = program
                .functions
                .get(*idx as usize)
                .map(|f| f.name.as_str())
                .unwrap_or("?");
            out.push_str(&format!("CALL_FUNCTION {:>5} ({}) args={}", idx, name, argc));
        }
        Op::CallMethod(idx, argc) => {
            let name = constant_string(chunk, *idx);
            out.push_str(&format!("CALL_METHOD   {:>5} ({}) args={}", idx, name, argc));
        }
        Op::Construct(idx, argc) => {
            let name = program
                .classes
                .get(*idx as usize)
                .map(|c| c.name.as_str())
                .unwrap_or("?");
            out.push_str(&format!("CONSTRUCT     {:>5} ({}) args={}", idx, name, argc));
        }
        Op::Return => out.push_str("RETURN"),
    }
}

fn constant_string(chunk: &Chunk, idx: u16) -> String {
    match chunk.constants.get(idx as usize) {
        Some(Constant::String(s)) => s.clone(),
        _ => format!("?{}", idx),
    }
}

fn format_constant(val: Option<&Constant>) -> String {
    match val {
        Some(Constant::Number(n)) => format!("{}", n),
        Some(Constant::String(s)) => format!("{:?}", s),
        None => "???".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Scanner;
    use crate::parser::Parser;
    use crate::vm::compiler::Compiler;
    use pretty_assertions::assert_eq;

    fn compile(source: &str) -> CompiledProgram {
        let tokens = Scanner::new(source).scan_tokens().unwrap();
        let file = Parser::new(tokens).parse_file("test.sl").unwrap();
        Compiler::compile(&file).unwrap()
    }

    #[test]
    fn test_disassemble_script() {
        let out = disassemble(&compile("x = 1\nx + 2"));
        let expected = "\
== <script> (script, arity=0) ==
slots: 0=x
0000    1 CONSTANT          0 (1)
0001    | LOCAL_REF         0
0002    | STORE
0003    2 GET_LOCAL         0
0004    | CONSTANT          1 (2)
0005    | ADD
0006    | RETURN
";
        assert_eq!(out, expected);
    }

    #[test]
    fn test_disassemble_names_callees() {
        let out = disassemble(&compile(
            "class P:\n  def __init__(self, v):\n    self.v = v\ndef f():\n  return P(1)\nf()",
        ));
        assert!(out.contains("== f (function, arity=0) =="));
        assert!(out.contains("== P.__init__ (method, arity=1) =="));
        assert!(out.contains("slots: 0=self 1=v"));
        assert!(out.contains("CONSTRUCT         0 (P) args=1"));
        assert!(out.contains("CALL_FUNCTION     0 (f) args=0"));
        assert!(out.contains("ATTR_REF          0 (v)"));
    }
}
