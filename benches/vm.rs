//! Benchmarks for the compile and execute phases.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use slate::ast::File;
use slate::lexer::Scanner;
use slate::parser::Parser;
use slate::vm::{Compiler, Vm};

/// Parse source into an AST.
fn parse(source: &str) -> File {
    let tokens = Scanner::new(source).scan_tokens().expect("lexer error");
    Parser::new(tokens)
        .parse_file("bench.sl")
        .expect("parser error")
}

/// Run via bytecode VM (compile + execute).
fn run_vm(source: &str) {
    let file = parse(source);
    let program = Compiler::compile(&file).expect("compile error");
    let mut vm = Vm::new();
    vm.execute(&program).expect("vm runtime error");
}

/// `n` assignments, each folding the previous result through all four operators.
fn arithmetic_program(n: usize) -> String {
    let mut source = String::from("x = 1\n");
    for i in 0..n {
        source.push_str(&format!("x = (x + {i}) * 2 - x / {}\n", i + 1));
    }
    source.push_str("x\n");
    source
}

/// `n` rounds of constructor, attribute and method traffic.
fn method_program(n: usize) -> String {
    let mut source = String::from(
        "\
class Counter:
  def __init__(self, start):
    self.value = start
  def add(self, amount):
    self.value = self.value + amount
    return self
  def get(self):
    return self.value
def step(c, k):
  return c.add(k).get()
c = Counter(0)
",
    );
    for i in 0..n {
        source.push_str(&format!("total = step(c, {i})\n"));
    }
    source.push_str("total\n");
    source
}

fn arithmetic(c: &mut Criterion) {
    let mut group = c.benchmark_group("arithmetic");
    for n in [100, 1_000] {
        let source = arithmetic_program(n);
        group.bench_with_input(BenchmarkId::new("vm", n), &source, |b, s| {
            b.iter(|| run_vm(black_box(s)))
        });
    }
    group.finish();
}

fn method_calls(c: &mut Criterion) {
    let mut group = c.benchmark_group("method_calls");
    for n in [100, 1_000] {
        let source = method_program(n);
        group.bench_with_input(BenchmarkId::new("vm", n), &source, |b, s| {
            b.iter(|| run_vm(black_box(s)))
        });
    }
    group.finish();
}

fn execute_only(c: &mut Criterion) {
    let file = parse(&method_program(1_000));
    let program = Compiler::compile(&file).expect("compile error");
    c.bench_function("execute_only/method_calls_1000", |b| {
        b.iter(|| {
            let mut vm = Vm::new();
            vm.execute(black_box(&program)).expect("vm runtime error")
        })
    });
}

fn compile_only(c: &mut Criterion) {
    let file = parse(&arithmetic_program(1_000));
    c.bench_function("compile_only/arithmetic_1000", |b| {
        b.iter(|| Compiler::compile(black_box(&file)).expect("compile error"))
    });
}

criterion_group!(benches, arithmetic, method_calls, execute_only, compile_only);
criterion_main!(benches);
