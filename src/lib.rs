pub mod span;
pub mod diagnostics;
pub mod ast;
pub mod types;
pub mod hierarchy;
pub mod typeck;
pub mod interp;

use ast::Program;
use diagnostics::TypeError;
use typeck::env::Context;

/// Type-check a parsed program (register classes → validate the hierarchy →
/// check signatures and bodies). Returns the compilation context used by
/// later evaluation or inspection.
pub fn analyze(program: &Program) -> Result<Context, TypeError> {
    typeck::check_program(program)
}

/// Build an evaluator over a program that `analyze` already accepted.
pub fn interpreter<'p>(program: &'p Program, ctx: &'p Context) -> interp::Interpreter<'p> {
    interp::Interpreter::new(program, ctx)
}
