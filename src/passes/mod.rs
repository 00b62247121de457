//! The actual passes that compile / transform from one data structure
//! to the next.
//!
//! The compilation process goes in this order:
//!
//! 1. [parse], which runs [lex] over every expression it finds
//! 2. [optimize], rounds of [ConstantFolder] and [DeadCodeEliminator]
//! 3. [Compiler::compile]
//!
//! Also bundled here are the error types for each stage. lex and parse
//! fail on bad templates, optimize never fails, and codegen fails only on
//! node streams the parser would never produce

mod codegen;
mod cursor;
mod lexer;
mod optimizer;
mod parser;

pub use codegen::{compile_expression, CodegenError, Compiler, Generator, Handler};
pub use cursor::Cursor;
pub use lexer::{lex, LexError, LexErrorKind};
pub use optimizer::{
    fold_binary, optimize, optimize_directive, ConstantFolder, Context, DeadCodeEliminator, Lattice, Optimizer,
    OptimizerResult, Scope, Variable,
};
pub use parser::{parse, parse_expression, ParseError};
