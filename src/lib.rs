// all roads lead to lib.rs

#[macro_use]
extern crate log;

pub mod directives;
pub mod intermediates;
pub mod passes;

pub use directives::Directives;
use intermediates::NodeStream;
use passes::{CodegenError, Compiler, LexError, ParseError};

#[derive(PartialEq, Clone, Debug)]
pub enum CompileError {
    Lex(LexError),
    Parse(ParseError),
    Codegen(CodegenError),
}
impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            CompileError::Lex(e) => write!(f, "{}", e),
            CompileError::Parse(e) => write!(f, "{}", e),
            CompileError::Codegen(e) => write!(f, "{}", e),
        }
    }
}
impl std::error::Error for CompileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CompileError::Lex(e) => Some(e),
            CompileError::Parse(e) => Some(e),
            CompileError::Codegen(e) => Some(e),
        }
    }
}
impl From<LexError> for CompileError {
    fn from(e: LexError) -> Self {
        CompileError::Lex(e)
    }
}
impl From<ParseError> for CompileError {
    fn from(e: ParseError) -> Self {
        CompileError::Parse(e)
    }
}
impl From<CodegenError> for CompileError {
    fn from(e: CodegenError) -> Self {
        CompileError::Codegen(e)
    }
}

/// Template source in, PHP source out. `seed` is laid over the default
/// directives for every pass
pub fn compile(source: &str, seed: &Directives) -> Result<String, CompileError> {
    let stream = passes::parse(source)?;
    let stream = passes::optimize(stream, seed);
    gen(&stream, seed)
}

/// Same as [compile] but skips the optimizer, comments and dead branches
/// and all
pub fn compile_unoptimized(source: &str, seed: &Directives) -> Result<String, CompileError> {
    gen(&passes::parse(source)?, seed)
}

fn gen(stream: &NodeStream, seed: &Directives) -> Result<String, CompileError> {
    Ok(Compiler::new().compile(stream, seed)?)
}
