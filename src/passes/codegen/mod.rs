//! Turns the final node stream into PHP source for the host runtime.
//!
//! Each root node kind has a [Handler] in the [Compiler]'s registry. A
//! handler writes through the [Generator], which tracks whether output is
//! currently inside a `<?php ... ?>` block and switches modes as needed

mod expression;
mod handlers;

pub use expression::compile_expression;

use indexmap::IndexMap;

use crate::directives::Directives;
use crate::intermediates::{Directive, Node, NodeClass, NodeKind, NodeStream};

#[derive(PartialEq, Clone, Debug)]
pub enum CodegenError {
    /// A node where its kind can't go: an expression at statement level, or
    /// a statement inside an expression
    UnexpectedNode(NodeKind),
    /// Nothing registered for a statement kind
    NoHandler(NodeKind),
    /// [compile_expression] wants exactly one node
    ExpressionCount(usize),
}
impl std::fmt::Display for CodegenError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use CodegenError::*;
        match self {
            UnexpectedNode(kind) => write!(f, "[ERROR] unexpected {} node", kind),
            NoHandler(kind) => write!(f, "[ERROR] no handler registered for {} nodes", kind),
            ExpressionCount(count) => write!(f, "[ERROR] expected exactly one expression node, got {}", count),
        }
    }
}
impl std::error::Error for CodegenError {}

pub type Handler = fn(&Node, &mut Generator<'_>) -> Result<(), CodegenError>;

/// The handler registry. Immutable once built, one can serve any number of
/// compiles
pub struct Compiler {
    handlers: IndexMap<NodeKind, Handler>,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

impl Compiler {
    pub fn new() -> Self {
        let mut compiler = Compiler { handlers: IndexMap::new() };
        compiler.register(NodeKind::Text, handlers::text);
        compiler.register(NodeKind::Comment, handlers::comment);
        compiler.register(NodeKind::Assignment, handlers::assignment);
        compiler.register(NodeKind::Echo, handlers::echo);
        compiler.register(NodeKind::Conditional, handlers::conditional);
        compiler.register(NodeKind::For, handlers::for_loop);
        compiler.register(NodeKind::Block, handlers::block);
        compiler.register(NodeKind::Directive, handlers::directive);
        compiler
    }

    /// Adds or replaces the handler for a kind
    pub fn register(&mut self, kind: NodeKind, handler: Handler) {
        if self.handlers.insert(kind, handler).is_some() {
            debug!("replaced codegen handler for {}", kind);
        }
    }

    pub fn compile(&self, stream: &NodeStream, seed: &Directives) -> Result<String, CodegenError> {
        let mut generator = Generator::new(&self.handlers, seed);
        for node in stream.nodes() {
            generator.node(node)?;
        }
        let out = generator.finish();
        debug!("generated {} bytes from {} nodes", out.len(), stream.len());
        Ok(out)
    }
}

/// Output state for one compile
pub struct Generator<'c> {
    handlers: &'c IndexMap<NodeKind, Handler>,
    pub directives: Directives,
    out: String,
    in_code: bool,
}

impl<'c> Generator<'c> {
    fn new(handlers: &'c IndexMap<NodeKind, Handler>, seed: &Directives) -> Self {
        Generator { handlers, directives: Directives::seeded(seed), out: "<?php".to_string(), in_code: true }
    }

    /// Dispatches one root node to its handler
    pub fn node(&mut self, node: &Node) -> Result<(), CodegenError> {
        let kind = node.kind();
        if kind.class() == NodeClass::Expression {
            return Err(CodegenError::UnexpectedNode(kind));
        }
        let handler = match self.handlers.get(&kind) {
            Some(handler) => *handler,
            None => return Err(CodegenError::NoHandler(kind)),
        };
        handler(node, self)
    }

    pub fn body(&mut self, nodes: &[Node]) -> Result<(), CodegenError> {
        for node in nodes {
            self.node(node)?;
        }
        Ok(())
    }

    /// A PHP statement. Opens a code block first if we're in text
    pub fn code(&mut self, statement: &str) {
        if self.in_code {
            self.out.push(' ');
        } else {
            self.out.push_str("<?php ");
            self.in_code = true;
        }
        self.out.push_str(statement);
    }

    /// Literal output
    pub fn text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if self.in_code {
            self.out.push_str(" ?>");
            // php eats one line break right after ?>, whichever kind it is
            if text.starts_with(|c: char| c == '\n' || c == '\r') {
                self.out.push('\n');
            }
            self.in_code = false;
        }
        self.out.push_str(text);
    }

    pub fn apply_directive(&mut self, directive: &Directive) {
        self.directives.apply(&directive.name, &directive.value);
    }

    fn finish(mut self) -> String {
        if self.in_code {
            self.out.push_str(" ?>");
        }
        self.out
    }
}
