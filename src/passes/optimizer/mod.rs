//! Optimization passes over the node stream.
//!
//! general principles:
//! FEWER NODES IS BETTER, every node left is work for the runtime on every render
//! a pass never fails, it's given a valid stream and hands one back
//! a pass never edits nodes, it builds new ones

mod dce;
mod fold;
mod scope;

pub use dce::DeadCodeEliminator;
pub use fold::{fold_binary, ConstantFolder};
pub use scope::{Lattice, Scope, Variable};

use crate::directives::Directives;
use crate::intermediates::{Directive, Node, NodeStream};

/// Upper bound on optimizer rounds, in case two passes keep undoing each
/// other's work
const MAX_ROUNDS: usize = 16;

/// State for one pass invocation. Made fresh in [Optimizer::optimize] and
/// dropped when it returns, so nothing leaks from one template to the next
#[derive(Debug)]
pub struct Context {
    pub directives: Directives,
}

impl Context {
    pub fn new(seed: &Directives) -> Self {
        Self { directives: Directives::seeded(seed) }
    }
}

#[derive(PartialEq, Debug)]
pub struct OptimizerResult {
    pub stream: NodeStream,
    pub changed: bool,
}

pub trait Optimizer {
    fn name(&self) -> &'static str;

    /// The actual rewrite
    fn optimizer(&self, stream: NodeStream, ctx: &mut Context) -> NodeStream;

    fn optimize(&self, stream: NodeStream, seed: &Directives) -> OptimizerResult {
        let mut ctx = Context::new(seed);
        let before = stream.clone();
        let after = self.optimizer(stream, &mut ctx);
        let changed = before.differs_from(&after);
        debug!("{} pass: {} -> {} nodes, changed: {}", self.name(), before.len(), after.len(), changed);
        OptimizerResult { stream: after, changed }
    }
}

/// Every pass treats directives the same: remember the new value and keep
/// the node, codegen needs to see it too
pub fn optimize_directive(directive: &Directive, ctx: &mut Context) -> Node {
    ctx.directives.apply(&directive.name, &directive.value);
    Node::Directive(directive.clone())
}

/// Runs every pass in rounds until none of them changes anything
pub fn optimize(mut stream: NodeStream, seed: &Directives) -> NodeStream {
    let passes: [&dyn Optimizer; 2] = [&ConstantFolder, &DeadCodeEliminator];
    for round in 0..MAX_ROUNDS {
        let mut changed = false;
        for pass in passes.iter() {
            let result = pass.optimize(stream, seed);
            changed |= result.changed;
            stream = result.stream;
        }
        if !changed {
            debug!("optimizer settled after {} rounds", round + 1);
            return stream;
        }
    }
    warn!("optimizer still changing after {} rounds, giving up", MAX_ROUNDS);
    stream
}
