use indexmap::IndexMap;

use super::fold::fold_binary;
use crate::intermediates::{Literal, Node};

/// How much we know about a variable. Only ever moves down:
/// Undef -> Const -> Varying, or Undef -> Varying
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Lattice {
    Undef,
    Const,
    Varying,
}

#[derive(PartialEq, Clone, Debug)]
pub struct Variable {
    pub name: String,
    /// Only kept while Const
    pub value: Option<Node>,
    pub lattice: Lattice,
}

#[derive(Debug, Default)]
pub struct Scope {
    variables: IndexMap<String, Variable>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lattice(&self, name: &str) -> Lattice {
        self.variables.get(name).map_or(Lattice::Undef, |v| v.lattice)
    }

    /// Whether a node is a compile-time constant right now: a literal, a
    /// Const identifier, or a binary op of those
    pub fn is_constant(&self, node: &Node) -> bool {
        match node {
            Node::Literal(_) => true,
            Node::Identifier(id) => self.lattice(&id.name) == Lattice::Const,
            Node::BinaryOp(op) => self.is_constant(&op.left) && self.is_constant(&op.right),
            _ => false,
        }
    }

    /// Record an assignment. `certain` is false when the assignment sits in
    /// code that may or may not run, which makes the variable Varying no
    /// matter what gets assigned
    pub fn assign(&mut self, name: &str, value: &Node, certain: bool) {
        let constant = certain && self.is_constant(value);
        let next = match (self.lattice(name), constant) {
            (Lattice::Varying, _) => Lattice::Varying,
            (_, false) => Lattice::Varying,
            (Lattice::Undef, true) => Lattice::Const,
            // the same constant twice is still that constant
            (Lattice::Const, true) => {
                let same = match (self.resolve_name(name), self.resolve(value)) {
                    (Some(old), Some(new)) => old == new,
                    _ => false,
                };
                if same {
                    Lattice::Const
                } else {
                    Lattice::Varying
                }
            }
        };
        // resolve before storing so `x = x + 1` doesn't refer to itself
        let stored = if next == Lattice::Const { self.resolve(value).map(Node::Literal) } else { None };
        let next = if next == Lattice::Const && stored.is_none() { Lattice::Varying } else { next };
        trace!("{} is now {:?}", name, next);
        self.variables.insert(name.to_string(), Variable { name: name.to_string(), value: stored, lattice: next });
    }

    /// Marks a variable Varying, whatever it was
    pub fn widen(&mut self, name: &str) {
        self.variables.insert(
            name.to_string(),
            Variable { name: name.to_string(), value: None, lattice: Lattice::Varying },
        );
    }

    fn resolve_name(&self, name: &str) -> Option<Literal> {
        match self.variables.get(name) {
            Some(Variable { lattice: Lattice::Const, value: Some(value), .. }) => self.resolve(value),
            _ => None,
        }
    }

    /// The literal a constant node boils down to, if it boils down at all
    pub fn resolve(&self, node: &Node) -> Option<Literal> {
        match node {
            Node::Literal(lit) => Some(lit.clone()),
            Node::Identifier(id) => self.resolve_name(&id.name),
            Node::Group(inner) => self.resolve(inner),
            Node::BinaryOp(op) => {
                let left = self.resolve(&op.left)?;
                let right = self.resolve(&op.right)?;
                fold_binary(op.operator, &left, &right)
            }
            _ => None,
        }
    }
}
