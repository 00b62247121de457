//! The node tree. Statement-level nodes live directly in a
//! [NodeStream](super::stream::NodeStream), expression nodes only ever hang
//! off of them

use super::token::Operator;
use super::value::{NativeType, Value};

#[derive(PartialEq, Clone, Debug)]
pub enum Node {
    Text(String),
    Comment(String),
    Literal(Literal),
    Identifier(Identifier),
    BinaryOp(BinaryOp),
    UnaryOp(UnaryOp),
    Group(Box<Node>),
    Assignment(Assignment),
    FunctionCall(FunctionCall),
    ArrayAccess(ArrayAccess),
    Echo(Box<Node>),
    Conditional(Conditional),
    For(For),
    Block(Block),
    Directive(Directive),
}

/// Discriminator of [Node], used to key the codegen handler registry
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash)]
pub enum NodeKind {
    Text,
    Comment,
    Literal,
    Identifier,
    BinaryOp,
    UnaryOp,
    Group,
    Assignment,
    FunctionCall,
    ArrayAccess,
    Echo,
    Conditional,
    For,
    Block,
    Directive,
}

/// Where a node may appear: directly in a stream (Root) or only nested
/// inside another node (Expression)
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum NodeClass {
    Root,
    Expression,
}

impl NodeKind {
    pub fn class(self) -> NodeClass {
        use NodeKind::*;
        match self {
            Text | Comment | Assignment | Echo | Conditional | For | Block | Directive => {
                NodeClass::Root
            }
            Literal | Identifier | BinaryOp | UnaryOp | Group | FunctionCall | ArrayAccess => {
                NodeClass::Expression
            }
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Text(_) => NodeKind::Text,
            Node::Comment(_) => NodeKind::Comment,
            Node::Literal(_) => NodeKind::Literal,
            Node::Identifier(_) => NodeKind::Identifier,
            Node::BinaryOp(_) => NodeKind::BinaryOp,
            Node::UnaryOp(_) => NodeKind::UnaryOp,
            Node::Group(_) => NodeKind::Group,
            Node::Assignment(_) => NodeKind::Assignment,
            Node::FunctionCall(_) => NodeKind::FunctionCall,
            Node::ArrayAccess(_) => NodeKind::ArrayAccess,
            Node::Echo(_) => NodeKind::Echo,
            Node::Conditional(_) => NodeKind::Conditional,
            Node::For(_) => NodeKind::For,
            Node::Block(_) => NodeKind::Block,
            Node::Directive(_) => NodeKind::Directive,
        }
    }

    pub fn class(&self) -> NodeClass {
        self.kind().class()
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Node::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    pub fn literal(value: Value) -> Node {
        Node::Literal(Literal::from_value(value))
    }

    pub fn identifier(name: &str) -> Node {
        Node::Identifier(Identifier::new(name))
    }

    pub fn binary(left: Node, operator: Operator, right: Node) -> Node {
        Node::BinaryOp(BinaryOp { left: Box::new(left), right: Box::new(right), operator })
    }

    pub fn echo(operand: Node) -> Node {
        Node::Echo(Box::new(operand))
    }
}

/// A literal keeps its source text and its type tag; [Literal::value] casts it
#[derive(PartialEq, Clone, Debug)]
pub struct Literal {
    pub operand: String,
    pub native_type: NativeType,
}

impl Literal {
    pub fn new(operand: impl Into<String>, native_type: NativeType) -> Self {
        Self { operand: operand.into(), native_type }
    }

    pub fn from_value(value: Value) -> Self {
        let native_type = value.native_type();
        let operand = match value {
            Value::String(s) => s,
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Null => "null".to_string(),
        };
        Self { operand, native_type }
    }

    pub fn value(&self) -> Value {
        match self.native_type {
            NativeType::String => Value::String(self.operand.clone()),
            NativeType::Int => match self.operand.parse() {
                Ok(i) => Value::Int(i),
                // too big for an int, the host would promote it too
                Err(_) => Value::String(self.operand.clone()).cast(NativeType::Float),
            },
            NativeType::Float => match self.operand.parse() {
                Ok(f) => Value::Float(f),
                Err(_) => Value::String(self.operand.clone()).cast(NativeType::Float),
            },
            NativeType::Bool => Value::Bool(self.operand.eq_ignore_ascii_case("true")),
            NativeType::Null => Value::Null,
        }
    }
}

#[derive(PartialEq, Eq, Clone, Debug, Default)]
pub struct Identifier {
    pub name: String,
}
impl Identifier {
    pub fn new(name: &str) -> Self {
        Self { name: name.to_string() }
    }
}

#[derive(PartialEq, Clone, Debug)]
pub struct BinaryOp {
    pub left: Box<Node>,
    pub right: Box<Node>,
    pub operator: Operator,
}

#[derive(PartialEq, Clone, Debug)]
pub struct UnaryOp {
    pub operand: Box<Node>,
    pub operator: Operator,
}

#[derive(PartialEq, Clone, Debug)]
pub struct Assignment {
    pub name: Identifier,
    pub value: Box<Node>,
    /// None means plain `=`
    pub operator: Option<Operator>,
}

#[derive(PartialEq, Clone, Debug)]
pub struct FunctionCall {
    pub name: Identifier,
    pub arguments: Vec<Node>,
}

#[derive(PartialEq, Clone, Debug)]
pub struct ArrayAccess {
    pub array: Box<Node>,
    pub key: Box<Node>,
}

#[derive(PartialEq, Clone, Debug)]
pub struct Conditional {
    pub operand: Box<Node>,
    pub body: Vec<Node>,
    pub branches: Vec<ConditionalBranch>,
    pub else_body: Option<Vec<Node>>,
}

/// An `elseif`
#[derive(PartialEq, Clone, Debug)]
pub struct ConditionalBranch {
    pub operand: Node,
    pub body: Vec<Node>,
}

#[derive(PartialEq, Clone, Debug)]
pub struct For {
    pub value: Identifier,
    pub iterator: Box<Node>,
    pub key: Option<Identifier>,
    pub body: Vec<Node>,
}

#[derive(PartialEq, Clone, Debug)]
pub struct Block {
    pub name: String,
    pub nodes: Vec<Node>,
}

#[derive(PartialEq, Clone, Debug)]
pub struct Directive {
    pub name: String,
    pub value: Literal,
}
