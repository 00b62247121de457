/// constant folding, a light take on sparse conditional constant propagation:
/// anything computed only from literals gets computed now instead of at
/// render time
use super::{optimize_directive, Context, Optimizer};
use crate::directives::AUTOESCAPE;
use crate::intermediates::*;

#[derive(Debug, Default, Clone, Copy)]
pub struct ConstantFolder;

impl Optimizer for ConstantFolder {
    fn name(&self) -> &'static str {
        "constant folding"
    }

    fn optimizer(&self, mut stream: NodeStream, ctx: &mut Context) -> NodeStream {
        let mut out = vec![];
        while let Some(node) = stream.consume() {
            if let Some(node) = fold_node(node, ctx) {
                out.push(node);
            }
        }
        NodeStream::new(out)
    }
}

fn fold_body(body: &[Node], ctx: &mut Context) -> Vec<Node> {
    body.iter().filter_map(|node| fold_node(node, ctx)).collect()
}

/// None means the node goes away entirely
fn fold_node(node: &Node, ctx: &mut Context) -> Option<Node> {
    Some(match node {
        Node::Echo(operand) => return fold_echo(fold_expression(operand), ctx),
        Node::Directive(directive) => optimize_directive(directive, ctx),
        Node::Assignment(assignment) => Node::Assignment(Assignment {
            value: Box::new(fold_expression(&assignment.value)),
            ..assignment.clone()
        }),
        Node::Conditional(conditional) => Node::Conditional(Conditional {
            operand: Box::new(fold_expression(&conditional.operand)),
            body: fold_body(&conditional.body, ctx),
            branches: conditional
                .branches
                .iter()
                .map(|branch| ConditionalBranch {
                    operand: fold_expression(&branch.operand),
                    body: fold_body(&branch.body, ctx),
                })
                .collect(),
            else_body: conditional.else_body.as_ref().map(|body| fold_body(body, ctx)),
        }),
        Node::For(for_loop) => Node::For(For {
            iterator: Box::new(fold_expression(&for_loop.iterator)),
            body: fold_body(&for_loop.body, ctx),
            ..for_loop.clone()
        }),
        Node::Block(block) => Node::Block(Block { name: block.name.clone(), nodes: fold_body(&block.nodes, ctx) }),
        other => fold_expression(other),
    })
}

/// Bottom-up, so a group around a foldable op ends up a plain literal in a
/// single pass
pub fn fold_expression(node: &Node) -> Node {
    match node {
        Node::Group(inner) => match fold_expression(inner) {
            Node::Literal(lit) => Node::Literal(lit),
            folded => Node::Group(Box::new(folded)),
        },
        Node::BinaryOp(op) => {
            let left = fold_expression(&op.left);
            let right = fold_expression(&op.right);
            if let (Node::Literal(l), Node::Literal(r)) = (&left, &right) {
                if let Some(folded) = fold_binary(op.operator, l, r) {
                    trace!("folded {:?} {} {:?}", l.operand, op.operator, r.operand);
                    return Node::Literal(folded);
                }
            }
            Node::binary(left, op.operator, right)
        }
        Node::UnaryOp(op) => Node::UnaryOp(UnaryOp { operand: Box::new(fold_expression(&op.operand)), ..op.clone() }),
        Node::FunctionCall(call) => Node::FunctionCall(FunctionCall {
            name: call.name.clone(),
            arguments: call.arguments.iter().map(fold_expression).collect(),
        }),
        Node::ArrayAccess(access) => Node::ArrayAccess(ArrayAccess {
            array: Box::new(fold_expression(&access.array)),
            key: Box::new(fold_expression(&access.key)),
        }),
        other => other.clone(),
    }
}

fn fold_echo(operand: Node, ctx: &Context) -> Option<Node> {
    let lit = match operand {
        Node::Literal(lit) => lit,
        other => return Some(Node::echo(other)),
    };
    if lit.native_type == NativeType::String {
        if lit.operand.is_empty() {
            return None;
        }
        if !ctx.directives.enabled(AUTOESCAPE) {
            return Some(Node::Text(lit.operand));
        }
        // still needs escaping, leave it for codegen
        return Some(Node::Echo(Box::new(Node::Literal(lit))));
    }
    let value = lit.value();
    if value.truthy() {
        Some(Node::Text(value.output_string()))
    } else {
        None
    }
}

/// Operators worth folding
const FOLDABLE: [Operator; 11] = [
    Operator::Add,
    Operator::Subtract,
    Operator::Multiply,
    Operator::StrictEqual,
    Operator::StrictNotEqual,
    Operator::Greater,
    Operator::Less,
    Operator::GreaterEqual,
    Operator::LessEqual,
    Operator::And,
    Operator::Or,
];

/// Evaluate `left op right` for two literals, or None when it's not ours to
/// fold (unsupported operator, or arithmetic on non-numbers)
pub fn fold_binary(op: Operator, left: &Literal, right: &Literal) -> Option<Literal> {
    if !FOLDABLE.contains(&op) {
        return None;
    }
    // type mismatch decides strict equality before any value is looked at
    if op == Operator::StrictEqual && left.native_type != right.native_type {
        return Some(Literal::from_value(Value::Bool(false)));
    }
    let l = left.value();
    let r = right.value();
    let result = if l.is_numeric() && r.is_numeric() { numeric(op, &l, &r) } else { non_numeric(op, &l, &r) };
    result.map(Literal::from_value)
}

fn numeric(op: Operator, l: &Value, r: &Value) -> Option<Value> {
    use Operator::*;
    let both_ints = match (l, r) {
        (Value::Int(a), Value::Int(b)) => Some((*a, *b)),
        _ => None,
    };
    let (a, b) = (l.as_f64()?, r.as_f64()?);
    Some(match op {
        Add | Subtract | Multiply => {
            let checked = both_ints.and_then(|(x, y)| match op {
                Add => x.checked_add(y),
                Subtract => x.checked_sub(y),
                _ => x.checked_mul(y),
            });
            match checked {
                Some(i) => Value::Int(i),
                // floats in, or an int overflowed: the host promotes to float
                None => Value::Float(match op {
                    Add => a + b,
                    Subtract => a - b,
                    _ => a * b,
                }),
            }
        }
        StrictEqual => Value::Bool(l == r),
        StrictNotEqual => Value::Bool(l != r),
        Greater | Less | GreaterEqual | LessEqual => Value::Bool(match both_ints {
            Some((x, y)) => compare(op, x.cmp(&y)),
            None => compare(op, a.partial_cmp(&b)?),
        }),
        And => Value::Bool(l.truthy() && r.truthy()),
        Or => Value::Bool(l.truthy() || r.truthy()),
        _ => return None,
    })
}

fn non_numeric(op: Operator, l: &Value, r: &Value) -> Option<Value> {
    use Operator::*;
    Some(match op {
        StrictEqual => Value::Bool(l == r),
        StrictNotEqual => Value::Bool(l != r),
        Greater | Less | GreaterEqual | LessEqual => Value::Bool(match (l, r) {
            (Value::String(a), Value::String(b)) => compare(op, a.cmp(b)),
            (Value::Bool(a), Value::Bool(b)) => compare(op, a.cmp(b)),
            _ => return None,
        }),
        And => Value::Bool(l.truthy() && r.truthy()),
        Or => Value::Bool(l.truthy() || r.truthy()),
        // arithmetic on non-numbers stays for the runtime
        _ => return None,
    })
}

fn compare(op: Operator, ordering: std::cmp::Ordering) -> bool {
    use std::cmp::Ordering::*;
    match op {
        Operator::Greater => ordering == Greater,
        Operator::Less => ordering == Less,
        Operator::GreaterEqual => ordering != Less,
        _ => ordering != Greater,
    }
}
