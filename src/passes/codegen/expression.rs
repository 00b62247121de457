use super::CodegenError;
use crate::intermediates::{Literal, NativeType, Node, NodeClass, NodeStream, Operator};

/// Compiles a stream holding exactly one expression node
pub fn compile_expression(stream: &NodeStream) -> Result<String, CodegenError> {
    match stream.nodes() {
        [node] => expression(node),
        nodes => Err(CodegenError::ExpressionCount(nodes.len())),
    }
}

pub(super) fn expression(node: &Node) -> Result<String, CodegenError> {
    if node.class() == NodeClass::Root {
        return Err(CodegenError::UnexpectedNode(node.kind()));
    }
    Ok(match node {
        Node::Identifier(id) => format!("${}", id.name),
        Node::Literal(lit) => literal(lit),
        // always parenthesized, precedence is already in the tree shape
        Node::BinaryOp(op) => format!(
            "({} {} {})",
            expression(&op.left)?,
            host_operator(op.operator),
            expression(&op.right)?
        ),
        Node::UnaryOp(op) => {
            let operand = expression(&op.operand)?;
            let operator = host_operator(op.operator);
            // `- -x` must not turn into a decrement
            if operand.starts_with(operator) {
                format!("{} {}", operator, operand)
            } else {
                format!("{}{}", operator, operand)
            }
        }
        Node::Group(inner) => format!("({})", expression(inner)?),
        Node::FunctionCall(call) => {
            let mut out = format!("$this->call('{}'", escape(&call.name.name));
            for argument in &call.arguments {
                out.push_str(", ");
                out.push_str(&expression(argument)?);
            }
            out.push(')');
            out
        }
        Node::ArrayAccess(access) => format!("{}[{}]", expression(&access.array)?, expression(&access.key)?),
        _ => return Err(CodegenError::UnexpectedNode(node.kind())),
    })
}

pub(super) fn host_operator(operator: Operator) -> &'static str {
    match operator {
        Operator::Concat => ".",
        Operator::ConcatAssign => ".=",
        Operator::Xor => "xor",
        other => other.symbol().unwrap_or(""),
    }
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('\'', "\\'")
}

fn literal(lit: &Literal) -> String {
    match lit.native_type {
        NativeType::String => format!("'{}'", escape(&lit.operand)),
        NativeType::Int => lit.operand.clone(),
        NativeType::Float => float(&lit.operand),
        NativeType::Bool | NativeType::Null => lit.value().to_string().to_lowercase(),
    }
}

/// Floats keep a decimal marker so the host doesn't read them back as ints
fn float(operand: &str) -> String {
    match operand {
        "inf" => "INF".to_string(),
        "-inf" => "-INF".to_string(),
        "NaN" => "NAN".to_string(),
        _ if operand.contains(|c: char| c == '.' || c == 'e' || c == 'E') => operand.to_string(),
        _ => format!("{}.0", operand),
    }
}
