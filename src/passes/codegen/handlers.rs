// One function per root node kind, registered in Compiler::new

use super::expression::{expression, host_operator};
use super::{CodegenError, Generator};
use crate::directives::AUTOESCAPE;
use crate::intermediates::Node;

fn unexpected(node: &Node) -> CodegenError {
    CodegenError::UnexpectedNode(node.kind())
}

pub fn text(node: &Node, generator: &mut Generator<'_>) -> Result<(), CodegenError> {
    match node {
        Node::Text(text) => {
            generator.text(text);
            Ok(())
        }
        _ => Err(unexpected(node)),
    }
}

pub fn comment(node: &Node, generator: &mut Generator<'_>) -> Result<(), CodegenError> {
    let comment = match node {
        Node::Comment(comment) => comment,
        _ => return Err(unexpected(node)),
    };
    // the host ends a line comment at either line break or at ?>
    let lines = comment.split(|c: char| c == '\n' || c == '\r').map(str::trim);
    for line in lines.filter(|line| !line.is_empty()) {
        generator.code(&format!("// {}\n", line.replace("?>", "? >")));
    }
    Ok(())
}

pub fn assignment(node: &Node, generator: &mut Generator<'_>) -> Result<(), CodegenError> {
    let assignment = match node {
        Node::Assignment(assignment) => assignment,
        _ => return Err(unexpected(node)),
    };
    let operator = assignment.operator.map_or("=", host_operator);
    let value = expression(&assignment.value)?;
    generator.code(&format!("${} {} {};", assignment.name.name, operator, value));
    Ok(())
}

pub fn echo(node: &Node, generator: &mut Generator<'_>) -> Result<(), CodegenError> {
    let operand = match node {
        Node::Echo(operand) => expression(operand)?,
        _ => return Err(unexpected(node)),
    };
    if generator.directives.enabled(AUTOESCAPE) {
        generator.code(&format!("echo $this->escape({});", operand));
    } else {
        generator.code(&format!("echo {};", operand));
    }
    Ok(())
}

pub fn conditional(node: &Node, generator: &mut Generator<'_>) -> Result<(), CodegenError> {
    let conditional = match node {
        Node::Conditional(conditional) => conditional,
        _ => return Err(unexpected(node)),
    };
    generator.code(&format!("if ({}) {{", expression(&conditional.operand)?));
    generator.body(&conditional.body)?;
    for branch in &conditional.branches {
        generator.code(&format!("}} elseif ({}) {{", expression(&branch.operand)?));
        generator.body(&branch.body)?;
    }
    if let Some(else_body) = &conditional.else_body {
        generator.code("} else {");
        generator.body(else_body)?;
    }
    generator.code("}");
    Ok(())
}

pub fn for_loop(node: &Node, generator: &mut Generator<'_>) -> Result<(), CodegenError> {
    let for_loop = match node {
        Node::For(for_loop) => for_loop,
        _ => return Err(unexpected(node)),
    };
    let iterator = expression(&for_loop.iterator)?;
    let head = match &for_loop.key {
        Some(key) => format!("foreach ({} as ${} => ${}) {{", iterator, key.name, for_loop.value.name),
        None => format!("foreach ({} as ${}) {{", iterator, for_loop.value.name),
    };
    generator.code(&head);
    generator.body(&for_loop.body)?;
    generator.code("}");
    Ok(())
}

pub fn block(node: &Node, generator: &mut Generator<'_>) -> Result<(), CodegenError> {
    let block = match node {
        Node::Block(block) => block,
        _ => return Err(unexpected(node)),
    };
    generator.code(&format!("/* block {} */", block.name));
    generator.body(&block.nodes)?;
    generator.code(&format!("/* endblock {} */", block.name));
    Ok(())
}

pub fn directive(node: &Node, generator: &mut Generator<'_>) -> Result<(), CodegenError> {
    match node {
        Node::Directive(directive) => {
            generator.apply_directive(directive);
            Ok(())
        }
        _ => Err(unexpected(node)),
    }
}

#[cfg(test)]
mod test {
    use super::super::Compiler;
    use crate::directives::Directives;
    use crate::intermediates::*;

    fn compile(nodes: Vec<Node>) -> String {
        Compiler::new().compile(&NodeStream::new(nodes), &Directives::empty()).unwrap()
    }
    fn text(s: &str) -> Node {
        Node::Text(s.to_string())
    }

    #[test]
    fn compound_assignment() {
        let node = Node::Assignment(Assignment {
            name: Identifier::new("greeting"),
            value: Box::new(Node::literal(Value::String("!".to_string()))),
            operator: Some(Operator::ConcatAssign),
        });
        assert_eq!(compile(vec![node]), "<?php $greeting .= '!'; ?>");
    }

    #[test]
    fn comment_lines() {
        let node = Node::Comment("  first\n\n   second  ".to_string());
        assert_eq!(compile(vec![node]), "<?php // first\n // second\n ?>");
        let node = Node::Comment("one\r\ntwo\rthree".to_string());
        assert_eq!(compile(vec![node]), "<?php // one\n // two\n // three\n ?>");
    }

    #[test]
    fn comments_cannot_close_code() {
        let node = Node::Comment("note ?>LEAK <?php evil();".to_string());
        assert_eq!(compile(vec![node]), "<?php // note ? >LEAK <?php evil();\n ?>");
    }

    #[test]
    fn conditional_chain() {
        let node = Node::Conditional(Conditional {
            operand: Box::new(Node::identifier("a")),
            body: vec![text("A")],
            branches: vec![ConditionalBranch { operand: Node::identifier("b"), body: vec![text("B")] }],
            else_body: Some(vec![text("C")]),
        });
        assert_eq!(
            compile(vec![node]),
            "<?php if ($a) { ?>A<?php } elseif ($b) { ?>B<?php } else { ?>C<?php } ?>"
        );
    }

    #[test]
    fn loops() {
        let node = Node::For(For {
            value: Identifier::new("user"),
            iterator: Box::new(Node::identifier("users")),
            key: Some(Identifier::new("i")),
            body: vec![Node::echo(Node::identifier("i"))],
        });
        assert_eq!(
            compile(vec![node]),
            "<?php foreach ($users as $i => $user) { echo $this->escape($i); } ?>"
        );
    }

    #[test]
    fn blocks() {
        let node = Node::Block(Block { name: "content".to_string(), nodes: vec![text("hi")] });
        assert_eq!(compile(vec![node]), "<?php /* block content */ ?>hi<?php /* endblock content */ ?>");
    }
}
