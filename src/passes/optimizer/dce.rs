/// dead code elimination: branches we can prove never run, and comments
/// nobody will see
use super::scope::Scope;
use super::{optimize_directive, Context, Optimizer};
use crate::directives::STRIP_COMMENTS;
use crate::intermediates::*;

#[derive(Debug, Default, Clone, Copy)]
pub struct DeadCodeEliminator;

impl Optimizer for DeadCodeEliminator {
    fn name(&self) -> &'static str {
        "dead code elimination"
    }

    fn optimizer(&self, mut stream: NodeStream, ctx: &mut Context) -> NodeStream {
        let mut eliminator = Eliminator { scope: Scope::new(), uncertain: 0 };
        let mut out = vec![];
        while let Some(node) = stream.consume() {
            eliminator.node(node, ctx, &mut out);
        }
        NodeStream::new(out)
    }
}

struct Eliminator {
    scope: Scope,
    /// How many bodies deep we are into code that might not run. Anything
    /// assigned in there can't be trusted afterwards
    uncertain: usize,
}

impl Eliminator {
    fn node(&mut self, node: &Node, ctx: &mut Context, out: &mut Vec<Node>) {
        match node {
            Node::Comment(_) => {
                if !ctx.directives.enabled(STRIP_COMMENTS) {
                    out.push(node.clone());
                }
            }
            Node::Conditional(conditional) => out.extend(self.conditional(conditional, ctx)),
            Node::Assignment(assignment) => {
                match assignment.operator {
                    None | Some(Operator::Assign) => {
                        self.scope.assign(&assignment.name.name, &assignment.value, self.uncertain == 0)
                    }
                    // compound, the result depends on the old value
                    Some(_) => self.scope.widen(&assignment.name.name),
                }
                out.push(node.clone());
            }
            Node::Directive(directive) => out.push(optimize_directive(directive, ctx)),
            Node::Block(block) => {
                let nodes = self.body(&block.nodes, ctx);
                out.push(Node::Block(Block { name: block.name.clone(), nodes }));
            }
            Node::For(for_loop) => {
                // a later iteration sees what an earlier one assigned, so
                // nothing assigned in the loop is constant inside it either
                self.scope.widen(&for_loop.value.name);
                if let Some(key) = &for_loop.key {
                    self.scope.widen(&key.name);
                }
                self.widen_assigned(&for_loop.body);
                let body = self.uncertain_body(&for_loop.body, ctx);
                out.push(Node::For(For { body, ..for_loop.clone() }));
            }
            _ => out.push(node.clone()),
        }
    }

    fn body(&mut self, body: &[Node], ctx: &mut Context) -> Vec<Node> {
        let mut out = vec![];
        for node in body {
            self.node(node, ctx, &mut out);
        }
        out
    }

    fn uncertain_body(&mut self, body: &[Node], ctx: &mut Context) -> Vec<Node> {
        self.uncertain += 1;
        let out = self.body(body, ctx);
        self.uncertain -= 1;
        out
    }

    fn else_body(&mut self, else_body: &Option<Vec<Node>>, ctx: &mut Context) -> Vec<Node> {
        match else_body {
            Some(body) => self.body(body, ctx),
            None => vec![],
        }
    }

    /// Some(truthiness) when the condition is known at compile time
    fn determine(&self, operand: &Node) -> Option<bool> {
        self.scope.resolve(operand).map(|lit| lit.value().truthy())
    }

    fn conditional(&mut self, conditional: &Conditional, ctx: &mut Context) -> Vec<Node> {
        match self.determine(&conditional.operand) {
            Some(true) => {
                trace!("if condition always true, keeping only its body");
                let mut out = self.body(&conditional.body, ctx);
                let rest = conditional.branches.iter().map(|branch| branch.body.as_slice());
                out.extend(place(collect_directives(rest.chain(conditional.else_body.as_deref())), ctx));
                out
            }
            Some(false) if conditional.branches.is_empty() => {
                trace!("if condition always false, keeping only the else");
                let mut out = place(collect_directives(Some(conditional.body.as_slice())), ctx);
                out.extend(self.else_body(&conditional.else_body, ctx));
                out
            }
            Some(false) => self.branches(conditional, ctx),
            None => {
                // the head decides whether any later branch is reachable, so
                // only its body gets touched
                let body = self.uncertain_body(&conditional.body, ctx);
                for branch in &conditional.branches {
                    self.untouched(&branch.body, ctx);
                }
                if let Some(else_body) = &conditional.else_body {
                    self.untouched(else_body, ctx);
                }
                vec![Node::Conditional(Conditional { body, ..conditional.clone() })]
            }
        }
    }

    /// The head is known false: the first branch not known false takes its
    /// place, and a branch known true ends the chain as the new else.
    /// Directives in dropped arms stay where they were in source order
    fn branches(&mut self, conditional: &Conditional, ctx: &mut Context) -> Vec<Node> {
        let mut out = vec![];
        // directives of dropped arms that haven't been placed yet
        let mut pending = collect_directives(Some(conditional.body.as_slice()));
        let mut head: Option<&ConditionalBranch> = None;
        let mut kept = vec![];
        let mut else_body = None;
        let mut closed = false;
        for (i, branch) in conditional.branches.iter().enumerate() {
            match self.determine(&branch.operand) {
                Some(true) => {
                    let rest = conditional.branches[i + 1..].iter().map(|branch| branch.body.as_slice());
                    let dropped = collect_directives(rest.chain(conditional.else_body.as_deref()));
                    if head.is_none() {
                        out.extend(place(std::mem::take(&mut pending), ctx));
                        out.extend(self.body(&branch.body, ctx));
                        out.extend(place(dropped, ctx));
                        return out;
                    }
                    else_body = Some(prefixed(std::mem::take(&mut pending), &branch.body));
                    pending = dropped;
                    closed = true;
                    break;
                }
                Some(false) => pending.extend(collect_directives(Some(branch.body.as_slice()))),
                None if head.is_none() => {
                    out.extend(place(std::mem::take(&mut pending), ctx));
                    head = Some(branch);
                }
                None => kept.push(ConditionalBranch {
                    operand: branch.operand.clone(),
                    body: prefixed(std::mem::take(&mut pending), &branch.body),
                }),
            }
        }
        let head = match head {
            Some(head) => head,
            None => {
                out.extend(place(pending, ctx));
                out.extend(self.else_body(&conditional.else_body, ctx));
                return out;
            }
        };
        if !closed {
            if let Some(original) = &conditional.else_body {
                else_body = Some(prefixed(std::mem::take(&mut pending), original));
            }
        }
        let body = self.uncertain_body(&head.body, ctx);
        for branch in &kept {
            self.untouched(&branch.body, ctx);
        }
        if let Some(else_body) = &else_body {
            self.untouched(else_body, ctx);
        }
        out.push(Node::Conditional(Conditional {
            operand: Box::new(head.operand.clone()),
            body,
            branches: kept,
            else_body,
        }));
        out.extend(place(pending, ctx));
        out
    }

    /// A body that is kept as is: its assignments can't be trusted and its
    /// directives still apply to whatever follows
    fn untouched(&mut self, body: &[Node], ctx: &mut Context) {
        self.widen_assigned(body);
        place(collect_directives(Some(body)), ctx);
    }

    /// Everything assigned anywhere in `body` becomes Varying
    fn widen_assigned(&mut self, body: &[Node]) {
        for node in body {
            match node {
                Node::Assignment(assignment) => self.scope.widen(&assignment.name.name),
                Node::Conditional(conditional) => {
                    self.widen_assigned(&conditional.body);
                    for branch in &conditional.branches {
                        self.widen_assigned(&branch.body);
                    }
                    if let Some(else_body) = &conditional.else_body {
                        self.widen_assigned(else_body);
                    }
                }
                Node::For(for_loop) => {
                    self.scope.widen(&for_loop.value.name);
                    if let Some(key) = &for_loop.key {
                        self.scope.widen(&key.name);
                    }
                    self.widen_assigned(&for_loop.body);
                }
                Node::Block(block) => self.widen_assigned(&block.nodes),
                _ => (),
            }
        }
    }
}

/// Every directive in `bodies`, nested ones included, in source order
fn collect_directives<'a>(bodies: impl IntoIterator<Item = &'a [Node]>) -> Vec<Node> {
    fn walk(body: &[Node], out: &mut Vec<Node>) {
        for node in body {
            match node {
                Node::Directive(_) => out.push(node.clone()),
                Node::Conditional(conditional) => {
                    walk(&conditional.body, out);
                    for branch in &conditional.branches {
                        walk(&branch.body, out);
                    }
                    if let Some(else_body) = &conditional.else_body {
                        walk(else_body, out);
                    }
                }
                Node::For(for_loop) => walk(&for_loop.body, out),
                Node::Block(block) => walk(&block.nodes, out),
                _ => (),
            }
        }
    }
    let mut out = vec![];
    for body in bodies {
        walk(body, &mut out);
    }
    out
}

/// Applies collected directives, returning them to be emitted in place
fn place(directives: Vec<Node>, ctx: &mut Context) -> Vec<Node> {
    directives
        .iter()
        .filter_map(|node| match node {
            Node::Directive(directive) => Some(optimize_directive(directive, ctx)),
            _ => None,
        })
        .collect()
}

fn prefixed(directives: Vec<Node>, body: &[Node]) -> Vec<Node> {
    directives.into_iter().chain(body.iter().cloned()).collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::directives::{Directives, AUTOESCAPE};

    fn text(s: &str) -> Node {
        Node::Text(s.to_string())
    }
    fn boolean(b: bool) -> Node {
        Node::literal(Value::Bool(b))
    }
    fn set(name: &str, value: Node) -> Node {
        Node::Assignment(Assignment { name: Identifier::new(name), value: Box::new(value), operator: None })
    }
    fn branch(operand: Node, body: Vec<Node>) -> ConditionalBranch {
        ConditionalBranch { operand, body }
    }
    fn conditional(operand: Node, body: Vec<Node>, branches: Vec<ConditionalBranch>, else_body: Option<Vec<Node>>) -> Node {
        Node::Conditional(Conditional { operand: Box::new(operand), body, branches, else_body })
    }
    fn directive(name: &str, on: bool) -> Node {
        Node::Directive(Directive { name: name.to_string(), value: Literal::new(on.to_string(), NativeType::Bool) })
    }
    fn run(nodes: Vec<Node>) -> Vec<Node> {
        DeadCodeEliminator.optimize(NodeStream::new(nodes), &Directives::empty()).stream.into_nodes()
    }

    #[test]
    fn true_head_keeps_body() {
        let nodes = vec![conditional(
            boolean(true),
            vec![text("A"), Node::Comment("gone".to_string())],
            vec![branch(Node::identifier("x"), vec![text("X")])],
            Some(vec![text("B")]),
        )];
        assert_eq!(run(nodes), vec![text("A")]);
    }

    #[test]
    fn false_head_true_branch() {
        let nodes = vec![conditional(
            boolean(false),
            vec![text("A")],
            vec![branch(boolean(true), vec![text("C")])],
            Some(vec![text("B")]),
        )];
        assert_eq!(run(nodes), vec![text("C")]);
    }

    #[test]
    fn false_head_no_branches() {
        let with_else = vec![conditional(boolean(false), vec![text("A")], vec![], Some(vec![text("B")]))];
        assert_eq!(run(with_else), vec![text("B")]);
        let without = vec![conditional(Node::literal(Value::Null), vec![text("A")], vec![], None)];
        assert_eq!(run(without), vec![]);
    }

    #[test]
    fn all_branches_false() {
        let nodes = vec![conditional(
            boolean(false),
            vec![text("A")],
            vec![branch(Node::literal(Value::Int(0)), vec![text("C")]), branch(boolean(false), vec![text("D")])],
            Some(vec![text("B")]),
        )];
        assert_eq!(run(nodes), vec![text("B")]);
    }

    #[test]
    fn unknown_branch_becomes_head() {
        let nodes = vec![conditional(
            boolean(false),
            vec![text("A")],
            vec![
                branch(boolean(false), vec![text("C")]),
                branch(Node::identifier("x"), vec![text("X"), Node::Comment("c".to_string())]),
                branch(Node::identifier("y"), vec![text("Y")]),
                branch(boolean(true), vec![text("T")]),
                branch(Node::identifier("z"), vec![text("Z")]),
            ],
            Some(vec![text("B")]),
        )];
        assert_eq!(
            run(nodes),
            vec![conditional(
                Node::identifier("x"),
                vec![text("X")],
                vec![branch(Node::identifier("y"), vec![text("Y")])],
                Some(vec![text("T")]),
            )]
        );
    }

    #[test]
    fn unknown_head_only_touches_body() {
        let nodes = vec![conditional(
            Node::identifier("x"),
            vec![text("A"), Node::Comment("c".to_string())],
            vec![branch(boolean(false), vec![text("C")])],
            Some(vec![Node::Comment("kept".to_string())]),
        )];
        assert_eq!(
            run(nodes),
            vec![conditional(
                Node::identifier("x"),
                vec![text("A")],
                vec![branch(boolean(false), vec![text("C")])],
                Some(vec![Node::Comment("kept".to_string())]),
            )]
        );
    }

    #[test]
    fn constant_variables_decide() {
        let nodes = vec![
            set("debug", boolean(false)),
            conditional(Node::identifier("debug"), vec![text("dbg")], vec![], Some(vec![text("prod")])),
        ];
        assert_eq!(run(nodes), vec![set("debug", boolean(false)), text("prod")]);
    }

    #[test]
    fn variables_assigned_in_unknown_code_vary() {
        let nodes = vec![
            set("flag", boolean(true)),
            conditional(Node::identifier("x"), vec![set("flag", boolean(false))], vec![], None),
            conditional(Node::identifier("flag"), vec![text("on")], vec![], None),
        ];
        let out = run(nodes.clone());
        assert_eq!(out, nodes);
    }

    #[test]
    fn compound_assignment_varies() {
        let nodes = vec![
            set("n", Node::literal(Value::Int(2))),
            Node::Assignment(Assignment {
                name: Identifier::new("n"),
                value: Box::new(Node::literal(Value::Int(2))),
                operator: Some(Operator::AddAssign),
            }),
            conditional(Node::identifier("n"), vec![text("some")], vec![], None),
        ];
        assert_eq!(run(nodes.clone()), nodes);
    }

    #[test]
    fn loop_bodies_are_never_constant() {
        let nodes = vec![
            set("first", boolean(true)),
            Node::For(For {
                value: Identifier::new("item"),
                iterator: Box::new(Node::identifier("items")),
                key: None,
                body: vec![
                    conditional(Node::identifier("first"), vec![text(",")], vec![], None),
                    set("first", boolean(false)),
                ],
            }),
        ];
        assert_eq!(run(nodes.clone()), nodes);
    }

    #[test]
    fn comments() {
        assert_eq!(run(vec![Node::Comment("x".to_string())]), vec![]);
        let keep = Node::Directive(Directive {
            name: STRIP_COMMENTS.to_string(),
            value: Literal::new("false", NativeType::Bool),
        });
        let nodes = vec![keep.clone(), Node::Comment("x".to_string())];
        assert_eq!(run(nodes.clone()), nodes);
    }

    #[test]
    fn directives_outlive_dead_arms() {
        let off = directive(AUTOESCAPE, false);
        let nodes = vec![conditional(boolean(false), vec![off.clone(), text("A")], vec![], Some(vec![text("B")]))];
        assert_eq!(run(nodes), vec![off.clone(), text("B")]);
        let nodes = vec![conditional(boolean(true), vec![text("A")], vec![], Some(vec![text("B"), off.clone()]))];
        assert_eq!(run(nodes), vec![text("A"), off.clone()]);
        // nested deeper in a dead arm still counts
        let nested = Node::For(For {
            value: Identifier::new("item"),
            iterator: Box::new(Node::identifier("items")),
            key: None,
            body: vec![conditional(Node::identifier("x"), vec![off.clone()], vec![], None)],
        });
        let nodes = vec![conditional(boolean(false), vec![nested], vec![branch(boolean(true), vec![text("C")])], None)];
        assert_eq!(run(nodes), vec![off, text("C")]);
    }

    #[test]
    fn dropped_branch_directives_keep_their_place() {
        let a = directive(AUTOESCAPE, false);
        let b = directive(STRIP_COMMENTS, false);
        let c = directive(AUTOESCAPE, true);
        let nodes = vec![conditional(
            boolean(false),
            vec![a.clone()],
            vec![
                branch(Node::identifier("x"), vec![text("X")]),
                branch(boolean(false), vec![b.clone()]),
                branch(Node::identifier("y"), vec![text("Y")]),
                branch(boolean(true), vec![text("T")]),
                branch(Node::identifier("z"), vec![c.clone()]),
            ],
            None,
        )];
        assert_eq!(
            run(nodes),
            vec![
                a,
                conditional(
                    Node::identifier("x"),
                    vec![text("X")],
                    vec![branch(Node::identifier("y"), vec![b, text("Y")])],
                    Some(vec![text("T")]),
                ),
                c,
            ]
        );
    }

    #[test]
    fn directives_in_untouched_arms_apply() {
        let keep = directive(STRIP_COMMENTS, false);
        let in_branch = vec![
            conditional(Node::identifier("x"), vec![text("A")], vec![branch(Node::identifier("y"), vec![keep.clone()])], None),
            Node::Comment("kept".to_string()),
        ];
        assert_eq!(run(in_branch.clone()), in_branch);
        let in_else = vec![
            conditional(Node::identifier("x"), vec![text("A")], vec![], Some(vec![keep.clone()])),
            Node::Comment("kept".to_string()),
        ];
        assert_eq!(run(in_else.clone()), in_else);
        // same once a dead head hands over to an unknown branch
        let handed_over = vec![
            conditional(boolean(false), vec![], vec![branch(Node::identifier("x"), vec![])], Some(vec![keep.clone()])),
            Node::Comment("kept".to_string()),
        ];
        assert_eq!(
            run(handed_over),
            vec![
                conditional(Node::identifier("x"), vec![], vec![], Some(vec![keep])),
                Node::Comment("kept".to_string()),
            ]
        );
    }
}
