// This is the parser. yay. Template text goes in, a node stream comes out

use super::cursor::Cursor;
use super::lexer::lex;
use crate::intermediates::*;
use crate::CompileError;

#[derive(PartialEq, Clone, Debug)]
pub enum ParseError {
    // Expected, got
    Expected(Vec<String>, Token),
    /// Ran out of tokens (or template) while parsing something
    Eof { expected: Vec<String>, during: String, line: usize },
    /// A tag opener with no closer
    Unclosed { opener: String, line: usize },
}
impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use ParseError::*;
        match self {
            Expected(expected, got) => {
                write!(f, "[ERROR] expected {}, got {}", expected.join(", "), got)
            }
            Eof { expected, during, line } => write!(
                f,
                "[ERROR] unexpected end of {} at line {}, expected {}",
                during,
                line,
                expected.join(", ")
            ),
            Unclosed { opener, line } => write!(f, "[ERROR] unclosed {} opened at line {}", opener, line),
        }
    }
}
// All relevant details in Display and Debug
impl std::error::Error for ParseError {}

type Result<T> = std::result::Result<T, CompileError>;

fn strings(what: &[&str]) -> Vec<String> {
    what.iter().map(|s| s.to_string()).collect()
}

const STATEMENTS: [&str; 5] = ["set", "if", "for", "block", "directive"];

/// Binding powers, loosest first. Left and right power differ by one so
/// everything is left associative except `**`, whose right power is lower
fn infix_binding_power(op: Operator) -> Option<(u8, u8)> {
    use Operator::*;
    Some(match op {
        Coalesce => (1, 2),
        Or => (3, 4),
        Xor => (5, 6),
        And => (7, 8),
        Equal | NotEqual | StrictEqual | StrictNotEqual => (9, 10),
        Less | Greater | LessEqual | GreaterEqual => (11, 12),
        BitOr => (13, 14),
        BitXor => (15, 16),
        BitAnd => (17, 18),
        ShiftLeft | ShiftRight => (19, 20),
        Add | Subtract | Concat => (21, 22),
        Multiply | Divide | Modulo => (23, 24),
        Power => (28, 27),
        _ => return None,
    })
}
const PREFIX_BP: u8 = 25;

struct ExpressionParser {
    tokens: Vec<Token>,
    pos: usize,
    line: usize,
    during: &'static str,
}

impl ExpressionParser {
    fn new(tokens: Vec<Token>, line: usize, during: &'static str) -> Self {
        Self { tokens, pos: 0, line, during }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn pop(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eof(&self, expected: &[&str]) -> ParseError {
        let line = self.tokens.last().map_or(self.line, |t| t.line);
        ParseError::Eof { expected: strings(expected), during: self.during.to_string(), line }
    }

    fn expect_character(&mut self, what: Character) -> std::result::Result<(), ParseError> {
        match self.pop() {
            Some(Token { kind: TokenKind::Character(c), .. }) if c == what => Ok(()),
            Some(got) => Err(ParseError::Expected(strings(&[what.symbol()]), got)),
            None => Err(self.eof(&[what.symbol()])),
        }
    }

    /// The whole token list must be one expression
    fn parse_all(mut self) -> std::result::Result<Node, ParseError> {
        let expression = self.parse_expression(0)?;
        match self.pop() {
            None => Ok(expression),
            Some(got) => Err(ParseError::Expected(strings(&["operator", "end of expression"]), got)),
        }
    }

    fn parse_expression(&mut self, min_bp: u8) -> std::result::Result<Node, ParseError> {
        let mut left = self.parse_prefix()?;
        loop {
            let kind = match self.peek() {
                Some(token) => token.kind.clone(),
                None => break,
            };
            left = match kind {
                // member access binds tighter than anything, so no bp check
                TokenKind::Character(Character::Dot) => {
                    self.pop();
                    let key = match self.pop() {
                        Some(Token { kind: TokenKind::Identifier(name), .. }) => {
                            Node::Literal(Literal::new(name, NativeType::String))
                        }
                        Some(Token { kind: TokenKind::Literal { value, native_type: NativeType::Int }, .. }) => {
                            Node::Literal(Literal::new(value, NativeType::Int))
                        }
                        Some(got) => return Err(ParseError::Expected(strings(&["attribute name"]), got)),
                        None => return Err(self.eof(&["attribute name"])),
                    };
                    Node::ArrayAccess(ArrayAccess { array: Box::new(left), key: Box::new(key) })
                }
                TokenKind::Character(Character::LBracket) => {
                    self.pop();
                    let key = self.parse_expression(0)?;
                    self.expect_character(Character::RBracket)?;
                    Node::ArrayAccess(ArrayAccess { array: Box::new(left), key: Box::new(key) })
                }
                TokenKind::Operator(op) => {
                    let (l_bp, r_bp) = match infix_binding_power(op) {
                        Some(bp) => bp,
                        // assignment or prefix-only operator, let the caller complain
                        None => break,
                    };
                    if l_bp < min_bp {
                        break;
                    }
                    self.pop();
                    let right = self.parse_expression(r_bp)?;
                    Node::binary(left, op, right)
                }
                _ => break,
            };
        }
        Ok(left)
    }

    fn parse_prefix(&mut self) -> std::result::Result<Node, ParseError> {
        const EXPECTED: [&str; 5] = ["literal", "identifier", "(", "-", "!"];
        let token = match self.pop() {
            Some(token) => token,
            None => return Err(self.eof(&EXPECTED)),
        };
        Ok(match token.kind {
            TokenKind::Literal { value, native_type } => Node::Literal(Literal::new(value, native_type)),
            TokenKind::Identifier(name) => match self.peek() {
                Some(Token { kind: TokenKind::Character(Character::LParen), .. }) => {
                    self.pop();
                    Node::FunctionCall(FunctionCall { name: Identifier { name }, arguments: self.parse_arguments()? })
                }
                _ => Node::Identifier(Identifier { name }),
            },
            TokenKind::Character(Character::LParen) => {
                let inner = self.parse_expression(0)?;
                self.expect_character(Character::RParen)?;
                Node::Group(Box::new(inner))
            }
            TokenKind::Operator(op @ Operator::Subtract) | TokenKind::Operator(op @ Operator::Not) => {
                let operand = self.parse_expression(PREFIX_BP)?;
                Node::UnaryOp(UnaryOp { operand: Box::new(operand), operator: op })
            }
            _ => return Err(ParseError::Expected(strings(&EXPECTED), token)),
        })
    }

    /// Call arguments, the opening paren already eaten
    fn parse_arguments(&mut self) -> std::result::Result<Vec<Node>, ParseError> {
        let mut arguments = vec![];
        if let Some(Token { kind: TokenKind::Character(Character::RParen), .. }) = self.peek() {
            self.pop();
            return Ok(arguments);
        }
        loop {
            arguments.push(self.parse_expression(0)?);
            match self.pop() {
                Some(Token { kind: TokenKind::Character(Character::Comma), .. }) => continue,
                Some(Token { kind: TokenKind::Character(Character::RParen), .. }) => break,
                Some(got) => return Err(ParseError::Expected(strings(&[",", ")"]), got)),
                None => return Err(self.eof(&[",", ")"])),
            }
        }
        Ok(arguments)
    }
}

/// Parse a standalone expression, mostly useful for tests and tooling
pub fn parse_expression(line: usize, text: &str) -> Result<Node> {
    let tokens = lex(line, text)?;
    Ok(ExpressionParser::new(tokens, line, "expression").parse_all()?)
}

#[derive(PartialEq, Clone, Debug)]
enum Segment {
    Text(String),
    Echo(String, usize),
    Comment(String),
    Tag(String, usize),
}

/// Reads up to and past `close`. When `quoted` is set, a closer inside a
/// string literal doesn't count
fn read_until(cursor: &mut Cursor, opener: &str, close: &str, quoted: bool) -> Result<String> {
    let line = cursor.line();
    let mut inside = String::new();
    let mut quote: Option<char> = None;
    loop {
        if cursor.eof() {
            return Err(ParseError::Unclosed { opener: opener.to_string(), line }.into());
        }
        if quote.is_none() && cursor.starts_with(close) {
            cursor.consume_n(close.chars().count());
            return Ok(inside);
        }
        let c = match cursor.consume() {
            Some(c) => c,
            None => continue,
        };
        if quoted {
            match quote {
                Some(q) if c == q && inside.chars().rev().take_while(|b| *b == '\\').count() % 2 == 0 => {
                    quote = None
                }
                None if c == '\'' || c == '"' => quote = Some(c),
                _ => (),
            }
        }
        inside.push(c);
    }
}

fn scan(source: &str) -> Result<Vec<Segment>> {
    let mut cursor = Cursor::new(source);
    let mut segments = vec![];
    let mut text = String::new();
    while !cursor.eof() {
        let opener = cursor.peek(2);
        if opener != "{{" && opener != "{%" && opener != "{#" {
            if let Some(c) = cursor.consume() {
                text.push(c);
            }
            continue;
        }
        if !text.is_empty() {
            segments.push(Segment::Text(std::mem::take(&mut text)));
        }
        let line = cursor.line();
        cursor.consume_n(2);
        segments.push(match opener {
            "{{" => Segment::Echo(read_until(&mut cursor, opener, "}}", true)?, line),
            "{%" => Segment::Tag(read_until(&mut cursor, opener, "%}", true)?, line),
            _ => Segment::Comment(read_until(&mut cursor, opener, "#}", false)?),
        });
    }
    if !text.is_empty() {
        segments.push(Segment::Text(text));
    }
    Ok(segments)
}

/// A tag that ended a body: its keyword, the tokens after the keyword, and
/// the line it sits on
struct EndTag {
    keyword: String,
    rest: Vec<Token>,
    line: usize,
}

struct Parser {
    segments: Vec<Segment>,
    pos: usize,
    line: usize,
}

impl Parser {
    fn next(&mut self) -> Option<Segment> {
        let segment = self.segments.get(self.pos).cloned();
        self.pos += 1;
        if let Some(Segment::Echo(_, line)) | Some(Segment::Tag(_, line)) = &segment {
            self.line = *line;
        }
        segment
    }

    /// Everything at the top level, where no end tag is allowed
    fn parse_root(&mut self) -> Result<Vec<Node>> {
        match self.parse_body(&[])? {
            (nodes, None) => Ok(nodes),
            // parse_body only stops early on one of the terminators given
            (_, Some(end)) => Err(unexpected_keyword(&end.keyword, end.line).into()),
        }
    }

    /// Body of a block statement, which must end in one of `terminators`
    fn parse_until(&mut self, terminators: &[&str], during: &str) -> Result<(Vec<Node>, EndTag)> {
        match self.parse_body(terminators)? {
            (nodes, Some(end)) => Ok((nodes, end)),
            (_, None) => Err(ParseError::Eof {
                expected: terminators.iter().map(|t| format!("{{% {} %}}", t)).collect(),
                during: during.to_string(),
                line: self.line,
            }
            .into()),
        }
    }

    fn parse_body(&mut self, terminators: &[&str]) -> Result<(Vec<Node>, Option<EndTag>)> {
        let mut nodes = vec![];
        while let Some(segment) = self.next() {
            let node = match segment {
                Segment::Text(text) => Node::Text(text),
                Segment::Comment(text) => Node::Comment(text),
                Segment::Echo(source, line) => {
                    let tokens = lex(line, &source)?;
                    Node::echo(ExpressionParser::new(tokens, line, "output").parse_all()?)
                }
                Segment::Tag(source, line) => {
                    let mut tokens = lex(line, &source)?;
                    let first = tokens.remove(0);
                    let keyword = match &first.kind {
                        TokenKind::Identifier(name) => name.clone(),
                        _ => return Err(ParseError::Expected(strings(&STATEMENTS), first).into()),
                    };
                    if terminators.contains(&keyword.as_str()) {
                        return Ok((nodes, Some(EndTag { keyword, rest: tokens, line })));
                    }
                    match keyword.as_str() {
                        "set" => self.parse_set(tokens, line)?,
                        "if" => self.parse_if(tokens, line)?,
                        "for" => self.parse_for(tokens, line)?,
                        "block" => self.parse_block(tokens, line)?,
                        "directive" => self.parse_directive(tokens, line)?,
                        _ => {
                            let mut expected = strings(&STATEMENTS);
                            expected.extend(terminators.iter().map(|t| t.to_string()));
                            return Err(ParseError::Expected(expected, first).into());
                        }
                    }
                }
            };
            nodes.push(node);
        }
        Ok((nodes, None))
    }

    fn parse_set(&mut self, rest: Vec<Token>, line: usize) -> Result<Node> {
        let mut rest = rest.into_iter();
        let name = expect_identifier(rest.next(), "assignment", line)?;
        let operator = match rest.next() {
            Some(Token { kind: TokenKind::Operator(Operator::Assign), .. }) => None,
            Some(Token { kind: TokenKind::Operator(op), .. }) if op.is_assignment() => Some(op),
            Some(got) => return Err(ParseError::Expected(strings(&["=", "+=", "-=", "*=", "/=", "~=", "??="]), got).into()),
            None => {
                return Err(ParseError::Eof { expected: strings(&["="]), during: "assignment".to_string(), line }.into())
            }
        };
        let value = ExpressionParser::new(rest.collect(), line, "assignment").parse_all()?;
        Ok(Node::Assignment(Assignment { name, value: Box::new(value), operator }))
    }

    fn parse_if(&mut self, rest: Vec<Token>, line: usize) -> Result<Node> {
        const INSIDE_IF: [&str; 3] = ["elseif", "else", "endif"];
        let operand = ExpressionParser::new(rest, line, "if condition").parse_all()?;
        let (body, mut end) = self.parse_until(&INSIDE_IF, "if")?;
        let mut branches = vec![];
        let mut else_body = None;
        loop {
            let EndTag { keyword, rest, line } = end;
            match keyword.as_str() {
                "elseif" => {
                    let operand = ExpressionParser::new(rest, line, "elseif condition").parse_all()?;
                    let (body, next) = self.parse_until(&INSIDE_IF, "if")?;
                    branches.push(ConditionalBranch { operand, body });
                    end = next;
                }
                "else" => {
                    expect_tag_end(rest)?;
                    let (body, next) = self.parse_until(&["endif"], "else")?;
                    else_body = Some(body);
                    end = next;
                }
                _ => {
                    expect_tag_end(rest)?;
                    break;
                }
            }
        }
        Ok(Node::Conditional(Conditional { operand: Box::new(operand), body, branches, else_body }))
    }

    /// `for value in iterator` or `for key, value in iterator`
    fn parse_for(&mut self, rest: Vec<Token>, line: usize) -> Result<Node> {
        let mut rest = rest.into_iter();
        let first = expect_identifier(rest.next(), "for", line)?;
        let (key, value, after) = match rest.next() {
            Some(Token { kind: TokenKind::Character(Character::Comma), .. }) => {
                let value = expect_identifier(rest.next(), "for", line)?;
                (Some(first), value, rest.next())
            }
            other => (None, first, other),
        };
        match after {
            Some(Token { kind: TokenKind::Identifier(ref word), .. }) if word == "in" => (),
            Some(got) => return Err(ParseError::Expected(strings(&["in"]), got).into()),
            None => {
                return Err(ParseError::Eof { expected: strings(&["in"]), during: "for".to_string(), line }.into())
            }
        }
        let iterator = ExpressionParser::new(rest.collect(), line, "for").parse_all()?;
        let (body, end) = self.parse_until(&["endfor"], "for")?;
        expect_tag_end(end.rest)?;
        Ok(Node::For(For { value, iterator: Box::new(iterator), key, body }))
    }

    fn parse_block(&mut self, rest: Vec<Token>, line: usize) -> Result<Node> {
        let mut rest = rest.into_iter();
        let name = expect_identifier(rest.next(), "block", line)?.name;
        expect_tag_end(rest.collect())?;
        let (nodes, end) = self.parse_until(&["endblock"], "block")?;
        // `{% endblock name %}` may repeat the name, but only the right one
        let mut rest = end.rest.into_iter();
        match rest.next() {
            None => (),
            Some(Token { kind: TokenKind::Identifier(ref end_name), .. }) if *end_name == name => {
                expect_tag_end(rest.collect())?
            }
            Some(got) => return Err(ParseError::Expected(vec![name, "%}".to_string()], got).into()),
        }
        Ok(Node::Block(Block { name, nodes }))
    }

    fn parse_directive(&mut self, rest: Vec<Token>, line: usize) -> Result<Node> {
        let mut rest = rest.into_iter();
        let name = expect_identifier(rest.next(), "directive", line)?.name;
        let value = match rest.next() {
            Some(Token { kind: TokenKind::Literal { value, native_type }, .. }) => Literal::new(value, native_type),
            Some(got) => return Err(ParseError::Expected(strings(&["literal"]), got).into()),
            None => {
                return Err(
                    ParseError::Eof { expected: strings(&["literal"]), during: "directive".to_string(), line }.into()
                )
            }
        };
        expect_tag_end(rest.collect())?;
        Ok(Node::Directive(Directive { name, value }))
    }
}

fn expect_identifier(token: Option<Token>, during: &str, line: usize) -> Result<Identifier> {
    match token {
        Some(Token { kind: TokenKind::Identifier(name), .. }) => Ok(Identifier { name }),
        Some(got) => Err(ParseError::Expected(strings(&["identifier"]), got).into()),
        None => Err(ParseError::Eof { expected: strings(&["identifier"]), during: during.to_string(), line }.into()),
    }
}

/// Nothing may follow in the tag
fn expect_tag_end(rest: Vec<Token>) -> Result<()> {
    match rest.into_iter().next() {
        None => Ok(()),
        Some(got) => Err(ParseError::Expected(strings(&["%}"]), got).into()),
    }
}

fn unexpected_keyword(keyword: &str, line: usize) -> ParseError {
    ParseError::Expected(
        strings(&STATEMENTS),
        Token { kind: TokenKind::Identifier(keyword.to_string()), line },
    )
}

/// Parse a whole template into a stream of statement-level nodes
pub fn parse(source: &str) -> Result<NodeStream> {
    let segments = scan(source)?;
    debug!("scanned {} template segments", segments.len());
    let mut parser = Parser { segments, pos: 0, line: 1 };
    Ok(NodeStream::new(parser.parse_root()?))
}

#[cfg(test)]
mod test {
    use super::*;

    fn expr(text: &str) -> Node {
        parse_expression(1, text).expect("test expression parse error")
    }
    fn int(i: i64) -> Node {
        Node::literal(Value::Int(i))
    }
    fn nodes(source: &str) -> Vec<Node> {
        parse(source).expect("test template parse error").into_nodes()
    }

    #[test]
    fn precedence() {
        // 1 + (2 * 3)
        assert_eq!(
            expr("1 + 2 * 3"),
            Node::binary(int(1), Operator::Add, Node::binary(int(2), Operator::Multiply, int(3)))
        );
        // (1 - 2) - 3
        assert_eq!(
            expr("1 - 2 - 3"),
            Node::binary(Node::binary(int(1), Operator::Subtract, int(2)), Operator::Subtract, int(3))
        );
        // 2 ** (3 ** 2)
        assert_eq!(
            expr("2 ** 3 ** 2"),
            Node::binary(int(2), Operator::Power, Node::binary(int(3), Operator::Power, int(2)))
        );
        // || binds tighter than ??: a ?? (b || c)
        assert_eq!(
            expr("a ?? b || c"),
            Node::binary(
                Node::identifier("a"),
                Operator::Coalesce,
                Node::binary(Node::identifier("b"), Operator::Or, Node::identifier("c"))
            )
        );
        // comparison binds tighter than equality
        assert_eq!(
            expr("a < b == c"),
            Node::binary(
                Node::binary(Node::identifier("a"), Operator::Less, Node::identifier("b")),
                Operator::Equal,
                Node::identifier("c")
            )
        );
    }

    #[test]
    fn prefix_and_groups() {
        assert_eq!(
            expr("not (a and b)"),
            Node::UnaryOp(UnaryOp {
                operand: Box::new(Node::Group(Box::new(Node::binary(
                    Node::identifier("a"),
                    Operator::And,
                    Node::identifier("b")
                )))),
                operator: Operator::Not,
            })
        );
        // -a ** 2 is -(a ** 2)
        assert_eq!(
            expr("-a ** 2"),
            Node::UnaryOp(UnaryOp {
                operand: Box::new(Node::binary(Node::identifier("a"), Operator::Power, int(2))),
                operator: Operator::Subtract,
            })
        );
    }

    #[test]
    fn access_and_calls() {
        assert_eq!(
            expr("upper(user.name, items[0])"),
            Node::FunctionCall(FunctionCall {
                name: Identifier::new("upper"),
                arguments: vec![
                    Node::ArrayAccess(ArrayAccess {
                        array: Box::new(Node::identifier("user")),
                        key: Box::new(Node::literal(Value::String("name".to_string()))),
                    }),
                    Node::ArrayAccess(ArrayAccess { array: Box::new(Node::identifier("items")), key: Box::new(int(0)) }),
                ],
            })
        );
        assert_eq!(expr("now()"), Node::FunctionCall(FunctionCall { name: Identifier::new("now"), arguments: vec![] }));
    }

    #[test]
    fn expression_errors() {
        match parse_expression(1, "1 +") {
            Err(CompileError::Parse(ParseError::Eof { .. })) => (),
            other => panic!("expected eof error, got {:?}", other),
        }
        match parse_expression(1, "a b") {
            Err(CompileError::Parse(ParseError::Expected(expected, got))) => {
                assert_eq!(expected, vec!["operator".to_string(), "end of expression".to_string()]);
                assert_eq!(got.kind, TokenKind::Identifier("b".to_string()));
            }
            other => panic!("expected unexpected token error, got {:?}", other),
        }
    }

    #[test]
    fn set_and_echo() {
        assert_eq!(
            nodes("{% set name = \"World\" %}<p>Hello {{ name }}</p>"),
            vec![
                Node::Assignment(Assignment {
                    name: Identifier::new("name"),
                    value: Box::new(Node::literal(Value::String("World".to_string()))),
                    operator: None,
                }),
                Node::Text("<p>Hello ".to_string()),
                Node::echo(Node::identifier("name")),
                Node::Text("</p>".to_string()),
            ]
        );
    }

    #[test]
    fn compound_assignment() {
        match &nodes("{% set n += 1 %}")[0] {
            Node::Assignment(assignment) => assert_eq!(assignment.operator, Some(Operator::AddAssign)),
            other => panic!("expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn conditionals() {
        let parsed = nodes("{% if a %}A{% elseif b %}B{% else %}C{% endif %}");
        assert_eq!(
            parsed,
            vec![Node::Conditional(Conditional {
                operand: Box::new(Node::identifier("a")),
                body: vec![Node::Text("A".to_string())],
                branches: vec![ConditionalBranch {
                    operand: Node::identifier("b"),
                    body: vec![Node::Text("B".to_string())],
                }],
                else_body: Some(vec![Node::Text("C".to_string())]),
            })]
        );
    }

    #[test]
    fn loops_blocks_directives_comments() {
        let parsed = nodes("{# hi #}{% directive autoescape false %}{% block main %}{% for k, v in items %}{{ v }}{% endfor %}{% endblock main %}");
        assert_eq!(
            parsed,
            vec![
                Node::Comment(" hi ".to_string()),
                Node::Directive(Directive {
                    name: "autoescape".to_string(),
                    value: Literal::new("false", NativeType::Bool),
                }),
                Node::Block(Block {
                    name: "main".to_string(),
                    nodes: vec![Node::For(For {
                        value: Identifier::new("v"),
                        iterator: Box::new(Node::identifier("items")),
                        key: Some(Identifier::new("k")),
                        body: vec![Node::echo(Node::identifier("v"))],
                    })],
                }),
            ]
        );
    }

    #[test]
    fn closer_inside_string() {
        assert_eq!(
            nodes("{{ \"}}\" }}"),
            vec![Node::echo(Node::literal(Value::String("}}".to_string())))]
        );
    }

    #[test]
    fn root_nodes_only() {
        let parsed = nodes("a{{ 1 + 2 }}{% set x = y %}{% if x %}{{ x }}{% endif %}");
        assert!(parsed.iter().all(|node| node.class() == NodeClass::Root));
    }

    #[test]
    fn template_errors() {
        match parse("{{ name") {
            Err(CompileError::Parse(ParseError::Unclosed { line: 1, .. })) => (),
            other => panic!("expected unclosed error, got {:?}", other),
        }
        match parse("{% if a %}\nno end") {
            Err(CompileError::Parse(ParseError::Eof { .. })) => (),
            other => panic!("expected eof error, got {:?}", other),
        }
        match parse("{% endif %}") {
            Err(CompileError::Parse(ParseError::Expected(_, got))) => {
                assert_eq!(got.kind, TokenKind::Identifier("endif".to_string()))
            }
            other => panic!("expected unexpected tag error, got {:?}", other),
        }
        match parse("{% %}") {
            Err(CompileError::Lex(_)) => (),
            other => panic!("expected lex error, got {:?}", other),
        }
    }
}
