//! A list of Tokens is the result of lexing one expression span, just chunked
//! expression text with no regard for syntax. You're probably looking for
//! [Token], not TokenKind, since you want that sweet line data

use super::value::NativeType;

/// Every operator the lexer knows. The symbol table the lexer matches
/// against is built from [Operator::ALL], so adding one here is enough
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,
    Concat,
    Equal,
    NotEqual,
    StrictEqual,
    StrictNotEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    And,
    Or,
    Xor,
    Not,
    Coalesce,
    BitAnd,
    BitOr,
    BitXor,
    ShiftLeft,
    ShiftRight,
    Assign,
    AddAssign,
    SubtractAssign,
    MultiplyAssign,
    DivideAssign,
    ConcatAssign,
    CoalesceAssign,
}

impl Operator {
    pub const ALL: [Operator; 32] = [
        Operator::Add,
        Operator::Subtract,
        Operator::Multiply,
        Operator::Divide,
        Operator::Modulo,
        Operator::Power,
        Operator::Concat,
        Operator::Equal,
        Operator::NotEqual,
        Operator::StrictEqual,
        Operator::StrictNotEqual,
        Operator::Less,
        Operator::Greater,
        Operator::LessEqual,
        Operator::GreaterEqual,
        Operator::And,
        Operator::Or,
        Operator::Xor,
        Operator::Not,
        Operator::Coalesce,
        Operator::BitAnd,
        Operator::BitOr,
        Operator::BitXor,
        Operator::ShiftLeft,
        Operator::ShiftRight,
        Operator::Assign,
        Operator::AddAssign,
        Operator::SubtractAssign,
        Operator::MultiplyAssign,
        Operator::DivideAssign,
        Operator::ConcatAssign,
        Operator::CoalesceAssign,
    ];

    /// Source spelling. `xor` has no symbolic spelling, so it's None and
    /// only reachable through [Operator::from_word]
    pub fn symbol(self) -> Option<&'static str> {
        use Operator::*;
        Some(match self {
            Add => "+",
            Subtract => "-",
            Multiply => "*",
            Divide => "/",
            Modulo => "%",
            Power => "**",
            Concat => "~",
            Equal => "==",
            NotEqual => "!=",
            StrictEqual => "===",
            StrictNotEqual => "!==",
            Less => "<",
            Greater => ">",
            LessEqual => "<=",
            GreaterEqual => ">=",
            And => "&&",
            Or => "||",
            Xor => return None,
            Not => "!",
            Coalesce => "??",
            BitAnd => "&",
            BitOr => "|",
            BitXor => "^",
            ShiftLeft => "<<",
            ShiftRight => ">>",
            Assign => "=",
            AddAssign => "+=",
            SubtractAssign => "-=",
            MultiplyAssign => "*=",
            DivideAssign => "/=",
            ConcatAssign => "~=",
            CoalesceAssign => "??=",
        })
    }

    pub fn from_symbol(symbol: &str) -> Option<Operator> {
        Operator::ALL.iter().copied().find(|op| op.symbol() == Some(symbol))
    }

    /// Word operators, matched case-insensitively by the lexer
    pub fn from_word(word: &str) -> Option<Operator> {
        match word.to_ascii_lowercase().as_str() {
            "and" => Some(Operator::And),
            "or" => Some(Operator::Or),
            "xor" => Some(Operator::Xor),
            "not" => Some(Operator::Not),
            _ => None,
        }
    }

    pub fn is_assignment(self) -> bool {
        use Operator::*;
        matches!(
            self,
            Assign
                | AddAssign
                | SubtractAssign
                | MultiplyAssign
                | DivideAssign
                | ConcatAssign
                | CoalesceAssign
        )
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.symbol().unwrap_or("xor"))
    }
}

/// Punctuation
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash)]
pub enum Character {
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Dot,
    Colon,
}

impl Character {
    pub const ALL: [Character; 7] = [
        Character::LParen,
        Character::RParen,
        Character::LBracket,
        Character::RBracket,
        Character::Comma,
        Character::Dot,
        Character::Colon,
    ];

    pub fn symbol(self) -> &'static str {
        use Character::*;
        match self {
            LParen => "(",
            RParen => ")",
            LBracket => "[",
            RBracket => "]",
            Comma => ",",
            Dot => ".",
            Colon => ":",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Character> {
        Character::ALL.iter().copied().find(|c| c.symbol() == symbol)
    }
}

/// The kind of token, and any additional data associated with it
#[derive(PartialEq, Clone, Debug)]
pub enum TokenKind {
    Literal { value: String, native_type: NativeType },
    Identifier(String),
    Operator(Operator),
    Character(Character),
}

impl TokenKind {
    /// Whether a token of this kind can be the last token of an operand.
    /// Used by the lexer to tell `a - 1` from `-1`
    pub fn ends_operand(&self) -> bool {
        match self {
            TokenKind::Literal { .. } | TokenKind::Identifier(_) => true,
            TokenKind::Character(Character::RParen) | TokenKind::Character(Character::RBracket) => {
                true
            }
            _ => false,
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            TokenKind::Literal { value, native_type: NativeType::String } => {
                write!(f, "string literal {:?}", value)
            }
            TokenKind::Literal { value, native_type } => write!(f, "{} literal {}", native_type, value),
            TokenKind::Identifier(name) => write!(f, "identifier {}", name),
            TokenKind::Operator(op) => write!(f, "{}", op),
            TokenKind::Character(c) => write!(f, "{}", c.symbol()),
        }
    }
}

/// All tokens have a line ([Token::line]) and a kind ([Token::kind])
#[derive(PartialEq, Clone, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
}
impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} at line {}", self.kind, self.line)
    }
}
