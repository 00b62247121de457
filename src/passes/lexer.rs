// Hello, welcome to my lexer. It only ever sees the inside of one tag

use crate::intermediates::{Character, NativeType, Operator, Token, TokenKind};

#[derive(PartialEq, Clone, Debug)]
pub enum LexErrorKind {
    UnterminatedString,
    InvalidNumber(String),
    UnknownSymbol(String),
    EmptyExpression,
}

#[derive(PartialEq, Clone, Debug)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub line: usize,
}
impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use LexErrorKind::*;
        match &self.kind {
            UnterminatedString => write!(f, "[ERROR] unterminated string literal at line {}", self.line),
            InvalidNumber(text) => write!(f, "[ERROR] invalid number {} at line {}", text, self.line),
            UnknownSymbol(text) => write!(f, "[ERROR] unknown symbol {} at line {}", text, self.line),
            EmptyExpression => write!(f, "[ERROR] empty expression at line {}", self.line),
        }
    }
}
impl std::error::Error for LexError {}

enum NextSymbolType {
    Space,
    Quote(char),
    Number,
    Word,
    Symbol,
}

fn is_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_symbol(c: char) -> bool {
    !is_word(c) && !c.is_whitespace() && c != '\'' && c != '"'
}

/// Every multi-character spelling the lexer may emit, operators and
/// punctuation alike
fn symbol_table() -> Vec<&'static str> {
    let mut symbols: Vec<&'static str> = Operator::ALL.iter().filter_map(|op| op.symbol()).collect();
    symbols.extend(Character::ALL.iter().map(|c| c.symbol()));
    symbols
}

#[derive(Debug)]
struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    tokens: Vec<Token>,
    symbols: Vec<&'static str>,
}

impl Lexer {
    fn new(line: usize, text: &str) -> Lexer {
        Lexer { chars: text.chars().collect(), pos: 0, line, tokens: Vec::new(), symbols: symbol_table() }
    }

    fn nth(&self, n: usize) -> Option<char> {
        self.chars.get(self.pos + n).copied()
    }

    fn error(&self, kind: LexErrorKind) -> LexError {
        LexError { kind, line: self.line }
    }

    fn push(&mut self, kind: TokenKind, line: usize) {
        trace!("lexed {}", kind);
        self.tokens.push(Token { kind, line });
    }

    /// A minus or dot right after an operand is an operator, not a number
    fn after_operand(&self) -> bool {
        self.tokens.last().map_or(false, |t| t.kind.ends_operand())
    }

    fn next_symbol_type(&self, c: char) -> NextSymbolType {
        use NextSymbolType::*;
        if c.is_whitespace() {
            Space
        } else if c == '\'' || c == '"' {
            Quote(c)
        } else if c.is_ascii_digit() {
            Number
        } else if (c == '-' || c == '.') && !self.after_operand() && self.number_follows() {
            Number
        } else if is_word(c) {
            Word
        } else {
            Symbol
        }
    }

    fn number_follows(&self) -> bool {
        match (self.nth(0), self.nth(1), self.nth(2)) {
            (Some('.'), Some(d), _) => d.is_ascii_digit(),
            (Some('-'), Some(d), _) if d.is_ascii_digit() => true,
            (Some('-'), Some('.'), Some(d)) => d.is_ascii_digit(),
            _ => false,
        }
    }

    fn lex_string(&mut self, quote: char) -> Result<(), LexError> {
        let line = self.line;
        // opening quote
        self.pos += 1;
        let mut raw = String::new();
        loop {
            match self.nth(0) {
                None => return Err(LexError { kind: LexErrorKind::UnterminatedString, line }),
                Some(c) => {
                    self.pos += 1;
                    if c == quote && trailing_backslashes(&raw) % 2 == 0 {
                        break;
                    }
                    if c == '\n' {
                        self.line += 1;
                    }
                    raw.push(c);
                }
            }
        }
        self.push(TokenKind::Literal { value: unescape(&raw), native_type: NativeType::String }, line);
        Ok(())
    }

    fn lex_number(&mut self) -> Result<(), LexError> {
        let mut text = String::new();
        if self.nth(0) == Some('-') {
            text.push('-');
            self.pos += 1;
        }
        while let Some(c) = self.nth(0) {
            if c.is_ascii_digit() || c == '.' {
                text.push(c);
                self.pos += 1;
            } else if c == 'e' || c == 'E' {
                text.push(c);
                self.pos += 1;
                // a sign is only part of the number right after the exponent marker
                if let Some(sign @ '-') | Some(sign @ '+') = self.nth(0) {
                    text.push(sign);
                    self.pos += 1;
                }
            } else {
                break;
            }
        }
        match classify_number(&text) {
            Some(native_type) => {
                let line = self.line;
                self.push(TokenKind::Literal { value: text, native_type }, line);
                Ok(())
            }
            None => Err(self.error(LexErrorKind::InvalidNumber(text))),
        }
    }

    fn lex_word(&mut self) {
        let mut text = String::new();
        while let Some(c) = self.nth(0) {
            if !is_word(c) {
                break;
            }
            text.push(c);
            self.pos += 1;
        }
        let lower = text.to_lowercase();
        let kind = match lower.as_str() {
            "true" | "false" => TokenKind::Literal { value: lower, native_type: NativeType::Bool },
            "null" => TokenKind::Literal { value: lower, native_type: NativeType::Null },
            _ => match Operator::from_word(&lower) {
                Some(op) => TokenKind::Operator(op),
                None => TokenKind::Identifier(text),
            },
        };
        let line = self.line;
        self.push(kind, line);
    }

    /// Grow the symbol while it's still the start of something we know, then
    /// emit the longest thing we actually know and rewind to just after it
    fn lex_symbol(&mut self) -> Result<(), LexError> {
        let start = self.pos;
        let mut end = start + 1;
        while let Some(&c) = self.chars.get(end) {
            if !is_symbol(c) {
                break;
            }
            let candidate: String = self.chars[start..=end].iter().collect();
            if self.symbols.iter().any(|s| s.starts_with(candidate.as_str())) {
                end += 1;
            } else {
                break;
            }
        }
        for stop in (start + 1..=end).rev() {
            let buffer: String = self.chars[start..stop].iter().collect();
            let kind = match Operator::from_symbol(&buffer) {
                Some(op) => Some(TokenKind::Operator(op)),
                None => Character::from_symbol(&buffer).map(TokenKind::Character),
            };
            if let Some(kind) = kind {
                self.pos = stop;
                let line = self.line;
                self.push(kind, line);
                return Ok(());
            }
        }
        let buffer: String = self.chars[start..end].iter().collect();
        Err(self.error(LexErrorKind::UnknownSymbol(buffer)))
    }
}

fn trailing_backslashes(raw: &str) -> usize {
    raw.chars().rev().take_while(|c| *c == '\\').count()
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(e @ '\\') | Some(e @ '\'') | Some(e @ '"') => out.push(e),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

fn all_digits(s: &str) -> bool {
    s.chars().all(|c| c.is_ascii_digit())
}

/// `-?\d+` is an int, `-?(\d*\.\d+|\d+\.\d*)([eE][-+]?\d+)?` a float, nothing
/// else is a number
fn classify_number(text: &str) -> Option<NativeType> {
    let body = text.strip_prefix('-').unwrap_or(text);
    if !body.is_empty() && all_digits(body) {
        return Some(NativeType::Int);
    }
    let (mantissa, exponent) = match body.find(|c: char| c == 'e' || c == 'E') {
        Some(i) => (&body[..i], Some(&body[i + 1..])),
        None => (body, None),
    };
    let mut parts = mantissa.splitn(2, '.');
    let whole = parts.next()?;
    let fraction = parts.next()?;
    if !all_digits(whole) || !all_digits(fraction) || (whole.is_empty() && fraction.is_empty()) {
        return None;
    }
    if let Some(exponent) = exponent {
        let digits = exponent.strip_prefix(|c: char| c == '-' || c == '+').unwrap_or(exponent);
        if digits.is_empty() || !all_digits(digits) {
            return None;
        }
    }
    Some(NativeType::Float)
}

/// Lex one expression. `line` is the line the expression starts on, so
/// tokens point back into the whole template
pub fn lex(line: usize, text: &str) -> Result<Vec<Token>, LexError> {
    let mut lexer = Lexer::new(line, text);
    while let Some(c) = lexer.nth(0) {
        match lexer.next_symbol_type(c) {
            NextSymbolType::Space => {
                if c == '\n' {
                    lexer.line += 1;
                }
                lexer.pos += 1;
            }
            NextSymbolType::Quote(quote) => lexer.lex_string(quote)?,
            NextSymbolType::Number => lexer.lex_number()?,
            NextSymbolType::Word => lexer.lex_word(),
            NextSymbolType::Symbol => lexer.lex_symbol()?,
        }
    }
    if lexer.tokens.is_empty() {
        return Err(LexError { kind: LexErrorKind::EmptyExpression, line });
    }
    Ok(lexer.tokens)
}

#[cfg(test)]
mod test {
    use super::*;

    fn kinds(text: &str) -> Vec<TokenKind> {
        lex(1, text).expect("lex failed").into_iter().map(|t| t.kind).collect()
    }
    fn lit(value: &str, native_type: NativeType) -> TokenKind {
        TokenKind::Literal { value: value.to_string(), native_type }
    }
    fn id(name: &str) -> TokenKind {
        TokenKind::Identifier(name.to_string())
    }
    fn err(text: &str) -> LexErrorKind {
        lex(1, text).expect_err("lexed without error").kind
    }

    #[test]
    fn escaped_quote() {
        assert_eq!(kinds(r"'it\'s'"), vec![lit("it's", NativeType::String)]);
    }
    #[test]
    fn even_backslashes_terminate() {
        assert_eq!(
            kinds(r#""a\\" ~ b"#),
            vec![lit("a\\", NativeType::String), TokenKind::Operator(Operator::Concat), id("b")]
        );
    }
    #[test]
    fn numbers() {
        assert_eq!(kinds("578 9"), vec![lit("578", NativeType::Int), lit("9", NativeType::Int)]);
        assert_eq!(kinds("-3"), vec![lit("-3", NativeType::Int)]);
        assert_eq!(kinds(".5"), vec![lit(".5", NativeType::Float)]);
        assert_eq!(kinds("-.5"), vec![lit("-.5", NativeType::Float)]);
        assert_eq!(kinds("1.5e-3"), vec![lit("1.5e-3", NativeType::Float)]);
        assert_eq!(kinds("2."), vec![lit("2.", NativeType::Float)]);
    }
    #[test]
    fn minus_after_operand_is_subtraction() {
        assert_eq!(
            kinds("a-1"),
            vec![id("a"), TokenKind::Operator(Operator::Subtract), lit("1", NativeType::Int)]
        );
        assert_eq!(
            kinds("(2)-1"),
            vec![
                TokenKind::Character(Character::LParen),
                lit("2", NativeType::Int),
                TokenKind::Character(Character::RParen),
                TokenKind::Operator(Operator::Subtract),
                lit("1", NativeType::Int),
            ]
        );
    }
    #[test]
    fn keywords() {
        assert_eq!(
            kinds("TRUE and Null or not False"),
            vec![
                lit("true", NativeType::Bool),
                TokenKind::Operator(Operator::And),
                lit("null", NativeType::Null),
                TokenKind::Operator(Operator::Or),
                TokenKind::Operator(Operator::Not),
                lit("false", NativeType::Bool),
            ]
        );
        assert_eq!(kinds("Ünïcode_1"), vec![id("Ünïcode_1")]);
    }
    #[test]
    fn longest_symbol_wins() {
        assert_eq!(
            kinds("a===b"),
            vec![id("a"), TokenKind::Operator(Operator::StrictEqual), id("b")]
        );
        assert_eq!(
            kinds("a ??= b"),
            vec![id("a"), TokenKind::Operator(Operator::CoalesceAssign), id("b")]
        );
        // "!=(" isn't a prefix of anything, so we stop growing at "!="
        assert_eq!(
            kinds("a!=(b)"),
            vec![
                id("a"),
                TokenKind::Operator(Operator::NotEqual),
                TokenKind::Character(Character::LParen),
                id("b"),
                TokenKind::Character(Character::RParen),
            ]
        );
        // "!!" isn't the start of anything, so each "!" stands alone
        assert_eq!(kinds("!!"), vec![TokenKind::Operator(Operator::Not), TokenKind::Operator(Operator::Not)]);
    }
    #[test]
    fn punctuation() {
        assert_eq!(
            kinds("user.name[0]"),
            vec![
                id("user"),
                TokenKind::Character(Character::Dot),
                id("name"),
                TokenKind::Character(Character::LBracket),
                lit("0", NativeType::Int),
                TokenKind::Character(Character::RBracket),
            ]
        );
    }
    #[test]
    fn errors() {
        assert_eq!(err("'open"), LexErrorKind::UnterminatedString);
        assert_eq!(err("1.2.3"), LexErrorKind::InvalidNumber("1.2.3".to_string()));
        assert_eq!(err("1e"), LexErrorKind::InvalidNumber("1e".to_string()));
        assert_eq!(err("a @ b"), LexErrorKind::UnknownSymbol("@".to_string()));
        assert_eq!(err("   "), LexErrorKind::EmptyExpression);
    }
    #[test]
    fn lines() {
        let tokens = lex(4, "a\n+\nb").expect("lex failed");
        let lines: Vec<usize> = tokens.iter().map(|t| t.line).collect();
        assert_eq!(lines, vec![4, 5, 6]);
    }
}
