/// Walks a source string one character at a time, counting lines as it
/// goes. Never fails: peeking past the end just gives less back
#[derive(Clone, Debug)]
pub struct Cursor<'src> {
    source: &'src str,
    pos: usize,
    line: usize,
}

impl<'src> Cursor<'src> {
    pub fn new(source: &'src str) -> Self {
        Self { source, pos: 0, line: 1 }
    }

    fn rest(&self) -> &'src str {
        &self.source[self.pos..]
    }

    /// The next `n` characters, or whatever is left if that's fewer
    pub fn peek(&self, n: usize) -> &'src str {
        let rest = self.rest();
        match rest.char_indices().nth(n) {
            Some((end, _)) => &rest[..end],
            None => rest,
        }
    }

    pub fn starts_with(&self, what: &str) -> bool {
        self.rest().starts_with(what)
    }

    pub fn consume(&mut self) -> Option<char> {
        let c = self.rest().chars().next()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    pub fn consume_n(&mut self, n: usize) -> &'src str {
        let start = self.pos;
        for _ in 0..n {
            if self.consume().is_none() {
                break;
            }
        }
        &self.source[start..self.pos]
    }

    pub fn consume_whitespace(&mut self) {
        while let Some(c) = self.rest().chars().next() {
            if !c.is_whitespace() {
                break;
            }
            self.consume();
        }
    }

    pub fn eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    pub fn line(&self) -> usize {
        self.line
    }
}
