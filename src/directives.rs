//! Compile-time settings. Every optimizer pass and every codegen run starts
//! from a fresh copy: defaults, then whatever the caller seeded, then the
//! `{% directive %}` tags it walks past

use indexmap::IndexMap;

use crate::intermediates::{Literal, Value};

pub const AUTOESCAPE: &str = "autoescape";
pub const STRIP_COMMENTS: &str = "strip_comments";

#[derive(PartialEq, Clone, Debug)]
pub struct Directives {
    values: IndexMap<String, Value>,
}

impl Default for Directives {
    fn default() -> Self {
        let mut values = IndexMap::new();
        values.insert(AUTOESCAPE.to_string(), Value::Bool(true));
        values.insert(STRIP_COMMENTS.to_string(), Value::Bool(true));
        Self { values }
    }
}

impl Directives {
    /// No defaults at all, for building a seed map
    pub fn empty() -> Self {
        Self { values: IndexMap::new() }
    }

    /// Defaults with `seed` laid over them
    pub fn seeded(seed: &Directives) -> Self {
        let mut directives = Self::default();
        for (name, value) in &seed.values {
            directives.values.insert(name.clone(), value.clone());
        }
        directives
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Unset directives are false
    pub fn enabled(&self, name: &str) -> bool {
        self.values.get(name).map_or(false, Value::truthy)
    }

    pub fn set(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    /// Sets from a literal, casting it to the native type the directive
    /// already has (so `{% directive autoescape 0 %}` stores `false`)
    pub fn apply(&mut self, name: &str, literal: &Literal) {
        let value = match self.values.get(name) {
            Some(current) => literal.value().cast(current.native_type()),
            None => literal.value(),
        };
        debug!("directive {} = {}", name, value);
        self.values.insert(name.to_string(), value);
    }

    /// Parses a `name=value` pair the way the command line passes them. The
    /// value is lexed like a template literal, bare words become strings
    pub fn parse_pair(pair: &str) -> Option<(String, Value)> {
        let mut split = pair.splitn(2, '=');
        let name = split.next()?.trim();
        if name.is_empty() {
            return None;
        }
        let raw = split.next().unwrap_or("true").trim();
        let value = match crate::passes::lex(1, raw) {
            Ok(tokens) if tokens.len() == 1 => match &tokens[0].kind {
                crate::intermediates::TokenKind::Literal { value, native_type } => {
                    Literal::new(value.clone(), *native_type).value()
                }
                _ => Value::String(raw.to_string()),
            },
            _ => Value::String(raw.to_string()),
        };
        Some((name.to_string(), value))
    }
}
