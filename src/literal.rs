//! Decoder for literal-style record text.
//!
//! Older library exports store each record as the text of a dict literal,
//! e.g. `{'artist': 'Nina Simone', 'track': 'Sinnerman', 'uri': 'spotify:track:abc'}`.
//! This module parses that grammar explicitly (dicts, lists, tuples, quoted
//! strings, numbers, `True`/`False`/`None`) and never evaluates anything.

use serde_json::{Map, Number, Value};
use thiserror::Error;

/// Deepest container nesting accepted, matching `serde_json`'s recursion limit.
pub const MAX_DEPTH: usize = 128;

/// A decoded literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Literal>),
    Dict(Vec<(Literal, Literal)>),
}

/// Why a piece of text is not a valid literal. Positions count characters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LiteralError {
    #[error("unexpected end of input")]
    UnexpectedEnd,

    #[error("unexpected character `{found}` at position {pos}")]
    UnexpectedChar { found: char, pos: usize },

    #[error("invalid number `{text}` at position {pos}")]
    InvalidNumber { text: String, pos: usize },

    #[error("unknown name `{name}` at position {pos}")]
    UnknownName { name: String, pos: usize },

    #[error("invalid escape sequence at position {pos}")]
    InvalidEscape { pos: usize },

    #[error("trailing input at position {pos}")]
    TrailingInput { pos: usize },

    #[error("containers nested deeper than {} at position {pos}", MAX_DEPTH)]
    TooDeep { pos: usize },
}

/// Parse a complete literal. Surrounding whitespace is allowed, anything
/// else after the value is an error.
pub fn parse_literal(text: &str) -> Result<Literal, LiteralError> {
    let mut parser = Parser::new(text);
    let value = parser.value()?;
    parser.skip_whitespace();
    match parser.peek() {
        None => Ok(value),
        Some(_) => Err(LiteralError::TrailingInput { pos: parser.pos }),
    }
}

impl Literal {
    /// Convert into a JSON value so literal and JSON records share one shape.
    ///
    /// Non-string dict keys are rendered to text; non-finite floats become null.
    pub fn into_json(self) -> Value {
        match self {
            Literal::None => Value::Null,
            Literal::Bool(b) => Value::Bool(b),
            Literal::Int(i) => Value::Number(i.into()),
            Literal::Float(f) => Number::from_f64(f).map_or(Value::Null, Value::Number),
            Literal::Str(s) => Value::String(s),
            Literal::List(items) => Value::Array(items.into_iter().map(Literal::into_json).collect()),
            Literal::Dict(pairs) => {
                let map: Map<String, Value> = pairs
                    .into_iter()
                    .map(|(k, v)| (k.key_text(), v.into_json()))
                    .collect();
                Value::Object(map)
            }
        }
    }

    fn key_text(self) -> String {
        match self {
            Literal::Str(s) => s,
            Literal::None => "None".to_string(),
            Literal::Bool(true) => "True".to_string(),
            Literal::Bool(false) => "False".to_string(),
            Literal::Int(i) => i.to_string(),
            Literal::Float(f) => f.to_string(),
            other => other.into_json().to_string(),
        }
    }
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
            depth: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Result<char, LiteralError> {
        let c = self.peek().ok_or(LiteralError::UnexpectedEnd)?;
        self.pos += 1;
        Ok(c)
    }

    fn expect(&mut self, wanted: char) -> Result<(), LiteralError> {
        let pos = self.pos;
        match self.bump()? {
            c if c == wanted => Ok(()),
            found => Err(LiteralError::UnexpectedChar { found, pos }),
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn value(&mut self) -> Result<Literal, LiteralError> {
        self.skip_whitespace();
        let pos = self.pos;
        match self.peek().ok_or(LiteralError::UnexpectedEnd)? {
            open @ ('{' | '[' | '(') => self.container(open, pos),
            '\'' | '"' => self.string().map(Literal::Str),
            c if c.is_ascii_digit() || c == '-' || c == '+' || c == '.' => self.number(),
            c if c.is_alphabetic() || c == '_' => self.name(),
            found => Err(LiteralError::UnexpectedChar { found, pos }),
        }
    }

    /// Parse a dict, list or tuple one level deeper.
    fn container(&mut self, open: char, pos: usize) -> Result<Literal, LiteralError> {
        if self.depth >= MAX_DEPTH {
            return Err(LiteralError::TooDeep { pos });
        }
        self.depth += 1;
        let result = match open {
            '{' => self.dict(),
            '[' => self.sequence('[', ']').map(|(items, _)| Literal::List(items)),
            _ => self.tuple(),
        };
        self.depth -= 1;
        result
    }

    fn dict(&mut self) -> Result<Literal, LiteralError> {
        self.expect('{')?;
        let mut pairs = Vec::new();
        loop {
            self.skip_whitespace();
            if self.peek() == Some('}') {
                self.pos += 1;
                return Ok(Literal::Dict(pairs));
            }
            let key = self.value()?;
            self.skip_whitespace();
            self.expect(':')?;
            let value = self.value()?;
            pairs.push((key, value));

            self.skip_whitespace();
            let pos = self.pos;
            match self.bump()? {
                ',' => continue,
                '}' => return Ok(Literal::Dict(pairs)),
                found => return Err(LiteralError::UnexpectedChar { found, pos }),
            }
        }
    }

    /// Comma-separated values between `open` and `close`. Also reports
    /// whether a separating comma was seen, which decides `(x)` vs `(x,)`.
    fn sequence(&mut self, open: char, close: char) -> Result<(Vec<Literal>, bool), LiteralError> {
        self.expect(open)?;
        let mut items = Vec::new();
        let mut saw_comma = false;
        loop {
            self.skip_whitespace();
            if self.peek() == Some(close) {
                self.pos += 1;
                return Ok((items, saw_comma));
            }
            items.push(self.value()?);

            self.skip_whitespace();
            let pos = self.pos;
            match self.bump()? {
                ',' => saw_comma = true,
                c if c == close => return Ok((items, saw_comma)),
                found => return Err(LiteralError::UnexpectedChar { found, pos }),
            }
        }
    }

    fn tuple(&mut self) -> Result<Literal, LiteralError> {
        let (mut items, saw_comma) = self.sequence('(', ')')?;
        // A parenthesised single value without a comma is just that value.
        if items.len() == 1 && !saw_comma {
            return Ok(items.remove(0));
        }
        Ok(Literal::List(items))
    }

    fn string(&mut self) -> Result<String, LiteralError> {
        let quote = self.bump()?;
        let mut out = String::new();
        loop {
            let c = self.bump()?;
            if c == quote {
                return Ok(out);
            }
            if c != '\\' {
                out.push(c);
                continue;
            }

            let escape_pos = self.pos - 1;
            match self.bump()? {
                'n' => out.push('\n'),
                't' => out.push('\t'),
                'r' => out.push('\r'),
                '0' => out.push('\0'),
                '\\' => out.push('\\'),
                '\'' => out.push('\''),
                '"' => out.push('"'),
                '\n' => {}
                'x' => out.push(self.hex_escape(2, escape_pos)?),
                'u' => out.push(self.hex_escape(4, escape_pos)?),
                'U' => out.push(self.hex_escape(8, escape_pos)?),
                // Unknown escapes keep their backslash.
                other => {
                    out.push('\\');
                    out.push(other);
                }
            }
        }
    }

    fn hex_escape(&mut self, digits: usize, escape_pos: usize) -> Result<char, LiteralError> {
        let mut code = 0u32;
        for _ in 0..digits {
            let digit = self
                .bump()?
                .to_digit(16)
                .ok_or(LiteralError::InvalidEscape { pos: escape_pos })?;
            code = code * 16 + digit;
        }
        char::from_u32(code).ok_or(LiteralError::InvalidEscape { pos: escape_pos })
    }

    fn number(&mut self) -> Result<Literal, LiteralError> {
        let start = self.pos;
        if matches!(self.peek(), Some('-' | '+')) {
            self.pos += 1;
        }
        let mut is_float = false;
        while let Some(c) = self.peek() {
            match c {
                '0'..='9' | '_' => {}
                '.' => is_float = true,
                'e' | 'E' => {
                    is_float = true;
                    if matches!(self.chars.get(self.pos + 1), Some('-' | '+')) {
                        self.pos += 1;
                    }
                }
                _ => break,
            }
            self.pos += 1;
        }

        let text: String = self.chars[start..self.pos].iter().collect();
        let cleaned = text.replace('_', "");
        let invalid = || LiteralError::InvalidNumber {
            text: text.clone(),
            pos: start,
        };
        if is_float {
            cleaned.parse::<f64>().map(Literal::Float).map_err(|_| invalid())
        } else {
            cleaned.parse::<i64>().map(Literal::Int).map_err(|_| invalid())
        }
    }

    fn name(&mut self) -> Result<Literal, LiteralError> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
            self.pos += 1;
        }
        let name: String = self.chars[start..self.pos].iter().collect();
        match name.as_str() {
            "None" => Ok(Literal::None),
            "True" => Ok(Literal::Bool(true)),
            "False" => Ok(Literal::Bool(false)),
            _ => Err(LiteralError::UnknownName { name, pos: start }),
        }
    }
}
