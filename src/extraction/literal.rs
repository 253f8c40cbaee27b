//! Object-literal reader for the profile embedded in patient turns.
//!
//! The simulator writes the profile either as JSON or as a Python-style
//! mapping (`{'age': 34, 'smoker': False}`). JSON goes straight through
//! serde_json; anything else is read by a small recursive-descent parser
//! that accepts single/double quoted strings, `True`/`False`/`None`,
//! tuples (read as arrays) and trailing commas.

use serde_json::{Map, Number, Value};

use super::ExtractionError;

/// Nesting limit for mappings/lists inside a profile literal.
const MAX_DEPTH: usize = 64;

/// Parse a JSON or Python-style object literal into a JSON map.
pub fn parse_object_literal(text: &str) -> Result<Map<String, Value>, ExtractionError> {
    let trimmed = text.trim();
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(trimmed) {
        return Ok(map);
    }

    let mut cursor = Cursor::new(trimmed);
    let value = cursor.parse_value(0)?;
    cursor.skip_whitespace();
    if cursor.pos < cursor.src.len() {
        return Err(ExtractionError::TrailingInput(cursor.pos));
    }

    match value {
        Value::Object(map) => Ok(map),
        Value::Array(_) => Err(ExtractionError::NotAnObject("an array")),
        Value::String(_) => Err(ExtractionError::NotAnObject("a string")),
        Value::Number(_) => Err(ExtractionError::NotAnObject("a number")),
        Value::Bool(_) => Err(ExtractionError::NotAnObject("a boolean")),
        Value::Null => Err(ExtractionError::NotAnObject("null")),
    }
}

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn expect(&mut self, wanted: char) -> Result<(), ExtractionError> {
        self.skip_whitespace();
        match self.bump() {
            Some(c) if c == wanted => Ok(()),
            Some(found) => Err(ExtractionError::UnexpectedChar {
                found,
                offset: self.pos - found.len_utf8(),
            }),
            None => Err(ExtractionError::UnexpectedEnd),
        }
    }

    fn parse_value(&mut self, depth: usize) -> Result<Value, ExtractionError> {
        self.skip_whitespace();
        let offset = self.pos;
        let c = self.peek().ok_or(ExtractionError::UnexpectedEnd)?;
        if depth > MAX_DEPTH && matches!(c, '{' | '[' | '(') {
            return Err(ExtractionError::UnexpectedChar { found: c, offset });
        }
        match c {
            '{' => self.parse_mapping(depth + 1),
            '[' => self.parse_sequence(']', depth + 1),
            '(' => self.parse_sequence(')', depth + 1),
            '\'' | '"' => self.parse_string().map(Value::String),
            '-' | '+' | '.' | '0'..='9' => self.parse_number(),
            c if c.is_alphabetic() => self.parse_keyword(),
            found => Err(ExtractionError::UnexpectedChar { found, offset }),
        }
    }

    fn parse_mapping(&mut self, depth: usize) -> Result<Value, ExtractionError> {
        self.expect('{')?;
        let mut map = Map::new();
        loop {
            self.skip_whitespace();
            if self.peek() == Some('}') {
                self.bump();
                return Ok(Value::Object(map));
            }
            let key = match self.parse_value(depth)? {
                Value::String(s) => s,
                other => other.to_string(),
            };
            self.expect(':')?;
            let value = self.parse_value(depth)?;
            map.insert(key, value);

            self.skip_whitespace();
            match self.bump() {
                Some(',') => continue,
                Some('}') => return Ok(Value::Object(map)),
                Some(found) => {
                    return Err(ExtractionError::UnexpectedChar {
                        found,
                        offset: self.pos - found.len_utf8(),
                    })
                }
                None => return Err(ExtractionError::UnexpectedEnd),
            }
        }
    }

    fn parse_sequence(&mut self, close: char, depth: usize) -> Result<Value, ExtractionError> {
        self.bump();
        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            if self.peek() == Some(close) {
                self.bump();
                return Ok(Value::Array(items));
            }
            items.push(self.parse_value(depth)?);

            self.skip_whitespace();
            match self.bump() {
                Some(',') => continue,
                Some(c) if c == close => return Ok(Value::Array(items)),
                Some(found) => {
                    return Err(ExtractionError::UnexpectedChar {
                        found,
                        offset: self.pos - found.len_utf8(),
                    })
                }
                None => return Err(ExtractionError::UnexpectedEnd),
            }
        }
    }

    fn parse_string(&mut self) -> Result<String, ExtractionError> {
        let quote = self.bump().ok_or(ExtractionError::UnexpectedEnd)?;
        let mut out = String::new();
        loop {
            let c = self.bump().ok_or(ExtractionError::UnexpectedEnd)?;
            if c == quote {
                return Ok(out);
            }
            if c != '\\' {
                out.push(c);
                continue;
            }
            let escape_at = self.pos - 1;
            match self.bump().ok_or(ExtractionError::UnexpectedEnd)? {
                'n' => out.push('\n'),
                't' => out.push('\t'),
                'r' => out.push('\r'),
                '0' => out.push('\0'),
                'u' => out.push(self.parse_unicode_escape(escape_at)?),
                c @ ('\\' | '\'' | '"' | '/') => out.push(c),
                _ => return Err(ExtractionError::InvalidEscape(escape_at)),
            }
        }
    }

    fn parse_unicode_escape(&mut self, escape_at: usize) -> Result<char, ExtractionError> {
        let end = self.pos + 4;
        let hex = self
            .src
            .get(self.pos..end)
            .ok_or(ExtractionError::InvalidEscape(escape_at))?;
        let code =
            u32::from_str_radix(hex, 16).map_err(|_| ExtractionError::InvalidEscape(escape_at))?;
        self.pos = end;
        char::from_u32(code).ok_or(ExtractionError::InvalidEscape(escape_at))
    }

    fn parse_number(&mut self) -> Result<Value, ExtractionError> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E' | '_'))
        {
            self.bump();
        }
        let raw = &self.src[start..self.pos];
        let cleaned: String = raw.chars().filter(|c| *c != '_').collect();
        let cleaned = cleaned.strip_prefix('+').unwrap_or(&cleaned);

        if let Ok(int) = cleaned.parse::<i64>() {
            return Ok(Value::Number(int.into()));
        }
        cleaned
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| ExtractionError::InvalidNumber(raw.to_string()))
    }

    fn parse_keyword(&mut self) -> Result<Value, ExtractionError> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
            self.bump();
        }
        match &self.src[start..self.pos] {
            "True" | "true" => Ok(Value::Bool(true)),
            "False" | "false" => Ok(Value::Bool(false)),
            "None" | "null" => Ok(Value::Null),
            word => Err(ExtractionError::UnexpectedChar {
                found: word.chars().next().unwrap_or(' '),
                offset: start,
            }),
        }
    }
}
