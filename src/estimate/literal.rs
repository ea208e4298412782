//! Recursive-descent reader for literal expressions.
//!
//! Accepts quoted strings, numbers, `True`/`False`/`None` (and their JSON spellings),
//! lists, tuples, sets and mappings of literals. Anything else is a [`LiteralError`].

use crate::escape::unescape_strict;
use serde_json::{Map, Number, Value};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LiteralError {
    #[error("empty input")]
    Empty,
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("unexpected character {found:?} at offset {offset}")]
    Unexpected { found: char, offset: usize },
    #[error("trailing input at offset {offset}")]
    TrailingInput { offset: usize },
    #[error("invalid number literal '{0}'")]
    InvalidNumber(String),
    #[error("unterminated string starting at offset {offset}")]
    UnterminatedString { offset: usize },
    #[error("invalid escape in string starting at offset {offset}")]
    InvalidEscape { offset: usize },
    #[error("'{0}' is not a literal")]
    NotALiteral(String),
    #[error("mapping keys must be scalar literals")]
    UnhashableKey,
    #[error("brackets nested deeper than {} levels at offset {offset}", MAX_DEPTH)]
    TooDeep { offset: usize },
}

/// Deepest bracket nesting accepted.
pub const MAX_DEPTH: usize = 200;

/// Parse `input` as a single literal expression.
pub fn parse_literal(input: &str) -> Result<Value, LiteralError> {
    let trimmed = input.trim_start_matches([' ', '\t']);
    let mut parser = LiteralParser::new(trimmed);
    parser.skip_whitespace();
    if parser.at_end() {
        return Err(LiteralError::Empty);
    }
    let value = parser.parse_expr()?;
    parser.skip_whitespace();
    if !parser.at_end() {
        return Err(LiteralError::TrailingInput { offset: parser.pos });
    }
    Ok(value)
}

struct LiteralParser {
    chars: Vec<char>,
    pos: usize,
    /// Depth of open brackets; newlines only count as whitespace inside them.
    depth: usize,
}

impl LiteralParser {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
            depth: 0,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            let skip = match c {
                ' ' | '\t' | '\x0C' => true,
                '\r' | '\n' => true,
                '\\' if self.peek_at(1) == Some('\n') => {
                    self.pos += 1;
                    true
                }
                _ => false,
            };
            if !skip {
                break;
            }
            self.pos += 1;
        }
    }

    fn unexpected(&self) -> LiteralError {
        match self.peek() {
            Some(found) => LiteralError::Unexpected {
                found,
                offset: self.pos,
            },
            None => LiteralError::UnexpectedEnd,
        }
    }

    fn enter(&mut self) -> Result<(), LiteralError> {
        if self.depth >= MAX_DEPTH {
            return Err(LiteralError::TooDeep { offset: self.pos });
        }
        self.depth += 1;
        Ok(())
    }

    fn expect(&mut self, expected: char) -> Result<(), LiteralError> {
        self.skip_whitespace();
        if self.peek() == Some(expected) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn parse_expr(&mut self) -> Result<Value, LiteralError> {
        self.skip_whitespace();
        match self.peek() {
            None => Err(LiteralError::UnexpectedEnd),
            Some('[') => self.parse_list(),
            Some('(') => self.parse_paren(),
            Some('{') => self.parse_brace(),
            Some('\'' | '"') => self.parse_strings(),
            Some('+' | '-') => self.parse_signed(),
            Some(c) if c.is_ascii_digit() => self.parse_number(false),
            Some('.') if self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) => {
                self.parse_number(false)
            }
            Some(c) if c.is_alphabetic() || c == '_' => self.parse_word(),
            Some(_) => Err(self.unexpected()),
        }
    }

    /// Comma separated items up to `close`; returns the items and whether a comma was seen.
    fn parse_items(&mut self, close: char) -> Result<(Vec<Value>, bool), LiteralError> {
        let mut items = Vec::new();
        let mut saw_comma = false;
        self.enter()?;
        loop {
            self.skip_whitespace();
            if self.peek() == Some(close) {
                self.pos += 1;
                break;
            }
            items.push(self.parse_expr()?);
            self.skip_whitespace();
            match self.peek() {
                Some(',') => {
                    saw_comma = true;
                    self.pos += 1;
                }
                Some(c) if c == close => {
                    self.pos += 1;
                    break;
                }
                _ => return Err(self.unexpected()),
            }
        }
        self.depth -= 1;
        Ok((items, saw_comma))
    }

    fn parse_list(&mut self) -> Result<Value, LiteralError> {
        self.pos += 1;
        let (items, _) = self.parse_items(']')?;
        Ok(Value::Array(items))
    }

    fn parse_paren(&mut self) -> Result<Value, LiteralError> {
        self.pos += 1;
        let (mut items, saw_comma) = self.parse_items(')')?;
        if items.len() == 1 && !saw_comma {
            // parenthesized expression, not a tuple
            return Ok(items.remove(0));
        }
        Ok(Value::Array(items))
    }

    fn parse_brace(&mut self) -> Result<Value, LiteralError> {
        self.pos += 1;
        self.enter()?;
        self.skip_whitespace();
        if self.peek() == Some('}') {
            self.pos += 1;
            self.depth -= 1;
            return Ok(Value::Object(Map::new()));
        }

        let first = self.parse_expr()?;
        self.skip_whitespace();
        let value = if self.peek() == Some(':') {
            self.parse_mapping_rest(first)?
        } else {
            self.parse_set_rest(first)?
        };
        self.depth -= 1;
        Ok(value)
    }

    fn parse_mapping_rest(&mut self, first_key: Value) -> Result<Value, LiteralError> {
        let mut map = Map::new();
        let mut key = first_key;
        loop {
            self.expect(':')?;
            let value = self.parse_expr()?;
            map.insert(key_text(&key)?, value);

            self.skip_whitespace();
            match self.peek() {
                Some(',') => {
                    self.pos += 1;
                    self.skip_whitespace();
                    if self.peek() == Some('}') {
                        self.pos += 1;
                        return Ok(Value::Object(map));
                    }
                    key = self.parse_expr()?;
                }
                Some('}') => {
                    self.pos += 1;
                    return Ok(Value::Object(map));
                }
                _ => return Err(self.unexpected()),
            }
        }
    }

    fn parse_set_rest(&mut self, first: Value) -> Result<Value, LiteralError> {
        key_text(&first)?;
        let mut items = vec![first];
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(',') => {
                    self.pos += 1;
                    self.skip_whitespace();
                    if self.peek() == Some('}') {
                        self.pos += 1;
                        break;
                    }
                    let item = self.parse_expr()?;
                    key_text(&item)?;
                    if !items.contains(&item) {
                        items.push(item);
                    }
                }
                Some('}') => {
                    self.pos += 1;
                    break;
                }
                _ => return Err(self.unexpected()),
            }
        }
        Ok(Value::Array(items))
    }

    fn parse_word(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                self.pos += 1;
            } else {
                break;
            }
        }
        let word: String = self.chars[start..self.pos].iter().collect();

        // string prefixes directly followed by a quote
        if matches!(self.peek(), Some('\'' | '"')) {
            return match word.to_lowercase().as_str() {
                "r" | "u" => {
                    self.pos = start;
                    self.parse_strings()
                }
                _ => Err(LiteralError::NotALiteral(word)),
            };
        }

        match word.as_str() {
            "True" | "true" => Ok(Value::Bool(true)),
            "False" | "false" => Ok(Value::Bool(false)),
            "None" | "null" => Ok(Value::Null),
            _ => Err(LiteralError::NotALiteral(word)),
        }
    }

    /// One or more adjacent string literals, concatenated.
    fn parse_strings(&mut self) -> Result<Value, LiteralError> {
        let mut out = self.parse_string()?;
        loop {
            let save = self.pos;
            self.skip_inline_whitespace();
            let prefixed = matches!(self.peek(), Some('r' | 'R' | 'u' | 'U'))
                && matches!(self.peek_at(1), Some('\'' | '"'));
            if matches!(self.peek(), Some('\'' | '"')) || prefixed {
                out.push_str(&self.parse_string()?);
            } else {
                self.pos = save;
                break;
            }
        }
        Ok(Value::String(out))
    }

    fn skip_inline_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            let newline = c == '\n' || c == '\r';
            if c == ' ' || c == '\t' || (newline && self.depth > 0) {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn parse_string(&mut self) -> Result<String, LiteralError> {
        let start = self.pos;
        let mut raw = false;
        if let Some(p) = self.peek()
            && p.is_alphabetic()
        {
            raw = p.eq_ignore_ascii_case(&'r');
            self.pos += 1;
        }

        let quote = self.peek().ok_or(LiteralError::UnexpectedEnd)?;
        let triple = self.peek_at(1) == Some(quote) && self.peek_at(2) == Some(quote);
        self.pos += if triple { 3 } else { 1 };

        let body_start = self.pos;
        loop {
            let c = self
                .peek()
                .ok_or(LiteralError::UnterminatedString { offset: start })?;
            if c == '\\' {
                // escaped char never terminates, even in raw strings
                self.pos += 2;
                continue;
            }
            if !triple && (c == '\n' || c == '\r') {
                return Err(LiteralError::UnterminatedString { offset: start });
            }
            if c == quote {
                if !triple {
                    break;
                }
                if self.peek_at(1) == Some(quote) && self.peek_at(2) == Some(quote) {
                    break;
                }
            }
            self.pos += 1;
        }

        let body: String = self.chars[body_start..self.pos].iter().collect();
        self.pos += if triple { 3 } else { 1 };

        if raw {
            Ok(body)
        } else {
            unescape_strict(&body).map_err(|_| LiteralError::InvalidEscape { offset: start })
        }
    }

    fn parse_signed(&mut self) -> Result<Value, LiteralError> {
        let mut negative = false;
        while let Some(c) = self.peek() {
            match c {
                '-' => negative = !negative,
                '+' => {}
                _ => break,
            }
            self.pos += 1;
            self.skip_whitespace();
        }
        match self.peek() {
            Some(c) if c.is_ascii_digit() || c == '.' => self.parse_number(negative),
            _ => Err(self.unexpected()),
        }
    }

    fn parse_number(&mut self, negative: bool) -> Result<Value, LiteralError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            let exponent_sign = (c == '+' || c == '-')
                && self.pos > start
                && matches!(self.chars[self.pos - 1], 'e' | 'E')
                && !self.is_radix_literal(start);
            if c.is_ascii_alphanumeric() || c == '_' || c == '.' || exponent_sign {
                self.pos += 1;
            } else {
                break;
            }
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        number_value(&text, negative).ok_or(LiteralError::InvalidNumber(text))
    }

    fn is_radix_literal(&self, start: usize) -> bool {
        self.chars[start] == '0'
            && matches!(
                self.chars.get(start + 1),
                Some('x' | 'X' | 'o' | 'O' | 'b' | 'B')
            )
    }
}

/// Convert a scalar used as a mapping key to its textual form.
fn key_text(key: &Value) -> Result<String, LiteralError> {
    match key {
        Value::String(s) => Ok(s.clone()),
        Value::Bool(true) => Ok("True".to_string()),
        Value::Bool(false) => Ok("False".to_string()),
        Value::Null => Ok("None".to_string()),
        Value::Number(n) => Ok(match n.as_f64() {
            Some(f) if n.is_f64() => format!("{:?}", f),
            _ => n.to_string(),
        }),
        Value::Array(_) | Value::Object(_) => Err(LiteralError::UnhashableKey),
    }
}

/// Digits separated by single underscores, no leading or trailing underscore.
fn valid_digits(digits: &str, radix: u32) -> bool {
    !digits.is_empty()
        && !digits.starts_with('_')
        && !digits.ends_with('_')
        && !digits.contains("__")
        && digits.chars().all(|c| c == '_' || c.is_digit(radix))
}

fn number_value(text: &str, negative: bool) -> Option<Value> {
    let lower = text.to_lowercase();

    for (prefix, radix) in [("0x", 16), ("0o", 8), ("0b", 2)] {
        if let Some(digits) = lower.strip_prefix(prefix) {
            let digits = digits.strip_prefix('_').unwrap_or(digits);
            if !valid_digits(digits, radix) {
                return None;
            }
            let magnitude = u64::from_str_radix(&digits.replace('_', ""), radix).ok()?;
            return integer_value(magnitude, negative);
        }
    }

    if lower.chars().all(|c| c.is_ascii_digit() || c == '_') {
        if !valid_digits(&lower, 10) {
            return None;
        }
        let digits = lower.replace('_', "");
        // leading zeros are only allowed for zero itself
        if digits.len() > 1 && digits.starts_with('0') && digits.chars().any(|c| c != '0') {
            return None;
        }
        let magnitude: u64 = digits.parse().ok()?;
        return integer_value(magnitude, negative);
    }

    float_value(&lower, negative)
}

fn integer_value(magnitude: u64, negative: bool) -> Option<Value> {
    if !negative {
        return Some(Value::Number(Number::from(magnitude)));
    }
    if magnitude <= i64::MAX as u64 + 1 {
        let signed = (magnitude as i128).checked_neg()? as i64;
        return Some(Value::Number(Number::from(signed)));
    }
    None
}

fn float_value(text: &str, negative: bool) -> Option<Value> {
    let (mantissa, exponent) = match text.split_once('e') {
        Some((m, e)) => (m, Some(e)),
        None => (text, None),
    };

    let (int_part, frac_part) = match mantissa.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (mantissa, None),
    };
    if int_part.is_empty() && frac_part.is_none_or(str::is_empty) {
        return None;
    }
    if !int_part.is_empty() && !valid_digits(int_part, 10) {
        return None;
    }
    if let Some(frac) = frac_part
        && !frac.is_empty()
        && !valid_digits(frac, 10)
    {
        return None;
    }
    if frac_part.is_none() && exponent.is_none() {
        return None;
    }
    if let Some(exp) = exponent {
        let digits = exp.strip_prefix(['+', '-']).unwrap_or(exp);
        if !valid_digits(digits, 10) {
            return None;
        }
    }

    let parsed: f64 = text.replace('_', "").parse().ok()?;
    let value = if negative { -parsed } else { parsed };
    if !value.is_finite() {
        return None;
    }
    Number::from_f64(value).map(Value::Number)
}
