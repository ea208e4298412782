//! Backslash escape decoding shared by the envvar adapter and the literal reader.

/// A malformed escape sequence at a char offset.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid escape sequence at offset {offset}")]
pub struct EscapeError {
    pub offset: usize,
}

/// Decode escapes, failing on the first malformed sequence.
pub fn unescape_strict(input: &str) -> Result<String, EscapeError> {
    unescape(input, true)
}

/// Decode escapes, keeping malformed sequences verbatim.
pub fn unescape_lenient(input: &str) -> String {
    // lenient mode never errors
    unescape(input, false).unwrap_or_else(|_| input.to_string())
}

fn unescape(input: &str, strict: bool) -> Result<String, EscapeError> {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c != '\\' {
            out.push(c);
            i += 1;
            continue;
        }

        let Some(&next) = chars.get(i + 1) else {
            if strict {
                return Err(EscapeError { offset: i });
            }
            out.push('\\');
            break;
        };

        let simple = match next {
            '\\' => Some('\\'),
            '\'' => Some('\''),
            '"' => Some('"'),
            'a' => Some('\u{07}'),
            'b' => Some('\u{08}'),
            'f' => Some('\u{0C}'),
            'n' => Some('\n'),
            'r' => Some('\r'),
            't' => Some('\t'),
            'v' => Some('\u{0B}'),
            _ => None,
        };
        if let Some(decoded) = simple {
            out.push(decoded);
            i += 2;
            continue;
        }

        match next {
            // line continuation
            '\n' => {
                i += 2;
            }
            '0'..='7' => {
                let digits: String = chars[i + 1..]
                    .iter()
                    .take(3)
                    .take_while(|d| d.is_digit(8))
                    .collect();
                let code = u32::from_str_radix(&digits, 8).unwrap_or(0);
                match char::from_u32(code) {
                    Some(decoded) => out.push(decoded),
                    None if strict => return Err(EscapeError { offset: i }),
                    None => out.push_str(&format!("\\{}", digits)),
                }
                i += 1 + digits.len();
            }
            'x' | 'u' | 'U' => {
                let width = match next {
                    'x' => 2,
                    'u' => 4,
                    _ => 8,
                };
                let digits: String = chars[i + 2..].iter().take(width).collect();
                let decoded = if digits.chars().count() == width
                    && digits.chars().all(|d| d.is_ascii_hexdigit())
                {
                    u32::from_str_radix(&digits, 16)
                        .ok()
                        .and_then(char::from_u32)
                } else {
                    None
                };
                match decoded {
                    Some(decoded) => {
                        out.push(decoded);
                        i += 2 + width;
                    }
                    None if strict => return Err(EscapeError { offset: i }),
                    None => {
                        out.push('\\');
                        out.push(next);
                        i += 2;
                    }
                }
            }
            // \N{NAME} needs the unicode name table
            'N' if strict => return Err(EscapeError { offset: i }),
            other => {
                out.push('\\');
                out.push(other);
                i += 2;
            }
        }
    }

    Ok(out)
}
