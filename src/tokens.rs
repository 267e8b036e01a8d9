//! A flat JSON tokenizer for window-manager replies.
//!
//! The manager answers every query with a fixed, well-formed JSON shape — an
//! array of workspace objects for the workspace query, an array of result
//! objects for a command. Building a tree of owned nodes for that is wasted
//! work: the planner only ever reads a handful of top-level fields per object
//! and skips everything else.
//!
//! [`parse`] therefore produces a flat, insertion-ordered `Vec<Token>` in a
//! single left-to-right scan. Each token records its kind, its byte span in
//! the reply buffer, the index of its enclosing container, and its direct
//! child count. The sequence is the pre-order walk of the implicit tree;
//! index 0 is the root, and a token's parent always precedes it.
//!
//! # Object key/value convention
//!
//! Inside an object, a key is a [`Kind::String`] token with `children == 1`
//! and the object as its parent. Its value is the **next token in the
//! sequence** (`key index + 1`) and also carries the object — not the key —
//! as its parent. The planner reads a value by looking one index past a
//! matched key, so this adjacency is load-bearing.
//!
//! String token spans exclude the surrounding quotes. Escape sequences are
//! skipped, not decoded — workspace names with escapes would compare by their
//! raw bytes, which is all the rest of the pipeline needs.
//!
//! This is not a general JSON parser. Malformed input fails fast with a
//! [`ParseError`]; there is no recovery.

/// Token kinds. Every JSON value maps to one of these four.
///
/// Numbers, booleans, and `null` are all [`Kind::Primitive`]; callers that
/// care inspect the span text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Object,
    Array,
    String,
    Primitive,
}

/// One token in the flat sequence.
///
/// `start..end` is the byte span in the input buffer (for strings, without
/// the quotes). `parent` is the index of the enclosing container, `None` only
/// for the root. `children` counts direct children: keys for an object,
/// elements for an array, one for a key, zero for any other leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: Kind,
    pub start: usize,
    pub end: usize,
    pub parent: Option<usize>,
    pub children: usize,
}

impl Token {
    /// The token's raw text in `buf`.
    pub fn text<'a>(&self, buf: &'a [u8]) -> &'a [u8] {
        &buf[self.start..self.end]
    }
}

/// Errors from tokenizing a reply. All fatal; the reply is discarded.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("unexpected byte {byte:#04x} at offset {offset}")]
    Unexpected { byte: u8, offset: usize },
    #[error("expected object key at offset {0}")]
    ExpectedKey(usize),
    #[error("root value at offset {0} is not an object or array")]
    InvalidRoot(usize),
    #[error("unterminated string starting at offset {0}")]
    UnterminatedString(usize),
    #[error("unbalanced container at end of input")]
    Unbalanced,
    #[error("trailing content at offset {0}")]
    Trailing(usize),
    #[error("token limit {0} exceeded")]
    TokenOverflow(usize),
}

/// An open container on the parse stack.
struct Open {
    index: usize,
    is_object: bool,
    /// Inside an object: index of the key whose value we are expecting.
    pending_key: Option<usize>,
}

/// Tokenize `buf`, sizing the token array to the input length.
///
/// One byte per token is an upper bound for any JSON text (every token
/// occupies at least one distinct byte), so the vector allocated here is
/// never resized.
pub fn parse(buf: &[u8]) -> Result<Vec<Token>, ParseError> {
    parse_with_limit(buf, buf.len())
}

/// Tokenize `buf` with an explicit token limit.
///
/// The token vector is allocated once with capacity `max_tokens` and never
/// grows; producing more tokens than that fails with
/// [`ParseError::TokenOverflow`].
pub fn parse_with_limit(buf: &[u8], max_tokens: usize) -> Result<Vec<Token>, ParseError> {
    let mut tokens: Vec<Token> = Vec::with_capacity(max_tokens);
    let mut stack: Vec<Open> = Vec::new();
    let mut root_closed = false;
    let mut pos = 0;

    while pos < buf.len() {
        let byte = buf[pos];
        match byte {
            b' ' | b'\t' | b'\n' | b'\r' | b',' | b':' => {
                pos += 1;
            }
            b'{' | b'[' => {
                if root_closed {
                    return Err(ParseError::Trailing(pos));
                }
                let kind = if byte == b'{' { Kind::Object } else { Kind::Array };
                let index = push_token(&mut tokens, max_tokens, kind, pos, 0, &mut stack)?;
                stack.push(Open {
                    index,
                    is_object: byte == b'{',
                    pending_key: None,
                });
                pos += 1;
            }
            b'}' | b']' => {
                let open = stack.pop().ok_or(ParseError::Unexpected { byte, offset: pos })?;
                let matches = open.is_object == (byte == b'}');
                if !matches || open.pending_key.is_some() {
                    return Err(ParseError::Unexpected { byte, offset: pos });
                }
                tokens[open.index].end = pos + 1;
                if stack.is_empty() {
                    root_closed = true;
                }
                pos += 1;
            }
            b'"' => {
                if root_closed {
                    return Err(ParseError::Trailing(pos));
                }
                let start = pos + 1;
                let end = scan_string(buf, start).ok_or(ParseError::UnterminatedString(pos))?;
                push_token(&mut tokens, max_tokens, Kind::String, start, end, &mut stack)?;
                pos = end + 1;
            }
            _ => {
                if root_closed {
                    return Err(ParseError::Trailing(pos));
                }
                if !is_primitive_byte(byte) {
                    return Err(ParseError::Unexpected { byte, offset: pos });
                }
                let start = pos;
                while pos < buf.len() && is_primitive_byte(buf[pos]) {
                    pos += 1;
                }
                push_token(&mut tokens, max_tokens, Kind::Primitive, start, pos, &mut stack)?;
            }
        }
    }

    if !stack.is_empty() {
        return Err(ParseError::Unbalanced);
    }
    Ok(tokens)
}

/// Append a token, wiring it to the innermost open container.
///
/// For containers the caller passes a placeholder `end`; it is patched when
/// the closing bracket is reached.
fn push_token(
    tokens: &mut Vec<Token>,
    max_tokens: usize,
    kind: Kind,
    start: usize,
    end: usize,
    stack: &mut [Open],
) -> Result<usize, ParseError> {
    if tokens.len() >= max_tokens {
        return Err(ParseError::TokenOverflow(max_tokens));
    }
    let index = tokens.len();
    let parent = match stack.last_mut() {
        None => {
            // A bare scalar at top level never occurs in a manager reply.
            if kind != Kind::Object && kind != Kind::Array {
                return Err(ParseError::InvalidRoot(start));
            }
            None
        }
        Some(open) => {
            if open.is_object {
                match open.pending_key.take() {
                    None => {
                        // This is a key; it must be a string.
                        if kind != Kind::String {
                            return Err(ParseError::ExpectedKey(start));
                        }
                        tokens[open.index].children += 1;
                        open.pending_key = Some(index);
                    }
                    Some(key) => {
                        tokens[key].children = 1;
                    }
                }
            } else {
                tokens[open.index].children += 1;
            }
            Some(open.index)
        }
    };
    tokens.push(Token {
        kind,
        start,
        end,
        parent,
        children: 0,
    });
    Ok(index)
}

/// Find the closing quote of a string whose content starts at `start`.
/// Returns the index of the quote itself.
fn scan_string(buf: &[u8], start: usize) -> Option<usize> {
    let mut pos = start;
    while pos < buf.len() {
        match buf[pos] {
            b'"' => return Some(pos),
            b'\\' => pos += 2,
            _ => pos += 1,
        }
    }
    None
}

fn is_primitive_byte(byte: u8) -> bool {
    matches!(byte, b'0'..=b'9' | b'-' | b'+' | b'.' | b'e' | b'E')
        || byte.is_ascii_lowercase()
}

//  Tests
