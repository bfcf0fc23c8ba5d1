//! Tokenizer for plot expressions.
//!
//! Identifiers are checked against the whitelist here, so a disallowed name is
//! rejected before anything after it is even looked at.

use std::f64::consts::PI;
use std::iter::Peekable;
use std::str::CharIndices;

use super::PlotFault;
use super::expr::Function;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Token {
    Number(f64),
    Variable,
    Function(Function),
    Plus,
    Minus,
    Star,
    Slash,
    /// `**` or `^`
    Power,
    LParen,
    RParen,
}

/// A token and the character offset it starts at.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub position: usize,
}

/// Split expression text into tokens.
pub fn tokenize(source: &str) -> Result<Vec<Spanned>, PlotFault> {
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();
    // Character position, advanced incrementally from the last byte offset seen
    let (mut position, mut counted_to) = (0, 0);

    while let Some(&(offset, ch)) = chars.peek() {
        position += source[counted_to..offset].chars().count();
        counted_to = offset;

        if ch.is_whitespace() {
            chars.next();
            continue;
        }

        let token = if ch.is_ascii_digit() || ch == '.' {
            lex_number(source, &mut chars, position)?
        } else if ch.is_alphabetic() || ch == '_' {
            lex_identifier(&mut chars)?
        } else {
            chars.next();
            match ch {
                '+' => Token::Plus,
                '-' => Token::Minus,
                '*' => {
                    if chars.next_if(|&(_, c)| c == '*').is_some() {
                        Token::Power
                    } else {
                        Token::Star
                    }
                }
                '/' => Token::Slash,
                '^' => Token::Power,
                '(' => Token::LParen,
                ')' => Token::RParen,
                other => {
                    return Err(PlotFault::Syntax {
                        position,
                        message: format!("unexpected character '{}'", other),
                    });
                }
            }
        };
        tokens.push(Spanned { token, position });
    }

    Ok(tokens)
}

fn lex_number(
    source: &str,
    chars: &mut Peekable<CharIndices<'_>>,
    position: usize,
) -> Result<Token, PlotFault> {
    let Some(&(start, _)) = chars.peek() else {
        return Err(PlotFault::Syntax {
            position,
            message: "expected a number".to_string(),
        });
    };
    let mut end = start;
    let mut seen_dot = false;

    while let Some(&(offset, c)) = chars.peek() {
        if c.is_ascii_digit() || (c == '.' && !seen_dot) {
            seen_dot |= c == '.';
            end = offset + c.len_utf8();
            chars.next();
        } else {
            break;
        }
    }

    // Exponent only when followed by digits, e.g. "2e-3"
    if let Some(&(offset, 'e' | 'E')) = chars.peek() {
        let rest = &source[offset + 1..];
        let sign_len = usize::from(rest.starts_with(['+', '-']));
        let digits = rest[sign_len..]
            .chars()
            .take_while(char::is_ascii_digit)
            .count();
        if digits > 0 {
            let exponent_len = 1 + sign_len + digits;
            end = offset + exponent_len;
            for _ in 0..exponent_len {
                chars.next();
            }
        }
    }

    let literal = &source[start..end];
    literal
        .parse::<f64>()
        .map(Token::Number)
        .map_err(|_| PlotFault::Syntax {
            position,
            message: format!("invalid number '{}'", literal),
        })
}

fn lex_identifier(chars: &mut Peekable<CharIndices<'_>>) -> Result<Token, PlotFault> {
    let mut name = String::new();
    while let Some((_, c)) = chars.next_if(|&(_, c)| c.is_alphanumeric() || c == '_') {
        name.push(c);
    }

    match name.as_str() {
        "x" => Ok(Token::Variable),
        "pi" | "π" => Ok(Token::Number(PI)),
        other => Function::from_name(other)
            .map(Token::Function)
            .ok_or_else(|| PlotFault::DisallowedIdentifier(other.to_string())),
    }
}
