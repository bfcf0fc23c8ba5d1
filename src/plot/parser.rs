//! Recursive-descent parser for plot expressions.
//!
//! Grammar, lowest precedence first:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('-' | '+') unary | power
//! power   := primary ('**' unary)?
//! primary := NUMBER | 'x' | FUNCTION '(' expr ')' | '(' expr ')'
//! ```
//!
//! Exponentiation is right-associative and binds tighter than a unary minus on
//! its left, so `-x**2` is `-(x**2)` and `2**-1` is `0.5`.

use super::PlotFault;
use super::expr::{BinaryOperator, Expr};
use super::lexer::{Spanned, Token, tokenize};

/// Deepest expression tree accepted. Bounds parser recursion, evaluation and drop.
const MAX_DEPTH: usize = 256;

/// A subtree and its height.
type Parsed = (Expr, usize);

pub struct Parser {
    tokens: Vec<Spanned>,
    cursor: usize,
    /// Character count of the source, reported for errors at end of input.
    end: usize,
    /// Current `unary` recursion depth.
    nesting: usize,
}

impl Parser {
    pub fn new(source: &str) -> Result<Self, PlotFault> {
        Ok(Self {
            tokens: tokenize(source)?,
            cursor: 0,
            end: source.chars().count(),
            nesting: 0,
        })
    }

    /// Parse the whole token stream into one expression.
    pub fn parse(mut self) -> Result<Expr, PlotFault> {
        if self.tokens.is_empty() {
            return Err(PlotFault::Empty);
        }
        let (expr, _) = self.expr()?;
        match self.tokens.get(self.cursor) {
            None => Ok(expr),
            Some(extra) => Err(PlotFault::Syntax {
                position: extra.position,
                message: "unexpected input after expression".to_string(),
            }),
        }
    }

    fn expr(&mut self) -> Result<Parsed, PlotFault> {
        let mut left = self.term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOperator::Add,
                Some(Token::Minus) => BinaryOperator::Subtract,
                _ => return Ok(left),
            };
            let position = self.position();
            self.cursor += 1;
            let right = self.term()?;
            left = binary(op, left, right, position)?;
        }
    }

    fn term(&mut self) -> Result<Parsed, PlotFault> {
        let mut left = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOperator::Multiply,
                Some(Token::Slash) => BinaryOperator::Divide,
                _ => return Ok(left),
            };
            let position = self.position();
            self.cursor += 1;
            let right = self.unary()?;
            left = binary(op, left, right, position)?;
        }
    }

    /// Every level of parentheses, call arguments, signs and exponents passes
    /// through here, so this is where recursion is bounded.
    fn unary(&mut self) -> Result<Parsed, PlotFault> {
        let position = self.position();
        if self.nesting >= MAX_DEPTH {
            return Err(too_deep(position));
        }
        self.nesting += 1;

        let parsed = match self.peek() {
            Some(Token::Minus) => {
                self.cursor += 1;
                self.unary().and_then(|(inner, depth)| {
                    checked_depth(Expr::Negate(Box::new(inner)), depth + 1, position)
                })
            }
            Some(Token::Plus) => {
                self.cursor += 1;
                self.unary()
            }
            _ => self.power(),
        };

        self.nesting -= 1;
        parsed
    }

    fn power(&mut self) -> Result<Parsed, PlotFault> {
        let base = self.primary()?;
        if self.peek() == Some(Token::Power) {
            let position = self.position();
            self.cursor += 1;
            let exponent = self.unary()?;
            return binary(BinaryOperator::Power, base, exponent, position);
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<Parsed, PlotFault> {
        let Some(spanned) = self.tokens.get(self.cursor).copied() else {
            return Err(self.error_at(self.end, "unexpected end of expression"));
        };
        self.cursor += 1;

        match spanned.token {
            Token::Number(value) => Ok((Expr::Number(value), 1)),
            Token::Variable => Ok((Expr::Variable, 1)),
            Token::Function(function) => {
                self.expect(Token::LParen, "expected '(' after function name")?;
                let (argument, depth) = self.expr()?;
                self.expect(Token::RParen, "expected ')' to close function call")?;
                let call = Expr::Call {
                    function,
                    argument: Box::new(argument),
                };
                checked_depth(call, depth + 1, spanned.position)
            }
            Token::LParen => {
                let inner = self.expr()?;
                self.expect(Token::RParen, "expected ')'")?;
                Ok(inner)
            }
            _ => Err(self.error_at(spanned.position, "expected a number, x, or '('")),
        }
    }

    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.cursor).map(|spanned| spanned.token)
    }

    /// Position of the next token, or the end of input.
    fn position(&self) -> usize {
        self.tokens
            .get(self.cursor)
            .map_or(self.end, |spanned| spanned.position)
    }

    fn expect(&mut self, token: Token, message: &str) -> Result<(), PlotFault> {
        match self.tokens.get(self.cursor) {
            Some(spanned) if spanned.token == token => {
                self.cursor += 1;
                Ok(())
            }
            Some(spanned) => Err(self.error_at(spanned.position, message)),
            None => Err(self.error_at(self.end, message)),
        }
    }

    fn error_at(&self, position: usize, message: &str) -> PlotFault {
        PlotFault::Syntax {
            position,
            message: message.to_string(),
        }
    }
}

fn binary(
    op: BinaryOperator,
    (left, left_depth): Parsed,
    (right, right_depth): Parsed,
    position: usize,
) -> Result<Parsed, PlotFault> {
    let node = Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    };
    checked_depth(node, left_depth.max(right_depth) + 1, position)
}

fn checked_depth(expr: Expr, depth: usize, position: usize) -> Result<Parsed, PlotFault> {
    if depth > MAX_DEPTH {
        return Err(too_deep(position));
    }
    Ok((expr, depth))
}

fn too_deep(position: usize) -> PlotFault {
    PlotFault::Syntax {
        position,
        message: "expression is nested too deeply".to_string(),
    }
}
