//! Arithmetic evaluator for expression placeholders such as `{{2*(3+4)}}`.
//!
//! The grammar accepts numbers, `+ - * / ^`, parentheses and whitespace,
//! nothing else. There are no identifiers, so there is nothing to call.
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('-' | '+') unary | power
//! power   := primary ('^' unary)?
//! primary := number | '(' expr ')'
//! ```
//!
//! `^` is right-associative and binds tighter than unary minus, so `-2^2` is
//! `-4` and `2^3^2` is `512`.
//!
//! Parentheses and unary signs may nest at most [`MAX_DEPTH`] levels deep.

use crate::error::ExprError;

/// Deepest nesting of parentheses and unary signs the parser accepts.
pub const MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
}

impl Token {
    fn symbol(&self) -> String {
        match self {
            Token::Number(n) => n.to_string(),
            Token::Plus => "+".into(),
            Token::Minus => "-".into(),
            Token::Star => "*".into(),
            Token::Slash => "/".into(),
            Token::Caret => "^".into(),
            Token::LParen => "(".into(),
            Token::RParen => ")".into(),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<(Token, usize)>, ExprError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(pos, ch)) = chars.peek() {
        let token = match ch {
            c if c.is_whitespace() => {
                chars.next();
                continue;
            }
            '0'..='9' | '.' => {
                let mut end = pos;
                while let Some(&(i, c)) = chars.peek() {
                    if c.is_ascii_digit() || c == '.' {
                        end = i + c.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                let literal = &input[pos..end];
                let value = literal
                    .parse::<f64>()
                    .map_err(|_| ExprError::InvalidNumber {
                        literal: literal.to_string(),
                        pos,
                    })?;
                tokens.push((Token::Number(value), pos));
                continue;
            }
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '^' => Token::Caret,
            '(' => Token::LParen,
            ')' => Token::RParen,
            other => return Err(ExprError::UnexpectedChar { ch: other, pos }),
        };
        chars.next();
        tokens.push((token, pos));
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).map(|(token, _)| *token)
    }

    fn advance(&mut self) -> Option<(Token, usize)> {
        let token = self.tokens.get(self.pos).copied();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Runs `parse` one nesting level deeper.
    fn nested(
        &mut self,
        pos: usize,
        parse: impl FnOnce(&mut Self) -> Result<f64, ExprError>,
    ) -> Result<f64, ExprError> {
        if self.depth >= MAX_DEPTH {
            return Err(ExprError::TooDeep { pos });
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn expr(&mut self) -> Result<f64, ExprError> {
        let mut value = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.advance();
                    value += self.term()?;
                }
                Some(Token::Minus) => {
                    self.advance();
                    value -= self.term()?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn term(&mut self) -> Result<f64, ExprError> {
        let mut value = self.unary()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.advance();
                    value *= self.unary()?;
                }
                Some(Token::Slash) => {
                    self.advance();
                    let divisor = self.unary()?;
                    if divisor == 0.0 {
                        return Err(ExprError::DivisionByZero);
                    }
                    value /= divisor;
                }
                _ => return Ok(value),
            }
        }
    }

    fn unary(&mut self) -> Result<f64, ExprError> {
        match self.tokens.get(self.pos).copied() {
            Some((Token::Minus, pos)) => {
                self.advance();
                Ok(-self.nested(pos, Self::unary)?)
            }
            Some((Token::Plus, pos)) => {
                self.advance();
                self.nested(pos, Self::unary)
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<f64, ExprError> {
        let base = self.primary()?;
        if self.peek() == Some(Token::Caret) {
            self.advance();
            let exponent = self.unary()?;
            return Ok(base.powf(exponent));
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<f64, ExprError> {
        match self.advance() {
            Some((Token::Number(value), _)) => Ok(value),
            Some((Token::LParen, pos)) => {
                let value = self.nested(pos, Self::expr)?;
                match self.advance() {
                    Some((Token::RParen, _)) => Ok(value),
                    Some((token, pos)) => Err(ExprError::UnexpectedToken {
                        token: token.symbol(),
                        pos,
                    }),
                    None => Err(ExprError::UnexpectedEnd),
                }
            }
            Some((token, pos)) => Err(ExprError::UnexpectedToken {
                token: token.symbol(),
                pos,
            }),
            None => Err(ExprError::UnexpectedEnd),
        }
    }
}

/// Evaluates an arithmetic expression.
///
/// # Errors
///
/// Any character outside the grammar, a malformed expression, nesting deeper
/// than [`MAX_DEPTH`], a division by zero, or a result that is not finite.
pub fn evaluate(input: &str) -> Result<f64, ExprError> {
    let mut parser = Parser {
        tokens: tokenize(input)?,
        pos: 0,
        depth: 0,
    };
    let value = parser.expr()?;
    if let Some((token, pos)) = parser.advance() {
        return Err(ExprError::UnexpectedToken {
            token: token.symbol(),
            pos,
        });
    }
    if !value.is_finite() {
        return Err(ExprError::NotFinite);
    }
    Ok(value)
}

/// Formats a result: integral values without a fraction, others in the
/// shortest form that reads back as the same number.
pub fn format_number(value: f64) -> String {
    if value == value.trunc() && value.abs() < 1e15 {
        // Avoid printing "-0".
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Evaluates and formats in one step.
pub fn evaluate_to_string(input: &str) -> Result<String, ExprError> {
    evaluate(input).map(format_number)
}
