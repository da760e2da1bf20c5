//! Turns a string formula into an [`Expr`] tree.
//!
//! Grammar (recursive descent, one token of lookahead):
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := unary (('*' | '/') unary)*
//! unary  := '-' unary | power
//! power  := atom ('**' unary)?          right-associative, like Python
//! atom   := number | name | name '(' expr ')' | '(' expr ')'
//! ```
//! `name` is the free variable, a constant (pi, e) or one of the
//! allow-listed functions (sin, cos, tan, exp, log, sqrt, abs). Any other
//! identifier is rejected at parse time, so the allow-list is a grammar
//! guarantee rather than a runtime filter.
//!
//! `^` is singled out: the audience habitually writes `x^2` for powers, so
//! the tokenizer reports a dedicated [`ExprError::CaretMisuse`] instead of
//! a generic syntax error.

use std::f64::consts::{E, PI};

use thiserror::Error;

use crate::expression::function_handle::Expr;

/// Function names the grammar accepts in call position.
pub const ALLOWED_FUNCTIONS: [&str; 7] = ["sin", "cos", "tan", "exp", "log", "sqrt", "abs"];

/// Errors of the expression evaluator. Every message names the violated
/// condition and gives the user a way out.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExprError {
    #[error("syntax error at position {position}: {message}. Check the expression spelling")]
    Parse { position: usize, message: String },
    #[error(
        "'^' found at position {position}: the caret is not the power operator. Write x**2, not x^2"
    )]
    CaretMisuse { position: usize },
    #[error(
        "unknown name '{name}' at position {position}. Allowed: the variable, sin, cos, tan, exp, log, sqrt, abs, pi, e"
    )]
    UnknownIdentifier { name: String, position: usize },
    #[error("the expression cannot be evaluated: {cause}. Check the function domain")]
    Evaluation { input: f64, cause: String },
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    StarStar,
    Slash,
    LParen,
    RParen,
}

fn tokenize(input: &str) -> Result<Vec<(usize, Token)>, ExprError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            ' ' | '\t' | '\r' | '\n' => i += 1,
            '+' => {
                tokens.push((i, Token::Plus));
                i += 1;
            }
            '-' => {
                tokens.push((i, Token::Minus));
                i += 1;
            }
            '*' => {
                if chars.get(i + 1) == Some(&'*') {
                    tokens.push((i, Token::StarStar));
                    i += 2;
                } else {
                    tokens.push((i, Token::Star));
                    i += 1;
                }
            }
            '/' => {
                tokens.push((i, Token::Slash));
                i += 1;
            }
            '(' => {
                tokens.push((i, Token::LParen));
                i += 1;
            }
            ')' => {
                tokens.push((i, Token::RParen));
                i += 1;
            }
            '^' => return Err(ExprError::CaretMisuse { position: i }),
            '0'..='9' | '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                // scientific notation: 1e-5, 2.5E3
                if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
                    let mut j = i + 1;
                    if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
                        j += 1;
                    }
                    if j < chars.len() && chars[j].is_ascii_digit() {
                        i = j;
                        while i < chars.len() && chars[i].is_ascii_digit() {
                            i += 1;
                        }
                    }
                }
                let literal: String = chars[start..i].iter().collect();
                let value = literal.parse::<f64>().map_err(|_| ExprError::Parse {
                    position: start,
                    message: format!("'{}' is not a valid number", literal),
                })?;
                tokens.push((start, Token::Number(value)));
            }
            _ if c.is_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                let name: String = chars[start..i].iter().collect();
                tokens.push((start, Token::Ident(name)));
            }
            _ => {
                return Err(ExprError::Parse {
                    position: i,
                    message: format!("unexpected character '{}'", c),
                });
            }
        }
    }
    Ok(tokens)
}

struct Parser<'a> {
    tokens: Vec<(usize, Token)>,
    pos: usize,
    variable: &'a str,
    input_len: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(_, t)| t)
    }

    fn position(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map(|(p, _)| *p)
            .unwrap_or(self.input_len)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|(_, t)| t.clone());
        self.pos += 1;
        token
    }

    fn expect_rparen(&mut self, open_pos: usize) -> Result<(), ExprError> {
        match self.advance() {
            Some(Token::RParen) => Ok(()),
            _ => Err(ExprError::Parse {
                position: open_pos,
                message: "unmatched '('".to_string(),
            }),
        }
    }

    fn expr(&mut self) -> Result<Expr, ExprError> {
        let mut node = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.advance();
                    node = Expr::Add(node.boxed(), self.term()?.boxed());
                }
                Some(Token::Minus) => {
                    self.advance();
                    node = Expr::Sub(node.boxed(), self.term()?.boxed());
                }
                _ => return Ok(node),
            }
        }
    }

    fn term(&mut self) -> Result<Expr, ExprError> {
        let mut node = self.unary()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.advance();
                    node = Expr::Mul(node.boxed(), self.unary()?.boxed());
                }
                Some(Token::Slash) => {
                    self.advance();
                    node = Expr::Div(node.boxed(), self.unary()?.boxed());
                }
                _ => return Ok(node),
            }
        }
    }

    fn unary(&mut self) -> Result<Expr, ExprError> {
        if let Some(Token::Minus) = self.peek() {
            self.advance();
            // -x**2 parses as -(x**2), matching Python
            let inner = self.unary()?;
            return Ok(Expr::Mul(Expr::Const(-1.0).boxed(), inner.boxed()));
        }
        self.power()
    }

    fn power(&mut self) -> Result<Expr, ExprError> {
        let base = self.atom()?;
        if let Some(Token::StarStar) = self.peek() {
            self.advance();
            // exponent goes through unary so 2**-3 is accepted
            let exponent = self.unary()?;
            return Ok(Expr::Pow(base.boxed(), exponent.boxed()));
        }
        Ok(base)
    }

    fn atom(&mut self) -> Result<Expr, ExprError> {
        let position = self.position();
        match self.advance() {
            Some(Token::Number(value)) => Ok(Expr::Const(value)),
            Some(Token::LParen) => {
                let inner = self.expr()?;
                self.expect_rparen(position)?;
                Ok(inner)
            }
            Some(Token::Ident(name)) => self.name(name, position),
            Some(token) => Err(ExprError::Parse {
                position,
                message: format!("unexpected token {:?}", token),
            }),
            None => Err(ExprError::Parse {
                position,
                message: "expression ended unexpectedly".to_string(),
            }),
        }
    }

    fn name(&mut self, name: String, position: usize) -> Result<Expr, ExprError> {
        if name == self.variable {
            return Ok(Expr::Var(name));
        }
        match name.as_str() {
            "pi" => return Ok(Expr::Const(PI)),
            "e" => return Ok(Expr::Const(E)),
            _ => {}
        }
        if ALLOWED_FUNCTIONS.contains(&name.as_str()) {
            let open_pos = self.position();
            match self.advance() {
                Some(Token::LParen) => {}
                _ => {
                    return Err(ExprError::Parse {
                        position,
                        message: format!("'{}' must be called with parentheses: {}(...)", name, name),
                    });
                }
            }
            let argument = self.expr()?;
            self.expect_rparen(open_pos)?;
            let arg = argument.boxed();
            let node = match name.as_str() {
                "sin" => Expr::sin(arg),
                "cos" => Expr::cos(arg),
                "tan" => Expr::tg(arg),
                "exp" => Expr::Exp(arg),
                "log" => Expr::Ln(arg),
                "sqrt" => Expr::Sqrt(arg),
                "abs" => Expr::Abs(arg),
                _ => unreachable!(),
            };
            return Ok(node);
        }
        Err(ExprError::UnknownIdentifier { name, position })
    }
}

/// Parse `input` into an expression tree with `variable` as the one free
/// variable.
pub fn parse_expression(input: &str, variable: &str) -> Result<Expr, ExprError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(ExprError::Parse {
            position: 0,
            message: "empty expression".to_string(),
        });
    }
    let mut parser = Parser {
        tokens,
        pos: 0,
        variable,
        input_len: input.chars().count(),
    };
    let expr = parser.expr()?;
    if parser.peek().is_some() {
        return Err(ExprError::Parse {
            position: parser.position(),
            message: "unexpected trailing input".to_string(),
        });
    }
    Ok(expr)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Result<Expr, ExprError> {
        parse_expression(input, "x")
    }

    #[test]
    fn test_parse_constant() {
        let expr = parse("42").unwrap();
        assert_eq!(expr, Expr::Const(42.0));
    }

    #[test]
    fn test_parse_variable() {
        let expr = parse("x").unwrap();
        assert_eq!(expr, Expr::Var("x".to_string()));
    }

    #[test]
    fn test_parse_addition() {
        let expr = parse("x + 2").unwrap();
        assert_eq!(
            expr,
            Expr::Add(
                Box::new(Expr::Var("x".to_string())),
                Box::new(Expr::Const(2.0))
            )
        );
    }

    #[test]
    fn test_parse_power() {
        let expr = parse("x**2").unwrap();
        assert_eq!(
            expr,
            Expr::Pow(
                Box::new(Expr::Var("x".to_string())),
                Box::new(Expr::Const(2.0))
            )
        );
    }

    #[test]
    fn test_power_is_right_associative() {
        // 2**3**2 = 2**(3**2) = 512
        let expr = parse("2**3**2").unwrap();
        assert_eq!(expr.eval(0.0), 512.0);
    }

    #[test]
    fn test_precedence_mul_over_add() {
        let expr = parse("1 + 2 * 3").unwrap();
        assert_eq!(expr.eval(0.0), 7.0);
    }

    #[test]
    fn test_precedence_pow_over_mul() {
        let expr = parse("2 * x**2").unwrap();
        assert_eq!(expr.eval(3.0), 18.0);
    }

    #[test]
    fn test_unary_minus_binds_looser_than_pow() {
        // Python: -3**2 == -9
        let expr = parse("-3**2").unwrap();
        assert_eq!(expr.eval(0.0), -9.0);
    }

    #[test]
    fn test_parse_function_call() {
        let expr = parse("sin(x)").unwrap();
        assert_eq!(expr, Expr::sin(Box::new(Expr::Var("x".to_string()))));
    }

    #[test]
    fn test_parse_nested_calls() {
        let expr = parse("sqrt(abs(x - 4))").unwrap();
        assert_eq!(expr.eval(0.0), 2.0);
    }

    #[test]
    fn test_parse_constants_pi_e() {
        let expr = parse("cos(pi)").unwrap();
        assert_eq!(expr.eval(0.0), -1.0);
        let expr = parse("log(e)").unwrap();
        assert!((expr.eval(0.0) - 1.0).abs() < 1e-15);
    }

    #[test]
    fn test_scientific_notation() {
        let expr = parse("1e-5 + x").unwrap();
        assert_eq!(expr.eval(0.0), 1e-5);
    }

    #[test]
    fn test_caret_is_a_dedicated_error() {
        let result = parse("x^2");
        assert_eq!(result, Err(ExprError::CaretMisuse { position: 1 }));
    }

    #[test]
    fn test_unknown_identifier_rejected() {
        let result = parse("y + 1");
        assert!(matches!(
            result,
            Err(ExprError::UnknownIdentifier { ref name, .. }) if name == "y"
        ));
    }

    #[test]
    fn test_attribute_like_input_rejected() {
        // the grammar has no '.', so os.system style input dies in the tokenizer
        let result = parse("os(1)");
        assert!(matches!(result, Err(ExprError::UnknownIdentifier { .. })));
    }

    #[test]
    fn test_unmatched_brackets() {
        assert!(parse("(x + 1").is_err());
        assert!(parse("sin(x").is_err());
    }

    #[test]
    fn test_trailing_input_rejected() {
        assert!(parse("x 2").is_err());
    }

    #[test]
    fn test_empty_expression_rejected() {
        assert!(parse("").is_err());
        assert!(parse("   ").is_err());
    }

    #[test]
    fn test_custom_variable_name() {
        let expr = parse_expression("t + 1", "t").unwrap();
        assert_eq!(
            expr,
            Expr::Add(
                Box::new(Expr::Var("t".to_string())),
                Box::new(Expr::Const(1.0))
            )
        );
        // with variable t, x is just an unknown name
        assert!(matches!(
            parse_expression("x + 1", "t"),
            Err(ExprError::UnknownIdentifier { .. })
        ));
    }

    #[test]
    fn test_error_messages_carry_hints() {
        let msg = format!("{}", parse("x^2").unwrap_err());
        assert!(msg.contains("**"));
        let msg = format!("{}", parse("y").unwrap_err());
        assert!(msg.contains("Allowed"));
    }
}
