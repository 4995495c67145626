//! Formula tokenizer.
//!
//! The raw formula is normalized first (whitespace removed, lowercased), then scanned left to
//! right into [`Lexeme`]s. Normalization rules applied while scanning:
//! - `^` and `**` are the power operator
//! - `pi` is the constant π
//! - a standalone `e` (not followed by a letter, digit or underscore) is the constant e
//! - a function name immediately followed by `(` is a function token, so the letters of the
//!   name are never mistaken for the variable
//!
//! Implicit multiplication is inserted afterwards as a pass over the token stream, so the
//! rule set is a property of token adjacency and not of substring matching.
//! Positions in lexemes and errors are char offsets into the normalized formula.

use crate::symbolic::compiler::CompileError;
use crate::symbolic::symbolic_engine::{MathConstant, MathFunction, VARIABLE};
use itertools::Itertools;
use std::cmp::Reverse;
use std::fmt;
use strum::IntoEnumIterator;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Token {
    Number(f64),
    Variable,
    Constant(MathConstant),
    Function(MathFunction),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LeftParen,
    RightParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Token::Number(val) => write!(f, "{}", val),
            Token::Variable => write!(f, "{}", VARIABLE),
            Token::Constant(c) => write!(f, "{}", c),
            Token::Function(func) => write!(f, "{}", func),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::Caret => write!(f, "^"),
            Token::LeftParen => write!(f, "("),
            Token::RightParen => write!(f, ")"),
        }
    }
}

impl Token {
    /// token that can close an operand: 2, x, pi, )
    fn ends_operand(&self) -> bool {
        matches!(
            self,
            Token::Number(_) | Token::Variable | Token::Constant(_) | Token::RightParen
        )
    }

    /// token that can open an operand: 2, x, pi, sin, (
    fn starts_operand(&self) -> bool {
        matches!(
            self,
            Token::Number(_)
                | Token::Variable
                | Token::Constant(_)
                | Token::Function(_)
                | Token::LeftParen
        )
    }
}

/// token together with its char offset in the normalized formula
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lexeme {
    pub token: Token,
    pub pos: usize,
}

/// strips all whitespace and lowercases the formula
pub fn normalize(formula: &str) -> String {
    formula
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// function spellings, longest first, so that `log10` wins over `log` and `asin` over `sin`
fn function_table() -> Vec<(Vec<char>, MathFunction)> {
    MathFunction::iter()
        .flat_map(|func| {
            func.spellings()
                .into_iter()
                .map(move |name| (name.chars().collect::<Vec<char>>(), func))
        })
        .sorted_by_key(|(name, _)| Reverse(name.len()))
        .collect()
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn starts_with_at(chars: &[char], pos: usize, word: &[char]) -> bool {
    chars.len() >= pos + word.len() && chars[pos..pos + word.len()] == *word
}

/// Scans a normalized formula into lexemes, without implicit multiplication.
pub fn scan(normalized: &str) -> Result<Vec<Lexeme>, CompileError> {
    let chars: Vec<char> = normalized.chars().collect();
    let functions = function_table();
    let pi: Vec<char> = "pi".chars().collect();
    let mut lexemes = Vec::new();
    let mut pos = 0;

    while pos < chars.len() {
        let c = chars[pos];
        let start = pos;
        let token = match c {
            '0'..='9' | '.' => {
                let (value, end) = scan_number(&chars, pos)?;
                pos = end;
                Token::Number(value)
            }
            '+' => {
                pos += 1;
                Token::Plus
            }
            '-' => {
                pos += 1;
                Token::Minus
            }
            '*' if chars.get(pos + 1) == Some(&'*') => {
                pos += 2;
                Token::Caret
            }
            '*' => {
                pos += 1;
                Token::Star
            }
            '/' => {
                pos += 1;
                Token::Slash
            }
            '^' => {
                pos += 1;
                Token::Caret
            }
            '(' => {
                pos += 1;
                Token::LeftParen
            }
            ')' => {
                pos += 1;
                Token::RightParen
            }
            c if c.is_alphabetic() || c == '_' => {
                if let Some((name, func)) = functions.iter().find(|(name, _)| {
                    starts_with_at(&chars, pos, name) && chars.get(pos + name.len()) == Some(&'(')
                }) {
                    pos += name.len();
                    Token::Function(*func)
                } else if starts_with_at(&chars, pos, &pi) {
                    pos += pi.len();
                    Token::Constant(MathConstant::Pi)
                } else if c == 'e' && !chars.get(pos + 1).is_some_and(|&n| is_identifier_char(n)) {
                    pos += 1;
                    Token::Constant(MathConstant::E)
                } else if c == VARIABLE {
                    pos += 1;
                    Token::Variable
                } else {
                    let word: String = chars[pos..]
                        .iter()
                        .take_while(|&&n| is_identifier_char(n) || n.is_alphabetic())
                        .collect();
                    return Err(CompileError::UnknownIdentifier { name: word, pos });
                }
            }
            other => return Err(CompileError::UnexpectedChar { ch: other, pos }),
        };
        lexemes.push(Lexeme { token, pos: start });
    }
    Ok(lexemes)
}

/// digits [. digits] [e [+-] digits]; the exponent is only taken when a digit follows it
fn scan_number(chars: &[char], start: usize) -> Result<(f64, usize), CompileError> {
    let mut pos = start;
    let digits = |pos: &mut usize| {
        while *pos < chars.len() && chars[*pos].is_ascii_digit() {
            *pos += 1;
        }
    };
    digits(&mut pos);
    if pos < chars.len() && chars[pos] == '.' {
        pos += 1;
        digits(&mut pos);
    }
    if pos < chars.len() && chars[pos] == 'e' {
        let digit_at = |i: usize| chars.get(i).is_some_and(|c| c.is_ascii_digit());
        let sign = matches!(chars.get(pos + 1), Some('+') | Some('-'));
        if digit_at(pos + 1) || (sign && digit_at(pos + 2)) {
            pos += if sign { 2 } else { 1 };
            digits(&mut pos);
        }
    }
    let literal: String = chars[start..pos].iter().collect();
    literal
        .parse::<f64>()
        .map(|value| (value, pos))
        .map_err(|_| CompileError::InvalidNumber { literal, pos: start })
}

/// Inserts `*` between two adjacent tokens when multiplication is implied:
/// `2x`, `x2`, `)(`, `xsin(x)`, `pix`, `2(x+1)`, `(x-1)x`, `2sin(x)`, `x(x+1)`.
/// Two adjacent numbers are left alone, the parser reports them.
pub fn insert_implicit_multiplication(lexemes: Vec<Lexeme>) -> Vec<Lexeme> {
    let mut result = Vec::with_capacity(lexemes.len() * 3 / 2);
    let mut it = lexemes.into_iter().peekable();
    while let Some(current) = it.next() {
        let needs_mul = it.peek().is_some_and(|next| {
            current.token.ends_operand()
                && next.token.starts_operand()
                && !matches!((current.token, next.token), (Token::Number(_), Token::Number(_)))
        });
        let next_pos = it.peek().map(|next| next.pos);
        result.push(current);
        if let (true, Some(pos)) = (needs_mul, next_pos) {
            result.push(Lexeme {
                token: Token::Star,
                pos,
            });
        }
    }
    result
}

/// full tokenizer pipeline: normalize, scan, insert implicit multiplication
pub fn tokenize(formula: &str) -> Result<Vec<Lexeme>, CompileError> {
    let normalized = normalize(formula);
    let lexemes = scan(&normalized)?;
    Ok(insert_implicit_multiplication(lexemes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(formula: &str) -> Vec<Token> {
        tokenize(formula).unwrap().into_iter().map(|l| l.token).collect()
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(" X ^ 2 -\t4\n"), "x^2-4");
        assert_eq!(normalize("Sin(PI x)"), "sin(pix)");
    }

    #[test]
    fn test_power_operators() {
        assert_eq!(
            tokens("x^2"),
            vec![Token::Variable, Token::Caret, Token::Number(2.0)]
        );
        assert_eq!(tokens("x**2"), tokens("x^2"));
    }

    #[test]
    fn test_numbers() {
        assert_eq!(tokens("3.25"), vec![Token::Number(3.25)]);
        assert_eq!(tokens(".5"), vec![Token::Number(0.5)]);
        assert_eq!(tokens("1e-6"), vec![Token::Number(1e-6)]);
        assert_eq!(tokens("2.5E3"), vec![Token::Number(2500.0)]);
        assert!(matches!(
            tokenize("."),
            Err(CompileError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn test_exponent_needs_digits() {
        // 2e+x: the e is the constant, not an exponent
        assert_eq!(
            tokens("2e+x"),
            vec![
                Token::Number(2.0),
                Token::Star,
                Token::Constant(MathConstant::E),
                Token::Plus,
                Token::Variable
            ]
        );
    }

    #[test]
    fn test_constants() {
        assert_eq!(tokens("pi"), vec![Token::Constant(MathConstant::Pi)]);
        assert_eq!(tokens("e"), vec![Token::Constant(MathConstant::E)]);
        assert_eq!(
            tokens("e*x"),
            vec![
                Token::Constant(MathConstant::E),
                Token::Star,
                Token::Variable
            ]
        );
        // e glued to letters is not standalone
        assert!(matches!(
            tokenize("ex"),
            Err(CompileError::UnknownIdentifier { .. })
        ));
    }

    #[test]
    fn test_function_names() {
        assert_eq!(
            tokens("log10(x)")[0],
            Token::Function(MathFunction::Log10)
        );
        assert_eq!(tokens("log(x)")[0], Token::Function(MathFunction::Ln));
        assert_eq!(tokens("ln(x)")[0], Token::Function(MathFunction::Ln));
        assert_eq!(tokens("asin(x)")[0], Token::Function(MathFunction::Asin));
        assert_eq!(tokens("exp(x)")[0], Token::Function(MathFunction::Exp));
        // function name without parenthesis is not a function
        assert!(matches!(
            tokenize("sin x"),
            Err(CompileError::UnknownIdentifier { .. })
        ));
    }

    #[test]
    fn test_implicit_multiplication_rules() {
        // digit followed by variable
        assert_eq!(
            tokens("2x"),
            vec![Token::Number(2.0), Token::Star, Token::Variable]
        );
        // variable followed by digit
        assert_eq!(
            tokens("x2"),
            vec![Token::Variable, Token::Star, Token::Number(2.0)]
        );
        // closing followed by opening parenthesis
        assert_eq!(tokens("(x)(x)")[3], Token::Star);
        // variable followed by a function
        assert_eq!(
            tokens("xsin(x)")[..3],
            [
                Token::Variable,
                Token::Star,
                Token::Function(MathFunction::Sin)
            ]
        );
        // constant followed by variable
        assert_eq!(
            tokens("pix"),
            vec![
                Token::Constant(MathConstant::Pi),
                Token::Star,
                Token::Variable
            ]
        );
    }

    #[test]
    fn test_wider_implicit_multiplication() {
        assert_eq!(tokens("2(x)")[1], Token::Star);
        assert_eq!(tokens("2sin(x)")[1], Token::Star);
        assert_eq!(tokens("x(x)")[1], Token::Star);
        assert_eq!(tokens("(x)2")[3], Token::Star);
        assert_eq!(tokens("2pi")[1], Token::Star);
        // never after an operator or before a closing parenthesis
        assert_eq!(tokens("2*x").len(), 3);
        assert_eq!(tokens("(2)").len(), 3);
        // function token followed by its own parenthesis
        assert_eq!(tokens("sin(x)").len(), 4);
    }

    #[test]
    fn test_adjacent_numbers_left_alone() {
        assert_eq!(
            tokens("1.2.3"),
            vec![Token::Number(1.2), Token::Number(0.3)]
        );
    }

    #[test]
    fn test_errors_positions() {
        assert_eq!(
            tokenize("x+y"),
            Err(CompileError::UnknownIdentifier {
                name: "y".to_string(),
                pos: 2
            })
        );
        assert_eq!(
            tokenize("x # 2"),
            Err(CompileError::UnexpectedChar { ch: '#', pos: 1 })
        );
        assert_eq!(
            tokenize("2,5x"),
            Err(CompileError::UnexpectedChar { ch: ',', pos: 1 })
        );
    }

    #[test]
    fn test_implicit_star_position() {
        let lexemes = tokenize("2x").unwrap();
        assert_eq!(lexemes[1].pos, 1);
        assert_eq!(lexemes[2].pos, 1);
    }
}
