use crate::symbolic::compiler::CompileError;
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::tokenizer::{Lexeme, Token, tokenize};
/// a module turns a String expression into a symbolic expression
///# Example
/// ```
/// use RustedNumMethods::symbolic::symbolic_engine::Expr;
///let input = "x^2.3* log(x+1+x^2.6)";
/// let parsed_expression = Expr::parse_expression(input).unwrap();
///println!(" parsed_expression {}", parsed_expression);
/// let parsed_function = parsed_expression.lambdify1D();
/// println!("{}, Rust function: {}  \n",input,  parsed_function(1.0));
/// ```
//                  grammar, lowest precedence first
//                |_________________________________________________|
//                | expression = term { (+|-) term }                |
//                | term       = unary { (*|/) unary }              |
//                | unary      = (+|-) unary | power                |
//                | power      = primary [ ^ unary ]                |
//                | primary    = number | x | pi | e                |
//                |            | function ( expression )            |
//                |            | ( expression )                     |
//                |_________________________________________________|
//  ^ is right associative (2^3^2 = 2^9) and binds tighter than unary minus (-x^2 = -(x^2)),
//  the exponent itself may carry a sign (2^-1)

/// deepest allowed nesting of brackets, signs and exponents
pub const MAX_NESTING: usize = 256;
/// longest allowed token stream, bounds the size of the tree
pub const MAX_TOKENS: usize = 4096;

pub struct Parser {
    lexemes: Vec<Lexeme>,
    pos: usize,
    depth: usize,
}

impl Parser {
    pub fn new(lexemes: Vec<Lexeme>) -> Self {
        Parser {
            lexemes,
            pos: 0,
            depth: 0,
        }
    }

    fn peek(&self) -> Option<Token> {
        self.lexemes.get(self.pos).map(|l| l.token)
    }

    fn next(&mut self) -> Option<Lexeme> {
        let lexeme = self.lexemes.get(self.pos).copied();
        if lexeme.is_some() {
            self.pos += 1;
        }
        lexeme
    }

    fn eat(&mut self, token: Token) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// parses the whole token stream, nothing may be left over
    pub fn parse(mut self) -> Result<Expr, CompileError> {
        if self.lexemes.is_empty() {
            return Err(CompileError::EmptyFormula);
        }
        if self.lexemes.len() > MAX_TOKENS {
            return Err(CompileError::TooLong {
                tokens: self.lexemes.len(),
                limit: MAX_TOKENS,
            });
        }
        let expr = self.parse_expression()?;
        match self.lexemes.get(self.pos) {
            None => Ok(expr),
            Some(Lexeme {
                token: Token::RightParen,
                pos,
            }) => Err(CompileError::UnexpectedToken {
                token: ")".to_string(),
                pos: *pos,
            }),
            Some(lexeme) => Err(CompileError::TrailingInput { pos: lexeme.pos }),
        }
    }

    fn parse_expression(&mut self) -> Result<Expr, CompileError> {
        let mut left = self.parse_term()?;
        loop {
            if self.eat(Token::Plus) {
                left = left + self.parse_term()?;
            } else if self.eat(Token::Minus) {
                left = left - self.parse_term()?;
            } else {
                return Ok(left);
            }
        }
    }

    fn parse_term(&mut self) -> Result<Expr, CompileError> {
        let mut left = self.parse_unary()?;
        loop {
            if self.eat(Token::Star) {
                left = left * self.parse_unary()?;
            } else if self.eat(Token::Slash) {
                left = left / self.parse_unary()?;
            } else {
                return Ok(left);
            }
        }
    }

    /// every recursive path of the grammar passes through here
    fn parse_unary(&mut self) -> Result<Expr, CompileError> {
        if self.depth >= MAX_NESTING {
            return Err(CompileError::TooDeep {
                pos: self.lexemes.get(self.pos).map_or(0, |l| l.pos),
                limit: MAX_NESTING,
            });
        }
        self.depth += 1;
        let result = self.parse_signed();
        self.depth -= 1;
        result
    }

    fn parse_signed(&mut self) -> Result<Expr, CompileError> {
        if self.eat(Token::Plus) {
            return self.parse_unary();
        }
        if self.eat(Token::Minus) {
            // -(constant) folds into the constant
            return Ok(match self.parse_unary()? {
                Expr::Const(val) => Expr::Const(-val),
                inner => -inner,
            });
        }
        self.parse_power()
    }

    fn parse_power(&mut self) -> Result<Expr, CompileError> {
        let base = self.parse_primary()?;
        if self.eat(Token::Caret) {
            let exponent = self.parse_unary()?;
            return Ok(base.pow(exponent));
        }
        Ok(base)
    }

    fn parse_primary(&mut self) -> Result<Expr, CompileError> {
        let Some(lexeme) = self.next() else {
            return Err(CompileError::UnexpectedEnd);
        };
        match lexeme.token {
            Token::Number(val) => Ok(Expr::Const(val)),
            Token::Variable => Ok(Expr::Var),
            Token::Constant(c) => Ok(Expr::Const(c.value())),
            Token::Function(func) => {
                if !self.eat(Token::LeftParen) {
                    return Err(CompileError::UnexpectedToken {
                        token: func.to_string(),
                        pos: lexeme.pos,
                    });
                }
                let arg = self.parse_bracketed(lexeme.pos)?;
                Ok(Expr::func(func, arg))
            }
            Token::LeftParen => self.parse_bracketed(lexeme.pos),
            other => Err(CompileError::UnexpectedToken {
                token: other.to_string(),
                pos: lexeme.pos,
            }),
        }
    }

    /// content of a bracket whose `(` was already consumed at `open_pos`
    fn parse_bracketed(&mut self, open_pos: usize) -> Result<Expr, CompileError> {
        if self.peek() == Some(Token::RightParen) {
            return Err(CompileError::UnexpectedToken {
                token: ")".to_string(),
                pos: self.lexemes[self.pos].pos,
            });
        }
        let inner = self.parse_expression()?;
        if !self.eat(Token::RightParen) {
            return Err(CompileError::MissingClosingParen { pos: open_pos });
        }
        Ok(inner)
    }
}

impl Expr {
    /// parse a formula string into a symbolic expression
    pub fn parse_expression(input: &str) -> Result<Expr, CompileError> {
        let lexemes = tokenize(input)?;
        Parser::new(lexemes).parse()
    }
}
