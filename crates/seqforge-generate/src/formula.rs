//! Letter-substitution formulas shared by calculation and evaluation slots.
//!
//! A formula such as `(9*A+8*B-C)%11==0` is evaluated against an input
//! string: `A` becomes the input's first digit, `B` the second, and so on.
//! Substitution is textual, so adjacent letters (`AB`) read as one
//! multi-digit literal. The substituted text is then compiled into a small
//! expression tree and evaluated; relational and logical operators yield
//! 1 or 0, and the final value is truncated toward zero.
//!
//! Supported operators, loosest first: `?:`, `||`, `&&`, `==` `!=`,
//! `<` `<=` `>` `>=`, `+` `-`, `*` `/` `%`, unary `-` `+` `!`.

use std::collections::BTreeMap;

use crate::errors::FormulaError;

/// Letter to digit bindings built from one input string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormulaContext {
    digits: BTreeMap<char, char>,
}

impl FormulaContext {
    pub fn from_values(values: &str) -> Self {
        let digits = values
            .chars()
            .filter(char::is_ascii_digit)
            .zip('A'..='Z')
            .map(|(digit, letter)| (letter, digit))
            .collect();
        Self { digits }
    }

    pub fn digit(&self, letter: char) -> Option<char> {
        self.digits.get(&letter).copied()
    }

    pub fn len(&self) -> usize {
        self.digits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    /// Replaces every uppercase ASCII letter with its bound digit.
    pub fn substitute(&self, formula: &str) -> Result<String, FormulaError> {
        formula
            .chars()
            .map(|ch| {
                if ch.is_ascii_uppercase() {
                    self.digit(ch).ok_or(FormulaError::UnboundLetter {
                        letter: ch,
                        available: self.len(),
                    })
                } else {
                    Ok(ch)
                }
            })
            .collect()
    }
}

/// A formula bound to its text, evaluated per input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormulaTool {
    formula: Option<String>,
}

impl FormulaTool {
    pub fn new(formula: Option<String>) -> Self {
        Self { formula }
    }

    /// Substitutes `values` into the formula and evaluates it to an integer.
    pub fn evaluate(&self, values: &str) -> Result<i64, FormulaError> {
        let formula = self
            .formula
            .as_deref()
            .map(str::trim)
            .filter(|formula| !formula.is_empty())
            .ok_or(FormulaError::Empty)?;
        let context = FormulaContext::from_values(values);
        let expression = context.substitute(formula)?;
        let value = compile(&expression)?.evaluate()?;
        Ok(value.trunc() as i64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Plus,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Or,
    And,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Unary(UnaryOp, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Conditional(Box<Expr>, Box<Expr>, Box<Expr>),
}

/// Compiled arithmetic/relational/logical expression.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledExpr {
    source: String,
    root: Expr,
}

impl CompiledExpr {
    pub fn evaluate(&self) -> Result<f64, FormulaError> {
        let value = eval(&self.root);
        if value.is_finite() {
            Ok(value)
        } else {
            Err(FormulaError::NonFinite(self.source.clone()))
        }
    }
}

/// Compiles digit-only expression text.
pub fn compile(text: &str) -> Result<CompiledExpr, FormulaError> {
    if text.trim().is_empty() {
        return Err(FormulaError::Empty);
    }
    let tokens = tokenize(text)?;
    let mut parser = Parser {
        tokens: &tokens,
        pos: 0,
        source: text,
    };
    let root = parser.conditional()?;
    if let Some(token) = parser.peek() {
        return Err(parser.unexpected(token));
    }
    Ok(CompiledExpr {
        source: text.to_string(),
        root,
    })
}

fn eval(expr: &Expr) -> f64 {
    match expr {
        Expr::Number(value) => *value,
        Expr::Unary(op, operand) => {
            let value = eval(operand);
            match op {
                UnaryOp::Neg => -value,
                UnaryOp::Plus => value,
                UnaryOp::Not => truth(value == 0.0),
            }
        }
        Expr::Binary(op, left, right) => {
            let left = eval(left);
            let right = || eval(right);
            match op {
                BinaryOp::Or => truth(left != 0.0 || right() != 0.0),
                BinaryOp::And => truth(left != 0.0 && right() != 0.0),
                BinaryOp::Eq => truth(left == right()),
                BinaryOp::Ne => truth(left != right()),
                BinaryOp::Lt => truth(left < right()),
                BinaryOp::Le => truth(left <= right()),
                BinaryOp::Gt => truth(left > right()),
                BinaryOp::Ge => truth(left >= right()),
                BinaryOp::Add => left + right(),
                BinaryOp::Sub => left - right(),
                BinaryOp::Mul => left * right(),
                BinaryOp::Div => left / right(),
                BinaryOp::Rem => left % right(),
            }
        }
        Expr::Conditional(condition, then, otherwise) => {
            if eval(condition) != 0.0 {
                eval(then)
            } else {
                eval(otherwise)
            }
        }
    }
}

fn truth(value: bool) -> f64 {
    if value { 1.0 } else { 0.0 }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Op(&'static str),
    LParen,
    RParen,
    Question,
    Colon,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Number(value) => format!("number {value}"),
            Token::Op(op) => format!("operator '{op}'"),
            Token::LParen => "'('".to_string(),
            Token::RParen => "')'".to_string(),
            Token::Question => "'?'".to_string(),
            Token::Colon => "':'".to_string(),
        }
    }
}

// longest match first
const OPERATORS: &[&str] = &[
    "===", "!==", "==", "!=", "<=", ">=", "&&", "||", "<", ">", "+", "-", "*", "/", "%", "!",
];

fn tokenize(text: &str) -> Result<Vec<Token>, FormulaError> {
    let mut tokens = Vec::new();
    let mut offset = 0;

    while offset < text.len() {
        let rest = &text[offset..];
        let Some(ch) = rest.chars().next() else {
            break;
        };

        if ch.is_whitespace() {
            offset += ch.len_utf8();
            continue;
        }

        if ch.is_ascii_digit() || ch == '.' {
            let len = rest
                .find(|c: char| !(c.is_ascii_digit() || c == '.'))
                .unwrap_or(rest.len());
            let literal = &rest[..len];
            let value = literal
                .parse::<f64>()
                .map_err(|_| FormulaError::InvalidNumber(literal.to_string()))?;
            tokens.push(Token::Number(value));
            offset += len;
            continue;
        }

        let single = match ch {
            '(' => Some(Token::LParen),
            ')' => Some(Token::RParen),
            '?' => Some(Token::Question),
            ':' => Some(Token::Colon),
            _ => None,
        };
        if let Some(token) = single {
            tokens.push(token);
            offset += 1;
            continue;
        }

        if let Some(op) = OPERATORS.iter().find(|op| rest.starts_with(**op)) {
            tokens.push(Token::Op(*op));
            offset += op.len();
            continue;
        }

        if let Some(keyword) = ["true", "false"].into_iter().find(|kw| rest.starts_with(kw)) {
            tokens.push(Token::Number(truth(keyword == "true")));
            offset += keyword.len();
            continue;
        }

        return Err(FormulaError::UnexpectedChar {
            found: ch,
            offset,
            expression: text.to_string(),
        });
    }

    Ok(tokens)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    source: &'a str,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat_op(&mut self, candidates: &[&str]) -> Option<&'static str> {
        match self.peek() {
            Some(Token::Op(op)) if candidates.contains(op) => {
                self.pos += 1;
                Some(*op)
            }
            _ => None,
        }
    }

    fn expect(&mut self, expected: &Token) -> Result<(), FormulaError> {
        match self.advance() {
            Some(token) if token == expected => Ok(()),
            Some(token) => Err(self.unexpected(token)),
            None => Err(self.end_of_input()),
        }
    }

    fn unexpected(&self, token: &Token) -> FormulaError {
        FormulaError::UnexpectedToken {
            found: token.describe(),
            expression: self.source.to_string(),
        }
    }

    fn end_of_input(&self) -> FormulaError {
        FormulaError::UnexpectedToken {
            found: "end of input".to_string(),
            expression: self.source.to_string(),
        }
    }

    fn conditional(&mut self) -> Result<Expr, FormulaError> {
        let condition = self.binary(0)?;
        if self.peek() != Some(&Token::Question) {
            return Ok(condition);
        }
        self.pos += 1;
        let then = self.conditional()?;
        self.expect(&Token::Colon)?;
        let otherwise = self.conditional()?;
        Ok(Expr::Conditional(
            Box::new(condition),
            Box::new(then),
            Box::new(otherwise),
        ))
    }

    /// Left-associative binary levels, loosest first.
    fn binary(&mut self, level: usize) -> Result<Expr, FormulaError> {
        const LEVELS: &[&[&str]] = &[
            &["||"],
            &["&&"],
            &["==", "!=", "===", "!=="],
            &["<", "<=", ">", ">="],
            &["+", "-"],
            &["*", "/", "%"],
        ];

        let Some(ops) = LEVELS.get(level) else {
            return self.unary();
        };

        let mut left = self.binary(level + 1)?;
        while let Some(op) = self.eat_op(ops) {
            let right = self.binary(level + 1)?;
            left = Expr::Binary(binary_op(op), Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn unary(&mut self) -> Result<Expr, FormulaError> {
        if let Some(op) = self.eat_op(&["-", "+", "!"]) {
            let operand = self.unary()?;
            let op = match op {
                "-" => UnaryOp::Neg,
                "+" => UnaryOp::Plus,
                _ => UnaryOp::Not,
            };
            return Ok(Expr::Unary(op, Box::new(operand)));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expr, FormulaError> {
        match self.advance() {
            Some(Token::Number(value)) => Ok(Expr::Number(*value)),
            Some(Token::LParen) => {
                let inner = self.conditional()?;
                self.expect(&Token::RParen)?;
                Ok(inner)
            }
            Some(token) => Err(self.unexpected(token)),
            None => Err(self.end_of_input()),
        }
    }
}

fn binary_op(op: &str) -> BinaryOp {
    match op {
        "||" => BinaryOp::Or,
        "&&" => BinaryOp::And,
        "==" | "===" => BinaryOp::Eq,
        "!=" | "!==" => BinaryOp::Ne,
        "<" => BinaryOp::Lt,
        "<=" => BinaryOp::Le,
        ">" => BinaryOp::Gt,
        ">=" => BinaryOp::Ge,
        "+" => BinaryOp::Add,
        "-" => BinaryOp::Sub,
        "*" => BinaryOp::Mul,
        "/" => BinaryOp::Div,
        _ => BinaryOp::Rem,
    }
}
