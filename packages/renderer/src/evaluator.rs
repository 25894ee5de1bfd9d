//! # Expression Evaluation
//!
//! Embedded expressions inside a schema (`state.count+1`, `user.name`) are
//! evaluated against the surrounding application's data context on every
//! render. The engine only depends on the [`Evaluator`] capability, so a
//! host can swap in a full scripting runtime; [`ExpressionEvaluator`] is
//! the built-in interpreter covering literals, member paths into the
//! context, arithmetic, comparison, and boolean logic.

use crate::value::Value;
use logos::Logos;
use std::collections::BTreeMap;
use thiserror::Error;

pub type EvalResult<T> = Result<T, EvalError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("Syntax error at offset {offset}: {message}")]
    Syntax { message: String, offset: usize },

    #[error("Variable '{name}' not found")]
    VariableNotFound { name: String },

    #[error("Cannot access property '{property}' on a non-object value")]
    NotAnObject { property: String },

    #[error("Invalid operands for operator {operator}: {details}")]
    InvalidOperands { operator: String, details: String },

    #[error("Division by zero")]
    DivisionByZero,
}

/// The surrounding application's state, readable by embedded expressions
/// and callable by embedded callbacks. Owned by the host; the resolver and
/// render engine pass it through unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataContext {
    vars: BTreeMap<String, Value>,
}

impl DataContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a context from a JSON object; each member becomes a variable
    pub fn from_json(json: &serde_json::Value) -> Self {
        let mut ctx = Self::new();
        if let serde_json::Value::Object(map) = json {
            for (name, value) in map {
                ctx.vars.insert(name.clone(), Value::from_json(value));
            }
        }
        ctx
    }

    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.vars.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }
}

/// Pluggable evaluation capability: the one place a
/// scripting runtime may enter the engine.
pub trait Evaluator {
    fn evaluate(&self, code: &str, context: &DataContext) -> EvalResult<Value>;
}

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
enum Token<'src> {
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,

    #[regex(r"[a-zA-Z_$][a-zA-Z0-9_$]*", |lex| lex.slice())]
    Ident(&'src str),

    #[regex(r"[0-9]+(\.[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    Number(f64),

    #[regex(r#""([^"\\]|\\.)*""#, |lex| {
        let s = lex.slice();
        &s[1..s.len()-1]
    })]
    #[regex(r"'([^'\\]|\\.)*'", |lex| {
        let s = lex.slice();
        &s[1..s.len()-1]
    })]
    String(&'src str),

    #[token(".")]
    Dot,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<=")]
    Le,
    #[token("<")]
    Lt,
    #[token(">=")]
    Ge,
    #[token(">")]
    Gt,
    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,
    #[token("!")]
    Bang,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl BinaryOp {
    fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }
}

#[derive(Debug, Clone)]
enum Expr {
    Number(f64),
    String(String),
    Boolean(bool),
    Null,
    Variable(String),
    Member {
        object: Box<Expr>,
        property: String,
    },
    Unary {
        negate: bool,
        not: bool,
        operand: Box<Expr>,
    },
    Binary {
        operator: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

struct Parser<'src> {
    tokens: Vec<(Token<'src>, std::ops::Range<usize>)>,
    pos: usize,
}

impl<'src> Parser<'src> {
    fn new(code: &'src str) -> EvalResult<Self> {
        let mut tokens = Vec::new();
        let mut lexer = Token::lexer(code);
        while let Some(token) = lexer.next() {
            let span = lexer.span();
            let token = token.map_err(|_| EvalError::Syntax {
                message: format!("unexpected character '{}'", &code[span.clone()]),
                offset: span.start,
            })?;
            tokens.push((token, span));
        }
        Ok(Self { tokens, pos: 0 })
    }

    fn peek(&self) -> Option<&Token<'src>> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn offset(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map(|(_, span)| span.start)
            .unwrap_or_else(|| self.tokens.last().map(|(_, s)| s.end).unwrap_or(0))
    }

    fn advance(&mut self) -> Option<Token<'src>> {
        let token = self.tokens.get(self.pos).map(|(t, _)| t.clone());
        self.pos += 1;
        token
    }

    fn expect(&mut self, expected: Token<'src>, what: &str) -> EvalResult<()> {
        if self.peek() == Some(&expected) {
            self.pos += 1;
            Ok(())
        } else {
            Err(EvalError::Syntax {
                message: format!("expected {}", what),
                offset: self.offset(),
            })
        }
    }

    fn parse(mut self) -> EvalResult<Expr> {
        let expr = self.parse_or()?;
        if self.pos < self.tokens.len() {
            return Err(EvalError::Syntax {
                message: "unexpected trailing input".to_string(),
                offset: self.offset(),
            });
        }
        Ok(expr)
    }

    fn parse_or(&mut self) -> EvalResult<Expr> {
        let mut left = self.parse_and()?;
        while self.peek() == Some(&Token::OrOr) {
            self.pos += 1;
            let right = self.parse_and()?;
            left = binary(BinaryOp::Or, left, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> EvalResult<Expr> {
        let mut left = self.parse_equality()?;
        while self.peek() == Some(&Token::AndAnd) {
            self.pos += 1;
            let right = self.parse_equality()?;
            left = binary(BinaryOp::And, left, right);
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> EvalResult<Expr> {
        let mut left = self.parse_comparison()?;
        loop {
            let op = match self.peek() {
                Some(Token::EqEq) => BinaryOp::Eq,
                Some(Token::NotEq) => BinaryOp::NotEq,
                _ => break,
            };
            self.pos += 1;
            let right = self.parse_comparison()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_comparison(&mut self) -> EvalResult<Expr> {
        let mut left = self.parse_additive()?;
        loop {
            let op = match self.peek() {
                Some(Token::Lt) => BinaryOp::Lt,
                Some(Token::Le) => BinaryOp::Le,
                Some(Token::Gt) => BinaryOp::Gt,
                Some(Token::Ge) => BinaryOp::Ge,
                _ => break,
            };
            self.pos += 1;
            let right = self.parse_additive()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> EvalResult<Expr> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => break,
            };
            self.pos += 1;
            let right = self.parse_multiplicative()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> EvalResult<Expr> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                _ => break,
            };
            self.pos += 1;
            let right = self.parse_unary()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> EvalResult<Expr> {
        match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                let operand = self.parse_unary()?;
                Ok(Expr::Unary {
                    negate: true,
                    not: false,
                    operand: Box::new(operand),
                })
            }
            Some(Token::Bang) => {
                self.pos += 1;
                let operand = self.parse_unary()?;
                Ok(Expr::Unary {
                    negate: false,
                    not: true,
                    operand: Box::new(operand),
                })
            }
            _ => self.parse_postfix(),
        }
    }

    fn parse_postfix(&mut self) -> EvalResult<Expr> {
        let mut expr = self.parse_primary()?;
        while self.peek() == Some(&Token::Dot) {
            self.pos += 1;
            match self.advance() {
                Some(Token::Ident(name)) => {
                    expr = Expr::Member {
                        object: Box::new(expr),
                        property: name.to_string(),
                    };
                }
                _ => {
                    return Err(EvalError::Syntax {
                        message: "expected property name after '.'".to_string(),
                        offset: self.offset(),
                    })
                }
            }
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> EvalResult<Expr> {
        let offset = self.offset();
        match self.advance() {
            Some(Token::Number(n)) => Ok(Expr::Number(n)),
            Some(Token::String(s)) => Ok(Expr::String(unescape(s))),
            Some(Token::True) => Ok(Expr::Boolean(true)),
            Some(Token::False) => Ok(Expr::Boolean(false)),
            Some(Token::Null) => Ok(Expr::Null),
            Some(Token::Ident(name)) => Ok(Expr::Variable(name.to_string())),
            Some(Token::LParen) => {
                let expr = self.parse_or()?;
                self.expect(Token::RParen, "')'")?;
                Ok(expr)
            }
            other => Err(EvalError::Syntax {
                message: format!("expected an expression, found {:?}", other),
                offset,
            }),
        }
    }
}

fn binary(operator: BinaryOp, left: Expr, right: Expr) -> Expr {
    Expr::Binary {
        operator,
        left: Box::new(left),
        right: Box::new(right),
    }
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some(other) => out.push(other),
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Built-in expression interpreter
#[derive(Debug, Clone, Default)]
pub struct ExpressionEvaluator;

impl ExpressionEvaluator {
    pub fn new() -> Self {
        Self
    }

    fn eval(&self, expr: &Expr, context: &DataContext) -> EvalResult<Value> {
        match expr {
            Expr::Number(n) => Ok(Value::Number(*n)),
            Expr::String(s) => Ok(Value::String(s.clone())),
            Expr::Boolean(b) => Ok(Value::Boolean(*b)),
            Expr::Null => Ok(Value::Null),

            Expr::Variable(name) => context.get(name).cloned().ok_or_else(|| {
                EvalError::VariableNotFound { name: name.clone() }
            }),

            Expr::Member { object, property } => {
                let object = self.eval(object, context)?;
                match object {
                    Value::Object(map) => map.get(property).cloned().ok_or_else(|| {
                        EvalError::VariableNotFound {
                            name: property.clone(),
                        }
                    }),
                    _ => Err(EvalError::NotAnObject {
                        property: property.clone(),
                    }),
                }
            }

            Expr::Unary {
                negate,
                not,
                operand,
            } => {
                let value = self.eval(operand, context)?;
                if *not {
                    return Ok(Value::Boolean(!value.is_truthy()));
                }
                if *negate {
                    return match value {
                        Value::Number(n) => Ok(Value::Number(-n)),
                        other => Err(EvalError::InvalidOperands {
                            operator: "-".to_string(),
                            details: format!("expected a number, got {:?}", other),
                        }),
                    };
                }
                Ok(value)
            }

            Expr::Binary {
                operator,
                left,
                right,
            } => {
                // Short-circuit before evaluating the right side
                if *operator == BinaryOp::And {
                    let left = self.eval(left, context)?;
                    if !left.is_truthy() {
                        return Ok(left);
                    }
                    return self.eval(right, context);
                }
                if *operator == BinaryOp::Or {
                    let left = self.eval(left, context)?;
                    if left.is_truthy() {
                        return Ok(left);
                    }
                    return self.eval(right, context);
                }

                let left = self.eval(left, context)?;
                let right = self.eval(right, context)?;
                self.eval_binary(*operator, left, right)
            }
        }
    }

    fn eval_binary(&self, operator: BinaryOp, left: Value, right: Value) -> EvalResult<Value> {
        match operator {
            BinaryOp::Add => match (&left, &right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
                (Value::String(a), Value::String(b)) => Ok(Value::String(format!("{}{}", a, b))),
                (Value::String(a), b) => Ok(Value::String(format!("{}{}", a, b.display_string()))),
                (a, Value::String(b)) => Ok(Value::String(format!("{}{}", a.display_string(), b))),
                _ => Err(self.invalid_operands(operator, &left, &right)),
            },
            BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div => match (&left, &right) {
                (Value::Number(a), Value::Number(b)) => match operator {
                    BinaryOp::Sub => Ok(Value::Number(a - b)),
                    BinaryOp::Mul => Ok(Value::Number(a * b)),
                    BinaryOp::Div => {
                        if *b == 0.0 {
                            Err(EvalError::DivisionByZero)
                        } else {
                            Ok(Value::Number(a / b))
                        }
                    }
                    _ => unreachable!(),
                },
                _ => Err(self.invalid_operands(operator, &left, &right)),
            },
            BinaryOp::Eq => Ok(Value::Boolean(left == right)),
            BinaryOp::NotEq => Ok(Value::Boolean(left != right)),
            BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => match (&left, &right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Boolean(match operator {
                    BinaryOp::Lt => a < b,
                    BinaryOp::Le => a <= b,
                    BinaryOp::Gt => a > b,
                    BinaryOp::Ge => a >= b,
                    _ => unreachable!(),
                })),
                (Value::String(a), Value::String(b)) => Ok(Value::Boolean(match operator {
                    BinaryOp::Lt => a < b,
                    BinaryOp::Le => a <= b,
                    BinaryOp::Gt => a > b,
                    BinaryOp::Ge => a >= b,
                    _ => unreachable!(),
                })),
                _ => Err(self.invalid_operands(operator, &left, &right)),
            },
            BinaryOp::And | BinaryOp::Or => unreachable!("handled by short-circuit"),
        }
    }

    fn invalid_operands(&self, operator: BinaryOp, left: &Value, right: &Value) -> EvalError {
        EvalError::InvalidOperands {
            operator: operator.symbol().to_string(),
            details: format!("{:?} {} {:?}", left, operator.symbol(), right),
        }
    }
}

impl Evaluator for ExpressionEvaluator {
    fn evaluate(&self, code: &str, context: &DataContext) -> EvalResult<Value> {
        let expr = Parser::new(code)?.parse()?;
        self.eval(&expr, context)
    }
}
