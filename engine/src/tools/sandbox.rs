//! Sandboxed code execution
//!
//! Runs model-produced snippets without a real language runtime. The tool is
//! an interpreter for a tiny Python-flavored subset: assignment and
//! expression statements, numeric/string/bool/list literals, arithmetic, and
//! calls to a fixed allow-list of builtins. There is no file, network,
//! import, attribute or index access; anything outside the subset is an
//! execution error.
//!
//! Faults never escape: every lex, parse or evaluation error is caught and
//! returned as a formatted string, so the caller can embed it in a response.
//! On success the tool reports the top-level bindings whose names do not
//! start with an underscore, each stringified and truncated to 100 chars.

use std::fmt;
use thiserror::Error;

/// Characters kept when stringifying a captured binding
const MAX_VALUE_CHARS: usize = 100;

/// Upper bound on the number of elements `range` may produce
const MAX_RANGE_LEN: i64 = 10_000;

/// Sandboxed code execution tool
pub struct CodeSandbox;

impl CodeSandbox {
    pub fn new() -> Self {
        Self
    }

    /// Execute a snippet and describe the outcome.
    ///
    /// Always returns a message, never an error: faults are formatted into
    /// the returned string.
    pub fn execute(&self, code: &str) -> String {
        match run_program(code) {
            Ok(bindings) => {
                let visible: Vec<String> = bindings
                    .iter()
                    .filter(|(name, _)| !name.starts_with('_'))
                    .map(|(name, value)| format!("{name} = {}", truncate(&value.to_string())))
                    .collect();

                if visible.is_empty() {
                    "Code executed successfully (no variables bound)".to_string()
                } else {
                    format!(
                        "Code executed successfully. Variables: {{{}}}",
                        visible.join(", ")
                    )
                }
            }
            Err(e) => format!("Execution error: {e}"),
        }
    }
}

impl Default for CodeSandbox {
    fn default() -> Self {
        Self::new()
    }
}

fn truncate(s: &str) -> String {
    s.chars().take(MAX_VALUE_CHARS).collect()
}

#[derive(Debug, Error)]
enum SandboxError {
    #[error("syntax error: {0}")]
    Syntax(String),

    #[error("{0}")]
    Eval(String),
}

// ---------------------------------------------------------------------------
// Values

#[derive(Debug, Clone, PartialEq)]
enum Value {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    List(Vec<Value>),
    None,
}

impl Value {
    fn type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "str",
            Self::Bool(_) => "bool",
            Self::List(_) => "list",
            Self::None => "NoneType",
        }
    }

    /// Like Display, but strings keep their quotes (list-element rendering).
    fn fmt_nested(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => write!(f, "'{s}'"),
            other => fmt::Display::fmt(other, f),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => {
                if x.is_finite() && x.fract() == 0.0 {
                    write!(f, "{x:.1}")
                } else {
                    write!(f, "{x}")
                }
            }
            Self::Str(s) => write!(f, "{s}"),
            Self::Bool(true) => write!(f, "True"),
            Self::Bool(false) => write!(f, "False"),
            Self::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    item.fmt_nested(f)?;
                }
                write!(f, "]")
            }
            Self::None => write!(f, "None"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tokens

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Int(i64),
    Float(f64),
    Str(String),
    Plus,
    Minus,
    Star,
    Slash,
    DoubleSlash,
    Percent,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Assign,
    Newline,
}

fn tokenize(code: &str) -> Result<Vec<Token>, SandboxError> {
    let mut tokens = Vec::new();
    let mut chars = code.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' | '\r' => {
                chars.next();
            }
            '\n' => {
                chars.next();
                tokens.push(Token::Newline);
            }
            '#' => {
                while let Some(&c) = chars.peek() {
                    if c == '\n' {
                        break;
                    }
                    chars.next();
                }
            }
            '0'..='9' => tokens.push(lex_number(&mut chars)?),
            'a'..='z' | 'A'..='Z' | '_' => {
                let mut ident = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_ascii_alphanumeric() || c == '_' {
                        ident.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(ident));
            }
            '\'' | '"' => tokens.push(lex_string(&mut chars)?),
            '+' => {
                chars.next();
                tokens.push(Token::Plus);
            }
            '-' => {
                chars.next();
                tokens.push(Token::Minus);
            }
            '*' => {
                chars.next();
                if chars.peek() == Some(&'*') {
                    return Err(SandboxError::Syntax("unsupported operator '**'".to_string()));
                }
                tokens.push(Token::Star);
            }
            '/' => {
                chars.next();
                if chars.peek() == Some(&'/') {
                    chars.next();
                    tokens.push(Token::DoubleSlash);
                } else {
                    tokens.push(Token::Slash);
                }
            }
            '%' => {
                chars.next();
                tokens.push(Token::Percent);
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            '[' => {
                chars.next();
                tokens.push(Token::LBracket);
            }
            ']' => {
                chars.next();
                tokens.push(Token::RBracket);
            }
            ',' => {
                chars.next();
                tokens.push(Token::Comma);
            }
            '=' => {
                chars.next();
                if chars.peek() == Some(&'=') {
                    return Err(SandboxError::Syntax("unsupported operator '=='".to_string()));
                }
                tokens.push(Token::Assign);
            }
            other => {
                return Err(SandboxError::Syntax(format!(
                    "unexpected character '{other}'"
                )));
            }
        }
    }

    Ok(tokens)
}

fn lex_number(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Result<Token, SandboxError> {
    let mut literal = String::new();
    let mut is_float = false;

    while let Some(&c) = chars.peek() {
        if c.is_ascii_digit() {
            literal.push(c);
            chars.next();
        } else if c == '.' && !is_float {
            is_float = true;
            literal.push(c);
            chars.next();
        } else {
            break;
        }
    }

    if is_float {
        literal
            .parse::<f64>()
            .map(Token::Float)
            .map_err(|_| SandboxError::Syntax(format!("invalid float literal '{literal}'")))
    } else {
        literal
            .parse::<i64>()
            .map(Token::Int)
            .map_err(|_| SandboxError::Syntax(format!("integer literal too large '{literal}'")))
    }
}

fn lex_string(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Result<Token, SandboxError> {
    let quote = chars.next().unwrap_or('\'');
    let mut value = String::new();

    while let Some(c) = chars.next() {
        if c == quote {
            return Ok(Token::Str(value));
        }
        if c == '\\' {
            match chars.next() {
                Some('n') => value.push('\n'),
                Some('t') => value.push('\t'),
                Some('\\') => value.push('\\'),
                Some('\'') => value.push('\''),
                Some('"') => value.push('"'),
                Some(other) => {
                    value.push('\\');
                    value.push(other);
                }
                None => break,
            }
        } else {
            value.push(c);
        }
    }

    Err(SandboxError::Syntax("unterminated string literal".to_string()))
}

// ---------------------------------------------------------------------------
// Syntax tree

#[derive(Debug, Clone)]
enum Stmt {
    Assign(String, Expr),
    Expr(Expr),
}

#[derive(Debug, Clone)]
enum Expr {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    None,
    Name(String),
    List(Vec<Expr>),
    Neg(Box<Expr>),
    Binary(Box<Expr>, BinOp, Box<Expr>),
    Call(String, Vec<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
}

impl BinOp {
    fn symbol(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::FloorDiv => "//",
            Self::Mod => "%",
        }
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_ahead(&self) -> Option<&Token> {
        self.tokens.get(self.pos + 1)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn expect(&mut self, expected: &Token, what: &str) -> Result<(), SandboxError> {
        match self.advance() {
            Some(ref token) if token == expected => Ok(()),
            _ => Err(SandboxError::Syntax(format!("expected {what}"))),
        }
    }

    fn parse_program(&mut self) -> Result<Vec<Stmt>, SandboxError> {
        let mut statements = Vec::new();

        loop {
            while self.peek() == Some(&Token::Newline) {
                self.advance();
            }
            if self.peek().is_none() {
                break;
            }

            statements.push(self.parse_stmt()?);

            match self.peek() {
                Option::None | Some(Token::Newline) => {}
                Some(token) => {
                    return Err(SandboxError::Syntax(format!(
                        "unexpected token after statement: {token:?}"
                    )));
                }
            }
        }

        Ok(statements)
    }

    fn parse_stmt(&mut self) -> Result<Stmt, SandboxError> {
        let is_assignment = matches!(
            (self.peek(), self.peek_ahead()),
            (Some(Token::Ident(_)), Some(Token::Assign))
        );
        if is_assignment {
            let name = match self.advance() {
                Some(Token::Ident(name)) => name,
                _ => return Err(SandboxError::Syntax("expected identifier".to_string())),
            };
            if matches!(name.as_str(), "True" | "False" | "None") {
                return Err(SandboxError::Syntax(format!("cannot assign to '{name}'")));
            }
            self.advance();
            let expr = self.parse_expr()?;
            return Ok(Stmt::Assign(name, expr));
        }
        Ok(Stmt::Expr(self.parse_expr()?))
    }

    fn parse_expr(&mut self) -> Result<Expr, SandboxError> {
        let mut left = self.parse_term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinOp::Add,
                Some(Token::Minus) => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_term()?;
            left = Expr::Binary(Box::new(left), op, Box::new(right));
        }
        Ok(left)
    }

    fn parse_term(&mut self) -> Result<Expr, SandboxError> {
        let mut left = self.parse_factor()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinOp::Mul,
                Some(Token::Slash) => BinOp::Div,
                Some(Token::DoubleSlash) => BinOp::FloorDiv,
                Some(Token::Percent) => BinOp::Mod,
                _ => break,
            };
            self.advance();
            let right = self.parse_factor()?;
            left = Expr::Binary(Box::new(left), op, Box::new(right));
        }
        Ok(left)
    }

    fn parse_factor(&mut self) -> Result<Expr, SandboxError> {
        if self.peek() == Some(&Token::Minus) {
            self.advance();
            return Ok(Expr::Neg(Box::new(self.parse_factor()?)));
        }
        self.parse_atom()
    }

    fn parse_atom(&mut self) -> Result<Expr, SandboxError> {
        match self.advance() {
            Some(Token::Int(n)) => Ok(Expr::Int(n)),
            Some(Token::Float(x)) => Ok(Expr::Float(x)),
            Some(Token::Str(s)) => Ok(Expr::Str(s)),
            Some(Token::Ident(name)) => match name.as_str() {
                "True" => Ok(Expr::Bool(true)),
                "False" => Ok(Expr::Bool(false)),
                "None" => Ok(Expr::None),
                _ => {
                    if self.peek() == Some(&Token::LParen) {
                        self.advance();
                        let args = self.parse_args(Token::RParen, "')'")?;
                        Ok(Expr::Call(name, args))
                    } else {
                        Ok(Expr::Name(name))
                    }
                }
            },
            Some(Token::LParen) => {
                let expr = self.parse_expr()?;
                self.expect(&Token::RParen, "')'")?;
                Ok(expr)
            }
            Some(Token::LBracket) => {
                let items = self.parse_args(Token::RBracket, "']'")?;
                Ok(Expr::List(items))
            }
            Some(token) => Err(SandboxError::Syntax(format!("unexpected token {token:?}"))),
            Option::None => Err(SandboxError::Syntax("unexpected end of input".to_string())),
        }
    }

    /// Comma-separated expressions up to (and consuming) the closing token.
    fn parse_args(&mut self, closing: Token, what: &str) -> Result<Vec<Expr>, SandboxError> {
        let mut args = Vec::new();

        if self.peek() == Some(&closing) {
            self.advance();
            return Ok(args);
        }

        loop {
            args.push(self.parse_expr()?);
            match self.advance() {
                Some(Token::Comma) => continue,
                Some(ref token) if *token == closing => break,
                _ => return Err(SandboxError::Syntax(format!("expected {what}"))),
            }
        }

        Ok(args)
    }
}

// ---------------------------------------------------------------------------
// Evaluation

#[derive(Default)]
struct Env {
    bindings: Vec<(String, Value)>,
}

impl Env {
    fn get(&self, name: &str) -> Option<&Value> {
        self.bindings
            .iter()
            .find(|(bound, _)| bound == name)
            .map(|(_, value)| value)
    }

    fn set(&mut self, name: String, value: Value) {
        match self.bindings.iter().position(|(bound, _)| *bound == name) {
            Some(index) => self.bindings[index].1 = value,
            None => self.bindings.push((name, value)),
        }
    }
}

fn run_program(code: &str) -> Result<Vec<(String, Value)>, SandboxError> {
    let tokens = tokenize(code)?;
    let statements = Parser::new(tokens).parse_program()?;

    let mut env = Env::default();
    for statement in statements {
        match statement {
            Stmt::Assign(name, expr) => {
                let value = eval_expr(&expr, &env)?;
                env.set(name, value);
            }
            Stmt::Expr(expr) => {
                eval_expr(&expr, &env)?;
            }
        }
    }
    Ok(env.bindings)
}

fn eval_expr(expr: &Expr, env: &Env) -> Result<Value, SandboxError> {
    match expr {
        Expr::Int(n) => Ok(Value::Int(*n)),
        Expr::Float(x) => Ok(Value::Float(*x)),
        Expr::Str(s) => Ok(Value::Str(s.clone())),
        Expr::Bool(b) => Ok(Value::Bool(*b)),
        Expr::None => Ok(Value::None),
        Expr::Name(name) => env
            .get(name)
            .cloned()
            .ok_or_else(|| SandboxError::Eval(format!("name '{name}' is not defined"))),
        Expr::List(items) => {
            let values = items
                .iter()
                .map(|item| eval_expr(item, env))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::List(values))
        }
        Expr::Neg(inner) => match eval_expr(inner, env)? {
            Value::Int(n) => n
                .checked_neg()
                .map(Value::Int)
                .ok_or_else(|| SandboxError::Eval("integer overflow".to_string())),
            Value::Float(x) => Ok(Value::Float(-x)),
            other => Err(SandboxError::Eval(format!(
                "bad operand type for unary -: {}",
                other.type_name()
            ))),
        },
        Expr::Binary(left, op, right) => {
            let left = eval_expr(left, env)?;
            let right = eval_expr(right, env)?;
            eval_binary(*op, left, right)
        }
        Expr::Call(name, args) => {
            let values = args
                .iter()
                .map(|arg| eval_expr(arg, env))
                .collect::<Result<Vec<_>, _>>()?;
            call_builtin(name, values)
        }
    }
}

fn eval_binary(op: BinOp, left: Value, right: Value) -> Result<Value, SandboxError> {
    match (&left, &right) {
        (Value::Int(a), Value::Int(b)) => int_binary(op, *a, *b),
        (l, r) if is_numeric(l) && is_numeric(r) => float_binary(op, as_float(l), as_float(r)),
        (Value::Str(a), Value::Str(b)) if op == BinOp::Add => Ok(Value::Str(format!("{a}{b}"))),
        (Value::Str(s), Value::Int(n)) | (Value::Int(n), Value::Str(s)) if op == BinOp::Mul => {
            Ok(Value::Str(s.repeat((*n).max(0) as usize)))
        }
        (Value::List(a), Value::List(b)) if op == BinOp::Add => {
            let mut items = a.clone();
            items.extend(b.iter().cloned());
            Ok(Value::List(items))
        }
        (l, r) => Err(SandboxError::Eval(format!(
            "unsupported operand types for {}: {} and {}",
            op.symbol(),
            l.type_name(),
            r.type_name()
        ))),
    }
}

fn is_numeric(value: &Value) -> bool {
    matches!(value, Value::Int(_) | Value::Float(_))
}

fn as_float(value: &Value) -> f64 {
    match value {
        Value::Int(n) => *n as f64,
        Value::Float(x) => *x,
        _ => 0.0,
    }
}

fn int_binary(op: BinOp, a: i64, b: i64) -> Result<Value, SandboxError> {
    let overflow = || SandboxError::Eval("integer overflow".to_string());
    match op {
        BinOp::Add => a.checked_add(b).map(Value::Int).ok_or_else(overflow),
        BinOp::Sub => a.checked_sub(b).map(Value::Int).ok_or_else(overflow),
        BinOp::Mul => a.checked_mul(b).map(Value::Int).ok_or_else(overflow),
        BinOp::Div => {
            if b == 0 {
                Err(SandboxError::Eval("division by zero".to_string()))
            } else {
                Ok(Value::Float(a as f64 / b as f64))
            }
        }
        BinOp::FloorDiv => {
            if b == 0 {
                Err(SandboxError::Eval("division by zero".to_string()))
            } else {
                Ok(Value::Int(a.div_euclid(b)))
            }
        }
        BinOp::Mod => {
            if b == 0 {
                Err(SandboxError::Eval("division by zero".to_string()))
            } else {
                Ok(Value::Int(a.rem_euclid(b)))
            }
        }
    }
}

fn float_binary(op: BinOp, a: f64, b: f64) -> Result<Value, SandboxError> {
    match op {
        BinOp::Add => Ok(Value::Float(a + b)),
        BinOp::Sub => Ok(Value::Float(a - b)),
        BinOp::Mul => Ok(Value::Float(a * b)),
        BinOp::Div => {
            if b == 0.0 {
                Err(SandboxError::Eval("float division by zero".to_string()))
            } else {
                Ok(Value::Float(a / b))
            }
        }
        BinOp::FloorDiv => {
            if b == 0.0 {
                Err(SandboxError::Eval("float division by zero".to_string()))
            } else {
                Ok(Value::Float((a / b).floor()))
            }
        }
        BinOp::Mod => {
            if b == 0.0 {
                Err(SandboxError::Eval("float division by zero".to_string()))
            } else {
                Ok(Value::Float(a - b * (a / b).floor()))
            }
        }
    }
}

fn call_builtin(name: &str, args: Vec<Value>) -> Result<Value, SandboxError> {
    match name {
        // print evaluates its arguments but the sandbox reports bindings,
        // not output, so the call itself is inert.
        "print" => Ok(Value::None),
        "len" => {
            let arg = single_arg("len", args)?;
            match arg {
                Value::Str(s) => Ok(Value::Int(s.chars().count() as i64)),
                Value::List(items) => Ok(Value::Int(items.len() as i64)),
                other => Err(SandboxError::Eval(format!(
                    "object of type {} has no len()",
                    other.type_name()
                ))),
            }
        }
        "str" => {
            let arg = single_arg("str", args)?;
            Ok(Value::Str(arg.to_string()))
        }
        "int" => {
            let arg = single_arg("int", args)?;
            match arg {
                Value::Int(n) => Ok(Value::Int(n)),
                Value::Float(x) => Ok(Value::Int(x.trunc() as i64)),
                Value::Bool(b) => Ok(Value::Int(i64::from(b))),
                Value::Str(s) => s.trim().parse::<i64>().map(Value::Int).map_err(|_| {
                    SandboxError::Eval(format!("invalid literal for int(): '{s}'"))
                }),
                other => Err(SandboxError::Eval(format!(
                    "cannot convert {} to int",
                    other.type_name()
                ))),
            }
        }
        "float" => {
            let arg = single_arg("float", args)?;
            match arg {
                Value::Int(n) => Ok(Value::Float(n as f64)),
                Value::Float(x) => Ok(Value::Float(x)),
                Value::Bool(b) => Ok(Value::Float(if b { 1.0 } else { 0.0 })),
                Value::Str(s) => s.trim().parse::<f64>().map(Value::Float).map_err(|_| {
                    SandboxError::Eval(format!("invalid literal for float(): '{s}'"))
                }),
                other => Err(SandboxError::Eval(format!(
                    "cannot convert {} to float",
                    other.type_name()
                ))),
            }
        }
        "list" => {
            let arg = single_arg("list", args)?;
            match arg {
                Value::List(items) => Ok(Value::List(items)),
                Value::Str(s) => Ok(Value::List(
                    s.chars().map(|c| Value::Str(c.to_string())).collect(),
                )),
                other => Err(SandboxError::Eval(format!(
                    "{} object is not iterable",
                    other.type_name()
                ))),
            }
        }
        "range" => {
            let (start, stop) = match args.len() {
                1 => (0, expect_int("range", &args[0])?),
                2 => (expect_int("range", &args[0])?, expect_int("range", &args[1])?),
                n => {
                    return Err(SandboxError::Eval(format!(
                        "range() takes 1 or 2 arguments ({n} given)"
                    )));
                }
            };
            if stop.saturating_sub(start) > MAX_RANGE_LEN {
                return Err(SandboxError::Eval("range too large".to_string()));
            }
            Ok(Value::List((start..stop).map(Value::Int).collect()))
        }
        "sum" => {
            let arg = single_arg("sum", args)?;
            let Value::List(items) = arg else {
                return Err(SandboxError::Eval("sum() expects a list".to_string()));
            };
            let mut total = Value::Int(0);
            for item in items {
                total = eval_binary(BinOp::Add, total, item)?;
            }
            Ok(total)
        }
        "min" | "max" => {
            let items = match args.len() {
                0 => {
                    return Err(SandboxError::Eval(format!(
                        "{name}() expected at least 1 argument"
                    )));
                }
                1 => match args.into_iter().next() {
                    Some(Value::List(items)) => items,
                    Some(other) => vec![other],
                    Option::None => Vec::new(),
                },
                _ => args,
            };
            if items.is_empty() {
                return Err(SandboxError::Eval(format!("{name}() arg is an empty sequence")));
            }
            let mut best = as_checked_float(name, &items[0])?;
            let mut best_value = items[0].clone();
            for item in &items[1..] {
                let candidate = as_checked_float(name, item)?;
                let better = if name == "min" {
                    candidate < best
                } else {
                    candidate > best
                };
                if better {
                    best = candidate;
                    best_value = item.clone();
                }
            }
            Ok(best_value)
        }
        "abs" => {
            let arg = single_arg("abs", args)?;
            match arg {
                Value::Int(n) => n
                    .checked_abs()
                    .map(Value::Int)
                    .ok_or_else(|| SandboxError::Eval("integer overflow".to_string())),
                Value::Float(x) => Ok(Value::Float(x.abs())),
                other => Err(SandboxError::Eval(format!(
                    "bad operand type for abs(): {}",
                    other.type_name()
                ))),
            }
        }
        "round" => match args.len() {
            1 => match &args[0] {
                Value::Int(n) => Ok(Value::Int(*n)),
                Value::Float(x) => Ok(Value::Int(x.round() as i64)),
                other => Err(SandboxError::Eval(format!(
                    "bad operand type for round(): {}",
                    other.type_name()
                ))),
            },
            2 => {
                let x = as_checked_float("round", &args[0])?;
                let digits = expect_int("round", &args[1])?;
                let factor = 10_f64.powi(digits as i32);
                Ok(Value::Float((x * factor).round() / factor))
            }
            n => Err(SandboxError::Eval(format!(
                "round() takes 1 or 2 arguments ({n} given)"
            ))),
        },
        other => Err(SandboxError::Eval(format!(
            "function '{other}' is not allowed"
        ))),
    }
}

fn single_arg(name: &str, args: Vec<Value>) -> Result<Value, SandboxError> {
    let count = args.len();
    args.into_iter().next().filter(|_| count == 1).ok_or_else(|| {
        SandboxError::Eval(format!("{name}() takes exactly 1 argument ({count} given)"))
    })
}

fn expect_int(name: &str, value: &Value) -> Result<i64, SandboxError> {
    match value {
        Value::Int(n) => Ok(*n),
        other => Err(SandboxError::Eval(format!(
            "{name}() expects an integer, got {}",
            other.type_name()
        ))),
    }
}

fn as_checked_float(name: &str, value: &Value) -> Result<f64, SandboxError> {
    if is_numeric(value) {
        Ok(as_float(value))
    } else {
        Err(SandboxError::Eval(format!(
            "{name}() expects numeric arguments, got {}",
            value.type_name()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assignments_are_captured_in_order() {
        let sandbox = CodeSandbox::new();
        let result = sandbox.execute("x = 2 + 3\ny = x * 10");
        assert_eq!(
            result,
            "Code executed successfully. Variables: {x = 5, y = 50}"
        );
    }

    #[test]
    fn test_underscore_bindings_are_hidden() {
        let sandbox = CodeSandbox::new();
        let result = sandbox.execute("_tmp = 5\nvalue = _tmp + 1");
        assert_eq!(result, "Code executed successfully. Variables: {value = 6}");
    }

    #[test]
    fn test_no_bindings_message() {
        let sandbox = CodeSandbox::new();
        let result = sandbox.execute("print(1 + 1)");
        assert_eq!(result, "Code executed successfully (no variables bound)");
    }

    #[test]
    fn test_reassignment_keeps_one_slot() {
        let sandbox = CodeSandbox::new();
        let result = sandbox.execute("x = 1\nx = x + 1\nx = x + 1");
        assert_eq!(result, "Code executed successfully. Variables: {x = 3}");
    }

    #[test]
    fn test_builtin_calls() {
        let sandbox = CodeSandbox::new();
        let result = sandbox.execute(
            "a = len('hello')\nb = sum([1, 2, 3])\nc = min(4, 2, 9)\nd = max([1, 7])\ne = abs(-5)\nf = round(3.7)",
        );
        assert_eq!(
            result,
            "Code executed successfully. Variables: {a = 5, b = 6, c = 2, d = 7, e = 5, f = 4}"
        );
    }

    #[test]
    fn test_range_and_list_rendering() {
        let sandbox = CodeSandbox::new();
        let result = sandbox.execute("r = range(4)\nwords = ['a', 'b']");
        assert_eq!(
            result,
            "Code executed successfully. Variables: {r = [0, 1, 2, 3], words = ['a', 'b']}"
        );
    }

    #[test]
    fn test_string_operations() {
        let sandbox = CodeSandbox::new();
        let result = sandbox.execute("s = 'ab' + 'cd'\nt = s * 2");
        assert_eq!(
            result,
            "Code executed successfully. Variables: {s = abcd, t = abcdabcd}"
        );
    }

    #[test]
    fn test_float_division_renders_like_python() {
        let sandbox = CodeSandbox::new();
        let result = sandbox.execute("x = 8 / 2");
        assert_eq!(result, "Code executed successfully. Variables: {x = 4.0}");
    }

    #[test]
    fn test_floor_division_and_modulo() {
        let sandbox = CodeSandbox::new();
        let result = sandbox.execute("q = 7 // 2\nr = 7 % 2\nn = -7 // 2");
        assert_eq!(
            result,
            "Code executed successfully. Variables: {q = 3, r = 1, n = -4}"
        );
    }

    #[test]
    fn test_division_by_zero_is_reported() {
        let sandbox = CodeSandbox::new();
        let result = sandbox.execute("x = 1 / 0");
        assert_eq!(result, "Execution error: division by zero");
    }

    #[test]
    fn test_undefined_name_is_reported() {
        let sandbox = CodeSandbox::new();
        let result = sandbox.execute("y = x + 1");
        assert_eq!(result, "Execution error: name 'x' is not defined");
    }

    #[test]
    fn test_disallowed_function_is_reported() {
        let sandbox = CodeSandbox::new();
        let result = sandbox.execute("open('secrets.txt')");
        assert_eq!(result, "Execution error: function 'open' is not allowed");
    }

    #[test]
    fn test_function_definitions_are_outside_the_subset() {
        let sandbox = CodeSandbox::new();
        let result = sandbox.execute("def greet():\n    print('hi')");
        assert!(result.starts_with("Execution error: syntax error:"));
    }

    #[test]
    fn test_long_values_are_truncated() {
        let sandbox = CodeSandbox::new();
        let result = sandbox.execute("s = 'a' * 500");
        let expected_value = "a".repeat(100);
        assert_eq!(
            result,
            format!("Code executed successfully. Variables: {{s = {expected_value}}}")
        );
    }

    #[test]
    fn test_comments_and_blank_lines_are_ignored() {
        let sandbox = CodeSandbox::new();
        let result = sandbox.execute("# setup\n\nx = 1  # one\n");
        assert_eq!(result, "Code executed successfully. Variables: {x = 1}");
    }

    #[test]
    fn test_huge_range_is_rejected() {
        let sandbox = CodeSandbox::new();
        let result = sandbox.execute("r = range(1000000)");
        assert_eq!(result, "Execution error: range too large");
    }

    #[test]
    fn test_unary_minus_and_parentheses() {
        let sandbox = CodeSandbox::new();
        let result = sandbox.execute("x = -(2 + 3) * 2");
        assert_eq!(result, "Code executed successfully. Variables: {x = -10}");
    }
}
