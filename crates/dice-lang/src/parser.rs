//! Recursive-descent parser for dice expressions.
//!
//! Operators are left associative unless stated otherwise. From lowest to
//! highest precedence:
//! 1. `=` (assignment, non-associative)
//! 2. `<`, `<=`, `==`, `!=`, `>=`, `>`, `in` (relational, non-associative)
//! 3. `+`, `-`
//! 4. `*`, `/`
//! 5. `-` (unary minus)
//! 6. `D` / `d` (dice roll)
//!
//! The parser drives the [`Interpreter`] directly: every reduced production
//! immediately evaluates. Syntax errors are recovered with panic mode
//! (skip to a synchronising token, insert missing ones) and reported to the
//! diagnostic log; an unparseable factor evaluates to the default integer 0
//! so the rest of the statement can still be checked. Evaluation errors
//! poison only the enclosing statement, whose result becomes `None`.

use dice_core::{Error, Result};

use crate::diagnostics::DiagnosticLog;
use crate::interpreter::Interpreter;
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};
use crate::value::Value;

/// Parser over one source string.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    log: &'a mut DiagnosticLog,
    interpreter: &'a mut Interpreter,
    lookahead: Token,
}

impl<'a> Parser<'a> {
    /// Create a parser for `input` reporting to `log` and evaluating
    /// through `interpreter`.
    pub fn new(
        input: &'a str,
        log: &'a mut DiagnosticLog,
        interpreter: &'a mut Interpreter,
    ) -> Self {
        Self {
            lexer: Lexer::new(input),
            log,
            interpreter,
            lookahead: Token::new(TokenKind::End),
        }
    }

    /// Parse and evaluate the whole input.
    ///
    /// Returns one entry per statement: the computed value, or `None` for
    /// assignments and for statements aborted by an evaluation error.
    pub fn parse(mut self) -> Vec<Option<Value>> {
        self.lookahead = self.lexer.read_token(self.log);
        let result = self.stmts();
        // make sure we've processed the whole input
        self.eat(TokenKind::End);
        result
    }

    fn stmts(&mut self) -> Vec<Option<Value>> {
        while self.lookahead.kind != TokenKind::End && !self.in_first_stmt() {
            let message = format!(
                "Invalid token at the beginning of an expression: {}",
                self.lookahead
            );
            self.error(message);
            self.advance();
        }

        let mut values = Vec::new();
        if self.lookahead.kind == TokenKind::End {
            return values;
        }

        values.push(self.stmt());
        while self.lookahead.kind == TokenKind::Semicolon {
            self.eat(TokenKind::Semicolon);
            if self.check_stmt() {
                values.push(self.stmt());
            } else {
                self.error("Invalid statement.");
            }
        }
        values
    }

    fn stmt(&mut self) -> Option<Value> {
        if self.lookahead.kind != TokenKind::Var {
            return self.expr();
        }

        self.eat(TokenKind::Var);
        let name = self.lookahead.lexeme.clone();
        self.eat(TokenKind::Id);
        self.eat(TokenKind::Assign);

        self.interpreter.enter_assign();
        match self.expr() {
            Some(value) => {
                if let Err(error) = self.interpreter.assign(&name, value) {
                    self.report(error);
                }
            }
            None => self.interpreter.leave_assign(),
        }
        None
    }

    fn expr(&mut self) -> Option<Value> {
        let left = self.add();
        if self.lookahead.kind == TokenKind::In {
            self.eat(TokenKind::In);
            self.eat(TokenKind::LeftBracket);

            if !self.check_add() {
                self.error("Invalid operand for the lower bound of operator in");
                return left;
            }
            let lower_bound = self.add();

            self.eat(TokenKind::ParamDelim);

            if !self.check_add() {
                self.error("Invalid operand for the upper bound of operator in");
                return left;
            }
            let upper_bound = self.add();

            self.eat(TokenKind::RightBracket);

            return self.apply3(left, lower_bound, upper_bound, Interpreter::rel_in);
        }
        if self.lookahead.kind == TokenKind::RelOp {
            let op = self.lookahead.clone();
            self.eat(TokenKind::RelOp);
            if self.check_add() {
                let right = self.add();
                return self.apply2(left, right, |interpreter, left, right| {
                    interpreter.rel_op(&op.lexeme, left, right)
                });
            }
            self.error(format!("Invalid operand for {op}"));
        }
        left
    }

    fn add(&mut self) -> Option<Value> {
        let mut result = self.mult();
        loop {
            let op = match self.lookahead.kind {
                TokenKind::Plus => TokenKind::Plus,
                TokenKind::Minus => TokenKind::Minus,
                _ => break,
            };
            self.eat(op);

            // compute the operator only if there won't be any parse error
            if self.check_mult() {
                let right = self.mult();
                result = if op == TokenKind::Plus {
                    self.apply2(result, right, Interpreter::add)
                } else {
                    self.apply2(result, right, Interpreter::sub)
                };
            } else {
                self.error(format!("Invalid operand for binary operator {op}"));
            }
        }
        result
    }

    fn mult(&mut self) -> Option<Value> {
        let mut result = self.dice_roll();
        loop {
            let op = match self.lookahead.kind {
                TokenKind::Times => TokenKind::Times,
                TokenKind::Divide => TokenKind::Divide,
                _ => break,
            };
            self.eat(op);

            if self.check_dice_roll() {
                let right = self.dice_roll();
                result = if op == TokenKind::Times {
                    self.apply2(result, right, Interpreter::mult)
                } else {
                    self.apply2(result, right, Interpreter::div)
                };
            } else {
                self.error(format!("Invalid operand for binary operator {op}"));
            }
        }
        result
    }

    fn dice_roll(&mut self) -> Option<Value> {
        // count the unary minus signs
        let mut minus_count = 0;
        while self.lookahead.kind == TokenKind::Minus {
            self.eat(TokenKind::Minus);
            minus_count += 1;
        }

        // parse the dice roll chain
        let mut result = self.factor();
        while self.lookahead.kind == TokenKind::RollOp {
            self.eat(TokenKind::RollOp);

            if self.check_factor() {
                let right = self.factor();
                result = self.apply2(result, right, Interpreter::roll);
            } else {
                self.error("Invalid operand for binary operator D (dice roll)");
            }
        }

        // apply the sign
        if minus_count % 2 != 0 {
            result = self.apply1(result, Interpreter::unary_minus);
        }
        result
    }

    fn factor(&mut self) -> Option<Value> {
        match self.lookahead.kind {
            TokenKind::LeftParen => {
                self.eat(TokenKind::LeftParen);
                let result = self.expr();
                self.eat(TokenKind::RightParen);
                result
            }
            TokenKind::Number => {
                let lexeme = self.lookahead.lexeme.clone();
                self.eat(TokenKind::Number);
                self.evaluate(|interpreter| interpreter.number(&lexeme))
            }
            TokenKind::Id => {
                let name = self.lookahead.lexeme.clone();
                self.eat(TokenKind::Id);
                if self.lookahead.kind == TokenKind::LeftParen {
                    // function call
                    self.eat(TokenKind::LeftParen);
                    let args = self.param_list();
                    self.eat(TokenKind::RightParen);
                    let args = args?;
                    self.evaluate(|interpreter| interpreter.call(&name, args))
                } else {
                    self.evaluate(|interpreter| interpreter.variable(&name))
                }
            }
            _ => {
                let message = format!(
                    "Expected {}, {} or {}, got {}.",
                    TokenKind::LeftParen,
                    TokenKind::Number,
                    TokenKind::Id,
                    self.lookahead
                );
                self.error(message);
                Some(self.interpreter.make_default())
            }
        }
    }

    /// Parse a function argument list. `None` if any argument failed to
    /// evaluate (the call is poisoned but parsing continues).
    fn param_list(&mut self) -> Option<Vec<Value>> {
        let mut args = Some(Vec::new());
        if self.lookahead.kind == TokenKind::RightParen {
            return args; // no arguments
        }

        let mut number = 0usize;
        loop {
            if self.check_expr() {
                let value = self.expr();
                match (args.as_mut(), value) {
                    (Some(list), Some(value)) => list.push(value),
                    _ => args = None,
                }
            } else {
                self.error(format!("Invalid function parameter {number}"));
            }

            if self.lookahead.kind != TokenKind::ParamDelim {
                break;
            }
            self.eat(TokenKind::ParamDelim);
            number += 1;
        }
        args
    }

    // ─── FIRST / FOLLOW checks ────────────────────────────────────────────

    fn in_first_stmt(&self) -> bool {
        self.lookahead.kind == TokenKind::Var || self.in_first_expr()
    }

    fn in_follow_stmt(&self) -> bool {
        matches!(self.lookahead.kind, TokenKind::Semicolon | TokenKind::End)
    }

    fn check_stmt(&mut self) -> bool {
        while !self.in_follow_stmt() && !self.in_first_stmt() {
            let message = format!(
                "Invalid token at the beginning of a statement: {}",
                self.lookahead
            );
            self.error(message);
            self.advance();
        }
        self.in_first_stmt()
    }

    fn in_first_expr(&self) -> bool {
        self.in_first_add()
    }

    fn in_follow_expr(&self) -> bool {
        matches!(self.lookahead.kind, TokenKind::End | TokenKind::RightParen)
            || self.in_follow_param_list()
    }

    fn in_follow_param_list(&self) -> bool {
        self.lookahead.kind == TokenKind::ParamDelim
    }

    fn check_expr(&mut self) -> bool {
        while !self.in_follow_expr() && !self.in_first_expr() {
            let message = format!(
                "Invalid token at the beginning of an expression: {}",
                self.lookahead
            );
            self.error(message);
            self.advance();
        }
        self.in_first_expr()
    }

    fn in_first_add(&self) -> bool {
        self.in_first_mult()
    }

    fn in_follow_add(&self) -> bool {
        matches!(
            self.lookahead.kind,
            TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::In
                | TokenKind::RelOp
                | TokenKind::ParamDelim
                | TokenKind::RightBracket
        ) || self.in_follow_expr()
    }

    fn check_add(&mut self) -> bool {
        while !self.in_first_add() && !self.in_follow_add() {
            let message = format!(
                "Invalid token at the beginning of an addition: {}",
                self.lookahead
            );
            self.error(message);
            self.advance();
        }
        self.in_first_add()
    }

    fn in_first_mult(&self) -> bool {
        self.in_first_dice_roll()
    }

    fn in_follow_mult(&self) -> bool {
        matches!(self.lookahead.kind, TokenKind::Times | TokenKind::Divide)
            || self.in_follow_add()
    }

    fn check_mult(&mut self) -> bool {
        while !self.in_first_mult() && !self.in_follow_mult() {
            let message = format!(
                "Invalid token at the beginning of a multiplication: {}",
                self.lookahead
            );
            self.error(message);
            self.advance();
        }
        self.in_first_mult()
    }

    fn in_first_dice_roll(&self) -> bool {
        self.lookahead.kind == TokenKind::Minus || self.in_first_factor()
    }

    fn in_follow_dice_roll(&self) -> bool {
        self.lookahead.kind == TokenKind::RollOp || self.in_follow_mult()
    }

    fn check_dice_roll(&mut self) -> bool {
        while !self.in_first_dice_roll() && !self.in_follow_dice_roll() {
            let message = format!(
                "Invalid token at the beginning of a dice roll: {}",
                self.lookahead
            );
            self.error(message);
            self.advance();
        }
        self.in_first_dice_roll()
    }

    fn in_first_factor(&self) -> bool {
        matches!(
            self.lookahead.kind,
            TokenKind::LeftParen | TokenKind::Number | TokenKind::Id
        )
    }

    fn in_follow_factor(&self) -> bool {
        self.in_follow_dice_roll()
    }

    fn check_factor(&mut self) -> bool {
        while !self.in_first_factor() && !self.in_follow_factor() {
            let message = format!(
                "Invalid token at the beginning of a factor: {}",
                self.lookahead
            );
            self.error(message);
            self.advance();
        }
        self.in_first_factor()
    }

    // ─── evaluation plumbing ──────────────────────────────────────────────

    fn evaluate<F>(&mut self, f: F) -> Option<Value>
    where
        F: FnOnce(&mut Interpreter) -> Result<Value>,
    {
        match f(self.interpreter) {
            Ok(value) => Some(value),
            Err(error) => {
                self.report(error);
                None
            }
        }
    }

    fn apply1<F>(&mut self, value: Option<Value>, f: F) -> Option<Value>
    where
        F: FnOnce(&mut Interpreter, Value) -> Result<Value>,
    {
        let value = value?;
        self.evaluate(|interpreter| f(interpreter, value))
    }

    fn apply2<F>(&mut self, left: Option<Value>, right: Option<Value>, f: F) -> Option<Value>
    where
        F: FnOnce(&mut Interpreter, Value, Value) -> Result<Value>,
    {
        let (left, right) = (left?, right?);
        self.evaluate(|interpreter| f(interpreter, left, right))
    }

    fn apply3<F>(
        &mut self,
        a: Option<Value>,
        b: Option<Value>,
        c: Option<Value>,
        f: F,
    ) -> Option<Value>
    where
        F: FnOnce(&mut Interpreter, Value, Value, Value) -> Result<Value>,
    {
        let (a, b, c) = (a?, b?, c?);
        self.evaluate(|interpreter| f(interpreter, a, b, c))
    }

    /// Read a token of the given kind from the input. If the lookahead does
    /// not match, report the error and continue as if it did.
    fn eat(&mut self, kind: TokenKind) {
        if self.lookahead.kind != kind {
            let message = format!("Expected {}, got {}.", kind, self.lookahead);
            self.error(message);
        }
        self.advance();
    }

    fn advance(&mut self) {
        self.lookahead = self.lexer.read_token(self.log);
    }

    fn error(&mut self, message: impl Into<String>) {
        self.log.error(self.lexer.location(), message);
    }

    fn report(&mut self, error: Error) {
        self.error(error.to_string());
    }
}
