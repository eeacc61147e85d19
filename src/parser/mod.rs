pub mod ast;

use crate::diagnostics::CompileError;
use crate::lexer::token::Token;
use crate::span::{Span, Spanned};
use ast::*;

/// Binding power of prefix `!`; tighter than every binary operator.
const PREFIX_BP: u8 = 13;

pub struct Parser<'a> {
    tokens: &'a [Spanned<Token>],
    source: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Spanned<Token>], source: &'a str) -> Self {
        Self { tokens, source, pos: 0 }
    }

    fn peek(&self) -> Option<&'a Spanned<Token>> {
        self.tokens.get(self.pos)
    }

    fn peek_nth(&self, n: usize) -> Option<&'a Spanned<Token>> {
        self.tokens.get(self.pos + n)
    }

    fn check(&self, expected: &Token) -> bool {
        self.peek()
            .is_some_and(|tok| std::mem::discriminant(&tok.node) == std::mem::discriminant(expected))
    }

    fn check_nth(&self, n: usize, expected: &Token) -> bool {
        self.peek_nth(n)
            .is_some_and(|tok| std::mem::discriminant(&tok.node) == std::mem::discriminant(expected))
    }

    fn expect(&mut self, expected: &Token) -> Result<&'a Spanned<Token>, CompileError> {
        match self.tokens.get(self.pos) {
            Some(tok) if std::mem::discriminant(&tok.node) == std::mem::discriminant(expected) => {
                self.pos += 1;
                Ok(tok)
            }
            Some(tok) => Err(CompileError::syntax(
                format!("expected '{expected}', found '{}'", tok.node),
                tok.span,
            )),
            None => Err(CompileError::syntax(
                format!("expected '{expected}', found end of file"),
                self.eof_span(),
            )),
        }
    }

    fn expect_ident(&mut self) -> Result<Spanned<String>, CompileError> {
        match self.tokens.get(self.pos) {
            Some(tok) if matches!(tok.node, Token::Ident) => {
                let name = self.source[tok.span.start..tok.span.end].to_string();
                self.pos += 1;
                Ok(Spanned::new(name, tok.span))
            }
            Some(tok) => Err(CompileError::syntax(
                format!("expected identifier, found '{}'", tok.node),
                tok.span,
            )),
            None => Err(CompileError::syntax(
                "expected identifier, found end of file",
                self.eof_span(),
            )),
        }
    }

    fn eof_span(&self) -> Span {
        if let Some(last) = self.tokens.last() {
            Span::new(last.span.end, last.span.end)
        } else {
            Span::dummy()
        }
    }

    fn peek_or_eof(&self, context: &str) -> Result<&'a Spanned<Token>, CompileError> {
        self.peek().ok_or_else(|| {
            CompileError::syntax(format!("unexpected end of file {context}"), self.eof_span())
        })
    }

    pub fn parse_program(&mut self) -> Result<Program, CompileError> {
        let main_class = self.parse_main_class()?;
        let mut classes = Vec::new();
        while self.peek().is_some() {
            classes.push(self.parse_class()?);
        }
        Ok(Program { main_class, classes })
    }

    /// `public`? `class`, returning the start offset of whichever came first.
    fn parse_class_header(&mut self) -> Result<(usize, Spanned<String>), CompileError> {
        let start = match self.peek() {
            Some(tok) if matches!(tok.node, Token::Public) => {
                self.pos += 1;
                self.expect(&Token::Class)?;
                tok.span.start
            }
            _ => self.expect(&Token::Class)?.span.start,
        };
        let name = self.expect_ident()?;
        Ok((start, name))
    }

    fn parse_main_class(&mut self) -> Result<Spanned<MainClass>, CompileError> {
        let (start, name) = self.parse_class_header()?;
        self.expect(&Token::LBrace)?;
        self.expect(&Token::Public)?;
        self.expect(&Token::Static)?;
        self.expect(&Token::Void)?;
        self.expect(&Token::Main)?;
        self.expect(&Token::LParen)?;
        self.expect(&Token::StringKw)?;
        self.expect(&Token::LBracket)?;
        self.expect(&Token::RBracket)?;
        let args_name = self.expect_ident()?;
        self.expect(&Token::RParen)?;

        let open = self.expect(&Token::LBrace)?;
        let stmts = self.parse_items_until(&Token::RBrace)?;
        let close = self.expect(&Token::RBrace)?;
        let body = Spanned::new(Block { stmts }, open.span.to(close.span));

        let end = self.expect(&Token::RBrace)?.span.end;
        Ok(Spanned::new(MainClass { name, args_name, body }, Span::new(start, end)))
    }

    fn parse_class(&mut self) -> Result<Spanned<ClassDecl>, CompileError> {
        let (start, name) = self.parse_class_header()?;
        self.expect(&Token::LBrace)?;

        let mut fields = Vec::new();
        while self.peek().is_some() && !self.check(&Token::Public) && !self.check(&Token::RBrace) {
            fields.push(self.parse_var_decl()?);
            self.expect(&Token::Semi)?;
        }

        let mut methods = Vec::new();
        while self.check(&Token::Public) {
            methods.push(self.parse_method()?);
        }

        let end = self.expect(&Token::RBrace)?.span.end;
        Ok(Spanned::new(ClassDecl { name, fields, methods }, Span::new(start, end)))
    }

    fn parse_method(&mut self) -> Result<Spanned<Method>, CompileError> {
        let start = self.expect(&Token::Public)?.span.start;
        let return_type = self.parse_type()?;
        let name = self.expect_ident()?;
        self.expect(&Token::LParen)?;

        let mut params = Vec::new();
        while self.peek().is_some() && !self.check(&Token::RParen) {
            if !params.is_empty() {
                self.expect(&Token::Comma)?;
            }
            params.push(self.parse_var_decl()?);
        }
        self.expect(&Token::RParen)?;

        let open = self.expect(&Token::LBrace)?;
        let stmts = self.parse_items_until(&Token::Return)?;
        self.expect(&Token::Return)?;
        let return_expr = self.parse_expr(0)?;
        self.expect(&Token::Semi)?;
        let close = self.expect(&Token::RBrace)?;
        let body = Spanned::new(Block { stmts }, open.span.to(close.span));

        Ok(Spanned::new(
            Method { name, params, return_type, body, return_expr },
            Span::new(start, close.span.end),
        ))
    }

    fn parse_var_decl(&mut self) -> Result<VarDecl, CompileError> {
        let ty = self.parse_type()?;
        let name = self.expect_ident()?;
        Ok(VarDecl { name, ty })
    }

    fn parse_type(&mut self) -> Result<Spanned<TypeExpr>, CompileError> {
        let tok = self.peek_or_eof("in type")?;
        match tok.node {
            Token::Int => {
                self.pos += 1;
                if self.check(&Token::LBracket) {
                    self.pos += 1;
                    let close = self.expect(&Token::RBracket)?;
                    Ok(Spanned::new(TypeExpr::IntArray, tok.span.to(close.span)))
                } else {
                    Ok(Spanned::new(TypeExpr::Int, tok.span))
                }
            }
            Token::Boolean => {
                self.pos += 1;
                Ok(Spanned::new(TypeExpr::Boolean, tok.span))
            }
            Token::Ident => {
                let ident = self.expect_ident()?;
                Ok(Spanned::new(TypeExpr::Named(ident.node), ident.span))
            }
            _ => Err(CompileError::syntax(
                format!("expected type, found '{}'", tok.node),
                tok.span,
            )),
        }
    }

    fn parse_items_until(&mut self, terminator: &Token) -> Result<Vec<Spanned<Stmt>>, CompileError> {
        let mut stmts = Vec::new();
        while self.peek().is_some() && !self.check(terminator) {
            stmts.push(self.parse_item()?);
        }
        Ok(stmts)
    }

    /// A local declaration or a statement.
    fn parse_item(&mut self) -> Result<Spanned<Stmt>, CompileError> {
        let is_decl = self.check(&Token::Int)
            || self.check(&Token::Boolean)
            || (self.check(&Token::Ident) && self.check_nth(1, &Token::Ident));
        if !is_decl {
            return self.parse_stmt();
        }
        let decl = self.parse_var_decl()?;
        let semi = self.expect(&Token::Semi)?;
        let span = decl.ty.span.to(semi.span);
        Ok(Spanned::new(Stmt::VarDecl(decl), span))
    }

    fn parse_stmt(&mut self) -> Result<Spanned<Stmt>, CompileError> {
        let tok = self.peek_or_eof("in statement")?;
        match tok.node {
            Token::LBrace => {
                self.pos += 1;
                let stmts = self.parse_items_until(&Token::RBrace)?;
                let close = self.expect(&Token::RBrace)?;
                Ok(Spanned::new(Stmt::Block(Block { stmts }), tok.span.to(close.span)))
            }
            Token::If => self.parse_if_stmt(),
            Token::While => self.parse_while_stmt(),
            Token::Println => {
                self.pos += 1;
                self.expect(&Token::LParen)?;
                let value = self.parse_expr(0)?;
                self.expect(&Token::RParen)?;
                let semi = self.expect(&Token::Semi)?;
                Ok(Spanned::new(Stmt::Print(value), tok.span.to(semi.span)))
            }
            Token::Ident => {
                let target = self.expect_ident()?;
                if self.check(&Token::LBracket) {
                    self.pos += 1;
                    let index = self.parse_expr(0)?;
                    self.expect(&Token::RBracket)?;
                    self.expect(&Token::Eq)?;
                    let value = self.parse_expr(0)?;
                    let semi = self.expect(&Token::Semi)?;
                    let span = target.span.to(semi.span);
                    Ok(Spanned::new(Stmt::IndexAssign { target, index, value }, span))
                } else {
                    self.expect(&Token::Eq)?;
                    let value = self.parse_expr(0)?;
                    let semi = self.expect(&Token::Semi)?;
                    let span = target.span.to(semi.span);
                    Ok(Spanned::new(Stmt::Assign { target, value }, span))
                }
            }
            _ => Err(CompileError::syntax(
                format!("expected statement, found '{}'", tok.node),
                tok.span,
            )),
        }
    }

    fn parse_if_stmt(&mut self) -> Result<Spanned<Stmt>, CompileError> {
        let start = self.expect(&Token::If)?.span.start;
        self.expect(&Token::LParen)?;
        let condition = self.parse_expr(0)?;
        self.expect(&Token::RParen)?;
        let then_branch = self.parse_stmt()?;

        // Dangling else binds to the nearest if.
        let else_branch = if self.check(&Token::Else) {
            self.pos += 1;
            Some(Box::new(self.parse_stmt()?))
        } else {
            None
        };

        let end = else_branch.as_ref().map_or(then_branch.span.end, |b| b.span.end);
        Ok(Spanned::new(
            Stmt::If { condition, then_branch: Box::new(then_branch), else_branch },
            Span::new(start, end),
        ))
    }

    fn parse_while_stmt(&mut self) -> Result<Spanned<Stmt>, CompileError> {
        let start = self.expect(&Token::While)?.span.start;
        self.expect(&Token::LParen)?;
        let condition = self.parse_expr(0)?;
        self.expect(&Token::RParen)?;
        let body = self.parse_stmt()?;
        let end = body.span.end;
        Ok(Spanned::new(Stmt::While { condition, body: Box::new(body) }, Span::new(start, end)))
    }

    fn parse_expr(&mut self, min_bp: u8) -> Result<Spanned<Expr>, CompileError> {
        let mut lhs = self.parse_prefix()?;

        loop {
            let Some(tok) = self.peek() else { break };

            // Postfix forms bind tighter than anything else.
            match tok.node {
                Token::LBracket => {
                    self.pos += 1;
                    let index = self.parse_expr(0)?;
                    let close = self.expect(&Token::RBracket)?;
                    let span = lhs.span.to(close.span);
                    lhs = Spanned::new(
                        Expr::Index { object: Box::new(lhs), index: Box::new(index) },
                        span,
                    );
                    continue;
                }
                Token::Dot => {
                    self.pos += 1;
                    if self.check(&Token::Length) {
                        let len_tok = self.expect(&Token::Length)?;
                        let span = lhs.span.to(len_tok.span);
                        lhs = Spanned::new(Expr::Length { object: Box::new(lhs) }, span);
                        continue;
                    }
                    let method = self.expect_ident()?;
                    self.expect(&Token::LParen)?;
                    let mut args = Vec::new();
                    while self.peek().is_some() && !self.check(&Token::RParen) {
                        if !args.is_empty() {
                            self.expect(&Token::Comma)?;
                        }
                        args.push(self.parse_expr(0)?);
                    }
                    let close = self.expect(&Token::RParen)?;
                    let span = lhs.span.to(close.span);
                    lhs = Spanned::new(
                        Expr::MethodCall { object: Box::new(lhs), method, args },
                        span,
                    );
                    continue;
                }
                _ => {}
            }

            let op = match tok.node {
                Token::Plus => BinOp::Add,
                Token::Minus => BinOp::Sub,
                Token::Star => BinOp::Mul,
                Token::Slash => BinOp::Div,
                Token::EqEq => BinOp::Eq,
                Token::Lt => BinOp::Lt,
                Token::Gt => BinOp::Gt,
                Token::AmpAmp => BinOp::And,
                Token::PipePipe => BinOp::Or,
                _ => break,
            };

            let (lbp, rbp) = infix_binding_power(op);
            if lbp < min_bp {
                break;
            }
            self.pos += 1; // consume operator

            let rhs = self.parse_expr(rbp)?;
            let span = lhs.span.to(rhs.span);
            lhs = Spanned::new(
                Expr::BinOp { op, lhs: Box::new(lhs), rhs: Box::new(rhs) },
                span,
            );
        }

        Ok(lhs)
    }

    fn parse_prefix(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let tok = self.peek_or_eof("in expression")?;

        match tok.node {
            Token::IntLit(n) => {
                self.pos += 1;
                Ok(Spanned::new(Expr::IntLit(n), tok.span))
            }
            Token::True => {
                self.pos += 1;
                Ok(Spanned::new(Expr::BoolLit(true), tok.span))
            }
            Token::False => {
                self.pos += 1;
                Ok(Spanned::new(Expr::BoolLit(false), tok.span))
            }
            Token::This => {
                self.pos += 1;
                Ok(Spanned::new(Expr::This, tok.span))
            }
            Token::Ident => {
                let ident = self.expect_ident()?;
                Ok(Spanned::new(Expr::Ident(ident.node), ident.span))
            }
            Token::Bang => {
                self.pos += 1;
                let operand = self.parse_expr(PREFIX_BP)?;
                let span = tok.span.to(operand.span);
                Ok(Spanned::new(Expr::Not { operand: Box::new(operand) }, span))
            }
            Token::LParen => {
                self.pos += 1;
                let inner = self.parse_expr(0)?;
                let close = self.expect(&Token::RParen)?;
                Ok(Spanned::new(Expr::Paren(Box::new(inner)), tok.span.to(close.span)))
            }
            Token::New => {
                self.pos += 1;
                if self.check(&Token::Int) {
                    self.pos += 1;
                    self.expect(&Token::LBracket)?;
                    let size = self.parse_expr(0)?;
                    let close = self.expect(&Token::RBracket)?;
                    Ok(Spanned::new(Expr::NewArray { size: Box::new(size) }, tok.span.to(close.span)))
                } else {
                    let class = self.expect_ident()?;
                    self.expect(&Token::LParen)?;
                    let close = self.expect(&Token::RParen)?;
                    Ok(Spanned::new(Expr::NewObject { class }, tok.span.to(close.span)))
                }
            }
            _ => Err(CompileError::syntax(
                format!("unexpected token '{}' in expression", tok.node),
                tok.span,
            )),
        }
    }
}

fn infix_binding_power(op: BinOp) -> (u8, u8) {
    match op {
        BinOp::Or => (1, 2),
        BinOp::And => (3, 4),
        BinOp::Eq => (5, 6),
        BinOp::Lt | BinOp::Gt => (7, 8),
        BinOp::Add | BinOp::Sub => (9, 10),
        BinOp::Mul | BinOp::Div => (11, 12),
    }
}

/// Lex and parse a complete compilation unit.
pub fn parse_source(source: &str) -> Result<Program, CompileError> {
    let tokens = crate::lexer::lex(source)?;
    Parser::new(&tokens, source).parse_program()
}
