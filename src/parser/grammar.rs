//! Recursive-descent grammar rules (spec §4.2), one function per production.
//!
//! Grounded on `syster-base::parser::grammar::sysml`'s one-function-per-rule
//! layout, generalized from building rowan nodes to building the owned
//! [`crate::ast`] types. The precedence chain follows spec §4.2 exactly,
//! with one addition: a `unary` layer between `mul` and `postfix` that
//! recognises a leading `-` (spec §9 Design Notes, Open Question — resolved
//! as a real grammar rule rather than reproduced as a latent parse bug).

use crate::ast::*;
use crate::base::SourceRange;
use crate::lexer::TokenKind;

use super::cursor::Cursor;

pub(super) fn parse_translation_unit(c: &mut Cursor) -> TranslationUnit {
    let begin = c.current_range();
    let mut items = Vec::new();
    while !c.at_eof() {
        match parse_item(c) {
            Some(item) => items.push(item),
            None => {
                c.error("expected a class, enum or function declaration");
                c.recover_to_statement_boundary();
            }
        }
    }
    let range = cover_all(begin, items.iter().map(Item::range));
    TranslationUnit { items, range }
}

fn parse_item(c: &mut Cursor) -> Option<Item> {
    if c.at(TokenKind::Class) {
        Some(Item::Class(parse_class_decl(c)))
    } else if c.at(TokenKind::Enum) {
        Some(Item::Enum(parse_enum_decl(c)))
    } else if c.is_type_start() {
        Some(Item::Function(parse_function_decl(c)))
    } else {
        None
    }
}

fn parse_class_decl(c: &mut Cursor) -> ClassDecl {
    let begin = c.current_range();
    c.expect(TokenKind::Class, "'class'");
    let name = c.expect(TokenKind::Identifier, "a class name");
    c.expect(TokenKind::LBrace, "'{'");

    let mut members = Vec::new();
    while !c.at_eof() && !c.at(TokenKind::RBrace) {
        match parse_member(c) {
            Some(member) => members.push(member),
            None => {
                c.error("expected a field or method declaration");
                c.recover_to_statement_boundary();
            }
        }
    }
    let end = c.current_range();
    c.expect(TokenKind::RBrace, "'}'");
    c.eat(TokenKind::Semicolon);

    ClassDecl {
        name,
        members,
        range: begin.cover(end),
    }
}

fn parse_member(c: &mut Cursor) -> Option<Member> {
    if !c.is_type_start() {
        return None;
    }
    let ty = c.parse_type();
    let name = c.expect(TokenKind::Identifier, "a member name");
    if c.at(TokenKind::LParen) {
        Some(Member::Method(parse_function_tail(c, ty, name)))
    } else {
        Some(Member::Field(parse_variable_decl_tail(c, ty, name)))
    }
}

fn parse_enum_decl(c: &mut Cursor) -> EnumDecl {
    let begin = c.current_range();
    c.expect(TokenKind::Enum, "'enum'");
    let name = c.expect(TokenKind::Identifier, "an enum name");
    c.expect(TokenKind::LBrace, "'{'");

    let mut enumerators = Vec::new();
    if !c.at(TokenKind::RBrace) {
        enumerators.push(c.expect(TokenKind::Identifier, "an enumerator"));
        while c.eat(TokenKind::Comma).is_some() {
            if c.at(TokenKind::RBrace) {
                break;
            }
            enumerators.push(c.expect(TokenKind::Identifier, "an enumerator"));
        }
    }
    let end = c.current_range();
    c.expect(TokenKind::RBrace, "'}'");
    c.eat(TokenKind::Semicolon);

    EnumDecl {
        name,
        enumerators,
        range: begin.cover(end),
    }
}

fn parse_function_decl(c: &mut Cursor) -> FunctionDecl {
    let ty = c.parse_type();
    let name = c.expect(TokenKind::Identifier, "a function name");
    parse_function_tail(c, ty, name)
}

fn parse_function_tail(c: &mut Cursor, return_type: TypeRepresentation, name: crate::lexer::Token) -> FunctionDecl {
    let begin = return_type.primary_name().range;
    let params = parse_params(c);
    let body = parse_block(c);
    let range = begin.cover(body.range);
    FunctionDecl {
        return_type,
        name,
        params,
        body,
        range,
    }
}

fn parse_params(c: &mut Cursor) -> Vec<Param> {
    c.expect(TokenKind::LParen, "'('");
    let mut params = Vec::new();
    if !c.at(TokenKind::RParen) {
        params.push(parse_param(c));
        while c.eat(TokenKind::Comma).is_some() {
            params.push(parse_param(c));
        }
    }
    c.expect(TokenKind::RParen, "')'");
    params
}

fn parse_param(c: &mut Cursor) -> Param {
    let ty = c.parse_type();
    let name = c.expect(TokenKind::Identifier, "a parameter name");
    Param { ty, name }
}

fn parse_block(c: &mut Cursor) -> Block {
    let begin = c.current_range();
    c.expect(TokenKind::LBrace, "'{'");
    let mut stmts = Vec::new();
    while !c.at_eof() && !c.at(TokenKind::RBrace) {
        stmts.push(parse_stmt(c));
    }
    let end = c.current_range();
    c.expect(TokenKind::RBrace, "'}'");
    Block {
        stmts,
        range: begin.cover(end),
    }
}

fn parse_stmt(c: &mut Cursor) -> Stmt {
    if c.is_type_start() {
        Stmt::VariableDecl(parse_variable_decl(c))
    } else if c.at(TokenKind::If) {
        Stmt::IfElse(parse_if_else(c))
    } else if c.at(TokenKind::While) {
        Stmt::While(parse_while(c))
    } else if c.at(TokenKind::Return) {
        Stmt::Return(parse_return(c))
    } else if c.at(TokenKind::LBrace) {
        Stmt::Block(parse_block(c))
    } else {
        let expr = parse_expr(c);
        c.expect(TokenKind::Semicolon, "';'");
        Stmt::Expr(expr)
    }
}

fn parse_variable_decl(c: &mut Cursor) -> VariableDecl {
    let ty = c.parse_type();
    let name = c.expect(TokenKind::Identifier, "a variable name");
    parse_variable_decl_tail(c, ty, name)
}

fn parse_variable_decl_tail(c: &mut Cursor, ty: TypeRepresentation, name: crate::lexer::Token) -> VariableDecl {
    let begin = ty.primary_name().range;
    let initializer = if c.eat(TokenKind::Equal).is_some() {
        Some(parse_expr(c))
    } else {
        None
    };
    let end = c.current_range();
    c.expect(TokenKind::Semicolon, "';'");
    VariableDecl {
        ty,
        name,
        initializer,
        range: begin.cover(end),
    }
}

fn parse_if_else(c: &mut Cursor) -> IfElse {
    let begin = c.current_range();
    let mut arms = Vec::new();
    let mut else_body = None;

    c.expect(TokenKind::If, "'if'");
    arms.push(parse_if_head(c));

    let mut end = arms.last().unwrap().1.range;
    while c.at(TokenKind::Else) {
        c.bump();
        if c.eat(TokenKind::If).is_some() {
            let arm = parse_if_head(c);
            end = arm.1.range;
            arms.push(arm);
        } else {
            let body = parse_block(c);
            end = body.range;
            else_body = Some(body);
            break;
        }
    }

    IfElse {
        arms,
        else_body,
        range: begin.cover(end),
    }
}

fn parse_if_head(c: &mut Cursor) -> (Expr, Block) {
    c.expect(TokenKind::LParen, "'('");
    let condition = parse_expr(c);
    c.expect(TokenKind::RParen, "')'");
    let body = parse_block(c);
    (condition, body)
}

fn parse_while(c: &mut Cursor) -> While {
    let begin = c.current_range();
    c.expect(TokenKind::While, "'while'");
    c.expect(TokenKind::LParen, "'('");
    let condition = parse_expr(c);
    c.expect(TokenKind::RParen, "')'");
    let body = parse_block(c);
    let range = begin.cover(body.range);
    While { condition, body, range }
}

fn parse_return(c: &mut Cursor) -> Return {
    let begin = c.current_range();
    c.expect(TokenKind::Return, "'return'");
    let value = if c.at(TokenKind::Semicolon) { None } else { Some(parse_expr(c)) };
    let end = c.current_range();
    c.expect(TokenKind::Semicolon, "';'");
    Return {
        value,
        range: begin.cover(end),
    }
}

// ---------------------------------------------------------------------
// Expressions, by precedence, weakest binding first.
// ---------------------------------------------------------------------

pub(super) fn parse_expr(c: &mut Cursor) -> Expr {
    parse_assignment(c)
}

fn parse_assignment(c: &mut Cursor) -> Expr {
    let lhs = parse_orelse(c);
    if let Some(op_token) = c.eat(TokenKind::Equal) {
        let rhs = parse_assignment(c);
        return binary(lhs, BinaryOperator::Assign, op_token, rhs);
    }
    lhs
}

fn parse_orelse(c: &mut Cursor) -> Expr {
    let mut lhs = parse_andand(c);
    while let Some(op_token) = c.eat(TokenKind::PipePipe) {
        let rhs = parse_andand(c);
        lhs = binary(lhs, BinaryOperator::LogicalOr, op_token, rhs);
    }
    lhs
}

fn parse_andand(c: &mut Cursor) -> Expr {
    let mut lhs = parse_equality(c);
    while let Some(op_token) = c.eat(TokenKind::AmpAmp) {
        let rhs = parse_equality(c);
        lhs = binary(lhs, BinaryOperator::LogicalAnd, op_token, rhs);
    }
    lhs
}

fn parse_equality(c: &mut Cursor) -> Expr {
    let mut lhs = parse_rel(c);
    loop {
        let op = match c.current_kind() {
            TokenKind::EqualEqual => BinaryOperator::Equal,
            TokenKind::BangEqual => BinaryOperator::NotEqual,
            _ => break,
        };
        let op_token = c.bump();
        let rhs = parse_rel(c);
        lhs = binary(lhs, op, op_token, rhs);
    }
    lhs
}

fn parse_rel(c: &mut Cursor) -> Expr {
    let mut lhs = parse_add(c);
    loop {
        let op = match c.current_kind() {
            TokenKind::Less => BinaryOperator::Less,
            TokenKind::LessEqual => BinaryOperator::LessEqual,
            TokenKind::Greater => BinaryOperator::Greater,
            TokenKind::GreaterEqual => BinaryOperator::GreaterEqual,
            _ => break,
        };
        let op_token = c.bump();
        let rhs = parse_add(c);
        lhs = binary(lhs, op, op_token, rhs);
    }
    lhs
}

fn parse_add(c: &mut Cursor) -> Expr {
    let mut lhs = parse_mul(c);
    loop {
        let op = match c.current_kind() {
            TokenKind::Plus => BinaryOperator::Add,
            TokenKind::Minus => BinaryOperator::Sub,
            TokenKind::PlusEqual => BinaryOperator::AddAssign,
            TokenKind::MinusEqual => BinaryOperator::SubAssign,
            _ => break,
        };
        let op_token = c.bump();
        let rhs = parse_mul(c);
        lhs = binary(lhs, op, op_token, rhs);
    }
    lhs
}

fn parse_mul(c: &mut Cursor) -> Expr {
    let mut lhs = parse_unary(c);
    loop {
        let op = match c.current_kind() {
            TokenKind::Star => BinaryOperator::Mul,
            TokenKind::Slash => BinaryOperator::Div,
            TokenKind::StarEqual => BinaryOperator::MulAssign,
            TokenKind::SlashEqual => BinaryOperator::DivAssign,
            _ => break,
        };
        let op_token = c.bump();
        let rhs = parse_unary(c);
        lhs = binary(lhs, op, op_token, rhs);
    }
    lhs
}

fn parse_unary(c: &mut Cursor) -> Expr {
    if c.at(TokenKind::Minus) {
        let begin = c.current_range();
        c.bump();
        let operand = parse_unary(c);
        let range = begin.cover(operand.range());
        return Expr::Unary(UnaryOp {
            operator: UnaryOperator::Negate,
            operand: Box::new(operand),
            range,
        });
    }
    parse_postfix(c)
}

fn parse_postfix(c: &mut Cursor) -> Expr {
    let mut expr = parse_primary(c);
    loop {
        if c.eat(TokenKind::Dot).is_some() {
            let name = c.expect(TokenKind::Identifier, "a member name");
            if c.at(TokenKind::LParen) {
                let args = parse_args(c);
                let end = c.current_range();
                let range = expr.range().cover(end);
                expr = Expr::MemberFunctionCall(MemberFunctionCall {
                    lhs: Box::new(expr),
                    name,
                    args,
                    range,
                });
            } else {
                let range = expr.range().cover(name.range);
                expr = Expr::MemberAccess(MemberAccess {
                    lhs: Box::new(expr),
                    member_name: name,
                    range,
                });
            }
        } else if c.at(TokenKind::LParen) {
            match expr {
                Expr::Id(id_ref) => {
                    let args = parse_args(c);
                    let end = c.current_range();
                    let range = id_ref.range.cover(end);
                    expr = Expr::FunctionCall(FunctionCall {
                        name: id_ref.name,
                        args,
                        range,
                    });
                }
                other => {
                    c.error("only a plain name can be called as a function");
                    expr = other;
                    break;
                }
            }
        } else {
            break;
        }
    }
    expr
}

fn parse_args(c: &mut Cursor) -> Vec<Expr> {
    c.expect(TokenKind::LParen, "'('");
    let mut args = Vec::new();
    if !c.at(TokenKind::RParen) {
        args.push(parse_expr(c));
        while c.eat(TokenKind::Comma).is_some() {
            args.push(parse_expr(c));
        }
    }
    c.expect(TokenKind::RParen, "')'");
    args
}

fn parse_primary(c: &mut Cursor) -> Expr {
    let range = c.current_range();
    match c.current_kind() {
        TokenKind::True | TokenKind::False => {
            let token = c.bump();
            let value = token.kind == TokenKind::True;
            Expr::Bool(BoolLiteral { token, value, range })
        }
        TokenKind::Integer => {
            let token = c.bump();
            let value = token.text().parse().unwrap_or(0);
            Expr::Int(IntLiteral { token, value, range })
        }
        TokenKind::DoubleLiteral => {
            let token = c.bump();
            let value = token.text().parse().unwrap_or(0.0);
            Expr::Double(DoubleLiteral { token, value, range })
        }
        TokenKind::StringLiteral => {
            let token = c.bump();
            let value = unquote(token.text());
            Expr::String(StringLiteral { token, value, range })
        }
        TokenKind::Identifier => {
            let token = c.bump();
            Expr::Id(IdRef { name: token, range })
        }
        kind if kind.is_builtin_type_name() => {
            // A builtin type name used as an expression head is a
            // constructor/conversion call (spec §4.3: `int(...)`,
            // `project(...)`, `version(...)`, ...); the postfix layer
            // turns the following `(args)` into a `FunctionCall` keyed on
            // this token's lexeme, which resolves against the catalog's
            // free-function constructors.
            let token = c.bump();
            Expr::Id(IdRef { name: token, range })
        }
        TokenKind::LParen => {
            c.bump();
            let inner = parse_expr(c);
            c.expect(TokenKind::RParen, "')'");
            inner
        }
        TokenKind::LBrace => {
            c.bump();
            let mut values = Vec::new();
            if !c.at(TokenKind::RBrace) {
                values.push(parse_expr(c));
                while c.eat(TokenKind::Comma).is_some() {
                    if c.at(TokenKind::RBrace) {
                        break;
                    }
                    values.push(parse_expr(c));
                }
            }
            let end = c.current_range();
            c.expect(TokenKind::RBrace, "'}'");
            Expr::InitializerList(InitializerList {
                values,
                range: range.cover(end),
            })
        }
        _ => {
            c.error("expected an expression");
            let token = c.bump();
            Expr::Id(IdRef { name: token, range })
        }
    }
}

fn binary(lhs: Expr, operator: BinaryOperator, operator_token: crate::lexer::Token, rhs: Expr) -> Expr {
    let range = lhs.range().cover(rhs.range());
    Expr::Binary(BinaryOp {
        lhs: Box::new(lhs),
        operator,
        operator_token,
        rhs: Box::new(rhs),
        range,
    })
}

fn unquote(lexeme: &str) -> String {
    let inner = lexeme.strip_prefix('"').unwrap_or(lexeme);
    inner.strip_suffix('"').unwrap_or(inner).to_string()
}

fn cover_all(begin: SourceRange, ranges: impl Iterator<Item = SourceRange>) -> SourceRange {
    ranges.fold(begin, |acc, r| acc.cover(r))
}
