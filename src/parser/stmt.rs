use crate::{
    ast::ast::{Node, NodeKind},
    errors::errors::Error,
    lexer::tokens::TokenKind,
    parser::{
        expr::{parse_args, parse_expr},
        lookups::BindingPower,
    },
    MK_NODE,
};

use super::{parser::Parser, types::parse_type};

pub fn parse_stmt(parser: &mut Parser) -> Result<Node, Error> {
    if let Some(handler) = parser
        .get_stmt_lookup()
        .get(&parser.current_token_kind())
        .copied()
    {
        return handler(parser);
    }

    parse_expression_stmt(parser)
}

fn parse_expression_stmt(parser: &mut Parser) -> Result<Node, Error> {
    let expr = parse_expr(parser, BindingPower::Default)?;

    parser.expect(TokenKind::Semicolon)?;

    Ok(expr)
}

/// `Name name ...` and `Name &name ...` declare; anything else starting with a name is an expression.
pub fn parse_identifier_stmt(parser: &mut Parser) -> Result<Node, Error> {
    match parser.peek_kind(1) {
        TokenKind::Identifier | TokenKind::Ampersand => parse_var_decl_stmt(parser),
        _ => parse_expression_stmt(parser),
    }
}

pub fn parse_var_decl_stmt(parser: &mut Parser) -> Result<Node, Error> {
    let type_node = parse_type(parser, BindingPower::Default)?;

    parse_declarator(parser, type_node)
}

fn parse_dims(parser: &mut Parser) -> Result<Node, Error> {
    let mut dims = MK_NODE!(NodeKind::Dims);
    let mut open_dimension = false;

    while parser.current_token_kind() == TokenKind::OpenBracket {
        parser.advance();
        if parser.current_token_kind() == TokenKind::CloseBracket {
            open_dimension = true;
        } else {
            dims.push(parse_expr(parser, BindingPower::Default)?);
        }
        parser.expect(TokenKind::CloseBracket)?;
    }

    // A single open dimension leaves the whole shape to the initializer
    if open_dimension {
        dims.children.clear();
    }

    Ok(dims)
}

fn parse_array_literal(parser: &mut Parser) -> Result<Node, Error> {
    parser.expect(TokenKind::OpenCurly)?;

    let mut array = MK_NODE!(NodeKind::Array);

    while parser.current_token_kind() != TokenKind::CloseCurly {
        if parser.current_token_kind() == TokenKind::OpenCurly {
            array.push(parse_array_literal(parser)?);
        } else {
            array.push(parse_expr(parser, BindingPower::Comma)?);
        }

        if parser.current_token_kind() != TokenKind::CloseCurly {
            parser.expect(TokenKind::Comma)?;
        }
    }

    parser.expect(TokenKind::CloseCurly)?;

    Ok(array)
}

/// Parses what follows the type of a variable, array or reference declaration, including the `;`.
pub fn parse_declarator(parser: &mut Parser, type_node: Node) -> Result<Node, Error> {
    let mut type_node = type_node;

    // T (&name)[n] = origin;
    if parser.current_token_kind() == TokenKind::OpenParen
        && parser.peek_kind(1) == TokenKind::Ampersand
    {
        parser.advance();
        parser.advance();
        let name = parser.expect(TokenKind::Identifier)?.value;
        parser.expect(TokenKind::CloseParen)?;
        let dims = parse_dims(parser)?;
        parser.expect(TokenKind::Assignment)?;
        let origin = parser.expect(TokenKind::Identifier)?.value;
        parser.expect(TokenKind::Semicolon)?;

        if !type_node.is_reference() {
            type_node.push(MK_NODE!(NodeKind::Ref, "&"));
        }

        return Ok(MK_NODE!(
            NodeKind::ArrayRef,
            name,
            [type_node, dims, MK_NODE!(NodeKind::Id, origin)]
        ));
    }

    let error = parser.error("expected identifier during declaration");
    let name = parser.expect_error(TokenKind::Identifier, Some(error))?.value;

    let declaration = match parser.current_token_kind() {
        TokenKind::OpenBracket => {
            let dims = parse_dims(parser)?;
            if parser.current_token_kind() == TokenKind::Assignment {
                parser.advance();
                let literal = parse_array_literal(parser)?;
                MK_NODE!(NodeKind::ArrayInit, name, [type_node, dims, literal])
            } else if dims.children.is_empty() {
                return Err(parser.error("array needs a size or an initializer"));
            } else {
                MK_NODE!(NodeKind::ArrayDecl, name, [type_node, dims])
            }
        }
        _ if type_node.is_reference() => {
            let error = parser.error("references must be initialised");
            parser.expect_error(TokenKind::Assignment, Some(error))?;
            let origin = parse_expr(parser, BindingPower::Default)?;
            MK_NODE!(NodeKind::VarRef, name, [type_node, origin])
        }
        TokenKind::OpenParen => {
            let args = parse_args(parser)?;
            if type_node.kind == NodeKind::ClassType {
                let construction = MK_NODE!(NodeKind::FnCall, type_node.value(), [args]);
                MK_NODE!(NodeKind::VarDecl, name, [type_node, construction])
            } else {
                let mut decl = MK_NODE!(NodeKind::VarDecl, name, [type_node]);
                decl.children.extend(args.children.into_iter().take(1));
                decl
            }
        }
        TokenKind::Assignment => {
            parser.advance();
            let init = parse_expr(parser, BindingPower::Default)?;
            MK_NODE!(NodeKind::VarDecl, name, [type_node, init])
        }
        _ => MK_NODE!(NodeKind::VarDecl, name, [type_node]),
    };

    parser.expect(TokenKind::Semicolon)?;

    Ok(declaration)
}

pub fn parse_block_stmt(parser: &mut Parser) -> Result<Node, Error> {
    parser.expect(TokenKind::OpenCurly)?;

    let mut block = MK_NODE!(NodeKind::Block);
    while parser.current_token_kind() != TokenKind::CloseCurly {
        if !parser.has_tokens() {
            return Err(parser.error("unterminated block"));
        }
        block.push(parse_stmt(parser)?);
    }

    parser.expect(TokenKind::CloseCurly)?;

    Ok(block)
}

/// A braced block, or a single statement wrapped in one.
fn parse_body(parser: &mut Parser) -> Result<Node, Error> {
    if parser.current_token_kind() == TokenKind::OpenCurly {
        parse_block_stmt(parser)
    } else {
        Ok(MK_NODE!(NodeKind::Block, [parse_stmt(parser)?]))
    }
}

fn parse_condition(parser: &mut Parser) -> Result<Node, Error> {
    parser.expect(TokenKind::OpenParen)?;
    let condition = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(condition)
}

/// `if`/`else if`/`else` chains become one node: condition, block, condition, block, ..., else block.
pub fn parse_if_stmt(parser: &mut Parser) -> Result<Node, Error> {
    parser.expect(TokenKind::If)?;

    let mut node = MK_NODE!(NodeKind::If);
    node.push(parse_condition(parser)?);
    node.push(parse_body(parser)?);

    while parser.current_token_kind() == TokenKind::Else {
        parser.advance();

        if parser.current_token_kind() == TokenKind::If {
            parser.advance();
            node.push(parse_condition(parser)?);
            node.push(parse_body(parser)?);
        } else {
            node.push(parse_body(parser)?);
            break;
        }
    }

    Ok(node)
}

pub fn parse_while_stmt(parser: &mut Parser) -> Result<Node, Error> {
    parser.expect(TokenKind::While)?;

    let condition = parse_condition(parser)?;
    let body = parse_body(parser)?;

    Ok(MK_NODE!(NodeKind::While, [condition, body]))
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<Node, Error> {
    parser.expect(TokenKind::Return)?;

    let mut node = MK_NODE!(NodeKind::Return);
    if parser.current_token_kind() != TokenKind::Semicolon {
        node.push(parse_expr(parser, BindingPower::Default)?);
    }

    parser.expect(TokenKind::Semicolon)?;

    Ok(node)
}

fn parse_params(parser: &mut Parser) -> Result<Node, Error> {
    parser.expect(TokenKind::OpenParen)?;

    let mut params = MK_NODE!(NodeKind::Params);

    // f(void)
    if parser.current_token_kind() == TokenKind::Void && parser.peek_kind(1) == TokenKind::CloseParen {
        parser.advance();
    }

    while parser.current_token_kind() != TokenKind::CloseParen {
        let type_node = parse_type(parser, BindingPower::Default)?;
        let error = parser.error("expected parameter name");
        let name = parser.expect_error(TokenKind::Identifier, Some(error))?.value;
        params.push(MK_NODE!(NodeKind::Param, name, [type_node]));

        if parser.current_token_kind() != TokenKind::CloseParen {
            parser.expect(TokenKind::Comma)?;
        }
    }

    parser.expect(TokenKind::CloseParen)?;

    Ok(params)
}

/// After `T name`: the parameter list and a body, `;` for a prototype or `= 0;` for an abstract method.
fn parse_function_rest(parser: &mut Parser, return_type: Node, name: String) -> Result<Node, Error> {
    let params = parse_params(parser)?;

    match parser.current_token_kind() {
        TokenKind::OpenCurly => {
            let body = parse_block_stmt(parser)?;
            Ok(MK_NODE!(NodeKind::FnDecl, name, [return_type, params, body]))
        }
        TokenKind::Assignment => {
            parser.advance();
            let error = parser.error("expected abstract marker");
            let marker = parser.expect_error(TokenKind::Number, Some(error))?.value;
            parser.expect(TokenKind::Semicolon)?;
            Ok(MK_NODE!(
                NodeKind::AbstractFn,
                name,
                [return_type, params, MK_NODE!(NodeKind::Int, marker)]
            ))
        }
        _ => {
            parser.expect(TokenKind::Semicolon)?;
            Ok(MK_NODE!(NodeKind::FnDecl, name, [return_type, params]))
        }
    }
}

/// Distinguishes `T f(int a)` / `T f()` from the construction `T x(1, 2)`.
fn looks_like_function(parser: &Parser) -> bool {
    if parser.current_token_kind() != TokenKind::Identifier
        || parser.peek_kind(1) != TokenKind::OpenParen
    {
        return false;
    }

    match parser.peek_kind(2) {
        TokenKind::CloseParen | TokenKind::Const => true,
        kind if kind.is_builtin_type() => true,
        TokenKind::Identifier => matches!(
            parser.peek_kind(3),
            TokenKind::Identifier | TokenKind::Ampersand
        ),
        _ => false,
    }
}

/// Top-level declarations: classes, functions, prototypes and globals.
pub fn parse_top_level(parser: &mut Parser) -> Result<Node, Error> {
    if parser.current_token_kind() == TokenKind::Class {
        return parse_class_decl(parser);
    }

    let type_node = parse_type(parser, BindingPower::Default)?;

    if looks_like_function(parser) {
        let name = parser.advance().value.clone();
        return parse_function_rest(parser, type_node, name);
    }

    parse_declarator(parser, type_node)
}

fn parse_base_init(parser: &mut Parser) -> Result<Option<Node>, Error> {
    if parser.current_token_kind() != TokenKind::Colon {
        return Ok(None);
    }

    parser.advance();
    let superclass = parser.expect(TokenKind::Identifier)?.value;
    let args = parse_args(parser)?;

    Ok(Some(MK_NODE!(NodeKind::BaseInit, superclass, [args])))
}

/// `Name(params) [: Base(args)] { ... }`; a single `Name&` parameter makes it the copy constructor.
fn parse_constructor(parser: &mut Parser) -> Result<Node, Error> {
    let name = parser.expect(TokenKind::Identifier)?.value;
    let params = parse_params(parser)?;

    let is_copy = match params.children.as_slice() {
        [param] => param.type_node().is_some_and(|ty| {
            ty.kind == NodeKind::ClassType && ty.value() == name && ty.is_reference()
        }),
        _ => false,
    };

    let mut node = if is_copy {
        MK_NODE!(NodeKind::CopyConstructor, name, [params])
    } else {
        MK_NODE!(NodeKind::Constructor, name, [params])
    };

    if let Some(base_init) = parse_base_init(parser)? {
        node.push(base_init);
    }
    node.push(parse_block_stmt(parser)?);

    Ok(node)
}

fn parse_destructor(parser: &mut Parser) -> Result<Node, Error> {
    parser.expect(TokenKind::Tilde)?;
    let name = parser.expect(TokenKind::Identifier)?.value;
    parser.expect(TokenKind::OpenParen)?;
    parser.expect(TokenKind::CloseParen)?;
    let body = parse_block_stmt(parser)?;

    Ok(MK_NODE!(NodeKind::Destructor, name, [body]))
}

/// One class member, or `None` for access specifiers.
fn parse_class_member(parser: &mut Parser) -> Result<Option<Node>, Error> {
    if parser.current_token_kind().is_access_specifier() {
        parser.advance();
        parser.expect(TokenKind::Colon)?;
        return Ok(None);
    }

    if parser.current_token_kind() == TokenKind::Virtual {
        parser.advance();
    }

    if parser.current_token_kind() == TokenKind::Tilde {
        return parse_destructor(parser).map(Some);
    }

    if parser.current_token_kind() == TokenKind::Identifier
        && parser.peek_kind(1) == TokenKind::OpenParen
    {
        return parse_constructor(parser).map(Some);
    }

    let type_node = parse_type(parser, BindingPower::Default)?;

    if parser.current_token_kind() == TokenKind::Operator {
        parser.advance();
        let error = parser.error("only operator= can be declared");
        parser.expect_error(TokenKind::Assignment, Some(error))?;
        let params = parse_params(parser)?;
        let body = parse_block_stmt(parser)?;
        return Ok(Some(MK_NODE!(
            NodeKind::Operator,
            "operator=",
            [type_node, params, body]
        )));
    }

    if looks_like_function(parser) {
        let name = parser.advance().value.clone();
        return parse_function_rest(parser, type_node, name).map(Some);
    }

    parse_declarator(parser, type_node).map(Some)
}

/// `class Name [: [public] Base] { members };`
pub fn parse_class_decl(parser: &mut Parser) -> Result<Node, Error> {
    parser.expect(TokenKind::Class)?;

    let name = parser.expect(TokenKind::Identifier)?.value;
    let mut class = MK_NODE!(NodeKind::Class, name);

    if parser.current_token_kind() == TokenKind::Colon {
        parser.advance();
        if parser.current_token_kind().is_access_specifier() {
            parser.advance();
        }
        let superclass = parser.expect(TokenKind::Identifier)?.value;
        class.push(MK_NODE!(NodeKind::Extends, superclass));
    }

    parser.expect(TokenKind::OpenCurly)?;

    while parser.current_token_kind() != TokenKind::CloseCurly {
        if !parser.has_tokens() {
            return Err(parser.error("unterminated class"));
        }
        if let Some(member) = parse_class_member(parser)? {
            class.push(member);
        }
    }

    parser.expect(TokenKind::CloseCurly)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(class)
}
