use crate::{
    ast::ast::{Node, NodeKind},
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    MK_NODE,
};

use super::{lookups::BindingPower, parser::Parser};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Node, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let Some(nud) = parser.get_nud_lookup().get(&token_kind).copied() else {
        return Err(Error::new(
            ErrorImpl::UnexpectedToken {
                token: parser.current_token().value.clone(),
            },
            parser.get_position(),
        ));
    };

    let mut left = nud(parser)?;

    // While LED and current BP is less than BP of current token, continue parsing lhs
    loop {
        let token_kind = parser.current_token_kind();
        let next_bp = *parser
            .get_bp_lookup()
            .get(&token_kind)
            .unwrap_or(&BindingPower::Default);

        if next_bp <= bp {
            break;
        }

        let Some(led) = parser.get_led_lookup().get(&token_kind).copied() else {
            return Err(parser.error("expected an operator"));
        };

        left = led(parser, left, next_bp)?;
    }

    Ok(left)
}

fn parse_number(parser: &mut Parser, text: &str) -> Result<Node, Error> {
    if text.parse::<i32>().is_err() {
        return Err(Error::new(
            ErrorImpl::NumberParseError {
                token: text.to_string(),
            },
            parser.get_position(),
        ));
    }

    parser.advance();
    Ok(MK_NODE!(NodeKind::Int, text))
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Node, Error> {
    let token = parser.current_token().clone();

    match token.kind {
        TokenKind::Number => parse_number(parser, &token.value),
        TokenKind::CharLiteral => {
            parser.advance();
            Ok(MK_NODE!(NodeKind::Char, token.value))
        }
        TokenKind::True | TokenKind::False => {
            parser.advance();
            Ok(MK_NODE!(NodeKind::Bool, token.value))
        }
        TokenKind::Null => {
            parser.advance();
            Ok(MK_NODE!(NodeKind::Null))
        }
        TokenKind::Identifier => {
            parser.advance();
            Ok(MK_NODE!(NodeKind::Id, token.value))
        }
        TokenKind::This => {
            parser.advance();
            Ok(MK_NODE!(NodeKind::This, "this"))
        }
        _ => Err(Error::new(
            ErrorImpl::UnexpectedToken { token: token.value },
            token.span.start,
        )),
    }
}

fn binary_kind(kind: TokenKind) -> Option<NodeKind> {
    Some(match kind {
        TokenKind::Plus => NodeKind::Add,
        TokenKind::Dash => NodeKind::Sub,
        TokenKind::Star => NodeKind::Mul,
        TokenKind::Slash => NodeKind::Div,
        TokenKind::Percent => NodeKind::Mod,
        TokenKind::Equals => NodeKind::Equal,
        TokenKind::NotEquals => NodeKind::NotEqual,
        TokenKind::Less => NodeKind::Less,
        TokenKind::LessEquals => NodeKind::LessEqual,
        TokenKind::Greater => NodeKind::Greater,
        TokenKind::GreaterEquals => NodeKind::GreaterEqual,
        TokenKind::And => NodeKind::And,
        TokenKind::Or => NodeKind::Or,
        _ => return None,
    })
}

pub fn parse_binary_expr(parser: &mut Parser, left: Node, bp: BindingPower) -> Result<Node, Error> {
    let Some(kind) = binary_kind(parser.current_token_kind()) else {
        return Err(parser.error("expected a binary operator"));
    };
    parser.advance();

    let right = parse_expr(parser, bp)?;

    Ok(MK_NODE!(kind, [left, right]))
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Node, Error> {
    let operator = parser.advance().kind;

    if operator == TokenKind::Dash {
        if parser.current_token_kind() == TokenKind::Number {
            let text = format!("-{}", parser.current_token().value);
            return parse_number(parser, &text);
        }

        let operand = parse_expr(parser, BindingPower::Unary)?;
        return Ok(MK_NODE!(NodeKind::Sub, [MK_NODE!(NodeKind::Int, "0"), operand]));
    }

    let operand = parse_expr(parser, BindingPower::Unary)?;
    Ok(MK_NODE!(NodeKind::Not, [operand]))
}

fn step_marker(kind: TokenKind) -> Node {
    if kind == TokenKind::PlusPlus {
        MK_NODE!(NodeKind::Inc, "++")
    } else {
        MK_NODE!(NodeKind::Dec, "--")
    }
}

pub fn parse_prefix_increment_expr(parser: &mut Parser) -> Result<Node, Error> {
    let marker = step_marker(parser.advance().kind);
    let target = parse_expr(parser, BindingPower::Unary)?;

    Ok(MK_NODE!(NodeKind::DecInc, [marker, target]))
}

pub fn parse_postfix_expr(parser: &mut Parser, left: Node, _bp: BindingPower) -> Result<Node, Error> {
    let marker = step_marker(parser.advance().kind);

    Ok(MK_NODE!(NodeKind::DecInc, [left, marker]))
}

pub fn parse_assignment_expr(parser: &mut Parser, left: Node, _bp: BindingPower) -> Result<Node, Error> {
    let operator = parser.advance().value.clone();
    // Right-associative: `a = b = c` assigns `b = c` first
    let rhs = parse_expr(parser, BindingPower::Comma)?;

    Ok(MK_NODE!(NodeKind::Assign, operator, [left, rhs]))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Node, Error> {
    parser.expect(TokenKind::OpenParen)?;
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(expr)
}

/// `*this`
pub fn parse_deref_this_expr(parser: &mut Parser) -> Result<Node, Error> {
    parser.expect(TokenKind::Star)?;
    let error = parser.error("only `this` can be dereferenced");
    parser.expect_error(TokenKind::This, Some(error))?;

    Ok(MK_NODE!(NodeKind::This, "*this"))
}

/// Parses `( expr, ... )` into an `Args` node.
pub fn parse_args(parser: &mut Parser) -> Result<Node, Error> {
    parser.expect(TokenKind::OpenParen)?;

    let mut args = MK_NODE!(NodeKind::Args);

    while parser.current_token_kind() != TokenKind::CloseParen {
        args.push(parse_expr(parser, BindingPower::Comma)?);

        if parser.current_token_kind() != TokenKind::CloseParen {
            parser.expect(TokenKind::Comma)?;
        }
    }

    parser.expect(TokenKind::CloseParen)?;

    Ok(args)
}

pub fn parse_call_expr(parser: &mut Parser, left: Node, _bp: BindingPower) -> Result<Node, Error> {
    if left.kind != NodeKind::Id {
        return Err(parser.error("only named functions can be called"));
    }

    let args = parse_args(parser)?;

    Ok(MK_NODE!(NodeKind::FnCall, left.value(), [args]))
}

fn parse_index(parser: &mut Parser) -> Result<Node, Error> {
    parser.expect(TokenKind::OpenBracket)?;
    let index = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseBracket)?;

    Ok(index)
}

pub fn parse_index_expr(parser: &mut Parser, left: Node, _bp: BindingPower) -> Result<Node, Error> {
    match left.kind {
        NodeKind::Id => {
            let index = parse_index(parser)?;
            Ok(MK_NODE!(NodeKind::ArrayItem, left.value(), [index]))
        }
        NodeKind::ArrayItem => {
            let mut item = left;
            item.push(parse_index(parser)?);
            Ok(item)
        }
        _ => Err(parser.error("only named arrays can be indexed")),
    }
}

/// `object.member`, `object->member`, `object.method(args)` and `object.array[i]`.
pub fn parse_member_expr(parser: &mut Parser, left: Node, _bp: BindingPower) -> Result<Node, Error> {
    parser.advance();

    let error = parser.error("expected a member name");
    let name = parser.expect_error(TokenKind::Identifier, Some(error))?.value;

    let member = match parser.current_token_kind() {
        TokenKind::OpenParen => MK_NODE!(NodeKind::FnCall, name, [parse_args(parser)?]),
        TokenKind::OpenBracket => {
            let mut item = MK_NODE!(NodeKind::ArrayItem, name);
            while parser.current_token_kind() == TokenKind::OpenBracket {
                item.push(parse_index(parser)?);
            }
            item
        }
        _ => MK_NODE!(NodeKind::Id, name),
    };

    Ok(MK_NODE!(NodeKind::ObjUsage, [left, member]))
}

/// `new Type(args)` evaluates like the plain construction call `Type(args)`.
pub fn parse_new_expr(parser: &mut Parser) -> Result<Node, Error> {
    parser.expect(TokenKind::New)?;

    let class = parser.expect(TokenKind::Identifier)?.value;
    let args = if parser.current_token_kind() == TokenKind::OpenParen {
        parse_args(parser)?
    } else {
        MK_NODE!(NodeKind::Args)
    };

    Ok(MK_NODE!(NodeKind::FnCall, class, [args]))
}
