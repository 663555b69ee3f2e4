//! Type parsing implementation.
//!
//! This module handles parsing of the types written in declarations,
//! parameter lists and return positions. It supports:
//!
//! - Built-in types (`int`, `bool`, `char`, `void`)
//! - Class types (identifiers)
//! - The `&` reference marker
//! - A leading `const`, which is accepted and ignored
//!
//! Similar to expression parsing, it uses NUD/LED handlers with
//! binding powers.

use std::collections::HashMap;

use crate::{
    ast::{
        ast::{Node, NodeKind},
        types::BuiltInType,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    MK_NODE,
};

use super::{lookups::BindingPower, parser::Parser};

/// Type alias for type null denotation handler functions.
pub type TypeNUDHandler = fn(&mut Parser) -> Result<Node, Error>;

/// Type alias for type left denotation handler functions.
pub type TypeLEDHandler = fn(&mut Parser, Node, BindingPower) -> Result<Node, Error>;

/// Type alias for type NUD lookup table.
pub type TypeNUDLookup = HashMap<TokenKind, TypeNUDHandler>;

/// Type alias for type LED lookup table.
pub type TypeLEDLookup = HashMap<TokenKind, TypeLEDHandler>;

/// Type alias for type binding power lookup table.
pub type TypeBPLookup = HashMap<TokenKind, BindingPower>;

/// Initializes the type parsing lookup tables.
pub fn create_token_type_lookups(parser: &mut Parser) {
    parser.type_nud(TokenKind::Int, parse_builtin_type);
    parser.type_nud(TokenKind::Bool, parse_builtin_type);
    parser.type_nud(TokenKind::Char, parse_builtin_type);
    parser.type_nud(TokenKind::Void, parse_builtin_type);
    parser.type_nud(TokenKind::Identifier, parse_class_type);
    parser.type_led(TokenKind::Ampersand, BindingPower::Call, parse_reference_type);
}

pub fn parse_builtin_type(parser: &mut Parser) -> Result<Node, Error> {
    let builtin = match parser.advance().kind {
        TokenKind::Int => BuiltInType::Int,
        TokenKind::Bool => BuiltInType::Bool,
        TokenKind::Char => BuiltInType::Char,
        _ => BuiltInType::Void,
    };

    Ok(Node::new(builtin.kind()))
}

pub fn parse_class_type(parser: &mut Parser) -> Result<Node, Error> {
    let token = parser.expect(TokenKind::Identifier)?;

    Ok(MK_NODE!(NodeKind::ClassType, token.value))
}

pub fn parse_reference_type(
    parser: &mut Parser,
    left: Node,
    _bp: BindingPower,
) -> Result<Node, Error> {
    parser.expect(TokenKind::Ampersand)?;

    let mut reference = left;
    if !reference.is_reference() {
        reference.push(MK_NODE!(NodeKind::Ref, "&"));
    }

    Ok(reference)
}

pub fn parse_type(parser: &mut Parser, bp: BindingPower) -> Result<Node, Error> {
    if parser.current_token_kind() == TokenKind::Const {
        parser.advance();
    }

    // First parse NUD
    let token_kind = parser.current_token_kind();
    let Some(nud) = parser.get_type_nud_lookup().get(&token_kind).copied() else {
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
            .get_type_bp_lookup()
            .get(&token_kind)
            .unwrap_or(&BindingPower::Default);

        if next_bp <= bp {
            break;
        }

        let Some(led) = parser.get_type_led_lookup().get(&token_kind).copied() else {
            break;
        };

        left = led(parser, left, next_bp)?;
    }

    Ok(left)
}
