//! Special member synthesis.
//!
//! Every class ends pass 1 with a constructor, a copy constructor, a
//! destructor and an `operator=`. The ones the source omits are generated
//! here as ordinary member nodes and appended to the class, so later passes
//! and the evaluator treat them like user-written members:
//!
//! - constructor: no parameters, forwards to a parameterless base constructor
//! - copy constructor: one `C&` parameter, forwards it to the base copy constructor
//! - destructor: empty body
//! - `operator=`: returns `C&`, takes one `C&` parameter, empty body
//!
//! Generated nodes are marked `NodeOrigin::Synthesized`; the evaluator
//! gives the synthesized copy constructor and `operator=` memberwise copy
//! semantics.

use crate::{
    ast::ast::{Node, NodeKind},
    symbols::symbol::FunctionRole,
    MK_NODE,
};

/// Name of the parameter of generated copy constructors and assignment operators.
pub const OTHER: &str = "other";

/// The superclass as seen by synthesis.
pub struct BaseClass<'a> {
    pub name: &'a str,
    /// Parameter count of the superclass constructor.
    pub constructor_arity: Option<usize>,
}

fn class_reference(class: &str) -> Node {
    MK_NODE!(NodeKind::ClassType, class, [MK_NODE!(NodeKind::Ref, "&")])
}

fn other_params(class: &str) -> Node {
    MK_NODE!(
        NodeKind::Params,
        [MK_NODE!(NodeKind::Param, OTHER, [class_reference(class)])]
    )
}

fn constructor(class: &str, base: Option<&BaseClass>) -> Node {
    let mut node = MK_NODE!(NodeKind::Constructor, class, [MK_NODE!(NodeKind::Params)]);

    // A base constructor that needs arguments cannot be called implicitly
    if let Some(base) = base.filter(|base| base.constructor_arity.unwrap_or(0) == 0) {
        node.push(MK_NODE!(
            NodeKind::BaseInit,
            base.name,
            [MK_NODE!(NodeKind::Args)]
        ));
    }

    node.push(MK_NODE!(NodeKind::Block));
    node
}

fn copy_constructor(class: &str, base: Option<&BaseClass>) -> Node {
    let mut node = MK_NODE!(NodeKind::CopyConstructor, class, [other_params(class)]);

    if let Some(base) = base {
        node.push(MK_NODE!(
            NodeKind::BaseInit,
            base.name,
            [MK_NODE!(NodeKind::Args, [MK_NODE!(NodeKind::Id, OTHER)])]
        ));
    }

    node.push(MK_NODE!(NodeKind::Block));
    node
}

fn destructor(class: &str) -> Node {
    MK_NODE!(NodeKind::Destructor, class, [MK_NODE!(NodeKind::Block)])
}

fn assign_operator(class: &str) -> Node {
    MK_NODE!(
        NodeKind::Operator,
        "operator=",
        [
            class_reference(class),
            other_params(class),
            MK_NODE!(NodeKind::Block)
        ]
    )
}

/// Appends the special members `class` lacks and returns their roles.
pub fn synthesize_missing_members(class: &mut Node, base: Option<&BaseClass>) -> Vec<FunctionRole> {
    let name = class.value().to_string();
    let mut synthesized = vec![];

    for role in FunctionRole::SPECIAL {
        let Some(kind) = role.kind() else {
            continue;
        };
        if class.has_child(kind) {
            continue;
        }

        let member = match role {
            FunctionRole::Constructor => constructor(&name, base),
            FunctionRole::CopyConstructor => copy_constructor(&name, base),
            FunctionRole::Destructor => destructor(&name),
            _ => assign_operator(&name),
        };

        tracing::debug!(class = %name, member = role.describe(), "synthesized special member");
        class.push(member.synthesized());
        synthesized.push(role);
    }

    synthesized
}
