use super::{
    ast::{Node, NodeKind, NodeOrigin},
    types::{is_value_type, BuiltInFunction, BuiltInType},
};
use crate::MK_NODE;

fn constructor() -> Node {
    MK_NODE!(
        NodeKind::Constructor,
        "C",
        [
            MK_NODE!(
                NodeKind::Params,
                [MK_NODE!(NodeKind::Param, "v", [MK_NODE!(NodeKind::Int)])]
            ),
            MK_NODE!(NodeKind::Block)
        ]
    )
}

#[test]
fn test_node_accessors() {
    let node = constructor();

    assert_eq!(node.value(), "C");
    assert_eq!(node.params().len(), 1);
    assert!(node.args().is_empty());
    assert!(node.body().is_some());
    assert_eq!(node.params()[0].type_node().unwrap().type_name(), "int");
    assert_eq!(MK_NODE!(NodeKind::Block).value(), "");
}

#[test]
fn test_type_names() {
    assert_eq!(MK_NODE!(NodeKind::Char).type_name(), "char");
    assert_eq!(MK_NODE!(NodeKind::ClassType, "Shape").type_name(), "Shape");

    let reference = MK_NODE!(NodeKind::Int, [MK_NODE!(NodeKind::Ref, "&")]);
    assert!(reference.is_reference());
    assert!(!MK_NODE!(NodeKind::Int).is_reference());
}

#[test]
fn test_synthesized_marks_descendants() {
    let node = constructor().synthesized();

    assert!(node.is_synthesized());
    assert_eq!(node.children[0].children[0].origin, NodeOrigin::Synthesized);
    assert!(!constructor().is_synthesized());
}

#[test]
fn test_literals_and_lvalues() {
    assert!(MK_NODE!(NodeKind::Int, "3").is_literal());
    assert!(MK_NODE!(NodeKind::Null).is_literal());
    assert!(!MK_NODE!(NodeKind::Int).is_literal());
    assert!(!MK_NODE!(NodeKind::Id, "x").is_literal());

    assert!(MK_NODE!(NodeKind::Id, "x").is_lvalue());
    assert!(MK_NODE!(NodeKind::ArrayItem, "a").is_lvalue());
    assert!(!MK_NODE!(NodeKind::Int, "3").is_lvalue());
}

#[test]
fn test_kind_families() {
    assert_eq!(NodeKind::Mod.operation(), "calculation");
    assert_eq!(NodeKind::LessEqual.operation(), "comparison");
    assert_eq!(NodeKind::Not.operation(), "logical");
    assert_eq!(NodeKind::DecInc.operation(), "increment");

    assert!(NodeKind::Operator.opens_scope());
    assert!(NodeKind::Block.opens_scope());
    assert!(!NodeKind::AbstractFn.opens_scope());
    assert!(NodeKind::ClassType.is_type());
    assert!(!NodeKind::ClassType.is_builtin_type());
}

#[test]
fn test_builtin_names() {
    assert_eq!(BuiltInType::from_name("bool"), Some(BuiltInType::Bool));
    assert_eq!(BuiltInType::from_name("C"), None);
    assert_eq!(BuiltInType::from_kind(NodeKind::Void), Some(BuiltInType::Void));
    assert!(is_value_type("char"));
    assert!(!is_value_type("void"));

    assert_eq!(
        BuiltInFunction::from_name("print_bool").map(BuiltInFunction::parameter),
        Some(BuiltInType::Bool)
    );
    assert_eq!(BuiltInFunction::from_name("print"), None);
}
