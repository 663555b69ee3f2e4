//! Unit tests for the parser module.
//!
//! This module contains tests for parsing various language constructs including:
//! - Variable, array and reference declarations
//! - Function definitions, prototypes and abstract methods
//! - Expressions and operator precedence
//! - Control flow statements
//! - Class definitions and their special members

use std::rc::Rc;

use super::parser::parse;
use crate::{
    ast::ast::{Node, NodeKind},
    lexer::lexer::tokenize,
    MK_NODE,
};

fn parse_source(source: &str) -> Node {
    let tokens = tokenize(source.to_string(), Some("test.cpp".to_string())).unwrap();
    parse(tokens, Rc::new("test.cpp".to_string())).unwrap()
}

fn parse_failure(source: &str) -> String {
    let tokens = tokenize(source.to_string(), Some("test.cpp".to_string())).unwrap();
    parse(tokens, Rc::new("test.cpp".to_string()))
        .unwrap_err()
        .get_error_name()
        .to_string()
}

/// The first statement of `main`'s body.
fn first_stmt(body: &str) -> Node {
    let program = parse_source(&format!("int main() {{ {} }}", body));
    program.children[0].body().unwrap().children[0].clone()
}

#[test]
fn test_parse_variable_declaration() {
    let program = parse_source("int x = 42;");

    assert_eq!(
        program,
        MK_NODE!(
            NodeKind::Program,
            [MK_NODE!(
                NodeKind::VarDecl,
                "x",
                [MK_NODE!(NodeKind::Int), MK_NODE!(NodeKind::Int, "42")]
            )]
        )
    );
}

#[test]
fn test_parse_declaration_without_initializer() {
    let program = parse_source("bool flag; char c = 'z';");

    assert_eq!(program.children[0].kind, NodeKind::VarDecl);
    assert_eq!(program.children[0].children.len(), 1);
    assert_eq!(program.children[1].children[1], MK_NODE!(NodeKind::Char, "z"));
}

#[test]
fn test_parse_reference_declaration() {
    let stmt = first_stmt("int &r = x;");

    assert_eq!(
        stmt,
        MK_NODE!(
            NodeKind::VarRef,
            "r",
            [
                MK_NODE!(NodeKind::Int, [MK_NODE!(NodeKind::Ref, "&")]),
                MK_NODE!(NodeKind::Id, "x")
            ]
        )
    );
}

#[test]
fn test_parse_array_declarations() {
    let program = parse_source("int a[3][2]; int b[] = {1, 2}; int c[2][2] = {{1, 2}, {3, 4}};");

    let a = &program.children[0];
    assert_eq!(a.kind, NodeKind::ArrayDecl);
    assert_eq!(a.dims().len(), 2);

    let b = &program.children[1];
    assert_eq!(b.kind, NodeKind::ArrayInit);
    assert!(b.dims().is_empty());
    assert_eq!(b.find(NodeKind::Array).unwrap().children.len(), 2);

    let c = &program.children[2];
    let literal = c.find(NodeKind::Array).unwrap();
    assert_eq!(literal.children[1].kind, NodeKind::Array);
    assert_eq!(literal.children[1].children[0], MK_NODE!(NodeKind::Int, "3"));

    let open = parse_source("int d[][2] = {{1, 2}};");
    let d = &open.children[0];
    assert_eq!(d.kind, NodeKind::ArrayInit);
    assert!(d.dims().is_empty());
}

#[test]
fn test_parse_array_reference() {
    let stmt = first_stmt("int (&r)[3] = a;");

    assert_eq!(stmt.kind, NodeKind::ArrayRef);
    assert_eq!(stmt.value(), "r");
    assert!(stmt.type_node().unwrap().is_reference());
    assert_eq!(stmt.dims().len(), 1);
    assert_eq!(stmt.last().unwrap(), &MK_NODE!(NodeKind::Id, "a"));
}

#[test]
fn test_parse_function_declaration() {
    let program = parse_source("int add(int a, int &b) { return a + b; }");
    let function = &program.children[0];

    assert_eq!(function.kind, NodeKind::FnDecl);
    assert_eq!(function.value(), "add");
    assert_eq!(function.type_node().unwrap().kind, NodeKind::Int);
    assert_eq!(function.params().len(), 2);
    assert!(function.params()[1].type_node().unwrap().is_reference());
    assert_eq!(
        function.body().unwrap().children[0],
        MK_NODE!(
            NodeKind::Return,
            [MK_NODE!(
                NodeKind::Add,
                [MK_NODE!(NodeKind::Id, "a"), MK_NODE!(NodeKind::Id, "b")]
            )]
        )
    );
}

#[test]
fn test_parse_prototype_and_void_params() {
    let program = parse_source("void f(void); int g();");

    assert_eq!(program.children[0].kind, NodeKind::FnDecl);
    assert!(program.children[0].body().is_none());
    assert!(program.children[0].params().is_empty());
    assert!(program.children[1].body().is_none());
}

#[test]
fn test_parse_construction_declarations() {
    let program = parse_source("C c(1, 2); int x(5); C d(x);");

    assert_eq!(
        program.children[0],
        MK_NODE!(
            NodeKind::VarDecl,
            "c",
            [
                MK_NODE!(NodeKind::ClassType, "C"),
                MK_NODE!(
                    NodeKind::FnCall,
                    "C",
                    [MK_NODE!(
                        NodeKind::Args,
                        [MK_NODE!(NodeKind::Int, "1"), MK_NODE!(NodeKind::Int, "2")]
                    )]
                )
            ]
        )
    );
    assert_eq!(program.children[1].children[1], MK_NODE!(NodeKind::Int, "5"));
    assert_eq!(program.children[2].children[1].kind, NodeKind::FnCall);
}

#[test]
fn test_parse_precedence() {
    let stmt = first_stmt("x = 1 + 2 * 3 - 4;");

    assert_eq!(
        stmt,
        MK_NODE!(
            NodeKind::Assign,
            "=",
            [
                MK_NODE!(NodeKind::Id, "x"),
                MK_NODE!(
                    NodeKind::Sub,
                    [
                        MK_NODE!(
                            NodeKind::Add,
                            [
                                MK_NODE!(NodeKind::Int, "1"),
                                MK_NODE!(
                                    NodeKind::Mul,
                                    [MK_NODE!(NodeKind::Int, "2"), MK_NODE!(NodeKind::Int, "3")]
                                )
                            ]
                        ),
                        MK_NODE!(NodeKind::Int, "4")
                    ]
                )
            ]
        )
    );
}

#[test]
fn test_parse_logical_precedence() {
    let stmt = first_stmt("b = x < 1 || y == 2 && !z;");
    let or = &stmt.children[1];

    assert_eq!(or.kind, NodeKind::Or);
    assert_eq!(or.children[0].kind, NodeKind::Less);
    assert_eq!(or.children[1].kind, NodeKind::And);
    assert_eq!(or.children[1].children[1].kind, NodeKind::Not);
}

#[test]
fn test_parse_assignment_is_right_associative() {
    let stmt = first_stmt("a = b += 2;");

    assert_eq!(stmt.value(), "=");
    assert_eq!(stmt.children[1].kind, NodeKind::Assign);
    assert_eq!(stmt.children[1].value(), "+=");
}

#[test]
fn test_parse_unary_minus() {
    assert_eq!(first_stmt("x = -5;").children[1], MK_NODE!(NodeKind::Int, "-5"));
    assert_eq!(
        first_stmt("x = -y;").children[1],
        MK_NODE!(
            NodeKind::Sub,
            [MK_NODE!(NodeKind::Int, "0"), MK_NODE!(NodeKind::Id, "y")]
        )
    );
}

#[test]
fn test_parse_increments() {
    assert_eq!(
        first_stmt("++i;"),
        MK_NODE!(
            NodeKind::DecInc,
            [MK_NODE!(NodeKind::Inc, "++"), MK_NODE!(NodeKind::Id, "i")]
        )
    );
    assert_eq!(
        first_stmt("i--;"),
        MK_NODE!(
            NodeKind::DecInc,
            [MK_NODE!(NodeKind::Id, "i"), MK_NODE!(NodeKind::Dec, "--")]
        )
    );
}

#[test]
fn test_parse_member_chains() {
    let stmt = first_stmt("a.b->c(1);");

    assert_eq!(stmt.kind, NodeKind::ObjUsage);
    assert_eq!(stmt.children[0].kind, NodeKind::ObjUsage);
    assert_eq!(stmt.children[0].children[1], MK_NODE!(NodeKind::Id, "b"));
    assert_eq!(stmt.children[1].kind, NodeKind::FnCall);
    assert_eq!(stmt.children[1].args().len(), 1);
}

#[test]
fn test_parse_this_forms() {
    let stmt = first_stmt("return *this;");
    assert_eq!(stmt.children[0], MK_NODE!(NodeKind::This, "*this"));

    let stmt = first_stmt("this->x = 1;");
    assert_eq!(stmt.children[0].children[0], MK_NODE!(NodeKind::This, "this"));
}

#[test]
fn test_parse_array_items() {
    let stmt = first_stmt("m[i][j + 1] = a[0];");

    let target = &stmt.children[0];
    assert_eq!(target.kind, NodeKind::ArrayItem);
    assert_eq!(target.value(), "m");
    assert_eq!(target.children.len(), 2);
    assert_eq!(stmt.children[1].kind, NodeKind::ArrayItem);
}

#[test]
fn test_parse_new_expression() {
    let stmt = first_stmt("C c = new C(3);");

    assert_eq!(stmt.children[1].kind, NodeKind::FnCall);
    assert_eq!(stmt.children[1].value(), "C");
    assert_eq!(stmt.children[1].args().len(), 1);
}

#[test]
fn test_parse_if_else_chain() {
    let stmt = first_stmt("if (a) x = 1; else if (b) { x = 2; } else { x = 3; }");

    assert_eq!(stmt.kind, NodeKind::If);
    let kinds = stmt.children.iter().map(|child| child.kind).collect::<Vec<_>>();
    assert_eq!(
        kinds,
        vec![
            NodeKind::Id,
            NodeKind::Block,
            NodeKind::Id,
            NodeKind::Block,
            NodeKind::Block
        ]
    );
}

#[test]
fn test_parse_while_loop() {
    let stmt = first_stmt("while (i < 10) { i = i + 1; }");

    assert_eq!(stmt.kind, NodeKind::While);
    assert_eq!(stmt.children[0].kind, NodeKind::Less);
    assert_eq!(stmt.children[1].kind, NodeKind::Block);
}

#[test]
fn test_parse_nested_block_and_declaration_statements() {
    let program = parse_source("int main() { { C c; C &r = c; } return 0; }");
    let body = program.children[0].body().unwrap();

    assert_eq!(body.children[0].kind, NodeKind::Block);
    assert_eq!(body.children[0].children[0].kind, NodeKind::VarDecl);
    assert_eq!(body.children[0].children[1].kind, NodeKind::VarRef);
    assert_eq!(body.children[1].kind, NodeKind::Return);
}

#[test]
fn test_parse_class_definition() {
    let source = r"
        class B : public A {
        public:
            int x;
            B(int v) : A(v) { x = v; }
            B(const B &other) : A(other) { x = other.x; }
            ~B() {}
            B& operator=(const B &other) { x = other.x; return *this; }
            virtual int get() { return x; }
            virtual void draw() = 0;
        };
    ";
    let program = parse_source(source);
    let class = &program.children[0];

    assert_eq!(class.kind, NodeKind::Class);
    assert_eq!(class.value(), "B");
    let kinds = class.children.iter().map(|child| child.kind).collect::<Vec<_>>();
    assert_eq!(
        kinds,
        vec![
            NodeKind::Extends,
            NodeKind::VarDecl,
            NodeKind::Constructor,
            NodeKind::CopyConstructor,
            NodeKind::Destructor,
            NodeKind::Operator,
            NodeKind::FnDecl,
            NodeKind::AbstractFn,
        ]
    );

    let constructor = &class.children[2];
    assert_eq!(
        constructor.find(NodeKind::BaseInit).unwrap().value(),
        "A"
    );
    assert_eq!(class.children[5].value(), "operator=");
    assert_eq!(class.children[7].last().unwrap(), &MK_NODE!(NodeKind::Int, "0"));
}

#[test]
fn test_parse_errors() {
    assert_eq!(parse_failure("int x = ;"), "UnexpectedToken");
    assert_eq!(parse_failure("int main() { int x = 1 }"), "UnexpectedToken");
    assert_eq!(parse_failure("int &r;"), "UnexpectedTokenDetailed");
    assert_eq!(parse_failure("class C { int x; }"), "UnexpectedToken");
    assert_eq!(parse_failure("int x = 99999999999;"), "NumberParseError");
    assert_eq!(parse_failure("int main() { 5(); }"), "UnexpectedTokenDetailed");
}
