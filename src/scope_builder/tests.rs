use crate::{
    ast::ast::{Node, NodeKind},
    output::Output,
    pipeline::parse_source,
    symbols::{
        scope::ScopeTree,
        symbol::{FunctionRole, SymbolKind},
    },
};

use super::scope_builder::build_scopes;

fn build(source: &str) -> (Node, ScopeTree, Vec<String>) {
    let mut program = parse_source(source, "test.cpp").unwrap();
    let mut out = Output::default();
    let tree = build_scopes(&mut program, &mut out);
    let errors = out.errors().map(String::from).collect();

    (program, tree, errors)
}

fn class_member_names(tree: &ScopeTree, class: &str) -> Vec<String> {
    let class = tree.resolve_class(tree.root(), class).unwrap();
    let scope = tree.symbol(class).class_scope().unwrap();
    tree.names(scope).into_iter().map(String::from).collect()
}

#[test]
fn test_shadowing_in_nested_blocks() {
    let source = "int x = 1; int main() { bool x = true; { char x = 'c'; } return 0; }";
    let (program, tree, errors) = build(source);

    assert!(errors.is_empty(), "{:?}", errors);

    let body = program.children[1].body().unwrap();
    let inner = &body.children[1];

    let in_inner = tree.resolve(inner.scope.unwrap(), "x").unwrap();
    let in_body = tree.resolve(body.scope.unwrap(), "x").unwrap();
    let global = tree.resolve(tree.root(), "x").unwrap();

    assert_eq!(tree.symbol(in_inner).declared_type, "char");
    assert_eq!(tree.symbol(in_body).declared_type, "bool");
    assert_eq!(tree.symbol(global).declared_type, "int");
}

#[test]
fn test_function_scopes_nest() {
    let (program, tree, _) = build("int f(int a) { int b = a; return b; }");
    let function = &program.children[0];

    let params = function.scope.unwrap();
    let body = function.body().unwrap().scope.unwrap();

    assert_eq!(tree.scope(body).parent, Some(params));
    assert_eq!(tree.names(params), vec!["a"]);
    assert_eq!(tree.names(body), vec!["b"]);
    assert_eq!(
        tree.scope(params).owner,
        tree.resolve(tree.root(), "f")
    );
}

#[test]
fn test_redeclaration_is_reported() {
    let (_, _, errors) = build("int x; int x; int main() { int y; int y; return 0; }");

    assert_eq!(
        errors,
        vec![
            "such symbol x already exists".to_string(),
            "such symbol y already exists".to_string()
        ]
    );
}

#[test]
fn test_unknown_type_is_reported() {
    let (_, _, errors) = build("Shape s; void v;");

    assert_eq!(errors, vec!["unknown type Shape", "unknown type void"]);
}

#[test]
fn test_synthesis_completeness() {
    let (program, tree, errors) = build("class C { int x; };");

    assert!(errors.is_empty(), "{:?}", errors);
    assert_eq!(
        class_member_names(&tree, "C"),
        vec!["C()", "C(C&)", "operator=", "x", "~C"]
    );

    let class = &program.children[0];
    assert_eq!(class.children.len(), 5);
    assert!(class.children[1..].iter().all(Node::is_synthesized));

    let class = tree.resolve_class(tree.root(), "C").unwrap();
    for role in FunctionRole::SPECIAL {
        assert!(tree.special_member(class, role).is_some(), "{:?}", role);
    }
    let copy = tree
        .special_member(class, FunctionRole::CopyConstructor)
        .unwrap();
    assert_eq!(tree.symbol(copy).param_count(), Some(1));
}

#[test]
fn test_user_members_suppress_synthesis() {
    let source = "class C { public: int v; C(int a, int b) { v = a + b; } ~C() {} };";
    let (program, tree, errors) = build(source);

    assert!(errors.is_empty(), "{:?}", errors);

    let class = &program.children[0];
    let synthesized = class
        .children
        .iter()
        .filter(|member| member.is_synthesized())
        .map(|member| member.kind)
        .collect::<Vec<_>>();
    assert_eq!(
        synthesized,
        vec![NodeKind::CopyConstructor, NodeKind::Operator]
    );

    let class = tree.resolve_class(tree.root(), "C").unwrap();
    let constructor = tree.special_member(class, FunctionRole::Constructor).unwrap();
    assert_eq!(tree.symbol(constructor).param_count(), Some(2));
}

#[test]
fn test_synthesized_members_forward_to_base() {
    let source = "class A { int a; }; class B : public A { int b; };";
    let (program, tree, errors) = build(source);

    assert!(errors.is_empty(), "{:?}", errors);

    let derived = &program.children[1];
    let constructor = derived.find(NodeKind::Constructor).unwrap();
    assert_eq!(constructor.find(NodeKind::BaseInit).unwrap().value(), "A");

    let copy = derived.find(NodeKind::CopyConstructor).unwrap();
    let base_init = copy.find(NodeKind::BaseInit).unwrap();
    assert_eq!(base_init.args()[0].value(), "other");

    let b = tree.resolve_class(tree.root(), "B").unwrap();
    let a = tree.resolve_class(tree.root(), "A").unwrap();
    assert_eq!(tree.symbol(b).superclass(), Some(a));
    assert_eq!(tree.root_type(tree.root(), "B"), "A");
}

#[test]
fn test_missing_base_constructor_call() {
    let source = r"
        class A { public: int a; A(int v) { a = v; } };
        class B : public A { };
        class D : public A { public: D() { } };
        class E : public A { public: E() : A(1) { } };
    ";
    let (_, _, errors) = build(source);

    assert_eq!(
        errors,
        vec![
            "constructor of B must call the constructor of A explicitly",
            "constructor of D must call the constructor of A explicitly",
        ]
    );
}

#[test]
fn test_special_member_checks() {
    let source = r"
        class A { };
        class C {
        public:
            D() { }
            ~E() { }
            C& operator=(int other) { return *this; }
            C(int x) : A() { }
        };
    ";
    let (_, _, errors) = build(source);

    assert!(errors.contains(&"constructor D does not match class C".to_string()));
    assert!(errors.contains(&"destructor ~E does not match class C".to_string()));
    assert!(errors.contains(&"operator= of class C must take a single C& parameter".to_string()));
    assert!(errors.contains(&"A is not the superclass of C".to_string()));
}

#[test]
fn test_class_cannot_extend_itself() {
    let (_, tree, errors) = build("class A : public A { };");

    assert_eq!(errors, vec!["unknown type A"]);
    let class = tree.resolve_class(tree.root(), "A").unwrap();
    assert_eq!(tree.symbol(class).superclass(), None);
}

#[test]
fn test_array_dimensions() {
    let source = "int n = 3; int a[n + 1][2]; int b[] = {1, 2, 3}; int m[][3] = {{1, 2, 3}, {4, 5, 6}};";
    let (_, tree, errors) = build(source);

    assert!(errors.is_empty(), "{:?}", errors);

    let dims = |name: &str| {
        let id = tree.resolve(tree.root(), name).unwrap();
        tree.symbol(id).dimensions().unwrap().to_vec()
    };
    assert_eq!(dims("a"), vec![Some(4), Some(2)]);
    assert_eq!(dims("b"), vec![Some(3)]);
    assert_eq!(dims("m"), vec![Some(2), Some(3)]);
}

#[test]
fn test_array_dimension_mismatch() {
    let (_, _, errors) = build("int c[2] = {{1}, {2}};");

    assert_eq!(
        errors,
        vec!["array c declares 1 dimensions but its initializer has 2"]
    );
}

#[test]
fn test_runtime_sized_array() {
    let (program, tree, errors) = build("int main() { int k; int a[k]; return 0; }");

    assert!(errors.is_empty(), "{:?}", errors);
    let body = program.children[0].body().unwrap().scope.unwrap();
    let a = tree.resolve(body, "a").unwrap();
    assert_eq!(tree.symbol(a).dimensions(), Some(&[None][..]));
}

#[test]
fn test_abstract_marker() {
    let source = "class S { public: virtual int area() = 0; virtual void draw() = 1; };";
    let (_, tree, errors) = build(source);

    assert_eq!(
        errors,
        vec!["abstract function draw must be marked with 0, found 1"]
    );

    let class = tree.resolve_class(tree.root(), "S").unwrap();
    let area = tree.lookup_member(class, "area").unwrap();
    assert_eq!(tree.symbol(area).role(), Some(FunctionRole::Abstract));
    assert!(!tree.symbol(area).is_defined());
}

#[test]
fn test_prototype_then_definition() {
    let source = "int f(int a); int main() { return f(1); } int f(int a) { return a; }";
    let (_, tree, errors) = build(source);

    assert!(errors.is_empty(), "{:?}", errors);
    let f = tree.resolve(tree.root(), "f").unwrap();
    assert!(tree.symbol(f).is_defined());
}

#[test]
fn test_references() {
    let source = "int x = 1; int &r = x; int &bad = 5; int a[2]; int (&ra)[2] = a;";
    let (_, tree, errors) = build(source);

    assert_eq!(errors, vec!["reference bad must be bound to a variable"]);

    let x = tree.resolve(tree.root(), "x").unwrap();
    let r = tree.resolve(tree.root(), "r").unwrap();
    assert_eq!(tree.symbol(r).kind, SymbolKind::Reference { origin: Some(x) });
    assert_eq!(tree.follow_references(r), x);

    let a = tree.resolve(tree.root(), "a").unwrap();
    let ra = tree.resolve(tree.root(), "ra").unwrap();
    assert_eq!(tree.follow_references(ra), a);
}

#[test]
fn test_literal_values_are_recorded() {
    let (_, tree, _) = build("int n = 4; char c = 'x'; int m = n;");

    let value = |name: &str| tree.symbol(tree.resolve(tree.root(), name).unwrap()).value;
    assert_eq!(value("n").map(|v| v.as_int()), Some(4));
    assert_eq!(value("c").map(|v| v.as_int()), Some('x' as i32));
    assert_eq!(value("m"), None);
}

#[test]
fn test_self_containing_attributes_are_incomplete() {
    let source = r"
        class N { public: int v; N next; N ring[2]; };
        class M { public: N inner; };
    ";
    let (_, tree, errors) = build(source);

    assert_eq!(
        errors,
        vec![
            "field next has incomplete type N",
            "field ring has incomplete type N"
        ]
    );
    assert!(class_member_names(&tree, "N").contains(&String::from("next")));
}

#[test]
fn test_local_read_before_declaration() {
    let source = r"
        int g = 1;
        class P { public: int get() { return v; } int v; };
        int main() {
            print_int(g);
            { print_int(x); int x = 2; }
            P p;
            p.v = 1;
            int v = 3;
            return 0;
        }
    ";
    let (_, _, errors) = build(source);

    assert_eq!(errors, vec!["variable x is used before its declaration"]);
}
