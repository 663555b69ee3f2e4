use crate::{
    output::Output, pipeline::parse_source, resolver::resolver::resolve_references,
    scope_builder::scope_builder::build_scopes,
};

use super::{
    end_type::{end_type, normalize},
    type_checker::type_check,
};

fn check(source: &str) -> Vec<String> {
    let mut program = parse_source(source, "test.cpp").unwrap();
    let mut out = Output::default();
    let tree = build_scopes(&mut program, &mut out);
    resolve_references(&program, &tree, &mut out);
    assert!(!out.has_errors(), "passes 1 and 2: {:?}", out.lines());

    type_check(&program, &tree, &mut out);
    out.errors().map(String::from).collect()
}

#[test]
fn test_declaration_types() {
    let source = "int main() { bool b = 3; int i = 3 + 4; char c = 'c'; bool t = 1 < 2; return 0; }";

    assert_eq!(
        check(source),
        vec!["type mismatch in declaration of b: type bool cannot be int"]
    );
}

#[test]
fn test_invalid_operands() {
    let source = r"
        class C { };
        int main() {
            C c;
            int x = c + 1;
            if (c) { }
            c++;
            !c;
            return 0;
        }
    ";

    assert_eq!(
        check(source),
        vec![
            "invalid type C for calculation operation",
            "invalid type C for condition operation",
            "invalid type C for increment operation",
            "invalid type C for logical operation"
        ]
    );
}

#[test]
fn test_assignment_types() {
    let source = r"
        class A { };
        class B { };
        int main() {
            A a;
            B b;
            int x;
            bool f;
            x = f;
            x += 'c';
            a = b;
            a = nullptr;
            return 0;
        }
    ";

    assert_eq!(
        check(source),
        vec!["types A and B do not match in assignment"]
    );
}

#[test]
fn test_derived_classes_compare_as_their_root() {
    let source = r"
        class A { public: int v; };
        class B : public A { };
        int main() { B b; A a; a = b; A other = b; return 0; }
    ";

    assert!(check(source).is_empty());
}

#[test]
fn test_array_types() {
    let source = r"
        class C { };
        int main() {
            C c;
            int a[c];
            int b[2] = {1, 'c'};
            int m[2][2] = {{1, 2}, {3, true}};
            return 0;
        }
    ";

    assert_eq!(
        check(source),
        vec![
            "type C cannot describe array length",
            "type mismatch in initializer of array b: expected int, but got char",
            "type mismatch in initializer of array m: expected int, but got bool"
        ]
    );
}

#[test]
fn test_return_types() {
    let source = r"
        int noReturn() { }
        int bare() { return; }
        void valued() { return 1; }
        bool wrong() { return 1; }
        int branches(int x) { if (x) { return 1; } else { return false; } }
        int main() { return 0; }
    ";

    assert_eq!(
        check(source),
        vec![
            "function noReturn expects return type int, but got void",
            "function bare expects return type int, but got void",
            "return type mismatch in valued: expected void, but got int",
            "return type mismatch in wrong: expected bool, but got int",
            "return type mismatch in branches: expected int, but got bool"
        ]
    );
}

#[test]
fn test_main_may_omit_return() {
    assert!(check("int main() { print_int(1); }").is_empty());
}

#[test]
fn test_argument_types() {
    let source = r"
        class P { public: int v; };
        void take(P p) { }
        void swap(int &a, int &b) { }
        int main() {
            int x;
            P p;
            take(p);
            take(1);
            swap(x, x);
            swap(x, 2);
            print_int(p);
            print_bool(3);
            return 0;
        }
    ";

    assert_eq!(
        check(source),
        vec![
            "argument type mismatch at function take: expected P, but got int",
            "reference parameter b of swap must be bound to a variable",
            "argument type mismatch at function print_int: expected int, but got P"
        ]
    );
}

#[test]
fn test_method_argument_types() {
    let source = r"
        class A { public: int add(int a, A other) { return a; } };
        int add(int a, int b) { return a + b; }
        int main() { A x; x.add(1, 2); return add(1, 2); }
    ";

    assert_eq!(
        check(source),
        vec!["argument type mismatch at function add: expected A, but got int"]
    );
}

#[test]
fn test_construction_argument_types() {
    let source = r"
        class Q { };
        class P { public: int v; P(int x) { v = x; } };
        int main() { Q q; P a(true); P b('c'); P c(a); P e(q); return 0; }
    ";

    assert_eq!(
        check(source),
        vec!["argument type mismatch at function P: expected int, but got Q"]
    );
}

#[test]
fn test_synthesized_members_check_cleanly() {
    let source = r"
        class A { public: int v; A(int x) { v = x; } };
        class B : public A { public: B() : A(1) { } };
        int main() { B b; B copy(b); return 0; }
    ";

    assert!(check(source).is_empty());
}

#[test]
fn test_end_type_is_root_normalized() {
    let source = r"
        class A { };
        class B : public A { };
        B global;
        int main() { return 0; }
    ";
    let mut program = parse_source(source, "test.cpp").unwrap();
    let tree = build_scopes(&mut program, &mut Output::default());

    assert_eq!(end_type(&tree, &program.children[2]), Some(String::from("A")));
    assert_eq!(normalize(&tree, &program, "B"), "A");
    assert_eq!(normalize(&tree, &program, "int"), "int");
}
