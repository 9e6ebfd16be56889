// tests/check_integration.rs
//
// End-to-end checks over full source programs: parse, analyze, and assert
// on the diagnostics that come back through the public API.

use shrew::frontend::Parser;
use shrew::sema::{Analyzer, TypeError};

fn analyze(source: &str) -> Result<(), Vec<TypeError>> {
    let mut parser = Parser::new(source);
    let root = parser.parse_program().expect("parse failed");
    assert!(
        parser.take_lexer_errors().is_empty(),
        "unexpected lexer errors"
    );
    let (ast, interner) = parser.into_parts();
    let mut analyzer = Analyzer::new(&ast, &interner);
    analyzer.analyze(root)
}

fn messages(source: &str) -> Vec<String> {
    analyze(source)
        .expect_err("expected semantic errors")
        .iter()
        .map(|e| e.error.to_string())
        .collect()
}

#[test]
fn well_formed_program_passes() {
    let source = r#"
        interface Shape {
            double area();
        }

        class Rect implements Shape {
            double w;
            double h;
            double area() { return this.w * this.h; }
        }

        class Square extends Rect {
            double area() { return this.w * this.w; }
        }

        void main() {
            Shape s;
            double total;
            s = new Square;
            total = total + s.area();
            Print("total is computed");
        }
    "#;
    assert!(analyze(source).is_ok());
}

#[test]
fn undeclared_variable_scenario() {
    let errors = analyze("void main() { x = 5; }").expect_err("expected an error");
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].error.to_string(),
        "No declaration found for variable 'x'"
    );
}

#[test]
fn interface_not_implemented_scenario() {
    let msgs = messages("interface I { void f(); }\nclass C implements I { }");
    assert_eq!(msgs, vec!["Class 'C' does not implement entire interface 'I'"]);
}

#[test]
fn override_mismatch_scenario() {
    let msgs = messages(
        "class A { int f() { return 0; } }\nclass B extends A { bool f() { return true; } }",
    );
    assert_eq!(msgs, vec!["Method 'f' must match inherited type signature"]);
}

#[test]
fn array_subscript_scenario_has_no_cascade() {
    let source = r#"
        void main() {
            int[] a;
            a = NewArray(3, int);
            a[true] = 1;
        }
    "#;
    let msgs = messages(source);
    assert_eq!(msgs, vec!["Array subscript must be an integer"]);
}

#[test]
fn break_outside_loop_scenario() {
    let msgs = messages("void f() { break; }");
    assert_eq!(msgs, vec!["break is only allowed inside a loop"]);
}

#[test]
fn incompatible_return_scenario() {
    let msgs = messages("int f() { return \"hi\"; }");
    assert_eq!(msgs, vec!["Incompatible return: string given, int expected"]);
}

#[test]
fn diagnostics_are_ordered_and_counted() {
    let source = r#"
        void f() {
            a = 1;
            if (2) { }
            b = true;
        }
    "#;
    let errors = analyze(source).expect_err("expected errors");
    assert_eq!(errors.len(), 3);
    let positions: Vec<(u32, u32)> = errors.iter().map(|e| (e.span.line, e.span.column)).collect();
    let mut sorted = positions.clone();
    sorted.sort_unstable();
    assert_eq!(positions, sorted);
}

#[test]
fn repeated_analysis_is_byte_identical() {
    let source = r#"
        interface I { int f(int a); }
        class C implements I { int f(bool a) { return 0; } }
        void main() {
            C c;
            c = new C;
            c.missing();
            ghost(1, 2);
        }
    "#;
    let first = messages(source);
    let second = messages(source);
    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn mixed_program_reports_each_family() {
    let source = r#"
        interface Walker { void walk(); }

        class Animal {
            int legs;
            void describe() { Print(this.legs); }
        }

        class Dog extends Animal implements Walker {
        }

        void main() {
            Dog d;
            d = new Dog;
            d.walk();
            while (1) { }
        }
    "#;
    let msgs = messages(source);
    assert_eq!(msgs.len(), 3);
    assert!(msgs.contains(&"Class 'Dog' does not implement entire interface 'Walker'".to_string()));
    assert!(msgs.contains(&"Test expression must have boolean type".to_string()));
    // the interface promises walk() but nothing declares it, so the call site
    // fails member lookup as well
    assert!(msgs.contains(&"Dog has no such field 'walk'".to_string()));
}

#[test]
fn field_privacy_is_enforced_outside_the_class() {
    let source = r#"
        class Point {
            int x;
            int get() { return this.x; }
        }
        void main() {
            Point p;
            int v;
            p = new Point;
            v = p.get();
            v = p.x;
        }
    "#;
    let msgs = messages(source);
    assert_eq!(msgs, vec!["Point field 'x' only accessible within class scope"]);
}

#[test]
fn null_flows_into_reference_contexts() {
    let source = r#"
        class Node { }
        Node find(Node start) { return null; }
        void main() {
            Node n;
            bool b;
            n = null;
            b = n == null;
            n = find(null);
        }
    "#;
    assert!(analyze(source).is_ok());
}

#[test]
fn while_test_of_mixed_program_checks_in_order() {
    // a broken test expression does not stop the body from being checked
    let source = r#"
        void f() {
            while (1) {
                missing();
            }
        }
    "#;
    let msgs = messages(source);
    assert_eq!(
        msgs,
        vec![
            "Test expression must have boolean type",
            "No declaration found for function 'missing'"
        ]
    );
}
