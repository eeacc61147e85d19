//! Duplicate declaration errors
#[path = "../common.rs"]
mod common;
use common::*;

// Classes
#[test]
fn duplicate_class() { check_should_fail_with(&with_main("class A { } class A { }"), DiagnosticKind::DuplicateClass, "class 'A' is already declared"); }

#[test]
fn class_reuses_main_class_name() { check_should_fail_with(&with_main("class Main { }"), DiagnosticKind::DuplicateClass, "class 'Main'"); }

#[test]
fn duplicate_class_points_at_second_declaration() {
    let src = with_main("class A { }\nclass A { }");
    let diags = analyze(&src);
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].span.start, src.rfind('A').unwrap());
    assert!(diags[0].note.is_some());
}

// Fields
#[test]
fn duplicate_field() { check_should_fail_with(&with_main("class A { int x; boolean x; }"), DiagnosticKind::DuplicateVariable, "field 'x' is already declared in class 'A'"); }

#[test]
fn same_field_name_in_two_classes() { check_should_pass(&with_main("class A { int x; } class B { boolean x; }")); }

#[test]
fn first_field_declaration_wins() {
    // `x` keeps type int, so assigning an int is fine and the only error is the duplicate.
    let src = with_main("class A { int x; boolean x; public int f() { x = 1; return x; } }");
    assert_eq!(kinds(&src), vec![DiagnosticKind::DuplicateVariable]);
}

// Methods
#[test]
fn duplicate_method() { check_should_fail_with(&with_main("class A { public int f() { return 1; } public int f() { return 2; } }"), DiagnosticKind::DuplicateMethod, "method 'f' is already declared in class 'A'"); }

#[test]
fn later_method_declaration_shadows() {
    let src = with_main(
        "class A { public int f() { return 1; } public boolean f() { return true; } public int g() { return this.f(); } }",
    );
    let found = kinds(&src);
    assert!(found.contains(&DiagnosticKind::DuplicateMethod), "{found:?}");
    assert!(found.contains(&DiagnosticKind::ReturnTypeMismatch), "{found:?}");
}

#[test]
fn field_and_method_may_share_a_name() { check_should_pass(&with_main("class A { int f; public int f() { return f; } }")); }

// Parameters and locals
#[test]
fn duplicate_parameter() { check_should_fail_with(&with_main("class A { public int f(int a, boolean a) { return 0; } }"), DiagnosticKind::DuplicateVariable, "parameter 'a' is already declared in method 'f'"); }

#[test]
fn duplicate_local() { check_should_fail_with(&with_main("class A { public int f() { int x; int x; return 0; } }"), DiagnosticKind::DuplicateVariable, "variable 'x' is already declared in this method"); }

#[test]
fn local_redeclares_parameter() { check_should_fail_with(&with_main("class A { public int f(int p) { boolean p; return 0; } }"), DiagnosticKind::DuplicateVariable, "variable 'p'"); }

#[test]
fn local_in_nested_block_redeclares_outer_local() { check_should_fail_with(&with_main("class A { public int f() { int t; { boolean t; } return 0; } }"), DiagnosticKind::DuplicateVariable, "variable 't'"); }

#[test]
fn local_may_shadow_field() { check_should_pass(&with_main("class A { int x; public int f() { boolean x; x = true; return 0; } }")); }

#[test]
fn sibling_blocks_reuse_a_name() { check_should_pass(&with_main("class A { public int f() { { int t; t = 1; } { boolean t; t = true; } return 0; } }")); }

#[test]
fn parameter_names_are_per_method() { check_should_pass(&with_main("class A { public int f(int a) { return a; } public boolean g(boolean a) { return a; } }")); }
