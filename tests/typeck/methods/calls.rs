//! Method lookup, arity, and argument types
#[path = "../common.rs"]
mod common;
use common::*;

const CALLEE: &str = "class B { public int g(int x, boolean y) { return x; } public int one(int x) { return x; } public B self() { return this; } public int num() { return 1; } }";

fn call(stmts: &str, ret_ty: &str, ret: &str) -> String {
    with_main(&format!(
        "class A {{ int i; boolean b; int[] xs; B o;\n public {ret_ty} f() {{ {stmts} return {ret}; }} }}\n{CALLEE}"
    ))
}

// Lookup
#[test]
fn undefined_method() { check_should_fail_with(&call("", "int", "o.h()"), DiagnosticKind::UndefinedMethod, "method 'h' is not declared for type 'B'"); }

#[test]
fn undefined_method_on_this() { check_should_fail_with(&call("", "int", "this.zFunc()"), DiagnosticKind::UndefinedMethod, "method 'zFunc' is not declared for type 'A'"); }

#[test]
fn method_on_int_variable() { check_should_fail_with(&call("", "int", "i.g(1, true)"), DiagnosticKind::UndefinedMethod, "method 'g' is not declared for type 'int'"); }

#[test]
fn method_on_array() { check_should_fail_with(&call("", "int", "xs.num()"), DiagnosticKind::UndefinedMethod, "type 'int[]'"); }

#[test]
fn member_on_primitive_return() { check_should_fail_with(&call("", "int", "o.num().num()"), DiagnosticKind::InvalidMemberOnReturn, "invalid member 'num' on return of 'num()' (type int)"); }

#[test]
fn missing_member_on_object_return() { check_should_fail_with(&call("", "int", "o.self().h()"), DiagnosticKind::InvalidMemberOnReturn, "invalid member 'h' on return of 'self()' (type B)"); }

#[test]
fn chained_calls() { check_should_pass(&call("", "int", "o.self().self().g(o.num(), b)")); }

#[test]
fn call_on_new_object() { check_should_pass(&call("", "int", "new B().one(3)")); }

#[test]
fn method_declared_later_in_file() { check_should_pass(&with_main("class A { public int f() { return new Z().z(); } } class Z { public int z() { return 0; } }")); }

#[test]
fn recursive_call() { check_should_pass(&with_main("class A { public int fact(int n) { int r; if (n < 2) r = 1; else r = n * this.fact(n - 1); return r; } }")); }

// Arity
#[test]
fn too_few_arguments() { check_should_fail_with(&call("", "int", "o.g(1)"), DiagnosticKind::ArgumentCountMismatch, "method 'g' expects 2 arguments, 1 given"); }

#[test]
fn too_many_arguments() { check_should_fail_with(&call("", "int", "o.one(1, 2)"), DiagnosticKind::ArgumentCountMismatch, "method 'one' expects 1 argument, 2 given"); }

#[test]
fn no_arguments_given() { check_should_fail_with(&call("", "int", "o.one()"), DiagnosticKind::ArgumentCountMismatch, "expects 1 argument, 0 given"); }

#[test]
fn arity_error_points_to_declaration() {
    let diags = analyze(&call("", "int", "o.g(1)"));
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].note.as_ref().map(|n| n.node.as_str()), Some("declared here"));
}

// Argument types
#[test]
fn second_argument_wrong() { check_should_fail_with(&call("", "int", "o.g(1, 2)"), DiagnosticKind::ArgumentTypeMismatch, "invalid 2nd argument to 'g': expected boolean, found int"); }

#[test]
fn first_argument_wrong() { check_should_fail_with(&call("", "int", "o.one(b)"), DiagnosticKind::ArgumentTypeMismatch, "invalid 1st argument to 'one': expected int, found boolean"); }

#[test]
fn object_argument_for_int() { check_should_fail_with(&call("", "int", "o.one(o)"), DiagnosticKind::ArgumentTypeMismatch, "expected int, found B"); }

#[test]
fn swapped_arguments_report_each_position() { assert_eq!(kinds(&call("", "int", "o.g(b, i)")), vec![DiagnosticKind::ArgumentTypeMismatch; 2]); }

#[test]
fn argument_mismatch_names_the_parameter() {
    let diags = analyze(&call("", "int", "o.g(1, 2)"));
    assert_eq!(diags[0].note.as_ref().map(|n| n.node.as_str()), Some("parameter 'y' declared here"));
}

// Bad calls are unknown and stay quiet
#[test]
fn bad_call_does_not_cascade_into_assignment() { assert_eq!(kinds(&call("b = o.g(1);", "int", "0")), vec![DiagnosticKind::ArgumentCountMismatch]); }

#[test]
fn bad_argument_does_not_cascade_into_return() { assert_eq!(kinds(&call("", "boolean", "o.one(b)")), vec![DiagnosticKind::ArgumentTypeMismatch]); }

#[test]
fn unknown_argument_is_not_reported_again() { assert_eq!(kinds(&call("", "int", "o.one(nope)")), vec![DiagnosticKind::UndefinedVariable]); }

#[test]
fn arguments_are_checked_even_when_method_is_missing() {
    let found = kinds(&call("", "int", "o.h(i + b)"));
    assert_eq!(found, vec![DiagnosticKind::UndefinedMethod, DiagnosticKind::OperandTypeMismatch]);
}

#[test]
fn valid_call_returns_declared_type() { check_should_fail_with(&call("", "boolean", "o.num()"), DiagnosticKind::ReturnTypeMismatch, "method 'f' must return boolean, found int"); }
