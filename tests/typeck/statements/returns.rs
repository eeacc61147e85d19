//! Return expressions against declared return types
#[path = "../common.rs"]
mod common;
use common::*;

fn ret(ret_ty: &str, e: &str) -> String {
    with_main(&format!(
        "class A {{ int x; boolean y; int[] z; A self;\n public {ret_ty} f() {{ return {e}; }}\n public boolean flag() {{ return y; }}\n public int[] arr() {{ return z; }} }}"
    ))
}

#[test]
fn int_returns_boolean() { check_should_fail_with(&ret("int", "y"), DiagnosticKind::ReturnTypeMismatch, "method 'f' must return int, found boolean"); }

#[test]
fn int_returns_array() { check_should_fail_with(&ret("int", "z"), DiagnosticKind::ReturnTypeMismatch, "must return int, found int[]"); }

#[test]
fn boolean_returns_int() { check_should_fail_with(&ret("boolean", "x"), DiagnosticKind::ReturnTypeMismatch, "must return boolean, found int"); }

#[test]
fn boolean_returns_call_result() { check_should_fail_with(&ret("boolean", "this.arr()"), DiagnosticKind::ReturnTypeMismatch, "must return boolean, found int[]"); }

#[test]
fn array_returns_call_result() { check_should_fail_with(&ret("int[]", "this.flag()"), DiagnosticKind::ReturnTypeMismatch, "must return int[], found boolean"); }

#[test]
fn object_returns_int() { check_should_fail_with(&ret("A", "x"), DiagnosticKind::ReturnTypeMismatch, "must return A, found int"); }

#[test]
fn matching_returns() {
    check_should_pass(&ret("int", "x"));
    check_should_pass(&ret("boolean", "this.flag()"));
    check_should_pass(&ret("int[]", "z"));
    check_should_pass(&ret("A", "self"));
    check_should_pass(&ret("A", "this"));
    check_should_pass(&ret("A", "new A()"));
}

#[test]
fn return_error_points_at_return_expression() {
    let src = ret("int", "y");
    let diags = analyze(&src);
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].span.start, src.find("return y").unwrap() + "return ".len());
    assert_eq!(diags[0].note.as_ref().map(|n| n.node.as_str()), Some("return type declared here"));
}

#[test]
fn bad_index_in_return_reports_only_the_index() { assert_eq!(kinds(&ret("int", "z[this.flag()]")), vec![DiagnosticKind::InvalidArrayIndexType]); }

#[test]
fn return_may_use_locals() {
    let src = with_main("class A { public int f() { int sum; sum = 0; return sum; } }");
    check_should_pass(&src);
}
