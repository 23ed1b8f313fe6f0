//! The frozen S1-S6 scenario fixtures, driven end to end through `Compiler::compile` rather than
//! against any single stage's artifact in isolation.

use fax_drv::Compiler;
use fax_ir::QuadKind;

#[test]
fn s1_constant_folds_and_propagates_to_a_literal_print() {
    let report = Compiler::new(true)
        .compile("function main() { int x = 2 + 3; print(x); }")
        .unwrap();
    assert!(report.success);

    // Unoptimized: Label func_main, Arithmetic + 2 3 -> t0, Assignment t0 -> x, Write x, Return 0.
    let ir = report.intermediate_code.unwrap();
    let quads = &ir.quadruples;
    assert_eq!(quads.len(), 5);
    assert_eq!(quads[0].kind, QuadKind::Label);
    assert_eq!(quads[0].result.as_deref(), Some("func_main"));
    assert_eq!(quads[1].kind, QuadKind::Arithmetic);
    assert_eq!(quads[1].op.as_deref(), Some("+"));
    assert_eq!(quads[1].arg1.as_deref(), Some("2"));
    assert_eq!(quads[1].arg2.as_deref(), Some("3"));
    assert_eq!(quads[1].result.as_deref(), Some("t0"));
    assert_eq!(quads[2].kind, QuadKind::Assignment);
    assert_eq!(quads[2].arg1.as_deref(), Some("t0"));
    assert_eq!(quads[2].result.as_deref(), Some("x"));
    assert_eq!(quads[3].kind, QuadKind::Write);
    assert_eq!(quads[3].arg1.as_deref(), Some("x"));
    assert_eq!(quads[4].kind, QuadKind::Return);
    assert_eq!(quads[4].arg1.as_deref(), Some("0"));

    // Optimized: folding collapses the Arithmetic into Assignment "5" -> x; propagation then
    // dead-code elimination drops the now-unreferenced t0 intermediate entirely.
    let optimized = report.optimized_code.unwrap();
    let opt_quads = &optimized.quadruples;
    assert_eq!(opt_quads.len(), 4);
    assert_eq!(opt_quads[0].kind, QuadKind::Label);
    assert_eq!(opt_quads[0].result.as_deref(), Some("func_main"));
    assert_eq!(opt_quads[1].kind, QuadKind::Assignment);
    assert_eq!(opt_quads[1].arg1.as_deref(), Some("5"));
    assert_eq!(opt_quads[1].result.as_deref(), Some("x"));
    assert_eq!(opt_quads[2].kind, QuadKind::Write);
    assert_eq!(opt_quads[2].arg1.as_deref(), Some("x"));
    assert_eq!(opt_quads[3].kind, QuadKind::Return);
    assert_eq!(opt_quads[3].arg1.as_deref(), Some("0"));

    let target = report.object_code.unwrap();
    assert!(target.contains('5'));
    assert!(target.contains("print("));
}

#[test]
fn s2_use_before_initialization_warns_exactly_once() {
    let report = Compiler::new(true)
        .compile("function main() { int x; print(x); }")
        .unwrap();
    assert!(report.success);
    assert_eq!(report.warnings.len(), 1);
    assert!(report.warnings[0].contains("used but may not be initialized"));
}

#[test]
fn s3_redeclaration_fails_and_produces_no_ir() {
    let report = Compiler::new(true)
        .compile("function main() { int x = 1; int x = 2; }")
        .unwrap();
    assert!(!report.success);
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].contains("already declared in scope 'main'"));
    assert!(report.intermediate_code.is_none());
}

#[test]
fn s4_if_else_keeps_both_branches_reachable_in_generated_code() {
    let report = Compiler::new(true)
        .compile("function main() { if (1 < 2) { print(1); } else { print(2); } }")
        .unwrap();
    assert!(report.success);

    let ir = report.intermediate_code.unwrap();
    let jumps = ir.quadruples.iter().filter(|q| q.kind == QuadKind::Jump).count();
    let labels = ir.quadruples.iter().filter(|q| q.kind == QuadKind::Label).count();
    assert_eq!(jumps, 2);
    assert_eq!(labels, 3);

    let target = report.object_code.unwrap();
    assert!(target.contains("print(1)"));
    assert!(target.contains("print(2)"));
}

#[test]
fn s5_while_loop_labels_both_survive_optimization() {
    let report = Compiler::new(true)
        .compile("function main() { while (0) { print(1); } }")
        .unwrap();
    assert!(report.success);
    let optimized = report.optimized_code.unwrap();
    let label_names: Vec<_> = optimized
        .quadruples
        .iter()
        .filter(|q| q.kind == QuadKind::Label)
        .filter_map(|q| q.result.clone())
        .collect();
    assert!(label_names.iter().any(|n| n.starts_with("while_start_")));
    assert!(label_names.iter().any(|n| n.starts_with("while_end_")));
}

#[test]
fn s6_unexpected_character_fails_the_lexer_and_skips_later_stages() {
    let report = Compiler::new(true)
        .compile("function main() { @ }")
        .unwrap();
    assert!(!report.success);
    assert_eq!(report.errors.iter().filter(|e| e.starts_with("lex error")).count(), 1);
    assert!(report.ast.is_none());
}
