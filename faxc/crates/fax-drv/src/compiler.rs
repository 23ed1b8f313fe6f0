//! Orchestrates the five compiler stages end to end, gating each one on the stages before it.
//!
//! A stage only runs if every stage before it ran clean. "Clean" means zero errors — warnings
//! never gate anything. This keeps a broken lexer from handing the parser garbage tokens to
//! trip over, and keeps the target generator from ever being asked to translate IR built on top
//! of a program that doesn't type-check.

use std::time::{Duration, Instant};

use fax_par::Ast;
use fax_sem::SymbolTable;
use tracing::{debug, instrument, warn};

use crate::error::Result;

/// Everything a single compilation produced, successful or not. Every stage that ran leaves its
/// artifact behind even when later stages were skipped, so callers (the CLI's `--emit`, or a
/// test) can inspect exactly how far the pipeline got.
#[derive(Debug, Default)]
pub struct CompileReport {
    pub success: bool,
    pub tokens: Vec<fax_lex::Token>,
    pub ast: Option<Ast>,
    pub symbol_table: Option<SymbolTable>,
    pub intermediate_code: Option<fax_ir::IntermediateCode>,
    pub optimized_code: Option<fax_ir::IntermediateCode>,
    pub object_code: Option<String>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub metrics: Metrics,
}

/// Counts and timing collected over one compilation, reported regardless of whether it
/// succeeded.
#[derive(Debug, Default, Clone)]
pub struct Metrics {
    pub compilation_time: Duration,
    pub tokens_count: usize,
    pub ast_nodes_count: usize,
    pub symbols_count: usize,
    pub quadruples_count: usize,
    pub temporals_count: usize,
    pub errors_count: usize,
    pub warnings_count: usize,
}

/// Stateless orchestrator — every compilation gets a fresh set of stage generators and counters,
/// so nothing here needs to be reset between calls.
#[derive(Debug)]
pub struct Compiler {
    pub optimize: bool,
}

impl Compiler {
    pub fn new(optimize: bool) -> Self {
        Compiler { optimize }
    }

    /// Runs the full pipeline over `source` and returns a report. This never fails outright —
    /// a program riddled with errors still produces an `Ok(CompileReport)` with `success: false`
    /// and every diagnostic collected; `Err` is reserved for defects in the driver itself.
    #[instrument(skip(self, source))]
    pub fn compile(&self, source: &str) -> Result<CompileReport> {
        let start = Instant::now();
        let mut report = CompileReport::default();

        let (tokens, lex_errors) = self.run_lexer(source);
        report.metrics.tokens_count = tokens.len();
        report.errors.extend(lex_errors.iter().map(|e| {
            format!("lex error at line {}, column {}: {}", e.line, e.column, e.message)
        }));
        report.tokens = tokens;

        let ast = if lex_errors.is_empty() {
            self.run_parser(&report.tokens, &mut report)
        } else {
            debug!("skipping parser: lexer reported errors");
            None
        };

        let analysis = if ast.is_some() && report.errors.is_empty() {
            self.run_semantic_analysis(ast.as_ref().unwrap(), &mut report)
        } else {
            debug!("skipping semantic analysis: no syntax tree or prior errors");
            None
        };
        report.metrics.ast_nodes_count = ast.as_ref().map(Ast::node_count).unwrap_or(0);
        report.ast = ast;

        let ir = if report.ast.is_some() && analysis.is_some() && report.errors.is_empty() {
            Some(self.run_ir_generation(report.ast.as_ref().unwrap()))
        } else {
            debug!("skipping IR generation: prior stage produced errors");
            None
        };
        report.metrics.symbols_count = analysis
            .as_ref()
            .map(|a| a.symbol_table.symbol_count())
            .unwrap_or(0);
        report.symbol_table = analysis.map(|a| a.symbol_table);

        let optimized = if let (Some(code), true, true) =
            (&ir, report.errors.is_empty(), self.optimize)
        {
            Some(self.run_optimizer(code))
        } else {
            debug!("skipping optimizer: no IR, prior errors, or optimization disabled");
            None
        };
        report.metrics.quadruples_count = ir.as_ref().map(|c| c.quadruples.len()).unwrap_or(0);
        report.metrics.temporals_count = ir.as_ref().map(|c| c.temporal_counter).unwrap_or(0);
        report.intermediate_code = ir;

        report.optimized_code = optimized;
        let code_for_generation = if self.optimize {
            report.optimized_code.as_ref()
        } else {
            report.intermediate_code.as_ref()
        };

        if let (Some(code), Some(symbols), true) = (
            code_for_generation,
            report.symbol_table.as_ref(),
            report.errors.is_empty(),
        ) {
            if code.quadruples.is_empty() {
                debug!("skipping target generation: no functions to translate");
            } else {
                report.object_code = Some(self.run_target_generation(code, symbols)?);
            }
        } else {
            debug!("skipping target generation: no IR or prior errors");
        }

        report.success = report.errors.is_empty();
        report.metrics.errors_count = report.errors.len();
        report.metrics.warnings_count = report.warnings.len();
        report.metrics.compilation_time = start.elapsed();
        Ok(report)
    }

    #[instrument(skip(self, source))]
    fn run_lexer(&self, source: &str) -> (Vec<fax_lex::Token>, Vec<fax_lex::LexError>) {
        let (tokens, errors) = fax_lex::tokenize(source);
        if !errors.is_empty() {
            warn!(count = errors.len(), "lexer reported errors");
        }
        (tokens, errors)
    }

    #[instrument(skip(self, tokens, report))]
    fn run_parser(&self, tokens: &[fax_lex::Token], report: &mut CompileReport) -> Option<Ast> {
        let (ast, errors) = fax_par::parse(tokens);
        if !errors.is_empty() {
            warn!(count = errors.len(), "parser reported errors");
        }
        report
            .errors
            .extend(errors.iter().map(|e| format!("parse error at line {}: {}", e.line, e.message)));
        ast
    }

    #[instrument(skip(self, ast, report))]
    fn run_semantic_analysis(
        &self,
        ast: &Ast,
        report: &mut CompileReport,
    ) -> Option<fax_sem::AnalysisResult> {
        let result = fax_sem::analyze(ast);
        if !result.errors.is_empty() {
            warn!(count = result.errors.len(), "semantic analysis reported errors");
        }
        report
            .errors
            .extend(result.errors.iter().map(|e| format!("semantic error at line {}: {}", e.line, e.message)));
        report
            .warnings
            .extend(result.warnings.iter().map(|w| format!("line {}: {}", w.line, w.message)));
        Some(result)
    }

    #[instrument(skip(self, ast))]
    fn run_ir_generation(&self, ast: &Ast) -> fax_ir::IntermediateCode {
        fax_ir::IrGenerator::new().generate(ast)
    }

    #[instrument(skip(self, code))]
    fn run_optimizer(&self, code: &fax_ir::IntermediateCode) -> fax_ir::IntermediateCode {
        let (optimized, log) = fax_ir::optimize(code);
        for entry in &log {
            debug!(%entry, "optimizer rewrite");
        }
        optimized
    }

    #[instrument(skip(self, code, symbols))]
    fn run_target_generation(
        &self,
        code: &fax_ir::IntermediateCode,
        symbols: &SymbolTable,
    ) -> Result<String> {
        Ok(fax_gen::generate(code, symbols)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(src: &str) -> CompileReport {
        Compiler::new(true).compile(src).unwrap()
    }

    #[test]
    fn empty_input_succeeds_with_no_generated_code() {
        let report = compile("");
        assert!(report.success);
        assert_eq!(report.metrics.tokens_count, 0);
        assert_eq!(report.metrics.errors_count, 0);
        assert!(report.object_code.is_none());
    }

    #[test]
    fn well_formed_program_compiles_all_the_way_to_target_code() {
        let report = compile("function main() { int x = 2 + 3; print(x); }");
        assert!(report.success);
        assert!(report.object_code.is_some());
        let source = report.object_code.unwrap();
        assert!(source.contains("print("));
    }

    #[test]
    fn lexer_errors_skip_every_later_stage() {
        let report = compile("function main() { int x = @; }");
        assert!(!report.success);
        assert!(report.ast.is_none());
        assert!(report.symbol_table.is_none());
        assert!(report.intermediate_code.is_none());
        assert!(report.object_code.is_none());
    }

    #[test]
    fn semantic_errors_skip_ir_generation_and_target_generation() {
        let report = compile("function main() { print(y); }");
        assert!(!report.success);
        assert!(report.ast.is_some());
        assert!(report.intermediate_code.is_none());
        assert!(report.object_code.is_none());
    }

    #[test]
    fn disabling_optimization_generates_from_raw_ir() {
        let compiler = Compiler::new(false);
        let report = compiler
            .compile("function main() { int x = 2 + 3; print(x); }")
            .unwrap();
        assert!(report.success);
        assert!(report.optimized_code.is_none());
        assert!(report.object_code.is_some());
    }

    #[test]
    fn metrics_count_tokens_and_quadruples() {
        let report = compile("function main() { int x = 1; print(x); }");
        assert!(report.metrics.tokens_count > 0);
        assert!(report.metrics.ast_nodes_count > 0);
        assert!(report.metrics.quadruples_count > 0);
        assert!(report.metrics.symbols_count > 0);
    }
}
