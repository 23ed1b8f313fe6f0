//! Walks quadruple-form intermediate code and reconstructs structured target-language source.
//!
//! Jump quadruples are never resolved back into real control flow — the generated `if`/`while`
//! shells contain only `pass  # jump to <label>` placeholders where a real jump target would go.
//! This mirrors the degenerate behavior of the source system this generator was modeled on: it
//! is a known limitation, not an oversight (see the crate's README-equivalent notes in the
//! workspace `DESIGN.md`).

use fax_ir::{IntermediateCode, QuadKind, Quadruple};
use fax_sem::{DataType, SymbolKind, SymbolTable};
use thiserror::Error;

/// A defect in the generator itself — never a diagnosis about the input program. Every
/// quadruple kind the IR generator can actually produce (`Assignment`, `Arithmetic`,
/// `Comparison`, `Jump`, `Label`, `Write`, `Return`) has a translation rule below; `Param`,
/// `Call`, and `Read` exist in [`QuadKind`] for forward compatibility but no construct in this
/// language's grammar lowers to them, so encountering one here means the IR generator produced
/// something this generator was never taught to translate.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenError {
    #[error("target generator has no translation rule for {0:?} quadruples")]
    UnsupportedQuadrupleKind(QuadKind),
}

/// Builds target-language source text one line at a time, tracking indentation the way a
/// hand-written pretty-printer would rather than going through a template engine.
pub struct CodeGenerator {
    lines: Vec<String>,
    indent: usize,
}

impl CodeGenerator {
    pub fn new() -> Self {
        CodeGenerator {
            lines: Vec::new(),
            indent: 0,
        }
    }

    fn add_line(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text.is_empty() {
            self.lines.push(String::new());
        } else {
            self.lines.push(format!("{}{}", "    ".repeat(self.indent), text));
        }
    }

    /// Runs the full generator and returns the assembled source text.
    pub fn into_source(self) -> String {
        self.lines.join("\n")
    }

    fn emit_preamble(&mut self, symbols: &SymbolTable) {
        self.add_line("#!/usr/bin/env fax-target");
        self.add_line("");
        for name in global_variable_names(symbols) {
            self.add_line(format!("{} = None", name));
        }
        self.add_line("");
    }

    fn emit_epilogue(&mut self) {
        self.add_line("if __name__ == \"__main__\":");
        self.indent += 1;
        self.add_line("main()");
        self.indent -= 1;
    }

    fn emit_functions(
        &mut self,
        quadruples: &[Quadruple],
        symbols: &SymbolTable,
    ) -> Result<(), GenError> {
        let mut current: Option<(String, Vec<&Quadruple>)> = None;
        for quad in quadruples {
            if quad.kind == QuadKind::Label {
                if let Some(name) = quad
                    .result
                    .as_deref()
                    .and_then(|r| r.strip_prefix("func_"))
                {
                    if let Some((prev_name, prev_body)) = current.take() {
                        self.emit_function(&prev_name, &prev_body, symbols)?;
                    }
                    current = Some((name.to_string(), Vec::new()));
                    continue;
                }
            }
            if let Some((_, body)) = current.as_mut() {
                body.push(quad);
            }
        }
        if let Some((name, body)) = current.take() {
            self.emit_function(&name, &body, symbols)?;
        }
        Ok(())
    }

    fn emit_function(
        &mut self,
        name: &str,
        body: &[&Quadruple],
        symbols: &SymbolTable,
    ) -> Result<(), GenError> {
        self.add_line(format!("def {}():", name));
        self.indent += 1;
        for local in local_variable_names(symbols, name) {
            self.add_line(format!("{} = None", local));
        }

        let mut saw_return = false;
        for quad in body {
            match quad.kind {
                QuadKind::Label => {
                    if let Some(result) = &quad.result {
                        self.add_line(format!("# {}", result));
                    }
                }
                QuadKind::Assignment => {
                    self.add_line(format!(
                        "{} = {}",
                        quad.result.as_deref().unwrap_or("_"),
                        format_operand(quad.arg1.as_deref())
                    ));
                }
                QuadKind::Arithmetic => {
                    let op = quad.op.as_deref().unwrap_or("+");
                    let py_op = if op == "/" { "//" } else { op };
                    self.add_line(format!(
                        "{} = {} {} {}",
                        quad.result.as_deref().unwrap_or("_"),
                        format_operand(quad.arg1.as_deref()),
                        py_op,
                        format_operand(quad.arg2.as_deref())
                    ));
                }
                QuadKind::Comparison => {
                    let op = quad.op.as_deref().unwrap_or("==");
                    self.add_line(format!(
                        "{} = {} {} {}",
                        quad.result.as_deref().unwrap_or("_"),
                        format_operand(quad.arg1.as_deref()),
                        op,
                        format_operand(quad.arg2.as_deref())
                    ));
                }
                QuadKind::Jump => {
                    let target = quad.result.as_deref().unwrap_or("?");
                    if quad.op.as_deref() == Some("if_false") {
                        self.add_line(format!(
                            "if not {}:",
                            format_operand(quad.arg1.as_deref())
                        ));
                        self.indent += 1;
                        self.add_line(format!("pass  # jump to {}", target));
                        self.indent -= 1;
                    } else {
                        self.add_line(format!("pass  # jump to {}", target));
                    }
                }
                QuadKind::Write => {
                    self.add_line(format!("print({})", format_operand(quad.arg1.as_deref())));
                }
                QuadKind::Return => {
                    self.add_line(format!(
                        "return {}",
                        format_operand(quad.arg1.as_deref())
                    ));
                    saw_return = true;
                    break;
                }
                QuadKind::Param | QuadKind::Call | QuadKind::Read => {
                    return Err(GenError::UnsupportedQuadrupleKind(quad.kind));
                }
            }
        }
        if !saw_return {
            self.add_line("return None");
        }
        self.indent -= 1;
        self.add_line("");
        Ok(())
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        CodeGenerator::new()
    }
}

/// Formats an operand the way the source language's literals and names need to read in the
/// target: a bare digit sequence is printed as-is, a `"`-quoted string keeps its quotes, and
/// everything else (identifiers and temporaries alike) is printed verbatim.
fn format_operand(operand: Option<&str>) -> String {
    match operand {
        None => "None".to_string(),
        Some(value) if !value.is_empty() && value.chars().all(|c| c.is_ascii_digit()) => {
            value.to_string()
        }
        Some(value) if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') => {
            value.to_string()
        }
        Some(value) => value.to_string(),
    }
}

fn global_variable_names(symbols: &SymbolTable) -> Vec<String> {
    symbols
        .root()
        .symbols
        .values()
        .filter(|sym| sym.symbol_kind == SymbolKind::Variable)
        .map(|sym| sym.name.clone())
        .collect()
}

fn local_variable_names(symbols: &SymbolTable, function_name: &str) -> Vec<String> {
    symbols
        .scopes()
        .iter()
        .filter(|scope| scope.name == function_name)
        .flat_map(|scope| scope.symbols.values())
        .filter(|sym| sym.symbol_kind == SymbolKind::Variable && sym.data_type != DataType::Void)
        .map(|sym| sym.name.clone())
        .collect()
}

/// Generates target source text from optimized (or raw) intermediate code and the symbol table
/// produced alongside it.
///
/// §6.2's gate decides whether this runs at all; this function assumes it has already been
/// cleared to run (no prior-stage errors, at least one quadruple to translate).
pub fn generate(code: &IntermediateCode, symbols: &SymbolTable) -> Result<String, GenError> {
    let mut gen = CodeGenerator::new();
    gen.emit_preamble(symbols);
    gen.emit_functions(&code.quadruples, symbols)?;
    gen.emit_epilogue();
    Ok(gen.into_source())
}
