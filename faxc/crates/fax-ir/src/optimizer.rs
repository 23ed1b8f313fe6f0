//! The five fixed optimization passes, run in order, followed by mandatory reindexing.
//!
//! Each pass is a free function over a `Vec<Quadruple>` rather than a trait object: the passes
//! always run in this exact sequence, there is no plugin mechanism, and a trait would buy nothing
//! here but indirection.

use crate::quadruple::{IntermediateCode, QuadKind, Quadruple};
use rustc_hash::{FxHashMap, FxHashSet};

/// Runs all five passes over `code` and returns the optimized copy plus a human-readable log of
/// every rewrite, in the order it was applied.
pub fn optimize(code: &IntermediateCode) -> (IntermediateCode, Vec<String>) {
    let mut quads = code.quadruples.clone();
    let mut log = Vec::new();

    fold_constants(&mut quads, &mut log);
    propagate_constants(&mut quads, &mut log);
    eliminate_dead_code(&mut quads, &mut log);
    eliminate_redundant_assignments(&mut quads, &mut log);
    optimize_jumps(&mut quads, &mut log);

    let mut result = IntermediateCode {
        quadruples: quads,
        temporal_counter: code.temporal_counter,
        label_counter: code.label_counter,
    };
    result.reindex();
    (result, log)
}

fn is_integer_literal(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

/// Python-compatible floor division: rounds toward negative infinity, not toward zero. This spec
/// freezes floor semantics for constant folding (see the design ledger); plain `a / b` in Rust
/// truncates toward zero, so a dedicated helper is needed even though every test fixture only ever
/// exercises non-negative operands.
fn floor_div(a: i64, b: i64) -> i64 {
    let q = a / b;
    let r = a % b;
    if r != 0 && (r < 0) != (b < 0) {
        q - 1
    } else {
        q
    }
}

/// Pass 1: constant folding. Rewrites an `Arithmetic`/`Comparison` quadruple whose operands are
/// both integer literals into an `Assignment` of the computed value.
fn fold_constants(quads: &mut [Quadruple], log: &mut Vec<String>) {
    for quad in quads.iter_mut() {
        if !matches!(quad.kind, QuadKind::Arithmetic | QuadKind::Comparison) {
            continue;
        }
        let (arg1, arg2, op) = match (&quad.arg1, &quad.arg2, &quad.op) {
            (Some(a), Some(b), Some(op)) if is_integer_literal(a) && is_integer_literal(b) => {
                (a.clone(), b.clone(), op.clone())
            }
            _ => continue,
        };
        let a: i64 = arg1.parse().unwrap();
        let b: i64 = arg2.parse().unwrap();
        let value = match op.as_str() {
            "+" => a + b,
            "-" => a - b,
            "*" => a * b,
            "/" => {
                if b == 0 {
                    continue;
                }
                floor_div(a, b)
            }
            ">" => (a > b) as i64,
            "<" => (a < b) as i64,
            "==" => (a == b) as i64,
            "!=" => (a != b) as i64,
            _ => continue,
        };
        log.push(format!(
            "folded quadruple {}: {} {} {} -> {}",
            quad.index, arg1, op, arg2, value
        ));
        quad.kind = QuadKind::Assignment;
        quad.op = None;
        quad.arg1 = Some(value.to_string());
        quad.arg2 = None;
    }
}

/// Pass 2: constant propagation. Tracks a `variable -> literal` map and substitutes known
/// constants into `arg1` fields, per the quadruple-by-quadruple rule in the design ledger.
fn propagate_constants(quads: &mut [Quadruple], log: &mut Vec<String>) {
    let mut constants: FxHashMap<String, String> = FxHashMap::default();
    for quad in quads.iter_mut() {
        let is_assignment = quad.kind == QuadKind::Assignment;
        let arg1_is_constant = quad
            .arg1
            .as_deref()
            .map(is_integer_literal)
            .unwrap_or(false);

        if is_assignment && arg1_is_constant {
            if let (Some(arg1), Some(result)) = (quad.arg1.clone(), quad.result.clone()) {
                constants.insert(result, arg1);
            }
            continue;
        }

        if let Some(arg1) = &quad.arg1 {
            if let Some(value) = constants.get(arg1) {
                log.push(format!(
                    "propagated constant {} = {} into quadruple {}",
                    arg1, value, quad.index
                ));
                quad.arg1 = Some(value.clone());
            }
        }

        if is_assignment {
            if let Some(result) = &quad.result {
                constants.remove(result);
            }
        }
    }
}

/// Pass 3: dead-code elimination. A temporary only counts as "used" if it appears as `arg1` or
/// `arg2` somewhere — a temporary that is only ever a `result` is dead.
fn eliminate_dead_code(quads: &mut Vec<Quadruple>, log: &mut Vec<String>) {
    let mut used_temps: FxHashSet<String> = FxHashSet::default();
    for quad in quads.iter() {
        for operand in [&quad.arg1, &quad.arg2] {
            if let Some(name) = operand {
                if Quadruple::is_temp(name) {
                    used_temps.insert(name.clone());
                }
            }
        }
    }
    let mut jump_targets: FxHashSet<String> = FxHashSet::default();
    for quad in quads.iter() {
        if quad.kind == QuadKind::Jump {
            if let Some(target) = &quad.result {
                jump_targets.insert(target.clone());
            }
        }
    }

    quads.retain(|quad| {
        let dead = match quad.kind {
            QuadKind::Assignment => quad
                .result
                .as_ref()
                .map(|r| Quadruple::is_temp(r) && !used_temps.contains(r))
                .unwrap_or(false),
            QuadKind::Label => quad
                .result
                .as_ref()
                .map(|name| !name.starts_with("func_") && !jump_targets.contains(name))
                .unwrap_or(false),
            _ => false,
        };
        if dead {
            log.push(format!(
                "eliminated dead quadruple {}: {:?} result={:?}",
                quad.index, quad.kind, quad.result
            ));
        }
        !dead
    });
}

/// Pass 4: redundant-assignment elimination. Drops a repeated `Assignment` to the same `result`
/// with the same `arg1`, resetting its memory at every basic-block boundary (`Jump`/`Label`).
fn eliminate_redundant_assignments(quads: &mut Vec<Quadruple>, log: &mut Vec<String>) {
    let mut last_assigned: FxHashMap<String, String> = FxHashMap::default();
    let mut kept = Vec::with_capacity(quads.len());
    for quad in quads.drain(..) {
        match quad.kind {
            QuadKind::Jump | QuadKind::Label => {
                last_assigned.clear();
                kept.push(quad);
            }
            QuadKind::Assignment => {
                let redundant = match (&quad.result, &quad.arg1) {
                    (Some(result), Some(arg1)) => {
                        last_assigned.get(result).map(|prev| prev == arg1).unwrap_or(false)
                    }
                    _ => false,
                };
                if redundant {
                    log.push(format!(
                        "eliminated redundant assignment at quadruple {}: {} = {}",
                        quad.index,
                        quad.result.as_deref().unwrap_or(""),
                        quad.arg1.as_deref().unwrap_or("")
                    ));
                    continue;
                }
                if let (Some(result), Some(arg1)) = (&quad.result, &quad.arg1) {
                    last_assigned.insert(result.clone(), arg1.clone());
                }
                kept.push(quad);
            }
            _ => kept.push(quad),
        }
    }
    *quads = kept;
}

/// Pass 5: jump optimization. Removes a `Jump` immediately followed by the `Label` it targets.
fn optimize_jumps(quads: &mut Vec<Quadruple>, log: &mut Vec<String>) {
    let mut kept = Vec::with_capacity(quads.len());
    let mut i = 0;
    while i < quads.len() {
        let quad = &quads[i];
        if quad.kind == QuadKind::Jump {
            if let Some(next) = quads.get(i + 1) {
                if next.kind == QuadKind::Label && next.result == quad.result {
                    log.push(format!(
                        "removed jump at quadruple {} immediately followed by its target label",
                        quad.index
                    ));
                    i += 1;
                    continue;
                }
            }
        }
        kept.push(quads[i].clone());
        i += 1;
    }
    *quads = kept;
}
