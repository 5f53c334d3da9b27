// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Bottom-up, purely structural predicate simplification (spec §4.5).

use std::collections::BTreeMap;

use rewrite_common::ir::{is_fn_named, ScalarExpr};

use crate::utils::{is_bool_literal, make_bool_literal};

/// Recursively simplifies a boolean expression bottom-up. Rebuilding always
/// preserves the original call's function anchor and declared output type
/// so re-serialization stays valid.
pub fn simplify_expr(expr: &ScalarExpr, fn_names: &BTreeMap<i32, String>) -> ScalarExpr {
    match expr {
        ScalarExpr::ScalarFunction { .. } => simplify_scalar_function(expr, fn_names),
        ScalarExpr::Cast { input, output_type } => {
            let simplified_input = simplify_expr(input, fn_names);
            if simplified_input == **input {
                expr.clone()
            } else {
                ScalarExpr::Cast {
                    input: Box::new(simplified_input),
                    output_type: *output_type,
                }
            }
        }
        ScalarExpr::IfThen { clauses, else_ } => {
            let new_clauses: Vec<_> = clauses
                .iter()
                .map(|(cond, then)| (simplify_expr(cond, fn_names), simplify_expr(then, fn_names)))
                .collect();
            let new_else = simplify_expr(else_, fn_names);
            if &new_clauses == clauses && new_else == **else_ {
                expr.clone()
            } else {
                ScalarExpr::IfThen {
                    clauses: new_clauses,
                    else_: Box::new(new_else),
                }
            }
        }
        ScalarExpr::Field(_) | ScalarExpr::Literal(_) => expr.clone(),
    }
}

fn simplify_scalar_function(expr: &ScalarExpr, fn_names: &BTreeMap<i32, String>) -> ScalarExpr {
    let ScalarExpr::ScalarFunction { anchor, args, .. } = expr else {
        unreachable!()
    };
    let name = fn_names.get(anchor).map(String::as_str).unwrap_or("");
    let simplified_args: Vec<ScalarExpr> = args.iter().map(|a| simplify_expr(a, fn_names)).collect();
    let changed = &simplified_args != args;

    if is_fn_named(name, "and") {
        return simplify_and(simplified_args, expr, changed);
    }
    if is_fn_named(name, "or") {
        return simplify_or(simplified_args, expr, changed);
    }
    if is_fn_named(name, "not") {
        return simplify_not(simplified_args, expr, changed, fn_names);
    }

    if changed {
        rebuild(expr, simplified_args)
    } else {
        expr.clone()
    }
}

fn simplify_and(args: Vec<ScalarExpr>, original: &ScalarExpr, mut changed: bool) -> ScalarExpr {
    let mut remaining = Vec::with_capacity(args.len());
    for arg in args {
        if is_bool_literal(&arg, true) {
            changed = true;
            continue;
        }
        if is_bool_literal(&arg, false) {
            return make_bool_literal(false);
        }
        remaining.push(arg);
    }
    match remaining.len() {
        0 => make_bool_literal(true),
        1 => remaining.remove(0),
        _ if changed => rebuild(original, remaining),
        _ => original.clone(),
    }
}

fn simplify_or(args: Vec<ScalarExpr>, original: &ScalarExpr, mut changed: bool) -> ScalarExpr {
    let mut remaining = Vec::with_capacity(args.len());
    for arg in args {
        if is_bool_literal(&arg, false) {
            changed = true;
            continue;
        }
        if is_bool_literal(&arg, true) {
            return make_bool_literal(true);
        }
        remaining.push(arg);
    }
    match remaining.len() {
        0 => make_bool_literal(false),
        1 => remaining.remove(0),
        _ if changed => rebuild(original, remaining),
        _ => original.clone(),
    }
}

fn simplify_not(
    mut args: Vec<ScalarExpr>,
    original: &ScalarExpr,
    changed: bool,
    fn_names: &BTreeMap<i32, String>,
) -> ScalarExpr {
    let Some(inner) = args.pop() else {
        return original.clone();
    };
    if is_bool_literal(&inner, true) {
        return make_bool_literal(false);
    }
    if is_bool_literal(&inner, false) {
        return make_bool_literal(true);
    }
    if let ScalarExpr::ScalarFunction {
        anchor: inner_anchor,
        args: inner_args,
        ..
    } = &inner
    {
        let inner_name = fn_names.get(inner_anchor).map(String::as_str).unwrap_or("");
        if is_fn_named(inner_name, "not") {
            if let Some(x) = inner_args.first() {
                return x.clone();
            }
        }
    }
    if changed {
        rebuild(original, vec![inner])
    } else {
        original.clone()
    }
}

fn rebuild(original: &ScalarExpr, new_args: Vec<ScalarExpr>) -> ScalarExpr {
    let ScalarExpr::ScalarFunction {
        anchor, output_type, ..
    } = original
    else {
        unreachable!()
    };
    ScalarExpr::ScalarFunction {
        anchor: *anchor,
        args: new_args,
        output_type: *output_type,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rewrite_common::builder::*;
    use rewrite_common::ir::ScalarType;

    fn names() -> BTreeMap<i32, String> {
        BTreeMap::from([(1, "and".to_string()), (2, "or".to_string()), (3, "not".to_string())])
    }

    #[test]
    fn and_drops_true_operands() {
        let expr = call(1, vec![lit_bool(true), field(0)], ScalarType::Bool);
        assert_eq!(simplify_expr(&expr, &names()), field(0));
    }

    #[test]
    fn and_with_false_collapses() {
        let expr = call(1, vec![field(0), lit_bool(false)], ScalarType::Bool);
        assert_eq!(simplify_expr(&expr, &names()), lit_bool(false));
    }

    #[test]
    fn and_all_true_yields_true() {
        let expr = call(1, vec![lit_bool(true), lit_bool(true)], ScalarType::Bool);
        assert_eq!(simplify_expr(&expr, &names()), lit_bool(true));
    }

    #[test]
    fn or_drops_false_short_circuits_true() {
        let expr = call(2, vec![lit_bool(true), field(0)], ScalarType::Bool);
        assert_eq!(simplify_expr(&expr, &names()), lit_bool(true));

        let expr2 = call(2, vec![lit_bool(false), field(0)], ScalarType::Bool);
        assert_eq!(simplify_expr(&expr2, &names()), field(0));
    }

    #[test]
    fn not_true_false_and_double_negation() {
        assert_eq!(
            simplify_expr(&call(3, vec![lit_bool(true)], ScalarType::Bool), &names()),
            lit_bool(false)
        );
        assert_eq!(
            simplify_expr(&call(3, vec![lit_bool(false)], ScalarType::Bool), &names()),
            lit_bool(true)
        );
        let not_not = call(3, vec![call(3, vec![field(0)], ScalarType::Bool)], ScalarType::Bool);
        assert_eq!(simplify_expr(&not_not, &names()), field(0));
    }

    #[test]
    fn cast_and_if_then_recurse_but_rebuild_only_when_changed() {
        let unchanged = ScalarExpr::Cast {
            input: Box::new(field(0)),
            output_type: ScalarType::I64,
        };
        assert_eq!(simplify_expr(&unchanged, &names()), unchanged);

        let changed = ScalarExpr::Cast {
            input: Box::new(call(1, vec![lit_bool(true), field(0)], ScalarType::Bool)),
            output_type: ScalarType::I64,
        };
        assert_eq!(
            simplify_expr(&changed, &names()),
            ScalarExpr::Cast {
                input: Box::new(field(0)),
                output_type: ScalarType::I64
            }
        );
    }

    #[test]
    fn preserves_anchor_and_output_type_on_rebuild() {
        let expr = call(1, vec![field(0), field(1), lit_bool(true)], ScalarType::Bool);
        let simplified = simplify_expr(&expr, &names());
        match simplified {
            ScalarExpr::ScalarFunction { anchor, output_type, .. } => {
                assert_eq!(anchor, 1);
                assert_eq!(output_type, ScalarType::Bool);
            }
            _ => panic!("expected scalar function"),
        }
    }
}
