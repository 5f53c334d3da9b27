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

//! Pure analyses and transforms over scalar expression trees (spec §4.1).

use std::collections::{BTreeMap, BTreeSet};

use rewrite_common::ir::{is_fn_named, Literal, ScalarExpr, ScalarType};

/// Collects every direct struct-field index referenced by `expr`. Literals,
/// casts, if-then and scalar-function arguments are transparent; any other
/// construct makes the whole expression "unanalyzable" — callers must then
/// treat it as something that cannot be pushed or pruned.
pub fn collect_field_indices(expr: &ScalarExpr) -> Option<BTreeSet<usize>> {
    let mut indices = BTreeSet::new();
    collect_into(expr, &mut indices).then_some(indices)
}

fn collect_into(expr: &ScalarExpr, indices: &mut BTreeSet<usize>) -> bool {
    match expr {
        ScalarExpr::Field(i) => {
            indices.insert(*i);
            true
        }
        ScalarExpr::Literal(_) => true,
        ScalarExpr::Cast { input, .. } => collect_into(input, indices),
        ScalarExpr::ScalarFunction { args, .. } => {
            args.iter().all(|a| collect_into(a, indices))
        }
        ScalarExpr::IfThen { clauses, else_ } => {
            clauses
                .iter()
                .all(|(cond, then)| collect_into(cond, indices) && collect_into(then, indices))
                && collect_into(else_, indices)
        }
    }
}

/// Deep copy of `expr` with every direct field index offset by `delta`
/// (which may be negative).
pub fn adjust_field_indices(expr: &ScalarExpr, delta: i64) -> ScalarExpr {
    match expr {
        ScalarExpr::Field(i) => ScalarExpr::Field((*i as i64 + delta) as usize),
        ScalarExpr::Literal(lit) => ScalarExpr::Literal(lit.clone()),
        ScalarExpr::Cast { input, output_type } => ScalarExpr::Cast {
            input: Box::new(adjust_field_indices(input, delta)),
            output_type: *output_type,
        },
        ScalarExpr::ScalarFunction {
            anchor,
            args,
            output_type,
        } => ScalarExpr::ScalarFunction {
            anchor: *anchor,
            args: args.iter().map(|a| adjust_field_indices(a, delta)).collect(),
            output_type: *output_type,
        },
        ScalarExpr::IfThen { clauses, else_ } => ScalarExpr::IfThen {
            clauses: clauses
                .iter()
                .map(|(c, t)| (adjust_field_indices(c, delta), adjust_field_indices(t, delta)))
                .collect(),
            else_: Box::new(adjust_field_indices(else_, delta)),
        },
    }
}

/// Deep copy of `expr` with every direct field index remapped through a
/// dense `old -> new` table. Panics if a referenced index is missing from
/// `map` — callers are expected to have built `map` to cover every index
/// `collect_field_indices` returned for this same expression.
pub fn remap_field_indices(expr: &ScalarExpr, map: &BTreeMap<usize, usize>) -> ScalarExpr {
    match expr {
        ScalarExpr::Field(i) => ScalarExpr::Field(map[i]),
        ScalarExpr::Literal(lit) => ScalarExpr::Literal(lit.clone()),
        ScalarExpr::Cast { input, output_type } => ScalarExpr::Cast {
            input: Box::new(remap_field_indices(input, map)),
            output_type: *output_type,
        },
        ScalarExpr::ScalarFunction {
            anchor,
            args,
            output_type,
        } => ScalarExpr::ScalarFunction {
            anchor: *anchor,
            args: args.iter().map(|a| remap_field_indices(a, map)).collect(),
            output_type: *output_type,
        },
        ScalarExpr::IfThen { clauses, else_ } => ScalarExpr::IfThen {
            clauses: clauses
                .iter()
                .map(|(c, t)| (remap_field_indices(c, map), remap_field_indices(t, map)))
                .collect(),
            else_: Box::new(remap_field_indices(else_, map)),
        },
    }
}

/// If `expr` is a call to a function named (bare or `"and:"`-prefixed)
/// `and`, recursively flatten its arguments; otherwise return `[expr]`.
/// Never returns an empty list.
pub fn split_conjunction(
    expr: &ScalarExpr,
    fn_names: &BTreeMap<i32, String>,
) -> Vec<ScalarExpr> {
    if let ScalarExpr::ScalarFunction { anchor, args, .. } = expr {
        if let Some(name) = fn_names.get(anchor) {
            if is_fn_named(name, "and") {
                return args
                    .iter()
                    .flat_map(|a| split_conjunction(a, fn_names))
                    .collect();
            }
        }
    }
    vec![expr.clone()]
}

/// The inverse of [`split_conjunction`]: the sole element when `exprs` has
/// length 1, otherwise an `and_anchor` call over all of them. Callers must
/// have confirmed `exprs` is non-empty.
pub fn make_conjunction(
    mut exprs: Vec<ScalarExpr>,
    and_anchor: i32,
    output_type: ScalarType,
) -> ScalarExpr {
    assert!(!exprs.is_empty(), "make_conjunction requires at least one expression");
    if exprs.len() == 1 {
        return exprs.remove(0);
    }
    ScalarExpr::ScalarFunction {
        anchor: and_anchor,
        args: exprs,
        output_type,
    }
}

pub fn is_bool_literal(expr: &ScalarExpr, value: bool) -> bool {
    matches!(expr, ScalarExpr::Literal(Literal::Bool(v)) if *v == value)
}

pub fn make_bool_literal(value: bool) -> ScalarExpr {
    ScalarExpr::Literal(Literal::Bool(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rewrite_common::builder::*;

    fn fn_names(pairs: &[(i32, &str)]) -> BTreeMap<i32, String> {
        pairs.iter().map(|(a, n)| (*a, n.to_string())).collect()
    }

    #[test]
    fn collect_field_indices_transparent_through_cast_and_if_then() {
        let expr = ScalarExpr::IfThen {
            clauses: vec![(field(0), field(1))],
            else_: Box::new(ScalarExpr::Cast {
                input: Box::new(field(2)),
                output_type: ScalarType::I64,
            }),
        };
        assert_eq!(
            collect_field_indices(&expr),
            Some(BTreeSet::from([0, 1, 2]))
        );
    }

    #[test]
    fn collect_field_indices_unanalyzable_propagates() {
        let expr = call(1, vec![field(0), lit_i64(5)], ScalarType::Bool);
        assert_eq!(collect_field_indices(&expr), Some(BTreeSet::from([0])));
    }

    #[test]
    fn adjust_then_unadjust_is_identity() {
        let expr = call(1, vec![field(3), field(5)], ScalarType::Bool);
        let adjusted = adjust_field_indices(&expr, 2);
        let back = adjust_field_indices(&adjusted, -2);
        assert_eq!(back, expr);
    }

    #[test]
    fn split_then_make_conjunction_roundtrips() {
        let names = fn_names(&[(7, "and")]);
        let e1 = field(0);
        let e2 = field(1);
        let conj = make_conjunction(vec![e1.clone(), e2.clone()], 7, ScalarType::Bool);
        assert_eq!(split_conjunction(&conj, &names), vec![e1, e2]);
    }

    #[test]
    fn split_conjunction_flattens_nested_and() {
        let names = fn_names(&[(7, "and")]);
        let inner = call(7, vec![field(0), field(1)], ScalarType::Bool);
        let outer = call(7, vec![inner, field(2)], ScalarType::Bool);
        assert_eq!(
            split_conjunction(&outer, &names),
            vec![field(0), field(1), field(2)]
        );
    }

    #[test]
    fn split_conjunction_matches_signature_suffixed_and() {
        let names = fn_names(&[(9, "and:bool_bool")]);
        let conj = call(9, vec![field(0), field(1)], ScalarType::Bool);
        assert_eq!(split_conjunction(&conj, &names), vec![field(0), field(1)]);
    }

    #[test]
    fn split_conjunction_non_and_is_single_element() {
        let names = fn_names(&[(7, "or")]);
        let expr = call(7, vec![field(0), field(1)], ScalarType::Bool);
        assert_eq!(split_conjunction(&expr, &names), vec![expr]);
    }

    #[test]
    fn bool_literal_helpers_roundtrip() {
        assert!(is_bool_literal(&make_bool_literal(true), true));
        assert!(!is_bool_literal(&make_bool_literal(true), false));
        assert!(!is_bool_literal(&field(0), true));
    }
}
