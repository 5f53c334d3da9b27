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

//! Prune unused expressions and input fields from a `Project` that carries
//! an emit mapping (spec §4.4). Determines which expressions the emit
//! actually references, drops the rest, then prunes the input to only the
//! fields needed by pass-through emit entries plus the surviving
//! expressions. Fires if either the expression list or the input can be
//! shrunk.

use std::collections::BTreeMap;

use rewrite_common::field_count::resolve_output_field_count;
use rewrite_common::ir::{Common, Relation};
use rewrite_common::Result;
use rewrite_expr::{collect_field_indices, remap_field_indices};

use super::prune_utils::prune_input;
use crate::driver::RewriteRule;

pub struct PruneProject;

impl RewriteRule for PruneProject {
    fn name(&self) -> &str {
        "prune_project"
    }

    fn try_apply(
        &self,
        rel: &Relation,
        _fn_names: &BTreeMap<i32, String>,
    ) -> Result<Option<Relation>> {
        let Relation::Project { input, expressions, common } = rel else {
            return Ok(None);
        };
        let Some(emit) = &common.emit else {
            return Ok(None);
        };
        let Some(input_field_count) = resolve_output_field_count(input) else {
            return Ok(None);
        };

        let num_expressions = expressions.len();
        let mut needed_expr_indices = std::collections::BTreeSet::new();
        let mut needed_input_fields = std::collections::BTreeSet::new();

        for &idx in &emit.0 {
            if idx < input_field_count {
                needed_input_fields.insert(idx);
            } else {
                let expr_idx = idx - input_field_count;
                if expr_idx >= num_expressions {
                    return Ok(None);
                }
                needed_expr_indices.insert(expr_idx);
                let Some(field_indices) = collect_field_indices(&expressions[expr_idx]) else {
                    return Ok(None);
                };
                needed_input_fields.extend(field_indices);
            }
        }

        let can_prune_exprs = needed_expr_indices.len() < num_expressions;
        let pruned_input = prune_input(input, &needed_input_fields);

        if pruned_input.is_none() && !can_prune_exprs {
            return Ok(None);
        }

        let (new_input, input_mapping, new_input_count) = match &pruned_input {
            Some((rel, mapping)) => (rel.clone(), Some(mapping.clone()), mapping.len()),
            None => ((**input).clone(), None, input_field_count),
        };

        let (new_expressions, expr_mapping): (Vec<_>, BTreeMap<usize, usize>) = if can_prune_exprs
        {
            let sorted_needed: Vec<usize> = needed_expr_indices.iter().copied().collect();
            let exprs = sorted_needed.iter().map(|&i| expressions[i].clone()).collect();
            let mapping = sorted_needed
                .iter()
                .enumerate()
                .map(|(new, &old)| (old, new))
                .collect();
            (exprs, mapping)
        } else {
            (
                expressions.clone(),
                (0..num_expressions).map(|i| (i, i)).collect(),
            )
        };

        let new_expressions: Vec<_> = match &input_mapping {
            Some(mapping) => new_expressions
                .iter()
                .map(|e| remap_field_indices(e, mapping))
                .collect(),
            None => new_expressions,
        };

        let new_emit: Vec<usize> = emit
            .0
            .iter()
            .map(|&idx| {
                if idx < input_field_count {
                    input_mapping.as_ref().map_or(idx, |m| m[&idx])
                } else {
                    let expr_idx = idx - input_field_count;
                    new_input_count + expr_mapping[&expr_idx]
                }
            })
            .collect();

        Ok(Some(Relation::Project {
            input: Box::new(new_input),
            expressions: new_expressions,
            common: Common::with_emit(new_emit),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rewrite_common::builder::*;
    use rewrite_common::ir::ScalarType;

    fn names() -> BTreeMap<i32, String> {
        BTreeMap::new()
    }

    #[test]
    fn drops_unneeded_expression_and_input_field() {
        let input = read_rel(vec![ScalarType::I64, ScalarType::I64, ScalarType::I64]);
        // expressions: [field(1)+lit (output idx 3), field(2) (output idx 4)]
        let expr0 = call(1, vec![field(1), lit_i64(1)], ScalarType::I64);
        let expr1 = field(2);
        let mut p = project_rel(input, vec![expr0, expr1]);
        // Only keep output 4 (expr1, a pass-through of field 2).
        *common_mut(&mut p) = Common::with_emit(vec![4]);

        let result = PruneProject.try_apply(&p, &names()).unwrap().unwrap();
        match result {
            Relation::Project { input, expressions, common } => {
                assert_eq!(expressions.len(), 1);
                assert_eq!(common.emit.unwrap().0, vec![1]);
                match *input {
                    Relation::Read { common, .. } => assert_eq!(common.emit.unwrap().0, vec![2]),
                    _ => panic!("expected read"),
                }
            }
            _ => panic!("expected project"),
        }
    }

    #[test]
    fn no_emit_is_not_applicable() {
        let input = read_rel(vec![ScalarType::I64]);
        let p = project_rel(input, vec![field(0)]);
        assert!(PruneProject.try_apply(&p, &names()).unwrap().is_none());
    }
}
