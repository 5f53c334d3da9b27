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

//! Push filter below project: `Filter(Project(X)) -> Project(Filter(X))`
//! (spec §4.3). Safe only when the project has no emit mapping and the
//! predicate references only pass-through input fields, never computed
//! expression fields.

use std::collections::BTreeMap;

use rewrite_common::field_count::count_output_fields;
use rewrite_common::ir::{Common, Relation, ScalarExpr, ScalarType};
use rewrite_common::Result;
use rewrite_expr::{collect_field_indices, make_conjunction, split_conjunction};

use crate::driver::RewriteRule;

pub struct PushThroughProject;

impl RewriteRule for PushThroughProject {
    fn name(&self) -> &str {
        "push_through_project"
    }

    fn try_apply(
        &self,
        rel: &Relation,
        fn_names: &BTreeMap<i32, String>,
    ) -> Result<Option<Relation>> {
        let Relation::Filter { input, condition, .. } = rel else {
            return Ok(None);
        };
        let Relation::Project {
            input: proj_input,
            expressions,
            common,
        } = input.as_ref()
        else {
            return Ok(None);
        };

        if common.emit.is_some() {
            return Ok(None);
        }

        let Some(input_field_count) = count_output_fields(proj_input) else {
            return Ok(None);
        };

        let conjuncts = split_conjunction(condition, fn_names);

        let mut pushable = Vec::new();
        let mut remaining = Vec::new();

        for conjunct in conjuncts {
            match collect_field_indices(&conjunct) {
                Some(indices) if indices.iter().all(|&i| i < input_field_count) => {
                    pushable.push(conjunct)
                }
                _ => remaining.push(conjunct),
            }
        }

        if pushable.is_empty() {
            return Ok(None);
        }

        let (and_anchor, output_type) = conjunction_meta(condition);
        let push_cond = make_conjunction(pushable, and_anchor, output_type);

        let new_project = Relation::Project {
            input: Box::new(Relation::Filter {
                input: proj_input.clone(),
                condition: push_cond,
                common: Common::none(),
            }),
            expressions: expressions.clone(),
            common: common.clone(),
        };

        if remaining.is_empty() {
            return Ok(Some(new_project));
        }

        let remaining_cond = make_conjunction(remaining, and_anchor, output_type);
        Ok(Some(Relation::Filter {
            input: Box::new(new_project),
            condition: remaining_cond,
            common: Common::none(),
        }))
    }
}

fn conjunction_meta(condition: &ScalarExpr) -> (i32, ScalarType) {
    match condition {
        ScalarExpr::ScalarFunction {
            anchor, output_type, ..
        } => (*anchor, *output_type),
        _ => (0, ScalarType::Bool),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rewrite_common::builder::*;

    fn names() -> BTreeMap<i32, String> {
        BTreeMap::from([(1, "and".to_string()), (2, "eq".to_string())])
    }

    #[test]
    fn pushes_predicate_over_pass_through_fields() {
        let input = read_rel(vec![ScalarType::I64, ScalarType::I64]);
        let project = project_rel(input, vec![field(0), field(1)]);
        let filtered = filter_rel(project, call(2, vec![field(0), lit_i64(1)], ScalarType::Bool));

        let result = PushThroughProject.try_apply(&filtered, &names()).unwrap().unwrap();
        match result {
            Relation::Project { input, .. } => assert!(matches!(*input, Relation::Filter { .. })),
            _ => panic!("expected project"),
        }
    }

    #[test]
    fn blocked_by_emit_mapping() {
        let input = read_rel(vec![ScalarType::I64, ScalarType::I64]);
        let mut project = project_rel(input, vec![field(0), field(1)]);
        *common_mut(&mut project) = Common::with_emit(vec![1]);
        let filtered = filter_rel(project, call(2, vec![field(0), lit_i64(1)], ScalarType::Bool));
        assert!(PushThroughProject.try_apply(&filtered, &names()).unwrap().is_none());
    }

    #[test]
    fn predicate_on_computed_expression_field_stays_above() {
        let input = read_rel(vec![ScalarType::I64]);
        // Expression at output index 1 is not a pass-through field.
        let project = project_rel(input, vec![call(2, vec![field(0), lit_i64(9)], ScalarType::Bool)]);
        let filtered = filter_rel(project, call(2, vec![field(1), lit_i64(1)], ScalarType::Bool));
        assert!(PushThroughProject.try_apply(&filtered, &names()).unwrap().is_none());
    }
}
