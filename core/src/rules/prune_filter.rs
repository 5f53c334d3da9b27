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

//! Prune unused input fields from a `Filter` that already carries an emit
//! mapping (spec §4.4). Needed fields are the emit's targets plus whatever
//! the condition references; the input gets its own emit installed (or
//! composed with an existing one) and the condition and emit are remapped
//! to the new index space.

use std::collections::BTreeMap;

use rewrite_common::ir::{Common, Relation};
use rewrite_common::Result;
use rewrite_expr::{collect_field_indices, remap_field_indices};

use super::prune_utils::prune_input;
use crate::driver::RewriteRule;

pub struct PruneFilter;

impl RewriteRule for PruneFilter {
    fn name(&self) -> &str {
        "prune_filter"
    }

    fn try_apply(
        &self,
        rel: &Relation,
        _fn_names: &BTreeMap<i32, String>,
    ) -> Result<Option<Relation>> {
        let Relation::Filter { input, condition, common } = rel else {
            return Ok(None);
        };
        let Some(emit) = &common.emit else {
            return Ok(None);
        };

        let Some(extra) = collect_field_indices(condition) else {
            return Ok(None);
        };

        let mut needed: std::collections::BTreeSet<usize> = emit.0.iter().copied().collect();
        needed.extend(extra);

        let Some((new_input, old_to_new)) = prune_input(input, &needed) else {
            return Ok(None);
        };

        let new_condition = remap_field_indices(condition, &old_to_new);
        let new_emit: Vec<usize> = emit.0.iter().map(|i| old_to_new[i]).collect();

        Ok(Some(Relation::Filter {
            input: Box::new(new_input),
            condition: new_condition,
            common: Common::with_emit(new_emit),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rewrite_common::ir::ScalarType;
    use rewrite_common::builder::*;

    fn names() -> BTreeMap<i32, String> {
        BTreeMap::new()
    }

    #[test]
    fn prunes_unreferenced_input_fields() {
        let input = read_rel(vec![ScalarType::I64, ScalarType::I64, ScalarType::I64]);
        let mut f = filter_rel(input, call(1, vec![field(0), lit_i64(1)], ScalarType::Bool));
        *common_mut(&mut f) = Common::with_emit(vec![0]);

        let result = PruneFilter.try_apply(&f, &names()).unwrap().unwrap();
        match result {
            Relation::Filter { input, common, .. } => {
                assert_eq!(common.emit.unwrap().0, vec![0]);
                match *input {
                    Relation::Read { common, .. } => assert_eq!(common.emit.unwrap().0, vec![0]),
                    _ => panic!("expected read"),
                }
            }
            _ => panic!("expected filter"),
        }
    }

    #[test]
    fn no_emit_is_not_applicable() {
        let input = read_rel(vec![ScalarType::I64]);
        let f = filter_rel(input, call(1, vec![field(0), lit_i64(1)], ScalarType::Bool));
        assert!(PruneFilter.try_apply(&f, &names()).unwrap().is_none());
    }
}
