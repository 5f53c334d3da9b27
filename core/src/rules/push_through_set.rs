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

//! Push a filter through a set operation (spec §4.3):
//! `Filter(Set(A, B, ...)) -> Set(Filter(A), Filter(B), ...)`. Safe for
//! every `SetOp` variant because applying the same predicate to every
//! input preserves set semantics; each branch gets its own copy of the
//! condition since the IR has no shared subtrees.

use std::collections::BTreeMap;

use rewrite_common::ir::{Common, Relation, SetOp};
use rewrite_common::Result;

use crate::driver::RewriteRule;

pub struct PushThroughSet;

impl RewriteRule for PushThroughSet {
    fn name(&self) -> &str {
        "push_through_set"
    }

    fn try_apply(
        &self,
        rel: &Relation,
        _fn_names: &BTreeMap<i32, String>,
    ) -> Result<Option<Relation>> {
        let Relation::Filter { input, condition, .. } = rel else {
            return Ok(None);
        };
        let Relation::Set { op, inputs, common } = input.as_ref() else {
            return Ok(None);
        };

        if *op == SetOp::Unspecified {
            return Ok(None);
        }
        if inputs.len() < 2 {
            return Ok(None);
        }

        let new_inputs = inputs
            .iter()
            .map(|inp| Relation::Filter {
                input: Box::new(inp.clone()),
                condition: condition.clone(),
                common: Common::none(),
            })
            .collect();

        Ok(Some(Relation::Set {
            op: *op,
            inputs: new_inputs,
            common: common.clone(),
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
    fn pushes_into_every_branch() {
        let a = read_rel(vec![ScalarType::I64]);
        let b = read_rel(vec![ScalarType::I64]);
        let set = set_rel(SetOp::UnionAll, vec![a, b]);
        let filtered = filter_rel(set, call(1, vec![field(0), lit_i64(5)], ScalarType::Bool));

        let result = PushThroughSet.try_apply(&filtered, &names()).unwrap().unwrap();
        match result {
            Relation::Set { inputs, .. } => {
                assert_eq!(inputs.len(), 2);
                assert!(inputs.iter().all(|i| matches!(i, Relation::Filter { .. })));
            }
            _ => panic!("expected set"),
        }
    }

    #[test]
    fn unspecified_op_is_not_applicable() {
        let a = read_rel(vec![ScalarType::I64]);
        let b = read_rel(vec![ScalarType::I64]);
        let set = set_rel(SetOp::Unspecified, vec![a, b]);
        let filtered = filter_rel(set, call(1, vec![field(0), lit_i64(5)], ScalarType::Bool));
        assert!(PushThroughSet.try_apply(&filtered, &names()).unwrap().is_none());
    }

    #[test]
    fn single_input_is_not_applicable() {
        let a = read_rel(vec![ScalarType::I64]);
        let set = set_rel(SetOp::Minus, vec![a]);
        let filtered = filter_rel(set, call(1, vec![field(0), lit_i64(5)], ScalarType::Bool));
        assert!(PushThroughSet.try_apply(&filtered, &names()).unwrap().is_none());
    }
}
