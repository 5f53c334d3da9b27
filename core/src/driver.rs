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

//! The recursive pre-order tree walker that applies a rule group to a
//! relation tree (spec §4.7).

use std::collections::BTreeMap;

use rewrite_common::ir::Relation;
use rewrite_common::Result;

/// A self-contained pattern-match-and-rewrite unit. Returns the replacement
/// subtree, or `Ok(None)` when the rule's precondition doesn't hold —
/// including when it bottoms out on an unanalyzable expression (spec §7:
/// that degrades to "not applicable", never an error).
pub trait RewriteRule {
    fn name(&self) -> &str;

    fn try_apply(
        &self,
        rel: &Relation,
        fn_names: &BTreeMap<i32, String>,
    ) -> Result<Option<Relation>>;
}

/// Is `rel`'s variant a possible match for any rule in the rewrite group?
/// All of filter pushdown, projection pruning and identity-project removal
/// key off one of these seven outer shapes (see spec §4.3, §4.4, §4.6).
/// `Read` and `Aggregate` are only ever matched as an *inner* shape by a
/// rule keyed on one of these, never as the dispatch target themselves.
fn eligible_for_rewrite_group(rel: &Relation) -> bool {
    matches!(
        rel,
        Relation::Filter { .. }
            | Relation::Project { .. }
            | Relation::Join { .. }
            | Relation::Cross { .. }
            | Relation::Sort { .. }
            | Relation::Fetch { .. }
            | Relation::Set { .. }
    )
}

/// Recursively optimizes `rel`: at a node eligible for the rewrite group,
/// tries `rules` in order; the first one that fires wins and its
/// replacement is returned *without* re-descending into it in this call —
/// the fixed-point loop (driven from `lib.rs`) is what lets further rules
/// apply to the replacement on the next pass. If no rule fires, recurses
/// into every nested relation (including repeated fields like `Set`'s
/// `inputs`) via explicit exhaustive matching rather than reflection.
pub fn optimize_rel(
    rel: &Relation,
    rules: &[Box<dyn RewriteRule>],
    fn_names: &BTreeMap<i32, String>,
) -> Result<Relation> {
    if eligible_for_rewrite_group(rel) {
        for rule in rules {
            if let Some(replacement) = rule.try_apply(rel, fn_names)? {
                log::trace!(
                    "rule `{}` rewrote a `{}` node",
                    rule.name(),
                    rel.kind()
                );
                return Ok(replacement);
            }
        }
    }
    recurse_children(rel, rules, fn_names)
}

fn recurse_children(
    rel: &Relation,
    rules: &[Box<dyn RewriteRule>],
    fn_names: &BTreeMap<i32, String>,
) -> Result<Relation> {
    let rel = match rel.clone() {
        Relation::Read { .. } => rel.clone(),
        Relation::Filter {
            input,
            condition,
            common,
        } => Relation::Filter {
            input: Box::new(optimize_rel(&input, rules, fn_names)?),
            condition,
            common,
        },
        Relation::Project {
            input,
            expressions,
            common,
        } => Relation::Project {
            input: Box::new(optimize_rel(&input, rules, fn_names)?),
            expressions,
            common,
        },
        Relation::Cross { left, right, common } => Relation::Cross {
            left: Box::new(optimize_rel(&left, rules, fn_names)?),
            right: Box::new(optimize_rel(&right, rules, fn_names)?),
            common,
        },
        Relation::Join {
            left,
            right,
            join_type,
            condition,
            post_join_filter,
            common,
        } => Relation::Join {
            left: Box::new(optimize_rel(&left, rules, fn_names)?),
            right: Box::new(optimize_rel(&right, rules, fn_names)?),
            join_type,
            condition,
            post_join_filter,
            common,
        },
        Relation::Aggregate {
            input,
            groupings,
            measures,
            common,
        } => Relation::Aggregate {
            input: Box::new(optimize_rel(&input, rules, fn_names)?),
            groupings,
            measures,
            common,
        },
        Relation::Sort { input, keys, common } => Relation::Sort {
            input: Box::new(optimize_rel(&input, rules, fn_names)?),
            keys,
            common,
        },
        Relation::Fetch {
            input,
            offset,
            count,
            common,
        } => Relation::Fetch {
            input: Box::new(optimize_rel(&input, rules, fn_names)?),
            offset,
            count,
            common,
        },
        Relation::Set { op, inputs, common } => {
            let new_inputs = inputs
                .iter()
                .map(|i| optimize_rel(i, rules, fn_names))
                .collect::<Result<Vec<_>>>()?;
            Relation::Set {
                op,
                inputs: new_inputs,
                common,
            }
        }
    };
    Ok(rel)
}
