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

//! The rewrite core: a rule-based optimizer for the relational plan IR
//! defined in `rewrite-common` (spec §1-§2).
//!
//! [`optimize_bytes`] is the component-boundary entry point a host calls;
//! it decodes a plan, runs every rule group to a fixed point (spec §4.7,
//! §6), and re-encodes the result.

pub mod driver;
pub mod rule_group;
pub mod rules;
pub mod simplify_pass;

use rewrite_common::codec::{from_bytes, to_bytes};
use rewrite_common::error::RuleGroupError;
use rewrite_common::ir::Plan;
use rewrite_common::{Result, RewriteError};

pub use rule_group::{PredicateSimplificationRuleGroup, RewriteRuleGroup, RuleGroup, RuleGroupInfo};

/// Default bound on fixed-point iterations (spec §4.7), guarding against
/// non-convergence in a buggy or adversarial rule set.
pub const DEFAULT_MAX_ITERATIONS: usize = 10;

/// Runs every rule group against `plan` in order, repeating the whole
/// sequence until the serialized plan is byte-stable between two
/// consecutive iterations or `max_iterations` passes have run (spec §5:
/// termination is defined as byte equality, not semantic equality).
///
/// Non-convergence within the bound is not an error (spec §7): the
/// last-known state is returned as-is.
pub fn optimize(plan: &Plan, max_iterations: usize) -> Result<Plan> {
    plan.validate_function_anchors()?;

    let groups: Vec<Box<dyn RuleGroup>> = vec![
        Box::new(RewriteRuleGroup::new()),
        Box::new(PredicateSimplificationRuleGroup),
    ];

    let mut current = plan.clone();
    let mut current_bytes = to_bytes(&current)?;

    for _ in 0..max_iterations {
        let mut next = current.clone();
        for group in &groups {
            next = group.optimize(&next)?;
        }
        let next_bytes = to_bytes(&next)?;
        if next_bytes == current_bytes {
            return Ok(next);
        }
        current = next;
        current_bytes = next_bytes;
    }

    log::debug!(
        "fixed-point iteration cap ({max_iterations}) reached without byte-stability"
    );
    Ok(current)
}

/// The rule-group component contract's `optimize` operation, applied to
/// the full rewrite core rather than a single group (spec §6): takes
/// opaque plan bytes, returns opaque plan bytes or an error string.
pub fn optimize_bytes(plan_bytes: &[u8]) -> std::result::Result<Vec<u8>, RuleGroupError> {
    let plan = from_bytes(plan_bytes)?;
    let optimized = optimize(&plan, DEFAULT_MAX_ITERATIONS)?;
    validate_arity_preserved(&plan, &optimized)?;
    Ok(to_bytes(&optimized)?)
}

/// Every rule must preserve each root's effective arity (spec §3's
/// rewrite-safety invariant). Checked only where both sides resolve a
/// definite arity, at the same boundary where a host calls in with opaque
/// bytes and can't otherwise tell a rule bug from a legitimate shape change.
fn validate_arity_preserved(before: &Plan, after: &Plan) -> Result<()> {
    if before.roots.len() != after.roots.len() {
        return Err(RewriteError::internal(format!(
            "root count changed from {} to {} during optimization",
            before.roots.len(),
            after.roots.len()
        )));
    }
    for (before_root, after_root) in before.roots.iter().zip(after.roots.iter()) {
        if let (Some(before_arity), Some(after_arity)) =
            (before_root.effective_arity(), after_root.effective_arity())
        {
            if before_arity != after_arity {
                return Err(RewriteError::internal(format!(
                    "root arity changed from {before_arity} to {after_arity} during optimization"
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rewrite_common::builder::*;
    use rewrite_common::ir::ScalarType;
    use std::collections::BTreeMap;

    fn and_names() -> BTreeMap<i32, String> {
        BTreeMap::from([(1, "and".to_string()), (2, "gt".to_string())])
    }

    #[test]
    fn fixed_point_is_idempotent() {
        let _ = env_logger::try_init();

        let left = read_rel(vec![ScalarType::I64, ScalarType::I64]);
        let right = read_rel(vec![ScalarType::I64, ScalarType::I64]);
        let cond = call(1, vec![field(0), field(2)], ScalarType::Bool);
        let plan = Plan::new(
            vec![filter_rel(cross_rel(left, right), cond)],
            and_names(),
        );

        let once = optimize(&plan, DEFAULT_MAX_ITERATIONS).unwrap();
        let twice = optimize(&once, DEFAULT_MAX_ITERATIONS).unwrap();
        assert_eq!(to_bytes(&once).unwrap(), to_bytes(&twice).unwrap());
    }

    #[test]
    fn cross_with_mixed_predicate_becomes_inner_join() {
        use rewrite_common::ir::Relation;

        let _ = env_logger::try_init();

        let left = read_rel(vec![ScalarType::I64, ScalarType::I64]);
        let right = read_rel(vec![ScalarType::I64, ScalarType::I64]);
        let cond = call(2, vec![field(0), field(2)], ScalarType::Bool);
        let plan = Plan::new(
            vec![filter_rel(cross_rel(left, right), cond.clone())],
            and_names(),
        );

        let result = optimize(&plan, DEFAULT_MAX_ITERATIONS).unwrap();
        match &result.roots[0] {
            Relation::Join { condition, .. } => {
                assert_eq!(condition.as_ref(), Some(&cond));
            }
            other => panic!("expected join, got {other:?}"),
        }
    }

    #[test]
    fn optimize_bytes_roundtrips_through_the_codec() {
        let plan = Plan::new(vec![read_rel(vec![ScalarType::I64])], BTreeMap::new());
        let bytes = to_bytes(&plan).unwrap();
        let out = optimize_bytes(&bytes).unwrap();
        let decoded = from_bytes(&out).unwrap();
        assert_eq!(decoded.roots.len(), 1);
    }

    #[test]
    fn malformed_bytes_surface_as_an_error_string() {
        let err = optimize_bytes(b"not a plan").unwrap_err();
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn optimize_rejects_a_plan_with_an_unresolved_function_anchor() {
        let cond = call(9, vec![field(0)], ScalarType::Bool);
        let plan = Plan::new(
            vec![filter_rel(read_rel(vec![ScalarType::I64]), cond)],
            BTreeMap::new(),
        );

        let err = optimize(&plan, DEFAULT_MAX_ITERATIONS).unwrap_err();
        assert!(err.to_string().contains("9"));
    }

    #[test]
    fn validate_arity_preserved_flags_a_root_count_mismatch() {
        let before = Plan::new(vec![read_rel(vec![ScalarType::I64])], BTreeMap::new());
        let after = Plan::new(vec![], BTreeMap::new());
        assert!(validate_arity_preserved(&before, &after).is_err());
    }

    #[test]
    fn validate_arity_preserved_flags_a_changed_root_arity() {
        let before = Plan::new(vec![read_rel(vec![ScalarType::I64])], BTreeMap::new());
        let after = Plan::new(
            vec![read_rel(vec![ScalarType::I64, ScalarType::I64])],
            BTreeMap::new(),
        );
        assert!(validate_arity_preserved(&before, &after).is_err());
    }

    #[test]
    fn validate_arity_preserved_accepts_matching_roots() {
        let before = Plan::new(vec![read_rel(vec![ScalarType::I64])], BTreeMap::new());
        let after = before.clone();
        assert!(validate_arity_preserved(&before, &after).is_ok());
    }
}
