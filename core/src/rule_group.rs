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

//! The rule-group component contract (spec §6): a named, independently
//! describable unit of optimization that takes an encoded plan and returns
//! an encoded plan (or a string error at that host boundary).

use rewrite_common::codec::{from_bytes, to_bytes};
use rewrite_common::ir::Plan;
use rewrite_common::error::RuleGroupError;

use crate::driver::{optimize_rel, RewriteRule};
use crate::simplify_pass::{remove_trivial_filters, simplify_tree};

/// Metadata a rule group reports about itself, independent of its
/// implementation — used for logging and introspection by a host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleGroupInfo {
    pub name: &'static str,
    pub description: &'static str,
}

/// A named, self-describing optimization unit operating on encoded plan
/// bytes. `optimize_bytes` is the component-boundary entry point a host
/// calls; `optimize` is the typed entry point the fixed-point driver uses
/// directly to avoid a decode/encode round trip on every iteration.
pub trait RuleGroup {
    fn info(&self) -> RuleGroupInfo;

    fn optimize(&self, plan: &Plan) -> rewrite_common::Result<Plan>;

    fn optimize_bytes(&self, plan: &[u8]) -> Result<Vec<u8>, RuleGroupError> {
        let decoded = from_bytes(plan)?;
        let optimized = self.optimize(&decoded)?;
        Ok(to_bytes(&optimized)?)
    }
}

/// Filter pushdown and projection pruning, applied in the fixed rule order
/// the rest of the crate is built from (spec §4.3-§4.6).
pub struct RewriteRuleGroup {
    rules: Vec<Box<dyn RewriteRule>>,
}

impl RewriteRuleGroup {
    pub fn new() -> Self {
        use crate::rules::*;

        let rules: Vec<Box<dyn RewriteRule>> = vec![
            Box::new(MergeAdjacentFilters),
            Box::new(PushThroughCross),
            Box::new(PushThroughJoin),
            Box::new(PushThroughProject),
            Box::new(PushThroughAggregate),
            Box::new(PushThroughSet),
            Box::new(PushThroughPassthrough),
            Box::new(PushIntoRead),
            Box::new(PruneProject),
            Box::new(PruneFilter),
            Box::new(PruneJoin),
            Box::new(PruneCross),
            Box::new(PruneSort),
            Box::new(PruneFetch),
            Box::new(PruneSet),
            Box::new(RemoveIdentityProject),
        ];

        RewriteRuleGroup { rules }
    }
}

impl Default for RewriteRuleGroup {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleGroup for RewriteRuleGroup {
    fn info(&self) -> RuleGroupInfo {
        RuleGroupInfo {
            name: "rel-rules",
            description: "Filter pushdown and projection pruning optimizations",
        }
    }

    fn optimize(&self, plan: &Plan) -> rewrite_common::Result<Plan> {
        let roots = plan
            .roots
            .iter()
            .map(|root| optimize_rel(root, &self.rules, &plan.extensions))
            .collect::<rewrite_common::Result<Vec<_>>>()?;
        Ok(Plan::new(roots, plan.extensions.clone()))
    }
}

/// Simplifies boolean expressions and removes trivially-true filters
/// (spec §4.5).
pub struct PredicateSimplificationRuleGroup;

impl RuleGroup for PredicateSimplificationRuleGroup {
    fn info(&self) -> RuleGroupInfo {
        RuleGroupInfo {
            name: "predicate-simplification",
            description: "Simplify boolean expressions and remove trivially true filters",
        }
    }

    fn optimize(&self, plan: &Plan) -> rewrite_common::Result<Plan> {
        let simplified: Vec<_> = plan
            .roots
            .iter()
            .map(|root| simplify_tree(root, &plan.extensions))
            .collect();
        let pruned: Vec<_> = simplified.iter().map(remove_trivial_filters).collect();
        Ok(Plan::new(pruned, plan.extensions.clone()))
    }
}
