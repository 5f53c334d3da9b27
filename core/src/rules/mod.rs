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

//! Individual rewrite rules (spec §4.3-§4.5), grouped by rule-group
//! membership in [`crate::rule_group`].

mod merge_adjacent_filters;
mod prune_cross;
mod prune_fetch;
mod prune_filter;
mod prune_join;
mod prune_project;
mod prune_set;
mod prune_sort;
mod prune_utils;
mod push_into_read;
mod push_through_aggregate;
mod push_through_cross;
mod push_through_join;
mod push_through_passthrough;
mod push_through_project;
mod push_through_set;
mod remove_identity_project;

pub use merge_adjacent_filters::MergeAdjacentFilters;
pub use prune_cross::PruneCross;
pub use prune_fetch::PruneFetch;
pub use prune_filter::PruneFilter;
pub use prune_join::PruneJoin;
pub use prune_project::PruneProject;
pub use prune_set::PruneSet;
pub use prune_sort::PruneSort;
pub use push_into_read::PushIntoRead;
pub use push_through_aggregate::PushThroughAggregate;
pub use push_through_cross::PushThroughCross;
pub use push_through_join::PushThroughJoin;
pub use push_through_passthrough::PushThroughPassthrough;
pub use push_through_project::PushThroughProject;
pub use push_through_set::PushThroughSet;
pub use remove_identity_project::RemoveIdentityProject;
