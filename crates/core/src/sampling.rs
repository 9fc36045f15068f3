// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Host sampling: split deployment hosts into control and test sets
//!
//! `common = pre ∩ post` and `new = post \ common`. The strategy decides how
//! the two sets are compared:
//!
//! | strategy          | `new` empty      | `new` ⊂ post           | `new` == post   |
//! |-------------------|------------------|------------------------|-----------------|
//! | canary            | (post, ∅) canary | (post\new, new) canary | (pre, ∅) canary |
//! | rolling/bluegreen | (pre, post)      | (pre, post)            | (pre, post)     |
//! | auto              | (pre, post)      | (pre, new) canary      | (pre, post)     |
//!
//! Rolling, blue/green and the non-canary auto branches use the before/after
//! model.

use crate::owner::DeploymentStrategy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Statistical model the downstream worker applies to a control/test pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LearningEngineTaskType {
    Canary,
    BeforeAfter,
}

/// Result of partitioning deployment hosts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostPartition {
    pub control: BTreeSet<String>,
    pub test: BTreeSet<String>,
    pub task_type: LearningEngineTaskType,
}

impl HostPartition {
    fn new(
        control: BTreeSet<String>,
        test: BTreeSet<String>,
        task_type: LearningEngineTaskType,
    ) -> Self {
        Self {
            control,
            test,
            task_type,
        }
    }
}

/// Partition `pre` (pre-deployment) and `post` (post-deployment) hosts.
pub fn partition_hosts(
    pre: &BTreeSet<String>,
    post: &BTreeSet<String>,
    strategy: DeploymentStrategy,
) -> HostPartition {
    let new_hosts: BTreeSet<String> = post.difference(pre).cloned().collect();

    match strategy {
        DeploymentStrategy::Canary => {
            if new_hosts.is_empty() {
                HostPartition::new(post.clone(), BTreeSet::new(), LearningEngineTaskType::Canary)
            } else if new_hosts.len() < post.len() {
                let control = post.difference(&new_hosts).cloned().collect();
                HostPartition::new(control, new_hosts, LearningEngineTaskType::Canary)
            } else {
                // Every post host is new: nothing to canary against, baseline only.
                HostPartition::new(pre.clone(), BTreeSet::new(), LearningEngineTaskType::Canary)
            }
        }
        DeploymentStrategy::Rolling | DeploymentStrategy::BlueGreen => HostPartition::new(
            pre.clone(),
            post.clone(),
            LearningEngineTaskType::BeforeAfter,
        ),
        DeploymentStrategy::Auto => {
            if !new_hosts.is_empty() && new_hosts.len() < post.len() {
                HostPartition::new(pre.clone(), new_hosts, LearningEngineTaskType::Canary)
            } else {
                HostPartition::new(
                    pre.clone(),
                    post.clone(),
                    LearningEngineTaskType::BeforeAfter,
                )
            }
        }
    }
}

#[cfg(test)]
#[path = "sampling_tests.rs"]
mod tests;
