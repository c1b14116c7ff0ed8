//! Module: colocation
//! Responsibility: partition/node vocabulary and per-scan group membership.
//! Does not own: partition assignment or routing decisions.
//! Boundary: the executor and index cursors consult group membership here.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

///
/// PartitionId
///
/// Identifier of one data partition of a distributed table.
///

#[derive(
    Clone, Copy, Debug, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub struct PartitionId(pub u16);

///
/// NodeId
///
/// Identifier of one cluster node owning partitions. Routing metadata only;
/// the executor never dereferences nodes itself.
///

#[derive(
    Clone, Copy, Debug, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub struct NodeId(pub u16);

///
/// ColocationGroup
///
/// The set of partitions one scan invocation is restricted to. Immutable for
/// the invocation's duration. An empty explicit set means "no partitions
/// eligible" and must short-circuit the scan before any cursor is opened.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ColocationGroup {
    /// Replicated table: every partition is eligible.
    All,
    /// Partitioned table: explicit membership set.
    Partitions(BTreeSet<PartitionId>),
    /// Point lookup after partition pruning.
    Single(PartitionId),
}

impl ColocationGroup {
    /// Build an explicit partition set group.
    #[must_use]
    pub fn of(partitions: impl IntoIterator<Item = PartitionId>) -> Self {
        Self::Partitions(partitions.into_iter().collect())
    }

    /// Whether one candidate entry's partition is included.
    #[must_use]
    pub fn contains(&self, partition: PartitionId) -> bool {
        match self {
            Self::All => true,
            Self::Partitions(set) => set.contains(&partition),
            Self::Single(single) => *single == partition,
        }
    }

    /// Whether no partition can ever match.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Partitions(set) if set.is_empty())
    }

    /// Short diagnostic label for trace and metrics surfaces.
    #[must_use]
    pub const fn shape_label(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Partitions(_) => "set",
            Self::Single(_) => "single",
        }
    }
}

///
/// PartitionAssignments
///
/// Optional node-ownership annotation carried next to a group for distributed
/// routing layers above this core.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct PartitionAssignments {
    owners: BTreeMap<PartitionId, NodeId>,
}

impl PartitionAssignments {
    #[must_use]
    pub fn new(owners: impl IntoIterator<Item = (PartitionId, NodeId)>) -> Self {
        Self {
            owners: owners.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn owner_of(&self, partition: PartitionId) -> Option<NodeId> {
        self.owners.get(&partition).copied()
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::{ColocationGroup, NodeId, PartitionAssignments, PartitionId};

    #[test]
    fn group_shapes_answer_membership() {
        let all = ColocationGroup::All;
        let set = ColocationGroup::of([PartitionId(1), PartitionId(3)]);
        let single = ColocationGroup::Single(PartitionId(2));

        assert!(all.contains(PartitionId(9)));
        assert!(set.contains(PartitionId(3)));
        assert!(!set.contains(PartitionId(2)));
        assert!(single.contains(PartitionId(2)));
        assert!(!single.contains(PartitionId(3)));
    }

    #[test]
    fn only_the_empty_explicit_set_is_empty() {
        assert!(ColocationGroup::of([]).is_empty());
        assert!(!ColocationGroup::All.is_empty());
        assert!(!ColocationGroup::Single(PartitionId(0)).is_empty());
        assert!(!ColocationGroup::of([PartitionId(0)]).is_empty());
    }

    #[test]
    fn assignments_resolve_owning_nodes() {
        let assignments = PartitionAssignments::new([
            (PartitionId(0), NodeId(10)),
            (PartitionId(1), NodeId(11)),
        ]);

        assert_eq!(assignments.owner_of(PartitionId(1)), Some(NodeId(11)));
        assert_eq!(assignments.owner_of(PartitionId(7)), None);
    }
}
