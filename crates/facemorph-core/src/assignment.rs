//! Per-region lists of chosen reference meshes.
//!
//! The position of a reference in its region's list is the position of its
//! weight in the interpolation control, so lists keep insertion order.

use std::collections::HashMap;

use crate::error::{MorphError, Result};
use crate::region::Region;
use crate::registry::ReferenceMeshId;

/// Assignment progress of a region, for UI gating messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionStatus {
    pub assigned_count: usize,
    pub required: usize,
}

impl RegionStatus {
    /// Returns true once the region has its full set of references.
    pub fn is_ready(&self) -> bool {
        self.assigned_count >= self.required
    }

    /// Returns how many references are still missing.
    pub fn missing(&self) -> usize {
        self.required.saturating_sub(self.assigned_count)
    }
}

/// Ordered reference assignments for every region.
#[derive(Debug, Clone)]
pub struct RegionAssignments {
    cap: usize,
    lists: HashMap<Region, Vec<ReferenceMeshId>>,
}

impl RegionAssignments {
    /// Creates empty assignments allowing `cap` references per region.
    pub fn new(cap: usize) -> Self {
        Self {
            cap,
            lists: HashMap::new(),
        }
    }

    /// Returns the per-region cap.
    pub fn cap(&self) -> usize {
        self.cap
    }

    /// Appends a reference to a region and returns its position.
    pub fn assign(&mut self, region: Region, reference: ReferenceMeshId) -> Result<usize> {
        let list = self.lists.entry(region).or_default();
        if list.contains(&reference) {
            return Err(MorphError::AlreadyAssigned {
                region,
                reference: reference.0,
            });
        }
        if list.len() >= self.cap {
            return Err(MorphError::ReferenceCapExceeded {
                region,
                cap: self.cap,
            });
        }
        list.push(reference);
        Ok(list.len() - 1)
    }

    /// Removes a reference from a region. Returns whether it was assigned.
    pub fn unassign(&mut self, region: Region, reference: &ReferenceMeshId) -> bool {
        let Some(list) = self.lists.get_mut(&region) else {
            return false;
        };
        let before = list.len();
        list.retain(|r| r != reference);
        list.len() != before
    }

    /// Returns the references of a region in assignment order.
    pub fn references(&self, region: Region) -> &[ReferenceMeshId] {
        self.lists.get(&region).map_or(&[][..], Vec::as_slice)
    }

    /// Returns whether the reference is assigned to the region.
    pub fn contains(&self, region: Region, reference: &ReferenceMeshId) -> bool {
        self.references(region).contains(reference)
    }

    /// Returns the assignment status of a region.
    pub fn status(&self, region: Region) -> RegionStatus {
        RegionStatus {
            assigned_count: self.references(region).len(),
            required: self.cap,
        }
    }

    /// Iterates over every `(region, reference)` pair, regions in panel order
    /// and references in assignment order.
    pub fn iter(&self) -> impl Iterator<Item = (Region, &ReferenceMeshId)> + '_ {
        Region::ALL
            .into_iter()
            .flat_map(move |region| self.references(region).iter().map(move |r| (region, r)))
    }

    /// Removes every assignment.
    pub fn clear(&mut self) {
        self.lists.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(ids: &[&str]) -> Vec<ReferenceMeshId> {
        ids.iter().copied().map(ReferenceMeshId::from).collect()
    }

    #[test]
    fn test_assign_in_order() {
        let mut assignments = RegionAssignments::new(3);
        assert_eq!(assignments.assign(Region::Nose, "a".into()).unwrap(), 0);
        assert_eq!(assignments.assign(Region::Nose, "b".into()).unwrap(), 1);
        assert_eq!(assignments.references(Region::Nose), ids(&["a", "b"]));
        assert!(assignments.references(Region::Jaw).is_empty());
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut assignments = RegionAssignments::new(3);
        assignments.assign(Region::Nose, "a".into()).unwrap();
        assert!(matches!(
            assignments.assign(Region::Nose, "a".into()),
            Err(MorphError::AlreadyAssigned { .. })
        ));
        // Another region may use the same reference.
        assert!(assignments.assign(Region::Chin, "a".into()).is_ok());
    }

    #[test]
    fn test_cap_rejected_not_truncated() {
        let mut assignments = RegionAssignments::new(1);
        assignments.assign(Region::Ears, "a".into()).unwrap();
        assert!(matches!(
            assignments.assign(Region::Ears, "b".into()),
            Err(MorphError::ReferenceCapExceeded { cap: 1, .. })
        ));
        assert_eq!(assignments.references(Region::Ears), ids(&["a"]));
    }

    #[test]
    fn test_status_and_unassign() {
        let mut assignments = RegionAssignments::new(3);
        assignments.assign(Region::Jaw, "a".into()).unwrap();
        let status = assignments.status(Region::Jaw);
        assert_eq!(status.assigned_count, 1);
        assert_eq!(status.missing(), 2);
        assert!(!status.is_ready());

        assert!(assignments.unassign(Region::Jaw, &"a".into()));
        assert!(!assignments.unassign(Region::Jaw, &"a".into()));
        assert_eq!(assignments.status(Region::Jaw).assigned_count, 0);
    }

    #[test]
    fn test_iter_order() {
        let mut assignments = RegionAssignments::new(3);
        assignments.assign(Region::Chin, "c".into()).unwrap();
        assignments.assign(Region::Nose, "n1".into()).unwrap();
        assignments.assign(Region::Nose, "n2".into()).unwrap();
        let pairs: Vec<_> = assignments
            .iter()
            .map(|(region, r)| (region, r.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![(Region::Nose, "n1"), (Region::Nose, "n2"), (Region::Chin, "c")]
        );
    }
}
