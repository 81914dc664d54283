//! Group-based exercise unlocking.
//!
//! Exercises of a day are gated in groups of three: group 0 is open from the
//! start, and each later group opens once at least one exercise of the
//! previous group is completed. The "everything open" variant is kept as an
//! injectable policy instead of a second code path.
//!
//! Both entry points share one decision function, so `is_exercise_unlocked`
//! and `calculate_unlock_status` can never disagree about an index.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Exercises unlock in batches of this size.
pub const GROUP_SIZE: usize = 3;

/// Gating strategy, selectable in the program config.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnlockPolicy {
    /// Groups of `GROUP_SIZE`, each opened by progress in the previous one.
    #[default]
    GroupGated,
    /// Every exercise accessible immediately.
    AllUnlocked,
}

/// Derived unlock state for one exercise position within a day.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnlockStatus {
    pub exercise_index: usize,
    pub group_number: usize,
    pub is_unlocked: bool,
    pub is_completed: bool,
}

/// Whether the exercise at `order` is accessible given the completed set.
pub fn is_exercise_unlocked(
    policy: UnlockPolicy,
    order: usize,
    completed: &BTreeSet<usize>,
) -> bool {
    match policy {
        UnlockPolicy::AllUnlocked => true,
        UnlockPolicy::GroupGated => {
            let group = order / GROUP_SIZE;
            if group == 0 {
                return true;
            }
            let previous_start = (group - 1) * GROUP_SIZE;
            (previous_start..previous_start + GROUP_SIZE).any(|i| completed.contains(&i))
        }
    }
}

/// Unlock state for every exercise position `0..total_exercises`.
/// Completed indices beyond the range are tolerated and simply ignored.
pub fn calculate_unlock_status(
    policy: UnlockPolicy,
    total_exercises: usize,
    completed: &BTreeSet<usize>,
) -> Vec<UnlockStatus> {
    (0..total_exercises)
        .map(|i| UnlockStatus {
            exercise_index: i,
            group_number: i / GROUP_SIZE,
            is_unlocked: is_exercise_unlocked(policy, i, completed),
            is_completed: completed.contains(&i),
        })
        .collect()
}

/// First group that is not yet fully unlocked, or the last group if all are
/// open. None when the day has no exercises.
pub fn next_group_to_unlock(
    policy: UnlockPolicy,
    total_exercises: usize,
    completed: &BTreeSet<usize>,
) -> Option<usize> {
    if total_exercises == 0 {
        return None;
    }
    let statuses = calculate_unlock_status(policy, total_exercises, completed);
    let groups = total_exercises.div_ceil(GROUP_SIZE);
    for g in 0..groups {
        let all_unlocked = statuses
            .iter()
            .filter(|s| s.group_number == g)
            .all(|s| s.is_unlocked);
        if !all_unlocked {
            return Some(g);
        }
    }
    Some(groups - 1)
}

/// Boundary checker for raw caller input. Rejects a negative total or
/// negative completed indices instead of coercing them.
pub fn try_unlock_status(
    policy: UnlockPolicy,
    total_exercises: i64,
    completed: &[i64],
) -> Result<Vec<UnlockStatus>, ApiError> {
    if total_exercises < 0 {
        return Err(ApiError::InvalidInput(format!(
            "totalExercises must be >= 0, got {total_exercises}"
        )));
    }
    let set = checked_completed_set(completed)?;
    Ok(calculate_unlock_status(policy, total_exercises as usize, &set))
}

/// Validate raw completed indices into a set. Negative members are an error;
/// duplicates collapse silently.
pub fn checked_completed_set(completed: &[i64]) -> Result<BTreeSet<usize>, ApiError> {
    let mut set = BTreeSet::new();
    for &idx in completed {
        if idx < 0 {
            return Err(ApiError::InvalidInput(format!(
                "completed indices must be >= 0, got {idx}"
            )));
        }
        set.insert(idx as usize);
    }
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(indices: &[usize]) -> BTreeSet<usize> {
        indices.iter().copied().collect()
    }

    #[test]
    fn first_group_always_open() {
        for total in [1usize, 2, 3, 7, 9] {
            let statuses =
                calculate_unlock_status(UnlockPolicy::GroupGated, total, &BTreeSet::new());
            for s in statuses.iter().take(GROUP_SIZE) {
                assert!(s.is_unlocked, "index {} must be open", s.exercise_index);
            }
        }
    }

    #[test]
    fn empty_completion_locks_later_groups() {
        // 9 exercises, nothing completed: 0-2 open, 3-8 locked.
        let statuses = calculate_unlock_status(UnlockPolicy::GroupGated, 9, &BTreeSet::new());
        assert_eq!(statuses.len(), 9);
        for s in &statuses {
            assert_eq!(s.is_unlocked, s.exercise_index < 3);
            assert!(!s.is_completed);
        }
    }

    #[test]
    fn one_completion_opens_next_group_only() {
        // 9 exercises, index 1 completed: group 1 opens, group 2 stays shut.
        let statuses = calculate_unlock_status(UnlockPolicy::GroupGated, 9, &set(&[1]));
        assert!(statuses[1].is_completed);
        for s in &statuses {
            let expected = s.exercise_index < 6;
            assert_eq!(s.is_unlocked, expected, "index {}", s.exercise_index);
        }
    }

    #[test]
    fn unlocking_is_monotone_in_completed_set() {
        let total = 12;
        let base = set(&[0, 4]);
        let before = calculate_unlock_status(UnlockPolicy::GroupGated, total, &base);
        for extra in 0..total {
            let mut grown = base.clone();
            grown.insert(extra);
            let after = calculate_unlock_status(UnlockPolicy::GroupGated, total, &grown);
            for (b, a) in before.iter().zip(after.iter()) {
                assert!(
                    !b.is_unlocked || a.is_unlocked,
                    "adding {extra} relocked index {}",
                    b.exercise_index
                );
            }
        }
    }

    #[test]
    fn entry_points_agree() {
        let total = 11;
        let completed = set(&[0, 2, 5, 9]);
        for policy in [UnlockPolicy::GroupGated, UnlockPolicy::AllUnlocked] {
            let statuses = calculate_unlock_status(policy, total, &completed);
            for i in 0..total {
                assert_eq!(
                    is_exercise_unlocked(policy, i, &completed),
                    statuses[i].is_unlocked,
                    "policy {policy:?}, index {i}"
                );
            }
        }
    }

    #[test]
    fn all_unlocked_policy_ignores_completions() {
        let statuses = calculate_unlock_status(UnlockPolicy::AllUnlocked, 9, &BTreeSet::new());
        assert!(statuses.iter().all(|s| s.is_unlocked));
    }

    #[test]
    fn zero_exercises_yields_empty() {
        assert!(calculate_unlock_status(UnlockPolicy::GroupGated, 0, &set(&[0])).is_empty());
        assert_eq!(
            next_group_to_unlock(UnlockPolicy::GroupGated, 0, &BTreeSet::new()),
            None
        );
    }

    #[test]
    fn out_of_range_completions_are_tolerated() {
        let statuses = calculate_unlock_status(UnlockPolicy::GroupGated, 4, &set(&[0, 42]));
        assert_eq!(statuses.len(), 4);
        assert!(statuses[3].is_unlocked); // opened by index 0
        assert!(statuses.iter().all(|s| s.exercise_index != 42));
    }

    #[test]
    fn next_group_walks_forward() {
        // Nothing done: group 1 is the first not fully unlocked.
        assert_eq!(
            next_group_to_unlock(UnlockPolicy::GroupGated, 9, &BTreeSet::new()),
            Some(1)
        );
        // Group 0 progressed: group 2 is next.
        assert_eq!(
            next_group_to_unlock(UnlockPolicy::GroupGated, 9, &set(&[0])),
            Some(2)
        );
        // Everything reachable: report the last group.
        assert_eq!(
            next_group_to_unlock(UnlockPolicy::GroupGated, 9, &set(&[0, 3, 6])),
            Some(2)
        );
        assert_eq!(
            next_group_to_unlock(UnlockPolicy::AllUnlocked, 9, &BTreeSet::new()),
            Some(2)
        );
    }

    #[test]
    fn boundary_rejects_negative_input() {
        let err = try_unlock_status(UnlockPolicy::GroupGated, -1, &[]).unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));

        let err = try_unlock_status(UnlockPolicy::GroupGated, 6, &[1, -2]).unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));

        let ok = try_unlock_status(UnlockPolicy::GroupGated, 6, &[1, 1, 9]).unwrap();
        assert_eq!(ok.len(), 6);
        assert!(ok[3].is_unlocked);
    }
}
