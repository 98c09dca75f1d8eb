/// Property-based tests for the gap-tolerant numbering model
///
/// These tests drive the pure numbering functions through arbitrary
/// add/remove/renumber sequences and verify the invariants the roster
/// relies on: numbers stay unique, renumbering compacts without reordering,
/// and gap detection is the exact complement of the used numbers.
use proptest::prelude::*;
use skat_tourney::registry::numbering::{
    find_gaps, next_free_number, renumber_all_plan, renumber_from_plan,
};
use std::collections::BTreeSet;

/// One operator action against the roster
#[derive(Debug, Clone)]
enum Action {
    Add,
    Remove(usize),
    RenumberAll,
    RenumberFrom(u32),
}

fn action_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![
        3 => Just(Action::Add),
        2 => (0usize..64).prop_map(Action::Remove),
        1 => Just(Action::RenumberAll),
        1 => (1u32..32).prop_map(Action::RenumberFrom),
    ]
}

/// In-memory roster mirror: (participant_id, player_no) rows mutated the way
/// the manager mutates the table.
#[derive(Default)]
struct Roster {
    rows: Vec<(i64, u32)>,
    next_id: i64,
}

impl Roster {
    fn apply(&mut self, action: &Action) {
        match action {
            Action::Add => {
                let used: Vec<u32> = self.rows.iter().map(|&(_, no)| no).collect();
                self.next_id += 1;
                self.rows.push((self.next_id, next_free_number(&used)));
            }
            Action::Remove(idx) => {
                if !self.rows.is_empty() {
                    self.rows.remove(idx % self.rows.len());
                }
            }
            Action::RenumberAll => {
                for change in renumber_all_plan(&self.rows) {
                    let row = self
                        .rows
                        .iter_mut()
                        .find(|(id, _)| *id == change.participant_id)
                        .unwrap();
                    row.1 = change.new_player_no;
                }
            }
            Action::RenumberFrom(start) => {
                for change in renumber_from_plan(&self.rows, *start) {
                    let row = self
                        .rows
                        .iter_mut()
                        .find(|(id, _)| *id == change.participant_id)
                        .unwrap();
                    row.1 = change.new_player_no;
                }
            }
        }
    }

    fn numbers(&self) -> Vec<u32> {
        self.rows.iter().map(|&(_, no)| no).collect()
    }
}

proptest! {
    #[test]
    fn test_numbers_stay_unique_under_any_sequence(
        actions in prop::collection::vec(action_strategy(), 0..40)
    ) {
        let mut roster = Roster::default();
        for action in &actions {
            roster.apply(action);

            let numbers = roster.numbers();
            let distinct: BTreeSet<u32> = numbers.iter().copied().collect();
            prop_assert_eq!(
                distinct.len(),
                numbers.len(),
                "duplicate player_no after {:?}",
                action
            );
            prop_assert!(numbers.iter().all(|&no| no > 0));
        }
    }

    #[test]
    fn test_renumber_all_yields_dense_block_and_is_idempotent(
        actions in prop::collection::vec(action_strategy(), 0..40)
    ) {
        let mut roster = Roster::default();
        for action in &actions {
            roster.apply(action);
        }

        roster.apply(&Action::RenumberAll);
        let mut numbers = roster.numbers();
        numbers.sort_unstable();
        let expected: Vec<u32> = (1..=numbers.len() as u32).collect();
        prop_assert_eq!(numbers, expected);

        // a second pass plans no changes
        prop_assert!(renumber_all_plan(&roster.rows).is_empty());
    }

    #[test]
    fn test_renumber_from_never_touches_lower_numbers(
        actions in prop::collection::vec(action_strategy(), 0..40),
        start in 1u32..32
    ) {
        let mut roster = Roster::default();
        for action in &actions {
            roster.apply(action);
        }

        let below_before: Vec<(i64, u32)> = roster
            .rows
            .iter()
            .copied()
            .filter(|&(_, no)| no < start)
            .collect();

        roster.apply(&Action::RenumberFrom(start));

        let below_after: Vec<(i64, u32)> = roster
            .rows
            .iter()
            .copied()
            .filter(|&(_, no)| no < start)
            .collect();
        prop_assert_eq!(below_before, below_after);

        // numbers >= start form a contiguous block starting at start
        let mut above: Vec<u32> = roster
            .rows
            .iter()
            .map(|&(_, no)| no)
            .filter(|&no| no >= start)
            .collect();
        above.sort_unstable();
        let expected: Vec<u32> = (start..start + above.len() as u32).collect();
        prop_assert_eq!(above, expected);
    }

    #[test]
    fn test_find_gaps_is_exact_complement(
        used in prop::collection::btree_set(1u32..200, 0..40)
    ) {
        let used_vec: Vec<u32> = used.iter().copied().collect();
        let gaps = find_gaps(&used_vec);

        match used.iter().max() {
            None => prop_assert!(gaps.is_empty()),
            Some(&max) => {
                let gap_set: BTreeSet<u32> = gaps.iter().copied().collect();
                for n in 1..=max {
                    prop_assert_eq!(gap_set.contains(&n), !used.contains(&n));
                }
                prop_assert!(gaps.iter().all(|&g| g < max));
            }
        }
    }

    #[test]
    fn test_next_free_number_is_lowest_unused(
        used in prop::collection::btree_set(1u32..200, 0..40)
    ) {
        let used_vec: Vec<u32> = used.iter().copied().collect();
        let next = next_free_number(&used_vec);

        prop_assert!(!used.contains(&next));
        for n in 1..next {
            prop_assert!(used.contains(&n));
        }
    }
}
