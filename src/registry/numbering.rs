//! Gap-tolerant participant numbering.
//!
//! `player_no` is stored as data, never derived from position: numbers are
//! handed out as the lowest free integer, removals leave gaps, and gaps
//! persist until an operator explicitly renumbers. The functions here are
//! pure; the manager applies the resulting plans as single transactional
//! batch rewrites.

use super::models::ParticipantId;

/// One row of a renumbering plan: assign `new_player_no` to the participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Renumbering {
    pub participant_id: ParticipantId,
    pub new_player_no: u32,
}

/// Lowest positive integer not present in `used`.
pub fn next_free_number(used: &[u32]) -> u32 {
    let mut n = 1;
    let mut used: Vec<u32> = used.to_vec();
    used.sort_unstable();
    for no in used {
        if no == n {
            n += 1;
        } else if no > n {
            break;
        }
    }
    n
}

/// All missing numbers in `[1, max(used)]`, sorted ascending.
///
/// Pure read: this is the "check" operation, it never mutates anything.
pub fn find_gaps(used: &[u32]) -> Vec<u32> {
    let max = match used.iter().max() {
        Some(&m) => m,
        None => return Vec::new(),
    };
    let mut present = vec![false; max as usize + 1];
    for &no in used {
        if no > 0 {
            present[no as usize] = true;
        }
    }
    (1..=max).filter(|&n| !present[n as usize]).collect()
}

/// Sort a roster of `(participant_id, player_no)` into renumbering order:
/// `player_no` ascending, id ascending as the stable secondary key.
fn ordered(roster: &[(ParticipantId, u32)]) -> Vec<(ParticipantId, u32)> {
    let mut rows = roster.to_vec();
    rows.sort_by_key(|&(id, no)| (no, id));
    rows
}

/// Plan a compaction of the whole roster to `1..=N`.
///
/// Relative order is preserved: `player_no` ascending, creation id as
/// tiebreak, never by name. Only rows whose number changes appear in the
/// plan, so reapplying on an already-dense roster yields an empty plan.
pub fn renumber_all_plan(roster: &[(ParticipantId, u32)]) -> Vec<Renumbering> {
    renumber_block(ordered(roster), 1)
}

/// Plan a compaction of numbers `>= start_no` to a contiguous block starting
/// at `start_no`. Numbers below `start_no` are untouched.
pub fn renumber_from_plan(roster: &[(ParticipantId, u32)], start_no: u32) -> Vec<Renumbering> {
    let affected: Vec<(ParticipantId, u32)> = ordered(roster)
        .into_iter()
        .filter(|&(_, no)| no >= start_no)
        .collect();
    renumber_block(affected, start_no)
}

fn renumber_block(rows: Vec<(ParticipantId, u32)>, first: u32) -> Vec<Renumbering> {
    rows.into_iter()
        .enumerate()
        .filter_map(|(i, (participant_id, player_no))| {
            let new_player_no = first + i as u32;
            (new_player_no != player_no).then_some(Renumbering {
                participant_id,
                new_player_no,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_free_number_fills_lowest_gap() {
        assert_eq!(next_free_number(&[]), 1);
        assert_eq!(next_free_number(&[1, 2, 3]), 4);
        assert_eq!(next_free_number(&[1, 2, 4, 6]), 3);
        assert_eq!(next_free_number(&[2, 3]), 1);
    }

    #[test]
    fn test_find_gaps_exact_complement() {
        assert_eq!(find_gaps(&[1, 2, 4, 6]), vec![3, 5]);
        assert_eq!(find_gaps(&[1, 2, 3]), Vec::<u32>::new());
        assert_eq!(find_gaps(&[]), Vec::<u32>::new());
        assert_eq!(find_gaps(&[5]), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_renumber_all_is_noop_on_dense_roster() {
        let roster = [(10, 1), (11, 2), (12, 3)];
        assert!(renumber_all_plan(&roster).is_empty());
    }

    #[test]
    fn test_renumber_all_compacts_preserving_order() {
        let roster = [(12, 6), (10, 2), (11, 4)];
        let plan = renumber_all_plan(&roster);
        assert_eq!(
            plan,
            vec![
                Renumbering { participant_id: 10, new_player_no: 1 },
                Renumbering { participant_id: 11, new_player_no: 2 },
                Renumbering { participant_id: 12, new_player_no: 3 },
            ]
        );
    }

    #[test]
    fn test_renumber_from_leaves_lower_numbers_alone() {
        let roster = [(10, 1), (11, 2), (12, 5), (13, 8)];
        let plan = renumber_from_plan(&roster, 3);
        assert_eq!(
            plan,
            vec![
                Renumbering { participant_id: 12, new_player_no: 3 },
                Renumbering { participant_id: 13, new_player_no: 4 },
            ]
        );
    }

    #[test]
    fn test_renumber_from_uses_id_as_stable_tiebreak() {
        // Equal player_no cannot occur live, but the ordering must stay total.
        let roster = [(11, 4), (10, 4)];
        let plan = renumber_from_plan(&roster, 4);
        assert_eq!(
            plan,
            vec![Renumbering { participant_id: 11, new_player_no: 5 }]
        );
    }
}
