//! Pure ranking computation.
//!
//! Works entirely on committed snapshots: a roster, the drawn table shapes,
//! and the score rows entered so far. A table counts only when every one of
//! its seats has a score and the points sum to zero; anything else simply
//! contributes nothing. A half-entered or unbalanced table therefore never
//! aborts a ranking, it just leaves its participants unscored for that round.

use std::collections::{BTreeMap, HashMap, HashSet};

use super::models::{OverallStanding, RosterEntry, RoundStanding, ScoreRow, TableShape};

/// Tables whose results may enter the standings: fully entered and zero-sum.
pub fn valid_tables(shapes: &[TableShape], scores: &[ScoreRow]) -> HashSet<(u32, u32)> {
    let mut entered: HashMap<(u32, u32), (usize, i64)> = HashMap::new();
    for score in scores {
        let slot = entered.entry((score.round_no, score.table_no)).or_default();
        slot.0 += 1;
        slot.1 += score.points;
    }

    shapes
        .iter()
        .filter(|shape| {
            entered
                .get(&(shape.round_no, shape.table_no))
                .is_some_and(|&(count, sum)| count == shape.seats && sum == 0)
        })
        .map(|shape| (shape.round_no, shape.table_no))
        .collect()
}

/// Rank one round.
///
/// Only participants whose table is valid appear. Ordering is points
/// descending, soli descending, display name ascending (case-insensitive),
/// participant number ascending as the final key.
pub fn round_standings(
    roster: &[RosterEntry],
    shapes: &[TableShape],
    scores: &[ScoreRow],
    round_no: u32,
) -> Vec<RoundStanding> {
    let valid = valid_tables(shapes, scores);
    let names: HashMap<i64, &RosterEntry> =
        roster.iter().map(|r| (r.participant_id, r)).collect();

    let mut rows: Vec<RoundStanding> = scores
        .iter()
        .filter(|s| s.round_no == round_no && valid.contains(&(s.round_no, s.table_no)))
        .filter_map(|s| {
            names.get(&s.participant_id).map(|entry| RoundStanding {
                place: 0,
                participant_id: s.participant_id,
                player_no: entry.player_no,
                display_name: entry.display_name.clone(),
                table_no: s.table_no,
                points: s.points,
                soli: s.soli,
            })
        })
        .collect();

    rows.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then(b.soli.cmp(&a.soli))
            .then_with(|| a.display_name.to_lowercase().cmp(&b.display_name.to_lowercase()))
            .then(a.player_no.cmp(&b.player_no))
    });
    assign_places(&mut rows, |r| (r.points, r.soli), |r, place| r.place = place);
    rows
}

/// Rank the whole tournament.
///
/// Sums every participant's valid rounds. Participants without a single
/// valid round come last, ordered among themselves by ascending participant
/// number, all sharing the place after the last scored participant.
pub fn overall_standings(
    roster: &[RosterEntry],
    shapes: &[TableShape],
    scores: &[ScoreRow],
) -> Vec<OverallStanding> {
    let valid = valid_tables(shapes, scores);

    let mut per_participant: HashMap<i64, BTreeMap<u32, (i64, i64)>> = HashMap::new();
    for score in scores {
        if !valid.contains(&(score.round_no, score.table_no)) {
            continue;
        }
        per_participant
            .entry(score.participant_id)
            .or_default()
            .insert(score.round_no, (score.points, score.soli));
    }

    let mut scored: Vec<OverallStanding> = Vec::new();
    let mut unscored: Vec<OverallStanding> = Vec::new();
    for entry in roster {
        let per_round = per_participant
            .remove(&entry.participant_id)
            .unwrap_or_default();
        let row = OverallStanding {
            place: 0,
            participant_id: entry.participant_id,
            player_no: entry.player_no,
            display_name: entry.display_name.clone(),
            total_points: per_round.values().map(|&(p, _)| p).sum(),
            total_soli: per_round.values().map(|&(_, s)| s).sum(),
            rounds_counted: per_round.len() as u32,
            per_round,
        };
        if row.rounds_counted == 0 {
            unscored.push(row);
        } else {
            scored.push(row);
        }
    }

    scored.sort_by(|a, b| {
        b.total_points
            .cmp(&a.total_points)
            .then(b.total_soli.cmp(&a.total_soli))
            .then_with(|| a.display_name.to_lowercase().cmp(&b.display_name.to_lowercase()))
            .then(a.player_no.cmp(&b.player_no))
    });
    assign_places(
        &mut scored,
        |r| (r.total_points, r.total_soli),
        |r, place| r.place = place,
    );

    let trailing_place = scored.len() as u32 + 1;
    unscored.sort_by_key(|r| r.player_no);
    for row in &mut unscored {
        row.place = trailing_place;
    }

    scored.extend(unscored);
    scored
}

/// Competition placement over an already-sorted slice: rows with an equal
/// key share a place, and the place after a tie group skips past it.
fn assign_places<T, K: PartialEq>(
    rows: &mut [T],
    key: impl Fn(&T) -> K,
    set_place: impl Fn(&mut T, u32),
) {
    let mut prev_key: Option<K> = None;
    let mut shown = 0u32;
    for (idx, row) in rows.iter_mut().enumerate() {
        let k = key(row);
        if prev_key.as_ref() != Some(&k) {
            shown = idx as u32 + 1;
        }
        set_place(row, shown);
        prev_key = Some(k);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: i64, no: u32, name: &str) -> RosterEntry {
        RosterEntry {
            participant_id: id,
            player_no: no,
            display_name: name.to_string(),
        }
    }

    fn score(id: i64, round: u32, table: u32, points: i64, soli: i64) -> ScoreRow {
        ScoreRow {
            participant_id: id,
            round_no: round,
            table_no: table,
            points,
            soli,
        }
    }

    fn shape(round: u32, table: u32, seats: usize) -> TableShape {
        TableShape {
            round_no: round,
            table_no: table,
            seats,
        }
    }

    #[test]
    fn test_only_complete_zero_sum_tables_are_valid() {
        let shapes = [shape(1, 1, 4), shape(1, 2, 4), shape(1, 3, 2)];
        let scores = [
            // table 1: complete and balanced
            score(1, 1, 1, 10, 0),
            score(2, 1, 1, -3, 0),
            score(3, 1, 1, -3, 0),
            score(4, 1, 1, -4, 0),
            // table 2: complete but off by one
            score(5, 1, 2, 10, 0),
            score(6, 1, 2, -3, 0),
            score(7, 1, 2, -3, 0),
            score(8, 1, 2, -3, 0),
            // table 3: half entered
            score(9, 1, 3, 5, 0),
        ];
        let valid = valid_tables(&shapes, &scores);
        assert!(valid.contains(&(1, 1)));
        assert!(!valid.contains(&(1, 2)));
        assert!(!valid.contains(&(1, 3)));
    }

    #[test]
    fn test_round_ranking_skips_invalid_tables() {
        let roster = [
            entry(1, 1, "Ahrens"),
            entry(2, 2, "Busch"),
            entry(3, 3, "Claas"),
            entry(4, 4, "Dreyer"),
            entry(5, 5, "Evers"),
            entry(6, 6, "Focke"),
        ];
        let shapes = [shape(1, 1, 2), shape(1, 2, 2), shape(1, 3, 2)];
        let scores = [
            score(1, 1, 1, 20, 0),
            score(2, 1, 1, -20, 1),
            // unbalanced, contributes nothing
            score(3, 1, 2, 7, 0),
            score(4, 1, 2, -6, 0),
            // incomplete, contributes nothing
            score(5, 1, 3, 9, 0),
        ];
        let standings = round_standings(&roster, &shapes, &scores, 1);
        let ids: Vec<i64> = standings.iter().map(|s| s.participant_id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(standings[0].place, 1);
        assert_eq!(standings[1].place, 2);
    }

    #[test]
    fn test_overall_tie_broken_by_soli_then_name() {
        // A and B both total 15 points; B's solo wins the tie. Participants
        // 10 and 11 only exist to keep the two-seat tables zero-sum.
        let roster = [
            entry(1, 1, "Anna"),
            entry(2, 2, "Bernd"),
            entry(10, 10, "Xaver"),
            entry(11, 11, "Ypsilon"),
        ];
        let shapes = [
            shape(1, 1, 2),
            shape(1, 2, 2),
            shape(2, 1, 2),
            shape(2, 2, 2),
        ];
        let scores = [
            score(1, 1, 1, 10, 0),
            score(1, 2, 1, 5, 0),
            score(2, 1, 2, 7, 1),
            score(2, 2, 2, 8, 0),
            score(10, 1, 1, -10, 0),
            score(10, 2, 1, -5, 0),
            score(11, 1, 2, -7, 0),
            score(11, 2, 2, -8, 0),
        ];

        let standings = overall_standings(&roster, &shapes, &scores);
        assert_eq!(standings[0].participant_id, 2);
        assert_eq!(standings[0].total_points, 15);
        assert_eq!(standings[0].total_soli, 1);
        assert_eq!(standings[1].participant_id, 1);
        assert_eq!(standings[1].total_points, 15);
        // distinct soli, distinct places
        assert_eq!(standings[0].place, 1);
        assert_eq!(standings[1].place, 2);
    }

    #[test]
    fn test_equal_points_and_soli_share_a_place() {
        let roster = [
            entry(1, 1, "Meier"),
            entry(2, 2, "Arndt"),
            entry(3, 3, "Zorn"),
            entry(4, 4, "Quast"),
        ];
        let shapes = [shape(1, 1, 4)];
        let scores = [
            score(1, 1, 1, 6, 0),
            score(2, 1, 1, 6, 0),
            score(3, 1, 1, -2, 0),
            score(4, 1, 1, -10, 0),
        ];
        let standings = round_standings(&roster, &shapes, &scores, 1);
        // tie at the top resolved alphabetically for display order, but both
        // share place 1; the next participant drops to place 3
        assert_eq!(standings[0].display_name, "Arndt");
        assert_eq!(standings[0].place, 1);
        assert_eq!(standings[1].display_name, "Meier");
        assert_eq!(standings[1].place, 1);
        assert_eq!(standings[2].place, 3);
        assert_eq!(standings[3].place, 4);
    }

    #[test]
    fn test_unscored_participants_rank_last_by_player_no() {
        let roster = [
            entry(1, 3, "Never Played"),
            entry(2, 1, "Also Unscored"),
            entry(3, 2, "Winner"),
            entry(4, 4, "Loser"),
        ];
        let shapes = [shape(1, 1, 2)];
        let scores = [score(3, 1, 1, 12, 0), score(4, 1, 1, -12, 0)];

        let standings = overall_standings(&roster, &shapes, &scores);
        assert_eq!(standings[0].participant_id, 3);
        assert_eq!(standings[1].participant_id, 4);
        // trailing block ordered by player_no, sharing the next place
        assert_eq!(standings[2].participant_id, 2);
        assert_eq!(standings[3].participant_id, 1);
        assert_eq!(standings[2].place, 3);
        assert_eq!(standings[3].place, 3);
    }

    #[test]
    fn test_per_round_breakdown_on_overall_rows() {
        let roster = [entry(1, 1, "Solo"), entry(2, 2, "Partner")];
        let shapes = [shape(1, 1, 2), shape(2, 1, 2)];
        let scores = [
            score(1, 1, 1, 4, 1),
            score(2, 1, 1, -4, 0),
            score(1, 2, 1, -6, 0),
            score(2, 2, 1, 6, 0),
        ];
        let standings = overall_standings(&roster, &shapes, &scores);
        let solo = standings.iter().find(|s| s.participant_id == 1).unwrap();
        assert_eq!(solo.per_round.get(&1), Some(&(4, 1)));
        assert_eq!(solo.per_round.get(&2), Some(&(-6, 0)));
        assert_eq!(solo.total_points, -2);
        assert_eq!(solo.rounds_counted, 2);
    }

    #[test]
    fn test_name_tiebreak_is_case_insensitive() {
        let roster = [entry(1, 1, "zimmer"), entry(2, 2, "Albers")];
        let shapes = [shape(1, 1, 2)];
        let scores = [score(1, 1, 1, 0, 0), score(2, 1, 1, 0, 0)];
        let standings = round_standings(&roster, &shapes, &scores, 1);
        assert_eq!(standings[0].display_name, "Albers");
        assert_eq!(standings[1].display_name, "zimmer");
    }
}
