//! Merging per-seed neighbor lists into one ranking.

use std::collections::HashMap;

use euphony_core::model::RecommendationRecord;

/// Longest list [`merge`] returns.
pub const MAX_RECOMMENDATIONS: usize = 10;

/// Tally for one distinct record.
#[derive(Debug)]
struct Tally {
    record: RecommendationRecord,
    count: usize,
    first_list: usize,
}

/// Rank records by how many lists mention them, then by the earliest list
/// they appear in, then by first appearance. Every occurrence counts, so
/// a record repeated inside one list is counted each time.
#[must_use]
pub fn merge(lists: &[Vec<RecommendationRecord>]) -> Vec<RecommendationRecord> {
    let mut tallies: Vec<Tally> = Vec::new();
    let mut positions: HashMap<&RecommendationRecord, usize> = HashMap::new();

    for (list_index, list) in lists.iter().enumerate() {
        for record in list {
            if let Some(&pos) = positions.get(record) {
                tallies[pos].count += 1;
            } else {
                positions.insert(record, tallies.len());
                tallies.push(Tally {
                    record: record.clone(),
                    count: 1,
                    first_list: list_index,
                });
            }
        }
    }

    // Stable sort keeps first-seen order among full ties.
    tallies.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.first_list.cmp(&b.first_list))
    });
    tallies
        .into_iter()
        .take(MAX_RECOMMENDATIONS)
        .map(|t| t.record)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use euphony_core::model::ArtistCredit;

    fn rec(name: &str) -> RecommendationRecord {
        RecommendationRecord {
            name: name.to_string(),
            artists: ArtistCredit::parse("Band"),
            duration_ms: 200_000,
        }
    }

    fn names(records: &[RecommendationRecord]) -> Vec<&str> {
        records.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_frequency_then_first_list() {
        let merged = merge(&[
            vec![rec("A"), rec("B"), rec("C")],
            vec![rec("B"), rec("C"), rec("D")],
        ]);
        assert_eq!(names(&merged), vec!["B", "C", "A", "D"]);
    }

    #[test]
    fn test_earlier_list_wins_ties() {
        let merged = merge(&[vec![rec("X")], vec![rec("Y")], vec![rec("Z"), rec("Y")]]);
        // Y appears twice; X (list 0) precedes Z (list 2).
        assert_eq!(names(&merged), vec!["Y", "X", "Z"]);
    }

    #[test]
    fn test_truncates_to_ten() {
        let list: Vec<_> = (0..25).map(|i| rec(&format!("Song {i}"))).collect();
        let merged = merge(&[list.clone(), list]);
        assert_eq!(merged.len(), MAX_RECOMMENDATIONS);
        assert_eq!(merged[0].name, "Song 0");
        assert_eq!(merged[9].name, "Song 9");
    }

    #[test]
    fn test_empty_input() {
        assert!(merge(&[]).is_empty());
        assert!(merge(&[Vec::new(), Vec::new()]).is_empty());
    }

    #[test]
    fn test_identity_includes_artists_and_duration() {
        let mut other_artist = rec("A");
        other_artist.artists = ArtistCredit::parse("['Band']");
        let mut other_length = rec("A");
        other_length.duration_ms = 1;

        let merged = merge(&[vec![rec("A"), other_artist], vec![rec("A"), other_length]]);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[0], rec("A"));
    }

    #[test]
    fn test_repeats_within_a_list_count() {
        let merged = merge(&[vec![rec("A"), rec("B"), rec("B")]]);
        assert_eq!(names(&merged), vec!["B", "A"]);
    }
}
