//! Whole-pipeline properties over generated timelines.
//!
//! Sequences are drawn from a seeded RNG so failures reproduce.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;

use braid_layout::{
    BranchGraph, LaneStrategy, LayoutConfig, Record, Segment, TimelineLayout, compute_adjacency, decompose,
    layout_timeline, split_at_first_marker,
};

const SEEDS: [u64; 6] = [1, 7, 42, 1234, 9001, 31337];

/// Random timeline: ids drawn from a small pool, some rows without an id,
/// some parent hints pointing at earlier ids.
fn random_records(rng: &mut StdRng, len: usize) -> Vec<Record> {
    let pool = ["a", "b", "c", "d", "e", "f", "g"];
    let mut seen: Vec<&str> = Vec::new();
    (0..len)
        .map(|_| {
            if rng.gen_bool(0.1) {
                return Record::new(json!({"role": "system", "content": "note"}));
            }
            let id = pool[rng.gen_range(0..pool.len())];
            let record = if !seen.is_empty() && rng.gen_bool(0.3) {
                let parent = seen[rng.gen_range(0..seen.len())];
                json!({"execId": id, "parentExecId": parent})
            } else {
                json!({"execId": id})
            };
            if !seen.contains(&id) {
                seen.push(id);
            }
            Record::new(record)
        })
        .collect()
}

/// Live range `[first, last]` per execution id.
fn live_ranges(records: &[Record]) -> HashMap<String, (usize, usize)> {
    let mut ranges: HashMap<String, (usize, usize)> = HashMap::new();
    for (i, record) in records.iter().enumerate() {
        if let Some(id) = record.exec_id() {
            ranges
                .entry(id.as_str().to_string())
                .and_modify(|r| r.1 = i)
                .or_insert((i, i));
        }
    }
    ranges
}

#[test]
fn lane_count_equals_overlapping_live_ranges() {
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let records = random_records(&mut rng, 60);
        let ranges = live_ranges(&records);
        let lanes = layout_timeline(&records);

        for (i, record) in records.iter().enumerate() {
            let expected = if record.exec_id().is_some() {
                ranges.values().filter(|(first, last)| *first <= i && i <= *last).count()
            } else {
                0
            };
            assert_eq!(lanes.lane_count_by_index[i], expected, "seed {seed}, row {i}");
        }
    }
}

#[test]
fn compacted_lanes_are_dense() {
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let records = random_records(&mut rng, 80);
        let lanes = layout_timeline(&records);

        for (i, (lane, count)) in lanes.lane_by_index.iter().zip(&lanes.lane_count_by_index).enumerate() {
            match lane {
                Some(lane) => assert!(lane < count, "seed {seed}, row {i}: lane {lane} of {count}"),
                None => assert_eq!(*count, 0, "seed {seed}, row {i}"),
            }
        }
    }
}

#[test]
fn adjacency_is_symmetric_for_both_strategies() {
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let records = random_records(&mut rng, 50);

        for strategy in [LaneStrategy::Timeline, LaneStrategy::Subtree] {
            let layout = TimelineLayout::compute(&records, &LayoutConfig::default().with_strategy(strategy));
            for pair in layout.rows.windows(2) {
                assert_eq!(pair[0].next_connected, pair[1].prev_connected, "seed {seed}");
            }
            for row in &layout.rows {
                if row.exec_id.is_none() {
                    assert!(!row.prev_connected && !row.next_connected);
                    assert_eq!(row.lane, None);
                }
            }
        }
    }
}

#[test]
fn same_id_rows_always_connect() {
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let records = random_records(&mut rng, 50);
        let graph = BranchGraph::from_records(&records);
        let ids: Vec<_> = records.iter().map(Record::exec_id).collect();
        let adjacency = compute_adjacency(&ids, &graph, 100);

        for i in 1..ids.len() {
            if ids[i].is_some() && ids[i] == ids[i - 1] {
                assert!(adjacency.prev_connected[i], "seed {seed}, row {i}");
            }
        }
    }
}

#[test]
fn subtree_lanes_are_stable_per_branch() {
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let records = random_records(&mut rng, 40);
        let config = LayoutConfig::default().with_strategy(LaneStrategy::Subtree);
        let layout = TimelineLayout::compute(&records, &config);

        let mut lane_of: HashMap<String, usize> = HashMap::new();
        for row in &layout.rows {
            if let (Some(id), Some(lane)) = (&row.exec_id, row.lane) {
                let held = *lane_of.entry(id.as_str().to_string()).or_insert(lane);
                assert_eq!(held, lane, "seed {seed}: {id} moved lanes");
                assert!(lane < row.lane_count);
            }
        }
    }
}

#[test]
fn freed_lane_is_reused_by_next_branch() {
    let records: Vec<Record> = ["a", "b", "a", "c", "b"]
        .iter()
        .map(|id| Record::new(json!({ "execId": id })))
        .collect();
    let lanes = layout_timeline(&records);
    assert_eq!(lanes.lane_by_index, vec![Some(0), Some(1), Some(0), Some(0), Some(0)]);
    assert_eq!(lanes.lane_count_by_index, vec![1, 2, 2, 2, 1]);
}

/// Random prose with markers and junk braces spliced in.
fn random_text(rng: &mut StdRng) -> String {
    let words = ["alpha", "beta", "{", "}", "{oops", "gamma}", "δ", "\n", "```", "x"];
    let mut text = String::new();
    for n in 0..rng.gen_range(0..12) {
        if rng.gen_bool(0.25) {
            text.push_str(&format!(r#" {{"type":"collapsed_group","name":"M{n}"}} "#));
        } else {
            text.push_str(words[rng.gen_range(0..words.len())]);
            text.push(' ');
        }
    }
    text
}

#[test]
fn repeated_splitting_terminates() {
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        for _ in 0..50 {
            let text = random_text(&mut rng);
            let mut rest = text.clone();
            let mut steps = 0;
            while let Some(split) = split_at_first_marker(&rest) {
                assert!(split.after.len() < rest.len(), "split must consume input");
                rest = split.after;
                steps += 1;
                assert!(steps <= text.len());
            }
        }
    }
}

#[test]
fn decomposition_keeps_all_plain_text() {
    for seed in SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        for _ in 0..50 {
            let text = random_text(&mut rng);
            let segments = decompose(&text, 64);

            let mut rebuilt = String::new();
            let mut rest = text.clone();
            while let Some(split) = split_at_first_marker(&rest) {
                rebuilt.push_str(&split.before);
                rest = split.after;
            }
            rebuilt.push_str(&rest);

            // Every non-blank text segment appears in the rebuilt plain text.
            for segment in &segments {
                if let Segment::Text { text: piece, .. } = segment {
                    assert!(rebuilt.contains(piece.as_str()), "lost {piece:?} from {text:?}");
                }
            }

            // Depth rises by one after each marker.
            let mut depth = 0;
            for segment in &segments {
                assert_eq!(segment.depth(), depth);
                if segment.is_marker() {
                    depth += 1;
                }
            }
        }
    }
}

#[test]
fn two_markers_in_running_text_split_in_order() {
    let text = r#"intro {"type":"collapsed_group","name":"G"} tail {"type":"collapsed_group","name":"H"} end"#;
    let first = split_at_first_marker(text).unwrap();
    assert_eq!(first.before, "intro ");
    assert_eq!(first.marker.label, "G");
    assert!(first.after.starts_with(" tail {"));
    assert!(first.after.ends_with("} end"));

    let second = split_at_first_marker(&first.after).unwrap();
    assert_eq!(second.marker.label, "H");
}
