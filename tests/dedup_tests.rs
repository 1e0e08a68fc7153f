use flowai::{
    cosine_similarity, deduplicate, DedupStrategy, Deduplicator, DuplicateGroup, FlowAiError,
};

fn group(canonical: &str, members: &[&str]) -> DuplicateGroup {
    DuplicateGroup {
        canonical: canonical.to_string(),
        group: members.iter().map(|m| m.to_string()).collect(),
    }
}

/// Small deterministic generator so property checks do not need extra crates.
fn pseudo_vectors(count: usize, dimension: usize, seed: u64) -> Vec<Vec<f32>> {
    let mut state = seed;
    (0..count)
        .map(|_| {
            (0..dimension)
                .map(|_| {
                    state = state
                        .wrapping_mul(6364136223846793005)
                        .wrapping_add(1442695040888963407);
                    // Few distinct values so that near-duplicates actually occur.
                    ((state >> 61) as f32) - 3.0
                })
                .collect()
        })
        .collect()
}

#[test]
fn identical_vectors_form_one_group() {
    let vectors = vec![vec![1.0, 0.0], vec![1.0, 0.0], vec![0.0, 1.0]];
    let groups = deduplicate(&["a", "b", "c"], &vectors, 0.9).unwrap();
    assert_eq!(groups, vec![group("a", &["a", "b"]), group("c", &["c"])]);
}

#[test]
fn single_record_is_its_own_group() {
    let groups = deduplicate(&["x"], &[vec![1.0, 1.0]], 0.9).unwrap();
    assert_eq!(groups, vec![group("x", &["x"])]);
}

#[test]
fn empty_input_yields_no_groups() {
    let records: Vec<String> = Vec::new();
    let vectors: Vec<Vec<f32>> = Vec::new();
    assert!(deduplicate(&records, &vectors, 0.9).unwrap().is_empty());
}

#[test]
fn unreachable_threshold_keeps_singletons() {
    let vectors = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
    let groups = deduplicate(&["p", "q"], &vectors, 1.1).unwrap();
    assert_eq!(groups, vec![group("p", &["p"]), group("q", &["q"])]);

    let same = vec![vec![1.0, 0.0], vec![1.0, 0.0]];
    assert_eq!(deduplicate(&["p", "q"], &same, 1.1).unwrap().len(), 2);
}

#[test]
fn record_vector_count_mismatch_fails() {
    let vectors = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
    let err = deduplicate(&["a", "b", "c"], &vectors, 0.9).unwrap_err();
    assert!(matches!(err, FlowAiError::InvalidInput(_)));
}

#[test]
fn groups_partition_the_input() {
    let vectors = pseudo_vectors(60, 3, 7);
    let records: Vec<String> = (0..vectors.len()).map(|i| format!("r{i}")).collect();

    for strategy in [DedupStrategy::Canonical, DedupStrategy::Connected] {
        let dedup = Deduplicator::new(0.8).unwrap().with_strategy(strategy);
        let groups = dedup.group_indices(&vectors).unwrap();

        let mut seen: Vec<usize> = groups.iter().flatten().copied().collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..records.len()).collect::<Vec<_>>());

        for members in &groups {
            assert!(members.windows(2).all(|pair| pair[0] < pair[1]));
        }
        let canonicals: Vec<usize> = groups.iter().map(|members| members[0]).collect();
        assert!(canonicals.windows(2).all(|pair| pair[0] < pair[1]));

        let named = dedup.deduplicate(&records, &vectors).unwrap();
        for (named_group, members) in named.iter().zip(&groups) {
            assert_eq!(named_group.canonical, records[members[0]]);
            assert_eq!(named_group.group[0], named_group.canonical);
        }
    }
}

#[test]
fn repeated_runs_are_identical() {
    let vectors = pseudo_vectors(40, 4, 99);
    let records: Vec<String> = (0..vectors.len()).map(|i| format!("item-{i}")).collect();
    let first = deduplicate(&records, &vectors, 0.7).unwrap();
    for _ in 0..3 {
        assert_eq!(deduplicate(&records, &vectors, 0.7).unwrap(), first);
    }
}

#[test]
fn raising_threshold_never_merges_more() {
    let angles: [f64; 4] = [0.0, 10.0, 20.0, 90.0];
    let vectors: Vec<Vec<f32>> = angles
        .iter()
        .map(|deg| {
            let rad = deg.to_radians();
            if *deg == 90.0 {
                vec![0.0, 1.0]
            } else {
                vec![rad.cos() as f32, rad.sin() as f32]
            }
        })
        .collect();
    let records = ["a", "b", "c", "d"];

    let mut previous_count = 0;
    let mut previous_largest = usize::MAX;
    for threshold in [0.0, 0.5, 0.9, 0.99, 1.0] {
        let groups = deduplicate(&records, &vectors, threshold).unwrap();
        let largest = groups.iter().map(|g| g.group.len()).max().unwrap();
        assert!(groups.len() >= previous_count, "threshold {threshold}");
        assert!(largest <= previous_largest, "threshold {threshold}");
        previous_count = groups.len();
        previous_largest = largest;
    }
    assert_eq!(previous_count, 4);
}

#[test]
fn self_similarity_is_one() {
    for vector in pseudo_vectors(20, 5, 3) {
        if vector.iter().all(|v| *v == 0.0) {
            continue;
        }
        let score = cosine_similarity(&vector, &vector).unwrap();
        assert!((score - 1.0).abs() < 1e-9);
    }
}

#[test]
fn zero_vectors_never_produce_nan() {
    let zero = vec![0.0; 4];
    let other = vec![0.5, -0.5, 1.0, 2.0];
    let score = cosine_similarity(&zero, &other).unwrap();
    assert_eq!(score, 0.0);
    assert!(!score.is_nan());

    let groups = deduplicate(&["z", "o", "z2"], &[zero.clone(), other, zero], 0.9).unwrap();
    assert_eq!(groups.len(), 3);
}

#[test]
fn infinite_thresholds_are_accepted() {
    let vectors = vec![vec![1.0, 0.0], vec![-1.0, 0.0]];
    assert_eq!(
        deduplicate(&["a", "b"], &vectors, f64::INFINITY).unwrap().len(),
        2
    );
    assert_eq!(
        deduplicate(&["a", "b"], &vectors, f64::NEG_INFINITY).unwrap().len(),
        1
    );
}

#[test]
fn nan_threshold_fails_fast() {
    let err = deduplicate(&["a"], &[vec![1.0]], f64::NAN).unwrap_err();
    assert!(matches!(err, FlowAiError::InvalidThreshold(_)));
}
