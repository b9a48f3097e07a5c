//! Integration tests for weighted selection and the option store.
//!
//! These tests exercise the public API of decisionmaker-core end-to-end:
//! `OptionStore` + `WeightedSelector` + list file codec.

use decisionmaker_core::{
    decode_list, encode_list, pick, OptionStore, SelectError, SortOrder, WeightedOption,
    WeightedSelector,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Chi-square critical values at p = 0.001 for 1..=7 degrees of freedom.
const CHI_SQUARE_CRITICAL_P001: [f64; 7] = [10.83, 13.82, 16.27, 18.47, 20.52, 22.46, 24.32];

/// Draws `n` samples and returns the chi-square statistic against the
/// weight-proportional expectation.
fn chi_square(options: &[WeightedOption], n: usize, seed: u64) -> f64 {
    let selector = WeightedSelector::new(options).expect("non-empty options");
    let mut rng = StdRng::seed_from_u64(seed);
    let mut observed = vec![0usize; options.len()];
    for _ in 0..n {
        observed[selector.sample_index(&mut rng)] += 1;
    }

    let total = selector.total_weight() as f64;
    options
        .iter()
        .zip(observed)
        .map(|(option, count)| {
            let expected = n as f64 * f64::from(option.weight()) / total;
            let diff = count as f64 - expected;
            diff * diff / expected
        })
        .sum()
}

fn store(entries: &[(&str, u32)]) -> OptionStore {
    OptionStore::from_options(
        entries
            .iter()
            .map(|&(label, weight)| WeightedOption::new(label, weight).unwrap())
            .collect(),
    )
}

#[test]
fn test_distribution_matches_weights_for_several_assignments() {
    let assignments: [&[(&str, u32)]; 4] = [
        &[("a", 1), ("b", 1)],
        &[("a", 1), ("b", 2), ("c", 3), ("d", 4)],
        &[("x", 10), ("y", 1), ("z", 1)],
        &[("p", 5), ("p", 5), ("q", 1), ("r", 7), ("s", 2)],
    ];

    for (i, entries) in assignments.iter().enumerate() {
        let options = store(entries).into_options();
        let stat = chi_square(&options, 20_000, 1000 + i as u64);
        let critical = CHI_SQUARE_CRITICAL_P001[options.len() - 2];
        assert!(
            stat < critical,
            "assignment {i}: chi-square {stat:.2} exceeds {critical}"
        );
    }
}

#[test]
fn test_pizza_tacos_scenario() {
    // Arrange
    let options = store(&[("pizza", 1), ("tacos", 3)]).into_options();
    let mut rng = StdRng::seed_from_u64(2024);

    // Act
    let tacos = (0..4000)
        .filter(|_| pick(&options, &mut rng).unwrap().label() == "tacos")
        .count();

    // Assert
    let share = tacos as f64 / 4000.0;
    assert!((0.70..=0.80).contains(&share), "tacos share {share}");
}

#[test]
fn test_empty_store_signals_no_options() {
    let empty = OptionStore::new();
    let mut rng = StdRng::seed_from_u64(0);
    assert_eq!(pick(empty.options(), &mut rng), Err(SelectError::Empty));
}

#[test]
fn test_batch_add_then_sort_then_encode_round_trip() {
    // Arrange
    let mut s = OptionStore::new();
    s.add("tacos, pizza", 3).unwrap();
    s.add("sushi", 1).unwrap();
    s.sort(SortOrder::Weight);

    // Act
    let text = encode_list(s.options()).unwrap();
    let restored = OptionStore::from_options(decode_list(&text).unwrap());

    // Assert
    assert_eq!(restored, s);
    let labels: Vec<_> = restored.options().iter().map(|o| o.label()).collect();
    assert_eq!(labels, vec!["pizza", "tacos", "sushi"]);
}
