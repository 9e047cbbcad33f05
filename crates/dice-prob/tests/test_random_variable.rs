//! Tests for plain (independent) random variables, in particular the dice
//! convolution against closed-form results.

use approx::assert_abs_diff_eq;
use dice_core::{CheckedInt, Error, Integer, Probability};
use dice_prob::RandomVariable;
use proptest::prelude::*;

fn uniform(n: Integer) -> RandomVariable {
    RandomVariable::from_frequencies((1..=n).map(|v| (v, 1)))
}

fn probability(var: &RandomVariable, value: Integer) -> Probability {
    var.probability(CheckedInt::new(value))
}

// ─── dice convolution ─────────────────────────────────────────────────────────

#[test]
fn one_d6_is_uniform() {
    let result = RandomVariable::roll(
        &RandomVariable::constant(1),
        &RandomVariable::constant(6),
    )
    .unwrap();

    assert_eq!(result.len(), 6);
    for value in 1..=6 {
        assert_abs_diff_eq!(probability(&result, value), 1.0 / 6.0, epsilon = 1e-9);
    }
}

#[test]
fn two_d6_matches_convolution() {
    let result = RandomVariable::roll(
        &RandomVariable::constant(2),
        &RandomVariable::constant(6),
    )
    .unwrap();

    let expected = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0];
    assert_eq!(result.len(), expected.len());
    for (value, numerator) in (2..=12).zip(expected) {
        assert_abs_diff_eq!(
            probability(&result, value),
            numerator / 36.0,
            epsilon = 1e-9
        );
    }
}

#[test]
fn four_d4_matches_convolution() {
    let result = RandomVariable::roll(
        &RandomVariable::constant(4),
        &RandomVariable::constant(4),
    )
    .unwrap();

    let expected = [
        1.0, 4.0, 10.0, 20.0, 31.0, 40.0, 44.0, 40.0, 31.0, 20.0, 10.0, 4.0, 1.0,
    ];
    assert_eq!(result.len(), expected.len());
    for (value, numerator) in (4..=16).zip(expected) {
        assert_abs_diff_eq!(
            probability(&result, value),
            numerator / 256.0,
            epsilon = 1e-9
        );
    }
}

#[test]
fn roll_with_random_count() {
    // (1 or 2) d 2: mixture of a d2 and the sum of two d2
    let count = RandomVariable::from_frequencies([(1, 1), (2, 1)]);
    let sides = RandomVariable::constant(2);
    let result = RandomVariable::roll(&count, &sides).unwrap();

    assert_abs_diff_eq!(probability(&result, 1), 0.25, epsilon = 1e-9);
    assert_abs_diff_eq!(probability(&result, 2), 0.375, epsilon = 1e-9);
    assert_abs_diff_eq!(probability(&result, 3), 0.25, epsilon = 1e-9);
    assert_abs_diff_eq!(probability(&result, 4), 0.125, epsilon = 1e-9);
}

#[test]
fn roll_with_random_sides() {
    // 1 d (2 or 4)
    let count = RandomVariable::constant(1);
    let sides = RandomVariable::from_frequencies([(2, 1), (4, 1)]);
    let result = RandomVariable::roll(&count, &sides).unwrap();

    assert_abs_diff_eq!(probability(&result, 1), 0.25 + 0.125, epsilon = 1e-9);
    assert_abs_diff_eq!(probability(&result, 2), 0.25 + 0.125, epsilon = 1e-9);
    assert_abs_diff_eq!(probability(&result, 3), 0.125, epsilon = 1e-9);
    assert_abs_diff_eq!(probability(&result, 4), 0.125, epsilon = 1e-9);
}

#[test]
fn roll_rejects_non_positive_parameters() {
    let zero = RandomVariable::constant(0);
    let negative = RandomVariable::from_frequencies([(-1, 1), (2, 1)]);
    let d6 = uniform(6);

    assert!(matches!(
        RandomVariable::roll(&zero, &d6),
        Err(Error::InvalidDiceParameters(_))
    ));
    assert!(matches!(
        RandomVariable::roll(&d6, &negative),
        Err(Error::InvalidDiceParameters(_))
    ));
}

#[test]
fn roll_of_impossible_event_is_impossible() {
    let empty = RandomVariable::impossible();
    assert!(RandomVariable::roll(&empty, &uniform(6)).unwrap().is_empty());
    assert!(RandomVariable::roll(&uniform(6), &empty).unwrap().is_empty());
}

#[test]
fn roll_mass_sums_to_one() {
    let count = RandomVariable::from_frequencies([(2, 1), (3, 2), (5, 1)]);
    let sides = RandomVariable::from_frequencies([(4, 1), (6, 1)]);
    let result = RandomVariable::roll(&count, &sides).unwrap();
    let total: Probability = result.iter().map(|(_, p)| p).sum();
    assert_abs_diff_eq!(total, 1.0, epsilon = 1e-9);
}

// ─── arithmetic and comparisons ───────────────────────────────────────────────

#[test]
fn sum_of_two_dice_matches_the_convolution() {
    let sum = uniform(6).add(&uniform(6)).unwrap();
    let rolled = RandomVariable::roll(
        &RandomVariable::constant(2),
        &RandomVariable::constant(6),
    )
    .unwrap();

    assert_eq!(sum.len(), rolled.len());
    for (value, p) in rolled.iter() {
        assert_abs_diff_eq!(sum.probability(value), p, epsilon = 1e-9);
    }
}

#[test]
fn division_truncates() {
    let var = uniform(4).div(&RandomVariable::constant(2)).unwrap();
    // 1/2 = 0, 2/2 = 1, 3/2 = 1, 4/2 = 2
    assert_abs_diff_eq!(probability(&var, 0), 0.25, epsilon = 1e-9);
    assert_abs_diff_eq!(probability(&var, 1), 0.5, epsilon = 1e-9);
    assert_abs_diff_eq!(probability(&var, 2), 0.25, epsilon = 1e-9);
}

#[test]
fn division_by_zero_value_fails() {
    let denominator = RandomVariable::from_frequencies([(0, 1), (1, 1)]);
    assert!(matches!(
        uniform(4).div(&denominator),
        Err(Error::DivisionByZero(_))
    ));
}

#[test]
fn comparisons_of_two_dice() {
    let a = uniform(6);
    let less = a.less_than(&a);
    assert_abs_diff_eq!(probability(&less, 1), 15.0 / 36.0, epsilon = 1e-9);

    let equal = a.equal(&a);
    assert_abs_diff_eq!(probability(&equal, 1), 1.0 / 6.0, epsilon = 1e-9);

    let not_equal = a.not_equal(&a);
    assert_abs_diff_eq!(probability(&not_equal, 1), 5.0 / 6.0, epsilon = 1e-9);
}

#[test]
fn min_max_of_two_dice() {
    let a = uniform(2);
    let max = RandomVariable::max_of(&a, &a);
    assert_abs_diff_eq!(probability(&max, 1), 0.25, epsilon = 1e-9);
    assert_abs_diff_eq!(probability(&max, 2), 0.75, epsilon = 1e-9);

    let min = RandomVariable::min_of(&a, &a);
    assert_abs_diff_eq!(probability(&min, 1), 0.75, epsilon = 1e-9);
    assert_abs_diff_eq!(probability(&min, 2), 0.25, epsilon = 1e-9);
}

#[test]
fn negation_mirrors_the_support() {
    let var = RandomVariable::from_frequencies([(1, 1), (2, 2), (3, 3), (4, 4)]);
    let negated = var.neg().unwrap();
    assert_abs_diff_eq!(probability(&negated, -1), 0.1, epsilon = 1e-9);
    assert_abs_diff_eq!(probability(&negated, -2), 0.2, epsilon = 1e-9);
    assert_abs_diff_eq!(probability(&negated, -3), 0.3, epsilon = 1e-9);
    assert_abs_diff_eq!(probability(&negated, -4), 0.4, epsilon = 1e-9);
}

// ─── properties ───────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn frequencies_always_normalise(
        list in prop::collection::vec((-100i32..100, 0u64..20), 1..20)
    ) {
        let var = RandomVariable::from_frequencies(list.clone());
        let total: Probability = var.iter().map(|(_, p)| p).sum();
        if list.iter().any(|&(_, count)| count > 0) {
            prop_assert!((total - 1.0).abs() < 1e-9);
        } else {
            prop_assert!(var.is_empty());
        }
    }

    #[test]
    fn combination_mass_is_preserved(
        a in prop::collection::vec((-20i32..20, 1u64..10), 1..8),
        b in prop::collection::vec((-20i32..20, 1u64..10), 1..8),
    ) {
        let a = RandomVariable::from_frequencies(a);
        let b = RandomVariable::from_frequencies(b);
        let sum = a.add(&b).unwrap();
        let total: Probability = sum.iter().map(|(_, p)| p).sum();
        prop_assert!((total - 1.0).abs() < 1e-9);
    }
}
