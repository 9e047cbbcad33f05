//! Discrete random variables.
//!
//! [`RandomVariable`] is a finite mapping from integer values to
//! probabilities. All binary operations assume operand independence — the
//! cartesian-product combination is the only primitive a plain random
//! variable supports. Dependent operands are handled one level up by
//! [`Decomposition`](crate::decomposition::Decomposition).
//!
//! The mapping is a `BTreeMap`, so iteration is always in ascending value
//! order. The decomposition index arithmetic relies on this order being
//! stable across iterations and identical across clones.

use std::collections::btree_map;
use std::collections::BTreeMap;

use dice_core::{comparison, ensure, CheckedInt, Error, Integer, Probability, Real, Result};
use rand::Rng;

/// A finite discrete random variable.
///
/// Probabilities of the stored values sum to 1 unless the variable is the
/// *impossible event* (empty mapping). Zero-probability entries are never
/// stored.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RandomVariable {
    probability: BTreeMap<CheckedInt, Probability>,
}

impl RandomVariable {
    /// The impossible event: a variable with empty support.
    pub fn impossible() -> Self {
        Self::default()
    }

    /// A variable that takes `value` with probability 1.
    pub fn constant(value: impl Into<CheckedInt>) -> Self {
        let mut probability = BTreeMap::new();
        probability.insert(value.into(), 1.0);
        Self { probability }
    }

    /// A Bernoulli variable: 1 with probability `success_prob`, 0 otherwise.
    ///
    /// `success_prob` is clamped to `[0, 1]`; the degenerate cases collapse
    /// to a constant.
    pub fn bernoulli(success_prob: Probability) -> Self {
        if success_prob <= 0.0 {
            Self::constant(0)
        } else if success_prob >= 1.0 {
            Self::constant(1)
        } else {
            let mut probability = BTreeMap::new();
            probability.insert(CheckedInt::new(0), 1.0 - success_prob);
            probability.insert(CheckedInt::new(1), success_prob);
            Self { probability }
        }
    }

    /// Compute probabilities from a list of value frequencies.
    ///
    /// Duplicate values aggregate additively, zero frequencies are dropped,
    /// and the result is normalised by the total weight. An empty or
    /// all-zero list yields the impossible event.
    pub fn from_frequencies<I>(frequencies: I) -> Self
    where
        I: IntoIterator<Item = (Integer, u64)>,
    {
        let list: Vec<(Integer, u64)> = frequencies.into_iter().collect();
        let total: u64 = list.iter().map(|&(_, count)| count).sum();
        let mut result = Self::impossible();
        if total == 0 {
            return result;
        }
        for (value, count) in list {
            if count > 0 {
                result.add_probability(
                    CheckedInt::new(value),
                    count as Probability / total as Probability,
                );
            }
        }
        debug_assert!(comparison::close(
            result.iter().map(|(_, p)| p).sum(),
            1.0,
            comparison::DEFAULT_TOLERANCE
        ));
        result
    }

    /// `true` iff there is no value with non-zero probability.
    pub fn is_empty(&self) -> bool {
        self.probability.is_empty()
    }

    /// `true` iff there is exactly one value in the variable's range.
    pub fn is_constant(&self) -> bool {
        self.probability.len() == 1
    }

    /// Number of values with non-zero probability.
    pub fn len(&self) -> usize {
        self.probability.len()
    }

    /// Minimal value in the variable's range.
    pub fn min_value(&self) -> Option<CheckedInt> {
        self.probability.keys().next().copied()
    }

    /// Maximal value in the variable's range.
    pub fn max_value(&self) -> Option<CheckedInt> {
        self.probability.keys().next_back().copied()
    }

    /// Probability of `value`, or 0 if it is outside the range.
    pub fn probability(&self, value: CheckedInt) -> Probability {
        self.probability.get(&value).copied().unwrap_or(0.0)
    }

    /// Iterate over `(value, probability)` pairs in ascending value order.
    pub fn iter(&self) -> Support<'_> {
        Support(self.probability.iter())
    }

    /// Expected value `Σ v·p`.
    pub fn expected_value(&self) -> Real {
        self.iter().map(|(v, p)| Real::from(v.get()) * p).sum()
    }

    /// Variance `Σ v²·p − (Σ v·p)²`.
    pub fn variance(&self) -> Real {
        let mut sum_sq = 0.0;
        let mut sum = 0.0;
        for (v, p) in self.iter() {
            let value = Real::from(v.get());
            sum_sq += value * value * p;
            sum += value * p;
        }
        sum_sq - sum * sum
    }

    /// Standard deviation `√variance`.
    pub fn deviation(&self) -> Real {
        self.variance().sqrt()
    }

    /// Quantile: the smallest value `x` with `P(X <= x) >= prob`.
    ///
    /// `prob <= 0` yields the minimum value and `prob > 1` the maximum.
    /// The impossible event has no quantile.
    pub fn quantile(&self, prob: Probability) -> Result<CheckedInt> {
        let mut values = self.iter();
        let (mut result, mut prob_sum) = match values.next() {
            Some((value, p)) => (value, p),
            None => return Err(Error::UndefinedQuantile),
        };
        if prob <= 0.0 {
            return Ok(result);
        }
        for (value, p) in values {
            if prob_sum >= prob {
                break;
            }
            prob_sum += p;
            result = value;
        }
        Ok(result)
    }

    /// Draw one value at random, or `None` for the impossible event.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<CheckedInt> {
        if self.is_empty() {
            return None;
        }
        let target: Probability = rng.random();
        let mut sum = 0.0;
        for (value, p) in self.iter() {
            sum += p;
            if sum >= target {
                return Some(value);
            }
        }
        // Floating-point slack can leave the cumulative sum a hair below 1.
        self.max_value()
    }

    /// Indicator of `X in [lower_bound, upper_bound]` (closed interval):
    /// a Bernoulli variable whose success probability is the mass inside
    /// the interval.
    pub fn in_interval(&self, lower_bound: Real, upper_bound: Real) -> RandomVariable {
        let success: Probability = self
            .iter()
            .filter(|&(v, _)| {
                let value = Real::from(v.get());
                lower_bound <= value && value <= upper_bound
            })
            .map(|(_, p)| p)
            .sum();
        Self::bernoulli(success)
    }

    /// Restrict the range to values accepted by `include` and renormalise.
    pub fn restrict<P>(&self, include: P) -> RandomVariable
    where
        P: Fn(CheckedInt) -> bool,
    {
        let prob_sum: Probability = self
            .iter()
            .filter(|&(v, _)| include(v))
            .map(|(_, p)| p)
            .sum();
        let mut result = Self::impossible();
        if prob_sum <= 0.0 {
            return result;
        }
        for (value, p) in self.iter() {
            if include(value) {
                result.add_probability(value, p / prob_sum);
            }
        }
        result
    }

    /// Combine two independent variables with `combination`.
    ///
    /// The result assigns `combination(a, b)` the probability
    /// `P(X = a) · P(Y = b)`, aggregated over all pairs. A failure of
    /// `combination` (checked-integer overflow, division by zero) aborts
    /// the whole operation.
    pub fn combine_with<F>(&self, other: &RandomVariable, combination: F) -> Result<RandomVariable>
    where
        F: Fn(CheckedInt, CheckedInt) -> Result<CheckedInt>,
    {
        let mut dist = Self::impossible();
        for (value_a, prob_a) in self.iter() {
            for (value_b, prob_b) in other.iter() {
                dist.add_probability(combination(value_a, value_b)?, prob_a * prob_b);
            }
        }
        Ok(dist)
    }

    fn combine_map<F>(&self, other: &RandomVariable, combination: F) -> RandomVariable
    where
        F: Fn(CheckedInt, CheckedInt) -> CheckedInt,
    {
        let mut dist = Self::impossible();
        for (value_a, prob_a) in self.iter() {
            for (value_b, prob_b) in other.iter() {
                dist.add_probability(combination(value_a, value_b), prob_a * prob_b);
            }
        }
        dist
    }

    /// Distribution of `X + Y` for independent `X`, `Y`.
    pub fn add(&self, other: &RandomVariable) -> Result<RandomVariable> {
        self.combine_with(other, |a, b| a.add(b))
    }

    /// Distribution of `X - Y` for independent `X`, `Y`.
    pub fn sub(&self, other: &RandomVariable) -> Result<RandomVariable> {
        self.combine_with(other, |a, b| a.sub(b))
    }

    /// Distribution of `X * Y` for independent `X`, `Y`.
    pub fn mul(&self, other: &RandomVariable) -> Result<RandomVariable> {
        self.combine_with(other, |a, b| a.mul(b))
    }

    /// Distribution of the integer division `X / Y` for independent `X`, `Y`.
    pub fn div(&self, other: &RandomVariable) -> Result<RandomVariable> {
        self.combine_with(other, |a, b| a.div(b))
    }

    /// Distribution of `-X`.
    pub fn neg(&self) -> Result<RandomVariable> {
        let mut result = Self::impossible();
        for (value, p) in self.iter() {
            result.add_probability(value.neg()?, p);
        }
        Ok(result)
    }

    /// Indicator of `X < Y` for independent `X`, `Y`.
    pub fn less_than(&self, other: &RandomVariable) -> RandomVariable {
        self.combine_map(other, |a, b| indicator(a < b))
    }

    /// Indicator of `X <= Y` for independent `X`, `Y`.
    pub fn less_than_or_equal(&self, other: &RandomVariable) -> RandomVariable {
        self.combine_map(other, |a, b| indicator(a <= b))
    }

    /// Indicator of `X == Y` for independent `X`, `Y`.
    pub fn equal(&self, other: &RandomVariable) -> RandomVariable {
        self.combine_map(other, |a, b| indicator(a == b))
    }

    /// Indicator of `X != Y` for independent `X`, `Y`.
    pub fn not_equal(&self, other: &RandomVariable) -> RandomVariable {
        self.combine_map(other, |a, b| indicator(a != b))
    }

    /// Indicator of `X > Y` for independent `X`, `Y`.
    pub fn greater_than(&self, other: &RandomVariable) -> RandomVariable {
        self.combine_map(other, |a, b| indicator(a > b))
    }

    /// Indicator of `X >= Y` for independent `X`, `Y`.
    pub fn greater_than_or_equal(&self, other: &RandomVariable) -> RandomVariable {
        self.combine_map(other, |a, b| indicator(a >= b))
    }

    /// Distribution of `max(X, Y)` for independent `X`, `Y`.
    pub fn max_of(a: &RandomVariable, b: &RandomVariable) -> RandomVariable {
        a.combine_map(b, std::cmp::max)
    }

    /// Distribution of `min(X, Y)` for independent `X`, `Y`.
    pub fn min_of(a: &RandomVariable, b: &RandomVariable) -> RandomVariable {
        a.combine_map(b, std::cmp::min)
    }

    /// Distribution of `XdY`: roll an `Y`-sided fair die `X` times and sum.
    ///
    /// `count` and `sides` are assumed independent; every value in their
    /// supports has to be a positive integer. An empty operand yields the
    /// impossible event.
    ///
    /// For each sides value the convolution is computed by a dynamic
    /// program over the running sum: the probability of rolling `k` with
    /// `n` dice is the average of the probabilities of rolling `k - j`
    /// with `n - 1` dice for `j = 1..sides`, evaluated with a prefix sum
    /// so each step is linear in `n·sides`.
    pub fn roll(count: &RandomVariable, sides: &RandomVariable) -> Result<RandomVariable> {
        if count.is_empty() || sides.is_empty() {
            return Ok(Self::impossible());
        }

        for (value, _) in count.iter() {
            ensure!(
                value.get() > 0,
                Error::InvalidDiceParameters(
                    "number of dice has to be a positive integer".to_owned()
                )
            );
        }
        for (value, _) in sides.iter() {
            ensure!(
                value.get() > 0,
                Error::InvalidDiceParameters(
                    "number of dice faces has to be a positive integer".to_owned()
                )
            );
        }

        let max_dice = match count.max_value() {
            Some(value) => i64::from(value.get()),
            None => return Ok(Self::impossible()),
        };

        let mut dist = Self::impossible();
        for (faces_value, faces_prob) in sides.iter() {
            let faces = i64::from(faces_value.get());
            ensure!(
                faces * max_dice <= i64::from(Integer::MAX),
                Error::Overflow(format!("{max_dice}d{faces}"))
            );
            let base_prob = 1.0 / faces as Probability;

            // contribution of a single roll
            let one_prob = count.probability(CheckedInt::new(1));
            if one_prob > 0.0 {
                for i in 1..=faces {
                    dist.add_probability(
                        CheckedInt::new(i as Integer),
                        base_prob * faces_prob * one_prob,
                    );
                }
            }

            // probability of the sum with the current number of dice
            let mut probability = vec![0.0; (faces * max_dice + 1) as usize];
            for slot in probability.iter_mut().take(faces as usize + 1).skip(1) {
                *slot = base_prob;
            }

            for dice_count in 2..=max_dice {
                let top = (faces * dice_count) as usize;

                // prefix sum of the probabilities of `dice_count - 1` dice
                for i in 2..=top {
                    probability[i] += probability[i - 1];
                }

                let rolls_prob = count.probability(CheckedInt::new(dice_count as Integer));

                // The sum of `i` only needs prefix values below `i`, so by
                // iterating downward we don't overwrite values still needed.
                for i in (dice_count as usize..=top).rev() {
                    let j = (i as i64 - faces).max(1) as usize;
                    let prob_i = (probability[i - 1] - probability[j - 1]) * base_prob;
                    probability[i] = prob_i;

                    if rolls_prob > 0.0 {
                        dist.add_probability(
                            CheckedInt::new(i as Integer),
                            prob_i * faces_prob * rolls_prob,
                        );
                    }
                }

                // sums below `dice_count` are impossible
                for slot in probability.iter_mut().take(dice_count as usize).skip(1) {
                    *slot = 0.0;
                }
            }
        }
        Ok(dist)
    }

    /// Add probability mass to a value. The caller guarantees that the
    /// final masses sum to 1.
    pub(crate) fn add_probability(&mut self, value: CheckedInt, prob: Probability) {
        *self.probability.entry(value).or_insert(0.0) += prob;
    }
}

fn indicator(condition: bool) -> CheckedInt {
    CheckedInt::new(Integer::from(condition))
}

/// Iterator over the `(value, probability)` pairs of a [`RandomVariable`].
#[derive(Debug, Clone)]
pub struct Support<'a>(btree_map::Iter<'a, CheckedInt, Probability>);

impl Iterator for Support<'_> {
    type Item = (CheckedInt, Probability);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(&value, &prob)| (value, prob))
    }
}
