//! Decomposition of functions of dependent random variables.
//!
//! A [`Decomposition`] represents a random variable `A` by the law of total
//! probability: a list of *dependencies* `D_1..D_k` (promoted random
//! variables with stable identities) and one conditional leaf
//! `A | D_1 = d_1, .., D_k = d_k` per assignment of the dependency vector.
//!
//! Leaves are stored flattened. The leaf for assignment `(d_1, .., d_k)`
//! sits at the mixed-radix index whose least-significant digit ranges over
//! `D_1`'s support (in map order) and so on upward. Because the leaves are
//! conditioned on the *full* assignment, any two leaves picked from two
//! decompositions for the same merged assignment are independent, which is
//! what lets [`combine_with`](Decomposition::combine_with) fall back to the
//! plain independent combination of
//! [`RandomVariable`](crate::random_variable::RandomVariable).

use dice_core::{CheckedInt, Integer, Probability, Real, Result};

use crate::dependency::DependencyHandle;
use crate::random_variable::{RandomVariable, Support};

const IN_A: u8 = 1;
const IN_B: u8 = 2;

/// A random variable decomposed over a set of dependencies.
///
/// Equality compares dependencies by identity and leaves structurally; it
/// is exact and expensive, provided so decompositions can be used as values
/// in dice expressions.
#[derive(Debug, Clone, PartialEq)]
pub struct Decomposition {
    /// Dependencies, sorted by ascending identity.
    deps: Vec<DependencyHandle>,
    /// Conditional leaves, one per assignment of `deps`.
    vars: Vec<RandomVariable>,
}

impl From<RandomVariable> for Decomposition {
    fn from(variable: RandomVariable) -> Self {
        Self {
            deps: Vec::new(),
            vars: vec![variable],
        }
    }
}

impl Decomposition {
    /// A decomposition of the constant `value`.
    pub fn constant(value: impl Into<CheckedInt>) -> Self {
        RandomVariable::constant(value).into()
    }

    /// A decomposition of a Bernoulli variable.
    pub fn bernoulli(success_prob: Probability) -> Self {
        RandomVariable::bernoulli(success_prob).into()
    }

    /// A decomposition built from a value-frequency list.
    pub fn from_frequencies<I>(frequencies: I) -> Self
    where
        I: IntoIterator<Item = (Integer, u64)>,
    {
        RandomVariable::from_frequencies(frequencies).into()
    }

    /// `true` iff this variable depends on at least one promoted variable.
    pub fn has_dependencies(&self) -> bool {
        !self.deps.is_empty()
    }

    /// The dependencies, in ascending identity order.
    pub fn dependencies(&self) -> &[DependencyHandle] {
        &self.deps
    }

    /// The conditional leaves in flattened mixed-radix order.
    pub fn variables(&self) -> &[RandomVariable] {
        &self.vars
    }

    /// Promote the non-constant leaves of this decomposition into fresh
    /// dependencies.
    ///
    /// Every promoted leaf is replaced by the constants ranging over its
    /// support, so the leaves of the result are all constants (and hence
    /// trivially independent). Existing dependencies are kept; new ones are
    /// appended in leaf order, which keeps `deps` sorted by identity.
    pub fn decompose(&self) -> Decomposition {
        let mut deps = self.deps.clone();
        for var in &self.vars {
            if !var.is_constant() {
                deps.push(DependencyHandle::promote(var.clone()));
            }
        }

        let num_values: usize = deps.iter().map(DependencyHandle::len).product();
        let leaf_count = self.vars.len();
        let keys: Vec<Vec<CheckedInt>> = self
            .vars
            .iter()
            .map(|var| var.iter().map(|(value, _)| value).collect())
            .collect();

        // Odometer over the per-leaf supports: the old dependency block is
        // the low digits (ranging over leaves), the promoted supports are
        // the high digits. Constant leaves act as radix-1 digits.
        let mut position = vec![0usize; leaf_count];
        let mut vars = Vec::with_capacity(num_values);
        if leaf_count > 0 {
            for _ in 0..num_values / leaf_count {
                for (keys_j, &pos) in keys.iter().zip(&position) {
                    vars.push(RandomVariable::constant(keys_j[pos]));
                }
                for (j, keys_j) in keys.iter().enumerate() {
                    position[j] += 1;
                    if position[j] < keys_j.len() {
                        break;
                    }
                    position[j] = 0;
                }
            }
        }
        Decomposition { deps, vars }
    }

    /// Combine two decompositions with `combination`, a function of two
    /// *independent* random variables.
    ///
    /// The dependency sets are merged by identity; each leaf of the result
    /// is the combination of the operand leaves conditioned on the same
    /// merged assignment, which are independent by construction. The
    /// operands themselves need not be independent.
    pub fn combine_with<F>(&self, other: &Decomposition, combination: F) -> Result<Decomposition>
    where
        F: Fn(&RandomVariable, &RandomVariable) -> Result<RandomVariable>,
    {
        // merge the dependency sets, remembering which side each came from
        let mut deps: Vec<DependencyHandle> = Vec::new();
        let mut membership: Vec<u8> = Vec::new();
        let (mut i, mut j) = (0, 0);
        while i < self.deps.len() || j < other.deps.len() {
            if j >= other.deps.len()
                || (i < self.deps.len() && self.deps[i].id() < other.deps[j].id())
            {
                deps.push(self.deps[i].clone());
                membership.push(IN_A);
                i += 1;
            } else if i >= self.deps.len() || other.deps[j].id() < self.deps[i].id() {
                deps.push(other.deps[j].clone());
                membership.push(IN_B);
                j += 1;
            } else {
                deps.push(self.deps[i].clone());
                membership.push(IN_A | IN_B);
                i += 1;
                j += 1;
            }
        }

        let num_values: usize = deps.iter().map(DependencyHandle::len).product();
        let mut vars = Vec::with_capacity(num_values);
        for index in 0..num_values {
            // reconstruct each side's leaf index from the merged digits
            let (mut index_a, mut index_b) = (0, 0);
            let (mut size_a, mut size_b) = (1, 1);
            let mut rest = index;
            for (dep, &side) in deps.iter().zip(&membership) {
                let radix = dep.len();
                let digit = rest % radix;
                if side & IN_A != 0 {
                    index_a += digit * size_a;
                    size_a *= radix;
                }
                if side & IN_B != 0 {
                    index_b += digit * size_b;
                    size_b *= radix;
                }
                rest /= radix;
            }
            vars.push(combination(&self.vars[index_a], &other.vars[index_b])?);
        }
        Ok(Decomposition { deps, vars })
    }

    /// Distribution of `A + B`. The operands need not be independent.
    pub fn add(&self, other: &Decomposition) -> Result<Decomposition> {
        self.combine_with(other, |a, b| a.add(b))
    }

    /// Distribution of `A - B`. The operands need not be independent.
    pub fn sub(&self, other: &Decomposition) -> Result<Decomposition> {
        self.combine_with(other, |a, b| a.sub(b))
    }

    /// Distribution of `A * B`. The operands need not be independent.
    pub fn mul(&self, other: &Decomposition) -> Result<Decomposition> {
        self.combine_with(other, |a, b| a.mul(b))
    }

    /// Distribution of the integer division `A / B`. The operands need not
    /// be independent.
    pub fn div(&self, other: &Decomposition) -> Result<Decomposition> {
        self.combine_with(other, |a, b| a.div(b))
    }

    /// Distribution of `-A`.
    pub fn neg(&self) -> Result<Decomposition> {
        Ok(Decomposition {
            deps: self.deps.clone(),
            vars: self
                .vars
                .iter()
                .map(RandomVariable::neg)
                .collect::<Result<_>>()?,
        })
    }

    /// Indicator of `A < B`.
    pub fn less_than(&self, other: &Decomposition) -> Result<Decomposition> {
        self.combine_with(other, |a, b| Ok(a.less_than(b)))
    }

    /// Indicator of `A <= B`.
    pub fn less_than_or_equal(&self, other: &Decomposition) -> Result<Decomposition> {
        self.combine_with(other, |a, b| Ok(a.less_than_or_equal(b)))
    }

    /// Indicator of `A == B`.
    pub fn equal(&self, other: &Decomposition) -> Result<Decomposition> {
        self.combine_with(other, |a, b| Ok(a.equal(b)))
    }

    /// Indicator of `A != B`.
    pub fn not_equal(&self, other: &Decomposition) -> Result<Decomposition> {
        self.combine_with(other, |a, b| Ok(a.not_equal(b)))
    }

    /// Indicator of `A > B`.
    pub fn greater_than(&self, other: &Decomposition) -> Result<Decomposition> {
        self.combine_with(other, |a, b| Ok(a.greater_than(b)))
    }

    /// Indicator of `A >= B`.
    pub fn greater_than_or_equal(&self, other: &Decomposition) -> Result<Decomposition> {
        self.combine_with(other, |a, b| Ok(a.greater_than_or_equal(b)))
    }

    /// Indicator of `A in [lower_bound, upper_bound]` (closed interval).
    pub fn in_interval(&self, lower_bound: Real, upper_bound: Real) -> Decomposition {
        Decomposition {
            deps: self.deps.clone(),
            vars: self
                .vars
                .iter()
                .map(|var| var.in_interval(lower_bound, upper_bound))
                .collect(),
        }
    }

    /// Distribution of `max(A, B)`. The operands need not be independent.
    pub fn max_of(a: &Decomposition, b: &Decomposition) -> Result<Decomposition> {
        a.combine_with(b, |a, b| Ok(RandomVariable::max_of(a, b)))
    }

    /// Distribution of `min(A, B)`. The operands need not be independent.
    pub fn min_of(a: &Decomposition, b: &Decomposition) -> Result<Decomposition> {
        a.combine_with(b, |a, b| Ok(RandomVariable::min_of(a, b)))
    }

    /// Distribution of the dice roll `count` d `sides`.
    ///
    /// The operands have to be independent; the leafwise convolution
    /// assumes it.
    pub fn roll(count: &Decomposition, sides: &Decomposition) -> Result<Decomposition> {
        count.combine_with(sides, |a, b| RandomVariable::roll(a, b))
    }

    /// Iterate over `(value, probability)` pairs.
    ///
    /// A value may be emitted several times with partial masses from
    /// different leaves; the emitted probabilities sum to 1.
    pub fn outcomes(&self) -> Outcomes<'_> {
        let dep_probs = self
            .deps
            .iter()
            .map(|dep| dep.variable().iter().map(|(_, p)| p).collect())
            .collect();
        let mut outcomes = Outcomes {
            decomposition: self,
            dep_probs,
            leaf: 0,
            weight: 0.0,
            inner: None,
        };
        if let Some(first) = self.vars.first() {
            outcomes.weight = outcomes.leaf_weight(0);
            outcomes.inner = Some(first.iter());
        }
        outcomes
    }

    /// Collapse the decomposition to a plain random variable.
    ///
    /// This loses the dependency information.
    pub fn to_random_variable(&self) -> RandomVariable {
        let mut result = RandomVariable::impossible();
        for (value, prob) in self.outcomes() {
            result.add_probability(value, prob);
        }
        result
    }

    /// Expected value, accumulated from the outcome iterator without
    /// materialising the distribution.
    pub fn expected_value(&self) -> Real {
        self.outcomes()
            .map(|(value, prob)| Real::from(value.get()) * prob)
            .sum()
    }

    /// Variance, accumulated from the outcome iterator.
    pub fn variance(&self) -> Real {
        let mut sum_sq = 0.0;
        let mut sum = 0.0;
        for (value, prob) in self.outcomes() {
            let value = Real::from(value.get());
            sum_sq += value * value * prob;
            sum += value * prob;
        }
        sum_sq - sum * sum
    }

    /// Standard deviation.
    pub fn deviation(&self) -> Real {
        self.variance().sqrt()
    }

    /// Quantile of the materialised distribution.
    pub fn quantile(&self, prob: Probability) -> Result<CheckedInt> {
        self.to_random_variable().quantile(prob)
    }
}

/// Iterator over the weighted outcomes of a [`Decomposition`].
///
/// The outer dimension is the leaf index in ascending order; for each leaf
/// the leaf's own mapping is iterated, scaled by the probability of the
/// conditioning assignment.
#[derive(Debug, Clone)]
pub struct Outcomes<'a> {
    decomposition: &'a Decomposition,
    /// Per dependency: the probabilities of its support in map order.
    dep_probs: Vec<Vec<Probability>>,
    leaf: usize,
    weight: Probability,
    inner: Option<Support<'a>>,
}

impl Outcomes<'_> {
    /// Probability of the dependency assignment conditioning leaf `index`.
    fn leaf_weight(&self, index: usize) -> Probability {
        let mut weight = 1.0;
        let mut rest = index;
        for (dep, probs) in self.decomposition.deps.iter().zip(&self.dep_probs) {
            let radix = dep.len();
            weight *= probs[rest % radix];
            rest /= radix;
        }
        weight
    }
}

impl Iterator for Outcomes<'_> {
    type Item = (CheckedInt, Probability);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((value, prob)) = self.inner.as_mut()?.next() {
                return Some((value, prob * self.weight));
            }
            self.leaf += 1;
            match self.decomposition.vars.get(self.leaf) {
                Some(var) => {
                    self.weight = self.leaf_weight(self.leaf);
                    self.inner = Some(var.iter());
                }
                None => {
                    self.inner = None;
                    return None;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn uniform(n: Integer) -> RandomVariable {
        RandomVariable::from_frequencies((1..=n).map(|v| (v, 1)))
    }

    #[test]
    fn leaf_has_no_dependencies() {
        let leaf = Decomposition::from(uniform(4));
        assert!(!leaf.has_dependencies());
        assert_eq!(leaf.variables().len(), 1);
    }

    #[test]
    fn decompose_promotes_non_constant_leaves() {
        let decomposed = Decomposition::from(uniform(4)).decompose();
        assert_eq!(decomposed.dependencies().len(), 1);
        assert_eq!(decomposed.variables().len(), 4);
        assert!(decomposed.variables().iter().all(RandomVariable::is_constant));
    }

    #[test]
    fn decompose_keeps_constants_as_leaves() {
        let constant = Decomposition::constant(7).decompose();
        assert!(!constant.has_dependencies());
        assert_eq!(constant.variables().len(), 1);
    }

    #[test]
    fn materialisation_round_trips() {
        let var = uniform(6);
        let decomposed = Decomposition::from(var.clone()).decompose();
        assert_eq!(decomposed.to_random_variable(), var);
    }

    #[test]
    fn outcome_mass_sums_to_one() {
        let a = Decomposition::from(uniform(4)).decompose();
        let b = Decomposition::from(uniform(3)).decompose();
        let result = a.add(&b).unwrap();
        let total: Probability = result.outcomes().map(|(_, p)| p).sum();
        assert_abs_diff_eq!(total, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn dependent_difference_is_zero() {
        let a = Decomposition::from(uniform(6)).decompose();
        let result = a.sub(&a).unwrap().to_random_variable();
        assert_eq!(result.len(), 1);
        assert_abs_diff_eq!(result.probability(CheckedInt::new(0)), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn equality_follows_dependency_identity() {
        let var = uniform(2);
        let a = Decomposition::from(var.clone()).decompose();
        let b = Decomposition::from(var).decompose();
        assert_eq!(a, a.clone());
        // same content, different dependency identities
        assert_ne!(a, b);
    }
}
