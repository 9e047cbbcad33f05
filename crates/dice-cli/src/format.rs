//! Output formatting for computed values.

use colored::Colorize;
use dicelab::core::{CheckedInt, Probability, Real};
use dicelab::lang::{Value, ValueVisitor};
use dicelab::prob::Decomposition;

const WIDTH_VALUE: usize = 10;
const WIDTH_PROB: usize = 15;
const WIDTH_CDF: usize = 15;

/// Format a probability as a human readable percentage.
pub fn format_probability(probability: Probability) -> String {
    if probability < 0.0001 && probability != 0.0 {
        return "< 0.01 %".to_owned();
    }
    format!("{:.6} %", probability * 100.0)
}

/// Prints every value kind to standard output; random variables render as
/// a PMF/CDF table sorted by value.
pub struct FormattingVisitor;

impl ValueVisitor for FormattingVisitor {
    fn visit_int(&mut self, value: &CheckedInt) {
        println!("{value}");
    }

    fn visit_real(&mut self, value: &Real) {
        println!("{value}");
    }

    fn visit_rand_var(&mut self, value: &Decomposition) {
        println!();
        println!(
            "{}",
            format!(
                "{:>vw$}{:>pw$}{:>cw$}",
                "Value",
                "PMF",
                "CDF",
                vw = WIDTH_VALUE,
                pw = WIDTH_PROB,
                cw = WIDTH_CDF
            )
            .bold()
        );

        // the mapping iterates in ascending value order
        let var = value.to_random_variable();
        let mut sum = 0.0;
        for (value, probability) in var.iter() {
            sum += probability;
            println!(
                "{:>vw$}{:>pw$}{:>cw$}",
                value.to_string(),
                format_probability(probability),
                format_probability(sum),
                vw = WIDTH_VALUE,
                pw = WIDTH_PROB,
                cw = WIDTH_CDF
            );
        }
    }
}

/// Print all computed values, skipping the missing ones.
pub fn print_values(values: &[Option<Value>]) {
    let mut format = FormattingVisitor;
    for value in values.iter().flatten() {
        value.accept(&mut format);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_probabilities_render_as_a_bound() {
        assert_eq!(format_probability(0.00005), "< 0.01 %");
        assert_eq!(format_probability(0.0), "0.000000 %");
        assert_eq!(format_probability(0.5), "50.000000 %");
    }
}
