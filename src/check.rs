//! Arithmetic verification of a solved grid.
//!
//! Independent of the model: rows are split into numbers at zero cells, and
//! every number is tested directly with [`Predicate::accepts`].

use crate::error::CheckError;
use crate::predicate::Predicate;
use std::collections::BTreeSet;

/// The numbers in one row of digits, split at zeros, with their start column.
///
/// Returns `None` when a number does not fit in a `u64`.
///
/// # Examples
///
/// ```
/// use number_cross::check::split_row;
///
/// assert_eq!(split_row(&[5, 5, 0, 8, 8]), Some(vec![(0, 55), (3, 88)]));
/// assert_eq!(split_row(&[9; 20]), None);
/// ```
pub fn split_row(digits: &[u8]) -> Option<Vec<(usize, u64)>> {
    let mut out = Vec::new();
    let mut start = None;
    let mut value = 0u64;
    for (j, &d) in digits.iter().enumerate() {
        if d == 0 {
            if let Some(s) = start.take() {
                out.push((s, value));
            }
            value = 0;
        } else {
            start.get_or_insert(j);
            value = value.checked_mul(10)?.checked_add(u64::from(d))?;
        }
    }
    if let Some(s) = start {
        out.push((s, value));
    }
    Some(out)
}

/// Parses digit lines, ignoring every character that is not a decimal digit.
pub fn parse_digits(text: &str) -> Vec<Vec<u8>> {
    text.lines()
        .map(|line| {
            line.chars()
                .filter_map(|c| c.to_digit(10))
                .map(|d| d as u8)
                .collect::<Vec<u8>>()
        })
        .filter(|row| !row.is_empty())
        .collect()
}

/// Checks every row against its predicate and all numbers for repeats.
///
/// Returns the sum of all numbers in the grid.
pub fn verify(digits: &[Vec<u8>], predicates: &[Predicate]) -> Result<u64, CheckError> {
    if digits.len() != predicates.len() {
        return Err(CheckError::RowCount {
            expected: predicates.len(),
            found: digits.len(),
        });
    }

    let mut seen = BTreeSet::new();
    let mut sum = 0u64;
    for (row, (cells, predicate)) in digits.iter().zip(predicates).enumerate() {
        let numbers = split_row(cells).ok_or(CheckError::NumberTooLarge { row })?;
        for (col, number) in numbers {
            if number < 10 {
                return Err(CheckError::ShortRun { row, col });
            }
            if !predicate.accepts(number) {
                return Err(CheckError::PredicateFailed {
                    row,
                    number,
                    predicate: predicate.to_string(),
                });
            }
            if !seen.insert(number) {
                return Err(CheckError::Repeated(number));
            }
            sum += number;
        }
    }
    Ok(sum)
}
