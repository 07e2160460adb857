//! Predicate Library.
//!
//! A predicate turns an arithmetic property of a digit run into model
//! constraints ([`RunPredicate`]). The built-ins are collected in
//! [`Predicate`]:
//!
//! - remainder and divisibility, through a bounded quotient variable
//! - digit product, series membership and explicit candidate lists, as a
//!   disjunction over per-position digit indicators
//! - self-dividing numbers, one reified divisibility test per digit 2 to 9
//! - odd palindromes
//!
//! Membership properties have no compact arithmetic form and are encoded
//! extensionally, so their size grows with the number of candidates.

mod library;
mod run;
pub mod series;

pub use library::{
    as_digits, digit_factorizations, post_odd_palindrome, post_one_of, post_remainder,
    post_self_dividing, Predicate,
};
pub use run::{RunPredicate, RunVars};
pub use series::Series;
