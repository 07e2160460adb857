//! Built-in run predicates.

use super::run::{RunPredicate, RunVars};
use super::series::Series;
use crate::cp::{ConstraintId, CpModel, LinearExpr, Literal};
use std::fmt;
use tracing::warn;

/// Decimal digits of `n`, most significant first. `0` has no digits.
pub fn as_digits(mut n: u64) -> Vec<u8> {
    let mut digits = Vec::new();
    while n > 0 {
        digits.push((n % 10) as u8);
        n /= 10;
    }
    digits.reverse();
    digits
}

/// Every sequence of `len` digits from 1 to 9 whose product is `target`.
///
/// Targets that are zero or have a prime factor above 7 have none.
pub fn digit_factorizations(len: usize, target: u64) -> Vec<Vec<u8>> {
    if !is_digit_product(target) {
        return Vec::new();
    }
    factorize(len, target)
}

/// Whether `target` factors into primes no larger than 7.
fn is_digit_product(mut target: u64) -> bool {
    if target == 0 {
        return false;
    }
    for p in [2, 3, 5, 7] {
        while target % p == 0 {
            target /= p;
        }
    }
    target == 1
}

fn factorize(len: usize, target: u64) -> Vec<Vec<u8>> {
    if len == 0 {
        return if target == 1 { vec![Vec::new()] } else { Vec::new() };
    }
    if 9u64.checked_pow(len as u32).is_some_and(|max| target > max) {
        return Vec::new();
    }
    let mut out = Vec::new();
    for d in 1..=9u8 {
        if target % u64::from(d) != 0 {
            continue;
        }
        for mut rest in factorize(len - 1, target / u64::from(d)) {
            rest.insert(0, d);
            out.push(rest);
        }
    }
    out
}

/// `number == divisor · q + remainder` for some `q >= 1`.
///
/// The division `number == divisor · q + rem` with `0 <= rem < divisor` is
/// posted unconditionally, so `q` and `rem` are always fixed by the digits.
/// The returned constraints carry the predicate: `rem` matches `remainder`
/// modulo `divisor`, and `number >= divisor + remainder`. A non-positive
/// divisor leaves `rem` with an empty domain and the model invalid.
pub fn post_remainder(
    model: &mut CpModel,
    run: RunVars<'_>,
    divisor: i64,
    remainder: i64,
) -> Vec<ConstraintId> {
    let max = 10i64.pow(run.len() as u32) - 1;
    let quotient = model.new_int_var(0, max / divisor.max(1), format!("quotient/{divisor}"));
    let rem = model.new_int_var(0, divisor - 1, format!("remainder/{divisor}"));
    model.add_eq(
        run.number() - LinearExpr::term(quotient, divisor) - LinearExpr::from(rem),
        0,
    );
    let residue = if divisor > 0 {
        remainder.rem_euclid(divisor)
    } else {
        remainder
    };
    vec![
        model.add_eq(rem, residue),
        model.add_ge(run.number(), divisor.saturating_add(remainder)),
    ]
}

/// The run spells one of `candidates`.
///
/// Candidates of another length are ignored. With no candidate left the
/// returned disjunction is empty, hence unsatisfiable once enforced.
pub fn post_one_of(
    model: &mut CpModel,
    run: RunVars<'_>,
    candidates: &[Vec<u8>],
) -> Vec<ConstraintId> {
    let mut options: Vec<Literal> = Vec::new();
    for candidate in candidates.iter().filter(|c| c.len() == run.len()) {
        let choice = model.new_bool_var(format!("one_of#{}", options.len()));
        for (pos, &digit) in candidate.iter().enumerate() {
            let c = model.add_eq(run.indicator(pos, digit as usize).var, 1);
            model.only_enforce_if(c, &[choice.lit()]);
        }
        options.push(choice.lit());
    }
    vec![model.add_bool_or(&options)]
}

/// Every digit from 2 to 9 that occurs in the run divides the number.
///
/// Per divisor `d` an indicator `a` satisfies `Σ [digit = d] ≤ a · len`,
/// and divisibility by `d` is enforced by `a`.
pub fn post_self_dividing(model: &mut CpModel, run: RunVars<'_>) -> Vec<ConstraintId> {
    let len = run.len() as i64;
    let mut posted = Vec::new();
    for d in 2..=9usize {
        let present = model.new_bool_var(format!("divides/{d}"));
        let count = LinearExpr::sum((0..run.len()).map(|pos| run.indicators[pos][d]));
        model.add_le(count - LinearExpr::term(present, len), 0);
        for c in post_remainder(model, run, d as i64, 0) {
            model.only_enforce_if(c, &[present.lit()]);
            posted.push(c);
        }
    }
    posted
}

/// Symmetric digits agree and the number is odd.
pub fn post_odd_palindrome(model: &mut CpModel, run: RunVars<'_>) -> Vec<ConstraintId> {
    let n = run.len();
    let mut posted: Vec<ConstraintId> = (0..n / 2)
        .map(|i| model.add_equality(run.digits[i], run.digits[n - 1 - i]))
        .collect();
    posted.extend(post_remainder(model, run, 2, 1));
    posted
}

/// Arithmetic properties a run can be required to have.
///
/// Each variant both posts its constraints ([`RunPredicate`]) and checks a
/// concrete number ([`Predicate::accepts`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Predicate {
    /// `number == divisor · q + remainder` for some `q >= 1`.
    Remainder { divisor: i64, remainder: i64 },
    /// The digits multiply to the target.
    ProductOfDigits(u64),
    /// Member of an integer series.
    InSeries(Series),
    /// Divisible by each of its digits.
    SelfDividing,
    /// Odd and reads the same reversed.
    OddPalindrome,
    /// Spells one of the listed digit sequences.
    OneOf(Vec<Vec<u8>>),
}

impl Predicate {
    pub fn divisible_by(divisor: i64) -> Self {
        Self::remainder(divisor, 0)
    }

    pub fn remainder(divisor: i64, remainder: i64) -> Self {
        Predicate::Remainder { divisor, remainder }
    }

    pub fn odd() -> Self {
        Self::remainder(2, 1)
    }

    pub fn product_of_digits_is(target: u64) -> Self {
        Predicate::ProductOfDigits(target)
    }

    pub fn is_in_series(series: Series) -> Self {
        Predicate::InSeries(series)
    }

    pub fn square() -> Self {
        Predicate::InSeries(Series::Squares)
    }

    pub fn fibonacci() -> Self {
        Predicate::InSeries(Series::Fibonacci)
    }

    pub fn prime() -> Self {
        Predicate::InSeries(Series::Primes)
    }

    pub fn self_dividing() -> Self {
        Predicate::SelfDividing
    }

    pub fn odd_palindrome() -> Self {
        Predicate::OddPalindrome
    }

    /// Candidates given as numbers.
    pub fn is_one_of(candidates: impl IntoIterator<Item = u64>) -> Self {
        Predicate::OneOf(candidates.into_iter().map(as_digits).collect())
    }

    /// Whether `n` has the property.
    pub fn accepts(&self, n: u64) -> bool {
        let digits = as_digits(n);
        match self {
            Predicate::Remainder { divisor, remainder } => {
                let (n, d) = (i128::from(n), i128::from(*divisor));
                let r = i128::from(*remainder);
                d > 0 && n % d == r.rem_euclid(d) && n >= d + r
            }
            Predicate::ProductOfDigits(target) => {
                !digits.is_empty()
                    && digits.iter().map(|&d| u64::from(d)).product::<u64>() == *target
            }
            Predicate::InSeries(series) => series.contains(n),
            Predicate::SelfDividing => {
                !digits.is_empty() && digits.iter().all(|&d| d != 0 && n % u64::from(d) == 0)
            }
            Predicate::OddPalindrome => {
                n % 2 == 1 && digits.iter().eq(digits.iter().rev())
            }
            Predicate::OneOf(candidates) => candidates.contains(&digits),
        }
    }
}

impl RunPredicate for Predicate {
    fn post(&self, model: &mut CpModel, run: RunVars<'_>) -> Vec<ConstraintId> {
        match self {
            Predicate::Remainder { divisor, remainder } => {
                post_remainder(model, run, *divisor, *remainder)
            }
            Predicate::ProductOfDigits(target) => {
                post_one_of(model, run, &digit_factorizations(run.len(), *target))
            }
            Predicate::InSeries(series) => {
                let limit = 10u64.pow(run.len() as u32);
                if *series == Series::Primes && limit > super::series::PRIME_SIEVE_LIMIT {
                    warn!(digits = run.len(), "prime candidates truncated at the sieve limit");
                }
                let candidates: Vec<Vec<u8>> =
                    series.values_below(limit).into_iter().map(as_digits).collect();
                post_one_of(model, run, &candidates)
            }
            Predicate::SelfDividing => post_self_dividing(model, run),
            Predicate::OddPalindrome => post_odd_palindrome(model, run),
            Predicate::OneOf(candidates) => post_one_of(model, run, candidates),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Remainder {
                divisor: 2,
                remainder: 1,
            } => write!(f, "odd"),
            Predicate::Remainder {
                divisor,
                remainder: 0,
            } => write!(f, "divisible by {divisor}"),
            Predicate::Remainder { divisor, remainder } => {
                write!(f, "remainder {remainder} mod {divisor}")
            }
            Predicate::ProductOfDigits(target) => write!(f, "product of digits is {target}"),
            Predicate::InSeries(series) => write!(f, "{series}"),
            Predicate::SelfDividing => write!(f, "divisible by each of its digits"),
            Predicate::OddPalindrome => write!(f, "odd palindrome"),
            Predicate::OneOf(candidates) => write!(f, "one of {} candidates", candidates.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cp::{BoolVar, IntVar};

    struct Run {
        digits: Vec<IntVar>,
        indicators: Vec<[BoolVar; 10]>,
    }

    fn run(model: &mut CpModel, len: usize) -> Run {
        let digits = (0..len)
            .map(|i| model.new_int_var(0, 9, format!("d{i}")))
            .collect();
        let indicators = (0..len)
            .map(|i| std::array::from_fn(|k| model.new_bool_var(format!("d{i}={k}"))))
            .collect();
        Run { digits, indicators }
    }

    #[test]
    fn test_as_digits() {
        assert_eq!(as_digits(2025), vec![2, 0, 2, 5]);
        assert!(as_digits(0).is_empty());
    }

    #[test]
    fn test_digit_factorizations() {
        assert_eq!(digit_factorizations(2, 20), vec![vec![4, 5], vec![5, 4]]);
        assert_eq!(digit_factorizations(2, 25), vec![vec![5, 5]]);
        assert!(digit_factorizations(2, 11).is_empty());
        assert_eq!(digit_factorizations(3, 1), vec![vec![1, 1, 1]]);
        assert!(digit_factorizations(18, 0).is_empty());
        assert!(digit_factorizations(18, 11 * 64).is_empty());
        assert!(digit_factorizations(18, 13).is_empty());
        for f in digit_factorizations(4, 2025) {
            assert_eq!(f.iter().map(|&d| u64::from(d)).product::<u64>(), 2025);
        }
    }

    #[test]
    fn test_remainder_shape() {
        let mut model = CpModel::new("pred");
        let r = run(&mut model, 3);
        let before = model.variable_count();
        let constraints = model.constraint_count();
        let posted = Predicate::divisible_by(7)
            .post(&mut model, RunVars::new(&r.digits, &r.indicators));
        assert_eq!(posted.len(), 2);
        assert_eq!(model.variable_count(), before + 2);
        assert_eq!(model.constraint_count(), constraints + 3);
        let q = &model.variables[before];
        assert_eq!((q.min, q.max), (0, 142));
        let rem = &model.variables[before + 1];
        assert_eq!((rem.min, rem.max), (0, 6));
    }

    #[test]
    fn test_non_positive_divisor_is_invalid() {
        let mut model = CpModel::new("pred");
        let r = run(&mut model, 2);
        Predicate::divisible_by(0).post(&mut model, RunVars::new(&r.digits, &r.indicators));
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_one_of_skips_other_lengths() {
        let mut model = CpModel::new("pred");
        let r = run(&mut model, 2);
        let before = model.variable_count();
        let posted = Predicate::is_one_of([12, 345, 67])
            .post(&mut model, RunVars::new(&r.digits, &r.indicators));
        assert_eq!(posted.len(), 1);
        assert_eq!(model.variable_count(), before + 2);
    }

    #[test]
    fn test_self_dividing_shape() {
        let mut model = CpModel::new("pred");
        let r = run(&mut model, 2);
        let posted = Predicate::self_dividing()
            .post(&mut model, RunVars::new(&r.digits, &r.indicators));
        // two divisibility constraints per divisor 2..=9
        assert_eq!(posted.len(), 16);
        for c in posted {
            assert_eq!(model.constraints[c.index()].enforcement.len(), 1);
        }
    }

    #[test]
    fn test_odd_palindrome_shape() {
        let mut model = CpModel::new("pred");
        let r = run(&mut model, 5);
        let posted = Predicate::odd_palindrome()
            .post(&mut model, RunVars::new(&r.digits, &r.indicators));
        assert_eq!(posted.len(), 4);
    }

    #[test]
    fn test_accepts() {
        assert!(Predicate::divisible_by(11).accepts(55));
        assert!(!Predicate::divisible_by(11).accepts(56));
        assert!(Predicate::odd().accepts(4787));
        assert!(!Predicate::odd().accepts(1));
        // remainders outside 0..divisor follow number == d·q + r with q >= 1
        assert!(Predicate::remainder(7, 10).accepts(17));
        assert!(Predicate::remainder(7, 10).accepts(24));
        assert!(!Predicate::remainder(7, 10).accepts(10));
        assert!(!Predicate::remainder(7, 10).accepts(3));
        assert!(Predicate::remainder(9, -2).accepts(7));
        assert!(!Predicate::remainder(9, -2).accepts(8));
        assert!(Predicate::product_of_digits_is(20).accepts(45));
        assert!(!Predicate::product_of_digits_is(20).accepts(44));
        assert!(Predicate::square().accepts(49));
        assert!(Predicate::fibonacci().accepts(144));
        assert!(Predicate::prime().accepts(887));
        assert!(Predicate::self_dividing().accepts(12));
        assert!(!Predicate::self_dividing().accepts(13));
        assert!(!Predicate::self_dividing().accepts(102));
        assert!(Predicate::odd_palindrome().accepts(12321));
        assert!(!Predicate::odd_palindrome().accepts(2112));
        assert!(Predicate::is_one_of([12, 34]).accepts(34));
        assert!(!Predicate::is_one_of([12, 34]).accepts(43));
    }

    #[test]
    fn test_display() {
        assert_eq!(Predicate::divisible_by(28).to_string(), "divisible by 28");
        assert_eq!(Predicate::odd().to_string(), "odd");
        assert_eq!(Predicate::remainder(7, 3).to_string(), "remainder 3 mod 7");
        assert_eq!(Predicate::fibonacci().to_string(), "fibonacci");
    }
}
