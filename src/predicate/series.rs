//! Integer series used by membership predicates.

use std::fmt;

/// Largest limit [`primes`] sieves up to.
pub const PRIME_SIEVE_LIMIT: u64 = 10_000_000;

/// Perfect squares `1, 4, 9, …` below `limit`.
pub fn squares(limit: u64) -> Vec<u64> {
    (1u64..)
        .map_while(|i| i.checked_mul(i))
        .take_while(|&sq| sq < limit)
        .collect()
}

/// Distinct Fibonacci numbers `1, 2, 3, 5, 8, …` below `limit`.
pub fn fibonacci(limit: u64) -> Vec<u64> {
    let mut out = Vec::new();
    let (mut a, mut b) = (1u64, 2u64);
    if limit > 1 {
        out.push(1);
    }
    while b < limit {
        out.push(b);
        let next = a.saturating_add(b);
        a = b;
        b = next;
    }
    out
}

/// Primes below `limit`, by sieve of Eratosthenes.
///
/// `limit` is clamped to [`PRIME_SIEVE_LIMIT`].
pub fn primes(limit: u64) -> Vec<u64> {
    let n = limit.min(PRIME_SIEVE_LIMIT) as usize;
    if n < 3 {
        return Vec::new();
    }
    let mut composite = vec![false; n];
    let mut i = 2;
    while i * i < n {
        if !composite[i] {
            for k in (i * i..n).step_by(i) {
                composite[k] = true;
            }
        }
        i += 1;
    }
    (2..n).filter(|&k| !composite[k]).map(|k| k as u64).collect()
}

/// Trial division.
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }
    let mut d = 3;
    while d <= n / d {
        if n % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}

pub fn is_square(n: u64) -> bool {
    if n == 0 {
        return false;
    }
    let r = (n as f64).sqrt() as u64;
    (r.saturating_sub(1)..=r + 1).any(|k| k.checked_mul(k) == Some(n))
}

pub fn is_fibonacci(n: u64) -> bool {
    let (mut a, mut b) = (1u64, 1u64);
    while b < n {
        let Some(next) = a.checked_add(b) else {
            return false;
        };
        a = b;
        b = next;
    }
    n >= 1 && b == n
}

/// Named integer series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Series {
    Squares,
    Fibonacci,
    Primes,
}

impl Series {
    /// Members below `limit`, ascending.
    pub fn values_below(self, limit: u64) -> Vec<u64> {
        match self {
            Series::Squares => squares(limit),
            Series::Fibonacci => fibonacci(limit),
            Series::Primes => primes(limit),
        }
    }

    /// Membership test.
    pub fn contains(self, n: u64) -> bool {
        match self {
            Series::Squares => is_square(n),
            Series::Fibonacci => is_fibonacci(n),
            Series::Primes => is_prime(n),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Series::Squares => "square",
            Series::Fibonacci => "fibonacci",
            Series::Primes => "prime",
        }
    }
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
