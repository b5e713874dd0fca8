//! Prime table construction for the strength stage's harmonic kernel.

/// Builds a table of length `limit` where entry `i` says whether the
/// integer `i + 1` should be treated as a harmonic number for the kernel.
///
/// `include_fundamental` controls whether integer 1 (index 0) is marked
/// as a harmonic slot even though 1 isn't prime. The original SWIPE'
/// source sieves normally, then overwrites index 0 to "prime" as a hack
/// to pull the fundamental into the kernel; this is the same effect
/// without hiding it behind a post-sieve overwrite.
pub fn prime_table(limit: usize, include_fundamental: bool) -> Vec<bool> {
    if limit == 0 {
        return Vec::new();
    }
    let mut is_prime = vec![true; limit];
    is_prime[0] = false; // 1 is not prime
    let sqrt_limit = (limit as f64).sqrt().floor() as usize;
    for i in 1..sqrt_limit.min(limit) {
        if is_prime[i] {
            let mut j = i + i + 1;
            while j < limit {
                is_prime[j] = false;
                j += i + 1;
            }
        }
    }
    if include_fundamental {
        is_prime[0] = true;
    }
    is_prime
}
