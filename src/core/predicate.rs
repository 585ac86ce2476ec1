// FindingL - core/predicate.rs
//
// The well-formedness predicate over a candidate sequence L, parameterised
// by a prime base p, an exponent s and a multiplier bound m.
// Pure: no shared state, no I/O.

use crate::util::error::PredicateError;
use std::collections::HashSet;

/// Number of base-`base` digits needed to write `value`.
///
/// Integer division only, so exact powers of the base are counted correctly
/// (`digit_count(243, 3) == 6`). Zero is written with one digit.
pub fn digit_count(value: u64, base: u64) -> u32 {
    debug_assert!(base >= 2, "digit_count requires base >= 2");
    let mut digits = 1;
    let mut rest = value / base;
    while rest > 0 {
        digits += 1;
        rest /= base;
    }
    digits
}

/// Decide whether `values` is well-formed for `(p, s, m)`.
///
/// With `sigma` the base-p digit count of `max(L)`, L is well-formed when
/// all of the following hold:
///
/// 1. `sigma < s * m`;
/// 2. `p^a` is in L for every `a < sigma`;
/// 3. the residues `b` in `2..p` whose scaled column `b * p^a` (all `a < sigma`)
///    lies entirely in L form a contiguous run `2, 3, ..., k`. A residue that
///    is included while `b - 1` was not invalidates L.
///
/// # Errors
/// Returns a [`PredicateError`] when L is empty, its maximum is zero, or any
/// of `p < 2`, `s = 0`, `m = 0`. Never coerces these to a verdict.
pub fn well_formed(values: &[u64], p: u64, s: u64, m: u64) -> Result<bool, PredicateError> {
    if p < 2 {
        return Err(PredicateError::InvalidBase { p });
    }
    if s == 0 {
        return Err(PredicateError::InvalidExponent { s });
    }
    if m == 0 {
        return Err(PredicateError::InvalidMultiplier { m });
    }
    let max = *values.iter().max().ok_or(PredicateError::EmptySequence)?;
    if max == 0 {
        return Err(PredicateError::ZeroMaximum);
    }

    let members: HashSet<u64> = values.iter().copied().collect();
    let sigma = digit_count(max, p);

    let mut wellformed = u128::from(sigma) < u128::from(s) * u128::from(m);

    let powers = powers_below(p, sigma);
    wellformed &= powers.iter().all(|pa| members.contains(pa));

    // A residue can only be included if b itself (b * p^0) is a member and its
    // top entry b * p^(sigma-1) does not exceed max(L). Visiting just those in
    // ascending order is equivalent to walking 2..p, since every other b is
    // never included and leaves the chain untouched. `top < p` always holds.
    let top = max / powers[powers.len() - 1];
    let mut residues: Vec<u64> = members
        .iter()
        .copied()
        .filter(|b| (2..=top).contains(b))
        .collect();
    residues.sort_unstable();

    let mut included = 1;
    for b in residues {
        let column_included = powers.iter().all(|&pa| {
            b.checked_mul(pa)
                .is_some_and(|scaled| members.contains(&scaled))
        });
        if column_included {
            if included == b - 1 {
                included = b;
            } else {
                wellformed = false;
            }
        }
    }

    tracing::trace!(p, s, m, sigma, included, wellformed, "Predicate evaluated");
    Ok(wellformed)
}

/// `p^0 .. p^(sigma-1)`. Every entry is at most `max(L)`, so none overflow.
fn powers_below(p: u64, sigma: u32) -> Vec<u64> {
    let mut powers = Vec::with_capacity(sigma as usize);
    let mut power: u64 = 1;
    for a in 0..sigma {
        powers.push(power);
        if a + 1 < sigma {
            power = power.saturating_mul(p);
        }
    }
    powers
}
