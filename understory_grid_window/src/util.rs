// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Rounds `value` towards -∞. Out-of-range values saturate and NaN maps to zero.
#[allow(
    clippy::cast_possible_truncation,
    reason = "Row indices are intentionally i64; out-of-range values are saturated."
)]
#[inline]
pub(crate) fn floor_to_i64(value: f64) -> i64 {
    let t = value as i64;
    // The cast truncates towards zero.
    if (t as f64) > value {
        t.saturating_sub(1)
    } else {
        t
    }
}

/// Rounds `value` towards +∞. Out-of-range values saturate and NaN maps to zero.
#[allow(
    clippy::cast_possible_truncation,
    reason = "Row indices are intentionally i64; out-of-range values are saturated."
)]
#[inline]
pub(crate) fn ceil_to_i64(value: f64) -> i64 {
    let t = value as i64;
    if (t as f64) < value {
        t.saturating_add(1)
    } else {
        t
    }
}

/// Converts a count to `i64`, saturating.
#[inline]
pub(crate) fn saturating_i64(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
