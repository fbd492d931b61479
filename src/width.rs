//! Fixed width two's complement helpers.
//!
//! Registers are held in `i64` and narrowed explicitly after each operation.

/// Wrap `x` to a `width` bit two's complement value.
///
/// The low `width` bits are kept and sign extended, exactly like a
/// hardware register of that width truncating a wider result.
///
/// ```
/// # use pdm2pcm::wrap;
/// assert_eq!(wrap(3, 3), 3);
/// assert_eq!(wrap(4, 3), -4);
/// assert_eq!(wrap(-5, 3), 3);
/// assert_eq!(wrap(i64::MIN, 64), i64::MIN);
/// ```
#[inline(always)]
pub const fn wrap(x: i64, width: u32) -> i64 {
    debug_assert!(width >= 1 && width <= 64);
    let s = 64 - width;
    (x << s) >> s
}

/// Number of bits needed to count `p` distinct values: `ceil(log2(p))`.
///
/// `ceil_log2(0)` and `ceil_log2(1)` are both 0.
///
/// ```
/// # use pdm2pcm::ceil_log2;
/// assert_eq!(ceil_log2(1), 0);
/// assert_eq!(ceil_log2(64), 6);
/// assert_eq!(ceil_log2(50u128.pow(3)), 17);
/// ```
pub const fn ceil_log2(p: u128) -> u32 {
    if p <= 1 {
        0
    } else {
        u128::BITS - (p - 1).leading_zeros()
    }
}

/// Inclusive range `(min, max)` of a `width` bit signed register.
pub const fn range(width: u32) -> (i64, i64) {
    let max = ((1u64 << (width - 1)) - 1) as i64;
    (-max - 1, max)
}
