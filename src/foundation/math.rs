pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn gcd_u128(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Least common multiple, `None` when either side is zero.
pub(crate) fn lcm_u128(a: u128, b: u128) -> Option<u128> {
    if a == 0 || b == 0 {
        return None;
    }
    (a / gcd_u128(a, b)).checked_mul(b)
}

/// `round(num / den)` with halves rounded up. `den` must be non-zero.
pub(crate) fn div_round_u128(num: u128, den: u128) -> u128 {
    (num + den / 2) / den
}

/// `ceil(num / den)`. `den` must be non-zero.
pub(crate) fn div_ceil_u128(num: u128, den: u128) -> u128 {
    num.div_ceil(den)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
