//! Fixed-point decimal helpers.
//!
//! Decimals are carried as their unscaled integer (`123.45` at scale 2 is
//! `12345`) and written as big-endian two's-complement bytes.

/// Why a decimal could not be produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecimalError {
    /// Not a decimal number
    Malformed,
    /// Unscaled value does not fit 128 bits
    Overflow,
}

/// Unscaled value of decimal text at the given scale.
///
/// Accepts an optional sign, digits with an optional fraction, and an optional
/// exponent. Digits beyond the scale are rounded half away from zero.
pub fn parse_unscaled(text: &str, scale: i32) -> Result<i128, DecimalError> {
    let text = text.trim();
    let (negative, body) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let (mantissa, exponent) = match body.find(['e', 'E']) {
        Some(pos) => {
            let exponent: i64 = body[pos + 1..].parse().map_err(|_| DecimalError::Malformed)?;
            (&body[..pos], exponent)
        }
        None => (body, 0),
    };

    let (int_part, frac_part) = match mantissa.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (mantissa, ""),
    };
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (int_part.is_empty() && frac_part.is_empty()) || !all_digits(int_part) || !all_digits(frac_part) {
        return Err(DecimalError::Malformed);
    }

    let digits: Vec<u8> = int_part.bytes().chain(frac_part.bytes()).map(|b| b - b'0').collect();
    // value = digits * 10^(shift - scale), so unscaled = digits * 10^shift
    let shift = exponent
        .checked_sub(frac_part.len() as i64)
        .and_then(|s| s.checked_add(scale as i64))
        .ok_or(DecimalError::Overflow)?;

    let magnitude = if shift >= 0 {
        let factor = u32::try_from(shift)
            .ok()
            .and_then(|s| 10i128.checked_pow(s))
            .ok_or(DecimalError::Overflow)?;
        accumulate(&digits)?
            .checked_mul(factor)
            .ok_or(DecimalError::Overflow)?
    } else {
        let keep = (digits.len() as i64).checked_add(shift).ok_or(DecimalError::Overflow)?;
        let (kept, round_digit) = if keep < 0 {
            (0, 0)
        } else {
            let keep = keep as usize;
            (accumulate(&digits[..keep])?, digits.get(keep).copied().unwrap_or(0))
        };
        if round_digit >= 5 {
            kept.checked_add(1).ok_or(DecimalError::Overflow)?
        } else {
            kept
        }
    };

    Ok(if negative { -magnitude } else { magnitude })
}

fn accumulate(digits: &[u8]) -> Result<i128, DecimalError> {
    digits.iter().try_fold(0i128, |acc, &d| {
        acc.checked_mul(10)
            .and_then(|v| v.checked_add(d as i128))
            .ok_or(DecimalError::Overflow)
    })
}

/// Unscaled value of a float, taken through its shortest round-trip text
pub fn unscaled_from_f64(value: f64, scale: i32) -> Result<i128, DecimalError> {
    if !value.is_finite() {
        return Err(DecimalError::Malformed);
    }
    parse_unscaled(&value.to_string(), scale)
}

/// Unscaled value of an integer
pub fn unscaled_from_integer(value: i128, scale: i32) -> Result<i128, DecimalError> {
    let factor = 10i128
        .checked_pow(scale.max(0) as u32)
        .ok_or(DecimalError::Overflow)?;
    value.checked_mul(factor).ok_or(DecimalError::Overflow)
}

/// Whether an unscaled value has at most `precision` digits
pub fn fits_precision(unscaled: i128, precision: i32) -> bool {
    match 10u128.checked_pow(precision.max(0) as u32) {
        Some(limit) => unscaled.unsigned_abs() < limit,
        None => true,
    }
}

/// Minimal big-endian two's-complement encoding (at least one byte)
pub fn to_minimal_be_bytes(value: i128) -> Vec<u8> {
    let bytes = value.to_be_bytes();
    let sign_byte = if value < 0 { 0xFF } else { 0x00 };
    let mut start = 0;
    while start < bytes.len() - 1
        && bytes[start] == sign_byte
        && (bytes[start + 1] & 0x80) == (sign_byte & 0x80)
    {
        start += 1;
    }
    bytes[start..].to_vec()
}

/// Two's-complement encoding sign-extended to exactly `len` bytes, or `None`
/// if the value needs more
pub fn to_fixed_be_bytes(value: i128, len: usize) -> Option<Vec<u8>> {
    let minimal = to_minimal_be_bytes(value);
    if minimal.len() > len {
        return None;
    }
    let sign_byte = if value < 0 { 0xFF } else { 0x00 };
    let mut out = vec![sign_byte; len - minimal.len()];
    out.extend_from_slice(&minimal);
    Some(out)
}
