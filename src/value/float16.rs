//! IEEE-754 binary16 conversion.
//!
//! Round-to-nearest-even. Finite values past the half range saturate to
//! signed infinity, NaN keeps its sign and the top mantissa bits with the
//! quiet bit set, and the subnormal range is rounded with an explicit shift.

const HALF_INFINITY: u32 = 0x7C00;
const HALF_QUIET_NAN: u32 = 0x0200;

/// Convert an `f32` into binary16 bits
pub fn f32_to_f16_bits(value: f32) -> u16 {
    let x = value.to_bits();
    let sign = (x & 0x8000_0000) >> 16;
    let exp = x & 0x7F80_0000;
    let man = x & 0x007F_FFFF;

    if exp == 0x7F80_0000 {
        let nan_bit = if man == 0 { 0 } else { HALF_QUIET_NAN };
        return (sign | HALF_INFINITY | nan_bit | (man >> 13)) as u16;
    }

    let half_exp = ((exp >> 23) as i32) - 127 + 15;
    if half_exp >= 0x1F {
        return (sign | HALF_INFINITY) as u16;
    }

    if half_exp <= 0 {
        // Below the smallest subnormal even after rounding
        if 14 - half_exp > 24 {
            return sign as u16;
        }
        let man = man | 0x0080_0000;
        let mut half_man = man >> (14 - half_exp);
        let round_bit = 1u32 << (13 - half_exp);
        if (man & round_bit) != 0 && (man & (3 * round_bit - 1)) != 0 {
            half_man += 1;
        }
        return (sign | half_man) as u16;
    }

    let bits = sign | ((half_exp as u32) << 10) | (man >> 13);
    let round_bit = 0x0000_1000;
    // A carry out of the mantissa bumps the exponent, up to infinity
    if (man & round_bit) != 0 && (man & (3 * round_bit - 1)) != 0 {
        (bits + 1) as u16
    } else {
        bits as u16
    }
}

/// Widen binary16 bits back into an `f32` (exact)
pub fn f16_bits_to_f32(bits: u16) -> f32 {
    let bits = bits as u32;
    let sign = (bits & 0x8000) << 16;
    let exp = (bits >> 10) & 0x1F;
    let man = bits & 0x03FF;

    let out = match (exp, man) {
        (0, 0) => sign,
        (0, _) => {
            // Normalise the subnormal mantissa
            let shift = man.leading_zeros() - 21;
            let man = (man << shift) & 0x03FF;
            let exp = 127 - 15 - shift + 1;
            sign | (exp << 23) | (man << 13)
        }
        (0x1F, _) => sign | 0x7F80_0000 | (man << 13),
        _ => sign | ((exp + 127 - 15) << 23) | (man << 13),
    };
    f32::from_bits(out)
}

/// Two-byte little-endian cell for a FLOAT16 column
pub fn f32_to_f16_le_bytes(value: f32) -> [u8; 2] {
    f32_to_f16_bits(value).to_le_bytes()
}
