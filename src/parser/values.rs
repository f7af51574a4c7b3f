//! Decimal values are accumulated one character at a time into a mantissa and a count of the
//! fractional digits seen so far. No floating point is involved: the value is only ever turned
//! into an integer, scaled by a rational factor, when its field is committed.
//!
//! The mantissa and the fractional digit count are both capped. Digits received past either cap
//! are dropped, degrading precision instead of overflowing.

/// Digits are accepted as long as the mantissa is below a tenth of this value.
pub(crate) const MANTISSA_MAX: u32 = (1 << 28) - 1;
/// One more than the number of fractional digits kept.
pub(crate) const EXPONENT_MAX: u8 = 7;

const POWERS: [i64; EXPONENT_MAX as usize] = [1, 10, 100, 1_000, 10_000, 100_000, 1_000_000];
const ROUNDING: [i64; EXPONENT_MAX as usize] = [0, 5, 50, 500, 5_000, 50_000, 500_000];

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub(crate) enum Numeral {
    Digit(u8),
    Minus,
    Point,
}

impl Numeral {
    pub(crate) fn from_byte(b: u8) -> Option<Self> {
        match b {
            b'0'..=b'9' => Some(Self::Digit(b - b'0')),
            b'-' => Some(Self::Minus),
            b'.' => Some(Self::Point),
            _ => None,
        }
    }
}

#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub(crate) struct DecFloat {
    sign: bool,
    mantissa: u32,
    /// 0: no decimal point, 1: decimal point without digits, n + 1: n fractional digits.
    exponent: u8,
}

impl DecFloat {
    pub(crate) fn push(&mut self, numeral: Numeral) {
        match numeral {
            Numeral::Minus => {
                // the sign must come first: "1-2" is -2, not -12
                self.sign = true;
                self.mantissa = 0;
                self.exponent = 0;
            }
            Numeral::Point => {
                if self.exponent == 0 {
                    self.exponent = 1;
                }
            }
            Numeral::Digit(digit) => {
                if self.mantissa < MANTISSA_MAX / 10 && self.exponent < EXPONENT_MAX {
                    self.mantissa = self.mantissa * 10 + u32::from(digit);
                    if self.exponent != 0 {
                        self.exponent += 1;
                    }
                }
            }
        }
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn mantissa(&self) -> u32 {
        self.mantissa
    }

    /// Returns `round(value * multiplicand / denominator)`.
    ///
    /// The ratio is split into its integer part and its remainder so that the mantissa is never
    /// multiplied by the full multiplicand before being reduced. Rounding is half-up on the
    /// magnitude, the sign is applied last. The result saturates to the `i32` range.
    pub(crate) fn to_int(&self, multiplicand: u32, denominator: u32) -> i32 {
        let mantissa = i64::from(self.mantissa);
        let multiplicand = i64::from(multiplicand);
        let denominator = i64::from(denominator);
        let e = self.exponent.saturating_sub(1) as usize;

        let r1 = mantissa * (multiplicand / denominator);
        let r = if e != 0 {
            let r2 = mantissa * (multiplicand % denominator) / denominator;
            (r1 + r2 + ROUNDING[e]) / POWERS[e]
        } else {
            let r2 = (mantissa * (multiplicand % denominator) + denominator / 2) / denominator;
            r1 + r2
        };

        let r = if self.sign { -r } else { r };
        r.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
    }
}

#[cfg(test)]
mod test {
    use super::{DecFloat, Numeral, MANTISSA_MAX};

    fn decode(input: &str) -> DecFloat {
        let mut value = DecFloat::default();
        input
            .bytes()
            .filter_map(Numeral::from_byte)
            .for_each(|n| value.push(n));
        value
    }

    #[test]
    fn integers_are_exact() {
        assert_eq!(decode("0").to_int(1, 1), 0);
        assert_eq!(decode("42").to_int(1, 1), 42);
        assert_eq!(decode("-42").to_int(1, 1), -42);
        assert_eq!(decode("007").to_int(1, 1), 7);
    }

    #[test]
    fn fractions_round_half_up() {
        assert_eq!(decode("12.345").to_int(1, 1), 12);
        assert_eq!(decode("12.5").to_int(1, 1), 13);
        assert_eq!(decode("12.49").to_int(1, 1), 12);
        assert_eq!(decode("0.5").to_int(1, 1), 1);
        assert_eq!(decode(".5").to_int(1, 1), 1);
        assert_eq!(decode("-12.5").to_int(1, 1), -13);
        assert_eq!(decode("3.").to_int(1, 1), 3);
    }

    #[test]
    fn decimal_strings_within_the_caps_round_half_up() {
        // small linear congruential generator, the sequence only needs to be spread out
        let mut seed = 0x2545_f491_u32;
        let mut next = |bound: u64| {
            seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            u64::from(seed) % bound
        };

        for fraction_len in 0..=6u32 {
            for integer_len in 0..=(8 - fraction_len) {
                for _ in 0..200 {
                    let integer = next(10u64.pow(integer_len));
                    let fraction = next(10u64.pow(fraction_len));
                    let negative = next(2) == 1;

                    let mut input = String::new();
                    if negative {
                        input.push('-');
                    }
                    if integer_len != 0 {
                        let width = integer_len as usize;
                        input.push_str(&format!("{:0width$}", integer, width = width));
                    }
                    if fraction_len != 0 {
                        input.push_str(&format!(
                            ".{:0width$}",
                            fraction,
                            width = fraction_len as usize
                        ));
                    }

                    let scale = 10u64.pow(fraction_len);
                    let magnitude = (integer * scale + fraction + scale / 2) / scale;
                    let expected = if negative {
                        -(magnitude as i32)
                    } else {
                        magnitude as i32
                    };
                    assert_eq!(decode(&input).to_int(1, 1), expected, "{}", input);
                }
            }
        }
    }

    #[test]
    fn lone_decimal_point_is_zero() {
        let value = decode(".");
        assert_eq!(value.to_int(1, 1), 0);
        assert_eq!(value.to_int(1000, 1), 0);
    }

    #[test]
    fn sign_resets_the_accumulated_digits() {
        assert_eq!(decode("1-2").to_int(1, 1), -2);
        assert_eq!(decode("1.5-2").to_int(1, 1), -2);
    }

    #[test]
    fn second_decimal_point_is_ignored() {
        assert_eq!(decode("1.2.5").to_int(100, 1), 125);
    }

    #[test]
    fn scaling_by_a_ratio() {
        // 80 steps/mm expressed as steps/m over 1000
        assert_eq!(decode("10.5").to_int(80_000, 1000), 840);
        assert_eq!(decode("-0.0125").to_int(80_000, 1000), -1);
        // 96.275 steps/mm
        assert_eq!(decode("1").to_int(96_275, 1000), 96);
        assert_eq!(decode("10").to_int(96_275, 1000), 963);
        // inches to mm
        assert_eq!(decode("10").to_int(254, 10), 254);
        assert_eq!(decode("1.5").to_int(254, 10), 38);
        // seconds to milliseconds
        assert_eq!(decode("1.5").to_int(1000, 1), 1500);
        assert_eq!(decode("0.0015").to_int(1000, 1), 2);
    }

    #[test]
    fn digits_past_the_mantissa_cap_are_dropped() {
        let value = decode("999999999999");
        assert_eq!(value.mantissa(), 99_999_999);
        assert!(value.mantissa() >= MANTISSA_MAX / 10);
    }

    #[test]
    fn digits_past_the_fraction_cap_are_dropped() {
        let value = decode("1.1234567");
        assert_eq!(value.to_int(1_000_000, 1), 1_123_456);
        assert_eq!(value.to_int(1, 1), 1);
    }

    #[test]
    fn result_saturates() {
        assert_eq!(decode("99999999").to_int(u32::MAX, 1), i32::MAX);
        assert_eq!(decode("-99999999").to_int(u32::MAX, 1), i32::MIN);
    }
}
