//! printf-style `%g` number formatting used in the output files.

/// Significant digits used for coordinates and resolutions.
pub const SIGNIFICANT_DIGITS: usize = 8;

/// Format a float like C's `%.<precision>g`.
///
/// Uses fixed notation when the decimal exponent is in `[-4, precision)` and
/// scientific notation (`1.2345679e+08`) otherwise. Trailing zeros and a
/// trailing decimal point are removed in both forms.
pub fn format_g(value: f64, precision: usize) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    let precision = precision.max(1);
    // Rounding to `precision` digits first decides the exponent ("9.99999999" -> "1e1").
    let scientific = format!("{:.*e}", precision - 1, value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= precision as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{}{:02}",
            trim_fraction(mantissa),
            sign,
            exponent.unsigned_abs()
        )
    } else {
        let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

/// `%.8g`, the format of every float written by the generator.
pub fn g8(value: f64) -> String {
    format_g(value, SIGNIFICANT_DIGITS)
}

fn trim_fraction(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_notation() {
        assert_eq!(g8(1.0), "1");
        assert_eq!(g8(0.5), "0.5");
        assert_eq!(g8(-2.5), "-2.5");
        assert_eq!(g8(3.14159265358), "3.1415927");
        assert_eq!(g8(12345678.0), "12345678");
        assert_eq!(g8(0.0001), "0.0001");
        assert_eq!(g8(-180.0), "-180");
    }

    #[test]
    fn test_scientific_notation() {
        assert_eq!(g8(123456789.0), "1.2345679e+08");
        assert_eq!(g8(0.00001), "1e-05");
        assert_eq!(g8(-0.000012345), "-1.2345e-05");
        assert_eq!(g8(20037508.342789244), "20037508");
        assert_eq!(g8(1e100), "1e+100");
    }

    #[test]
    fn test_rounding_carries_into_exponent() {
        assert_eq!(g8(9.99999999), "10");
        assert_eq!(g8(99999999.9), "1e+08");
    }

    #[test]
    fn test_zero_and_special_values() {
        assert_eq!(g8(0.0), "0");
        assert_eq!(g8(f64::INFINITY), "inf");
        assert_eq!(g8(f64::NAN), "nan");
    }

    #[test]
    fn test_other_precisions() {
        assert_eq!(format_g(1234.5678, 3), "1.23e+03");
        assert_eq!(format_g(0.126, 2), "0.13");
    }
}
