/// Denominators tried when approximating the fractional part, smallest first.
pub const FRACTION_DENOMINATORS: [u32; 5] = [2, 3, 4, 8, 16];

/// Largest absolute error accepted for a fraction approximation.
/// Loose on purpose: 1.37 prints as "1 3/8".
pub const FRACTION_TOLERANCE: f64 = 0.035;

/// Decimal fallback keeps two places.
const DECIMAL_SCALE: f64 = 100.0;

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Closest kitchen fraction to `frac` (in `[0, 1)`), reduced to lowest terms.
/// `None` when nothing is within tolerance or the best candidate rounds to zero.
fn nearest_fraction(frac: f64) -> Option<(u32, u32)> {
    let mut best: Option<(u32, u32, f64)> = None;
    for den in FRACTION_DENOMINATORS {
        let d = f64::from(den);
        let num = (frac * d).round();
        let err = (frac - num / d).abs();
        // strict: on a tie the smaller denominator wins
        if best.is_none_or(|(_, _, e)| err < e) {
            best = Some((num as u32, den, err));
        }
    }

    let (num, den, err) = best?;
    if err > FRACTION_TOLERANCE {
        return None;
    }
    let g = gcd(num, den);
    let (num, den) = (num / g, den / g);
    (num != 0).then_some((num, den))
}

fn format_non_finite(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value > 0.0 {
        "Infinity".to_string()
    } else {
        "-Infinity".to_string()
    }
}

/// Render a quantity the way a cook would write it.
///
/// Integers print bare (`4`), fractional parts close to a half, third,
/// quarter, eighth or sixteenth print as fractions (`1/2`, `1 3/8`), and
/// anything else falls back to at most two decimals (`2.01`).
pub fn format_quantity(value: f64) -> String {
    if !value.is_finite() {
        return format_non_finite(value);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    let abs = value.abs();
    if abs.fract() == 0.0 {
        return format!("{sign}{abs}");
    }

    let whole = abs.floor();
    if let Some((num, den)) = nearest_fraction(abs - whole) {
        // a near-whole remainder reduces to 1/1 and is printed as such (1.99 -> "1 1/1")
        return if whole == 0.0 {
            format!("{sign}{num}/{den}")
        } else {
            format!("{sign}{whole} {num}/{den}")
        };
    }

    let rounded = (abs * DECIMAL_SCALE).round() / DECIMAL_SCALE;
    format!("{sign}{rounded}")
}

/* ===========================
Unit tests
=========================== */
