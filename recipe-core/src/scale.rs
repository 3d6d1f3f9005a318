use crate::format::format_quantity;
use crate::quantity::parse_quantity_string;
use serde_json::{Map, Number, Value};
use tracing::{trace, warn};

/// Record fields multiplied by [`scale_record`] when they hold a number.
pub const SCALED_FIELDS: [&str; 3] = ["amount", "quantity", "value"];

/// Integers up to 2^53 round-trip through f64 exactly.
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

/// Float inputs stay floats; integer inputs stay integers while the product is integral.
fn to_json_number(original: &Number, x: f64) -> Option<Number> {
    if !original.is_f64() && x.fract() == 0.0 && x.abs() <= MAX_EXACT_INT {
        Some(Number::from(x as i64))
    } else {
        Number::from_f64(x)
    }
}

/// Scale the leading quantity of a free-text ingredient line.
///
/// Only the first occurrence of the consumed quantity text is rewritten; the
/// rest of the line is kept byte for byte. Lines without a leading quantity
/// come back unchanged.
pub fn scale_line(line: &str, multiplier: f64) -> String {
    let parsed = parse_quantity_string(line);
    let (Some(value), Some(matched)) = (parsed.value, parsed.matched) else {
        trace!(line, "no leading quantity, left unscaled");
        return line.to_string();
    };

    let formatted = format_quantity(value * multiplier);
    line.replacen(&matched, &formatted, 1)
}

/// Copy of `record` with the numeric [`SCALED_FIELDS`] multiplied.
pub fn scale_record(record: &Map<String, Value>, multiplier: f64) -> Map<String, Value> {
    let mut scaled = record.clone();
    for key in SCALED_FIELDS {
        let Some(field) = scaled.get_mut(key) else {
            continue;
        };
        let Value::Number(original) = field else {
            continue;
        };
        let Some(n) = original.as_f64() else {
            continue;
        };
        match to_json_number(original, n * multiplier) {
            Some(number) => *field = Value::Number(number),
            None => warn!(
                field = key,
                multiplier,
                "scaled value is not finite, field left unchanged"
            ),
        }
    }
    scaled
}

/// Scale an ingredient of either shape: a text line or a structured record.
///
/// Null and every other JSON shape (numbers, booleans, arrays) are returned as-is.
pub fn scale_ingredient(ingredient: &Value, multiplier: f64) -> Value {
    match ingredient {
        Value::String(line) => Value::String(scale_line(line, multiplier)),
        Value::Object(record) => Value::Object(scale_record(record, multiplier)),
        other => other.clone(),
    }
}

/* ===========================
Unit tests
=========================== */

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scale_whole_number_line() {
        assert_eq!(scale_line("2 cups flour", 2.0), "4 cups flour");
    }

    #[test]
    fn test_scale_fraction_line() {
        assert_eq!(scale_line("1/2 cup sugar", 2.0), "1 cup sugar");
        assert_eq!(scale_line("1 1/2 cups milk", 0.5), "3/4 cups milk");
        assert_eq!(scale_line("3 eggs", 0.5), "1 1/2 eggs");
    }

    #[test]
    fn test_line_without_quantity_is_unchanged() {
        assert_eq!(scale_line("Salt to taste", 2.0), "Salt to taste");
        assert_eq!(scale_line("", 3.0), "");
    }

    #[test]
    fn test_only_first_occurrence_is_replaced() {
        assert_eq!(scale_line("2 eggs, 2 yolks", 2.0), "4 eggs, 2 yolks");
        assert_eq!(scale_line("1 tin (1 litre)", 3.0), "3 tin (1 litre)");
    }

    #[test]
    fn test_surrounding_whitespace_is_kept() {
        assert_eq!(scale_line("  1/2 cup oil  ", 2.0), "  1 cup oil  ");
    }

    #[test]
    fn test_identity_scaling_normalizes_representation() {
        assert_eq!(scale_line("2.0 cups", 1.0), "2 cups");
        assert_eq!(scale_line("1.5 cups", 1.0), "1 1/2 cups");
        assert_eq!(scale_line("1 1/2 cups", 1.0), "1 1/2 cups");
    }

    #[test]
    fn test_zero_denominator_line_scales_leading_integer() {
        assert_eq!(scale_line("1/0 cup", 2.0), "2/0 cup");
    }

    #[test]
    fn test_scale_record_fields() {
        let record = json!({
            "name": "flour",
            "amount": 2,
            "quantity": "3",
            "value": 0.5,
            "unit": "cup"
        });
        let scaled = scale_ingredient(&record, 3.0);
        assert_eq!(
            scaled,
            json!({
                "name": "flour",
                "amount": 6,
                "quantity": "3",
                "value": 1.5,
                "unit": "cup"
            })
        );
    }

    #[test]
    fn test_scale_record_does_not_mutate_input() {
        let record = json!({ "amount": 4, "notes": { "amount": 1 } });
        let snapshot = record.clone();
        let scaled = scale_ingredient(&record, 0.25);
        assert_eq!(record, snapshot);
        // shallow: nested records are copied through untouched
        assert_eq!(scaled, json!({ "amount": 1, "notes": { "amount": 1 } }));
    }

    #[test]
    fn test_scale_record_without_numeric_fields_is_identity() {
        let record = json!({ "name": "basil", "note": "a handful" });
        assert_eq!(scale_ingredient(&record, 1.0), record);
        assert_eq!(scale_ingredient(&record, 7.0), record);
    }

    #[test]
    fn test_number_kind_is_kept() {
        let record = json!({ "amount": 2.0, "quantity": 3 });
        assert_eq!(scale_ingredient(&record, 1.0), record);
        assert_eq!(
            scale_ingredient(&record, 2.0),
            json!({ "amount": 4.0, "quantity": 6 })
        );
        assert_eq!(
            scale_ingredient(&json!({ "amount": 3 }), 0.5),
            json!({ "amount": 1.5 })
        );
    }

    #[test]
    fn test_near_whole_product_keeps_one_over_one() {
        assert_eq!(scale_line("1 cup", 0.99), "1/1 cup");
        assert_eq!(scale_line("1 cup", 1.99), "1 1/1 cup");
    }

    #[test]
    fn test_non_finite_product_leaves_field() {
        let record = json!({ "amount": 1e308 });
        assert_eq!(scale_ingredient(&record, 10.0), record);
    }

    #[test]
    fn test_other_shapes_pass_through() {
        for v in [json!(null), json!(3), json!(true), json!(["2 cups"])] {
            assert_eq!(scale_ingredient(&v, 2.0), v);
        }
        assert_eq!(
            scale_ingredient(&json!("2 cups flour"), 2.0),
            json!("4 cups flour")
        );
    }
}
