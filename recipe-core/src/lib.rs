//! Quantity and duration normalization for recipe text.
//!
//! Parses the leading quantity of an ingredient line (`1 1/2`, `3/4`, `0.5`),
//! prints quantities back as kitchen fractions, rescales ingredients for a new
//! serving count, and converts free-text durations to and from minutes.
//! Everything here is a pure function of its inputs.

pub mod duration;
pub mod format;
pub mod quantity;
pub mod recipe;
pub mod scale;

pub use duration::{format_minutes, parse_minutes, parse_minutes_value, sum_minutes, total_minutes};
pub use format::{FRACTION_DENOMINATORS, FRACTION_TOLERANCE, format_quantity};
pub use quantity::{ParsedQuantity, parse_quantity_string};
pub use recipe::{Recipe, RecipeError};
pub use scale::{SCALED_FIELDS, scale_ingredient, scale_line, scale_record};
