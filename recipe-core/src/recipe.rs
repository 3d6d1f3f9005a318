use crate::duration::{format_minutes, parse_minutes_value, sum_minutes};
use crate::scale::scale_ingredient;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum RecipeError {
    #[error("servings must be positive, got {0}")]
    InvalidServings(u32),

    #[error("malformed recipe: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// A recipe as authored by a user or returned by the generator.
///
/// Ingredients are either free-text lines (`"2 cups flour"`) or records
/// (`{"name": "flour", "amount": 2, "unit": "cup"}`); times are free text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub title: String,
    pub servings: u32,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub prep_time: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub cook_time: Value,
    #[serde(default)]
    pub ingredients: Vec<Value>,
    #[serde(default)]
    pub steps: Vec<String>,
}

impl Recipe {
    pub fn from_json(text: &str) -> Result<Self, RecipeError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Ratio `target / servings` used to scale every ingredient.
    pub fn multiplier_for(&self, target: u32) -> Result<f64, RecipeError> {
        if self.servings == 0 {
            return Err(RecipeError::InvalidServings(self.servings));
        }
        if target == 0 {
            return Err(RecipeError::InvalidServings(target));
        }
        Ok(f64::from(target) / f64::from(self.servings))
    }

    /// New recipe sized for `target` servings; `self` is left as is.
    pub fn scaled_to(&self, target: u32) -> Result<Recipe, RecipeError> {
        let multiplier = self.multiplier_for(target)?;
        debug!(
            title = %self.title,
            from = self.servings,
            to = target,
            multiplier,
            "scaling recipe"
        );

        Ok(Recipe {
            servings: target,
            ingredients: self
                .ingredients
                .iter()
                .map(|i| scale_ingredient(i, multiplier))
                .collect(),
            ..self.clone()
        })
    }

    /// Prep plus cook time, counting only the parts that parse.
    pub fn total_minutes(&self) -> Option<u32> {
        sum_minutes(
            [&self.prep_time, &self.cook_time]
                .into_iter()
                .filter_map(parse_minutes_value),
        )
    }

    pub fn total_time_label(&self) -> String {
        format_minutes(self.total_minutes())
    }
}

/* ===========================
Unit tests
=========================== */
