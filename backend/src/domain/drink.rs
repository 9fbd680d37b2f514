//! Coffee-shop drinks and their recipes.
//!
//! A recipe is an ordered list of coloured ingredient layers. The public
//! ("short") view hides ingredient names; the staff ("long") view shows them.

use serde_json::json;
use thiserror::Error;

use super::DrinkId;

/// One ingredient layer of a drink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipePart {
    pub color: String,
    pub name: String,
    pub parts: u32,
}

/// Ingredient layer without its name, for the public drink menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortRecipePart {
    pub color: String,
    pub parts: u32,
}

/// Validation failures for drink input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DrinkValidationError {
    /// Title was blank.
    #[error("title must not be empty")]
    EmptyTitle,
    /// Recipe had no parts.
    #[error("recipe must contain at least one part")]
    EmptyRecipe,
    /// A recipe part was incomplete.
    #[error("recipe part {index} needs a colour, a name and at least one part")]
    InvalidPart {
        /// Position of the offending part.
        index: usize,
    },
}

impl DrinkValidationError {
    /// Wire name of the offending field.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyTitle => "title",
            Self::EmptyRecipe | Self::InvalidPart { .. } => "recipe",
        }
    }
}

impl From<DrinkValidationError> for super::Error {
    fn from(value: DrinkValidationError) -> Self {
        let mut details = json!({ "field": value.field(), "code": "invalid_field" });
        if let DrinkValidationError::InvalidPart { index } = value {
            details["index"] = json!(index);
        }
        Self::invalid_request(value.to_string()).with_details(details)
    }
}

/// A validated, non-empty recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe(Vec<RecipePart>);

impl Recipe {
    /// Validate a list of parts.
    ///
    /// # Errors
    /// Rejects empty recipes and parts with a blank colour or name or a zero
    /// part count.
    pub fn new(parts: Vec<RecipePart>) -> Result<Self, DrinkValidationError> {
        if parts.is_empty() {
            return Err(DrinkValidationError::EmptyRecipe);
        }
        if let Some(index) = parts.iter().position(|part| {
            part.color.trim().is_empty() || part.name.trim().is_empty() || part.parts == 0
        }) {
            return Err(DrinkValidationError::InvalidPart { index });
        }
        Ok(Self(parts))
    }

    /// Full ingredient list.
    #[must_use]
    pub fn parts(&self) -> &[RecipePart] {
        &self.0
    }

    /// Ingredient list without names.
    #[must_use]
    pub fn short(&self) -> Vec<ShortRecipePart> {
        self.0
            .iter()
            .map(|part| ShortRecipePart {
                color: part.color.clone(),
                parts: part.parts,
            })
            .collect()
    }
}

/// A persisted drink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drink {
    pub id: DrinkId,
    pub title: String,
    pub recipe: Recipe,
}

/// Validated input for a new drink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDrink {
    pub title: String,
    pub recipe: Recipe,
}

impl NewDrink {
    /// Validate a title and recipe.
    ///
    /// # Errors
    /// Returns [`DrinkValidationError`] for a blank title or invalid recipe.
    pub fn new(title: String, parts: Vec<RecipePart>) -> Result<Self, DrinkValidationError> {
        Ok(Self {
            title: validate_title(title)?,
            recipe: Recipe::new(parts)?,
        })
    }
}

/// Partial update for a drink. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrinkPatch {
    pub title: Option<String>,
    pub recipe: Option<Recipe>,
}

impl DrinkPatch {
    /// Validate the supplied fields.
    ///
    /// # Errors
    /// Returns [`DrinkValidationError`] for a blank title or invalid recipe.
    pub fn new(
        title: Option<String>,
        parts: Option<Vec<RecipePart>>,
    ) -> Result<Self, DrinkValidationError> {
        Ok(Self {
            title: title.map(validate_title).transpose()?,
            recipe: parts.map(Recipe::new).transpose()?,
        })
    }

    /// Apply the patch to an existing drink.
    #[must_use]
    pub fn apply(&self, mut drink: Drink) -> Drink {
        if let Some(title) = &self.title {
            drink.title.clone_from(title);
        }
        if let Some(recipe) = &self.recipe {
            drink.recipe = recipe.clone();
        }
        drink
    }
}

fn validate_title(title: String) -> Result<String, DrinkValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        Err(DrinkValidationError::EmptyTitle)
    } else {
        Ok(trimmed.to_owned())
    }
}
