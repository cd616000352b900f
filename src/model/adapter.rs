// File: src/model/adapter.rs
// JSON-friendly mirrors of the domain types. Every field is kept as plain text
// so a document with bad values still deserializes and the failure is reported
// as a validation error naming the offending field.
use crate::error::{RecipeError, Result};
use crate::model::ingredient::{Ingredient, IngredientInformation, IngredientTable, Quantity};
use crate::model::recipe::{Name, Recipe, RecipeDuration, RecipePortion, Step, Tag};
use serde::{Deserialize, Serialize};

pub const MISSING_FIELD_MESSAGE_FORMAT: &str = "Recipe's {} field is missing!";

fn missing(field: &str) -> RecipeError {
    RecipeError::illegal(MISSING_FIELD_MESSAGE_FORMAT.replace("{}", field))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonIngredient {
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub common_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_quantity: Option<String>,
    #[serde(default)]
    pub remarks: Vec<String>,
    #[serde(default)]
    pub substitutions: Vec<String>,
}

impl JsonIngredient {
    pub fn to_model(&self) -> Result<(Ingredient, IngredientInformation)> {
        let name = self.name.as_deref().ok_or_else(|| missing("ingredient name"))?;
        let ingredient = Ingredient::new(name, self.common_name.as_deref())?;

        let quantity = self
            .quantity
            .as_deref()
            .map(str::parse::<Quantity>)
            .transpose()?;
        let estimated_quantity = self
            .estimated_quantity
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::to_string);
        let remarks = self
            .remarks
            .iter()
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .collect();
        let substitutions = self
            .substitutions
            .iter()
            .map(|s| Ingredient::new(s, None))
            .collect::<Result<Vec<_>>>()?;

        Ok((
            ingredient,
            IngredientInformation {
                quantity,
                estimated_quantity,
                remarks,
                substitutions,
            },
        ))
    }
}

impl From<(&Ingredient, &IngredientInformation)> for JsonIngredient {
    fn from((ingredient, info): (&Ingredient, &IngredientInformation)) -> Self {
        Self {
            name: Some(ingredient.name().to_string()),
            common_name: ingredient.common_name().map(str::to_string),
            quantity: info.quantity.as_ref().map(ToString::to_string),
            estimated_quantity: info.estimated_quantity.clone(),
            remarks: info.remarks.clone(),
            substitutions: info
                .substitutions
                .iter()
                .map(|s| s.name().to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonRecipe {
    pub name: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub portion: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub ingredients: Vec<JsonIngredient>,
    #[serde(default)]
    pub steps: Vec<String>,
}

impl JsonRecipe {
    /// Converts into a validated `Recipe`, failing on the first illegal value.
    pub fn to_model(&self) -> Result<Recipe> {
        let name: Name = self.name.as_deref().ok_or_else(|| missing("name"))?.parse()?;
        let mut recipe = Recipe::new(name);

        recipe.duration = self
            .duration
            .as_deref()
            .map(str::parse::<RecipeDuration>)
            .transpose()?;
        recipe.portion = self
            .portion
            .as_deref()
            .map(str::parse::<RecipePortion>)
            .transpose()?;
        recipe.tags = self
            .tags
            .iter()
            .map(|t| t.parse::<Tag>())
            .collect::<Result<_>>()?;
        recipe.ingredients = self
            .ingredients
            .iter()
            .map(JsonIngredient::to_model)
            .collect::<Result<IngredientTable>>()?;
        recipe.steps = self
            .steps
            .iter()
            .map(|s| s.parse::<Step>())
            .collect::<Result<_>>()?;
        Ok(recipe)
    }
}

impl From<&Recipe> for JsonRecipe {
    fn from(recipe: &Recipe) -> Self {
        Self {
            name: Some(recipe.name.to_string()),
            duration: recipe.duration.as_ref().map(ToString::to_string),
            portion: recipe.portion.as_ref().map(ToString::to_string),
            tags: recipe.tags.iter().map(ToString::to_string).collect(),
            ingredients: recipe.ingredients.iter().map(JsonIngredient::from).collect(),
            steps: recipe.steps.iter().map(ToString::to_string).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> &'static str {
        r#"{
            "name": "Pancakes",
            "duration": "20 minutes",
            "portion": "2 - 4 servings",
            "tags": ["breakfast", "sweet"],
            "ingredients": [
                { "name": "flour", "commonName": "plain flour", "quantity": "200 g", "remarks": ["sifted"] },
                { "name": "egg", "estimatedQuantity": "a couple", "substitutions": ["flax egg"] }
            ],
            "steps": ["Mix everything", "Fry in a pan"]
        }"#
    }

    #[test]
    fn test_json_to_model_and_back() {
        let json: JsonRecipe = serde_json::from_str(sample_json()).unwrap();
        let recipe = json.to_model().unwrap();
        assert_eq!(recipe.name.as_str(), "Pancakes");
        assert_eq!(recipe.tags.len(), 2);
        assert_eq!(recipe.ingredients.len(), 2);
        let egg = recipe.ingredients.get("egg").unwrap();
        assert_eq!(egg.estimated_quantity.as_deref(), Some("a couple"));
        assert_eq!(egg.substitutions[0].name(), "flax egg");

        let again = JsonRecipe::from(&recipe).to_model().unwrap();
        assert_eq!(again, recipe);
    }

    #[test]
    fn test_missing_name_is_reported() {
        let json: JsonRecipe = serde_json::from_str(r#"{ "steps": ["x"] }"#).unwrap();
        let err = json.to_model().unwrap_err();
        assert_eq!(err.to_string(), "Recipe's name field is missing!");
    }

    #[test]
    fn test_invalid_field_values_are_rejected() {
        let bad_duration: JsonRecipe =
            serde_json::from_str(r#"{ "name": "Soup", "duration": "forever" }"#).unwrap();
        assert!(matches!(
            bad_duration.to_model(),
            Err(RecipeError::IllegalValue(_))
        ));

        let bad_tag: JsonRecipe =
            serde_json::from_str(r#"{ "name": "Soup", "tags": ["two words"] }"#).unwrap();
        assert!(bad_tag.to_model().is_err());

        let bad_quantity: JsonRecipe = serde_json::from_str(
            r#"{ "name": "Soup", "ingredients": [{ "name": "salt", "quantity": "lots" }] }"#,
        )
        .unwrap();
        assert!(bad_quantity.to_model().is_err());
    }
}
