// File: src/model/book.rs
use crate::error::{RecipeError, Result};
use crate::model::recipe::Recipe;

pub const MESSAGE_DUPLICATE_RECIPE: &str = "This recipe already exists in the recipe book";

/// Ordered list of recipes without duplicates (see `Recipe::is_same_recipe`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeBook {
    recipes: Vec<Recipe>,
}

/// Outcome of merging an imported list into the book.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub added: usize,
    pub skipped: usize,
}

impl RecipeBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a book from a list, rejecting lists that contain duplicates.
    pub fn from_recipes(recipes: Vec<Recipe>) -> Result<Self> {
        let mut book = Self::new();
        for recipe in recipes {
            book.add(recipe)?;
        }
        Ok(book)
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    pub fn contains(&self, recipe: &Recipe) -> bool {
        self.recipes.iter().any(|r| r.is_same_recipe(recipe))
    }

    pub fn add(&mut self, recipe: Recipe) -> Result<()> {
        if self.contains(&recipe) {
            return Err(RecipeError::command(MESSAGE_DUPLICATE_RECIPE));
        }
        self.recipes.push(recipe);
        Ok(())
    }

    /// Replaces the recipe at `position` (0-based, book order).
    /// The edited recipe may keep its own name but must not collide with another one.
    pub fn set(&mut self, position: usize, edited: Recipe) -> Result<()> {
        if position >= self.recipes.len() {
            return Err(RecipeError::command("No recipe at that position"));
        }
        let collides = self
            .recipes
            .iter()
            .enumerate()
            .any(|(i, r)| i != position && r.is_same_recipe(&edited));
        if collides {
            return Err(RecipeError::command(MESSAGE_DUPLICATE_RECIPE));
        }
        self.recipes[position] = edited;
        Ok(())
    }

    pub fn remove(&mut self, position: usize) -> Option<Recipe> {
        (position < self.recipes.len()).then(|| self.recipes.remove(position))
    }

    /// Appends recipes that are not already present; returns how many were added/skipped.
    pub fn merge(&mut self, incoming: Vec<Recipe>) -> MergeReport {
        let mut report = MergeReport::default();
        for recipe in incoming {
            if self.contains(&recipe) {
                report.skipped += 1;
            } else {
                self.recipes.push(recipe);
                report.added += 1;
            }
        }
        report
    }

    pub fn replace_all(&mut self, other: RecipeBook) {
        self.recipes = other.recipes;
    }

    pub fn clear(&mut self) {
        self.recipes.clear();
    }
}
