// File: ./src/model/mod.rs
pub mod adapter;
pub mod book;
pub mod display;
pub mod ingredient;
pub mod parser;
pub mod prefs;
pub mod recipe;

pub use book::{MergeReport, RecipeBook};
pub use ingredient::{Ingredient, IngredientInformation, IngredientTable, Quantity};
pub use prefs::{GuiSettings, UserPrefs};
pub use recipe::{Name, Recipe, RecipeDuration, RecipePortion, Step, Tag, TimeUnit};

/// In-memory state that commands operate on: the recipe book, the user
/// preferences, and the keyword filter that decides which recipes are displayed.
#[derive(Debug, Clone, Default)]
pub struct Model {
    pub book: RecipeBook,
    pub prefs: UserPrefs,
    filter: Option<Vec<String>>,
}

impl Model {
    pub fn new(book: RecipeBook, prefs: UserPrefs) -> Self {
        Self {
            book,
            prefs,
            filter: None,
        }
    }

    /// Recipes currently displayed, in book order. Display indices are 1-based
    /// positions in this list.
    pub fn displayed(&self) -> Vec<&Recipe> {
        self.displayed_positions()
            .into_iter()
            .map(|pos| &self.book.recipes()[pos])
            .collect()
    }

    /// Book positions of the displayed recipes.
    fn displayed_positions(&self) -> Vec<usize> {
        self.book
            .recipes()
            .iter()
            .enumerate()
            .filter(|(_, r)| match &self.filter {
                Some(keywords) => r.name_contains_any(keywords),
                None => true,
            })
            .map(|(i, _)| i)
            .collect()
    }

    /// Maps a 1-based display index to a position in the book.
    pub fn book_position(&self, display_index: usize) -> Option<usize> {
        if display_index == 0 {
            return None;
        }
        self.displayed_positions().get(display_index - 1).copied()
    }

    pub fn set_filter(&mut self, keywords: Vec<String>) {
        self.filter = Some(keywords);
    }

    pub fn clear_filter(&mut self) {
        self.filter = None;
    }

    pub fn is_filtered(&self) -> bool {
        self.filter.is_some()
    }
}
