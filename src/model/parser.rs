// File: src/model/parser.rs
// Prefix syntax for recipes: `n/NAME d/DURATION p/PORTION t/TAG i/INGREDIENT s/STEP`.
// Ingredients carry their own flags: `-n NAME -cn COMMON -a QTY -e ESTIMATE -r REMARK -s SUB`.
// A leading backslash turns a prefix- or flag-looking word back into plain text (`\s/x`).
use crate::error::{RecipeError, Result};
use crate::model::ingredient::{Ingredient, IngredientInformation, IngredientTable, Quantity};
use crate::model::recipe::{Name, Recipe, RecipeDuration, RecipePortion, Step, Tag};
use std::collections::BTreeSet;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Prefix {
    Name,
    Duration,
    Portion,
    Tag,
    Ingredient,
    Step,
}

impl Prefix {
    pub const ALL: [Prefix; 6] = [
        Prefix::Name,
        Prefix::Duration,
        Prefix::Portion,
        Prefix::Tag,
        Prefix::Ingredient,
        Prefix::Step,
    ];

    pub fn token(&self) -> &'static str {
        match self {
            Prefix::Name => "n/",
            Prefix::Duration => "d/",
            Prefix::Portion => "p/",
            Prefix::Tag => "t/",
            Prefix::Ingredient => "i/",
            Prefix::Step => "s/",
        }
    }

    fn at_start_of(word: &str) -> Option<Prefix> {
        Self::ALL.into_iter().find(|p| word.starts_with(p.token()))
    }
}

const INGREDIENT_FLAGS: [&str; 6] = ["-n", "-cn", "-a", "-e", "-r", "-s"];

fn is_ingredient_flag(word: &str) -> bool {
    INGREDIENT_FLAGS.contains(&word)
}

fn is_prefixed_word(word: &str) -> bool {
    Prefix::at_start_of(word).is_some()
}

/// Splits `input` into whitespace-delimited words, keeping their byte offsets.
fn words_with_offsets(input: &str) -> Vec<(usize, &str)> {
    let mut words = Vec::new();
    let mut start = None;
    for (idx, c) in input.char_indices() {
        match (c.is_whitespace(), start) {
            (true, Some(s)) => {
                words.push((s, &input[s..idx]));
                start = None;
            }
            (false, None) => start = Some(idx),
            _ => {}
        }
    }
    if let Some(s) = start {
        words.push((s, &input[s..]));
    }
    words
}

/// Rewrites each word of `input` with `f`, leaving whitespace untouched.
fn map_words(input: &str, f: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(input.len() + 4);
    let mut cursor = 0;
    for (start, word) in words_with_offsets(input) {
        out.push_str(&input[cursor..start]);
        match f(word) {
            Some(replacement) => out.push_str(&replacement),
            None => out.push_str(word),
        }
        cursor = start + word.len();
    }
    out.push_str(&input[cursor..]);
    out
}

fn escape_with(input: &str, is_marker: fn(&str) -> bool) -> String {
    map_words(input, |word| {
        is_marker(word.trim_start_matches('\\')).then(|| format!("\\{}", word))
    })
}

fn unescape_with(input: &str, is_marker: fn(&str) -> bool) -> String {
    map_words(input, |word| {
        let core = word.trim_start_matches('\\');
        (core.len() < word.len() && is_marker(core)).then(|| word[1..].to_string())
    })
}

/// Escapes words that would otherwise be read as a field prefix.
pub fn escape_value(value: &str) -> String {
    escape_with(value, is_prefixed_word)
}

/// Escapes words that would otherwise be read as an ingredient flag (and prefixes).
pub fn escape_ingredient_value(value: &str) -> String {
    escape_value(&escape_with(value, is_ingredient_flag))
}

/// Result of splitting command arguments on field prefixes.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ArgumentMap {
    preamble: String,
    values: Vec<(Prefix, String)>,
}

impl ArgumentMap {
    /// Text before the first prefix, trimmed.
    pub fn preamble(&self) -> &str {
        &self.preamble
    }

    /// Last value given for `prefix`; scalar fields keep the last occurrence.
    pub fn last(&self, prefix: Prefix) -> Option<&str> {
        self.values
            .iter()
            .rev()
            .find(|(p, _)| *p == prefix)
            .map(|(_, v)| v.as_str())
    }

    /// Every value given for `prefix`, in order.
    pub fn all(&self, prefix: Prefix) -> Vec<&str> {
        self.values
            .iter()
            .filter(|(p, _)| *p == prefix)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn contains(&self, prefix: Prefix) -> bool {
        self.values.iter().any(|(p, _)| *p == prefix)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Splits `args` on prefixes that start a word. Values are trimmed and unescaped.
pub fn tokenize(args: &str) -> ArgumentMap {
    let markers: Vec<(usize, Prefix)> = words_with_offsets(args)
        .into_iter()
        .filter_map(|(offset, word)| Prefix::at_start_of(word).map(|p| (offset, p)))
        .collect();

    let preamble_end = markers.first().map(|(o, _)| *o).unwrap_or(args.len());
    let mut map = ArgumentMap {
        preamble: unescape_with(args[..preamble_end].trim(), is_prefixed_word),
        values: Vec::with_capacity(markers.len()),
    };

    for (i, (offset, prefix)) in markers.iter().enumerate() {
        let value_start = offset + prefix.token().len();
        let value_end = markers.get(i + 1).map(|(o, _)| *o).unwrap_or(args.len());
        let raw = args[value_start..value_end].trim();
        map.values
            .push((*prefix, unescape_with(raw, is_prefixed_word)));
    }
    map
}

fn illegal_to_parse(err: RecipeError) -> RecipeError {
    match err {
        RecipeError::IllegalValue(msg) => RecipeError::Parse(msg),
        other => other,
    }
}

/// Parses the value of an `i/` field.
///
/// Text before the first flag is shorthand for `-n`, so `i/egg` and `i/-n egg` are equal.
pub fn parse_ingredient(value: &str) -> Result<(Ingredient, IngredientInformation)> {
    let words = words_with_offsets(value);
    let flags: Vec<(usize, &str)> = words
        .iter()
        .filter(|(_, w)| is_ingredient_flag(w))
        .copied()
        .collect();

    let segment = |from: usize, to: usize| -> String {
        unescape_with(value[from..to].trim(), is_ingredient_flag)
    };

    let mut name = {
        let end = flags.first().map(|(o, _)| *o).unwrap_or(value.len());
        Some(segment(0, end)).filter(|n| !n.is_empty())
    };
    let mut common_name = None;
    let mut quantity = None;
    let mut estimated_quantity = None;
    let mut remarks = Vec::new();
    let mut substitutions = Vec::new();

    for (i, (offset, flag)) in flags.iter().enumerate() {
        let end = flags.get(i + 1).map(|(o, _)| *o).unwrap_or(value.len());
        let text = segment(offset + flag.len(), end);
        if text.is_empty() {
            return Err(RecipeError::parse(format!(
                "Missing value after ingredient flag {}",
                flag
            )));
        }
        match *flag {
            "-n" => name = Some(text),
            "-cn" => common_name = Some(text),
            "-a" => quantity = Some(text.parse::<Quantity>().map_err(illegal_to_parse)?),
            "-e" => estimated_quantity = Some(text),
            "-r" => remarks.push(text),
            "-s" => substitutions.push(Ingredient::new(&text, None).map_err(illegal_to_parse)?),
            _ => unreachable!("flags are filtered by is_ingredient_flag"),
        }
    }

    let name = name.ok_or_else(|| RecipeError::parse("Ingredient is missing a name (-n NAME)"))?;
    let ingredient = Ingredient::new(&name, common_name.as_deref()).map_err(illegal_to_parse)?;
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

/// Fields parsed from prefixed arguments. `None` means "not given".
/// For the optional scalars, `Some(None)` means "given empty", which clears the value on edit.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecipeDescriptor {
    pub name: Option<Name>,
    pub duration: Option<Option<RecipeDuration>>,
    pub portion: Option<Option<RecipePortion>>,
    pub tags: Option<BTreeSet<Tag>>,
    pub ingredients: Option<IngredientTable>,
    pub steps: Option<Vec<Step>>,
}

impl RecipeDescriptor {
    pub fn from_arguments(args: &ArgumentMap) -> Result<Self> {
        let non_empty = |prefix: Prefix| {
            args.all(prefix)
                .into_iter()
                .filter(|v| !v.is_empty())
                .collect::<Vec<_>>()
        };

        let name = args
            .last(Prefix::Name)
            .map(str::parse::<Name>)
            .transpose()
            .map_err(illegal_to_parse)?;
        let duration = args
            .last(Prefix::Duration)
            .map(|v| (!v.is_empty()).then(|| v.parse::<RecipeDuration>()).transpose())
            .transpose()
            .map_err(illegal_to_parse)?;
        let portion = args
            .last(Prefix::Portion)
            .map(|v| (!v.is_empty()).then(|| v.parse::<RecipePortion>()).transpose())
            .transpose()
            .map_err(illegal_to_parse)?;

        let tags = if args.contains(Prefix::Tag) {
            Some(
                non_empty(Prefix::Tag)
                    .into_iter()
                    .map(str::parse::<Tag>)
                    .collect::<Result<BTreeSet<_>>>()
                    .map_err(illegal_to_parse)?,
            )
        } else {
            None
        };
        let ingredients = if args.contains(Prefix::Ingredient) {
            Some(
                non_empty(Prefix::Ingredient)
                    .into_iter()
                    .map(parse_ingredient)
                    .collect::<Result<IngredientTable>>()?,
            )
        } else {
            None
        };
        let steps = if args.contains(Prefix::Step) {
            Some(
                non_empty(Prefix::Step)
                    .into_iter()
                    .map(str::parse::<Step>)
                    .collect::<Result<Vec<_>>>()
                    .map_err(illegal_to_parse)?,
            )
        } else {
            None
        };

        Ok(Self {
            name,
            duration,
            portion,
            tags,
            ingredients,
            steps,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.duration.is_none()
            && self.portion.is_none()
            && self.tags.is_none()
            && self.ingredients.is_none()
            && self.steps.is_none()
    }

    /// Builds a new recipe; the name is mandatory.
    pub fn into_recipe(self) -> Result<Recipe> {
        let name = self
            .name
            .clone()
            .ok_or_else(|| RecipeError::parse("A recipe needs a name (n/NAME)"))?;
        Ok(self.apply_to(&Recipe::new(name)))
    }

    /// Returns a copy of `recipe` with every given field replaced.
    pub fn apply_to(&self, recipe: &Recipe) -> Recipe {
        let mut edited = recipe.clone();
        if let Some(name) = &self.name {
            edited.name = name.clone();
        }
        if let Some(duration) = &self.duration {
            edited.duration = duration.clone();
        }
        if let Some(portion) = &self.portion {
            edited.portion = portion.clone();
        }
        if let Some(tags) = &self.tags {
            edited.tags = tags.clone();
        }
        if let Some(ingredients) = &self.ingredients {
            edited.ingredients = ingredients.clone();
        }
        if let Some(steps) = &self.steps {
            edited.steps = steps.clone();
        }
        edited
    }
}

/// Parses prefixed arguments into a new recipe. A preamble is not allowed.
pub fn parse_recipe(args: &str) -> Result<Recipe> {
    let map = tokenize(args);
    if !map.preamble().is_empty() {
        return Err(RecipeError::parse(format!(
            "Unexpected text before the first field: '{}'",
            map.preamble()
        )));
    }
    RecipeDescriptor::from_arguments(&map)?.into_recipe()
}
