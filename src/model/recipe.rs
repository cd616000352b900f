// File: ./src/model/recipe.rs
use crate::error::{RecipeError, Result};
use crate::model::ingredient::IngredientTable;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use strum::{EnumIter, EnumString, IntoEnumIterator};

pub const MESSAGE_NAME_CONSTRAINTS: &str =
    "Recipe names should only contain letters, digits, spaces and the characters ' - & , . ( ), and should not be blank";
pub const MESSAGE_DURATION_CONSTRAINTS: &str =
    "Durations should be a positive number followed by a time unit, e.g. 30 minutes or 1.5 hours";
pub const MESSAGE_PORTION_CONSTRAINTS: &str =
    "Portions should be a positive whole number or range followed by an optional unit, e.g. 4 servings or 2 - 3 persons";
pub const MESSAGE_TAG_CONSTRAINTS: &str =
    "Tags should be a single word made of letters, digits, '-' or '_'";
pub const MESSAGE_STEP_CONSTRAINTS: &str = "Steps should not be blank";

fn is_positive_decimal(s: &str) -> bool {
    let mut parts = s.splitn(2, '.');
    let whole = parts.next().unwrap_or("");
    let frac = parts.next();
    let digits_ok = |p: &str| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit());
    let valid = match frac {
        Some(f) => digits_ok(whole) && digits_ok(f),
        None => digits_ok(whole),
    };
    valid && s.parse::<f64>().is_ok_and(|v| v > 0.0)
}

// --- NAME ---

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name(String);

impl Name {
    pub fn is_valid(s: &str) -> bool {
        !s.trim().is_empty()
            && s.chars()
                .all(|c| c.is_alphanumeric() || c == ' ' || "'-&,.()".contains(c))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Name {
    type Err = RecipeError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if !Self::is_valid(trimmed) {
            return Err(RecipeError::illegal(MESSAGE_NAME_CONSTRAINTS));
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// --- DURATION ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum TimeUnit {
    #[strum(serialize = "second", serialize = "seconds", serialize = "sec", serialize = "secs", serialize = "s")]
    Second,
    #[strum(serialize = "minute", serialize = "minutes", serialize = "min", serialize = "mins", serialize = "m")]
    Minute,
    #[strum(serialize = "hour", serialize = "hours", serialize = "hr", serialize = "hrs", serialize = "h")]
    Hour,
    #[strum(serialize = "day", serialize = "days", serialize = "d")]
    Day,
    #[strum(serialize = "week", serialize = "weeks", serialize = "wk", serialize = "w")]
    Week,
}

impl TimeUnit {
    pub fn label(&self, plural: bool) -> &'static str {
        match (self, plural) {
            (TimeUnit::Second, false) => "second",
            (TimeUnit::Second, true) => "seconds",
            (TimeUnit::Minute, false) => "minute",
            (TimeUnit::Minute, true) => "minutes",
            (TimeUnit::Hour, false) => "hour",
            (TimeUnit::Hour, true) => "hours",
            (TimeUnit::Day, false) => "day",
            (TimeUnit::Day, true) => "days",
            (TimeUnit::Week, false) => "week",
            (TimeUnit::Week, true) => "weeks",
        }
    }

    /// Length of one unit in seconds.
    pub fn seconds(&self) -> u64 {
        match self {
            TimeUnit::Second => 1,
            TimeUnit::Minute => 60,
            TimeUnit::Hour => 3_600,
            TimeUnit::Day => 86_400,
            TimeUnit::Week => 604_800,
        }
    }

    pub fn all_labels() -> String {
        TimeUnit::iter()
            .map(|u| u.label(true))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecipeDuration {
    amount: String,
    unit: TimeUnit,
}

impl RecipeDuration {
    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    /// Approximate length in seconds, for sorting and display.
    pub fn as_seconds(&self) -> f64 {
        self.amount.parse::<f64>().unwrap_or(0.0) * self.unit.seconds() as f64
    }
}

impl FromStr for RecipeDuration {
    type Err = RecipeError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        // Accept both "30 minutes" and "30min".
        let split_at = trimmed
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(trimmed.len());
        let (amount, unit) = trimmed.split_at(split_at);
        let unit = unit.trim();
        if !is_positive_decimal(amount) || unit.is_empty() {
            return Err(RecipeError::illegal(MESSAGE_DURATION_CONSTRAINTS));
        }
        let unit = TimeUnit::from_str(unit).map_err(|_| {
            RecipeError::illegal(format!(
                "{} (known units: {})",
                MESSAGE_DURATION_CONSTRAINTS,
                TimeUnit::all_labels()
            ))
        })?;
        Ok(Self {
            amount: amount.to_string(),
            unit,
        })
    }
}

impl fmt::Display for RecipeDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.unit.label(self.amount != "1"))
    }
}

// --- PORTION ---

pub const DEFAULT_PORTION_UNIT: &str = "servings";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecipePortion {
    lower: u32,
    upper: Option<u32>,
    unit: String,
}

impl RecipePortion {
    pub fn lower(&self) -> u32 {
        self.lower
    }

    pub fn upper(&self) -> Option<u32> {
        self.upper
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }
}

impl FromStr for RecipePortion {
    type Err = RecipeError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || RecipeError::illegal(MESSAGE_PORTION_CONSTRAINTS);
        let spaced = s.replace('-', " - ");
        let words: Vec<&str> = spaced.split_whitespace().collect();

        let parse_count = |w: &str| -> Result<u32> {
            match w.parse::<u32>() {
                Ok(n) if n > 0 => Ok(n),
                _ => Err(invalid()),
            }
        };

        let lower = parse_count(words.first().ok_or_else(invalid)?)?;
        let (upper, rest) = if words.get(1) == Some(&"-") {
            let upper = parse_count(words.get(2).ok_or_else(invalid)?)?;
            if upper < lower {
                return Err(invalid());
            }
            (Some(upper), &words[3..])
        } else {
            (None, &words[1..])
        };

        if rest.iter().any(|w| *w == "-" || !w.chars().all(char::is_alphabetic)) {
            return Err(invalid());
        }
        let unit = if rest.is_empty() {
            DEFAULT_PORTION_UNIT.to_string()
        } else {
            rest.join(" ")
        };

        Ok(Self {
            lower,
            // "2 - 2 servings" is just "2 servings".
            upper: upper.filter(|u| *u != lower),
            unit,
        })
    }
}

impl fmt::Display for RecipePortion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.upper {
            Some(upper) => write!(f, "{} - {} {}", self.lower, upper, self.unit),
            None => write!(f, "{} {}", self.lower, self.unit),
        }
    }
}

// --- TAG ---

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(String);

impl Tag {
    pub fn is_valid(s: &str) -> bool {
        !s.is_empty()
            && s.chars()
                .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl FromStr for Tag {
    type Err = RecipeError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if !Self::is_valid(trimmed) {
            return Err(RecipeError::illegal(MESSAGE_TAG_CONSTRAINTS));
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// --- STEP ---

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Step(String);

impl Step {
    pub fn description(&self) -> &str {
        &self.0
    }
}

impl FromStr for Step {
    type Err = RecipeError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(RecipeError::illegal(MESSAGE_STEP_CONSTRAINTS));
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// --- RECIPE ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub name: Name,
    pub duration: Option<RecipeDuration>,
    pub portion: Option<RecipePortion>,
    pub tags: BTreeSet<Tag>,
    pub ingredients: IngredientTable,
    pub steps: Vec<Step>,
}

impl Recipe {
    pub fn new(name: Name) -> Self {
        Self {
            name,
            duration: None,
            portion: None,
            tags: BTreeSet::new(),
            ingredients: IngredientTable::default(),
            steps: Vec::new(),
        }
    }

    /// Weaker notion of equality used to keep the book free of duplicates:
    /// two recipes are the same when their names match ignoring case.
    pub fn is_same_recipe(&self, other: &Recipe) -> bool {
        self.name.as_str().to_lowercase() == other.name.as_str().to_lowercase()
    }

    /// True if any keyword matches a whole word of the name, ignoring case.
    pub fn name_contains_any(&self, keywords: &[String]) -> bool {
        let words: Vec<String> = self
            .name
            .as_str()
            .split_whitespace()
            .map(str::to_lowercase)
            .collect();
        keywords
            .iter()
            .any(|k| words.iter().any(|w| *w == k.to_lowercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_validation() {
        assert!("Pad Thai".parse::<Name>().is_ok());
        assert!("Mom's Mac & Cheese (v2)".parse::<Name>().is_ok());
        assert_eq!("  Soup  ".parse::<Name>().unwrap().as_str(), "Soup");
        assert!("   ".parse::<Name>().is_err());
        assert!("half/half".parse::<Name>().is_err());
    }

    #[test]
    fn test_duration_parsing_and_display() {
        let d: RecipeDuration = "30 min".parse().unwrap();
        assert_eq!(d.unit(), TimeUnit::Minute);
        assert_eq!(d.to_string(), "30 minutes");

        let d: RecipeDuration = "1 HOUR".parse().unwrap();
        assert_eq!(d.to_string(), "1 hour");

        let d: RecipeDuration = "1.5h".parse().unwrap();
        assert_eq!(d.to_string(), "1.5 hours");
        assert_eq!(d.as_seconds(), 5400.0);

        assert!("minutes".parse::<RecipeDuration>().is_err());
        assert!("0 minutes".parse::<RecipeDuration>().is_err());
        assert!("10 fortnights".parse::<RecipeDuration>().is_err());
        assert!("1.2.3 hours".parse::<RecipeDuration>().is_err());
    }

    #[test]
    fn test_duration_display_reparses_equal() {
        let d: RecipeDuration = "45 mins".parse().unwrap();
        let again: RecipeDuration = d.to_string().parse().unwrap();
        assert_eq!(d, again);
    }

    #[test]
    fn test_portion_parsing() {
        let p: RecipePortion = "4".parse().unwrap();
        assert_eq!(p.to_string(), "4 servings");

        let p: RecipePortion = "2-3 persons".parse().unwrap();
        assert_eq!(p.lower(), 2);
        assert_eq!(p.upper(), Some(3));
        assert_eq!(p.to_string(), "2 - 3 persons");

        let p: RecipePortion = "2 - 2 bowls".parse().unwrap();
        assert_eq!(p.to_string(), "2 bowls");

        assert!("3 - 2 servings".parse::<RecipePortion>().is_err());
        assert!("0 servings".parse::<RecipePortion>().is_err());
        assert!("some".parse::<RecipePortion>().is_err());
        assert!("2 - servings".parse::<RecipePortion>().is_err());
    }

    #[test]
    fn test_tag_validation() {
        assert!("vegan".parse::<Tag>().is_ok());
        assert!("gluten-free".parse::<Tag>().is_ok());
        assert!("two words".parse::<Tag>().is_err());
        assert!("".parse::<Tag>().is_err());
    }

    #[test]
    fn test_same_recipe_ignores_case() {
        let a = Recipe::new("Fried Rice".parse().unwrap());
        let mut b = Recipe::new("fried rice".parse().unwrap());
        b.steps.push("Fry".parse().unwrap());
        assert!(a.is_same_recipe(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn test_name_keyword_match() {
        let r = Recipe::new("Chicken Fried Rice".parse().unwrap());
        assert!(r.name_contains_any(&["rice".to_string()]));
        assert!(r.name_contains_any(&["beef".to_string(), "CHICKEN".to_string()]));
        assert!(!r.name_contains_any(&["ric".to_string()]));
    }
}
