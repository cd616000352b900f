// File: ./src/model/ingredient.rs
use crate::error::{RecipeError, Result};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

pub const MESSAGE_INGREDIENT_CONSTRAINTS: &str =
    "Ingredient names should not be blank and should not contain '/'";
pub const MESSAGE_QUANTITY_CONSTRAINTS: &str =
    "Quantities should be a number or fraction followed by an optional unit, e.g. 200 g, 1/2 cup or 3";

/// An ingredient is identified by its name alone; the common name is
/// descriptive only.
#[derive(Debug, Clone, Eq)]
pub struct Ingredient {
    name: String,
    common_name: Option<String>,
}

impl Ingredient {
    pub fn new(name: &str, common_name: Option<&str>) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() || name.contains('/') {
            return Err(RecipeError::illegal(MESSAGE_INGREDIENT_CONSTRAINTS));
        }
        let common_name = common_name
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);
        Ok(Self {
            name: name.to_string(),
            common_name,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn common_name(&self) -> Option<&str> {
        self.common_name.as_deref()
    }
}

impl PartialEq for Ingredient {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Hash for Ingredient {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.common_name {
            Some(common) => write!(f, "{} ({})", self.name, common),
            None => f.write_str(&self.name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quantity {
    amount: String,
    unit: Option<String>,
}

impl Quantity {
    fn is_valid_amount(s: &str) -> bool {
        let number = |p: &str| {
            let mut parts = p.splitn(2, '.');
            let whole = parts.next().unwrap_or("");
            let whole_ok = !whole.is_empty() && whole.chars().all(|c| c.is_ascii_digit());
            match parts.next() {
                Some(frac) => {
                    whole_ok && !frac.is_empty() && frac.chars().all(|c| c.is_ascii_digit())
                }
                None => whole_ok,
            }
        };
        match s.split_once('/') {
            Some((num, den)) => {
                number(num) && !den.is_empty() && den.chars().all(|c| c.is_ascii_digit())
                    && den.parse::<u32>().is_ok_and(|d| d > 0)
            }
            None => number(s),
        }
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }
}

impl FromStr for Quantity {
    type Err = RecipeError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let split_at = trimmed
            .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '/'))
            .unwrap_or(trimmed.len());
        let (amount, unit) = trimmed.split_at(split_at);
        if !Self::is_valid_amount(amount) {
            return Err(RecipeError::illegal(MESSAGE_QUANTITY_CONSTRAINTS));
        }
        let unit = unit.trim();
        Ok(Self {
            amount: amount.to_string(),
            unit: (!unit.is_empty()).then(|| unit.to_string()),
        })
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.unit {
            Some(unit) => write!(f, "{} {}", self.amount, unit),
            None => f.write_str(&self.amount),
        }
    }
}

/// Per-recipe details attached to an ingredient.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngredientInformation {
    pub quantity: Option<Quantity>,
    pub estimated_quantity: Option<String>,
    pub remarks: Vec<String>,
    pub substitutions: Vec<Ingredient>,
}

impl IngredientInformation {
    /// Short human summary, e.g. "200 g, sifted".
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if let Some(q) = &self.quantity {
            parts.push(q.to_string());
        }
        if let Some(e) = &self.estimated_quantity {
            parts.push(format!("~{}", e));
        }
        parts.extend(self.remarks.iter().cloned());
        if !self.substitutions.is_empty() {
            let subs: Vec<&str> = self.substitutions.iter().map(Ingredient::name).collect();
            parts.push(format!("or {}", subs.join(" / ")));
        }
        parts.join(", ")
    }
}

/// Insertion-ordered mapping from ingredient to its information.
/// Inserting an ingredient that is already present replaces its entry in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngredientTable {
    entries: Vec<(Ingredient, IngredientInformation)>,
}

impl IngredientTable {
    pub fn insert(&mut self, ingredient: Ingredient, info: IngredientInformation) {
        if let Some(slot) = self.entries.iter_mut().find(|(i, _)| *i == ingredient) {
            *slot = (ingredient, info);
        } else {
            self.entries.push((ingredient, info));
        }
    }

    pub fn get(&self, name: &str) -> Option<&IngredientInformation> {
        self.entries
            .iter()
            .find(|(i, _)| i.name() == name)
            .map(|(_, info)| info)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Ingredient, &IngredientInformation)> {
        self.entries.iter().map(|(i, info)| (i, info))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl FromIterator<(Ingredient, IngredientInformation)> for IngredientTable {
    fn from_iter<T: IntoIterator<Item = (Ingredient, IngredientInformation)>>(iter: T) -> Self {
        let mut table = Self::default();
        for (ingredient, info) in iter {
            table.insert(ingredient, info);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingredient_identity_is_name() {
        let a = Ingredient::new("flour", Some("plain flour")).unwrap();
        let b = Ingredient::new("flour", None).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "flour (plain flour)");
        assert!(Ingredient::new("  ", None).is_err());
        assert!(Ingredient::new("salt/pepper", None).is_err());
    }

    #[test]
    fn test_quantity_parsing() {
        let q: Quantity = "200 g".parse().unwrap();
        assert_eq!(q.amount(), "200");
        assert_eq!(q.unit(), Some("g"));

        let q: Quantity = "1/2 cup".parse().unwrap();
        assert_eq!(q.to_string(), "1/2 cup");

        let q: Quantity = "3".parse().unwrap();
        assert_eq!(q.unit(), None);

        let q: Quantity = "250ml".parse().unwrap();
        assert_eq!(q.to_string(), "250 ml");

        assert!("a pinch".parse::<Quantity>().is_err());
        assert!("1/0 cup".parse::<Quantity>().is_err());
        assert!("1..5 kg".parse::<Quantity>().is_err());
    }

    #[test]
    fn test_table_replaces_in_place() {
        let mut table = IngredientTable::default();
        table.insert(
            Ingredient::new("egg", None).unwrap(),
            IngredientInformation::default(),
        );
        table.insert(
            Ingredient::new("milk", None).unwrap(),
            IngredientInformation::default(),
        );
        let info = IngredientInformation {
            quantity: Some("2".parse().unwrap()),
            ..Default::default()
        };
        table.insert(Ingredient::new("egg", None).unwrap(), info.clone());

        let names: Vec<&str> = table.iter().map(|(i, _)| i.name()).collect();
        assert_eq!(names, vec!["egg", "milk"]);
        assert_eq!(table.get("egg"), Some(&info));
    }

    #[test]
    fn test_information_summary() {
        let info = IngredientInformation {
            quantity: Some("100 g".parse().unwrap()),
            estimated_quantity: None,
            remarks: vec!["softened".to_string()],
            substitutions: vec![Ingredient::new("margarine", None).unwrap()],
        };
        assert_eq!(info.summary(), "100 g, softened, or margarine");
    }
}
