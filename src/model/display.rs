// File: ./src/model/display.rs
use crate::model::parser::{escape_ingredient_value, escape_value};
use crate::model::recipe::Recipe;

pub trait RecipeDisplay {
    /// Prefix form accepted by `add`, starting with a space: ` n/NAME d/... i/ -n ...`.
    fn to_command_text(&self) -> String;
    /// One-line summary used in the numbered list.
    fn summary_line(&self) -> String;
    /// Multi-line card; `details` adds ingredients and steps.
    fn to_card(&self, details: bool) -> String;
}

impl RecipeDisplay for Recipe {
    fn to_command_text(&self) -> String {
        let mut s = format!(" n/{}", escape_value(self.name.as_str()));
        if let Some(d) = &self.duration {
            s.push_str(&format!(" d/{}", d));
        }
        if let Some(p) = &self.portion {
            s.push_str(&format!(" p/{}", escape_value(&p.to_string())));
        }
        for tag in &self.tags {
            s.push_str(&format!(" t/{}", tag));
        }
        for (ingredient, info) in self.ingredients.iter() {
            s.push_str(&format!(" i/ -n {}", escape_ingredient_value(ingredient.name())));
            if let Some(common) = ingredient.common_name() {
                s.push_str(&format!(" -cn {}", escape_ingredient_value(common)));
            }
            if let Some(q) = &info.quantity {
                s.push_str(&format!(" -a {}", escape_ingredient_value(&q.to_string())));
            }
            if let Some(e) = &info.estimated_quantity {
                s.push_str(&format!(" -e {}", escape_ingredient_value(e)));
            }
            for remark in &info.remarks {
                s.push_str(&format!(" -r {}", escape_ingredient_value(remark)));
            }
            for sub in &info.substitutions {
                s.push_str(&format!(" -s {}", escape_ingredient_value(sub.name())));
            }
        }
        for step in &self.steps {
            s.push_str(&format!(" s/{}", escape_value(step.description())));
        }
        s
    }

    fn summary_line(&self) -> String {
        let mut s = self.name.to_string();
        let mut meta = Vec::new();
        if let Some(d) = &self.duration {
            meta.push(d.to_string());
        }
        if let Some(p) = &self.portion {
            meta.push(p.to_string());
        }
        if !meta.is_empty() {
            s.push_str(&format!(" [{}]", meta.join(", ")));
        }
        for tag in &self.tags {
            s.push_str(&format!(" #{}", tag));
        }
        s
    }

    fn to_card(&self, details: bool) -> String {
        let mut out = self.summary_line();
        if !details {
            return out;
        }
        if !self.ingredients.is_empty() {
            out.push_str("\n    Ingredients:");
            for (ingredient, info) in self.ingredients.iter() {
                let summary = info.summary();
                if summary.is_empty() {
                    out.push_str(&format!("\n      - {}", ingredient));
                } else {
                    out.push_str(&format!("\n      - {}: {}", ingredient, summary));
                }
            }
        }
        if !self.steps.is_empty() {
            out.push_str("\n    Steps:");
            for (i, step) in self.steps.iter().enumerate() {
                out.push_str(&format!("\n      {}. {}", i + 1, step));
            }
        }
        out
    }
}

/// Numbered listing of `recipes`, 1-based.
pub fn render_list(recipes: &[&Recipe], details: bool) -> String {
    if recipes.is_empty() {
        return "No recipes to show.".to_string();
    }
    recipes
        .iter()
        .enumerate()
        .map(|(i, r)| format!("{:>3}. {}", i + 1, r.to_card(details)))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::parser::parse_recipe;

    fn pancakes() -> Recipe {
        parse_recipe(
            "n/Pancakes d/20 min p/2-4 t/breakfast i/-n flour -a 200 g -r sifted \
             i/egg -s flax egg s/Mix everything s/Fry s/p style",
        )
        .unwrap()
    }

    #[test]
    fn test_command_text_layout() {
        let text = pancakes().to_command_text();
        assert!(text.starts_with(" n/Pancakes d/20 minutes p/2 - 4 servings t/breakfast"));
        assert!(text.contains(" i/ -n flour -a 200 g -r sifted"));
        assert!(text.contains(" i/ -n egg -s flax egg"));
        assert!(text.ends_with(" s/Mix everything s/Fry s/p style"));
    }

    #[test]
    fn test_command_text_reparses_to_same_recipe() {
        let original = pancakes();
        let reparsed = parse_recipe(&original.to_command_text()).unwrap();
        assert_eq!(reparsed, original);
    }

    #[test]
    fn test_card_details() {
        let r = pancakes();
        assert_eq!(
            r.to_card(false),
            "Pancakes [20 minutes, 2 - 4 servings] #breakfast"
        );
        let card = r.to_card(true);
        assert!(card.contains("- flour: 200 g, sifted"));
        assert!(card.contains("2. Fry"));
    }

    #[test]
    fn test_render_list_numbering() {
        let a = parse_recipe("n/A").unwrap();
        let b = parse_recipe("n/B").unwrap();
        let out = render_list(&[&a, &b], false);
        assert_eq!(out, "  1. A\n  2. B");
        assert_eq!(render_list(&[], false), "No recipes to show.");
    }
}
