// Importing recipe book files through the command layer.
use rizzipe::commands::{MESSAGE_NO_FILE_SELECTED, parse_command};
use rizzipe::config::Config;
use rizzipe::context::{AppContext, TestContext};
use rizzipe::error::RecipeError;
use rizzipe::logic::Logic;
use std::fs;
use std::sync::Arc;

const TWO_RECIPES: &str = r#"{
    "version": 1,
    "recipes": [
        { "name": "Pancakes", "tags": ["breakfast"], "steps": ["Mix", "Fry"] },
        { "name": "Soup", "duration": "40 minutes" }
    ]
}"#;

fn setup() -> (Arc<TestContext>, Logic) {
    let ctx = Arc::new(TestContext::new());
    let logic = Logic::new(ctx.clone(), Config::default()).unwrap();
    (ctx, logic)
}

fn names(logic: &Logic) -> Vec<String> {
    logic
        .model()
        .book
        .recipes()
        .iter()
        .map(|r| r.name.to_string())
        .collect()
}

#[test]
fn test_import_merges_and_saves() {
    let (ctx, mut logic) = setup();
    logic.execute("add n/Soup s/Boil").unwrap();
    let file = ctx.write_file("shared.json", TWO_RECIPES);

    let result = logic
        .execute(&format!("import {}", file.display()))
        .unwrap();
    assert!(result.changed);
    assert!(result.feedback.contains("Imported 1 recipes"));
    assert!(result.feedback.contains("1 already present"));
    assert_eq!(names(&logic), vec!["Soup", "Pancakes"]);
    // The existing Soup is kept, not overwritten.
    assert_eq!(logic.model().book.recipes()[0].steps.len(), 1);

    let reloaded = Logic::new(ctx.clone(), Config::default()).unwrap();
    assert_eq!(names(&reloaded), vec!["Soup", "Pancakes"]);
}

#[test]
fn test_import_replace() {
    let (ctx, mut logic) = setup();
    logic.execute("add n/Curry").unwrap();
    let file = ctx.write_file("replacement.json", TWO_RECIPES);

    logic
        .execute(&format!("import --replace {}", file.display()))
        .unwrap();
    assert_eq!(names(&logic), vec!["Pancakes", "Soup"]);
}

#[test]
fn test_non_json_file_is_rejected_and_state_unchanged() {
    let (ctx, mut logic) = setup();
    logic.execute("add n/Curry").unwrap();
    let file = ctx.write_file("recipes.txt", TWO_RECIPES);

    let err = logic
        .execute(&format!("import {}", file.display()))
        .unwrap_err();
    assert!(matches!(err, RecipeError::Command(_)));
    assert_eq!(err.to_string(), "recipes.txt is not a JSON file.");
    assert_eq!(names(&logic), vec!["Curry"]);
}

#[test]
fn test_invalid_values_abort_the_whole_import() {
    let (ctx, mut logic) = setup();
    logic.execute("add n/Curry").unwrap();
    let before = fs::read_to_string(logic.storage().path()).unwrap();

    let file = ctx.write_file(
        "broken.json",
        r#"{ "recipes": [
            { "name": "Good One" },
            { "name": "Bad One", "portion": "a lot" }
        ] }"#,
    );
    let err = logic
        .execute(&format!("import {}", file.display()))
        .unwrap_err();
    assert!(matches!(err, RecipeError::DataConversion { .. }));
    assert!(err.to_string().starts_with("Invalid values found in"));

    assert_eq!(names(&logic), vec!["Curry"]);
    assert_eq!(fs::read_to_string(logic.storage().path()).unwrap(), before);
}

#[test]
fn test_malformed_json_is_a_conversion_error() {
    let (ctx, mut logic) = setup();
    let file = ctx.write_file("garbage.json", "{ \"recipes\": [ { ");
    let err = logic
        .execute(&format!("import {}", file.display()))
        .unwrap_err();
    assert!(matches!(err, RecipeError::DataConversion { .. }));
    assert!(logic.model().book.is_empty());
}

#[test]
fn test_empty_path_is_a_noop() {
    let (_ctx, mut logic) = setup();
    let result = logic.execute("import").unwrap();
    assert_eq!(result.feedback, MESSAGE_NO_FILE_SELECTED);
    assert!(!result.changed);
    assert!(!logic.storage().path().exists());
}

#[test]
fn test_relative_path_found_in_download_dir() {
    let (ctx, mut logic) = setup();
    let downloads = ctx.get_default_import_dir().unwrap();
    fs::create_dir_all(&downloads).unwrap();
    fs::write(downloads.join("rizz_shared_recipes.json"), TWO_RECIPES).unwrap();

    logic.execute("import rizz_shared_recipes.json").unwrap();
    assert_eq!(logic.model().book.len(), 2);
}

#[test]
fn test_missing_file_is_reported() {
    let (ctx, mut logic) = setup();
    let missing = ctx.root.join("nowhere.json");
    let err = logic
        .execute(&format!("import {}", missing.display()))
        .unwrap_err();
    assert!(err.to_string().contains("File not found"));
}

#[test]
fn test_import_command_parses_quoted_path() {
    let cmd = parse_command("import '/tmp/my recipes.json'").unwrap();
    assert_eq!(
        cmd,
        rizzipe::commands::Command::Import {
            path: "/tmp/my recipes.json".to_string(),
            replace: false
        }
    );
}
