// File: ./src/commands.rs
// Command words, their parsing, and their effect on the model.
use crate::error::{RecipeError, Result};
use crate::import::ImportManager;
use crate::model::display::RecipeDisplay;
use crate::model::parser::{RecipeDescriptor, parse_recipe, tokenize};
use crate::model::{Model, Recipe, RecipeBook};
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

pub const MESSAGE_UNKNOWN_COMMAND: &str = "Unknown command";
pub const MESSAGE_INVALID_INDEX: &str = "Index is not a positive integer.";
pub const MESSAGE_INDEX_OUT_OF_RANGE: &str = "The recipe index provided is invalid";
pub const MESSAGE_NOT_EDITED: &str = "At least one field to edit must be provided.";
pub const MESSAGE_NO_FILE_SELECTED: &str = "No file selected.";
pub const MESSAGE_EXIT: &str = "Exiting RIZZ-ipe as requested ...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum CommandWord {
    Add,
    Edit,
    Delete,
    List,
    Find,
    Import,
    Export,
    Help,
    Exit,
}

impl CommandWord {
    pub fn usage(&self) -> &'static str {
        match self {
            CommandWord::Add => {
                "add n/NAME [d/DURATION] [p/PORTION] [t/TAG]... [i/INGREDIENT]... [s/STEP]...\n\
                 Example: add n/Pancakes d/20 min p/2-4 t/breakfast i/-n flour -a 200 g s/Mix s/Fry"
            }
            CommandWord::Edit => {
                "edit INDEX [n/NAME] [d/DURATION] [p/PORTION] [t/TAG]... [i/INGREDIENT]... [s/STEP]...\n\
                 Empty t/ i/ or s/ clears the list, empty d/ or p/ clears the value.\n\
                 Example: edit 1 d/25 min t/"
            }
            CommandWord::Delete => "delete INDEX\nExample: delete 2",
            CommandWord::List => "list",
            CommandWord::Find => "find KEYWORD [MORE_KEYWORDS]...\nExample: find chicken soup",
            CommandWord::Import => "import [--replace] PATH\nExample: import recipes.json",
            CommandWord::Export => "export INDEX\nExample: export 1",
            CommandWord::Help => "help",
            CommandWord::Exit => "exit",
        }
    }

    pub fn all_usages() -> Vec<&'static str> {
        CommandWord::iter().map(|w| w.usage()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(Recipe),
    Edit {
        index: usize,
        descriptor: RecipeDescriptor,
    },
    Delete(usize),
    List,
    Find(Vec<String>),
    Import {
        path: String,
        replace: bool,
    },
    Export(usize),
    Help,
    Exit,
}

/// What the shell should do after a command ran.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandResult {
    pub feedback: String,
    pub show_help: bool,
    pub exit: bool,
    /// The recipe book was modified and must be saved.
    pub changed: bool,
}

impl CommandResult {
    fn message(feedback: impl Into<String>) -> Self {
        Self {
            feedback: feedback.into(),
            ..Default::default()
        }
    }

    fn changed(feedback: impl Into<String>) -> Self {
        Self {
            feedback: feedback.into(),
            changed: true,
            ..Default::default()
        }
    }
}

fn invalid_format(word: CommandWord, reason: &str) -> RecipeError {
    RecipeError::parse(format!(
        "Invalid command format! {}\n{}",
        reason,
        word.usage()
    ))
}

/// Parses a 1-based index. Leading and trailing whitespace is ignored.
pub fn parse_index(text: &str) -> Result<usize> {
    match text.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(RecipeError::parse(MESSAGE_INVALID_INDEX)),
    }
}

fn strip_quotes(s: &str) -> &str {
    let s = s.trim();
    if s.len() >= 2
        && ((s.starts_with('"') && s.ends_with('"')) || (s.starts_with('\'') && s.ends_with('\'')))
    {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

/// Parses one line of user input into a `Command`.
pub fn parse_command(input: &str) -> Result<Command> {
    let input = input.trim();
    let (word, args) = match input.split_once(char::is_whitespace) {
        Some((w, rest)) => (w, rest),
        None => (input, ""),
    };
    let word = CommandWord::from_str(word).map_err(|_| RecipeError::parse(MESSAGE_UNKNOWN_COMMAND))?;

    match word {
        CommandWord::Add => parse_recipe(args)
            .map(Command::Add)
            .map_err(|e| invalid_format(word, &e.to_string())),
        CommandWord::Edit => {
            let map = tokenize(args);
            if map.preamble().is_empty() {
                return Err(invalid_format(word, "Missing recipe index."));
            }
            let index = parse_index(map.preamble())?;
            let descriptor = RecipeDescriptor::from_arguments(&map)
                .map_err(|e| invalid_format(word, &e.to_string()))?;
            if descriptor.is_empty() {
                return Err(RecipeError::parse(MESSAGE_NOT_EDITED));
            }
            Ok(Command::Edit { index, descriptor })
        }
        CommandWord::Delete | CommandWord::Export => {
            if args.trim().is_empty() {
                return Err(invalid_format(word, "Missing recipe index."));
            }
            let index = parse_index(args)?;
            Ok(match word {
                CommandWord::Delete => Command::Delete(index),
                _ => Command::Export(index),
            })
        }
        CommandWord::Find => {
            let keywords: Vec<String> = args.split_whitespace().map(str::to_string).collect();
            if keywords.is_empty() {
                return Err(invalid_format(word, "Give at least one keyword."));
            }
            Ok(Command::Find(keywords))
        }
        CommandWord::Import => {
            let mut rest = args.trim();
            let mut replace = false;
            if let Some(r) = rest.strip_prefix("--replace")
                && (r.is_empty() || r.starts_with(char::is_whitespace))
            {
                replace = true;
                rest = r;
            } else if let Some(r) = rest.strip_suffix("--replace")
                && (r.is_empty() || r.ends_with(char::is_whitespace))
            {
                replace = true;
                rest = r;
            }
            Ok(Command::Import {
                path: strip_quotes(rest).to_string(),
                replace,
            })
        }
        CommandWord::List | CommandWord::Help | CommandWord::Exit => {
            if !args.trim().is_empty() {
                return Err(invalid_format(word, "This command takes no arguments."));
            }
            Ok(match word {
                CommandWord::List => Command::List,
                CommandWord::Help => Command::Help,
                _ => Command::Exit,
            })
        }
    }
}

impl Command {
    pub fn word(&self) -> CommandWord {
        match self {
            Command::Add(_) => CommandWord::Add,
            Command::Edit { .. } => CommandWord::Edit,
            Command::Delete(_) => CommandWord::Delete,
            Command::List => CommandWord::List,
            Command::Find(_) => CommandWord::Find,
            Command::Import { .. } => CommandWord::Import,
            Command::Export(_) => CommandWord::Export,
            Command::Help => CommandWord::Help,
            Command::Exit => CommandWord::Exit,
        }
    }

    /// Runs the command against `model`. On error the model is left unchanged.
    pub fn execute(&self, model: &mut Model, importer: &ImportManager) -> Result<CommandResult> {
        match self {
            Command::Add(recipe) => {
                model.book.add(recipe.clone())?;
                model.clear_filter();
                Ok(CommandResult::changed(format!(
                    "New recipe added: {}",
                    recipe.name
                )))
            }
            Command::Edit { index, descriptor } => {
                let position = resolve(model, *index)?;
                let edited = descriptor.apply_to(&model.book.recipes()[position]);
                let name = edited.name.clone();
                model.book.set(position, edited)?;
                model.clear_filter();
                Ok(CommandResult::changed(format!("Edited recipe: {}", name)))
            }
            Command::Delete(index) => {
                let position = resolve(model, *index)?;
                let removed = model
                    .book
                    .remove(position)
                    .ok_or_else(|| RecipeError::command(MESSAGE_INDEX_OUT_OF_RANGE))?;
                Ok(CommandResult::changed(format!(
                    "Deleted recipe: {}",
                    removed.name
                )))
            }
            Command::List => {
                model.clear_filter();
                Ok(CommandResult::message("Listed all recipes"))
            }
            Command::Find(keywords) => {
                model.set_filter(keywords.clone());
                let count = model.displayed().len();
                Ok(CommandResult::message(format!(
                    "{} recipe{} listed!",
                    count,
                    if count == 1 { "" } else { "s" }
                )))
            }
            Command::Import { path, replace } => {
                let Some(resolved) = importer.resolve(path)? else {
                    log::warn!("Import cancelled: no file selected");
                    return Ok(CommandResult::message(MESSAGE_NO_FILE_SELECTED));
                };
                let recipes = importer.import_recipes(&resolved)?;
                let file = resolved.display();
                let feedback = if *replace {
                    let count = recipes.len();
                    model.book.replace_all(RecipeBook::from_recipes(recipes)?);
                    format!("Imported {} recipes from {}, replacing the recipe book.", count, file)
                } else {
                    let report = model.book.merge(recipes);
                    format!(
                        "Imported {} recipes from {} ({} already present, skipped).",
                        report.added, file, report.skipped
                    )
                };
                model.clear_filter();
                Ok(CommandResult::changed(feedback))
            }
            Command::Export(index) => {
                let position = resolve(model, *index)?;
                let recipe = &model.book.recipes()[position];
                Ok(CommandResult::message(format!(
                    "add{}",
                    ImportManager::command_text(recipe)
                )))
            }
            Command::Help => Ok(CommandResult {
                feedback: "Showing help.".to_string(),
                show_help: true,
                ..Default::default()
            }),
            Command::Exit => Ok(CommandResult {
                feedback: MESSAGE_EXIT.to_string(),
                exit: true,
                ..Default::default()
            }),
        }
    }
}

/// Maps a displayed index to a book position or reports it as invalid.
fn resolve(model: &Model, index: usize) -> Result<usize> {
    model
        .book_position(index)
        .ok_or_else(|| RecipeError::command(MESSAGE_INDEX_OUT_OF_RANGE))
}

/// Short description for confirmations and logs, e.g. `#2 Pancakes`.
pub fn describe_target(model: &Model, index: usize) -> Option<String> {
    model
        .book_position(index)
        .map(|pos| format!("#{} {}", index, model.book.recipes()[pos].summary_line()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UserPrefs;

    fn model_with(names: &[&str]) -> Model {
        let recipes = names
            .iter()
            .map(|n| Recipe::new(n.parse().unwrap()))
            .collect();
        Model::new(
            RecipeBook::from_recipes(recipes).unwrap(),
            UserPrefs::default(),
        )
    }

    fn run(model: &mut Model, line: &str) -> Result<CommandResult> {
        parse_command(line)?.execute(model, &ImportManager::new(None))
    }

    #[test]
    fn test_command_words_are_case_insensitive() {
        assert_eq!(parse_command("LIST").unwrap(), Command::List);
        assert_eq!(parse_command("  Exit  ").unwrap(), Command::Exit);
        assert_eq!(parse_command("dElEtE 3").unwrap(), Command::Delete(3));
    }

    #[test]
    fn test_unknown_command() {
        let err = parse_command("cook 1").unwrap_err();
        assert_eq!(err.to_string(), MESSAGE_UNKNOWN_COMMAND);
        assert!(parse_command("").is_err());
    }

    #[test]
    fn test_invalid_indices() {
        for line in ["delete 0", "delete -1", "delete one", "edit x n/A", "export 1.5"] {
            let err = parse_command(line).unwrap_err();
            assert_eq!(err.to_string(), MESSAGE_INVALID_INDEX, "{}", line);
        }
        assert!(parse_command("delete").unwrap_err().to_string().contains("delete INDEX"));
    }

    #[test]
    fn test_add_error_carries_usage() {
        let err = parse_command("add d/10 min").unwrap_err();
        assert!(matches!(err, RecipeError::Parse(_)));
        assert!(err.to_string().contains("add n/NAME"));
    }

    #[test]
    fn test_edit_requires_a_field() {
        assert_eq!(
            parse_command("edit 1").unwrap_err().to_string(),
            MESSAGE_NOT_EDITED
        );
    }

    #[test]
    fn test_import_arguments() {
        assert_eq!(
            parse_command("import --replace my recipes.json").unwrap(),
            Command::Import {
                path: "my recipes.json".to_string(),
                replace: true
            }
        );
        assert_eq!(
            parse_command("import \"a b.json\" --replace").unwrap(),
            Command::Import {
                path: "a b.json".to_string(),
                replace: true
            }
        );
        assert_eq!(
            parse_command("import").unwrap(),
            Command::Import {
                path: String::new(),
                replace: false
            }
        );
    }

    #[test]
    fn test_add_then_duplicate() {
        let mut model = model_with(&[]);
        let res = run(&mut model, "add n/Pancakes s/Mix").unwrap();
        assert!(res.changed);
        assert_eq!(model.book.len(), 1);

        let err = run(&mut model, "add n/pancakes").unwrap_err();
        assert!(matches!(err, RecipeError::Command(_)));
        assert_eq!(model.book.len(), 1);
    }

    #[test]
    fn test_delete_uses_displayed_index() {
        let mut model = model_with(&["Beef Stew", "Chicken Soup", "Chicken Curry"]);
        run(&mut model, "find chicken").unwrap();
        let res = run(&mut model, "delete 2").unwrap();
        assert_eq!(res.feedback, "Deleted recipe: Chicken Curry");
        let names: Vec<&str> = model.displayed().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Chicken Soup"]);

        let err = run(&mut model, "delete 2").unwrap_err();
        assert_eq!(err.to_string(), MESSAGE_INDEX_OUT_OF_RANGE);
    }

    #[test]
    fn test_edit_replaces_given_fields_only() {
        let mut model = model_with(&[]);
        run(&mut model, "add n/Soup d/1 h t/warm s/Boil water").unwrap();
        run(&mut model, "edit 1 n/Tomato Soup t/").unwrap();
        let r = &model.book.recipes()[0];
        assert_eq!(r.name.as_str(), "Tomato Soup");
        assert!(r.tags.is_empty());
        assert_eq!(r.duration.as_ref().unwrap().to_string(), "1 hour");
        assert_eq!(r.steps.len(), 1);
    }

    #[test]
    fn test_export_reparses() {
        let mut model = model_with(&[]);
        run(
            &mut model,
            "add n/Curry p/4 i/rice -a 2 cups i/-n chicken -cn thigh s/Cook",
        )
        .unwrap();
        let exported = run(&mut model, "export 1").unwrap().feedback;
        match parse_command(&exported).unwrap() {
            Command::Add(recipe) => assert_eq!(&recipe, &model.book.recipes()[0]),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_exit_and_help_flags() {
        let mut model = model_with(&[]);
        let exit = run(&mut model, "exit").unwrap();
        assert!(exit.exit);
        assert_eq!(exit.feedback, MESSAGE_EXIT);
        assert!(run(&mut model, "help").unwrap().show_help);
    }

    #[test]
    fn test_empty_import_is_noop() {
        let mut model = model_with(&["A"]);
        let res = run(&mut model, "import").unwrap();
        assert_eq!(res.feedback, MESSAGE_NO_FILE_SELECTED);
        assert!(!res.changed);
        assert_eq!(model.book.len(), 1);
    }
}
