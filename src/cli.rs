// File: ./src/cli.rs
//! Shared command-line interface logic: help text, prompts and logging setup.
use crate::commands::{Command, CommandWord, describe_target, parse_command};
use crate::config::Config;
use crate::context::AppContext;
use crate::logic::Logic;
use crate::model::display::render_list;
use anyhow::{Context, Result};
use simplelog::{ColorChoice, CombinedLogger, LevelFilter, TermLogger, TerminalMode, WriteLogger};
use std::fs::OpenOptions;
use std::io::{BufRead, Write};

pub fn print_help(binary_name: &str) {
    println!(
        "RIZZ-ipe v{} - A command-driven recipe book",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("USAGE:");
    println!("    {} [--root <path>]                 Start the interactive shell", binary_name);
    println!("    {} import <file.json> [--replace]  Import recipes from a recipe book file", binary_name);
    println!("    {} export [INDEX]                  Print recipes as add commands", binary_name);
    println!("    {} list                            Print the recipe list", binary_name);
    println!("    {} --help                          Show this help message", binary_name);
    println!();
    println!("OPTIONS:");
    println!("    -r, --root <path>     Use a different directory for config and data.");
    println!("    -h, --help            Show this help message.");
    println!();
    print_command_help();
}

/// Command reference shown by `--help` and by the `help` command.
pub fn print_command_help() {
    println!("COMMANDS:");
    for usage in CommandWord::all_usages() {
        let mut lines = usage.lines();
        if let Some(first) = lines.next() {
            println!("    {}", first);
        }
        for line in lines {
            println!("        {}", line);
        }
    }
    println!();
    println!("RECIPE FIELDS:");
    println!("    n/NAME            Recipe name (letters, digits, spaces, ' - & , . ( ))");
    println!("    d/DURATION        Duration (30 min, 1.5 hours, 2h)");
    println!("    p/PORTION         Portion (4, 2-3 persons)");
    println!("    t/TAG             Tag, repeatable (t/vegan t/quick)");
    println!("    i/INGREDIENT      Ingredient, repeatable (see below)");
    println!("    s/STEP            Step, repeatable and kept in order");
    println!();
    println!("INGREDIENT FLAGS:");
    println!("    -n NAME           Ingredient name (i/egg is short for i/-n egg)");
    println!("    -cn NAME          Common name");
    println!("    -a QUANTITY       Quantity (200 g, 1/2 cup)");
    println!("    -e ESTIMATE       Estimated quantity (a pinch)");
    println!("    -r REMARK         Remark, repeatable");
    println!("    -s SUBSTITUTE     Substitute ingredient, repeatable");
    println!("    \\s/text  \\-a      Escape a prefix or flag to use it as plain text");
    println!();
    println!("EXAMPLES:");
    println!("    add n/Pancakes d/20 min p/2-4 t/breakfast i/-n flour -a 200 g -r sifted s/Mix s/Fry");
    println!("    edit 1 p/6 t/");
    println!("    find pancakes");
    println!("    import --replace ~/Downloads/recipebook.json");
}

/// Asks a yes/no question. Enter or `y` confirms; anything else, including EOF, cancels.
pub fn confirm(prompt: &str, input: &mut impl BufRead, output: &mut impl Write) -> Result<bool> {
    write!(output, "{} [Y/n] ", prompt)?;
    output.flush()?;
    let mut answer = String::new();
    if input.read_line(&mut answer)? == 0 {
        return Ok(false);
    }
    let answer = answer.trim().to_lowercase();
    Ok(answer.is_empty() || answer == "y" || answer == "yes")
}

fn write_list(logic: &Logic, output: &mut impl Write) -> Result<()> {
    let displayed = logic.model().displayed();
    writeln!(output, "{}", render_list(&displayed, logic.config().show_details))?;
    Ok(())
}

/// Interactive loop: reads one command per line until `exit` or EOF.
pub fn run_shell(logic: &mut Logic, input: &mut impl BufRead, output: &mut impl Write) -> Result<()> {
    for warning in logic.startup_warnings() {
        writeln!(output, "Warning: {}", warning)?;
    }
    writeln!(output, "Type 'help' for the list of commands.")?;
    write_list(logic, output)?;

    loop {
        write!(output, "> ")?;
        output.flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            log::info!("End of input, leaving the shell");
            logic.save_prefs();
            return Ok(());
        }
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(e) => {
                log::warn!("Rejected input '{}': {}", line.trim(), e);
                writeln!(output, "{}", e)?;
                continue;
            }
        };

        if let Command::Delete(index) = &command
            && logic.config().confirm_delete
            && let Some(target) = describe_target(logic.model(), *index)
        {
            let question = format!("Are you sure you want to delete this recipe?\n  {}\n", target);
            if !confirm(&question, input, output)? {
                writeln!(output, "Deletion cancelled.")?;
                continue;
            }
        }

        let lists = matches!(command, Command::List | Command::Find(_));
        match logic.run(command) {
            Ok(result) => {
                writeln!(output, "{}", result.feedback)?;
                if result.show_help {
                    print_command_help();
                }
                if result.exit {
                    return Ok(());
                }
                if result.changed || lists {
                    write_list(logic, output)?;
                }
            }
            Err(e) => writeln!(output, "{}", e)?,
        }
    }
}

/// Logs to `rizzipe.log` at the configured level and to the terminal for errors only.
pub fn init_logging(ctx: &dyn AppContext, config: &Config) -> Result<()> {
    let path = ctx.get_log_path()?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    CombinedLogger::init(vec![
        TermLogger::new(
            LevelFilter::Error,
            simplelog::Config::default(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ),
        WriteLogger::new(
            config.log_level.to_level_filter(),
            simplelog::Config::default(),
            file,
        ),
    ])
    .context("Logger already initialized")
}
