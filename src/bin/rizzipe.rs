// Binary entry point: one-shot subcommands or the interactive shell.
use anyhow::Result;
use rizzipe::cli;
use rizzipe::commands::{Command, parse_index};
use rizzipe::config::Config;
use rizzipe::context::{SharedContext, StandardContext};
use rizzipe::import::ImportManager;
use rizzipe::logic::Logic;
use rizzipe::model::display::render_list;
use std::path::PathBuf;
use std::sync::Arc;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        cli::print_help("rizzipe");
        return Ok(());
    }

    let mut override_root: Option<PathBuf> = None;
    let mut positional: Vec<String> = Vec::new();
    let mut replace = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--root" | "-r" => {
                if i + 1 < args.len() {
                    override_root = Some(args[i + 1].clone().into());
                    i += 1; // Also consumed the value
                }
            }
            "--replace" => replace = true,
            arg => positional.push(arg.to_string()),
        }
        i += 1;
    }

    let ctx: SharedContext = Arc::new(StandardContext::new(override_root));
    let config = Config::load_or_default(ctx.as_ref())?;
    if let Err(e) = cli::init_logging(ctx.as_ref(), &config) {
        eprintln!("Logging disabled: {:#}", e);
    }

    let mut logic = Logic::new(ctx, config)?;
    for warning in logic.startup_warnings() {
        eprintln!("Warning: {}", warning);
    }

    match positional.first().map(String::as_str) {
        // CLI Command: rizzipe import <file.json> [--replace]
        Some("import") => {
            let path = positional.get(1).cloned().unwrap_or_default();
            let result = logic.run(Command::Import { path, replace })?;
            println!("{}", result.feedback);
        }
        // CLI Command: rizzipe export [INDEX]
        Some("export") => match positional.get(1) {
            Some(index) => {
                let result = logic.run(Command::Export(parse_index(index)?))?;
                println!("{}", result.feedback);
            }
            None => {
                for recipe in logic.model().displayed() {
                    println!("add{}", ImportManager::command_text(recipe));
                }
            }
        },
        Some("list") => {
            let displayed = logic.model().displayed();
            println!("{}", render_list(&displayed, logic.config().show_details));
        }
        Some(other) => {
            eprintln!("Unknown argument '{}'. See 'rizzipe --help'.", other);
            std::process::exit(2);
        }
        None => {
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            cli::run_shell(&mut logic, &mut stdin.lock(), &mut stdout.lock())?;
        }
    }
    Ok(())
}
