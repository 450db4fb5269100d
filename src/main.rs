use anyhow::Result;
use crossterm::style::Stylize;
use lung_cli::config::Config;
use lung_cli::session::{print_data_files, resolve_data_file, Session};
use lung_cli::ui::prompts::{prompt_text, LineSource, PromptInput, ReedlineSource, ScriptedLines};
use lung_cli::utils::app_paths::AppPaths;
use lung_cli::utils::logging::init_tracing;
use std::io::IsTerminal;
use std::path::PathBuf;

fn print_help() {
    println!("{}", "Lung CLI - lung cancer dataset explorer".blue().bold());
    println!();
    println!("{}", "Usage:".yellow());
    println!("  lung-cli [OPTIONS] [FILE.csv]");
    println!();
    println!("{}", "Options:".yellow());
    println!(
        "  {} - Directory listed when no file is given",
        "--data-dir <DIR>".green()
    );
    println!(
        "  {}  - Generate config file with defaults",
        "--generate-config".green()
    );
    println!("  {}            - Show this help", "--help".green());
    println!();
    println!("{}", "At any prompt:".yellow());
    println!("  {}  - Quit (returns to the menu from a question)", "q / quit".green());
    println!("  {} - Exit", "Ctrl+D".green());
    println!();
}

fn generate_config() -> Result<PathBuf> {
    let path = Config::get_config_path()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, Config::create_default_with_comments())?;
    Ok(path)
}

/// Ask for a file from the data directory until one loads
fn pick_file(config: &Config, source: &mut dyn LineSource) -> Result<Option<Session>> {
    loop {
        if let Err(e) = print_data_files(config) {
            eprintln!("{}", e.to_string().red());
        }

        let selection = match prompt_text(source, "CSV file name or number")? {
            PromptInput::Value(selection) => selection,
            PromptInput::Quit => return Ok(None),
        };

        match Session::open(resolve_data_file(config, &selection), config.clone()) {
            Ok(session) => return Ok(Some(session)),
            Err(e) => eprintln!("{}", e.to_string().red()),
        }
    }
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    if args.iter().any(|a| a == "--generate-config") {
        match generate_config() {
            Ok(path) => {
                println!("Configuration file created at: {:?}", path);
                println!("Edit this file to customize lung-cli.");
                return Ok(());
            }
            Err(e) => {
                eprintln!("Error writing config file: {}", e);
                std::process::exit(1);
            }
        }
    }

    let mut config = Config::load().unwrap_or_else(|e| {
        eprintln!(
            "{}",
            format!("Could not load config ({}), using defaults", e).yellow()
        );
        Config::default()
    });

    if let Some(dir) = args
        .iter()
        .position(|a| a == "--data-dir")
        .and_then(|pos| args.get(pos + 1))
    {
        config.data.data_dir = PathBuf::from(dir);
    }

    if !config.display.use_color {
        crossterm::style::force_color_output(false);
    }

    let log_dir = AppPaths::log_dir().ok();
    match init_tracing(
        &config.logging.level,
        config.logging.buffer_size,
        log_dir.as_deref(),
    ) {
        Ok(Some(log_path)) => eprintln!("Logs will be written to: {}", log_path.display()),
        Ok(None) => {}
        Err(e) => eprintln!("{}", format!("Logging disabled: {}", e).yellow()),
    }

    let mut source: Box<dyn LineSource> = if std::io::stdin().is_terminal() {
        Box::new(ReedlineSource::new(AppPaths::history_file().ok())?)
    } else {
        Box::new(ScriptedLines::from_reader(std::io::stdin().lock())?)
    };

    let data_file = args
        .iter()
        .enumerate()
        .filter(|(i, a)| !a.starts_with("--") && (*i == 0 || args[i - 1] != "--data-dir"))
        .map(|(_, a)| PathBuf::from(a))
        .next()
        .or_else(|| {
            config
                .data
                .default_file
                .as_deref()
                .map(|name| resolve_data_file(&config, name))
        });

    let session = match data_file {
        Some(path) => match Session::open(&path, config.clone()) {
            Ok(session) => Some(session),
            Err(e) => {
                eprintln!("{}", e.to_string().red());
                std::process::exit(1);
            }
        },
        None => pick_file(&config, source.as_mut())?,
    };

    match session {
        Some(mut session) => session.run(source.as_mut()),
        None => {
            println!("\nGoodbye!");
            Ok(())
        }
    }
}
