//! Command dispatch for the top-level CLI

use std::fs;
use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::cli::session::{Reply, Session};
use crate::config::{global_config_dir, global_config_path, Settings};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

/// Execute a CLI command.
pub fn execute_command(cli: &Cli, container: &ServiceContainer) -> CliResult<()> {
    if !container.settings.shell.color {
        output::disable_color();
    }
    match &cli.command {
        None | Some(Commands::Shell) => _shell(container),
        Some(Commands::Run { script }) => _run(container, script),
        Some(Commands::Config { command }) => _config(command, container, cli),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            generate(*shell, &mut cmd, "coursetree", &mut io::stdout());
            Ok(())
        }
    }
}

/// Print a reply. Returns false when the session should end.
pub fn print_reply(reply: &Reply) -> bool {
    match reply {
        Reply::Done(msg) => output::success(msg),
        Reply::Unchanged(msg) => output::unchanged(msg),
        Reply::Text(text) => output::info(text.trim_end()),
        Reply::Silent => {}
        Reply::Quit => return false,
    }
    true
}

/// Interactive loop: errors are printed and the loop goes on.
/// End of input quits.
///
/// `read_line` appends one line to the buffer and returns the bytes read;
/// stdin is not held between lines so prompts can read from it too.
pub fn run_interactive<F>(session: &mut Session, prompt: &str, mut read_line: F) -> CliResult<()>
where
    F: FnMut(&mut String) -> io::Result<usize>,
{
    let mut line = String::new();
    loop {
        output::prompt(prompt);
        line.clear();
        let read = read_line(&mut line).map_err(|e| InfraError::io("read shell input", e))?;
        if read == 0 {
            println!();
            return Ok(());
        }
        match session.execute_line(&line) {
            Ok(reply) => {
                if !print_reply(&reply) {
                    return Ok(());
                }
            }
            Err(e) => output::error(&e),
        }
    }
}

/// Script mode: stops at the first failing line.
pub fn run_script(session: &mut Session, name: &str, script: &str) -> CliResult<()> {
    for (idx, line) in script.lines().enumerate() {
        let reply = session
            .execute_line(line)
            .map_err(|e| CliError::Script {
                path: name.to_string(),
                line: idx + 1,
                source: Box::new(e),
            })?;
        if !print_reply(&reply) {
            debug!("script quit at line {}", idx + 1);
            break;
        }
    }
    Ok(())
}

#[instrument(skip(container))]
fn _shell(container: &ServiceContainer) -> CliResult<()> {
    let mut session = Session::new(container);
    output::header("coursetree shell, 'help' lists commands, 'quit' leaves");
    run_interactive(&mut session, &container.settings.shell.prompt, |buf| {
        io::stdin().read_line(buf)
    })
}

#[instrument(skip(container))]
fn _run(container: &ServiceContainer, script: &Path) -> CliResult<()> {
    let text = fs::read_to_string(script)
        .map_err(|e| InfraError::io(format!("read script {}", script.display()), e))?;
    let mut session = Session::new(container);
    run_script(&mut session, &script.display().to_string(), &text)
}

#[instrument(skip(container, cli))]
fn _config(command: &ConfigCommands, container: &ServiceContainer, cli: &Cli) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&container.settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Init { force } => _config_init(*force),
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => {
                    let state = if path.exists() { "exists" } else { "not found" };
                    output::info(&format!("global:   {} ({})", path.display(), state));
                }
                None => output::warning("no config directory for this platform"),
            }
            if let Some(path) = &cli.config {
                output::info(&format!("explicit: {}", path.display()));
            }
            Ok(())
        }
    }
}

fn _config_init(force: bool) -> CliResult<()> {
    let (Some(dir), Some(path)) = (global_config_dir(), global_config_path()) else {
        return Err(CliError::Usage(
            "no config directory for this platform".into(),
        ));
    };
    if path.exists() && !force {
        return Err(CliError::Usage(format!(
            "config already exists: {} (use --force to overwrite)",
            path.display()
        )));
    }
    fs::create_dir_all(&dir)
        .map_err(|e| InfraError::io(format!("create {}", dir.display()), e))?;
    fs::write(&path, Settings::template())
        .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
    output::action("Created", &path.display());
    Ok(())
}
