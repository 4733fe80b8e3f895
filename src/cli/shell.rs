use std::{
    borrow::Cow,
    io::{self, BufRead},
};

use dialoguer::{theme::ColorfulTheme, Confirm};
use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::{ValidationContext, ValidationResult, Validator},
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};
use shell_words::split;

use crate::cli::commands::{self, CommandError, LoopControl, COMMANDS};
use crate::cli::output;
use crate::cli::state::{CliMode, CliState};
use crate::core::services::ServiceError;
use crate::core::BookManager;
use crate::errors::StoreError;
use crate::pairing::LocalPairing;
use crate::parser::HeuristicParser;
use crate::storage::JsonStore;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("readline error: {0}")]
    Readline(#[from] ReadlineError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// Entry point for the binary. Script mode is selected by setting the
/// `DUET_CORE_CLI_SCRIPT` environment variable.
pub fn run_cli() -> Result<(), CliError> {
    crate::init();

    let mode = if std::env::var_os("DUET_CORE_CLI_SCRIPT").is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let store = JsonStore::new_default()?;
    tracing::debug!(path = %store.root().display(), "storage root ready");
    let manager = BookManager::load(Box::new(store))?;
    let mut state = CliState::new(
        mode,
        manager,
        Box::new(HeuristicParser::new()),
        Box::new(LocalPairing::new()),
    );

    match mode {
        CliMode::Interactive => run_interactive(&mut state),
        CliMode::Script => run_script(&mut state),
    }
}

fn run_interactive(state: &mut CliState) -> Result<(), CliError> {
    let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
    editor.set_helper(Some(CommandHelper::new()));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);

    loop {
        if !state.running {
            break;
        }
        let prompt = state.prompt();
        match editor.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                editor.add_history_entry(trimmed).ok();
                match handle_line(state, trimmed) {
                    Ok(LoopControl::Continue) => {}
                    Ok(LoopControl::Exit) => break,
                    Err(err) => output::error(err),
                }
            }
            Err(ReadlineError::Interrupted) => {
                if confirm_exit()? {
                    break;
                }
            }
            Err(ReadlineError::Eof) => {
                output::info("Exiting shell.");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}

fn run_script(state: &mut CliState) -> Result<(), CliError> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        if !state.running {
            break;
        }
        let line = line?;
        match handle_line(state, &line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => output::error(err),
        }
    }
    Ok(())
}

fn handle_line(state: &mut CliState, line: &str) -> Result<LoopControl, CommandError> {
    let tokens = match split(line) {
        Ok(tokens) => tokens,
        Err(err) => {
            output::warning(err);
            return Ok(LoopControl::Continue);
        }
    };
    if tokens.is_empty() {
        return Ok(LoopControl::Continue);
    }

    let command = tokens[0].to_lowercase();
    let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();

    match commands::dispatch(state, &command, &args) {
        Ok(LoopControl::Exit) => {
            state.running = false;
            Ok(LoopControl::Exit)
        }
        other => other,
    }
}

fn confirm_exit() -> Result<bool, CliError> {
    let confirmed = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("Exit the shell?")
        .default(false)
        .interact()
        .unwrap_or(true);
    Ok(confirmed)
}

struct CommandHelper {
    commands: Vec<String>,
}

impl CommandHelper {
    fn new() -> Self {
        let mut commands: Vec<String> = COMMANDS.iter().map(|name| name.to_string()).collect();
        commands.sort();
        commands.dedup();
        Self { commands }
    }
}

impl Helper for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    // Completes the command word only; arguments are free-form.
    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = &line[..pos];
        let start = prefix
            .rfind(char::is_whitespace)
            .map(|idx| idx + 1)
            .unwrap_or(0);

        let trimmed = prefix.trim_start();
        if let Some(space_idx) = trimmed.find(char::is_whitespace) {
            let leading = prefix.len().saturating_sub(trimmed.len());
            if pos > leading + space_idx {
                return Ok((start, Vec::new()));
            }
        }

        let needle = prefix[start..].to_ascii_lowercase();
        let candidates = self
            .commands
            .iter()
            .filter(|name| name.starts_with(&needle))
            .map(|name| Pair {
                display: name.clone(),
                replacement: name.clone(),
            })
            .collect();
        Ok((start, candidates))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;
}

impl Highlighter for CommandHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Cow::Borrowed(line)
    }
}

impl Validator for CommandHelper {
    fn validate(&self, ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        let _ = ctx;
        Ok(ValidationResult::Valid(None))
    }
}
