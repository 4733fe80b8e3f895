//! Command dispatch and handlers over [`CliState`].

use dialoguer::{theme::ColorfulTheme, Confirm};
use strsim::levenshtein;

use crate::cli::format::{
    day_label, grouped_amount, month_label, shorthand_amount, timestamp_label,
};
use crate::cli::output;
use crate::cli::state::{CliMode, CliState};
use crate::core::services::ServiceError;
use crate::domain::{UserId, Wish};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub(crate) type CommandResult = Result<LoopControl, CommandError>;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    Usage(String),
    #[error("unknown command `{name}`{hint}")]
    Unknown { name: String, hint: String },
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error("dialog error: {0}")]
    Dialog(#[from] dialoguer::Error),
}

pub(crate) const COMMANDS: &[&str] = &[
    "help", "status", "earn", "income", "history", "goal", "wish", "user", "profile", "pair",
    "unpair", "exit",
];

pub(crate) fn dispatch(state: &mut CliState, command: &str, args: &[&str]) -> CommandResult {
    match command {
        "help" => cmd_help(),
        "status" => cmd_status(state),
        "earn" => cmd_earn(state, args),
        "income" => cmd_income(state, args),
        "history" => cmd_history(state),
        "goal" => cmd_goal(state, args),
        "wish" => cmd_wish(state, args),
        "user" => cmd_user(state, args),
        "profile" => cmd_profile(state, args),
        "pair" => cmd_pair(state, args),
        "unpair" => cmd_unpair(state),
        "exit" | "quit" => Ok(LoopControl::Exit),
        other => Err(unknown_command(other)),
    }
}

fn unknown_command(name: &str) -> CommandError {
    let hint = COMMANDS
        .iter()
        .map(|candidate| (levenshtein(name, candidate), candidate))
        .filter(|(distance, _)| *distance <= 2)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, candidate)| format!(", did you mean `{candidate}`?"))
        .unwrap_or_default();
    CommandError::Unknown {
        name: name.to_string(),
        hint,
    }
}

fn cmd_help() -> CommandResult {
    output::section("Commands");
    println!("  earn <free text>                record income from a sentence");
    println!("  income [list]                   recent income records");
    println!("  income add <amount> <source> [category]");
    println!("  income remove <index>           delete a record from the list");
    println!("  history                         grouped month and day view");
    println!("  status                          totals, goal progress, pairing");
    println!("  goal [set <amount>]             show or change the yearly goal");
    println!("  wish [list]                     wishlist in display order");
    println!("  wish add <title> <target> [image_url]");
    println!("  wish fund <index> <amount>      put savings toward a wish");
    println!("  wish pin|unpin <index>          toggle pinned placement");
    println!("  wish move <index> <position>    reorder within the list");
    println!("  wish remove <index>             delete a wish (undo available)");
    println!("  wish undo                       restore the last deleted wish");
    println!("  user [husband|wife]             show or switch identity");
    println!("  profile [name <new>|avatar <url>]");
    println!("  pair create | pair join <code>  household pairing");
    println!("  unpair                          reset the pairing state");
    println!("  exit                            leave the shell");
    Ok(LoopControl::Continue)
}

fn cmd_status(state: &mut CliState) -> CommandResult {
    let manager = &state.manager;
    output::section("Household status");
    let profile = manager.profiles().get(state.current_user);
    output::info(format!(
        "Signed in as {} ({})",
        profile.name, state.current_user
    ));
    output::info(format!(
        "Total income: {} (goal {})",
        grouped_amount(manager.total_income()),
        shorthand_amount(manager.yearly_goal())
    ));
    match manager.goal_progress() {
        Ok(progress) => output::info(format!("Goal progress: {progress:.1}%")),
        Err(err) => output::warning(format!("Goal progress unavailable: {err}")),
    }
    output::info(format!(
        "Records: {}, wishes: {}",
        manager.records().len(),
        manager.wishes().len()
    ));
    match &manager.family().family_id {
        Some(family_id) => output::info(format!("Paired in family {family_id}")),
        None => output::info("Not paired yet. Use `pair create` or `pair join <code>`."),
    }
    Ok(LoopControl::Continue)
}

fn cmd_earn(state: &mut CliState, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return Err(CommandError::Usage(
            "usage: earn <free text describing the income>".into(),
        ));
    }
    let text = args.join(" ");
    match state.record_income_text(&text)? {
        Some(outcome) => {
            output::success(format!(
                "Recorded {} from \"{}\" ({})",
                grouped_amount(outcome.record.amount),
                outcome.record.source,
                outcome.record.category
            ));
            if outcome.celebrate {
                let name = &state.manager.profiles().get(outcome.record.user_id).name;
                output::success(format!("Big one! Nice work, {name}."));
            }
        }
        None => {
            output::warning(
                "Could not read an amount from that. Nothing was recorded; \
                 try `income add <amount> <source> [category]`.",
            );
        }
    }
    Ok(LoopControl::Continue)
}

fn cmd_income(state: &mut CliState, args: &[&str]) -> CommandResult {
    match args.first().copied() {
        None | Some("list") => income_list(state),
        Some("add") => income_add(state, &args[1..]),
        Some("remove") => income_remove(state, &args[1..]),
        Some(other) => Err(CommandError::Usage(format!(
            "unknown income subcommand `{other}`; expected list, add or remove"
        ))),
    }
}

fn income_list(state: &mut CliState) -> CommandResult {
    let records = recent_records(state);
    if records.is_empty() {
        output::info("No income recorded yet. Try `earn salary 15000`.");
        return Ok(LoopControl::Continue);
    }
    output::section("Recent income");
    for (idx, record) in records.iter().enumerate() {
        println!(
            "  {:>2}. {}  {:>10}  {} ({})",
            idx + 1,
            timestamp_label(&record.timestamp),
            grouped_amount(record.amount),
            record.source,
            record.category
        );
    }
    Ok(LoopControl::Continue)
}

fn income_add(state: &mut CliState, args: &[&str]) -> CommandResult {
    if args.len() < 2 {
        return Err(CommandError::Usage(
            "usage: income add <amount> <source> [category]".into(),
        ));
    }
    let amount = parse_amount(args[0])?;
    let source = args[1];
    let category = args.get(2).copied().unwrap_or("");
    let outcome = state
        .manager
        .record_income(amount, source, category, state.current_user)?;
    output::success(format!(
        "Recorded {} from \"{}\" ({})",
        grouped_amount(outcome.record.amount),
        outcome.record.source,
        outcome.record.category
    ));
    Ok(LoopControl::Continue)
}

fn income_remove(state: &mut CliState, args: &[&str]) -> CommandResult {
    let index = parse_index(args.first().copied(), "income remove <index>")?;
    let records = recent_records(state);
    let record = records
        .get(index - 1)
        .ok_or_else(|| CommandError::Usage(format!("no record at position {index}")))?
        .clone();
    if !confirm(
        state,
        &format!(
            "Delete {} from \"{}\"?",
            grouped_amount(record.amount),
            record.source
        ),
    )? {
        output::info("Kept the record.");
        return Ok(LoopControl::Continue);
    }
    state.manager.delete_record(record.id)?;
    output::success("Record deleted.");
    Ok(LoopControl::Continue)
}

fn cmd_history(state: &mut CliState) -> CommandResult {
    let months = state.manager.history();
    if months.is_empty() {
        output::info("No income recorded yet.");
        return Ok(LoopControl::Continue);
    }
    for month in months {
        output::section(format!(
            "{}  ({})",
            month_label(month.year, month.month),
            shorthand_amount(month.total)
        ));
        for day in &month.days {
            println!(
                "  {}  {}",
                day_label(month.year, month.month, day.day),
                grouped_amount(day.total)
            );
            for record in &day.records {
                println!(
                    "      {:>10}  {} ({})",
                    grouped_amount(record.amount),
                    record.source,
                    record.category
                );
            }
        }
    }
    Ok(LoopControl::Continue)
}

fn cmd_goal(state: &mut CliState, args: &[&str]) -> CommandResult {
    match args.first().copied() {
        None => {
            output::info(format!(
                "Yearly goal: {}",
                grouped_amount(state.manager.yearly_goal())
            ));
            Ok(LoopControl::Continue)
        }
        Some("set") => {
            let amount = parse_amount(args.get(1).copied().ok_or_else(|| {
                CommandError::Usage("usage: goal set <amount>".into())
            })?)?;
            state.manager.set_yearly_goal(amount)?;
            output::success(format!("Yearly goal set to {}.", grouped_amount(amount)));
            Ok(LoopControl::Continue)
        }
        Some(other) => Err(CommandError::Usage(format!(
            "unknown goal subcommand `{other}`; expected `set`"
        ))),
    }
}

fn cmd_wish(state: &mut CliState, args: &[&str]) -> CommandResult {
    match args.first().copied() {
        None | Some("list") => wish_list(state),
        Some("add") => wish_add(state, &args[1..]),
        Some("fund") => wish_fund(state, &args[1..]),
        Some("pin") => wish_set_pinned(state, &args[1..], true),
        Some("unpin") => wish_set_pinned(state, &args[1..], false),
        Some("move") => wish_move(state, &args[1..]),
        Some("remove") => wish_remove(state, &args[1..]),
        Some("undo") => wish_undo(state),
        Some(other) => Err(CommandError::Usage(format!(
            "unknown wish subcommand `{other}`"
        ))),
    }
}

fn wish_list(state: &mut CliState) -> CommandResult {
    let wishes = state.manager.ordered_wishes();
    if wishes.is_empty() {
        output::info("The wishlist is empty. Try `wish add \"New camera\" 9000`.");
        return Ok(LoopControl::Continue);
    }
    output::section("Wishlist");
    for (idx, wish) in wishes.iter().enumerate() {
        let pin = if wish.is_pinned { "*" } else { " " };
        println!(
            "  {:>2}. {pin} {:<24} {:>10} / {:<10} {:>5.1}%  [{}]",
            idx + 1,
            wish.title,
            grouped_amount(wish.current_saved_amount),
            grouped_amount(wish.target_amount),
            wish.progress_percent(),
            wish.status
        );
    }
    Ok(LoopControl::Continue)
}

fn wish_add(state: &mut CliState, args: &[&str]) -> CommandResult {
    if args.len() < 2 {
        return Err(CommandError::Usage(
            "usage: wish add <title> <target> [image_url]".into(),
        ));
    }
    let target = parse_amount(args[1])?;
    let image_url = args.get(2).copied();
    let wish = state
        .manager
        .add_wish(args[0], target, state.current_user, image_url)?;
    output::success(format!(
        "Added \"{}\" with a target of {}.",
        wish.title,
        grouped_amount(wish.target_amount)
    ));
    Ok(LoopControl::Continue)
}

fn wish_fund(state: &mut CliState, args: &[&str]) -> CommandResult {
    if args.len() < 2 {
        return Err(CommandError::Usage(
            "usage: wish fund <index> <amount>".into(),
        ));
    }
    let wish = wish_at(state, Some(args[0]), "wish fund <index> <amount>")?;
    let amount = parse_amount(args[1])?;
    let funded = state.manager.fund_wish(wish.id, amount)?;
    if funded.is_completed() {
        output::success(format!("\"{}\" is fully funded!", funded.title));
    } else {
        output::success(format!(
            "\"{}\" now at {} of {} ({:.1}%).",
            funded.title,
            grouped_amount(funded.current_saved_amount),
            grouped_amount(funded.target_amount),
            funded.progress_percent()
        ));
    }
    Ok(LoopControl::Continue)
}

fn wish_set_pinned(state: &mut CliState, args: &[&str], pinned: bool) -> CommandResult {
    let usage = if pinned {
        "wish pin <index>"
    } else {
        "wish unpin <index>"
    };
    let wish = wish_at(state, args.first().copied(), usage)?;
    let updated = state.manager.set_pinned(wish.id, pinned)?;
    let verb = if pinned { "Pinned" } else { "Unpinned" };
    output::success(format!("{verb} \"{}\".", updated.title));
    Ok(LoopControl::Continue)
}

fn wish_move(state: &mut CliState, args: &[&str]) -> CommandResult {
    if args.len() < 2 {
        return Err(CommandError::Usage(
            "usage: wish move <index> <position>".into(),
        ));
    }
    let wish = wish_at(state, Some(args[0]), "wish move <index> <position>")?;
    let position = parse_index(Some(args[1]), "wish move <index> <position>")?;
    state.manager.move_wish(wish.id, position - 1)?;
    output::success(format!("Moved \"{}\".", wish.title));
    Ok(LoopControl::Continue)
}

fn wish_remove(state: &mut CliState, args: &[&str]) -> CommandResult {
    let wish = wish_at(state, args.first().copied(), "wish remove <index>")?;
    if !confirm(state, &format!("Delete \"{}\"?", wish.title))? {
        output::info("Kept the wish.");
        return Ok(LoopControl::Continue);
    }
    let removed = state.manager.remove_wish(wish.id)?;
    output::success(format!(
        "Deleted \"{}\". Use `wish undo` to bring it back.",
        removed.title
    ));
    Ok(LoopControl::Continue)
}

fn wish_undo(state: &mut CliState) -> CommandResult {
    let restored = state.manager.undo_remove()?;
    output::success(format!("Restored \"{}\".", restored.title));
    Ok(LoopControl::Continue)
}

fn cmd_user(state: &mut CliState, args: &[&str]) -> CommandResult {
    match args.first().copied() {
        None => {
            let profile = state.manager.profiles().get(state.current_user);
            output::info(format!(
                "Current identity: {} ({})",
                profile.name, state.current_user
            ));
            Ok(LoopControl::Continue)
        }
        Some(raw) => {
            let user = UserId::parse(raw).ok_or_else(|| {
                CommandError::Usage(format!(
                    "unknown identity `{raw}`; expected husband or wife"
                ))
            })?;
            state.current_user = user;
            let profile = state.manager.profiles().get(user);
            output::success(format!("Switched to {} ({user}).", profile.name));
            Ok(LoopControl::Continue)
        }
    }
}

fn cmd_profile(state: &mut CliState, args: &[&str]) -> CommandResult {
    match args.first().copied() {
        None => {
            let profiles = state.manager.profiles();
            for id in [UserId::Husband, UserId::Wife] {
                let profile = profiles.get(id);
                let marker = if id == state.current_user { "*" } else { " " };
                println!("  {marker} {id}: {} ({})", profile.name, profile.avatar);
            }
            Ok(LoopControl::Continue)
        }
        Some("name") => {
            if args.len() < 2 {
                return Err(CommandError::Usage("usage: profile name <new name>".into()));
            }
            let name = args[1..].join(" ");
            state.manager.rename_profile(state.current_user, &name)?;
            output::success(format!("Renamed your profile to {name}."));
            Ok(LoopControl::Continue)
        }
        Some("avatar") => {
            let url = args
                .get(1)
                .copied()
                .ok_or_else(|| CommandError::Usage("usage: profile avatar <url>".into()))?;
            state.manager.set_avatar(state.current_user, url)?;
            output::success("Avatar updated.");
            Ok(LoopControl::Continue)
        }
        Some(other) => Err(CommandError::Usage(format!(
            "unknown profile subcommand `{other}`; expected name or avatar"
        ))),
    }
}

fn cmd_pair(state: &mut CliState, args: &[&str]) -> CommandResult {
    match args.first().copied() {
        Some("create") => {
            let invite = state.pair_create()?;
            output::success(format!(
                "Family {} created. Share code {} with your partner.",
                invite.family_id, invite.code
            ));
            Ok(LoopControl::Continue)
        }
        Some("join") => {
            let code = args
                .get(1)
                .copied()
                .ok_or_else(|| CommandError::Usage("usage: pair join <code>".into()))?;
            let family_id = state.pair_join(code)?;
            output::success(format!("Joined family {family_id}."));
            Ok(LoopControl::Continue)
        }
        _ => Err(CommandError::Usage(
            "usage: pair create | pair join <code>".into(),
        )),
    }
}

fn cmd_unpair(state: &mut CliState) -> CommandResult {
    if !state.manager.family().is_paired() {
        output::info("Not currently paired.");
        return Ok(LoopControl::Continue);
    }
    if !confirm(state, "Unpair this household?")? {
        output::info("Kept the pairing.");
        return Ok(LoopControl::Continue);
    }
    state.manager.unpair()?;
    output::success("Pairing reset.");
    Ok(LoopControl::Continue)
}

/// Records in the same newest-first order that `income list` displays, so
/// 1-based indexes line up between listing and removal.
fn recent_records(state: &CliState) -> Vec<crate::domain::IncomeRecord> {
    let mut records = state.manager.records().to_vec();
    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    records
}

fn wish_at(state: &CliState, arg: Option<&str>, usage: &str) -> Result<Wish, CommandError> {
    let index = parse_index(arg, usage)?;
    state
        .manager
        .ordered_wishes()
        .get(index - 1)
        .cloned()
        .ok_or_else(|| CommandError::Usage(format!("no wish at position {index}")))
}

fn parse_index(arg: Option<&str>, usage: &str) -> Result<usize, CommandError> {
    let raw = arg.ok_or_else(|| CommandError::Usage(format!("usage: {usage}")))?;
    match raw.parse::<usize>() {
        Ok(index) if index >= 1 => Ok(index),
        _ => Err(CommandError::Usage(format!(
            "`{raw}` is not a valid position; usage: {usage}"
        ))),
    }
}

fn parse_amount(raw: &str) -> Result<f64, CommandError> {
    raw.parse::<f64>()
        .map_err(|_| CommandError::Usage(format!("`{raw}` is not a valid amount")))
}

/// Destructive actions ask in interactive mode and proceed in script mode.
fn confirm(state: &CliState, prompt: &str) -> Result<bool, CommandError> {
    if state.mode == CliMode::Script {
        return Ok(true);
    }
    Ok(Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()?)
}
