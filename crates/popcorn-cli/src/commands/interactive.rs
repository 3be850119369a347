use super::Session;
use crate::output::Output;
use crate::render;
use crate::spinner::is_interactive;
use crate::title::TerminalTitle;
use color_eyre::Result;
use popcorn_core::{App, DetailState, SearchState};
use popcorn_models::{SearchResult, WatchedEntry};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

const HELP: &str = "\
Type a title to search (an empty line clears the search).
  :open <n|id>   open result n or an IMDb id (again to close)
  :rate <1-10>   rate the open movie
  :add           add the open movie to the watched list
  :back          close the open movie
  :watched       show the watched list
  :summary       show watched averages
  :rm <n|id>     remove a watched movie
  :help          show this help
  :quit          leave";

#[derive(Debug, PartialEq)]
enum Command {
    Query(String),
    Open(String),
    Rate(String),
    Add,
    Back,
    Watched,
    Summary,
    Remove(String),
    Help,
    Quit,
    Unknown(String),
}

fn parse_command(line: &str) -> Command {
    let Some(command) = line.trim().strip_prefix(':') else {
        return Command::Query(line.to_string());
    };

    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim().to_string()),
        None => (command, String::new()),
    };

    match name {
        "open" | "o" if !arg.is_empty() => Command::Open(arg),
        "rate" | "r" if !arg.is_empty() => Command::Rate(arg),
        "add" | "a" => Command::Add,
        "back" | "esc" | "b" => Command::Back,
        "watched" | "w" => Command::Watched,
        "summary" | "s" => Command::Summary,
        "rm" | "remove" if !arg.is_empty() => Command::Remove(arg),
        "help" | "h" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        _ => Command::Unknown(command.to_string()),
    }
}

/// A 1-based position in the shown results, otherwise the argument itself as an id
fn resolve_result(arg: &str, results: &[SearchResult]) -> String {
    arg.parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|index| results.get(index))
        .map(|r| r.id.clone())
        .unwrap_or_else(|| arg.to_string())
}

fn resolve_watched(arg: &str, entries: &[WatchedEntry]) -> String {
    arg.parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|index| entries.get(index))
        .map(|e| e.id.clone())
        .unwrap_or_else(|| arg.to_string())
}

pub async fn run_interactive(session: &Session, output: &Output) -> Result<()> {
    let mut app = session.open_app().await?;
    if output.is_human() && is_interactive() {
        app.add_observer(Arc::new(TerminalTitle::new()));
    }

    let mut search_rx = app.search().subscribe();
    let mut detail_rx = app.detail().subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    output.info(HELP);
    render::summary(output, &app.summary());

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("Input closed");
                    break;
                };
                if !handle_line(&mut app, &line, output).await {
                    break;
                }
            }
            Ok(()) = search_rx.changed() => {
                let state = search_rx.borrow_and_update().clone();
                show_search(output, &state);
            }
            Ok(()) = detail_rx.changed() => {
                let state = detail_rx.borrow_and_update().clone();
                show_detail(output, &state, app.watched_rating());
            }
        }
    }

    app.close();
    Ok(())
}

/// Returns `false` when the session should end
async fn handle_line(app: &mut App, line: &str, output: &Output) -> bool {
    match parse_command(line) {
        Command::Query(query) => {
            if app.set_query(&query).is_none() {
                debug!(query = query.as_str(), "Search cleared");
            }
        }
        Command::Open(arg) => {
            let id = resolve_result(&arg, &app.search().state().results);
            if app.select(&id).is_none() {
                output.info("Closed");
            }
        }
        Command::Rate(arg) => match arg.parse::<u8>() {
            Ok(rating) => match app.rate(rating) {
                Ok(revisions) => output.info(format!("Your rating: {} 🌟 ({} changes)", rating, revisions)),
                Err(e) => output.error(e.to_string()),
            },
            Err(_) => output.error(format!("'{}' is not a rating from 1 to 10", arg)),
        },
        Command::Add => match app.add_watched().await {
            Ok(entry) => {
                output.success(format!("Added {} with rating {}", entry.title, entry.user_rating));
                render::summary(output, &app.summary());
            }
            Err(e) => output.error(e.to_string()),
        },
        Command::Back => app.close(),
        Command::Watched => render::watched(output, app.watched(), &app.summary()),
        Command::Summary => render::summary(output, &app.summary()),
        Command::Remove(arg) => {
            let id = resolve_watched(&arg, app.watched());
            match app.remove_watched(&id).await {
                Ok(true) => {
                    output.success(format!("Removed {}", id));
                    render::summary(output, &app.summary());
                }
                Ok(false) => output.warn(format!("{} is not in the watched list", id)),
                Err(e) => output.error(e.to_string()),
            }
        }
        Command::Help => output.info(HELP),
        Command::Quit => return false,
        Command::Unknown(command) => output.warn(format!("Unknown command ':{}' (try :help)", command)),
    }
    true
}

fn show_search(output: &Output, state: &SearchState) {
    if state.loading {
        output.info(format!("Searching \"{}\"...", state.query.trim()));
    } else if let Some(error) = &state.error {
        output.error(error);
    } else if !state.results.is_empty() {
        render::results(output, &state.results);
    }
}

fn show_detail(output: &Output, state: &DetailState, watched_rating: Option<u8>) {
    if state.loading {
        output.info("Loading...");
        return;
    }

    let loaded = state.id.as_deref().and_then(|id| state.detail_for(id));
    match (loaded, &state.error) {
        (Some(detail), _) => {
            render::detail(output, detail, watched_rating);
            if watched_rating.is_none() {
                output.info("Rate it with :rate <1-10>, then :add");
            }
        }
        (None, Some(error)) => output.error(error),
        (None, None) => {}
    }
}
