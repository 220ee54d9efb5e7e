/// Interactive shell
use crate::error::{CliError, Result};
use crate::state::{AppState, Feeds};
use beats_core::{KeyValueStore, Track};
use beats_playback::{format_time, ActiveListKind, Navigation, PlaybackState};
use beats_search_client::VideoSearchApi;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

const HELP: &str = "\
Commands:
  search <query>           search and list results
  suggest <text>           show query suggestions
  play <n>                 play track n of the current list
  pause                    toggle play/pause
  next | prev              navigate the active list
  stop                     stop playback
  like [n]                 toggle favorite (current track without n)
  add <n> <collection>     add track n to a collection
  remove <n> <collection>  remove track n from a collection
  create <name>            create a collection
  use <collection|search|related>
                           browse a list
  list                     show the browsed list
  collections              show collection names
  lyrics                   lyrics link for the current track
  status                   show playback status
  help                     show this help
  quit                     exit";

/// A parsed shell command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    Suggest(String),
    Play(usize),
    Pause,
    Next,
    Prev,
    Stop,
    Like(Option<usize>),
    Add(usize, String),
    Remove(usize, String),
    Create(String),
    Use(ActiveListKind),
    List,
    Collections,
    Lyrics,
    Status,
    Help,
    Quit,
}

impl Command {
    /// Parse one input line; `Ok(None)` for a blank line
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let command = match verb.to_lowercase().as_str() {
            "search" | "s" => Command::Search(required(rest, "search <query>")?.to_string()),
            "suggest" => Command::Suggest(required(rest, "suggest <text>")?.to_string()),
            "play" | "p" => Command::Play(position(rest)?),
            "pause" | "toggle" => Command::Pause,
            "next" | "n" => Command::Next,
            "prev" | "previous" => Command::Prev,
            "stop" => Command::Stop,
            "like" => Command::Like(if rest.is_empty() {
                None
            } else {
                Some(position(rest)?)
            }),
            "add" => {
                let (n, name) = position_and_name(rest, "add <n> <collection>")?;
                Command::Add(n, name)
            }
            "remove" | "rm" => {
                let (n, name) = position_and_name(rest, "remove <n> <collection>")?;
                Command::Remove(n, name)
            }
            "create" => Command::Create(required(rest, "create <name>")?.to_string()),
            "use" => Command::Use(match required(rest, "use <collection|search|related>")? {
                "search" => ActiveListKind::SearchResults,
                "related" => ActiveListKind::RelatedItems,
                name => ActiveListKind::Collection(name.to_string()),
            }),
            "list" | "ls" => Command::List,
            "collections" => Command::Collections,
            "lyrics" => Command::Lyrics,
            "status" => Command::Status,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => {
                return Err(CliError::InvalidCommand(format!(
                    "unknown command '{other}' (try 'help')"
                )))
            }
        };

        Ok(Some(command))
    }
}

fn required<'a>(rest: &'a str, usage: &str) -> Result<&'a str> {
    if rest.is_empty() {
        Err(CliError::InvalidCommand(format!("usage: {usage}")))
    } else {
        Ok(rest)
    }
}

fn position(raw: &str) -> Result<usize> {
    raw.parse()
        .map_err(|_| CliError::InvalidCommand(format!("expected a track number, got '{raw}'")))
}

fn position_and_name(rest: &str, usage: &str) -> Result<(usize, String)> {
    let (n, name) = required(rest, usage)?
        .split_once(char::is_whitespace)
        .ok_or_else(|| CliError::InvalidCommand(format!("usage: {usage}")))?;
    Ok((position(n)?, name.trim().to_string()))
}

/// Render a numbered track list
pub fn format_tracks(tracks: &[Track]) -> String {
    if tracks.is_empty() {
        return "  (empty)".to_string();
    }
    tracks
        .iter()
        .enumerate()
        .map(|(i, t)| format!("{:>3}. {}", i + 1, t.title()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn describe(navigation: &Navigation) -> String {
    match navigation {
        Navigation::Moved(track) => format!("Playing: {}", track.title()),
        Navigation::Continued(track) => format!("Playing (related): {}", track.title()),
        Navigation::Stayed => "No track to move to".to_string(),
    }
}

/// Execute one command; returns `false` when the shell should exit
pub async fn execute<A, S>(state: &mut AppState<A, S>, command: Command) -> Result<bool>
where
    A: VideoSearchApi + 'static,
    S: KeyValueStore,
{
    match command {
        Command::Search(query) => {
            let tracks = state.search(&query).await?;
            println!("{}", format_tracks(tracks));
        }
        Command::Suggest(text) => {
            for suggestion in state.suggest(&text).await {
                println!("  {suggestion}");
            }
        }
        Command::Play(n) => {
            let track = state.play(n)?;
            println!("Playing: {}", track.title());
        }
        Command::Pause => {
            let playing = state.toggle_pause()?;
            println!("{}", if playing { "Resumed" } else { "Paused" });
        }
        Command::Next => println!("{}", describe(&state.next())),
        Command::Prev => println!("{}", describe(&state.prev())),
        Command::Stop => {
            state.stop();
            println!("Stopped");
        }
        Command::Like(position) => {
            let liked = match position {
                Some(n) => state.like(n)?,
                None => state.like_current()?,
            };
            println!("{}", if liked { "Added to favorites" } else { "Removed from favorites" });
        }
        Command::Add(n, name) => {
            let added = state.add(n, &name)?;
            println!("{}", if added { "Added" } else { "Already in collection" });
        }
        Command::Remove(n, name) => {
            let removed = state.remove(n, &name)?;
            println!("{}", if removed { "Removed" } else { "Not in collection" });
        }
        Command::Create(name) => {
            state.create(&name)?;
            println!("Created '{name}'");
        }
        Command::Use(list) => {
            state.browse(list)?;
            println!("Browsing {}", state.browsing());
            println!("{}", format_tracks(state.browsing_tracks()));
        }
        Command::List => {
            println!("{}:", state.browsing());
            println!("{}", format_tracks(state.browsing_tracks()));
        }
        Command::Collections => {
            for name in state.collection_names() {
                println!("  {name}");
            }
        }
        Command::Lyrics => println!("{}", state.lyrics_url()?),
        Command::Status => print_status(state),
        Command::Help => println!("{HELP}"),
        Command::Quit => return Ok(false),
    }
    Ok(true)
}

fn print_status<A: VideoSearchApi + 'static, S: KeyValueStore>(state: &AppState<A, S>) {
    let status = state.status();
    match &status.current_track {
        None => println!("Idle"),
        Some(track) => {
            let label = match status.state {
                PlaybackState::Loading => "Loading",
                PlaybackState::Playing => "Playing",
                PlaybackState::Paused | PlaybackState::Idle => "Paused",
            };
            let favorite = if state.store().is_favorite(track.id()) { " ♥" } else { "" };
            println!("{label}: {}{favorite}", track.title());
            println!(
                "  {} / {}  from {}",
                format_time(status.played_fraction * status.duration_seconds),
                format_time(status.duration_seconds),
                status.active_list
            );
            println!("  related items: {}", state.related().tracks().len());
        }
    }
}

/// Run the interactive loop until `quit` or end of input
pub async fn run<A, S>(
    state: &mut AppState<A, S>,
    mut feeds: Feeds,
) -> Result<()>
where
    A: VideoSearchApi + 'static,
    S: KeyValueStore,
{
    println!("Beats shell - type 'help' for commands");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match Command::parse(&line) {
                    Ok(None) => {}
                    Ok(Some(command)) => match execute(state, command).await {
                        Ok(true) => {}
                        Ok(false) => break,
                        Err(e) => println!("Error: {e}"),
                    },
                    Err(e) => println!("{e}"),
                }
            }
            Some(response) = feeds.related.recv() => {
                let outcome = state.apply_related(response);
                debug!(?outcome, "Related items response");
            }
            Some(ticket) = feeds.recovery.recv() => {
                let resumed = state.recovery_due(ticket);
                debug!(resumed, "Recovery ticket due");
            }
        }
    }

    if state.controller().current_track().is_some() {
        state.stop();
    }
    debug!("Shell closed");
    Ok(())
}
