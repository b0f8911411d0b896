use std::io::{self, Write as _};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};
use sapper_core::*;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::mpsc;
use tracing_subscriber::filter::LevelFilter;

use crate::input::{Command, HELP};

mod input;
mod render;

/// Reveal every safe cell of the minefield without touching a mine.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Number of mines, asked for before each game when absent
    #[arg(short, long)]
    mines: Option<CellCount>,

    /// Load the board from a map file, a random board is used if it cannot be read
    #[arg(long, value_name = "PATH")]
    map: Option<PathBuf>,

    /// Write every randomly generated board to this map file
    #[arg(long, value_name = "PATH")]
    save_map: Option<PathBuf>,

    /// File keeping the best time
    #[arg(long, value_name = "PATH", default_value = "best_time.txt")]
    records: PathBuf,

    /// Keep the best time in memory only
    #[arg(long)]
    no_records: bool,

    /// Seed for random boards, incremented for every new game
    #[arg(long)]
    seed: Option<u64>,

    #[command(flatten)]
    verbose: Verbosity<WarnLevel>,
}

enum GameEnd {
    Finished,
    Quit,
}

/// Line-based terminal input.
struct Console {
    lines: Lines<BufReader<Stdin>>,
}

impl Console {
    fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    async fn next_line(&mut self) -> io::Result<Option<String>> {
        self.lines.next_line().await
    }

    async fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        print!("{prompt}");
        io::stdout().flush()?;
        self.next_line().await
    }
}

fn init_logging(verbose: &Verbosity<WarnLevel>) {
    let level = match verbose.log_level_filter() {
        log::LevelFilter::Off => LevelFilter::OFF,
        log::LevelFilter::Error => LevelFilter::ERROR,
        log::LevelFilter::Warn => LevelFilter::WARN,
        log::LevelFilter::Info => LevelFilter::INFO,
        log::LevelFilter::Debug => LevelFilter::DEBUG,
        log::LevelFilter::Trace => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

/// Keeps asking until a usable mine count is entered, `None` when input ends.
async fn ask_config(
    console: &mut Console,
    preset: Option<CellCount>,
) -> Result<Option<GameConfig>> {
    if let Some(mines) = preset {
        match GameConfig::classic(mines) {
            Ok(config) => return Ok(Some(config)),
            Err(err) => println!("{err}"),
        }
    }

    let max = GameConfig::max_mines(CLASSIC_SIZE);
    loop {
        let Some(line) = console.ask(&format!("Number of mines (1-{max}): ")).await? else {
            return Ok(None);
        };
        match input::parse_mine_count(&line, CLASSIC_SIZE) {
            Ok(config) => return Ok(Some(config)),
            Err(err) => println!("{err}"),
        }
    }
}

fn describe_source(game: &NewGame) -> String {
    match &game.source {
        BoardSource::File(path) => format!(
            "Board loaded from {} with {} mines.",
            path.display(),
            game.actual_mines
        ),
        BoardSource::Random { seed } => {
            format!("Random board with {} mines (seed {seed}).", game.actual_mines)
        }
    }
}

async fn play(console: &mut Console, game: NewGame) -> Result<GameEnd> {
    let mut session = game.session;
    let (tx, mut ticks) = mpsc::unbounded_channel();
    session.start_timer(tx);

    let mut mode = ClickMode::default();
    if let Some(best) = session.best_time() {
        println!("Best time so far: {best}s");
    }
    print!("{}{}", render::board(&session), render::status(&session, mode));
    io::stdout().flush()?;

    loop {
        tokio::select! {
            Some(tick) = ticks.recv() => {
                session.apply_tick(tick);
            }
            line = console.next_line() => {
                let Some(line) = line? else {
                    return Ok(GameEnd::Quit);
                };

                match input::parse_command(&line, session.size()) {
                    Ok(Command::Quit) => return Ok(GameEnd::Quit),
                    Ok(Command::ToggleMode) => {
                        mode = mode.toggled();
                        println!("Mode: {}", render::mode_label(mode));
                    }
                    Ok(Command::Show) => print!("{}", render::board(&session)),
                    Ok(Command::Help) => println!("{HELP}"),
                    Ok(Command::Click { mode: chosen, coords }) => {
                        match session.click(chosen.unwrap_or(mode), coords)? {
                            ClickResult::Reveal(result) => {
                                if !result.has_update() {
                                    println!("Nothing to reveal at {coords:?}");
                                }
                                print!("{}", render::board(&session));
                                if let Some(message) = render::ending(&result) {
                                    println!("{message}");
                                    return Ok(GameEnd::Finished);
                                }
                            }
                            ClickResult::Flag(result) => {
                                if !result.outcome.has_update() {
                                    println!("Cell {coords:?} is already revealed");
                                }
                                print!("{}", render::board(&session));
                            }
                        }
                    }
                    Err(err) => println!("{err}"),
                }
                print!("{}", render::status(&session, mode));
                io::stdout().flush()?;
            }
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.verbose);

    let records: Arc<dyn RecordStore> = if args.no_records {
        Arc::new(MemoryRecordStore::default())
    } else {
        Arc::new(FileRecordStore::new(&args.records))
    };

    let mut console = Console::new();
    for round in 0u64.. {
        let Some(config) = ask_config(&mut console, args.mines).await? else {
            break;
        };

        let options = GameOptions {
            config,
            map: args.map.clone(),
            seed: args.seed.map(|seed| seed.wrapping_add(round)),
        };
        let game = new_game(&options, records.clone());
        println!("{}", describe_source(&game));

        if let (Some(path), BoardSource::Random { .. }) = (&args.save_map, &game.source) {
            match write_map(game.session.board(), path) {
                Ok(()) => log::info!("Board saved to {}", path.display()),
                Err(err) => log::warn!("{err}"),
            }
        }

        match play(&mut console, game).await? {
            GameEnd::Quit => break,
            GameEnd::Finished => {
                let again = console.ask("Play again? [y/N] ").await?;
                if !again.as_deref().is_some_and(input::is_yes) {
                    break;
                }
            }
        }
    }

    Ok(())
}
