mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use tracing::{info, warn};

use space_insiders::scores::{self, JsonScoreStore, ScoreEntry, ScoreStore};
use space_insiders::{GameConfig, GameEvent, PlayerInput, World};

const FRAME: Duration = Duration::from_millis(16); // ≈60 FPS

/// Longest frame the simulation will catch up on; anything slower (a
/// suspended terminal, a debugger) is treated as this long.
const MAX_FRAME_DELTA: f32 = 0.25;

// ── Held-key detection ────────────────────────────────────────────────────────

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames. Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so 8 frames (≈133 ms) is always
/// refreshed before expiry.
const HOLD_WINDOW: u64 = 8;

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .is_some_and(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
}

fn any_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|key| is_held(key_frame, key, frame))
}

// ── Command line ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "space_insiders", about = "Terminal Space Invaders", version)]
struct Args {
    /// JSON game config; the built-in tuning is used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for the first round. Restarts use the following seeds.
    #[arg(long)]
    seed: Option<u64>,

    /// Score file, `~/.space_insiders_scores.json` by default.
    #[arg(long)]
    scores: Option<PathBuf>,

    /// Name recorded on the scoreboard.
    #[arg(long, default_value = "player")]
    name: String,

    /// Write logs here. Nothing is logged without it since the terminal is
    /// taken over by the game.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_tracing(log_file: Option<&PathBuf>) -> anyhow::Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
    Ok(())
}

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    Start,
    Quit,
}

fn show_menu<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    scores: &[ScoreEntry],
) -> std::io::Result<MenuResult> {
    display::render_menu(out, scores)?;

    // Block until the user makes a choice
    loop {
        match rx.recv() {
            Ok(Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            })) => match code {
                KeyCode::Enter | KeyCode::Char(' ') => return Ok(MenuResult::Start),
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                    return Ok(MenuResult::Quit);
                }
                _ => {}
            },
            Ok(Event::Resize(..)) => display::render_menu(out, scores)?,
            Ok(_) => {}
            Err(_) => return Ok(MenuResult::Quit),
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

enum RoundEnd {
    Restart,
    Quit,
}

/// Plays one round until the player quits or restarts.
///
/// Key state is tracked per frame in `key_frame` (see [`is_held`]) so moving
/// and shooting can be held together. Physics runs at the config's fixed
/// step from an accumulator; everything else runs once per frame.
fn game_loop<W: Write>(
    out: &mut W,
    world: &mut World,
    rx: &mpsc::Receiver<Event>,
    store: &mut JsonScoreStore,
    name: &str,
) -> anyhow::Result<RoundEnd> {
    let step = world.config().fixed_time_step;
    let mut board = scores::load_or_empty(store);

    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;
    let mut accumulator = 0.0_f32;
    let mut last = Instant::now();

    loop {
        let frame_start = Instant::now();
        frame += 1;
        let mut pause = false;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(event) = rx.try_recv() {
            let Event::Key(KeyEvent {
                code,
                kind,
                modifiers,
                ..
            }) = event
            else {
                continue;
            };
            match kind {
                KeyEventKind::Press => {
                    key_frame.insert(code, frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                            return Ok(RoundEnd::Quit);
                        }
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(RoundEnd::Quit);
                        }
                        KeyCode::Char('r') | KeyCode::Char('R') if world.is_over() => {
                            return Ok(RoundEnd::Restart);
                        }
                        KeyCode::Char('p') | KeyCode::Char('P') => pause = true,
                        _ => {}
                    }
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code, frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        let left = any_held(
            &key_frame,
            &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')],
            frame,
        );
        let right = any_held(
            &key_frame,
            &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')],
            frame,
        );
        let input = PlayerInput {
            axis: f32::from(u8::from(right)) - f32::from(u8::from(left)),
            shoot: is_held(&key_frame, &KeyCode::Char(' '), frame),
            pause,
        };

        let now = Instant::now();
        let delta = now.duration_since(last).as_secs_f32().min(MAX_FRAME_DELTA);
        last = now;

        world.tick(delta, &input);
        accumulator += delta;
        while accumulator >= step {
            world.fixed_tick(step);
            accumulator -= step;
        }

        for event in world.drain_events() {
            if let GameEvent::GameOver { score, level } = event {
                info!(score, level, name, "round finished");
                if let Err(e) = store.save_score(name, score) {
                    warn!(error = %e, path = %store.path().display(), "could not save score");
                }
                board = scores::load_or_empty(store);
            }
        }

        display::render(out, world, &board)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_file.as_ref())?;

    let config = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => GameConfig::default(),
    };
    config.validate().context("invalid game config")?;
    let mut store = JsonScoreStore::new(
        args.scores
            .clone()
            .unwrap_or_else(JsonScoreStore::default_path),
    );

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let result = run(&mut out, &rx, config, &mut store, &args);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: GameConfig,
    store: &mut JsonScoreStore,
    args: &Args,
) -> anyhow::Result<()> {
    if let MenuResult::Quit = show_menu(out, rx, &scores::load_or_empty(store))? {
        return Ok(());
    }

    let first_seed = args.seed.unwrap_or_else(rand::random);
    for round in 0_u64.. {
        let seed = first_seed.wrapping_add(round);
        let mut world = World::new(config.clone(), seed).context("failed to start round")?;
        info!(seed, round, "round started");

        let end = game_loop(out, &mut world, rx, store, &args.name)?;
        world.dispose();
        if let RoundEnd::Quit = end {
            break;
        }
    }
    Ok(())
}
