use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute, queue, terminal,
};
use rand::{SeedableRng, rngs::StdRng};
use skyflap::{
    Args, Flow, Game, Tuning,
    audio::Audio,
    frame::FrameClock,
    game::field_for,
    input::{self, Action},
    overlay::Overlay,
    raster::PixelBuf,
    render,
    storage::{FileStore, MemoryStore, ScoreStore},
};
use std::fs::{self, OpenOptions};
use std::io::{Write, stdout};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{info, warn};

const LOG_FILE: &str = "skyflap.log";

fn data_dir(args: &Args) -> Option<PathBuf> {
    args.data_dir
        .clone()
        .or_else(|| FileStore::default_dir().ok())
}

/// Log to a file; the terminal is busy showing the game.
fn init_logging(dir: Option<&Path>, level: tracing::Level) {
    let Some(dir) = dir else {
        return;
    };
    let file = fs::create_dir_all(dir).and_then(|_| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join(LOG_FILE))
    });
    match file {
        Ok(file) => {
            let _ = tracing_subscriber::fmt()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_max_level(level)
                .try_init();
        }
        Err(e) => eprintln!("logging disabled: {e}"),
    }
}

fn open_store(dir: Option<&Path>) -> Box<dyn ScoreStore> {
    match dir {
        Some(dir) => {
            let store = FileStore::in_dir(dir);
            info!(path = %store.path().display(), "best score file");
            Box::new(store)
        }
        None => {
            warn!("no data directory, best score will not be kept");
            Box::new(MemoryStore::new())
        }
    }
}

fn setup_terminal(out: &mut impl Write) -> Result<()> {
    terminal::enable_raw_mode().context("enabling raw mode")?;
    execute!(
        out,
        terminal::EnterAlternateScreen,
        cursor::Hide,
        terminal::DisableLineWrap,
        EnableMouseCapture,
    )
    .context("preparing terminal")?;
    Ok(())
}

fn restore_terminal(out: &mut impl Write) -> Result<()> {
    execute!(
        out,
        DisableMouseCapture,
        terminal::LeaveAlternateScreen,
        cursor::Show,
        terminal::EnableLineWrap,
    )?;
    terminal::disable_raw_mode().context("disabling raw mode")
}

fn run(
    out: &mut impl Write,
    args: &Args,
    store: Box<dyn ScoreStore>,
    audio: Audio,
    rng: StdRng,
) -> Result<()> {
    let clock = FrameClock::new(args.fps);
    let (mut cols, mut rows) = terminal::size().context("reading terminal size")?;
    let mut buf = PixelBuf::for_terminal(cols, rows);
    let field = field_for(buf.width(), buf.height(), args.field_height);
    let mut game = Game::new(
        Tuning::default(),
        field,
        store,
        Box::new(audio),
        rng,
        clock.now_ms(),
    );
    let mut overlay = Overlay::compose(game.hud(), cols, rows);
    info!(cols, rows, fps = args.fps, "frame loop started");

    loop {
        let frame_start = Instant::now();

        // Input
        while event::poll(Duration::ZERO)? {
            let Some(action) = input::translate(&event::read()?) else {
                continue;
            };
            if let Action::Resize { cols: c, rows: r } = action {
                (cols, rows) = (c, r);
                buf.resize(c as usize, r as usize * 2);
                queue!(out, terminal::Clear(terminal::ClearType::All))?;
            }
            if game.handle(action, &overlay, clock.now_ms()) == Flow::Quit {
                info!(best = game.lifecycle().high_score(), "quitting");
                return Ok(());
            }
        }

        // Update
        game.tick(clock.now_ms());

        // Render
        render::draw(game.world(), &mut buf);
        buf.render(out)?;
        overlay = Overlay::compose(game.hud(), cols, rows);
        overlay.paint(out)?;
        out.flush()?;

        // Frame pacing
        std::thread::sleep(clock.remaining(frame_start));
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let dir = data_dir(&args);
    init_logging(dir.as_deref(), args.log_level);

    let store = open_store(dir.as_deref());
    let audio = Audio::open(args.mute);
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut out = stdout();
    setup_terminal(&mut out)?;
    let result = run(&mut out, &args, store, audio, rng);
    let restored = restore_terminal(&mut out);
    if let Err(e) = &result {
        warn!("frame loop failed: {e:#}");
    }
    result?;
    restored
}
