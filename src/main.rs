use std::io::{self, Stdout};
use std::process::ExitCode;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use log::{error, info};

use maze_ball::logging::init_logging;
use maze_ball::physics::RapierWorld;
use maze_ball::render::Renderer;
use maze_ball::{Config, MazeSession, Result};

fn main() -> ExitCode {
    if let Err(err) = init_logging() {
        eprintln!("could not open log file: {err}");
        return ExitCode::FAILURE;
    }

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };
    info!("starting with {config:?}");

    let session = match MazeSession::new(&config, RapierWorld::new()) {
        Ok(session) => session,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let mut stdout = io::stdout();
    let result = with_terminal(&mut stdout, |stdout| run(stdout, session, &config));
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn with_terminal(
    stdout: &mut Stdout,
    body: impl FnOnce(&mut Stdout) -> Result<()>,
) -> Result<()> {
    terminal::enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(Hide)?;

    let result = body(stdout);

    stdout.execute(Show)?;
    stdout.execute(LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result
}

fn run(stdout: &mut Stdout, mut session: MazeSession<RapierWorld>, config: &Config) -> Result<()> {
    let tick = Duration::from_millis(config.tick_ms);
    let frame_time = Duration::from_micros(1_000_000 / config.render_fps.max(1));
    let mut renderer = Renderer::new();
    let mut last_tick = Instant::now();

    loop {
        let frame_start = Instant::now();
        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key) = event::read()? {
                match key.kind {
                    KeyEventKind::Press | KeyEventKind::Repeat => match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                        code => {
                            session.key_down(code)?;
                        }
                    },
                    _ => {}
                }
            }
        }

        if last_tick.elapsed() >= tick {
            last_tick = Instant::now();
            session.tick()?;
        }
        renderer.render(stdout, &session)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}
