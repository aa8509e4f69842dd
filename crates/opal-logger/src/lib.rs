use crossterm::{ExecutableCommand, cursor, terminal};
use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// The stage of the install pipeline a package is currently in. Each stage
/// gets its own verb in the ticker line.
#[derive(Debug, Clone, Copy)]
pub enum Phase {
    Resolving,
    Downloading,
    Linking,
    Validating,
}

impl Phase {
    fn verb(self) -> &'static str {
        match self {
            Self::Resolving => "resolving",
            Self::Downloading => "downloading",
            Self::Linking => "linking",
            Self::Validating => "validating",
        }
    }
}

/// Terminal reporter for the manager. Pipeline steps render as a single
/// in-place ticker line; anything with lasting value gets its own line.
pub struct Logger {
    started: Instant,
    quiet: bool,
    ticker_active: AtomicBool,
}

impl Logger {
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self {
            started: Instant::now(),
            quiet,
            ticker_active: AtomicBool::new(false),
        }
    }

    /// Wipe the ticker line, if one is showing, so a durable line can take
    /// its place.
    fn clear_ticker(&self) {
        if !self.ticker_active.swap(false, Ordering::Relaxed) {
            return;
        }

        let mut stdout = io::stdout();
        let _ = stdout.execute(cursor::MoveToColumn(0));
        let _ = stdout.execute(terminal::Clear(terminal::ClearType::CurrentLine));
        let _ = stdout.flush();
    }

    fn emit(&self, prefix: String, body: String, even_when_quiet: bool) {
        if self.quiet && !even_when_quiet {
            return;
        }
        self.clear_ticker();
        println!("{prefix} {body}");
    }

    /// Overwrite the ticker with the current pipeline step, e.g.
    /// `downloading module-b@1.5.0 [3/7]`. A zero total drops the counter.
    pub fn step(&self, phase: Phase, subject: &str, done: usize, total: usize) {
        if self.quiet {
            return;
        }
        self.clear_ticker();

        let counter = if total > 0 {
            format!(" [{done}/{total}]")
        } else {
            String::new()
        };
        print!(
            "{} {}{}",
            phase.verb().cyan().bold(),
            subject,
            counter.bright_black()
        );
        let _ = io::stdout().flush();
        self.ticker_active.store(true, Ordering::Relaxed);
    }

    pub fn info(&self, message: &str) {
        self.emit("opal".cyan().bold().to_string(), message.to_string(), false);
    }

    pub fn success(&self, message: &str) {
        self.emit(
            "✓".green().bold().to_string(),
            message.green().to_string(),
            false,
        );
    }

    pub fn warn(&self, message: &str) {
        self.emit(
            "⚠".yellow().bold().to_string(),
            message.yellow().to_string(),
            false,
        );
    }

    /// Errors always print, quiet or not.
    pub fn error(&self, message: &str) {
        self.emit(
            "✗".red().bold().to_string(),
            message.red().to_string(),
            true,
        );
    }

    /// Close out a run with its wall-clock time.
    pub fn finish(&self, summary: &str) {
        let elapsed = self.started.elapsed();
        let timing = if elapsed.as_millis() < 1000 {
            format!("({}ms)", elapsed.as_millis())
        } else {
            format!("({:.2}s)", elapsed.as_secs_f64())
        };
        self.emit(
            "✓".green().bold().to_string(),
            format!("{} {}", summary.green(), timing.bright_black()),
            false,
        );
    }
}

static LOGGER: OnceLock<Logger> = OnceLock::new();

pub fn init(quiet: bool) {
    let _ = LOGGER.set(Logger::new(quiet));
}

fn logger() -> &'static Logger {
    // Library consumers and tests that never call init() get a default
    // non-quiet logger.
    LOGGER.get_or_init(|| Logger::new(false))
}

pub fn step(phase: Phase, subject: &str, done: usize, total: usize) {
    logger().step(phase, subject, done, total);
}

pub fn info(message: &str) {
    logger().info(message);
}

pub fn success(message: &str) {
    logger().success(message);
}

pub fn warn(message: &str) {
    logger().warn(message);
}

pub fn error(message: &str) {
    logger().error(message);
}

pub fn finish(summary: &str) {
    logger().finish(summary);
}
