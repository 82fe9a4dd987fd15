#![forbid(unsafe_code)]

//! Command-line argument parsing for the noise demo.
//!
//! Parses args manually to keep the binary lean. Field settings start from
//! the library's `PERLIN_FIELD_*` / `PERLIN_TILE_SIZE` /
//! `PERLIN_ROTATION_PERIOD_MS` variables; driver settings use the
//! `PERLIN_DEMO_*` prefix. Explicit flags override both.

use std::env;
use std::fmt;
use std::process;
use std::str::FromStr;

use perlin_field::{ConfigError, FieldConfig};

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
perlin-demo: animated Perlin gradient noise

USAGE:
    perlin-demo [OPTIONS]

OPTIONS:
    --field=WxH          Gradient grid size in cells (default: 16x10)
    --tile=N             Tile edge length in pixels (default: 64)
    --period-ms=F        Milliseconds per full gradient revolution (default: 3000)
    --seed=N             Seed the gradient grid (default: random)
    --tick-ms=N          Frame cadence in milliseconds (default: 16)
    --frames=N           Stop after N frames, 0 = run until interrupted (default: 0)
    --surface=KIND       Presentation: 'ansi' or 'null' (default: ansi)
    --cols=N             ANSI surface width in cells (default: 80)
    --rows=N             ANSI surface height in cells (default: 24)
    --help, -h           Show this help message
    --version, -V        Show version

ENVIRONMENT VARIABLES:
    PERLIN_FIELD_WIDTH         Gradient grid width in cells
    PERLIN_FIELD_HEIGHT        Gradient grid height in cells
    PERLIN_TILE_SIZE           Tile edge length in pixels
    PERLIN_ROTATION_PERIOD_MS  Milliseconds per full revolution
    PERLIN_DEMO_SEED           Override --seed
    PERLIN_DEMO_TICK_MS        Override --tick-ms
    PERLIN_DEMO_FRAMES         Override --frames
    PERLIN_DEMO_SURFACE        Override --surface (ansi|null)
    PERLIN_DEMO_SIZE           ANSI surface size (e.g., 120x40)
    RUST_LOG                   Log filter (logs go to stderr)

    Invalid PERLIN_DEMO_* values are ignored; invalid PERLIN_FIELD_*,
    PERLIN_TILE_SIZE or PERLIN_ROTATION_PERIOD_MS values are an error.";

/// Where frames are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SurfaceKind {
    /// Truecolor half-block cells on stdout.
    #[default]
    Ansi,
    /// Discard frames; useful for timing runs.
    Null,
}

impl FromStr for SurfaceKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ansi" => Ok(Self::Ansi),
            "null" | "none" => Ok(Self::Null),
            _ => Err(()),
        }
    }
}

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq)]
pub struct Opts {
    /// Gradient grid width in cells (validated by `field_config`).
    pub field_width: i64,
    /// Gradient grid height in cells.
    pub field_height: i64,
    /// Tile edge length in pixels.
    pub tile_size: i64,
    /// Milliseconds per full revolution.
    pub period_ms: f64,
    /// Gradient seed; `None` draws from the thread RNG.
    pub seed: Option<u64>,
    /// Frame cadence in milliseconds.
    pub tick_ms: u64,
    /// Stop after this many frames (0 = unlimited).
    pub frames: u64,
    pub surface: SurfaceKind,
    /// ANSI surface columns.
    pub cols: u16,
    /// ANSI surface rows.
    pub rows: u16,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    Help,
    Version,
    InvalidValue { flag: &'static str, value: String },
    UnknownArg(String),
    Config(ConfigError),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Help => f.write_str("help requested"),
            Self::Version => f.write_str("version requested"),
            Self::InvalidValue { flag, value } => write!(f, "Invalid {flag} value: {value}"),
            Self::UnknownArg(arg) => write!(f, "Unknown argument: {arg}"),
            Self::Config(err) => write!(f, "Invalid configuration: {err}"),
        }
    }
}

impl std::error::Error for ParseError {}

impl From<ConfigError> for ParseError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl Default for Opts {
    fn default() -> Self {
        let config = FieldConfig::default();
        let dims = config.dimensions();
        Self {
            field_width: dims.width as i64,
            field_height: dims.height as i64,
            tile_size: config.tile_size() as i64,
            period_ms: config.rotation_period_ms(),
            seed: None,
            tick_ms: 16,
            frames: 0,
            surface: SurfaceKind::Ansi,
            cols: 80,
            rows: 24,
        }
    }
}

impl Opts {
    /// Parse command-line arguments and environment variables, exiting on
    /// `--help`, `--version`, or invalid input.
    pub fn parse() -> Self {
        match Self::parse_from_env_and_args(env::args().skip(1), |key| env::var(key).ok()) {
            Ok(opts) => opts,
            Err(ParseError::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Err(ParseError::Version) => {
                println!("perlin-demo {VERSION}");
                process::exit(0);
            }
            Err(err @ ParseError::UnknownArg(_)) => {
                eprintln!("{err}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
            Err(err) => {
                eprintln!("{err}");
                process::exit(1);
            }
        }
    }

    /// Validated field configuration for these options.
    pub fn field_config(&self) -> Result<FieldConfig, ConfigError> {
        FieldConfig::new(
            self.field_width,
            self.field_height,
            self.tile_size,
            self.period_ms,
        )
    }

    pub fn parse_from_env_and_args<I, S, F>(args: I, get_env: F) -> Result<Self, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: Fn(&str) -> Option<String>,
    {
        let mut opts = Self::default();

        // Library-level field variables first.
        let base = FieldConfig::from_env_with(&get_env)?;
        let dims = base.dimensions();
        opts.field_width = dims.width as i64;
        opts.field_height = dims.height as i64;
        opts.tile_size = base.tile_size() as i64;
        opts.period_ms = base.rotation_period_ms();

        if let Some(val) = get_env("PERLIN_DEMO_SEED")
            && let Ok(n) = val.trim().parse()
        {
            opts.seed = Some(n);
        }
        if let Some(val) = get_env("PERLIN_DEMO_TICK_MS")
            && let Ok(n) = val.trim().parse()
        {
            opts.tick_ms = n;
        }
        if let Some(val) = get_env("PERLIN_DEMO_FRAMES")
            && let Ok(n) = val.trim().parse()
        {
            opts.frames = n;
        }
        if let Some(val) = get_env("PERLIN_DEMO_SURFACE")
            && let Ok(kind) = val.parse()
        {
            opts.surface = kind;
        }
        if let Some(val) = get_env("PERLIN_DEMO_SIZE")
            && let Some((cols, rows)) = parse_size::<u16>(&val)
        {
            opts.cols = cols;
            opts.rows = rows;
        }

        // Command-line args override env vars.
        for arg in args {
            let arg = arg.as_ref();
            match arg {
                "--help" | "-h" => return Err(ParseError::Help),
                "--version" | "-V" => return Err(ParseError::Version),
                other => {
                    if let Some(val) = other.strip_prefix("--field=") {
                        let (w, h) = parse_size::<i64>(val).ok_or_else(|| {
                            ParseError::InvalidValue {
                                flag: "--field",
                                value: val.to_string(),
                            }
                        })?;
                        opts.field_width = w;
                        opts.field_height = h;
                    } else if let Some(val) = other.strip_prefix("--tile=") {
                        opts.tile_size = parse_flag("--tile", val)?;
                    } else if let Some(val) = other.strip_prefix("--period-ms=") {
                        opts.period_ms = parse_flag("--period-ms", val)?;
                    } else if let Some(val) = other.strip_prefix("--seed=") {
                        opts.seed = Some(parse_flag("--seed", val)?);
                    } else if let Some(val) = other.strip_prefix("--tick-ms=") {
                        opts.tick_ms = parse_flag("--tick-ms", val)?;
                    } else if let Some(val) = other.strip_prefix("--frames=") {
                        opts.frames = parse_flag("--frames", val)?;
                    } else if let Some(val) = other.strip_prefix("--surface=") {
                        opts.surface = parse_flag("--surface", val)?;
                    } else if let Some(val) = other.strip_prefix("--cols=") {
                        opts.cols = parse_flag("--cols", val)?;
                    } else if let Some(val) = other.strip_prefix("--rows=") {
                        opts.rows = parse_flag("--rows", val)?;
                    } else {
                        return Err(ParseError::UnknownArg(other.to_string()));
                    }
                }
            }
        }

        // Fail fast on a field the core would reject.
        opts.field_config()?;
        Ok(opts)
    }
}

fn parse_flag<T: FromStr>(flag: &'static str, val: &str) -> Result<T, ParseError> {
    val.trim().parse().map_err(|_| ParseError::InvalidValue {
        flag,
        value: val.to_string(),
    })
}

fn parse_size<T: FromStr>(raw: &str) -> Option<(T, T)> {
    let trimmed = raw.trim();
    let mut parts = trimmed.split(['x', 'X']);
    let w: T = parts.next()?.parse().ok()?;
    let h: T = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((w, h))
}
