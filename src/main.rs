//! errwarn - audible feedback for command-line programs.

use std::ffi::OsString;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use errwarn::config::{ConfigDir, Preset, SettingsOverrides};
use errwarn::cue::{cue_queue, PlayerHandle, PlayerOptions, RodioOutput, DEFAULT_QUEUE_CAPACITY};
use errwarn::display;
use errwarn::error::Result;
use errwarn::monitor::PatternMatcher;
use errwarn::sound::SoundLibrary;
use errwarn::supervisor::{CommandLine, Supervisor};

#[derive(Parser)]
#[command(
    name = "errwarn",
    about = "Play a sound when a command prints an error or warning",
    override_usage = "errwarn [OPTIONS] [--] <CMDLINE>...\n       <cmdline> | errwarn [OPTIONS]",
    version
)]
struct Cli {
    /// Use preset from config
    #[arg(short = 'p', value_name = "PRESET")]
    preset: Option<String>,

    /// Regexp matching errors
    #[arg(short = 'e', value_name = "REGEXP")]
    error_format: Option<String>,

    /// Regexp matching warnings
    #[arg(short = 'w', value_name = "REGEXP")]
    warning_format: Option<String>,

    /// Use sounds of soundset
    #[arg(short = 's', value_name = "SOUNDSET")]
    soundset: Option<String>,

    /// Read stdout of the command instead of stderr
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    stdout: Option<bool>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Command to run. Without one, standard input is monitored.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "CMDLINE")]
    cmdline: Vec<OsString>,
}

impl Cli {
    fn flags(&self) -> Preset {
        Preset {
            error_format: self.error_format.clone(),
            warning_format: self.warning_format.clone(),
            soundset: self.soundset.clone(),
            stdout: self.stdout,
        }
    }
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

async fn run(cli: Cli) -> Result<i32> {
    let flags = cli.flags();
    let command = CommandLine::from_args(cli.cmdline);
    let overrides = SettingsOverrides {
        preset: cli.preset,
        derived_preset: command.as_ref().and_then(CommandLine::preset_name),
        flags,
    };

    let config_dir = ConfigDir::locate()?;
    let settings = config_dir.resolve(&overrides)?;
    tracing::debug!(?settings, "Resolved settings");

    let matcher = PatternMatcher::from_settings(&settings)?;
    let sounds = SoundLibrary::new(config_dir.path(), &settings.soundset)
        .load()
        .await?;

    let (queue, cues) = cue_queue(DEFAULT_QUEUE_CAPACITY);
    let player = PlayerHandle::spawn(RodioOutput::open, cues, PlayerOptions::default()).await?;

    let report = Supervisor::new(settings, matcher, Arc::new(sounds), queue)
        .with_command(command)
        .run(player)
        .await?;
    tracing::info!(
        terminal = %report.terminal,
        lines = report.monitor.lines,
        errors = report.monitor.errors,
        warnings = report.monitor.warnings,
        "Session finished"
    );

    Ok(report.exit_code())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Fatal error");
            display::print_error(&e.to_string());
            1
        }
    };
    std::process::exit(code);
}
