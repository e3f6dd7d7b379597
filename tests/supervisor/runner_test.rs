//! Integration tests for the supervisor runner.

use std::sync::Arc;

use errwarn::config::Settings;
use errwarn::cue::cue_queue;
use errwarn::monitor::PatternMatcher;
use errwarn::sound::{SoundSet, SoundSlot};
use errwarn::supervisor::{
    CommandLine, ExitOutcome, SessionReport, SpawnError, Supervisor, SupervisorError,
};

use crate::support::{full_set, recording_player, RecordingOutput};

fn settings(use_stdout: bool) -> Settings {
    Settings {
        error_format: "^ERROR".to_string(),
        warning_format: "^WARNING".to_string(),
        use_stdout,
        ..Default::default()
    }
}

fn shell(script: &str) -> CommandLine {
    CommandLine::new("sh").arg("-c").arg(script)
}

async fn run_command(
    settings: Settings,
    sounds: SoundSet,
    command: CommandLine,
) -> (Result<SessionReport, SupervisorError>, RecordingOutput) {
    let matcher = PatternMatcher::from_settings(&settings).unwrap();
    let (queue, cues) = cue_queue(16);
    let (player, output) = recording_player(cues).await;
    let result = Supervisor::new(settings, matcher, Arc::new(sounds), queue)
        .with_command(Some(command))
        .run(player)
        .await;
    (result, output)
}

#[cfg(unix)]
#[tokio::test]
async fn failing_build_plays_start_error_failure() {
    let settings = Settings {
        error_format: "(?i)error".to_string(),
        warning_format: "(?i)warn".to_string(),
        ..Default::default()
    };
    let (result, output) = run_command(
        settings,
        full_set(),
        shell(r#"echo building... >&2; echo "ERROR: bad" >&2; exit 2"#),
    )
    .await;

    let report = result.unwrap();
    assert_eq!(report.outcome, ExitOutcome::NormalExit(2));
    assert_eq!(report.exit_code(), 2);
    assert_eq!(report.terminal, SoundSlot::Failure);
    assert_eq!(report.monitor.lines, 2);
    assert_eq!(report.monitor.errors, 1);
    assert_eq!(
        output.played(),
        [SoundSlot::Start, SoundSlot::Error, SoundSlot::Failure]
    );
}

#[cfg(unix)]
#[tokio::test]
async fn clean_run_plays_success() {
    let (result, output) =
        run_command(settings(false), full_set(), shell("echo fine >&2")).await;

    let report = result.unwrap();
    assert_eq!(report.exit_code(), 0);
    assert_eq!(report.terminal, SoundSlot::Success);
    assert_eq!(output.played(), [SoundSlot::Start, SoundSlot::Success]);
}

#[cfg(unix)]
#[tokio::test]
async fn clean_run_with_warnings_plays_finish() {
    let (result, output) = run_command(
        settings(false),
        full_set(),
        shell(r#"echo "WARNING: unused" >&2"#),
    )
    .await;

    let report = result.unwrap();
    assert_eq!(report.exit_code(), 0);
    assert_eq!(report.terminal, SoundSlot::Finish);
    assert_eq!(
        output.played(),
        [SoundSlot::Start, SoundSlot::Warning, SoundSlot::Finish]
    );
}

#[cfg(unix)]
#[tokio::test]
async fn stdout_is_monitored_when_selected() {
    let (result, output) = run_command(
        settings(true),
        full_set(),
        shell(r#"echo "ERROR: on stdout"; echo "ERROR: on stderr" >&2"#),
    )
    .await;

    let report = result.unwrap();
    assert_eq!(report.monitor.errors, 1);
    assert_eq!(
        output.played(),
        [SoundSlot::Start, SoundSlot::Error, SoundSlot::Finish]
    );
}

#[cfg(unix)]
#[tokio::test]
async fn killed_command_exits_with_fallback_code() {
    let (result, output) = run_command(settings(false), full_set(), shell("kill -9 $$")).await;

    let report = result.unwrap();
    assert_eq!(report.outcome, ExitOutcome::AbnormalTermination);
    assert_eq!(report.exit_code(), 1);
    assert_eq!(output.played(), [SoundSlot::Start, SoundSlot::Failure]);
}

#[cfg(unix)]
#[tokio::test]
async fn missing_sounds_are_skipped_in_order() {
    let sounds = full_set();
    let mut partial = SoundSet::new();
    partial.error = sounds.error.clone();
    partial.failure = sounds.failure.clone();

    let (result, output) = run_command(
        settings(false),
        partial,
        shell(r#"echo "WARNING: w" >&2; echo "ERROR: e" >&2; exit 3"#),
    )
    .await;

    let report = result.unwrap();
    assert_eq!(report.exit_code(), 3);
    assert_eq!(report.playback.map(|p| p.skipped), Some(2));
    assert_eq!(output.played(), [SoundSlot::Error, SoundSlot::Failure]);
}

#[tokio::test]
async fn unknown_program_is_a_spawn_error() {
    let (result, output) = run_command(
        settings(false),
        full_set(),
        CommandLine::new("errwarn-test-no-such-program"),
    )
    .await;

    assert!(matches!(
        result,
        Err(SupervisorError::Spawn(SpawnError::NotFound(_)))
    ));
    assert!(output.played().is_empty());
}

#[tokio::test]
async fn reader_without_command_plays_only_cues_and_finish() {
    let settings = settings(false);
    let matcher = PatternMatcher::from_settings(&settings).unwrap();
    let (queue, cues) = cue_queue(16);
    let (player, output) = recording_player(cues).await;
    let mut passthrough = Vec::new();

    let report = Supervisor::new(settings, matcher, Arc::new(full_set()), queue)
        .run_reader(
            &b"compiling\nWARNING: old api\n"[..],
            &mut passthrough,
            player,
        )
        .await;

    assert_eq!(report.outcome, ExitOutcome::NoProcess);
    assert_eq!(report.exit_code(), 0);
    assert_eq!(passthrough, b"compiling\nWARNING: old api\n");
    assert_eq!(output.played(), [SoundSlot::Warning, SoundSlot::Finish]);
}

#[tokio::test]
async fn empty_reader_plays_finish() {
    let settings = settings(false);
    let matcher = PatternMatcher::from_settings(&settings).unwrap();
    let (queue, cues) = cue_queue(4);
    let (player, output) = recording_player(cues).await;

    let report = Supervisor::new(settings, matcher, Arc::new(full_set()), queue)
        .run_reader(tokio::io::empty(), tokio::io::sink(), player)
        .await;

    assert_eq!(report.terminal, SoundSlot::Finish);
    assert_eq!(report.monitor.lines, 0);
    assert_eq!(output.played(), [SoundSlot::Finish]);
}
