//! Integration tests for the line monitor.

use std::io;

use errwarn::cue::{cue_queue, CueReceiver};
use errwarn::monitor::{LineMonitor, PatternMatcher, MAX_LINE_BYTES};
use errwarn::sound::{SoundSet, SoundSlot};

use crate::support::full_set;

fn matcher() -> PatternMatcher {
    PatternMatcher::new("^(ERROR|error)", "^(WARNING|warning)").unwrap()
}

async fn drain(mut rx: CueReceiver) -> Vec<SoundSlot> {
    let mut slots = Vec::new();
    while let Some(cue) = rx.next().await {
        slots.push(cue.slot());
    }
    slots
}

#[tokio::test]
async fn passthrough_is_byte_exact() {
    let input: &[u8] = b"plain\r\nERROR: \xff bad\nwarning: w\nno newline";
    let matcher = matcher();
    let sounds = full_set();
    let (mut queue, _rx) = cue_queue(16);
    let mut out = Vec::new();

    let report = LineMonitor::new(&matcher, &sounds)
        .run(input, &mut out, &mut queue)
        .await;

    assert_eq!(out, input);
    assert_eq!(report.lines, 4);
    assert_eq!(report.errors, 1);
    assert_eq!(report.warnings, 1);
}

#[tokio::test]
async fn cues_follow_line_order() {
    let input: &[u8] =
        b"building...\nwarning: a\nERROR: b\nok\nWARNING: c\nerror and warning\n";
    let matcher = matcher();
    let sounds = full_set();
    let (mut queue, rx) = cue_queue(16);

    let report = LineMonitor::new(&matcher, &sounds)
        .run(input, tokio::io::sink(), &mut queue)
        .await;
    queue.close();

    assert!(report.any_cue_fired());
    assert_eq!(
        drain(rx).await,
        [
            SoundSlot::Warning,
            SoundSlot::Error,
            SoundSlot::Warning,
            SoundSlot::Error,
        ]
    );
}

#[tokio::test]
async fn unterminated_last_line_is_classified() {
    let matcher = matcher();
    let sounds = full_set();
    let (mut queue, rx) = cue_queue(4);

    LineMonitor::new(&matcher, &sounds)
        .run(&b"ERROR: at eof"[..], tokio::io::sink(), &mut queue)
        .await;
    queue.close();

    assert_eq!(drain(rx).await, [SoundSlot::Error]);
}

#[tokio::test]
async fn lines_split_across_reads_are_joined() {
    let input = tokio_test::io::Builder::new()
        .read(b"WARN")
        .read(b"ING: split\nER")
        .read(b"ROR: too\n")
        .build();
    let matcher = matcher();
    let sounds = full_set();
    let (mut queue, rx) = cue_queue(4);

    let report = LineMonitor::new(&matcher, &sounds)
        .run(input, tokio::io::sink(), &mut queue)
        .await;
    queue.close();

    assert_eq!(report.lines, 2);
    assert_eq!(drain(rx).await, [SoundSlot::Warning, SoundSlot::Error]);
}

#[tokio::test]
async fn read_error_ends_the_stream() {
    let input = tokio_test::io::Builder::new()
        .read(b"ERROR: before\n")
        .read_error(io::Error::new(io::ErrorKind::BrokenPipe, "gone"))
        .build();
    let matcher = matcher();
    let sounds = full_set();
    let (mut queue, rx) = cue_queue(4);
    let mut out = Vec::new();

    let report = LineMonitor::new(&matcher, &sounds)
        .run(input, &mut out, &mut queue)
        .await;
    queue.close();

    assert_eq!(out, b"ERROR: before\n");
    assert_eq!(report.errors, 1);
    assert_eq!(drain(rx).await, [SoundSlot::Error]);
}

#[tokio::test]
async fn write_error_keeps_draining_input() {
    let input: &[u8] = b"ERROR: one\nERROR: two\n";
    let output = tokio_test::io::Builder::new()
        .write_error(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        .build();
    let matcher = matcher();
    let sounds = full_set();
    let (mut queue, rx) = cue_queue(4);

    let report = LineMonitor::new(&matcher, &sounds)
        .run(input, output, &mut queue)
        .await;
    queue.close();

    assert_eq!(report.errors, 2);
    assert_eq!(drain(rx).await, [SoundSlot::Error, SoundSlot::Error]);
}

#[tokio::test]
async fn missing_sounds_still_count_as_fired() {
    let matcher = matcher();
    let sounds = SoundSet::new();
    let (mut queue, mut rx) = cue_queue(4);

    let report = LineMonitor::new(&matcher, &sounds)
        .run(&b"warning: quiet\n"[..], tokio::io::sink(), &mut queue)
        .await;
    queue.close();

    assert!(report.any_cue_fired());
    let cue = rx.next().await.unwrap();
    assert_eq!(cue.slot(), SoundSlot::Warning);
    assert!(cue.is_silent());
}

#[tokio::test]
async fn overlong_line_fires_one_cue() {
    let matcher = PatternMatcher::new("^error", "").unwrap();
    let sounds = full_set();
    let (mut queue, rx) = cue_queue(8);

    let mut input = Vec::new();
    for _ in 0..3 {
        let mut piece = b"error".to_vec();
        piece.resize(MAX_LINE_BYTES, b'x');
        input.extend_from_slice(&piece);
    }
    input.push(b'\n');
    let mut out = Vec::new();

    let report = LineMonitor::new(&matcher, &sounds)
        .run(&input[..], &mut out, &mut queue)
        .await;
    queue.close();

    assert_eq!(out, input);
    assert_eq!(report.lines, 1);
    assert_eq!(report.errors, 1);
    assert_eq!(drain(rx).await, [SoundSlot::Error]);
}
