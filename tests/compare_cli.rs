//! End-to-end runs of the `sonomatch` binary on generated WAV fixtures.

mod support;

use std::path::Path;
use std::process::{Command, Output};

use support::wav::{excerpt, song, square_wave, truncate_file, write_pcm16_wav};
use tempfile::TempDir;

fn sonomatch(config_home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sonomatch"))
        .args(args)
        .env("SONOMATCH_CONFIG_HOME", config_home)
        .env_remove("RUST_LOG")
        .output()
        .expect("run sonomatch")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

struct Fixture {
    temp: TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self {
            temp: tempfile::tempdir().expect("create tempdir"),
        }
    }

    fn path(&self, relative: &str) -> String {
        self.temp.path().join(relative).to_string_lossy().into_owned()
    }

    fn config_home(&self) -> std::path::PathBuf {
        self.temp.path().join("config")
    }

    fn run(&self, args: &[&str]) -> Output {
        sonomatch(&self.config_home(), args)
    }
}

#[test]
fn excerpt_is_reported_with_its_offset() {
    let fx = Fixture::new();
    write_pcm16_wav(Path::new(&fx.path("a/long.wav")), &song(), 1);
    write_pcm16_wav(Path::new(&fx.path("b/short.wav")), &excerpt(), 1);

    let output = fx.run(&["-f", &fx.path("a/long.wav"), "--file", &fx.path("b/short.wav")]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "MATCH: 0.9 long.wav short.wav\n");

    // The longer file is named first whichever side it was given on.
    let output = fx.run(&["-f", &fx.path("b/short.wav"), "-f", &fx.path("a/long.wav")]);
    assert_eq!(stdout(&output), "MATCH: 0.9 long.wav short.wav\n");
}

#[test]
fn directory_against_file_reports_only_matches() {
    let fx = Fixture::new();
    write_pcm16_wav(Path::new(&fx.path("song.wav")), &song(), 1);
    write_pcm16_wav(Path::new(&fx.path("set/copy.wav")), &song(), 2);
    write_pcm16_wav(Path::new(&fx.path("set/quiet.wav")), &square_wave(&[0; 40]), 1);

    let output = fx.run(&["-d", &fx.path("set"), "-f", &fx.path("song.wav")]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "MATCH: 0.0 copy.wav song.wav\n");
}

#[test]
fn truncated_file_is_skipped_and_the_run_continues() {
    let fx = Fixture::new();
    write_pcm16_wav(Path::new(&fx.path("long.wav")), &song(), 1);
    write_pcm16_wav(Path::new(&fx.path("set/short.wav")), &excerpt(), 1);
    write_pcm16_wav(Path::new(&fx.path("set/truncated.wav")), &song(), 1);
    truncate_file(Path::new(&fx.path("set/truncated.wav")), 40);

    let output = fx.run(&["--dir", &fx.path("set"), "-f", &fx.path("long.wav"), "--jobs", "2"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "MATCH: 0.9 long.wav short.wav\n");
    assert!(stderr(&output).contains("truncated.wav"));
}

#[test]
fn invalid_arguments_exit_with_error() {
    let fx = Fixture::new();
    write_pcm16_wav(Path::new(&fx.path("song.wav")), &song(), 1);
    let song_path = fx.path("song.wav");

    let output = fx.run(&["-f", &song_path]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        stderr(&output).trim(),
        "ERROR: Unexpected number of command line arguments."
    );

    let output = fx.run(&["-x", &song_path, "-f", &song_path]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stderr(&output).trim(), "ERROR: Incorrect pathspec.");

    let output = fx.run(&["-f", &song_path, "-f", &song_path, "extra"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn invalid_path_specs_exit_with_error() {
    let fx = Fixture::new();
    write_pcm16_wav(Path::new(&fx.path("song.wav")), &song(), 1);
    write_pcm16_wav(Path::new(&fx.path("set/one.wav")), &song(), 1);
    std::fs::create_dir_all(fx.path("set/nested")).unwrap();
    std::fs::write(fx.path("notes.wav"), "not audio").unwrap();
    let song_path = fx.path("song.wav");

    let output = fx.run(&["-f", &fx.path("missing.wav"), "-f", &song_path]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).starts_with("ERROR: File "), "{}", stderr(&output));
    assert!(stdout(&output).is_empty());

    let output = fx.run(&["-d", &fx.path("set"), "-f", &song_path]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).starts_with("ERROR: Sub-Directory "));

    let output = fx.run(&["-f", &song_path, "-f", &fx.path("notes.wav")]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).starts_with("ERROR: Unsupported audio format of "));
}

#[test]
fn explicit_config_file_must_parse() {
    let fx = Fixture::new();
    write_pcm16_wav(Path::new(&fx.path("song.wav")), &song(), 1);
    std::fs::write(fx.path("bad.toml"), "[batch]\nworker_count = \"many\"\n").unwrap();
    let song_path = fx.path("song.wav");

    let output = fx.run(&["--config", &fx.path("bad.toml"), "-f", &song_path, "-f", &song_path]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).starts_with("ERROR: Invalid config at "));
}
