// Minimal integration test that drives the compiled binary through a PTY.
// This exercises the real event loop and crossterm input handling across
// the main boundaries without relying on internal modules.
//
// Notes:
// - Requires a TTY; uses expectrl which allocates a pseudo terminal.
// - Marked Unix-only and ignored by default to avoid CI/platform issues.
// - Run manually via: `cargo test --test integration_min_session -- --ignored`.

#![cfg(unix)]

use std::time::Duration;

use expectrl::{spawn, Eof};

#[test]
#[ignore]
fn minimal_session_flips_and_exits() -> Result<(), Box<dyn std::error::Error>> {
    // A saved block keeps the session offline
    let dir = tempfile::tempdir()?;
    let dump = dir.path().join("block.hex");
    std::fs::write(&dump, "ff".repeat(1024))?;

    // Resolve path to compiled binary (debug build during tests)
    let bin = assert_cmd::cargo::cargo_bin("qcoin");
    let cmd = format!("{} -i --load {}", bin.display(), dump.display());

    // Spawn the TUI inside a pseudo terminal
    let mut p = spawn(cmd)?;

    // Give the app a moment to initialize the terminal/alternate screen
    std::thread::sleep(Duration::from_millis(200));

    // Flip once
    p.send("\r")?;

    // Small delay to allow the background flip to land
    std::thread::sleep(Duration::from_millis(200));

    p.send("q")?;

    // Wait for the program to terminate cleanly
    p.expect(Eof)?;
    Ok(())
}
