// tests/cli.rs

use std::io::Read;
use std::process::{Command, Output, Stdio};
use std::time::{Duration, Instant};

fn command(args: &[&str]) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_fbsim"));
    command
        .args(args)
        .env("RUST_LOG", "warn")
        .env_remove("FBSIM_CONFIG")
        .env_remove("DISPLAY");
    command
}

fn fbsim(args: &[&str]) -> (Output, Duration) {
    let start = Instant::now();
    let output = command(args).output().expect("failed to run fbsim");
    (output, start.elapsed())
}

#[test]
fn it_should_exit_zero_after_the_run_timeout() {
    let (output, elapsed) = fbsim(&["bouncing-box", "--headless", "--timeout", "1"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(0), "stdout: {}", stdout);
    assert!(stdout.contains("Will auto-exit in 1 seconds."), "{}", stdout);
    assert!(stdout.contains("Simulation timed out after 1 seconds."), "{}", stdout);
    assert!(stdout.contains("Simulator closed."), "{}", stdout);
    assert!(elapsed >= Duration::from_secs(1));
    assert!(elapsed < Duration::from_secs(5), "took {:?}", elapsed);
}

#[test]
fn it_should_exit_one_when_the_driver_never_opens_a_display() {
    let (output, elapsed) = fbsim(&["idle", "--headless", "--discovery-timeout", "1"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(1), "stderr: {}", stderr);
    assert!(
        stderr.contains("could not find the display opened by driver 'idle'"),
        "{}",
        stderr
    );
    assert!(elapsed >= Duration::from_secs(1));
    assert!(elapsed < Duration::from_secs(4), "took {:?}", elapsed);
}

#[test]
fn it_should_list_drivers_when_the_name_is_unknown() {
    let (output, _) = fbsim(&["no-such-driver", "--headless"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr.contains("color-bars"), "{}", stderr);
}

#[test]
fn it_should_reject_a_zero_scale() {
    let (output, _) = fbsim(&["color-bars", "--headless", "--scale", "0"]);
    assert_ne!(output.status.code(), Some(0));
}

#[test]
fn it_should_keep_running_when_the_timeout_is_zero() {
    let mut child = command(&["color-bars", "--headless", "--timeout", "0"])
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("failed to run fbsim");

    std::thread::sleep(Duration::from_millis(1500));
    let still_running = child.try_wait().expect("failed to poll fbsim").is_none();
    child.kill().ok();
    child.wait().ok();

    let mut stdout = String::new();
    child
        .stdout
        .take()
        .expect("stdout is piped")
        .read_to_string(&mut stdout)
        .ok();
    assert!(still_running, "exited early, stdout: {}", stdout);
    assert!(stdout.contains("Press Ctrl+C"), "{}", stdout);
    assert!(!stdout.contains("Will auto-exit"), "{}", stdout);
}

#[test]
fn it_should_fail_on_a_broken_config_file_from_the_environment() {
    let path = std::env::temp_dir().join(format!("fbsim-cli-bad-config-{}.json", std::process::id()));
    std::fs::write(&path, "{ not json").expect("failed to write config");

    let output = command(&["color-bars", "--headless", "--timeout", "1"])
        .env("FBSIM_CONFIG", &path)
        .output()
        .expect("failed to run fbsim");
    std::fs::remove_file(&path).ok();

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(1), "stderr: {}", stderr);
    assert!(stderr.contains("failed to parse config file"), "{}", stderr);
}
