use std::process::{Command, Output};
use std::sync::{Mutex, MutexGuard};

/// Set in the environment of re-executed test binaries
#[allow(dead_code)]
pub const CHILD_ENV: &str = "CAIRN_TEST_CHILD";

static GLOBAL_LOCK: Mutex<()> = Mutex::new(());

/// Serialize tests that install a global logger
///
/// A test that panics while holding the guard poisons the lock; later tests
/// still get it.
#[allow(dead_code)]
pub fn serial() -> MutexGuard<'static, ()> {
    GLOBAL_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

/// Whether this process is a re-executed child
#[allow(dead_code)]
pub fn is_child() -> bool {
    std::env::var_os(CHILD_ENV).is_some()
}

/// Re-run exactly one test of the current binary in a child process
///
/// Used for behavior that ends the process (Fatal, fatal configuration
/// errors) or that depends on environment variables.
#[allow(dead_code)]
pub fn run_child(test_name: &str, envs: &[(&str, &str)]) -> Output {
    let exe = std::env::current_exe().expect("test binary path");
    let mut cmd = Command::new(exe);
    cmd.args([test_name, "--exact", "--nocapture", "--test-threads=1"])
        .env(CHILD_ENV, "1")
        .env_remove("CAIRN_LOG_LEVEL")
        .env_remove("CAIRN_LOG_ENCODING")
        .env_remove("CAIRN_LOG_OUTPUT");
    for (key, value) in envs {
        cmd.env(key, value);
    }
    cmd.output().expect("child test process should start")
}

/// stdout and stderr of a child, concatenated
#[allow(dead_code)]
pub fn combined_output(output: &Output) -> String {
    format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}
