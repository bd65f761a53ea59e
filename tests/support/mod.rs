#![allow(dead_code)]

pub mod models;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use jsondata::ModelContext;
use tempfile::TempDir;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A file-backed context in a fresh temp directory. Keep the `TempDir` alive.
pub fn temp_context() -> (TempDir, ModelContext) {
    init_logging();
    let dir = TempDir::new().unwrap();
    let context = ModelContext::at(dir.path()).unwrap();
    (dir, context)
}

/// Poll `counter` until it reaches `expected` or two seconds pass.
pub fn wait_for(counter: &AtomicUsize, expected: usize) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if counter.load(Ordering::SeqCst) >= expected {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    false
}
