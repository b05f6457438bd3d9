//! Unit tests for error.rs
//!
//! Tests Error variants, Display output and the error-building macros.

use crate::error::{Error, Result};
use crate::engine::Engine;
use crate::log::{LogEntry, Logger, LogSeverity};
use serial_test::serial;
use std::sync::{Arc, Mutex};

// ============================================================================
// ERROR DISPLAY TESTS
// ============================================================================

#[test]
fn test_backend_error_display() {
    let err = Error::BackendError("Swapchain creation failed".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Backend error"));
    assert!(display.contains("Swapchain creation failed"));
}

#[test]
fn test_out_of_memory_display() {
    assert_eq!(format!("{}", Error::OutOfMemory), "Out of GPU memory");
}

#[test]
fn test_invalid_resource_display() {
    let err = Error::InvalidResource("Vertex count is zero".to_string());
    assert_eq!(format!("{}", err), "Invalid resource: Vertex count is zero");
}

#[test]
fn test_initialization_failed_display() {
    let err = Error::InitializationFailed("Window creation failed".to_string());
    assert_eq!(format!("{}", err), "Initialization failed: Window creation failed");
}

// ============================================================================
// ERROR TRAIT IMPLEMENTATIONS
// ============================================================================

#[test]
fn test_error_is_std_error() {
    let err = Error::OutOfMemory;
    let _: &dyn std::error::Error = &err;
}

#[test]
fn test_error_debug_names_variant() {
    let debug = format!("{:?}", Error::BackendError("x".to_string()));
    assert!(debug.contains("BackendError"));
}

#[test]
fn test_result_propagates_with_question_mark() {
    fn inner() -> Result<u32> {
        Err(Error::InvalidResource("missing".to_string()))
    }
    fn outer() -> Result<u32> {
        let value = inner()?;
        Ok(value + 1)
    }
    assert_eq!(outer(), Err(Error::InvalidResource("missing".to_string())));
}

// ============================================================================
// ERROR MACROS
// ============================================================================

struct CaptureLogger {
    entries: Arc<Mutex<Vec<(LogSeverity, String)>>>,
}

impl Logger for CaptureLogger {
    fn log(&self, entry: &LogEntry) {
        self.entries.lock().unwrap().push((entry.severity, entry.message.clone()));
    }
}

fn install_capture() -> Arc<Mutex<Vec<(LogSeverity, String)>>> {
    let entries = Arc::new(Mutex::new(Vec::new()));
    Engine::set_logger(CaptureLogger { entries: entries.clone() });
    entries
}

#[test]
#[serial]
fn test_engine_err_logs_and_builds_backend_error() {
    let entries = install_capture();

    let err = crate::engine_err!("freelook::test", "device lost ({})", 7);

    assert_eq!(err, Error::BackendError("device lost (7)".to_string()));
    let captured = entries.lock().unwrap();
    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0], (LogSeverity::Error, "device lost (7)".to_string()));
    drop(captured);
    Engine::reset_logger();
}

#[test]
#[serial]
fn test_engine_bail_returns_early() {
    let entries = install_capture();

    fn fails(flag: bool) -> Result<u32> {
        if flag {
            crate::engine_bail!("freelook::test", "bailing out");
        }
        Ok(1)
    }

    assert_eq!(fails(false), Ok(1));
    assert!(entries.lock().unwrap().is_empty());
    assert_eq!(fails(true), Err(Error::BackendError("bailing out".to_string())));
    assert_eq!(entries.lock().unwrap().len(), 1);
    Engine::reset_logger();
}

#[test]
#[serial]
fn test_engine_bail_warn_logs_at_warn_severity() {
    let entries = install_capture();

    fn fails() -> Result<()> {
        crate::engine_bail_warn!("freelook::test", "surface lost");
    }

    assert!(fails().is_err());
    assert_eq!(entries.lock().unwrap()[0].0, LogSeverity::Warn);
    Engine::reset_logger();
}

#[test]
#[serial]
fn test_engine_warn_err_builds_backend_error() {
    let entries = install_capture();

    let err = crate::engine_warn_err!("freelook::test", "frame {} not open", 3);

    assert_eq!(err, Error::BackendError("frame 3 not open".to_string()));
    let logged = entries.lock().unwrap();
    assert_eq!(logged.len(), 1);
    assert_eq!(logged[0].0, LogSeverity::Warn);
    drop(logged);
    Engine::reset_logger();
}
