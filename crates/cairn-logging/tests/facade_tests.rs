#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use cairn_logging::capture::init_test_capture;
use cairn_logging::{any, fields, FatalHook, Level, Mode, Value};
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};

#[derive(Debug)]
struct Timeout;

impl fmt::Display for Timeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("upstream timed out")
    }
}

impl std::error::Error for Timeout {}

#[test]
fn test_production_initial_fields_on_every_record() {
    let _guard = common::serial();
    let capture = init_test_capture(Mode::Production, vec![any("deployment", "blue")]);

    cairn_logging::info("first", &[any("n", 1)]);
    cairn_logging::warn("second", &[]);
    cairn_logging::error("third", &fields!["retry" => true]);

    let records = capture.records();
    assert_eq!(records.len(), 3);
    for record in &records {
        assert_eq!(
            record.field("deployment"),
            Some(&Value::Str("blue".to_string())),
            "missing initial field on {:?}",
            record.message
        );
    }
    assert_eq!(records[0].field("n"), Some(&Value::Int(1)));
    assert_eq!(records[0].fields[0].key(), "deployment");
    assert_eq!(records[2].field("retry"), Some(&Value::Bool(true)));
}

#[test]
fn test_development_does_not_attach_initial_fields() {
    let _guard = common::serial();
    let capture = init_test_capture(Mode::Development, vec![any("deployment", "blue")]);

    cairn_logging::info("hello", &[]);

    assert!(capture.records()[0].fields.is_empty());
}

#[test]
fn test_production_drops_debug() {
    let _guard = common::serial();
    let capture = init_test_capture(Mode::Production, vec![]);

    cairn_logging::debug("noise", &[]);
    cairn_logging::info("signal", &[]);

    assert_eq!(capture.records().len(), 1);
    capture.assert_record_exists(Level::Info, "signal");
}

#[test]
fn test_dpanic_panics_in_development() {
    let _guard = common::serial();
    let capture = init_test_capture(Mode::Development, vec![]);

    let result = catch_unwind(|| cairn_logging::dpanic("should never happen", &[]));

    assert!(result.is_err());
    capture.assert_record_exists(Level::DPanic, "should never happen");
}

#[test]
fn test_dpanic_emits_without_panicking_in_production() {
    let _guard = common::serial();
    let capture = init_test_capture(Mode::Production, vec![]);

    cairn_logging::dpanic("should never happen", &[]);
    cairn_logging::dpanic_e("should never happen either", &Timeout);

    capture.assert_record_exists(Level::DPanic, "should never happen");
    capture.assert_record_exists(Level::DPanic, "should never happen either");
}

#[test]
fn test_panic_emits_then_unwinds_in_both_modes() {
    let _guard = common::serial();
    for mode in [Mode::Production, Mode::Development] {
        let capture = init_test_capture(mode, vec![]);

        let result = catch_unwind(|| {
            cairn_logging::panic("bad state", &[any("mode", format!("{mode:?}"))])
        });

        assert!(result.is_err(), "{mode:?}");
        capture.assert_record_exists(Level::Panic, "bad state");
    }
}

#[test]
fn test_panic_e_records_error_before_unwinding() {
    let _guard = common::serial();
    let capture = init_test_capture(Mode::Production, vec![]);

    let result = catch_unwind(AssertUnwindSafe(|| cairn_logging::panic_e("giving up", &Timeout)));

    assert!(result.is_err());
    let records = capture.records();
    assert_eq!(records[0].level, Level::Panic);
    match records[0].field("error") {
        Some(Value::Error(err)) => assert_eq!(err.message, "upstream timed out"),
        other => panic!("expected error field, got {:?}", other),
    }
}

#[test]
fn test_fatal_hook_panic_keeps_record() {
    let _guard = common::serial();
    let (logger, capture) = cairn_logging::capture::capture_logger(Mode::Production, vec![]);
    cairn_logging::replace(logger.with_fatal_hook(FatalHook::Panic));

    let result = catch_unwind(AssertUnwindSafe(|| {
        cairn_logging::fatal_e("cannot continue", &Timeout)
    }));

    assert!(result.is_err());
    capture.assert_record_exists(Level::Fatal, "cannot continue");
}

#[test]
fn test_stack_traces_from_warn_up() {
    let _guard = common::serial();
    let capture = init_test_capture(Mode::Development, vec![]);

    cairn_logging::debug("d", &[]);
    cairn_logging::info("i", &[]);
    cairn_logging::warn("w", &[]);
    cairn_logging::error("e", &[]);
    let _ = catch_unwind(AssertUnwindSafe(|| cairn_logging::dpanic_e("dp", &Timeout)));

    for record in capture.records() {
        assert_eq!(
            record.stack.is_some(),
            record.level >= Level::Warn,
            "stack presence wrong for {:?}",
            record.level
        );
    }
}

#[test]
fn test_error_variants_use_error_key() {
    let _guard = common::serial();
    let capture = init_test_capture(Mode::Development, vec![]);

    cairn_logging::debug_e("d", &Timeout);
    cairn_logging::info_e("i", &Timeout);
    cairn_logging::warn_e("w", &Timeout);
    cairn_logging::error_e("e", &Timeout);

    let records = capture.records();
    assert_eq!(records.len(), 4);
    for record in records {
        assert_eq!(record.fields.len(), 1);
        assert_eq!(record.fields[0].key(), "error");
    }
}

#[test]
fn test_printf_compat_logs_at_debug() {
    let _guard = common::serial();
    let capture = init_test_capture(Mode::Development, vec![]);

    cairn_logging::printf!("x={}", 5);

    let records = capture.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].level, Level::Debug);
    assert_eq!(records[0].message, "x=5");
}

#[test]
fn test_print_and_println_compat() {
    let _guard = common::serial();
    let capture = init_test_capture(Mode::Development, vec![]);

    cairn_logging::print(&[&"a", &1, &"b"]);
    cairn_logging::println(&[&"a", &1, &"b"]);

    capture.assert_record_exists(Level::Debug, "a1b");
    capture.assert_record_exists(Level::Debug, "a 1 b\n");
}

#[test]
fn test_caller_is_the_facade_call_site() {
    let _guard = common::serial();
    let capture = init_test_capture(Mode::Production, vec![]);

    let line = line!() + 1;
    cairn_logging::info("where am i", &[]);

    let caller = capture.records()[0].caller.clone().unwrap();
    assert!(caller.ends_with(&format!("facade_tests.rs:{line}")), "{caller}");
}

#[test]
fn test_any_distinguishes_binary_from_integers() {
    let _guard = common::serial();
    let capture = init_test_capture(Mode::Production, vec![]);

    cairn_logging::info("payload", &[any("blob", vec![1u8, 2, 3]), any("count", 1i32)]);

    let record = &capture.records()[0];
    assert_eq!(record.field("blob"), Some(&Value::Binary(vec![1, 2, 3])));
    assert_eq!(record.field("count"), Some(&Value::Int(1)));
}

#[test]
fn test_replace_returns_previous_logger() {
    let _guard = common::serial();
    let _capture = init_test_capture(Mode::Development, vec![]);

    let previous = cairn_logging::replace(cairn_logging::Logger::nop());

    assert!(previous.is_development());
    assert!(!cairn_logging::logger().is_development());
}

#[test]
fn test_configure_installs_working_logger() {
    let _guard = common::serial();

    cairn_logging::try_configure(Mode::Development, vec![]).unwrap();

    let logger = cairn_logging::logger();
    assert!(logger.is_development());
    assert!(logger.enabled(Level::Debug));
    cairn_logging::sync();
}

struct BrokenPipe;

impl std::io::Write for BrokenPipe {
    fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
        Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe))
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe))
    }
}

#[test]
fn test_sync_failure_is_fatal_but_write_failure_is_not() {
    use cairn_logging::backend::WriterCore;
    use cairn_logging::encoder::{Encoder, EncoderConfig, Encoding};
    use cairn_logging::sink::Sink;
    use cairn_logging::AtomicLevel;

    let _guard = common::serial();
    let core = WriterCore::new(
        Encoder::new(Encoding::Json, EncoderConfig::production()),
        AtomicLevel::new(Level::Debug),
        vec![Sink::custom("broken", BrokenPipe)],
    );
    cairn_logging::replace(cairn_logging::Logger::new(core));

    cairn_logging::error("lost", &[]);

    let err = cairn_logging::try_sync().unwrap_err();
    assert_eq!(err.kind(), cairn_logging::LogErrorKind::Flush);

    let payload = catch_unwind(cairn_logging::sync).unwrap_err();
    let message = payload
        .downcast_ref::<String>()
        .cloned()
        .unwrap_or_default();
    assert!(message.starts_with("logger sync failed"), "{message}");
    assert!(message.contains("broken"), "{message}");

    cairn_logging::replace(cairn_logging::Logger::nop());
}

#[test]
fn test_print_concatenates_without_separators() {
    let _guard = common::serial();
    let capture = init_test_capture(Mode::Development, vec![]);

    cairn_logging::print(&[&1, &2]);

    capture.assert_record_exists(Level::Debug, "12");
}
