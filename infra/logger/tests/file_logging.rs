use sluice_logger::{LogConfig, Logger, LoggerError, Rolling};
use std::fs;
use std::time::Duration;
use tempfile::tempdir;

// One test per binary: the subscriber is process-global.
#[test]
fn json_file_logging_from_config() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    let log_dir = tmp_dir.path().join("logs");
    let config = LogConfig {
        json: true,
        console: false,
        path: Some(log_dir.clone()),
        rolling: Rolling::Never,
        ..LogConfig::default()
    };

    let logger = Logger::from_config("file-logging", &config)?.init()?;
    assert!(logger.writes_files());

    tracing::info!(table = "users", records = 3, "batch routed");

    let err = Logger::builder().name("second").init().expect_err("subscriber is already set");
    assert!(matches!(err, LoggerError::Subscriber { .. }), "got {err}");

    std::thread::sleep(Duration::from_millis(30));
    drop(logger);

    let content = fs::read_to_string(log_dir.join("file-logging.log"))?;
    let line = content
        .lines()
        .find(|line| line.contains("batch routed"))
        .expect("event should be written to the log file");
    let event: serde_json::Value = serde_json::from_str(line)?;
    assert_eq!(event["table"], "users");
    assert_eq!(event["records"], 3);
    assert_eq!(event["message"], "batch routed");
    assert!(event.get("fields").is_none(), "file events should be flat like console ones: {line}");

    Ok(())
}
