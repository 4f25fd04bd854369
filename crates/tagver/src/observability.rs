//! Observability setup: structured JSONL logging.
//!
//! Never writes to stdout: `describe` output is consumed by scripts. Log
//! records go to a daily rolling file, or to stderr when no log location is
//! writable.

use std::fs::OpenOptions;
use std::io::Write;

use anyhow::{Result, anyhow};
use camino::{Utf8Path, Utf8PathBuf};
use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};
use tracing::Event;
use tracing::field::{Field, Visit};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::layer::{Context as LayerContext, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;

const ENV_LOG_PATH: &str = "TAGVER_LOG_PATH";
const ENV_LOG_DIR: &str = "TAGVER_LOG_DIR";
const LOG_FILE_SUFFIX: &str = ".jsonl";

/// Where and under which name to write logs.
#[derive(Clone, Debug)]
pub struct ObservabilityConfig {
    /// Service name, used as log file stem and `service` field.
    pub service: String,
    /// Configured log directory; platform defaults apply when unset.
    pub log_dir: Option<Utf8PathBuf>,
}

impl ObservabilityConfig {
    /// Config for this binary with an optional configured log directory.
    pub fn new(log_dir: Option<Utf8PathBuf>) -> Self {
        Self {
            service: env!("CARGO_PKG_NAME").to_string(),
            log_dir,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct LogTarget {
    dir: Utf8PathBuf,
    file_name: String,
}

impl LogTarget {
    #[cfg(test)]
    fn path(&self) -> Utf8PathBuf {
        self.dir.join(&self.file_name)
    }
}

/// Keeps the background log writer alive; hold it until exit.
pub struct ObservabilityGuard {
    _log_guard: WorkerGuard,
}

/// Install the global subscriber.
///
/// # Errors
///
/// Currently infallible: an unusable log location degrades to stderr.
pub fn init_observability(
    cfg: &ObservabilityConfig,
    env_filter: EnvFilter,
) -> Result<ObservabilityGuard> {
    let (writer, log_guard) = match log_writer(cfg) {
        Ok(pair) => pair,
        Err(err) => {
            eprintln!("Warning: {err}. Falling back to stderr logging.");
            tracing_appender::non_blocking(std::io::stderr())
        }
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(JsonLogLayer::new(writer, cfg.service.clone()))
        .init();

    tracing::debug!("observability initialized");
    Ok(ObservabilityGuard {
        _log_guard: log_guard,
    })
}

/// Build the event filter.
///
/// Priority: quiet flag > verbose flag > `RUST_LOG` > configured level.
pub fn env_filter(quiet: bool, verbose: u8, default_level: &str) -> EnvFilter {
    if quiet {
        return EnvFilter::new("error");
    }
    match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    }
}

// ============================================================================
// JSON Log Layer
// ============================================================================

struct JsonLogLayer<W> {
    writer: W,
    service: String,
}

impl<W> JsonLogLayer<W> {
    const fn new(writer: W, service: String) -> Self {
        Self { writer, service }
    }
}

#[derive(Clone, Debug, Default)]
struct SpanFields(Map<String, Value>);

impl<S, W> tracing_subscriber::Layer<S> for JsonLogLayer<W>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    W: for<'writer> tracing_subscriber::fmt::MakeWriter<'writer> + Send + Sync + 'static,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        id: &tracing::span::Id,
        ctx: LayerContext<'_, S>,
    ) {
        if let Some(span) = ctx.span(id) {
            let mut fields = JsonVisitor::default();
            attrs.record(&mut fields);
            span.extensions_mut().insert(SpanFields(fields.0));
        }
    }

    fn on_record(
        &self,
        id: &tracing::span::Id,
        values: &tracing::span::Record<'_>,
        ctx: LayerContext<'_, S>,
    ) {
        if let Some(span) = ctx.span(id) {
            let mut fields = JsonVisitor::default();
            values.record(&mut fields);
            let mut extensions = span.extensions_mut();
            match extensions.get_mut::<SpanFields>() {
                Some(existing) => existing.0.extend(fields.0),
                None => extensions.insert(SpanFields(fields.0)),
            }
        }
    }

    fn on_event(&self, event: &Event<'_>, ctx: LayerContext<'_, S>) {
        let meta = event.metadata();
        let mut record = Map::new();
        record.insert("timestamp".into(), Value::String(format_timestamp()));
        record.insert("level".into(), Value::String(meta.level().as_str().to_lowercase()));
        record.insert("service".into(), Value::String(self.service.clone()));
        record.insert("target".into(), Value::String(meta.target().to_string()));

        if let Some(scope) = ctx.event_scope(event) {
            for span in scope.from_root() {
                record.insert("span".into(), Value::String(span.name().to_string()));
                if let Some(fields) = span.extensions().get::<SpanFields>() {
                    record.extend(fields.0.clone());
                }
            }
        }

        let mut fields = JsonVisitor::default();
        event.record(&mut fields);
        record.extend(fields.0);

        let mut writer = self.writer.make_writer();
        if serde_json::to_writer(&mut writer, &Value::Object(record)).is_ok() {
            let _ = writer.write_all(b"\n");
        }
    }
}

#[derive(Default)]
struct JsonVisitor(Map<String, Value>);

impl JsonVisitor {
    fn put(&mut self, field: &Field, value: Value) {
        self.0.insert(field.name().to_string(), value);
    }
}

impl Visit for JsonVisitor {
    fn record_bool(&mut self, field: &Field, value: bool) {
        self.put(field, Value::Bool(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.put(field, Value::Number(value.into()));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.put(field, Value::Number(value.into()));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        if let Some(number) = serde_json::Number::from_f64(value) {
            self.put(field, Value::Number(number));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.put(field, Value::String(value.to_string()));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.put(field, Value::String(value.to_string()));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.put(field, Value::String(format!("{value:?}")));
    }
}

fn format_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

// ============================================================================
// Log Target Resolution
// ============================================================================

fn log_writer(cfg: &ObservabilityConfig) -> Result<(NonBlocking, WorkerGuard)> {
    let target = resolve_log_target_with(
        &cfg.service,
        env_path(ENV_LOG_PATH),
        env_path(ENV_LOG_DIR),
        cfg.log_dir.clone(),
    )
    .map_err(|e| anyhow!("{e}"))?;

    let appender = tracing_appender::rolling::daily(&target.dir, &target.file_name);
    Ok(tracing_appender::non_blocking(appender))
}

fn env_path(name: &str) -> Option<Utf8PathBuf> {
    std::env::var(name).ok().filter(|v| !v.is_empty()).map(Utf8PathBuf::from)
}

/// Priority: explicit path > directory override > configured directory >
/// platform data dir > temp dir.
fn resolve_log_target_with(
    service: &str,
    path_override: Option<Utf8PathBuf>,
    dir_override: Option<Utf8PathBuf>,
    config_dir: Option<Utf8PathBuf>,
) -> Result<LogTarget, String> {
    if let Some(path) = path_override {
        return log_target_from_path(&path);
    }
    if let Some(dir) = dir_override.or(config_dir) {
        return log_target_from_dir(dir, service);
    }

    let file_name = format!("{service}{LOG_FILE_SUFFIX}");
    let platform = directories::ProjectDirs::from("", "", service)
        .and_then(|dirs| Utf8PathBuf::from_path_buf(dirs.data_local_dir().join("logs")).ok());
    let temp = Utf8PathBuf::from_path_buf(std::env::temp_dir().join(service)).ok();

    platform
        .into_iter()
        .chain(temp)
        .find(|dir| ensure_writable(dir, &file_name).is_ok())
        .map(|dir| LogTarget {
            dir,
            file_name: file_name.clone(),
        })
        .ok_or_else(|| "no writable log directory found".to_string())
}

fn log_target_from_dir(dir: Utf8PathBuf, service: &str) -> Result<LogTarget, String> {
    let file_name = format!("{service}{LOG_FILE_SUFFIX}");
    ensure_writable(&dir, &file_name)?;
    Ok(LogTarget { dir, file_name })
}

fn log_target_from_path(path: &Utf8Path) -> Result<LogTarget, String> {
    let file_name = path
        .file_name()
        .ok_or_else(|| format!("{ENV_LOG_PATH} must include a file name"))?
        .to_string();
    let dir = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent.to_path_buf(),
        _ => Utf8PathBuf::from("."),
    };
    ensure_writable(&dir, &file_name)?;
    Ok(LogTarget { dir, file_name })
}

fn ensure_writable(dir: &Utf8Path, file_name: &str) -> Result<(), String> {
    std::fs::create_dir_all(dir)
        .map_err(|e| format!("failed to create log directory {dir}: {e}"))?;

    let path = dir.join(file_name);
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| format!("failed to open log file {path}: {e}"))?;
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn temp(name: &str) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(std::env::temp_dir().join(name)).unwrap()
    }

    #[test]
    fn env_filter_quiet_overrides() {
        assert_eq!(env_filter(true, 2, "info").to_string(), "error");
    }

    #[test]
    fn env_filter_verbose_maps_to_debug_and_trace() {
        assert_eq!(env_filter(false, 1, "info").to_string(), "debug");
        assert_eq!(env_filter(false, 2, "info").to_string(), "trace");
        assert_eq!(env_filter(false, 5, "info").to_string(), "trace");
    }

    #[test]
    fn log_target_from_path_uses_parent_dir() {
        let dir = temp("tagver-log-path");
        let target = log_target_from_path(&dir.join("custom.jsonl")).unwrap();
        assert_eq!(target.dir, dir);
        assert_eq!(target.file_name, "custom.jsonl");
    }

    #[test]
    fn log_target_from_dir_appends_file_name() {
        let dir = temp("tagver-log-dir");
        let target = log_target_from_dir(dir.clone(), "demo").unwrap();
        assert_eq!(target.dir, dir);
        assert_eq!(target.file_name, format!("demo{LOG_FILE_SUFFIX}"));
    }

    #[test]
    fn path_override_wins() {
        let file = temp("tagver-log-override").join("override.jsonl");
        let target = resolve_log_target_with(
            "demo",
            Some(file.clone()),
            Some(temp("tagver-log-ignored")),
            None,
        )
        .unwrap();
        assert_eq!(target.path(), file);
    }

    #[test]
    fn dir_override_beats_config_dir() {
        let dir = temp("tagver-log-dir-override");
        let target =
            resolve_log_target_with("demo", None, Some(dir.clone()), Some(temp("tagver-cfg")))
                .unwrap();
        assert_eq!(target.dir, dir);
    }

    #[test]
    fn config_dir_is_used() {
        let dir = temp("tagver-log-config-dir");
        let target = resolve_log_target_with("demo", None, None, Some(dir.clone())).unwrap();
        assert_eq!(target.dir, dir);
        assert_eq!(target.file_name, format!("demo{LOG_FILE_SUFFIX}"));
    }

    #[test]
    fn timestamp_is_rfc3339_millis_utc() {
        let ts = format_timestamp();
        assert!(ts.ends_with('Z'), "{ts}");
        assert_eq!(ts.len(), 24, "{ts}");
        assert_eq!(&ts[10..11], "T");
    }
}
