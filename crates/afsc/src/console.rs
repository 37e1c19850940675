//! Colorful console output for simulation batches.
//!
//! Provides a `tracing` layer that formats batch events with colors. Enabled
//! with the `console` feature.

use std::fmt;
use std::io::{self, Write};
use std::sync::OnceLock;

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Filter used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "afsc=info";

static INIT: OnceLock<()> = OnceLock::new();

/// Initializes console output.
///
/// Safe to call multiple times - only the first call has effect. Honors
/// `RUST_LOG`, falling back to [`DEFAULT_FILTER`].
pub fn init() {
    INIT.get_or_init(|| {
        print_banner();

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        // Another global subscriber may already be installed by the host.
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(AfscConsoleLayer)
            .try_init();
    });
}

fn print_banner() {
    let title = format!(
        "AFSC Assignment Simulation v{} - Monte Carlo placement study",
        env!("CARGO_PKG_VERSION")
    );
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout);
    let _ = writeln!(stdout, "{}", title.bright_cyan().bold());
    let _ = writeln!(stdout);
    let _ = stdout.flush();
}

/// A tracing layer that formats `afsc*` events with colors.
pub struct AfscConsoleLayer;

impl<S: Subscriber> Layer<S> for AfscConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if !metadata.target().starts_with("afsc") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(*metadata.level(), &visitor);
        if !output.is_empty() {
            let _ = writeln!(io::stdout(), "{output}");
        }
    }
}

#[derive(Debug, Default)]
struct EventVisitor {
    event: Option<String>,
    oracle: Option<String>,
    error: Option<String>,
    runs: Option<u64>,
    jobs: Option<u64>,
    seed: Option<u64>,
    workers: Option<u64>,
    run: Option<u64>,
    optimal: Option<u64>,
    infeasible: Option<u64>,
    failed: Option<u64>,
    pairs: Option<u64>,
    elapsed_ms: Option<u64>,
    preference_count: Option<u64>,
    deviation_penalty: Option<f64>,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        let s = format!("{value:?}");
        match field.name() {
            "event" => self.event = Some(s.trim_matches('"').to_string()),
            "oracle" => self.oracle = Some(s.trim_matches('"').to_string()),
            "error" => self.error = Some(s),
            _ => {}
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "event" => self.event = Some(value.to_string()),
            "oracle" => self.oracle = Some(value.to_string()),
            "error" => self.error = Some(value.to_string()),
            _ => {}
        }
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "runs" => self.runs = Some(value),
            "jobs" => self.jobs = Some(value),
            "seed" => self.seed = Some(value),
            "workers" => self.workers = Some(value),
            "run" => self.run = Some(value),
            "optimal" => self.optimal = Some(value),
            "infeasible" => self.infeasible = Some(value),
            "failed" => self.failed = Some(value),
            "pairs" => self.pairs = Some(value),
            "elapsed_ms" => self.elapsed_ms = Some(value),
            "preference_count" => self.preference_count = Some(value),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value.max(0) as u64);
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        if field.name() == "deviation_penalty" {
            self.deviation_penalty = Some(value);
        }
    }
}

fn format_event(level: Level, v: &EventVisitor) -> String {
    match v.event.as_deref().unwrap_or("") {
        "config_loaded" => format_config_loaded(v),
        "batch_start" => format_batch_start(v),
        "run_failed" => format_run_failed(v),
        "batch_end" => format_batch_end(v),
        "ranked_without_qualification" => format_unqualified(v),
        other if level <= Level::WARN => format!(
            "{} {} {}",
            timestamp().bright_black(),
            level_label(level),
            other
        ),
        _ => String::new(),
    }
}

fn format_config_loaded(v: &EventVisitor) -> String {
    format!(
        "{} {} {} runs ({}), job categories ({}), preferences per cadet ({}), deviation penalty ({})",
        timestamp().bright_black(),
        level_label(Level::INFO),
        "[Config]".bright_cyan(),
        count(v.runs).bright_yellow(),
        count(v.jobs).bright_yellow(),
        count(v.preference_count).bright_yellow(),
        v.deviation_penalty.unwrap_or(0.0).to_string().bright_magenta()
    )
}

fn format_batch_start(v: &EventVisitor) -> String {
    let workers = match v.workers {
        Some(0) | None => "auto".to_string(),
        Some(n) => n.to_string(),
    };
    format!(
        "{} {} {} runs ({}), job categories ({}), seed ({}), workers ({}), oracle ({})",
        timestamp().bright_black(),
        level_label(Level::INFO),
        "[Batch]".bright_cyan(),
        count(v.runs).bright_yellow(),
        count(v.jobs).bright_yellow(),
        v.seed.unwrap_or(0).to_string().white(),
        workers.white(),
        v.oracle.as_deref().unwrap_or("unknown").white().bold()
    )
}

fn format_run_failed(v: &EventVisitor) -> String {
    format!(
        "{} {} {} run {} (seed {}): {}",
        timestamp().bright_black(),
        level_label(Level::WARN),
        "[Run]".bright_cyan(),
        v.run.unwrap_or(0).to_string().yellow(),
        v.seed.unwrap_or(0),
        v.error.as_deref().unwrap_or("unknown error").bright_red()
    )
}

fn format_unqualified(v: &EventVisitor) -> String {
    format!(
        "{} {} {} {} ranked pairs without a qualification score the deviation penalty",
        timestamp().bright_black(),
        level_label(Level::WARN),
        "[Model]".bright_cyan(),
        count(v.pairs).yellow()
    )
}

fn format_batch_end(v: &EventVisitor) -> String {
    let runs = v.runs.unwrap_or(0);
    let optimal = v.optimal.unwrap_or(0);
    let pass_rate = if runs == 0 {
        0.0
    } else {
        optimal as f64 / runs as f64 * 100.0
    };

    let mut output = format!(
        "{} {} {} Batch ended: time spent ({})",
        timestamp().bright_black(),
        level_label(Level::INFO),
        "[Batch]".bright_cyan(),
        format_duration_ms(v.elapsed_ms.unwrap_or(0)).yellow()
    );

    let border = "║".bright_cyan().to_string();
    output.push_str("\n\n");
    output.push_str(
        &"╔══════════════════════════════════════════════════════════╗"
            .bright_cyan()
            .to_string(),
    );
    output.push('\n');
    for (label, value) in [
        ("Runs:", count(Some(runs))),
        ("Optimal:", count(Some(optimal))),
        ("Infeasible:", count(v.infeasible)),
        ("Failed:", count(v.failed)),
        ("Pass rate:", format!("{pass_rate:.2}%")),
    ] {
        output.push_str(&format!("{border}  {label:<18}{value:>36}  {border}\n"));
    }
    output.push_str(
        &"╚══════════════════════════════════════════════════════════╝"
            .bright_cyan()
            .to_string(),
    );
    output.push('\n');
    output
}

fn level_label(level: Level) -> String {
    match level {
        Level::ERROR => "ERROR".bright_red().to_string(),
        Level::WARN => "WARN ".yellow().to_string(),
        Level::INFO => "INFO ".bright_green().to_string(),
        _ => "DEBUG".bright_black().to_string(),
    }
}

fn count(value: Option<u64>) -> String {
    value.unwrap_or(0).to_formatted_string(&Locale::en)
}

fn timestamp() -> String {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| {
            let secs = d.as_secs() % 100000;
            let millis = d.subsec_millis();
            format!("{secs:5}.{millis:03}")
        })
        .unwrap_or_else(|_| "    0.000".to_string())
}

fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{ms}ms")
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        let mins = ms / 60_000;
        let secs = (ms % 60_000) / 1000;
        format!("{mins}m {secs}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration_ms() {
        assert_eq!(format_duration_ms(250), "250ms");
        assert_eq!(format_duration_ms(1500), "1.50s");
        assert_eq!(format_duration_ms(125_000), "2m 5s");
    }

    #[test]
    fn test_batch_end_box() {
        let v = EventVisitor {
            event: Some("batch_end".to_string()),
            runs: Some(1200),
            optimal: Some(900),
            infeasible: Some(300),
            failed: Some(0),
            elapsed_ms: Some(42),
            ..EventVisitor::default()
        };
        let output = format_event(Level::INFO, &v);
        assert!(output.contains("1,200"));
        assert!(output.contains("75.00%"));
        assert!(output.contains("42ms"));
    }

    #[test]
    fn test_unknown_info_event_is_silent() {
        let v = EventVisitor {
            event: Some("model_built".to_string()),
            ..EventVisitor::default()
        };
        assert!(format_event(Level::INFO, &v).is_empty());
        assert!(format_event(Level::WARN, &v).contains("model_built"));
    }

    #[test]
    fn test_init_is_idempotent() {
        init();
        init();
    }
}
