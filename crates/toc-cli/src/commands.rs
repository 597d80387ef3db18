//! Command implementations.
//!
//! Each handler loads what it needs, runs the library operation and prints a
//! plain-text result to stdout. Logs go to stderr.

use std::fs;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use toc_nav::{
    BookOutline, ExpansionTracker, Location, SelectionStore, Toc, TocBuilder, TrackerConfig,
};
use toc_scheduler::{DebounceConfig, Debouncer};
use toc_telemetry::{Diagnostic, RemoteLogger};
use toc_types::{Settings, TocItems};

/// Load settings and apply the CLI log level override.
pub fn load_settings(config_path: Option<&str>, log_level_override: Option<&str>) -> Result<Settings> {
    let mut settings = Settings::load(config_path).context("Failed to load configuration")?;
    if let Some(log_level) = log_level_override {
        settings.log_level = log_level.to_string();
    }
    Ok(settings)
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level.
pub fn init_logging(settings: &Settings) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&settings.log_level)),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;
    Ok(())
}

/// Interpret `input` as an absolute URL, or as a path with optional `#fragment`.
pub fn parse_location(input: &str) -> Result<Location> {
    if input.contains("://") {
        return Location::parse(input).context("Failed to parse location");
    }
    Ok(match input.split_once('#') {
        Some((path, fragment)) => Location::new(path, fragment),
        None => Location::from_path(input),
    })
}

/// Outcome of resolving one location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub location: String,
    pub selected: Option<usize>,
    pub expanded: Vec<usize>,
}

/// Expand `toc` for `location`.
pub fn resolve(
    toc: &Toc,
    location: &Location,
    tracker: &mut ExpansionTracker,
    selection: &SelectionStore,
) -> Resolution {
    let selected = tracker.expand_for_current_url(location, toc, selection);
    Resolution {
        location: location.to_string(),
        selected,
        expanded: tracker.expanded().to_vec(),
    }
}

/// Human-readable rendering of a resolution.
pub fn format_resolution(toc: &Toc, resolution: &Resolution) -> String {
    let Some(selected) = resolution.selected else {
        return format!("{}: no entry matches", resolution.location);
    };

    let mut out = format!(
        "{}: selected [{}] {}",
        resolution.location,
        selected,
        toc.title(selected).unwrap_or_default()
    );
    for idx in &resolution.expanded {
        out.push_str(&format!(
            "\n  expanded [{}] {} ({})",
            idx,
            toc.title(*idx).unwrap_or_default(),
            toc.url(*idx).unwrap_or_default()
        ));
    }
    out
}

fn load_toc(path: &str) -> Result<Toc> {
    Toc::load(path).with_context(|| format!("Failed to load TOC from {path}"))
}

fn tracker_for(settings: &Settings) -> ExpansionTracker {
    ExpansionTracker::with_config(TrackerConfig {
        max_depth: settings.max_ascent_depth,
    })
}

/// `resolve`: expand the TOC for a single location.
pub fn handle_resolve(settings: &Settings, toc_path: &str, url: &str) -> Result<()> {
    let toc = load_toc(toc_path)?;
    let location = parse_location(url)?;

    let mut tracker = tracker_for(settings);
    let selection = SelectionStore::new();
    let resolution = resolve(&toc, &location, &mut tracker, &selection);

    println!("{}", format_resolution(&toc, &resolution));
    Ok(())
}

/// `follow`: resolve locations read from stdin, one line each.
///
/// Bursts of lines are debounced so only the location that settles is
/// resolved, the way the site reacts to rapid navigation.
pub async fn handle_follow(
    settings: &Settings,
    toc_path: &str,
    debounce_override: Option<u64>,
) -> Result<()> {
    let toc = load_toc(toc_path)?;
    let logger = RemoteLogger::from_settings(&settings.telemetry)
        .context("Failed to create remote logger")?;
    let config = DebounceConfig::new(debounce_override.unwrap_or(settings.debounce_ms));

    follow_lines(
        toc,
        tracker_for(settings),
        logger,
        &config,
        Duration::from_secs(settings.telemetry.timeout_secs),
        BufReader::new(tokio::io::stdin()),
    )
    .await
}

/// Resolve debounced locations from `input` until it closes.
///
/// Returns once the last location has settled and its log record has been
/// delivered, or `flush_timeout` has passed waiting for it.
pub async fn follow_lines<R>(
    toc: Toc,
    tracker: ExpansionTracker,
    logger: RemoteLogger,
    config: &DebounceConfig,
    flush_timeout: Duration,
    input: R,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let toc = Arc::new(toc);
    let tracker = Arc::new(Mutex::new(tracker));
    let selection = SelectionStore::new();
    let debouncer = Debouncer::from_config(config).context("Invalid debounce configuration")?;

    info!(
        entries = toc.entries().len(),
        debounce_ms = config.delay_ms,
        telemetry = logger.is_enabled(),
        "Following locations"
    );

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await.context("Failed to read input")? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let location = match parse_location(line) {
            Ok(location) => location,
            Err(e) => {
                warn!(input = line, error = %e, "Skipping unparsable location");
                continue;
            }
        };
        debug!(location = %location, "Location received");

        let toc = Arc::clone(&toc);
        let tracker = Arc::clone(&tracker);
        let selection = selection.clone();
        let logger = logger.clone();
        debouncer.schedule(move || {
            let resolution = {
                let mut tracker = tracker.lock().unwrap_or_else(PoisonError::into_inner);
                resolve(&toc, &location, &mut tracker, &selection)
            };
            println!("{}", format_resolution(&toc, &resolution));
            logger.send_log(&resolution);
        });
    }

    // Input closed: let the last location settle, then its log record
    while debouncer.is_pending() {
        tokio::time::sleep(config.delay()).await;
    }
    logger.shutdown(flush_timeout).await;

    Ok(())
}

/// `build`: generate TOC data from an outline.
pub fn handle_build(outline_path: &str, out: Option<&str>, minify: bool) -> Result<()> {
    let source = fs::read_to_string(outline_path)
        .with_context(|| format!("Failed to read outline {outline_path}"))?;
    let outline = BookOutline::from_json(&source).context("Failed to parse outline")?;
    let toc = TocBuilder::build(&outline).context("Failed to build TOC")?;

    match out {
        Some(path) => {
            toc.save(path, minify)
                .with_context(|| format!("Failed to write {path}"))?;
            info!(path, entries = toc.entries().len(), "Wrote TOC data");
        }
        None => println!("{}", toc.to_script(minify)?),
    }
    Ok(())
}

/// Send `payload` and wait up to `wait` for its diagnostic.
pub async fn send_and_wait<T>(logger: RemoteLogger, payload: &T, wait: Duration) -> Option<Diagnostic>
where
    T: Serialize + ?Sized,
{
    let (tx, mut rx) = mpsc::unbounded_channel();
    let logger = logger.with_observer(move |d| {
        let _ = tx.send(d.clone());
    });

    logger.send_log(payload);
    tokio::time::timeout(wait, rx.recv()).await.ok().flatten()
}

/// `log`: send one record to the configured sink.
pub async fn handle_log(settings: &Settings, payload: &str, wait_secs: u64) -> Result<()> {
    if !settings.telemetry.enabled {
        bail!("Telemetry is disabled; set telemetry.enabled, telemetry.api_key and telemetry.source");
    }

    let payload: serde_json::Value =
        serde_json::from_str(payload).context("Payload is not valid JSON")?;
    let logger = RemoteLogger::from_settings(&settings.telemetry)
        .context("Failed to create remote logger")?;

    match send_and_wait(logger, &payload, Duration::from_secs(wait_secs)).await {
        Some(Diagnostic::Sent { status }) => println!("sent (HTTP {status})"),
        Some(Diagnostic::Failed { reason }) => println!("not sent: {reason}"),
        None => println!("no response within {wait_secs}s"),
    }
    Ok(())
}

/// Settings with the API key masked, as TOML.
pub fn render_config(settings: &Settings) -> Result<String> {
    let mut shown = settings.clone();
    if shown.telemetry.api_key.is_some() {
        shown.telemetry.api_key = Some("[REDACTED]".to_string());
    }
    toml::to_string_pretty(&shown).context("Failed to render configuration")
}

/// `config`: print the effective configuration.
pub fn show_config(settings: &Settings) -> Result<()> {
    print!("{}", render_config(settings)?);
    Ok(())
}
