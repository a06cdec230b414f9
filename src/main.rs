// src/main.rs

use anyhow::{bail, Context};
use clap::Parser;
use clip2notion::config::{CommandLineInput, ParseOptions};
use clip2notion::constants::{WATCH_CACHE_CAPACITY, WATCH_POLL_INTERVAL_MS};
use clip2notion::error::AppError;
use clip2notion::output::{deliver, read_clipboard, DeliveryTarget, OutputPlan};
use clip2notion::pipeline::{parse_content, ParseResult};
use log::LevelFilter;
use log4rs::{
    append::console::{ConsoleAppender, Target},
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use lru::LruCache;
use rayon::prelude::*;
use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::io::Read;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

/// Sets up logging configuration.
///
/// Console logging goes to stderr so stdout stays clean for the JSON
/// payload.
fn setup_logging(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let log_file_path = std::env::temp_dir().join("clip2notion.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    let stderr_appender = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}",
        )))
        .build(&log_file_path)?;

    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr_appender)))
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .build(
            Root::builder()
                .appender("stderr")
                .appender("file")
                .build(log_level),
        )?;

    log4rs::init_config(config)?;
    log::debug!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

/// Render one parse result the way the flags ask for it.
fn render_result(result: &ParseResult, cli: &CommandLineInput) -> anyhow::Result<String> {
    let value = if cli.report {
        serde_json::to_value(result).context("serializing parse report")?
    } else {
        result.to_api_payload()
    };
    let rendered = if cli.pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };
    Ok(rendered)
}

fn parse_and_render(
    content: &str,
    options: &ParseOptions,
    cli: &CommandLineInput,
) -> anyhow::Result<String> {
    let result = parse_content(content, options).map_err(AppError::Parse)?;
    if let Some(validation) = &result.validation {
        for warning in &validation.warnings {
            log::warn!("{}", warning.message);
        }
        for error in &validation.errors {
            log::error!("{}", error.message);
        }
        if !validation.is_valid {
            bail!(
                "validation failed with {} error(s); rerun without --strict to deliver anyway",
                validation.errors.len()
            );
        }
    }
    render_result(&result, cli)
}

/// Send a rendered payload to the file or stdout target.
fn deliver_payload(rendered: String, output: Option<&PathBuf>) -> anyhow::Result<()> {
    let plan = match output {
        Some(path) => OutputPlan::new().with_operation(DeliveryTarget::WriteFile {
            path: path.clone(),
            content: rendered,
        }),
        None => OutputPlan::new().with_operation(DeliveryTarget::PrintToStdout {
            content: rendered,
        }),
    };
    let report = deliver(plan)?;
    if !report.is_success() {
        bail!(
            "delivery failed: {}",
            report
                .failed
                .iter()
                .map(|f| f.error.as_str())
                .collect::<Vec<_>>()
                .join("; ")
        );
    }
    Ok(())
}

fn read_stdin() -> anyhow::Result<String> {
    let mut content = String::new();
    std::io::stdin()
        .read_to_string(&mut content)
        .context("reading stdin")?;
    Ok(content)
}

/// One-shot conversion of a single content source.
fn run_once(cli: &CommandLineInput, options: &ParseOptions) -> anyhow::Result<()> {
    let content = if cli.clipboard {
        read_clipboard()?
    } else {
        match cli.inputs.as_slice() {
            [] => read_stdin()?,
            [path] if path == "-" => read_stdin()?,
            [path] => fs::read_to_string(path).with_context(|| format!("reading {}", path))?,
            many => return run_batch(many, cli, options),
        }
    };
    let rendered = parse_and_render(&content, options, cli)?;
    deliver_payload(rendered, cli.output.as_ref())
}

/// Parse independent input files in parallel, then deliver in input
/// order.
fn run_batch(paths: &[String], cli: &CommandLineInput, options: &ParseOptions) -> anyhow::Result<()> {
    if cli.output.is_some() {
        bail!("--output accepts a single input file");
    }
    let rendered: Vec<anyhow::Result<String>> = paths
        .par_iter()
        .map(|path| {
            let content =
                fs::read_to_string(path).with_context(|| format!("reading {}", path))?;
            parse_and_render(&content, options, cli)
        })
        .collect();
    for outcome in rendered {
        deliver_payload(outcome?, None)?;
    }
    Ok(())
}

fn content_hash(content: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    hasher.finish()
}

/// Poll the clipboard, re-parsing only when its content changes.
///
/// The cache is owned by this loop, bounded, and keyed by content hash;
/// revisiting recently seen content reuses the rendered payload.
fn run_watch(cli: &CommandLineInput, options: &ParseOptions) -> anyhow::Result<()> {
    let capacity = NonZeroUsize::new(WATCH_CACHE_CAPACITY)
        .ok_or_else(|| anyhow::anyhow!("watch cache capacity must be non-zero"))?;
    let mut cache: LruCache<u64, String> = LruCache::new(capacity);
    let mut last_hash: Option<u64> = None;

    log::info!("Watching clipboard; press Ctrl-C to stop");
    loop {
        match read_clipboard() {
            Ok(content) => {
                let hash = content_hash(&content);
                if last_hash != Some(hash) {
                    last_hash = Some(hash);
                    let rendered = match cache.get(&hash) {
                        Some(cached) => cached.clone(),
                        None => {
                            let rendered = parse_and_render(&content, options, cli)?;
                            cache.put(hash, rendered.clone());
                            rendered
                        }
                    };
                    deliver_payload(rendered, cli.output.as_ref())?;
                }
            }
            Err(e) => log::warn!("clipboard read failed: {}", e),
        }
        std::thread::sleep(Duration::from_millis(WATCH_POLL_INTERVAL_MS));
    }
}

fn main() -> anyhow::Result<()> {
    let cli = CommandLineInput::parse();

    setup_logging(cli.verbose).map_err(|e| anyhow::anyhow!("logging setup failed: {}", e))?;

    let options = cli.to_parse_options().map_err(AppError::Parse)?;

    if cli.watch {
        run_watch(&cli, &options)
    } else {
        run_once(&cli, &options)
    }
}
