// ABOUTME: CLI for fetching and inspecting podcast feeds.
// ABOUTME: Parses feeds from URL/file/stdin and prints feed or calendar JSON for verification.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use chrono_tz::Tz;
use clap::Parser;
use podcal_feed::{aggregate, parse_feed_bytes, Feed};
use serde_json::json;

/// Parse one or more RSS/Atom feeds and output JSON.
#[derive(Parser, Debug)]
#[command(name = "podcal-cli")]
#[command(about = "Parse podcast feeds and print feed or calendar JSON", long_about = None)]
struct Args {
    /// Feed URL(s) (http/https) or local file paths. Use "-" to read one feed from stdin.
    #[arg(required = true)]
    targets: Vec<String>,

    /// Print the aggregated calendar model instead of the raw feed.
    #[arg(long, default_value_t = false)]
    calendar: bool,

    /// Time zone used for calendar bucketing.
    #[arg(long, default_value = "UTC")]
    timezone: Tz,

    /// Output compact JSON instead of pretty.
    #[arg(long, default_value_t = false)]
    compact: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut results = Vec::new();

    for target in &args.targets {
        let outcome = load_bytes(target)
            .and_then(|bytes| parse_feed_bytes(&bytes).map_err(anyhow::Error::new))
            .and_then(|feed| render(&feed, &args));

        match outcome {
            Ok(output) => results.push(json!({
                "target": target,
                "ok": true,
                "output": output,
                "error": null
            })),
            Err(err) => results.push(json!({
                "target": target,
                "ok": false,
                "output": null,
                "error": err.to_string()
            })),
        }
    }

    // Output format:
    // - Single target and ok => emit the rendered object directly
    // - Otherwise emit an envelope with results and counts
    let output = if args.targets.len() == 1 {
        if let Some(first) = results.first() {
            if first.get("ok").and_then(|v| v.as_bool()) == Some(true) {
                first.get("output").cloned().unwrap_or_else(|| json!({}))
            } else {
                json!({ "feeds": results, "total_feeds": results.len(), "parsed": 0, "failed": 1 })
            }
        } else {
            json!({})
        }
    } else {
        let parsed = results
            .iter()
            .filter(|r| r.get("ok").and_then(|v| v.as_bool()) == Some(true))
            .count();
        let failed = results.len() - parsed;
        json!({
            "feeds": results,
            "total_feeds": results.len(),
            "parsed": parsed,
            "failed": failed
        })
    };

    if args.compact {
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&output)?);
    }

    Ok(())
}

/// Renders a parsed feed as the requested JSON value.
fn render(feed: &Feed, args: &Args) -> Result<serde_json::Value> {
    if args.calendar {
        Ok(serde_json::to_value(aggregate(feed, args.timezone))?)
    } else {
        Ok(serde_json::to_value(feed)?)
    }
}

fn load_bytes(target: &str) -> Result<Vec<u8>> {
    if target == "-" {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf)?;
        return Ok(buf);
    }

    if target.starts_with("http://") || target.starts_with("https://") {
        let resp = reqwest::blocking::get(target)?.error_for_status()?;
        let bytes = resp.bytes()?;
        return Ok(bytes.to_vec());
    }

    let path = PathBuf::from(target);
    if !path.exists() {
        return Err(anyhow!("file not found: {}", target));
    }
    Ok(fs::read(path)?)
}
