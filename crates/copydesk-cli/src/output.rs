//! Text and JSON rendering of command results.

use std::fmt::Write as _;

use copydesk::{
    ActivityBucket, Draft, Favorite, IdeaClip, Metadata, PlatformShare, ProductAttention,
    ProductCount, StreakState,
};
use serde::Serialize;

use crate::AppError;

/// Print `value` as pretty JSON, or the text from `text`.
pub fn emit<T: Serialize + ?Sized>(
    json: bool,
    value: &T,
    text: impl FnOnce(&T) -> String,
) -> Result<(), AppError> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        let rendered = text(value);
        if !rendered.is_empty() {
            println!("{}", rendered.trim_end());
        }
    }
    Ok(())
}

/// One-line and full renderings of a stored record.
pub trait Listing {
    fn line(&self) -> String;
    fn detail(&self) -> String;
}

fn posted_marker(posted: bool) -> &'static str {
    if posted { " (posted)" } else { "" }
}

fn metadata_lines(out: &mut String, metadata: &Metadata) {
    for (key, value) in metadata {
        match value.as_str() {
            Some(s) => {
                let _ = writeln!(out, "{key}: {s}");
            }
            None => {
                let _ = writeln!(out, "{key}: {value}");
            }
        }
    }
}

impl Listing for Draft {
    fn line(&self) -> String {
        format!("{}  [{}]{}  {}", self.id, self.kind, posted_marker(self.posted), self.snippet)
    }

    fn detail(&self) -> String {
        let mut out = format!("id: {}\ntype: {}\nsaved: {}\n", self.id, self.kind, self.timestamp);
        metadata_lines(&mut out, &self.metadata);
        if let Some(at) = self.posted_timestamp {
            let _ = writeln!(out, "posted: {at}");
        }
        let _ = write!(out, "\n{}", self.content);
        out
    }
}

impl Listing for Favorite {
    fn line(&self) -> String {
        format!("{}  [{}]{}  {}", self.id, self.kind, posted_marker(self.posted), self.snippet)
    }

    fn detail(&self) -> String {
        let mut out = format!("id: {}\ntype: {}\nstarred: {}\n", self.id, self.kind, self.timestamp);
        metadata_lines(&mut out, &self.metadata);
        if let Some(at) = self.posted_timestamp {
            let _ = writeln!(out, "posted: {at}");
        }
        let _ = write!(out, "\n{}", self.content);
        out
    }
}

impl Listing for IdeaClip {
    fn line(&self) -> String {
        format!("{}  [{}]{}  {}", self.id, self.intent, posted_marker(self.posted), self.snippet)
    }

    fn detail(&self) -> String {
        let mut out = format!("id: {}\nintent: {}\nclipped: {}\n", self.id, self.intent, self.timestamp);
        if let Some(url) = &self.url {
            let _ = writeln!(out, "url: {url}");
        }
        if let Some(notes) = &self.notes {
            let _ = writeln!(out, "notes: {notes}");
        }
        if let Some(at) = self.posted_timestamp {
            let _ = writeln!(out, "posted: {at}");
        }
        let _ = write!(out, "\n{}", self.text);
        out
    }
}

pub fn records<R: Listing>(records: &[R]) -> String {
    if records.is_empty() {
        return "(none)".to_string();
    }
    records.iter().map(|r| r.line()).collect::<Vec<_>>().join("\n")
}

pub fn streak(count: u32, state: Option<&StreakState>) -> String {
    let days = if count == 1 { "day" } else { "days" };
    match state {
        Some(state) => format!("{count} {days} (last active {})", state.last_active_date),
        None => format!("{count} {days}"),
    }
}

pub fn platforms(shares: &[PlatformShare]) -> String {
    if shares.is_empty() {
        return "No platform copies in this timeframe".to_string();
    }
    let width = shares.iter().map(|s| s.name.len()).max().unwrap_or(0);
    shares
        .iter()
        .map(|s| format!("{:<width$}  {:>4}  {:>3}%", s.name, s.count, s.percentage))
        .collect::<Vec<_>>()
        .join("\n")
}

fn product_rows(out: &mut String, title: &str, products: &[ProductCount]) {
    let _ = writeln!(out, "{title}:");
    if products.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for product in products {
        let _ = writeln!(out, "  {:>3}  {}", product.count, product.name);
    }
}

pub fn attention(attention: &ProductAttention) -> String {
    let mut out = String::new();
    product_rows(&mut out, "Top products", &attention.top_products);
    product_rows(&mut out, "Needs attention", &attention.neglected_products);
    out
}

pub fn activity(buckets: &[ActivityBucket]) -> String {
    let peak = buckets.iter().map(|b| b.count).max().unwrap_or(0).max(1);
    buckets
        .iter()
        .map(|b| {
            let bar = "#".repeat(b.count * 30 / peak);
            format!("{:>7}  {:>3}  {bar}", b.label, b.count)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
