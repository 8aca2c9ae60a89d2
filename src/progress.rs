//! Progress reporting for indexing runs
//!
//! Provides real-time progress display using indicatif progress bars.

use crate::indexer::CrawlProgress;
use console::style;
use humansize::{format_size, BINARY};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress reporter that displays indexing status
pub struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    /// Create a new progress reporter
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();

        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .expect("Invalid progress template")
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );

        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// Update the progress display
    pub fn update(&self, progress: &CrawlProgress) {
        let msg = format!(
            "Docs: {} | Words: {} | Occurrences: {} | Size: {} | Rate: {:.0} docs/s",
            format_number(progress.documents),
            format_number(progress.words),
            format_number(progress.occurrences),
            format_size(progress.bytes, BINARY),
            progress.docs_per_second(),
        );

        self.bar.set_message(msg);
    }

    /// Set a status message
    pub fn set_status(&self, status: &str) {
        self.bar.set_message(status.to_string());
    }

    /// Finish the progress display with a final message
    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a number with thousands separators
fn format_number(n: u64) -> String {
    let s = n.to_string();
    let bytes: Vec<_> = s.bytes().rev().collect();

    let chunks: Vec<String> = bytes
        .chunks(3)
        .map(|chunk| chunk.iter().rev().map(|&b| b as char).collect::<String>())
        .collect();

    chunks.into_iter().rev().collect::<Vec<_>>().join(",")
}

/// Print a summary of an indexing run
pub fn print_summary(
    documents: u64,
    words: u64,
    occurrences: u64,
    bytes: u64,
    errors: u64,
    duration: Duration,
    data_dir: &str,
) {
    let duration_secs = duration.as_secs_f64();
    let rate = if duration_secs > 0.0 {
        documents as f64 / duration_secs
    } else {
        0.0
    };

    println!();
    println!("{}", style("Indexing Complete").green().bold());
    println!("{}", style("─".repeat(50)).dim());
    println!(
        "  {} {}",
        style("Documents:").bold(),
        format_number(documents)
    );
    println!("  {} {}", style("Words:").bold(), format_number(words));
    println!(
        "  {} {}",
        style("Occurrences:").bold(),
        format_number(occurrences)
    );
    println!(
        "  {} {}",
        style("Content:").bold(),
        format_size(bytes, BINARY)
    );
    println!(
        "  {} {:.1}s ({:.0} docs/sec)",
        style("Duration:").bold(),
        duration_secs,
        rate
    );
    if errors > 0 {
        println!(
            "  {} {}",
            style("Skipped files:").yellow().bold(),
            format_number(errors)
        );
    }
    println!("  {} {}", style("Shards:").bold(), data_dir);
    println!();
}

/// Print a header at the start of an indexing run
pub fn print_header(root: &str, extensions: &[String], data_dir: &str) {
    println!();
    println!(
        "{} {}",
        style("wordshard").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("{}", style("─".repeat(50)).dim());
    println!("  {} {}", style("Corpus:").bold(), root);
    println!("  {} {}", style("Extensions:").bold(), extensions.join(" "));
    println!("  {} {}", style("Shards:").bold(), data_dir);
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
    }
}
