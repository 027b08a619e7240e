//! Progress display module
//!
//! Styled terminal output: banner, status lines, the file progress bar and the
//! final summary.

use bytesize::ByteSize;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::batch::BatchSummary;

/// Print the application banner
pub fn print_banner() {
    let banner = r#"
╔══════════════════════════════════════════════════════════════════════════════╗
║                                                                              ║
║   ████████╗ ██████╗ ██╗  ██╗██╗ ██████╗                                      ║
║   ╚══██╔══╝██╔═══██╗╚██╗██╔╝██║██╔════╝                                      ║
║      ██║   ██║   ██║ ╚███╔╝ ██║██║                                           ║
║      ██║   ██║   ██║ ██╔██╗ ██║██║                                           ║
║      ██║   ╚██████╔╝██╔╝ ██╗██║╚██████╗                                      ║
║      ╚═╝    ╚═════╝ ╚═╝  ╚═╝╚═╝ ╚═════╝                                      ║
║                                                                              ║
║                   Whole-Word Denylist Filtering for JSONL                    ║
║                                                              v1.0.0          ║
╚══════════════════════════════════════════════════════════════════════════════╝
"#;

    println!("{}", banner.green());
}

/// Print a section header
pub fn print_header(text: &str) {
    println!("\n{} {}", "▶".green(), text.green().bold());
}

/// Print an info message
pub fn print_info(text: &str) {
    println!("  {} {}", "ℹ".cyan(), text);
}

/// Print a success message
pub fn print_success(text: &str) {
    println!("  {} {}", "✔".green(), text.green());
}

/// Print a warning message
pub fn print_warning(text: &str) {
    println!("  {} {}", "⚠".yellow(), text.yellow());
}

/// Print an error message
pub fn print_error(text: &str) {
    eprintln!("  {} {}", "✖".red(), text.red());
}

/// Print a bullet point
pub fn print_bullet(text: &str) {
    println!("  {} {}", "•".green(), text);
}

/// Create a styled progress bar
pub fn create_progress_bar(total: u64, msg: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);

    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.green/dim}] {pos}/{len} files ({percent}%) {msg}")
    {
        pb.set_style(style.progress_chars("█▓░"));
    }

    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));

    pb
}

/// Print final statistics
pub fn print_summary(summary: &BatchSummary, top_words: usize) {
    let totals = summary.totals();

    println!();
    println!("{}", "═".repeat(60).green());
    println!("{}", "                    PROCESSING COMPLETE".green().bold());
    println!("{}", "═".repeat(60).green());
    println!();

    println!(
        "  {} {}",
        "Files processed:".green(),
        format!(
            "{}/{}",
            summary.files_processed(),
            summary.files_processed() + summary.files_failed()
        )
    );
    println!("  {} {}", "Data processed: ".green(), ByteSize(totals.bytes_read));
    println!("  {} {}", "Workers:        ".green(), summary.workers);
    println!();

    println!("  {} {}", "Total lines:    ".green(), format_number(totals.total_lines));
    println!("  {} {}", "Clean lines:    ".green(), format_number(totals.clean_lines));
    println!(
        "  {} {}",
        "Toxic lines:    ".yellow(),
        format_number(totals.toxic_lines).yellow()
    );

    if totals.error_lines > 0 {
        println!(
            "  {} {}",
            "Malformed:      ".red(),
            format_number(totals.error_lines).red()
        );
    }

    let words = totals.top_words(top_words);
    if !words.is_empty() {
        println!();
        println!("  {}", "Top toxic words:".green());
        for (word, count) in words {
            print_bullet(&format!("{:<24} {}", word, format_number(count)));
        }
    }

    if summary.has_failures() {
        println!();
        println!("  {}", "Failed files:".red());
        for failure in &summary.failures {
            print_error(&format!("{:?}: {}", failure.file, failure.reason));
        }
    }

    println!();
    println!("  {} {}", "Duration:       ".green(), format_duration(summary.elapsed));
    println!(
        "  {} {}",
        "File time:      ".green(),
        format_duration(totals.processing_time)
    );
    println!(
        "  {} {:.2} lines/sec",
        "Throughput:     ".green(),
        summary.lines_per_second()
    );
    println!();
    println!("{}", "═".repeat(60).green());
}

/// Format a number with thousand separators
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    let chars: Vec<char> = s.chars().collect();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }

    result
}

/// Format duration as human-readable string
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();

    if secs < 60 {
        format!("{:.1}s", duration.as_secs_f64())
    } else if secs < 3600 {
        let mins = secs / 60;
        let secs = secs % 60;
        format!("{}m {}s", mins, secs)
    } else {
        let hours = secs / 3600;
        let mins = (secs % 3600) / 60;
        format!("{}h {}m", hours, mins)
    }
}
