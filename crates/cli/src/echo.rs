use owo_colors::OwoColorize;
use seogeo_core::{FallbackReason, RecordSource, ResearchSource, ValidationReport, Verdict};

use crate::VERSION;

/// Print a styled banner for verbose mode
pub fn print_banner() {
    eprintln!("\n{} {} {}", "seogeo".bold().bright_blue(), "v".dimmed(), VERSION.dimmed());
    eprintln!("{}", "SEO/GEO research and checks for blog posts\n".dimmed());
}

/// Print a styled step message
pub fn print_step(step: usize, total: usize, message: &str) {
    eprintln!("{} {}", format!("[{}/{}]", step, total).dimmed(), message.bright_cyan());
}

/// Print a success message
pub fn print_success(message: &str) {
    eprintln!("{} {}", "✓".green(), message.bright_green());
}

/// Print an info message
pub fn print_info(message: &str) {
    eprintln!("{} {}", "ℹ".blue(), message.bright_blue());
}

/// Print a warning message
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message.bright_yellow());
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message.bright_red());
}

/// Print indented, dimmed follow-up lines
pub fn print_hint(text: &str) {
    for line in text.lines() {
        eprintln!("  {}", line.dimmed());
    }
}

/// Print a `label: value` detail line
pub fn print_detail(label: &str, value: &str) {
    eprintln!("  {} {}", format!("{}:", label).dimmed(), value.bright_white());
}

/// Print where a keyword research result came from
pub fn print_research_source(source: &ResearchSource, count: usize) {
    match source {
        ResearchSource::Cache { age_days } => {
            print_info(&format!("Using cached results ({} keywords, {} days old)", count, age_days))
        }
        ResearchSource::Fetched(RecordSource::Remote) => {
            print_success(&format!("Fetched {} keywords from DataForSEO", count))
        }
        ResearchSource::Fetched(RecordSource::Heuristic(reason)) => {
            let why = match reason {
                FallbackReason::NoCredential => "no API key",
                FallbackReason::RemoteFailure(_) => "API request failed",
                FallbackReason::LocalFailure(_) => "unexpected error",
                FallbackReason::EmptyResponse => "API returned no data",
            };
            print_warning(&format!("Generated {} heuristic keyword estimates ({})", count, why));
        }
    }
}

/// Print a one-line validation summary colored by verdict
pub fn print_verdict(report: &ValidationReport) {
    let summary = format!(
        "Score {}/100 ({} passed, {} warnings, {} failed)",
        report.score,
        report.passed.len(),
        report.warnings.len(),
        report.failed.len()
    );

    match report.verdict() {
        Verdict::Excellent => print_success(&summary),
        Verdict::Good => print_warning(&summary),
        Verdict::NeedsImprovement => print_error(&summary),
    }
}
