//! Terminal line formatting.
//!
//! The plain format is fixed: log scrapers rely on it.

use colored::Colorize;

use super::Event;

/// Format a duration given in seconds as milliseconds.
///
/// Two decimals, zero-padded to a minimum width of three characters, with an
/// `ms` suffix: `0.01234` becomes `"12.34ms"`, `0.0001` becomes `"0.10ms"`.
pub fn format_millis(secs: f64) -> String {
    format!("{:03.2}ms", secs * 1000.0)
}

/// One tab per nesting level.
pub fn indent(depth: usize) -> String {
    "\t".repeat(depth)
}

/// Format an event as plain text lines, without trailing newlines.
///
/// Summary events produce two lines, every other event one.
pub fn format_event(event: &Event) -> Vec<String> {
    match event {
        Event::Announce { name, .. } => vec![format!("Measuring {}:", name)],
        Event::Took {
            name,
            depth,
            elapsed_secs,
        } => vec![format!(
            "{}{} took: {}",
            indent(*depth),
            name,
            format_millis(*elapsed_secs)
        )],
        Event::Header { name, depth } => vec![format!("{}Measuring {}", indent(*depth), name)],
        Event::Summary {
            name,
            depth,
            mean_secs,
            spread_secs,
            ..
        } => vec![
            format!("{}{} Average {}", indent(*depth), name, format_millis(*mean_secs)),
            format!("{}{} STD Dev. {}", indent(*depth), name, format_millis(*spread_secs)),
        ],
    }
}

/// Format an event with ANSI colours.
///
/// Same layout as [`format_event`]; names are bold and durations cyan.
pub fn format_event_colored(event: &Event) -> Vec<String> {
    match event {
        Event::Announce { name, .. } => {
            vec![format!("{} {}:", "Measuring".dimmed(), name.bold())]
        }
        Event::Took {
            name,
            depth,
            elapsed_secs,
        } => vec![format!(
            "{}{} took: {}",
            indent(*depth),
            name.bold(),
            format_millis(*elapsed_secs).cyan()
        )],
        Event::Header { name, depth } => vec![format!(
            "{}{} {}",
            indent(*depth),
            "Measuring".dimmed(),
            name.bold()
        )],
        Event::Summary {
            name,
            depth,
            mean_secs,
            spread_secs,
            ..
        } => vec![
            format!(
                "{}{} Average {}",
                indent(*depth),
                name.bold(),
                format_millis(*mean_secs).green()
            ),
            format!(
                "{}{} STD Dev. {}",
                indent(*depth),
                name.bold(),
                format_millis(*spread_secs).yellow()
            ),
        ],
    }
}
