//! Report rows and rendering.

use std::fmt::{self, Write};
use std::time::Duration;

use chrono::{Datelike, NaiveDate};
use unreleased_config::ReportConfig;

use crate::classifier::CURRENT;
use crate::context::UNRELEASED;
use crate::{Classification, Collected, PluginRecord};

/// Colour digits, oldest last.
const AGE_COLORS: [char; 5] = ['3', '6', '9', 'c', 'f'];

/// Months covered by one colour step.
const MONTHS_PER_COLOR: f64 = 2.0;

fn months(date: NaiveDate) -> f64 {
    f64::from(date.year() - 1900) * 12.0 + f64::from(date.month()) + f64::from(date.day()) / 31.0
}

/// Formats a date, tinted by its age relative to `today`.
///
/// Every two months of age moves one step along the colour scale, up to five
/// steps. Dates not older than a month are left plain.
#[must_use]
pub fn colorize(date: NaiveDate, today: NaiveDate) -> String {
    let day = date.format("%Y-%m-%d");
    let age = ((months(today) - months(date)) / MONTHS_PER_COLOR).round();
    if age <= 0.0 {
        return day.to_string();
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let step = age.min(5.0) as usize;
    format!("{{color:#{}{}6}}{day}{{color}}", AGE_COLORS[step - 1], 9 - step)
}

/// Renders the run-duration footer.
#[must_use]
pub fn render_footer(generated_at: &str, elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!(
        "\nGenerated at: {generated_at} in {} min {} sec\n",
        secs / 60,
        secs % 60
    )
}

/// One line of the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    line: String,
    label: String,
}

impl ReportRow {
    /// Builds the row of a released plugin.
    #[must_use]
    pub fn released(
        plugin: &PluginRecord,
        collected: &Collected,
        classification: &Classification,
        today: NaiveDate,
    ) -> Self {
        let name = match plugin.wiki.as_deref() {
            Some(wiki) if !wiki.is_empty() => format!("[{}|{wiki}]", plugin.id),
            _ => plugin.id.clone(),
        };
        let since = match classification.count {
            0 => "|".to_string(),
            1 => format!("[1 rev|{}] | since", collected.compare_url),
            n => format!("[{n} revs|{}] | since", collected.compare_url),
        };
        let dates = match (classification.first_date, classification.last_date) {
            (Some(first), Some(last)) if first == last => colorize(first, today),
            (Some(first), Some(last)) => {
                format!("{} to {}", colorize(first, today), colorize(last, today))
            }
            _ => String::new(),
        };

        Self {
            line: format!(
                "| {name} | {since} {} | {dates} | {}",
                collected.version, classification.label
            ),
            label: classification.label.clone(),
        }
    }

    /// Builds the row of a repository that was never released.
    #[must_use]
    pub fn unreleased(name: &str, url: &str, label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            line: format!("| [{name}|{url}] | | | {label}"),
            label,
        }
    }

    /// Returns the classification label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    fn sort_key(&self) -> String {
        self.line
            .trim_start_matches(['|', ' ', '['])
            .to_lowercase()
    }
}

impl fmt::Display for ReportRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.line)
    }
}

/// The assembled report.
#[derive(Debug, Clone, Default)]
pub struct Report {
    rows: Vec<ReportRow>,
    unused: Vec<(String, String)>,
}

impl Report {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a row.
    pub fn push(&mut self, row: ReportRow) {
        self.rows.push(row);
    }

    /// Sets the override entries never consumed.
    pub fn set_unused(&mut self, unused: Vec<(String, String)>) {
        self.unused = unused;
    }

    /// Returns the rows, in insertion order until [`Report::sort`] runs.
    #[must_use]
    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    /// Returns the unused override entries.
    #[must_use]
    pub fn unused(&self) -> &[(String, String)] {
        &self.unused
    }

    /// Sorts rows case-insensitively by the text after their leading link markers.
    pub fn sort(&mut self) {
        self.rows.sort_by_cached_key(ReportRow::sort_key);
    }

    fn section<'a>(
        &'a self,
        keep: impl Fn(&str) -> bool + 'a,
    ) -> impl Iterator<Item = &'a ReportRow> + 'a {
        self.rows.iter().filter(move |row| keep(row.label()))
    }

    /// Renders the report body, without the footer.
    #[must_use]
    pub fn render(&self, config: &ReportConfig) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "This is a report of unreleased changes in {}' plugin repositories.",
            config.ecosystem
        );
        let _ = writeln!(out, "It is updated {}.", config.schedule);

        out.push_str("\nh3. Plugin Changes\n");
        for row in self.section(|label| !label.contains(CURRENT) && !label.contains(UNRELEASED)) {
            let _ = writeln!(out, "{row}");
        }
        out.push_str("\nh3. Unreleased Plugins\n");
        for row in self.section(|label| label.contains(UNRELEASED)) {
            let _ = writeln!(out, "{row}");
        }
        out.push_str("\nh3. Current Plugins\n");
        for row in self.section(|label| label.contains(CURRENT)) {
            let _ = writeln!(out, "{row}");
        }

        for (key, value) in &self.unused {
            let _ = writeln!(out, "| Unused data | in | KnownRevs: | {key} | {value}");
        }
        out
    }
}
