//! Loose version ordering.

use std::cmp::Ordering;
use std::fmt;

/// One component of a loose version.
///
/// Numbers sort before text, so `1.0` < `1.0-beta` and `1.9` < `1.10`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Component {
    Number(u64),
    Text(String),
}

/// A version string compared component by component.
///
/// Underscores are treated as dots. The string is split into runs of digits
/// (compared numerically), runs of lowercase letters, and runs of any other
/// character except `.` (both compared as text). Dots only separate.
#[derive(Debug, Clone)]
pub struct LooseVersion {
    raw: String,
    components: Vec<Component>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Run {
    Digit,
    Lower,
    Other,
}

fn run_of(c: char) -> Option<Run> {
    match c {
        '.' => None,
        '0'..='9' => Some(Run::Digit),
        'a'..='z' => Some(Run::Lower),
        _ => Some(Run::Other),
    }
}

impl LooseVersion {
    /// Parses a version string. Never fails; odd input just compares oddly.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let normalized = raw.replace('_', ".");
        let mut components = Vec::new();
        let mut current = String::new();
        let mut current_run = None;

        for c in normalized.chars() {
            let run = run_of(c);
            if run != current_run && !current.is_empty() {
                components.push(Self::component(&current, current_run));
                current.clear();
            }
            current_run = run;
            if run.is_some() {
                current.push(c);
            }
        }
        if !current.is_empty() {
            components.push(Self::component(&current, current_run));
        }

        Self {
            raw: raw.to_string(),
            components,
        }
    }

    fn component(text: &str, run: Option<Run>) -> Component {
        match run {
            Some(Run::Digit) => text
                .parse()
                .map_or_else(|_| Component::Text(text.to_string()), Component::Number),
            _ => Component::Text(text.to_string()),
        }
    }

    /// Returns the original string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl PartialEq for LooseVersion {
    fn eq(&self, other: &Self) -> bool {
        self.components == other.components
    }
}

impl Eq for LooseVersion {}

impl PartialOrd for LooseVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LooseVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.components.cmp(&other.components)
    }
}

impl fmt::Display for LooseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> LooseVersion {
        LooseVersion::parse(s)
    }

    #[test]
    fn test_numeric_not_lexical() {
        assert!(v("1.2") < v("1.10"));
        assert!(v("1.10") < v("1.10.1"));
        assert!(v("1.9") < v("1.10"));
    }

    #[test]
    fn test_underscore_is_dot() {
        assert_eq!(v("1_2_3"), v("1.2.3"));
        assert!(v("1_10") > v("1.9"));
    }

    #[test]
    fn test_prefix_is_smaller() {
        assert!(v("2.0") < v("2.0.0"));
    }

    #[test]
    fn test_suffix_after_numbers() {
        assert!(v("1.0") < v("1.0-beta"));
        assert!(v("1.0-alpha") < v("1.0-beta"));
        assert!(v("1.0b") < v("1.1"));
    }

    #[test]
    fn test_numbers_before_text() {
        assert!(v("1.5") < v("1.a"));
    }

    #[test]
    fn test_leading_zeros_compare_numerically() {
        assert_eq!(v("1.01"), v("1.1"));
    }

    #[test]
    fn test_display_keeps_original() {
        assert_eq!(v("1_2").to_string(), "1_2");
        assert_eq!(v("1_2").as_str(), "1_2");
    }

    #[test]
    fn test_max_of_many() {
        let versions = ["1.2", "1.10", "1.10.1", "1.9.9", "0.99"];
        let max = versions.iter().map(|s| v(s)).max().unwrap();
        assert_eq!(max.as_str(), "1.10.1");
    }

    #[test]
    fn test_empty() {
        assert!(v("") < v("0"));
    }
}
