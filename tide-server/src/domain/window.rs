//! Inclusive time windows over ISO-8601 strings.

/// An inclusive `[from, to]` range of timestamps.
///
/// Bounds are compared lexicographically, which orders correctly only for
/// zero-padded timestamps such as `2021-09-20T00:00:00Z`. An absent bound
/// leaves that side open. A window whose `from` sorts after its `to` is
/// valid and simply matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeWindow {
    pub from: Option<String>,
    pub to: Option<String>,
}

impl TimeWindow {
    pub fn new(from: Option<String>, to: Option<String>) -> Self {
        Self { from, to }
    }

    /// A window bounded on both sides.
    pub fn between(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: Some(from.into()),
            to: Some(to.into()),
        }
    }

    /// A window with no bounds at all.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Fill in whichever bounds are missing from `defaults`.
    pub fn or_defaults(self, defaults: &TimeWindow) -> Self {
        Self {
            from: self.from.or_else(|| defaults.from.clone()),
            to: self.to.or_else(|| defaults.to.clone()),
        }
    }

    /// Whether `timestamp` falls inside the window.
    pub fn contains(&self, timestamp: &str) -> bool {
        let after_start = self.from.as_deref().is_none_or(|from| timestamp >= from);
        let before_end = self.to.as_deref().is_none_or(|to| timestamp <= to);
        after_start && before_end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_inclusive() {
        let w = TimeWindow::between("2021-09-20T00:00:00Z", "2021-09-20T06:00:00Z");
        assert!(w.contains("2021-09-20T00:00:00Z"));
        assert!(w.contains("2021-09-20T03:15:00Z"));
        assert!(w.contains("2021-09-20T06:00:00Z"));
        assert!(!w.contains("2021-09-19T23:59:59Z"));
        assert!(!w.contains("2021-09-20T06:00:01Z"));
    }

    #[test]
    fn missing_bounds_are_open() {
        let w = TimeWindow::new(None, Some("2021-09-20T00:00:00Z".into()));
        assert!(w.contains("1900-01-01T00:00:00Z"));
        assert!(!w.contains("2021-09-21T00:00:00Z"));

        let w = TimeWindow::new(Some("2021-09-20T00:00:00Z".into()), None);
        assert!(w.contains("2999-01-01T00:00:00Z"));

        assert!(TimeWindow::unbounded().contains("anything"));
    }

    #[test]
    fn inverted_window_matches_nothing() {
        let w = TimeWindow::between("2021-09-26T00:00:00Z", "2021-09-20T00:00:00Z");
        assert!(!w.contains("2021-09-20T00:00:00Z"));
        assert!(!w.contains("2021-09-23T00:00:00Z"));
        assert!(!w.contains("2021-09-26T00:00:00Z"));
    }

    #[test]
    fn defaults_fill_only_missing_sides() {
        let defaults = TimeWindow::between("2021-09-20T00:00:00Z", "2021-09-26T06:00:00Z");

        let w = TimeWindow::new(Some("2021-09-21T00:00:00Z".into()), None).or_defaults(&defaults);
        assert_eq!(
            w,
            TimeWindow::between("2021-09-21T00:00:00Z", "2021-09-26T06:00:00Z")
        );

        let w = TimeWindow::unbounded().or_defaults(&defaults);
        assert_eq!(w, defaults);
    }
}
