//! Month windows over `dateOfSale`.
//!
//! Every month-filtered query compares sale dates against a window anchored in
//! a fixed reference year. How the stored year is treated is a [`YearPolicy`]:
//! with [`YearPolicy::Projected`] sales from any year that fall in the
//! requested month match, with [`YearPolicy::Absolute`] only sales dated in
//! the reference year itself do.

use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::Error;

pub const DEFAULT_REFERENCE_YEAR: i32 = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum YearPolicy {
    /// Project the stored date onto the reference year, ignoring its own year.
    #[default]
    Projected,
    /// Compare the stored date against the window as-is.
    Absolute,
}

impl FromStr for YearPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "projected" => Ok(YearPolicy::Projected),
            "absolute" => Ok(YearPolicy::Absolute),
            other => Err(Error::UnknownPolicy(other.to_string())),
        }
    }
}

impl TryFrom<String> for YearPolicy {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Turns raw `month` query input into a [`MonthConstraint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateMatching {
    pub reference_year: i32,
    pub policy: YearPolicy,
}

impl Default for DateMatching {
    fn default() -> Self {
        Self {
            reference_year: DEFAULT_REFERENCE_YEAR,
            policy: YearPolicy::default(),
        }
    }
}

impl DateMatching {
    pub fn new(reference_year: i32, policy: YearPolicy) -> Self {
        Self {
            reference_year,
            policy,
        }
    }

    /// Missing, non-numeric and out-of-range months produce an empty window.
    pub fn constraint(&self, month: Option<&str>) -> MonthConstraint {
        month
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .and_then(|m| MonthWindow::new(self.reference_year, m, self.policy))
            .map(MonthConstraint::Window)
            .unwrap_or(MonthConstraint::Nothing)
    }
}

/// The half-open range `[start, end)` covering one month of the reference year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    month: u32,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    policy: YearPolicy,
}

impl MonthWindow {
    pub fn new(reference_year: i32, month: u32, policy: YearPolicy) -> Option<Self> {
        if !(1..=12).contains(&month) {
            return None;
        }

        let start = Utc
            .with_ymd_and_hms(reference_year, month, 1, 0, 0, 0)
            .single()?;
        let (end_year, end_month) = if month == 12 {
            (reference_year + 1, 1)
        } else {
            (reference_year, month + 1)
        };
        let end = Utc
            .with_ymd_and_hms(end_year, end_month, 1, 0, 0, 0)
            .single()?;

        Some(Self {
            month,
            start,
            end,
            policy,
        })
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn policy(&self) -> YearPolicy {
        self.policy
    }

    pub fn contains(&self, date_of_sale: &DateTime<Utc>) -> bool {
        match self.policy {
            // A window spans exactly one calendar month, so projecting onto
            // the reference year reduces to comparing the UTC month.
            YearPolicy::Projected => date_of_sale.month() == self.month,
            YearPolicy::Absolute => *date_of_sale >= self.start && *date_of_sale < self.end,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthConstraint {
    Any,
    Window(MonthWindow),
    Nothing,
}

impl MonthConstraint {
    pub fn matches(&self, date_of_sale: &DateTime<Utc>) -> bool {
        match self {
            MonthConstraint::Any => true,
            MonthConstraint::Window(window) => window.contains(date_of_sale),
            MonthConstraint::Nothing => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_window_bounds() {
        let window = MonthWindow::new(2000, 3, YearPolicy::Absolute).unwrap();
        assert_eq!(window.start().to_rfc3339(), "2000-03-01T00:00:00+00:00");
        assert_eq!(window.end().to_rfc3339(), "2000-04-01T00:00:00+00:00");

        let december = MonthWindow::new(2000, 12, YearPolicy::Absolute).unwrap();
        assert_eq!(december.end().to_rfc3339(), "2001-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_invalid_months_yield_nothing() {
        let matching = DateMatching::default();

        for raw in [None, Some(""), Some("0"), Some("13"), Some("march"), Some("-1")] {
            assert_eq!(matching.constraint(raw), MonthConstraint::Nothing, "{:?}", raw);
        }
        assert!(!MonthConstraint::Nothing.matches(&utc(2000, 3, 1)));
    }

    #[test]
    fn test_leading_zero_month() {
        let matching = DateMatching::default();
        match matching.constraint(Some("03")) {
            MonthConstraint::Window(w) => assert_eq!(w.month(), 3),
            other => panic!("unexpected constraint {:?}", other),
        }
    }

    #[test]
    fn test_projected_ignores_stored_year() {
        let constraint = DateMatching::new(2000, YearPolicy::Projected).constraint(Some("11"));

        assert!(constraint.matches(&utc(2021, 11, 27)));
        assert!(constraint.matches(&utc(2022, 11, 1)));
        assert!(!constraint.matches(&utc(2021, 12, 1)));
    }

    #[test]
    fn test_absolute_only_matches_reference_year() {
        let constraint = DateMatching::new(2000, YearPolicy::Absolute).constraint(Some("2"));

        assert!(constraint.matches(&utc(2000, 2, 29)));
        assert!(!constraint.matches(&utc(2021, 2, 10)));
        assert!(!constraint.matches(&Utc.with_ymd_and_hms(2000, 3, 1, 0, 0, 0).unwrap()));
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("Projected".parse::<YearPolicy>().unwrap(), YearPolicy::Projected);
        assert_eq!(" absolute ".parse::<YearPolicy>().unwrap(), YearPolicy::Absolute);
        assert!("calendar".parse::<YearPolicy>().is_err());
    }
}
