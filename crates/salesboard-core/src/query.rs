use serde::Deserialize;

use crate::{DateMatching, Error, MonthConstraint, Result, Transaction};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PER_PAGE: u64 = 10;

/// Free-text search over title, description and price.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchTerm {
    text: String,
    needle: String,
    price: Option<f64>,
}

impl SearchTerm {
    /// An empty search matches every record, so it produces no term at all.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() {
            return None;
        }

        let price = raw.trim().parse::<f64>().ok().filter(|p| !p.is_nan());

        Some(Self {
            text: raw.to_string(),
            needle: raw.to_lowercase(),
            price,
        })
    }

    /// The search text as given.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The lowercased text to look for.
    pub fn needle(&self) -> &str {
        &self.needle
    }

    pub fn price(&self) -> Option<f64> {
        self.price
    }

    pub fn matches(&self, record: &Transaction) -> bool {
        record.title.to_lowercase().contains(&self.needle)
            || record.description.to_lowercase().contains(&self.needle)
            || self.price.is_some_and(|p| record.price == p)
    }
}

/// Skip/limit pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub skip: u64,
    pub limit: u64,
}

impl Page {
    pub fn new(page: u64, per_page: u64) -> Self {
        Self {
            skip: page.saturating_sub(1).saturating_mul(per_page),
            limit: per_page,
        }
    }

    pub fn parse(page: Option<&str>, per_page: Option<&str>) -> Result<Self> {
        let page = parse_positive("page", page, DEFAULT_PAGE)?;
        let per_page = parse_positive("perPage", per_page, DEFAULT_PER_PAGE)?;
        Ok(Self::new(page, per_page))
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE, DEFAULT_PER_PAGE)
    }
}

fn parse_positive(field: &'static str, raw: Option<&str>, default: u64) -> Result<u64> {
    let Some(raw) = raw else {
        return Ok(default);
    };

    match raw.trim().parse::<u64>() {
        Ok(value) if value >= 1 => Ok(value),
        _ => Err(Error::Validation {
            field,
            value: raw.to_string(),
        }),
    }
}

/// The predicate every store operation is evaluated against.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordFilter {
    pub month: MonthConstraint,
    pub search: Option<SearchTerm>,
    pub sold: Option<bool>,
}

impl RecordFilter {
    pub fn all() -> Self {
        Self {
            month: MonthConstraint::Any,
            search: None,
            sold: None,
        }
    }

    pub fn for_month(month: MonthConstraint) -> Self {
        Self {
            month,
            ..Self::all()
        }
    }

    pub fn with_search(mut self, search: Option<SearchTerm>) -> Self {
        self.search = search;
        self
    }

    pub fn with_sold(mut self, sold: bool) -> Self {
        self.sold = Some(sold);
        self
    }

    pub fn matches(&self, record: &Transaction) -> bool {
        self.month.matches(&record.date_of_sale)
            && self.sold.map_or(true, |sold| record.sold == sold)
            && self.search.as_ref().map_or(true, |term| term.matches(record))
    }
}

/// Raw query string of `GET /transactions`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingParams {
    pub month: Option<String>,
    pub search: Option<String>,
    pub page: Option<String>,
    #[serde(rename = "perPage")]
    pub per_page: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListingQuery {
    pub filter: RecordFilter,
    pub page: Page,
}

impl ListingParams {
    pub fn translate(&self, matching: &DateMatching) -> Result<ListingQuery> {
        let page = Page::parse(self.page.as_deref(), self.per_page.as_deref())?;
        let search = SearchTerm::parse(self.search.as_deref().unwrap_or_default());
        let filter =
            RecordFilter::for_month(matching.constraint(self.month.as_deref())).with_search(search);

        Ok(ListingQuery { filter, page })
    }
}

/// Raw query string of the month-only report endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MonthParams {
    pub month: Option<String>,
}

impl MonthParams {
    pub fn translate(&self, matching: &DateMatching) -> RecordFilter {
        RecordFilter::for_month(matching.constraint(self.month.as_deref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn record(title: &str, description: &str, price: f64) -> Transaction {
        Transaction {
            id: 1,
            title: title.to_string(),
            price,
            description: description.to_string(),
            category: "electronics".to_string(),
            image: String::new(),
            sold: true,
            date_of_sale: Utc.with_ymd_and_hms(2021, 3, 14, 9, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_empty_search_has_no_term() {
        assert!(SearchTerm::parse("").is_none());
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let term = SearchTerm::parse("BACK").unwrap();

        assert_eq!(term.text(), "BACK");
        assert_eq!(term.needle(), "back");
        assert!(term.matches(&record("Foldsack Backpack", "", 10.0)));
        assert!(term.matches(&record("Bag", "fits on your back", 10.0)));
        assert!(!term.matches(&record("Bag", "shoulder strap", 10.0)));
    }

    #[test]
    fn test_search_treats_pattern_characters_literally() {
        let term = SearchTerm::parse("1.5").unwrap();
        assert!(!term.matches(&record("105 mm lens", "", 10.0)));
        assert!(term.matches(&record("1.5 TB drive", "", 10.0)));
    }

    #[test]
    fn test_search_matches_exact_price() {
        let term = SearchTerm::parse("329.85").unwrap();

        assert_eq!(term.price(), Some(329.85));
        assert!(term.matches(&record("Backpack", "", 329.85)));
        assert!(!term.matches(&record("Backpack", "", 329.8)));
    }

    #[test]
    fn test_non_numeric_search_disables_price_branch() {
        assert_eq!(SearchTerm::parse("shirt").unwrap().price(), None);
        assert_eq!(SearchTerm::parse("NaN").unwrap().price(), None);
    }

    #[test]
    fn test_page_defaults_and_offsets() {
        assert_eq!(Page::parse(None, None).unwrap(), Page { skip: 0, limit: 10 });
        assert_eq!(
            Page::parse(Some("3"), Some("5")).unwrap(),
            Page { skip: 10, limit: 5 }
        );
    }

    #[test]
    fn test_page_rejects_bad_values() {
        assert_eq!(
            Page::parse(None, Some("ten")),
            Err(Error::Validation {
                field: "perPage",
                value: "ten".to_string()
            })
        );
        assert!(Page::parse(Some("0"), None).is_err());
        assert!(Page::parse(Some("-2"), None).is_err());
    }

    #[test]
    fn test_listing_translation() {
        let params = ListingParams {
            month: Some("3".to_string()),
            search: Some("pack".to_string()),
            page: Some("2".to_string()),
            per_page: None,
        };

        let query = params.translate(&DateMatching::default()).unwrap();

        assert_eq!(query.page, Page { skip: 10, limit: 10 });
        assert!(query.filter.matches(&record("Backpack", "", 1.0)));
        assert!(!query.filter.matches(&record("Mug", "", 1.0)));
    }

    #[test]
    fn test_filter_sold_flag() {
        let filter = RecordFilter::all().with_sold(false);
        assert!(!filter.matches(&record("Backpack", "", 1.0)));
        assert!(RecordFilter::all().with_sold(true).matches(&record("Backpack", "", 1.0)));
    }

    #[test]
    fn test_month_params_without_month_match_nothing() {
        let filter = MonthParams::default().translate(&DateMatching::default());
        assert_eq!(filter.month, MonthConstraint::Nothing);
        assert!(!filter.matches(&record("Backpack", "", 1.0)));
    }
}
