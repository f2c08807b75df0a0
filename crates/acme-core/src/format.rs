//! # Display Helpers
//!
//! Small pure functions the page renderer needs alongside the data:
//! date formatting, the invoices pager, and the revenue chart's y-axis.
//!
//! ## Pager Shapes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  total ≤ 7              1 2 3 4 5 6 7                                   │
//! │  current near start     1 2 3 … 9 10                                    │
//! │  current near end       1 2 … 8 9 10                                    │
//! │  current in the middle  1 … 4 5 6 … 10                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use serde::{Serialize, Serializer};

use crate::types::Revenue;

/// Step between revenue chart labels, in whole dollars.
const Y_AXIS_STEP: i64 = 1000;

// =============================================================================
// Dates
// =============================================================================

/// Formats an invoice date the way en-US locales print a short date.
///
/// ## Example
/// ```rust
/// use acme_core::format::format_date_to_local;
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2022, 12, 6).unwrap();
/// assert_eq!(format_date_to_local(date), "Dec 6, 2022");
/// ```
pub fn format_date_to_local(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

// =============================================================================
// Pagination
// =============================================================================

/// One slot in the pager: a page link or a gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(i64),
    Ellipsis,
}

/// Pages serialize as numbers and gaps as `"..."`, matching what the pager
/// component iterates over.
impl Serialize for PageItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PageItem::Page(n) => serializer.serialize_i64(*n),
            PageItem::Ellipsis => serializer.serialize_str("..."),
        }
    }
}

/// Builds the pager for `current_page` out of `total_pages`.
///
/// Shows every page when there are 7 or fewer; otherwise keeps the first
/// and last pages visible and collapses the rest around the current page.
///
/// ## Example
/// ```rust
/// use acme_core::format::{generate_pagination, PageItem::{Ellipsis, Page}};
///
/// assert_eq!(
///     generate_pagination(5, 10),
///     vec![Page(1), Ellipsis, Page(4), Page(5), Page(6), Ellipsis, Page(10)]
/// );
/// ```
pub fn generate_pagination(current_page: i64, total_pages: i64) -> Vec<PageItem> {
    use PageItem::{Ellipsis, Page};

    if total_pages <= 7 {
        return (1..=total_pages).map(Page).collect();
    }

    if current_page <= 3 {
        return vec![
            Page(1),
            Page(2),
            Page(3),
            Ellipsis,
            Page(total_pages - 1),
            Page(total_pages),
        ];
    }

    if current_page >= total_pages - 2 {
        return vec![
            Page(1),
            Page(2),
            Ellipsis,
            Page(total_pages - 2),
            Page(total_pages - 1),
            Page(total_pages),
        ];
    }

    vec![
        Page(1),
        Ellipsis,
        Page(current_page - 1),
        Page(current_page),
        Page(current_page + 1),
        Ellipsis,
        Page(total_pages),
    ]
}

// =============================================================================
// Revenue Chart
// =============================================================================

/// Y-axis of the revenue bar chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YAxis {
    /// Labels from the top down, e.g. `["$5K", "$4K", ..., "$0K"]`.
    pub labels: Vec<String>,
    /// Highest month rounded up to the next thousand; bars scale against it.
    pub top_label: i64,
}

/// Computes chart labels from the monthly revenue series.
///
/// An empty series yields a single `$0K` label.
///
/// ## Example
/// ```rust
/// use acme_core::format::generate_y_axis;
/// use acme_core::Revenue;
///
/// let revenue = vec![
///     Revenue { month: "Jan".into(), revenue: 2000 },
///     Revenue { month: "Feb".into(), revenue: 2450 },
/// ];
/// let axis = generate_y_axis(&revenue);
/// assert_eq!(axis.top_label, 3000);
/// assert_eq!(axis.labels, vec!["$3K", "$2K", "$1K", "$0K"]);
/// ```
pub fn generate_y_axis(revenue: &[Revenue]) -> YAxis {
    let highest = revenue.iter().map(|m| m.revenue).max().unwrap_or(0).max(0);
    let top_label = (highest + Y_AXIS_STEP - 1) / Y_AXIS_STEP * Y_AXIS_STEP;

    let labels = (0..=top_label / Y_AXIS_STEP)
        .rev()
        .map(|k| format!("${}K", k))
        .collect();

    YAxis { labels, top_label }
}

// =============================================================================
// Unit Tests
// =============================================================================
