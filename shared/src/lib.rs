use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

/// Delay before a toast removes itself, in milliseconds
pub const DEFAULT_AUTO_DISMISS_MS: u32 = 3500;

/// Visual intent of a notification, mapped onto the Bootstrap `text-bg-*` classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Success,
    Danger,
    Info,
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Danger => "danger",
            Severity::Info => "info",
            Severity::Warning => "warning",
        }
    }

    /// CSS class list for the toast root element
    pub fn toast_class(&self) -> String {
        format!("toast align-items-center text-bg-{} border-0 show", self.as_str())
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque identity of a visible notification, rendered as the toast element id
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NotificationId(String);

impl NotificationId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Issues notification ids of the form `t<millis>`.
///
/// The clock reading is only a starting point: when two notifications are
/// created within the same millisecond (or the clock steps backwards) the
/// stamp is bumped past the last one handed out, so ids stay unique among
/// everything this source has produced.
#[derive(Debug, Default)]
pub struct NotificationIdSource {
    last_stamp: Option<u64>,
}

impl NotificationIdSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self, now_millis: u64) -> NotificationId {
        let stamp = match self.last_stamp {
            Some(last) if now_millis <= last => last + 1,
            _ => now_millis,
        };
        self.last_stamp = Some(stamp);
        NotificationId(format!("t{}", stamp))
    }
}

/// A transient status message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub title: String,
    pub message: String,
    pub severity: Severity,
    pub auto_dismiss_ms: u32,
}

impl Notification {
    pub fn new(id: NotificationId, title: &str, message: &str, severity: Severity) -> Self {
        Self {
            id,
            title: title.to_string(),
            message: message.to_string(),
            severity,
            auto_dismiss_ms: DEFAULT_AUTO_DISMISS_MS,
        }
    }

    pub fn with_auto_dismiss(mut self, auto_dismiss_ms: u32) -> Self {
        self.auto_dismiss_ms = auto_dismiss_ms;
        self
    }
}

/// Ordered set of currently visible notifications.
///
/// Insertion appends; removal is by id and never disturbs the other entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationStack {
    items: Vec<Notification>,
}

impl NotificationStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, notification: Notification) {
        self.items.push(notification);
    }

    /// Returns false when the id is not (or no longer) visible
    pub fn dismiss(&mut self, id: &NotificationId) -> bool {
        let before = self.items.len();
        self.items.retain(|n| &n.id != id);
        self.items.len() != before
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Form submission
// ---------------------------------------------------------------------------

/// Header sent with every programmatic form post
pub const PROGRAMMATIC_REQUEST_HEADER: &str = "X-Requested-With";
pub const PROGRAMMATIC_REQUEST_VALUE: &str = "XMLHttpRequest";

/// Field values of one form submission, in the order the form declares them
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SubmissionRequest {
    pub action: String,
    fields: Vec<(String, String)>,
}

impl SubmissionRequest {
    pub fn new(action: &str) -> Self {
        Self {
            action: action.to_string(),
            fields: Vec::new(),
        }
    }

    pub fn push_field(&mut self, name: &str, value: &str) {
        self.fields.push((name.to_string(), value.to_string()));
    }

    pub fn with_field(mut self, name: &str, value: &str) -> Self {
        self.push_field(name, value);
        self
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    /// First value submitted under `name`
    #[cfg(test)]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }
}

/// What the transport reports about a completed response, before the body is read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseSummary {
    pub status: u16,
    pub redirected: bool,
    /// Final URL after redirects were followed
    pub url: String,
}

/// Response shape as far as the submit pipeline is concerned
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseKind {
    Redirect(String),
    Inline,
    Rejected(u16),
}

impl ResponseSummary {
    pub fn classify(&self) -> ResponseKind {
        if self.redirected {
            ResponseKind::Redirect(self.url.clone())
        } else if (200..300).contains(&self.status) {
            ResponseKind::Inline
        } else {
            ResponseKind::Rejected(self.status)
        }
    }
}

/// Result of one form submission
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    /// Server redirected; the browser should navigate to the target
    Redirected(String),
    /// Saved without a redirect; carries the (unparsed) response body
    InlineSuccess(String),
    /// The request did not complete successfully
    Failed(String),
}

impl SubmissionOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            SubmissionOutcome::Redirected(_) => "redirected",
            SubmissionOutcome::InlineSuccess(_) => "inline-success",
            SubmissionOutcome::Failed(_) => "failed",
        }
    }
}

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

/// Two-valued display preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Only an explicit "dark" marker restores dark mode
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("dark") => Theme::Dark,
            _ => Theme::Light,
        }
    }

    /// Interprets the document's `data-theme` attribute
    pub fn from_attribute(value: Option<&str>) -> Self {
        Self::from_stored(value)
    }

    pub fn storage_value(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Value written to `data-theme`; light clears it
    pub fn attribute_value(self) -> &'static str {
        match self {
            Theme::Light => "",
            Theme::Dark => "dark",
        }
    }
}

// ---------------------------------------------------------------------------
// Charts
// ---------------------------------------------------------------------------

/// Aggregate spend for one `YYYY-MM` month, as rendered by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotal {
    pub month: String,
    pub total: f64,
}

/// Aggregate spend for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

pub const MONTHLY_SERIES_LABEL: &str = "Monthly Spending";

#[derive(Debug, Clone, PartialEq)]
pub struct LineChartSpec {
    pub series_label: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl LineChartSpec {
    pub fn from_rows(rows: &[MonthlyTotal]) -> Self {
        Self {
            series_label: MONTHLY_SERIES_LABEL.to_string(),
            labels: rows.iter().map(|row| row.month.clone()).collect(),
            values: rows.iter().map(|row| row.total).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// (min, max) of the plotted values, widened so a flat series still has height
    pub fn value_bounds(&self) -> (f64, f64) {
        let min = self.values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if !min.is_finite() || !max.is_finite() {
            return (0.0, 1.0);
        }
        let padding = (max - min).max(1.0) * 0.1;
        (0.0_f64.min(min - padding), max + padding)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieChartSpec {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

/// One wedge of a pie, angles in radians measured clockwise from twelve o'clock
#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub index: usize,
    pub label: String,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl PieSlice {
    /// Closed wedge outline in screen coordinates (y grows downwards):
    /// the center, then points along the arc no more than `max_step` radians apart
    pub fn outline(&self, center: (f64, f64), radius: f64, max_step: f64) -> Vec<(f64, f64)> {
        let sweep = self.end_angle - self.start_angle;
        let steps = (sweep / max_step.max(1e-3)).ceil().max(1.0) as usize;
        let mut points = Vec::with_capacity(steps + 2);
        points.push(center);
        for step in 0..=steps {
            let angle = self.start_angle + sweep * step as f64 / steps as f64;
            points.push((center.0 + radius * angle.sin(), center.1 - radius * angle.cos()));
        }
        points
    }
}

impl PieChartSpec {
    pub fn from_rows(rows: &[CategoryTotal]) -> Self {
        Self {
            labels: rows.iter().map(|row| row.category.clone()).collect(),
            values: rows.iter().map(|row| row.total).collect(),
        }
    }

    /// Wedges proportional to each positive value; others get no slice
    pub fn slices(&self) -> Vec<PieSlice> {
        let total: f64 = self.values.iter().filter(|v| **v > 0.0).sum();
        if total <= 0.0 {
            return Vec::new();
        }

        let mut slices = Vec::new();
        let mut angle = 0.0;
        for (index, (label, value)) in self.labels.iter().zip(&self.values).enumerate() {
            if *value <= 0.0 {
                continue;
            }
            let sweep = value / total * std::f64::consts::TAU;
            slices.push(PieSlice {
                index,
                label: label.clone(),
                start_angle: angle,
                end_angle: angle + sweep,
            });
            angle += sweep;
        }
        slices
    }
}

// ---------------------------------------------------------------------------
// Table paging and search
// ---------------------------------------------------------------------------

pub const DEFAULT_TABLE_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct TableQuery {
    pub search: String,
    pub page: usize,
    pub page_size: usize,
}

impl Default for TableQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            page: 0,
            page_size: DEFAULT_TABLE_PAGE_SIZE,
        }
    }
}

/// Rows to show for one query
#[derive(Debug, Clone, PartialEq)]
pub struct TablePage {
    /// Indices into the original row list, in order
    pub visible: Vec<usize>,
    /// Zero-based page actually shown after clamping
    pub page: usize,
    pub page_count: usize,
    pub match_count: usize,
}

impl TablePage {
    pub fn has_previous(&self) -> bool {
        self.page > 0
    }

    pub fn has_next(&self) -> bool {
        self.page + 1 < self.page_count
    }
}

impl TableQuery {
    pub fn matches(&self, row_text: &str) -> bool {
        let haystack = row_text.to_lowercase();
        self.search
            .split_whitespace()
            .all(|term| haystack.contains(&term.to_lowercase()))
    }

    pub fn apply(&self, row_texts: &[String]) -> TablePage {
        let page_size = self.page_size.max(1);
        let matching: Vec<usize> = row_texts
            .iter()
            .enumerate()
            .filter(|(_, text)| self.matches(text))
            .map(|(index, _)| index)
            .collect();

        let page_count = matching.len().div_ceil(page_size).max(1);
        let page = self.page.min(page_count - 1);
        let visible = matching
            .iter()
            .copied()
            .skip(page * page_size)
            .take(page_size)
            .collect();

        TablePage {
            visible,
            page,
            page_count,
            match_count: matching.len(),
        }
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

/// Element ids and tunables the client reads from the host page.
///
/// Every field has a default, so a page only needs to override what differs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub form_id: String,
    pub submit_id: String,
    pub toast_container_id: String,
    pub theme_toggle_id: String,
    pub table_id: String,
    pub monthly_chart_id: String,
    pub category_chart_id: String,
    pub monthly_data_id: String,
    pub category_data_id: String,
    pub toast_delay_ms: u32,
    pub theme_storage_key: String,
    pub table_page_size: usize,
    pub table_amount_column: usize,
    pub log_level: LogLevel,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            form_id: "expenseForm".to_string(),
            submit_id: "expenseSubmit".to_string(),
            toast_container_id: "toast-container".to_string(),
            theme_toggle_id: "toggleDark".to_string(),
            table_id: "expensesTable".to_string(),
            monthly_chart_id: "monthlyChart".to_string(),
            category_chart_id: "categoryChart".to_string(),
            monthly_data_id: "monthly-data".to_string(),
            category_data_id: "category-data".to_string(),
            toast_delay_ms: DEFAULT_AUTO_DISMISS_MS,
            theme_storage_key: "theme".to_string(),
            table_page_size: DEFAULT_TABLE_PAGE_SIZE,
            table_amount_column: 3,
            log_level: LogLevel::Info,
        }
    }
}

impl PageConfig {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}
