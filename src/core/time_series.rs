//! Tabular time series input and the point/window types used by the detector.

use crate::error::{BreakError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A single observation: calendar date and numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimePoint {
    pub date: NaiveDate,
    pub value: f64,
}

impl TimePoint {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }

    /// Day number of the date, used as the regression predictor.
    pub fn ordinal(&self) -> f64 {
        date_ordinal(self.date)
    }
}

/// Ordinal day number of a date: 0001-01-01 is day 1, increasing by one per
/// calendar day.
pub fn date_ordinal(date: NaiveDate) -> f64 {
    use chrono::Datelike;
    date.num_days_from_ce() as f64
}

/// Parse a date from `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS` or RFC 3339 text.
///
/// Time-of-day components are discarded.
pub fn parse_date(text: &str) -> Result<NaiveDate> {
    let text = text.trim();
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt.date());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S") {
        return Ok(dt.date());
    }
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.date_naive())
        .map_err(|_| BreakError::TimestampError(format!("could not parse date '{}'", text)))
}

/// Optional analysis window. Unset bounds resolve to the series' own
/// earliest and latest dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FocusWindow {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl FocusWindow {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self> {
        let window = Self { start, end };
        window.validate()?;
        Ok(window)
    }

    /// Window spanning the whole series.
    pub fn full() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> Result<()> {
        if let (Some(start), Some(end)) = (self.start, self.end) {
            if start > end {
                return Err(BreakError::InvalidParameter(format!(
                    "focus start {} is after focus end {}",
                    start, end
                )));
            }
        }
        Ok(())
    }

    /// Resolve to explicit bounds given the series' min and max dates.
    pub fn resolve(&self, data_min: NaiveDate, data_max: NaiveDate) -> (NaiveDate, NaiveDate) {
        (self.start.unwrap_or(data_min), self.end.unwrap_or(data_max))
    }
}

/// Keep the points whose date lies in `[start, end]`, preserving order.
pub fn filter_to_window(points: &[TimePoint], start: NaiveDate, end: NaiveDate) -> Vec<TimePoint> {
    points
        .iter()
        .filter(|p| p.date >= start && p.date <= end)
        .copied()
        .collect()
}

/// Column payload of a [`SeriesFrame`].
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<f64>),
    /// Pass-through column (e.g. a code label) that is never analysed.
    Text(Vec<String>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnData::Numeric(_))
    }
}

/// A named column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

/// A date column plus one or more named data columns, as produced by a
/// rolling aggregation step. Rows need not be sorted and dates may repeat.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesFrame {
    dates: Vec<NaiveDate>,
    columns: Vec<Column>,
}

/// Builder for constructing SeriesFrame.
#[derive(Debug, Clone, Default)]
pub struct SeriesFrameBuilder {
    dates: Vec<NaiveDate>,
    date_strings: Option<Vec<String>>,
    columns: Vec<Column>,
}

impl SeriesFrameBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dates(mut self, dates: Vec<NaiveDate>) -> Self {
        self.dates = dates;
        self.date_strings = None;
        self
    }

    /// Set the date column from text; parsed in [`build`](Self::build).
    pub fn date_strings<S: AsRef<str>>(mut self, dates: &[S]) -> Self {
        self.date_strings = Some(dates.iter().map(|s| s.as_ref().to_string()).collect());
        self
    }

    pub fn numeric(mut self, name: impl Into<String>, values: Vec<f64>) -> Self {
        self.columns.push(Column {
            name: name.into(),
            data: ColumnData::Numeric(values),
        });
        self
    }

    pub fn text(mut self, name: impl Into<String>, values: Vec<String>) -> Self {
        self.columns.push(Column {
            name: name.into(),
            data: ColumnData::Text(values),
        });
        self
    }

    pub fn build(self) -> Result<SeriesFrame> {
        let dates = match self.date_strings {
            Some(raw) => raw
                .iter()
                .map(|s| parse_date(s))
                .collect::<Result<Vec<_>>>()?,
            None => self.dates,
        };
        SeriesFrame::new(dates, self.columns)
    }
}

impl SeriesFrame {
    /// Create a frame, validating that every column matches the date column
    /// length and that column names are unique.
    pub fn new(dates: Vec<NaiveDate>, columns: Vec<Column>) -> Result<Self> {
        for (i, column) in columns.iter().enumerate() {
            if column.data.len() != dates.len() {
                return Err(BreakError::DimensionMismatch {
                    expected: dates.len(),
                    got: column.data.len(),
                });
            }
            if columns[..i].iter().any(|c| c.name == column.name) {
                return Err(BreakError::InvalidParameter(format!(
                    "duplicate column name '{}'",
                    column.name
                )));
            }
        }
        Ok(Self { dates, columns })
    }

    /// Create a frame with a single numeric column.
    pub fn univariate(dates: Vec<NaiveDate>, name: &str, values: Vec<f64>) -> Result<Self> {
        SeriesFrameBuilder::new()
            .dates(dates)
            .numeric(name, values)
            .build()
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Values of a numeric column.
    pub fn numeric_column(&self, name: &str) -> Result<&[f64]> {
        match self.column(name) {
            Some(Column {
                data: ColumnData::Numeric(values),
                ..
            }) => Ok(values),
            Some(_) => Err(BreakError::ColumnNotNumeric(name.to_string())),
            None => Err(BreakError::ColumnNotFound(name.to_string())),
        }
    }

    /// Names of the numeric columns, in frame order.
    pub fn numeric_column_names(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.data.is_numeric())
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Pick the column to analyse.
    ///
    /// An explicit name must refer to a numeric column. Otherwise the first
    /// numeric column whose name mentions "rolling" or "count" wins, then the
    /// first numeric column.
    pub fn resolve_value_column(&self, requested: Option<&str>) -> Result<String> {
        if let Some(name) = requested {
            self.numeric_column(name)?;
            return Ok(name.to_string());
        }

        let numeric = self.numeric_column_names();
        numeric
            .iter()
            .find(|name| {
                let lower = name.to_lowercase();
                lower.contains("rolling") || lower.contains("count")
            })
            .or_else(|| numeric.first())
            .map(|name| name.to_string())
            .ok_or(BreakError::NoNumericColumn)
    }

    /// Points of a numeric column, stably sorted by date.
    ///
    /// The frame itself is left untouched.
    pub fn sorted_points(&self, column: &str) -> Result<Vec<TimePoint>> {
        let values = self.numeric_column(column)?;
        if values.iter().any(|v| !v.is_finite()) {
            return Err(BreakError::MissingValues(column.to_string()));
        }
        let mut points: Vec<TimePoint> = self
            .dates
            .iter()
            .zip(values.iter())
            .map(|(&date, &value)| TimePoint::new(date, value))
            .collect();
        points.sort_by_key(|p| p.date);
        Ok(points)
    }
}
