//! Core data structures for break analysis input.

mod time_series;

pub use time_series::{
    date_ordinal, filter_to_window, parse_date, Column, ColumnData, FocusWindow, SeriesFrame,
    SeriesFrameBuilder, TimePoint,
};
