//! a compact network, cpu, and memory monitor.
//!
//! each tick samples the system's metrics and renders them as a single row of fixed-width
//! columns, overwriting the previous row in place.

pub use self::{
    column::{COLUMNS, Column, ColumnSpec, Layout},
    markup::{Markup, MarkupError, RenderConfig},
    monitor::{Monitor, MonitorError, MonitorOptions, Shutdown, Trigger, shutdown},
    sampler::{ProcProbe, Probe, Sampler, Tick},
    update::{HttpUpdater, UpdateError, UpdateOutcome, Updater},
};

/// metric columns, and the layout that joins them into rows.
pub mod column;

/// the inline `#x` style-tag language.
///
/// this is how titles and cells carry color, while keeping track of how many terminal columns
/// they occupy.
pub mod markup;

/// the render loop.
pub mod monitor;

/// kernel statistics facilities.
///
/// this file provides tools to parse `/proc/net/dev`, `/proc/stat`, and `/proc/meminfo`.
pub mod procfs;

/// turns kernel statistics into per-tick metrics.
pub mod sampler;

/// abstracts over where kernel statistics are read from.
pub mod source;

/// unit-scaling formatters.
pub mod units;

pub mod update;
