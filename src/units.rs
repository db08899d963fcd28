use std::fmt::{self, Display};


/// suffixes for decimal-scaled counts, starting with the unscaled "no suffix" glyph.
const COUNT_UNITS: [char; 6] = [' ', 'k', 'm', 'g', 't', 'p'];
const COUNT_BASE: f64 = 1000.0;

/// binary prefixes applied to a caller-supplied unit letter.
const SIZE_PREFIXES: [&str; 9] = ["", "K", "M", "G", "T", "P", "E", "Z", "Y"];
const SIZE_BASE: f64 = 1024.0;

/// the default number of fractional digits shown for counts.
pub const COUNT_PRECISION: usize = 2;

/// the default number of fractional digits shown for sizes.
pub const SIZE_PRECISION: usize = 1;

/// the unit letter of byte-denominated sizes.
pub const BYTE: char = 'B';

/// the unit letter of bit-denominated sizes.
pub const BIT: char = 'b';

/// the factor that turns a byte count into a bit count.
pub const BITS_PER_BYTE: f64 = 8.0;

/// the direction a value moved in since the previous tick.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Trend {
    Up,
    Down,
    Flat,
}

/// formats a count with decimal (base 1000) scaling, e.g. `1500` becomes `1.50k`.
///
/// counts below 1000 are shown as integers followed by the blank "no suffix" glyph, and
/// non-positive counts are shown as the `-- ` placeholder.
///
/// # panics
///
/// panics if the value is too large for the unit table. values are expected to stay within six
/// orders of magnitude.
pub fn format_count(value: f64, precision: usize) -> String {
    let [none, ..] = COUNT_UNITS;

    if value <= 0.0 {
        return format!("--{none}");
    } else if value < COUNT_BASE {
        return format!("{}{none}", value.trunc() as u64);
    }

    let mut unit = count_unit(value);
    let mut scaled = format!("{:.precision$}", value / COUNT_BASE.powi(unit as i32));

    // rounding may carry into the next unit, e.g. 999_999 would otherwise print `1000.00k`.
    if scaled.parse::<f64>().is_ok_and(|s| s >= COUNT_BASE) {
        unit += 1;
        scaled = format!("{:.precision$}", value / COUNT_BASE.powi(unit as i32));
    }

    assert!(
        unit < COUNT_UNITS.len(),
        "count {value} exceeds the largest unit `{}`",
        COUNT_UNITS[COUNT_UNITS.len() - 1]
    );

    format!("{scaled}{}", COUNT_UNITS[unit])
}

/// returns the largest unit index `u` such that `value / 1000^u >= 1`.
fn count_unit(value: f64) -> usize {
    (1..COUNT_UNITS.len())
        .take_while(|&u| value / COUNT_BASE.powi(u as i32) >= 1.0)
        .count()
}

/// formats a size with binary (base 1024) scaling, e.g. `1536` bytes becomes `1.5 KB`.
///
/// `unit` is the letter of the unscaled quantity. non-positive sizes are shown as a `-- B`
/// placeholder in that unit.
///
/// # panics
///
/// panics if the value is too large for the prefix table.
pub fn format_size(value: f64, unit: char, precision: usize) -> String {
    if value <= 0.0 {
        return format!("-- {unit}");
    }

    let multiple = size_multiple(value);
    assert!(
        multiple < SIZE_PREFIXES.len(),
        "size {value} exceeds the largest prefix `{}`",
        SIZE_PREFIXES[SIZE_PREFIXES.len() - 1]
    );

    let scaled = value / SIZE_BASE.powi(multiple as i32);
    format!("{scaled:.precision$} {}{unit}", SIZE_PREFIXES[multiple])
}

/// returns `floor(log2(value) / log2(1024))`, the binary prefix index for a size.
fn size_multiple(value: f64) -> usize {
    (value.log2() / SIZE_BASE.log2()).floor().max(0.0) as usize
}

/// formats a percentage gauge, e.g. `42.5%`.
pub fn format_percent(value: f64, precision: usize) -> String {
    format!("{value:.precision$}%")
}

// === impl Trend ===

impl Trend {
    /// the number of terminal columns a trend occupies after a value: a space and a glyph.
    pub const WIDTH: usize = 2;

    /// returns the trend from `previous` to `current`.
    pub fn between(current: f64, previous: f64) -> Self {
        let delta = current - previous;
        if delta > 0.0 {
            Self::Up
        } else if delta < 0.0 {
            Self::Down
        } else {
            Self::Flat
        }
    }

    pub const fn glyph(self) -> char {
        match self {
            Self::Up => '▲',
            Self::Down => '▼',
            Self::Flat => ' ',
        }
    }
}

impl Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.glyph())
    }
}
