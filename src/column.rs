//! the metric columns, and the layout that composes them into rows.

use {
    crate::{
        markup::{Align, Code, Markup, MarkupError, RenderConfig},
        sampler::{Counter, Gauge, Tick},
        units::{self, BIT, BITS_PER_BYTE, BYTE, COUNT_PRECISION, SIZE_PRECISION, Trend},
    },
    std::iter::{once, repeat_n},
};


/// the text placed between, before, and after cells.
pub const SEPARATOR: &str = " | ";

/// the columns, in display order.
pub const COLUMNS: [ColumnSpec; 6] = [
    ColumnSpec {
        key: "packets-out",
        title: "#b↑ Packets",
        kind: MetricKind::Counter(Counter::PacketsSent),
        format: Format::COUNT,
        style: None,
        worst_case: WORST_COUNT,
    },
    ColumnSpec {
        key: "packets-in",
        title: "#b↓ Packets",
        kind: MetricKind::Counter(Counter::PacketsReceived),
        format: Format::COUNT,
        style: None,
        worst_case: WORST_COUNT,
    },
    ColumnSpec {
        key: "bytes-out",
        title: "#b↑ Bytes",
        kind: MetricKind::Counter(Counter::BytesSent),
        format: Format::BYTES,
        style: None,
        worst_case: WORST_SIZE,
    },
    ColumnSpec {
        key: "bytes-in",
        title: "#b↓ Bytes",
        kind: MetricKind::Counter(Counter::BytesReceived),
        format: Format::BYTES,
        style: None,
        worst_case: WORST_SIZE,
    },
    ColumnSpec {
        key: "cpu",
        title: "#bCPU",
        kind: MetricKind::Gauge(Gauge::Cpu),
        format: Format::PERCENT,
        style: Some(StyleRule::LOAD),
        worst_case: WORST_PERCENT,
    },
    ColumnSpec {
        key: "memory",
        title: "#bMemory",
        kind: MetricKind::Gauge(Gauge::Memory),
        format: Format::PERCENT,
        style: Some(StyleRule::LOAD),
        worst_case: WORST_PERCENT,
    },
];

/// formats as `999.99k`, the widest a count gets.
const WORST_COUNT: f64 = 999_990.0;
/// formats as `1024.0 KB`, the widest a size gets.
const WORST_SIZE: f64 = 1_048_575.0;
const WORST_PERCENT: f64 = 100.0;

/// where a column's value comes from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MetricKind {
    /// the per-tick delta of a cumulative counter.
    Counter(Counter),
    /// an instantaneous gauge reading.
    Gauge(Gauge),
}

/// how a column's value is turned into text.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Format {
    /// decimal-scaled counts, see [`units::format_count`].
    Count { precision: usize },
    /// binary-scaled sizes, see [`units::format_size`].
    Size { unit: char, precision: usize },
    /// percentages.
    Percent { precision: usize },
}

/// picks a style from a value, by descending thresholds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StyleRule {
    /// `(threshold, style)` pairs, highest threshold first.
    thresholds: &'static [(f64, Code)],
    /// the style of values below every threshold.
    default: Code,
}

/// the static definition of a column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColumnSpec {
    pub key: &'static str,
    /// the title, in markup.
    pub title: &'static str,
    pub kind: MetricKind,
    pub format: Format,
    pub style: Option<StyleRule>,
    /// a value whose formatted text is at least as wide as any realistic value's.
    pub worst_case: f64,
}

/// a column whose width has been fixed, ready to render values.
#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    key: &'static str,
    title: Markup,
    kind: MetricKind,
    /// a factor applied to raw values before formatting.
    scale: f64,
    format: Format,
    style: Option<StyleRule>,
    width: usize,
}

/// the completed columns, in display order.
#[derive(Clone, Debug)]
pub struct Layout {
    columns: Vec<Column>,
}

// === impl Format ===

impl Format {
    pub const COUNT: Self = Self::Count {
        precision: COUNT_PRECISION,
    };
    pub const BYTES: Self = Self::Size {
        unit: BYTE,
        precision: SIZE_PRECISION,
    };
    pub const PERCENT: Self = Self::Percent { precision: 1 };

    pub fn apply(&self, value: f64) -> String {
        match *self {
            Self::Count { precision } => units::format_count(value, precision),
            Self::Size { unit, precision } => units::format_size(value, unit, precision),
            Self::Percent { precision } => units::format_percent(value, precision),
        }
    }
}

// === impl StyleRule ===

impl StyleRule {
    /// load levels: red from 85%, yellow from 65%, green below.
    pub const LOAD: Self = Self {
        thresholds: &[(85.0, Code::Danger), (65.0, Code::Warn)],
        default: Code::Good,
    };

    pub const fn new(thresholds: &'static [(f64, Code)], default: Code) -> Self {
        Self {
            thresholds,
            default,
        }
    }

    /// returns the style of the first threshold `value` meets, or the default.
    pub fn resolve(&self, value: f64) -> Code {
        self.thresholds
            .iter()
            .find(|(threshold, _)| value >= *threshold)
            .map_or(self.default, |&(_, code)| code)
    }
}

// === impl Column ===

impl Column {
    /// fixes the width of a column.
    ///
    /// the width fits both the title and the worst-case value followed by its trend.
    pub fn complete(spec: &ColumnSpec, config: &RenderConfig) -> Result<Self, MarkupError> {
        let ColumnSpec {
            key,
            title,
            kind,
            format,
            style,
            worst_case,
        } = *spec;

        let title = config.parse(title)?;
        let value_width = format.apply(worst_case).chars().count() + Trend::WIDTH;
        let width = title.len().max(value_width);

        Ok(Self {
            key,
            title,
            kind,
            scale: 1.0,
            format,
            style,
            width,
        })
    }

    /// returns the equivalent column denominated in bits, if this one is denominated in bytes.
    ///
    /// the width is kept: a bit count never formats wider than the byte count's worst case.
    pub fn into_bits(self) -> Self {
        let mentions_bytes = self.title.plain_text().to_lowercase().contains("byte");
        let Format::Size { unit: BYTE, precision } = self.format else {
            return self;
        };
        if !mentions_bytes {
            return self;
        }

        Self {
            title: self.title.map_text(|text| text.replace("Bytes", "Bits")),
            scale: self.scale * BITS_PER_BYTE,
            format: Format::Size {
                unit: BIT,
                precision,
            },
            ..self
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn title(&self) -> &Markup {
        &self.title
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// returns this column's value for a tick.
    pub fn value(&self, Tick { delta, gauges }: &Tick) -> f64 {
        let raw = match self.kind {
            MetricKind::Counter(counter) => delta.get(counter) as f64,
            MetricKind::Gauge(gauge) => gauges.get(gauge),
        };

        raw * self.scale
    }

    /// renders a value and its trend, centered in this column's width.
    pub fn render(&self, value: f64, previous: f64) -> Markup {
        let styled = match &self.style {
            Some(rule) => Markup::new().style(rule.resolve(value)),
            None => Markup::new(),
        };

        styled
            .text(self.format.apply(value))
            .text(format!(" {}", Trend::between(value, previous)))
            .justify(self.width, Align::Center, ' ')
    }
}

// === impl Layout ===

impl Layout {
    /// completes each column, converting byte columns to bits if asked to.
    pub fn new(
        specs: &[ColumnSpec],
        config: &RenderConfig,
        bits: bool,
    ) -> Result<Self, MarkupError> {
        let columns = specs
            .iter()
            .map(|spec| Column::complete(spec, config))
            .map(|column| if bits { column.map(Column::into_bits) } else { column })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { columns })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// the number of terminal columns a row occupies.
    pub fn width(&self) -> usize {
        let cells = self.columns.iter().map(Column::width).sum::<usize>();
        cells + SEPARATOR.chars().count() * (self.columns.len() + 1)
    }

    /// returns the titles row and the separator row.
    pub fn header(&self) -> [Markup; 2] {
        let titles = self.columns.iter().map(|column| {
            column
                .title()
                .clone()
                .justify(column.width(), Align::Center, ' ')
        });
        let rules = self
            .columns
            .iter()
            .map(|column| Markup::new().text(repeat_n('-', column.width()).collect::<String>()));

        [join(titles), join(rules)]
    }

    /// returns each column's value for a tick.
    pub fn values(&self, tick: &Tick) -> Vec<f64> {
        self.columns.iter().map(|column| column.value(tick)).collect()
    }

    /// renders a row of values, each trended against its previous value.
    pub fn row(&self, values: &[f64], previous: &[f64]) -> Markup {
        assert_eq!(values.len(), self.columns.len());
        assert_eq!(previous.len(), self.columns.len());

        let cells = self
            .columns
            .iter()
            .zip(values.iter().zip(previous))
            .map(|(column, (&value, &previous))| column.render(value, previous));

        join(cells)
    }
}

/// joins cells with the separator, which also opens and closes the row.
fn join(cells: impl IntoIterator<Item = Markup>) -> Markup {
    let separator = || Markup::new().style(Code::Reset).text(SEPARATOR);
    cells
        .into_iter()
        .flat_map(|cell| [separator(), cell])
        .chain(once(separator()))
        .fold(Markup::new(), Markup::append)
}
