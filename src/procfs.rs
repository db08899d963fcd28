use {
    crate::source::{ProcFile, ProcSource},
    std::{
        fmt::{self, Display},
        io::{self, Read},
        num::ParseIntError,
        ops::Not,
    },
};

pub use self::{
    cpu_time::{CpuTime, Measurement},
    user_hz::UserHz,
};

mod cpu_time;
mod user_hz;

#[cfg(test)]
mod tests;

/// network traffic summed over every interface in `/proc/net/dev`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct NetDev {
    pub rx_bytes: u64,
    pub rx_packets: u64,
    pub tx_bytes: u64,
    pub tx_packets: u64,
}

/// memory figures from `/proc/meminfo`, in kibibytes.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct MemInfo {
    pub total: u64,
    pub available: u64,
}

#[derive(Debug, Eq, PartialEq)]
pub enum ParseError {
    /// `/proc/stat` had no aggregate `cpu` line.
    MissingCpu,
    /// the aggregate `cpu` line had an unexpected number of fields.
    CpuFields { fields: usize },
    UserHzParse(ParseIntError),
    /// an interface line in `/proc/net/dev` was malformed.
    Interface { line: String },
    CounterParse(ParseIntError),
    /// a required `/proc/meminfo` field was absent.
    MissingField { field: &'static str },
}

#[derive(Debug)]
pub enum ReadError {
    Io(io::Error),
    Parse(ParseError),
}

/// reads a file from the source into a string.
fn read_to_string(source: &impl ProcSource, file: ProcFile) -> Result<String, ReadError> {
    let mut contents = String::new();
    source.open(file)?.read_to_string(&mut contents)?;
    Ok(contents)
}

// === impl CpuTime ===

impl CpuTime {
    /// reads the aggregate cpu time of the system.
    pub fn read(source: &impl ProcSource) -> Result<Self, ReadError> {
        read_to_string(source, ProcFile::Stat)?
            .parse()
            .map_err(ReadError::Parse)
    }
}

/// parses the aggregate `cpu` line out of `/proc/stat` contents.
impl std::str::FromStr for CpuTime {
    type Err = ParseError;
    fn from_str(stat: &str) -> Result<Self, Self::Err> {
        let times = stat
            .lines()
            .map(str::split_whitespace)
            .find_map(|mut tokens| (tokens.next() == Some("cpu")).then_some(tokens))
            .ok_or(ParseError::MissingCpu)?;

        times
            .map(str::parse::<UserHz>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(ParseError::UserHzParse)
            .and_then(CpuTime::try_from)
    }
}

// === impl NetDev ===

impl NetDev {
    /// the number of counters on each interface line.
    const FIELDS: usize = 16;

    /// reads the network counters of the system.
    pub fn read(source: &impl ProcSource) -> Result<Self, ReadError> {
        read_to_string(source, ProcFile::NetDev)?
            .parse()
            .map_err(ReadError::Parse)
    }
}

/// each interface line is `name: rx_bytes rx_packets .. (8 rx fields) tx_bytes tx_packets ..`.
/// the two header lines contain `|` separators and are skipped.
impl std::str::FromStr for NetDev {
    type Err = ParseError;
    fn from_str(contents: &str) -> Result<Self, Self::Err> {
        let interfaces = contents
            .lines()
            .filter(|line| line.contains('|').not() && line.trim().is_empty().not());

        let mut totals = Self::default();
        for line in interfaces {
            let malformed = || ParseError::Interface {
                line: line.to_owned(),
            };

            let (_, counters) = line.split_once(':').ok_or_else(malformed)?;
            let counters = counters
                .split_whitespace()
                .map(str::parse::<u64>)
                .collect::<Result<Vec<_>, _>>()
                .map_err(ParseError::CounterParse)?;

            if counters.len() != Self::FIELDS {
                return Err(malformed());
            }
            let [rx_bytes, rx_packets, _, _, _, _, _, _, tx_bytes, tx_packets, ..] = counters[..]
            else {
                return Err(malformed());
            };

            totals.rx_bytes += rx_bytes;
            totals.rx_packets += rx_packets;
            totals.tx_bytes += tx_bytes;
            totals.tx_packets += tx_packets;
        }

        Ok(totals)
    }
}

// === impl MemInfo ===

impl MemInfo {
    /// reads the memory figures of the system.
    pub fn read(source: &impl ProcSource) -> Result<Self, ReadError> {
        read_to_string(source, ProcFile::MemInfo)?
            .parse()
            .map_err(ReadError::Parse)
    }

    /// returns the percentage of memory in use, in `[0, 100]`.
    pub fn percentage(&self) -> f64 {
        let Self { total, available } = *self;
        if total == 0 {
            return 0.0;
        }

        let used = total.saturating_sub(available);
        (used as f64 / total as f64) * 100.0
    }
}

/// kernels before 3.14 lack `MemAvailable`; it is then estimated as free + buffers + cached.
impl std::str::FromStr for MemInfo {
    type Err = ParseError;
    fn from_str(contents: &str) -> Result<Self, Self::Err> {
        let field = |name: &str| -> Result<Option<u64>, ParseError> {
            contents
                .lines()
                .find_map(|line| line.strip_prefix(name)?.strip_prefix(':'))
                .and_then(|value| value.split_whitespace().next())
                .map(str::parse::<u64>)
                .transpose()
                .map_err(ParseError::CounterParse)
        };
        let required = |name: &'static str| {
            field(name)?.ok_or(ParseError::MissingField { field: name })
        };

        let total = required("MemTotal")?;
        let available = match field("MemAvailable")? {
            Some(available) => available,
            None => {
                let buffers = field("Buffers")?.unwrap_or(0);
                let cached = field("Cached")?.unwrap_or(0);
                required("MemFree")? + buffers + cached
            }
        };

        Ok(Self { total, available })
    }
}

// === impl ReadError ===

impl std::error::Error for ReadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(io) => Some(io),
            Self::Parse(parse) => Some(parse),
        }
    }
}

impl Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(io) => write!(f, "{io}"),
            Self::Parse(parse) => write!(f, "{parse}"),
        }
    }
}

impl From<ParseError> for ReadError {
    fn from(parse: ParseError) -> Self {
        Self::Parse(parse)
    }
}

impl From<io::Error> for ReadError {
    fn from(io: io::Error) -> Self {
        Self::Io(io)
    }
}

// === impl ParseError ===

impl Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ParseError::*;
        match self {
            MissingCpu => f.write_str("no aggregate cpu entry"),
            CpuFields { fields } => write!(f, "expected 4 to 10 cpu time fields, found {fields}"),
            UserHzParse(error) => write!(f, "invalid time value: {error}"),
            Interface { line } => write!(f, "malformed interface entry: {line:?}"),
            CounterParse(error) => write!(f, "invalid counter value: {error}"),
            MissingField { field } => write!(f, "missing field: {field}"),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        use ParseError::*;
        match self {
            UserHzParse(error) | CounterParse(error) => Some(error),
            MissingCpu | CpuFields { .. } | Interface { .. } | MissingField { .. } => None,
        }
    }
}
