use {
    crate::{
        procfs::{CpuTime, Measurement, MemInfo, NetDev, ReadError},
        source::{ProcFs, ProcSource},
    },
    log::{debug, trace},
    std::collections::VecDeque,
};

#[cfg(test)]
mod tests;

/// a cumulative counter. these only increase, and are rendered by their delta.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Counter {
    BytesSent,
    BytesReceived,
    PacketsSent,
    PacketsReceived,
}

/// an instantaneous percentage, rendered directly.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Gauge {
    Cpu,
    Memory,
}

/// the cumulative counters at one instant.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Counters([u64; Counter::COUNT]);

/// the per-counter difference between two consecutive [`Counters`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Delta([u64; Counter::COUNT]);

/// the gauges at one instant, each in `[0, 100]`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Gauges {
    pub cpu: f64,
    pub memory: f64,
}

/// everything one tick renders.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tick {
    pub delta: Delta,
    pub gauges: Gauges,
}

/// a provider of operating system metrics.
pub trait Probe {
    /// samples the cumulative counters.
    fn counters(&mut self) -> Result<Counters, ReadError>;
    /// samples the gauges.
    fn gauges(&mut self) -> Result<Gauges, ReadError>;
}

/// metrics backed by the `/proc` filesystem.
pub struct ProcProbe<S = ProcFs> {
    source: S,
    /// the cpu time at the previous gauge sample.
    cpu: Option<CpuTime>,
}

/// a mock probe, replaying queued samples.
#[derive(Default)]
#[allow(dead_code, reason = "this is a testing utility.")]
pub struct MockProbe {
    counters: VecDeque<Counters>,
    gauges: VecDeque<Gauges>,
}

/// turns cumulative counters into per-tick deltas.
pub struct Sampler<P = ProcProbe> {
    probe: P,
    state: State,
}

enum State {
    /// no counters have been sampled yet.
    Idle,
    /// the counters of the previous tick.
    Sampling { last: Counters },
}

// === impl Counter ===

impl Counter {
    pub const COUNT: usize = 4;

    /// the position of this counter within [`Counters`] and [`Delta`].
    pub const fn index(self) -> usize {
        match self {
            Self::BytesSent => 0,
            Self::BytesReceived => 1,
            Self::PacketsSent => 2,
            Self::PacketsReceived => 3,
        }
    }
}

// === impl Counters ===

impl Counters {
    pub const fn new(
        bytes_sent: u64,
        bytes_received: u64,
        packets_sent: u64,
        packets_received: u64,
    ) -> Self {
        Self([bytes_sent, bytes_received, packets_sent, packets_received])
    }

    pub const fn get(&self, counter: Counter) -> u64 {
        self.0[counter.index()]
    }

    /// returns how far each counter moved since `last`.
    ///
    /// counters that moved backwards, e.g. because an interface disappeared, report zero.
    pub fn delta(&self, last: &Self) -> Delta {
        let (Self(current), Self(last)) = (self, last);
        let mut delta = [0; Counter::COUNT];
        for (i, (current, last)) in current.iter().zip(last).enumerate() {
            if current < last {
                debug!("counter {i} moved backwards from {last} to {current}");
            }
            delta[i] = current.saturating_sub(*last);
        }
        Delta(delta)
    }
}

impl From<NetDev> for Counters {
    fn from(
        NetDev {
            rx_bytes,
            rx_packets,
            tx_bytes,
            tx_packets,
        }: NetDev,
    ) -> Self {
        Self::new(tx_bytes, rx_bytes, tx_packets, rx_packets)
    }
}

// === impl Delta ===

impl Delta {
    pub const fn get(&self, counter: Counter) -> u64 {
        self.0[counter.index()]
    }
}

impl From<[u64; Counter::COUNT]> for Delta {
    fn from(delta: [u64; Counter::COUNT]) -> Self {
        Self(delta)
    }
}

// === impl Gauges ===

impl Gauges {
    pub const fn get(&self, gauge: Gauge) -> f64 {
        match gauge {
            Gauge::Cpu => self.cpu,
            Gauge::Memory => self.memory,
        }
    }
}

// === impl ProcProbe ===

impl<S> ProcProbe<S> {
    pub fn new(source: S) -> Self {
        Self { source, cpu: None }
    }
}

impl Default for ProcProbe {
    fn default() -> Self {
        Self::new(ProcFs::default())
    }
}

impl<S: ProcSource> Probe for ProcProbe<S> {
    fn counters(&mut self) -> Result<Counters, ReadError> {
        NetDev::read(&self.source).map(Counters::from)
    }

    /// NB: cpu load is measured since the previous call, so the first call reports `0.0`.
    fn gauges(&mut self) -> Result<Gauges, ReadError> {
        let now = CpuTime::read(&self.source)?;
        let cpu = match self.cpu.replace(now.clone()) {
            Some(last) => Measurement::new(&last, &now).percentage(),
            None => 0.0,
        };
        let memory = MemInfo::read(&self.source)?.percentage();

        Ok(Gauges { cpu, memory })
    }
}

// === impl MockProbe ===

#[allow(dead_code, reason = "this is a testing utility.")]
impl MockProbe {
    pub fn with_counters(mut self, counters: impl IntoIterator<Item = Counters>) -> Self {
        self.counters.extend(counters);
        self
    }

    pub fn with_gauges(mut self, gauges: impl IntoIterator<Item = Gauges>) -> Self {
        self.gauges.extend(gauges);
        self
    }
}

impl Probe for MockProbe {
    fn counters(&mut self) -> Result<Counters, ReadError> {
        Ok(self
            .counters
            .pop_front()
            .expect("mock counters should not be empty"))
    }

    fn gauges(&mut self) -> Result<Gauges, ReadError> {
        Ok(self
            .gauges
            .pop_front()
            .expect("mock gauges should not be empty"))
    }
}

// === impl Sampler ===

impl<P: Probe> Sampler<P> {
    pub fn new(probe: P) -> Self {
        Self {
            probe,
            state: State::Idle,
        }
    }

    /// samples the metrics of one tick.
    ///
    /// NB: the first call takes two counter samples moments apart, so its delta covers that
    /// short window rather than the time since boot.
    pub fn observe(&mut self) -> Result<Tick, ReadError> {
        let Self { probe, state } = self;

        let last = match state {
            State::Idle => probe.counters()?,
            State::Sampling { last } => *last,
        };

        // the delta is fixed before the gauges are refreshed, keeping the tick consistent.
        let counters = probe.counters()?;
        let delta = counters.delta(&last);
        let gauges = probe.gauges()?;
        *state = State::Sampling { last: counters };

        trace!("sampled {delta:?} {gauges:?}");
        Ok(Tick { delta, gauges })
    }
}
