use super::*;

/// how long the system's cpus spent in each state since boot.
///
/// see `proc_stat(5)` for more information.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CpuTime {
    /// time spent in user mode.
    user: UserHz,
    /// time spent in user mode with low priority (nice).
    nice: UserHz,
    /// time spent in system mode.
    system: UserHz,
    /// time spent in the idle task.
    idle: UserHz,
    /// time waiting for i/o to complete. this value is not reliable, and may decrease.
    iowait: UserHz,
    /// time servicing interrupts.
    irq: UserHz,
    /// time servicing softirqs.
    softirq: UserHz,
    /// stolen time, spent in other operating systems when running in a virtualized environment.
    steal: UserHz,
    /// time spent running a virtual cpu for guests. this is already counted in `user`.
    guest: UserHz,
    /// time spent running a niced guest. this is already counted in `nice`.
    guest_nice: UserHz,
}

/// the difference between two [`CpuTime`]s.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Measurement {
    active: UserHz,
    total: UserHz,
}

// === impl CpuTime ===

impl CpuTime {
    /// the number of fields kernels have reported since 2.6.33.
    const FIELDS: usize = 10;
    /// the number of fields every kernel reports.
    const MIN_FIELDS: usize = 4;

    /// time spent doing anything but idling.
    fn active(&self) -> UserHz {
        let Self {
            user,
            nice,
            system,
            irq,
            softirq,
            steal,
            idle: _,
            iowait: _,
            guest: _,
            guest_nice: _,
        } = *self;

        user + nice + system + irq + softirq + steal
    }

    fn total(&self) -> UserHz {
        self.active() + self.idle + self.iowait
    }
}

/// older kernels report fewer fields; the missing trailing fields are zero.
impl TryFrom<Vec<UserHz>> for CpuTime {
    type Error = ParseError;
    fn try_from(mut times: Vec<UserHz>) -> Result<Self, Self::Error> {
        let fields = times.len();
        if !(Self::MIN_FIELDS..=Self::FIELDS).contains(&fields) {
            return Err(ParseError::CpuFields { fields });
        }

        times.resize(Self::FIELDS, UserHz::ZERO);
        <[UserHz; 10]>::try_from(times)
            .map(Self::from)
            .map_err(|_| ParseError::CpuFields { fields })
    }
}

impl From<[UserHz; 10]> for CpuTime {
    fn from(
        [
            user,
            nice,
            system,
            idle,
            iowait,
            irq,
            softirq,
            steal,
            guest,
            guest_nice,
        ]: [UserHz; 10],
    ) -> Self {
        Self {
            user,
            nice,
            system,
            idle,
            iowait,
            irq,
            softirq,
            steal,
            guest,
            guest_nice,
        }
    }
}

// == impl Measurement ===

impl Measurement {
    pub fn new(a: &CpuTime, b: &CpuTime) -> Self {
        Self {
            active: b.active() - a.active(),
            total: b.total() - a.total(),
        }
    }

    /// returns the percentage of active cpu time, in `[0, 100]`.
    ///
    /// a measurement over no elapsed time is reported as idle. iowait may move backwards, so
    /// the result is clamped.
    pub fn percentage(&self) -> f64 {
        let Self { active, total } = *self;
        if total == UserHz::ZERO {
            return 0.0;
        }

        ((active / total) * 100.0).clamp(0.0, 100.0)
    }
}
