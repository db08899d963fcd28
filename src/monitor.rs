use {
    crate::{
        column::{COLUMNS, Layout},
        markup::{Align, Code, Markup, MarkupError, RenderConfig},
        procfs::ReadError,
        sampler::{ProcProbe, Probe, Sampler},
    },
    crossterm::{QueueableCommand, style::Print},
    log::{debug, info},
    std::{
        fmt::{self, Display},
        io::{self, Write},
        iter::once,
        sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError},
        time::Duration,
    },
};

#[cfg(test)]
mod tests;

/// what the monitor shows, and how often.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MonitorOptions {
    /// the time between ticks.
    pub rate: Duration,
    /// whether the banner and header are printed before the first row.
    pub banner: bool,
    /// whether byte columns are shown in bits.
    pub bits: bool,
}

/// samples metrics and renders them as a single, continuously overwritten row.
pub struct Monitor<P = ProcProbe> {
    sampler: Sampler<P>,
    layout: Layout,
    config: RenderConfig,
    options: MonitorOptions,
}

/// fires a [`Shutdown`].
#[derive(Clone, Debug)]
pub struct Trigger {
    tx: Sender<()>,
}

/// the receiving side of an external interrupt.
#[derive(Debug)]
pub struct Shutdown {
    rx: Receiver<()>,
}

#[derive(Debug)]
pub enum MonitorError {
    Read(ReadError),
    Write(io::Error),
}

/// returns a connected trigger and shutdown.
pub fn shutdown() -> (Trigger, Shutdown) {
    let (tx, rx) = mpsc::channel();
    (Trigger { tx }, Shutdown { rx })
}

// === impl MonitorOptions ===

impl Default for MonitorOptions {
    fn default() -> Self {
        Self {
            rate: Duration::from_millis(1000),
            banner: true,
            bits: false,
        }
    }
}

// === impl Monitor ===

impl<P: Probe> Monitor<P> {
    /// completes the columns for the given configuration.
    pub fn new(
        probe: P,
        config: RenderConfig,
        options: MonitorOptions,
    ) -> Result<Self, MarkupError> {
        let layout = Layout::new(&COLUMNS, &config, options.bits)?;
        info!(
            "{} columns, {} terminal columns wide",
            layout.columns().len(),
            layout.width()
        );

        Ok(Self {
            sampler: Sampler::new(probe),
            layout,
            config,
            options,
        })
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// returns the lines printed above the rows: the banner, then the header.
    pub fn preamble(&self) -> Vec<Markup> {
        let width = self.layout.width();
        let rate = self.options.rate.as_millis();
        let banner = [
            Markup::new().style(Code::Cyan).text("...:..:.:::.:..:..."),
            Markup::new()
                .style(Code::Bold)
                .text(".:.: REAL-TIME RESOURCES MONITOR :.:."),
            Markup::new().text(format!("(Refresh rate is {rate}ms)")),
        ];

        let banner = banner
            .into_iter()
            .map(|line| line.justify(width, Align::Center, ' '));

        once(Markup::new())
            .chain(banner)
            .chain(once(Markup::new()))
            .chain(self.layout.header())
            .collect()
    }

    /// runs the monitor until `shutdown` fires.
    ///
    /// NB: the shutdown is observed while sleeping between ticks and before printing a row. a
    /// single trailing newline is written once the loop stops.
    pub fn run(self, out: &mut impl Write, shutdown: &Shutdown) -> Result<(), MonitorError> {
        if self.options.banner {
            for line in self.preamble() {
                out.queue(Print(line.encode(&self.config)))?
                    .queue(Print('\n'))?;
            }
            out.flush()?;
        }

        let Self {
            mut sampler,
            layout,
            config,
            options,
        } = self;

        let mut previous = vec![0.0; layout.columns().len()];
        loop {
            let tick = sampler.observe()?;
            let values = layout.values(&tick);

            if shutdown.requested() {
                debug!("shutdown requested before printing");
                break;
            }

            let row = layout.row(&values, &previous).encode(&config);
            out.queue(Print(row))?.queue(Print('\r'))?;
            out.flush()?;
            previous = values;

            if shutdown.sleep(options.rate) {
                debug!("shutdown requested while sleeping");
                break;
            }
        }

        out.queue(Print('\n'))?;
        out.flush()?;

        Ok(())
    }
}

// === impl Trigger ===

impl Trigger {
    /// requests that the monitor stop.
    pub fn fire(&self) {
        // the monitor may already have stopped, in which case there is nobody to tell.
        let _ = self.tx.send(());
    }
}

// === impl Shutdown ===

impl Shutdown {
    /// returns true if a shutdown has been requested.
    fn requested(&self) -> bool {
        match self.rx.try_recv() {
            Ok(()) => true,
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => false,
        }
    }

    /// sleeps for `duration`, returning early with true if a shutdown is requested.
    fn sleep(&self, duration: Duration) -> bool {
        match self.rx.recv_timeout(duration) {
            Ok(()) => true,
            Err(RecvTimeoutError::Timeout) => false,
            Err(RecvTimeoutError::Disconnected) => {
                // every trigger is gone, so nothing can interrupt this sleep.
                std::thread::sleep(duration);
                false
            }
        }
    }
}

// === impl MonitorError ===

impl std::error::Error for MonitorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read(read) => Some(read),
            Self::Write(io) => Some(io),
        }
    }
}

impl Display for MonitorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read(read) => write!(f, "failed to sample metrics: {read}"),
            Self::Write(io) => write!(f, "failed to write output: {io}"),
        }
    }
}

impl From<ReadError> for MonitorError {
    fn from(read: ReadError) -> Self {
        Self::Read(read)
    }
}

impl From<io::Error> for MonitorError {
    fn from(io: io::Error) -> Self {
        Self::Write(io)
    }
}
