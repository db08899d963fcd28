use {
    super::*,
    crate::sampler::{Counters, Gauges, MockProbe},
    std::thread,
};

const TINY: MonitorOptions = MonitorOptions {
    rate: Duration::ZERO,
    banner: false,
    bits: false,
};

/// a probe that fires a trigger when sampling the gauges of the given tick.
struct FiringProbe {
    inner: MockProbe,
    trigger: Trigger,
    /// the 1-indexed tick whose gauge sample fires the trigger.
    tick: usize,
    ticks: usize,
}

impl Probe for FiringProbe {
    fn counters(&mut self) -> Result<Counters, ReadError> {
        self.inner.counters()
    }

    fn gauges(&mut self) -> Result<Gauges, ReadError> {
        self.ticks += 1;
        if self.ticks == self.tick {
            self.trigger.fire();
        }
        self.inner.gauges()
    }
}

/// a probe with enough samples for `ticks` ticks, with every counter rising by 100 per tick.
fn rising(ticks: usize) -> MockProbe {
    let counters = (0..=ticks as u64).map(|i| Counters::new(i * 100, i * 100, i * 100, i * 100));
    let gauges = (0..ticks).map(|i| Gauges {
        cpu: 10.0 * i as f64,
        memory: 50.0,
    });

    // the first tick samples an initial set of counters before its own.
    MockProbe::default()
        .with_counters(counters)
        .with_gauges(gauges)
}

fn run(probe: impl Probe, options: MonitorOptions, shutdown: &Shutdown) -> String {
    let monitor = Monitor::new(probe, RenderConfig::plain(), options).unwrap();
    let mut out = Vec::new();
    monitor.run(&mut out, shutdown).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn interrupt_before_the_first_row() {
    let (trigger, shutdown) = shutdown();
    trigger.fire();

    let output = run(rising(1), TINY, &shutdown);
    assert_eq!(output, "\n");
}

#[test]
fn interrupt_while_sleeping() {
    let (trigger, shutdown) = shutdown();
    let options = MonitorOptions {
        rate: Duration::from_secs(60),
        ..TINY
    };

    let interrupter = thread::spawn(move || {
        thread::sleep(Duration::from_millis(100));
        trigger.fire();
    });
    let output = run(rising(1), options, &shutdown);
    interrupter.join().unwrap();

    let (row, trailer) = output.split_once('\r').unwrap();
    assert_eq!(trailer, "\n");
    assert!(row.contains('▲'));
    assert!(!row.contains('\n'));
}

#[test]
fn rows_overwrite_each_other() {
    let (trigger, shutdown) = shutdown();
    let probe = FiringProbe {
        inner: rising(4),
        trigger,
        tick: 4,
        ticks: 0,
    };

    let output = run(probe, TINY, &shutdown);
    assert_eq!(output.matches('\r').count(), 3);
    assert_eq!(output.matches('\n').count(), 1);
    assert!(output.ends_with("\r\n"));
}

#[test]
fn trends_compare_against_the_previous_row() {
    let (trigger, shutdown) = shutdown();
    let probe = FiringProbe {
        inner: rising(3),
        trigger,
        tick: 3,
        ticks: 0,
    };

    let output = run(probe, TINY, &shutdown);
    let rows = output.trim_end().split('\r').collect::<Vec<_>>();
    assert_eq!(rows.len(), 2);

    // the first row rises from the zero baseline, except for the idle cpu.
    assert!(rows[0].contains("100  ▲"));
    assert!(rows[0].contains("0.0%  "));
    // the counters rose by the same amount again, but the cpu climbed.
    assert!(rows[1].contains("100   "));
    assert!(rows[1].contains("10.0% ▲"));
}

#[test]
fn banner_and_header() {
    let (trigger, shutdown) = shutdown();
    trigger.fire();
    let options = MonitorOptions {
        rate: Duration::from_millis(250),
        banner: true,
        bits: true,
    };

    let output = run(rising(1), options, &shutdown);
    let lines = output.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 8);
    assert!(lines[0].is_empty());
    assert!(lines[7].is_empty());
    assert!(lines[2].contains(".:.: REAL-TIME RESOURCES MONITOR :.:."));
    assert!(lines[3].contains("(Refresh rate is 250ms)"));
    assert!(lines[5].contains("↑ Bits"));
    assert!(lines[6].starts_with(" | ---"));
}

#[test]
fn preamble_is_centered_over_the_header() {
    let monitor = Monitor::new(rising(0), RenderConfig::plain(), MonitorOptions::default()).unwrap();
    let width = monitor.layout().width();
    for line in &monitor.preamble()[1..4] {
        assert_eq!(line.len(), width);
    }
}

#[test]
fn write_failures_are_fatal() {
    struct Broken;
    impl Write for Broken {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::ErrorKind::BrokenPipe.into())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    let (_trigger, shutdown) = shutdown();
    let monitor = Monitor::new(rising(1), RenderConfig::plain(), TINY).unwrap();
    let err = monitor.run(&mut Broken, &shutdown).unwrap_err();
    assert!(matches!(err, MonitorError::Write(_)));
}
