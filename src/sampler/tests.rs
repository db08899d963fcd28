use {
    super::*,
    crate::source::{MockProcFs, ProcFile},
};

const IDLE: Gauges = Gauges {
    cpu: 0.0,
    memory: 0.0,
};

mod sampler_tests {
    use super::*;

    #[test]
    fn first_tick_compares_two_fresh_samples() {
        let probe = MockProbe::default()
            .with_counters([Counters::new(1000, 0, 10, 0), Counters::new(1200, 0, 12, 0)])
            .with_gauges([IDLE]);
        let mut sampler = Sampler::new(probe);

        let Tick { delta, .. } = sampler.observe().unwrap();
        assert_eq!(delta.get(Counter::BytesSent), 200);
        assert_eq!(delta.get(Counter::PacketsSent), 2);
        assert_eq!(delta.get(Counter::BytesReceived), 0);
    }

    #[test]
    fn later_ticks_compare_against_the_previous_tick() {
        let probe = MockProbe::default()
            .with_counters([
                Counters::new(0, 1000, 0, 0),
                Counters::new(0, 1000, 0, 0),
                Counters::new(0, 1200, 0, 0),
                Counters::new(0, 1500, 0, 0),
            ])
            .with_gauges([IDLE; 3]);
        let mut sampler = Sampler::new(probe);

        let received = |tick: Tick| tick.delta.get(Counter::BytesReceived);
        assert_eq!(sampler.observe().map(received).unwrap(), 0);
        assert_eq!(sampler.observe().map(received).unwrap(), 200);
        assert_eq!(sampler.observe().map(received).unwrap(), 300);
    }

    #[test]
    fn gauges_are_passed_through() {
        let gauges = Gauges {
            cpu: 12.5,
            memory: 90.0,
        };
        let probe = MockProbe::default()
            .with_counters([Counters::default(); 2])
            .with_gauges([gauges]);

        let tick = Sampler::new(probe).observe().unwrap();
        assert_eq!(tick.gauges, gauges);
        assert_eq!(tick.gauges.get(Gauge::Memory), 90.0);
    }

    #[test]
    fn counters_moving_backwards_saturate() {
        let delta = Counters::new(5, 5, 5, 5).delta(&Counters::new(10, 0, 10, 0));
        assert_eq!(delta, Delta::from([0, 5, 0, 5]));
    }
}

mod proc_probe_tests {
    use super::*;

    const NET_DEV: &str = "\
Inter-|   Receive                                                |  Transmit
 face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed
  eth0: 52000     400    0    0    0     0          0         0    18000     150    0    0    0     0       0          0
";
    const MEMINFO: &str = "MemTotal: 1000 kB\nMemAvailable: 600 kB\n";

    #[test]
    fn counters_follow_the_column_order() {
        let source = MockProcFs::default();
        source.push(ProcFile::NetDev, NET_DEV);

        let counters = ProcProbe::new(source).counters().unwrap();
        assert_eq!(counters, Counters::new(18000, 52000, 150, 400));
    }

    #[test]
    fn cpu_is_measured_between_calls() {
        let source = MockProcFs::default();
        source
            .push(ProcFile::Stat, "cpu 100 0 100 200 0 0 0 0 0 0\n")
            .push(ProcFile::Stat, "cpu 175 0 175 250 0 0 0 0 0 0\n")
            .push(ProcFile::MemInfo, MEMINFO)
            .push(ProcFile::MemInfo, MEMINFO);
        let mut probe = ProcProbe::new(source);

        let first = probe.gauges().unwrap();
        assert_eq!(first.cpu, 0.0);
        assert_eq!(first.memory, 40.0);

        let second = probe.gauges().unwrap();
        assert_eq!(second.cpu, 75.0);
    }
}
