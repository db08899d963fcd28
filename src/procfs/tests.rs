use {super::*, crate::source::MockProcFs};

mod cpu_time_tests {
    use super::*;

    // examples provided in the `proc_stat(5)` man page.
    const EXAMPLE_1: &str = "cpu 10132153 290696 3084719 46828483 16683 0 25195 0 175628 0";
    const EXAMPLE_2: &str = "cpu0 1393280 32966 572056 13343292 6130 0 17875 0 23933 0";

    fn times(user: u64, system: u64, idle: u64) -> CpuTime {
        format!("cpu  {user} 0 {system} {idle} 0 0 0 0 0 0")
            .parse()
            .unwrap()
    }

    #[test]
    fn aggregate_line() {
        let _ = EXAMPLE_1.parse::<CpuTime>().unwrap();
    }

    #[test]
    fn aggregate_line_after_others() {
        let stat = format!("intr 1462898\n{EXAMPLE_2}\n{EXAMPLE_1}\nctxt 1990473\n");
        assert_eq!(
            stat.parse::<CpuTime>().unwrap(),
            EXAMPLE_1.parse().unwrap()
        );
    }

    #[test]
    fn per_cpu_lines_are_not_aggregate() {
        let err = EXAMPLE_2.parse::<CpuTime>().unwrap_err();
        assert_eq!(err, ParseError::MissingCpu);
    }

    #[test]
    fn old_kernels_report_fewer_fields() {
        let short = "cpu 10132153 290696 3084719 46828483".parse::<CpuTime>();
        assert!(short.is_ok());
    }

    #[test]
    fn too_few_fields() {
        let err = "cpu 1 2 3".parse::<CpuTime>().unwrap_err();
        assert_eq!(err, ParseError::CpuFields { fields: 3 });
    }

    #[test]
    fn extra_time() {
        let err = "cpu 1 2 3 4 5 6 7 8 9 10 11"
            .parse::<CpuTime>()
            .unwrap_err();
        assert_eq!(err, ParseError::CpuFields { fields: 11 });
    }

    #[test]
    fn bad_time() {
        let err = "cpu 1 2 x 4".parse::<CpuTime>().unwrap_err();
        assert!(matches!(err, ParseError::UserHzParse(_)));
    }

    #[test]
    fn half_busy() {
        let a = times(100, 100, 200);
        let b = times(150, 150, 300);
        assert_eq!(Measurement::new(&a, &b).percentage(), 50.0);
    }

    #[test]
    fn no_elapsed_time_is_idle() {
        let a = times(100, 100, 200);
        assert_eq!(Measurement::new(&a, &a).percentage(), 0.0);
    }

    #[test]
    fn guest_time_is_not_counted_twice() {
        let a: CpuTime = "cpu 100 0 0 100 0 0 0 0 0 0".parse().unwrap();
        let b: CpuTime = "cpu 200 0 0 200 0 0 0 0 100 0".parse().unwrap();
        assert_eq!(Measurement::new(&a, &b).percentage(), 50.0);
    }
}

mod net_dev_tests {
    use super::*;

    const NET_DEV: &str = "\
Inter-|   Receive                                                |  Transmit
 face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed
    lo:  1000      10    0    0    0     0          0         0     1000      10    0    0    0     0       0          0
  eth0: 52000     400    0    0    0     0          0         0    18000     150    0    0    0     0       0          0
";

    #[test]
    fn sums_every_interface() {
        let totals = NET_DEV.parse::<NetDev>().unwrap();
        assert_eq!(
            totals,
            NetDev {
                rx_bytes: 53000,
                rx_packets: 410,
                tx_bytes: 19000,
                tx_packets: 160,
            }
        );
    }

    #[test]
    fn headers_only() {
        let headers = NET_DEV.lines().take(2).collect::<Vec<_>>().join("\n");
        assert_eq!(headers.parse::<NetDev>().unwrap(), NetDev::default());
    }

    #[test]
    fn truncated_interface() {
        let err = "eth0: 1 2 3".parse::<NetDev>().unwrap_err();
        assert!(matches!(err, ParseError::Interface { .. }));
    }

    #[test]
    fn missing_colon() {
        let err = "eth0 1 2 3".parse::<NetDev>().unwrap_err();
        assert!(matches!(err, ParseError::Interface { .. }));
    }

    #[test]
    fn read_from_source() {
        let source = MockProcFs::default();
        source.push(ProcFile::NetDev, NET_DEV);
        assert_eq!(NetDev::read(&source).unwrap().rx_packets, 410);
    }
}

mod mem_info_tests {
    use super::*;

    #[test]
    fn available() {
        let info = "MemTotal:       16000000 kB\nMemFree:         1000000 kB\nMemAvailable:    4000000 kB\n"
            .parse::<MemInfo>()
            .unwrap();
        assert_eq!(
            info,
            MemInfo {
                total: 16_000_000,
                available: 4_000_000
            }
        );
        assert_eq!(info.percentage(), 75.0);
    }

    #[test]
    fn estimated_available() {
        let info = "MemTotal: 1000 kB\nMemFree: 100 kB\nBuffers: 50 kB\nCached: 100 kB\nSwapCached: 999 kB\n"
            .parse::<MemInfo>()
            .unwrap();
        assert_eq!(info.available, 250);
        assert_eq!(info.percentage(), 75.0);
    }

    #[test]
    fn missing_total() {
        let err = "MemFree: 100 kB\n".parse::<MemInfo>().unwrap_err();
        assert_eq!(err, ParseError::MissingField { field: "MemTotal" });
    }

    #[test]
    fn empty_total_is_idle() {
        assert_eq!(MemInfo::default().percentage(), 0.0);
    }

    #[test]
    fn missing_file() {
        let source = MockProcFs::default();
        let err = MemInfo::read(&source).unwrap_err();
        assert!(matches!(err, ReadError::Io(_)));
    }
}
