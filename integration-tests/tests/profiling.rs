use std::io::{self, Write};

use approx::assert_relative_eq;

use integration_tests::{
    init_logging,
    test_components::{FixedStep, Point, Ramp, Sawtooth, window},
};
use weft_core::seconds;
use weft_runtime::{Config, Driver, ProfileReader, ProfileRecord, Trajectory};

/// A sink that rejects any write past `limit` bytes.
struct FailingSink {
    written: usize,
    limit: usize,
}

impl Write for FailingSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.written + buf.len() > self.limit {
            return Err(io::Error::other("disk full"));
        }
        self.written += buf.len();
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn profiled(prefix: &std::path::Path) -> Config {
    Config {
        measure_time: true,
        model_prefix: prefix.to_string_lossy().into_owned(),
        ..Config::default()
    }
}

#[test]
fn one_record_per_committed_step() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let prefix = dir.path().join("sawtooth");

    let mut driver = Driver::new(Ramp::new(1.0).timing(1), FixedStep::new().faulting_on(5))
        .with_events(Sawtooth::new(0.32));
    let (_, solution) = driver
        .simulate(window(0.0, 1.0, 10), Point::at_origin(1.0), &profiled(&prefix))
        .unwrap();

    let path = dir.path().join("sawtooth_prof.data");
    let records: Vec<ProfileRecord> = ProfileReader::open(path, 1)
        .unwrap()
        .collect::<io::Result<_>>()
        .unwrap();

    assert_eq!(solution.retries, 1);
    assert_eq!(records.len(), solution.committed_steps);
    assert_eq!(solution.profile_records, solution.committed_steps);

    for (i, record) in records.iter().enumerate() {
        assert_eq!(record.step_no as usize, i);
        assert_eq!(record.call_counts, vec![1]);
        assert!(record.step_wall_time >= 0.0);
        assert!(record.accumulated_times[0] >= 0.0);
    }
    assert!(records.windows(2).all(|pair| pair[0].time <= pair[1].time));
    assert_relative_eq!(records.last().unwrap().time, 1.0, epsilon = 1e-12);
}

#[test]
fn write_failure_disables_profiling_but_not_the_run() {
    init_logging();
    let record_len = ProfileRecord::encoded_len(1);

    let mut baseline = Driver::new(Ramp::new(1.0).timing(1), FixedStep::new())
        .with_events(Sawtooth::new(0.32))
        .with_writer(Trajectory::new());
    let (_, expected) = baseline
        .simulate(window(0.0, 1.0, 10), Point::at_origin(1.0), &Config::default())
        .unwrap();

    let mut driver = Driver::new(Ramp::new(1.0).timing(1), FixedStep::new())
        .with_events(Sawtooth::new(0.32))
        .with_writer(Trajectory::new())
        .with_profile_sink(FailingSink {
            written: 0,
            limit: 4 * record_len,
        });
    let config = Config {
        measure_time: true,
        ..Config::default()
    };
    let (_, solution) = driver
        .simulate(window(0.0, 1.0, 10), Point::at_origin(1.0), &config)
        .unwrap();

    assert_eq!(solution.profile_records, 4);
    assert_eq!(solution.committed_steps, expected.committed_steps);
    assert_eq!(solution.final_time, expected.final_time);
    assert_eq!(driver.writer.points(), baseline.writer.points());
}

#[test]
fn unopenable_log_is_not_fatal() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let prefix = dir.path().join("missing").join("ramp");

    let mut driver = Driver::new(Ramp::new(1.0).timing(2), FixedStep::new());
    let (_, solution) = driver
        .simulate(window(0.0, 1.0, 5), Point::at_origin(1.0), &profiled(&prefix))
        .unwrap();

    assert_eq!(solution.committed_steps, 5);
    assert_eq!(solution.profile_records, 0);
}

#[test]
fn no_log_without_time_measurement() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        model_prefix: dir.path().join("ramp").to_string_lossy().into_owned(),
        ..Config::default()
    };

    let mut driver = Driver::new(Ramp::new(1.0).timing(1), FixedStep::new());
    let (_, solution) = driver
        .simulate(window(0.0, 1.0, 5), Point::at_origin(1.0), &config)
        .unwrap();

    assert_eq!(solution.profile_records, 0);
    assert!(!dir.path().join("ramp_prof.data").exists());
    assert_relative_eq!(seconds(solution.final_time), 1.0);
}
