use approx::assert_relative_eq;
use proptest::prelude::*;

use integration_tests::{
    init_logging,
    test_components::{FixedStep, Point, Ramp, Sawtooth, s, window},
};
use weft_core::seconds;
use weft_runtime::{Config, Driver, ProfileReader, Status, Trajectory, termination_code};

#[test]
fn ten_steps_on_a_uniform_grid() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        measure_time: true,
        model_prefix: dir.path().join("ramp").to_string_lossy().into_owned(),
        ..Config::default()
    };

    let mut driver =
        Driver::new(Ramp::new(1.0), FixedStep::new()).with_writer(Trajectory::new());
    let result = driver.simulate(window(0.0, 1.0, 10), Point::at_origin(1.0), &config);
    assert_eq!(termination_code(&result), 0);

    let (data, solution) = result.unwrap();
    assert_eq!(solution.status, Status::Complete);
    assert_eq!(solution.committed_steps, 10);
    assert_eq!(solution.attempts, 10);
    assert_eq!(solution.retries, 0);
    assert_eq!(solution.final_time, s(1.0));
    assert_eq!(driver.integrator.calls, 10);
    assert_relative_eq!(data.current().x, 1.0, epsilon = 1e-12);

    let times: Vec<f64> = driver.writer.times().into_iter().map(seconds).collect();
    assert_eq!(times.len(), 10);
    for (i, time) in times.iter().enumerate() {
        assert_relative_eq!(*time, (i + 1) as f64 / 10.0, epsilon = 1e-12);
    }

    let step_numbers: Vec<u32> = ProfileReader::open(dir.path().join("ramp_prof.data"), 0)
        .unwrap()
        .map(|record| record.unwrap().step_no)
        .collect();
    assert_eq!(step_numbers, (0..10).collect::<Vec<_>>());
}

#[test]
fn offset_start_time() {
    init_logging();
    let mut driver =
        Driver::new(Ramp::new(2.0), FixedStep::new()).with_writer(Trajectory::new());

    let (data, solution) = driver
        .simulate(window(1.0, 2.0, 4), Point::at_origin(2.0), &Config::default())
        .unwrap();

    assert_eq!(solution.committed_steps, 4);
    assert_eq!(solution.final_time, s(2.0));
    assert_relative_eq!(data.current().x, 2.0, epsilon = 1e-12);
    assert_relative_eq!(seconds(driver.writer.times()[0]), 1.25, epsilon = 1e-12);
}

#[test]
fn empty_window_commits_nothing() {
    let mut driver =
        Driver::new(Ramp::new(1.0), FixedStep::new()).with_writer(Trajectory::new());

    let (_, solution) = driver
        .simulate(window(0.5, 0.5, 3), Point::at_origin(1.0), &Config::default())
        .unwrap();

    assert_eq!(solution.committed_steps, 0);
    assert_eq!(solution.final_time, s(0.5));
    assert!(driver.writer.is_empty());
    assert_eq!(driver.integrator.calls, 0);
}

proptest! {
    #[test]
    fn emitted_times_never_decrease(
        steps in 1usize..40,
        stop in 0.1f64..10.0,
        level in 0.05f64..5.0,
        fault_call in 1usize..60,
    ) {
        let mut driver = Driver::new(Ramp::new(1.0), FixedStep::new().faulting_on(fault_call))
            .with_events(Sawtooth::new(level))
            .with_writer(Trajectory::new());

        let (_, solution) = driver
            .simulate(window(0.0, stop, steps), Point::at_origin(1.0), &Config::default())
            .unwrap();

        let times: Vec<f64> = driver.writer.times().into_iter().map(seconds).collect();
        let tolerance = 1e-12 * stop.max(1.0);

        prop_assert!(times.windows(2).all(|pair| pair[0] <= pair[1]));
        prop_assert!(times.iter().all(|t| *t >= 0.0 && *t <= stop + tolerance));
        prop_assert!((seconds(solution.final_time) - stop).abs() <= tolerance);
        let last = times.last().copied().unwrap_or_default();
        prop_assert!((last - stop).abs() <= tolerance);
    }
}
