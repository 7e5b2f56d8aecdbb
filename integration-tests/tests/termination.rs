use integration_tests::{
    init_logging,
    test_components::{FixedStep, Point, Ramp, s, window},
};
use weft_core::{EquationSystems, SimulationData, SolverCursor};
use weft_runtime::{Action, Config, Driver, Error, Event, Status, Trajectory, termination_code};

type Check = fn(&SimulationData<Point>) -> bool;

fn always(_: &SimulationData<Point>) -> bool {
    true
}

fn never(_: &SimulationData<Point>) -> bool {
    false
}

#[test]
fn terminate_shortens_the_run() {
    init_logging();
    let model = Ramp::new(1.0).terminating_at(s(0.45));
    let mut driver = Driver::new(model, FixedStep::new()).with_writer(Trajectory::new());

    let result = driver.simulate(window(0.0, 1.0, 10), Point::at_origin(1.0), &Config::default());
    assert_eq!(termination_code(&result), 0);

    let (_, solution) = result.unwrap();
    assert_eq!(
        solution.status,
        Status::Terminated {
            message: "ramp reached its end".into()
        }
    );
    assert_eq!(solution.committed_steps, 5);
    assert_eq!(solution.final_time, s(0.5));
    assert_eq!(driver.writer.times().last(), Some(&s(0.5)));
}

#[test]
fn failures_outrank_termination() {
    init_logging();
    let model = Ramp::new(1.0).terminating_at(s(0.15));
    let mut driver = Driver::new(model, FixedStep::new().failing_on(2, -1));

    let result = driver.simulate(window(0.0, 1.0, 10), Point::at_origin(1.0), &Config::default());

    assert!(matches!(result, Err(Error::IntegratorFailed { .. })));
    assert_eq!(termination_code(&result), -2);
}

#[test]
fn integrator_failure_is_checked_first() {
    init_logging();
    let mut driver = Driver::new(Ramp::new(1.0), FixedStep::new().failing_on(1, 2)).with_systems(
        EquationSystems {
            nonlinear: always,
            linear: always,
            mixed: always,
        },
    );

    let result = driver.simulate(window(0.0, 1.0, 10), Point::at_origin(1.0), &Config::default());

    assert!(matches!(result, Err(Error::IntegratorFailed { .. })));
    assert_eq!(termination_code(&result), -3);
}

#[test]
fn solver_failures_follow_priority_order() {
    init_logging();
    let cases: [(Check, Check, Check, i32); 4] = [
        (always, always, always, -2),
        (never, always, always, -3),
        (never, never, always, -4),
        (never, never, never, 0),
    ];

    for (nonlinear, linear, mixed, code) in cases {
        let mut driver = Driver::new(Ramp::new(1.0), FixedStep::new()).with_systems(
            EquationSystems {
                nonlinear,
                linear,
                mixed,
            },
        );
        let result =
            driver.simulate(window(0.0, 1.0, 10), Point::at_origin(1.0), &Config::default());
        assert_eq!(termination_code(&result), code);
    }
}

#[test]
fn observer_stops_between_steps() {
    init_logging();
    let mut driver =
        Driver::new(Ramp::new(1.0), FixedStep::new()).with_writer(Trajectory::new());
    let mut data = SimulationData::new(window(0.0, 1.0, 10), Point::at_origin(1.0));
    let mut cursor = SolverCursor::new(s(0.0));

    let result = driver.run(
        &mut data,
        &mut cursor,
        &Config::default(),
        |event: &Event| match event {
            Event::Committed { step: 2, .. } => Some(Action::StopEarly),
            _ => None,
        },
    );
    assert_eq!(termination_code(&result), 0);

    let solution = result.unwrap();
    assert_eq!(solution.status, Status::StoppedByObserver);
    assert_eq!(solution.committed_steps, 3);
    assert_eq!(driver.writer.len(), 3);
    assert_eq!(driver.integrator.calls, 3);
}

#[test]
fn observer_can_stop_instead_of_retrying() {
    init_logging();
    let mut driver = Driver::new(Ramp::new(1.0), FixedStep::new().faulting_on(2));
    let mut data = SimulationData::new(window(0.0, 1.0, 10), Point::at_origin(1.0));
    let mut cursor = SolverCursor::new(s(0.0));

    let solution = driver
        .run(&mut data, &mut cursor, &Config::default(), |event: &Event| {
            matches!(event, Event::Retrying { .. }).then_some(Action::StopEarly)
        })
        .unwrap();

    assert_eq!(solution.status, Status::StoppedByObserver);
    assert_eq!(solution.committed_steps, 1);
    assert_eq!(solution.retries, 1);
    assert_eq!(solution.final_time, s(0.1));
    assert_eq!(data.current().time, s(0.1));
}
