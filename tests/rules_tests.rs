//! Update rule and cycle validation tests
//!
//! These exercise the worker rules, the light cycle and the remaining-time
//! figures without sleeping.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use intersection_sim::display::ConsoleRenderer;
use intersection_sim::input::{prompt_counts, prompt_in_range};
use intersection_sim::simulation::{
    remaining_times, ConfigError, Light, Phase, PhaseCycle, PhaseTiming, Quadrant,
    QuadrantWorker, SimConfig, SimulationState, StateData, ARRIVAL_TICKS, MAX_PHASE,
};

fn secs(values: [u64; 4]) -> [Duration; 4] {
    values.map(Duration::from_secs)
}

#[test]
fn test_quadrant_rotation() {
    assert_eq!(Quadrant::First.next(), Quadrant::Second);
    assert_eq!(Quadrant::Fourth.next(), Quadrant::First);
    assert_eq!(Quadrant::from_label(1), Some(Quadrant::First));
    assert_eq!(Quadrant::from_label(4), Some(Quadrant::Fourth));
    assert_eq!(Quadrant::from_label(0), None);
    assert_eq!(Quadrant::from_label(5), None);
    assert_eq!(Quadrant::First.offset_from(Quadrant::Second), 3);
    assert_eq!(Quadrant::Third.offset_from(Quadrant::Second), 1);
    assert_eq!(Quadrant::Second.offset_from(Quadrant::Second), 0);
}

#[test]
fn test_active_quadrant_departs_every_tick() {
    let mut data = StateData::new(Quadrant::First, [5, 5, 5, 5]);
    let mut worker = QuadrantWorker::new(Quadrant::First);

    for expected in [4, 3, 2, 1] {
        let outcome = worker.apply_tick(&mut data);
        assert!(outcome.departed);
        assert!(!outcome.arrived);
        assert_eq!(data.count(Quadrant::First), expected);
    }

    // Fifth tick: a departure and an arrival in the same critical section
    let outcome = worker.apply_tick(&mut data);
    assert!(outcome.departed);
    assert!(outcome.arrived);
    assert_eq!(data.count(Quadrant::First), 1);
}

#[test]
fn test_empty_active_quadrant_never_goes_negative() {
    let mut data = StateData::new(Quadrant::Second, [3, 0, 3, 3]);
    let mut worker = QuadrantWorker::new(Quadrant::Second);

    for _ in 0..ARRIVAL_TICKS - 1 {
        let outcome = worker.apply_tick(&mut data);
        assert!(!outcome.departed);
        assert_eq!(data.count(Quadrant::Second), 0);
    }
    worker.apply_tick(&mut data);
    assert_eq!(data.count(Quadrant::Second), 1);
}

#[test]
fn test_waiting_quadrant_gains_one_vehicle_per_window() {
    let mut data = StateData::new(Quadrant::First, [5, 5, 5, 5]);
    let mut worker = QuadrantWorker::new(Quadrant::Third);

    let mut previous = data.count(Quadrant::Third);
    for tick in 1..=20u32 {
        worker.apply_tick(&mut data);
        let current = data.count(Quadrant::Third);
        assert!(current >= previous, "waiting quadrant lost a vehicle");
        previous = current;
        assert_eq!(current, 5 + tick / ARRIVAL_TICKS);
    }
    // Other quadrants are untouched
    assert_eq!(data.count(Quadrant::First), 5);
    assert_eq!(data.count(Quadrant::Second), 5);
}

#[test]
fn test_remaining_times_during_green() {
    let timing = PhaseTiming::default();
    let remaining = remaining_times(Quadrant::First, Phase::Green, Duration::ZERO, &timing);
    assert_eq!(remaining.into_inner(), secs([10, 13, 26, 39]));

    let remaining = remaining_times(Quadrant::Third, Phase::Green, Duration::from_secs(4), &timing);
    assert_eq!(remaining.into_inner(), secs([26, 39, 6, 13]));
}

#[test]
fn test_remaining_times_during_yellow() {
    let timing = PhaseTiming::default();
    let remaining = remaining_times(Quadrant::First, Phase::Yellow, Duration::ZERO, &timing);
    assert_eq!(remaining.into_inner(), secs([3, 3, 16, 29]));

    let remaining = remaining_times(Quadrant::First, Phase::Yellow, Duration::from_secs(5), &timing);
    assert_eq!(remaining[Quadrant::First], Duration::ZERO);
}

#[test]
fn test_remaining_times_with_huge_phases_do_not_overflow() {
    let timing = PhaseTiming {
        green: Duration::MAX,
        yellow: Duration::MAX,
        ..PhaseTiming::default()
    };
    let remaining = remaining_times(Quadrant::First, Phase::Green, Duration::ZERO, &timing);
    assert_eq!(remaining[Quadrant::First], Duration::MAX);
    assert_eq!(remaining[Quadrant::Fourth], Duration::MAX);

    let remaining = remaining_times(Quadrant::First, Phase::Yellow, Duration::ZERO, &timing);
    assert_eq!(remaining[Quadrant::Second], Duration::ZERO);
}

#[test]
fn test_phase_cycle_returns_to_start() {
    let mut cycle = PhaseCycle::new(Quadrant::Third);
    let mut seen = Vec::new();
    for _ in 0..8 {
        seen.push((cycle.active, cycle.phase));
        cycle.advance();
    }
    assert_eq!(cycle, PhaseCycle::new(Quadrant::Third));
    assert_eq!(
        seen,
        vec![
            (Quadrant::Third, Phase::Green),
            (Quadrant::Third, Phase::Yellow),
            (Quadrant::Fourth, Phase::Green),
            (Quadrant::Fourth, Phase::Yellow),
            (Quadrant::First, Phase::Green),
            (Quadrant::First, Phase::Yellow),
            (Quadrant::Second, Phase::Green),
            (Quadrant::Second, Phase::Yellow),
        ]
    );
}

#[test]
fn test_active_quadrant_advances_every_cycle() {
    let timing = PhaseTiming::default();
    for start in Quadrant::ALL {
        for d in 0..200u64 {
            let cycle = PhaseCycle::at(start, Duration::from_secs(d), &timing);
            let expected = (start.index() + (d / 13) as usize) % 4;
            assert_eq!(cycle.active.index(), expected, "start {start}, t={d}");
            let expected_phase = if d % 13 < 10 { Phase::Green } else { Phase::Yellow };
            assert_eq!(cycle.phase, expected_phase, "start {start}, t={d}");
        }
    }
}

#[test]
fn test_phase_cycle_matches_scenario_timeline() {
    let timing = PhaseTiming::default();
    let at = |t| PhaseCycle::at(Quadrant::First, Duration::from_secs(t), &timing);
    assert_eq!(at(0), PhaseCycle { active: Quadrant::First, phase: Phase::Green });
    assert_eq!(at(10), PhaseCycle { active: Quadrant::First, phase: Phase::Yellow });
    assert_eq!(at(13), PhaseCycle { active: Quadrant::Second, phase: Phase::Green });
    assert_eq!(at(15), PhaseCycle { active: Quadrant::Second, phase: Phase::Green });
}

#[test]
fn test_concurrent_ticks_match_sequential_ticks() {
    const TICKS: usize = 2_000;
    let initial = [7, 50, 3, 100];
    let state = Arc::new(SimulationState::new(Quadrant::Second, initial));

    // Observer checks the invariants while the workers hammer the lock
    let observer = {
        let state = Arc::clone(&state);
        thread::spawn(move || {
            for _ in 0..TICKS {
                let snapshot = state.snapshot(Duration::ZERO, &PhaseTiming::default());
                assert!(Quadrant::ALL.contains(&snapshot.active));
                let lit = Quadrant::ALL
                    .iter()
                    .filter(|&&q| snapshot.light(q) != Light::Red)
                    .count();
                assert_eq!(lit, 1);
            }
        })
    };

    let handles: Vec<_> = Quadrant::ALL
        .into_iter()
        .map(|quadrant| {
            let state = Arc::clone(&state);
            thread::spawn(move || {
                let mut worker = QuadrantWorker::new(quadrant);
                for _ in 0..TICKS {
                    worker.tick(&state);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("worker thread panicked");
    }
    observer.join().expect("observer thread panicked");

    let mut sequential = StateData::new(Quadrant::Second, initial);
    let mut workers = Quadrant::ALL.map(QuadrantWorker::new);
    for _ in 0..TICKS {
        for worker in workers.iter_mut() {
            worker.apply_tick(&mut sequential);
        }
    }

    assert_eq!(state.counts(), sequential.counts());
}

#[test]
fn test_config_accepts_valid_input() {
    let config = SimConfig::new(1, [5, 5, 5, 5], 15).expect("valid config");
    assert_eq!(config.start, Quadrant::First);
    assert_eq!(config.run_duration, Duration::from_secs(15));
    assert_eq!(config.timing, PhaseTiming::default());
}

#[test]
fn test_config_rejects_out_of_range_values() {
    assert_eq!(
        SimConfig::new(0, [5, 5, 5, 5], 15),
        Err(ConfigError::StartQuadrant(0))
    );
    assert_eq!(
        SimConfig::new(5, [5, 5, 5, 5], 15),
        Err(ConfigError::StartQuadrant(5))
    );
    assert_eq!(
        SimConfig::new(2, [5, 101, 5, 5], 15),
        Err(ConfigError::VehicleCount { quadrant: 2, count: 101 })
    );
    assert_eq!(
        SimConfig::new(2, [5, 5, 5, 0], 15),
        Err(ConfigError::VehicleCount { quadrant: 4, count: 0 })
    );
    assert_eq!(SimConfig::new(2, [5, 5, 5, 5], 9), Err(ConfigError::RunDuration(9)));
    assert_eq!(
        SimConfig::new(2, [5, 5, 5, 5], 1001),
        Err(ConfigError::RunDuration(1001))
    );

    let too_long = PhaseTiming {
        green: Duration::from_secs(u64::MAX),
        ..PhaseTiming::default()
    };
    let config = SimConfig::new(1, [5, 5, 5, 5], 10).expect("valid config");
    assert_eq!(
        config.with_timing(too_long),
        Err(ConfigError::PhaseTooLong(Duration::from_secs(u64::MAX)))
    );

    let longest = PhaseTiming {
        green: MAX_PHASE,
        yellow: MAX_PHASE,
        ..PhaseTiming::default()
    };
    let config = SimConfig::new(1, [5, 5, 5, 5], 10).expect("valid config");
    assert!(config.with_timing(longest).is_ok());

    let zero_yellow = PhaseTiming {
        yellow: Duration::ZERO,
        ..PhaseTiming::default()
    };
    let config = SimConfig::new(2, [5, 5, 5, 5], 10).expect("valid config");
    assert_eq!(config.with_timing(zero_yellow), Err(ConfigError::ZeroPhase));
}

#[test]
fn test_prompt_retries_until_valid() {
    let mut input = "abc\n0\n  3 \n".as_bytes();
    let mut output = Vec::new();

    let value = prompt_in_range(&mut input, &mut output, "Pick: ", 1..=4).expect("valid value");
    assert_eq!(value, 3);

    let output = String::from_utf8(output).expect("utf8 output");
    assert_eq!(output.matches("Pick: ").count(), 3);
    assert_eq!(
        output
            .matches("Invalid input. Please enter a number between 1 and 4.")
            .count(),
        2
    );
}

#[test]
fn test_prompt_fails_on_closed_input() {
    let mut input = "7\n".as_bytes();
    let mut output = Vec::new();
    let err = prompt_in_range(&mut input, &mut output, "Pick: ", 1..=4).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::UnexpectedEof);
}

#[test]
fn test_prompt_counts_reads_four_quadrants() {
    let mut input = "1\n200\n2\n3\n4\n".as_bytes();
    let mut output = Vec::new();
    let counts = prompt_counts(&mut input, &mut output).expect("four counts");
    assert_eq!(counts, [1, 2, 3, 4]);
    let output = String::from_utf8(output).expect("utf8 output");
    assert!(output.contains("Quadrant 4: "));
}

#[test]
fn test_console_renderer_draws_lights_and_queues() {
    let state = SimulationState::new(Quadrant::First, [5, 6, 7, 8]);
    state.register_worker(Quadrant::Second, "worker-2".to_string());
    let snapshot = state.snapshot(Duration::ZERO, &PhaseTiming::default());

    let mut renderer = ConsoleRenderer::new(Vec::new());
    renderer.draw(&snapshot).expect("draw into memory");
    let frame = String::from_utf8(renderer.into_inner()).expect("utf8 frame");

    assert!(frame.contains("Current Green Light: Quadrant 1"));
    assert!(frame.contains("Quadrant 1: [GREEN: 10 Seconds Remaining]"));
    assert!(frame.contains("(Vehicles on Go: 5)"));
    assert!(frame.contains("Quadrant 2: RED: 13 Seconds Remaining"));
    assert!(frame.contains("Quadrant 4: RED: 39 Seconds Remaining"));
    assert!(frame.contains("(Vehicles on Queue: 8)"));
    assert!(frame.contains("(Worker: worker-2)"));
    assert!(frame.contains("1G"));
    assert!(frame.contains("2R"));
    assert!(!frame.contains('\x1b'));
}
