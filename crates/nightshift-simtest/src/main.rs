//! Nightshift Headless Shift Harness
//!
//! Plays whole shifts in-process against scripted observers and checks the
//! engine's bookkeeping after every step. No rendering, no audio, no input.
//!
//! Usage:
//!   cargo run -p nightshift-simtest
//!   cargo run -p nightshift-simtest -- --verbose
//!   cargo run -p nightshift-simtest -- --seed 7 --config shift.json --json

use std::path::Path;

use nightshift_core::prelude::*;
use nightshift_core::session::ShiftSession;
use nightshift_logic::config::ConfigError;
use nightshift_logic::constants::visuals;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Real seconds per harness step.
const STEP_SECS: f64 = 0.25;
/// Hard cap on steps per shift, well past any valid shift length.
const MAX_STEPS: usize = 200_000;
/// Seeds played per observer profile.
const SHIFTS_PER_PROFILE: u64 = 4;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

struct Options {
    verbose: bool,
    json: bool,
    seed: u64,
    config: ShiftConfig,
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let verbose = args.iter().any(|a| a == "--verbose");
    let json = args.iter().any(|a| a == "--json");
    println!("=== Nightshift Shift Harness ===\n");

    let mut results = Vec::new();

    // 1. Configuration
    let config = match load_config(flag_value(&args, "--config")) {
        Ok(config) => config,
        Err(e) => {
            println!("  ✗ config_load: {}", e);
            std::process::exit(1);
        }
    };
    let seed = match flag_value(&args, "--seed").map(str::parse::<u64>) {
        Some(Ok(seed)) => seed,
        Some(Err(e)) => {
            println!("  ✗ seed_parse: {}", e);
            std::process::exit(1);
        }
        None => config.seed.unwrap_or(1),
    };
    let opts = Options {
        verbose,
        json,
        seed,
        config,
    };
    results.extend(validate_config(&opts));

    // 2. Default house layout
    results.extend(validate_house(&opts));

    // 3. Apply/restore round trips in every room
    results.extend(validate_round_trips(&opts));

    // 4. Seeded shifts against scripted observers
    results.extend(validate_shifts(&opts));

    // 5. Reproducibility
    results.extend(validate_determinism(&opts));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || opts.verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn load_config(path: Option<&str>) -> Result<ShiftConfig, ConfigError> {
    match path {
        Some(path) => ShiftConfig::from_file(Path::new(path)),
        None => Ok(ShiftConfig::default()),
    }
}

// ── 1. Configuration ────────────────────────────────────────────────────

fn validate_config(opts: &Options) -> Vec<TestResult> {
    println!("--- Configuration ---");
    let mut results = Vec::new();

    let valid = opts.config.validate();
    results.push(TestResult {
        name: "config_valid".into(),
        passed: valid.is_ok(),
        detail: match valid {
            Ok(()) => format!(
                "{}s shift, max {} undetected, {:.0} real s long",
                opts.config.shift_duration_secs,
                opts.config.max_anomalies,
                opts.config.real_shift_length_secs()
            ),
            Err(e) => e.to_string(),
        },
    });

    let mut broken = ShiftConfig::default();
    broken.pacing.late_from = 0.1;
    results.push(TestResult {
        name: "config_rejects_inverted_bands".into(),
        passed: broken.validate().is_err(),
        detail: "late band starting before early band ends".into(),
    });

    let mut broken = ShiftConfig::default();
    broken.alarm_threshold = broken.max_anomalies + 1;
    results.push(TestResult {
        name: "config_rejects_unreachable_alarm".into(),
        passed: broken.validate().is_err(),
        detail: "alarm threshold above the loss threshold".into(),
    });

    let parsed = ShiftConfig::from_json_str(r#"{ "max_anomalies": 3 }"#);
    results.push(TestResult {
        name: "config_partial_json_fills_defaults".into(),
        passed: matches!(&parsed, Ok(c) if c.max_anomalies == 3 && c.shift_duration_secs == 7200.0),
        detail: format!("{:?}", parsed.map(|c| c.max_anomalies)),
    });

    results
}

// ── 2. Default House ────────────────────────────────────────────────────

fn validate_house(opts: &Options) -> Vec<TestResult> {
    println!("--- Default House ---");
    let mut results = Vec::new();

    let catalogue = match RoomCatalogue::default_house() {
        Ok(c) => c,
        Err(e) => {
            results.push(TestResult {
                name: "house_builds".into(),
                passed: false,
                detail: e.to_string(),
            });
            return results;
        }
    };

    let ids: Vec<&str> = catalogue.room_ids().collect();
    results.push(TestResult {
        name: "house_camera_order".into(),
        passed: ids == ["living-room", "kitchen", "bedroom", "hallway", "office", "bathroom"],
        detail: ids.join(", "),
    });

    let featured: Vec<&str> = catalogue
        .rooms()
        .iter()
        .filter(|r| r.painting.is_some() || r.screen.is_some())
        .map(|r| r.id.as_str())
        .collect();
    results.push(TestResult {
        name: "house_features_only_in_living_room".into(),
        passed: featured == ["living-room"],
        detail: format!("painting/screen in {:?}", featured),
    });

    let unlit: Vec<&str> = catalogue
        .rooms()
        .iter()
        .filter(|r| r.light.is_none() || r.objects.is_empty())
        .map(|r| r.id.as_str())
        .collect();
    results.push(TestResult {
        name: "house_every_room_lit_and_furnished".into(),
        passed: unlit.is_empty(),
        detail: format!("{} props total", catalogue.world().len()),
    });

    if opts.verbose {
        for room in catalogue.rooms() {
            println!("  {} ({} props, pool {:?})", room.camera_label, room.objects.len(), room.kind_pool());
        }
    }

    results
}

// ── 3. Round Trips ──────────────────────────────────────────────────────

fn validate_round_trips(opts: &Options) -> Vec<TestResult> {
    println!("--- Apply / Restore ---");
    let mut results = Vec::new();

    let mut catalogue = match RoomCatalogue::default_house() {
        Ok(c) => c,
        Err(_) => return results,
    };
    let ids: Vec<String> = catalogue.room_ids().map(String::from).collect();
    let mut rng = StdRng::seed_from_u64(opts.seed);

    let mut checked = 0;
    let mut failures = Vec::new();
    let mut palette_ok = true;
    for room_id in &ids {
        let pool = match catalogue.room(room_id) {
            Some(room) => room.kind_pool(),
            None => continue,
        };
        for kind in pool {
            let before = room_state(&catalogue, room_id);
            let mut session = ShiftSession::new(1);
            if session
                .spawn_kind(&mut catalogue, room_id, kind, &mut rng, 0.0)
                .is_none()
            {
                failures.push(format!("{}/{} not spawned", room_id, kind));
                continue;
            }
            if kind == AnomalyKind::Painting {
                let color = catalogue
                    .room(room_id)
                    .and_then(|r| r.painting)
                    .map(|p| p.color.hex());
                palette_ok &= color.is_some_and(|c| visuals::PAINTING_PALETTE.contains(&c));
            }
            if room_state(&catalogue, room_id) == before {
                failures.push(format!("{}/{} changed nothing", room_id, kind));
            }
            if !session.resolve(&mut catalogue, room_id, kind) {
                failures.push(format!("{}/{} did not resolve", room_id, kind));
            }
            if room_state(&catalogue, room_id) != before {
                failures.push(format!("{}/{} not restored", room_id, kind));
            }
            checked += 1;
        }
    }

    results.push(TestResult {
        name: "round_trip_all_kinds".into(),
        passed: failures.is_empty(),
        detail: if failures.is_empty() {
            format!("{} room/kind pairs restored exactly", checked)
        } else {
            failures.join("; ")
        },
    });
    results.push(TestResult {
        name: "painting_uses_palette".into(),
        passed: palette_ok,
        detail: "painting recolours come from the fixed palette".into(),
    });

    results
}

/// Everything restoration must put back, as comparable text.
fn room_state(catalogue: &RoomCatalogue, room_id: &str) -> String {
    let Some(room) = catalogue.room(room_id) else {
        return String::new();
    };
    let props: Vec<String> = room
        .objects
        .iter()
        .map(|&e| format!("{:?}/{:?}", catalogue.prop_position(e), catalogue.is_visible(e)))
        .collect();
    format!(
        "{:?}|{:?}|{:?}|{}|{}",
        room.light,
        room.painting,
        room.screen,
        props.join(","),
        catalogue.artifact_count()
    )
}

// ── 4. Seeded Shifts ────────────────────────────────────────────────────

/// A scripted player.
#[derive(Debug, Clone, Copy)]
struct Observer {
    name: &'static str,
    /// Real seconds between a spawn and its report
    reaction_secs: f64,
    /// Overlook every n-th spawn
    overlook_every: Option<u32>,
    /// File a false report after every n-th correct one
    false_alarm_every: Option<u32>,
    /// Outcome this observer must always get, if any
    expect: Option<ShiftOutcome>,
}

const OBSERVERS: [Observer; 4] = [
    Observer {
        name: "vigilant",
        reaction_secs: 20.0,
        overlook_every: None,
        false_alarm_every: None,
        expect: Some(ShiftOutcome::Won),
    },
    Observer {
        name: "asleep",
        reaction_secs: 0.0,
        overlook_every: Some(1),
        false_alarm_every: None,
        expect: Some(ShiftOutcome::Lost),
    },
    Observer {
        name: "distracted",
        reaction_secs: 30.0,
        overlook_every: Some(3),
        false_alarm_every: None,
        expect: None,
    },
    Observer {
        name: "jumpy",
        reaction_secs: 10.0,
        overlook_every: None,
        false_alarm_every: Some(4),
        expect: None,
    },
];

struct ShiftRun {
    report: Option<ShiftReport>,
    violations: Vec<String>,
    endings: usize,
    steps: usize,
}

fn play_shift(config: &ShiftConfig, observer: Observer, seed: u64) -> Result<ShiftRun, ShiftError> {
    let mut ctl = ShiftController::with_default_house(config.clone().with_seed(seed))?;
    ctl.enter_briefing()?;
    ctl.start_shift()?;

    let mut run = ShiftRun {
        report: None,
        violations: Vec::new(),
        endings: 0,
        steps: 0,
    };
    let mut queued: Vec<(f64, String, AnomalyKind)> = Vec::new();
    let mut spawns_seen = 0u32;
    let mut correct = 0u32;
    let mut now = 0.0;

    while ctl.state() == ShiftState::Active && run.steps < MAX_STEPS {
        run.steps += 1;
        now += STEP_SECS;
        for event in ctl.update(STEP_SECS) {
            match event {
                ShiftEvent::AnomalySpawned { room, kind, .. } => {
                    spawns_seen += 1;
                    let overlooked = observer.overlook_every.is_some_and(|n| spawns_seen % n == 0);
                    if !overlooked {
                        queued.push((now + observer.reaction_secs, room, kind));
                    }
                }
                ShiftEvent::ShiftEnded { .. } => run.endings += 1,
                _ => {}
            }
        }

        while ctl.state() == ShiftState::Active {
            let Some(idx) = queued.iter().position(|(due, _, _)| *due <= now) else {
                break;
            };
            let (_, room, kind) = queued.remove(idx);
            if matches!(ctl.report(&room, kind), ReportOutcome::Resolved { .. }) {
                correct += 1;
                if observer.false_alarm_every.is_some_and(|n| correct % n == 0) {
                    // No bathroom has a TV, so this never matches.
                    ctl.report("bathroom", AnomalyKind::Tv);
                }
            } else {
                run.violations.push(format!("step {}: report {}/{} did not resolve", run.steps, room, kind));
            }
        }
        run.endings += ctl
            .drain_events()
            .iter()
            .filter(|e| matches!(e, ShiftEvent::ShiftEnded { .. }))
            .count();

        check_invariants(&ctl, run.steps, &mut run.violations);
    }

    if ctl.state() != ShiftState::Complete {
        run.violations.push(format!("shift still {} after {} steps", ctl.state(), run.steps));
    }
    let triggered = ctl.session().total_triggered();
    for _ in 0..40 {
        if !ctl.update(60.0).is_empty() {
            run.violations.push("events after the shift ended".into());
        }
    }
    if ctl.session().total_triggered() != triggered {
        run.violations.push("spawn after the shift ended".into());
    }

    run.report = ctl.summary().cloned();
    Ok(run)
}

fn check_invariants(ctl: &ShiftController, step: usize, violations: &mut Vec<String>) {
    let s = ctl.session();
    if s.total_resolved() > s.total_triggered() {
        violations.push(format!("step {}: resolved {} > triggered {}", step, s.total_resolved(), s.total_triggered()));
    }
    if s.undetected_count() > s.max_anomalies() {
        violations.push(format!("step {}: undetected {} over max", step, s.undetected_count()));
    }
    match ctl.state() {
        ShiftState::Active => {
            let active = s.active().len() as u32;
            if active != s.total_triggered() - s.total_resolved() {
                violations.push(format!("step {}: active set {} out of step with counters", step, active));
            }
            if s.undetected_count() != active + s.false_reports() {
                violations.push(format!(
                    "step {}: undetected {} != active {} + penalties {}",
                    step,
                    s.undetected_count(),
                    active,
                    s.false_reports()
                ));
            }
            if ctl.next_spawn_in().is_none() {
                violations.push(format!("step {}: active shift with no spawn armed", step));
            }
        }
        ShiftState::Complete => {
            if !s.active().is_empty() {
                violations.push(format!("step {}: unresolved anomalies kept past the end", step));
            }
            if ctl.next_spawn_in().is_some() {
                violations.push(format!("step {}: spawn still armed after the end", step));
            }
        }
        ShiftState::Idle | ShiftState::Briefing => {}
    }
}

fn validate_shifts(opts: &Options) -> Vec<TestResult> {
    println!("--- Seeded Shifts ---");
    let mut results = Vec::new();

    for observer in OBSERVERS {
        let mut violations = Vec::new();
        let mut outcomes = Vec::new();
        let mut rates = Vec::new();

        for i in 0..SHIFTS_PER_PROFILE {
            let seed = opts.seed.wrapping_add(i);
            let run = match play_shift(&opts.config, observer, seed) {
                Ok(run) => run,
                Err(e) => {
                    violations.push(format!("seed {}: {}", seed, e));
                    continue;
                }
            };
            violations.extend(run.violations.iter().map(|v| format!("seed {}: {}", seed, v)));
            if run.endings != 1 {
                violations.push(format!("seed {}: shift ended {} times", seed, run.endings));
            }
            let Some(report) = run.report else {
                violations.push(format!("seed {}: no summary", seed));
                continue;
            };
            if let Some(expected) = observer.expect {
                if report.outcome != expected {
                    violations.push(format!("seed {}: expected {:?}, got {:?}", seed, expected, report.outcome));
                }
            }
            if report.outcome == ShiftOutcome::Lost && report.undetected_at_end != opts.config.max_anomalies {
                violations.push(format!("seed {}: lost with {} undetected", seed, report.undetected_at_end));
            }

            if opts.verbose {
                println!(
                    "  {:>10} seed {:>3}: {:<40} {:>2}/{:<2} resolved, {:>3}% at {} ({} steps)",
                    observer.name,
                    seed,
                    report.headline,
                    report.total_resolved,
                    report.total_triggered,
                    report.detection_rate,
                    report.ended_at_label,
                    run.steps
                );
            }
            if opts.json {
                match report.to_json() {
                    Ok(json) => println!("{}", json),
                    Err(e) => violations.push(format!("seed {}: json export failed: {}", seed, e)),
                }
            }
            outcomes.push(report.outcome);
            rates.push(report.detection_rate);
        }

        let wins = outcomes.iter().filter(|o| **o == ShiftOutcome::Won).count();
        results.push(TestResult {
            name: format!("shifts_{}", observer.name),
            passed: violations.is_empty(),
            detail: if violations.is_empty() {
                format!("{} won of {}, detection rates {:?}", wins, outcomes.len(), rates)
            } else {
                violations.join("; ")
            },
        });
    }

    results
}

// ── 5. Determinism ──────────────────────────────────────────────────────

fn validate_determinism(opts: &Options) -> Vec<TestResult> {
    println!("--- Determinism ---");
    let observer = OBSERVERS[2];
    let first = play_shift(&opts.config, observer, opts.seed).map(|r| r.report);
    let second = play_shift(&opts.config, observer, opts.seed).map(|r| r.report);

    let same = match (&first, &second) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    };
    vec![TestResult {
        name: "same_seed_same_shift".into(),
        passed: same,
        detail: format!("seed {}", opts.seed),
    }]
}
