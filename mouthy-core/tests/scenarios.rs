use mouthy_bird_core::avatar::AvatarBody;
use mouthy_bird_core::config::{Difficulty, GameConfig, GestureThresholds};
use mouthy_bird_core::gate::HysteresisGate;
use mouthy_bird_core::gauge::LifeGauge;
use mouthy_bird_core::gesture::{FaceLayout, GestureSignalExtractor, LandmarkSet, Point};
use mouthy_bird_core::obstacles::ObstacleField;
use mouthy_bird_core::rng::{ScriptedRng, SeededRng};
use mouthy_bird_core::scores::{BestScoreStore, MemoryScoreStore};
use mouthy_bird_core::sim::{RunPhase, RunState};

#[test]
fn eye_gate_emits_one_edge_for_a_blink() {
    let mut gate = HysteresisGate::new(GestureThresholds {
        eye_close: 0.38,
        eye_open: 0.43,
        mouth_open: 0.26,
    })
    .expect("valid thresholds");

    let edges: Vec<bool> = [0.5, 0.5, 0.30, 0.30, 0.50]
        .into_iter()
        .map(|ear| gate.update_eyes(ear).became_closed)
        .collect();
    assert_eq!(edges, [false, false, true, false, false]);
}

#[test]
fn avatar_falls_with_compounding_velocity() {
    let mut body = AvatarBody::new(270.0);
    let expected = [(50.0, 275.0), (100.0, 285.0), (150.0, 300.0)];
    for (vy, y) in expected {
        let clamped = body.step(0.1, false, 500.0, 600.0, 25.0, 540.0);
        assert!(!clamped);
        assert!((body.vy - vy).abs() < 1e-3, "vy={} want {vy}", body.vy);
        assert!((body.y - y).abs() < 1e-3, "y={} want {y}", body.y);
    }
}

#[test]
fn obstacle_scrolls_past_left_edge_then_retires() {
    let mut field = ObstacleField::new();
    field.spawn(980.0, 140, 400, 90.0, 170.0, &mut ScriptedRng::new(vec![0]));

    // 4.5 s at 220 px/s in 0.1 s steps.
    for _ in 0..45 {
        field.advance(0.1, 220.0);
    }
    let obstacle = field.obstacles()[0];
    assert!((obstacle.x - -10.0).abs() < 0.05, "x={}", obstacle.x);
    assert!(obstacle.x < 0.0);

    // Trailing edge still on screen (x + width = 80); retired once it clears 0.
    assert_eq!(field.len(), 1);
    for _ in 0..4 {
        field.advance(0.1, 220.0);
    }
    assert!(field.is_empty());
}

#[test]
fn gauge_pays_one_life_over_two_and_a_half_seconds() {
    let mut gauge = LifeGauge::new(0.5, 1.0, 0.0, 5);
    let mut lives = 3;
    let mut gained_total = 0;
    for tick in 1..=25 {
        let gained = gauge.update(true, 0.1, f64::from(tick) * 0.1, lives);
        lives += gained;
        gained_total += gained;
        assert!(lives <= 5);
    }
    assert_eq!(gained_total, 1);
    assert_eq!(lives, 4);
    assert!((gauge.charge() - 0.25).abs() < 1e-4);
    assert!((gauge.fill_ratio() - 0.25).abs() < 1e-4);
}

fn synthetic_face(eye_height: f32, mouth_height: f32) -> LandmarkSet {
    let layout = FaceLayout::FACE_MESH;
    let mut points = vec![Point::new(500.0, 300.0); 468];
    for (indices, width, height) in [
        (layout.right_eye, 40.0, eye_height),
        (layout.left_eye, 40.0, eye_height),
        (layout.mouth, 60.0, mouth_height),
    ] {
        points[indices.left] = Point::new(0.0, 0.0);
        points[indices.right] = Point::new(width, 0.0);
        points[indices.upper[0]] = Point::new(10.0, -height / 2.0);
        points[indices.lower[0]] = Point::new(10.0, height / 2.0);
        points[indices.upper[1]] = Point::new(30.0, -height / 2.0);
        points[indices.lower[1]] = Point::new(30.0, height / 2.0);
    }
    LandmarkSet::new(points)
}

#[test]
fn landmarks_flow_end_to_end_into_the_run() {
    let mut run = RunState::seeded(GameConfig::default(), Difficulty::Easy, 0xC0FF_EE11)
        .expect("default config is valid")
        .with_extractor(GestureSignalExtractor::new(FaceLayout::FACE_MESH));

    // Wide-open mouth, open eyes: thrust upward.
    let face = synthetic_face(20.0, 30.0);
    let outcome = run.tick_landmarks(1.0 / 30.0, Some(&face));
    assert!(outcome.observed);
    assert!(run.gesture_state().mouth_open);
    assert!(!run.gesture_state().eyes_closed);
    assert!(run.avatar().vy < 0.0);

    // Face lost: nothing flips, but the body stops thrusting.
    let vy_with_face = run.avatar().vy;
    let outcome = run.tick_landmarks(1.0 / 30.0, None);
    assert!(!outcome.observed);
    assert!(run.gesture_state().mouth_open);
    assert!(run.avatar().vy > vy_with_face);

    // Eyes shut, mouth closed.
    let outcome = run.tick_landmarks(1.0 / 30.0, Some(&synthetic_face(2.0, 0.0)));
    assert!(outcome.blink_edge);
    assert!(run.gesture_state().eyes_closed);
    assert!(!run.gesture_state().mouth_open);
}

#[test]
fn idle_player_eventually_loses_and_records_best() {
    let mut run =
        RunState::new(GameConfig::default(), Difficulty::Hard, SeededRng::new(77)).expect("valid");
    let mut store = MemoryScoreStore::new();

    let mut ticks = 0;
    while !run.is_over() {
        run.tick_frame(1.0 / 30.0, None);
        ticks += 1;
        assert!(ticks < 30 * 120, "an idle avatar on the floor must die");
    }
    assert_eq!(run.phase(), RunPhase::Over);

    let update = run
        .record_best(&mut store)
        .expect("memory store never fails")
        .expect("recorded at game over");
    assert_eq!(update.previous_best, 0);
    assert_eq!(store.load_best(Difficulty::Hard).unwrap(), run.score());
}
