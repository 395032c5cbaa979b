use std::f64::consts::{FRAC_PI_2, PI, TAU};

use act_core::{ActionTarget, FrameContext, NullSoundServer, Point};
use act_sched::{Action, ActionRunner};

#[derive(Debug, Default)]
struct TestNode {
    position: Point,
    scale: f64,
    alpha: f64,
    z_rotation: f64,
}

impl ActionTarget for TestNode {
    fn position(&self) -> Point {
        self.position
    }
    fn set_position(&mut self, position: Point) {
        self.position = position;
    }
    fn scale(&self) -> f64 {
        self.scale
    }
    fn set_scale(&mut self, scale: f64) {
        self.scale = scale;
    }
    fn alpha(&self) -> f64 {
        self.alpha
    }
    fn set_alpha(&mut self, alpha: f64) {
        self.alpha = alpha;
    }
    fn z_rotation(&self) -> f64 {
        self.z_rotation
    }
    fn set_z_rotation(&mut self, radians: f64) {
        self.z_rotation = radians;
    }
}

fn run_rotation(template: &Action, start_angle: f64) -> (TestNode, Vec<f64>) {
    let mut runner = ActionRunner::new();
    let mut sounds = NullSoundServer;
    let mut node = TestNode {
        z_rotation: start_angle,
        ..TestNode::default()
    };
    runner.run(template, Some("r")).unwrap();

    let mut samples = Vec::new();
    let mut now = 0.0;
    while runner.is_completed("r") != Some(true) && now <= 3000.0 {
        let ctx = FrameContext::new(now, 50.0);
        runner.tick(&mut node, &mut sounds, &ctx).unwrap();
        samples.push(node.z_rotation);
        now += 50.0;
    }
    assert_eq!(runner.is_completed("r"), Some(true));
    (node, samples)
}

#[test]
fn rotate_to_takes_the_shorter_arc() {
    // From 0 to -pi/2: the short way is a quarter turn clockwise, not
    // three quarters counter-clockwise through pi.
    let template = Action::rotate_to(-FRAC_PI_2, 1000.0);
    let (node, samples) = run_rotation(&template, 0.0);

    for pair in samples.windows(2) {
        assert!(pair[1] <= pair[0] + 1e-12, "turned the long way: {pair:?}");
    }
    assert!((node.z_rotation - (-FRAC_PI_2)).abs() < 1e-12);
    // Same heading modulo a full turn.
    assert!((node.z_rotation.rem_euclid(TAU) - 3.0 * FRAC_PI_2).abs() < 1e-12);
}

#[test]
fn rotate_to_long_way_when_shortest_arc_is_off() {
    let template = Action::rotate_to(-FRAC_PI_2, 1000.0).shortest_unit_arc(false);
    let (node, samples) = run_rotation(&template, 0.0);

    for pair in samples.windows(2) {
        assert!(pair[1] >= pair[0] - 1e-12, "expected ccw sweep: {pair:?}");
    }
    assert!((node.z_rotation - 3.0 * FRAC_PI_2).abs() < 1e-12);
}

#[test]
fn rotate_by_keeps_full_turns() {
    // Relative rotation is never normalized; a turn and a bit stays a
    // turn and a bit.
    let template = Action::rotate_by(TAU + 1.0, 500.0);
    let (node, _) = run_rotation(&template, 0.25);
    assert!((node.z_rotation - (0.25 + TAU + 1.0)).abs() < 1e-12);
}

#[test]
fn rotate_to_from_offset_quadrant() {
    // From just below a full turn to just above zero: the short arc
    // crosses the wrap point.
    let template = Action::rotate_to(0.1, 800.0);
    let (node, samples) = run_rotation(&template, TAU - 0.1);

    for pair in samples.windows(2) {
        assert!(pair[1] >= pair[0] - 1e-12, "crossed the long way: {pair:?}");
    }
    assert!((node.z_rotation.rem_euclid(TAU) - 0.1).abs() < 1e-9);
}

#[test]
fn opposite_headings_turn_counter_clockwise() {
    // An exact half turn is ambiguous; the positive direction wins.
    let template = Action::rotate_to(PI, 400.0);
    let (node, samples) = run_rotation(&template, 0.0);
    for pair in samples.windows(2) {
        assert!(pair[1] >= pair[0] - 1e-12);
    }
    assert!((node.z_rotation - PI).abs() < 1e-12);
}
