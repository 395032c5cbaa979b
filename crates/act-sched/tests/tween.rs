use act_core::{ActionTarget, FrameContext, NullSoundServer, Point};
use act_sched::{Action, ActionRunner};

#[derive(Debug)]
struct TestNode {
    position: Point,
    scale: f64,
    alpha: f64,
    z_rotation: f64,
}

impl Default for TestNode {
    fn default() -> Self {
        Self {
            position: Point::default(),
            scale: 1.0,
            alpha: 1.0,
            z_rotation: 0.0,
        }
    }
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

fn drive(runner: &mut ActionRunner, node: &mut TestNode, dt: f64, until: f64) {
    let mut sounds = NullSoundServer;
    let mut now = 0.0;
    while now <= until {
        let ctx = FrameContext::new(now, dt);
        runner.tick(node, &mut sounds, &ctx).unwrap();
        now += dt;
    }
}

#[test]
fn scale_lands_exactly_on_target_factor() {
    let template = Action::scale_to(0.5, 1000.0);
    let mut runner = ActionRunner::new();
    let mut node = TestNode {
        scale: 0.8,
        ..TestNode::default()
    };
    runner.run(&template, Some("s")).unwrap();

    drive(&mut runner, &mut node, 100.0, 1500.0);

    // Exactly 0.5, not 0.8 minus ten increments of floating error.
    assert_eq!(node.scale, 0.5);
    assert_eq!(runner.is_completed("s"), Some(true));
}

#[test]
fn scale_steps_monotonically_without_overshoot() {
    let template = Action::scale_to(0.5, 1000.0);
    let mut runner = ActionRunner::new();
    let mut sounds = NullSoundServer;
    let mut node = TestNode {
        scale: 0.8,
        ..TestNode::default()
    };
    runner.run(&template, None).unwrap();

    let mut previous = node.scale;
    // Uneven frame times; the incremental step is dt-proportional.
    for (step, dt) in [16.0, 33.0, 16.0, 100.0, 7.0, 250.0, 33.0, 900.0]
        .iter()
        .enumerate()
    {
        let now: f64 = [16.0, 33.0, 16.0, 100.0, 7.0, 250.0, 33.0, 900.0][..step]
            .iter()
            .sum();
        let ctx = FrameContext::new(now, *dt);
        runner.tick(&mut node, &mut sounds, &ctx).unwrap();
        assert!(node.scale <= previous + 1e-12, "grew at frame {step}");
        assert!(node.scale >= 0.5, "overshot at frame {step}");
        previous = node.scale;
    }
}

#[test]
fn fade_reaches_full_transparency() {
    let template = Action::fade_alpha_to(0.0, 400.0);
    let mut runner = ActionRunner::new();
    let mut node = TestNode::default();
    runner.run(&template, Some("f")).unwrap();

    drive(&mut runner, &mut node, 50.0, 600.0);

    assert_eq!(node.alpha, 0.0);
    assert_eq!(runner.is_completed("f"), Some(true));
}

#[test]
fn fade_midpoint_is_roughly_proportional() {
    let template = Action::fade_alpha_to(0.0, 1000.0);
    let mut runner = ActionRunner::new();
    let mut sounds = NullSoundServer;
    let mut node = TestNode::default();
    runner.run(&template, None).unwrap();

    for step in 0..=5 {
        let ctx = FrameContext::new(step as f64 * 100.0, 100.0);
        runner.tick(&mut node, &mut sounds, &ctx).unwrap();
    }
    // Six 10% steps of the fixed starting delta.
    assert!((node.alpha - 0.4).abs() < 1e-9, "alpha {}", node.alpha);
}

#[test]
fn grouped_tweens_share_the_window() {
    let template = Action::group(vec![
        Action::scale_to(2.0, 500.0),
        Action::fade_alpha_to(0.25, 500.0),
    ]);
    let mut runner = ActionRunner::new();
    let mut node = TestNode::default();
    runner.run(&template, Some("g")).unwrap();

    drive(&mut runner, &mut node, 50.0, 800.0);

    assert_eq!(node.scale, 2.0);
    assert_eq!(node.alpha, 0.25);
    assert_eq!(runner.is_completed("g"), Some(true));
}
