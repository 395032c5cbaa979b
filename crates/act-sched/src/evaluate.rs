use std::f64::consts::{PI, TAU};

use act_core::{ActionError, ActionTarget, FrameContext, Point, SoundServer, SoundStatus};
use act_tools::{TraceEvent, TraceSink};

use crate::action::{RepeatCount, Rotation};
use crate::instance::{ActionId, ActionInstance, MoveTween, NodeKind, Spin};

impl ActionInstance {
    /// Advance the whole tree by one frame against `target`.
    ///
    /// Children are always evaluated strictly before their container, since
    /// a container's derived completion depends on them. A fatal error
    /// aborts this action's evaluation for the frame and is expected to
    /// reach the host's per-frame error boundary.
    pub fn evaluate(
        &mut self,
        target: &mut dyn ActionTarget,
        sounds: &mut dyn SoundServer,
        sink: &mut dyn TraceSink,
        ctx: &FrameContext,
    ) -> Result<(), ActionError> {
        self.evaluate_node(self.root, target, sounds, sink, ctx)
    }

    fn evaluate_node(
        &mut self,
        id: ActionId,
        target: &mut dyn ActionTarget,
        sounds: &mut dyn SoundServer,
        sink: &mut dyn TraceSink,
        ctx: &FrameContext,
    ) -> Result<(), ActionError> {
        let i = id.index();

        // Transition gate: not opted in, target mid-transition.
        if target.in_transition() && !self.nodes[i].run_during_transition {
            return Ok(());
        }

        // Lazy start binding: the first evaluation stamps the whole
        // subtree with the same run start, exactly once per run.
        if self.nodes[i].run_start.is_none() {
            for node_id in self.subtree(id) {
                self.nodes[node_id.index()].run_start = Some(ctx.now);
            }
        }

        let run_start = self.nodes[i].run_start.unwrap_or(ctx.now);
        let start = run_start + self.nodes[i].start_offset.value();

        // Not yet due. An unresolved offset parks the action until some
        // upstream duration resolves.
        if ctx.now < start {
            return Ok(());
        }

        // Running window; an unresolved duration keeps it open.
        let in_window = ctx.now <= start + self.nodes[i].duration.value();

        if self.nodes[i].kind.is_container() {
            self.evaluate_container(id, in_window, target, sounds, sink, ctx)
        } else {
            self.evaluate_leaf(id, in_window, start, target, sounds, sink, ctx)
        }
    }

    fn evaluate_container(
        &mut self,
        id: ActionId,
        in_window: bool,
        target: &mut dyn ActionTarget,
        sounds: &mut dyn SoundServer,
        sink: &mut dyn TraceSink,
        ctx: &FrameContext,
    ) -> Result<(), ActionError> {
        let i = id.index();
        let children = self.nodes[i].children.clone();
        for &child in &children {
            self.evaluate_node(child, target, sounds, sink, ctx)?;
        }

        let derived_completed = self.node_completed(id);
        {
            let node = &mut self.nodes[i];
            node.started = true;
            // The container only "runs" up to the instant its children
            // finish, even while the window is still open.
            node.running = in_window && !derived_completed;
        }

        if matches!(self.nodes[i].kind, NodeKind::Repeat { .. }) {
            self.check_repetition(id, sink, ctx)?;
        }
        Ok(())
    }

    /// Repetition completion: the container is running, its single child's
    /// subtree has completed, and the repetition count is not yet
    /// satisfied. Restarting immediately (rather than unbinding the start
    /// time) avoids a one-frame gap between repetitions.
    fn check_repetition(
        &mut self,
        id: ActionId,
        sink: &mut dyn TraceSink,
        ctx: &FrameContext,
    ) -> Result<(), ActionError> {
        let i = id.index();
        if !self.nodes[i].running {
            return Ok(());
        }
        let Some(&child) = self.nodes[i].children.first() else {
            return Ok(());
        };
        if !self.node_completed(child) || self.node_completed(id) {
            return Ok(());
        }

        // A just-finished repetition must have a resolvable duration.
        let rep_duration = self.nodes[child.index()].duration.value();
        if !rep_duration.is_finite() {
            return Err(ActionError::UnresolvedRepetition);
        }

        let (count, repetitions, cumulative) = {
            let NodeKind::Repeat {
                count,
                completed_repetitions,
                cumulative_duration,
            } = &mut self.nodes[i].kind
            else {
                return Ok(());
            };
            *completed_repetitions += 1;
            *cumulative_duration += rep_duration;
            (*count, *completed_repetitions, *cumulative_duration)
        };

        sink.emit(TraceEvent::repeat_cycle(ctx.now as u64, id.0, repetitions));

        let satisfied = match count {
            RepeatCount::Times(n) => repetitions >= u64::from(n),
            RepeatCount::Forever => false,
        };
        if !satisfied {
            self.restart_subtree(child, ctx.now);
        } else {
            // Defensive: the forever variant must never satisfy its count.
            if matches!(count, RepeatCount::Forever) {
                return Err(ActionError::RepeatForeverSatisfied);
            }
            self.nodes[i].duration.assign(cumulative);
            self.nodes[i].running = false;
        }
        Ok(())
    }

    fn restart_subtree(&mut self, id: ActionId, now: f64) {
        for node_id in self.subtree(id) {
            let node = &mut self.nodes[node_id.index()];
            node.run_start = Some(now);
            node.started = true;
            node.running = true;
            node.completed = false;
            match &mut node.kind {
                NodeKind::Custom { fired, .. } => *fired = false,
                NodeKind::Play { source, .. } => {
                    *source = None;
                    // Each repetition of a sound-driven action re-resolves
                    // its own duration.
                    node.duration.assign(f64::INFINITY);
                }
                NodeKind::Repeat {
                    completed_repetitions,
                    cumulative_duration,
                    ..
                } => {
                    *completed_repetitions = 0;
                    *cumulative_duration = 0.0;
                    node.duration.assign(f64::INFINITY);
                }
                _ => {}
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn evaluate_leaf(
        &mut self,
        id: ActionId,
        in_window: bool,
        start: f64,
        target: &mut dyn ActionTarget,
        sounds: &mut dyn SoundServer,
        sink: &mut dyn TraceSink,
        ctx: &FrameContext,
    ) -> Result<(), ActionError> {
        let i = id.index();
        if !in_window {
            let node = &mut self.nodes[i];
            node.running = false;
            if node.completed {
                // Idempotent no-op on every frame after finishing.
                return Ok(());
            }
        }

        let elapsed = ctx.now - start;
        let duration = self.nodes[i].duration.value();
        let end = start + duration;

        let node = &mut self.nodes[i];
        node.started = true;
        match &mut node.kind {
            NodeKind::Wait => {
                if ctx.now > end {
                    node.running = false;
                    node.completed = true;
                } else {
                    node.running = true;
                }
            }
            NodeKind::Custom { callback, fired } => {
                if !*fired {
                    *fired = true;
                    (**callback)(target);
                }
                node.running = false;
                node.completed = true;
            }
            NodeKind::Move { to, easing, tween } => {
                let t = *tween.get_or_insert_with(|| {
                    let from = target.position();
                    MoveTween {
                        from,
                        delta: Point::new(to.x - from.x, to.y - from.y),
                    }
                });
                if elapsed < duration {
                    node.running = true;
                    let x = (easing)(elapsed, t.from.x, t.delta.x, duration);
                    let y = (easing)(elapsed, t.from.y, t.delta.y, duration);
                    target.set_position(Point::new(x, y));
                } else {
                    // Snap exactly; no residual easing error.
                    target.set_position(*to);
                    node.running = false;
                    node.completed = true;
                }
            }
            NodeKind::Scale { to, delta } => {
                let d = *delta.get_or_insert_with(|| *to - target.scale());
                if elapsed < duration {
                    node.running = true;
                    let next = target.scale() + d * ctx.dt / duration;
                    target.set_scale(clamp_overshoot(next, d, *to));
                } else {
                    target.set_scale(*to);
                    node.running = false;
                    node.completed = true;
                }
            }
            NodeKind::FadeAlpha { to, delta } => {
                let d = *delta.get_or_insert_with(|| *to - target.alpha());
                if elapsed < duration {
                    node.running = true;
                    let next = target.alpha() + d * ctx.dt / duration;
                    target.set_alpha(clamp_overshoot(next, d, *to));
                } else {
                    target.set_alpha(*to);
                    node.running = false;
                    node.completed = true;
                }
            }
            NodeKind::Rotate {
                rotation,
                shortest_arc,
                spin,
            } => {
                let s = *spin.get_or_insert_with(|| {
                    let current = target.z_rotation();
                    let (delta, final_angle) = match *rotation {
                        Rotation::By(angle) => (angle, current + angle),
                        Rotation::To(angle) => {
                            let to_n = normalize_angle(angle);
                            let cur_n = normalize_angle(current);
                            let mut d = to_n - cur_n;
                            if *shortest_arc {
                                d = wrap_arc(d);
                            }
                            // Integration starts from the normalized angle.
                            target.set_z_rotation(cur_n);
                            (d, cur_n + d)
                        }
                    };
                    Spin { delta, final_angle }
                });
                if elapsed < duration {
                    node.running = true;
                    let next = target.z_rotation() + s.delta * ctx.dt / duration;
                    target.set_z_rotation(clamp_overshoot(next, s.delta, s.final_angle));
                } else {
                    target.set_z_rotation(s.final_angle);
                    node.running = false;
                    node.completed = true;
                }
            }
            NodeKind::Play { sound, source } => {
                if source.is_none() {
                    match sounds.status(sound) {
                        SoundStatus::Pending => {
                            tracing::debug!(sound = %sound, "audio buffer not ready; retrying next frame");
                            sounds.fetch(sound);
                            sink.emit(TraceEvent::play_pending(ctx.now as u64, id.0));
                            node.running = true;
                        }
                        SoundStatus::Failed => {
                            return Err(ActionError::SoundFailed {
                                name: sound.clone(),
                            });
                        }
                        SoundStatus::Ready => {
                            let duration_cell = node.duration.clone();
                            let began = ctx.now;
                            let handle = sounds.play(
                                sound,
                                Box::new(move |finished_at| {
                                    duration_cell.assign(finished_at - began);
                                }),
                            )?;
                            *source = Some(handle);
                            node.running = true;
                            sink.emit(TraceEvent::play_started(ctx.now as u64, id.0));
                        }
                    }
                } else {
                    // Playing; completion is observed through the duration
                    // futurable the backend's callback resolves.
                    let resolved = node.duration.value();
                    if resolved.is_finite() && elapsed >= resolved {
                        if !node.completed {
                            sink.emit(TraceEvent::play_resolved(ctx.now as u64, id.0));
                        }
                        node.running = false;
                        node.completed = true;
                    } else {
                        node.running = true;
                    }
                }
            }
            NodeKind::Sequence | NodeKind::Group | NodeKind::Repeat { .. } => {
                unreachable!("container evaluated as leaf")
            }
        }
        Ok(())
    }
}

/// Clamp an incremental step at the final value; the overshoot direction
/// follows the sign of `delta`.
fn clamp_overshoot(value: f64, delta: f64, final_value: f64) -> f64 {
    if delta <= 0.0 {
        if value < final_value {
            final_value
        } else {
            value
        }
    } else if value > final_value {
        final_value
    } else {
        value
    }
}

/// Normalize an angle into `[0, 2π)`.
fn normalize_angle(angle: f64) -> f64 {
    angle.rem_euclid(TAU)
}

/// Wrap a normalized-angle difference into `(−π, π]` so the turn is always
/// the shorter arc, with the correct sign in every quadrant combination.
fn wrap_arc(delta: f64) -> f64 {
    if delta > PI {
        delta - TAU
    } else if delta <= -PI {
        delta + TAU
    } else {
        delta
    }
}
