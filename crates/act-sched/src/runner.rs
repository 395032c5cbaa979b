use act_core::{ActionError, ActionTarget, FrameContext, SoundServer};
use act_tools::{NullTraceSink, TraceEvent, TraceSink};

use crate::action::Action;
use crate::instance::ActionInstance;
use crate::prepare::prepare;

/// Per-target list of active actions.
///
/// The host render loop drives this once per frame via [`ActionRunner::tick`].
/// Completed actions stay on the list until explicitly removed; there is no
/// auto-pruning. Removal is the cancellation point and stops any live audio
/// source in the removed subtrees.
#[derive(Default)]
pub struct ActionRunner {
    active: Vec<ActionInstance>,
    trace: Option<Box<dyn TraceSink>>,
}

impl ActionRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stream scheduler events into `sink`. Pure observability; behavior
    /// never depends on it.
    pub fn set_trace(&mut self, sink: Box<dyn TraceSink>) {
        self.trace = Some(sink);
    }

    pub fn take_trace(&mut self) -> Option<Box<dyn TraceSink>> {
        self.trace.take()
    }

    /// Prepare `template` and append the run-ready instance, tagged with
    /// `key` for later lookup or removal. The template is untouched and can
    /// be run again, on this or any other target.
    pub fn run(&mut self, template: &Action, key: Option<&str>) -> Result<(), ActionError> {
        let instance = prepare(template, key)?;
        self.active.push(instance);
        Ok(())
    }

    /// Advance every active action by one frame.
    pub fn tick(
        &mut self,
        target: &mut dyn ActionTarget,
        sounds: &mut dyn SoundServer,
        ctx: &FrameContext,
    ) -> Result<(), ActionError> {
        let mut null = NullTraceSink;
        let sink: &mut dyn TraceSink = match self.trace.as_deref_mut() {
            Some(sink) => sink,
            None => &mut null,
        };

        for instance in &mut self.active {
            if !instance.run_traced {
                instance.run_traced = true;
                sink.emit(TraceEvent::action_run(
                    ctx.now as u64,
                    instance.node_count() as u64,
                ));
            }
            instance.evaluate(target, sounds, sink, ctx)?;
            if instance.is_completed() && !instance.completion_traced {
                instance.completion_traced = true;
                sink.emit(TraceEvent::action_completed(ctx.now as u64));
            }
        }
        Ok(())
    }

    /// Cancel and drop every action run under `key`. Returns how many were
    /// removed.
    pub fn remove(&mut self, key: &str, sounds: &mut dyn SoundServer) -> usize {
        let mut removed = 0;
        let mut kept = Vec::with_capacity(self.active.len());
        for mut instance in std::mem::take(&mut self.active) {
            if instance.key() == Some(key) {
                instance.cancel(sounds);
                removed += 1;
            } else {
                kept.push(instance);
            }
        }
        self.active = kept;
        removed
    }

    /// Cancel and drop everything.
    pub fn cancel_all(&mut self, sounds: &mut dyn SoundServer) {
        for instance in &mut self.active {
            instance.cancel(sounds);
        }
        self.active.clear();
    }

    pub fn has_action(&self, key: &str) -> bool {
        self.active.iter().any(|a| a.key() == Some(key))
    }

    /// Completion state of the first action run under `key`, if any.
    pub fn is_completed(&self, key: &str) -> Option<bool> {
        self.active
            .iter()
            .find(|a| a.key() == Some(key))
            .map(ActionInstance::is_completed)
    }

    pub fn actions(&self) -> impl Iterator<Item = &ActionInstance> {
        self.active.iter()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}
