use crate::error::ActionError;

/// Decode state of a registered sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundStatus {
    /// Registered but not decoded yet (possibly a deferred load).
    Pending,
    /// Decoded and playable.
    Ready,
    /// Decoding or loading failed.
    Failed,
}

/// Handle to a live audio source, used for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceId(pub u64);

/// Invoked once when playback finishes, with the frame-clock time at which
/// it finished.
pub type CompletionFn = Box<dyn FnOnce(f64)>;

/// Audio collaborator behind the `Play` action.
///
/// The scheduler only polls; it never blocks on decoding. Implementations
/// are expected to fire completion callbacks from their own host-driven
/// update, on the same thread as the scheduler.
pub trait SoundServer {
    fn status(&self, name: &str) -> SoundStatus;

    /// Trigger a deferred load for a lazily-registered sound. Default is a
    /// no-op for backends that load eagerly.
    fn fetch(&mut self, _name: &str) {}

    /// Start playback, binding `on_complete` to the end of the sound.
    fn play(&mut self, name: &str, on_complete: CompletionFn) -> Result<SourceId, ActionError>;

    /// Stop and disconnect a live source. Must be safe to call for a source
    /// that already finished.
    fn stop(&mut self, source: SourceId);
}

/// Sound server for hosts without an audio backend. Every `Play` action
/// evaluated against it is a fatal error.
#[derive(Debug, Default)]
pub struct NullSoundServer;

impl SoundServer for NullSoundServer {
    fn status(&self, _name: &str) -> SoundStatus {
        SoundStatus::Failed
    }

    fn play(&mut self, name: &str, _on_complete: CompletionFn) -> Result<SourceId, ActionError> {
        Err(ActionError::SoundUnavailable { name: name.into() })
    }

    fn stop(&mut self, _source: SourceId) {}
}
