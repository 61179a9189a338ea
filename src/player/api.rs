use crate::catalog::Track;

/// Broadcast whenever the active track changes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TrackChanged {
    pub index: usize,
}

/// The surface other parts of the app may depend on. Nothing else reaches
/// into the controller or its playback handle.
pub trait PlayerApi {
    /// Read-only view of the playlist.
    fn playlist(&self) -> &[Track];
    /// Same as activating queue row `index`.
    fn play_at(&mut self, index: usize);
    fn current_index(&self) -> usize;
}
