/// Lifecycle of a track inside [`SortTracker`](crate::tracker::SortTracker).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackState {
    /// Newly created track, waiting for enough consecutive hits
    #[default]
    Tentative,
    /// Track has survived its warm-up window and may be reported
    Confirmed,
    /// Track has been dropped and will be purged on the next update
    Deleted,
}
