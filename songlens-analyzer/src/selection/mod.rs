//! Balanced selection and playlist publishing

pub mod balanced;
pub mod playlist;

pub use balanced::{
    build_candidates, select_balanced, selection_report, BalanceCriteria, BalancedSelectionReport,
    SelectedTrack, SelectionCandidate,
};
pub use playlist::{
    create_playlist_from, publish_playlist, PlaylistCreationReport, MAX_ITEMS_PER_REQUEST,
};
