//! Scrubline Select - picking an instant by dragging a thumb over a strip
//!
//! Components, leaf first:
//! - `clamp`: keeps the thumb inside the track
//! - `mapper`: pixel offset <-> timeline instant
//! - `gesture`: drag state machine for the track and thumb gesture sources
//! - `coordinator`: one live thumbnail fetch at a time, stale results dropped
//! - `notifier`: publishes selection events to observers
//! - `selector`: `TimeSelector`, wiring the above to a `TimelineHost`

pub mod clamp;
pub mod config;
pub mod coordinator;
pub mod gesture;
pub mod host;
pub mod mapper;
pub mod notifier;
pub mod selector;

pub use clamp::clamp;
pub use config::SelectorConfig;
pub use coordinator::{
    DisplayedThumbnail, FetchOutcome, FetchPhase, FetchRequest, FetchStats,
    ThumbnailRequestCoordinator,
};
pub use gesture::{
    DragEvent, GestureEmit, GesturePhase, GestureSource, SelectionGestureController,
    SelectionState,
};
pub use host::{PreviewStrip, TimelineHost};
pub use mapper::{offset_from_time, time_from_offset};
pub use notifier::{DelegateNotifier, ObserverId, SelectionEvent};
pub use selector::TimeSelector;
