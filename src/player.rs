//! Player controller: the playback state machine, its view model and the
//! small API the rest of the app is allowed to use.

mod api;
mod controller;
mod history;
mod order;
mod state;
mod view;

pub use api::{PlayerApi, TrackChanged};
pub use controller::PlayerController;
pub use history::{History, NavigationSnapshot};
pub use order::{next_index, prev_index};
pub use state::{PlaybackState, RepeatMode};
pub use view::{PlayIcon, PlayerView, QueueRow, VolumeIcon, format_time};
