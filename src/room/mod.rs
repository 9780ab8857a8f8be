pub mod coordinator;
pub mod events;
pub mod fanout;
pub mod participants;

pub use coordinator::RecordingCoordinator;
pub use events::{RecordAction, RoomEvent};
pub use fanout::EventFanout;
pub use participants::{Participant, ParticipantRegistry};
