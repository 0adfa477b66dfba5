//! Error types for the routing layer.

use roomcast_chat::ChatError;
use roomcast_protocol::{LinkId, Location, LocationKind, PlayerKey, RoomId};
use roomcast_session::SessionError;

/// Errors that can occur while routing players and messages.
///
/// Every variant except [`Chat`](RouterError::Chat) and
/// [`Session`](RouterError::Session) is raised before any router state is
/// touched.
#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    /// The router's near rooms have not been computed yet.
    #[error("router at {0} is not initialized")]
    NotInitialized(Location),

    /// `init` was called twice on the same router.
    #[error("router at {0} is already initialized")]
    AlreadyInitialized(Location),

    /// A location of the wrong kind was handed to a router or the world.
    #[error("location {location} is not a {expected:?}")]
    WrongLocationKind {
        location: Location,
        expected: LocationKind,
    },

    /// No room with this id exists in the graph.
    #[error("room {0} not found")]
    RoomNotFound(RoomId),

    /// Two rooms share the same id.
    #[error("room {0} is defined twice")]
    DuplicateRoom(RoomId),

    /// Two tile maps share the same location.
    #[error("location {0} is defined twice")]
    DuplicateLocation(Location),

    /// A move targeted a room that is not one link away.
    #[error("{to} is not adjacent to {from}")]
    NotAdjacent { from: Location, to: Location },

    /// The player is not in this router's local group.
    #[error("player {0} not found at {1}")]
    PlayerNotFound(PlayerKey, Location),

    /// This kind of router cannot move players to a neighbor.
    #[error("router at {0} does not support moves")]
    MoveUnsupported(Location),

    /// The link does not exist in this room or carries no door.
    #[error("no door {0} in {1}")]
    DoorNotFound(LinkId, Location),

    #[error(transparent)]
    Chat(#[from] ChatError),

    #[error(transparent)]
    Session(#[from] SessionError),
}
