//! Simulation module
//!
//! All gameplay logic lives here:
//! - Time is injected as `Instant`, never read from the clock
//! - Seeded RNG only, one stream per generator
//! - No rendering or platform dependencies

pub mod animator;
pub mod background;
pub mod collision;
pub mod corridor;
pub mod entity;
pub mod explosion;
pub mod frames;
pub mod obstacles;
pub mod player;
pub mod state;
pub mod tick;

pub use animator::{Animator, PlayDirection};
pub use background::Background;
pub use collision::{collides, first_hit, first_hit_in_ordered, intersects};
pub use corridor::{BoundarySegment, Corridor, Edge, Envelope};
pub use entity::{Body, Collidable, Rect};
pub use explosion::Explosion;
pub use frames::{Assets, Frame, FrameSet, ImageProvider, SheetLibrary, SpriteSheet};
pub use obstacles::{ObstacleManager, Rock, RockStep};
pub use player::Player;
pub use state::{RngState, RoundPhase, RoundSnapshot, Simulation};
pub use tick::{TickInput, tick};
