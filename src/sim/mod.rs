//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (ball slots, grid columns then rows)
//! - No rendering or platform dependencies

pub mod balls;
pub mod collision;
pub mod grid;
pub mod maps;
pub mod paddle;
pub mod physics;
pub mod powerup;
pub mod state;
pub mod tick;

pub use balls::Balls;
pub use collision::{ball_box_overlap, paddle_deflection, resolve_box_contact, with_speed};
pub use grid::{BrickGrid, Cell, GridLayout, derive_dimensions, snap_six_plus_one};
pub use maps::{ExternalGrid, Pattern, generate_map, parse_grid_response};
pub use paddle::{Paddle, PaddleRect};
pub use powerup::{PowerUp, PowerUpKind, PowerUps};
pub use state::{Field, GameEvent, GamePhase, GameState};
pub use tick::{TickInput, step, tick};
