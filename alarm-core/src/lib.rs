pub mod catalog;
pub mod connection;
pub mod directory;
pub mod distribution;
pub mod errors;
pub mod game_state;
pub mod player;
pub mod scoring;
pub mod timer;

// Re-export main components
pub use catalog::*;
pub use connection::*;
pub use directory::*;
pub use distribution::*;
pub use errors::*;
pub use game_state::*;
pub use player::*;
pub use scoring::*;
pub use timer::*;
