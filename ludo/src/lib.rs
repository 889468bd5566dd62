pub use bitset::*;
pub use board::*;
pub use dice::*;
pub use errors::*;
pub use geometry::*;
pub use motion::*;
pub use player_state::*;
pub use position::*;
pub use snapshot::*;
pub use turn::*;
pub use visualization::*;

#[cfg(test)]
mod arbitrary;
mod bitset;
mod board;
mod dice;
mod errors;
mod geometry;
mod motion;
mod player_state;
mod position;
mod snapshot;
mod turn;
mod visualization;
