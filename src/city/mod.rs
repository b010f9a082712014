//! City layer - settlements and their stockpiles

pub mod settlement;
pub mod stockpile;

pub use settlement::Settlement;
pub use stockpile::Stockpile;
