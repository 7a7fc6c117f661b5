pub mod combat;
pub mod player;
