pub mod types;
pub mod rejection;
pub mod state;

pub mod entities;
pub mod grid;
pub mod systems;
