/// Game state and the controller that transforms it one event at a time.

pub mod event;
pub mod render;
pub mod step;
pub mod world;
