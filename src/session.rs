pub mod clock;
pub mod player;
pub mod preview;
pub mod scheduler;
