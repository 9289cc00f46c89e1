pub mod cover;
pub mod engine;
pub mod grid;
pub mod heat;
pub mod text_layer;
