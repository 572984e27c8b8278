pub mod clipboard;
pub mod color;
pub mod error;
pub mod group;
pub mod memo;
pub mod text;
