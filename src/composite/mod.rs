pub mod blit;
pub mod collage;
pub mod color;
