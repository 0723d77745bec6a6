pub mod import;
pub mod labels;
pub mod preview;
pub mod sprites;
