pub mod canvas;
pub mod mask;
pub mod ops;
