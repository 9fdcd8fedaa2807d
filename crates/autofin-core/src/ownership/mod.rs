pub mod suggest;
pub mod tco;
