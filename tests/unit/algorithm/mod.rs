pub mod control;
pub mod selection;
