pub mod diagram;
pub mod help;
pub mod tooltip;
pub mod trace;
