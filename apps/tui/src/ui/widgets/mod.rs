pub mod bars;
pub mod charts;
pub mod map;
pub mod popup;
pub mod tables;
