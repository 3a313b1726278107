pub mod detail;
pub mod facilities;
pub mod help;
pub mod lookup;
pub mod map;
pub mod overview;
pub mod schools;
