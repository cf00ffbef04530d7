pub mod chart;
pub mod map;
pub mod panels;
pub mod tables;
