pub mod menu;
pub mod progress_bar;
pub mod quiz_card;
pub mod radial_chart;
pub mod summary;
