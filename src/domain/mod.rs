// Domain layer - pure AQI, selection and playback logic
pub mod aqi;
pub mod breakpoint;
pub mod dashboard;
pub mod legend;
pub mod playback;
pub mod selector;
pub mod series;
