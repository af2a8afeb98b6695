//! Domain entities - The records that flow through a single analysis

mod advisory;
mod analysis_result;
mod daily_weather;
mod place;

pub use advisory::{Advisory, AdvisoryKind};
pub use analysis_result::AnalysisResult;
pub use daily_weather::DailyWeather;
pub use place::Place;
