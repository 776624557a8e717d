pub mod analysis;
pub mod anomaly;
pub mod climatology;
pub mod error;
pub mod forecast;
#[cfg(feature = "api")]
pub mod gateway;
pub mod impact;
pub mod metadata;
pub mod payload;
pub mod scenario;
pub mod source;
pub mod statistics;
pub mod time_series;
pub mod trend;
pub mod year_range;

pub use error::GatewayError;
pub use source::{AnalyticsSource, SeriesQuery};
