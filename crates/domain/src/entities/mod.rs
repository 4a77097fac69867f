//! Domain entities

mod forecast;

pub use forecast::{CurrentConditions, ForecastSnapshot, HourPoint, MinutePoint, PrecipType};
