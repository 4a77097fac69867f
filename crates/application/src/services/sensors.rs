//! Derived sensors
//!
//! Each sensor is a [`SensorDescriptor`]: a key, presentation metadata and
//! two pure functions over the latest snapshot of the coordinator it reads
//! from. Values are recomputed on every read, so a sensor always reflects
//! the most recently committed snapshot.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, NaiveTime, Utc};
use domain::rounding::{finite, round_or_zero, round_to};
use domain::{ForecastFeed, ForecastSnapshot, Measurement, UnitSystem};
use serde::Serialize;
use serde_json::{Map, Value, json};

use super::coordinator::Coordinator;

const SECONDS_PER_DAY: i64 = 86_400;
const HOURLY_ATTRIBUTE_POINTS: usize = 24;
const PRECIP_DECIMALS: u32 = 4;

/// A presented sensor value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SensorValue {
    /// Point in time, presented as RFC 3339
    Timestamp(DateTime<Utc>),
    /// Decimal number
    Number(f64),
    /// Whole number
    Integer(i64),
}

impl SensorValue {
    /// Numeric value, if any
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Timestamp(_) => None,
            Self::Number(n) => Some(*n),
            Self::Integer(n) => Some(*n as f64),
        }
    }
}

/// Inputs shared by every sensor read
#[derive(Debug, Clone, Copy)]
pub struct SensorContext<'a> {
    /// Time of the read
    pub now: DateTime<Utc>,
    /// Units values are presented in
    pub unit_system: UnitSystem,
    /// Display name of the forecast location
    pub location_name: &'a str,
}

impl SensorContext<'_> {
    /// Start of the current UTC day (unix seconds)
    pub fn midnight_utc(&self) -> i64 {
        self.now
            .date_naive()
            .and_time(NaiveTime::MIN)
            .and_utc()
            .timestamp()
    }
}

/// Computes the presented value from the latest snapshot
pub type ComputeFn = fn(Option<&ForecastSnapshot>, &SensorContext<'_>) -> Option<SensorValue>;

/// Computes the extra state attributes from the latest snapshot
pub type AttributesFn = fn(Option<&ForecastSnapshot>, &SensorContext<'_>) -> Option<Map<String, Value>>;

/// Static description of one sensor kind
#[derive(Clone, Copy)]
pub struct SensorDescriptor {
    pub key: &'static str,
    pub name: &'static str,
    pub icon: Option<&'static str>,
    /// Feed of the coordinator the sensor reads
    pub feed: ForecastFeed,
    /// Physical quantity, `None` for non-numeric sensors
    pub measurement: Option<Measurement>,
    pub display_precision: Option<u8>,
    pub compute: ComputeFn,
    pub attributes: AttributesFn,
}

impl SensorDescriptor {
    /// Device class derived from the measurement
    pub fn device_class(&self) -> Option<&'static str> {
        self.measurement.map(|measurement| match measurement {
            Measurement::Temperature => "temperature",
            Measurement::WindSpeed => "wind_speed",
        })
    }

    pub fn state_class(&self) -> Option<&'static str> {
        self.measurement.map(|_| "measurement")
    }

    pub fn unit(&self, unit_system: UnitSystem) -> Option<&'static str> {
        self.measurement.map(|measurement| unit_system.unit_of(measurement))
    }
}

impl fmt::Debug for SensorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SensorDescriptor")
            .field("key", &self.key)
            .field("feed", &self.feed)
            .field("measurement", &self.measurement)
            .finish_non_exhaustive()
    }
}

fn no_attributes(_: Option<&ForecastSnapshot>, _: &SensorContext<'_>) -> Option<Map<String, Value>> {
    None
}

fn present_timestamp(snapshot: Option<&ForecastSnapshot>, ctx: &SensorContext<'_>) -> Option<SensorValue> {
    snapshot.map(|_| SensorValue::Timestamp(ctx.now))
}

fn minutely_attributes(
    snapshot: Option<&ForecastSnapshot>,
    ctx: &SensorContext<'_>,
) -> Option<Map<String, Value>> {
    let data: Vec<Value> = snapshot
        .map(ForecastSnapshot::minute_points)
        .unwrap_or_default()
        .iter()
        .map(|point| {
            json!({
                "time": point.time,
                "precipIntensity": round_or_zero(point.precip_intensity, PRECIP_DECIMALS),
                "precipProbability": round_or_zero(point.precip_probability, PRECIP_DECIMALS),
                "precipIntensityError": round_or_zero(point.precip_intensity_error, PRECIP_DECIMALS),
                "precipType": point.precip_type.as_str(),
            })
        })
        .collect();

    let mut attributes = Map::new();
    attributes.insert("location_name".into(), Value::from(ctx.location_name));
    attributes.insert("data".into(), Value::Array(data));
    Some(attributes)
}

fn hourly_attributes(
    snapshot: Option<&ForecastSnapshot>,
    ctx: &SensorContext<'_>,
) -> Option<Map<String, Value>> {
    let data: Vec<Value> = snapshot
        .map(ForecastSnapshot::hour_points)
        .unwrap_or_default()
        .iter()
        .take(HOURLY_ATTRIBUTE_POINTS)
        .map(|point| {
            // A missing temperature shows as 0 in the list.
            let temperature = point
                .temperature
                .and_then(finite)
                .map(|t| ctx.unit_system.convert(Measurement::Temperature, t))
                .and_then(|t| round_to(t, 0))
                .map_or(0, |t| t as i64);
            json!({
                "time": point.time,
                "icon": point.icon,
                "summary": point.summary,
                "temperature": temperature,
                "precipIntensity": round_or_zero(point.precip_intensity, PRECIP_DECIMALS),
                "precipProbability": round_or_zero(point.precip_probability, PRECIP_DECIMALS),
            })
        })
        .collect();

    let mut attributes = Map::new();
    attributes.insert("data".into(), Value::Array(data));
    Some(attributes)
}

fn present(ctx: &SensorContext<'_>, measurement: Measurement, si_value: f64, decimals: u32) -> Option<SensorValue> {
    let value = round_to(ctx.unit_system.convert(measurement, finite(si_value)?), decimals)?;
    Some(if decimals == 0 {
        SensorValue::Integer(value as i64)
    } else {
        SensorValue::Number(value)
    })
}

fn current_temperature(snapshot: Option<&ForecastSnapshot>, ctx: &SensorContext<'_>) -> Option<SensorValue> {
    let temperature = snapshot?.current?.temperature?;
    present(ctx, Measurement::Temperature, temperature, 1)
}

fn current_wind_speed(snapshot: Option<&ForecastSnapshot>, ctx: &SensorContext<'_>) -> Option<SensorValue> {
    let wind_speed = snapshot?.current?.wind_speed?;
    present(ctx, Measurement::WindSpeed, wind_speed, 0)
}

fn today_extreme(
    snapshot: Option<&ForecastSnapshot>,
    ctx: &SensorContext<'_>,
    pick: fn(f64, f64) -> f64,
) -> Option<SensorValue> {
    let start = ctx.midnight_utc();
    let extreme = snapshot?
        .temperatures_between(start, start + SECONDS_PER_DAY)
        .reduce(pick)?;
    present(ctx, Measurement::Temperature, extreme, 0)
}

fn today_high(snapshot: Option<&ForecastSnapshot>, ctx: &SensorContext<'_>) -> Option<SensorValue> {
    today_extreme(snapshot, ctx, f64::max)
}

fn today_low(snapshot: Option<&ForecastSnapshot>, ctx: &SensorContext<'_>) -> Option<SensorValue> {
    today_extreme(snapshot, ctx, f64::min)
}

/// Minute-level precipitation list
pub const MINUTELY_FORECAST: SensorDescriptor = SensorDescriptor {
    key: "minutely_forecast",
    name: "Minutely Forecast",
    icon: Some("mdi:weather-rainy"),
    feed: ForecastFeed::Minutely,
    measurement: None,
    display_precision: None,
    compute: present_timestamp,
    attributes: minutely_attributes,
};

/// Next 24 hours of the hourly forecast
pub const HOURLY_FORECAST: SensorDescriptor = SensorDescriptor {
    key: "hourly_forecast",
    name: "Hourly Forecast",
    icon: Some("mdi:weather-partly-cloudy"),
    feed: ForecastFeed::Hourly,
    measurement: None,
    display_precision: None,
    compute: present_timestamp,
    attributes: hourly_attributes,
};

pub const CURRENT_TEMPERATURE: SensorDescriptor = SensorDescriptor {
    key: "current_apparent_temperature",
    name: "Current Temperature",
    icon: None,
    feed: ForecastFeed::Hourly,
    measurement: Some(Measurement::Temperature),
    display_precision: Some(1),
    compute: current_temperature,
    attributes: no_attributes,
};

pub const TODAY_HIGH_TEMPERATURE: SensorDescriptor = SensorDescriptor {
    key: "today_high_temperature",
    name: "Today High Temperature",
    icon: None,
    feed: ForecastFeed::Hourly,
    measurement: Some(Measurement::Temperature),
    display_precision: Some(0),
    compute: today_high,
    attributes: no_attributes,
};

pub const TODAY_LOW_TEMPERATURE: SensorDescriptor = SensorDescriptor {
    key: "today_low_temperature",
    name: "Today Low Temperature",
    icon: None,
    feed: ForecastFeed::Hourly,
    measurement: Some(Measurement::Temperature),
    display_precision: Some(0),
    compute: today_low,
    attributes: no_attributes,
};

pub const CURRENT_WIND_SPEED: SensorDescriptor = SensorDescriptor {
    key: "current_wind_speed",
    name: "Current Wind Speed",
    icon: None,
    feed: ForecastFeed::Hourly,
    measurement: Some(Measurement::WindSpeed),
    display_precision: Some(0),
    compute: current_wind_speed,
    attributes: no_attributes,
};

/// Every sensor an installation publishes, in publication order
pub static SENSOR_DESCRIPTORS: [SensorDescriptor; 6] = [
    MINUTELY_FORECAST,
    HOURLY_FORECAST,
    CURRENT_TEMPERATURE,
    TODAY_HIGH_TEMPERATURE,
    TODAY_LOW_TEMPERATURE,
    CURRENT_WIND_SPEED,
];

/// Published state of one sensor
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorState {
    pub unique_id: String,
    pub key: &'static str,
    pub name: &'static str,
    /// Presented value; `null` when there is nothing to present
    pub state: Option<SensorValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_of_measurement: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_class: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_class: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_precision: Option<u8>,
}

/// A descriptor bound to an installation and its coordinator
#[derive(Debug, Clone)]
pub struct SensorEntity {
    unique_id: String,
    descriptor: &'static SensorDescriptor,
    coordinator: Arc<Coordinator>,
}

impl SensorEntity {
    pub fn new(entry_id: &str, descriptor: &'static SensorDescriptor, coordinator: Arc<Coordinator>) -> Self {
        Self {
            unique_id: format!("{entry_id}_{}", descriptor.key),
            descriptor,
            coordinator,
        }
    }

    /// Stable identifier: `{entry_id}_{key}`
    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    pub fn key(&self) -> &'static str {
        self.descriptor.key
    }

    pub fn descriptor(&self) -> &'static SensorDescriptor {
        self.descriptor
    }

    pub fn value(&self, ctx: &SensorContext<'_>) -> Option<SensorValue> {
        let snapshot = self.coordinator.snapshot();
        (self.descriptor.compute)(snapshot.as_deref(), ctx)
    }

    pub fn attributes(&self, ctx: &SensorContext<'_>) -> Option<Map<String, Value>> {
        let snapshot = self.coordinator.snapshot();
        (self.descriptor.attributes)(snapshot.as_deref(), ctx)
    }

    /// Read the full state from the coordinator's latest snapshot
    pub fn state(&self, ctx: &SensorContext<'_>) -> SensorState {
        let snapshot = self.coordinator.snapshot();
        let snapshot = snapshot.as_deref();
        let descriptor = self.descriptor;
        SensorState {
            unique_id: self.unique_id.clone(),
            key: descriptor.key,
            name: descriptor.name,
            state: (descriptor.compute)(snapshot, ctx),
            attributes: (descriptor.attributes)(snapshot, ctx),
            unit_of_measurement: descriptor.unit(ctx.unit_system),
            device_class: descriptor.device_class(),
            state_class: descriptor.state_class(),
            icon: descriptor.icon,
            display_precision: descriptor.display_precision,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use domain::{CurrentConditions, HourPoint, MinutePoint, PrecipType};
    use proptest::prelude::*;

    use super::*;

    // 2024-03-10T00:00:00Z
    const MIDNIGHT: i64 = 1_710_028_800;

    fn ctx(unit_system: UnitSystem) -> SensorContext<'static> {
        SensorContext {
            now: Utc.timestamp_opt(MIDNIGHT + 3 * 3600, 0).single().expect("valid time"),
            unit_system,
            location_name: "Portland",
        }
    }

    fn hour(time: i64, temperature: Option<f64>) -> HourPoint {
        HourPoint {
            time,
            temperature,
            ..HourPoint::default()
        }
    }

    fn hourly_snapshot(points: Vec<HourPoint>) -> ForecastSnapshot {
        ForecastSnapshot::new(Utc::now())
            .with_hourly(points)
            .with_current(CurrentConditions::default())
    }

    fn current(temperature: Option<f64>, wind_speed: Option<f64>) -> ForecastSnapshot {
        ForecastSnapshot::new(Utc::now())
            .with_hourly(vec![])
            .with_current(CurrentConditions {
                temperature,
                wind_speed,
            })
    }

    #[test]
    fn midnight_is_start_of_utc_day() {
        assert_eq!(ctx(UnitSystem::Metric).midnight_utc(), MIDNIGHT);
    }

    #[test]
    fn current_temperature_keeps_one_decimal() {
        let snapshot = current(Some(15.0), None);
        let value = (CURRENT_TEMPERATURE.compute)(Some(&snapshot), &ctx(UnitSystem::Metric));
        assert_eq!(value, Some(SensorValue::Number(15.0)));

        let snapshot = current(Some(15.06), None);
        let value = (CURRENT_TEMPERATURE.compute)(Some(&snapshot), &ctx(UnitSystem::Metric));
        assert_eq!(value, Some(SensorValue::Number(15.1)));
    }

    #[test]
    fn current_temperature_converts_to_fahrenheit() {
        let snapshot = current(Some(15.0), None);
        let value = (CURRENT_TEMPERATURE.compute)(Some(&snapshot), &ctx(UnitSystem::Imperial));
        assert_eq!(value, Some(SensorValue::Number(59.0)));
    }

    #[test]
    fn current_values_absent_without_snapshot_or_field() {
        let context = ctx(UnitSystem::Metric);
        assert_eq!((CURRENT_TEMPERATURE.compute)(None, &context), None);
        assert_eq!((CURRENT_WIND_SPEED.compute)(None, &context), None);

        let snapshot = current(None, None);
        assert_eq!((CURRENT_TEMPERATURE.compute)(Some(&snapshot), &context), None);
        assert_eq!((CURRENT_WIND_SPEED.compute)(Some(&snapshot), &context), None);
    }

    #[test]
    fn wind_speed_rounds_to_integer() {
        let snapshot = current(None, Some(4.6));
        let value = (CURRENT_WIND_SPEED.compute)(Some(&snapshot), &ctx(UnitSystem::Metric));
        assert_eq!(value, Some(SensorValue::Integer(5)));

        let snapshot = current(None, Some(10.0));
        let value = (CURRENT_WIND_SPEED.compute)(Some(&snapshot), &ctx(UnitSystem::Imperial));
        assert_eq!(value, Some(SensorValue::Integer(22)));
    }

    #[test]
    fn high_low_window_is_half_open_utc_day() {
        let snapshot = hourly_snapshot(vec![
            hour(MIDNIGHT - 1, Some(40.0)),
            hour(MIDNIGHT, Some(10.0)),
            hour(MIDNIGHT + SECONDS_PER_DAY - 1, Some(20.0)),
            hour(MIDNIGHT + SECONDS_PER_DAY, Some(-30.0)),
        ]);
        let context = ctx(UnitSystem::Metric);

        assert_eq!(
            (TODAY_HIGH_TEMPERATURE.compute)(Some(&snapshot), &context),
            Some(SensorValue::Integer(20))
        );
        assert_eq!(
            (TODAY_LOW_TEMPERATURE.compute)(Some(&snapshot), &context),
            Some(SensorValue::Integer(10))
        );
    }

    #[test]
    fn high_low_absent_when_no_point_in_window() {
        let snapshot = hourly_snapshot(vec![hour(MIDNIGHT - 3600, Some(12.0))]);
        let context = ctx(UnitSystem::Metric);
        assert_eq!((TODAY_HIGH_TEMPERATURE.compute)(Some(&snapshot), &context), None);
        assert_eq!((TODAY_LOW_TEMPERATURE.compute)(Some(&snapshot), &context), None);

        let empty = hourly_snapshot(vec![]);
        assert_eq!((TODAY_HIGH_TEMPERATURE.compute)(Some(&empty), &context), None);
    }

    #[test]
    fn high_low_skip_points_without_temperature() {
        let snapshot = hourly_snapshot(vec![hour(MIDNIGHT + 60, None), hour(MIDNIGHT + 120, Some(-2.5))]);
        let context = ctx(UnitSystem::Metric);
        assert_eq!(
            (TODAY_LOW_TEMPERATURE.compute)(Some(&snapshot), &context),
            Some(SensorValue::Integer(-2))
        );
    }

    #[test]
    fn minutely_forecast_with_empty_list() {
        let snapshot = ForecastSnapshot::new(Utc::now()).with_minutely(vec![]);
        let context = ctx(UnitSystem::Metric);

        let value = (MINUTELY_FORECAST.compute)(Some(&snapshot), &context);
        assert_eq!(value, Some(SensorValue::Timestamp(context.now)));

        let attributes = (MINUTELY_FORECAST.attributes)(Some(&snapshot), &context).expect("attributes");
        assert_eq!(attributes["data"], json!([]));
        assert_eq!(attributes["location_name"], json!("Portland"));
    }

    #[test]
    fn minutely_forecast_without_snapshot() {
        let context = ctx(UnitSystem::Metric);
        assert_eq!((MINUTELY_FORECAST.compute)(None, &context), None);
        let attributes = (MINUTELY_FORECAST.attributes)(None, &context).expect("attributes");
        assert_eq!(attributes["data"], json!([]));
        assert_eq!(attributes["location_name"], json!("Portland"));
    }

    #[test]
    fn minutely_points_are_rounded() {
        let snapshot = ForecastSnapshot::new(Utc::now()).with_minutely(vec![MinutePoint {
            time: MIDNIGHT,
            precip_intensity: 0.123_456,
            precip_probability: f64::NAN,
            precip_intensity_error: 0.5,
            precip_type: PrecipType::Snow,
        }]);
        let attributes =
            (MINUTELY_FORECAST.attributes)(Some(&snapshot), &ctx(UnitSystem::Metric)).expect("attributes");
        assert_eq!(
            attributes["data"][0],
            json!({
                "time": MIDNIGHT,
                "precipIntensity": 0.1235,
                "precipProbability": 0.0,
                "precipIntensityError": 0.5,
                "precipType": "snow",
            })
        );
    }

    #[test]
    fn hourly_forecast_takes_first_24_points() {
        let points = (0..30)
            .map(|i| HourPoint {
                time: MIDNIGHT + i * 3600,
                icon: "rain".into(),
                summary: "Rain".into(),
                temperature: Some(9.5),
                precip_intensity: 0.25,
                precip_probability: 0.9,
            })
            .collect();
        let snapshot = hourly_snapshot(points);
        let attributes =
            (HOURLY_FORECAST.attributes)(Some(&snapshot), &ctx(UnitSystem::Metric)).expect("attributes");

        let data = attributes["data"].as_array().expect("array");
        assert_eq!(data.len(), 24);
        assert_eq!(data[0]["temperature"], json!(10));
        assert_eq!(data[0]["icon"], json!("rain"));
        assert_eq!(data[23]["time"], json!(MIDNIGHT + 23 * 3600));
    }

    #[test]
    fn hourly_forecast_shows_missing_temperature_as_zero() {
        let snapshot = hourly_snapshot(vec![hour(MIDNIGHT, None)]);
        let attributes =
            (HOURLY_FORECAST.attributes)(Some(&snapshot), &ctx(UnitSystem::Metric)).expect("attributes");
        assert_eq!(attributes["data"][0]["temperature"], json!(0));
        assert_eq!(attributes["data"][0]["summary"], json!(""));
    }

    #[test]
    fn hourly_forecast_without_snapshot() {
        let attributes = (HOURLY_FORECAST.attributes)(None, &ctx(UnitSystem::Metric)).expect("attributes");
        assert_eq!(Value::Object(attributes), json!({ "data": [] }));
    }

    #[test]
    fn descriptor_metadata() {
        assert_eq!(CURRENT_TEMPERATURE.device_class(), Some("temperature"));
        assert_eq!(CURRENT_WIND_SPEED.device_class(), Some("wind_speed"));
        assert_eq!(CURRENT_WIND_SPEED.unit(UnitSystem::Imperial), Some("mph"));
        assert_eq!(TODAY_LOW_TEMPERATURE.unit(UnitSystem::Metric), Some("°C"));
        assert_eq!(MINUTELY_FORECAST.device_class(), None);
        assert_eq!(MINUTELY_FORECAST.state_class(), None);
        assert_eq!(CURRENT_TEMPERATURE.state_class(), Some("measurement"));
    }

    #[test]
    fn descriptor_keys_are_unique() {
        let mut keys: Vec<_> = SENSOR_DESCRIPTORS.iter().map(|d| d.key).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), SENSOR_DESCRIPTORS.len());
    }

    fn any_f64() -> impl Strategy<Value = f64> {
        prop_oneof![
            any::<f64>(),
            Just(f64::NAN),
            Just(f64::INFINITY),
            Just(f64::NEG_INFINITY),
            -100.0..100.0f64,
        ]
    }

    proptest! {
        #[test]
        fn presented_numbers_are_finite(
            temperature in proptest::option::of(any_f64()),
            wind_speed in proptest::option::of(any_f64()),
            hours in proptest::collection::vec((0..SECONDS_PER_DAY, proptest::option::of(any_f64())), 0..30),
            imperial in any::<bool>(),
        ) {
            let snapshot = ForecastSnapshot::new(Utc::now())
                .with_current(CurrentConditions { temperature, wind_speed })
                .with_hourly(hours.into_iter().map(|(offset, t)| hour(MIDNIGHT + offset, t)).collect());
            let unit_system = if imperial { UnitSystem::Imperial } else { UnitSystem::Metric };
            let context = ctx(unit_system);

            for descriptor in &SENSOR_DESCRIPTORS {
                if let Some(value) = (descriptor.compute)(Some(&snapshot), &context) {
                    if let Some(n) = value.as_f64() {
                        prop_assert!(n.is_finite(), "{} produced {}", descriptor.key, n);
                    }
                }
            }

            let attributes = (HOURLY_FORECAST.attributes)(Some(&snapshot), &context)
                .expect("attributes");
            let rendered = serde_json::to_string(&attributes).expect("serialize");
            prop_assert!(!rendered.contains("null"));
        }
    }
}
