//! Forecast response models
//!
//! The payload is parsed leniently: every section and every record field is
//! optional, `null` reads as missing, numeric strings are accepted, and
//! entries of the wrong shape inside a `data` list are skipped. Filling in
//! defaults is left to the caller, which knows what each feed needs.

use serde::{Deserialize, Deserializer, Serialize, de, de::DeserializeOwned};
use serde_json::{Map, Value};

/// Top-level forecast response
///
/// Only a JSON object is accepted at the top level; any other body is an
/// error rather than an empty response.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ApiResponse {
    /// Current conditions
    pub currently: Option<CurrentlyRecord>,
    /// Minute-level block
    pub minutely: Option<DataBlock<MinuteRecord>>,
    /// Hour-level block
    pub hourly: Option<DataBlock<HourRecord>>,
}

impl ApiResponse {
    fn from_sections(body: &mut Map<String, Value>) -> Result<Self, serde_json::Error> {
        let mut take = |key: &str| body.remove(key).unwrap_or(Value::Null);
        Ok(Self {
            currently: lenient_object(take("currently"))?,
            minutely: lenient_object(take("minutely"))?,
            hourly: lenient_object(take("hourly"))?,
        })
    }
}

impl<'de> Deserialize<'de> for ApiResponse {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut body = Map::<String, Value>::deserialize(deserializer)?;
        Self::from_sections(&mut body).map_err(de::Error::custom)
    }
}

/// A `{data: [...]}` block; block-level summary and icon are not used
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub struct DataBlock<T> {
    /// Records, skipping entries that are not objects
    #[serde(default = "Vec::new", deserialize_with = "lenient_records")]
    pub data: Vec<T>,
}

impl<T> Default for DataBlock<T> {
    fn default() -> Self {
        Self { data: Vec::new() }
    }
}

/// One minute of the `minutely` block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinuteRecord {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub time: Option<i64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub precip_intensity: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub precip_probability: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub precip_intensity_error: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub precip_type: Option<String>,
}

/// One hour of the `hourly` block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourRecord {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub time: Option<i64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub icon: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub temperature: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub precip_intensity: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub precip_probability: Option<f64>,
}

/// The `currently` record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentlyRecord {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub temperature: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub wind_speed: Option<f64>,
}

fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .filter(|v: &f64| v.is_finite())
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_as_f64(&value))
}

#[allow(clippy::cast_possible_truncation)]
fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if let Some(int) = value.as_i64() {
        return Ok(Some(int));
    }
    Ok(value_as_f64(&value).map(|v| v.trunc() as i64))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

fn lenient_object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_object() {
        Ok(serde_json::from_value(value).ok())
    } else {
        Ok(None)
    }
}

fn lenient_records<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Array(items) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}
