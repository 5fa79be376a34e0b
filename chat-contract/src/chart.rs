use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Chart kinds the charting tool may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartKind {
    Bar,
    MultiBar,
    Line,
    Pie,
    Area,
    StackedArea,
}

impl ChartKind {
    pub const ALL: [&'static str; 6] = ["bar", "multiBar", "line", "pie", "area", "stackedArea"];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    pub percentage: f64,
    pub direction: TrendDirection,
}

/// Display configuration of a chart.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfig {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend: Option<Trend>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_axis_key: Option<String>,
}

/// Per-series display settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SeriesConfig {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stacked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Chart specification returned to the client.
///
/// `series` keeps the key order of the model's `chartConfig` object; the
/// first key has meaning for pie charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSpec {
    pub chart_type: ChartKind,
    #[serde(default)]
    pub config: ChartConfig,
    pub data: Vec<Map<String, Value>>,
    #[serde(
        rename = "chartConfig",
        serialize_with = "ser_series",
        deserialize_with = "de_series"
    )]
    pub series: Vec<(String, SeriesConfig)>,
}

impl ChartSpec {
    pub fn series_config(&self, key: &str) -> Option<&SeriesConfig> {
        self.series.iter().find(|(k, _)| k == key).map(|(_, c)| c)
    }
}

fn ser_series<S: Serializer>(
    series: &[(String, SeriesConfig)],
    s: S,
) -> Result<S::Ok, S::Error> {
    let mut map = Map::with_capacity(series.len());
    for (k, v) in series {
        let v = serde_json::to_value(v).map_err(serde::ser::Error::custom)?;
        map.insert(k.clone(), v);
    }
    map.serialize(s)
}

fn de_series<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<(String, SeriesConfig)>, D::Error> {
    let map = Map::<String, Value>::deserialize(d)?;
    map.into_iter()
        .map(|(k, v)| {
            let cfg = serde_json::from_value::<SeriesConfig>(v).map_err(D::Error::custom)?;
            Ok((k, cfg))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn series_order_survives_round_trip() {
        let spec: ChartSpec = serde_json::from_value(json!({
            "chartType": "bar",
            "config": {"title": "Revenue", "description": "FY24"},
            "data": [{"month": "Jan", "zeta": 1, "alpha": 2}],
            "chartConfig": {
                "zeta": {"label": "Zeta"},
                "alpha": {"label": "Alpha", "stacked": true}
            }
        }))
        .unwrap();

        let keys: Vec<_> = spec.series.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["zeta", "alpha"]);

        let out = serde_json::to_string(&spec).unwrap();
        assert!(out.find("\"zeta\"").unwrap() < out.find("\"alpha\"").unwrap());
        assert_eq!(
            spec.series_config("alpha").and_then(|c| c.stacked),
            Some(true)
        );
    }

    #[test]
    fn series_without_label_is_rejected() {
        let res = serde_json::from_value::<ChartSpec>(json!({
            "chartType": "bar",
            "data": [],
            "chartConfig": {"revenue": {"stacked": true}}
        }));
        assert!(res.is_err());
    }
}
