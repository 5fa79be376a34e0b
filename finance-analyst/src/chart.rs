//! Post-processing of the charting tool input into a client `ChartSpec`.

use chat_contract::{ChartConfig, ChartKind, ChartSpec, SeriesConfig};
use serde_json::{Map, Value};

use crate::error::FinanceError;

/// Default segment key for pie rows when `config.xAxisKey` is absent.
pub const SEGMENT_KEY: &str = "segment";
pub const VALUE_KEY: &str = "value";

/// Colour token of the `n`-th series (1-based).
pub fn color_token(n: usize) -> String {
    format!("hsl(var(--chart-{n}))")
}

/// Loose truthiness: `null`, `false`, `0`, `NaN` and `""` are falsy.
fn truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Value of `row[k0] || row[k1] || ...`: the first truthy operand, else the
/// last operand as is. `None` stands for an absent key (or no key at all).
fn or_chain(row: &Map<String, Value>, keys: &[Option<&str>]) -> Option<Value> {
    let operand = |k: &Option<&str>| k.and_then(|k| row.get(k));
    keys.iter()
        .map(operand)
        .find(|v| v.is_some_and(truthy))
        .or_else(|| keys.last().map(operand))
        .flatten()
        .cloned()
}

/// Validate the tool input and turn it into a chart spec.
///
/// Pie rows are remapped to `{segment, value}`: the value comes from the
/// first `chartConfig` key (falling back to `value`), the label from
/// `config.xAxisKey` or `segment`, then `category`, then `name`. Every series
/// then gets a sequential colour token.
///
/// # Errors
/// [`FinanceError::InvalidChartData`] when `chartType`, `data` or
/// `chartConfig` is missing or malformed.
pub fn process_chart(input: &Value) -> Result<ChartSpec, FinanceError> {
    let obj = input
        .as_object()
        .ok_or_else(|| invalid("tool input is not an object"))?;

    let chart_type: ChartKind = match obj.get("chartType") {
        Some(v @ Value::String(_)) => serde_json::from_value(v.clone())
            .map_err(|_| invalid(format!("unknown chartType {v}")))?,
        _ => return Err(invalid("missing chartType")),
    };

    let rows = obj
        .get("data")
        .and_then(Value::as_array)
        .ok_or_else(|| invalid("data is missing or not an array"))?;
    let mut data = rows
        .iter()
        .map(|r| r.as_object().cloned().ok_or_else(|| invalid("data row is not an object")))
        .collect::<Result<Vec<_>, _>>()?;

    let series_map = obj
        .get("chartConfig")
        .and_then(Value::as_object)
        .ok_or_else(|| invalid("chartConfig is missing or not an object"))?;
    let mut series = series_map
        .iter()
        .map(|(k, v)| {
            serde_json::from_value::<SeriesConfig>(v.clone())
                .map(|c| (k.clone(), c))
                .map_err(|e| invalid(format!("chartConfig.{k}: {e}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut config: ChartConfig = match obj.get("config") {
        Some(c) => serde_json::from_value(c.clone()).map_err(|e| invalid(format!("config: {e}")))?,
        None => ChartConfig::default(),
    };

    if chart_type == ChartKind::Pie {
        let value_key = series.first().map(|(k, _)| k.as_str());
        let segment_key = config.x_axis_key.as_deref().unwrap_or(SEGMENT_KEY);
        data = data
            .iter()
            .map(|row| {
                let mut out = Map::new();
                if let Some(seg) = or_chain(
                    row,
                    &[Some(segment_key), Some(SEGMENT_KEY), Some("category"), Some("name")],
                ) {
                    out.insert(SEGMENT_KEY.into(), seg);
                }
                if let Some(val) = or_chain(row, &[value_key, Some(VALUE_KEY)]) {
                    out.insert(VALUE_KEY.into(), val);
                }
                out
            })
            .collect();
        config.x_axis_key = Some(SEGMENT_KEY.into());
    }

    for (i, (_, cfg)) in series.iter_mut().enumerate() {
        cfg.color = Some(color_token(i + 1));
    }

    Ok(ChartSpec {
        chart_type,
        config,
        data,
        series,
    })
}

fn invalid(msg: impl Into<String>) -> FinanceError {
    FinanceError::InvalidChartData(msg.into())
}
