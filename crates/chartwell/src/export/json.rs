//! JSON export of the chart specification.

use log::debug;

use chartwell_core::chart::ChartSpec;

use super::{Error, Exporter};

/// Serializes a [`ChartSpec`] as JSON for external charting engines.
#[derive(Debug, Default, Clone, Copy)]
pub struct Json {
    pretty: bool,
}

impl Json {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables indented output.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl Exporter for Json {
    fn export_chart(&mut self, spec: &ChartSpec) -> Result<String, Error> {
        let output = if self.pretty {
            serde_json::to_string_pretty(spec)
        } else {
            serde_json::to_string(spec)
        }
        .map_err(Error::Serialize)?;

        debug!(bytes = output.len(), pretty = self.pretty; "Chart specification serialized");
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use chartwell_core::{
        chart::ChartStyle,
        selection::{ChartKind, ChartSelection},
    };
    use chartwell_parser::{ParseOptions, parse};
    use serde_json::Value;

    use super::*;
    use crate::chart::build;

    fn export(text: &str, kind: ChartKind) -> Value {
        let dataset = parse(text, &ParseOptions::default());
        let selection = ChartSelection::for_dataset(&dataset, kind);
        let spec = build(&dataset, &selection, &ChartStyle::default()).unwrap();
        let output = Json::new().export_chart(&spec).unwrap();
        serde_json::from_str(&output).unwrap()
    }

    #[test]
    fn test_line_chart_shape() {
        let value = export("a,b\n1,2\n3,x", ChartKind::Line);

        assert_eq!(value["kind"], "line");
        assert_eq!(value["labels"], serde_json::json!(["1", "3"]));
        assert_eq!(value["series"][0]["name"], "b");
        assert_eq!(value["series"][0]["data"], serde_json::json!([2.0, null]));
        assert_eq!(value["series"][0]["style"]["pointRadius"], 4.0);
        assert!(value["axes"]["tickFontSize"].is_number());
    }

    #[test]
    fn test_pie_chart_has_per_point_colors_and_no_axes() {
        let value = export("a,b\nx,2\ny,4", ChartKind::Pie);

        assert!(value["axes"].is_null());
        assert_eq!(value["series"][0]["colors"].as_array().map(Vec::len), Some(2));
        assert_eq!(value["series"][0]["data"], serde_json::json!([2.0, 4.0]));
    }

    #[test]
    fn test_pretty_output_is_indented() {
        let dataset = parse("a,b\n1,2", &ParseOptions::default());
        let selection = ChartSelection::for_dataset(&dataset, ChartKind::Bar);
        let spec = build(&dataset, &selection, &ChartStyle::default()).unwrap();

        let output = Json::new().with_pretty(true).export_chart(&spec).unwrap();

        assert!(output.contains("\n  \"kind\": \"bar\""));
    }
}
