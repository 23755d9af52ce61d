//! Integration tests for the Workbench API
//!
//! These tests drive the public API from text to rendered output.

use chartwell::{
    ChartwellError, ParseOptions, Workbench,
    config::{AppConfig, InsightsConfig, StyleConfig},
    insights::{CompletionRequest, InsightsError, LanguageModel},
    selection::{ChartKind, ChartSelection},
};

const SALES: &str = "month,north,south\nJan,10,7\nFeb,20,9\nMar,15,12";

struct CannedModel(&'static str);

impl LanguageModel for CannedModel {
    fn complete(&self, _request: &CompletionRequest) -> Result<String, InsightsError> {
        Ok(self.0.to_string())
    }
}

#[test]
fn test_render_every_chart_kind() {
    let workbench = Workbench::default();
    let dataset = workbench.parse(SALES, &ParseOptions::default());

    for kind in ChartKind::ALL {
        let selection = ChartSelection::for_dataset(&dataset, kind).with_series([1, 2]);
        let chart = workbench
            .build(&dataset, &selection)
            .unwrap_or_else(|err| panic!("Failed to build {kind}: {err}"));
        let svg = workbench
            .render_svg(&chart)
            .unwrap_or_else(|err| panic!("Failed to render {kind}: {err}"));

        assert!(svg.contains("<svg"), "Output should contain SVG tag");
        assert!(svg.contains("</svg>"), "Output should be complete SVG");
    }
}

#[test]
fn test_render_json() {
    let workbench = Workbench::default();
    let dataset = workbench.parse(SALES, &ParseOptions::default());
    let selection = ChartSelection::for_dataset(&dataset, ChartKind::Bar);

    let chart = workbench.build(&dataset, &selection).expect("Failed to build");
    let json = workbench.render_json(&chart, true).expect("Failed to serialize");

    assert!(json.contains("\"Jan\""));
    assert!(json.contains("\"north\""));
}

#[test]
fn test_render_png() {
    let style = StyleConfig::default().with_size(200.0, 120.0);
    let workbench = Workbench::new(AppConfig::new(style, InsightsConfig::default()));
    let dataset = workbench.parse(SALES, &ParseOptions::default());
    let selection = ChartSelection::for_dataset(&dataset, ChartKind::Line);

    let chart = workbench.build(&dataset, &selection).expect("Failed to build");
    let png = workbench.render_png(&chart, 1.5).expect("Failed to rasterize");

    assert!(png.starts_with(&[0x89, b'P', b'N', b'G']));
    assert_eq!(&png[16..24], &[0, 0, 1, 44, 0, 0, 0, 180]);
    assert!(workbench.render_png(&chart, 0.0).is_err());
}

#[test]
fn test_empty_dataset_has_nothing_to_render() {
    let workbench = Workbench::default();
    let dataset = workbench.parse("", &ParseOptions::default());

    let result = workbench.build(&dataset, &ChartSelection::default());
    assert!(matches!(result, Err(ChartwellError::NothingToRender(_))));
}

#[test]
fn test_out_of_range_selection_is_rejected() {
    let workbench = Workbench::default();
    let dataset = workbench.parse(SALES, &ParseOptions::default());
    let selection = ChartSelection::default().with_label_column(7);

    let result = workbench.build(&dataset, &selection);
    assert!(matches!(result, Err(ChartwellError::Selection(_))));
}

#[test]
fn test_unplotted_out_of_range_column_is_rejected() {
    let workbench = Workbench::default();
    let dataset = workbench.parse(SALES, &ParseOptions::default());
    let selection = ChartSelection::for_dataset(&dataset, ChartKind::Bar)
        .with_series([1])
        .with_value_column(42);

    let result = workbench.build(&dataset, &selection);
    assert!(matches!(result, Err(ChartwellError::Selection(_))));
}

#[test]
fn test_invalid_configured_color_is_reported() {
    let style = StyleConfig::default().with_background_color("not-a-color");
    let workbench = Workbench::new(AppConfig::new(style, InsightsConfig::default()));
    let dataset = workbench.parse(SALES, &ParseOptions::default());

    let result = workbench.build(&dataset, &ChartSelection::for_dataset(&dataset, ChartKind::Line));
    assert!(matches!(result, Err(ChartwellError::Config(_))));
    assert!(workbench.session().is_err());
}

#[test]
fn test_invalid_canvas_is_an_export_error() {
    let style = StyleConfig::default().with_size(0.0, 100.0);
    let workbench = Workbench::new(AppConfig::new(style, InsightsConfig::default()));
    let dataset = workbench.parse(SALES, &ParseOptions::default());
    let chart = workbench
        .build(&dataset, &ChartSelection::for_dataset(&dataset, ChartKind::Line))
        .expect("Failed to build");

    assert!(matches!(
        workbench.render_svg(&chart),
        Err(ChartwellError::Export(_))
    ));
}

#[test]
fn test_missing_source_is_a_read_error() {
    let workbench = Workbench::default();

    let result = workbench.read_source("does/not/exist.csv");
    match result {
        Err(ChartwellError::Read { path, .. }) => assert_eq!(path, "does/not/exist.csv"),
        other => panic!("Expected read error, got {other:?}"),
    }
}

#[test]
fn test_failed_read_keeps_session_dataset() {
    let workbench = Workbench::default();
    let mut session = workbench.session().expect("Failed to start session");
    session.load(SALES, ParseOptions::default());

    if let Ok(text) = workbench.read_source("does/not/exist.csv") {
        session.load(&text, ParseOptions::default());
    }

    assert_eq!(session.dataset().row_count(), 3);
    assert_eq!(session.dataset_version(), 1);
}

#[test]
fn test_insights_through_workbench() {
    let workbench = Workbench::default();
    let dataset = workbench.parse(SALES, &ParseOptions::default());
    let payload = workbench.prompt(&dataset, &ChartSelection::for_dataset(&dataset, ChartKind::Line));
    let model = CannedModel(
        r#"{"summary":"Sales grew.","insights":["North leads"],"writingTips":"Mention Feb."}"#,
    );

    let result = workbench.insights(&model, &payload).expect("Failed to get insights");

    assert_eq!(result.summary(), "Sales grew.");
    assert_eq!(result.key_insights(), ["North leads"]);
}

#[test]
fn test_malformed_insights_reply() {
    let workbench = Workbench::default();
    let dataset = workbench.parse(SALES, &ParseOptions::default());
    let payload = workbench.prompt(&dataset, &ChartSelection::default());

    let result = workbench.insights(&CannedModel("Sure! Here are insights."), &payload);
    assert!(matches!(
        result,
        Err(ChartwellError::Insights(InsightsError::Decode(_)))
    ));
}

#[test]
fn test_builder_reusability() {
    let workbench = Workbench::default();

    let first = workbench.parse("a,b\nx,1", &ParseOptions::default());
    let second = workbench.parse("c;d\ny;2", &ParseOptions::default().with_delimiter(chartwell::Delimiter::Auto));

    for dataset in [first, second] {
        let chart = workbench
            .build(&dataset, &ChartSelection::for_dataset(&dataset, ChartKind::Pie))
            .expect("Failed to build");
        assert!(workbench.render_svg(&chart).is_ok());
    }
}
