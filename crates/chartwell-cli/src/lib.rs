//! CLI logic for the Chartwell charting tool.
//!
//! This module contains the core CLI logic: each subcommand reads a dataset,
//! builds the requested chart through [`Workbench`], and writes the result.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, CaptionArgs, Command, DatasetArgs, Format, InsightsArgs, RenderArgs};

use std::fs;

use log::{info, warn};

use chartwell::{
    ChartwellError, Workbench,
    chart::NothingToRender,
    dataset::Dataset,
    insights::{CaptionRequest, InsightsResult, build_caption_prompt},
    selection::ChartSelection,
};

/// Run the Chartwell CLI application
///
/// # Errors
///
/// Returns `ChartwellError` for:
/// - Configuration loading errors
/// - Dataset read errors
/// - Empty datasets and invalid column selections
/// - Export errors
/// - Insights transport and decode errors
pub fn run(args: &Args) -> Result<(), ChartwellError> {
    let app_config = config::load_config(args.config.as_ref())?;
    let workbench = Workbench::new(app_config);

    match &args.command {
        Command::Render(render) => run_render(&workbench, render),
        Command::Insights(insights) => run_insights(&workbench, insights),
        Command::Caption(caption) => run_caption(&workbench, caption),
    }
}

/// Reads and parses the dataset, then resolves the selection against it.
fn load_dataset(
    workbench: &Workbench,
    args: &DatasetArgs,
) -> Result<(Dataset, ChartSelection), ChartwellError> {
    let text = workbench.read_source(&args.input)?;
    let dataset = workbench.parse(&text, &args.parse_options());
    let selection = args.selection(&dataset);
    Ok((dataset, selection))
}

fn run_render(workbench: &Workbench, args: &RenderArgs) -> Result<(), ChartwellError> {
    info!(
        input_path = args.dataset.input,
        output_path = args.output;
        "Rendering chart"
    );

    let (dataset, selection) = load_dataset(workbench, &args.dataset)?;
    let chart = workbench.build(&dataset, &selection)?;
    let output = match args.format {
        Format::Svg => workbench.render_svg(&chart)?.into_bytes(),
        Format::Png => workbench.render_png(&chart, args.scale)?,
        Format::Json => workbench.render_json(&chart, true)?.into_bytes(),
    };

    fs::write(&args.output, output)?;

    info!(output_file = args.output; "Chart exported successfully");
    Ok(())
}

fn run_insights(workbench: &Workbench, args: &InsightsArgs) -> Result<(), ChartwellError> {
    info!(input_path = args.dataset.input; "Preparing insights");

    let (dataset, selection) = load_dataset(workbench, &args.dataset)?;
    if dataset.is_empty() {
        return Err(NothingToRender.into());
    }
    selection.validate_all(dataset.column_count())?;

    // The chart is written before the request, so a failed request still
    // leaves it on disk.
    if let Some(path) = &args.chart {
        let chart = workbench.build(&dataset, &selection)?;
        fs::write(path, workbench.render_svg(&chart)?)?;
        info!(output_file = path; "Chart exported successfully");
    }

    let payload = workbench.prompt(&dataset, &selection);
    if args.dry_run {
        println!("{}", to_pretty_json(&payload)?);
        return Ok(());
    }

    let model = workbench.language_model()?;
    let result = workbench.insights(&model, &payload)?;
    print!("{}", format_insights(&result));
    Ok(())
}

fn run_caption(workbench: &Workbench, args: &CaptionArgs) -> Result<(), ChartwellError> {
    let request = CaptionRequest::new(args.kind.as_str(), &args.title, &args.description);

    if args.dry_run {
        let prompt = build_caption_prompt(&request, workbench.config().insights().language());
        println!("{}", to_pretty_json(&prompt)?);
        return Ok(());
    }

    let model = workbench.language_model()?;
    let caption = workbench.caption(&model, &request)?;
    if caption.caption().is_empty() {
        warn!("Model returned an empty caption");
    }
    println!("{}", caption.caption());
    Ok(())
}

fn to_pretty_json(value: &impl serde::Serialize) -> Result<String, ChartwellError> {
    serde_json::to_string_pretty(value).map_err(|err| ChartwellError::Export(Box::new(err)))
}

/// Formats insights for the terminal.
fn format_insights(result: &InsightsResult) -> String {
    let mut out = format!("Summary\n  {}\n\nKey insights\n", result.summary());
    for insight in result.key_insights() {
        out.push_str(&format!("  - {insight}\n"));
    }
    out.push_str(&format!("\nWriting tips\n  {}\n", result.writing_tips()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_insights() {
        let result = InsightsResult::new(
            "Sales rose.",
            vec!["North leads".to_string(), "March dipped".to_string()],
            "Lead with the trend.",
        );

        let text = format_insights(&result);

        assert!(text.starts_with("Summary\n  Sales rose.\n"));
        assert!(text.contains("  - North leads\n  - March dipped\n"));
        assert!(text.ends_with("Writing tips\n  Lead with the trend.\n"));
    }

    #[test]
    fn test_format_insights_without_items() {
        let text = format_insights(&InsightsResult::new("s", vec![], "t"));
        assert!(text.contains("Key insights\n\nWriting tips"));
    }
}
