//! Prompt construction for insights and captions.

use serde::Serialize;
use serde_json::json;

use chartwell_core::{dataset::Dataset, selection::ChartSelection};

use super::client::{ChatMessage, CompletionRequest};

/// Bounds and language of an insights prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptOptions {
    sample_rows: usize,
    preview_rows: usize,
    language: String,
}

impl Default for PromptOptions {
    fn default() -> Self {
        Self::new(100, 5, "English")
    }
}

impl PromptOptions {
    /// Creates prompt options.
    ///
    /// # Arguments
    ///
    /// * `sample_rows` - Maximum number of rows included in the request
    /// * `preview_rows` - Number of sampled rows written out in the prompt text
    /// * `language` - Language the model should answer in
    pub fn new(sample_rows: usize, preview_rows: usize, language: impl Into<String>) -> Self {
        Self {
            sample_rows,
            preview_rows,
            language: language.into(),
        }
    }

    pub fn sample_rows(&self) -> usize {
        self.sample_rows
    }

    pub fn preview_rows(&self) -> usize {
        self.preview_rows
    }

    pub fn language(&self) -> &str {
        &self.language
    }
}

/// The insights request as it travels over the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightsRequest {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    chart_type: String,
    selected_columns: Vec<usize>,
}

impl InsightsRequest {
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// The sampled rows; never more than [`PromptOptions::sample_rows`].
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn chart_type(&self) -> &str {
        &self.chart_type
    }

    pub fn selected_columns(&self) -> &[usize] {
        &self.selected_columns
    }
}

/// Everything needed to ask a model for insights about one dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptPayload {
    request: InsightsRequest,
    total_rows: usize,
    system_prompt: String,
    user_prompt: String,
}

impl PromptPayload {
    pub fn request(&self) -> &InsightsRequest {
        &self.request
    }

    /// Row count of the full dataset, not of the sample.
    pub fn total_rows(&self) -> usize {
        self.total_rows
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn user_prompt(&self) -> &str {
        &self.user_prompt
    }

    /// Returns the completion request, constrained to the insights schema.
    pub fn completion(&self) -> CompletionRequest {
        CompletionRequest::new(vec![
            ChatMessage::system(&self.system_prompt),
            ChatMessage::user(&self.user_prompt),
        ])
        .with_json_schema("data_insights", insights_schema())
    }
}

/// JSON schema of the three-field insights reply.
fn insights_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "summary": {
                "type": "string",
                "description": "A three to four sentence summary of the data",
            },
            "insights": {
                "type": "array",
                "items": { "type": "string" },
                "description": "Key insights from the data",
            },
            "writingTips": {
                "type": "string",
                "description": "Advice for writing about this data",
            },
        },
        "required": ["summary", "insights", "writingTips"],
        "additionalProperties": false,
    })
}

/// Builds the insights prompt for `dataset` under `selection`.
///
/// At most `options.sample_rows()` rows are copied into the request. The
/// prompt text names the headers, the total row count of the full dataset,
/// the chart kind, and the plotted columns, followed by the first
/// `options.preview_rows()` sampled rows as `header: value` pairs.
///
/// # Examples
///
/// ```
/// # use chartwell::insights::{build_prompt, PromptOptions};
/// # use chartwell::selection::{ChartKind, ChartSelection};
/// # use chartwell_parser::{parse, ParseOptions};
/// let text: String = std::iter::once("n,v".to_string())
///     .chain((0..500).map(|i| format!("{i},{i}")))
///     .collect::<Vec<_>>()
///     .join("\n");
/// let dataset = parse(&text, &ParseOptions::default());
/// let selection = ChartSelection::for_dataset(&dataset, ChartKind::Line);
///
/// let payload = build_prompt(&dataset, &selection, &PromptOptions::default());
/// assert_eq!(payload.request().rows().len(), 100);
/// assert_eq!(payload.total_rows(), 500);
/// ```
pub fn build_prompt(
    dataset: &Dataset,
    selection: &ChartSelection,
    options: &PromptOptions,
) -> PromptPayload {
    let rows: Vec<Vec<String>> = dataset
        .rows()
        .iter()
        .take(options.sample_rows)
        .map(|row| row.iter().map(|cell| cell.raw().to_string()).collect())
        .collect();

    let selected_columns = selection.plotted_columns();
    let selected_names: Vec<String> = selected_columns
        .iter()
        .map(|&column| dataset.column_name(column))
        .collect();

    let mut user_prompt = format!(
        "Please analyze this dataset and provide insights.\n\n\
         Dataset summary:\n\
         - Headers: {}\n\
         - Total rows: {}\n\
         - Chart type: {}\n\
         - Selected columns: {}\n",
        dataset.headers().join(", "),
        dataset.row_count(),
        selection.kind(),
        selected_names.join(", "),
    );

    let preview = rows.len().min(options.preview_rows);
    if preview > 0 {
        user_prompt.push_str(&format!("\nSample data (first {preview} rows):\n"));
        for row in rows.iter().take(preview) {
            let pairs: Vec<String> = dataset
                .headers()
                .iter()
                .enumerate()
                .map(|(column, header)| {
                    let value = row.get(column).map_or("", String::as_str);
                    format!("{header}: {value}")
                })
                .collect();
            user_prompt.push_str(&pairs.join(", "));
            user_prompt.push('\n');
        }
    }

    let system_prompt = format!(
        "You are a data analysis expert. Analyze the provided dataset and answer in {}. \
         Return a JSON object with the fields 'summary', 'insights' and 'writingTips'.",
        options.language
    );

    PromptPayload {
        request: InsightsRequest {
            headers: dataset.headers().to_vec(),
            rows,
            chart_type: selection.kind().to_string(),
            selected_columns,
        },
        total_rows: dataset.row_count(),
        system_prompt,
        user_prompt,
    }
}

/// A request for a figure caption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionRequest {
    chart_type: String,
    title: String,
    description: String,
}

impl CaptionRequest {
    pub fn new(
        chart_type: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            chart_type: chart_type.into(),
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn chart_type(&self) -> &str {
        &self.chart_type
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Builds the free-text completion request for a figure caption.
pub fn build_caption_prompt(request: &CaptionRequest, language: &str) -> CompletionRequest {
    CompletionRequest::new(vec![
        ChatMessage::system(format!(
            "You are a professional technical writer. Write a clear, concise figure caption \
             for an academic or business report, in {language}."
        )),
        ChatMessage::user(format!(
            "Write a figure caption for a {} chart.\nTitle: {}\nDescription: {}",
            request.chart_type, request.title, request.description
        )),
    ])
}


#[cfg(test)]
mod proptest_tests {
    use chartwell_core::{dataset::Cell, selection::ChartKind};
    use proptest::prelude::*;

    use super::*;

    // ===================
    // Strategies
    // ===================

    fn dataset_strategy() -> impl Strategy<Value = Dataset> {
        (1usize..4, 0usize..300).prop_map(|(columns, rows)| {
            let headers = (0..columns).map(|i| format!("c{i}")).collect();
            let rows = (0..rows)
                .map(|r| (0..columns).map(|c| Cell::new(format!("{}", r * c))).collect())
                .collect();
            Dataset::new(headers, rows)
        })
    }

    // ===================
    // Property Test Functions
    // ===================

    fn check_sample_bound(dataset: &Dataset, sample_rows: usize) -> Result<(), TestCaseError> {
        let selection = ChartSelection::for_dataset(dataset, ChartKind::Bar);
        let options = PromptOptions::new(sample_rows, 5, "English");

        let payload = build_prompt(dataset, &selection, &options);

        prop_assert!(payload.request().rows().len() <= sample_rows);
        prop_assert_eq!(
            payload.request().rows().len(),
            dataset.row_count().min(sample_rows)
        );
        prop_assert_eq!(payload.total_rows(), dataset.row_count());
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn sample_bound(dataset in dataset_strategy(), sample_rows in 0usize..150) {
            check_sample_bound(&dataset, sample_rows)?;
        }
    }
}
