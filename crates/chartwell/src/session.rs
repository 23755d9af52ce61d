//! Application state for an interactive front end.
//!
//! A [`Session`] owns the loaded dataset, the user's chart selection and
//! style, and the state of the insights panel. Charts and prompts are built
//! from borrowed snapshots of that state and never mutate it.
//!
//! # Insights ordering
//!
//! Every insights request is stamped with a [`RequestToken`]. A reply is
//! applied only when its token is the latest one issued and the dataset has
//! not changed since; otherwise it is reported as [`Completion::Stale`] and
//! dropped, so a reply for a superseded dataset never replaces what is shown
//! for the current one.

use log::{debug, info};

use chartwell_core::{
    chart::{ChartSpec, ChartStyle},
    color::Color,
    dataset::Dataset,
    selection::{ChartKind, ChartSelection, SelectionError},
};
use chartwell_parser::ParseOptions;

use crate::{
    chart::{self, NothingToRender},
    insights::{
        InsightsError, InsightsResult, PromptOptions, PromptPayload, RequestToken, RequestTracker,
        build_prompt,
    },
};

/// What the insights panel currently shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum InsightsPanel {
    #[default]
    Hidden,
    /// A request is in flight.
    Pending(RequestToken),
    Ready(InsightsResult),
    Failed(InsightsError),
}

/// Outcome of handing a reply to [`Session::complete_insights`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// The reply belonged to a superseded request and was dropped.
    Stale,
}

/// Explicit application state.
#[derive(Debug, Default)]
pub struct Session {
    dataset: Dataset,
    parse_options: ParseOptions,
    selection: ChartSelection,
    style: ChartStyle,
    insights: InsightsPanel,
    tracker: RequestTracker,
    dataset_version: u64,
}

impl Session {
    /// Creates an empty session using `style`.
    pub fn new(style: ChartStyle) -> Self {
        Self {
            style,
            ..Self::default()
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn parse_options(&self) -> ParseOptions {
        self.parse_options
    }

    pub fn selection(&self) -> &ChartSelection {
        &self.selection
    }

    pub fn style(&self) -> &ChartStyle {
        &self.style
    }

    pub fn insights(&self) -> &InsightsPanel {
        &self.insights
    }

    /// Incremented every time the dataset is replaced.
    pub fn dataset_version(&self) -> u64 {
        self.dataset_version
    }

    /// Parses `text` and replaces the dataset wholesale.
    ///
    /// The selection is re-initialized for the new columns (the chart kind
    /// is kept), the insights panel is cleared, and any in-flight insights
    /// request becomes stale.
    pub fn load(&mut self, text: &str, options: ParseOptions) {
        let dataset = chartwell_parser::parse(text, &options);
        self.replace_dataset(dataset, options);
    }

    /// Re-parses `text` with the current parse options.
    pub fn reload(&mut self, text: &str) {
        self.load(text, self.parse_options);
    }

    /// Clears the dataset and restores the initial selection.
    pub fn reset(&mut self) {
        info!("Resetting session");
        self.replace_dataset(Dataset::empty(), ParseOptions::default());
        self.selection = ChartSelection::default();
    }

    fn replace_dataset(&mut self, dataset: Dataset, options: ParseOptions) {
        self.selection = ChartSelection::for_dataset(&dataset, self.selection.kind());
        self.dataset = dataset;
        self.parse_options = options;
        self.dataset_version += 1;
        self.tracker.invalidate();
        self.insights = InsightsPanel::Hidden;
        info!(
            version = self.dataset_version,
            rows = self.dataset.row_count(),
            columns = self.dataset.column_count();
            "Dataset replaced"
        );
    }

    /// Replaces the chart style. The selection is untouched.
    pub fn set_style(&mut self, style: ChartStyle) {
        self.style = style;
    }

    /// Switches the chart kind, keeping the column choices.
    ///
    /// Every selected column is checked against the dataset when it is
    /// chosen, so the selection stays valid for any kind.
    pub fn set_kind(&mut self, kind: ChartKind) {
        self.selection.set_kind(kind);
    }

    /// Sets the column supplying category labels.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError`] if `column` is not a column of the dataset.
    pub fn set_label_column(&mut self, column: usize) -> Result<(), SelectionError> {
        self.update_selection(|selection| selection.set_label_column(column))
    }

    /// Sets the column plotted by pie and doughnut charts, and by bar and
    /// line charts when no series is selected.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError`] if `column` is not a column of the dataset.
    pub fn set_value_column(&mut self, column: usize) -> Result<(), SelectionError> {
        self.update_selection(|selection| selection.set_value_column(column))
    }

    /// Adds `column` to the series if absent, removes it otherwise.
    ///
    /// Returns `true` if the column is selected afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError`] if `column` is not a column of the dataset.
    pub fn toggle_series(&mut self, column: usize) -> Result<bool, SelectionError> {
        let mut selected = false;
        self.update_selection(|selection| {
            if !selection.deselect_series(column) {
                selected = selection.select_series(column);
            }
        })?;
        Ok(selected)
    }

    /// Overrides the generated color of the series for `column`.
    pub fn set_series_color(&mut self, column: usize, color: Color) {
        self.selection.set_series_color(column, color);
    }

    /// Restores the generated color of the series for `column`.
    pub fn clear_series_color(&mut self, column: usize) {
        self.selection.clear_series_color(column);
    }

    /// Applies `change` to a copy of the selection and keeps it only if valid.
    fn update_selection(
        &mut self,
        change: impl FnOnce(&mut ChartSelection),
    ) -> Result<(), SelectionError> {
        let mut selection = self.selection.clone();
        change(&mut selection);
        selection.validate_all(self.dataset.column_count())?;
        self.selection = selection;
        Ok(())
    }

    /// Builds the chart for the current state.
    ///
    /// # Errors
    ///
    /// Returns [`NothingToRender`] when the dataset has no rows.
    pub fn chart(&self) -> Result<ChartSpec, NothingToRender> {
        chart::build(&self.dataset, &self.selection, &self.style)
    }

    /// Starts an insights request for the current state.
    ///
    /// The panel switches to [`InsightsPanel::Pending`] and any earlier
    /// request becomes stale. The caller sends the payload and hands the
    /// outcome back through [`Session::complete_insights`] with the token.
    ///
    /// # Errors
    ///
    /// Returns [`NothingToRender`] when the dataset has no rows.
    pub fn begin_insights(
        &mut self,
        options: &PromptOptions,
    ) -> Result<(RequestToken, PromptPayload), NothingToRender> {
        if self.dataset.is_empty() {
            return Err(NothingToRender);
        }
        let payload = build_prompt(&self.dataset, &self.selection, options);
        let token = self.tracker.issue(self.dataset_version);
        self.insights = InsightsPanel::Pending(token);
        Ok((token, payload))
    }

    /// Applies the outcome of the request identified by `token`, unless it
    /// has been superseded.
    pub fn complete_insights(
        &mut self,
        token: RequestToken,
        outcome: Result<InsightsResult, InsightsError>,
    ) -> Completion {
        if !self.tracker.is_current(token, self.dataset_version) {
            debug!(generation = token.generation(); "Dropping stale insights reply");
            return Completion::Stale;
        }
        self.insights = match outcome {
            Ok(result) => InsightsPanel::Ready(result),
            Err(err) => InsightsPanel::Failed(err),
        };
        Completion::Applied
    }

    /// Hides the insights panel and abandons any in-flight request.
    pub fn dismiss_insights(&mut self) {
        self.tracker.invalidate();
        self.insights = InsightsPanel::Hidden;
    }
}

#[cfg(test)]
mod tests {
    use chartwell_parser::Delimiter;

    use super::*;

    fn loaded(text: &str) -> Session {
        let mut session = Session::default();
        session.load(text, ParseOptions::default());
        session
    }

    fn result(summary: &str) -> InsightsResult {
        InsightsResult::new(summary, vec![], "")
    }

    #[test]
    fn test_empty_session_has_nothing_to_render() {
        let session = Session::default();
        assert_eq!(session.chart(), Err(NothingToRender));
    }

    #[test]
    fn test_load_initializes_selection() {
        let mut session = loaded("a,b,c\n1,2,3");
        session.set_kind(ChartKind::Bar);
        session.toggle_series(2).unwrap();

        session.load("x\n1", ParseOptions::default());

        assert_eq!(session.selection().kind(), ChartKind::Bar);
        assert_eq!(session.selection().label_column(), 0);
        assert_eq!(session.selection().value_column(), 0);
        assert!(session.selection().series_columns().is_empty());
    }

    #[test]
    fn test_reload_keeps_parse_options() {
        let mut session = Session::default();
        session.load("a;b\n1;2", ParseOptions::default().with_delimiter(Delimiter::Semicolon));
        assert_eq!(session.dataset().column_count(), 2);

        session.reload("c;d;e\n1;2;3");
        assert_eq!(session.dataset().column_count(), 3);
        assert_eq!(session.parse_options().delimiter(), Delimiter::Semicolon);
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut session = loaded("a,b\n1,2");
        session.set_kind(ChartKind::Pie);

        session.reset();

        assert!(session.dataset().is_empty());
        assert_eq!(session.selection(), &ChartSelection::default());
        assert_eq!(session.selection().kind(), ChartKind::Line);
    }

    #[test]
    fn test_invalid_selection_is_rejected_and_kept() {
        let mut session = loaded("a,b\n1,2");

        assert!(session.set_label_column(5).is_err());
        assert_eq!(session.selection().label_column(), 0);

        session.set_value_column(0).unwrap();
        assert_eq!(session.selection().value_column(), 0);
    }

    #[test]
    fn test_selection_stays_valid_across_kinds() {
        let mut session = loaded("a,b\n1,2");

        session.set_kind(ChartKind::Pie);
        assert!(session.toggle_series(99).is_err());
        session.set_kind(ChartKind::Bar);
        assert!(session.selection().series_columns().is_empty());
        assert!(session.selection().validate(2).is_ok());

        assert_eq!(session.toggle_series(1), Ok(true));
        assert!(session.set_value_column(42).is_err());
        assert_eq!(session.selection().value_column(), 1);

        session.set_kind(ChartKind::Pie);
        assert!(session.selection().validate(2).is_ok());
        assert_eq!(session.chart().unwrap().series().len(), 1);
    }

    #[test]
    fn test_toggle_series() {
        let mut session = loaded("a,b,c\n1,2,3");

        assert_eq!(session.toggle_series(2), Ok(true));
        assert_eq!(session.toggle_series(1), Ok(true));
        assert_eq!(session.toggle_series(2), Ok(false));
        assert_eq!(session.selection().effective_series_columns(), [1]);
        assert!(session.toggle_series(3).is_err());
    }

    #[test]
    fn test_series_color_flows_into_chart() {
        let mut session = loaded("a,b\n1,2");
        session.set_kind(ChartKind::Bar);
        let red = Color::new("red").unwrap();

        session.set_series_color(1, red);
        assert_eq!(session.chart().unwrap().series()[0].colors().at(0), red);

        session.clear_series_color(1);
        assert_eq!(
            session.chart().unwrap().series()[0].colors().at(0),
            Color::generated(1, 2)
        );
    }

    #[test]
    fn test_insights_round_trip() {
        let mut session = loaded("a,b\n1,2");

        let (token, payload) = session.begin_insights(&PromptOptions::default()).unwrap();
        assert_eq!(payload.request().rows().len(), 1);
        assert_eq!(session.insights(), &InsightsPanel::Pending(token));

        assert_eq!(session.complete_insights(token, Ok(result("done"))), Completion::Applied);
        assert_eq!(session.insights(), &InsightsPanel::Ready(result("done")));
    }

    #[test]
    fn test_failure_is_scoped_to_panel() {
        let mut session = loaded("a,b\n1,2");
        let (token, _) = session.begin_insights(&PromptOptions::default()).unwrap();

        let failure = InsightsError::Transport("timeout".to_string());
        session.complete_insights(token, Err(failure.clone()));

        assert_eq!(session.insights(), &InsightsPanel::Failed(failure));
        assert!(session.chart().is_ok());
    }

    #[test]
    fn test_reply_for_superseded_dataset_is_stale() {
        let mut session = loaded("a,b\n1,2");
        let (token, _) = session.begin_insights(&PromptOptions::default()).unwrap();

        session.load("c,d\n3,4", ParseOptions::default());

        assert_eq!(session.complete_insights(token, Ok(result("old"))), Completion::Stale);
        assert_eq!(session.insights(), &InsightsPanel::Hidden);
    }

    #[test]
    fn test_later_request_wins() {
        let mut session = loaded("a,b\n1,2");
        let (first, _) = session.begin_insights(&PromptOptions::default()).unwrap();
        let (second, _) = session.begin_insights(&PromptOptions::default()).unwrap();

        assert_eq!(session.complete_insights(second, Ok(result("new"))), Completion::Applied);
        assert_eq!(session.complete_insights(first, Ok(result("old"))), Completion::Stale);
        assert_eq!(session.insights(), &InsightsPanel::Ready(result("new")));
    }

    #[test]
    fn test_dismiss_abandons_pending_request() {
        let mut session = loaded("a,b\n1,2");
        let (token, _) = session.begin_insights(&PromptOptions::default()).unwrap();

        session.dismiss_insights();

        assert_eq!(session.complete_insights(token, Ok(result("late"))), Completion::Stale);
        assert_eq!(session.insights(), &InsightsPanel::Hidden);
    }

    #[test]
    fn test_insights_need_rows() {
        let mut session = loaded("a,b");
        assert_eq!(
            session.begin_insights(&PromptOptions::default()).map(|(token, _)| token),
            Err(NothingToRender)
        );
    }
}
