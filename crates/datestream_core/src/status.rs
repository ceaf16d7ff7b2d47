pub(crate) const EXTRACTING_TEXT: &str = "Extracting dates...";
pub(crate) const SEARCHING_TEXT: &str = "Searching...";
pub(crate) const EMPTY_INPUT_TEXT: &str = "No URLs to crawl were provided.";
pub(crate) const EMPTY_QUERY_TEXT: &str = "Please enter a search term to search.";
pub(crate) const NO_RESULTS_TEXT: &str = "Your query yielded no results.";

const WORKING_BACKGROUND: &str = "#eeee0050";
const DONE_BACKGROUND: &str = "#00ff0050";
const ERROR_BACKGROUND: &str = "#ff000050";

/// Protocol phase shown by the status indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusPhase {
    #[default]
    Idle,
    Working,
    Done,
    Error,
    EmptyInput,
}

impl StatusPhase {
    /// Background color (RGBA hex) the status element takes in this phase.
    pub fn background(self) -> Option<&'static str> {
        match self {
            StatusPhase::Idle => None,
            StatusPhase::Working => Some(WORKING_BACKGROUND),
            StatusPhase::Done => Some(DONE_BACKGROUND),
            StatusPhase::Error | StatusPhase::EmptyInput => Some(ERROR_BACKGROUND),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatusPhase::Idle => "idle",
            StatusPhase::Working => "working",
            StatusPhase::Done => "done",
            StatusPhase::Error => "error",
            StatusPhase::EmptyInput => "input",
        }
    }
}

/// The single shared status element: text plus background.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusIndicator {
    pub phase: StatusPhase,
    pub text: String,
}

impl StatusIndicator {
    pub fn background(&self) -> Option<&'static str> {
        self.phase.background()
    }
}
