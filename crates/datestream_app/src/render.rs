//! Terminal rendering of the view model.
//!
//! Output is append-only: the status line whenever it changes, then the table
//! header once and each row as it arrives.

use std::io::{self, Write};

use datestream_core::{
    AppViewModel, ExtractionRow, ResultsViewModel, RichText, SearchBlock, StatusIndicator,
    StatusPhase,
};

const CELL_SEPARATOR: &str = " | ";

pub struct TerminalRenderer<W: Write> {
    out: W,
    header_printed: bool,
    rows_printed: usize,
    blocks_printed: bool,
    last_status: StatusIndicator,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            header_printed: false,
            rows_printed: 0,
            blocks_printed: false,
            last_status: StatusIndicator::default(),
        }
    }

    pub fn render(&mut self, view: &AppViewModel) -> io::Result<()> {
        if view.status != self.last_status && view.status.phase != StatusPhase::Idle {
            writeln!(
                self.out,
                "[{}] {}",
                view.status.phase.label(),
                view.status.text
            )?;
            self.last_status = view.status.clone();
        }

        match &view.results {
            ResultsViewModel::Empty => {}
            ResultsViewModel::Table { columns, rows, .. } => {
                if !self.header_printed {
                    writeln!(self.out, "{}", columns.join(CELL_SEPARATOR))?;
                    self.header_printed = true;
                }
                for row in rows.iter().skip(self.rows_printed) {
                    writeln!(self.out, "{}", format_row(row))?;
                }
                self.rows_printed = self.rows_printed.max(rows.len());
            }
            ResultsViewModel::SearchList { blocks } => {
                if !self.blocks_printed {
                    for block in blocks {
                        write_block(&mut self.out, block)?;
                    }
                    self.blocks_printed = true;
                }
            }
        }

        self.out.flush()
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

fn format_row(row: &ExtractionRow) -> String {
    row.cells().join(CELL_SEPARATOR)
}

fn write_block(out: &mut impl Write, block: &SearchBlock) -> io::Result<()> {
    writeln!(out, "{}", block.title.text)?;
    writeln!(out, "  {}", block.url.text)?;
    writeln!(
        out,
        "  {}{}",
        block.date_prefix.as_deref().unwrap_or_default(),
        emphasize(&block.snippet)
    )?;
    writeln!(out)
}

/// Plain text with emphasized runs wrapped in `*`.
fn emphasize(text: &RichText) -> String {
    text.spans()
        .iter()
        .map(|span| {
            if span.emphasis {
                format!("*{}*", span.text)
            } else {
                span.text.clone()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use datestream_core::{
        render_extraction_row, render_search_block, update, AppState, ExtractionOutcome,
        ExtractionResult, Msg, Notification, SearchHit, SearchOutcome, SearchTicket, Timing,
    };
    use pretty_assertions::assert_eq;

    fn output(renderer: TerminalRenderer<Vec<u8>>) -> String {
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    fn dated(uri: &str) -> ExtractionResult {
        ExtractionResult {
            uri: uri.to_string(),
            outcome: ExtractionOutcome::Dated {
                date: "2021-01-05".to_string(),
                date_source_text: "meta".to_string(),
            },
            timing: Timing {
                request_ms: 12.0,
                compute_ms: 3.5,
            },
        }
    }

    #[test]
    fn status_comes_before_a_single_header_and_rows() {
        let (state, _) = update(AppState::new(), Msg::InputChanged("http://a.test".into()));
        let (state, effects) = update(state, Msg::ExtractSubmitted);
        let Some(datestream_core::Effect::StartExtraction { job_id, .. }) = effects.first() else {
            panic!("no start effect");
        };
        let job_id = *job_id;

        let mut renderer = TerminalRenderer::new(Vec::new());
        renderer.render(&state.view()).unwrap();
        let (state, _) = update(
            state,
            Msg::Notification {
                job_id,
                notification: Notification::Result(dated("http://a.test")),
            },
        );
        renderer.render(&state.view()).unwrap();
        renderer.render(&state.view()).unwrap();
        let (state, _) = update(
            state,
            Msg::Notification {
                job_id,
                notification: Notification::Terminal {
                    kind: "done".into(),
                    message: "Finished.".into(),
                },
            },
        );
        renderer.render(&state.view()).unwrap();

        assert_eq!(
            output(renderer),
            "[working] Extracting dates...\n\
             Link | Result | Request Time | Compute Time | Strategy Used\n\
             http://a.test | Jan 05, 2021 | 12ms | 3.5ms | meta\n\
             [done] Finished.\n"
        );
    }

    #[test]
    fn failed_row_leaves_strategy_blank() {
        let row = render_extraction_row(&ExtractionResult {
            uri: "http://b.test".into(),
            outcome: ExtractionOutcome::Failed {
                code: "404".into(),
                message: "Not found".into(),
            },
            timing: Timing::default(),
        });
        assert_eq!(format_row(&row), "http://b.test | Not found | 0ms | 0ms | ");
    }

    #[test]
    fn search_blocks_mark_emphasis() {
        let mut snippet = RichText::new();
        snippet.push("the ", false);
        snippet.push("budget", true);
        snippet.push(" passed", false);
        let block = render_search_block(&SearchHit {
            uri: "https://news.test/a?x=1".into(),
            title: Some("Budget".into()),
            date: Some("2020-03-01".into()),
            snippet: Some(snippet),
        });

        let mut out = Vec::new();
        write_block(&mut out, &block).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Budget\n  news.test/a?x=1\n  Mar 01, 2020 - the *budget* passed\n\n"
        );
    }

    #[test]
    fn no_results_prints_only_status() {
        let (state, _) = update(AppState::new(), Msg::InputChanged("http://a.test".into()));
        let (state, _) = update(state, Msg::QueryChanged("zzz".into()));
        let (state, _) = update(state, Msg::SearchSubmitted);
        let (state, _) = update(
            state,
            Msg::SearchCompleted {
                ticket: SearchTicket(1),
                outcome: SearchOutcome {
                    hits: Vec::new(),
                    server_time_ms: 3.0,
                },
            },
        );

        let mut renderer = TerminalRenderer::new(Vec::new());
        renderer.render(&state.view()).unwrap();
        assert_eq!(output(renderer), "[error] Your query yielded no results.\n");
    }
}
