use datestream_core::{
    update, AppState, Effect, Msg, ResultsViewModel, RichText, SearchHit, SearchOutcome,
    SearchTicket, StatusPhase,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    datestream_logging::initialize_for_tests();
}

fn submit_search(state: AppState, urls: &str, query: &str) -> (AppState, Vec<Effect>) {
    let (state, _) = update(state, Msg::InputChanged(urls.to_string()));
    let (state, _) = update(state, Msg::QueryChanged(query.to_string()));
    update(state, Msg::SearchSubmitted)
}

fn ticket_of(effects: &[Effect]) -> SearchTicket {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::SubmitSearch { ticket, .. } => Some(*ticket),
            _ => None,
        })
        .expect("search effect")
}

fn hit(uri: &str, title: Option<&str>) -> SearchHit {
    SearchHit {
        uri: uri.to_string(),
        title: title.map(ToOwned::to_owned),
        date: None,
        snippet: Some(RichText::plain("snippet")),
    }
}

#[test]
fn search_validates_urls_then_query() {
    init_logging();
    let (state, effects) = submit_search(AppState::new(), "", "budget");
    assert!(effects.is_empty());
    assert_eq!(state.view().status.text, "No URLs to crawl were provided.");

    let (state, effects) = submit_search(state, "http://a.test", "");
    assert!(effects.is_empty());
    assert_eq!(state.view().status.phase, StatusPhase::EmptyInput);
    assert_eq!(state.view().status.text, "Please enter a search term to search.");
}

#[test]
fn search_submits_deduplicated_urls_and_term() {
    init_logging();
    let (state, effects) = submit_search(
        AppState::new(),
        "http://a.test\nhttp://a.test\nhttp://b.test\n",
        "budget",
    );

    assert_eq!(
        effects,
        vec![Effect::SubmitSearch {
            ticket: SearchTicket(1),
            urls: vec!["http://a.test".to_string(), "http://b.test".to_string()],
            search_term: "budget".to_string(),
        }]
    );
    assert_eq!(state.view().status.text, "Searching...");
    assert!(state.is_busy());
}

#[test]
fn search_term_is_posted_untrimmed() {
    init_logging();
    let (_, effects) = submit_search(AppState::new(), "http://a.test", " new york ");

    let Some(Effect::SubmitSearch { search_term, .. }) = effects.first() else {
        panic!("expected a search effect, got {effects:?}");
    };
    assert_eq!(search_term, " new york ");
}

#[test]
fn results_render_in_response_order() {
    init_logging();
    let (state, effects) = submit_search(AppState::new(), "http://a.test", "budget");
    let ticket = ticket_of(&effects);

    let (state, effects) = update(
        state,
        Msg::SearchCompleted {
            ticket,
            outcome: SearchOutcome {
                hits: vec![
                    hit("https://z.test/last?page=2", Some("Zed")),
                    hit("https://a.test/first", None),
                ],
                server_time_ms: 42.0,
            },
        },
    );
    assert!(effects.is_empty());

    let view = state.view();
    let blocks = view.results.blocks();
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0].url.text, "z.test/last?page=2");
    assert_eq!(blocks[0].title.text, "Zed");
    assert_eq!(blocks[1].title.text, "https://a.test/first");
    assert_eq!(view.status.phase, StatusPhase::Done);
    assert_eq!(view.status.text, "Results found in 42ms");
    assert!(!state.is_busy());
}

#[test]
fn empty_results_render_nothing_and_report_no_results() {
    init_logging();
    let (state, effects) = submit_search(AppState::new(), "http://a.test", "budget");
    let ticket = ticket_of(&effects);

    let (state, _) = update(
        state,
        Msg::SearchCompleted {
            ticket,
            outcome: SearchOutcome {
                hits: Vec::new(),
                server_time_ms: 3.0,
            },
        },
    );

    let view = state.view();
    assert_eq!(view.results, ResultsViewModel::Empty);
    assert_eq!(view.status.text, "Your query yielded no results.");
    assert_eq!(view.status.background(), Some("#ff000050"));
}

#[test]
fn transport_failure_is_distinct_from_no_results() {
    init_logging();
    let (state, effects) = submit_search(AppState::new(), "http://a.test", "budget");
    let ticket = ticket_of(&effects);

    let (state, _) = update(
        state,
        Msg::SearchFailed {
            ticket,
            reason: "network error".to_string(),
        },
    );

    assert_eq!(state.view().status.phase, StatusPhase::Error);
    assert_eq!(state.view().status.text, "Search failed: network error");
}

#[test]
fn stale_search_response_is_dropped() {
    init_logging();
    let (state, first) = submit_search(AppState::new(), "http://a.test", "old");
    let (state, second) = submit_search(state, "http://a.test", "new");
    let (old_ticket, new_ticket) = (ticket_of(&first), ticket_of(&second));
    assert_ne!(old_ticket, new_ticket);

    let (state, _) = update(
        state,
        Msg::SearchCompleted {
            ticket: old_ticket,
            outcome: SearchOutcome {
                hits: vec![hit("https://old.test", None)],
                server_time_ms: 1.0,
            },
        },
    );
    assert!(state.view().results.blocks().is_empty());
    assert_eq!(state.view().status.text, "Searching...");

    let (state, _) = update(
        state,
        Msg::SearchCompleted {
            ticket: new_ticket,
            outcome: SearchOutcome {
                hits: vec![hit("https://new.test", None)],
                server_time_ms: 1.5,
            },
        },
    );
    assert_eq!(state.view().results.blocks()[0].url.href, "https://new.test");
    assert_eq!(state.view().status.text, "Results found in 1.5ms");
}
