//! Snippet sanitizer: the trust boundary between backend markup and the view.
//!
//! Search snippets arrive as HTML fragments. Only text and emphasis survive;
//! every tag, attribute and script is discarded, so nothing the backend sends
//! can be interpreted as markup downstream.

use datestream_core::RichText;
use ego_tree::NodeRef;
use scraper::node::Node;
use scraper::Html;

const EMPHASIS_TAGS: &[&str] = &["b", "strong", "em", "i", "mark"];
const DROPPED_TAGS: &[&str] = &["script", "style", "template", "noscript", "iframe", "object"];
const BLOCK_TAGS: &[&str] = &["p", "div", "li", "tr", "h1", "h2", "h3", "h4", "h5", "h6"];

pub fn sanitize_snippet(html: &str) -> RichText {
    let fragment = Html::parse_fragment(html);
    let mut runs = Vec::new();
    for child in fragment.root_element().children() {
        collect_runs(child, false, &mut runs);
    }
    collapse_whitespace(runs)
}

fn collect_runs(node: NodeRef<'_, Node>, emphasis: bool, runs: &mut Vec<(String, bool)>) {
    match node.value() {
        Node::Text(text) => runs.push((String::from(&**text), emphasis)),
        Node::Element(element) => {
            let name = element.name();
            if DROPPED_TAGS.contains(&name) {
                return;
            }
            if name == "br" {
                runs.push((" ".to_string(), emphasis));
                return;
            }
            let emphasis = emphasis || EMPHASIS_TAGS.contains(&name);
            for child in node.children() {
                collect_runs(child, emphasis, runs);
            }
            if BLOCK_TAGS.contains(&name) {
                runs.push((" ".to_string(), emphasis));
            }
        }
        _ => {}
    }
}

/// Collapses whitespace runs to one space and trims both ends. A space between
/// two runs is emphasized only when both neighbours are.
fn collapse_whitespace(runs: Vec<(String, bool)>) -> RichText {
    let mut rich = RichText::new();
    let mut last_emphasis: Option<bool> = None;
    let mut pending_space = false;

    for (text, emphasis) in runs {
        let mut buf = String::new();
        for ch in text.chars() {
            if ch.is_whitespace() {
                if last_emphasis.is_some() || !buf.is_empty() {
                    pending_space = true;
                }
                continue;
            }
            if pending_space {
                if buf.is_empty() {
                    rich.push(" ", emphasis && last_emphasis == Some(true));
                } else {
                    buf.push(' ');
                }
                pending_space = false;
            }
            buf.push(ch);
        }
        if !buf.is_empty() {
            rich.push(buf, emphasis);
            last_emphasis = Some(emphasis);
        }
    }

    rich
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans(rich: &RichText) -> Vec<(&str, bool)> {
        rich.spans()
            .iter()
            .map(|span| (span.text.as_str(), span.emphasis))
            .collect()
    }

    fn emphasized(rich: &RichText) -> Vec<&str> {
        rich.spans()
            .iter()
            .filter(|span| span.emphasis)
            .map(|span| span.text.as_str())
            .collect()
    }

    #[test]
    fn keeps_text_and_emphasis_only() {
        let rich = sanitize_snippet(
            "The <b>crawl budget</b> was <em class=\"x\">exceeded</em>&nbsp;today<script>alert(1)</script>",
        );
        assert_eq!(rich.to_plain_string(), "The crawl budget was exceeded today");
        assert_eq!(
            spans(&rich),
            vec![
                ("The ", false),
                ("crawl budget", true),
                (" was ", false),
                ("exceeded", true),
                (" today", false),
            ]
        );
    }

    #[test]
    fn separating_space_never_joins_an_emphasized_run() {
        let rich = sanitize_snippet("the <b>budget</b> passed");
        assert_eq!(
            spans(&rich),
            vec![("the ", false), ("budget", true), (" passed", false)]
        );
    }

    #[test]
    fn space_between_emphasized_runs_stays_emphasized() {
        let rich = sanitize_snippet("<b>crawl</b> <em>budget</em> cut");
        assert_eq!(spans(&rich), vec![("crawl budget", true), (" cut", false)]);
    }

    #[test]
    fn markup_in_text_is_not_reinterpreted() {
        let rich = sanitize_snippet("a &lt;img src=x onerror=alert(1)&gt; b");
        assert_eq!(rich.to_plain_string(), "a <img src=x onerror=alert(1)> b");
        assert!(emphasized(&rich).is_empty());
    }

    #[test]
    fn attributes_and_links_are_flattened() {
        let rich = sanitize_snippet(
            "<a href=\"javascript:alert(1)\" onclick=\"x()\">click</a><br>  next <p>para</p>",
        );
        assert_eq!(rich.to_plain_string(), "click next para");
    }

    #[test]
    fn empty_and_whitespace_only_fragments_are_empty() {
        assert!(sanitize_snippet("").is_empty());
        assert!(sanitize_snippet("  <style>p{}</style> \n").is_empty());
    }
}
