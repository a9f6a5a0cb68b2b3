use super::*;
use crate::models::DocumentToken as T;
use crate::render::lexer::lex;

fn html_of(tokens: &[T]) -> String {
    render_tokens(tokens).to_html()
}

#[test]
fn test_rendering_is_deterministic() {
    let tokens = lex("# A\n\npara *em* `c`\n\n| h |\n|---|\n| 1 |\n");
    let first = render_tokens(&tokens);
    let second = render_tokens(&tokens);
    assert_eq!(first, second);
    assert_eq!(first.to_html(), second.to_html());
}

#[test]
fn test_mermaid_code_wrapped_in_container() {
    let tokens = [T::Code {
        language: Some("mermaid".into()),
        text: "graph TD;".into(),
    }];
    assert_eq!(
        html_of(&tokens),
        "<div class=\"mermaid-container\"><pre class=\"mermaid\">graph TD;</pre></div>"
    );
}

#[test]
fn test_folder_code_wrapped_in_container() {
    let tokens = [T::Code {
        language: Some("folder".into()),
        text: "src/\n  lib.rs".into(),
    }];
    let html = html_of(&tokens);
    assert!(html.starts_with("<div class=\"folder-container\">"));
    assert!(html.contains("<pre class=\"folder\"><code>src/\n  lib.rs</code></pre>"));
}

#[test]
fn test_code_language_defaults_to_plaintext() {
    let tokens = [T::Code {
        language: None,
        text: "raw".into(),
    }];
    assert_eq!(
        html_of(&tokens),
        "<pre><code class=\"language-plaintext\">raw</code></pre>"
    );
}

#[test]
fn test_code_with_other_language() {
    let tokens = [T::Code {
        language: Some("rust".into()),
        text: "fn main() {}".into(),
    }];
    assert_eq!(
        html_of(&tokens),
        "<pre><code class=\"language-rust\">fn main() {}</code></pre>"
    );
}

#[test]
fn test_code_text_is_escaped_once() {
    let tokens = [T::Code {
        language: Some("html".into()),
        text: "<b>&</b>".into(),
    }];
    assert_eq!(
        html_of(&tokens),
        "<pre><code class=\"language-html\">&lt;b&gt;&amp;&lt;/b&gt;</code></pre>"
    );
}

#[test]
fn test_empty_table_renders_header_only() {
    let tokens = lex("| a | b |\n|---|---|\n");
    let html = html_of(&tokens);
    assert!(html.starts_with("<table class=\"md-table\">"));
    assert!(html.contains("<thead><tr><th>a</th><th>b</th></tr></thead>"));
    assert!(!html.contains("tbody"));
}

#[test]
fn test_table_rows_match_header_columns() {
    let tokens = lex("| a | b |\n|---|---|\n| 1 | 2 |\n| 3 | 4 |\n");
    let frag = render_tokens(&tokens);
    let html = frag.to_html();
    assert!(html.starts_with("<div class=\"md-table-container\">"));
    assert_eq!(html.matches("<th>").count(), 2);
    assert_eq!(html.matches("<tr>").count(), 3);
    assert_eq!(html.matches("<td>").count(), 4);
}

#[test]
fn test_table_alignment_as_cell_attribute() {
    let tokens = lex("| a | b |\n|:--|--:|\n| 1 | 2 |\n");
    let html = html_of(&tokens);
    assert!(html.contains("<th align=\"left\">a</th>"));
    assert!(html.contains("<th align=\"right\">b</th>"));
    assert!(html.contains("<td align=\"left\">1</td>"));
    assert!(html.contains("<td align=\"right\">2</td>"));
}

#[test]
fn test_heading_depth_and_slug_id() {
    let tokens = [T::Heading {
        depth: 3,
        children: vec![T::Text("Getting  Started!".into())],
    }];
    assert_eq!(
        html_of(&tokens),
        "<h3 id=\"getting-started\">Getting  Started!</h3>"
    );
}

#[test]
fn test_ordered_list_carries_start() {
    let tokens = lex("5. five\n6. six\n");
    let html = html_of(&tokens);
    assert!(html.starts_with("<ol start=\"5\">"));
    assert_eq!(html.matches("<li>").count(), 2);
}

#[test]
fn test_unordered_list_has_no_start() {
    let tokens = lex("- one\n- two\n");
    let html = html_of(&tokens);
    assert!(html.starts_with("<ul><li>"));
}

#[test]
fn test_inline_marks() {
    let tokens = lex("*em* **strong** ~~del~~ `code`  \nnext");
    let html = html_of(&tokens);
    assert!(html.contains("<em>em</em>"));
    assert!(html.contains("<strong>strong</strong>"));
    assert!(html.contains("<del>del</del>"));
    assert!(html.contains("<code>code</code>"));
    assert!(html.contains("<br>"));
}

#[test]
fn test_link_href_is_percent_normalized() {
    let tokens = [T::Link {
        href: "docs/my page.md".into(),
        title: Some("T".into()),
        children: vec![T::Text("go".into())],
    }];
    assert_eq!(
        html_of(&tokens),
        "<a href=\"docs/my%20page.md\" title=\"T\">go</a>"
    );
}

#[test]
fn test_internal_link_href_untouched() {
    assert_eq!(clean_url("#docId:appreadme"), "#docId:appreadme");
    assert_eq!(clean_url("#inlineId:setup"), "#inlineId:setup");
    assert_eq!(clean_url("a%20b"), "a%20b");
}

#[test]
fn test_image_attributes() {
    let tokens = [T::Image {
        href: "img/a b.png".into(),
        title: None,
        alt: "alt text".into(),
    }];
    assert_eq!(
        html_of(&tokens),
        "<img src=\"img/a%20b.png\" alt=\"alt text\">"
    );
}

#[test]
fn test_html_comment_renders_nothing() {
    let tokens = [T::Html("<!-- secret note -->".into())];
    assert_eq!(html_of(&tokens), "");
}

#[test]
fn test_slugify() {
    assert_eq!(slugify("  Hello,  World!  "), "hello-world");
    assert_eq!(slugify("a---b"), "a-b");
    assert_eq!(slugify("Under_score"), "under_score");
    assert_eq!(slugify("!!!"), "");
}
