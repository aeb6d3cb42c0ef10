//! Integration tests for the rulemark parser
//!
//! These encode the behavioral contract: the implicit block/inline entry,
//! every built-in rule, reference resolution against the final def table,
//! and the emphasis-nesting and list-looseness edge cases.

use rulemark_core::{parse, parse_block, parse_inline, Alignment, Node, ParseErrorKind, Parser};

fn text(s: &str) -> Node {
    Node::text(s)
}

/// Concatenate every terminal text content in a node sequence.
fn flatten(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        match node {
            Node::Text { content } | Node::InlineCode { content } => out.push_str(content),
            Node::Strong { content }
            | Node::Em { content }
            | Node::U { content }
            | Node::Del { content }
            | Node::Paragraph { content }
            | Node::BlockQuote { content }
            | Node::Heading { content, .. }
            | Node::Link { content, .. } => out.push_str(&flatten(content)),
            _ => {}
        }
    }
    out
}

// ============================================================================
// Implicit Entry: Inline vs Block
// ============================================================================

#[test]
fn test_plain_text_line_stays_inline() {
    assert_eq!(parse("hi there").unwrap(), vec![text("hi there")]);
}

#[test]
fn test_trailing_newline_without_blank_line_stays_inline() {
    assert_eq!(parse("hi\n").unwrap(), vec![text("hi\n")]);
}

#[test]
fn test_blank_terminated_input_parses_as_blocks() {
    let nodes = parse("hi there\n\n").unwrap();
    assert_eq!(nodes, vec![Node::Paragraph {
        content: vec![text("hi there")],
    }]);
}

#[test]
fn test_space_only_line_counts_as_blank_terminator() {
    let nodes = parse("hi\n  \n").unwrap();
    assert!(matches!(nodes[0], Node::Paragraph { .. }));
}

#[test]
fn test_empty_input() {
    assert_eq!(parse("").unwrap(), Vec::new());
}

#[test]
fn test_explicit_inline_ignores_block_syntax() {
    assert_eq!(parse_inline("# hi").unwrap(), vec![text("# hi")]);
}

#[test]
fn test_explicit_block_without_terminator_falls_back_to_text() {
    assert_eq!(parse_block("hi").unwrap(), vec![text("hi")]);
}

// ============================================================================
// Escapes
// ============================================================================

#[test]
fn test_escape_roundtrip_for_every_special_char() {
    for c in ['`', '*', '~', '|', '<', '[', '{', '^', '_', '\\'] {
        let nodes = parse(&format!("\\{c}")).unwrap();
        assert_eq!(nodes, vec![text(&c.to_string())], "escaping {c:?}");
    }
}

#[test]
fn test_each_escape_is_its_own_text_node() {
    let nodes = parse("\\*\\*").unwrap();
    assert_eq!(nodes, vec![text("*"), text("*")]);
}

#[test]
fn test_backslash_before_letter_is_not_an_escape() {
    assert_eq!(parse("\\a").unwrap(), vec![text("\\a")]);
}

// ============================================================================
// Emphasis Family
// ============================================================================

#[test]
fn test_strong() {
    assert_eq!(
        parse("**hi**").unwrap(),
        vec![Node::Strong {
            content: vec![text("hi")],
        }]
    );
}

#[test]
fn test_strong_wraps_any_alphabetic_content() {
    for word in ["x", "word", "Q"] {
        let nodes = parse(&format!("**{word}**")).unwrap();
        assert_eq!(
            nodes,
            vec![Node::Strong {
                content: vec![text(word)],
            }],
            "strong around {word:?}"
        );
    }
}

#[test]
fn test_em_with_stars() {
    assert_eq!(
        parse("*hi*").unwrap(),
        vec![Node::Em {
            content: vec![text("hi")],
        }]
    );
}

#[test]
fn test_em_with_underscores() {
    assert_eq!(
        parse("_hi_").unwrap(),
        vec![Node::Em {
            content: vec![text("hi")],
        }]
    );
}

#[test]
fn test_u_with_double_underscores() {
    assert_eq!(
        parse("__hi__").unwrap(),
        vec![Node::U {
            content: vec![text("hi")],
        }]
    );
}

#[test]
fn test_del() {
    assert_eq!(
        parse("~~hi~~").unwrap(),
        vec![Node::Del {
            content: vec![text("hi")],
        }]
    );
}

#[test]
fn test_five_tildes_degrade_to_del_around_one() {
    assert_eq!(
        parse("~~~~~").unwrap(),
        vec![Node::Del {
            content: vec![text("~")],
        }]
    );
}

#[test]
fn test_triple_star_nests_strong_around_em() {
    assert_eq!(
        parse("***hi***").unwrap(),
        vec![Node::Strong {
            content: vec![Node::Em {
                content: vec![text("hi")],
            }],
        }]
    );
}

#[test]
fn test_deep_emphasis_nesting() {
    assert_eq!(
        parse("***__x__***").unwrap(),
        vec![Node::Strong {
            content: vec![Node::Em {
                content: vec![Node::U {
                    content: vec![text("x")],
                }],
            }],
        }]
    );
}

#[test]
fn test_underscore_needs_word_boundary_to_close() {
    // the first `_` cannot close before `b`, so no emphasis forms
    let nodes = parse("_a_b").unwrap();
    assert!(nodes.iter().all(|n| !matches!(n, Node::Em { .. })));
    assert_eq!(flatten(&nodes), "_a_b");
}

#[test]
fn test_emphasis_mix_inside_text() {
    assert_eq!(
        parse("_a_ and *b*").unwrap(),
        vec![
            Node::Em {
                content: vec![text("a")],
            },
            text(" and "),
            Node::Em {
                content: vec![text("b")],
            },
        ]
    );
}

#[test]
fn test_em_wrapping_inline_code() {
    assert_eq!(
        parse("*`a`*").unwrap(),
        vec![Node::Em {
            content: vec![Node::InlineCode {
                content: "a".to_string(),
            }],
        }]
    );
}

// ============================================================================
// Inline Code
// ============================================================================

#[test]
fn test_inline_code() {
    assert_eq!(
        parse("`hi`").unwrap(),
        vec![Node::InlineCode {
            content: "hi".to_string(),
        }]
    );
}

#[test]
fn test_inline_code_keeps_emphasis_markers_literal() {
    assert_eq!(
        parse("`**hi**`").unwrap(),
        vec![Node::InlineCode {
            content: "**hi**".to_string(),
        }]
    );
}

#[test]
fn test_inline_code_trims_surrounding_spaces() {
    assert_eq!(
        parse("` spaced `").unwrap(),
        vec![Node::InlineCode {
            content: "spaced".to_string(),
        }]
    );
}

#[test]
fn test_double_backtick_code_can_hold_a_backtick() {
    assert_eq!(
        parse("``a`b``").unwrap(),
        vec![Node::InlineCode {
            content: "a`b".to_string(),
        }]
    );
}

// ============================================================================
// Hard Breaks
// ============================================================================

#[test]
fn test_br_outside_paragraph() {
    assert_eq!(
        parse("hi  \nthere").unwrap(),
        vec![text("hi"), Node::Br, text("there")]
    );
}

#[test]
fn test_br_inside_paragraph() {
    let nodes = parse("hi  \nthere\n\n").unwrap();
    assert_eq!(
        nodes,
        vec![Node::Paragraph {
            content: vec![text("hi"), Node::Br, text("there")],
        }]
    );
}

#[test]
fn test_double_space_without_newline_is_plain_text() {
    assert_eq!(parse("hi  there").unwrap(), vec![text("hi  there")]);
}

// ============================================================================
// Autolinks, Mailto, Bare URLs
// ============================================================================

#[test]
fn test_autolink() {
    assert_eq!(
        parse("<http://google.com>").unwrap(),
        vec![Node::Link {
            content: vec![text("http://google.com")],
            target: "http://google.com".to_string(),
            title: None,
        }]
    );
}

#[test]
fn test_mailto_adds_prefix() {
    assert_eq!(
        parse("<sam@example.com>").unwrap(),
        vec![Node::Link {
            content: vec![text("sam@example.com")],
            target: "mailto:sam@example.com".to_string(),
            title: None,
        }]
    );
}

#[test]
fn test_mailto_keeps_existing_prefix() {
    let nodes = parse("<mailto:sam@example.com>").unwrap();
    match &nodes[0] {
        Node::Link { target, .. } => assert_eq!(target, "mailto:sam@example.com"),
        other => panic!("expected link, got {other:?}"),
    }
}

#[test]
fn test_bare_url_inside_text() {
    assert_eq!(
        parse("see http://example.com now").unwrap(),
        vec![
            text("see "),
            Node::Link {
                content: vec![text("http://example.com")],
                target: "http://example.com".to_string(),
                title: None,
            },
            text(" now"),
        ]
    );
}

#[test]
fn test_bare_url_leaves_trailing_punctuation() {
    let nodes = parse("visit http://example.com.").unwrap();
    assert_eq!(
        nodes[1],
        Node::Link {
            content: vec![text("http://example.com")],
            target: "http://example.com".to_string(),
            title: None,
        }
    );
    assert_eq!(nodes[2], text("."));
}

// ============================================================================
// Links and Images
// ============================================================================

#[test]
fn test_link() {
    assert_eq!(
        parse("[Google](http://google.com)").unwrap(),
        vec![Node::Link {
            content: vec![text("Google")],
            target: "http://google.com".to_string(),
            title: None,
        }]
    );
}

#[test]
fn test_link_with_title() {
    match &parse("[x](/url \"the title\")").unwrap()[0] {
        Node::Link { target, title, .. } => {
            assert_eq!(target, "/url");
            assert_eq!(title.as_deref(), Some("the title"));
        }
        other => panic!("expected link, got {other:?}"),
    }
}

#[test]
fn test_link_with_angle_target() {
    match &parse("[x](<http://a/b>)").unwrap()[0] {
        Node::Link { target, .. } => assert_eq!(target, "http://a/b"),
        other => panic!("expected link, got {other:?}"),
    }
}

#[test]
fn test_link_target_with_balanced_parens() {
    match &parse("[x](/url(1))").unwrap()[0] {
        Node::Link { target, .. } => assert_eq!(target, "/url(1)"),
        other => panic!("expected link, got {other:?}"),
    }
}

#[test]
fn test_link_text_with_nested_brackets() {
    match &parse("[a [b] c](/u)").unwrap()[0] {
        Node::Link {
            content, target, ..
        } => {
            assert_eq!(target, "/u");
            assert_eq!(flatten(content), "a [b] c");
        }
        other => panic!("expected link, got {other:?}"),
    }
}

#[test]
fn test_image() {
    assert_eq!(
        parse("![alt text](/img.png)").unwrap(),
        vec![Node::Image {
            alt: "alt text".to_string(),
            target: "/img.png".to_string(),
            title: None,
        }]
    );
}

#[test]
fn test_image_with_title() {
    match &parse("![foo](/url \"t\")").unwrap()[0] {
        Node::Image { alt, target, title } => {
            assert_eq!(alt, "foo");
            assert_eq!(target, "/url");
            assert_eq!(title.as_deref(), Some("t"));
        }
        other => panic!("expected image, got {other:?}"),
    }
}

#[test]
fn test_lone_brackets_are_text() {
    let nodes = parse("[not a link").unwrap();
    assert_eq!(flatten(&nodes), "[not a link");
    assert!(nodes.iter().all(|n| !matches!(n, Node::Link { .. })));
}

// ============================================================================
// Reference Links and Definitions
// ============================================================================

#[test]
fn test_reflink_resolves_case_insensitively() {
    let nodes = parse("[Google][HiIiI]\n\n[HIiii]: http://www.google.com\n\n").unwrap();
    assert_eq!(
        nodes,
        vec![
            Node::Paragraph {
                content: vec![Node::Link {
                    content: vec![text("Google")],
                    target: "http://www.google.com".to_string(),
                    title: None,
                }],
            },
            Node::Def {
                def: "hiiii".to_string(),
                target: "http://www.google.com".to_string(),
                title: None,
            },
        ]
    );
}

#[test]
fn test_implicit_reflink_uses_its_text_as_label() {
    let nodes = parse("[Google][]\n\n[google]: http://g\n\n").unwrap();
    match &nodes[0] {
        Node::Paragraph { content } => match &content[0] {
            Node::Link { target, .. } => assert_eq!(target, "http://g"),
            other => panic!("expected link, got {other:?}"),
        },
        other => panic!("expected paragraph, got {other:?}"),
    }
}

#[test]
fn test_later_def_wins_for_every_reflink() {
    let nodes =
        parse("[test][1]\n\n[1]: http://a\n\n[test2][1]\n\n[1]: http://b\n\n").unwrap();
    assert_eq!(nodes.len(), 4);
    for (i, expected_target) in [(0usize, "http://b"), (2, "http://b")] {
        match &nodes[i] {
            Node::Paragraph { content } => match &content[0] {
                Node::Link { target, .. } => assert_eq!(target, expected_target),
                other => panic!("expected link, got {other:?}"),
            },
            other => panic!("expected paragraph, got {other:?}"),
        }
    }
    // both defs survive in document order with their own targets
    assert!(matches!(&nodes[1], Node::Def { target, .. } if target == "http://a"));
    assert!(matches!(&nodes[3], Node::Def { target, .. } if target == "http://b"));
}

#[test]
fn test_unresolved_reflink_degrades_to_literal_text_nodes() {
    assert_eq!(
        parse("[who][nope]").unwrap(),
        vec![
            text("["),
            text("who"),
            text("]"),
            text("["),
            text("nope"),
            text("]"),
        ]
    );
}

#[test]
fn test_refimage_resolves() {
    let nodes = parse("![alt][img]\n\n[img]: /i.png\n\n").unwrap();
    match &nodes[0] {
        Node::Paragraph { content } => {
            assert_eq!(
                content[0],
                Node::Image {
                    alt: "alt".to_string(),
                    target: "/i.png".to_string(),
                    title: None,
                }
            );
        }
        other => panic!("expected paragraph, got {other:?}"),
    }
}

#[test]
fn test_unresolved_refimage_degrades_to_literal_text_nodes() {
    assert_eq!(
        parse("![x][y]").unwrap(),
        vec![
            text("!"),
            text("["),
            text("x"),
            text("]"),
            text("["),
            text("y"),
            text("]"),
        ]
    );
}

#[test]
fn test_def_node_shape() {
    assert_eq!(
        parse("[foo]: http://example.com \"Title\"\n\n").unwrap(),
        vec![Node::Def {
            def: "foo".to_string(),
            target: "http://example.com".to_string(),
            title: Some("Title".to_string()),
        }]
    );
}

#[test]
fn test_def_title_in_parens() {
    match &parse("[foo]: /url (Hello)\n\n").unwrap()[0] {
        Node::Def { title, .. } => assert_eq!(title.as_deref(), Some("Hello")),
        other => panic!("expected def, got {other:?}"),
    }
}

#[test]
fn test_def_with_angle_target() {
    match &parse("[foo]: <http://x>\n\n").unwrap()[0] {
        Node::Def { target, .. } => assert_eq!(target, "http://x"),
        other => panic!("expected def, got {other:?}"),
    }
}

#[test]
fn test_def_with_empty_angle_target() {
    match &parse("[foo]: <>\n\n").unwrap()[0] {
        Node::Def { target, .. } => assert_eq!(target, ""),
        other => panic!("expected def, got {other:?}"),
    }
}

#[test]
fn test_def_target_unescapes_backslashes() {
    let nodes = parse("[x][1]\n\n[1]: http://a.com/\\_b\n\n").unwrap();
    match &nodes[0] {
        Node::Paragraph { content } => match &content[0] {
            Node::Link { target, .. } => assert_eq!(target, "http://a.com/_b"),
            other => panic!("expected link, got {other:?}"),
        },
        other => panic!("expected paragraph, got {other:?}"),
    }
    assert!(matches!(&nodes[1], Node::Def { target, .. } if target == "http://a.com/_b"));
}

#[test]
fn test_def_label_whitespace_collapses() {
    match &parse("[ h    i ]: /x\n\n").unwrap()[0] {
        Node::Def { def, .. } => assert_eq!(def, " h i "),
        other => panic!("expected def, got {other:?}"),
    }
}

#[test]
fn test_malformed_def_falls_back_to_paragraph() {
    // no target separator line shape: `[x] /url` is not a definition
    let nodes = parse("[x] /url\n\n").unwrap();
    assert!(matches!(nodes[0], Node::Paragraph { .. }));
}

// ============================================================================
// Headings
// ============================================================================

#[test]
fn test_atx_heading_levels() {
    for level in 1..=6u8 {
        let hashes = "#".repeat(level as usize);
        let nodes = parse(&format!("{hashes} hi\n\n")).unwrap();
        assert_eq!(
            nodes,
            vec![Node::Heading {
                level,
                content: vec![text("hi")],
            }],
            "level {level}"
        );
    }
}

#[test]
fn test_seven_hashes_clamp_to_level_six() {
    assert_eq!(
        parse("####### over\n\n").unwrap(),
        vec![Node::Heading {
            level: 6,
            content: vec![text("# over")],
        }]
    );
}

#[test]
fn test_atx_heading_strips_closing_hashes() {
    assert_eq!(
        parse("## trailing ##\n\n").unwrap(),
        vec![Node::Heading {
            level: 2,
            content: vec![text("trailing")],
        }]
    );
}

#[test]
fn test_heading_body_parses_emphasis() {
    assert_eq!(
        parse("# **hi**\n\n").unwrap(),
        vec![Node::Heading {
            level: 1,
            content: vec![Node::Strong {
                content: vec![text("hi")],
            }],
        }]
    );
}

#[test]
fn test_setext_heading_level_one() {
    assert_eq!(
        parse("Title\n===\n\n").unwrap(),
        vec![Node::Heading {
            level: 1,
            content: vec![text("Title")],
        }]
    );
}

#[test]
fn test_setext_heading_level_two() {
    assert_eq!(
        parse("Title\n---\n\n").unwrap(),
        vec![Node::Heading {
            level: 2,
            content: vec![text("Title")],
        }]
    );
}

#[test]
fn test_two_char_underline_is_not_a_heading() {
    let nodes = parse("Title\n--\n\n").unwrap();
    assert!(matches!(nodes[0], Node::Paragraph { .. }));
}

// ============================================================================
// Horizontal Rules
// ============================================================================

#[test]
fn test_hr_dashes() {
    assert_eq!(parse("---\n\n").unwrap(), vec![Node::Hr]);
}

#[test]
fn test_hr_spaced_stars() {
    assert_eq!(parse("* * *\n\n").unwrap(), vec![Node::Hr]);
}

#[test]
fn test_two_dashes_are_not_an_hr() {
    let nodes = parse("--\n\n").unwrap();
    assert!(matches!(nodes[0], Node::Paragraph { .. }));
}

// ============================================================================
// Code Blocks
// ============================================================================

#[test]
fn test_indented_code_block() {
    assert_eq!(
        parse("    let x = 1;\n\n").unwrap(),
        vec![Node::CodeBlock {
            lang: None,
            content: "let x = 1;".to_string(),
        }]
    );
}

#[test]
fn test_indented_code_block_multiline() {
    assert_eq!(
        parse("    a\n    b\n\n").unwrap(),
        vec![Node::CodeBlock {
            lang: None,
            content: "a\nb".to_string(),
        }]
    );
}

#[test]
fn test_indented_code_block_spans_interior_blank_lines() {
    assert_eq!(
        parse("    a\n\n    b\n\n").unwrap(),
        vec![Node::CodeBlock {
            lang: None,
            content: "a\n\nb".to_string(),
        }]
    );
}

#[test]
fn test_fence_without_language() {
    assert_eq!(
        parse("```\ncode\n```\n\n").unwrap(),
        vec![Node::CodeBlock {
            lang: None,
            content: "code".to_string(),
        }]
    );
}

#[test]
fn test_fence_with_language() {
    assert_eq!(
        parse("```rust\nfn main() {}\n```\n\n").unwrap(),
        vec![Node::CodeBlock {
            lang: Some("rust".to_string()),
            content: "fn main() {}".to_string(),
        }]
    );
}

#[test]
fn test_tilde_fence() {
    assert_eq!(
        parse("~~~\nx\n~~~\n\n").unwrap(),
        vec![Node::CodeBlock {
            lang: None,
            content: "x".to_string(),
        }]
    );
}

#[test]
fn test_fence_content_is_verbatim() {
    let nodes = parse("```\n**not bold**\n# not a heading\n```\n\n").unwrap();
    assert_eq!(
        nodes,
        vec![Node::CodeBlock {
            lang: None,
            content: "**not bold**\n# not a heading".to_string(),
        }]
    );
}

// ============================================================================
// Block Quotes
// ============================================================================

#[test]
fn test_blockquote() {
    assert_eq!(
        parse("> hi\n\n").unwrap(),
        vec![Node::BlockQuote {
            content: vec![Node::Paragraph {
                content: vec![text("hi")],
            }],
        }]
    );
}

#[test]
fn test_blockquote_joins_consecutive_lines() {
    assert_eq!(
        parse("> a\n> b\n\n").unwrap(),
        vec![Node::BlockQuote {
            content: vec![Node::Paragraph {
                content: vec![text("a\nb")],
            }],
        }]
    );
}

#[test]
fn test_blockquote_body_parses_blocks() {
    assert_eq!(
        parse("> # h\n\n").unwrap(),
        vec![Node::BlockQuote {
            content: vec![Node::Heading {
                level: 1,
                content: vec![text("h")],
            }],
        }]
    );
}

#[test]
fn test_blockquote_lazy_continuation() {
    assert_eq!(
        parse("> a\nlazy\n\n").unwrap(),
        vec![Node::BlockQuote {
            content: vec![Node::Paragraph {
                content: vec![text("a\nlazy")],
            }],
        }]
    );
}

#[test]
fn test_blank_separated_quote_groups_merge() {
    let nodes = parse("> a\n\n> b\n\n").unwrap();
    assert_eq!(
        nodes,
        vec![Node::BlockQuote {
            content: vec![
                Node::Paragraph {
                    content: vec![text("a")],
                },
                Node::Paragraph {
                    content: vec![text("b")],
                },
            ],
        }]
    );
}

// ============================================================================
// Paragraphs
// ============================================================================

#[test]
fn test_multiline_paragraph() {
    assert_eq!(
        parse("line one\nline two\n\n").unwrap(),
        vec![Node::Paragraph {
            content: vec![text("line one\nline two")],
        }]
    );
}

#[test]
fn test_two_paragraphs() {
    let nodes = parse("a\n\nb\n\n").unwrap();
    assert_eq!(nodes.len(), 2);
    assert!(nodes.iter().all(|n| matches!(n, Node::Paragraph { .. })));
}

#[test]
fn test_extra_blank_lines_between_paragraphs() {
    let nodes = parse("a\n\n\nb\n\n").unwrap();
    assert_eq!(nodes.len(), 2);
}

#[test]
fn test_leading_blank_lines_emit_nothing() {
    let nodes = parse("\n\nhi\n\n").unwrap();
    assert_eq!(
        nodes,
        vec![Node::Paragraph {
            content: vec![text("hi")],
        }]
    );
}

#[test]
fn test_midline_hash_does_not_start_a_heading() {
    let nodes = parse("hello # world\n\n").unwrap();
    assert_eq!(nodes.len(), 1);
    assert!(matches!(nodes[0], Node::Paragraph { .. }));
    assert_eq!(flatten(&nodes), "hello # world");
}

#[test]
fn test_midline_quote_marker_does_not_start_a_quote() {
    let nodes = parse("no > quote here\n\n").unwrap();
    assert!(matches!(nodes[0], Node::Paragraph { .. }));
}

#[test]
fn test_midline_bullet_does_not_start_a_list() {
    let nodes = parse("one - two - three\n\n").unwrap();
    assert!(matches!(nodes[0], Node::Paragraph { .. }));
}

// ============================================================================
// Lists
// ============================================================================

#[test]
fn test_tight_list() {
    assert_eq!(
        parse("* hi\n* there\n\n").unwrap(),
        vec![Node::List {
            ordered: false,
            start: None,
            items: vec![vec![text("hi\n")], vec![text("there\n")]],
        }]
    );
}

#[test]
fn test_ordered_list_start() {
    assert_eq!(
        parse("3. a\n4. b\n\n").unwrap(),
        vec![Node::List {
            ordered: true,
            start: Some(3),
            items: vec![vec![text("a\n")], vec![text("b\n")]],
        }]
    );
}

#[test]
fn test_loose_list_wraps_items_in_paragraphs() {
    assert_eq!(
        parse(" * a\n\n * b\n\n").unwrap(),
        vec![Node::List {
            ordered: false,
            start: None,
            items: vec![
                vec![Node::Paragraph {
                    content: vec![text("a")],
                }],
                vec![Node::Paragraph {
                    content: vec![text("b")],
                }],
            ],
        }]
    );
}

#[test]
fn test_semi_loose_list_classifies_items_independently() {
    let nodes = parse("* a\n* b\n\n* c\n\n").unwrap();
    match &nodes[0] {
        Node::List { items, .. } => {
            assert_eq!(items.len(), 3);
            assert_eq!(items[0], vec![text("a\n")]);
            assert_eq!(
                items[1],
                vec![Node::Paragraph {
                    content: vec![text("b")],
                }]
            );
            // the last item inherits looseness from the one before it
            assert_eq!(
                items[2],
                vec![Node::Paragraph {
                    content: vec![text("c")],
                }]
            );
        }
        other => panic!("expected list, got {other:?}"),
    }
}

#[test]
fn test_nested_list() {
    let nodes = parse("* a\n  * b\n\n").unwrap();
    match &nodes[0] {
        Node::List { items, .. } => {
            assert_eq!(items.len(), 1);
            assert_eq!(items[0][0], text("a\n"));
            match &items[0][1] {
                Node::List { items: inner, .. } => {
                    assert_eq!(inner[0], vec![text("b\n")]);
                }
                other => panic!("expected nested list, got {other:?}"),
            }
        }
        other => panic!("expected list, got {other:?}"),
    }
}

#[test]
fn test_list_item_continuation_lines() {
    assert_eq!(
        parse("* line one\n  continued\n\n").unwrap(),
        vec![Node::List {
            ordered: false,
            start: None,
            items: vec![vec![text("line one\ncontinued\n")]],
        }]
    );
}

#[test]
fn test_mixed_bullet_characters_stay_one_list() {
    match &parse("+ a\n- b\n\n").unwrap()[0] {
        Node::List { ordered, items, .. } => {
            assert!(!ordered);
            assert_eq!(items.len(), 2);
        }
        other => panic!("expected list, got {other:?}"),
    }
}

#[test]
fn test_loose_item_with_two_paragraphs() {
    let nodes = parse("* a\n\n  second\n\n* b\n\n").unwrap();
    match &nodes[0] {
        Node::List { items, .. } => {
            assert_eq!(items.len(), 2);
            assert_eq!(
                items[0],
                vec![
                    Node::Paragraph {
                        content: vec![text("a")],
                    },
                    Node::Paragraph {
                        content: vec![text("second")],
                    },
                ]
            );
        }
        other => panic!("expected list, got {other:?}"),
    }
}

#[test]
fn test_list_followed_by_paragraph() {
    let nodes = parse("* a\n* b\n\nafter\n\n").unwrap();
    assert_eq!(nodes.len(), 2);
    assert!(matches!(nodes[0], Node::List { .. }));
    assert!(matches!(nodes[1], Node::Paragraph { .. }));
}

// ============================================================================
// Tables
// ============================================================================

#[test]
fn test_table_with_alignment_and_body() {
    let nodes = parse("| h1 | h2 |\n| :- | -: |\n| a | b |\n\n").unwrap();
    assert_eq!(
        nodes,
        vec![Node::Table {
            header: vec![vec![text("h1")], vec![text("h2")]],
            align: vec![Some(Alignment::Left), Some(Alignment::Right)],
            cells: vec![vec![vec![text("a")], vec![text("b")]]],
        }]
    );
}

#[test]
fn test_table_alignment_variants() {
    let nodes = parse("| a | b | c | d |\n| :-: | :- | -: | - |\n\n").unwrap();
    match &nodes[0] {
        Node::Table { align, cells, .. } => {
            assert_eq!(
                align,
                &vec![
                    Some(Alignment::Center),
                    Some(Alignment::Left),
                    Some(Alignment::Right),
                    None,
                ]
            );
            assert!(cells.is_empty());
        }
        other => panic!("expected table, got {other:?}"),
    }
}

#[test]
fn test_table_without_outer_pipes() {
    let nodes = parse("h1 | h2\n- | -\na | b\n\n").unwrap();
    match &nodes[0] {
        Node::Table {
            header,
            align,
            cells,
        } => {
            assert_eq!(header, &vec![vec![text("h1")], vec![text("h2")]]);
            assert_eq!(align, &vec![None, None]);
            assert_eq!(cells, &vec![vec![vec![text("a")], vec![text("b")]]]);
        }
        other => panic!("expected table, got {other:?}"),
    }
}

#[test]
fn test_table_cell_with_escaped_pipe() {
    let nodes = parse("| a \\| b | c |\n| - | - |\n\n").unwrap();
    match &nodes[0] {
        Node::Table { header, .. } => {
            assert_eq!(header.len(), 2);
            assert_eq!(flatten(&header[0]), "a | b");
        }
        other => panic!("expected table, got {other:?}"),
    }
}

#[test]
fn test_table_align_padded_to_header_width() {
    let nodes = parse("| a | b | c |\n| :- |\n\n").unwrap();
    match &nodes[0] {
        Node::Table { header, align, .. } => {
            assert_eq!(header.len(), 3);
            assert_eq!(align, &vec![Some(Alignment::Left), None, None]);
        }
        other => panic!("expected table, got {other:?}"),
    }
}

#[test]
fn test_pipeless_text_is_not_a_table() {
    let nodes = parse("| not table\njust text\n\n").unwrap();
    assert!(matches!(nodes[0], Node::Paragraph { .. }));
}

#[test]
fn test_table_cells_parse_emphasis() {
    let nodes = parse("| **h** |\n| - |\n| *x* |\n\n").unwrap();
    match &nodes[0] {
        Node::Table { header, cells, .. } => {
            assert_eq!(
                header[0],
                vec![Node::Strong {
                    content: vec![text("h")],
                }]
            );
            assert_eq!(
                cells[0][0],
                vec![Node::Em {
                    content: vec![text("x")],
                }]
            );
        }
        other => panic!("expected table, got {other:?}"),
    }
}

// ============================================================================
// Mixed Documents
// ============================================================================

#[test]
fn test_document_with_mixed_blocks() {
    let doc = "# Title\n\nIntro text.\n\n* one\n* two\n\n> quoted\n\n---\n\n    code\n\n";
    let nodes = parse(doc).unwrap();
    assert!(matches!(nodes[0], Node::Heading { level: 1, .. }));
    assert!(matches!(nodes[1], Node::Paragraph { .. }));
    assert!(matches!(nodes[2], Node::List { .. }));
    assert!(matches!(nodes[3], Node::BlockQuote { .. }));
    assert!(matches!(nodes[4], Node::Hr));
    assert!(matches!(nodes[5], Node::CodeBlock { .. }));
    assert_eq!(nodes.len(), 6);
}

#[test]
fn test_paragraph_with_every_inline_kind() {
    let nodes = parse("a *b* **c** `d` [e](/f) ~~g~~\n\n").unwrap();
    match &nodes[0] {
        Node::Paragraph { content } => {
            assert!(content.iter().any(|n| matches!(n, Node::Em { .. })));
            assert!(content.iter().any(|n| matches!(n, Node::Strong { .. })));
            assert!(content.iter().any(|n| matches!(n, Node::InlineCode { .. })));
            assert!(content.iter().any(|n| matches!(n, Node::Link { .. })));
            assert!(content.iter().any(|n| matches!(n, Node::Del { .. })));
        }
        other => panic!("expected paragraph, got {other:?}"),
    }
}

// ============================================================================
// Engine Properties
// ============================================================================

#[test]
fn test_parse_is_deterministic() {
    let doc = "# h\n\n* a\n\n* b\n\n| x |\n| - |\n\n[r][1]\n\n[1]: /t\n\n";
    assert_eq!(parse(doc).unwrap(), parse(doc).unwrap());
}

#[test]
fn test_grammar_is_total_on_adversarial_input() {
    let inputs = [
        "*",
        "**",
        "``",
        "[",
        "]ature",
        "~~~",
        "\\",
        "![",
        "<>",
        "___",
        "|||\n",
        "1.",
        "> ",
        "   ",
        "*a **b",
    ];
    for input in inputs {
        assert!(parse(input).is_ok(), "failed on {input:?}");
    }
}

#[test]
fn test_label_normalization_is_idempotent() {
    use rulemark_core::normalize_label;
    for label in [" H    i ", "AbC", "  a\t b  ", "x"] {
        let once = normalize_label(label);
        assert_eq!(normalize_label(&once), once);
    }
}

#[test]
fn test_custom_rule_set_restricts_the_grammar() {
    use rulemark_core::rules::inline::Text;
    let parser = Parser::with_rules(vec![Box::new(Text)]);
    let nodes = parser.parse_inline("**x**").unwrap();
    assert!(nodes.iter().all(|n| matches!(n, Node::Text { .. })));
    assert_eq!(flatten(&nodes), "**x**");
}

#[test]
fn test_empty_rule_set_reports_exhaustion() {
    let parser = Parser::with_rules(Vec::new());
    let err = parser.parse_inline("x").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::RuleExhaustion);
}

#[test]
fn test_builtin_registry_matches_default_parser() {
    let doc = "# h\n\ntext\n\n";
    let custom = Parser::with_rules(rulemark_core::rules::builtin_rules());
    assert_eq!(custom.parse(doc).unwrap(), parse(doc).unwrap());
}
