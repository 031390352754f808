use crate::node::{Alignment, BreakKind, ContentKind, EnclosureConfig, EnclosureKind, Node};
use crate::token::{Token, TokenKind};

/// Result of classifying a single token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Converted {
    Node(Node),
    /// The token kind has no node mapping and was dropped.
    Unrecognized(TokenKind),
}

/// A token that was dropped during conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    pub kind: TokenKind,
    /// Index path to the token: one entry per nesting level, outermost first.
    pub path: Vec<usize>,
}

/// Output of [`convert_all`]: the converted nodes plus every dropped token,
/// including those dropped from nested image captions and inline runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversion {
    pub nodes: Vec<Node>,
    pub skipped: Vec<Skipped>,
}

/// Convert one token. Nested tokens of `Image` and `Inline` are converted
/// recursively; anything dropped inside them is logged but not returned. Use
/// [`convert_all`] to collect those diagnostics.
pub fn convert(token: &Token) -> Converted {
    let mut skipped = Vec::new();
    convert_at(token, &mut Vec::new(), &mut skipped)
}

/// Convert a token sequence, preserving order. Unrecognized tokens are
/// dropped and reported in [`Conversion::skipped`].
pub fn convert_all(tokens: &[Token]) -> Conversion {
    let mut skipped = Vec::new();
    let nodes = convert_nested(tokens, &mut Vec::new(), &mut skipped);
    Conversion { nodes, skipped }
}

fn convert_nested(
    tokens: &[Token],
    path: &mut Vec<usize>,
    skipped: &mut Vec<Skipped>,
) -> Vec<Node> {
    let mut nodes = Vec::with_capacity(tokens.len());
    for (index, token) in tokens.iter().enumerate() {
        path.push(index);
        match convert_at(token, path, skipped) {
            Converted::Node(node) => nodes.push(node),
            Converted::Unrecognized(kind) => {
                log::warn!("skipping unrecognized token {kind} at {path:?}");
                skipped.push(Skipped {
                    kind,
                    path: path.clone(),
                });
            }
        }
        path.pop();
    }
    nodes
}

fn convert_at(token: &Token, path: &mut Vec<usize>, skipped: &mut Vec<Skipped>) -> Converted {
    use EnclosureKind as E;

    let node = match token {
        // Enclosures without extra state
        Token::BlockquoteOpen => Node::open(E::Blockquote),
        Token::BlockquoteClose => Node::close(E::Blockquote),
        Token::BulletListOpen => Node::open(E::BulletList),
        Token::BulletListClose => Node::close(E::BulletList),
        Token::EmphasisOpen => Node::open(E::Emphasis),
        Token::EmphasisClose => Node::close(E::Emphasis),
        Token::ListItemOpen => Node::open(E::ListItem),
        Token::ListItemClose => Node::close(E::ListItem),
        Token::StrikethroughOpen => Node::open(E::Strikethrough),
        Token::StrikethroughClose => Node::close(E::Strikethrough),
        Token::StrongOpen => Node::open(E::Strong),
        Token::StrongClose => Node::close(E::Strong),
        Token::TableOpen => Node::open(E::Table),
        Token::TableClose => Node::close(E::Table),
        Token::TbodyOpen => Node::open(E::TableBody),
        Token::TbodyClose => Node::close(E::TableBody),
        Token::TheadOpen => Node::open(E::TableHead),
        Token::TheadClose => Node::close(E::TableHead),
        Token::TrOpen => Node::open(E::TableRow),
        Token::TrClose => Node::close(E::TableRow),

        // Enclosures with configuration
        Token::HeadingOpen { level } => Node::Open {
            kind: E::Heading,
            config: EnclosureConfig::Heading { level: *level },
        },
        Token::HeadingClose => Node::close(E::Heading),
        Token::LinkOpen {
            href,
            title,
            target,
        } => Node::Open {
            kind: E::Link,
            config: EnclosureConfig::Link {
                href: href.clone(),
                title: title.clone(),
                target: target.clone(),
            },
        },
        Token::LinkClose => Node::close(E::Link),
        Token::OrderedListOpen { order } => Node::Open {
            kind: E::OrderedList,
            config: EnclosureConfig::OrderedList { order: *order },
        },
        Token::OrderedListClose => Node::close(E::OrderedList),
        Token::ParagraphOpen { tight } => Node::Open {
            kind: E::Paragraph,
            config: EnclosureConfig::Paragraph { tight: *tight },
        },
        Token::ParagraphClose => Node::close(E::Paragraph),
        // Header and data cells share one enclosure kind
        Token::TdOpen { align } => cell(false, *align),
        Token::ThOpen { align } => cell(true, *align),
        Token::TdClose | Token::ThClose => Node::close(E::TableCell),

        // Leaf content, copied verbatim
        Token::CodeBlock { content } => Node::content(ContentKind::CodeBlock, content.as_str()),
        Token::CodeInline { content } => Node::content(ContentKind::CodeInline, content.as_str()),
        Token::HTMLBlock { content } => Node::content(ContentKind::HTMLBlock, content.as_str()),
        Token::HTMLInline { content } => Node::content(ContentKind::HTMLInline, content.as_str()),
        Token::Text { content } => Node::content(ContentKind::Text, content.as_str()),

        Token::Softbreak => Node::Break {
            kind: BreakKind::Soft,
        },
        Token::Hardbreak => Node::Break {
            kind: BreakKind::Hard,
        },
        Token::Hr => Node::Break {
            kind: BreakKind::HardRule,
        },

        Token::Fence { params, content } => Node::Fence {
            params: params.clone(),
            text: content.clone(),
        },

        // Composite tokens
        Token::Image { src, title, tokens } => Node::Image {
            src: src.clone(),
            title: title.clone(),
            children: convert_nested(tokens, path, skipped),
        },
        Token::Inline { content, children } => Node::Inline {
            content: content.clone(),
            children: convert_nested(children, path, skipped),
        },

        Token::TaskListMarker { .. }
        | Token::FootnoteReference { .. }
        | Token::FootnoteDefinitionOpen { .. }
        | Token::FootnoteDefinitionClose
        | Token::Math { .. } => return Converted::Unrecognized(token.kind()),
    };
    Converted::Node(node)
}

fn cell(is_head: bool, code: u8) -> Node {
    let align = Alignment::from_code(code).unwrap_or_else(|| {
        log::warn!("alignment code {code} is out of range, treating cell as unaligned");
        Alignment::None
    });
    Node::Open {
        kind: EnclosureKind::TableCell,
        config: EnclosureConfig::Cell { is_head, align },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn node(token: Token) -> Node {
        match convert(&token) {
            Converted::Node(node) => node,
            Converted::Unrecognized(kind) => panic!("{kind} was not converted"),
        }
    }

    fn inline(children: Vec<Token>) -> Token {
        Token::Inline {
            content: String::new(),
            children,
        }
    }

    #[test]
    fn empty_input() {
        assert_eq!(convert_all(&[]), Conversion::default());
    }

    #[rstest]
    #[case(Token::BlockquoteOpen, Token::BlockquoteClose, EnclosureKind::Blockquote)]
    #[case(Token::BulletListOpen, Token::BulletListClose, EnclosureKind::BulletList)]
    #[case(Token::EmphasisOpen, Token::EmphasisClose, EnclosureKind::Emphasis)]
    #[case(Token::ListItemOpen, Token::ListItemClose, EnclosureKind::ListItem)]
    #[case(Token::StrikethroughOpen, Token::StrikethroughClose, EnclosureKind::Strikethrough)]
    #[case(Token::StrongOpen, Token::StrongClose, EnclosureKind::Strong)]
    #[case(Token::TableOpen, Token::TableClose, EnclosureKind::Table)]
    #[case(Token::TbodyOpen, Token::TbodyClose, EnclosureKind::TableBody)]
    #[case(Token::TheadOpen, Token::TheadClose, EnclosureKind::TableHead)]
    #[case(Token::TrOpen, Token::TrClose, EnclosureKind::TableRow)]
    fn symmetric_enclosures(
        #[case] open: Token,
        #[case] close: Token,
        #[case] kind: EnclosureKind,
    ) {
        assert_eq!(node(open), Node::open(kind));
        assert_eq!(node(close), Node::close(kind));
    }

    #[test]
    fn configured_enclosures() {
        assert_eq!(
            node(Token::HeadingOpen { level: 4 }),
            Node::Open {
                kind: EnclosureKind::Heading,
                config: EnclosureConfig::Heading { level: 4 },
            }
        );
        assert_eq!(
            node(Token::LinkOpen {
                href: "https://example.com".into(),
                title: "Example".into(),
                target: "_blank".into(),
            }),
            Node::Open {
                kind: EnclosureKind::Link,
                config: EnclosureConfig::Link {
                    href: "https://example.com".into(),
                    title: "Example".into(),
                    target: "_blank".into(),
                },
            }
        );
        assert_eq!(
            node(Token::OrderedListOpen { order: 7 }),
            Node::Open {
                kind: EnclosureKind::OrderedList,
                config: EnclosureConfig::OrderedList { order: 7 },
            }
        );
        assert_eq!(
            node(Token::ParagraphOpen { tight: true }),
            Node::Open {
                kind: EnclosureKind::Paragraph,
                config: EnclosureConfig::Paragraph { tight: true },
            }
        );
        assert_eq!(node(Token::LinkClose), Node::close(EnclosureKind::Link));
    }

    #[rstest]
    #[case(0, Alignment::None)]
    #[case(1, Alignment::Left)]
    #[case(2, Alignment::Center)]
    #[case(3, Alignment::Right)]
    #[case(9, Alignment::None)]
    fn header_and_data_cells_share_a_kind(#[case] code: u8, #[case] align: Alignment) {
        assert_eq!(
            node(Token::ThOpen { align: code }),
            Node::Open {
                kind: EnclosureKind::TableCell,
                config: EnclosureConfig::Cell { is_head: true, align },
            }
        );
        assert_eq!(
            node(Token::TdOpen { align: code }),
            Node::Open {
                kind: EnclosureKind::TableCell,
                config: EnclosureConfig::Cell { is_head: false, align },
            }
        );
        assert_eq!(node(Token::ThClose), node(Token::TdClose));
    }

    #[test]
    fn leaf_content_is_copied_verbatim() {
        let raw = "  <b>&amp;</b>\n\t\"x\"  ";
        let cases = [
            (Token::CodeBlock { content: raw.into() }, ContentKind::CodeBlock),
            (Token::CodeInline { content: raw.into() }, ContentKind::CodeInline),
            (Token::HTMLBlock { content: raw.into() }, ContentKind::HTMLBlock),
            (Token::HTMLInline { content: raw.into() }, ContentKind::HTMLInline),
            (Token::Text { content: raw.into() }, ContentKind::Text),
        ];
        for (token, kind) in cases {
            assert_eq!(node(token), Node::content(kind, raw));
        }
    }

    #[test]
    fn breaks_and_fences() {
        assert_eq!(node(Token::Softbreak), Node::Break { kind: BreakKind::Soft });
        assert_eq!(node(Token::Hardbreak), Node::Break { kind: BreakKind::Hard });
        assert_eq!(node(Token::Hr), Node::Break { kind: BreakKind::HardRule });
        assert_eq!(
            node(Token::Fence {
                params: "rust linenos".into(),
                content: "fn main() {}\n".into(),
            }),
            Node::Fence {
                params: "rust linenos".into(),
                text: "fn main() {}\n".into(),
            }
        );
    }

    #[test]
    fn image_caption_is_converted_recursively() {
        let token = Token::Image {
            src: "cat.png".into(),
            title: "A cat".into(),
            tokens: vec![Token::text("a"), Token::text("b")],
        };
        assert_eq!(
            node(token),
            Node::Image {
                src: "cat.png".into(),
                title: "A cat".into(),
                children: vec![
                    Node::content(ContentKind::Text, "a"),
                    Node::content(ContentKind::Text, "b"),
                ],
            }
        );
    }

    #[test]
    fn inline_children_follow_top_level_rules() {
        let token = Token::Inline {
            content: "*hi*".into(),
            children: vec![Token::EmphasisOpen, Token::text("hi"), Token::EmphasisClose],
        };
        assert_eq!(
            node(token),
            Node::Inline {
                content: "*hi*".into(),
                children: vec![
                    Node::open(EnclosureKind::Emphasis),
                    Node::content(ContentKind::Text, "hi"),
                    Node::close(EnclosureKind::Emphasis),
                ],
            }
        );
    }

    #[test]
    fn heading_scenario() {
        let tokens = [
            Token::HeadingOpen { level: 2 },
            Token::text("Hi"),
            Token::HeadingClose,
        ];
        assert_eq!(
            convert_all(&tokens).nodes,
            vec![
                Node::Open {
                    kind: EnclosureKind::Heading,
                    config: EnclosureConfig::Heading { level: 2 },
                },
                Node::content(ContentKind::Text, "Hi"),
                Node::close(EnclosureKind::Heading),
            ]
        );
    }

    #[test]
    fn order_and_pairing_are_preserved() {
        let tokens = vec![
            Token::BulletListOpen,
            Token::ListItemOpen,
            Token::ParagraphOpen { tight: true },
            inline(vec![Token::text("one")]),
            Token::ParagraphClose,
            Token::ListItemClose,
            Token::ListItemOpen,
            Token::ListItemClose,
            Token::BulletListClose,
        ];
        let nodes = convert_all(&tokens).nodes;
        assert_eq!(nodes.len(), tokens.len());

        let mut depth = Vec::new();
        for node in &nodes {
            match node {
                Node::Open { kind, .. } => depth.push(*kind),
                Node::Close { kind } => assert_eq!(depth.pop(), Some(*kind)),
                _ => {}
            }
        }
        assert!(depth.is_empty());
    }

    #[test]
    fn unbalanced_input_passes_through() {
        let tokens = [Token::StrongClose, Token::StrongOpen, Token::StrongOpen];
        assert_eq!(
            convert_all(&tokens).nodes,
            vec![
                Node::close(EnclosureKind::Strong),
                Node::open(EnclosureKind::Strong),
                Node::open(EnclosureKind::Strong),
            ]
        );
    }

    #[test]
    fn unrecognized_token_is_skipped_and_reported() {
        let tokens = [
            Token::ListItemOpen,
            Token::TaskListMarker { checked: true },
            Token::text("done"),
            Token::ListItemClose,
        ];
        let conversion = convert_all(&tokens);
        assert_eq!(conversion.nodes.len(), tokens.len() - 1);
        assert_eq!(
            conversion.skipped,
            vec![Skipped {
                kind: TokenKind::TaskListMarker,
                path: vec![1],
            }]
        );
        assert_eq!(conversion.skipped[0].kind.name(), "TaskListMarker");
    }

    #[test]
    fn nested_skips_carry_their_path() {
        let tokens = [
            Token::ParagraphOpen { tight: false },
            inline(vec![
                Token::text("see"),
                Token::FootnoteReference { label: "1".into() },
                Token::Image {
                    src: "x.png".into(),
                    title: String::new(),
                    tokens: vec![Token::Math {
                        display: false,
                        content: "x^2".into(),
                    }],
                },
            ]),
            Token::ParagraphClose,
        ];
        let conversion = convert_all(&tokens);
        assert_eq!(conversion.nodes.len(), 3);
        assert_eq!(
            conversion.skipped,
            vec![
                Skipped {
                    kind: TokenKind::FootnoteReference,
                    path: vec![1, 1],
                },
                Skipped {
                    kind: TokenKind::Math,
                    path: vec![1, 2, 0],
                },
            ]
        );
    }

    #[test]
    fn single_unrecognized_token() {
        assert_eq!(
            convert(&Token::FootnoteDefinitionClose),
            Converted::Unrecognized(TokenKind::FootnoteDefinitionClose)
        );
    }
}
