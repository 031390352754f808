use std::ops::Range;

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::config::ParseConfig;
use crate::token::Token;

/// Strip YAML frontmatter from the beginning of markdown content.
///
/// The block must open with a `---` line followed by a non-blank line and end
/// with another whole `---` line. Anything else is left for the parser, so a
/// leading thematic break is kept.
fn strip_frontmatter(markdown: &str) -> &str {
    let is_delimiter = |line: &str| line.trim_end_matches(['\r', '\n']) == "---";

    let mut offset = 0;
    for (index, line) in markdown.split_inclusive('\n').enumerate() {
        offset += line.len();
        match index {
            0 if !is_delimiter(line) => return markdown,
            // A blank line after the opener means a rule, not YAML
            1 if line.trim().is_empty() || is_delimiter(line) => return markdown,
            0 | 1 => {}
            _ if is_delimiter(line) => {
                return markdown[offset..].trim_start_matches(['\r', '\n']);
            }
            _ => {}
        }
    }
    markdown
}

fn options(config: &ParseConfig) -> Options {
    let mut options = Options::empty();
    if config.tables {
        options.insert(Options::ENABLE_TABLES);
    }
    if config.strikethrough {
        options.insert(Options::ENABLE_STRIKETHROUGH);
    }
    if config.tasklists {
        options.insert(Options::ENABLE_TASKLISTS);
    }
    if config.footnotes {
        options.insert(Options::ENABLE_FOOTNOTES);
    }
    options
}

/// Tokenize markdown text into the flat token stream.
///
/// Block structure becomes open/close tokens. Everything between the start
/// and end of a paragraph, heading or table cell is gathered into one
/// `Token::Inline` whose `content` is the source text it covers.
pub fn tokenize(markdown: &str, config: &ParseConfig) -> Vec<Token> {
    let markdown = if config.strip_frontmatter {
        strip_frontmatter(markdown)
    } else {
        markdown
    };
    let parser = Parser::new_ext(markdown, options(config));
    let mut state = TokenizeState::new(markdown, &config.link_target);

    for (event, range) in parser.into_offset_iter() {
        state.process_event(event, range);
    }

    state.finish()
}

struct TokenizeState<'a> {
    source: &'a str,
    link_target: &'a str,
    tokens: Vec<Token>,

    // Inline content being gathered
    run: Option<InlineRun>,

    // Raw block content
    code_block: Option<CodeBuilder>,
    html_block: Option<String>,

    // Table state
    alignments: Vec<u8>,
    cell_index: usize,
    in_table_head: bool,
    in_table_body: bool,
}

struct InlineRun {
    span: Option<Range<usize>>,
    children: Vec<Token>,
    // Images whose caption is still open, innermost last
    images: Vec<ImageBuilder>,
    // Opened for a tight list item rather than a real paragraph
    synthetic: bool,
}

struct ImageBuilder {
    src: String,
    title: String,
    tokens: Vec<Token>,
}

struct CodeBuilder {
    params: Option<String>,
    content: String,
}

impl InlineRun {
    fn new(synthetic: bool) -> Self {
        Self {
            span: None,
            children: Vec::new(),
            images: Vec::new(),
            synthetic,
        }
    }

    fn extend(&mut self, range: Range<usize>) {
        self.span = Some(match self.span.take() {
            Some(span) => span.start.min(range.start)..span.end.max(range.end),
            None => range,
        });
    }

    fn push(&mut self, token: Token) {
        match self.images.last_mut() {
            Some(image) => image.tokens.push(token),
            None => self.children.push(token),
        }
    }

    fn close_image(&mut self) {
        if let Some(image) = self.images.pop() {
            self.push(Token::Image {
                src: image.src,
                title: image.title,
                tokens: image.tokens,
            });
        }
    }

    fn into_token(mut self, source: &str) -> Token {
        while !self.images.is_empty() {
            self.close_image();
        }
        let content = self
            .span
            .and_then(|span| source.get(span))
            .unwrap_or_default()
            .to_string();
        Token::Inline {
            content,
            children: self.children,
        }
    }
}

impl<'a> TokenizeState<'a> {
    fn new(source: &'a str, link_target: &'a str) -> Self {
        Self {
            source,
            link_target,
            tokens: Vec::new(),
            run: None,
            code_block: None,
            html_block: None,
            alignments: Vec::new(),
            cell_index: 0,
            in_table_head: false,
            in_table_body: false,
        }
    }

    fn finish(mut self) -> Vec<Token> {
        self.flush_run();
        self.tokens
    }

    fn process_event(&mut self, event: Event<'_>, range: Range<usize>) {
        match event {
            Event::Start(tag) => self.start(tag, range),
            Event::End(tag) => self.end(tag, range),

            Event::Text(text) => match self.code_block.as_mut() {
                Some(code) => code.content.push_str(&text),
                None => self.inline(
                    Token::Text {
                        content: text.into_string(),
                    },
                    range,
                ),
            },
            Event::Code(code) => self.inline(
                Token::CodeInline {
                    content: code.into_string(),
                },
                range,
            ),
            Event::Html(html) => match self.html_block.as_mut() {
                Some(block) => block.push_str(&html),
                None => self.block(Token::HTMLBlock {
                    content: html.into_string(),
                }),
            },
            Event::InlineHtml(html) => self.inline(
                Token::HTMLInline {
                    content: html.into_string(),
                },
                range,
            ),
            Event::SoftBreak => self.inline(Token::Softbreak, range),
            Event::HardBreak => self.inline(Token::Hardbreak, range),
            Event::Rule => self.block(Token::Hr),

            // Tokens the converter does not map, kept so the stream stays faithful
            Event::TaskListMarker(checked) => self.leaf(Token::TaskListMarker { checked }),
            Event::FootnoteReference(label) => self.inline(
                Token::FootnoteReference {
                    label: label.into_string(),
                },
                range,
            ),
            Event::InlineMath(math) => self.inline(
                Token::Math {
                    display: false,
                    content: math.into_string(),
                },
                range,
            ),
            Event::DisplayMath(math) => self.inline(
                Token::Math {
                    display: true,
                    content: math.into_string(),
                },
                range,
            ),
        }
    }

    fn start(&mut self, tag: Tag<'_>, range: Range<usize>) {
        match tag {
            Tag::Paragraph => {
                self.block(Token::ParagraphOpen { tight: false });
                self.run = Some(InlineRun::new(false));
            }
            Tag::Heading { level, .. } => {
                self.block(Token::HeadingOpen {
                    level: heading_level_to_u8(level),
                });
                self.run = Some(InlineRun::new(false));
            }
            Tag::BlockQuote(_) => self.block(Token::BlockquoteOpen),
            Tag::CodeBlock(kind) => {
                self.close_synthetic();
                let params = match kind {
                    CodeBlockKind::Fenced(info) => Some(info.into_string()),
                    CodeBlockKind::Indented => None,
                };
                self.code_block = Some(CodeBuilder {
                    params,
                    content: String::new(),
                });
            }
            Tag::HtmlBlock => {
                self.close_synthetic();
                self.html_block = Some(String::new());
            }
            Tag::List(Some(order)) => self.block(Token::OrderedListOpen { order }),
            Tag::List(None) => self.block(Token::BulletListOpen),
            Tag::Item => self.block(Token::ListItemOpen),
            Tag::FootnoteDefinition(label) => self.block(Token::FootnoteDefinitionOpen {
                label: label.into_string(),
            }),

            // Tables
            Tag::Table(alignments) => {
                self.alignments = alignments.into_iter().map(alignment_code).collect();
                self.in_table_body = false;
                self.block(Token::TableOpen);
            }
            Tag::TableHead => {
                self.in_table_head = true;
                self.cell_index = 0;
                self.tokens.push(Token::TheadOpen);
                // pulldown-cmark puts header cells directly in the head
                self.tokens.push(Token::TrOpen);
            }
            Tag::TableRow => {
                if !self.in_table_body {
                    self.in_table_body = true;
                    self.tokens.push(Token::TbodyOpen);
                }
                self.cell_index = 0;
                self.tokens.push(Token::TrOpen);
            }
            Tag::TableCell => {
                let align = self.alignments.get(self.cell_index).copied().unwrap_or(0);
                self.tokens.push(if self.in_table_head {
                    Token::ThOpen { align }
                } else {
                    Token::TdOpen { align }
                });
                self.run = Some(InlineRun::new(false));
            }

            // Inline enclosures
            Tag::Emphasis => self.inline(Token::EmphasisOpen, range),
            Tag::Strong => self.inline(Token::StrongOpen, range),
            Tag::Strikethrough => self.inline(Token::StrikethroughOpen, range),
            Tag::Link {
                dest_url, title, ..
            } => {
                let token = Token::LinkOpen {
                    href: dest_url.into_string(),
                    title: title.into_string(),
                    target: self.link_target.to_string(),
                };
                self.inline(token, range);
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                let run = self.open_run(range);
                run.images.push(ImageBuilder {
                    src: dest_url.into_string(),
                    title: title.into_string(),
                    tokens: Vec::new(),
                });
            }

            other => log::debug!("dropping unsupported tag {other:?}"),
        }
    }

    fn end(&mut self, tag: TagEnd, range: Range<usize>) {
        match tag {
            TagEnd::Paragraph => {
                self.flush_run();
                self.tokens.push(Token::ParagraphClose);
            }
            TagEnd::Heading(_) => {
                self.flush_run();
                self.tokens.push(Token::HeadingClose);
            }
            TagEnd::BlockQuote(_) => self.block(Token::BlockquoteClose),
            TagEnd::CodeBlock => {
                if let Some(code) = self.code_block.take() {
                    self.tokens.push(match code.params {
                        Some(params) => Token::Fence {
                            params,
                            content: code.content,
                        },
                        None => Token::CodeBlock {
                            content: code.content,
                        },
                    });
                }
            }
            TagEnd::HtmlBlock => {
                if let Some(content) = self.html_block.take() {
                    self.tokens.push(Token::HTMLBlock { content });
                }
            }
            TagEnd::List(true) => self.block(Token::OrderedListClose),
            TagEnd::List(false) => self.block(Token::BulletListClose),
            TagEnd::Item => self.block(Token::ListItemClose),
            TagEnd::FootnoteDefinition => self.block(Token::FootnoteDefinitionClose),

            TagEnd::Table => {
                if self.in_table_body {
                    self.in_table_body = false;
                    self.tokens.push(Token::TbodyClose);
                }
                self.alignments.clear();
                self.tokens.push(Token::TableClose);
            }
            TagEnd::TableHead => {
                self.in_table_head = false;
                self.tokens.push(Token::TrClose);
                self.tokens.push(Token::TheadClose);
            }
            TagEnd::TableRow => self.tokens.push(Token::TrClose),
            TagEnd::TableCell => {
                self.flush_run();
                self.tokens.push(if self.in_table_head {
                    Token::ThClose
                } else {
                    Token::TdClose
                });
                self.cell_index += 1;
            }

            TagEnd::Emphasis => self.inline(Token::EmphasisClose, range),
            TagEnd::Strong => self.inline(Token::StrongClose, range),
            TagEnd::Strikethrough => self.inline(Token::StrikethroughClose, range),
            TagEnd::Link => self.inline(Token::LinkClose, range),
            TagEnd::Image => {
                if let Some(run) = self.run.as_mut() {
                    run.close_image();
                }
            }

            other => log::debug!("dropping unsupported tag end {other:?}"),
        }
    }

    /// Push a block-level token, ending any tight-list paragraph first.
    fn block(&mut self, token: Token) {
        self.close_synthetic();
        self.tokens.push(token);
    }

    /// Push an inline token into the current run, opening one if needed.
    fn inline(&mut self, token: Token, range: Range<usize>) {
        self.open_run(range).push(token);
    }

    /// Push into the open run if there is one, otherwise at block level.
    fn leaf(&mut self, token: Token) {
        match self.run.as_mut() {
            Some(run) => run.push(token),
            None => self.tokens.push(token),
        }
    }

    fn open_run(&mut self, range: Range<usize>) -> &mut InlineRun {
        // Tight list items carry inline content without paragraph events
        if self.run.is_none() {
            self.tokens.push(Token::ParagraphOpen { tight: true });
        }
        let run = self.run.get_or_insert_with(|| InlineRun::new(true));
        run.extend(range);
        run
    }

    fn close_synthetic(&mut self) {
        if self.run.as_ref().is_some_and(|run| run.synthetic) {
            self.flush_run();
        }
    }

    fn flush_run(&mut self) {
        if let Some(run) = self.run.take() {
            let synthetic = run.synthetic;
            self.tokens.push(run.into_token(self.source));
            if synthetic {
                self.tokens.push(Token::ParagraphClose);
            }
        }
    }
}

fn alignment_code(alignment: pulldown_cmark::Alignment) -> u8 {
    match alignment {
        pulldown_cmark::Alignment::None => 0,
        pulldown_cmark::Alignment::Left => 1,
        pulldown_cmark::Alignment::Center => 2,
        pulldown_cmark::Alignment::Right => 3,
    }
}

fn heading_level_to_u8(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
