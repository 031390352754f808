//! The token vocabulary produced by the tokenizer front end.
//!
//! Tokens are flat lexical events: block structure is expressed by
//! `*Open`/`*Close` pairs, and only `Image` and `Inline` carry nested token
//! lists.

/// One lexical event from the tokenizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    BlockquoteOpen,
    BlockquoteClose,
    BulletListOpen,
    BulletListClose,
    EmphasisOpen,
    EmphasisClose,
    ListItemOpen,
    ListItemClose,
    StrikethroughOpen,
    StrikethroughClose,
    StrongOpen,
    StrongClose,
    TableOpen,
    TableClose,
    TbodyOpen,
    TbodyClose,
    TheadOpen,
    TheadClose,
    TrOpen,
    TrClose,
    HeadingOpen {
        level: u8,
    },
    HeadingClose,
    LinkOpen {
        href: String,
        title: String,
        target: String,
    },
    LinkClose,
    OrderedListOpen {
        order: u64,
    },
    OrderedListClose,
    ParagraphOpen {
        tight: bool,
    },
    ParagraphClose,
    /// Data cell. `align` is the wire alignment code (0 none, 1 left, 2 center, 3 right).
    TdOpen {
        align: u8,
    },
    TdClose,
    /// Header cell, same alignment coding as `TdOpen`.
    ThOpen {
        align: u8,
    },
    ThClose,
    CodeBlock {
        content: String,
    },
    CodeInline {
        content: String,
    },
    HTMLBlock {
        content: String,
    },
    HTMLInline {
        content: String,
    },
    Text {
        content: String,
    },
    Softbreak,
    Hardbreak,
    Hr,
    Fence {
        params: String,
        content: String,
    },
    Image {
        src: String,
        title: String,
        tokens: Vec<Token>,
    },
    Inline {
        content: String,
        children: Vec<Token>,
    },
    TaskListMarker {
        checked: bool,
    },
    FootnoteReference {
        label: String,
    },
    FootnoteDefinitionOpen {
        label: String,
    },
    FootnoteDefinitionClose,
    Math {
        display: bool,
        content: String,
    },
}

impl Token {
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::BlockquoteOpen => TokenKind::BlockquoteOpen,
            Token::BlockquoteClose => TokenKind::BlockquoteClose,
            Token::BulletListOpen => TokenKind::BulletListOpen,
            Token::BulletListClose => TokenKind::BulletListClose,
            Token::EmphasisOpen => TokenKind::EmphasisOpen,
            Token::EmphasisClose => TokenKind::EmphasisClose,
            Token::ListItemOpen => TokenKind::ListItemOpen,
            Token::ListItemClose => TokenKind::ListItemClose,
            Token::StrikethroughOpen => TokenKind::StrikethroughOpen,
            Token::StrikethroughClose => TokenKind::StrikethroughClose,
            Token::StrongOpen => TokenKind::StrongOpen,
            Token::StrongClose => TokenKind::StrongClose,
            Token::TableOpen => TokenKind::TableOpen,
            Token::TableClose => TokenKind::TableClose,
            Token::TbodyOpen => TokenKind::TbodyOpen,
            Token::TbodyClose => TokenKind::TbodyClose,
            Token::TheadOpen => TokenKind::TheadOpen,
            Token::TheadClose => TokenKind::TheadClose,
            Token::TrOpen => TokenKind::TrOpen,
            Token::TrClose => TokenKind::TrClose,
            Token::HeadingOpen { .. } => TokenKind::HeadingOpen,
            Token::HeadingClose => TokenKind::HeadingClose,
            Token::LinkOpen { .. } => TokenKind::LinkOpen,
            Token::LinkClose => TokenKind::LinkClose,
            Token::OrderedListOpen { .. } => TokenKind::OrderedListOpen,
            Token::OrderedListClose => TokenKind::OrderedListClose,
            Token::ParagraphOpen { .. } => TokenKind::ParagraphOpen,
            Token::ParagraphClose => TokenKind::ParagraphClose,
            Token::TdOpen { .. } => TokenKind::TdOpen,
            Token::TdClose => TokenKind::TdClose,
            Token::ThOpen { .. } => TokenKind::ThOpen,
            Token::ThClose => TokenKind::ThClose,
            Token::CodeBlock { .. } => TokenKind::CodeBlock,
            Token::CodeInline { .. } => TokenKind::CodeInline,
            Token::HTMLBlock { .. } => TokenKind::HTMLBlock,
            Token::HTMLInline { .. } => TokenKind::HTMLInline,
            Token::Text { .. } => TokenKind::Text,
            Token::Softbreak => TokenKind::Softbreak,
            Token::Hardbreak => TokenKind::Hardbreak,
            Token::Hr => TokenKind::Hr,
            Token::Fence { .. } => TokenKind::Fence,
            Token::Image { .. } => TokenKind::Image,
            Token::Inline { .. } => TokenKind::Inline,
            Token::TaskListMarker { .. } => TokenKind::TaskListMarker,
            Token::FootnoteReference { .. } => TokenKind::FootnoteReference,
            Token::FootnoteDefinitionOpen { .. } => TokenKind::FootnoteDefinitionOpen,
            Token::FootnoteDefinitionClose => TokenKind::FootnoteDefinitionClose,
            Token::Math { .. } => TokenKind::Math,
        }
    }

    /// Shorthand for a plain text token.
    pub fn text(content: impl Into<String>) -> Self {
        Token::Text {
            content: content.into(),
        }
    }
}

/// Field-less discriminant of [`Token`], used for diagnostics and XML tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    BlockquoteOpen,
    BlockquoteClose,
    BulletListOpen,
    BulletListClose,
    EmphasisOpen,
    EmphasisClose,
    ListItemOpen,
    ListItemClose,
    StrikethroughOpen,
    StrikethroughClose,
    StrongOpen,
    StrongClose,
    TableOpen,
    TableClose,
    TbodyOpen,
    TbodyClose,
    TheadOpen,
    TheadClose,
    TrOpen,
    TrClose,
    HeadingOpen,
    HeadingClose,
    LinkOpen,
    LinkClose,
    OrderedListOpen,
    OrderedListClose,
    ParagraphOpen,
    ParagraphClose,
    TdOpen,
    TdClose,
    ThOpen,
    ThClose,
    CodeBlock,
    CodeInline,
    HTMLBlock,
    HTMLInline,
    Text,
    Softbreak,
    Hardbreak,
    Hr,
    Fence,
    Image,
    Inline,
    TaskListMarker,
    FootnoteReference,
    FootnoteDefinitionOpen,
    FootnoteDefinitionClose,
    Math,
}

impl TokenKind {
    pub const COUNT: usize = 48;

    pub const ALL: [TokenKind; Self::COUNT] = [
        TokenKind::BlockquoteOpen,
        TokenKind::BlockquoteClose,
        TokenKind::BulletListOpen,
        TokenKind::BulletListClose,
        TokenKind::EmphasisOpen,
        TokenKind::EmphasisClose,
        TokenKind::ListItemOpen,
        TokenKind::ListItemClose,
        TokenKind::StrikethroughOpen,
        TokenKind::StrikethroughClose,
        TokenKind::StrongOpen,
        TokenKind::StrongClose,
        TokenKind::TableOpen,
        TokenKind::TableClose,
        TokenKind::TbodyOpen,
        TokenKind::TbodyClose,
        TokenKind::TheadOpen,
        TokenKind::TheadClose,
        TokenKind::TrOpen,
        TokenKind::TrClose,
        TokenKind::HeadingOpen,
        TokenKind::HeadingClose,
        TokenKind::LinkOpen,
        TokenKind::LinkClose,
        TokenKind::OrderedListOpen,
        TokenKind::OrderedListClose,
        TokenKind::ParagraphOpen,
        TokenKind::ParagraphClose,
        TokenKind::TdOpen,
        TokenKind::TdClose,
        TokenKind::ThOpen,
        TokenKind::ThClose,
        TokenKind::CodeBlock,
        TokenKind::CodeInline,
        TokenKind::HTMLBlock,
        TokenKind::HTMLInline,
        TokenKind::Text,
        TokenKind::Softbreak,
        TokenKind::Hardbreak,
        TokenKind::Hr,
        TokenKind::Fence,
        TokenKind::Image,
        TokenKind::Inline,
        TokenKind::TaskListMarker,
        TokenKind::FootnoteReference,
        TokenKind::FootnoteDefinitionOpen,
        TokenKind::FootnoteDefinitionClose,
        TokenKind::Math,
    ];

    const NAMES: [&'static str; Self::COUNT] = [
        "BlockquoteOpen",
        "BlockquoteClose",
        "BulletListOpen",
        "BulletListClose",
        "EmphasisOpen",
        "EmphasisClose",
        "ListItemOpen",
        "ListItemClose",
        "StrikethroughOpen",
        "StrikethroughClose",
        "StrongOpen",
        "StrongClose",
        "TableOpen",
        "TableClose",
        "TbodyOpen",
        "TbodyClose",
        "TheadOpen",
        "TheadClose",
        "TrOpen",
        "TrClose",
        "HeadingOpen",
        "HeadingClose",
        "LinkOpen",
        "LinkClose",
        "OrderedListOpen",
        "OrderedListClose",
        "ParagraphOpen",
        "ParagraphClose",
        "TdOpen",
        "TdClose",
        "ThOpen",
        "ThClose",
        "CodeBlock",
        "CodeInline",
        "HTMLBlock",
        "HTMLInline",
        "Text",
        "Softbreak",
        "Hardbreak",
        "Hr",
        "Fence",
        "Image",
        "Inline",
        "TaskListMarker",
        "FootnoteReference",
        "FootnoteDefinitionOpen",
        "FootnoteDefinitionClose",
        "Math",
    ];

    pub fn name(self) -> &'static str {
        Self::NAMES[self as usize]
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
