/// A converted document element.
///
/// Node sequences are flat: structure is implied by `Open`/`Close` ordering.
/// Only `Image` and `Inline` own nested sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Open {
        kind: EnclosureKind,
        config: EnclosureConfig,
    },
    Close {
        kind: EnclosureKind,
    },
    Content {
        kind: ContentKind,
        text: String,
    },
    Break {
        kind: BreakKind,
    },
    Fence {
        params: String,
        text: String,
    },
    Image {
        src: String,
        title: String,
        children: Vec<Node>,
    },
    Inline {
        content: String,
        children: Vec<Node>,
    },
}

impl Node {
    /// An `Open` with no configuration.
    pub fn open(kind: EnclosureKind) -> Self {
        Node::Open {
            kind,
            config: EnclosureConfig::Empty,
        }
    }

    pub fn close(kind: EnclosureKind) -> Self {
        Node::Close { kind }
    }

    pub fn content(kind: ContentKind, text: impl Into<String>) -> Self {
        Node::Content {
            kind,
            text: text.into(),
        }
    }
}

/// Kind-specific data attached to an `Open` node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnclosureConfig {
    Heading {
        level: u8,
    },
    Link {
        href: String,
        title: String,
        target: String,
    },
    OrderedList {
        order: u64,
    },
    Paragraph {
        tight: bool,
    },
    Cell {
        is_head: bool,
        align: Alignment,
    },
    Empty,
}

/// Table cell alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    None,
    Left,
    Center,
    Right,
}

impl Alignment {
    pub const COUNT: usize = 4;

    pub const ALL: [Alignment; Self::COUNT] = [
        Alignment::None,
        Alignment::Left,
        Alignment::Center,
        Alignment::Right,
    ];

    const CODES: [&'static str; Self::COUNT] = ["", "L", "C", "R"];

    /// Translate a wire alignment code. Codes outside `0..=3` yield `None`.
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(usize::from(code)).copied()
    }

    /// The single-letter code written to XML (`""` for no alignment).
    pub fn code(self) -> &'static str {
        Self::CODES[self as usize]
    }
}

macro_rules! named_kind {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $label:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            const NAMES: &'static [&'static str] = &[$($label),+];

            /// Human-readable name used in XML attributes.
            pub fn name(self) -> &'static str {
                Self::NAMES[self as usize]
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

named_kind! {
    /// Block or inline container delimited by `Open`/`Close`.
    EnclosureKind {
        Blockquote => "Blockquote",
        BulletList => "BulletList",
        Emphasis => "Emphasis",
        ListItem => "ListItem",
        Strikethrough => "Strikethrough",
        Strong => "Strong",
        Table => "Table",
        TableBody => "TableBody",
        TableHead => "TableHead",
        TableRow => "TableRow",
        Heading => "Heading",
        Link => "Link",
        OrderedList => "OrderedList",
        Paragraph => "Paragraph",
        TableCell => "TableCell",
    }
}

named_kind! {
    /// Kind of raw text carried by a `Content` node.
    ContentKind {
        CodeBlock => "CodeBlock",
        CodeInline => "CodeInline",
        HTMLBlock => "HTMLBlock",
        HTMLInline => "HTMLInline",
        Text => "Text",
    }
}

named_kind! {
    BreakKind {
        Soft => "soft",
        Hard => "hard",
        HardRule => "hardrule",
    }
}
