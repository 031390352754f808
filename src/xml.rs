use std::borrow::Cow;
use std::io::{self, Write};

use thiserror::Error;

use crate::node::{EnclosureConfig, Node};
use crate::token::Token;

#[derive(Debug, Error)]
pub enum XmlError {
    #[error("character {ch:?} in attribute `{attribute}` of <{element}> cannot be encoded in XML")]
    UnencodableChar {
        element: &'static str,
        attribute: &'static str,
        ch: char,
    },

    #[error("failed to write XML: {0}")]
    Io(#[from] io::Error),
}

/// A value that serializes itself as one XML element.
pub trait ToXml {
    fn write_xml<W: Write>(&self, writer: &mut XmlWriter<W>) -> Result<(), XmlError>;
}

/// A value that can appear in a wrapped list. Every list of `Self`, at any
/// depth, is wrapped in an element named `LIST_TAG`.
pub trait XmlList: ToXml + Sized {
    const LIST_TAG: &'static str;
}

/// Write `items` as one `T::LIST_TAG` element with a child per item, in order.
pub fn write_list<T: XmlList, W: Write>(
    writer: &mut XmlWriter<W>,
    items: &[T],
) -> Result<(), XmlError> {
    if items.is_empty() {
        return writer.empty(T::LIST_TAG, &[]);
    }
    writer.start(T::LIST_TAG, &[])?;
    for item in items {
        item.write_xml(writer)?;
    }
    writer.end(T::LIST_TAG)
}

/// Attribute name and unescaped value.
pub type Attr<'a> = (&'static str, &'a str);

/// Minimal element writer. Elements never carry text content, so indentation
/// is purely cosmetic.
pub struct XmlWriter<W: Write> {
    out: W,
    indent: String,
    depth: usize,
}

impl<W: Write> XmlWriter<W> {
    /// An empty `indent` writes everything on one line.
    pub fn new(out: W, indent: impl Into<String>) -> Self {
        Self {
            out,
            indent: indent.into(),
            depth: 0,
        }
    }

    pub fn declaration(&mut self) -> Result<(), XmlError> {
        self.out.write_all(br#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
        self.newline()
    }

    pub fn start(&mut self, tag: &'static str, attrs: &[Attr<'_>]) -> Result<(), XmlError> {
        self.open_tag(tag, attrs)?;
        self.out.write_all(b">")?;
        self.newline()?;
        self.depth += 1;
        Ok(())
    }

    pub fn end(&mut self, tag: &'static str) -> Result<(), XmlError> {
        self.depth = self.depth.saturating_sub(1);
        self.pad()?;
        write!(self.out, "</{tag}>")?;
        self.newline()
    }

    pub fn empty(&mut self, tag: &'static str, attrs: &[Attr<'_>]) -> Result<(), XmlError> {
        self.open_tag(tag, attrs)?;
        self.out.write_all(b"/>")?;
        self.newline()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn open_tag(&mut self, tag: &'static str, attrs: &[Attr<'_>]) -> Result<(), XmlError> {
        self.pad()?;
        write!(self.out, "<{tag}")?;
        for &(name, value) in attrs {
            let value = escape_attribute(tag, name, value)?;
            write!(self.out, " {name}=\"{value}\"")?;
        }
        Ok(())
    }

    fn pad(&mut self) -> Result<(), XmlError> {
        for _ in 0..self.depth {
            self.out.write_all(self.indent.as_bytes())?;
        }
        Ok(())
    }

    fn newline(&mut self) -> Result<(), XmlError> {
        if !self.indent.is_empty() {
            self.out.write_all(b"\n")?;
        }
        Ok(())
    }
}

fn is_xml_char(ch: char) -> bool {
    matches!(ch,
        '\t' | '\n' | '\r'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}

fn escape_attribute<'a>(
    element: &'static str,
    attribute: &'static str,
    value: &'a str,
) -> Result<Cow<'a, str>, XmlError> {
    if let Some(ch) = value.chars().find(|ch| !is_xml_char(*ch)) {
        return Err(XmlError::UnencodableChar {
            element,
            attribute,
            ch,
        });
    }

    let escaped = html_escape::encode_double_quoted_attribute(value);
    // Literal whitespace would be normalized to spaces by XML parsers
    if !escaped.contains(['\t', '\n', '\r']) {
        return Ok(escaped);
    }
    Ok(Cow::Owned(
        escaped
            .replace('\t', "&#x9;")
            .replace('\n', "&#xA;")
            .replace('\r', "&#xD;"),
    ))
}

fn flag(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

impl ToXml for Node {
    fn write_xml<W: Write>(&self, writer: &mut XmlWriter<W>) -> Result<(), XmlError> {
        match self {
            Node::Open { kind, config } => {
                writer.start("open", &[("type", kind.name())])?;
                config.write_xml(writer)?;
                writer.end("open")
            }
            Node::Close { kind } => writer.empty("close", &[("type", kind.name())]),
            Node::Content { kind, text } => {
                writer.empty("content", &[("type", kind.name()), ("text", text.as_str())])
            }
            Node::Break { kind } => writer.empty("break", &[("type", kind.name())]),
            Node::Fence { params, text } => {
                writer.empty("fence", &[("params", params.as_str()), ("text", text.as_str())])
            }
            Node::Image {
                src,
                title,
                children,
            } => {
                writer.start("image", &[("src", src.as_str()), ("title", title.as_str())])?;
                write_list(writer, children)?;
                writer.end("image")
            }
            Node::Inline { content, children } => {
                writer.start("inline", &[("content", content.as_str())])?;
                write_list(writer, children)?;
                writer.end("inline")
            }
        }
    }
}

impl XmlList for Node {
    const LIST_TAG: &'static str = "body";
}

impl ToXml for EnclosureConfig {
    fn write_xml<W: Write>(&self, writer: &mut XmlWriter<W>) -> Result<(), XmlError> {
        match self {
            EnclosureConfig::Heading { level } => {
                writer.empty("heading-config", &[("h-level", level.to_string().as_str())])
            }
            EnclosureConfig::Link {
                href,
                title,
                target,
            } => writer.empty(
                "link-config",
                &[
                    ("href", href.as_str()),
                    ("title", title.as_str()),
                    ("target", target.as_str()),
                ],
            ),
            EnclosureConfig::OrderedList { order } => {
                writer.empty("ordered-list-config", &[("order", order.to_string().as_str())])
            }
            EnclosureConfig::Paragraph { tight } => {
                writer.empty("paragraph-config", &[("tight", flag(*tight))])
            }
            EnclosureConfig::Cell { is_head, align } => writer.empty(
                "cell-config",
                &[("is-head", flag(*is_head)), ("align", align.code())],
            ),
            EnclosureConfig::Empty => writer.empty("empty-config", &[]),
        }
    }
}

impl ToXml for Token {
    fn write_xml<W: Write>(&self, writer: &mut XmlWriter<W>) -> Result<(), XmlError> {
        let tag = self.kind().name();
        match self {
            Token::HeadingOpen { level } => {
                writer.empty(tag, &[("level", level.to_string().as_str())])
            }
            Token::LinkOpen {
                href,
                title,
                target,
            } => writer.empty(
                tag,
                &[
                    ("href", href.as_str()),
                    ("title", title.as_str()),
                    ("target", target.as_str()),
                ],
            ),
            Token::OrderedListOpen { order } => {
                writer.empty(tag, &[("order", order.to_string().as_str())])
            }
            Token::ParagraphOpen { tight } => writer.empty(tag, &[("tight", flag(*tight))]),
            Token::TdOpen { align } | Token::ThOpen { align } => {
                writer.empty(tag, &[("align", align.to_string().as_str())])
            }
            Token::CodeBlock { content }
            | Token::CodeInline { content }
            | Token::HTMLBlock { content }
            | Token::HTMLInline { content }
            | Token::Text { content } => writer.empty(tag, &[("content", content.as_str())]),
            Token::Fence { params, content } => {
                writer.empty(tag, &[("params", params.as_str()), ("content", content.as_str())])
            }
            Token::Image { src, title, tokens } => {
                writer.start(tag, &[("src", src.as_str()), ("title", title.as_str())])?;
                write_list(writer, tokens)?;
                writer.end(tag)
            }
            Token::Inline { content, children } => {
                writer.start(tag, &[("content", content.as_str())])?;
                write_list(writer, children)?;
                writer.end(tag)
            }
            Token::TaskListMarker { checked } => writer.empty(tag, &[("checked", flag(*checked))]),
            Token::FootnoteReference { label } | Token::FootnoteDefinitionOpen { label } => {
                writer.empty(tag, &[("label", label.as_str())])
            }
            Token::Math { display, content } => {
                writer.empty(tag, &[("display", flag(*display)), ("content", content.as_str())])
            }
            Token::BlockquoteOpen
            | Token::BlockquoteClose
            | Token::BulletListOpen
            | Token::BulletListClose
            | Token::EmphasisOpen
            | Token::EmphasisClose
            | Token::ListItemOpen
            | Token::ListItemClose
            | Token::StrikethroughOpen
            | Token::StrikethroughClose
            | Token::StrongOpen
            | Token::StrongClose
            | Token::TableOpen
            | Token::TableClose
            | Token::TbodyOpen
            | Token::TbodyClose
            | Token::TheadOpen
            | Token::TheadClose
            | Token::TrOpen
            | Token::TrClose
            | Token::HeadingClose
            | Token::LinkClose
            | Token::OrderedListClose
            | Token::ParagraphClose
            | Token::TdClose
            | Token::ThClose
            | Token::Softbreak
            | Token::Hardbreak
            | Token::Hr
            | Token::FootnoteDefinitionClose => writer.empty(tag, &[]),
        }
    }
}

impl XmlList for Token {
    const LIST_TAG: &'static str = "tokens";
}

/// Serialize a whole list as a standalone document.
pub fn list_to_string<T: XmlList>(
    items: &[T],
    indent: &str,
    declaration: bool,
) -> Result<String, XmlError> {
    let mut writer = XmlWriter::new(Vec::new(), indent);
    if declaration {
        writer.declaration()?;
    }
    write_list(&mut writer, items)?;
    String::from_utf8(writer.into_inner())
        .map_err(|e| XmlError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Alignment, BreakKind, ContentKind, EnclosureKind};
    use pretty_assertions::assert_eq;

    fn compact<T: XmlList>(items: &[T]) -> String {
        list_to_string(items, "", false).unwrap()
    }

    #[test]
    fn empty_list() {
        assert_eq!(compact::<Node>(&[]), "<body/>");
        assert_eq!(compact::<Token>(&[]), "<tokens/>");
    }

    #[test]
    fn heading_scenario() {
        let nodes = [
            Node::Open {
                kind: EnclosureKind::Heading,
                config: EnclosureConfig::Heading { level: 2 },
            },
            Node::content(ContentKind::Text, "Hi"),
            Node::close(EnclosureKind::Heading),
        ];
        assert_eq!(
            list_to_string(&nodes, "  ", true).unwrap(),
            concat!(
                "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
                "<body>\n",
                "  <open type=\"Heading\">\n",
                "    <heading-config h-level=\"2\"/>\n",
                "  </open>\n",
                "  <content type=\"Text\" text=\"Hi\"/>\n",
                "  <close type=\"Heading\"/>\n",
                "</body>\n",
            )
        );
    }

    #[test]
    fn discriminators_are_written_by_name() {
        let nodes = [
            Node::content(ContentKind::CodeBlock, "x"),
            Node::Break {
                kind: BreakKind::HardRule,
            },
        ];
        assert_eq!(
            compact(&nodes),
            "<body><content type=\"CodeBlock\" text=\"x\"/><break type=\"hardrule\"/></body>"
        );
    }

    #[test]
    fn text_is_escaped() {
        let nodes = [Node::content(ContentKind::Text, "a < b & \"c\"\n\td")];
        assert_eq!(
            compact(&nodes),
            "<body><content type=\"Text\" text=\"a &lt; b &amp; &quot;c&quot;&#xA;&#x9;d\"/></body>"
        );
    }

    #[test]
    fn every_config_variant_has_its_own_tag() {
        let nodes = [
            Node::Open {
                kind: EnclosureKind::Link,
                config: EnclosureConfig::Link {
                    href: "/a?b=1&c=2".into(),
                    title: "T".into(),
                    target: String::new(),
                },
            },
            Node::Open {
                kind: EnclosureKind::OrderedList,
                config: EnclosureConfig::OrderedList { order: 3 },
            },
            Node::Open {
                kind: EnclosureKind::Paragraph,
                config: EnclosureConfig::Paragraph { tight: false },
            },
            Node::Open {
                kind: EnclosureKind::TableCell,
                config: EnclosureConfig::Cell {
                    is_head: true,
                    align: Alignment::Center,
                },
            },
            Node::open(EnclosureKind::Table),
        ];
        assert_eq!(
            compact(&nodes),
            concat!(
                "<body>",
                "<open type=\"Link\"><link-config href=\"/a?b=1&amp;c=2\" title=\"T\" target=\"\"/></open>",
                "<open type=\"OrderedList\"><ordered-list-config order=\"3\"/></open>",
                "<open type=\"Paragraph\"><paragraph-config tight=\"false\"/></open>",
                "<open type=\"TableCell\"><cell-config is-head=\"true\" align=\"C\"/></open>",
                "<open type=\"Table\"><empty-config/></open>",
                "</body>",
            )
        );
    }

    #[test]
    fn nested_children_use_the_same_list_tag() {
        let nodes = [Node::Inline {
            content: "![a](x.png)".into(),
            children: vec![Node::Image {
                src: "x.png".into(),
                title: String::new(),
                children: vec![Node::content(ContentKind::Text, "a")],
            }],
        }];
        assert_eq!(
            list_to_string(&nodes, " ", false).unwrap(),
            concat!(
                "<body>\n",
                " <inline content=\"![a](x.png)\">\n",
                "  <body>\n",
                "   <image src=\"x.png\" title=\"\">\n",
                "    <body>\n",
                "     <content type=\"Text\" text=\"a\"/>\n",
                "    </body>\n",
                "   </image>\n",
                "  </body>\n",
                " </inline>\n",
                "</body>\n",
            )
        );
    }

    #[test]
    fn fence_keeps_params_and_body() {
        let nodes = [Node::Fence {
            params: "rust".into(),
            text: "let x = 1;\n".into(),
        }];
        assert_eq!(
            compact(&nodes),
            "<body><fence params=\"rust\" text=\"let x = 1;&#xA;\"/></body>"
        );
    }

    #[test]
    fn raw_tokens_are_tagged_by_kind() {
        let tokens = [
            Token::ThOpen { align: 3 },
            Token::Inline {
                content: "x".into(),
                children: vec![Token::text("x")],
            },
            Token::ThClose,
        ];
        assert_eq!(
            compact(&tokens),
            concat!(
                "<tokens>",
                "<ThOpen align=\"3\"/>",
                "<Inline content=\"x\"><tokens><Text content=\"x\"/></tokens></Inline>",
                "<ThClose/>",
                "</tokens>",
            )
        );
    }

    #[test]
    fn field_less_tokens_are_bare_elements() {
        let tokens = [
            Token::TrClose,
            Token::Hardbreak,
            Token::FootnoteDefinitionClose,
            Token::FootnoteDefinitionOpen { label: "n".into() },
        ];
        assert_eq!(
            compact(&tokens),
            concat!(
                "<tokens>",
                "<TrClose/>",
                "<Hardbreak/>",
                "<FootnoteDefinitionClose/>",
                "<FootnoteDefinitionOpen label=\"n\"/>",
                "</tokens>",
            )
        );
    }

    #[test]
    fn control_characters_fail() {
        let nodes = [Node::content(ContentKind::Text, "bell\u{7}")];
        let err = list_to_string(&nodes, "", false).unwrap_err();
        assert!(matches!(
            err,
            XmlError::UnencodableChar {
                element: "content",
                attribute: "text",
                ch: '\u{7}',
            }
        ));
    }

    #[test]
    fn io_errors_propagate() {
        struct Broken;

        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::other("disk full"))
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let mut writer = XmlWriter::new(Broken, "");
        let err = write_list(&mut writer, &[Node::close(EnclosureKind::Strong)]).unwrap_err();
        assert!(matches!(err, XmlError::Io(_)));
    }
}
