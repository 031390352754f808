//! Restructure a markdown token stream into typed nodes and write them as
//! tagged XML.
//!
//! The pipeline is `markdown -> Vec<Token> -> Vec<Node> -> XML`. Only the
//! first step touches markdown text; [`convert_all`] and the [`xml`] writer
//! work on in-memory sequences.

mod config;
mod convert;
mod node;
mod token;
mod tokenizer;
pub mod xml;

pub use config::{Config, ConfigError, OutputConfig, ParseConfig};
pub use convert::{Conversion, Converted, Skipped, convert, convert_all};
pub use node::{Alignment, BreakKind, ContentKind, EnclosureConfig, EnclosureKind, Node};
pub use token::{Token, TokenKind};
pub use xml::{ToXml, XmlError, XmlList, XmlWriter};

/// Tokenize markdown text using default config.
pub fn tokenize(markdown: &str) -> Vec<Token> {
    tokenize_with_config(markdown, &Config::compiled_default())
}

/// Tokenize markdown text with custom config.
pub fn tokenize_with_config(markdown: &str, config: &Config) -> Vec<Token> {
    tokenizer::tokenize(markdown, &config.parse)
}

/// Tokenize and convert markdown text.
pub fn markdown_to_nodes(markdown: &str, config: &Config) -> Conversion {
    let tokens = tokenize_with_config(markdown, config);
    let conversion = convert_all(&tokens);
    log::debug!(
        "converted {} tokens into {} nodes ({} skipped)",
        tokens.len(),
        conversion.nodes.len(),
        conversion.skipped.len()
    );
    conversion
}

/// Serialize nodes as a `body` document.
pub fn nodes_to_xml(nodes: &[Node], output: &OutputConfig) -> Result<String, XmlError> {
    xml::list_to_string(nodes, &output.indent, output.declaration)
}

/// Serialize raw tokens as a `tokens` document.
pub fn tokens_to_xml(tokens: &[Token], output: &OutputConfig) -> Result<String, XmlError> {
    xml::list_to_string(tokens, &output.indent, output.declaration)
}

/// Convert markdown to node XML using default config.
pub fn markdown_to_xml(markdown: &str) -> Result<String, XmlError> {
    markdown_to_xml_with_config(markdown, &Config::compiled_default())
}

/// Convert markdown to node XML with custom config.
pub fn markdown_to_xml_with_config(markdown: &str, config: &Config) -> Result<String, XmlError> {
    let conversion = markdown_to_nodes(markdown, config);
    nodes_to_xml(&conversion.nodes, &config.output)
}
