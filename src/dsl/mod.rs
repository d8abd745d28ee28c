//! View-description language: tokenizer, parser, node model, canonical writer.

pub mod model;
pub mod parser;
pub mod tokenizer;
pub mod writer;

pub use model::{Attr, Node, ANONYMOUS};
pub use parser::{parse, parse_nodes, parse_value, ParseError, ParseErrorKind};
pub use writer::{write_node, write_value};
