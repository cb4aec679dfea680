pub mod encoding;
pub mod xml;

pub use encoding::decode_xml;
pub use xml::{
    analyze_file, count_tag, DocumentSummary, ElementInfo, FileAnalysis, ParseError,
};
