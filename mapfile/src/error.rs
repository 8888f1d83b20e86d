use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Line {0}: bad indentation")]
    Indent(usize),

    #[error("Line {0}: expected `key: value`")]
    Syntax(usize),

    #[error("Unexpected parameter: `{0}`")]
    UnexpectedParameter(String),

    #[error("Duplicate parameter: `{0}`")]
    DuplicateParameter(String),

    #[error("Bad value for `{0}`: {1}")]
    Value(&'static str, #[source] scan::Error),

    #[error("Missing required parameter `start`")]
    MissingStart,

    #[error("Segment end {end:#06X} is below start {start:#06X}")]
    EndBeforeStart { start: u16, end: u16 },

    #[error("Segment needs one of `end`, `data`, or `file`")]
    NoExtent,

    #[error("`data` and `file` are mutually exclusive")]
    DataAndFile,

    #[error("`fill` requires `end`")]
    FillWithoutEnd,

    #[error("Segment sets no contents or attributes")]
    EmptySegment,

    #[error("Failed to stat file: {0}")]
    FileStat(String, #[source] std::io::Error),

    #[error("Source file `{0}` is empty")]
    EmptySource(String),

    #[error("Segment at {start:#06X} ({count} bytes) runs past the end of memory")]
    Overflow { start: u16, count: u64 },

    #[error("Segment span of {span} bytes is smaller than its {count} content bytes")]
    SpanTooSmall { span: u32, count: u32 },

    #[error("Unexpected {0} event in {1} state")]
    UnexpectedEvent(&'static str, &'static str),

    #[error("Event stream ended before stream-end")]
    Truncated,
}
