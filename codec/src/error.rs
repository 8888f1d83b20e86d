use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read input")]
    Read(#[source] std::io::Error),

    #[error("Failed to write output")]
    Write(#[source] std::io::Error),

    #[error("Line {0}: record is not plain ASCII")]
    NotAscii(usize),

    #[error("Line {0}: bad record marker")]
    Marker(usize),

    #[error("Line {0}: record shorter than its byte count requires")]
    ShortLine(usize),

    #[error("Line {0}: {1}")]
    Scan(usize, #[source] scan::Error),

    #[error("Line {0}: unexpected record type {1:02X}")]
    RecordType(usize, u8),

    #[error("Line {0}: checksum mismatch (expected {1:02X}, found {2:02X})")]
    Checksum(usize, u8, u8),

    #[error("Line {0}: malformed terminal record")]
    Terminal(usize),

    #[error("Line {0}: record count mismatch (expected {1}, found {2})")]
    RecordCount(usize, u16, u16),

    #[error("Unexpected end of file before terminal record")]
    UnexpectedEof,

    #[error("Record at {0:#06X} runs past the end of memory")]
    Overflow(u16),

    #[error("{0} bytes do not fit at {1:#06X}")]
    TooLarge(usize, u16),

    #[error("Input file is empty")]
    Empty,

    #[error("Raw image is {0} bytes, expected {1}")]
    RawSize(usize, usize),
}
