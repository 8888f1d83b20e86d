use serde::Serialize;

/// One validated memory-map document: a contiguous address range, its
/// attributes, and where its contents come from.
///
/// Segment lists are kept in document order; the parser appends. This is
/// the opposite discipline from decoded [`MemoryBlock`](crate::MemoryBlock)
/// lists, which are reverse file order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemorySegment {
    pub start: u16,
    pub end: Option<u16>,
    pub enabled: Option<bool>,
    pub readonly: Option<bool>,
    pub fill: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<u8>>,
    pub file: Option<String>,
    /// Derived at validation time: inline data length, else source file
    /// size, else `end - start + 1`.
    pub count: u32,
}

impl MemorySegment {
    /// First address past the segment. At most 0x10000 for any segment that
    /// survived validation.
    pub fn limit(&self) -> u32 {
        self.start as u32 + self.count
    }
}
