use std::fs;

use thiserror::Error;

use crate::image::{ADDR_CELLS, MemoryImage};
use crate::segment::MemorySegment;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read file: {0}")]
    FileRead(String, #[source] std::io::Error),

    #[error("Source `{0}` is {1} bytes, segment expects {2}")]
    SourceSize(String, u64, u32),

    #[error("Segment at {0:#06X} runs past the end of memory")]
    Overflow(u16),
}

/// Apply a validated segment list to an image, in document order.
///
/// Content comes from inline data, else the source file (read here, in
/// full), else the fill byte. Attribute bits are only touched where the
/// segment says something: an absent `enabled`/`readonly` leaves the
/// existing bit alone.
pub fn apply(image: &mut MemoryImage, segments: &[MemorySegment]) -> Result<(), Error> {
    for segment in segments {
        apply_segment(image, segment)?;
    }
    Ok(())
}

pub fn apply_segment(image: &mut MemoryImage, segment: &MemorySegment) -> Result<(), Error> {
    if segment.limit() > ADDR_CELLS as u32 {
        return Err(Error::Overflow(segment.start));
    }

    if let Some(data) = &segment.data {
        store(image, segment.start, data);
    } else if let Some(path) = &segment.file {
        let data = fs::read(path).map_err(|e| Error::FileRead(path.clone(), e))?;
        if data.len() as u64 != segment.count as u64 {
            return Err(Error::SourceSize(path.clone(), data.len() as u64, segment.count));
        }
        store(image, segment.start, &data);
    } else if let Some(fill) = segment.fill {
        for offset in 0..segment.count {
            image.set_data(segment.start + offset as u16, fill);
        }
    }

    for offset in 0..segment.count {
        let addr = segment.start + offset as u16;
        if let Some(enabled) = segment.enabled {
            image.set_enabled(addr, enabled);
        }
        if let Some(readonly) = segment.readonly {
            image.set_readonly(addr, readonly);
        }
    }
    Ok(())
}

fn store(image: &mut MemoryImage, start: u16, data: &[u8]) {
    for (offset, byte) in data.iter().enumerate() {
        image.set_data(start + offset as u16, *byte);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(start: u16, count: u32) -> MemorySegment {
        MemorySegment {
            start,
            end: None,
            enabled: None,
            readonly: None,
            fill: None,
            data: None,
            file: None,
            count,
        }
    }

    #[test]
    fn inline_data_lands_at_start() {
        let mut image = MemoryImage::new();
        let seg = MemorySegment {
            data: Some(vec![0xDE, 0xAD, 0xBE, 0xEF]),
            ..segment(0x2000, 4)
        };
        apply_segment(&mut image, &seg).unwrap();
        assert_eq!(image.data(0x2000), 0xDE);
        assert_eq!(image.data(0x2003), 0xEF);
        assert_eq!(image.data(0x2004), 0x00);
    }

    #[test]
    fn fill_covers_whole_span() {
        let mut image = MemoryImage::new();
        let seg = MemorySegment {
            end: Some(0x40FF),
            fill: Some(0x55),
            ..segment(0x4000, 0x100)
        };
        apply_segment(&mut image, &seg).unwrap();
        assert_eq!(image.data(0x4000), 0x55);
        assert_eq!(image.data(0x40FF), 0x55);
        assert_eq!(image.data(0x4100), 0x00);
    }

    #[test]
    fn absent_tristate_leaves_attributes() {
        let mut image = MemoryImage::new();
        image.set_enabled(0x3000, true);
        let seg = MemorySegment {
            fill: Some(0xAA),
            end: Some(0x3000),
            ..segment(0x3000, 1)
        };
        apply_segment(&mut image, &seg).unwrap();
        assert!(image.is_enabled(0x3000));
        assert!(!image.is_readonly(0x3000));
    }

    #[test]
    fn rom_segment_sets_attr_zero() {
        let mut image = MemoryImage::new();
        let seg = MemorySegment {
            enabled: Some(true),
            readonly: Some(true),
            data: Some(vec![0x01; 8]),
            ..segment(0x1800, 8)
        };
        apply_segment(&mut image, &seg).unwrap();
        for addr in 0x1800..0x1808u16 {
            assert_eq!(image.attr(addr), 0b00);
        }
    }

    #[test]
    fn overflowing_segment_is_rejected() {
        let mut image = MemoryImage::new();
        let seg = MemorySegment {
            data: Some(vec![0; 0x200]),
            ..segment(0xFF00, 0x200)
        };
        assert!(matches!(
            apply_segment(&mut image, &seg),
            Err(Error::Overflow(0xFF00))
        ));
    }

    #[test]
    fn source_file_contents_are_loaded() {
        let path = std::env::temp_dir().join("board-build-src.bin");
        std::fs::write(&path, [0x11u8, 0x22, 0x33]).unwrap();
        let mut image = MemoryImage::new();
        let seg = MemorySegment {
            file: Some(path.to_string_lossy().into_owned()),
            ..segment(0x0100, 3)
        };
        apply_segment(&mut image, &seg).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(image.data(0x0100), 0x11);
        assert_eq!(image.data(0x0102), 0x33);
    }

    #[test]
    fn changed_source_size_is_an_error() {
        let path = std::env::temp_dir().join("board-build-shrunk.bin");
        std::fs::write(&path, [0u8; 2]).unwrap();
        let mut image = MemoryImage::new();
        let seg = MemorySegment {
            file: Some(path.to_string_lossy().into_owned()),
            ..segment(0x0100, 4)
        };
        let result = apply_segment(&mut image, &seg);
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(Error::SourceSize(_, 2, 4))));
    }
}
