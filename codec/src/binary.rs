use std::io::{Read, Write};

use board::image::{ADDR_CELLS, IMAGE_BYTES, MemoryBlock, MemoryImage};

use crate::error::Error;

/// Write `count` data bytes starting at `start`. Attribute bytes are
/// dropped: plain binary cannot carry enable/read-only state.
pub fn write_plain<W: Write>(
    image: &MemoryImage,
    start: u16,
    count: u32,
    out: &mut W,
) -> Result<(), Error> {
    if start as u32 + count > ADDR_CELLS as u32 {
        return Err(Error::TooLarge(count as usize, start));
    }
    let bytes: Vec<u8> = (0..count).map(|o| image.data(start + o as u16)).collect();
    out.write_all(&bytes).map_err(Error::Write)
}

/// Read the whole input into data bytes starting at `start`.
pub fn read_plain<R: Read>(
    input: &mut R,
    image: &mut MemoryImage,
    start: u16,
) -> Result<MemoryBlock, Error> {
    let mut data = Vec::new();
    input.read_to_end(&mut data).map_err(Error::Read)?;
    load_plain(&data, image, start)
}

pub fn load_plain(data: &[u8], image: &mut MemoryImage, start: u16) -> Result<MemoryBlock, Error> {
    if data.is_empty() {
        return Err(Error::Empty);
    }
    if start as usize + data.len() > ADDR_CELLS {
        return Err(Error::TooLarge(data.len(), start));
    }
    for (offset, byte) in data.iter().enumerate() {
        image.set_data(start + offset as u16, *byte);
    }
    Ok(MemoryBlock::at(start, data.len() as u32))
}

/// Plain binary with a two-byte little-endian load address in front.
pub fn write_prg<W: Write>(
    image: &MemoryImage,
    start: u16,
    count: u32,
    out: &mut W,
) -> Result<(), Error> {
    out.write_all(&start.to_le_bytes()).map_err(Error::Write)?;
    write_plain(image, start, count, out)
}

pub fn read_prg<R: Read>(input: &mut R, image: &mut MemoryImage) -> Result<MemoryBlock, Error> {
    let mut header = [0u8; 2];
    input.read_exact(&mut header).map_err(|e| match e.kind() {
        std::io::ErrorKind::UnexpectedEof => Error::UnexpectedEof,
        _ => Error::Read(e),
    })?;
    let start = u16::from_le_bytes(header);
    read_plain(input, image, start)
}

/// Dump the internal two-bytes-per-cell layout verbatim, attributes
/// included. Diagnostic format; the layout is subject to change.
pub fn write_raw<W: Write>(image: &MemoryImage, out: &mut W) -> Result<(), Error> {
    out.write_all(image.as_bytes()).map_err(Error::Write)
}

pub fn read_raw<R: Read>(input: &mut R, image: &mut MemoryImage) -> Result<(), Error> {
    let mut data = Vec::new();
    input.read_to_end(&mut data).map_err(Error::Read)?;
    if data.len() != IMAGE_BYTES {
        return Err(Error::RawSize(data.len(), IMAGE_BYTES));
    }
    image.as_bytes_mut().copy_from_slice(&data);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_round_trip() {
        let mut image = MemoryImage::new();
        for i in 0..16u16 {
            image.set_data(0x0C00 + i, i as u8 * 3);
        }
        let mut file = Vec::new();
        write_plain(&image, 0x0C00, 16, &mut file).unwrap();
        assert_eq!(file.len(), 16);

        let mut back = MemoryImage::new();
        let block = read_plain(&mut file.as_slice(), &mut back, 0x0C00).unwrap();
        assert_eq!(block, MemoryBlock::at(0x0C00, 16));
        for i in 0..16u16 {
            assert_eq!(back.data(0x0C00 + i), i as u8 * 3);
        }
    }

    #[test]
    fn plain_drops_attributes() {
        let mut image = MemoryImage::new();
        image.set_data(0x0000, 0x42);
        image.set_enabled(0x0000, true);
        image.set_readonly(0x0000, true);
        let mut file = Vec::new();
        write_plain(&image, 0x0000, 1, &mut file).unwrap();
        assert_eq!(file, vec![0x42]);
    }

    #[test]
    fn prg_round_trip_recovers_address() {
        let mut image = MemoryImage::new();
        for i in 0..8u16 {
            image.set_data(0x0801 + i, 0xA0 + i as u8);
        }
        let mut file = Vec::new();
        write_prg(&image, 0x0801, 8, &mut file).unwrap();
        assert_eq!(&file[..2], &[0x01, 0x08]);

        let mut back = MemoryImage::new();
        let block = read_prg(&mut file.as_slice(), &mut back).unwrap();
        assert_eq!(block, MemoryBlock::at(0x0801, 8));
        assert_eq!(back.data(0x0808), 0xA7);
    }

    #[test]
    fn prg_too_long_for_destination() {
        let mut file = vec![0x00, 0xFF]; // load at 0xFF00
        file.extend(std::iter::repeat(0u8).take(0x200));
        let mut image = MemoryImage::new();
        assert!(matches!(
            read_prg(&mut file.as_slice(), &mut image),
            Err(Error::TooLarge(0x200, 0xFF00))
        ));
    }

    #[test]
    fn prg_without_header_is_eof() {
        let file = [0x01u8];
        let mut image = MemoryImage::new();
        assert!(matches!(
            read_prg(&mut file.as_ref(), &mut image),
            Err(Error::UnexpectedEof)
        ));
    }

    #[test]
    fn raw_round_trip_keeps_attributes() {
        let mut image = MemoryImage::new();
        image.set_data(0x1234, 0x99);
        image.set_enabled(0x1234, true);
        image.set_readonly(0x1234, true);
        let mut file = Vec::new();
        write_raw(&image, &mut file).unwrap();
        assert_eq!(file.len(), IMAGE_BYTES);

        let mut back = MemoryImage::new();
        read_raw(&mut file.as_slice(), &mut back).unwrap();
        assert_eq!(back.data(0x1234), 0x99);
        assert_eq!(back.attr(0x1234), 0b00);
    }

    #[test]
    fn raw_wrong_size_is_rejected() {
        let file = vec![0u8; 100];
        let mut image = MemoryImage::new();
        assert!(matches!(
            read_raw(&mut file.as_slice(), &mut image),
            Err(Error::RawSize(100, IMAGE_BYTES))
        ));
    }

    #[test]
    fn empty_plain_input_is_rejected() {
        let mut image = MemoryImage::new();
        let mut empty: &[u8] = &[];
        assert!(matches!(
            read_plain(&mut empty, &mut image, 0),
            Err(Error::Empty)
        ));
    }
}
