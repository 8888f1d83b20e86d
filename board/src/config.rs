use num_enum::TryFromPrimitive;
use serde::Serialize;
use strum::Display;

/// Radio region codes the board firmware knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, TryFromPrimitive)]
#[repr(usize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Region {
    Us,
    Eu,
    Jp,
}

impl Region {
    pub const TOKENS: &'static [&'static str] = &["us", "eu", "jp"];

    pub fn parse(s: &str) -> Result<Self, scan::Error> {
        let idx = scan::enum_lookup(s, Self::TOKENS)?;
        Self::try_from(idx).map_err(|_| scan::Error::UnknownToken(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, TryFromPrimitive)]
#[repr(usize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum VideoStandard {
    Ntsc,
    Pal,
}

impl VideoStandard {
    pub const TOKENS: &'static [&'static str] = &["ntsc", "pal"];

    pub fn parse(s: &str) -> Result<Self, scan::Error> {
        let idx = scan::enum_lookup(s, Self::TOKENS)?;
        Self::try_from(idx).map_err(|_| scan::Error::UnknownToken(s.to_string()))
    }
}

/// Memory kind of a mapped segment. `rom` maps read-only, `ram` writable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, TryFromPrimitive)]
#[repr(usize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MemKind {
    Ram,
    Rom,
}

impl MemKind {
    pub const TOKENS: &'static [&'static str] = &["ram", "rom"];

    pub fn parse(s: &str) -> Result<Self, scan::Error> {
        let idx = scan::enum_lookup(s, Self::TOKENS)?;
        Self::try_from(idx).map_err(|_| scan::Error::UnknownToken(s.to_string()))
    }

    pub fn readonly(self) -> bool {
        matches!(self, MemKind::Rom)
    }
}

pub const DISK_SLOTS: usize = 4;

/// The board's fixed-shape configuration record. One per board; a config
/// stream with several documents overwrites fields in place rather than
/// erroring.
#[derive(Debug, Default, Clone, Serialize)]
pub struct BoardConfig {
    pub radio: RadioConfig,
    pub video: VideoConfig,
    pub floppy: FloppyConfig,
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct RadioConfig {
    pub region: Option<Region>,
    pub network: Option<String>,
    pub secret: Option<String>,
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct VideoConfig {
    pub standard: Option<VideoStandard>,
    pub offset: Option<u16>,
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct FloppyConfig {
    pub enabled: Option<bool>,
    pub ram_a: Option<u16>,
    pub ram_b: Option<u16>,
    pub option_switch: Option<bool>,
    pub disks: [DiskSlot; DISK_SLOTS],
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct DiskSlot {
    pub file: Option<String>,
    pub readonly: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_tokens_round_trip() {
        assert_eq!(Region::parse("us"), Ok(Region::Us));
        assert_eq!(Region::parse("eu"), Ok(Region::Eu));
        assert_eq!(Region::parse("jp"), Ok(Region::Jp));
        assert!(Region::parse("uk").is_err());
        assert!(Region::parse("US").is_err());
    }

    #[test]
    fn video_standard_tokens() {
        assert_eq!(VideoStandard::parse("ntsc"), Ok(VideoStandard::Ntsc));
        assert_eq!(VideoStandard::parse("pal"), Ok(VideoStandard::Pal));
        assert!(VideoStandard::parse("secam").is_err());
    }

    #[test]
    fn mem_kind_maps_to_readonly() {
        assert!(MemKind::parse("rom").unwrap().readonly());
        assert!(!MemKind::parse("ram").unwrap().readonly());
    }
}
