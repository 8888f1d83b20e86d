use board::config::{BoardConfig, Region, VideoStandard};

use crate::error::Error;
use crate::event::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Radio,
    Video,
    Floppy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RadioKey {
    Region,
    Network,
    Secret,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VideoKey {
    Standard,
    Offset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FloppyKey {
    Enabled,
    RamA,
    RamB,
    OptionSwitch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DiskKey {
    File,
    Readonly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    Stream,
    Document,
    Top,
    SectionKey(Section),
    Radio,
    RadioValue(RadioKey),
    Video,
    VideoValue(VideoKey),
    Floppy,
    FloppyValue(FloppyKey),
    DiskName(usize),
    Disk(usize),
    DiskValue(usize, DiskKey),
    DocumentClosed,
    Done,
}

impl State {
    fn name(self) -> &'static str {
        match self {
            State::Start => "start",
            State::Stream => "stream",
            State::Document => "document",
            State::Top => "top-level",
            State::SectionKey(_) => "section-key",
            State::Radio => "radio",
            State::RadioValue(_) => "radio-value",
            State::Video => "video",
            State::VideoValue(_) => "video-value",
            State::Floppy => "floppy",
            State::FloppyValue(_) => "floppy-value",
            State::DiskName(_) => "disk-name",
            State::Disk(_) => "disk",
            State::DiskValue(..) => "disk-value",
            State::DocumentClosed => "document-closed",
            State::Done => "done",
        }
    }
}

/// Entry a scalar key selects inside the floppy section.
enum FloppyEntry {
    Value(FloppyKey),
    Disk(usize),
}

/// Event-driven parser for board-config document streams.
///
/// The config record is fixed-shape and populated in place. Unlike the
/// memory-map parser there is no duplicate-key tracking: a repeated key, or
/// a second document in the stream, silently overwrites what came before.
pub struct ConfigParser {
    state: State,
    config: BoardConfig,
}

impl ConfigParser {
    pub fn new() -> Self {
        Self {
            state: State::Start,
            config: BoardConfig::default(),
        }
    }

    pub fn parse_str(text: &str) -> Result<BoardConfig, Error> {
        let mut parser = ConfigParser::new();
        for event in crate::event::scan(text)? {
            parser.feed(event)?;
        }
        parser.finish()
    }

    pub fn feed(&mut self, event: Event) -> Result<(), Error> {
        self.state = match (self.state, event) {
            (State::Start, Event::StreamStart) => State::Stream,
            (State::Stream, Event::DocumentStart) => State::Document,
            (State::Stream, Event::StreamEnd) => State::Done,
            (State::Document, Event::MappingStart) => State::Top,
            (State::Document, Event::DocumentEnd) => State::Stream,

            (State::Top, Event::Scalar(key)) => State::SectionKey(section_lookup(&key)?),
            (State::Top, Event::MappingEnd) => State::DocumentClosed,
            (State::SectionKey(Section::Radio), Event::MappingStart) => State::Radio,
            (State::SectionKey(Section::Video), Event::MappingStart) => State::Video,
            (State::SectionKey(Section::Floppy), Event::MappingStart) => State::Floppy,

            (State::Radio, Event::Scalar(key)) => State::RadioValue(radio_lookup(&key)?),
            (State::Radio, Event::MappingEnd) => State::Top,
            (State::RadioValue(key), Event::Scalar(value)) => {
                self.store_radio(key, &value)?;
                State::Radio
            }

            (State::Video, Event::Scalar(key)) => State::VideoValue(video_lookup(&key)?),
            (State::Video, Event::MappingEnd) => State::Top,
            (State::VideoValue(key), Event::Scalar(value)) => {
                self.store_video(key, &value)?;
                State::Video
            }

            (State::Floppy, Event::Scalar(key)) => match floppy_lookup(&key)? {
                FloppyEntry::Value(key) => State::FloppyValue(key),
                FloppyEntry::Disk(slot) => State::DiskName(slot),
            },
            (State::Floppy, Event::MappingEnd) => State::Top,
            (State::FloppyValue(key), Event::Scalar(value)) => {
                self.store_floppy(key, &value)?;
                State::Floppy
            }

            (State::DiskName(slot), Event::MappingStart) => State::Disk(slot),
            (State::Disk(slot), Event::Scalar(key)) => {
                State::DiskValue(slot, disk_lookup(&key)?)
            }
            (State::Disk(_), Event::MappingEnd) => State::Floppy,
            (State::DiskValue(slot, key), Event::Scalar(value)) => {
                self.store_disk(slot, key, &value)?;
                State::Disk(slot)
            }

            (State::DocumentClosed, Event::DocumentEnd) => State::Stream,
            (state, event) => {
                return Err(Error::UnexpectedEvent(event.kind(), state.name()));
            }
        };
        Ok(())
    }

    pub fn finish(self) -> Result<BoardConfig, Error> {
        match self.state {
            State::Done => Ok(self.config),
            _ => Err(Error::Truncated),
        }
    }

    fn store_radio(&mut self, key: RadioKey, value: &str) -> Result<(), Error> {
        let radio = &mut self.config.radio;
        match key {
            RadioKey::Region => {
                radio.region =
                    Some(Region::parse(value).map_err(|e| Error::Value("region", e))?);
            }
            RadioKey::Network => radio.network = Some(value.to_string()),
            RadioKey::Secret => radio.secret = Some(value.to_string()),
        }
        Ok(())
    }

    fn store_video(&mut self, key: VideoKey, value: &str) -> Result<(), Error> {
        let video = &mut self.config.video;
        match key {
            VideoKey::Standard => {
                video.standard =
                    Some(VideoStandard::parse(value).map_err(|e| Error::Value("standard", e))?);
            }
            VideoKey::Offset => video.offset = Some(word("offset", value)?),
        }
        Ok(())
    }

    fn store_floppy(&mut self, key: FloppyKey, value: &str) -> Result<(), Error> {
        let floppy = &mut self.config.floppy;
        match key {
            FloppyKey::Enabled => {
                floppy.enabled =
                    Some(scan::boolean(value).map_err(|e| Error::Value("enabled", e))?);
            }
            FloppyKey::RamA => floppy.ram_a = Some(word("ram-a", value)?),
            FloppyKey::RamB => floppy.ram_b = Some(word("ram-b", value)?),
            FloppyKey::OptionSwitch => {
                floppy.option_switch =
                    Some(scan::boolean(value).map_err(|e| Error::Value("option-switch", e))?);
            }
        }
        Ok(())
    }

    fn store_disk(&mut self, slot: usize, key: DiskKey, value: &str) -> Result<(), Error> {
        let disk = &mut self.config.floppy.disks[slot];
        match key {
            DiskKey::File => disk.file = Some(value.to_string()),
            DiskKey::Readonly => {
                disk.readonly =
                    Some(scan::boolean(value).map_err(|e| Error::Value("readonly", e))?);
            }
        }
        Ok(())
    }
}

impl Default for ConfigParser {
    fn default() -> Self {
        Self::new()
    }
}

fn word(name: &'static str, value: &str) -> Result<u16, Error> {
    scan::bounded_uint(value, 0xFFFF)
        .map(|v| v as u16)
        .map_err(|e| Error::Value(name, e))
}

fn section_lookup(key: &str) -> Result<Section, Error> {
    Ok(match key {
        "radio" => Section::Radio,
        "video" => Section::Video,
        "floppy" => Section::Floppy,
        _ => return Err(Error::UnexpectedParameter(key.to_string())),
    })
}

fn radio_lookup(key: &str) -> Result<RadioKey, Error> {
    Ok(match key {
        "region" => RadioKey::Region,
        "network" => RadioKey::Network,
        "secret" => RadioKey::Secret,
        _ => return Err(Error::UnexpectedParameter(key.to_string())),
    })
}

fn video_lookup(key: &str) -> Result<VideoKey, Error> {
    Ok(match key {
        "standard" => VideoKey::Standard,
        "offset" => VideoKey::Offset,
        _ => return Err(Error::UnexpectedParameter(key.to_string())),
    })
}

fn floppy_lookup(key: &str) -> Result<FloppyEntry, Error> {
    Ok(match key {
        "enabled" => FloppyEntry::Value(FloppyKey::Enabled),
        "ram-a" => FloppyEntry::Value(FloppyKey::RamA),
        "ram-b" => FloppyEntry::Value(FloppyKey::RamB),
        "option-switch" => FloppyEntry::Value(FloppyKey::OptionSwitch),
        "disk1" => FloppyEntry::Disk(0),
        "disk2" => FloppyEntry::Disk(1),
        "disk3" => FloppyEntry::Disk(2),
        "disk4" => FloppyEntry::Disk(3),
        _ => return Err(Error::UnexpectedParameter(key.to_string())),
    })
}

fn disk_lookup(key: &str) -> Result<DiskKey, Error> {
    Ok(match key {
        "file" => DiskKey::File,
        "readonly" => DiskKey::Readonly,
        _ => return Err(Error::UnexpectedParameter(key.to_string())),
    })
}
