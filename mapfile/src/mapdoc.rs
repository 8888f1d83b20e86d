use std::fs;

use board::config::MemKind;
use board::image::ADDR_CELLS;
use board::segment::MemorySegment;

use crate::error::Error;
use crate::event::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Start,
    End,
    Kind,
    Enabled,
    Fill,
    Data,
    File,
}

impl Field {
    fn lookup(key: &str) -> Result<Self, Error> {
        Ok(match key {
            "start" => Field::Start,
            "end" => Field::End,
            "type" => Field::Kind,
            "enabled" => Field::Enabled,
            "fill" => Field::Fill,
            "data" => Field::Data,
            "file" => Field::File,
            _ => return Err(Error::UnexpectedParameter(key.to_string())),
        })
    }

    fn name(self) -> &'static str {
        match self {
            Field::Start => "start",
            Field::End => "end",
            Field::Kind => "type",
            Field::Enabled => "enabled",
            Field::Fill => "fill",
            Field::Data => "data",
            Field::File => "file",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    Stream,
    Document,
    Field,
    Value(Field),
    MappingDone,
    Done,
}

impl State {
    fn name(self) -> &'static str {
        match self {
            State::Start => "start",
            State::Stream => "stream",
            State::Document => "document",
            State::Field => "field-name",
            State::Value(_) => "field-value",
            State::MappingDone => "mapping-done",
            State::Done => "done",
        }
    }
}

#[derive(Debug, Default)]
struct Draft {
    start: Option<u16>,
    end: Option<u16>,
    enabled: Option<bool>,
    readonly: Option<bool>,
    fill: Option<u8>,
    data: Option<Vec<u8>>,
    file: Option<String>,
}

/// Event-driven parser for memory-map document streams.
///
/// Carries its own `current document` state as fields; feeding it the event
/// sequence of one stream yields the segment list in document order. Any
/// validation failure poisons the whole parse: `feed` returns the error and
/// the list built so far is dropped with the parser.
pub struct MapParser {
    state: State,
    draft: Draft,
    segments: Vec<MemorySegment>,
}

impl MapParser {
    pub fn new() -> Self {
        Self {
            state: State::Start,
            draft: Draft::default(),
            segments: Vec::new(),
        }
    }

    /// Parse a whole document stream from text.
    pub fn parse_str(text: &str) -> Result<Vec<MemorySegment>, Error> {
        let mut parser = MapParser::new();
        for event in crate::event::scan(text)? {
            parser.feed(event)?;
        }
        parser.finish()
    }

    pub fn feed(&mut self, event: Event) -> Result<(), Error> {
        self.state = match (self.state, event) {
            (State::Start, Event::StreamStart) => State::Stream,
            (State::Stream, Event::DocumentStart) => {
                self.draft = Draft::default();
                State::Document
            }
            (State::Stream, Event::StreamEnd) => State::Done,
            (State::Document, Event::MappingStart) => State::Field,
            (State::Document, Event::DocumentEnd) => {
                self.seal()?;
                State::Stream
            }
            (State::Field, Event::Scalar(key)) => State::Value(Field::lookup(&key)?),
            (State::Field, Event::MappingEnd) => State::MappingDone,
            (State::Value(field), Event::Scalar(value)) => {
                self.store(field, &value)?;
                State::Field
            }
            (State::MappingDone, Event::DocumentEnd) => {
                self.seal()?;
                State::Stream
            }
            (state, event) => {
                return Err(Error::UnexpectedEvent(event.kind(), state.name()));
            }
        };
        Ok(())
    }

    pub fn finish(self) -> Result<Vec<MemorySegment>, Error> {
        match self.state {
            State::Done => Ok(self.segments),
            _ => Err(Error::Truncated),
        }
    }

    fn store(&mut self, field: Field, value: &str) -> Result<(), Error> {
        let seen = match field {
            Field::Start => self.draft.start.is_some(),
            Field::End => self.draft.end.is_some(),
            Field::Kind => self.draft.readonly.is_some(),
            Field::Enabled => self.draft.enabled.is_some(),
            Field::Fill => self.draft.fill.is_some(),
            Field::Data => self.draft.data.is_some(),
            Field::File => self.draft.file.is_some(),
        };
        if seen {
            return Err(Error::DuplicateParameter(field.name().to_string()));
        }
        match field {
            Field::Start => self.draft.start = Some(word(field, value)?),
            Field::End => self.draft.end = Some(word(field, value)?),
            Field::Kind => {
                let kind = MemKind::parse(value).map_err(|e| Error::Value(field.name(), e))?;
                self.draft.readonly = Some(kind.readonly());
            }
            Field::Enabled => {
                self.draft.enabled =
                    Some(scan::boolean(value).map_err(|e| Error::Value(field.name(), e))?);
            }
            Field::Fill => {
                let fill = scan::bounded_uint(value, 0xFF)
                    .map_err(|e| Error::Value(field.name(), e))?;
                self.draft.fill = Some(fill as u8);
            }
            Field::Data => self.draft.data = Some(parse_hex_data(value)?),
            Field::File => self.draft.file = Some(value.to_string()),
        }
        Ok(())
    }

    /// Document-end validation, in the fixed order the format promises.
    fn seal(&mut self) -> Result<(), Error> {
        let draft = std::mem::take(&mut self.draft);
        let start = draft.start.ok_or(Error::MissingStart)?;
        if let Some(end) = draft.end {
            if end < start {
                return Err(Error::EndBeforeStart { start, end });
            }
        }
        if draft.end.is_none() && draft.data.is_none() && draft.file.is_none() {
            return Err(Error::NoExtent);
        }
        if draft.data.is_some() && draft.file.is_some() {
            return Err(Error::DataAndFile);
        }
        if draft.fill.is_some() && draft.end.is_none() {
            return Err(Error::FillWithoutEnd);
        }
        if draft.data.is_none()
            && draft.file.is_none()
            && draft.fill.is_none()
            && draft.enabled.is_none()
            && draft.readonly.is_none()
        {
            return Err(Error::EmptySegment);
        }

        let count: u64 = match (&draft.data, &draft.file, draft.end) {
            (Some(data), _, _) => data.len() as u64,
            (None, Some(path), _) => {
                let len = fs::metadata(path)
                    .map_err(|e| Error::FileStat(path.clone(), e))?
                    .len();
                if len == 0 {
                    return Err(Error::EmptySource(path.clone()));
                }
                len
            }
            (None, None, Some(end)) => end as u64 - start as u64 + 1,
            (None, None, None) => return Err(Error::NoExtent),
        };
        if start as u64 + count > ADDR_CELLS as u64 {
            return Err(Error::Overflow { start, count });
        }
        let count = count as u32;
        if let Some(end) = draft.end {
            let span = end as u32 - start as u32 + 1;
            if span < count {
                return Err(Error::SpanTooSmall { span, count });
            }
        }

        self.segments.push(MemorySegment {
            start,
            end: draft.end,
            enabled: draft.enabled,
            readonly: draft.readonly,
            fill: draft.fill,
            data: draft.data,
            file: draft.file,
            count,
        });
        Ok(())
    }
}

impl Default for MapParser {
    fn default() -> Self {
        Self::new()
    }
}

fn word(field: Field, value: &str) -> Result<u16, Error> {
    scan::bounded_uint(value, 0xFFFF)
        .map(|v| v as u16)
        .map_err(|e| Error::Value(field.name(), e))
}

fn parse_hex_data(value: &str) -> Result<Vec<u8>, Error> {
    if value.is_empty() || value.len() % 2 != 0 || !value.is_ascii() {
        return Err(Error::Value(
            "data",
            scan::Error::Parse(value.to_string(), "hex data"),
        ));
    }
    (0..value.len() / 2)
        .map(|i| scan::hex_byte(&value[i * 2..]).map_err(|e| Error::Value("data", e)))
        .collect()
}
