use crate::error::Error;

/// One structural token of a document stream. Both document parsers consume
/// this vocabulary and nothing else; they never see the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    StreamStart,
    StreamEnd,
    DocumentStart,
    DocumentEnd,
    MappingStart,
    MappingEnd,
    Scalar(String),
}

impl Event {
    pub fn kind(&self) -> &'static str {
        match self {
            Event::StreamStart => "stream-start",
            Event::StreamEnd => "stream-end",
            Event::DocumentStart => "document-start",
            Event::DocumentEnd => "document-end",
            Event::MappingStart => "mapping-start",
            Event::MappingEnd => "mapping-end",
            Event::Scalar(_) => "scalar",
        }
    }
}

/// Turn the board's declarative document language into an event stream.
///
/// The language is a deliberately small block-mapping subset: documents
/// separated by `---`, one `key: value` per line, a bare `key:` opening a
/// nested mapping at deeper indentation, `#` comment lines, optional double
/// quotes around a value. Keys and values alternate as scalar events the
/// way a streaming block parser emits them.
pub fn scan(text: &str) -> Result<Vec<Event>, Error> {
    let mut events = vec![Event::StreamStart];
    let mut depth: Vec<usize> = Vec::new();
    let mut in_doc = false;
    let mut pending = false;
    let mut pending_line = 0;

    for (idx, raw) in text.lines().enumerate() {
        let lineno = idx + 1;
        let line = raw.trim_end();
        let body = line.trim_start();
        if body.is_empty() || body.starts_with('#') {
            continue;
        }

        if line == "---" {
            if pending {
                return Err(Error::Syntax(pending_line));
            }
            close_document(&mut events, &mut depth, &mut in_doc);
            events.push(Event::DocumentStart);
            in_doc = true;
            continue;
        }

        let indent = line.len() - body.len();
        if !in_doc {
            events.push(Event::DocumentStart);
            in_doc = true;
        }

        if depth.is_empty() {
            events.push(Event::MappingStart);
            depth.push(indent);
        } else if pending {
            match depth.last() {
                Some(top) if indent > *top => {
                    events.push(Event::MappingStart);
                    depth.push(indent);
                }
                _ => return Err(Error::Indent(lineno)),
            }
            pending = false;
        } else {
            while let Some(top) = depth.last() {
                if indent < *top {
                    events.push(Event::MappingEnd);
                    depth.pop();
                } else {
                    break;
                }
            }
            match depth.last() {
                Some(top) if indent == *top => {}
                _ => return Err(Error::Indent(lineno)),
            }
        }

        let (key, value) = body.split_once(':').ok_or(Error::Syntax(lineno))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(Error::Syntax(lineno));
        }
        events.push(Event::Scalar(key.to_string()));

        let value = value.trim();
        if value.is_empty() {
            pending = true;
            pending_line = lineno;
        } else {
            events.push(Event::Scalar(unquote(value).to_string()));
        }
    }

    if pending {
        return Err(Error::Syntax(pending_line));
    }
    close_document(&mut events, &mut depth, &mut in_doc);
    events.push(Event::StreamEnd);
    Ok(events)
}

fn close_document(events: &mut Vec<Event>, depth: &mut Vec<usize>, in_doc: &mut bool) {
    for _ in depth.drain(..) {
        events.push(Event::MappingEnd);
    }
    if *in_doc {
        events.push(Event::DocumentEnd);
        *in_doc = false;
    }
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar(s: &str) -> Event {
        Event::Scalar(s.to_string())
    }

    #[test]
    fn flat_document() {
        let events = scan("start: 0x1000\nend: 0x1FFF\n").unwrap();
        assert_eq!(
            events,
            vec![
                Event::StreamStart,
                Event::DocumentStart,
                Event::MappingStart,
                scalar("start"),
                scalar("0x1000"),
                scalar("end"),
                scalar("0x1FFF"),
                Event::MappingEnd,
                Event::DocumentEnd,
                Event::StreamEnd,
            ]
        );
    }

    #[test]
    fn comments_and_blanks_are_skipped() {
        let events = scan("# memory map\n\nstart: 0\n  # indented comment\nend: 7\n").unwrap();
        assert_eq!(events.len(), 10);
    }

    #[test]
    fn explicit_document_markers() {
        let events = scan("---\nstart: 0\nend: 1\n---\nstart: 2\nend: 3\n").unwrap();
        let docs = events
            .iter()
            .filter(|e| **e == Event::DocumentStart)
            .count();
        assert_eq!(docs, 2);
        let ends = events.iter().filter(|e| **e == Event::DocumentEnd).count();
        assert_eq!(ends, 2);
    }

    #[test]
    fn nested_mapping() {
        let events = scan("radio:\n  region: us\nvideo:\n  standard: pal\n").unwrap();
        assert_eq!(
            events,
            vec![
                Event::StreamStart,
                Event::DocumentStart,
                Event::MappingStart,
                scalar("radio"),
                Event::MappingStart,
                scalar("region"),
                scalar("us"),
                Event::MappingEnd,
                scalar("video"),
                Event::MappingStart,
                scalar("standard"),
                scalar("pal"),
                Event::MappingEnd,
                Event::MappingEnd,
                Event::DocumentEnd,
                Event::StreamEnd,
            ]
        );
    }

    #[test]
    fn two_level_nesting_closes_in_order() {
        let text = "floppy:\n  disk1:\n    file: boot.d64\n  enabled: true\n";
        let events = scan(text).unwrap();
        assert_eq!(
            events,
            vec![
                Event::StreamStart,
                Event::DocumentStart,
                Event::MappingStart,
                scalar("floppy"),
                Event::MappingStart,
                scalar("disk1"),
                Event::MappingStart,
                scalar("file"),
                scalar("boot.d64"),
                Event::MappingEnd,
                scalar("enabled"),
                scalar("true"),
                Event::MappingEnd,
                Event::MappingEnd,
                Event::DocumentEnd,
                Event::StreamEnd,
            ]
        );
    }

    #[test]
    fn quoted_values_are_stripped() {
        let events = scan("network: \"my net\"\nsecret: hunter2\n").unwrap();
        assert!(events.contains(&scalar("my net")));
        assert!(events.contains(&scalar("hunter2")));
    }

    #[test]
    fn empty_stream_has_no_documents() {
        assert_eq!(
            scan("# nothing\n").unwrap(),
            vec![Event::StreamStart, Event::StreamEnd]
        );
    }

    #[test]
    fn missing_colon_is_syntax_error() {
        assert!(matches!(scan("start 0x1000\n"), Err(Error::Syntax(1))));
    }

    #[test]
    fn opener_without_body_is_syntax_error() {
        assert!(matches!(scan("radio:\n"), Err(Error::Syntax(1))));
    }

    #[test]
    fn shallow_child_is_indent_error() {
        assert!(matches!(
            scan("radio:\nregion: us\n"),
            Err(Error::Indent(2))
        ));
    }

    #[test]
    fn stray_deep_indent_is_indent_error() {
        assert!(matches!(
            scan("start: 0\n    end: 1\n"),
            Err(Error::Indent(2))
        ));
    }
}
