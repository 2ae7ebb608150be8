//! Display output models for script text runs
//!
//! A contiguous run of text/menu lines becomes either a one-line transient
//! board message or, for multiple lines, a scrollable model handed to the
//! outer display layer.

use crate::core::types::ThingId;

/// One line of a scrollable text model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollLine {
    pub text: String,
    /// `$`-prefixed lines render centered/highlighted.
    pub pretty: bool,
    /// `!label;text` menu entries carry the label to send back to the
    /// source thing when chosen.
    pub label: Option<String>,
}

impl ScrollLine {
    pub fn plain(text: impl Into<String>) -> ScrollLine {
        ScrollLine {
            text: text.into(),
            pretty: false,
            label: None,
        }
    }

    /// Parse a raw script line (sigil included) into a scroll line.
    pub fn parse(raw: &str) -> ScrollLine {
        match raw.as_bytes().first() {
            Some(b'$') => ScrollLine {
                text: raw[1..].to_string(),
                pretty: true,
                label: None,
            },
            Some(b'!') => {
                let rest = &raw[1..];
                match rest.split_once(';') {
                    Some((label, text)) => ScrollLine {
                        text: text.to_string(),
                        pretty: false,
                        label: Some(label.trim().to_ascii_lowercase()),
                    },
                    None => ScrollLine::plain(rest),
                }
            }
            _ => ScrollLine::plain(raw),
        }
    }
}

/// A multi-line text/menu display produced by a script. Producing one ends
/// the source thing's instruction budget for the tick; the outer layer
/// displays it and reports any chosen menu label back to the world.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollModel {
    pub title: String,
    pub lines: Vec<ScrollLine>,
    /// The thing that produced the model; menu choices send their label
    /// here.
    pub source: ThingId,
}
