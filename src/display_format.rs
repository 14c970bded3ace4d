use crate::piece::Side;
use std::sync::atomic::{AtomicBool, Ordering};

/// How pieces, boards and games are rendered as text.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DisplayFormat {
    /// Chinese glyphs instead of latin letters.
    pub chinese: bool,
    /// ANSI colour and italics.
    pub effects: bool,
    /// Two letter pieces and single line games.
    pub concise: bool,
}

static DEFAULT_CHINESE: AtomicBool = AtomicBool::new(true);
static DEFAULT_EFFECTS: AtomicBool = AtomicBool::new(true);

const RED: &str = "\x1B[31m";
const ITALIC: &str = "\x1B[3m";
const RESET: &str = "\x1B[0m";

impl DisplayFormat {
    /// Process defaults for glyphs and effects, set once by a binary.
    pub fn configure(chinese: bool, effects: bool) {
        DEFAULT_CHINESE.store(chinese, Ordering::Relaxed);
        DEFAULT_EFFECTS.store(effects, Ordering::Relaxed);
    }

    pub fn default(concise: bool) -> Self {
        Self {
            chinese: DEFAULT_CHINESE.load(Ordering::Relaxed),
            effects: DEFAULT_EFFECTS.load(Ordering::Relaxed),
            concise,
        }
    }

    pub fn pretty() -> Self {
        Self::default(false)
    }

    /// Plain text with latin letters, suitable for logs and `to_string`.
    pub fn string() -> Self {
        Self {
            chinese: false,
            effects: false,
            concise: true,
        }
    }

    pub fn with_concise(&self, concise: bool) -> Self {
        Self { concise, ..*self }
    }

    /// Colours text belonging to Red; Black stays in the terminal colour.
    pub fn paint(&self, side: Side, text: &str) -> String {
        match side {
            Side::Red if self.effects => format!("{RED}{text}{RESET}"),
            _ => text.to_owned(),
        }
    }

    /// Marks text that deserves attention, such as the piece that just moved.
    pub fn emphasise(&self, text: &str) -> String {
        if self.effects {
            format!("{ITALIC}{text}{RESET}")
        } else {
            text.to_owned()
        }
    }
}
