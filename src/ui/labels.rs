//! Localized user-facing strings

use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Language {
    #[default]
    Sv,
    En,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    pub start: &'static str,
    pub pause: &'static str,
    pub resume: &'static str,
    pub reset: &'static str,
    pub quit: &'static str,
    pub minutes: &'static str,
    pub seconds: &'static str,
    pub invalid_duration: &'static str,
    pub sound_played: &'static str,
    pub completed: &'static str,
}

impl Labels {
    pub fn for_language(language: Language) -> Self {
        match language {
            Language::Sv => Self::swedish(),
            Language::En => Self::english(),
        }
    }

    pub fn swedish() -> Self {
        Self {
            start: "Starta",
            pause: "Paus",
            resume: "Fortsätt",
            reset: "Återställ",
            quit: "Avsluta",
            minutes: "min",
            seconds: "sek",
            invalid_duration: "Ställ in en tid större än 0",
            sound_played: "Gong!",
            completed: "Tiden är ute",
        }
    }

    pub fn english() -> Self {
        Self {
            start: "Start",
            pause: "Pause",
            resume: "Resume",
            reset: "Reset",
            quit: "Quit",
            minutes: "min",
            seconds: "sec",
            invalid_duration: "Set a time greater than 0",
            sound_played: "Gong!",
            completed: "Time is up",
        }
    }
}

impl Default for Labels {
    fn default() -> Self {
        Self::swedish()
    }
}
