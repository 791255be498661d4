use std::str::FromStr;

use crate::Error;

/// Language used for user-facing notifications and preview text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Locale {
    #[default]
    English,
    /// Brazilian Portuguese.
    Portuguese,
}

impl Locale {
    /// Question asked before discarding the current document.
    pub fn confirm_clear(&self) -> &'static str {
        match self {
            Locale::English => "Are you sure you want to clear the code?",
            Locale::Portuguese => "Tem certeza que deseja limpar o código?",
        }
    }

    /// Text shown on the preview surface while nothing is running.
    pub fn preview_placeholder(&self) -> &'static str {
        match self {
            Locale::English => "Your game will appear here",
            Locale::Portuguese => "O seu jogo vai aparecer aqui",
        }
    }

    /// Warning shown when a provider answered without any usable HTML.
    pub fn empty_generation(&self) -> &'static str {
        match self {
            Locale::English => "The AI returned no usable code. Try rephrasing the request.",
            Locale::Portuguese => "A IA não retornou código utilizável. Tente reformular o pedido.",
        }
    }

    /// Whether a console answer accepts a confirmation prompt.
    pub fn is_affirmative(&self, answer: &str) -> bool {
        let answer = answer.trim().to_lowercase();
        match self {
            Locale::English => matches!(answer.as_str(), "y" | "yes"),
            Locale::Portuguese => matches!(answer.as_str(), "s" | "sim" | "y" | "yes"),
        }
    }
}

impl FromStr for Locale {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "en-us" | "en-gb" | "english" => Ok(Locale::English),
            "pt" | "pt-br" | "portuguese" => Ok(Locale::Portuguese),
            other => Err(Error::config(format!(
                "Invalid locale '{other}'. Valid values are: en, pt-BR"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_locale() {
        assert_eq!("pt-BR".parse::<Locale>().unwrap(), Locale::Portuguese);
        assert_eq!("EN".parse::<Locale>().unwrap(), Locale::English);
        assert!("klingon".parse::<Locale>().is_err());
    }

    #[test]
    fn test_affirmative_answers() {
        assert!(Locale::Portuguese.is_affirmative("Sim"));
        assert!(Locale::Portuguese.is_affirmative(" s "));
        assert!(Locale::English.is_affirmative("yes"));
        assert!(!Locale::English.is_affirmative("s"));
        assert!(!Locale::English.is_affirmative(""));
    }
}
