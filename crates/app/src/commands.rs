/// One line of user input at the quiz prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Begin a quiz, resuming when `resume` is set and a snapshot exists.
    Start { resume: bool },
    /// Zero-based option index.
    Select(usize),
    Submit,
    Next,
    Reset,
    Report,
    Help,
    Quit,
    Unknown,
}

impl Command {
    /// Parse a prompt line. Options are entered 1-based.
    #[must_use]
    pub fn parse(line: &str) -> Self {
        let input = line.trim().to_ascii_lowercase();
        match input.as_str() {
            "" | "start" | "y" | "yes" => Self::Start { resume: true },
            "fresh" | "new" => Self::Start { resume: false },
            "s" | "submit" => Self::Submit,
            "n" | "next" => Self::Next,
            "r" | "reset" => Self::Reset,
            "report" => Self::Report,
            "h" | "help" | "?" => Self::Help,
            "q" | "quit" | "exit" => Self::Quit,
            other => match other.parse::<usize>() {
                Ok(number) if number > 0 => Self::Select(number - 1),
                _ => Self::Unknown,
            },
        }
    }
}

pub const HELP: &str = "\
Commands:
  <enter>, start   start the quiz, resuming saved progress
  fresh            start over, ignoring saved progress
  1..N             select an option
  s                submit the selected option
  n                go to the next question
  r                reset the quiz
  report           print the error report
  q                quit";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_select_zero_based_options() {
        assert_eq!(Command::parse("1"), Command::Select(0));
        assert_eq!(Command::parse(" 4 \n"), Command::Select(3));
        assert_eq!(Command::parse("0"), Command::Unknown);
        assert_eq!(Command::parse("-2"), Command::Unknown);
    }

    #[test]
    fn words_are_case_insensitive() {
        assert_eq!(Command::parse("S"), Command::Submit);
        assert_eq!(Command::parse("Next"), Command::Next);
        assert_eq!(Command::parse("REPORT"), Command::Report);
        assert_eq!(Command::parse("q"), Command::Quit);
    }

    #[test]
    fn empty_line_starts_with_resume() {
        assert_eq!(Command::parse(""), Command::Start { resume: true });
        assert_eq!(Command::parse("fresh"), Command::Start { resume: false });
    }

    #[test]
    fn anything_else_is_unknown() {
        assert_eq!(Command::parse("maybe"), Command::Unknown);
    }
}
