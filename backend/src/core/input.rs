use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InputError {
    #[error("I/O failure: {0}")]
    Io(#[from] io::Error),
}

/// Abstraction for input sources, enabling easy mocking for unit tests.
pub trait InputProvider {
    fn read_line(&mut self, prompt: &str) -> Result<String, InputError>;
}

/// Prompting helpers shared by the terminal flows. Every catalog field is
/// free text, so there is no numeric parsing here.
pub struct InputHandler<I: InputProvider> {
    provider: I,
}

impl<I: InputProvider> InputHandler<I> {
    pub fn new(provider: I) -> Self {
        Self { provider }
    }

    pub fn get_string_trimmed(&mut self, prompt: &str) -> Result<String, InputError> {
        self.provider.read_line(prompt).map(|s| s.trim().to_string())
    }

    /// Prompt showing the current value; an empty answer keeps it.
    pub fn get_with_default(&mut self, label: &str, current: &str) -> Result<String, InputError> {
        let answer = self.get_string_trimmed(&format!("{label} [{current}]: "))?;
        if answer.is_empty() {
            Ok(current.to_string())
        } else {
            Ok(answer)
        }
    }

    /// y/Y confirms, anything else declines.
    pub fn confirm(&mut self, prompt: &str) -> Result<bool, InputError> {
        let answer = self.get_string_trimmed(prompt)?;
        Ok(answer == "y" || answer == "Y")
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::collections::VecDeque;

    /// Scripted provider for automated testing without a terminal.
    pub struct MockProvider {
        pub responses: VecDeque<String>,
    }

    impl MockProvider {
        pub fn scripted(responses: &[&str]) -> Self {
            Self {
                responses: responses.iter().map(|s| s.to_string()).collect(),
            }
        }
    }

    impl InputProvider for MockProvider {
        fn read_line(&mut self, _prompt: &str) -> Result<String, InputError> {
            self.responses.pop_front().ok_or_else(|| {
                InputError::Io(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "no more responses",
                ))
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::MockProvider;
    use super::*;

    #[test]
    fn trims_surrounding_whitespace() {
        let mut handler = InputHandler::new(MockProvider::scripted(&["  Dune  "]));
        assert_eq!(handler.get_string_trimmed("Title: ").unwrap(), "Dune");
    }

    #[test]
    fn empty_answer_keeps_the_default() {
        let mut handler = InputHandler::new(MockProvider::scripted(&["", "Lynch"]));
        assert_eq!(
            handler.get_with_default("Director", "Villeneuve").unwrap(),
            "Villeneuve"
        );
        assert_eq!(
            handler.get_with_default("Director", "Villeneuve").unwrap(),
            "Lynch"
        );
    }

    #[test]
    fn only_y_confirms() {
        let mut handler = InputHandler::new(MockProvider::scripted(&["y", "Y", "n", ""]));
        assert!(handler.confirm("? ").unwrap());
        assert!(handler.confirm("? ").unwrap());
        assert!(!handler.confirm("? ").unwrap());
        assert!(!handler.confirm("? ").unwrap());
    }

    #[test]
    fn exhausted_script_is_an_io_error() {
        let mut handler = InputHandler::new(MockProvider::scripted(&[]));
        assert!(matches!(
            handler.get_string_trimmed("Title: "),
            Err(InputError::Io(_))
        ));
    }
}
