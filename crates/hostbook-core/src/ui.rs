//! User interaction seams
//!
//! The core never renders prompts itself. Field collection and CRUD talk to
//! a `Prompter` for input and to a `Notifier` for messages; long-running
//! validation reports through `Progress`.

/// A free-text input prompt
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputRequest {
    /// Prompt text
    pub prompt: String,
    /// Hint shown when the box is empty
    pub placeholder: Option<String>,
    /// Pre-filled value
    pub value: Option<String>,
    /// Mask the input
    pub password: bool,
}

impl InputRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    #[must_use]
    pub fn value(mut self, value: Option<String>) -> Self {
        self.value = value;
        self
    }

    #[must_use]
    pub fn password(mut self) -> Self {
        self.password = true;
        self
    }
}

/// A single-choice pick list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PickRequest {
    /// Prompt text
    pub prompt: String,
    /// Choices, in display order
    pub items: Vec<String>,
    /// Pre-selected index
    pub selected: Option<usize>,
}

impl PickRequest {
    pub fn new(prompt: impl Into<String>, items: Vec<String>) -> Self {
        Self {
            prompt: prompt.into(),
            items,
            selected: None,
        }
    }

    #[must_use]
    pub fn selected(mut self, index: Option<usize>) -> Self {
        self.selected = index;
        self
    }
}

/// Source of user input
pub trait Prompter {
    /// Ask for text. `None` means the user dismissed the prompt.
    fn input(&mut self, request: &InputRequest) -> Option<String>;

    /// Ask for one of `request.items`. `None` means nothing was selected.
    fn pick(&mut self, request: &PickRequest) -> Option<usize>;

    /// Ask a yes/no question
    fn confirm(&mut self, message: &str) -> bool;
}

/// Message severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Warning,
    Error,
}

/// Sink for user-visible messages
pub trait Notifier {
    fn notify(&self, level: MessageLevel, message: &str);

    fn info(&self, message: &str) {
        self.notify(MessageLevel::Info, message);
    }

    fn warn(&self, message: &str) {
        self.notify(MessageLevel::Warning, message);
    }

    fn error(&self, message: &str) {
        self.notify(MessageLevel::Error, message);
    }
}

/// User-visible progress scope around a long-running operation
pub trait Progress: Send + Sync {
    fn begin(&self, title: &str);
    fn end(&self, title: &str);
}
