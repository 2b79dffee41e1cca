//! Form field value objects

/// Character used to mask secret fields
pub const MASK_CHAR: char = '•';

/// Represents a single text input with its configuration and value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub label: String,
    pub placeholder: String,
    pub value: String,
    pub is_secret: bool,
}

impl FormField {
    /// Create a new text field
    pub fn text(label: &str, placeholder: &str) -> Self {
        Self {
            label: label.to_string(),
            placeholder: placeholder.to_string(),
            value: String::new(),
            is_secret: false,
        }
    }

    /// Create a new masked field
    pub fn secret(label: &str, placeholder: &str) -> Self {
        Self {
            is_secret: true,
            ..Self::text(label, placeholder)
        }
    }

    /// Set an initial value, builder style
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn as_text(&self) -> &str {
        &self.value
    }

    /// Push a character to the field value
    pub fn push_char(&mut self, c: char) {
        self.value.push(c);
    }

    /// Remove the last character from the field value
    pub fn pop_char(&mut self) {
        self.value.pop();
    }

    /// Get the display value for rendering
    pub fn display_value(&self) -> String {
        if self.is_secret {
            MASK_CHAR.to_string().repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }
}
