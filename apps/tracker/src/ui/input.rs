/// Single-line text field used while adding a tracking number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputField {
    value: String,
    placeholder: String,
    prompt: String,
    char_limit: usize,
    focused: bool,
}

pub const INPUT_CHAR_LIMIT: usize = 156;

impl Default for InputField {
    fn default() -> Self {
        Self {
            value: String::new(),
            placeholder: "New parcel number".to_string(),
            prompt: " ➕ ".to_string(),
            char_limit: INPUT_CHAR_LIMIT,
            focused: false,
        }
    }
}

impl InputField {
    /// Control characters and input past the limit are dropped.
    pub fn push(&mut self, c: char) {
        if c.is_control() || self.value.chars().count() >= self.char_limit {
            return;
        }
        self.value.push(c);
    }

    pub fn pop(&mut self) {
        self.value.pop();
    }

    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.value)
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn view(&self) -> String {
        let caret = if self.focused { "▏" } else { "" };
        if self.value.is_empty() {
            format!("{}{caret}{}", self.prompt, self.placeholder)
        } else {
            format!("{}{}{caret}", self.prompt, self.value)
        }
    }
}
