//! Platform-neutral rendering of a game.
//!
//! A [`Board`] is what a game looks like at a given turn: a title, an optional
//! free text description, an optional monospace drawing and an ordered list of
//! named fields. The chat layer decides how to turn it into markup.

/// One named value on a board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardField {
    /// Field label
    pub name: String,
    /// Field content
    pub value: String,
    /// `true` when the field can share a line with its neighbours,
    /// `false` when it needs a block of its own
    pub inline: bool,
    /// `true` when the value must be shown in a monospace font
    pub monospace: bool,
}

/// Rendered state of a game session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Board title, e.g. `🔠 Hangman`
    pub title: String,
    /// Optional sentence shown under the title
    pub description: Option<String>,
    /// Optional ASCII art, shown verbatim in a monospace block
    pub drawing: Option<String>,
    /// Accent colour as `0xRRGGBB`, a hint the chat layer may ignore
    pub color: Option<u32>,
    /// Fields in display order
    pub fields: Vec<BoardField>,
}

impl Board {
    pub fn new(title: &str) -> Self {
        Board {
            title: title.to_owned(),
            description: None,
            drawing: None,
            color: None,
            fields: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn drawing(mut self, drawing: impl Into<String>) -> Self {
        self.drawing = Some(drawing.into());
        self
    }

    pub fn color(mut self, color: u32) -> Self {
        self.color = Some(color);
        self
    }

    /// Adds a field that may share its line with other inline fields.
    pub fn inline_field(mut self, name: &str, value: impl Into<String>) -> Self {
        self.push_field(name, value, true);
        self
    }

    /// Adds a field displayed on its own.
    pub fn block_field(mut self, name: &str, value: impl Into<String>) -> Self {
        self.push_field(name, value, false);
        self
    }

    /// Adds a block field whose value is displayed in monospace.
    pub fn monospace_field(mut self, name: &str, value: impl Into<String>) -> Self {
        self.fields.push(BoardField {
            name: name.to_owned(),
            value: value.into(),
            inline: false,
            monospace: true,
        });
        self
    }

    /// Appends a field to an already built board.
    pub fn push_field(&mut self, name: &str, value: impl Into<String>, inline: bool) {
        self.fields.push(BoardField {
            name: name.to_owned(),
            value: value.into(),
            inline,
            monospace: false,
        });
    }

    /// Returns the value of the first field with the given name.
    #[cfg(test)]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| field.value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_keeps_field_order() {
        let board = Board::new("title")
            .inline_field("a", "1")
            .block_field("b", "2")
            .monospace_field("c", "3");

        let names: Vec<&str> = board.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert!(board.fields[0].inline);
        assert!(!board.fields[1].inline);
        assert!(board.fields[2].monospace);
    }

    #[test]
    fn test_board_field_lookup() {
        let mut board = Board::new("title").inline_field("Hint", "⬆️");
        board.push_field("🏆 Solved by", "@alice:example.com", false);

        assert_eq!(board.field("Hint"), Some("⬆️"));
        assert_eq!(board.field("🏆 Solved by"), Some("@alice:example.com"));
        assert_eq!(board.field("missing"), None);
    }
}
