/// Single-line text entry for the grid-size and name prompts.
///
/// The prefilled text behaves as if selected: the first typed character
/// replaces it, while Backspace edits it in place.

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineEditor {
    label: String,
    text: String,
    max_chars: usize,
    /// Text is still the untouched prefill.
    pristine: bool,
}

impl LineEditor {
    /// Editor prefilled with `initial` (truncated to `max_chars`).
    pub fn new(label: &str, initial: &str, max_chars: usize) -> Self {
        LineEditor {
            label: label.to_string(),
            text: initial.chars().take(max_chars).collect(),
            max_chars,
            pristine: !initial.is_empty(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Append `c`, replacing an untouched prefill. Returns false when the
    /// line is full.
    pub fn insert(&mut self, c: char) -> bool {
        if self.pristine {
            self.text.clear();
            self.pristine = false;
        }
        if self.text.chars().count() >= self.max_chars {
            return false;
        }
        self.text.push(c);
        true
    }

    pub fn extend(&mut self, chars: &[char]) {
        for &c in chars {
            if !self.insert(c) {
                break;
            }
        }
    }

    pub fn backspace(&mut self) {
        self.pristine = false;
        self.text.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_replaces_prefill() {
        let mut e = LineEditor::new("Enter grid size (2-10):", "3", 4);
        e.extend(&['5']);
        assert_eq!(e.text(), "5");
        e.extend(&['0']);
        assert_eq!(e.text(), "50");
        assert_eq!(e.label(), "Enter grid size (2-10):");
    }

    #[test]
    fn backspace_edits_prefill_in_place() {
        let mut e = LineEditor::new("Name:", "Ann", 16);
        e.backspace();
        e.extend(&['a']);
        assert_eq!(e.text(), "Ana");

        let mut size = LineEditor::new("Size:", "3", 2);
        size.backspace();
        size.extend(&['1', '0', '5']);
        assert_eq!(size.text(), "10");
        assert!(!size.insert('x'));
    }

    #[test]
    fn limit_counts_chars_not_bytes() {
        let mut e = LineEditor::new("Name:", "Zoë", 4);
        e.backspace();
        assert!(e.insert('ë'));
        assert!(e.insert('é'));
        assert!(!e.insert('!'));
        assert_eq!(e.text(), "Zoëé");

        let truncated = LineEditor::new("Name:", "abcdef", 3);
        assert_eq!(truncated.text(), "abc");
    }

    #[test]
    fn empty_prefill_appends() {
        let mut e = LineEditor::new("Name:", "", 8);
        e.extend(&['B', 'o']);
        assert_eq!(e.text(), "Bo");
    }
}
