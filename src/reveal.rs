/// Word-by-word reveal of an assistant answer.
///
/// Holds the whitespace-split words of the full text and a cursor over how
/// many are currently visible. The reveal tick advances the cursor one word
/// at a time; each step yields the growing space-joined prefix that replaces
/// the trailing chat message. The final prefix is the full answer with runs
/// of whitespace collapsed to single spaces.
#[derive(Debug, Clone)]
pub struct Reveal {
    words: Vec<String>,
    shown: usize,
}

impl Reveal {
    pub fn new(text: &str) -> Self {
        Self {
            words: text.split_whitespace().map(str::to_string).collect(),
            shown: 0,
        }
    }

    /// Reveal the next word and return the visible prefix, or None when
    /// every word is already shown.
    pub fn advance(&mut self) -> Option<String> {
        if self.shown >= self.words.len() {
            return None;
        }
        self.shown += 1;
        Some(self.words[..self.shown].join(" "))
    }

    pub fn is_done(&self) -> bool {
        self.shown >= self.words.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_one_word_at_a_time() {
        let mut reveal = Reveal::new("You get 20 days");
        assert!(!reveal.is_done());
        assert_eq!(reveal.advance().as_deref(), Some("You"));
        assert_eq!(reveal.advance().as_deref(), Some("You get"));
        assert_eq!(reveal.advance().as_deref(), Some("You get 20"));
        assert_eq!(reveal.advance().as_deref(), Some("You get 20 days"));
        assert!(reveal.is_done());
        assert_eq!(reveal.advance(), None);
    }

    #[test]
    fn normalizes_whitespace() {
        let mut reveal = Reveal::new("  You   get\n20\tdays  ");
        let mut last = String::new();
        while let Some(prefix) = reveal.advance() {
            last = prefix;
        }
        assert_eq!(last, "You get 20 days");
    }

    #[test]
    fn empty_text_is_done_immediately() {
        let mut reveal = Reveal::new("   ");
        assert!(reveal.is_done());
        assert_eq!(reveal.advance(), None);
    }
}
