//! `ParamText` substitution.

use std::borrow::Cow;

/// The four `^0`..`^3` parameter strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamText {
    params: [String; 4],
}

impl ParamText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all four parameters.
    pub fn set<S: AsRef<str>>(&mut self, params: [S; 4]) {
        for (slot, value) in self.params.iter_mut().zip(params.iter()) {
            *slot = value.as_ref().to_string();
        }
    }

    /// Parameter `index`, or `None` past `^3`.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.params.get(index).map(String::as_str)
    }

    /// Substitute every `^0`..`^3` in `text`. Any other caret sequence is
    /// left as written.
    pub fn expand<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if !text.contains('^') {
            return Cow::Borrowed(text);
        }
        let mut out = String::with_capacity(text.len());
        let mut chars = text.chars().peekable();
        while let Some(ch) = chars.next() {
            let param = match (ch, chars.peek()) {
                ('^', Some(&d @ '0'..='3')) => Some(d as usize - '0' as usize),
                _ => None,
            };
            match param {
                Some(index) => {
                    chars.next();
                    out.push_str(&self.params[index]);
                }
                None => out.push(ch),
            }
        }
        Cow::Owned(out)
    }
}
