//! # Line Field Cursor
//!
//! A forward-only tokenizer over one line of text. Its single operation is
//! "next token up to delimiter D"; every field is consumed exactly once,
//! left to right, and tokens are borrowed views into the read buffer so the
//! hot loop performs no per-field allocation.

/// Forward-only cursor over the fields of a single line.
#[derive(Debug)]
pub struct LineCursor<'a> {
    rest: Option<&'a str>,
}

impl<'a> LineCursor<'a> {
    /// Wrap a line (without its trailing newline).
    pub fn new(line: &'a str) -> Self {
        Self { rest: Some(line) }
    }

    /// Next token up to (not including) `delim`, advancing past it.
    ///
    /// The final field of a line is returned even when no delimiter follows
    /// it; after that, the cursor is exhausted and returns `None`.
    #[inline]
    pub fn next_field(&mut self, delim: char) -> Option<&'a str> {
        let rest = self.rest?;
        match rest.find(delim) {
            Some(pos) => {
                let token = &rest[..pos];
                self.rest = Some(&rest[pos + delim.len_utf8()..]);
                Some(token)
            }
            None => {
                self.rest = None;
                Some(rest)
            }
        }
    }

    /// Next tab-separated field (the VCF column delimiter).
    #[inline]
    pub fn next_column(&mut self) -> Option<&'a str> {
        self.next_field('\t')
    }

    /// Everything not yet consumed, without advancing.
    pub fn remainder(&self) -> Option<&'a str> {
        self.rest
    }
}
