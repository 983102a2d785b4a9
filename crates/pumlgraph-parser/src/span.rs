/// Where a token starts in the tokenizer input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Span {
    start: usize,
}

impl Span {
    pub fn at(start: usize) -> Self {
        Self { start }
    }

    /// Byte offset of the first character of the token
    pub fn start(&self) -> usize {
        self.start
    }
}
