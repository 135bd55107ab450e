//! Source buffers and position marks.
//!
//! A [`Source`] is the immutable text a lexer consumes; a [`Mark`] is a byte
//! range into it, carried by every token, match result, and diagnostic so
//! that errors can point at the offending line with a caret.

use std::rc::Rc;

/// An immutable input buffer together with the path it was read from.
///
/// Sources are created once per parse and shared behind [`Rc`]; nothing in
/// the pipeline ever mutates one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub path: String,
    pub data: String,
}

impl Source {
    pub fn new(path: impl Into<String>, data: impl Into<String>) -> Rc<Source> {
        Rc::new(Source {
            path: path.into(),
            data: data.into(),
        })
    }

    /// Wraps an in-memory string under the placeholder path `<string>`.
    pub fn from_string(data: impl Into<String>) -> Rc<Source> {
        Source::new("<string>", data)
    }
}

/// A byte range `[start, end)` into a [`Source`], with an optional "main"
/// anchor inside the range.
///
/// The anchor lets composite nodes point at a meaningful sub-token (a binary
/// expression points at its operator rather than its whole span), which is
/// what diagnostics render.
#[derive(Debug, Clone, PartialEq)]
pub struct Mark {
    pub source: Rc<Source>,
    pub start: usize,
    pub end: usize,
    pub main: Option<usize>,
}

impl Mark {
    pub fn new(source: Rc<Source>, start: usize, end: usize) -> Mark {
        Mark {
            source,
            start,
            end,
            main: None,
        }
    }

    /// A zero-width mark, used for end-of-input and "here" diagnostics.
    pub fn point(source: Rc<Source>, at: usize) -> Mark {
        Mark::new(source, at, at)
    }

    pub fn with_main(mut self, main: usize) -> Mark {
        self.main = Some(main);
        self
    }

    /// The anchor offset: `main` when set, else `start`.
    pub fn i(&self) -> usize {
        self.main.unwrap_or(self.start)
    }

    /// 1-based line number of the anchor.
    pub fn lineno(&self) -> usize {
        self.source.data[..self.i()].matches('\n').count() + 1
    }

    /// 1-based byte column of the anchor within its line.
    pub fn colno(&self) -> usize {
        let i = self.i();
        match self.source.data[..i].rfind('\n') {
            Some(nl) => i - nl,
            None => i + 1,
        }
    }

    /// The full text of the line containing the anchor, without its newline.
    pub fn line(&self) -> &str {
        let data = &self.source.data;
        let i = self.i();
        let begin = data[..i].rfind('\n').map_or(0, |nl| nl + 1);
        let finish = data[i..].find('\n').map_or(data.len(), |nl| i + nl);
        &data[begin..finish]
    }

    /// Renders `"<path> line <n>\n<line>\n<caret>\n"` for diagnostics.
    pub fn info(&self) -> String {
        format!(
            "{} line {}\n{}\n{}*\n",
            self.source.path,
            self.lineno(),
            self.line(),
            " ".repeat(self.colno() - 1),
        )
    }

    /// Combines marks covering `self` through `end`, anchored at `middle`
    /// (defaulting to `self`).
    pub fn join(&self, middle: Option<&Mark>, end: &Mark) -> Mark {
        Mark {
            source: self.source.clone(),
            start: self.start,
            end: end.end,
            main: middle.unwrap_or(self).main,
        }
    }
}
