use super::{Section, error::Error};
use crate::conventions::FormatConventions;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    Comment,
    Tag,
    /// First data line of the interaction section (pair label + temperatures).
    Header,
    Data,
}

/// One line of a particle-set file together with its classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    raw: String,
    kind: LineKind,
    section: Option<Section>,
    number: usize,
}

impl Line {
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn kind(&self) -> LineKind {
        self.kind
    }

    pub fn section(&self) -> Option<Section> {
        self.section
    }

    /// 1-based line number in the source file this line came from.
    pub fn number(&self) -> usize {
        self.number
    }

    pub fn is_data_in(&self, section: Section) -> bool {
        self.kind == LineKind::Data && self.section == Some(section)
    }

    pub fn tokens(&self) -> Vec<&str> {
        self.raw.split_whitespace().collect()
    }

    pub fn first_token(&self) -> Option<&str> {
        self.raw.split_whitespace().next()
    }

    /// New data line in the same section, built from `tokens`.
    ///
    /// The leading indentation of `self` is kept; tokens are joined with a
    /// tab if `self` used tabs, otherwise with a single space.
    pub fn with_tokens<S: AsRef<str>>(&self, tokens: &[S]) -> Line {
        let indent = &self.raw[..self.raw.len() - self.raw.trim_start().len()];
        let separator = if self.raw.trim().contains('\t') {
            "\t"
        } else {
            " "
        };
        let body = tokens
            .iter()
            .map(|t| t.as_ref())
            .collect::<Vec<_>>()
            .join(separator);
        Line {
            raw: format!("{indent}{body}"),
            kind: self.kind,
            section: self.section,
            number: self.number,
        }
    }

    /// Copy of `self` with the token at `index` replaced.
    pub fn with_token(&self, index: usize, value: &str) -> Line {
        let mut tokens: Vec<String> = self.tokens().into_iter().map(String::from).collect();
        if let Some(slot) = tokens.get_mut(index) {
            *slot = value.to_string();
        }
        self.with_tokens(&tokens)
    }
}

/// Particle-set file as a sequence of classified lines.
///
/// Section boundaries are detected by comparing the trimmed line
/// case-insensitively with the formatted start/end tags. Rendering emits the
/// raw text of every line, so unedited lines survive a round trip unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    lines: Vec<Line>,
}

impl Document {
    pub fn parse(text: &str, format: &FormatConventions) -> Result<Self, Error> {
        let tags: Vec<(Section, String, String)> = Section::ALL
            .iter()
            .map(|&s| (s, format.start_line(s), format.end_line(s)))
            .collect();

        let mut lines = Vec::new();
        let mut current: Option<Section> = None;
        let mut header_pending = false;
        let mut seen: Vec<Section> = Vec::new();

        for (idx, raw) in text.lines().enumerate() {
            let number = idx + 1;
            let trimmed = raw.trim();

            let start = tags
                .iter()
                .find(|(_, start, _)| trimmed.eq_ignore_ascii_case(start))
                .map(|(s, _, _)| *s);
            let end = tags
                .iter()
                .find(|(_, _, end)| trimmed.eq_ignore_ascii_case(end))
                .map(|(s, _, _)| *s);

            let (kind, section) = if let Some(section) = start {
                if let Some(open) = current {
                    return Err(Error::structure(
                        number,
                        format!("{section} section starts inside unterminated {open} section"),
                    ));
                }
                if seen.contains(&section) {
                    return Err(Error::structure(
                        number,
                        format!("{section} section appears more than once"),
                    ));
                }
                seen.push(section);
                current = Some(section);
                header_pending = section == Section::ParticleInteractions;
                (LineKind::Tag, Some(section))
            } else if let Some(section) = end {
                if current != Some(section) {
                    return Err(Error::structure(
                        number,
                        format!("end of {section} section without matching start"),
                    ));
                }
                current = None;
                (LineKind::Tag, Some(section))
            } else if trimmed.is_empty() {
                (LineKind::Blank, current)
            } else if format.is_comment(raw.trim_start()) {
                (LineKind::Comment, current)
            } else if header_pending {
                header_pending = false;
                (LineKind::Header, current)
            } else {
                (LineKind::Data, current)
            };

            lines.push(Line {
                raw: raw.to_string(),
                kind,
                section,
                number,
            });
        }

        if let Some(open) = current {
            return Err(Error::structure(
                lines.len(),
                format!("{open} section is not terminated"),
            ));
        }

        Ok(Self { lines })
    }

    pub fn read_path(path: &Path, format: &FormatConventions) -> Result<Self, Error> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text, format)
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn has_section(&self, section: Section) -> bool {
        self.lines
            .iter()
            .any(|l| l.kind == LineKind::Tag && l.section == Some(section))
    }

    /// Data rows of `section`, excluding the interaction header.
    pub fn rows(&self, section: Section) -> impl Iterator<Item = &Line> {
        self.lines.iter().filter(move |l| l.is_data_in(section))
    }

    pub fn header(&self) -> Option<&Line> {
        self.lines.iter().find(|l| l.kind == LineKind::Header)
    }

    /// Builds a new document by letting `edit` decide, line by line, what
    /// replaces each line. Pushing the line itself keeps it; pushing nothing
    /// drops it.
    pub fn rewrite<E, F>(&self, mut edit: F) -> Result<Document, E>
    where
        F: FnMut(&Line, &mut Vec<Line>) -> Result<(), E>,
    {
        let mut lines = Vec::with_capacity(self.lines.len());
        for line in &self.lines {
            edit(line, &mut lines)?;
        }
        Ok(Document { lines })
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(&line.raw);
            out.push('\n');
        }
        out
    }

    pub fn write_path(&self, path: &Path) -> Result<(), Error> {
        fs::write(path, self.render())?;
        Ok(())
    }
}
