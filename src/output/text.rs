//! Plain text output formatter for duplicate scan results.
//!
//! Each group is printed as a header line holding the leading characters of
//! the group's digest, followed by one indented line per member path:
//!
//! ```text
//! hash 2cf24dba5fb0…
//!   /data/a/x.txt
//!   /data/b/x.txt
//! ```
//!
//! Paths are printed in group order, so the first path is the first file
//! encountered for that content. A scan with no duplicates prints nothing.

use std::io::{self, Write};

use yansi::Paint;

use crate::duplicates::DuplicateGroup;

/// Text output formatter.
pub struct TextOutput<'a> {
    groups: &'a [DuplicateGroup],
    color: bool,
}

impl<'a> TextOutput<'a> {
    /// Create a new text formatter without colour.
    #[must_use]
    pub fn new(groups: &'a [DuplicateGroup]) -> Self {
        Self {
            groups,
            color: false,
        }
    }

    /// Highlight group headers.
    #[must_use]
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Write every group to `writer`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for group in self.groups {
            let header = format_header(group);
            if self.color {
                writeln!(writer, "{}", header.yellow().bold())?;
            } else {
                writeln!(writer, "{header}")?;
            }
            for file in &group.files {
                writeln!(writer, "  {}", file.path.display())?;
            }
        }
        writer.flush()
    }

    /// Render the groups as a string.
    #[must_use]
    pub fn render(&self) -> String {
        let mut buffer = Vec::new();
        // Writing to a Vec cannot fail
        let _ = self.write_to(&mut buffer);
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

fn format_header(group: &DuplicateGroup) -> String {
    format!("hash {}…", group.short_hash())
}
