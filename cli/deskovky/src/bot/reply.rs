//! Chat replies, modeled on rich chat embeds and rendered as plain text.

use std::fmt::{self, Display};

/// A titled field of a [Reply].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub value: String,
    /// Inline fields render as a single `name: value` line.
    pub inline: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    pub title: Option<String>,
    pub description: Option<String>,
    pub fields: Vec<Field>,
    pub footer: Option<String>,
}

impl Reply {
    /// A reply consisting of a single line of text.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            description: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn embed(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            description: Some(description.into()),
            ..Default::default()
        }
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(Field {
            name: name.into(),
            value: value.into(),
            inline: false,
        });
        self
    }

    pub fn inline_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(Field {
            name: name.into(),
            value: value.into(),
            inline: true,
        });
        self
    }

    pub fn footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }
}

impl Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(title) = &self.title {
            writeln!(f, "== {title} ==")?;
        }
        if let Some(description) = &self.description {
            writeln!(f, "{description}")?;
        }

        for field in &self.fields {
            if field.inline {
                writeln!(f, "{}: {}", field.name, field.value)?;
            } else {
                writeln!(f, "{}", field.name)?;
                for line in field.value.lines() {
                    writeln!(f, "  {line}")?;
                }
            }
        }

        if let Some(footer) = &self.footer {
            writeln!(f, "-- {footer}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn text_reply_is_one_line() {
        assert_eq!(Reply::text("hello").to_string(), "hello\n");
    }

    #[test]
    fn renders_all_parts() {
        let reply = Reply::embed("Azul", "Tile drafting")
            .inline_field("Players", "2-4")
            .field("Categories", "• Abstract\n• Family")
            .footer("Powered by tests");

        assert_eq!(reply.to_string(), indoc! {"
            == Azul ==
            Tile drafting
            Players: 2-4
            Categories
              • Abstract
              • Family
            -- Powered by tests
        "});
    }
}
