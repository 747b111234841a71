//! Help and usage rendering for a [`Catalog`].
//!
//! Rendering only reads the catalog; it plays no part in parsing.

use crate::catalog::Catalog;
use crate::option::{LONG_PREFIX, OptDef, SHORT_PREFIX};

pub const DEFAULT_WIDTH: usize = 74;
pub const DEFAULT_LEFT_PADDING: usize = 1;
pub const DEFAULT_DESCRIPTION_PADDING: usize = 3;
pub const DEFAULT_SYNTAX_PREFIX: &str = "usage:";

// Descriptions never get squeezed narrower than this.
const MIN_DESCRIPTION_WIDTH: usize = 16;

/// Formats a usage line and an option table.
#[derive(Debug, Clone)]
pub struct HelpFormatter {
    width: usize,
    left_padding: usize,
    description_padding: usize,
    syntax_prefix: String,
    short_prefix: String,
    long_prefix: String,
    header: String,
    footer: String,
    auto_usage: bool,
}

impl Default for HelpFormatter {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            left_padding: DEFAULT_LEFT_PADDING,
            description_padding: DEFAULT_DESCRIPTION_PADDING,
            syntax_prefix: DEFAULT_SYNTAX_PREFIX.to_string(),
            short_prefix: SHORT_PREFIX.to_string(),
            long_prefix: LONG_PREFIX.to_string(),
            header: String::new(),
            footer: String::new(),
            auto_usage: false,
        }
    }
}

impl HelpFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    pub fn left_padding(mut self, padding: usize) -> Self {
        self.left_padding = padding;
        self
    }

    pub fn description_padding(mut self, padding: usize) -> Self {
        self.description_padding = padding;
        self
    }

    pub fn syntax_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.syntax_prefix = prefix.into();
        self
    }

    pub fn short_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.short_prefix = prefix.into();
        self
    }

    pub fn long_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.long_prefix = prefix.into();
        self
    }

    pub fn header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }

    pub fn footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = footer.into();
        self
    }

    /// Generate the usage line from the catalog instead of `syntax`.
    pub fn auto_usage(mut self, auto: bool) -> Self {
        self.auto_usage = auto;
        self
    }

    /// Render the full help text: usage, header, option table, footer.
    pub fn render(&self, app_name: &str, syntax: &str, catalog: &Catalog) -> String {
        let mut out = if self.auto_usage {
            self.usage(app_name, catalog)
        } else {
            let line = [self.syntax_prefix.as_str(), app_name, syntax.trim()]
                .iter()
                .filter(|s| !s.is_empty())
                .copied()
                .collect::<Vec<_>>()
                .join(" ");
            self.wrap_usage(&line, app_name)
        };

        if !self.header.trim().is_empty() {
            for line in wrap(self.header.trim_end(), self.width) {
                out.push_str(&line);
                out.push('\n');
            }
        }

        out.push_str(&self.options(catalog));

        if !self.footer.trim().is_empty() {
            for line in wrap(self.footer.trim_end(), self.width) {
                out.push_str(&line);
                out.push('\n');
            }
        }
        out
    }

    /// A usage line generated from the catalog, e.g.
    /// `usage: app [-v] -o <file> (-a | -b)`.
    pub fn usage(&self, app_name: &str, catalog: &Catalog) -> String {
        let mut parts: Vec<String> = Vec::new();
        if !self.syntax_prefix.is_empty() {
            parts.push(self.syntax_prefix.clone());
        }
        if !app_name.is_empty() {
            parts.push(app_name.to_string());
        }

        for def in catalog.iter().filter(|d| catalog.group_of(d).is_none()) {
            let item = self.usage_item(def);
            if def.is_required() {
                parts.push(item);
            } else {
                parts.push(format!("[{item}]"));
            }
        }

        for group in catalog.groups() {
            let items: Vec<String> = group.members().map(|d| self.usage_item(d)).collect();
            if items.is_empty() {
                continue;
            }
            let joined = items.join(" | ");
            if group.is_required() {
                parts.push(format!("({joined})"));
            } else {
                parts.push(format!("[{joined}]"));
            }
        }

        self.wrap_usage(&parts.join(" "), app_name)
    }

    /// The option table alone.
    pub fn options(&self, catalog: &Catalog) -> String {
        let rows: Vec<(String, &str)> = catalog
            .iter()
            .map(|def| (self.option_left(def), def.description()))
            .collect();
        let left_width = rows.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
        let desc_col = self.left_padding + left_width + self.description_padding;
        let desc_width = self
            .width
            .saturating_sub(desc_col)
            .max(MIN_DESCRIPTION_WIDTH);

        let mut out = String::new();
        for (left, desc) in rows {
            let mut line = format!("{}{}", " ".repeat(self.left_padding), left);
            let lines = wrap(desc, desc_width);
            let mut lines = lines.into_iter();
            if let Some(first) = lines.next() {
                let pad = desc_col - self.left_padding - left.chars().count();
                line.push_str(&" ".repeat(pad));
                line.push_str(&first);
            }
            out.push_str(line.trim_end());
            out.push('\n');
            for cont in lines {
                out.push_str(&" ".repeat(desc_col));
                out.push_str(&cont);
                out.push('\n');
            }
        }
        out
    }

    fn option_left(&self, def: &OptDef) -> String {
        let mut left = match (def.short_name(), def.long_name()) {
            (Some(s), Some(l)) => format!("{}{s},{}{l}", self.short_prefix, self.long_prefix),
            (Some(s), None) => format!("{}{s}", self.short_prefix),
            (None, Some(l)) => format!("{}{l}", self.long_prefix),
            (None, None) => String::new(),
        };
        left.push_str(&self.arg_suffix(def));
        left
    }

    fn usage_item(&self, def: &OptDef) -> String {
        let name = match (def.short_name(), def.long_name()) {
            (Some(s), _) => format!("{}{s}", self.short_prefix),
            (None, Some(l)) => format!("{}{l}", self.long_prefix),
            (None, None) => String::new(),
        };
        format!("{name}{}", self.arg_suffix(def))
    }

    fn arg_suffix(&self, def: &OptDef) -> String {
        if !def.has_args() || def.arg_name().is_empty() {
            return String::new();
        }
        if def.has_optional_arg() {
            format!(" [<{}>]", def.arg_name())
        } else {
            format!(" <{}>", def.arg_name())
        }
    }

    /// Wrap a usage line, indenting continuations past the program name.
    fn wrap_usage(&self, line: &str, app_name: &str) -> String {
        let indent = self.syntax_prefix.chars().count() + app_name.chars().count() + 2;
        let indent = if indent * 2 > self.width { 4 } else { indent };

        let mut out = String::new();
        for (i, chunk) in wrap(line, self.width.saturating_sub(indent).max(MIN_DESCRIPTION_WIDTH))
            .into_iter()
            .enumerate()
        {
            if i > 0 {
                out.push_str(&" ".repeat(indent));
            }
            out.push_str(&chunk);
            out.push('\n');
        }
        out
    }
}

/// Greedy whitespace wrapping. Explicit newlines are kept; words longer than
/// `width` sit on a line of their own.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            if !line.is_empty() && line.chars().count() + 1 + word.chars().count() > width {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        }
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::OptGroup;

    fn catalog() -> Catalog {
        Catalog::new()
            .option(
                OptDef::short("v")
                    .long("verbose")
                    .description("Print more")
                    .build()
                    .unwrap(),
            )
            .unwrap()
            .option(
                OptDef::short("o")
                    .has_arg()
                    .arg_name("file")
                    .required(true)
                    .description("Output file")
                    .build()
                    .unwrap(),
            )
            .unwrap()
            .group(
                OptGroup::new()
                    .required(true)
                    .option(OptDef::short("a").build().unwrap())
                    .unwrap()
                    .option(OptDef::short("b").build().unwrap())
                    .unwrap(),
            )
            .unwrap()
    }

    #[test]
    fn wrap_breaks_on_whitespace() {
        assert_eq!(wrap("one two three", 7), vec!["one two", "three"]);
        assert_eq!(wrap("averyveryverylongword x", 5), vec!["averyveryverylongword", "x"]);
        assert_eq!(wrap("a\nb", 80), vec!["a", "b"]);
        assert_eq!(wrap("", 80), Vec::<String>::new());
    }

    #[test]
    fn auto_usage_marks_optional_and_grouped_options() {
        let usage = HelpFormatter::new().usage("app", &catalog());
        assert_eq!(usage, "usage: app [-v] -o <file> (-a | -b)\n");
    }

    #[test]
    fn render_aligns_descriptions() {
        let text = HelpFormatter::new()
            .header("Do things.")
            .footer("See the manual.")
            .render("app", "[options] FILE", &catalog());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "usage: app [options] FILE");
        assert_eq!(lines[1], "Do things.");
        assert_eq!(lines[2], " -v,--verbose   Print more");
        assert_eq!(lines[3], " -o <file>      Output file");
        assert_eq!(lines[4], " -a");
        assert_eq!(lines.last(), Some(&"See the manual."));
    }

    #[test]
    fn long_descriptions_wrap_under_their_column() {
        let catalog = Catalog::new()
            .option(
                OptDef::long("mode")
                    .has_arg()
                    .optional_arg(true)
                    .description("one two three four five six seven eight nine ten")
                    .build()
                    .unwrap(),
            )
            .unwrap();
        let text = HelpFormatter::new().width(40).options(&catalog);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with(" --mode [<arg>]   one two"));
        assert!(lines.len() > 1);
        let col = " --mode [<arg>]   ".len();
        assert!(lines[1].starts_with(&" ".repeat(col)));
        assert!(lines.iter().all(|l| l.len() <= 40));
    }

    #[test]
    fn custom_prefixes_are_used() {
        let text = HelpFormatter::new()
            .short_prefix("/")
            .long_prefix("/")
            .syntax_prefix("Usage:")
            .auto_usage(true)
            .render("app", "", &catalog());
        assert!(text.starts_with("Usage: app [/v] /o <file> (/a | /b)"));
        assert!(text.contains("/v,/verbose"));
    }
}
