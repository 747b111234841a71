use optline::{Catalog, ParseResult};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub name: String,
    pub options: usize,
    pub required: usize,
    pub groups: usize,
}

#[derive(Debug, Serialize)]
pub struct ParseReport {
    pub options: Vec<MatchReport>,
    pub leftovers: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct MatchReport {
    pub option: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
}

impl CheckReport {
    pub fn new(name: &str, catalog: &Catalog) -> Self {
        Self {
            name: name.to_string(),
            options: catalog.len(),
            required: catalog.required_options().count(),
            groups: catalog.groups().count(),
        }
    }
}

impl ParseReport {
    pub fn new(result: &ParseResult<'_, '_>) -> Self {
        Self {
            options: result
                .iter()
                .map(|m| MatchReport {
                    option: m.def().display_name(),
                    values: m.values().iter().map(|v| v.to_string()).collect(),
                })
                .collect(),
            leftovers: result.leftovers().iter().map(|s| s.to_string()).collect(),
        }
    }

    /// One line per matched option, then the leftovers.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for m in &self.options {
            out.push_str(&m.option);
            if !m.values.is_empty() {
                out.push_str(" = ");
                out.push_str(&m.values.join(", "));
            }
            out.push('\n');
        }
        if !self.leftovers.is_empty() {
            out.push_str("leftovers: ");
            out.push_str(&self.leftovers.join(" "));
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use optline::{OptDef, parse};

    #[test]
    fn render_lists_matches_then_leftovers() {
        let catalog = Catalog::new()
            .option(OptDef::short("v").long("verbose").build().unwrap())
            .unwrap()
            .option(OptDef::short("o").has_arg().build().unwrap())
            .unwrap();
        let argv = ["-v", "-o", "out", "file"];
        let result = parse(&catalog, &argv).unwrap();
        let report = ParseReport::new(&result);
        assert_eq!(report.render(), "--verbose\n-o = out\nleftovers: file\n");

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["options"][0]["option"], "--verbose");
        assert!(json["options"][0].get("values").is_none());
        assert_eq!(json["options"][1]["values"][0], "out");
    }
}
