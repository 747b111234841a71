use anyhow::{Context, Result};
use optline::{Arity, Catalog, ConfigError, OptDef, OptGroup};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_SCHEMA_NAME: &str = "optline.json";

/// JSON declaration of a command-line surface.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Schema {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub syntax: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub header: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub footer: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionDecl>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<GroupDecl>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OptionDecl {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arg_name: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub optional_arg: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arity: Option<ArityDecl>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_separator: Option<char>,
}

/// `2`, `-2`, `"unbounded"` or `"none"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArityDecl {
    Count(i64),
    Keyword(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GroupDecl {
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub options: Vec<OptionDecl>,
}

impl ArityDecl {
    fn to_arity(&self) -> Result<Arity, ConfigError> {
        match self {
            Self::Count(n) => Arity::try_from(*n),
            Self::Keyword(s) => s.parse(),
        }
    }
}

impl OptionDecl {
    pub fn to_def(&self) -> Result<OptDef, ConfigError> {
        let mut builder = OptDef::builder()
            .description(self.description.clone())
            .required(self.required)
            .optional_arg(self.optional_arg);
        if let Some(short) = &self.short {
            builder = builder.short(short.clone());
        }
        if let Some(long) = &self.long {
            builder = builder.long(long.clone());
        }
        if let Some(arg_name) = &self.arg_name {
            builder = builder.arg_name(arg_name.clone());
        }
        if let Some(arity) = &self.arity {
            builder = builder.arity(arity.to_arity()?);
        }
        if let Some(sep) = self.value_separator {
            builder = builder.value_separator(sep);
        }
        builder.build()
    }
}

impl Schema {
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read schema: {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse schema JSON: {}", path.display()))
    }

    pub fn to_catalog(&self) -> Result<Catalog, ConfigError> {
        let mut catalog = Catalog::new();
        for decl in &self.options {
            catalog.register(decl.to_def()?)?;
        }
        for group in &self.groups {
            let mut g = OptGroup::new().required(group.required);
            for decl in &group.options {
                g.add(decl.to_def()?)?;
            }
            catalog.register_group(g)?;
        }
        Ok(catalog)
    }

    /// Display name for help and usage output.
    pub fn app_name(&self) -> &str {
        if self.name.trim().is_empty() {
            "app"
        } else {
            self.name.trim()
        }
    }

    /// The schema written by `optline init`.
    pub fn starter(name: &str) -> Self {
        Self {
            name: name.to_string(),
            syntax: "[OPTIONS] <FILE>...".to_string(),
            header: String::new(),
            footer: String::new(),
            options: vec![
                OptionDecl {
                    short: Some("v".to_string()),
                    long: Some("verbose".to_string()),
                    description: "Print more output".to_string(),
                    ..Default::default()
                },
                OptionDecl {
                    short: Some("o".to_string()),
                    long: Some("output".to_string()),
                    description: "Write results to FILE".to_string(),
                    arg_name: Some("file".to_string()),
                    arity: Some(ArityDecl::Count(1)),
                    ..Default::default()
                },
                OptionDecl {
                    short: Some("D".to_string()),
                    description: "Define a property".to_string(),
                    arg_name: Some("key=value".to_string()),
                    arity: Some(ArityDecl::Count(2)),
                    value_separator: Some('='),
                    ..Default::default()
                },
            ],
            groups: vec![GroupDecl {
                required: false,
                options: vec![
                    OptionDecl {
                        long: Some("json".to_string()),
                        description: "Emit JSON".to_string(),
                        ..Default::default()
                    },
                    OptionDecl {
                        long: Some("text".to_string()),
                        description: "Emit plain text".to_string(),
                        ..Default::default()
                    },
                ],
            }],
        }
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let mut out = serde_json::to_string_pretty(self).context("failed to serialize schema")?;
        out.push('\n');
        fs::write(path, out).with_context(|| format!("failed to write {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starter_schema_builds_a_catalog() {
        let schema = Schema::starter("demo");
        let catalog = schema.to_catalog().unwrap();
        assert_eq!(catalog.len(), 5);
        assert_eq!(catalog.groups().count(), 1);
        assert_eq!(catalog.get("D").unwrap().arity(), Arity::Fixed(2));
    }

    #[test]
    fn arity_accepts_counts_and_keywords() {
        let json = r#"{
            "options": [
                { "long": "files", "arity": "unbounded" },
                { "long": "pair", "arity": 2 },
                { "long": "flag", "arity": -1 }
            ]
        }"#;
        let schema: Schema = serde_json::from_str(json).unwrap();
        let catalog = schema.to_catalog().unwrap();
        assert_eq!(catalog.get("files").unwrap().arity(), Arity::Unbounded);
        assert_eq!(catalog.get("pair").unwrap().arity(), Arity::Fixed(2));
        assert_eq!(catalog.get("flag").unwrap().arity(), Arity::None);
    }

    #[test]
    fn out_of_range_arity_is_a_config_error() {
        let json = r#"{ "options": [ { "long": "bad", "arity": -5 } ] }"#;
        let schema: Schema = serde_json::from_str(json).unwrap();
        assert_eq!(
            schema.to_catalog().unwrap_err(),
            ConfigError::ArityOutOfRange(-5)
        );
    }

    #[test]
    fn kebab_case_keys_round_trip() {
        let schema = Schema::starter("demo");
        let json = serde_json::to_string(&schema).unwrap();
        assert!(json.contains("\"arg-name\""));
        assert!(json.contains("\"value-separator\":\"=\""));
        let back: Schema = serde_json::from_str(&json).unwrap();
        assert_eq!(back.options.len(), schema.options.len());
    }
}
