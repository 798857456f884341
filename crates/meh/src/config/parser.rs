//! Extension-keyed parsers for configuration sources.
//!
//! File formats (`json`, `yaml`, `yml`) and value coercions for environment
//! overrides (`boolean`, `number`) share one registry. The registry also
//! keeps the order in which extensions are tried when loading files.

use serde_json::{Number, Value};
use std::collections::HashMap;
use thiserror::Error;

/// A parser: `(filename, content)` to a value, or `None` when the content
/// yields nothing.
pub type Parser = fn(&str, &str) -> Result<Option<Value>, ParseError>;

/// Errors raised while parsing a configuration source.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Malformed JSON.
    #[error("JSON parse error in {filename}: {source}")]
    Json {
        /// File being parsed
        filename: String,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },

    /// Malformed YAML.
    #[error("YAML parse error in {filename}: {source}")]
    Yaml {
        /// File being parsed
        filename: String,
        /// Underlying error
        #[source]
        source: serde_yaml::Error,
    },
}

const DEFAULT_ORDER: [&str; 5] = ["json", "yaml", "yml", "boolean", "number"];

/// Parsers that coerce single values rather than read files.
const VALUE_PARSERS: [&str; 2] = ["boolean", "number"];

/// Parse JSON content.
pub fn parse_json(filename: &str, content: &str) -> Result<Option<Value>, ParseError> {
    serde_json::from_str(content)
        .map(Some)
        .map_err(|source| ParseError::Json {
            filename: filename.to_string(),
            source,
        })
}

/// Parse YAML content. An empty document yields `None`.
pub fn parse_yaml(filename: &str, content: &str) -> Result<Option<Value>, ParseError> {
    if content.trim().is_empty() {
        return Ok(None);
    }

    serde_yaml::from_str(content)
        .map(Some)
        .map_err(|source| ParseError::Yaml {
            filename: filename.to_string(),
            source,
        })
}

/// `true` only for the exact string `"true"`.
pub fn parse_boolean(content: &str) -> bool {
    content == "true"
}

/// Numeric value of `content`, `None` unless it is a finite number.
///
/// Surrounding whitespace is ignored and blank content counts as zero.
pub fn parse_number(content: &str) -> Option<Number> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Some(Number::from(0));
    }

    if let Ok(integer) = trimmed.parse::<i64>() {
        return Some(Number::from(integer));
    }

    trimmed.parse::<f64>().ok().and_then(Number::from_f64)
}

fn boolean_parser(_filename: &str, content: &str) -> Result<Option<Value>, ParseError> {
    Ok(Some(Value::Bool(parse_boolean(content))))
}

fn number_parser(_filename: &str, content: &str) -> Result<Option<Value>, ParseError> {
    Ok(parse_number(content).map(Value::Number))
}

/// Parsers keyed by extension, plus the order extensions are tried in.
#[derive(Debug, Clone)]
pub struct ParserRegistry {
    definitions: HashMap<String, Parser>,
    order: Vec<String>,
}

impl Default for ParserRegistry {
    fn default() -> Self {
        let parsers: [(&str, Parser); 5] = [
            ("json", parse_json),
            ("yaml", parse_yaml),
            ("yml", parse_yaml),
            ("boolean", boolean_parser),
            ("number", number_parser),
        ];

        Self {
            definitions: parsers
                .into_iter()
                .map(|(name, parser)| (name.to_string(), parser))
                .collect(),
            order: DEFAULT_ORDER.iter().map(|name| name.to_string()).collect(),
        }
    }
}

impl ParserRegistry {
    /// Parse `content` with the parser registered for the extension of
    /// `filename` (everything after the last `.`, or the whole name).
    ///
    /// Returns `Ok(None)` when no parser is registered for the extension.
    pub fn parse(&self, filename: &str, content: &str) -> Result<Option<Value>, ParseError> {
        let extension = filename
            .rsplit_once('.')
            .map_or(filename, |(_, extension)| extension);

        match self.definitions.get(extension) {
            Some(parser) => parser(filename, content),
            None => Ok(None),
        }
    }

    /// The parser registered under `name`.
    pub fn get_parser(&self, name: &str) -> Option<Parser> {
        self.definitions.get(name).copied()
    }

    /// Register or override a parser. New names go to the end of the order.
    pub fn set_parser(&mut self, name: &str, parser: Parser) {
        self.definitions.insert(name.to_string(), parser);
        if self.position(name).is_none() {
            self.order.push(name.to_string());
        }
    }

    /// Extensions in the order they are tried.
    pub fn files_order(&self) -> &[String] {
        &self.order
    }

    /// Extensions in the order that name a file format, skipping the
    /// value coercions.
    pub fn formats(&self) -> impl Iterator<Item = &str> {
        self.order
            .iter()
            .map(String::as_str)
            .filter(|name| !VALUE_PARSERS.contains(name))
    }

    /// Position of `name` in the order.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.order.iter().position(|entry| entry == name)
    }

    /// Move (or insert) `name` to `index`. Indexes past the end append.
    pub fn move_to(&mut self, name: &str, index: usize) -> &[String] {
        let index = index.min(self.order.len());
        let previous = self.position(name);

        self.order.insert(index, name.to_string());
        if let Some(previous) = previous {
            // The insert shifted everything at or after `index` by one.
            let stale = if previous >= index { previous + 1 } else { previous };
            self.order.remove(stale);
        }

        &self.order
    }

    /// Replace the whole order.
    pub fn set_files_order(&mut self, order: Vec<String>) -> &[String] {
        self.order = order;
        &self.order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn order(registry: &ParserRegistry) -> Vec<&str> {
        registry.files_order().iter().map(String::as_str).collect()
    }

    #[test]
    fn test_default_order() {
        let registry = ParserRegistry::default();
        assert_eq!(order(&registry), DEFAULT_ORDER.to_vec());
        assert_eq!(registry.position("yml"), Some(2));
        assert_eq!(registry.position("toml"), None);
    }

    #[test]
    fn test_parse_dispatches_on_extension() {
        let registry = ParserRegistry::default();

        let json = registry.parse("config/default.json", r#"{"log": {"level": "debug"}}"#);
        assert_eq!(json.unwrap(), Some(json!({"log": {"level": "debug"}})));

        let yaml = registry.parse("config/default.yml", "log:\n  prettyPrint: true\n");
        assert_eq!(yaml.unwrap(), Some(json!({"log": {"prettyPrint": true}})));
    }

    #[test]
    fn test_unknown_extension_yields_nothing() {
        let registry = ParserRegistry::default();
        assert!(registry.parse("default.toml", "a = 1").unwrap().is_none());
    }

    #[test]
    fn test_name_without_dot_is_its_own_extension() {
        let registry = ParserRegistry::default();
        assert_eq!(registry.parse("boolean", "true").unwrap(), Some(json!(true)));
    }

    #[test]
    fn test_malformed_json_reports_filename() {
        let registry = ParserRegistry::default();
        let err = registry.parse("broken.json", "{").unwrap_err();
        assert!(matches!(err, ParseError::Json { .. }));
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn test_empty_yaml_yields_nothing() {
        assert!(parse_yaml("empty.yaml", "  \n").unwrap().is_none());
    }

    #[rstest]
    #[case("true", true)]
    #[case("false", false)]
    #[case("TRUE", false)]
    #[case("1", false)]
    #[case("", false)]
    fn test_parse_boolean(#[case] content: &str, #[case] expected: bool) {
        assert_eq!(parse_boolean(content), expected);
    }

    #[rstest]
    #[case("42", Some(json!(42)))]
    #[case(" 7 ", Some(json!(7)))]
    #[case("-3.5", Some(json!(-3.5)))]
    #[case("", Some(json!(0)))]
    #[case("abc", None)]
    #[case("NaN", None)]
    #[case("inf", None)]
    fn test_parse_number(#[case] content: &str, #[case] expected: Option<Value>) {
        assert_eq!(parse_number(content).map(Value::Number), expected);
    }

    #[test]
    fn test_set_parser_appends_new_names_only() {
        fn upper(_: &str, content: &str) -> Result<Option<Value>, ParseError> {
            Ok(Some(Value::String(content.to_uppercase())))
        }

        let mut registry = ParserRegistry::default();
        registry.set_parser("txt", upper);
        registry.set_parser("json", upper);

        assert_eq!(registry.position("txt"), Some(5));
        assert_eq!(registry.files_order().len(), 6);
        assert_eq!(registry.parse("a.json", "x").unwrap(), Some(json!("X")));
        assert!(registry.get_parser("txt").is_some());
    }

    #[test]
    fn test_move_to_earlier_position() {
        let mut registry = ParserRegistry::default();
        registry.move_to("yml", 0);
        assert_eq!(order(&registry), vec!["yml", "json", "yaml", "boolean", "number"]);
    }

    #[test]
    fn test_move_to_later_position() {
        let mut registry = ParserRegistry::default();
        registry.move_to("json", 3);
        assert_eq!(order(&registry), vec!["yaml", "yml", "json", "boolean", "number"]);
    }

    #[test]
    fn test_move_to_inserts_unknown_names() {
        let mut registry = ParserRegistry::default();
        registry.move_to("toml", 1);
        registry.move_to("ini", 99);
        assert_eq!(
            order(&registry),
            vec!["json", "toml", "yaml", "yml", "boolean", "number", "ini"]
        );
    }

    #[test]
    fn test_formats_skip_value_parsers() {
        let mut registry = ParserRegistry::default();
        assert_eq!(registry.formats().collect::<Vec<_>>(), vec!["json", "yaml", "yml"]);

        registry.move_to("number", 0);
        registry.move_to("toml", 1);
        assert_eq!(
            registry.formats().collect::<Vec<_>>(),
            vec!["toml", "json", "yaml", "yml"]
        );
    }

    #[test]
    fn test_set_files_order() {
        let mut registry = ParserRegistry::default();
        registry.set_files_order(vec!["yaml".to_string(), "json".to_string()]);
        assert_eq!(order(&registry), vec!["yaml", "json"]);
    }
}
