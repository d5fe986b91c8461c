//! Loading of per-target override configuration files.
//!
//! `.json` files are read with serde. Script configs (`.js`, `.mjs`, `.cjs`,
//! `.ts`, `.mts`, `.cts`) are not executed: their exported object literal is
//! extracted and parsed statically.
//!
//! ```js
//! export default defineConfig({
//!   build: { sourcemap: true },
//!   define: { 'process.env.FLAVOR': '"beta"' },
//!   clearScreen: undefined,
//! });
//! ```

use crate::error::OverrideLoadError;
use crate::fragment::{ConfigFragment, ConfigValue};
use crate::project::{Command, Mode};
use std::future::Future;
use std::path::{Path, PathBuf};
use tracing::debug;

/// What the override file is being loaded for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigEnv {
    pub mode: Mode,
    pub command: Command,
}

/// Source of per-target user overrides.
pub trait ConfigLoader: Send + Sync {
    /// Load the override at `path`.
    ///
    /// `Ok(None)` means the file exists but exports no configuration.
    fn load(
        &self,
        path: &Path,
        env: &ConfigEnv,
    ) -> impl Future<Output = Result<Option<ConfigFragment>, OverrideLoadError>> + Send;
}

/// Loads override files from disk, relative to a project root.
#[derive(Debug, Clone)]
pub struct FileConfigLoader {
    root: PathBuf,
}

impl FileConfigLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

impl ConfigLoader for FileConfigLoader {
    fn load(
        &self,
        path: &Path,
        env: &ConfigEnv,
    ) -> impl Future<Output = Result<Option<ConfigFragment>, OverrideLoadError>> + Send {
        let path = self.resolve(path);
        let env = *env;
        async move {
            let source = match tokio::fs::read_to_string(&path).await {
                Ok(source) => source,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    return Err(OverrideLoadError::NotFound)
                }
                Err(e) => return Err(OverrideLoadError::Read(e)),
            };
            debug!(
                path = %path.display(),
                mode = env.mode.as_str(),
                command = env.command.as_str(),
                "Loaded override config"
            );

            let is_json = path.extension().and_then(|e| e.to_str()) == Some("json");
            if is_json {
                parse_json_config(&source)
            } else {
                parse_script_config(&source)
            }
        }
    }
}

fn into_fragment(value: ConfigValue) -> Result<Option<ConfigFragment>, OverrideLoadError> {
    match value {
        ConfigValue::Map(map) => Ok(Some(map)),
        ConfigValue::Undefined | ConfigValue::Null => Ok(None),
        _ => Err(OverrideLoadError::NotAnObject),
    }
}

/// Parse a JSON override document.
pub fn parse_json_config(source: &str) -> Result<Option<ConfigFragment>, OverrideLoadError> {
    let value: serde_json::Value =
        serde_json::from_str(source).map_err(|e| OverrideLoadError::Parse(e.to_string()))?;
    into_fragment(value.into())
}

/// Parse the exported object of a script config.
pub fn parse_script_config(source: &str) -> Result<Option<ConfigFragment>, OverrideLoadError> {
    let stripped = strip_comments(source);
    let exported = exported_expression(&stripped).ok_or_else(|| {
        OverrideLoadError::Parse(
            "no `export default` or `module.exports =` found".to_string(),
        )
    })?;
    let exported = unwrap_define_config(exported);

    let mut parser = JsValueParser::new(exported);
    let value = parser.parse_value().map_err(OverrideLoadError::Parse)?;
    into_fragment(value)
}

/// Text following the export marker.
fn exported_expression(source: &str) -> Option<&str> {
    ["export default", "module.exports ="]
        .iter()
        .filter_map(|marker| source.find(marker).map(|idx| idx + marker.len()))
        .min()
        .map(|start| source[start..].trim_start())
}

/// `defineConfig({ ... })` → `{ ... })`; the parser stops after the object.
fn unwrap_define_config(expr: &str) -> &str {
    expr.strip_prefix("defineConfig")
        .map(str::trim_start)
        .and_then(|rest| rest.strip_prefix('('))
        .map_or(expr, str::trim_start)
}

/// Remove `//` and `/* */` comments, leaving string contents alone.
fn strip_comments(source: &str) -> String {
    let mut result = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    let mut in_string: Option<char> = None;
    let mut escaped = false;

    while let Some(ch) = chars.next() {
        if let Some(quote) = in_string {
            result.push(ch);
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == quote {
                in_string = None;
            }
            continue;
        }

        match (ch, chars.peek()) {
            ('/', Some('/')) => {
                while chars.peek().is_some_and(|c| *c != '\n') {
                    chars.next();
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for c in chars.by_ref() {
                    if c == '\n' {
                        result.push('\n');
                    }
                    if prev == '*' && c == '/' {
                        break;
                    }
                    prev = c;
                }
            }
            ('"' | '\'' | '`', _) => {
                in_string = Some(ch);
                result.push(ch);
            }
            _ => result.push(ch),
        }
    }

    result
}

/// Parser for static JS values: objects with bare or quoted keys, arrays,
/// single/double/backtick strings, numbers, `true`, `false`, `null` and
/// `undefined`. Trailing commas are accepted.
struct JsValueParser {
    chars: Vec<char>,
    pos: usize,
}

impl JsValueParser {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn parse_value(&mut self) -> Result<ConfigValue, String> {
        self.skip_whitespace();
        match self.peek() {
            Some('{') => self.parse_object(),
            Some('[') => self.parse_array(),
            Some('"' | '\'' | '`') => self.parse_string().map(ConfigValue::String),
            Some(ch) if ch == '-' || ch == '.' || ch.is_ascii_digit() => self.parse_number(),
            Some(ch) if is_ident_start(ch) => self.parse_keyword(),
            Some(ch) => Err(format!("unexpected character '{ch}' at position {}", self.pos)),
            None => Err("unexpected end of input".to_string()),
        }
    }

    fn parse_object(&mut self) -> Result<ConfigValue, String> {
        self.advance();
        let mut map = ConfigFragment::new();

        loop {
            self.skip_whitespace();
            match self.peek() {
                Some('}') => {
                    self.advance();
                    return Ok(ConfigValue::Map(map));
                }
                None => return Err("unterminated object".to_string()),
                _ => {}
            }

            let key = self.parse_key()?;
            self.skip_whitespace();
            match self.advance() {
                Some(':') => {}
                other => return Err(format!("expected ':' after key '{key}', got {other:?}")),
            }
            let value = self.parse_value()?;
            map.insert(key, value);

            self.skip_whitespace();
            match self.peek() {
                Some(',') => {
                    self.advance();
                }
                Some('}') => {}
                None => return Err("unterminated object".to_string()),
                Some(ch) => return Err(format!("expected ',' or '}}' in object, got '{ch}'")),
            }
        }
    }

    fn parse_array(&mut self) -> Result<ConfigValue, String> {
        self.advance();
        let mut items = Vec::new();

        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(']') => {
                    self.advance();
                    return Ok(ConfigValue::List(items));
                }
                None => return Err("unterminated array".to_string()),
                _ => {}
            }

            items.push(self.parse_value()?);

            self.skip_whitespace();
            match self.peek() {
                Some(',') => {
                    self.advance();
                }
                Some(']') => {}
                None => return Err("unterminated array".to_string()),
                Some(ch) => return Err(format!("expected ',' or ']' in array, got '{ch}'")),
            }
        }
    }

    fn parse_key(&mut self) -> Result<String, String> {
        match self.peek() {
            Some('"' | '\'') => self.parse_string(),
            Some(ch) if is_ident_start(ch) || ch.is_ascii_digit() => {
                let start = self.pos;
                while self.peek().is_some_and(is_ident_part) {
                    self.pos += 1;
                }
                Ok(self.chars[start..self.pos].iter().collect())
            }
            other => Err(format!("expected object key, got {other:?}")),
        }
    }

    fn parse_string(&mut self) -> Result<String, String> {
        let Some(quote) = self.advance() else {
            return Err("expected string".to_string());
        };
        let mut s = String::new();

        loop {
            match self.advance() {
                Some(ch) if ch == quote => return Ok(s),
                Some('$') if quote == '`' && self.peek() == Some('{') => {
                    return Err("template literal interpolation is not supported".to_string())
                }
                Some('\\') => match self.advance() {
                    Some('n') => s.push('\n'),
                    Some('t') => s.push('\t'),
                    Some('r') => s.push('\r'),
                    Some(ch) => s.push(ch),
                    None => return Err("unterminated string escape".to_string()),
                },
                Some(ch) => s.push(ch),
                None => return Err("unterminated string".to_string()),
            }
        }
    }

    fn parse_number(&mut self) -> Result<ConfigValue, String> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.pos += 1;
        }
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '_'))
        {
            self.pos += 1;
        }
        let text: String = self.chars[start..self.pos]
            .iter()
            .filter(|c| **c != '_')
            .collect();

        if let Ok(n) = text.parse::<i64>() {
            return Ok(ConfigValue::Number(n.into()));
        }
        text.parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(ConfigValue::Number)
            .ok_or_else(|| format!("invalid number '{text}'"))
    }

    fn parse_keyword(&mut self) -> Result<ConfigValue, String> {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_part) {
            self.pos += 1;
        }
        let word: String = self.chars[start..self.pos].iter().collect();
        match word.as_str() {
            "true" => Ok(ConfigValue::Bool(true)),
            "false" => Ok(ConfigValue::Bool(false)),
            "null" => Ok(ConfigValue::Null),
            "undefined" => Ok(ConfigValue::Undefined),
            other => Err(format!(
                "'{other}' at position {start} is not a static value; only literals are supported"
            )),
        }
    }
}

fn is_ident_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_' || ch == '$'
}

fn is_ident_part(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '$'
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn env() -> ConfigEnv {
        ConfigEnv {
            mode: Mode::Development,
            command: Command::Serve,
        }
    }

    #[test]
    fn test_parse_export_default() {
        let source = r#"
            // renderer overrides
            export default {
                server: { port: 4000, host: 'localhost', open: true, },
                define: {
                    'process.env.NODE_ENV': '"development"',
                },
                base: "/app/",
            };
        "#;
        let fragment = parse_script_config(source).unwrap().unwrap();
        assert_eq!(
            fragment.to_json(),
            json!({
                "server": {"port": 4000, "host": "localhost", "open": true},
                "define": {"process.env.NODE_ENV": "\"development\""},
                "base": "/app/"
            })
        );
    }

    #[test]
    fn test_parse_module_exports_and_define_config() {
        let cjs = "module.exports = { build: { minify: false } };";
        let fragment = parse_script_config(cjs).unwrap().unwrap();
        assert_eq!(
            fragment.get_path("build.minify"),
            Some(&ConfigValue::Bool(false))
        );

        let esm = "import { defineConfig } from 'vite';\nexport default defineConfig({ mode: `staging` });";
        let fragment = parse_script_config(esm).unwrap().unwrap();
        assert_eq!(fragment.get("mode").and_then(ConfigValue::as_str), Some("staging"));
    }

    #[test]
    fn test_undefined_is_kept_distinct_from_null() {
        let fragment =
            parse_script_config("export default { clearScreen: undefined, publicDir: null }")
                .unwrap()
                .unwrap();
        assert_eq!(fragment.get("clearScreen"), Some(&ConfigValue::Undefined));
        assert_eq!(fragment.get("publicDir"), Some(&ConfigValue::Null));
    }

    #[test]
    fn test_numbers() {
        let fragment =
            parse_script_config("export default { a: -1, b: 2.5, c: 1e3, d: 10_000 }")
                .unwrap()
                .unwrap();
        assert_eq!(fragment.to_json(), json!({"a": -1, "b": 2.5, "c": 1000.0, "d": 10000}));
    }

    #[test]
    fn test_comment_markers_inside_strings_survive() {
        let fragment = parse_script_config(r#"export default { base: "http://cdn/*x*/" }"#)
            .unwrap()
            .unwrap();
        assert_eq!(
            fragment.get("base").and_then(ConfigValue::as_str),
            Some("http://cdn/*x*/")
        );
    }

    #[test]
    fn test_export_of_nothing() {
        assert!(parse_script_config("export default undefined;").unwrap().is_none());
    }

    #[test]
    fn test_no_export_is_parse_error() {
        assert!(matches!(
            parse_script_config("const config = {};"),
            Err(OverrideLoadError::Parse(_))
        ));
    }

    #[test]
    fn test_dynamic_values_rejected() {
        let err = parse_script_config("export default { root: __dirname }").unwrap_err();
        assert!(err.to_string().contains("__dirname"));
        assert!(parse_script_config("export default { base: `${x}/` }").is_err());
    }

    #[test]
    fn test_non_object_export() {
        assert!(matches!(
            parse_script_config("export default [1, 2]"),
            Err(OverrideLoadError::NotAnObject)
        ));
        assert!(matches!(
            parse_json_config("\"nope\""),
            Err(OverrideLoadError::NotAnObject)
        ));
    }

    #[test]
    fn test_strip_comments() {
        let stripped = strip_comments("a // line\nb /* block\n */ c 'd // e'");
        assert!(!stripped.contains("line"));
        assert!(!stripped.contains("block"));
        assert!(stripped.contains("'d // e'"));
    }

    #[tokio::test]
    async fn test_file_loader_reads_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("vite.main.config.mjs"),
            "export default { build: { sourcemap: true } };",
        )
        .unwrap();
        std::fs::write(dir.path().join("renderer.json"), r#"{"base": "/r/"}"#).unwrap();

        let loader = FileConfigLoader::new(dir.path());
        let main = loader
            .load(Path::new("vite.main.config.mjs"), &env())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            main.get_path("build.sourcemap"),
            Some(&ConfigValue::Bool(true))
        );

        let renderer = loader
            .load(&dir.path().join("renderer.json"), &env())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(renderer.get("base").and_then(ConfigValue::as_str), Some("/r/"));
    }

    #[tokio::test]
    async fn test_file_loader_errors() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.json"), "{ nope").unwrap();
        let loader = FileConfigLoader::new(dir.path());

        assert!(matches!(
            loader.load(Path::new("missing.mjs"), &env()).await,
            Err(OverrideLoadError::NotFound)
        ));
        assert!(matches!(
            loader.load(Path::new("broken.json"), &env()).await,
            Err(OverrideLoadError::Parse(_))
        ));
    }
}
