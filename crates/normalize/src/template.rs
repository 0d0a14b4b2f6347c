//! Structured source-path templates.
//!
//! A metric's `opcItemPath` binding looks like
//! `ns=1;s=[default]Pumps/{pumpId}/Speed`: an OPC server segment, a
//! separator, and an item segment carrying a bracketed tag-provider source
//! plus a path with instance-parameter placeholders. Parsing happens once
//! at model-build time; rendering substitutes a node's parameters and
//! rewrites the bracketed source to the deployment's alias prefix.

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::NormalizeError;

/// Separator between the OPC server segment and the item segment.
const SEGMENT_SEPARATOR: char = ';';

/// Leading marker of a bracketed tag-provider source.
const SOURCE_PREFIX: &str = "s=[";

#[derive(Debug, Clone, PartialEq)]
pub struct SourceTemplate {
    /// Original binding, kept for error reporting.
    source: String,
    /// Bracketed provider name; discarded on render in favor of the alias
    /// prefix. `None` when the item segment carries no `s=[...]` marker.
    provider: Option<String>,
    parts: Vec<TemplatePart>,
}

#[derive(Debug, Clone, PartialEq)]
enum TemplatePart {
    Literal(String),
    Placeholder(String),
}

impl SourceTemplate {
    pub fn parse(binding: &str) -> Result<Self, NormalizeError> {
        let mut segments = binding.split(SEGMENT_SEPARATOR);
        let _server = segments.next();
        let item = segments
            .next()
            .ok_or_else(|| NormalizeError::MalformedTemplate {
                template: binding.to_string(),
                reason: "expected `;`-separated server and item segments".into(),
            })?;

        let (provider, path) = split_source(item);
        let parts = scan_parts(path).map_err(|reason| NormalizeError::MalformedTemplate {
            template: binding.to_string(),
            reason,
        })?;

        Ok(Self {
            source: binding.to_string(),
            provider: provider.map(str::to_string),
            parts,
        })
    }

    /// The original binding this template was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn provider(&self) -> Option<&str> {
        self.provider.as_deref()
    }

    /// Placeholder names required by this template, in order of appearance.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().filter_map(|part| match part {
            TemplatePart::Placeholder(name) => Some(name.as_str()),
            TemplatePart::Literal(_) => None,
        })
    }

    /// Substitute instance parameters and qualify with the alias prefix.
    ///
    /// A placeholder absent from `parameters` is fatal — it indicates
    /// malformed source data. Templates without a bracketed source render
    /// unprefixed.
    pub fn render(
        &self,
        parameters: &IndexMap<String, Value>,
        alias_prefix: &str,
    ) -> Result<String, NormalizeError> {
        let mut path = String::new();
        for part in &self.parts {
            match part {
                TemplatePart::Literal(literal) => path.push_str(literal),
                TemplatePart::Placeholder(name) => {
                    let value =
                        parameters
                            .get(name)
                            .ok_or_else(|| NormalizeError::MissingParameter {
                                name: name.clone(),
                                template: self.source.clone(),
                            })?;
                    path.push_str(&parameter_display(value));
                }
            }
        }

        Ok(match self.provider {
            Some(_) => format!("{alias_prefix}/{path}"),
            None => path,
        })
    }
}

/// `s=[provider]rest` → (provider, rest). The capture is greedy to the
/// last `]` and requires a non-empty provider, matching the historical
/// rewrite; anything else passes through unparsed.
fn split_source(item: &str) -> (Option<&str>, &str) {
    let Some(inner) = item.strip_prefix(SOURCE_PREFIX) else {
        return (None, item);
    };
    match inner.rfind(']') {
        Some(pos) if pos > 0 => (Some(&inner[..pos]), &inner[pos + 1..]),
        _ => (None, item),
    }
}

fn scan_parts(path: &str) -> Result<Vec<TemplatePart>, String> {
    let mut parts = Vec::new();
    let mut literal = String::new();
    let mut chars = path.chars();

    while let Some(c) = chars.next() {
        match c {
            '{' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(c) => name.push(c),
                        None => return Err("unterminated `{` placeholder".into()),
                    }
                }
                if !literal.is_empty() {
                    parts.push(TemplatePart::Literal(std::mem::take(&mut literal)));
                }
                parts.push(TemplatePart::Placeholder(name));
            }
            '}' => return Err("`}` without opening `{`".into()),
            c => literal.push(c),
        }
    }

    if !literal.is_empty() {
        parts.push(TemplatePart::Literal(literal));
    }
    Ok(parts)
}

/// Parameter values substitute as bare text: strings verbatim, everything
/// else through its JSON display (numbers stay unquoted).
fn parameter_display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PREFIX: &str = "/Tag Providers/default";

    fn params(pairs: &[(&str, Value)]) -> IndexMap<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn parses_provider_and_placeholders() {
        let template = SourceTemplate::parse("ns=1;s=[default]Pumps/{pumpId}/Speed").unwrap();
        assert_eq!(template.provider(), Some("default"));
        assert_eq!(template.placeholders().collect::<Vec<_>>(), ["pumpId"]);
    }

    #[test]
    fn renders_with_alias_prefix() {
        let template = SourceTemplate::parse("ns=1;s=[default]Pumps/{pumpId}/Speed").unwrap();
        let path = template
            .render(&params(&[("pumpId", json!("P1"))]), PREFIX)
            .unwrap();
        assert_eq!(path, "/Tag Providers/default/Pumps/P1/Speed");
    }

    #[test]
    fn numeric_parameters_substitute_unquoted() {
        let template = SourceTemplate::parse("ns=1;s=[default]Cells/{cell}/State").unwrap();
        let path = template
            .render(&params(&[("cell", json!(12))]), PREFIX)
            .unwrap();
        assert_eq!(path, "/Tag Providers/default/Cells/12/State");
    }

    #[test]
    fn segment_without_source_renders_unprefixed() {
        let template = SourceTemplate::parse("ns=1;Pumps/{pumpId}/Speed").unwrap();
        assert_eq!(template.provider(), None);
        let path = template
            .render(&params(&[("pumpId", json!("P1"))]), PREFIX)
            .unwrap();
        assert_eq!(path, "Pumps/P1/Speed");
    }

    #[test]
    fn provider_capture_is_greedy() {
        let template = SourceTemplate::parse("ns=1;s=[a]b]Speed").unwrap();
        assert_eq!(template.provider(), Some("a]b"));
        let path = template.render(&params(&[]), PREFIX).unwrap();
        assert_eq!(path, "/Tag Providers/default/Speed");
    }

    #[test]
    fn empty_provider_is_not_a_source() {
        let template = SourceTemplate::parse("ns=1;s=[]Speed").unwrap();
        assert_eq!(template.provider(), None);
        assert_eq!(template.render(&params(&[]), PREFIX).unwrap(), "s=[]Speed");
    }

    #[test]
    fn single_segment_is_malformed() {
        let err = SourceTemplate::parse("s=[default]Pumps/Speed").unwrap_err();
        assert!(matches!(err, NormalizeError::MalformedTemplate { .. }));
    }

    #[test]
    fn unterminated_placeholder_is_malformed() {
        let err = SourceTemplate::parse("ns=1;s=[default]Pumps/{pumpId/Speed").unwrap_err();
        assert!(matches!(err, NormalizeError::MalformedTemplate { .. }));
    }

    #[test]
    fn missing_parameter_is_fatal() {
        let template = SourceTemplate::parse("ns=1;s=[default]Pumps/{pumpId}/Speed").unwrap();
        let err = template
            .render(&params(&[("lineId", json!("L1"))]), PREFIX)
            .unwrap_err();
        match err {
            NormalizeError::MissingParameter { name, .. } => assert_eq!(name, "pumpId"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn extra_parameters_are_ignored() {
        let template = SourceTemplate::parse("ns=1;s=[default]Pumps/{pumpId}/Speed").unwrap();
        let path = template
            .render(
                &params(&[("pumpId", json!("P1")), ("lineId", json!("L1"))]),
                PREFIX,
            )
            .unwrap();
        assert_eq!(path, "/Tag Providers/default/Pumps/P1/Speed");
    }

    #[test]
    fn trailing_segments_are_ignored() {
        // Only the second segment carries the item path.
        let template = SourceTemplate::parse("ns=1;s=[default]Speed;extra=1").unwrap();
        assert_eq!(template.render(&params(&[]), PREFIX).unwrap(), "/Tag Providers/default/Speed");
    }
}
