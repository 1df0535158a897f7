//! Parse a generator task written as a plain document of titled sections with "key: values" pairs:
//!
//! ```text
//! generator
//! n_vars: 3
//! n_eqs: 4
//! max_sum_terms: 3
//! max_mult_terms: 2
//! seed: 42
//! palette
//! nonlinearities: sin, cos, exp
//! names: \sin, \cos, \exp
//! logging
//! loglevel: info
//! ```
//! lines starting with //, #, % or ; are comments. `seed`, `names` and the logging section
//! are optional.
use crate::symbolic::equations_error::EquationsError;
use crate::symbolic::nonlinearities::Palette;
use crate::symbolic::random_equations::{DEFAULT_SEED, Equations, GeneratorConfig};
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{alpha1, alphanumeric1, multispace0, space0},
    combinator::{map, recognize},
    multi::{many0, many1, separated_list0},
    sequence::{delimited, pair, separated_pair, terminated},
};
use std::collections::HashMap;
use std::path::Path;

type SectionMap = HashMap<String, Vec<Value>>;
type DocumentMap = HashMap<String, SectionMap>;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Str(String),
}

impl Value {
    fn from_token(s: &str) -> Value {
        if let Ok(val) = s.parse::<i64>() {
            Value::Integer(val)
        } else if let Ok(val) = s.parse::<f64>() {
            Value::Float(val)
        } else {
            Value::Str(s.to_string())
        }
    }

    pub fn as_text(&self) -> String {
        match self {
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Str(s) => s.clone(),
        }
    }
}

/// identifier: letter or underscore, then letters, digits, underscores
fn parse_identifier(input: &str) -> IResult<&str, String> {
    let ident = recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ));
    map(ident, String::from).parse(input)
}

fn parse_value(input: &str) -> IResult<&str, Value> {
    map(
        take_while1(|c: char| !matches!(c, ',' | ' ' | '\t' | '\r' | '\n' | ';')),
        Value::from_token,
    )
    .parse(input)
}

/// comma separated values on one line (possibly none)
fn parse_values(input: &str) -> IResult<&str, Vec<Value>> {
    let comma = delimited(space0, tag(","), space0);
    separated_list0(comma, parse_value).parse(input)
}

fn parse_pair(input: &str) -> IResult<&str, (String, Vec<Value>)> {
    let colon = delimited(space0, tag(":"), space0);
    let (input, pair) = separated_pair(parse_identifier, colon, parse_values).parse(input)?;
    Ok((input.trim_start(), pair))
}

fn parse_section(input: &str) -> IResult<&str, (String, SectionMap)> {
    let (input, title) = parse_identifier(input)?;
    let (input, _) = multispace0(input)?;
    let (input, pairs) = many1(terminated(parse_pair, multispace0)).parse(input)?;
    Ok((input, (title, pairs.into_iter().collect())))
}

fn strip_comments(input: &str) -> String {
    input
        .lines()
        .map(str::trim)
        .filter(|line| {
            !(line.is_empty()
                || line.starts_with("//")
                || line.starts_with('#')
                || line.starts_with('%')
                || line.starts_with(';'))
        })
        .collect::<Vec<&str>>()
        .join("\n")
}

/// document -> section title -> key -> values
pub fn parse_document(input: &str) -> Result<DocumentMap, EquationsError> {
    let text = strip_comments(input);
    let parsed: IResult<&str, Vec<(String, SectionMap)>> =
        many1(delimited(multispace0, parse_section, multispace0)).parse(text.as_str());
    match parsed {
        Ok((remaining, sections)) => {
            if !remaining.trim().is_empty() {
                return Err(EquationsError::Configuration(format!(
                    "failed to parse task document, unparsed rest: '{}'",
                    remaining
                )));
            }
            Ok(sections.into_iter().collect())
        }
        Err(e) => Err(EquationsError::Configuration(format!(
            "failed to parse task document: {:?}",
            e
        ))),
    }
}

fn single_usize(
    doc: &DocumentMap,
    section: &str,
    key: &str,
) -> Result<Option<usize>, EquationsError> {
    let Some(values) = doc.get(section).and_then(|s| s.get(key)) else {
        return Ok(None);
    };
    match values.as_slice() {
        [Value::Integer(i)] => usize::try_from(*i).map(Some).map_err(|_| {
            EquationsError::Configuration(format!("{}.{} must be non-negative, got {}", section, key, i))
        }),
        _ => Err(EquationsError::Configuration(format!(
            "{}.{} must be a single integer, got {:?}",
            section, key, values
        ))),
    }
}

fn required_usize(doc: &DocumentMap, section: &str, key: &str) -> Result<usize, EquationsError> {
    single_usize(doc, section, key)?.ok_or_else(|| {
        EquationsError::Configuration(format!("missing {}.{} in task document", section, key))
    })
}

fn text_list(doc: &DocumentMap, section: &str, key: &str) -> Option<Vec<String>> {
    doc.get(section)
        .and_then(|s| s.get(key))
        .map(|values| values.iter().map(Value::as_text).collect())
}

/// everything needed to build a system, read from a task document
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorTask {
    pub config: GeneratorConfig,
    pub nonlinearities: Vec<String>,
    pub names: Option<Vec<String>>,
    pub loglevel: Option<String>,
}

impl GeneratorTask {
    pub fn from_document(input: &str) -> Result<GeneratorTask, EquationsError> {
        let doc = parse_document(input)?;
        let seed = match single_usize(&doc, "generator", "seed")? {
            Some(seed) => seed as u64,
            None => DEFAULT_SEED,
        };
        let config = GeneratorConfig {
            n_vars: required_usize(&doc, "generator", "n_vars")?,
            n_eqs: required_usize(&doc, "generator", "n_eqs")?,
            max_sum_terms: required_usize(&doc, "generator", "max_sum_terms")?,
            max_mult_terms: required_usize(&doc, "generator", "max_mult_terms")?,
            seed,
        };
        config.validate()?;
        let nonlinearities = text_list(&doc, "palette", "nonlinearities").ok_or_else(|| {
            EquationsError::Configuration("missing palette.nonlinearities in task document".to_string())
        })?;
        let names = text_list(&doc, "palette", "names");
        let loglevel = text_list(&doc, "logging", "loglevel").and_then(|v| v.into_iter().next());
        Ok(GeneratorTask {
            config,
            nonlinearities,
            names,
            loglevel,
        })
    }

    pub fn from_file(path: &Path) -> Result<GeneratorTask, EquationsError> {
        let text = std::fs::read_to_string(path)?;
        GeneratorTask::from_document(&text)
    }

    pub fn palette(&self) -> Result<Palette, EquationsError> {
        Palette::from_names(&self.nonlinearities, self.names.clone())
    }

    pub fn build(&self) -> Result<Equations, EquationsError> {
        Equations::from_config(self.config, self.palette()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TASK: &str = "
// generator settings
generator
n_vars: 3
n_eqs: 4
max_sum_terms: 3
max_mult_terms: 2
seed: 7
# available functions
palette
nonlinearities: sin, cos, exp
names: \\sin, \\cos, \\exp
logging
loglevel: debug
";

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value("12, x").unwrap(), (", x", Value::Integer(12)));
        assert_eq!(parse_value("1.5").unwrap(), ("", Value::Float(1.5)));
        assert_eq!(parse_value("sin\n").unwrap(), ("\n", Value::Str("sin".to_string())));
    }

    #[test]
    fn test_parse_pair() {
        let (rest, (key, values)) = parse_pair("nonlinearities : sin , cos\nnames: a").unwrap();
        assert_eq!(key, "nonlinearities");
        assert_eq!(values, vec![Value::Str("sin".into()), Value::Str("cos".into())]);
        assert_eq!(rest, "names: a");
    }

    #[test]
    fn test_parse_document_sections() {
        let doc = parse_document(TASK).unwrap();
        assert_eq!(doc.len(), 3);
        assert_eq!(doc["generator"]["n_vars"], vec![Value::Integer(3)]);
        assert_eq!(doc["palette"]["nonlinearities"].len(), 3);
        assert_eq!(doc["logging"]["loglevel"], vec![Value::Str("debug".into())]);
    }

    #[test]
    fn test_task_from_document() {
        let task = GeneratorTask::from_document(TASK).unwrap();
        assert_eq!(task.config, GeneratorConfig::new(3, 4, 3, 2, Some(7)));
        assert_eq!(task.nonlinearities, vec!["sin", "cos", "exp"]);
        assert_eq!(
            task.names,
            Some(vec!["\\sin".to_string(), "\\cos".to_string(), "\\exp".to_string()])
        );
        assert_eq!(task.loglevel.as_deref(), Some("debug"));
        let system = task.build().unwrap();
        assert_eq!(system.len(), 4);
        assert!(system.sym_expr().iter().all(|s| !s.contains("\\text{nl}")));
    }

    #[test]
    fn test_defaults() {
        let task = GeneratorTask::from_document(
            "generator\nn_vars: 2\nn_eqs: 1\nmax_sum_terms: 1\nmax_mult_terms: 1\npalette\nnonlinearities: tanh",
        )
        .unwrap();
        assert_eq!(task.config.seed, DEFAULT_SEED);
        assert_eq!(task.names, None);
        assert_eq!(task.loglevel, None);
    }

    #[test]
    fn test_invalid_documents() {
        let missing_key = "generator\nn_vars: 2\nn_eqs: 1\nmax_sum_terms: 1\npalette\nnonlinearities: sin";
        assert!(matches!(
            GeneratorTask::from_document(missing_key),
            Err(EquationsError::Configuration(_))
        ));
        let negative = "generator\nn_vars: -2\nn_eqs: 1\nmax_sum_terms: 1\nmax_mult_terms: 1\npalette\nnonlinearities: sin";
        assert!(GeneratorTask::from_document(negative).is_err());
        let zero = "generator\nn_vars: 0\nn_eqs: 1\nmax_sum_terms: 1\nmax_mult_terms: 1\npalette\nnonlinearities: sin";
        assert!(GeneratorTask::from_document(zero).is_err());
        let no_palette = "generator\nn_vars: 2\nn_eqs: 1\nmax_sum_terms: 1\nmax_mult_terms: 1";
        assert!(GeneratorTask::from_document(no_palette).is_err());
        let unknown = "generator\nn_vars: 2\nn_eqs: 1\nmax_sum_terms: 1\nmax_mult_terms: 1\npalette\nnonlinearities: sinc";
        assert!(GeneratorTask::from_document(unknown).unwrap().build().is_err());
        assert!(parse_document("").is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(TASK.as_bytes()).unwrap();
        let task = GeneratorTask::from_file(file.path()).unwrap();
        assert_eq!(task.config.n_eqs, 4);
        let missing = GeneratorTask::from_file(Path::new("no/such/task.txt"));
        assert!(matches!(missing, Err(EquationsError::Io(_))));
    }
}
