//! # Configuration
//!
//! Sectioned text document of the form
//! ```text
//! render
//! variables: x, y, z
//! decimals: 3
//! style: latex
//! series
//! terms: 12
//! logging
//! level: info
//! to_file: false
//! ```
//! Every section is a title followed by `key: value, value` pairs. Lines starting
//! with `//`, `#` or `%` are comments. Missing keys keep their defaults, unknown
//! sections and keys are errors.
use crate::Utils::logger::{init_logger, parse_level};
use crate::Utils::render::{RenderConfig, RenderStyle};
use crate::errors::{CalcError, CalcResult};
use log::info;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{alpha1, alphanumeric1, multispace0, space0},
    combinator::{all_consuming, map, recognize},
    multi::{many0, many1, separated_list1},
    sequence::{delimited, pair, separated_pair, terminated},
};
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Float(f64),
    Integer(i64),
    Boolean(bool),
}

impl Value {
    fn from_token(s: &str) -> Value {
        if let Ok(v) = s.parse::<i64>() {
            Value::Integer(v)
        } else if let Ok(v) = s.parse::<f64>() {
            Value::Float(v)
        } else if let Ok(v) = s.parse::<bool>() {
            Value::Boolean(v)
        } else {
            Value::String(s.to_string())
        }
    }

    fn describe(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Float(v) => v.to_string(),
            Value::Integer(v) => v.to_string(),
            Value::Boolean(v) => v.to_string(),
        }
    }
}

type Section = (String, Vec<(String, Vec<Value>)>);

fn parse_name(input: &str) -> IResult<&str, String> {
    map(
        recognize(pair(
            alt((alpha1, tag("_"))),
            many0(alt((alphanumeric1, tag("_")))),
        )),
        String::from,
    )
    .parse(input)
}

fn parse_value(input: &str) -> IResult<&str, Value> {
    map(
        take_while1(|c: char| !matches!(c, ',' | ' ' | '\t' | '\n' | '\r' | ';')),
        Value::from_token,
    )
    .parse(input)
}

fn parse_value_list(input: &str) -> IResult<&str, Vec<Value>> {
    separated_list1(delimited(space0, tag(","), space0), parse_value).parse(input)
}

fn parse_key_value_pair(input: &str) -> IResult<&str, (String, Vec<Value>)> {
    let (input, kv) =
        separated_pair(parse_name, delimited(space0, tag(":"), space0), parse_value_list)
            .parse(input)?;
    let (input, _) = multispace0(input)?;
    Ok((input, kv))
}

fn parse_section(input: &str) -> IResult<&str, Section> {
    let (input, title) = terminated(parse_name, multispace0).parse(input)?;
    let (input, pairs) = many1(parse_key_value_pair).parse(input)?;
    Ok((input, (title, pairs)))
}

fn parse_document(input: &str) -> IResult<&str, Vec<Section>> {
    all_consuming(delimited(multispace0, many0(parse_section), multispace0)).parse(input)
}

fn filter_comments(input: &str) -> String {
    input
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("//")
                && !trimmed.starts_with('#')
                && !trimmed.starts_with('%')
                && !trimmed.is_empty()
        })
        .collect::<Vec<&str>>()
        .join("\n")
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalcConfig {
    pub render: RenderConfig,
    /// default number of terms for the series helpers
    pub series_terms: usize,
    pub log_level: String,
    pub log_to_file: bool,
}

impl Default for CalcConfig {
    fn default() -> Self {
        Self {
            render: RenderConfig::default(),
            series_terms: 10,
            log_level: "info".to_string(),
            log_to_file: false,
        }
    }
}

fn single<'a>(section: &str, key: &str, values: &'a [Value]) -> CalcResult<&'a Value> {
    match values {
        [v] => Ok(v),
        _ => Err(CalcError::Parse(format!(
            "{}.{} expects one value, got {}",
            section,
            key,
            values.len()
        ))),
    }
}

fn as_usize(section: &str, key: &str, values: &[Value]) -> CalcResult<usize> {
    match single(section, key, values)? {
        Value::Integer(v) if *v >= 0 => Ok(*v as usize),
        other => Err(CalcError::Parse(format!(
            "{}.{} expects a non-negative integer, got '{}'",
            section,
            key,
            other.describe()
        ))),
    }
}

fn as_bool(section: &str, key: &str, values: &[Value]) -> CalcResult<bool> {
    match single(section, key, values)? {
        Value::Boolean(v) => Ok(*v),
        other => Err(CalcError::Parse(format!(
            "{}.{} expects true or false, got '{}'",
            section,
            key,
            other.describe()
        ))),
    }
}

fn as_text(section: &str, key: &str, values: &[Value]) -> CalcResult<String> {
    Ok(single(section, key, values)?.describe())
}

impl CalcConfig {
    pub fn parse(input: &str) -> CalcResult<Self> {
        let filtered = filter_comments(input);
        let (_, sections) = parse_document(&filtered)
            .map_err(|e| CalcError::Parse(format!("configuration: {:?}", e)))?;
        let mut config = CalcConfig::default();
        for (title, pairs) in sections {
            for (key, values) in pairs {
                config.apply(&title, &key, &values)?;
            }
        }
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> CalcResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    fn apply(&mut self, section: &str, key: &str, values: &[Value]) -> CalcResult<()> {
        match (section, key) {
            ("render", "variables") => {
                self.render.variables = values.iter().map(|v| v.describe()).collect();
            }
            ("render", "decimals") => {
                self.render.decimals = Some(as_usize(section, key, values)?);
            }
            ("render", "style") => {
                let style = as_text(section, key, values)?;
                self.render.style = RenderStyle::from_str(&style.to_lowercase())
                    .map_err(|_| CalcError::Parse(format!("unknown render style '{}'", style)))?;
            }
            ("render", "function_name") => {
                self.render.function_name = as_text(section, key, values)?;
            }
            ("series", "terms") => self.series_terms = as_usize(section, key, values)?,
            ("logging", "level") => {
                let level = as_text(section, key, values)?;
                parse_level(&level)?;
                self.log_level = level;
            }
            ("logging", "to_file") => self.log_to_file = as_bool(section, key, values)?,
            ("render" | "series" | "logging", _) => {
                return Err(CalcError::Parse(format!(
                    "unknown key '{}' in section '{}'",
                    key, section
                )));
            }
            _ => {
                return Err(CalcError::Parse(format!("unknown section '{}'", section)));
            }
        }
        Ok(())
    }

    /// installs the logger described by the `logging` section
    pub fn init_logging(&self) -> CalcResult<bool> {
        let installed = init_logger(&self.log_level, self.log_to_file)?;
        info!("logging at level {}", self.log_level);
        Ok(installed)
    }
}
