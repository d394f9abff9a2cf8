//! # Expression parser
//!
//! Turns text into polynomial functions using only the construction and algebra
//! API of `PolynomialFunction`.
//!
//! ## Main Structures and Methods
//! - `parse_function("f(x, y) = x^2 + y^2 - 3xy")` - declaration header plus body
//! - `parse_expression(&["x", "y"], "x^2 + 2y")` - body with explicit variable names
//! - `parse_vector_function("F(x, y) = <x, y^2>")`
//!
//! ## Grammar
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := unary ('*' unary | power)*        juxtaposition multiplies
//! unary  := ('+' | '-') unary | power
//! power  := atom ('^' digits)?
//! atom   := number | '(' expr ')' | identifiers
//! ```
//! A run of letters such as `xyz` is split into declared names (longest match
//! first); an `i` that is not a declared name is the imaginary unit. The exponent
//! binds to the last name of a run, so `xy^2` is `x * y^2`. Malformed input of
//! any kind yields `CalcError::Parse`.
use crate::errors::{CalcError, CalcResult};
use crate::functions::poly_function::PolynomialFunction;
use crate::functions::vector_function::VectorFunction;
use crate::numbers::Scalar;
use log::debug;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::take_while,
    character::complete::{char, digit1, multispace0, satisfy},
    combinator::{all_consuming, opt, recognize},
    error::{ErrorKind, ParseError},
    sequence::{delimited, pair, preceded},
};
use regex::Regex;
use std::collections::HashSet;

/// a parsed declaration: name, ordered variable names and the function
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFunction<T> {
    pub name: String,
    pub variables: Vec<String>,
    pub function: T,
}

#[derive(Debug, Clone, PartialEq)]
struct ExprError {
    message: String,
}

impl ExprError {
    fn new(message: String) -> Self {
        Self { message }
    }
}

impl<'a> ParseError<&'a str> for ExprError {
    fn from_error_kind(input: &'a str, kind: ErrorKind) -> Self {
        ExprError::new(format!("{:?} at '{}'", kind, input))
    }

    fn append(_: &'a str, _: ErrorKind, other: Self) -> Self {
        other
    }
}

type PResult<'a, T> = IResult<&'a str, T, ExprError>;

fn failure<T>(message: String) -> Result<T, nom::Err<ExprError>> {
    Err(nom::Err::Failure(ExprError::new(message)))
}

fn sign(input: &str) -> PResult<'_, char> {
    alt((char('+'), char('-'))).parse(input)
}

fn symbol(input: &str, c: char) -> PResult<'_, char> {
    delimited(multispace0, char(c), multispace0).parse(input)
}

struct Grammar<'n> {
    names: &'n [String],
}

impl<'n> Grammar<'n> {
    fn arity(&self) -> usize {
        self.names.len()
    }

    fn constant(&self, value: Scalar) -> Result<PolynomialFunction, nom::Err<ExprError>> {
        PolynomialFunction::from_coefficients(&vec![1; self.arity()], vec![value])
            .or_else(|e| failure(e.to_string()))
    }

    fn expr<'a>(&self, input: &'a str) -> PResult<'a, PolynomialFunction> {
        let (mut input, mut acc) = self.term(input)?;
        while let Ok((rest, op)) = preceded(multispace0, sign).parse(input) {
            let (rest, rhs) = self.term(rest)?;
            acc = if op == '+' {
                acc.add(&rhs)
            } else {
                acc.subtract(&rhs)
            };
            input = rest;
        }
        Ok((input, acc))
    }

    fn term<'a>(&self, input: &'a str) -> PResult<'a, PolynomialFunction> {
        let (mut input, mut acc) = self.unary(input)?;
        loop {
            if let Ok((rest, _)) = symbol(input, '*') {
                let (rest, rhs) = self.unary(rest)?;
                acc = acc.multiply(&rhs);
                input = rest;
                continue;
            }
            match preceded(multispace0, |i: &'a str| self.power(i)).parse(input) {
                Ok((rest, rhs)) => {
                    acc = acc.multiply(&rhs);
                    input = rest;
                }
                Err(nom::Err::Error(_)) => break,
                Err(e) => return Err(e),
            }
        }
        Ok((input, acc))
    }

    fn unary<'a>(&self, input: &'a str) -> PResult<'a, PolynomialFunction> {
        let (input, _) = multispace0(input)?;
        if let Ok((rest, s)) = sign(input) {
            let (rest, f) = self.unary(rest)?;
            return Ok((rest, if s == '-' { f.neg() } else { f }));
        }
        self.power(input)
    }

    fn power<'a>(&self, input: &'a str) -> PResult<'a, PolynomialFunction> {
        let (input, mut factors) = self.atom(input)?;
        let (input, exponent) =
            opt(preceded(symbol_caret, preceded(multispace0, digit1))).parse(input)?;
        if let Some(digits) = exponent {
            let n: i32 = match digits.parse() {
                Ok(n) => n,
                Err(_) => return failure(format!("exponent {} is too large", digits)),
            };
            if let Some(last) = factors.pop() {
                match last.pow(n) {
                    Ok(p) => factors.push(p),
                    Err(e) => return failure(e.to_string()),
                }
            }
        }
        let mut acc = match factors.pop() {
            Some(f) => f,
            None => return failure("empty factor".to_string()),
        };
        for f in factors.iter() {
            acc = f.multiply(&acc);
        }
        Ok((input, acc))
    }

    fn atom<'a>(&self, input: &'a str) -> PResult<'a, Vec<PolynomialFunction>> {
        alt((
            |i: &'a str| self.number(i).map(|(rest, f)| (rest, vec![f])),
            |i: &'a str| self.group(i).map(|(rest, f)| (rest, vec![f])),
            |i: &'a str| self.identifiers(i),
        ))
        .parse(input)
    }

    fn number<'a>(&self, input: &'a str) -> PResult<'a, PolynomialFunction> {
        let (rest, text) = recognize(pair(digit1, opt(pair(char('.'), digit1)))).parse(input)?;
        let value: f64 = match text.parse() {
            Ok(v) => v,
            Err(_) => return failure(format!("invalid number '{}'", text)),
        };
        Ok((rest, self.constant(Scalar::Real(value))?))
    }

    fn group<'a>(&self, input: &'a str) -> PResult<'a, PolynomialFunction> {
        delimited(
            char('('),
            |i: &'a str| self.expr(i),
            preceded(multispace0, char(')')),
        )
        .parse(input)
    }

    /// a run of letters split into declared names and `i`
    fn identifiers<'a>(&self, input: &'a str) -> PResult<'a, Vec<PolynomialFunction>> {
        let (rest, run) = recognize(pair(
            satisfy(|c: char| c.is_ascii_alphabetic() || c == '_'),
            take_while(|c: char| c.is_ascii_alphanumeric() || c == '_'),
        ))
        .parse(input)?;
        let mut remaining = run;
        let mut factors = Vec::new();
        while !remaining.is_empty() {
            let longest = self
                .names
                .iter()
                .enumerate()
                .filter(|(_, n)| remaining.starts_with(n.as_str()))
                .max_by_key(|(_, n)| n.len());
            if let Some((mode, name)) = longest {
                factors.push(PolynomialFunction::variable(mode, self.arity()));
                remaining = &remaining[name.len()..];
            } else if let Some(tail) = remaining.strip_prefix('i') {
                factors.push(self.constant(Scalar::I)?);
                remaining = tail;
            } else {
                return failure(format!("unknown identifier '{}' in '{}'", remaining, run));
            }
        }
        Ok((rest, factors))
    }
}

fn symbol_caret(input: &str) -> PResult<'_, char> {
    preceded(multispace0, char('^')).parse(input)
}

fn identifier_regex() -> CalcResult<Regex> {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").map_err(|e| CalcError::Parse(e.to_string()))
}

fn check_names(names: &[String]) -> CalcResult<()> {
    let re = identifier_regex()?;
    let mut seen = HashSet::new();
    for name in names {
        if !re.is_match(name) {
            return Err(CalcError::Parse(format!("invalid variable name '{}'", name)));
        }
        if !seen.insert(name.as_str()) {
            return Err(CalcError::Parse(format!("variable '{}' declared twice", name)));
        }
    }
    Ok(())
}

fn parse_with_names(names: &[String], expression: &str) -> CalcResult<PolynomialFunction> {
    let grammar = Grammar { names };
    match all_consuming(delimited(multispace0, |i| grammar.expr(i), multispace0)).parse(expression)
    {
        Ok((_, f)) => Ok(f),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(CalcError::Parse(format!(
            "'{}': {}",
            expression, e.message
        ))),
        Err(nom::Err::Incomplete(_)) => Err(CalcError::Parse(format!(
            "'{}': incomplete expression",
            expression
        ))),
    }
}

/// Parses a body with the given ordered variable names; the result has one
/// argument per name.
pub fn parse_expression(variables: &[&str], expression: &str) -> CalcResult<PolynomialFunction> {
    let names: Vec<String> = variables.iter().map(|v| v.to_string()).collect();
    check_names(&names)?;
    parse_with_names(&names, expression)
}

/// splits `name(a, b, c) = body`
fn parse_header(text: &str) -> CalcResult<(String, Vec<String>, String)> {
    let re = Regex::new(r"(?s)^\s*([A-Za-z_][A-Za-z0-9_]*)\s*\(([^()]*)\)\s*=(.*)$")
        .map_err(|e| CalcError::Parse(e.to_string()))?;
    let caps = re
        .captures(text)
        .ok_or_else(|| CalcError::Parse(format!("expected 'name(vars) = expression', got '{}'", text)))?;
    let name = caps[1].to_string();
    let list = caps[2].trim();
    let variables: Vec<String> = if list.is_empty() {
        Vec::new()
    } else {
        list.split(',').map(|v| v.trim().to_string()).collect()
    };
    check_names(&variables)?;
    debug!("declaration {}({})", name, variables.join(", "));
    Ok((name, variables, caps[3].to_string()))
}

pub fn parse_function(text: &str) -> CalcResult<ParsedFunction<PolynomialFunction>> {
    let (name, variables, body) = parse_header(text)?;
    let function = parse_with_names(&variables, &body)?;
    Ok(ParsedFunction {
        name,
        variables,
        function,
    })
}

pub fn parse_vector_function(text: &str) -> CalcResult<ParsedFunction<VectorFunction>> {
    let (name, variables, body) = parse_header(text)?;
    let body = body.trim();
    let inner = body
        .strip_prefix('<')
        .and_then(|b| b.strip_suffix('>'))
        .ok_or_else(|| CalcError::Parse(format!("expected '<f1, f2, ...>', got '{}'", body)))?;
    let mut components = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (pos, c) in inner.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            ',' if depth == 0 => {
                components.push(parse_with_names(&variables, &inner[start..pos])?);
                start = pos + 1;
            }
            _ => {}
        }
    }
    components.push(parse_with_names(&variables, &inner[start..])?);
    Ok(ParsedFunction {
        name,
        variables,
        function: VectorFunction::new(components),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(f: &PolynomialFunction, args: &[f64]) -> Scalar {
        f.apply_reals(args).unwrap()
    }

    #[test]
    fn test_parse_function() {
        let parsed = parse_function("f(x, y) = x^2 + y^2 - 3xy").unwrap();
        assert_eq!(parsed.name, "f");
        assert_eq!(parsed.variables, vec!["x", "y"]);
        assert_eq!(parsed.function.arity(), 2);
        assert_eq!(eval(&parsed.function, &[2.0, 5.0]), Scalar::Real(-1.0));
    }

    #[test]
    fn test_juxtaposed_names() {
        let f = parse_expression(&["x", "y", "z"], "xyz + 2xz^2").unwrap();
        assert_eq!(eval(&f, &[2.0, 3.0, 5.0]), Scalar::Real(130.0));
        // longest declared name wins
        let g = parse_expression(&["x", "xx"], "xx x").unwrap();
        assert_eq!(eval(&g, &[2.0, 7.0]), Scalar::Real(14.0));
    }

    #[test]
    fn test_groups_and_unary() {
        let f = parse_expression(&["x"], "-(x + 1)^2 * 2 + +3").unwrap();
        assert_eq!(eval(&f, &[1.0]), Scalar::Real(-5.0));
        let g = parse_expression(&["x", "y"], "(x - y)(x + y)").unwrap();
        assert_eq!(eval(&g, &[3.0, 2.0]), Scalar::Real(5.0));
        let h = parse_expression(&["x"], "x - -x").unwrap();
        assert_eq!(eval(&h, &[4.0]), Scalar::Real(8.0));
    }

    #[test]
    fn test_imaginary_unit() {
        let f = parse_expression(&["x"], "x^2 + 1").unwrap();
        assert_eq!(f.apply(&[Scalar::I]).unwrap(), Scalar::ZERO);
        let g = parse_expression(&["x"], "2i x").unwrap();
        assert_eq!(g.apply_reals(&[3.0]).unwrap(), Scalar::complex(0.0, 6.0));
    }

    #[test]
    fn test_constant_keeps_arity() {
        let f = parse_function("c(x, y) = 2.5").unwrap();
        assert_eq!(f.function.arity(), 2);
        assert_eq!(eval(&f.function, &[1.0, 1.0]), Scalar::Real(2.5));
    }

    #[test]
    fn test_malformed_input() {
        let names = ["x", "y"];
        for bad in [
            "", "x +", "(x + y", "x + y)", "x ** y", "x^-1", "x + w", "2 +* x", "()", "x^",
        ] {
            assert!(
                matches!(parse_expression(&names, bad), Err(CalcError::Parse(_))),
                "accepted '{}'",
                bad
            );
        }
        assert!(parse_function("f x = x").is_err());
        assert!(parse_function("f(x, x) = x").is_err());
        assert!(parse_function("f(x, 1y) = x").is_err());
    }

    #[test]
    fn test_parse_vector_function() {
        let parsed = parse_vector_function("F(x, y) = <x, y^2, (x + y)>").unwrap();
        assert_eq!(parsed.function.len(), 3);
        let value = parsed.function.apply_reals(&[2.0, 3.0]).unwrap();
        assert_eq!(value.get(1), Scalar::Real(9.0));
        assert_eq!(value.get(2), Scalar::Real(5.0));
        assert!(parse_vector_function("F(x) = x").is_err());
        assert!(parse_vector_function("F(x) = <x, >").is_err());
    }
}
