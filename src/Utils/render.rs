//! # Rendering of polynomial functions
//!
//! Text forms of a `PolynomialFunction`, driven by an explicit `RenderConfig`
//! (variable names, number of decimals, style) instead of shared global state.
//!
//! ## Main Structures and Methods
//! - `render(&f, &cfg)` - plain text: `1 + 2x + xy - y^2`
//! - `render_latex(&f, &cfg)` - `f(x, y) = 1 + 2x + xy - y^{2}`
//! - `coefficient_table(&f, &cfg)` - `tabled` table of the non-zero cells
//!
//! Terms appear in storage order (axis 0 innermost), zero cells are omitted,
//! unit coefficients are elided and complex coefficients are bracketed.
use crate::functions::poly_function::PolynomialFunction;
use crate::numbers::Scalar;
use itertools::Itertools;
use strum_macros::{Display, EnumIter, EnumString};
use tabled::{builder::Builder, settings::Style};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum RenderStyle {
    Plain,
    Latex,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// names of the first variables; later ones fall back to the default scheme
    pub variables: Vec<String>,
    /// fixed number of decimals, or the shortest exact form when `None`
    pub decimals: Option<usize>,
    pub style: RenderStyle,
    /// function name used by the LaTeX form
    pub function_name: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            variables: Vec::new(),
            decimals: None,
            style: RenderStyle::Plain,
            function_name: "f".to_string(),
        }
    }
}

/// `x, y, z, t`, then `x4, x5, ...`
pub fn default_variable_name(mode: usize) -> String {
    match mode {
        0 => "x".to_string(),
        1 => "y".to_string(),
        2 => "z".to_string(),
        3 => "t".to_string(),
        _ => format!("x{}", mode),
    }
}

impl RenderConfig {
    pub fn with_variables(variables: &[&str]) -> Self {
        Self {
            variables: variables.iter().map(|v| v.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn variable_name(&self, mode: usize) -> String {
        self.variables
            .get(mode)
            .cloned()
            .unwrap_or_else(|| default_variable_name(mode))
    }

    pub fn variable_names(&self, arity: usize) -> Vec<String> {
        (0..arity).map(|m| self.variable_name(m)).collect()
    }

    /// renders in the configured style
    pub fn format(&self, f: &PolynomialFunction) -> String {
        match self.style {
            RenderStyle::Plain => render(f, self),
            RenderStyle::Latex => render_latex(f, self),
        }
    }
}

fn format_real(value: f64, decimals: Option<usize>) -> String {
    match decimals {
        Some(d) => format!("{:.*}", d, value),
        None => format!("{}", value),
    }
}

/// a scalar in text form; complex values with both parts are bracketed
pub fn format_scalar(value: Scalar, decimals: Option<usize>) -> String {
    let (re, im) = (value.real(), value.imag());
    if im == 0.0 {
        return format_real(re, decimals);
    }
    if re == 0.0 {
        return format!("{}i", format_real(im, decimals));
    }
    let sign = if im < 0.0 { "-" } else { "+" };
    format!(
        "({} {} {}i)",
        format_real(re, decimals),
        sign,
        format_real(im.abs(), decimals)
    )
}

fn monomial(powers: &[usize], cfg: &RenderConfig, latex: bool) -> String {
    powers
        .iter()
        .enumerate()
        .filter(|(_, p)| **p > 0)
        .map(|(mode, &p)| {
            let name = cfg.variable_name(mode);
            match (p, latex) {
                (1, _) => name,
                (_, true) => format!("{}^{{{}}}", name, p),
                (_, false) => format!("{}^{}", name, p),
            }
        })
        .collect()
}

fn terms(f: &PolynomialFunction, cfg: &RenderConfig, latex: bool) -> String {
    let rendered: Vec<String> = f
        .coeffs()
        .cells()
        .into_iter()
        .filter(|(_, c)| !c.is_zero())
        .map(|(idx, c)| {
            let vars = monomial(&idx, cfg, latex);
            if vars.is_empty() {
                format_scalar(c, cfg.decimals)
            } else if c == Scalar::ONE {
                vars
            } else if c == Scalar::NEG_ONE {
                format!("-{}", vars)
            } else {
                format!("{}{}", format_scalar(c, cfg.decimals), vars)
            }
        })
        .collect();
    if rendered.is_empty() {
        return "0".to_string();
    }
    rendered.join(" + ").replace("+ -", "- ")
}

/// plain text form, e.g. `1 + 2x + xy - y^2`
pub fn render(f: &PolynomialFunction, cfg: &RenderConfig) -> String {
    terms(f, cfg, false)
}

/// LaTeX form with the function header, e.g. `f(x, y) = 1 + 2x - y^{2}`
pub fn render_latex(f: &PolynomialFunction, cfg: &RenderConfig) -> String {
    format!(
        "{}({}) = {}",
        cfg.function_name,
        cfg.variable_names(f.arity()).iter().join(", "),
        terms(f, cfg, true)
    )
}

/// table of (multi-index, monomial, coefficient) for every non-zero cell
pub fn coefficient_table(f: &PolynomialFunction, cfg: &RenderConfig) -> String {
    let mut builder = Builder::default();
    builder.push_record(["index", "monomial", "coefficient"]);
    for (idx, c) in f.coeffs().cells() {
        if c.is_zero() {
            continue;
        }
        let vars = monomial(&idx, cfg, false);
        builder.push_record([
            format!("{:?}", idx),
            if vars.is_empty() { "1".to_string() } else { vars },
            format_scalar(c, cfg.decimals),
        ]);
    }
    let mut table = builder.build();
    table.with(Style::modern_rounded());
    table.to_string()
}
