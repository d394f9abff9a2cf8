#![allow(non_snake_case)]

use crate::Utils::config::CalcConfig;
use crate::Utils::poly_parser::{parse_expression, parse_function, parse_vector_function};
use crate::Utils::render::{RenderConfig, RenderStyle, coefficient_table, render_latex};
use crate::errors::CalcResult;
use crate::functions::poly_function::PolynomialFunction;
use crate::functions::series::gamma;
use crate::numbers::Scalar;
use log::info;

#[allow(dead_code)]
pub fn poly_examples(example: usize) -> CalcResult<()> {
    match example {
        0 => {
            // CONSTRUCTION AND EVALUATION
            // f(x, y) = 1 + 2x + 3y + 4xy, coefficients with x varying fastest
            let f = PolynomialFunction::from_reals(&[2, 2], &[1.0, 2.0, 3.0, 4.0])?;
            println!("f = {}", f);
            println!("f(2, 3) = {}", f.apply_reals(&[2.0, 3.0])?);
            // complex arguments are welcome
            let z = f.apply(&[Scalar::I, Scalar::complex(1.0, -1.0)])?;
            println!("f(i, 1 - i) = {}", z);
            // the same function from its derivatives at the origin
            let g = PolynomialFunction::from_derivatives(&[3], vec![Scalar::ONE; 3])?;
            println!("1 + x + x^2/2 = {}", g);
            println!("{}", coefficient_table(&f, &RenderConfig::default()));
        }
        1 => {
            // ALGEBRA AND COMPOSITION
            let f = parse_expression(&["x", "y"], "x + y")?;
            let g = parse_expression(&["x", "y"], "x - y")?;
            println!("(x + y)(x - y) = {}", f.multiply(&g));
            println!("(x + y)^3 = {}", f.pow(3)?);
            // substitute x := y^2 + 1 into x^2 + y
            let h = parse_expression(&["x", "y"], "x^2 + y")?;
            let inner = parse_expression(&["x", "y"], "y^2 + 1")?;
            let composed = h.compose(&inner, 0)?;
            println!("x^2 + y with x = y^2 + 1: {}", composed);
            match f.pow(-1) {
                Ok(p) => println!("unexpected {}", p),
                Err(e) => println!("(x + y)^-1: {}", e),
            }
        }
        2 => {
            // CALCULUS
            let f = parse_function("f(x, y) = x^3 y^2 + 2x y")?.function;
            println!("f = {}", f);
            println!("df/dx = {}", f.differ(0, 1));
            println!("d2f/dy2 = {}", f.differ(1, 2));
            println!("d4f/dx4 = {}", f.differ(0, 4));
            println!("int f dx = {}", f.integ(0, 1));
            let with_constants = f.integ_with_constants(1, &[Scalar::Real(1.0), Scalar::Real(2.0)]);
            println!("int int f dy dy + 1 + 2y = {}", with_constants);
            let circle = parse_expression(&["x", "y"], "x^2 + y^2")?;
            let gradient = circle.gradient();
            println!("grad(x^2 + y^2) = {}", gradient);
            println!("at (3, 4): {}", gradient.apply_reals(&[3.0, 4.0])?);
        }
        3 => {
            // TOTAL DERIVATIVE
            // w = x y t with x = y z, y = t and z = t; differentiate w by t
            let w = parse_expression(&["x", "y", "z", "t"], "xyt")?;
            let x = parse_expression(&["x", "y", "z", "t"], "yz")?;
            let y = parse_expression(&["x", "y", "z", "t"], "t")?;
            let z = parse_expression(&["x", "y", "z", "t"], "t")?;
            let dw = w.total_differ(3, &[Some(x), Some(y), Some(z)])?;
            println!("dw/dt = {}", dw);
            let value = dw.apply_reals(&[114.0, 22.0, 342.0, 43.0])?;
            info!("dw/dt at (114, 22, 342, 43) = {}", value);
            println!("dw/dt(114, 22, 342, 43) = {}", value);
            // implicit case: f = x + t with t = 2x
            let f = parse_expression(&["x", "t"], "x + t")?;
            let t = parse_expression(&["x"], "2x")?;
            let df = f.total_differ(1, &[None, Some(t)])?;
            println!("df/dt with t = 2x: {}", df);
        }
        4 => {
            // SERIES
            let e = PolynomialFunction::exp_series(12)?;
            println!("e ~ {}", e.apply_reals(&[1.0])?);
            let s = PolynomialFunction::sin_series(6)?;
            println!("sin(0.5) ~ {}", s.apply_reals(&[0.5])?);
            let c = PolynomialFunction::cos_series(6)?;
            println!("cos(0.5) ~ {}", c.apply_reals(&[0.5])?);
            let x = PolynomialFunction::variable(0, 1);
            let root = x.pow_real(0.5, 12, 4.0)?;
            println!("sqrt(4.4) ~ {}", root.apply_reals(&[4.4])?);
            let two_x = parse_expression(&["x"], "2x")?;
            println!("exp(2 * 0.25) ~ {}", two_x.exp_of(15).apply_reals(&[0.25])?);
            println!("Gamma(4) ~ {}", gamma(3.0, 0)?);
        }
        5 => {
            // PARSING, VECTOR FUNCTIONS AND CONFIGURATION
            let config = CalcConfig::parse(
                "render\nvariables: u, v, w\ndecimals: 2\nstyle: latex\nseries\nterms: 8\n",
            )?;
            let field = parse_vector_function("F(u, v, w) = <v w, u w, u v>")?;
            println!("{} = {}", field.name, field.function);
            let other = parse_vector_function("G(u, v, w) = <1, u, v^2>")?;
            let cross = field.function.cross(&other.function)?;
            for component in cross.components() {
                println!("{}", config.render.format(component));
            }
            let mut cfg = config.render.clone();
            cfg.style = RenderStyle::Plain;
            let dot_product = field.function.dot(&other.function)?;
            println!("F . G = {}", cfg.format(&dot_product));
            println!("{}", render_latex(&dot_product, &config.render));
            let e = PolynomialFunction::exp_series(config.series_terms)?;
            println!("exp with {} terms: {}", config.series_terms, cfg.format(&e));
        }
        _ => {
            println!("no such example: {}", example);
        }
    }
    Ok(())
}
