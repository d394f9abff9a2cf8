#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
pub mod Examples;
pub mod Utils;
pub mod errors;
pub mod functions;
pub mod mat;
pub mod numbers;
