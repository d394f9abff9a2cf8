#![allow(non_snake_case)]
use RustedPolyTensor::Examples::poly_examples::poly_examples;
use RustedPolyTensor::Utils::logger::init_logger;

fn main() {
    let _ = init_logger("info", false);
    let example = 3;
    if let Err(e) = poly_examples(example) {
        println!("example {} failed: {}", example, e);
    }
}
