//! This example shows you how to convert a Lerc1 raster into a PNG file.

#![allow(missing_docs)]

use std::process::ExitCode;

use lerc1::Lerc1;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    if args.len() != 3 {
        eprintln!("Usage: {} <input.lerc> <output.png>", args[0]);

        return ExitCode::FAILURE;
    }

    let input_path = &args[1];
    let output_path = &args[2];

    let data = match std::fs::read(input_path) {
        Ok(data) => data,
        Err(err) => {
            eprintln!("Failed to read input file: {err}");

            return ExitCode::FAILURE;
        }
    };

    match Lerc1::new(&data).header() {
        Some(header) => println!("{header}"),
        None => eprintln!("Invalid Lerc1 header"),
    }

    let image = match lerc1::decode(&data) {
        Ok(image) => image,
        Err(err) => {
            eprintln!("Failed to decode Lerc1: {err}");

            return ExitCode::FAILURE;
        }
    };

    println!(
        "Decoded: {}x{} image, {} valid pixels",
        image.width,
        image.height,
        image.mask.count_valid()
    );

    if let Some((min, max)) = image.value_range() {
        println!("Values: {min} to {max}");
    }

    if let Err(err) = image.to_luma8().save(output_path) {
        eprintln!("Failed to save PNG: {err}");

        return ExitCode::FAILURE;
    }

    println!("Saved to {output_path}");

    ExitCode::SUCCESS
}
