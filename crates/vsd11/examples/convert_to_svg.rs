//! Converts a VSD11 drawing stream to an SVG document.
//!
//! ```text
//! cargo run -p vsd11 --example convert_to_svg -- drawing.vsd out.svg
//! ```

use std::env;
use std::error::Error;
use std::fs::File;
use std::io::{BufReader, Write};

use vsd11::IdentityDecompressor;

fn main() -> Result<(), Box<dyn Error>> {
    let mut args = env::args().skip(1);
    let input_path = args.next().expect("missing input file path argument");
    let output_path = args.next().expect("missing output file path argument");

    let file = File::open(&input_path)?;
    let mut reader = BufReader::new(file);

    if !vsd11::is_supported(&mut reader) {
        eprintln!("{input_path} does not look like a VSD11 drawing stream");
        std::process::exit(1);
    }

    let svg = vsd11::generate_svg(&mut reader, Box::new(IdentityDecompressor))?;

    let mut out = File::create(&output_path)?;
    out.write_all(svg.as_bytes())?;

    println!("wrote {output_path} ({} bytes of SVG)", svg.len());
    Ok(())
}
