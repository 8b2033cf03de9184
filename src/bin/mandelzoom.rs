// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Headless front end: sets up a viewport from the command line,
//! computes one frame, and writes it out as a binary PPM.

extern crate clap;
extern crate env_logger;
extern crate image;
#[macro_use]
extern crate log;
extern crate mandelzoom;
extern crate num_cpus;

use clap::{App, Arg, ArgMatches};
use image::pnm::PNMEncoder;
use image::pnm::{PNMSubtype, SampleEncoding};
use image::ColorType;
use mandelzoom::config::{parse_complex, parse_pair};
use mandelzoom::{ColorScheme, Config, Explorer, PixelBuffer};
use std::fs::File;
use std::path::Path;
use std::str::FromStr;

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + Ord>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const CENTER: &str = "center";
const ZOOM: &str = "zoom";
const THREADS: &str = "threads";
const SCHEME: &str = "scheme";

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = num_cpus::get() * 4;

    App::new("mandelzoom")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Mandelbrot explorer, one frame at a time")
        .arg(
            Arg::with_name(OUTPUT)
                .required(true)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output file"),
        )
        .arg(
            Arg::with_name(SIZE)
                .required(false)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("1920x1080")
                .validator(|s| validate_pair::<u16>(&s, 'x', "Could not parse output image size"))
                .help("Size of output image"),
        )
        .arg(
            Arg::with_name(CENTER)
                .required(false)
                .long(CENTER)
                .short("c")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("0.0,0.0")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse center point"))
                .help("Center of the viewport on the complex plane"),
        )
        .arg(
            Arg::with_name(ZOOM)
                .required(false)
                .long(ZOOM)
                .short("z")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("0")
                .validator(|s| {
                    validate_range(
                        &s,
                        -64,
                        64,
                        "Could not parse zoom level",
                        "Zoom level must be between -64 and 64",
                    )
                })
                .help("Zoom level; each step halves the visible extent"),
        )
        .arg(
            Arg::with_name(THREADS)
                .required(false)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        max_threads,
                        "Could not parse thread count",
                        &format!("Thread count must be between 1 and {}", max_threads),
                    )
                })
                .help("Number of threads to use in solver (default: one per CPU)"),
        )
        .arg(
            Arg::with_name(SCHEME)
                .required(false)
                .long(SCHEME)
                .takes_value(true)
                .possible_values(&["banded", "gradient"])
                .default_value("banded")
                .help("Coloring scheme"),
        )
        .get_matches()
}

fn config_from(matches: &ArgMatches) -> Option<Config> {
    let (width, height) = parse_pair::<u32>(matches.value_of(SIZE)?, 'x')?;
    Some(Config {
        width,
        height,
        workers: match matches.value_of(THREADS) {
            Some(threads) => usize::from_str(threads).ok()?,
            None => num_cpus::get(),
        },
        scheme: ColorScheme::from_str(matches.value_of(SCHEME)?).ok()?,
        center: parse_complex(matches.value_of(CENTER)?)?,
        zoom_level: i32::from_str(matches.value_of(ZOOM)?).ok()?,
    })
}

fn write_image(outfile: &str, frame: &PixelBuffer) -> mandelzoom::Result<()> {
    let path = Path::new(outfile);
    let output = File::create(&path)?;
    let mut encoder =
        PNMEncoder::new(output).with_subtype(PNMSubtype::Pixmap(SampleEncoding::Binary));
    let bytes = frame.to_rgb_bytes();
    encoder.encode(
        &bytes[..],
        frame.width(),
        frame.height(),
        ColorType::RGB(8),
    )?;
    Ok(())
}

fn run(matches: &ArgMatches) -> mandelzoom::Result<()> {
    let config = config_from(matches).expect("Error parsing validated arguments");
    let mut explorer = Explorer::new(config)?;
    let outfile = matches.value_of(OUTPUT).expect("Output file is required");
    {
        let frame = explorer.compute_frame()?;
        write_image(outfile, frame)?;
    }
    info!("wrote {}", outfile);
    print!("{}", explorer.status_text());
    Ok(())
}

fn main() {
    env_logger::init();
    let matches = args();
    if let Err(e) = run(&matches) {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}
