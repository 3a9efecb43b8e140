use std::{
    env,
    fs::File,
    io::{BufReader, Read},
    process::exit,
};

fn main() {
    let path = match env::args().nth(1) {
        Some(path) => path,
        None => {
            eprintln!("usage: bytedump <file>");
            exit(2);
        }
    };
    let file = match File::open(&path) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("Error opening file! - {}", err);
            exit(1);
        }
    };
    for byte in BufReader::new(file).bytes() {
        match byte {
            Ok(byte) => println!("{} (0x{:X})", byte as char, byte),
            Err(err) => {
                eprintln!("Error reading file! - {}", err);
                exit(1);
            }
        }
    }
    println!("Finished scanning! Goodbye!");
}
