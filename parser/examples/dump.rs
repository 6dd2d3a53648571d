use std::env;
use std::error::Error;
use std::fs;
use xml_parser::stream;

fn main() -> Result<(), Box<dyn Error>> {
    let file_path = env::args().nth(1).ok_or("Missing file path")?;
    let contents = fs::read_to_string(file_path)?;
    for event in stream::events(stream::document(), &contents) {
        match event {
            Ok(event) => {
                dbg!(event);
            }
            Err(e) => {
                eprintln!("{}", e);
                break;
            }
        }
    }
    Ok(())
}
