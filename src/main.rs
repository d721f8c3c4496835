fn main() {
    if let Err(err) = metro_diagram::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
