fn main() {
    if let Err(e) = chatelaine::cli::main() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
