fn main() {
    if let Err(e) = codenav_cli::run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
