fn main() {
    if let Err(error) = werbench::run() {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}
