fn main() {
    if let Err(error) = unihub_cli::run() {
        tracing::error!("{error:#}");
        eprintln!("Error: {error:#}");
        std::process::exit(1);
    }
}
