fn main() {
    altar_sorteio::env_loader::load_dotenv();

    if let Err(err) = altar_sorteio::cli::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
