fn main() {
    std::process::exit(match level_forge_app::main() {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {e:#}");
            1
        }
    });
}
