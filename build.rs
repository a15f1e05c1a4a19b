use std::fs;

fn main() {
    // Reject a broken default config at build time rather than at first run
    let config_path = "src/default_config.toml";
    println!("cargo:rerun-if-changed={}", config_path);

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => panic!("Failed to read {}: {}", config_path, e),
    };

    if let Err(e) = content.parse::<toml::Table>() {
        panic!("Invalid {}: {}", config_path, e);
    }
}
