use forge_engine::Config;

/// Print the configured model priority list.
pub fn run(config: &Config) {
    if config.models.is_empty() {
        println!("No models configured.");
        return;
    }
    for (rank, model) in config.models.iter().enumerate() {
        println!("{:>2}. {model}", rank + 1);
    }
}
