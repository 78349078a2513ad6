use dragon_opts::{ConfigOption, ConfigRegistry, Overrides};

fn main() -> Result<(), dragon_opts::ConfigError> {
    // e.g. STANDARDS__PHPCS__STANDARD=PSR2 cargo run --example registry
    let overrides = Overrides::builder()
        .with_value("phpstan.level", 5)
        .with_env("STANDARDS", "__")
        .build();

    let mut registry = ConfigRegistry::with_overrides(overrides);
    registry
        .register(ConfigOption::new("verbose", false), None::<&str>)
        .register_many(
            [
                ConfigOption::new("enabled", true),
                ConfigOption::new("standard", "PSR12"),
            ],
            "phpcs",
        )
        .register(ConfigOption::new("level", 7), "phpstan");

    registry.set("phpcs.enabled", true)?;

    for (key, value) in registry.dump() {
        println!("{key} = {value}");
    }

    Ok(())
}
