use std::env;
use std::fs;
use std::path::Path;

/// Variables que `AppConfig::from_env` lee con `option_env!`
const CONFIG_KEYS: &[&str] = &[
    "ENVIRONMENT",
    "ENABLE_LOGGING",
    "LOG_LEVEL",
    "ALERTS_DB_NAME",
    "ALERTS_DB_VERSION",
    "CUSTOMERS_DB_NAME",
    "CUSTOMERS_DB_VERSION",
    "SAMPLE_DB_NAME",
    "SAMPLE_DB_VERSION",
    "SAMPLE_BATCH_SIZE",
    "EVENT_LOG_LIMIT",
];

fn main() {
    let env_file = Path::new(".env");

    if env_file.exists() {
        println!("cargo:rerun-if-changed=.env");

        if let Ok(contents) = fs::read_to_string(env_file) {
            for line in contents.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }

                // KEY=VALUE
                if let Some((key, value)) = line.split_once('=') {
                    let key = key.trim();
                    let value = value.trim().trim_matches('"');

                    if !CONFIG_KEYS.contains(&key) {
                        println!("cargo:warning=.env: clave desconocida '{}' ignorada", key);
                        continue;
                    }
                    // El entorno del proceso tiene prioridad sobre .env
                    if env::var(key).is_err() {
                        println!("cargo:rustc-env={}={}", key, value);
                    }
                }
            }
        }
    } else {
        println!("cargo:warning=No .env file found. Using default values (see .env.example).");
    }

    for key in CONFIG_KEYS {
        println!("cargo:rerun-if-env-changed={}", key);
    }
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=.env.example");
}
