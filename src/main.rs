/*!
Here we go!

```text
schoolms [ config.toml ]
```
*/
use std::sync::Arc;

use simplelog::{ColorChoice, TerminalMode, TermLogger};

use schoolms::config::{self, Cfg};
use schoolms::inter;

static DEFAULT_CONFIG: &str = "config.toml";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let log_cfg = simplelog::ConfigBuilder::new()
        .add_filter_allow_str("schoolms")
        .build();
    TermLogger::init(
        schoolms::log_level_from_env(),
        log_cfg,
        TerminalMode::Stdout,
        ColorChoice::Auto
    ).unwrap();
    log::info!("Logging started.");

    let config_path = std::env::args().nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG.to_owned());
    let cfg = if std::path::Path::new(&config_path).exists() {
        match Cfg::from_file(&config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::error!("Error loading configuration from {:?}: {}", &config_path, &e);
                std::process::exit(1);
            },
        }
    } else {
        log::warn!("No configuration file {:?}; using defaults.", &config_path);
        Cfg::default()
    };
    log::info!("Configuration:\n{:#?}", &cfg);

    if let Err(e) = inter::init(&cfg.templates_dir) {
        log::error!("{}", &e);
        std::process::exit(1);
    }

    let glob = match config::load_configuration(cfg) {
        Ok(glob) => Arc::new(glob),
        Err(e) => {
            log::error!("Error setting up: {}", &e);
            std::process::exit(1);
        },
    };
    let addr = glob.addr;

    let app = inter::router(glob);

    log::info!("Listening on {}", &addr);

    if let Err(e) = axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
    {
        log::error!("Server error: {}", &e);
        std::process::exit(1);
    }
}
