use anyhow::{Context, Result};
use touch_shell::{appdata, args, logging, replay, Script, ShellSettings};
use touch_shell::{SHELL_DESCRIPTION, SHELL_NAME, SHELL_VERSION};

// Binary-only modules
mod window; // Winit integration

fn main() -> Result<()> {
    let args = args::parse_args()?;
    let paths = appdata::setup_appdata()?;

    let config_file = args.config.clone().unwrap_or_else(|| paths.config_file.clone());
    let settings = ShellSettings::load_or_create(&config_file)
        .with_context(|| format!("Failed to load settings from {}", config_file.display()))?;

    let verbose = args.verbose || settings.logging.verbose;
    let _log_guard = logging::init(verbose, &settings.logging.filter, &paths.logs_dir)?;

    tracing::info!("{} {}", SHELL_NAME, SHELL_VERSION);
    tracing::info!("{}", SHELL_DESCRIPTION);
    for arg in &args.ignored {
        tracing::warn!("Ignoring unknown argument: {}", arg);
    }
    tracing::debug!("App data directory: {:?}", paths.appdata_dir);
    tracing::debug!("Settings: {:?}", settings);

    if let Some(script_path) = &args.replay {
        tracing::info!("Replaying {}", script_path.display());
        let script = Script::load(script_path)?;
        let report = replay::run(&script, &settings.input);
        if let Some(text) = &report.button_text {
            tracing::info!("Button text after replay: {:?}", text);
        }
        if report.live_handles != 0 {
            anyhow::bail!("{} bridge handles still alive after replay", report.live_handles);
        }
        return Ok(());
    }

    window::run(settings)
}
