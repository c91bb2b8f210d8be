mod bootstrap;
mod report;
mod session;

use anyhow::Result;
use bikeshare_core::settings::Settings;

use session::Session;

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_deref())?;

    tracing::info!("bikeshare v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::debug!(
        "Data dir: {}, registry: {:?}, format: {}",
        settings.data_dir.display(),
        settings.registry,
        settings.format
    );

    let session = Session::new(&settings)?;
    if settings.no_interactive {
        session.run_once()
    } else {
        session.run_interactive()
    }
}
