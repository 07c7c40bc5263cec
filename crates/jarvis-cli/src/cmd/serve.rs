use jarvis_core::config::Config;
use std::path::Path;

pub fn run(root: &Path, port: Option<u16>, open_browser: bool) -> anyhow::Result<()> {
    let port = match port {
        Some(p) => p,
        None => Config::load_or_default(root)?.server.port,
    };

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(jarvis_server::serve(root, port, open_browser))
}
