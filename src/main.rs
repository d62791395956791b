use std::sync::Arc;

use lantern::config::Config;
use lantern::files::DocumentRoot;
use lantern::logging::{self, AccessLog, FileSink};
use lantern::server::Server;

#[tokio::main]
async fn main() {
    logging::init_tracing();

    let cfg = match Config::load() {
        Ok(cfg) => cfg,
        Err(e) => fail(None, &format!("{e:#}")),
    };

    let sink = match FileSink::open(&cfg.log_file) {
        Ok(sink) => sink,
        Err(e) => fail(None, &format!("{e:#}")),
    };
    let log = AccessLog::new(Arc::new(sink));

    print!("{}", log.info(&format!("Server starting on {}", cfg.listen_addr)));

    let root = DocumentRoot::new(cfg.root.clone());
    let server = match Server::bind(&cfg.bind_addr(), root, log.clone()).await {
        Ok(server) => server,
        Err(e) => fail(Some(&log), &format!("{e:#}")),
    };

    server.run_until(tokio::signal::ctrl_c()).await;

    print!("{}", log.info("Server shutting down"));
}

/// Reports a fatal startup error to stdout and, when available, the access log.
fn fail(log: Option<&AccessLog>, message: &str) -> ! {
    if let Some(log) = log {
        log.error(message);
    }
    println!("{message}");
    std::process::exit(1);
}
