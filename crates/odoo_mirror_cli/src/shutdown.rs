use console::Term;

/// Wait for Ctrl+C, then arm a second handler that force-quits.
///
/// The caller gets control back after the first signal to stop background
/// work gracefully; a second Ctrl+C exits immediately with status 130.
pub(crate) async fn wait_for_shutdown() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await?;

    let is_tty = Term::stderr().is_term();
    if is_tty {
        eprintln!("\n\nShutdown requested, waiting for the current sync to finish...");
        eprintln!("Press Ctrl+C again to force quit.");
    } else {
        tracing::warn!("Shutdown requested, waiting for the current sync to finish");
    }

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            if is_tty {
                eprintln!("Force quit!");
            }
            std::process::exit(130);
        }
    });

    Ok(())
}
