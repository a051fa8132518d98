/// Initialize the logger from the CLI's counted `-v` flag.
///
/// Maps 0 to warn, 1 to info (the detection banner), 2 to debug (one
/// line per written property), 3+ to trace. `RUST_LOG` overrides.
pub fn setup_logger(verbose: u8) {
    let env_filter = match verbose {
        0 => "os_detect=warn",
        1 => "os_detect=info",
        2 => "os_detect=debug",
        _ => "os_detect=trace",
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(env_filter))
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .init();
}
