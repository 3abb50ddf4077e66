//! Decode once and dump the full round history as JSON
//!
//! Run with: cargo run --example trace_decode -p ldpc-core [-- config.json]

use ldpc_core::logging::init_logging;
use ldpc_core::DecoderConfig;

fn main() {
    let config = match std::env::args().nth(1) {
        Some(path) => DecoderConfig::from_json_file(&path).expect("load config"),
        None => DecoderConfig::default(),
    };
    init_logging(&config.log);

    let session = config.build_session().expect("build session");
    let history = session.history();

    for snapshot in history {
        tracing::info!(
            round = snapshot.round(),
            codeword = ?snapshot.codeword(),
            syndrome = ?snapshot.syndrome(),
            valid = snapshot.is_valid_codeword(),
            "round"
        );
    }
    match history.first_valid_round() {
        Some(r) => tracing::info!(round = r, "first valid codeword"),
        None => tracing::warn!(rounds = history.round_count(), "no valid codeword"),
    }

    let stdout = std::io::stdout();
    serde_json::to_writer_pretty(stdout.lock(), history).expect("write history");
    println!();
}
