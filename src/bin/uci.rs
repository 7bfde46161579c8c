use chess_engine::engine::Engine;
use chess_engine::uci;
use tracing_subscriber::EnvFilter;

fn main() {
    // stdout belongs to the GUI, so logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    uci::uci_loop(Engine::default());
}
