use todo_harbor::commands::Cli;
use todo_harbor::libs::messages::macros::is_debug_mode;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    if is_debug_mode() {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("todo_harbor=debug")))
            .with_target(false)
            .init();
    }

    Cli::menu()
}
