use clap::Parser;
use queue_sender::args::Args;
use sender::session::LineConsole;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let stdin = std::io::stdin();
    let mut console = LineConsole::new(stdin.lock(), std::io::stdout());

    queue_sender::run(&args, &mut console).await
}
