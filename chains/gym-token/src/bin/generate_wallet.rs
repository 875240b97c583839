use clap::Parser;
use core_logic::ScriptRunner;
use gym_token::task::GenerateWalletTask;
use std::process::ExitCode;

/// Print a fresh random test wallet
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {}

#[tokio::main]
async fn main() -> ExitCode {
    let _args = Args::parse();
    let runner = ScriptRunner::bootstrap();
    runner.run(&GenerateWalletTask, ()).await
}
