use clap::Parser;
use core_logic::{NetworkArgs, ScriptRunner};
use gym_token::task::{CheckBalanceTask, Task, TaskContext};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(author, version, about = "Show the deployer's ETH and GYM balances", long_about = None)]
struct Args {
    #[command(flatten)]
    net: NetworkArgs,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let runner = ScriptRunner::bootstrap();
    let task = CheckBalanceTask;

    let ctx = match TaskContext::load(&args.net.network) {
        Ok(ctx) => ctx,
        Err(e) => return runner.fail(task.name(), e),
    };
    runner.run(&task, ctx).await
}
