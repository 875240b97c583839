use clap::Parser;
use core_logic::{NetworkArgs, ScriptRunner};
use gym_token::task::{DappTask, Task, TaskContext};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(author, version, about = "Terminal GymToken app: dashboard, transfer, explorer and staking", long_about = None)]
struct Args {
    #[command(flatten)]
    net: NetworkArgs,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let runner = ScriptRunner::bootstrap();
    let task = DappTask;

    let ctx = match TaskContext::load(&args.net.network) {
        Ok(ctx) => ctx,
        Err(e) => return runner.fail(task.name(), e),
    };
    runner.run(&task, ctx).await
}
