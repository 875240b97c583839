use clap::Parser;
use core_logic::{NetworkArgs, ScriptRunner};
use gym_token::task::{AirdropTask, Task, TaskContext};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(author, version, about = "Send GYM to the recipients listed in gym-token.toml", long_about = None)]
struct Args {
    #[command(flatten)]
    net: NetworkArgs,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let runner = ScriptRunner::bootstrap();
    let task = AirdropTask;

    let ctx = match TaskContext::load(&args.net.network) {
        Ok(ctx) => ctx,
        Err(e) => return runner.fail(task.name(), e),
    };
    runner.run(&task, ctx).await
}
