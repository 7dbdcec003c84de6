use clap::Args;
use focusbuddy_core::{score_with, Config};
use serde_json::json;

#[derive(Args)]
pub struct ScoreArgs {
    /// Allotted seconds
    #[arg(long)]
    duration: u64,
    /// Seconds left when the task was finished
    #[arg(long)]
    remaining: u64,
}

pub fn run(args: ScoreArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.remaining > args.duration {
        return Err(format!(
            "remaining ({}) cannot exceed duration ({})",
            args.remaining, args.duration
        )
        .into());
    }
    let policy = Config::load_or_default().scoring_policy();
    let points = score_with(&policy, args.duration, args.remaining);
    println!(
        "{}",
        json!({ "duration": args.duration, "remaining": args.remaining, "points": points })
    );
    Ok(())
}
