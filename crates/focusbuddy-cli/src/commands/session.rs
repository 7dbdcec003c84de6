use std::collections::VecDeque;
use std::sync::Arc;

use clap::Args;
use focusbuddy_core::assistant::{Assistant, DisabledAssistant, RemoteAssistant};
use focusbuddy_core::timer::format_clock;
use focusbuddy_core::{Command, Config, Event, Session, SessionRuntime, TaskId};
use serde_json::json;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

use crate::notify::TerminalNotifier;

const HELP: &str = "\
commands:
  add [minutes] <title>   add a task (default minutes from config)
  toggle <id>             start or pause a task
  done <id>               finish a task early
  rm <id>                 delete a task
  list                    show tasks
  pet                     show the pet
  mood                    show the current mood
  plan <text>             ask the assistant to plan tasks
  checkin                 ask the assistant how things are going
  help                    show this help
  quit                    end the session";

#[derive(Args)]
pub struct SessionArgs {
    /// Seed for the pet's speech lines
    #[arg(long)]
    seed: Option<u64>,
}

/// Which part of the next state snapshot to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Full,
    Tasks,
    Pet,
    Mood,
}

#[derive(Debug)]
enum Input {
    Send(Command, Option<View>),
    Help,
    Quit,
}

fn parse_id(arg: Option<&str>) -> Result<TaskId, String> {
    let arg = arg.ok_or("missing task id")?;
    arg.parse::<u64>()
        .map(TaskId)
        .map_err(|_| format!("not a task id: {arg}"))
}

fn parse_line(line: &str, default_minutes: f64) -> Result<Option<Input>, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let rest_opt = (!rest.is_empty()).then_some(rest);

    let input = match word {
        "" => return Ok(None),
        "add" => {
            let (minutes, title) = match rest.split_once(char::is_whitespace) {
                Some((first, title)) => match first.parse::<f64>() {
                    Ok(minutes) => (minutes, title.trim()),
                    Err(_) => (default_minutes, rest),
                },
                None => match rest.parse::<f64>() {
                    Ok(minutes) => (minutes, ""),
                    Err(_) => (default_minutes, rest),
                },
            };
            Input::Send(
                Command::AddTask {
                    title: title.to_string(),
                    minutes,
                },
                None,
            )
        }
        "toggle" => Input::Send(Command::Toggle(parse_id(rest_opt)?), None),
        "done" => Input::Send(Command::Complete(parse_id(rest_opt)?), None),
        "rm" => Input::Send(Command::Remove(parse_id(rest_opt)?), None),
        "list" => Input::Send(Command::Snapshot, Some(View::Tasks)),
        "pet" => Input::Send(Command::Snapshot, Some(View::Pet)),
        "mood" => Input::Send(Command::Snapshot, Some(View::Mood)),
        "plan" => Input::Send(Command::Plan(rest.to_string()), None),
        "checkin" => Input::Send(Command::CheckIn, None),
        "help" | "?" => Input::Help,
        "quit" | "exit" => Input::Quit,
        other => return Err(format!("unknown command '{other}' (try 'help')")),
    };
    Ok(Some(input))
}

fn render(event: &Event, views: &mut VecDeque<View>) -> serde_json::Result<String> {
    let Event::StateSnapshot {
        tasks,
        pet,
        total_points,
        mood,
        ..
    } = event
    else {
        return serde_json::to_string(event);
    };

    match views.pop_front().unwrap_or(View::Full) {
        View::Full => serde_json::to_string(event),
        View::Tasks => {
            let rows: Vec<_> = tasks
                .iter()
                .map(|t| {
                    json!({
                        "id": t.id(),
                        "title": t.title(),
                        "clock": format_clock(t.remaining()),
                        "isRunning": t.is_running(),
                        "isCompleted": t.is_completed(),
                        "points": t.points(),
                    })
                })
                .collect();
            serde_json::to_string(&json!({ "tasks": rows, "totalPoints": total_points }))
        }
        View::Pet => serde_json::to_string(&json!({ "pet": pet })),
        View::Mood => serde_json::to_string(&json!({ "mood": mood })),
    }
}

pub fn run(args: SessionArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::load_or_default();
    if args.seed.is_some() {
        config.pet.seed = args.seed;
    }

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    rt.block_on(drive(config))
}

async fn drive(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let assistant: Arc<dyn Assistant> = match RemoteAssistant::from_config(&config.assistant) {
        Ok(remote) => Arc::new(remote),
        Err(e) => {
            warn!(error = %e, "assistant unavailable; plan and checkin will fail");
            Arc::new(DisabledAssistant)
        }
    };

    let session = Session::new(&config, TerminalNotifier);
    let (runtime, handle, mut events) = SessionRuntime::new(session, assistant, &config);
    let join = tokio::spawn(runtime.run());

    let mut views = VecDeque::from([View::Full]);
    handle.snapshot().await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            Some(event) = events.recv() => println!("{}", render(&event, &mut views)?),
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_line(&line, config.timer.default_duration_minutes) {
                    Ok(None) => {}
                    Ok(Some(Input::Help)) => eprintln!("{HELP}"),
                    Ok(Some(Input::Quit)) => break,
                    Ok(Some(Input::Send(command, view))) => {
                        if let Some(view) = view {
                            views.push_back(view);
                        }
                        if let Err(e) = handle.send(command).await {
                            eprintln!("error: {e}");
                        }
                    }
                    Err(msg) => eprintln!("error: {msg}"),
                }
            }
        }
    }

    handle.shutdown().await?;
    join.await?;
    while let Ok(event) = events.try_recv() {
        println!("{}", render(&event, &mut views)?);
    }
    Ok(())
}
