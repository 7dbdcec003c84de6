use clap::Subcommand;
use focusbuddy_core::events::FeedEvent;
use focusbuddy_core::pet::{lines, Effect, PetMoodEngine};
use focusbuddy_core::Config;

#[derive(Subcommand)]
pub enum PetAction {
    /// Feed a fresh pet a sequence of point awards and print its final state
    Replay {
        /// Points per completed task (0 = timed out)
        points: Vec<u32>,
        /// Seed for speech line selection
        #[arg(long)]
        seed: Option<u64>,
    },
}

pub fn run(action: PetAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        PetAction::Replay { points, seed } => {
            let config = Config::load_or_default();
            let seed = seed.or(config.pet.seed);
            let mut pet = match seed {
                Some(seed) => PetMoodEngine::with_seed(config.pet_policy(), seed),
                None => PetMoodEngine::new(config.pet_policy()),
            };

            let mut speech = Some(lines::INITIAL_SPEECH.to_string());
            for (i, p) in points.into_iter().enumerate() {
                let transition = pet.feed(&FeedEvent::new(format!("Task {}", i + 1), p));
                for effect in transition.effects {
                    if let Effect::Speak { text, .. } = effect {
                        speech = Some(text);
                    }
                }
            }

            let json = serde_json::to_string_pretty(&pet.snapshot(speech.as_deref()))?;
            println!("{json}");
        }
    }
    Ok(())
}
