//! Example generation CLI.
//!
//! Generates two teams (and, via the owner link, two users) and prints the
//! created instances as JSON.
//!
//! # Usage
//!
//! ```bash
//! generate [seed]
//! ```

use example::{TeamResource, UserResource};
use fabricate_graph::Generator;
use fabricate_resources::DesiredState;

#[tokio::main]
async fn main() {
    let seed = std::env::args().nth(1).and_then(|arg| arg.parse().ok());

    let user = UserResource::new();
    let team = TeamResource::new(user);

    let states = vec![
        DesiredState::new("team-alpha", team.clone()),
        DesiredState::new("team-beta", team),
    ];

    let mut generator = Generator::new()
        .on_create(|instance| println!("created {}", instance.name))
        .on_error(|error| eprintln!("failed: {error}"));
    if let Some(seed) = seed {
        generator = generator.with_seed(seed);
    }

    match generator.generate(states).await {
        Ok(instances) => {
            for instance in &instances {
                match serde_json::to_string_pretty(instance) {
                    Ok(json) => println!("{json}"),
                    Err(e) => eprintln!("Error: {e}"),
                }
            }
        }
        Err(e) => eprintln!("Error: {e}"),
    }
}
