use ticketlink_core::{classify, synthesize, ResolvedConfig};

pub fn run(token: &str, config: &ResolvedConfig) -> Result<(), Box<dyn std::error::Error>> {
    let Some(kind) = classify(token) else {
        println!("'{}' is not a ticket reference.", token);
        return Ok(());
    };

    let targets = synthesize(token, config);
    if targets.is_empty() {
        println!("{} '{}' has no configured base URL.", kind, token);
        return Ok(());
    }
    for target in targets {
        println!("{}: {}", target.label, target.url);
    }
    Ok(())
}
